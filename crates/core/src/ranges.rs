//! Position lookups over the ranges of a single document.

use codenav_api::{DocumentData, Id, Position, RangeData};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Every range of `ranges` containing `position`, ordered outside-in.
///
/// Ranges are sorted by start ascending, then end descending, so a range that encloses
/// another always comes first. Ranges with identical spans are ordered by ID.
pub fn find_ranges(ranges: &HashMap<Id, RangeData>, position: Position) -> Vec<(&Id, &RangeData)> {
    let mut matches: Vec<_> = ranges
        .iter()
        .filter(|(_, r)| r.range().contains(position))
        .collect();
    matches.sort_by(|(a_id, a), (b_id, b)| outside_in(a, b).then_with(|| a_id.cmp(b_id)));
    matches
}

/// [`find_ranges`] over a decoded document, without the IDs.
pub fn find_enclosing_ranges(document: &DocumentData, position: Position) -> Vec<&RangeData> {
    find_ranges(&document.ranges, position)
        .into_iter()
        .map(|(_, r)| r)
        .collect()
}

fn outside_in(a: &RangeData, b: &RangeData) -> Ordering {
    let (a, b) = (a.range(), b.range());
    a.start.cmp(&b.start).then_with(|| b.end.cmp(&a.end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use codenav_api::Range;

    fn doc(ranges: &[(&str, Range)]) -> DocumentData {
        let mut doc = DocumentData::default();
        for (id, range) in ranges {
            doc.ranges.insert(Id::new(id), RangeData::new(*range));
        }
        doc
    }

    fn ids<'a>(found: &[(&'a Id, &RangeData)]) -> Vec<&'a str> {
        found.iter().map(|(id, _)| id.as_str()).collect()
    }

    #[test]
    fn test_nested_ranges_outside_in() {
        let d = doc(&[
            ("param", Range::new(1, 2, 1, 8)),
            ("func", Range::new(0, 0, 5, 0)),
            ("other", Range::new(7, 0, 9, 0)),
        ]);
        let found = find_ranges(&d.ranges, Position::new(1, 3));
        assert_eq!(ids(&found), vec!["func", "param"]);
    }

    #[test]
    fn test_end_is_exclusive() {
        let d = doc(&[("a", Range::new(1, 2, 1, 8))]);
        assert!(find_ranges(&d.ranges, Position::new(1, 8)).is_empty());
        assert_eq!(find_ranges(&d.ranges, Position::new(1, 7)).len(), 1);
    }

    #[test]
    fn test_shared_start_orders_longer_first() {
        let d = doc(&[
            ("short", Range::new(2, 0, 2, 5)),
            ("long", Range::new(2, 0, 4, 0)),
            ("mid", Range::new(2, 0, 3, 0)),
        ]);
        let found = find_ranges(&d.ranges, Position::new(2, 1));
        assert_eq!(ids(&found), vec!["long", "mid", "short"]);
    }

    #[test]
    fn test_identical_spans_are_stable() {
        let d = doc(&[
            ("b", Range::new(0, 0, 0, 10)),
            ("a", Range::new(0, 0, 0, 10)),
            ("c", Range::new(0, 0, 0, 10)),
        ]);
        for _ in 0..10 {
            let found = find_ranges(&d.ranges, Position::new(0, 4));
            assert_eq!(ids(&found), vec!["a", "b", "c"]);
        }
    }

    #[test]
    fn test_no_match() {
        let d = doc(&[("a", Range::new(3, 0, 3, 4))]);
        assert!(find_enclosing_ranges(&d, Position::new(0, 0)).is_empty());
        assert!(find_enclosing_ranges(&DocumentData::default(), Position::new(3, 1)).is_empty());
    }

    #[test]
    fn test_every_result_contains_position_and_enclosers_come_first() {
        let d = doc(&[
            ("file", Range::new(0, 0, 100, 0)),
            ("class", Range::new(2, 0, 40, 1)),
            ("method", Range::new(5, 4, 20, 5)),
            ("block", Range::new(6, 8, 19, 9)),
            ("ident", Range::new(10, 12, 10, 18)),
            ("sibling", Range::new(21, 4, 30, 5)),
        ]);
        for line in 0..45 {
            for character in 0..25 {
                let position = Position::new(line, character);
                let found = find_enclosing_ranges(&d, position);
                for r in &found {
                    assert!(r.range().contains(position));
                }
                for (i, a) in found.iter().enumerate() {
                    for b in &found[i + 1..] {
                        assert!(
                            !(b.range().encloses(&a.range()) && b.range() != a.range()),
                            "{} precedes enclosing {}",
                            a.range(),
                            b.range()
                        );
                    }
                }
            }
        }
    }
}
