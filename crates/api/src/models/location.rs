use super::document::DiagnosticData;
use super::ids::{Id, UploadId};
use super::range::Range;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A named partition of the moniker location table.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Definitions,
    References,
    Implementations,
}

impl ResultKind {
    pub const ALL: [ResultKind; 3] = [
        ResultKind::Definitions,
        ResultKind::References,
        ResultKind::Implementations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResultKind::Definitions => "definitions",
            ResultKind::References => "references",
            ResultKind::Implementations => "implementations",
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "definitions" | "definition" => Ok(ResultKind::Definitions),
            "references" | "reference" => Ok(ResultKind::References),
            "implementations" | "implementation" => Ok(ResultKind::Implementations),
            other => Err(format!("unknown result kind: {other}")),
        }
    }
}

/// A stored location row: a range inside the document at `uri`, relative to its upload.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationData {
    pub uri: String,
    pub start_line: u32,
    pub start_character: u32,
    pub end_line: u32,
    pub end_character: u32,
}

impl LocationData {
    pub fn new(uri: impl Into<String>, range: Range) -> Self {
        Self {
            uri: uri.into(),
            start_line: range.start.line,
            start_character: range.start.character,
            end_line: range.end.line,
            end_character: range.end.character,
        }
    }

    pub fn range(&self) -> Range {
        Range::new(
            self.start_line,
            self.start_character,
            self.end_line,
            self.end_character,
        )
    }
}

/// A resolved query result. Never persisted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub upload_id: UploadId,
    pub path: String,
    pub range: Range,
}

/// One shard of the cross-document linkage of an upload.
///
/// Results are assigned to shards by the hash of their identifier, so every shard holds
/// a roughly proportional amount of data.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ResultChunkData {
    /// Maps the document identifiers of this shard to paths. Only meaningful within the
    /// shard that holds them.
    pub document_paths: HashMap<Id, String>,
    /// Maps a definition, reference, or implementation result to the ranges that
    /// compose it, each paired with the document it lives in.
    pub document_id_range_ids: HashMap<Id, Vec<DocumentIdRangeId>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentIdRangeId {
    pub document_id: Id,
    pub range_id: Id,
}

/// A diagnostic together with the document it was reported in.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub upload_id: UploadId,
    pub path: String,
    #[serde(flatten)]
    pub data: DiagnosticData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_kind_parse() {
        assert_eq!(
            "references".parse::<ResultKind>().unwrap(),
            ResultKind::References
        );
        assert_eq!(
            "Implementation".parse::<ResultKind>().unwrap(),
            ResultKind::Implementations
        );
        assert!("hovers".parse::<ResultKind>().is_err());
    }

    #[test]
    fn test_location_data_range() {
        let row = LocationData::new("a.go", Range::new(3, 1, 3, 9));
        assert_eq!(row.range(), Range::new(3, 1, 3, 9));
    }
}
