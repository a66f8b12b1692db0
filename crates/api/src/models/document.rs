use super::ids::Id;
use super::moniker::{MonikerData, PackageInformationData};
use super::range::Range;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single document within an upload. Every ID it holds is local to the upload.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct DocumentData {
    pub ranges: HashMap<Id, RangeData>,
    /// Hover text, normalized to markdown.
    pub hover_results: HashMap<Id, String>,
    pub monikers: HashMap<Id, MonikerData>,
    pub package_information: HashMap<Id, PackageInformationData>,
    pub diagnostics: Vec<DiagnosticData>,
}

/// A range vertex with the result data reachable from it collapsed in.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct RangeData {
    pub start_line: u32,
    pub start_character: u32,
    /// Exclusive together with `end_character`.
    pub end_line: u32,
    pub end_character: u32,
    pub definition_result_id: Option<Id>,
    pub reference_result_id: Option<Id>,
    pub implementation_result_id: Option<Id>,
    pub hover_result_id: Option<Id>,
    pub moniker_ids: Vec<Id>,
}

impl RangeData {
    pub fn new(range: Range) -> Self {
        Self {
            start_line: range.start.line,
            start_character: range.start.character,
            end_line: range.end.line,
            end_character: range.end.character,
            ..Default::default()
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

    pub fn with_monikers<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Id>,
    {
        self.moniker_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_hover(mut self, id: impl Into<Id>) -> Self {
        self.hover_result_id = Some(id.into());
        self
    }

    pub fn with_definition(mut self, id: impl Into<Id>) -> Self {
        self.definition_result_id = Some(id.into());
        self
    }

    pub fn with_reference(mut self, id: impl Into<Id>) -> Self {
        self.reference_result_id = Some(id.into());
        self
    }

    pub fn with_implementation(mut self, id: impl Into<Id>) -> Self {
        self.implementation_result_id = Some(id.into());
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct DiagnosticData {
    pub severity: i32,
    pub code: String,
    pub message: String,
    pub source: String,
    pub start_line: u32,
    pub start_character: u32,
    pub end_line: u32,
    pub end_character: u32,
}

impl DiagnosticData {
    pub fn range(&self) -> Range {
        Range::new(
            self.start_line,
            self.start_character,
            self.end_line,
            self.end_character,
        )
    }
}
