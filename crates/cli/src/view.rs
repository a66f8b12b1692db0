use codenav_api::{Diagnostic, Location, MonikerData, Range};
use tabled::Tabled;

/// One moniker of one enclosing range. `depth` 0 is the outermost range.
#[derive(Tabled)]
pub struct MonikerRow {
    pub depth: usize,
    pub kind: String,
    pub scheme: String,
    pub identifier: String,
    pub package: String,
}

impl MonikerRow {
    pub fn rows(ranges: &[Vec<MonikerData>]) -> Vec<Self> {
        ranges
            .iter()
            .enumerate()
            .flat_map(|(depth, monikers)| {
                monikers.iter().map(move |m| Self {
                    depth,
                    kind: m.kind.to_string(),
                    scheme: m.scheme.clone(),
                    identifier: m.identifier.clone(),
                    package: m
                        .package_information_id
                        .as_ref()
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                })
            })
            .collect()
    }
}

#[derive(Tabled)]
pub struct LocationRow {
    pub upload: i64,
    pub path: String,
    pub range: String,
}

impl From<&Location> for LocationRow {
    fn from(location: &Location) -> Self {
        Self {
            upload: location.upload_id.0,
            path: location.path.clone(),
            range: format_range(&location.range),
        }
    }
}

#[derive(Tabled)]
pub struct DiagnosticRow {
    pub path: String,
    pub range: String,
    pub severity: String,
    pub code: String,
    pub message: String,
}

impl From<&Diagnostic> for DiagnosticRow {
    fn from(d: &Diagnostic) -> Self {
        Self {
            path: d.path.clone(),
            range: format_range(&d.data.range()),
            severity: severity_label(d.data.severity).to_string(),
            code: if d.data.code.is_empty() {
                "-".to_string()
            } else {
                d.data.code.clone()
            },
            message: d.data.message.clone(),
        }
    }
}

/// One-based, the way editors display positions.
pub fn format_range(range: &Range) -> String {
    format!(
        "{}:{}-{}:{}",
        range.start.line + 1,
        range.start.character + 1,
        range.end.line + 1,
        range.end.character + 1
    )
}

fn severity_label(severity: i32) -> &'static str {
    match severity {
        1 => "error",
        2 => "warning",
        3 => "info",
        4 => "hint",
        _ => "-",
    }
}
