use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// Identifier of one ingested index. Every stored record is scoped by it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct UploadId(pub i64);

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UploadId {
    fn from(id: i64) -> Self {
        UploadId(id)
    }
}

/// Identifier local to a single upload (ranges, monikers, hovers, results, documents).
/// It carries no meaning outside the upload that produced it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(transparent)]
pub struct Id(pub SmolStr);

impl Id {
    pub fn new(s: impl AsRef<str>) -> Self {
        Id(SmolStr::new(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::new(s)
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id(SmolStr::from(s))
    }
}
