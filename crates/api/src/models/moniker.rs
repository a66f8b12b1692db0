use super::ids::Id;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MonikerKind {
    Local,
    Import,
    Export,
    Implementation,
}

impl MonikerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MonikerKind::Local => "local",
            MonikerKind::Import => "import",
            MonikerKind::Export => "export",
            MonikerKind::Implementation => "implementation",
        }
    }
}

impl fmt::Display for MonikerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MonikerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(MonikerKind::Local),
            "import" => Ok(MonikerKind::Import),
            "export" => Ok(MonikerKind::Export),
            "implementation" => Ok(MonikerKind::Implementation),
            other => Err(format!("unknown moniker kind: {other}")),
        }
    }
}

/// A portable name attached to a range.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct MonikerData {
    pub kind: MonikerKind,
    /// Name of the package manager type (e.g. `gomod`, `npm`).
    pub scheme: String,
    pub identifier: String,
    /// Absent when the moniker is not bound to an external package.
    pub package_information_id: Option<Id>,
}

impl MonikerData {
    pub fn key(&self) -> MonikerKey {
        MonikerKey::new(&self.scheme, &self.identifier)
    }
}

/// The cross-upload join key of a moniker. Ordering is scheme, then identifier.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonikerKey {
    pub scheme: String,
    pub identifier: String,
}

impl MonikerKey {
    pub fn new(scheme: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            identifier: identifier.into(),
        }
    }
}

impl fmt::Display for MonikerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scheme, self.identifier)
    }
}

impl From<&MonikerData> for MonikerKey {
    fn from(moniker: &MonikerData) -> Self {
        moniker.key()
    }
}

/// Parses `scheme:identifier`. The identifier may itself contain colons.
impl FromStr for MonikerKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((scheme, identifier)) if !scheme.is_empty() && !identifier.is_empty() => {
                Ok(MonikerKey::new(scheme, identifier))
            }
            _ => Err(format!("expected scheme:identifier, got {s:?}")),
        }
    }
}

/// The external package a moniker belongs to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PackageInformationData {
    /// Name of the package manager.
    pub manager: String,
    pub name: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moniker_key_parse() {
        let key: MonikerKey = "gomod:github.com/x/leftpad:Pad".parse().unwrap();
        assert_eq!(key.scheme, "gomod");
        assert_eq!(key.identifier, "github.com/x/leftpad:Pad");
        assert!("leftpad".parse::<MonikerKey>().is_err());
        assert!(":leftpad".parse::<MonikerKey>().is_err());
    }

    #[test]
    fn test_moniker_key_order() {
        let a = MonikerKey::new("gomod", "b");
        let b = MonikerKey::new("npm", "a");
        assert!(a < b);
        assert!(MonikerKey::new("gomod", "a") < a);
    }

    #[test]
    fn test_moniker_kind_serde() {
        let json = serde_json::to_string(&MonikerKind::Implementation).unwrap();
        assert_eq!(json, "\"implementation\"");
        assert_eq!("Export".parse::<MonikerKind>().unwrap(), MonikerKind::Export);
    }
}
