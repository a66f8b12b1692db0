//! Persisted row shapes. Blobs are produced and consumed by [`crate::codec`].

use codenav_api::{MonikerKey, ResultKind, UploadId};
use serde::{Deserialize, Serialize};

/// One row per (upload, path). Each column holds an encoded blob; `None` means the
/// column was not written or was projected away by the read.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub upload_id: UploadId,
    pub path: String,
    #[serde(with = "serde_bytes")]
    pub ranges: Option<Vec<u8>>,
    #[serde(with = "serde_bytes")]
    pub hovers: Option<Vec<u8>>,
    #[serde(with = "serde_bytes")]
    pub monikers: Option<Vec<u8>>,
    #[serde(with = "serde_bytes")]
    pub packages: Option<Vec<u8>>,
    #[serde(with = "serde_bytes")]
    pub diagnostics: Option<Vec<u8>>,
    /// Opaque SCIP payload. When present the LSIF columns are ignored.
    #[serde(with = "serde_bytes")]
    pub scip_document: Option<Vec<u8>>,
}

impl DocumentRecord {
    pub fn empty(upload_id: UploadId, path: impl Into<String>) -> Self {
        Self {
            upload_id,
            path: path.into(),
            ranges: None,
            hovers: None,
            monikers: None,
            packages: None,
            diagnostics: None,
            scip_document: None,
        }
    }
}

/// Which LSIF columns a document read should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentColumns {
    pub ranges: bool,
    pub hovers: bool,
    pub monikers: bool,
    pub packages: bool,
    pub diagnostics: bool,
}

impl DocumentColumns {
    pub const ALL: Self = Self {
        ranges: true,
        hovers: true,
        monikers: true,
        packages: true,
        diagnostics: true,
    };
    pub const RANGES: Self = Self {
        ranges: true,
        hovers: false,
        monikers: false,
        packages: false,
        diagnostics: false,
    };
    pub const RANGES_AND_MONIKERS: Self = Self {
        monikers: true,
        ..Self::RANGES
    };
    pub const RANGES_AND_HOVERS: Self = Self {
        hovers: true,
        ..Self::RANGES
    };
    pub const PACKAGES: Self = Self {
        ranges: false,
        packages: true,
        ..Self::RANGES
    };
    pub const DIAGNOSTICS: Self = Self {
        ranges: false,
        diagnostics: true,
        ..Self::RANGES
    };

    /// Copy of `record` with the unrequested columns blanked out.
    pub fn project(&self, record: &DocumentRecord) -> DocumentRecord {
        let pick = |wanted: bool, column: &Option<Vec<u8>>| if wanted { column.clone() } else { None };
        DocumentRecord {
            upload_id: record.upload_id,
            path: record.path.clone(),
            ranges: pick(self.ranges, &record.ranges),
            hovers: pick(self.hovers, &record.hovers),
            monikers: pick(self.monikers, &record.monikers),
            packages: pick(self.packages, &record.packages),
            diagnostics: pick(self.diagnostics, &record.diagnostics),
            scip_document: record.scip_document.clone(),
        }
    }
}

/// One shard of an upload's result linkage.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResultChunkRecord {
    pub upload_id: UploadId,
    pub index: u32,
    #[serde(with = "serde_bytes")]
    pub document_paths: Vec<u8>,
    #[serde(with = "serde_bytes")]
    pub document_id_range_ids: Vec<u8>,
}

/// The location rows of one moniker within one upload, for one result kind.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LocationRecord {
    pub kind: ResultKind,
    pub upload_id: UploadId,
    pub scheme: String,
    pub identifier: String,
    #[serde(with = "serde_bytes")]
    pub locations: Vec<u8>,
}

impl LocationRecord {
    pub fn key(&self) -> MonikerKey {
        MonikerKey::new(&self.scheme, &self.identifier)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadMetadata {
    pub upload_id: UploadId,
    pub num_result_chunks: u32,
}
