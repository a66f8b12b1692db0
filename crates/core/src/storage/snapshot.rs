//! Single-file persistence for [`MemoryBackend`].
//!
//! Layout: 8-byte magic, little-endian `u32` format version, little-endian `u64` xxh3
//! checksum of the payload, then the payload (a [`StorageSnapshot`] encoded like every
//! other blob).

use super::memory::{MemoryBackend, Tables};
use super::records::{DocumentRecord, LocationRecord, ResultChunkRecord, UploadMetadata};
use crate::codec;
use crate::error::{CodecError, StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::xxh3_64;

pub const SNAPSHOT_MAGIC: &[u8; 8] = b"CNAVSNAP";
pub const SNAPSHOT_VERSION: u32 = 1;
const HEADER_LEN: usize = 8 + 4 + 8;

#[derive(Serialize, Deserialize, Default)]
pub struct StorageSnapshot {
    pub metadata: Vec<UploadMetadata>,
    pub documents: Vec<DocumentRecord>,
    pub result_chunks: Vec<ResultChunkRecord>,
    pub locations: Vec<LocationRecord>,
}

fn to_storage(tables: &Tables) -> StorageSnapshot {
    StorageSnapshot {
        metadata: tables.metadata.values().copied().collect(),
        documents: tables.documents.values().cloned().collect(),
        result_chunks: tables.result_chunks.values().cloned().collect(),
        locations: tables.locations.values().cloned().collect(),
    }
}

fn from_storage(snapshot: StorageSnapshot) -> Tables {
    let mut tables = Tables::default();
    for meta in snapshot.metadata {
        tables.metadata.insert(meta.upload_id, meta);
    }
    for doc in snapshot.documents {
        tables.documents.insert((doc.upload_id, doc.path.clone()), doc);
    }
    for chunk in snapshot.result_chunks {
        tables
            .result_chunks
            .insert((chunk.upload_id, chunk.index), chunk);
    }
    for loc in snapshot.locations {
        let key = (
            loc.kind,
            loc.upload_id,
            loc.scheme.clone(),
            loc.identifier.clone(),
        );
        tables.locations.insert(key, loc);
    }
    tables
}

fn encode_snapshot(tables: &Tables) -> Result<Vec<u8>, CodecError> {
    let payload = codec::encode(&to_storage(tables))?;
    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(SNAPSHOT_MAGIC);
    bytes.extend_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&xxh3_64(&payload).to_le_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

fn decode_snapshot(bytes: &[u8]) -> Result<Tables, CodecError> {
    if bytes.len() < HEADER_LEN || &bytes[..8] != SNAPSHOT_MAGIC {
        return Err(CodecError::Invalid("not a codenav snapshot".to_string()));
    }
    let (version, rest) = bytes[8..].split_at(4);
    let (checksum, payload) = rest.split_at(8);

    let version = u32::from_le_bytes(version.try_into().map_err(|_| truncated())?);
    if version != SNAPSHOT_VERSION {
        return Err(CodecError::Invalid(format!(
            "snapshot version {version}, expected {SNAPSHOT_VERSION}"
        )));
    }
    let checksum = u64::from_le_bytes(checksum.try_into().map_err(|_| truncated())?);
    if xxh3_64(payload) != checksum {
        return Err(CodecError::Invalid("snapshot checksum mismatch".to_string()));
    }

    let snapshot: StorageSnapshot = codec::decode(payload)?;
    Ok(from_storage(snapshot))
}

fn truncated() -> CodecError {
    CodecError::Invalid("truncated snapshot header".to_string())
}

impl MemoryBackend {
    /// Write the current version of every table to `path`, atomically.
    pub async fn save_to(&self, path: &Path) -> StoreResult<()> {
        let tables = self.snapshot().await;
        let path = path.to_path_buf();

        tokio::task::spawn_blocking(move || -> StoreResult<()> {
            let bytes = encode_snapshot(&tables)
                .map_err(|e| StoreError::corrupt(format!("encoding {}", path.display()), e))?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            // Write to temp, then rename
            let temp_path = temp_path(&path);
            std::fs::write(&temp_path, bytes)?;
            std::fs::rename(&temp_path, &path)?;
            tracing::info!("Saved snapshot to {}", path.display());
            Ok(())
        })
        .await
        .map_err(|e| StoreError::Internal(e.to_string()))?
    }

    /// Load a backend from a snapshot file. `Ok(None)` when the file does not exist.
    pub async fn load_from(path: &Path) -> StoreResult<Option<Self>> {
        let path = path.to_path_buf();

        tokio::task::spawn_blocking(move || -> StoreResult<Option<Self>> {
            if !path.exists() {
                return Ok(None);
            }
            let bytes = std::fs::read(&path)?;
            match decode_snapshot(&bytes) {
                Ok(tables) => {
                    tracing::info!(
                        "Loaded snapshot from {} ({} uploads)",
                        path.display(),
                        tables.metadata.len()
                    );
                    Ok(Some(MemoryBackend::from_tables(tables)))
                }
                Err(e) => {
                    tracing::warn!("Failed to parse snapshot at {}: {}", path.display(), e);
                    Err(StoreError::corrupt(format!("snapshot {}", path.display()), e))
                }
            }
        })
        .await
        .map_err(|e| StoreError::Internal(e.to_string()))?
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_foreign_bytes() {
        assert!(decode_snapshot(b"short").is_err());
        assert!(decode_snapshot(b"NOTASNAPxxxxxxxxxxxxxxxxxxxxxxxx").is_err());
    }

    #[test]
    fn test_rejects_flipped_payload() {
        let mut bytes = encode_snapshot(&Tables::default()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        let err = decode_snapshot(&bytes).err().unwrap();
        assert!(err.to_string().contains("checksum"));
    }

    #[test]
    fn test_rejects_other_version() {
        let mut bytes = encode_snapshot(&Tables::default()).unwrap();
        bytes[8..12].copy_from_slice(&(SNAPSHOT_VERSION + 1).to_le_bytes());
        let err = decode_snapshot(&bytes).err().unwrap();
        assert!(err.to_string().contains("version"));
    }

    #[test]
    fn test_temp_path_sits_next_to_target() {
        let p = temp_path(Path::new("/data/index.snapshot"));
        assert_eq!(p, PathBuf::from("/data/index.snapshot.tmp"));
    }
}
