pub mod backend;
pub mod memory;
pub mod records;
pub mod snapshot;

pub use backend::IndexBackend;
pub use memory::{BackendStats, MemoryBackend};
pub use records::{DocumentColumns, DocumentRecord, LocationRecord, ResultChunkRecord, UploadMetadata};
pub use snapshot::{SNAPSHOT_VERSION, StorageSnapshot};
