pub mod chunks;
pub mod codec;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod ranges;

pub mod facade;
pub mod query;
pub mod storage;
pub mod writer;

pub use config::StoreConfig;
pub use error::{CodecError, StoreError, StoreResult};
pub use facade::StoreHandle;
pub use metrics::{InMemoryMetrics, NoopStoreMetrics, StoreMetrics};
pub use query::{IndexStore, Page};
pub use storage::{IndexBackend, MemoryBackend};
pub use writer::{EncodedUpload, UploadWriter};
