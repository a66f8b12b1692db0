use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_DATA_DIR: &str = ".codenav";
pub const DEFAULT_RESULTS_PER_RESULT_CHUNK: usize = 512;
pub const DEFAULT_MAX_RESULT_CHUNKS: u32 = 1000;
const SNAPSHOT_FILE: &str = "index.snapshot";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Target number of results per result chunk when an upload is written.
    pub results_per_result_chunk: usize,
    /// Upper bound on the number of result chunks of a single upload.
    pub max_result_chunks: u32,
    /// Root for snapshots and logs.
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            results_per_result_chunk: DEFAULT_RESULTS_PER_RESULT_CHUNK,
            max_result_chunks: DEFAULT_MAX_RESULT_CHUNKS,
            data_dir: default_data_dir(),
        }
    }
}

impl StoreConfig {
    /// Defaults overridden by `CODENAV_DATA_DIR`, `CODENAV_RESULTS_PER_CHUNK` and
    /// `CODENAV_MAX_RESULT_CHUNKS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var("CODENAV_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(n) = env_number("CODENAV_RESULTS_PER_CHUNK") {
            config.results_per_result_chunk = n;
        }
        if let Some(n) = env_number("CODENAV_MAX_RESULT_CHUNKS") {
            config.max_result_chunks = n;
        }
        config
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(SNAPSHOT_FILE)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

fn default_data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(DEFAULT_DATA_DIR)
}

fn env_number<T: FromStr + PartialOrd + Default>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<T>() {
        Ok(n) if n > T::default() => Some(n),
        _ => {
            tracing::warn!("Ignoring {}={:?}: expected a positive integer", name, raw);
            None
        }
    }
}
