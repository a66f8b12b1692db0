mod query;
mod stats;
mod view;

use clap::{Args, Parser, Subcommand};
use codenav_api::{MonikerKey, Position, ResultKind, UploadId};
use codenav_core::{InMemoryMetrics, StoreConfig, StoreHandle};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "codenav",
    version,
    about = "Query a precise code-intelligence index snapshot",
    long_about = "Codenav answers navigation queries (monikers, definitions, references, hovers, \
                  diagnostics) against the uploads stored in an index snapshot."
)]
pub struct Cli {
    /// Snapshot file to query. Defaults to $CODENAV_DATA_DIR/index.snapshot
    #[arg(long, global = true, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// `--snapshot` when given, otherwise the configured default.
    pub fn snapshot_path(&self, config: &StoreConfig) -> PathBuf {
        self.snapshot
            .clone()
            .unwrap_or_else(|| config.snapshot_path())
    }
}

/// A position inside one document of one upload.
#[derive(Args, Debug, Clone)]
pub struct DocumentPosition {
    /// Upload to query
    #[arg(long)]
    pub upload: i64,
    /// Document path, relative to the upload root
    #[arg(long)]
    pub path: String,
    /// Zero-based line
    #[arg(long)]
    pub line: u32,
    /// Zero-based character
    #[arg(long)]
    pub character: u32,
}

impl DocumentPosition {
    pub fn upload_id(&self) -> UploadId {
        UploadId(self.upload)
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.character)
    }
}

#[derive(Args, Debug, Clone, Copy)]
pub struct PageArgs {
    #[arg(long, default_value_t = 100)]
    pub limit: i64,
    #[arg(long, default_value_t = 0)]
    pub offset: i64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the uploads and record counts of the snapshot
    Stats,
    /// Monikers of every range at a position, outermost first
    Monikers {
        #[command(flatten)]
        at: DocumentPosition,
    },
    /// Definitions, references, or implementations of the symbol at a position
    Locations {
        /// definitions, references, or implementations
        #[arg(long, default_value = "definitions")]
        kind: ResultKind,
        #[command(flatten)]
        at: DocumentPosition,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Locations of monikers across uploads
    Bulk {
        /// definitions, references, or implementations
        #[arg(long, default_value = "references")]
        kind: ResultKind,
        /// Upload to search (repeatable)
        #[arg(long = "upload", required = true)]
        uploads: Vec<i64>,
        /// Moniker as scheme:identifier (repeatable)
        #[arg(long = "moniker", required = true)]
        monikers: Vec<MonikerKey>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Hover text of the innermost range at a position
    Hover {
        #[command(flatten)]
        at: DocumentPosition,
    },
    /// Diagnostics of the documents under a path prefix
    Diagnostics {
        #[arg(long)]
        upload: i64,
        /// Path prefix; empty matches every document
        #[arg(long, default_value = "")]
        prefix: String,
        #[command(flatten)]
        page: PageArgs,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = StoreConfig::from_env();
    let _guard = codenav_core::logging::init_logging(&config.log_dir(), "cli", false);

    let snapshot = cli.snapshot_path(&config);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let metrics = Arc::new(InMemoryMetrics::new());
        let handle = StoreHandle::open(&snapshot, metrics).await?;
        let out = execute(&handle, cli.command, cli.json).await?;
        println!("{out}");
        Ok(())
    })
}

/// Run one command and return what it would print.
pub async fn execute(
    handle: &StoreHandle,
    command: Commands,
    json: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    let out = match command {
        Commands::Stats => stats::run(handle, json).await?,
        Commands::Monikers { at } => query::monikers(handle, &at, json).await?,
        Commands::Locations { kind, at, page } => {
            query::locations(handle, kind, &at, page, json).await?
        }
        Commands::Bulk {
            kind,
            uploads,
            monikers,
            page,
        } => {
            let uploads: Vec<UploadId> = uploads.into_iter().map(UploadId).collect();
            query::bulk(handle, kind, &uploads, &monikers, page, json).await?
        }
        Commands::Hover { at } => query::hover(handle, &at, json).await?,
        Commands::Diagnostics {
            upload,
            prefix,
            page,
        } => query::diagnostics(handle, UploadId(upload), &prefix, page, json).await?,
    };
    Ok(out)
}
