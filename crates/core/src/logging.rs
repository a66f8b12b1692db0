use std::io::Write;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber: a daily-rolling file under `log_dir` named after
/// `component`, plus stderr when `to_stderr` is set. Keep the guard alive for the
/// lifetime of the process or buffered lines are lost.
pub fn init_logging(log_dir: &Path, component: &str, to_stderr: bool) -> WorkerGuard {
    // Files like cli.2024-01-21
    let file_appender: Box<dyn Write + Send> = match std::fs::create_dir_all(log_dir)
        .map_err(|e| e.to_string())
        .and_then(|()| {
            RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(component)
                .build(log_dir)
                .map_err(|e| e.to_string())
        }) {
        Ok(appender) => Box::new(appender),
        Err(e) => {
            eprintln!("Cannot log to {}: {e}", log_dir.display());
            Box::new(std::io::sink())
        }
    };
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    let installed = if to_stderr {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);
        registry.with(stderr_layer).try_init()
    } else {
        registry.try_init()
    };
    // A subscriber installed earlier keeps receiving events.
    if let Err(e) = installed {
        tracing::debug!("Logging already initialized: {}", e);
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unusable_log_dir_and_second_init_do_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, b"").unwrap();

        let _first = init_logging(&file.join("logs"), "codenav", false);
        let _second = init_logging(dir.path(), "codenav", false);
        assert!(!file.join("logs").exists());
    }
}
