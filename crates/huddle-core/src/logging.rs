// Tracing setup shared by the `huddle` and `huddle-server` binaries.
//
// The terminal client owns the terminal, so it logs to a file under
// `logs/`. The server logs to stdout. Both honor `RUST_LOG` and fall back
// to `DEFAULT_FILTER`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

/// Info for our own crates, warnings for everything else.
pub const DEFAULT_FILTER: &str = "huddle=info,warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Where `init_file` writes `file_name` when started from `base_dir`.
pub fn log_path(base_dir: &Path, file_name: &str) -> PathBuf {
    base_dir.join("logs").join(file_name)
}

/// Log to `logs/<file_name>` under the current directory, truncating any
/// previous run. Returns the path written to.
pub fn init_file(file_name: &str) -> anyhow::Result<PathBuf> {
    let path = log_path(&std::env::current_dir()?, file_name);
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    }
    let log_file = std::fs::File::create(&path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter())
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(path)
}

/// Log to stdout.
pub fn init_stdout() -> anyhow::Result<()> {
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter())
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
