use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::Result;

/// Installs the global subscriber: stderr always, plus `log_path` when it is non-empty.
pub fn init(log_path: &str) -> Result<()> {
    let log_file = open_log_file(log_path)?;
    build_subscriber(log_file).init();
    Ok(())
}

fn open_log_file(path: &str) -> Result<Option<File>> {
    if path.trim().is_empty() {
        return Ok(None);
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(Some(file))
}

fn build_subscriber(log_file: Option<File>) -> impl tracing::Subscriber + Send + Sync + 'static {
    // Info by default, override with RUST_LOG
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    let file_layer = log_file.map(|file| {
        fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
}
