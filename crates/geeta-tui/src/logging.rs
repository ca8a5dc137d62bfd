use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Where the reader writes its log while the alternate screen is up.
pub fn log_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("GEETA_LOG_FILE") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("geeta").join("geeta.log"))
}

/// Log to a file for the interactive reader. `RUST_LOG` overrides the
/// default `info` level.
pub fn init_file() -> Result<()> {
    let Some(log_path) = log_path() else {
        return init_stderr();
    };
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let log_file = File::create(&log_path)
        .with_context(|| format!("Failed to create log file at {}", log_path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .format_timestamp_secs()
        .try_init()?;
    Ok(())
}

/// One-shot commands only report warnings and errors, on stderr.
pub fn init_stderr() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .try_init()?;
    Ok(())
}
