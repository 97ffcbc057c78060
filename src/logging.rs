use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::app_dirs::AppDirs;

/// Filter variable checked before `RUST_LOG`
pub const LOG_FILTER_ENV: &str = "QCOIN_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Where log lines go for a given run mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// the TUI owns the terminal, so interactive runs log to a file
    File(PathBuf),
    Disabled,
}

impl LogTarget {
    pub fn for_mode(interactive: bool) -> Self {
        if !interactive {
            return Self::Stderr;
        }
        match AppDirs::log_path() {
            Some(path) => Self::File(path),
            None => Self::Disabled,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber. A log file that cannot be opened disables
/// logging instead of failing the run.
pub fn init(interactive: bool) -> LogTarget {
    let target = LogTarget::for_mode(interactive);
    let installed = match &target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(io::stderr)
                .try_init();
            true
        }
        LogTarget::File(path) => match open_log_file(path) {
            Ok(file) => {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(env_filter())
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init();
                true
            }
            Err(_) => false,
        },
        LogTarget::Disabled => true,
    };

    if installed {
        target
    } else {
        LogTarget::Disabled
    }
}
