use directories::ProjectDirs;
use std::path::PathBuf;

pub const LOG_FILE_NAME: &str = "qcoin.log";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("qcoin");
            Some(state_dir.join(LOG_FILE_NAME))
        } else {
            ProjectDirs::from("", "", "qcoin")
                .map(|proj_dirs| proj_dirs.data_local_dir().join(LOG_FILE_NAME))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path_names_the_log_file() {
        if let Some(path) = AppDirs::log_path() {
            assert_eq!(path.file_name().unwrap(), LOG_FILE_NAME);
            assert!(path.parent().unwrap().ends_with("qcoin"));
        }
    }
}
