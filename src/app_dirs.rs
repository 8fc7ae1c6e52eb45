use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Directory for the saved session and the log file
    pub fn state_dir() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("spelldrill")
        } else if let Some(proj_dirs) = ProjectDirs::from("", "", "spelldrill") {
            proj_dirs.data_local_dir().to_path_buf()
        } else {
            PathBuf::from(".spelldrill")
        }
    }

    pub fn db_path() -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "spelldrill") {
            proj_dirs.data_dir().join("words.db")
        } else {
            Self::state_dir().join("words.db")
        }
    }
}
