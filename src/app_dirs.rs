use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "termfolio";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn preferences_path() -> PathBuf {
        match ProjectDirs::from("", "", APP_NAME) {
            Some(pd) => pd.config_dir().join("preferences.json"),
            None => PathBuf::from("termfolio_preferences.json"),
        }
    }

    /// Log file candidates, most preferred first
    pub fn log_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Ok(home) = std::env::var("HOME") {
            paths.push(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join(APP_NAME)
                    .join("termfolio.log"),
            );
        }
        if let Some(pd) = ProjectDirs::from("", "", APP_NAME) {
            paths.push(pd.data_local_dir().join("termfolio.log"));
        }
        paths.push(std::env::temp_dir().join("termfolio.log"));
        paths
    }
}
