use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("XDG_CONFIG_HOME") {
            Some(PathBuf::from(home).join("cardstack").join("config.json"))
        } else {
            ProjectDirs::from("", "", "cardstack")
                .map(|proj_dirs| proj_dirs.config_dir().join("config.json"))
        }
    }
}
