use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_dirs::AppDirs;
use crate::controller::{validate_threshold, ControllerConfig, DEFAULT_INTERSECTION_THRESHOLD};
use crate::error::{Error, Result};
use crate::pause::PauseConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub intersection_threshold: f64,
    pub initial_pause_state: bool,
    pub auto_resume_idle_ms: u64,
    pub track_interactions: bool,
    pub frame_interval_ms: u64,
    pub autoplay_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            intersection_threshold: DEFAULT_INTERSECTION_THRESHOLD,
            initial_pause_state: false,
            auto_resume_idle_ms: 45_000,
            track_interactions: true,
            frame_interval_ms: 16,
            autoplay_interval_ms: 4_000,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.intersection_threshold)?;
        if self.frame_interval_ms == 0 {
            return Err(Error::invalid("frame_interval_ms must be positive"));
        }
        if self.autoplay_interval_ms == 0 {
            return Err(Error::invalid("autoplay_interval_ms must be positive"));
        }
        Ok(())
    }

    pub fn controller(&self, item_count: usize) -> ControllerConfig {
        ControllerConfig::new(item_count).with_threshold(self.intersection_threshold)
    }

    pub fn pause(&self) -> PauseConfig {
        PauseConfig {
            initial_pause_state: self.initial_pause_state,
            idle_timeout: Duration::from_millis(self.auto_resume_idle_ms),
            track_interactions: self.track_interactions,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn autoplay_interval(&self) -> Duration {
        Duration::from_millis(self.autoplay_interval_ms)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("cardstack_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(err) => {
                    tracing::warn!(path = %self.path.display(), %err, "ignoring unreadable config")
                }
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            intersection_threshold: 0.25,
            initial_pause_state: true,
            auto_resume_idle_ms: 1_000,
            track_interactions: false,
            frame_interval_ms: 33,
            autoplay_interval_ms: 2_500,
        };
        store.save(&cfg).unwrap();
        assert_eq!(store.load(), cfg);
    }

    #[test]
    fn missing_or_garbled_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        assert_eq!(store.load(), Config::default());

        fs::write(&path, b"{ not json").unwrap();
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{ "auto_resume_idle_ms": 5000 }"#).unwrap();
        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.auto_resume_idle_ms, 5000);
        assert_eq!(cfg.intersection_threshold, 0.1);
        assert!(cfg.track_interactions);
    }

    #[test]
    fn projections_carry_the_options_through() {
        let cfg = Config {
            intersection_threshold: 0.3,
            auto_resume_idle_ms: 1200,
            initial_pause_state: true,
            ..Config::default()
        };
        let ctl = cfg.controller(4);
        assert_eq!(ctl.item_count, 4);
        assert_eq!(ctl.intersection_threshold, 0.3);

        let pause = cfg.pause();
        assert_eq!(pause.idle_timeout, Duration::from_millis(1200));
        assert!(pause.initial_pause_state);
        assert!(pause.track_interactions);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let bad_threshold = Config {
            intersection_threshold: 2.0,
            ..Config::default()
        };
        assert_matches!(bad_threshold.validate(), Err(Error::InvalidConfiguration(_)));

        let bad_frame = Config {
            frame_interval_ms: 0,
            ..Config::default()
        };
        assert_matches!(bad_frame.validate(), Err(Error::InvalidConfiguration(_)));

        assert!(Config::default().validate().is_ok());
    }
}
