use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use complex_logistic_core::{KernelParams, NavigatorConfig, RasterSize};
use complex_logistic_render::{Palette, SchedulerConfig};

/// Everything the explorer needs at startup. Every section is optional in
/// the JSON file and falls back to its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct ExplorerConfig {
    /// Output raster, fixed for the session (1200×800 by default).
    #[serde(default)]
    pub raster: RasterSize,
    #[serde(default)]
    pub kernel: KernelParams,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub navigator: NavigatorConfig,
    #[serde(default)]
    pub palette: Palette,
}

impl ExplorerConfig {
    /// Load the config next to the executable, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&crate::app_dir::config_path())
    }

    /// Load the config at `path`, falling back to defaults on any failure.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!("No config file at {}", path.display());
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    error!("Failed to parse config {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                error!("Failed to read config {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// A small, fast setup for tests that drive the whole explorer.
#[cfg(test)]
pub(crate) fn small_config() -> ExplorerConfig {
    ExplorerConfig {
        raster: RasterSize::new(48, 32).unwrap(),
        kernel: KernelParams::new(64, 64).unwrap(),
        scheduler: SchedulerConfig {
            chunk_size: 64,
            worker_threads: 2,
        },
        ..ExplorerConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use complex_logistic_core::{AspectLock, Region};

    #[test]
    fn empty_object_is_default() {
        let config = ExplorerConfig::from_json("{}").unwrap();
        assert_eq!(config, ExplorerConfig::default());
        assert_eq!(config.raster, RasterSize::new(1200, 800).unwrap());
        assert_eq!(config.scheduler.chunk_size, 200);
        assert_eq!(config.kernel.scalar_iterations, 512);
        assert_eq!(config.navigator.default_region, Region::default_logistic());
        assert_eq!(config.navigator.aspect_lock, AspectLock::Fixed(2.0 / 3.0));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let json = r#"{
            "raster": { "width": 300, "height": 200 },
            "scheduler": { "worker_threads": 2 },
            "kernel": { "batch_iterations": 100 }
        }"#;
        let config = ExplorerConfig::from_json(json).unwrap();
        assert_eq!(config.raster, RasterSize::new(300, 200).unwrap());
        assert_eq!(config.scheduler.worker_threads, 2);
        assert_eq!(config.scheduler.chunk_size, 200);
        assert_eq!(config.kernel.batch_iterations, 100);
        assert_eq!(config.kernel.scalar_iterations, 512);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(ExplorerConfig::from_json(r#"{"raster":{"width":0,"height":10}}"#).is_err());
        assert!(ExplorerConfig::from_json(r#"{"kernel":{"scalar_iterations":0}}"#).is_err());
        assert!(ExplorerConfig::from_json(
            r#"{"navigator":{"default_region":{"lower_left":{"re":1,"im":1},"upper_right":{"re":0,"im":2}}}}"#
        )
        .is_err());
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let path = std::env::temp_dir().join("complex-logistic-does-not-exist.json");
        assert_eq!(ExplorerConfig::load_from(&path), ExplorerConfig::default());
    }

    #[test]
    fn unparsable_file_falls_back_to_default() {
        let path = std::env::temp_dir().join(format!(
            "complex-logistic-bad-{}.json",
            std::process::id()
        ));
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(ExplorerConfig::load_from(&path), ExplorerConfig::default());
        let _ = fs::remove_file(&path);
    }
}
