use crate::error::{CanvasError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// File looked up in the working directory at startup.
pub const CONFIG_FILE: &str = "graph-canvas.json";

/// Tunables for the interactive view and the scene it shows.
///
/// Every field has a default, so a config file only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Multiplier applied per wheel notch.
    pub zoom_factor: f32,
    /// Upper bound for the zoom scale. Zooming out is unbounded.
    pub scale_max: f32,
    pub node_radius: f32,
    /// Distance in scene units within which a click hits an arc.
    pub hit_tolerance: f32,
    /// Interval between two steps of the traversal demo.
    pub demo_step_ms: u64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            zoom_factor: 1.1,
            scale_max: 8.0,
            node_radius: 14.0,
            hit_tolerance: 4.0,
            demo_step_ms: 400,
        }
    }
}

impl ViewConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| CanvasError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json).map_err(|source| CanvasError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Loads `path` if it exists, falling back to defaults on any error.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded view config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{}. Using default view config.", e);
                Self::default()
            }
        }
    }

    pub fn demo_interval(&self) -> Duration {
        Duration::from_millis(self.demo_step_ms)
    }

    // A factor at or below 1.0 would invert or freeze zooming.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.zoom_factor > 1.0) {
            self.zoom_factor = defaults.zoom_factor;
        }
        if !(self.scale_max > 0.0) {
            self.scale_max = defaults.scale_max;
        }
        self.node_radius = self.node_radius.max(1.0);
        self.hit_tolerance = self.hit_tolerance.max(0.0);
        self.demo_step_ms = self.demo_step_ms.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ViewConfig::from_json(r#"{ "scale_max": 3.5 }"#).unwrap();
        assert_eq!(config.scale_max, 3.5);
        assert_eq!(config.zoom_factor, 1.1);
        assert_eq!(config.demo_interval(), Duration::from_millis(400));
    }

    #[test]
    fn degenerate_zoom_factor_is_replaced() {
        let config =
            ViewConfig::from_json(r#"{ "zoom_factor": 0.5, "scale_max": -1.0 }"#).unwrap();
        assert_eq!(config.zoom_factor, 1.1);
        assert_eq!(config.scale_max, 8.0);
    }

    #[test]
    fn load_reads_file_and_reports_bad_json() {
        let mut good = tempfile::NamedTempFile::new().unwrap();
        write!(good, r#"{{ "node_radius": 20.0 }}"#).unwrap();
        let config = ViewConfig::load(good.path()).unwrap();
        assert_eq!(config.node_radius, 20.0);

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        write!(bad, "not json").unwrap();
        let err = ViewConfig::load(bad.path()).unwrap_err();
        assert!(matches!(err, CanvasError::Config { .. }));
        assert_eq!(ViewConfig::load_or_default(bad.path()), ViewConfig::default());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        assert!(matches!(
            ViewConfig::load(&path),
            Err(CanvasError::Io { .. })
        ));
        assert_eq!(ViewConfig::load_or_default(&path), ViewConfig::default());
    }
}
