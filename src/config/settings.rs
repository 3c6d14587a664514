//! Configuration settings for the simulator

use crate::game_of_life::rules::{Rules, MAX_NEIGHBORS};
use crate::simulation::{SimulationConfig, Speed};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub grid: GridConfig,
    pub rules: Rules,
    pub speed: Speed,
    pub display: DisplayConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
}

/// Display metadata persisted with saved grids. The simulator never reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub cell_width: f32,
    pub cell_height: f32,
    pub line_width: f32,
    pub color_map: BTreeMap<u32, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let mut color_map = BTreeMap::new();
        color_map.insert(0, "#000000".to_string());
        color_map.insert(1, "#00ff00".to_string());

        Self {
            cell_width: 16.0,
            cell_height: 16.0,
            line_width: 2.0,
            color_map,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid: GridConfig {
                width: 64,
                height: 48,
            },
            rules: Rules::default(),
            speed: Speed::default(),
            display: DisplayConfig::default(),
            output: OutputConfig {
                directory: PathBuf::from("output/saves"),
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.grid.width == 0 || self.grid.height == 0 {
            anyhow::bail!(
                "Grid dimensions must be positive, got {}x{}",
                self.grid.width,
                self.grid.height
            );
        }

        if self.rules.starvation_threshold > self.rules.overpopulation_threshold {
            anyhow::bail!(
                "Starvation threshold {} exceeds overpopulation threshold {}",
                self.rules.starvation_threshold,
                self.rules.overpopulation_threshold
            );
        }

        if self.rules.overpopulation_threshold > MAX_NEIGHBORS {
            anyhow::bail!(
                "Overpopulation threshold {} exceeds the {} available neighbours",
                self.rules.overpopulation_threshold,
                MAX_NEIGHBORS
            );
        }

        if !self.speed.speed_divider.is_finite() || self.speed.speed_divider < 1.0 {
            anyhow::bail!(
                "Speed divider must be a finite number >= 1, got {}",
                self.speed.speed_divider
            );
        }

        Ok(())
    }

    /// Engine configuration derived from these settings
    pub fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig {
            rules: self.rules,
            speed: self.speed,
        }
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(width) = cli_overrides.width {
            self.grid.width = width;
        }
        if let Some(height) = cli_overrides.height {
            self.grid.height = height;
        }
        if let Some(delay_ms) = cli_overrides.delay_ms {
            self.speed.delay_ms = delay_ms;
        }
        if let Some(speed) = cli_overrides.speed {
            self.speed = speed.apply_to(self.speed);
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.directory = output_dir.clone();
        }
    }

    /// Where a save named on the command line lands
    ///
    /// Relative paths are placed under `output.directory`; absolute paths are kept.
    pub fn resolve_output_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.output.directory.join(path)
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub delay_ms: Option<u64>,
    pub speed: Option<crate::controls::SpeedSlider>,
    pub output_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::SpeedSlider;
    use tempfile::tempdir;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.rules, Rules::new(3, 2));
        assert_eq!(settings.speed.delay_ms, 1000);
    }

    #[test]
    fn test_yaml_round_trip() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config/default.yaml");

        let mut settings = Settings::default();
        settings.grid.width = 12;
        settings.speed.full_speed = true;
        settings.to_file(&path).unwrap();

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_validation_failures() {
        let mut settings = Settings::default();
        settings.grid.height = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.rules = Rules::new(2, 3);
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.rules = Rules::new(9, 2);
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.speed.speed_divider = 0.5;
        assert!(settings.validate().is_err());

        settings.speed.speed_divider = f64::NAN;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_merge_with_cli() {
        let mut settings = Settings::default();
        let overrides = CliOverrides {
            width: Some(20),
            delay_ms: Some(250),
            speed: Some(SpeedSlider::new(10.0)),
            ..Default::default()
        };
        settings.merge_with_cli(&overrides);

        assert_eq!(settings.grid.width, 20);
        assert_eq!(settings.grid.height, 48);
        assert_eq!(settings.speed.delay_ms, 250);
        assert!(settings.speed.full_speed);
    }

    #[test]
    fn test_output_paths_resolve_under_output_directory() {
        let mut settings = Settings::default();
        assert_eq!(
            settings.resolve_output_path(Path::new("glider.json")),
            PathBuf::from("output/saves/glider.json")
        );

        settings.merge_with_cli(&CliOverrides {
            output_dir: Some(PathBuf::from("elsewhere")),
            ..Default::default()
        });
        assert_eq!(
            settings.resolve_output_path(Path::new("runs/a.json")),
            PathBuf::from("elsewhere/runs/a.json")
        );

        let absolute = std::env::temp_dir().join("b.json");
        assert_eq!(settings.resolve_output_path(&absolute), absolute);
    }
}
