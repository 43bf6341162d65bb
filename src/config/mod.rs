// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system.
//!
//! This module provides:
//! - The engine configuration (TOML): tempo, start scene, fixture counts
//! - Advanced settings (YAML): visual multipliers edited by the settings panel
//! - A file watcher that hot-reloads advanced settings

pub mod watcher;

pub use watcher::{SettingsEvent, SettingsWatcher};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::LightError;
use crate::fixture::{Color, FixtureCounts};
use crate::scene::SceneLibrary;
use crate::sequencer::TimelineScheduler;
use crate::timing::Tempo;

/// Highest animation tick rate the driver accepts
pub const MAX_FRAME_RATE_HZ: u32 = 1000;

/// Engine configuration file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Starting tempo in BPM
    pub tempo: f64,
    /// Starting scene id
    pub scene: String,
    /// Animation ticks per second
    pub frame_rate_hz: u32,
    /// Instances per fixture class
    pub fixtures: FixtureCounts,
    /// YAML scene library replacing the stock scenes
    pub scenes_file: Option<PathBuf>,
    /// YAML advanced settings file, watched for changes
    pub settings_file: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tempo: 150.0,
            scene: "intro".to_string(),
            frame_rate_hz: 60,
            fixtures: FixtureCounts::default(),
            scenes_file: None,
            settings_file: None,
        }
    }
}

impl EngineConfig {
    /// Load from a TOML file. Relative scene/settings paths resolve
    /// against the config file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let mut config = Self::from_toml(&contents)?;

        if let Some(base) = path.parent() {
            for file in [&mut config.scenes_file, &mut config.settings_file]
                .into_iter()
                .flatten()
            {
                if file.is_relative() {
                    *file = base.join(&*file);
                }
            }
        }
        Ok(config)
    }

    /// Parse from a TOML string
    pub fn from_toml(toml: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> std::result::Result<(), LightError> {
        Tempo::new(self.tempo)?;
        self.fixtures.validate()?;
        if !(1..=MAX_FRAME_RATE_HZ).contains(&self.frame_rate_hz) {
            return Err(LightError::setting(
                "frame_rate_hz",
                format!("must be within 1..={}", MAX_FRAME_RATE_HZ),
            ));
        }
        Ok(())
    }

    /// Scene library: the configured file, or the stock scenes
    pub fn scene_library(&self) -> Result<SceneLibrary> {
        match &self.scenes_file {
            Some(path) => SceneLibrary::load(path),
            None => Ok(SceneLibrary::default()),
        }
    }

    /// Advanced settings: the configured file, or the defaults
    pub fn advanced_settings(&self) -> Result<AdvancedSettings> {
        match &self.settings_file {
            Some(path) => AdvancedSettings::load(path),
            None => Ok(AdvancedSettings::default()),
        }
    }

    /// Build a stopped scheduler from this configuration
    pub fn build_scheduler(&self) -> Result<TimelineScheduler> {
        let library = Arc::new(self.scene_library()?);
        let tempo = Tempo::new(self.tempo)?;
        let scheduler = TimelineScheduler::new(library, self.fixtures, &self.scene, tempo)?;
        Ok(scheduler)
    }
}

/// Visual tuning parameters from the settings panel.
///
/// These scale how fixtures look; none of them affect scheduling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvancedSettings {
    /// Moving head rotation speed multiplier
    pub head_spin_rate: f64,
    /// Strobe flash rate in Hz
    pub strobe_frequency: u32,
    /// Blinder output scale in percent (0-100)
    pub blinder_intensity: u8,
    /// Colors assigned to lasers in order
    pub laser_colors: Vec<Color>,
    /// Length of the CO2 plume effect in seconds
    pub co2_burst_duration: f64,
}

impl Default for AdvancedSettings {
    fn default() -> Self {
        Self {
            head_spin_rate: 1.0,
            strobe_frequency: 10,
            blinder_intensity: 80,
            laser_colors: vec![Color::rgb(0xff, 0x00, 0x00), Color::rgb(0x00, 0xff, 0x00)],
            co2_burst_duration: 0.5,
        }
    }
}

impl AdvancedSettings {
    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read settings file: {:?}", path.as_ref()))?;
        Self::from_yaml(&contents)
    }

    /// Parse from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: Self =
            serde_yaml::from_str(yaml).context("Failed to parse settings YAML")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize settings to YAML")
    }

    /// Range checks
    pub fn validate(&self) -> std::result::Result<(), LightError> {
        if !(self.head_spin_rate.is_finite() && self.head_spin_rate > 0.0) {
            return Err(LightError::setting("headSpinRate", "must be greater than zero"));
        }
        if self.strobe_frequency == 0 {
            return Err(LightError::setting("strobeFrequency", "must be greater than zero"));
        }
        if self.blinder_intensity > 100 {
            return Err(LightError::setting("blinderIntensity", "must be within 0..=100"));
        }
        if self.laser_colors.is_empty() {
            return Err(LightError::setting("laserColors", "needs at least one color"));
        }
        if !(self.co2_burst_duration.is_finite() && self.co2_burst_duration > 0.0) {
            return Err(LightError::setting("co2BurstDuration", "must be greater than zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_engine_config() {
        let toml = r#"
tempo = 140
scene = "drop"
frame_rate_hz = 120

[fixtures]
co2_jets = 3
"#;
        let config = EngineConfig::from_toml(toml).unwrap();
        assert_eq!(config.tempo, 140.0);
        assert_eq!(config.scene, "drop");
        assert_eq!(config.frame_rate_hz, 120);
        assert_eq!(config.fixtures.co2_jets, 3);
        // Unspecified counts keep their defaults
        assert_eq!(config.fixtures.led_bars, 8);
    }

    #[test]
    fn test_engine_config_defaults() {
        let config = EngineConfig::from_toml("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.tempo, 150.0);
        assert_eq!(config.scene, "intro");
    }

    #[test]
    fn test_engine_config_rejects_bad_values() {
        assert!(EngineConfig::from_toml("tempo = 0").is_err());
        assert!(EngineConfig::from_toml("tempo = -120").is_err());
        assert!(EngineConfig::from_toml("frame_rate_hz = 0").is_err());
        assert!(EngineConfig::from_toml("frame_rate_hz = 1000").is_ok());
        // A period this short rounds to zero
        assert!(EngineConfig::from_toml("frame_rate_hz = 4000000000").is_err());
        assert!(EngineConfig::from_toml("[fixtures]\nlasers = 0").is_err());
    }

    #[test]
    fn test_engine_config_toml_round_trip() {
        let config = EngineConfig {
            tempo: 175.0,
            scene: "breakdown".to_string(),
            ..Default::default()
        };
        let parsed = EngineConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_build_scheduler() {
        let config = EngineConfig {
            scene: "kickRolls".to_string(),
            tempo: 128.0,
            ..Default::default()
        };
        let scheduler = config.build_scheduler().unwrap();
        assert_eq!(scheduler.scene_id(), "kickRolls");
        assert_eq!(scheduler.tempo().bpm(), 128.0);

        let config = EngineConfig {
            scene: "outro".to_string(),
            ..Default::default()
        };
        assert!(config.build_scheduler().is_err());
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("scenes.yaml"),
            "scenes:\n  solo:\n    name: Solo\n    duration: 4\n",
        )
        .unwrap();
        let config_path = dir.path().join("lightseq.toml");
        fs::write(&config_path, "scene = \"solo\"\nscenes_file = \"scenes.yaml\"\n").unwrap();

        let config = EngineConfig::load(&config_path).unwrap();
        assert_eq!(config.scenes_file, Some(dir.path().join("scenes.yaml")));

        let scheduler = config.build_scheduler().unwrap();
        assert_eq!(scheduler.scene().name(), "Solo");
    }

    #[test]
    fn test_parse_advanced_settings() {
        let yaml = r##"
headSpinRate: 1.5
strobeFrequency: 12
blinderIntensity: 60
laserColors: ["#ff0000", "#0000ff", "#ffffff"]
co2BurstDuration: 0.8
"##;
        let settings = AdvancedSettings::from_yaml(yaml).unwrap();
        assert_eq!(settings.head_spin_rate, 1.5);
        assert_eq!(settings.strobe_frequency, 12);
        assert_eq!(settings.blinder_intensity, 60);
        assert_eq!(settings.laser_colors.len(), 3);
        assert_eq!(settings.laser_colors[1], Color::rgb(0, 0, 0xff));
        assert_eq!(settings.co2_burst_duration, 0.8);
    }

    #[test]
    fn test_advanced_settings_defaults() {
        let settings = AdvancedSettings::from_yaml("{}").unwrap();
        assert_eq!(settings, AdvancedSettings::default());
        assert_eq!(settings.blinder_intensity, 80);
    }

    #[test]
    fn test_advanced_settings_validation() {
        assert!(AdvancedSettings::from_yaml("headSpinRate: 0").is_err());
        assert!(AdvancedSettings::from_yaml("strobeFrequency: 0").is_err());
        assert!(AdvancedSettings::from_yaml("blinderIntensity: 101").is_err());
        assert!(AdvancedSettings::from_yaml("laserColors: []").is_err());
        assert!(AdvancedSettings::from_yaml("laserColors: ['green']").is_err());
        assert!(AdvancedSettings::from_yaml("co2BurstDuration: -1").is_err());
    }

    #[test]
    fn test_advanced_settings_round_trip() {
        let settings = AdvancedSettings {
            head_spin_rate: 0.5,
            ..Default::default()
        };
        let parsed = AdvancedSettings::from_yaml(&settings.to_yaml().unwrap()).unwrap();
        assert_eq!(parsed, settings);
    }
}
