// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! YAML scene files.
//!
//! ```yaml
//! scenes:
//!   intro:
//!     name: Intro
//!     description: Slow-moving heads
//!     duration: 16
//!     timeline:
//!       - { time: 0, action: movingHeads, params: { active: true, color: "#3366ff" } }
//! ```
//!
//! Everything is validated while loading: an unknown fixture class or a
//! param the class does not have fails the whole file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{Scene, SceneLibrary, TimelineEvent};
use crate::error::LightError;
use crate::fixture::{FixtureClass, FixturePatch};

/// Root of a scene file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneFile {
    /// Scene definitions keyed by id, in file order
    pub scenes: serde_yaml::Mapping,
}

/// One scene as written in a file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneConfig {
    /// Display name
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Loop length in beats
    pub duration: f64,
    /// Timed events
    #[serde(default)]
    pub timeline: Vec<EventConfig>,
}

/// One timeline event as written in a file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventConfig {
    /// Trigger beat
    pub time: f64,
    /// Fixture class name (e.g. `movingHeads`)
    pub action: String,
    /// Partial fixture state
    #[serde(default)]
    pub params: serde_yaml::Value,
}

impl EventConfig {
    /// Resolve the class and parse the params into a typed event
    pub fn to_event(&self) -> std::result::Result<TimelineEvent, LightError> {
        let class: FixtureClass = self.action.parse()?;
        let patch = FixturePatch::from_params(class, self.params.clone())?;
        Ok(TimelineEvent::new(self.time, patch))
    }
}

impl SceneConfig {
    /// Validate and build the scene
    pub fn to_scene(&self) -> std::result::Result<Scene, LightError> {
        let events = self
            .timeline
            .iter()
            .map(EventConfig::to_event)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Scene::new(&self.name, &self.description, self.duration, events)
    }
}

impl SceneFile {
    /// Parse from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse scene YAML")
    }

    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read scene file: {:?}", path.as_ref()))?;
        Self::from_yaml(&contents)
    }

    /// Validate every scene and build the library
    pub fn into_library(self) -> Result<SceneLibrary> {
        let mut scenes = Vec::with_capacity(self.scenes.len());
        for (key, value) in self.scenes {
            let id = match key {
                serde_yaml::Value::String(id) => id,
                other => {
                    let reason = format!("scene id must be a string, got {:?}", other);
                    return Err(LightError::Parse(reason).into());
                }
            };
            let config: SceneConfig = serde_yaml::from_value(value)
                .with_context(|| format!("Failed to parse scene '{}'", id))?;
            let scene = config
                .to_scene()
                .with_context(|| format!("Invalid scene '{}'", id))?;
            scenes.push((id, scene));
        }
        Ok(SceneLibrary::new(scenes)?)
    }
}

impl SceneLibrary {
    /// Parse and validate a library from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        SceneFile::from_yaml(yaml)?.into_library()
    }

    /// Load and validate a library from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        SceneFile::load(path)?.into_library()
    }
}
