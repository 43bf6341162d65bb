// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scene system.
//!
//! A scene is a fixed-length, looping list of beat-timed fixture events.
//! The library is built once, validated eagerly, and read-only afterwards.

pub mod builtin;
pub mod file;

pub use file::{EventConfig, SceneConfig, SceneFile};

use std::sync::Arc;

use crate::error::{LightError, Result};
use crate::fixture::{FixtureClass, FixturePatch};

/// A fixture patch that fires on a beat
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEvent {
    /// Beat (from scene start) on which the event is current
    pub trigger_beat: f64,
    /// Partial state to merge into the target class
    pub patch: FixturePatch,
}

impl TimelineEvent {
    /// Create an event
    pub fn new(trigger_beat: f64, patch: FixturePatch) -> Self {
        Self {
            trigger_beat,
            patch,
        }
    }

    /// Fixture class the patch is addressed to
    pub fn target_class(&self) -> FixtureClass {
        self.patch.class()
    }

    /// Whole beat the event occupies
    pub fn beat_index(&self) -> i64 {
        self.trigger_beat.floor() as i64
    }
}

/// A named, looping choreography
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    name: String,
    description: String,
    duration_beats: f64,
    events: Vec<TimelineEvent>,
}

impl Scene {
    /// Create a scene, rejecting non-positive durations and bad trigger beats
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        duration_beats: f64,
        events: Vec<TimelineEvent>,
    ) -> Result<Self> {
        let name = name.into();
        if !(duration_beats.is_finite() && duration_beats > 0.0) {
            return Err(LightError::InvalidDuration {
                scene: name,
                duration: duration_beats,
            });
        }
        if let Some(event) = events
            .iter()
            .find(|e| !(e.trigger_beat.is_finite() && e.trigger_beat >= 0.0))
        {
            return Err(LightError::InvalidTriggerBeat {
                scene: name,
                beat: event.trigger_beat,
            });
        }
        for event in &events {
            event.patch.validate()?;
        }

        Ok(Self {
            name,
            description: description.into(),
            duration_beats,
            events,
        })
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human readable description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Loop length in beats
    pub fn duration_beats(&self) -> f64 {
        self.duration_beats
    }

    /// Events in authoring order
    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    /// Events whose whole beat equals `floor(position)`, in list order
    pub fn events_at(&self, position: f64) -> impl Iterator<Item = &TimelineEvent> {
        let beat = position.floor() as i64;
        self.events.iter().filter(move |e| e.beat_index() == beat)
    }
}

/// Catalog of scenes keyed by identifier
#[derive(Debug, Clone)]
pub struct SceneLibrary {
    scenes: Vec<(String, Arc<Scene>)>,
}

impl SceneLibrary {
    /// Build a library, preserving the given order
    pub fn new(scenes: impl IntoIterator<Item = (String, Scene)>) -> Result<Self> {
        let mut library = Self { scenes: Vec::new() };
        for (id, scene) in scenes {
            if library.contains(&id) {
                return Err(LightError::DuplicateScene(id));
            }
            library.scenes.push((id, Arc::new(scene)));
        }
        Ok(library)
    }

    /// Look up a scene
    pub fn get(&self, id: &str) -> Result<Arc<Scene>> {
        self.scenes
            .iter()
            .find(|(scene_id, _)| scene_id == id)
            .map(|(_, scene)| Arc::clone(scene))
            .ok_or_else(|| LightError::UnknownScene(id.to_string()))
    }

    /// Check whether an identifier is known
    pub fn contains(&self, id: &str) -> bool {
        self.scenes.iter().any(|(scene_id, _)| scene_id == id)
    }

    /// Scene identifiers in library order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.scenes.iter().map(|(id, _)| id.as_str())
    }

    /// Number of scenes
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Check if the library is empty
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

impl Default for SceneLibrary {
    fn default() -> Self {
        builtin::library()
    }
}
