// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for the lighting engine.
//!
//! Every variant is a configuration error: it is raised at the API boundary
//! before any state is touched, so a rejected call leaves the engine exactly
//! as it was.

use thiserror::Error;

use crate::fixture::FixtureClass;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, LightError>;

/// Configuration errors reported by the engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LightError {
    /// Scene identifier not present in the library
    #[error("unknown scene: {0}")]
    UnknownScene(String),

    /// Two scenes registered under the same identifier
    #[error("duplicate scene id: {0}")]
    DuplicateScene(String),

    /// Fixture class name not recognised
    #[error("unknown fixture class: {0}")]
    UnknownFixtureClass(String),

    /// Tempo must be a finite, positive BPM value
    #[error("invalid tempo {0} BPM: tempo must be greater than zero")]
    InvalidTempo(f64),

    /// Scene duration must be positive
    #[error("scene '{scene}' has invalid duration {duration} (must be > 0)")]
    InvalidDuration { scene: String, duration: f64 },

    /// Event trigger beat must be finite and non-negative
    #[error("scene '{scene}' has event with invalid trigger beat {beat}")]
    InvalidTriggerBeat { scene: String, beat: f64 },

    /// Event parameters did not match the target fixture class
    #[error("invalid {class} patch: {reason}")]
    InvalidPatch { class: FixtureClass, reason: String },

    /// Color string is not `#rrggbb`
    #[error("invalid color '{0}': expected #rrggbb")]
    InvalidColor(String),

    /// Advanced setting out of range
    #[error("invalid setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    /// Every fixture class needs at least one instance
    #[error("fixture class {class} must have at least one instance")]
    InvalidFixtureCount { class: FixtureClass },

    /// Seek target outside the current scene
    #[error("cannot seek to beat {beat}: scene is {duration} beats long")]
    InvalidSeek { beat: f64, duration: f64 },

    /// Malformed document
    #[error("parse error: {0}")]
    Parse(String),
}

impl LightError {
    /// Shorthand for an invalid patch error
    pub fn patch(class: FixtureClass, reason: impl Into<String>) -> Self {
        Self::InvalidPatch {
            class,
            reason: reason.into(),
        }
    }

    /// Shorthand for an out-of-range setting
    pub fn setting(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            name,
            reason: reason.into(),
        }
    }
}
