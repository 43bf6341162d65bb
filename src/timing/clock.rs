// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Beat clock implementation.
//!
//! Converts elapsed wall-clock time into fractional beats at a given tempo.
//! The clock itself is stateless: the caller owns the beat position.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LightError, Result};

/// Milliseconds in one minute
pub const MS_PER_MINUTE: f64 = 60_000.0;

/// Tempo in beats per minute, guaranteed finite and positive
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Tempo(f64);

impl Tempo {
    /// Create a tempo, rejecting zero, negative and non-finite values
    pub fn new(bpm: f64) -> Result<Self> {
        if bpm.is_finite() && bpm > 0.0 {
            Ok(Self(bpm))
        } else {
            Err(LightError::InvalidTempo(bpm))
        }
    }

    /// Beats per minute
    pub fn bpm(&self) -> f64 {
        self.0
    }

    /// Length of one beat in milliseconds (`60000 / bpm`)
    pub fn beat_duration_ms(&self) -> f64 {
        MS_PER_MINUTE / self.0
    }

    /// Length of one beat as a `Duration`, saturating at `Duration::MAX`
    pub fn beat_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.beat_duration_ms() / 1000.0).unwrap_or(Duration::MAX)
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self(150.0)
    }
}

impl TryFrom<f64> for Tempo {
    type Error = LightError;

    fn try_from(bpm: f64) -> Result<Self> {
        Self::new(bpm)
    }
}

impl From<Tempo> for f64 {
    fn from(tempo: Tempo) -> Self {
        tempo.0
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} BPM", self.0)
    }
}

/// Wall-clock to beat converter
#[derive(Debug, Clone, Copy, Default)]
pub struct BeatClock;

impl BeatClock {
    /// Beats elapsed during `delta_wall_ms` at `bpm`.
    ///
    /// `delta_beats = delta_wall_ms / (60000 / bpm)`. A non-positive tempo
    /// is reported, never clamped.
    pub fn advance(delta_wall_ms: f64, bpm: f64) -> Result<f64> {
        let tempo = Tempo::new(bpm)?;
        Ok(Self::advance_at(delta_wall_ms, tempo))
    }

    /// Same as [`BeatClock::advance`] for an already validated tempo
    pub fn advance_at(delta_wall_ms: f64, tempo: Tempo) -> f64 {
        delta_wall_ms / tempo.beat_duration_ms()
    }

    /// Beats elapsed during `elapsed`
    pub fn advance_by(elapsed: Duration, tempo: Tempo) -> f64 {
        Self::advance_at(elapsed.as_secs_f64() * 1000.0, tempo)
    }
}
