// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Renderer-facing visual parameters.
//!
//! Combines the tempo with the advanced settings into animation periods and
//! output levels. Nothing here is fed back into scheduling; in particular the
//! CO2 plume length is independent of the half-beat auto-off timer.

use std::time::Duration;

use serde::Serialize;

use crate::config::AdvancedSettings;
use crate::fixture::{BlinderState, Color, LaserState};
use crate::timing::Tempo;

/// Stagger between neighbouring LED bars in a chase
pub const LED_CHASE_STAGGER: Duration = Duration::from_millis(125);

/// Visual timings and levels for one tempo/settings combination
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualCues {
    /// One full moving-head rotation
    pub head_rotation_period: Duration,
    /// One laser pattern cycle
    pub laser_cycle: Duration,
    /// One LED chase cycle
    pub led_chase_period: Duration,
    /// Strobe flashes per second
    pub strobe_rate_hz: u32,
    /// Visible length of a CO2 plume
    pub co2_plume: Duration,
    blinder_scale: f64,
    laser_colors: Vec<Color>,
}

impl VisualCues {
    /// Derive cues for `tempo` under `settings`
    pub fn derive(tempo: Tempo, settings: &AdvancedSettings) -> Self {
        let beat = tempo.beat_duration_ms();
        Self {
            head_rotation_period: millis(beat * 4.0 / settings.head_spin_rate),
            laser_cycle: millis(beat * 2.0),
            led_chase_period: millis(beat * 4.0),
            strobe_rate_hz: settings.strobe_frequency,
            co2_plume: secs(settings.co2_burst_duration),
            blinder_scale: f64::from(settings.blinder_intensity) / 100.0,
            laser_colors: settings.laser_colors.clone(),
        }
    }

    /// Chase start offset for LED bar `index`
    pub fn led_chase_offset(&self, index: usize) -> Duration {
        LED_CHASE_STAGGER * index as u32
    }

    /// Output level (0.0-1.0) of a blinder after the global scale
    pub fn blinder_level(&self, blinder: &BlinderState) -> f64 {
        if !blinder.active {
            return 0.0;
        }
        f64::from(blinder.intensity) / 100.0 * self.blinder_scale
    }

    /// Beam color for laser `index`: the configured palette overrides the
    /// color set by the scene
    pub fn laser_color(&self, index: usize, laser: &LaserState) -> Color {
        if self.laser_colors.is_empty() {
            return laser.color;
        }
        self.laser_colors[index % self.laser_colors.len()]
    }
}

fn millis(ms: f64) -> Duration {
    secs(ms / 1000.0)
}

/// Saturates at `Duration::MAX` for periods too long to represent
fn secs(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}
