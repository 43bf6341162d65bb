// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Sequencer core for playing scenes against the fixture bank.
//!
//! This module provides:
//! - The timeline scheduler (beat advance, event detection, looping)
//! - Wall-clock revert timers for CO2 bursts

pub mod revert;
pub mod scheduler;

pub use revert::{PendingRevert, RevertQueue};
pub use scheduler::{TickReport, TimelineScheduler};

use serde::Serialize;

/// Scheduler playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PlaybackState {
    /// Position frozen, no events fire
    #[default]
    Stopped,
    /// Clock advancing, events firing
    Playing,
}
