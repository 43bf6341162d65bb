// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timing module.
//!
//! This module provides tempo handling and the wall-clock to beat
//! conversion used by the scheduler.

pub mod clock;

pub use clock::{BeatClock, Tempo, MS_PER_MINUTE};
