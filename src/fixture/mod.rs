// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Fixture model.
//!
//! This module provides:
//! - Fixture classes and their deployment counts
//! - Per-class state records and partial-update patches
//! - The fixture bank: live state of every fixture instance

pub mod bank;
pub mod state;

pub use bank::{FixtureBank, FixtureBankReader, FixtureBankState};
pub use state::{
    BlinderPatch, BlinderState, Co2JetPatch, Co2JetState, Color, FixturePatch, FixtureState,
    LaserPattern, LaserPatch, LaserState, LedBarPatch, LedBarState, MergePatch, MovingHeadPatch,
    MovingHeadState, StrobePatch, StrobeState,
};

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LightError, Result};

/// Category of stage fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixtureClass {
    /// Moving head spots
    #[serde(rename = "movingHeads")]
    MovingHead,
    /// Strobe lights
    #[serde(rename = "strobes")]
    Strobe,
    /// Laser projectors
    #[serde(rename = "lasers")]
    Laser,
    /// Audience blinders
    #[serde(rename = "blinders")]
    Blinder,
    /// CO2 cryo jets
    #[serde(rename = "co2Jets")]
    Co2Jet,
    /// LED bars
    #[serde(rename = "ledBars")]
    LedBar,
}

impl FixtureClass {
    /// All classes in bank order
    pub const ALL: [FixtureClass; 6] = [
        FixtureClass::MovingHead,
        FixtureClass::Strobe,
        FixtureClass::Laser,
        FixtureClass::Blinder,
        FixtureClass::Co2Jet,
        FixtureClass::LedBar,
    ];

    /// Name used in scene files
    pub fn name(&self) -> &'static str {
        match self {
            FixtureClass::MovingHead => "movingHeads",
            FixtureClass::Strobe => "strobes",
            FixtureClass::Laser => "lasers",
            FixtureClass::Blinder => "blinders",
            FixtureClass::Co2Jet => "co2Jets",
            FixtureClass::LedBar => "ledBars",
        }
    }

    /// DMX channel block reserved for this class.
    ///
    /// Address metadata for output collaborators; no signal is encoded here.
    pub fn dmx_addresses(&self) -> RangeInclusive<u16> {
        match self {
            FixtureClass::MovingHead => 1..=32,
            FixtureClass::Strobe => 33..=48,
            FixtureClass::Laser => 49..=64,
            FixtureClass::Blinder => 65..=72,
            FixtureClass::Co2Jet => 73..=76,
            FixtureClass::LedBar => 77..=104,
        }
    }
}

impl fmt::Display for FixtureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FixtureClass {
    type Err = LightError;

    fn from_str(s: &str) -> Result<Self> {
        FixtureClass::ALL
            .into_iter()
            .find(|class| class.name() == s)
            .ok_or_else(|| LightError::UnknownFixtureClass(s.to_string()))
    }
}

/// Number of instances per fixture class for a deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureCounts {
    pub moving_heads: usize,
    pub strobes: usize,
    pub lasers: usize,
    pub blinders: usize,
    pub co2_jets: usize,
    pub led_bars: usize,
}

impl Default for FixtureCounts {
    fn default() -> Self {
        Self {
            moving_heads: 4,
            strobes: 6,
            lasers: 2,
            blinders: 4,
            co2_jets: 2,
            led_bars: 8,
        }
    }
}

impl FixtureCounts {
    /// Instance count for a class
    pub fn count(&self, class: FixtureClass) -> usize {
        match class {
            FixtureClass::MovingHead => self.moving_heads,
            FixtureClass::Strobe => self.strobes,
            FixtureClass::Laser => self.lasers,
            FixtureClass::Blinder => self.blinders,
            FixtureClass::Co2Jet => self.co2_jets,
            FixtureClass::LedBar => self.led_bars,
        }
    }

    /// Every class must have at least one instance
    pub fn validate(&self) -> Result<()> {
        match FixtureClass::ALL.into_iter().find(|c| self.count(*c) == 0) {
            Some(class) => Err(LightError::InvalidFixtureCount { class }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_names_round_trip() {
        for class in FixtureClass::ALL {
            assert_eq!(class.name().parse::<FixtureClass>().unwrap(), class);
        }
        assert_eq!(
            "fogMachines".parse::<FixtureClass>(),
            Err(LightError::UnknownFixtureClass("fogMachines".to_string()))
        );
    }

    #[test]
    fn test_default_counts() {
        let counts = FixtureCounts::default();
        assert_eq!(counts.count(FixtureClass::MovingHead), 4);
        assert_eq!(counts.count(FixtureClass::Strobe), 6);
        assert_eq!(counts.count(FixtureClass::Laser), 2);
        assert_eq!(counts.count(FixtureClass::Blinder), 4);
        assert_eq!(counts.count(FixtureClass::Co2Jet), 2);
        assert_eq!(counts.count(FixtureClass::LedBar), 8);
        assert!(counts.validate().is_ok());
    }

    #[test]
    fn test_zero_count_rejected() {
        let counts = FixtureCounts {
            co2_jets: 0,
            ..Default::default()
        };
        assert_eq!(
            counts.validate(),
            Err(LightError::InvalidFixtureCount {
                class: FixtureClass::Co2Jet
            })
        );
    }

    #[test]
    fn test_dmx_blocks_do_not_overlap() {
        let mut last_end = 0;
        for class in FixtureClass::ALL {
            let range = class.dmx_addresses();
            assert!(*range.start() > last_end);
            last_end = *range.end();
        }
        assert_eq!(last_end, 104);
    }
}
