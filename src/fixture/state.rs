// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Fixture state records and merge patches.
//!
//! Each fixture class has its own state shape. A patch carries only the
//! fields an event wants to change; merging leaves every other field alone.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::FixtureClass;
use crate::error::{LightError, Result};

/// RGB color, written as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create a color from components
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` string (leading `#` optional)
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(LightError::InvalidColor(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| LightError::InvalidColor(hex.to_string()))
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = LightError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = LightError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Laser beam pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaserPattern {
    #[default]
    Sweep,
    Circle,
    Starburst,
    Stab,
}

/// Moving head state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingHeadState {
    pub active: bool,
    pub position: f64,
    pub color: Color,
    pub strobe: bool,
}

impl Default for MovingHeadState {
    fn default() -> Self {
        Self {
            active: false,
            position: 0.0,
            color: Color::rgb(0xff, 0x00, 0x00),
            strobe: false,
        }
    }
}

/// Strobe state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StrobeState {
    pub active: bool,
    /// Percent, 0-100
    pub intensity: u8,
}

/// Laser state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaserState {
    pub active: bool,
    pub pattern: LaserPattern,
    pub color: Color,
}

impl Default for LaserState {
    fn default() -> Self {
        Self {
            active: false,
            pattern: LaserPattern::Sweep,
            color: Color::rgb(0x00, 0xff, 0x00),
        }
    }
}

/// Blinder state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BlinderState {
    pub active: bool,
    /// Percent, 0-100
    pub intensity: u8,
}

/// CO2 jet state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Co2JetState {
    pub active: bool,
}

/// LED bar state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedBarState {
    pub active: bool,
    pub color: Color,
    pub chase: bool,
}

impl Default for LedBarState {
    fn default() -> Self {
        Self {
            active: false,
            color: Color::rgb(0x00, 0x00, 0xff),
            chase: false,
        }
    }
}

/// Read-only view of a single fixture instance
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureState {
    MovingHead(MovingHeadState),
    Strobe(StrobeState),
    Laser(LaserState),
    Blinder(BlinderState),
    Co2Jet(Co2JetState),
    LedBar(LedBarState),
}

impl FixtureState {
    /// Whether the fixture is switched on
    pub fn is_active(&self) -> bool {
        match self {
            FixtureState::MovingHead(s) => s.active,
            FixtureState::Strobe(s) => s.active,
            FixtureState::Laser(s) => s.active,
            FixtureState::Blinder(s) => s.active,
            FixtureState::Co2Jet(s) => s.active,
            FixtureState::LedBar(s) => s.active,
        }
    }
}

/// Field-by-field merge of a partial update into a state record
pub trait MergePatch {
    /// State record this patch applies to
    type State;

    /// Overwrite the fields present in the patch, keep the rest
    fn merge_into(&self, state: &mut Self::State);
}

fn merge_field<T: Clone>(slot: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *slot = value.clone();
    }
}

fn check_intensity(class: FixtureClass, intensity: Option<u8>) -> Result<()> {
    match intensity {
        Some(value) if value > 100 => Err(LightError::patch(
            class,
            format!("intensity {} is out of range 0..=100", value),
        )),
        _ => Ok(()),
    }
}

/// Partial moving head update
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MovingHeadPatch {
    pub active: Option<bool>,
    pub position: Option<f64>,
    pub color: Option<Color>,
    pub strobe: Option<bool>,
}

impl MergePatch for MovingHeadPatch {
    type State = MovingHeadState;

    fn merge_into(&self, state: &mut MovingHeadState) {
        merge_field(&mut state.active, &self.active);
        merge_field(&mut state.position, &self.position);
        merge_field(&mut state.color, &self.color);
        merge_field(&mut state.strobe, &self.strobe);
    }
}

/// Partial strobe update
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrobePatch {
    pub active: Option<bool>,
    pub intensity: Option<u8>,
}

impl MergePatch for StrobePatch {
    type State = StrobeState;

    fn merge_into(&self, state: &mut StrobeState) {
        merge_field(&mut state.active, &self.active);
        merge_field(&mut state.intensity, &self.intensity);
    }
}

/// Partial laser update
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LaserPatch {
    pub active: Option<bool>,
    pub pattern: Option<LaserPattern>,
    pub color: Option<Color>,
}

impl MergePatch for LaserPatch {
    type State = LaserState;

    fn merge_into(&self, state: &mut LaserState) {
        merge_field(&mut state.active, &self.active);
        merge_field(&mut state.pattern, &self.pattern);
        merge_field(&mut state.color, &self.color);
    }
}

/// Partial blinder update
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlinderPatch {
    pub active: Option<bool>,
    pub intensity: Option<u8>,
}

impl MergePatch for BlinderPatch {
    type State = BlinderState;

    fn merge_into(&self, state: &mut BlinderState) {
        merge_field(&mut state.active, &self.active);
        merge_field(&mut state.intensity, &self.intensity);
    }
}

/// Partial CO2 jet update
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Co2JetPatch {
    pub active: Option<bool>,
}

impl MergePatch for Co2JetPatch {
    type State = Co2JetState;

    fn merge_into(&self, state: &mut Co2JetState) {
        merge_field(&mut state.active, &self.active);
    }
}

/// Partial LED bar update
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedBarPatch {
    pub active: Option<bool>,
    pub color: Option<Color>,
    pub chase: Option<bool>,
}

impl MergePatch for LedBarPatch {
    type State = LedBarState;

    fn merge_into(&self, state: &mut LedBarState) {
        merge_field(&mut state.active, &self.active);
        merge_field(&mut state.color, &self.color);
        merge_field(&mut state.chase, &self.chase);
    }
}

/// A partial update addressed to one fixture class.
///
/// The variant names the target class, so a patch can never carry fields
/// that belong to a different class.
#[derive(Debug, Clone, PartialEq)]
pub enum FixturePatch {
    MovingHead(MovingHeadPatch),
    Strobe(StrobePatch),
    Laser(LaserPatch),
    Blinder(BlinderPatch),
    Co2Jet(Co2JetPatch),
    LedBar(LedBarPatch),
}

impl FixturePatch {
    /// Parse the `params` of a scene-file event for the given class
    pub fn from_params(class: FixtureClass, params: serde_yaml::Value) -> Result<Self> {
        fn parse<P>(class: FixtureClass, params: serde_yaml::Value) -> Result<P>
        where
            P: Default + serde::de::DeserializeOwned,
        {
            if params.is_null() {
                return Ok(P::default());
            }
            serde_yaml::from_value(params).map_err(|e| LightError::patch(class, e.to_string()))
        }

        let patch = match class {
            FixtureClass::MovingHead => FixturePatch::MovingHead(parse(class, params)?),
            FixtureClass::Strobe => FixturePatch::Strobe(parse(class, params)?),
            FixtureClass::Laser => FixturePatch::Laser(parse(class, params)?),
            FixtureClass::Blinder => FixturePatch::Blinder(parse(class, params)?),
            FixtureClass::Co2Jet => FixturePatch::Co2Jet(parse(class, params)?),
            FixtureClass::LedBar => FixturePatch::LedBar(parse(class, params)?),
        };
        patch.validate()?;
        Ok(patch)
    }

    /// Target fixture class
    pub fn class(&self) -> FixtureClass {
        match self {
            FixturePatch::MovingHead(_) => FixtureClass::MovingHead,
            FixturePatch::Strobe(_) => FixtureClass::Strobe,
            FixturePatch::Laser(_) => FixtureClass::Laser,
            FixturePatch::Blinder(_) => FixtureClass::Blinder,
            FixturePatch::Co2Jet(_) => FixtureClass::Co2Jet,
            FixturePatch::LedBar(_) => FixtureClass::LedBar,
        }
    }

    /// The `active` field, if the patch sets it
    pub fn active(&self) -> Option<bool> {
        match self {
            FixturePatch::MovingHead(p) => p.active,
            FixturePatch::Strobe(p) => p.active,
            FixturePatch::Laser(p) => p.active,
            FixturePatch::Blinder(p) => p.active,
            FixturePatch::Co2Jet(p) => p.active,
            FixturePatch::LedBar(p) => p.active,
        }
    }

    /// Range checks that serde cannot express
    pub fn validate(&self) -> Result<()> {
        match self {
            FixturePatch::MovingHead(p) => match p.position {
                Some(position) if !position.is_finite() => Err(LightError::patch(
                    FixtureClass::MovingHead,
                    "position must be finite",
                )),
                _ => Ok(()),
            },
            FixturePatch::Strobe(p) => check_intensity(FixtureClass::Strobe, p.intensity),
            FixturePatch::Blinder(p) => check_intensity(FixtureClass::Blinder, p.intensity),
            FixturePatch::Laser(_) | FixturePatch::Co2Jet(_) | FixturePatch::LedBar(_) => Ok(()),
        }
    }
}
