// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Fixture bank: the live state of every fixture instance.
//!
//! The scheduler is the only writer. Renderers and output stages hold a
//! [`FixtureBankReader`] and take snapshots; a snapshot is taken under the
//! same lock a broadcast holds, so it never sees a half-applied patch.

use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;

use super::state::{
    BlinderState, Co2JetState, FixturePatch, FixtureState, LaserState, LedBarState, MergePatch,
    MovingHeadState, StrobeState,
};
use super::{FixtureClass, FixtureCounts};
use crate::error::Result;

/// Immutable copy of every fixture's state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixtureBankState {
    pub moving_heads: Vec<MovingHeadState>,
    pub strobes: Vec<StrobeState>,
    pub lasers: Vec<LaserState>,
    pub blinders: Vec<BlinderState>,
    pub co2_jets: Vec<Co2JetState>,
    pub led_bars: Vec<LedBarState>,
}

impl FixtureBankState {
    /// All instances at their default (inactive) state
    pub fn with_counts(counts: &FixtureCounts) -> Self {
        Self {
            moving_heads: vec![MovingHeadState::default(); counts.moving_heads],
            strobes: vec![StrobeState::default(); counts.strobes],
            lasers: vec![LaserState::default(); counts.lasers],
            blinders: vec![BlinderState::default(); counts.blinders],
            co2_jets: vec![Co2JetState::default(); counts.co2_jets],
            led_bars: vec![LedBarState::default(); counts.led_bars],
        }
    }

    /// Number of instances of a class
    pub fn count(&self, class: FixtureClass) -> usize {
        match class {
            FixtureClass::MovingHead => self.moving_heads.len(),
            FixtureClass::Strobe => self.strobes.len(),
            FixtureClass::Laser => self.lasers.len(),
            FixtureClass::Blinder => self.blinders.len(),
            FixtureClass::Co2Jet => self.co2_jets.len(),
            FixtureClass::LedBar => self.led_bars.len(),
        }
    }

    /// State of one instance
    pub fn get(&self, class: FixtureClass, index: usize) -> Option<FixtureState> {
        match class {
            FixtureClass::MovingHead => self
                .moving_heads
                .get(index)
                .cloned()
                .map(FixtureState::MovingHead),
            FixtureClass::Strobe => self.strobes.get(index).cloned().map(FixtureState::Strobe),
            FixtureClass::Laser => self.lasers.get(index).cloned().map(FixtureState::Laser),
            FixtureClass::Blinder => self.blinders.get(index).cloned().map(FixtureState::Blinder),
            FixtureClass::Co2Jet => self.co2_jets.get(index).cloned().map(FixtureState::Co2Jet),
            FixtureClass::LedBar => self.led_bars.get(index).cloned().map(FixtureState::LedBar),
        }
    }

    /// Number of active instances of a class
    pub fn active_count(&self, class: FixtureClass) -> usize {
        (0..self.count(class))
            .filter_map(|i| self.get(class, i))
            .filter(FixtureState::is_active)
            .count()
    }

    fn apply(&mut self, patch: &FixturePatch, target: Option<usize>) {
        match patch {
            FixturePatch::MovingHead(p) => merge_cells(&mut self.moving_heads, p, target),
            FixturePatch::Strobe(p) => merge_cells(&mut self.strobes, p, target),
            FixturePatch::Laser(p) => merge_cells(&mut self.lasers, p, target),
            FixturePatch::Blinder(p) => merge_cells(&mut self.blinders, p, target),
            FixturePatch::Co2Jet(p) => merge_cells(&mut self.co2_jets, p, target),
            FixturePatch::LedBar(p) => merge_cells(&mut self.led_bars, p, target),
        }
    }
}

fn merge_cells<S, P>(cells: &mut [S], patch: &P, target: Option<usize>)
where
    P: MergePatch<State = S>,
{
    match target {
        None => cells.iter_mut().for_each(|cell| patch.merge_into(cell)),
        Some(index) => {
            assert!(
                index < cells.len(),
                "fixture index {} out of range for {} instances",
                index,
                cells.len()
            );
            patch.merge_into(&mut cells[index]);
        }
    }
}

/// Owned, mutable fixture state
#[derive(Debug)]
pub struct FixtureBank {
    counts: FixtureCounts,
    state: Arc<RwLock<FixtureBankState>>,
}

impl FixtureBank {
    /// Create a bank with every instance inactive
    pub fn new(counts: FixtureCounts) -> Result<Self> {
        counts.validate()?;
        Ok(Self {
            state: Arc::new(RwLock::new(FixtureBankState::with_counts(&counts))),
            counts,
        })
    }

    /// Deployment counts
    pub fn counts(&self) -> &FixtureCounts {
        &self.counts
    }

    /// Number of instances of a class
    pub fn count(&self, class: FixtureClass) -> usize {
        self.counts.count(class)
    }

    /// Merge `patch` into every instance of its class
    pub fn apply_patch(&mut self, patch: &FixturePatch) {
        self.write(|state| state.apply(patch, None));
    }

    /// Merge `patch` into a single instance of its class.
    ///
    /// # Panics
    /// If `index` is not a valid instance of the class.
    pub fn apply_patch_to(&mut self, patch: &FixturePatch, index: usize) {
        self.write(|state| state.apply(patch, Some(index)));
    }

    /// Put every instance back to its default state
    pub fn reset_all(&mut self) {
        let counts = self.counts;
        self.write(|state| *state = FixtureBankState::with_counts(&counts));
    }

    /// Consistent copy of all fixture states
    pub fn snapshot(&self) -> FixtureBankState {
        read_snapshot(&self.state)
    }

    /// Read-only handle for renderers and output stages
    pub fn reader(&self) -> FixtureBankReader {
        FixtureBankReader {
            state: Arc::clone(&self.state),
        }
    }

    fn write(&mut self, f: impl FnOnce(&mut FixtureBankState)) {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }
}

/// Shared read access to a [`FixtureBank`]
#[derive(Debug, Clone)]
pub struct FixtureBankReader {
    state: Arc<RwLock<FixtureBankState>>,
}

impl FixtureBankReader {
    /// Consistent copy of all fixture states
    pub fn snapshot(&self) -> FixtureBankState {
        read_snapshot(&self.state)
    }
}

fn read_snapshot(state: &RwLock<FixtureBankState>) -> FixtureBankState {
    state.read().unwrap_or_else(PoisonError::into_inner).clone()
}
