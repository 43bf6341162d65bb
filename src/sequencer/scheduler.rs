// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timeline scheduler.
//!
//! Owns the scene selection, beat position and tempo, advances the beat
//! clock on every animation tick, applies the events of the current beat to
//! the fixture bank and runs the CO2 auto-off timers.
//!
//! Event detection is level-triggered: every event whose whole beat equals
//! `floor(position)` is re-applied on every tick spent inside that beat.
//! Merging is idempotent, so repeated application is harmless.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, trace};

use super::revert::RevertQueue;
use super::PlaybackState;
use crate::error::{LightError, Result};
use crate::fixture::{
    Co2JetPatch, FixtureBank, FixtureBankReader, FixtureBankState, FixtureClass, FixtureCounts,
    FixturePatch,
};
use crate::scene::{Scene, SceneLibrary};
use crate::timing::{BeatClock, Tempo};

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// Beats advanced this tick
    pub delta_beats: f64,
    /// Whether the scene looped back to beat 0
    pub wrapped: bool,
    /// Number of events applied
    pub events_applied: usize,
    /// Number of reverts scheduled
    pub reverts_scheduled: usize,
    /// Number of reverts that fired
    pub reverts_fired: usize,
}

/// The beat-synchronised scene player
#[derive(Debug)]
pub struct TimelineScheduler {
    library: Arc<SceneLibrary>,
    scene_id: String,
    scene: Arc<Scene>,
    position: f64,
    tempo: Tempo,
    state: PlaybackState,
    /// Wall time of the previous tick while playing
    last_tick: Option<Instant>,
    bank: FixtureBank,
    reverts: RevertQueue,
}

impl TimelineScheduler {
    /// Create a stopped scheduler at beat 0 of `scene_id`
    pub fn new(
        library: Arc<SceneLibrary>,
        counts: FixtureCounts,
        scene_id: &str,
        tempo: Tempo,
    ) -> Result<Self> {
        let scene = library.get(scene_id)?;
        let bank = FixtureBank::new(counts)?;
        Ok(Self {
            library,
            scene_id: scene_id.to_string(),
            scene,
            position: 0.0,
            tempo,
            state: PlaybackState::Stopped,
            last_tick: None,
            bank,
            reverts: RevertQueue::new(),
        })
    }

    /// Stock scenes, default fixture counts, `intro` at 150 BPM
    pub fn with_defaults() -> Result<Self> {
        Self::new(
            Arc::new(SceneLibrary::default()),
            FixtureCounts::default(),
            "intro",
            Tempo::default(),
        )
    }

    /// Start or resume playback from the current position
    pub fn play(&mut self) {
        if self.state == PlaybackState::Playing {
            return;
        }
        self.state = PlaybackState::Playing;
        // The first tick after starting only sets the time base
        self.last_tick = None;
        info!(scene = %self.scene_id, position = self.position, "play");
    }

    /// Stop advancing, keeping the position
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Stopped {
            return;
        }
        self.state = PlaybackState::Stopped;
        self.last_tick = None;
        info!(scene = %self.scene_id, position = self.position, "pause");
    }

    /// Stop and rewind to beat 0, cancelling pending reverts
    pub fn reset(&mut self) {
        self.state = PlaybackState::Stopped;
        self.last_tick = None;
        self.position = 0.0;
        let cancelled = self.reverts.cancel_all();
        info!(scene = %self.scene_id, cancelled, "reset");
    }

    /// Switch scene: stop, rewind and cancel pending reverts.
    ///
    /// An unknown id is rejected and nothing changes.
    pub fn select_scene(&mut self, scene_id: &str) -> Result<()> {
        let scene = self.library.get(scene_id)?;
        self.scene = scene;
        self.scene_id = scene_id.to_string();
        self.state = PlaybackState::Stopped;
        self.last_tick = None;
        self.position = 0.0;
        let cancelled = self.reverts.cancel_all();
        info!(scene = %self.scene_id, name = self.scene.name(), cancelled, "scene selected");
        Ok(())
    }

    /// Change the tempo for subsequent advances and newly scheduled reverts.
    ///
    /// Reverts already pending keep their wall-clock fire time. A
    /// non-positive tempo is rejected and the previous tempo stays.
    pub fn set_tempo(&mut self, bpm: f64) -> Result<()> {
        let tempo = Tempo::new(bpm)?;
        self.tempo = tempo;
        info!(bpm, "tempo changed");
        Ok(())
    }

    /// Move to `beat` within the current scene without changing play state
    pub fn seek(&mut self, beat: f64) -> Result<()> {
        let duration = self.scene.duration_beats();
        if !(beat.is_finite() && beat >= 0.0 && beat < duration) {
            return Err(LightError::InvalidSeek { beat, duration });
        }
        self.position = beat;
        debug!(beat, "seek");
        Ok(())
    }

    /// Cancel every pending revert and stop; used on process exit
    pub fn shutdown(&mut self) {
        self.state = PlaybackState::Stopped;
        self.last_tick = None;
        let cancelled = self.reverts.cancel_all();
        info!(cancelled, "scheduler shut down");
    }

    /// Run one animation tick at wall time `now`.
    ///
    /// Due reverts fire first, independent of play state. While playing, the
    /// position advances by the wall time since the previous tick and the
    /// events of the current beat are applied.
    pub fn tick(&mut self, now: Instant) -> TickReport {
        let mut report = TickReport {
            reverts_fired: self.poll_reverts(now),
            ..Default::default()
        };

        if self.state != PlaybackState::Playing {
            return report;
        }

        let elapsed = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_tick = Some(now);

        report.delta_beats = BeatClock::advance_by(elapsed, self.tempo);
        report.wrapped = self.advance(report.delta_beats);

        let (applied, scheduled) = self.apply_current_events(now);
        report.events_applied = applied;
        report.reverts_scheduled = scheduled;

        trace!(
            position = self.position,
            delta = report.delta_beats,
            applied,
            "tick"
        );
        report
    }

    /// Apply every revert due at `now`, returning how many fired
    pub fn poll_reverts(&mut self, now: Instant) -> usize {
        let due = self.reverts.take_due(now);
        for revert in &due {
            self.bank
                .apply_patch_to(&revert.revert_patch, revert.instance_index);
            debug!(
                class = %revert.target_class(),
                index = revert.instance_index,
                "revert fired"
            );
        }
        due.len()
    }

    /// Add `delta_beats`, looping to exactly 0 at the end of the scene
    fn advance(&mut self, delta_beats: f64) -> bool {
        let new_position = self.position + delta_beats;
        if new_position >= self.scene.duration_beats() {
            // Overshoot is discarded, the loop always restarts on beat 0
            self.position = 0.0;
            debug!(scene = %self.scene_id, "scene looped");
            true
        } else {
            self.position = new_position;
            false
        }
    }

    fn apply_current_events(&mut self, now: Instant) -> (usize, usize) {
        let scene = Arc::clone(&self.scene);
        let beat = self.position.floor();
        let mut applied = 0;
        let mut scheduled = 0;

        for event in scene.events_at(self.position) {
            if event.target_class() == FixtureClass::Co2Jet {
                // One jet per hit, alternating by beat number
                let index = (beat as usize) % self.bank.count(FixtureClass::Co2Jet);
                self.bank.apply_patch_to(&event.patch, index);
                if event.patch.active() == Some(true) {
                    match now.checked_add(self.tempo.beat_duration() / 2) {
                        Some(fires_at) => {
                            self.reverts.schedule(fires_at, index, co2_off());
                            scheduled += 1;
                            debug!(index, "co2 jet fired, revert scheduled");
                        }
                        // Half a beat lies past the end of the clock
                        None => debug!(index, bpm = self.tempo.bpm(), "co2 jet fired, no revert"),
                    }
                }
            } else {
                self.bank.apply_patch(&event.patch);
            }
            applied += 1;
        }

        (applied, scheduled)
    }

    /// Current scene identifier
    pub fn scene_id(&self) -> &str {
        &self.scene_id
    }

    /// Current scene
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Scene catalog
    pub fn library(&self) -> &SceneLibrary {
        &self.library
    }

    /// Beats since scene start
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current tempo
    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    /// Playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Check if playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Number of reverts waiting to fire
    pub fn pending_reverts(&self) -> usize {
        self.reverts.len()
    }

    /// Earliest pending revert
    pub fn next_revert_due(&self) -> Option<Instant> {
        self.reverts.next_due()
    }

    /// Consistent copy of all fixture states
    pub fn snapshot(&self) -> FixtureBankState {
        self.bank.snapshot()
    }

    /// Read-only fixture handle for concurrent consumers
    pub fn reader(&self) -> FixtureBankReader {
        self.bank.reader()
    }

    /// Switch every fixture back to its default state
    pub fn reset_fixtures(&mut self) {
        self.bank.reset_all();
    }
}

fn co2_off() -> FixturePatch {
    FixturePatch::Co2Jet(Co2JetPatch {
        active: Some(false),
    })
}
