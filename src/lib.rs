// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! LIGHTSEQ - beat-synchronised lighting timeline engine.
//!
//! A tempo-driven scheduler plays looping scenes of timed fixture events
//! against a bank of stage fixtures (moving heads, strobes, lasers,
//! blinders, CO2 jets, LED bars). Renderers and output stages read
//! consistent snapshots of the fixture bank.

pub mod config;
pub mod error;
pub mod fixture;
pub mod scene;
pub mod sequencer;
pub mod timing;
pub mod transport;
pub mod visual;

pub use config::{AdvancedSettings, EngineConfig, SettingsEvent, SettingsWatcher};
pub use error::{LightError, Result};
pub use fixture::{
    Color, FixtureBank, FixtureBankReader, FixtureBankState, FixtureClass, FixtureCounts,
    FixturePatch, FixtureState,
};
pub use scene::{Scene, SceneLibrary, TimelineEvent};
pub use sequencer::{PendingRevert, PlaybackState, TickReport, TimelineScheduler};
pub use timing::{BeatClock, Tempo};
pub use transport::{TransportCommand, TransportController, TransportStatus};
pub use visual::VisualCues;
