// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Transport controls.
//!
//! A thin façade over [`TimelineScheduler`]: it translates play, pause,
//! reset, scene and tempo commands into scheduler transitions and exposes
//! the values a transport display shows. It holds no state of its own.

use std::str::FromStr;
use std::time::Instant;

use serde::Serialize;
use tracing::warn;

use crate::error::{LightError, Result};
use crate::fixture::FixtureBankState;
use crate::sequencer::{TickReport, TimelineScheduler};

/// Command accepted by the transport
#[derive(Debug, Clone, PartialEq)]
pub enum TransportCommand {
    /// Start playback
    Play,
    /// Pause playback
    Pause,
    /// Toggle play/pause
    TogglePlay,
    /// Stop and rewind
    Reset,
    /// Switch scene
    SelectScene(String),
    /// Set tempo in BPM
    SetTempo(f64),
    /// Jump to a beat in the current scene
    Seek(f64),
}

impl FromStr for TransportCommand {
    type Err = LightError;

    /// Parse a console command such as `play`, `scene drop` or `bpm 140`
    fn from_str(s: &str) -> Result<Self> {
        let mut words = s.split_whitespace();
        let command = words.next().unwrap_or_default();
        let arg = words.next();

        let number = |arg: Option<&str>| -> Result<f64> {
            let arg = arg.ok_or_else(|| LightError::Parse(format!("'{}' needs a value", command)))?;
            arg.parse()
                .map_err(|_| LightError::Parse(format!("'{}' is not a number", arg)))
        };

        match command {
            "play" => Ok(TransportCommand::Play),
            "pause" => Ok(TransportCommand::Pause),
            "toggle" | "space" => Ok(TransportCommand::TogglePlay),
            "reset" | "stop" => Ok(TransportCommand::Reset),
            "scene" => arg
                .map(|id| TransportCommand::SelectScene(id.to_string()))
                .ok_or_else(|| LightError::Parse("'scene' needs an id".to_string())),
            "bpm" | "tempo" => number(arg).map(TransportCommand::SetTempo),
            "seek" => number(arg).map(TransportCommand::Seek),
            other => Err(LightError::Parse(format!("unknown command '{}'", other))),
        }
    }
}

/// Values shown by a transport display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportStatus {
    pub scene_id: String,
    pub scene_name: String,
    /// Fractional beats since scene start
    pub beat_position: f64,
    /// 1-based whole beat, as shown to the operator
    pub display_beat: u64,
    pub duration_beats: f64,
    pub tempo: f64,
    pub is_playing: bool,
}

/// Transport façade over a scheduler
#[derive(Debug)]
pub struct TransportController {
    scheduler: TimelineScheduler,
}

impl TransportController {
    /// Wrap a scheduler
    pub fn new(scheduler: TimelineScheduler) -> Self {
        Self { scheduler }
    }

    /// Start playback
    pub fn play(&mut self) {
        self.scheduler.play();
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.scheduler.pause();
    }

    /// Toggle between playing and paused
    pub fn toggle_play(&mut self) {
        if self.scheduler.is_playing() {
            self.scheduler.pause();
        } else {
            self.scheduler.play();
        }
    }

    /// Stop and rewind to beat 0
    pub fn reset(&mut self) {
        self.scheduler.reset();
    }

    /// Switch scene
    pub fn select_scene(&mut self, scene_id: &str) -> Result<()> {
        self.scheduler.select_scene(scene_id)
    }

    /// Set tempo
    pub fn set_tempo(&mut self, bpm: f64) -> Result<()> {
        self.scheduler.set_tempo(bpm)
    }

    /// Jump to a beat
    pub fn seek(&mut self, beat: f64) -> Result<()> {
        self.scheduler.seek(beat)
    }

    /// Execute a command, logging rejections
    pub fn execute(&mut self, command: TransportCommand) -> Result<()> {
        let result = match &command {
            TransportCommand::Play => {
                self.play();
                Ok(())
            }
            TransportCommand::Pause => {
                self.pause();
                Ok(())
            }
            TransportCommand::TogglePlay => {
                self.toggle_play();
                Ok(())
            }
            TransportCommand::Reset => {
                self.reset();
                Ok(())
            }
            TransportCommand::SelectScene(id) => self.select_scene(id),
            TransportCommand::SetTempo(bpm) => self.set_tempo(*bpm),
            TransportCommand::Seek(beat) => self.seek(*beat),
        };
        if let Err(ref e) = result {
            warn!(?command, error = %e, "transport command rejected");
        }
        result
    }

    /// Drive one animation tick
    pub fn tick(&mut self, now: Instant) -> TickReport {
        self.scheduler.tick(now)
    }

    /// Cancel pending reverts and stop
    pub fn shutdown(&mut self) {
        self.scheduler.shutdown();
    }

    /// Current scene id
    pub fn scene_id(&self) -> &str {
        self.scheduler.scene_id()
    }

    /// Current beat position
    pub fn beat_position(&self) -> f64 {
        self.scheduler.position()
    }

    /// Current tempo in BPM
    pub fn tempo(&self) -> f64 {
        self.scheduler.tempo().bpm()
    }

    /// Check if playing
    pub fn is_playing(&self) -> bool {
        self.scheduler.is_playing()
    }

    /// Everything the transport display needs
    pub fn status(&self) -> TransportStatus {
        let scene = self.scheduler.scene();
        TransportStatus {
            scene_id: self.scheduler.scene_id().to_string(),
            scene_name: scene.name().to_string(),
            beat_position: self.scheduler.position(),
            display_beat: self.scheduler.position().floor() as u64 + 1,
            duration_beats: scene.duration_beats(),
            tempo: self.tempo(),
            is_playing: self.is_playing(),
        }
    }

    /// Fixture snapshot for the renderer
    pub fn snapshot(&self) -> FixtureBankState {
        self.scheduler.snapshot()
    }

    /// Underlying scheduler
    pub fn scheduler(&self) -> &TimelineScheduler {
        &self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn transport() -> TransportController {
        TransportController::new(TimelineScheduler::with_defaults().unwrap())
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("play".parse::<TransportCommand>().unwrap(), TransportCommand::Play);
        assert_eq!(
            "scene kickRolls".parse::<TransportCommand>().unwrap(),
            TransportCommand::SelectScene("kickRolls".to_string())
        );
        assert_eq!(
            "bpm 140".parse::<TransportCommand>().unwrap(),
            TransportCommand::SetTempo(140.0)
        );
        assert_eq!(
            "  seek 4.5 ".parse::<TransportCommand>().unwrap(),
            TransportCommand::Seek(4.5)
        );
        assert!("bpm".parse::<TransportCommand>().is_err());
        assert!("bpm fast".parse::<TransportCommand>().is_err());
        assert!("scene".parse::<TransportCommand>().is_err());
        assert!("dance".parse::<TransportCommand>().is_err());
        assert!("".parse::<TransportCommand>().is_err());
    }

    #[test]
    fn test_toggle_play() {
        let mut t = transport();
        t.toggle_play();
        assert!(t.is_playing());
        t.toggle_play();
        assert!(!t.is_playing());
    }

    #[test]
    fn test_status() {
        let mut t = transport();
        let t0 = Instant::now();
        t.execute(TransportCommand::SelectScene("kickRolls".to_string()))
            .unwrap();
        t.execute(TransportCommand::Play).unwrap();
        t.tick(t0);
        t.tick(t0 + Duration::from_millis(600));

        let status = t.status();
        assert_eq!(status.scene_id, "kickRolls");
        assert_eq!(status.scene_name, "Kick Rolls");
        assert!((status.beat_position - 1.5).abs() < 1e-9);
        assert_eq!(status.display_beat, 2);
        assert_eq!(status.duration_beats, 8.0);
        assert_eq!(status.tempo, 150.0);
        assert!(status.is_playing);
    }

    #[test]
    fn test_rejected_command_reports_error() {
        let mut t = transport();
        let err = t
            .execute(TransportCommand::SelectScene("outro".to_string()))
            .unwrap_err();
        assert_eq!(err, LightError::UnknownScene("outro".to_string()));
        assert_eq!(t.scene_id(), "intro");

        assert!(t.execute(TransportCommand::SetTempo(0.0)).is_err());
        assert_eq!(t.tempo(), 150.0);
    }
}
