// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! The five stock hardstyle scenes.

use super::{Scene, SceneLibrary, TimelineEvent};
use crate::fixture::{
    BlinderPatch, Co2JetPatch, Color, FixturePatch, LaserPattern, LaserPatch, LedBarPatch,
    MovingHeadPatch, StrobePatch,
};

const BLUE: Color = Color::rgb(0x33, 0x66, 0xff);
const PINK: Color = Color::rgb(0xff, 0x33, 0x66);
const RED: Color = Color::rgb(0xff, 0x00, 0x00);
const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
const PURPLE: Color = Color::rgb(0x99, 0x33, 0xff);

/// Identifiers of the stock scenes, in display order
pub const SCENE_IDS: [&str; 5] = ["intro", "buildup", "drop", "kickRolls", "breakdown"];

fn heads(active: bool, color: Color, strobe: bool) -> FixturePatch {
    FixturePatch::MovingHead(MovingHeadPatch {
        active: Some(active),
        position: None,
        color: Some(color),
        strobe: Some(strobe),
    })
}

fn strobes(active: bool, intensity: u8) -> FixturePatch {
    FixturePatch::Strobe(StrobePatch {
        active: Some(active),
        intensity: Some(intensity),
    })
}

fn lasers(active: bool, pattern: LaserPattern, color: Color) -> FixturePatch {
    FixturePatch::Laser(LaserPatch {
        active: Some(active),
        pattern: Some(pattern),
        color: Some(color),
    })
}

fn blinders(active: bool, intensity: u8) -> FixturePatch {
    FixturePatch::Blinder(BlinderPatch {
        active: Some(active),
        intensity: Some(intensity),
    })
}

fn co2(active: bool) -> FixturePatch {
    FixturePatch::Co2Jet(Co2JetPatch {
        active: Some(active),
    })
}

fn bars(active: bool, color: Color, chase: bool) -> FixturePatch {
    FixturePatch::LedBar(LedBarPatch {
        active: Some(active),
        color: Some(color),
        chase: Some(chase),
    })
}

fn at(beat: f64, patch: FixturePatch) -> TimelineEvent {
    TimelineEvent::new(beat, patch)
}

fn scene(name: &str, description: &str, duration: f64, events: Vec<TimelineEvent>) -> Scene {
    match Scene::new(name, description, duration, events) {
        Ok(scene) => scene,
        Err(e) => unreachable!("stock scene '{}' is invalid: {}", name, e),
    }
}

/// Slow-moving heads with soft washes, pulsating LED bars
pub fn intro() -> Scene {
    scene(
        "Intro",
        "Slow-moving heads with soft washes, pulsating LED bars",
        16.0,
        vec![
            at(0.0, heads(true, BLUE, false)),
            at(4.0, bars(true, BLUE, true)),
            at(8.0, lasers(true, LaserPattern::Sweep, BLUE)),
            at(12.0, blinders(true, 20)),
        ],
    )
}

/// Increasing speed of color chases, laser sweeps, and fog bursts
pub fn buildup() -> Scene {
    scene(
        "Buildup",
        "Increasing speed of color chases, laser sweeps, and fog bursts",
        16.0,
        vec![
            at(0.0, bars(true, PINK, true)),
            at(4.0, heads(true, PINK, false)),
            at(8.0, lasers(true, LaserPattern::Circle, PINK)),
            at(12.0, co2(true)),
            at(14.0, blinders(true, 50)),
        ],
    )
}

/// Blinders flash, strobes burst, moving heads strobe pan fast
pub fn drop() -> Scene {
    scene(
        "Drop",
        "Blinders flash, strobes burst, moving heads strobe pan fast",
        16.0,
        vec![
            at(0.0, strobes(true, 100)),
            at(0.0, blinders(true, 100)),
            at(0.0, heads(true, RED, true)),
            at(0.0, lasers(true, LaserPattern::Starburst, RED)),
            at(4.0, co2(true)),
            at(8.0, co2(true)),
            at(12.0, co2(true)),
        ],
    )
}

/// Alternating strobe hits, blinder flashes, laser stabs
pub fn kick_rolls() -> Scene {
    scene(
        "Kick Rolls",
        "Alternating strobe hits, blinder flashes, laser stabs",
        8.0,
        vec![
            at(0.0, strobes(true, 100)),
            at(1.0, strobes(false, 0)),
            at(2.0, blinders(true, 100)),
            at(3.0, blinders(false, 0)),
            at(4.0, lasers(true, LaserPattern::Stab, WHITE)),
            at(5.0, lasers(false, LaserPattern::Stab, WHITE)),
            at(6.0, co2(true)),
            at(7.0, heads(true, WHITE, true)),
        ],
    )
}

/// Slow fade-out effects with smooth color transitions
pub fn breakdown() -> Scene {
    scene(
        "Breakdown",
        "Slow fade-out effects with smooth color transitions",
        16.0,
        vec![
            at(0.0, heads(true, PURPLE, false)),
            at(4.0, lasers(true, LaserPattern::Sweep, PURPLE)),
            at(8.0, bars(true, PURPLE, false)),
            at(12.0, strobes(false, 0)),
            at(14.0, blinders(false, 0)),
        ],
    )
}

/// Library holding the five stock scenes
pub fn library() -> SceneLibrary {
    let scenes = [intro(), buildup(), drop(), kick_rolls(), breakdown()];
    let library = SceneLibrary::new(SCENE_IDS.iter().map(|id| id.to_string()).zip(scenes));
    match library {
        Ok(library) => library,
        Err(e) => unreachable!("stock scene ids collide: {}", e),
    }
}
