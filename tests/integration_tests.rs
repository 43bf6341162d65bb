// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for LIGHTSEQ
//!
//! These tests drive the public API with injected wall-clock instants, so
//! timing is deterministic and nothing sleeps.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use lightseq::fixture::LaserPattern;
use lightseq::{
    BeatClock, Color, EngineConfig, FixtureClass, FixtureCounts, LightError, SceneLibrary, Tempo,
    TimelineScheduler, TransportCommand, TransportController,
};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn transport(scene: &str, bpm: f64) -> TransportController {
    let mut transport = TransportController::new(TimelineScheduler::with_defaults().unwrap());
    transport.select_scene(scene).unwrap();
    transport.set_tempo(bpm).unwrap();
    transport
}

/// Tick every `step` ms from `from` to `to` inclusive
fn run(transport: &mut TransportController, t0: Instant, from: u64, to: u64, step: u64) {
    let mut at = from;
    while at <= to {
        transport.tick(t0 + ms(at));
        at += step;
    }
}

#[test]
fn test_beat_clock_formula() {
    for bpm in [100.0, 150.0, 200.0, 87.5] {
        for delta in [0.0, 16.7, 400.0, 60_000.0] {
            let beats = BeatClock::advance(delta, bpm).unwrap();
            assert!((beats - delta / (60_000.0 / bpm)).abs() < 1e-12);
        }
    }
    assert_eq!(BeatClock::advance(16.7, 0.0), Err(LightError::InvalidTempo(0.0)));
    assert!(BeatClock::advance(16.7, -1.0).is_err());
}

#[test]
fn test_intro_after_four_beats() {
    let mut t = transport("intro", 150.0);
    let t0 = Instant::now();
    t.play();
    t.tick(t0);
    t.tick(t0 + ms(1600));

    assert!((t.beat_position() - 4.0).abs() < 1e-9);
    let snapshot = t.snapshot();
    let blue = Color::rgb(0x33, 0x66, 0xff);

    assert!(snapshot.moving_heads.iter().all(|h| h.active && h.color == blue));
    assert!(snapshot
        .led_bars
        .iter()
        .all(|b| b.active && b.chase && b.color == blue));
    assert_eq!(snapshot.active_count(FixtureClass::Laser), 0);
    assert_eq!(snapshot.active_count(FixtureClass::Blinder), 0);
    assert!(snapshot.lasers.iter().all(|l| l.color == Color::rgb(0, 0xff, 0)));
}

#[test]
fn test_full_intro_pass_and_loop() {
    let mut t = transport("intro", 150.0);
    let t0 = Instant::now();
    t.play();
    // 16 beats at 400ms, ticking at ~60 fps
    run(&mut t, t0, 0, 6390, 16);

    let snapshot = t.snapshot();
    assert_eq!(snapshot.active_count(FixtureClass::Laser), 2);
    assert!(snapshot.lasers.iter().all(|l| l.pattern == LaserPattern::Sweep));
    assert!(snapshot.blinders.iter().all(|b| b.active && b.intensity == 20));
    assert!(t.beat_position() > 15.0);

    t.tick(t0 + ms(6410));
    assert_eq!(t.beat_position(), 0.0);
    assert_eq!(t.status().display_beat, 1);
}

#[test]
fn test_loop_discards_overshoot() {
    let mut t = transport("kickRolls", 150.0);
    let t0 = Instant::now();
    t.seek(7.999).unwrap();
    t.play();
    t.tick(t0);
    t.tick(t0 + ms(1));
    assert_eq!(t.beat_position(), 0.0);

    t.seek(7.5).unwrap();
    t.tick(t0 + ms(10_001));
    assert_eq!(t.beat_position(), 0.0);
}

#[test]
fn test_reapplying_patch_is_idempotent() {
    let t0 = Instant::now();

    let mut once = transport("drop", 150.0);
    once.play();
    once.tick(t0);

    let mut many = transport("drop", 150.0);
    many.play();
    run(&mut many, t0, 0, 390, 10);

    assert_eq!(once.snapshot(), many.snapshot());
}

#[test]
fn test_drop_co2_hits_use_beat_number() {
    let mut t = transport("drop", 150.0);
    let t0 = Instant::now();

    for beat in [4.0, 8.0, 12.0] {
        t.reset();
        t.seek(beat).unwrap();
        t.play();
        t.tick(t0);
        t.pause();

        // 4, 8 and 12 mod 2 all select jet 0
        let snapshot = t.snapshot();
        assert!(snapshot.co2_jets[0].active, "beat {}", beat);
        assert!(!snapshot.co2_jets[1].active, "beat {}", beat);

        t.tick(t0 + ms(200));
        assert!(!t.snapshot().co2_jets[0].active);
    }
}

#[test]
fn test_co2_alternates_with_three_jets() {
    let counts = FixtureCounts {
        co2_jets: 3,
        ..Default::default()
    };
    let mut s = TimelineScheduler::new(
        Arc::new(SceneLibrary::default()),
        counts,
        "drop",
        Tempo::new(150.0).unwrap(),
    )
    .unwrap();
    let t0 = Instant::now();

    let mut hit = Vec::new();
    for beat in [4.0, 8.0, 12.0] {
        s.reset();
        s.reset_fixtures();
        s.seek(beat).unwrap();
        s.play();
        s.tick(t0);
        let snapshot = s.snapshot();
        hit.push(snapshot.co2_jets.iter().position(|j| j.active).unwrap());
    }
    // 4 mod 3, 8 mod 3, 12 mod 3
    assert_eq!(hit, vec![1, 2, 0]);
}

#[test]
fn test_kick_rolls_co2_on_beat_six() {
    let mut t = transport("kickRolls", 150.0);
    let t0 = Instant::now();
    t.play();
    // Play through to the middle of beat 6
    run(&mut t, t0, 0, 2600, 20);

    let snapshot = t.snapshot();
    assert!(snapshot.co2_jets[0].active);
    assert!(!snapshot.co2_jets[1].active);
    // Strobe and blinder hits were switched back off on beats 1 and 3
    assert_eq!(snapshot.active_count(FixtureClass::Strobe), 0);
    assert_eq!(snapshot.active_count(FixtureClass::Blinder), 0);
    // Laser stab on beat 4, off on beat 5
    assert_eq!(snapshot.active_count(FixtureClass::Laser), 0);
    assert!(snapshot.lasers.iter().all(|l| l.pattern == LaserPattern::Stab));
}

#[test]
fn test_co2_burst_drains_after_beat() {
    let mut t = transport("kickRolls", 150.0);
    let t0 = Instant::now();
    t.play();
    // Beat 6 spans 2400..2800ms; every tick in it re-fires the jet
    run(&mut t, t0, 0, 2790, 10);
    assert!(t.snapshot().co2_jets[0].active);

    // Inside beat 7 the older reverts switch the jet off
    t.tick(t0 + ms(2850));
    assert!(!t.snapshot().co2_jets[0].active);
    assert!(t.scheduler().pending_reverts() > 0);

    // The last re-fire at 2790ms reverts at 2990ms
    t.tick(t0 + ms(2990));
    assert!(!t.snapshot().co2_jets[0].active);
    assert_eq!(t.scheduler().pending_reverts(), 0);
}

#[test]
fn test_revert_timing_at_150_bpm() {
    let mut t = transport("drop", 150.0);
    let t0 = Instant::now();
    t.seek(4.0).unwrap();
    t.play();
    t.tick(t0);
    t.pause();

    for sample in [1, 50, 100, 150, 199] {
        t.tick(t0 + ms(sample));
        assert!(t.snapshot().co2_jets[0].active, "sampled at {}ms", sample);
    }
    t.tick(t0 + ms(200));
    assert!(!t.snapshot().co2_jets[0].active);
}

#[test]
fn test_scene_change_cancels_pending_revert() {
    let mut t = transport("drop", 150.0);
    let t0 = Instant::now();
    t.seek(4.0).unwrap();
    t.play();
    t.tick(t0);

    t.tick(t0 + ms(50));
    t.execute(TransportCommand::SelectScene("kickRolls".to_string()))
        .unwrap();
    t.seek(6.0).unwrap();
    t.play();
    t.tick(t0 + ms(60));
    t.pause();
    // kickRolls beat 6 hit the same jet and scheduled its own revert at 260ms
    assert_eq!(t.scheduler().pending_reverts(), 1);

    // The cancelled drop revert (due at 200ms) must not fire
    t.tick(t0 + ms(220));
    assert!(t.snapshot().co2_jets[0].active);

    t.tick(t0 + ms(260));
    assert!(!t.snapshot().co2_jets[0].active);
}

#[test]
fn test_rejected_scene_leaves_state_intact() {
    let mut t = transport("buildup", 150.0);
    let t0 = Instant::now();
    t.play();
    t.tick(t0);
    t.tick(t0 + ms(1000));
    let before = t.status();

    let err = t
        .execute(TransportCommand::SelectScene("finale".to_string()))
        .unwrap_err();
    assert_eq!(err, LightError::UnknownScene("finale".to_string()));
    assert_eq!(t.status(), before);
}

#[test]
fn test_tempo_change_mid_playback() {
    let mut t = transport("intro", 150.0);
    let t0 = Instant::now();
    t.play();
    t.tick(t0);
    t.tick(t0 + ms(400));
    assert!((t.beat_position() - 1.0).abs() < 1e-9);

    assert!(t.set_tempo(0.0).is_err());
    t.set_tempo(120.0).unwrap();
    t.tick(t0 + ms(900));
    assert!((t.beat_position() - 2.0).abs() < 1e-9);
}

#[test]
fn test_readers_never_see_partial_broadcast() {
    let mut t = transport("drop", 150.0);
    let reader = t.scheduler().reader();
    let t0 = Instant::now();
    t.play();

    let handle = thread::spawn(move || {
        for _ in 0..2000 {
            let snapshot = reader.snapshot();
            let first = snapshot.strobes[0].clone();
            assert!(snapshot.strobes.iter().all(|s| *s == first));
            let first = snapshot.moving_heads[0].clone();
            assert!(snapshot.moving_heads.iter().all(|h| *h == first));
        }
    });

    run(&mut t, t0, 0, 20_000, 5);
    handle.join().unwrap();
}

#[test]
fn test_engine_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("scenes.yaml"),
        r##"
scenes:
  pulse:
    name: Pulse
    description: Jets on every beat
    duration: 4
    timeline:
      - { time: 0, action: co2Jets, params: { active: true } }
      - { time: 1, action: co2Jets, params: { active: true } }
      - { time: 2, action: ledBars, params: { active: true, color: "#ffffff" } }
"##,
    )
    .unwrap();
    let config_path = dir.path().join("lightseq.toml");
    std::fs::write(
        &config_path,
        "tempo = 120.0\nscene = \"pulse\"\nscenes_file = \"scenes.yaml\"\n",
    )
    .unwrap();

    let config = EngineConfig::load(&config_path).unwrap();
    let mut t = TransportController::new(config.build_scheduler().unwrap());
    let t0 = Instant::now();
    t.play();
    t.tick(t0);
    assert!(t.snapshot().co2_jets[0].active);

    // Beat 1 at 120 BPM starts at 500ms and hits the other jet
    t.tick(t0 + ms(500));
    let snapshot = t.snapshot();
    assert!(snapshot.co2_jets[1].active);
    // Jet 0 was reverted 250ms after its last hit
    assert!(!snapshot.co2_jets[0].active);
}
