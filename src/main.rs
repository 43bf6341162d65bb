// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::time::Duration;

use anyhow::{anyhow, Result};
use lightseq::{
    EngineConfig, FixtureBankState, FixtureClass, SettingsWatcher, TransportCommand,
    TransportController, VisualCues,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn print_usage() {
    println!("LIGHTSEQ - Beat-synchronised lighting timeline");
    println!();
    println!("Usage: lightseq [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --config <PATH>   Load engine configuration (TOML)");
    println!("  --scene <ID>      Start scene (default: intro)");
    println!("  --bpm <N>         Start tempo (default: 150)");
    println!("  --beats <N>       Stop after N beats (default: run until Ctrl+C)");
    println!("  --list-scenes     List available scenes");
    println!("  --help            Show this help message");
    println!();
    println!("Commands on stdin while running:");
    println!("  play | pause | toggle | reset | scene <ID> | bpm <N> | seek <BEAT>");
}

/// Command line options
#[derive(Debug, Default)]
struct Options {
    config: Option<String>,
    scene: Option<String>,
    bpm: Option<f64>,
    beats: Option<u64>,
    list_scenes: bool,
    help: bool,
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options::default();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| anyhow!("{} requires a value", name))
        };
        match arg.as_str() {
            "--config" => options.config = Some(value("--config")?),
            "--scene" => options.scene = Some(value("--scene")?),
            "--bpm" => {
                let raw = value("--bpm")?;
                let bpm = raw.parse().map_err(|_| anyhow!("Invalid BPM: {}", raw))?;
                options.bpm = Some(bpm);
            }
            "--beats" => {
                let raw = value("--beats")?;
                let beats = raw
                    .parse()
                    .map_err(|_| anyhow!("Invalid beat count: {}", raw))?;
                options.beats = Some(beats);
            }
            "--list-scenes" => options.list_scenes = true,
            "--help" | "-h" => options.help = true,
            other => return Err(anyhow!("Unknown option: {}", other)),
        }
    }

    Ok(options)
}

fn list_scenes(config: &EngineConfig) -> Result<()> {
    let library = config.scene_library()?;
    for id in library.ids() {
        let scene = library.get(id)?;
        println!(
            "{:<12} {:>3} beats  {} - {}",
            id,
            scene.duration_beats(),
            scene.name(),
            scene.description()
        );
    }
    Ok(())
}

/// One-line summary of which fixtures are lit
fn describe(snapshot: &FixtureBankState) -> String {
    FixtureClass::ALL
        .iter()
        .map(|class| {
            format!(
                "{}:{}/{}",
                class,
                snapshot.active_count(*class),
                snapshot.count(*class)
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

async fn run(config: EngineConfig, beat_limit: Option<u64>) -> Result<()> {
    let mut transport = TransportController::new(config.build_scheduler()?);
    let mut settings = config.advanced_settings()?;
    let mut cues = VisualCues::derive(transport.scheduler().tempo(), &settings);
    let watcher = config
        .settings_file
        .as_ref()
        .map(|path| SettingsWatcher::new(path, None))
        .transpose()?;

    let period = Duration::from_secs_f64(1.0 / f64::from(config.frame_rate_hz));
    let mut frames = tokio::time::interval(period);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    transport.play();
    let mut last_beat: Option<(String, u64)> = None;
    let mut beats_played = 0u64;

    loop {
        tokio::select! {
            now = frames.tick() => {
                transport.tick(now.into_std());

                if let Some(new_settings) = watcher.as_ref().and_then(SettingsWatcher::latest) {
                    info!(?new_settings, "advanced settings reloaded");
                    settings = new_settings;
                }
                let tempo = transport.scheduler().tempo();
                let new_cues = VisualCues::derive(tempo, &settings);
                if new_cues != cues {
                    info!(
                        head_rotation = ?new_cues.head_rotation_period,
                        led_chase = ?new_cues.led_chase_period,
                        strobe_hz = new_cues.strobe_rate_hz,
                        "visual cues updated"
                    );
                    cues = new_cues;
                }

                let status = transport.status();
                let beat = (status.scene_id.clone(), status.display_beat);
                if status.is_playing && last_beat.as_ref() != Some(&beat) {
                    info!(
                        "[{}] Beat: {}/{}  {}",
                        status.scene_name,
                        status.display_beat,
                        status.duration_beats,
                        describe(&transport.snapshot())
                    );
                    last_beat = Some(beat);
                    beats_played += 1;
                    if beat_limit.is_some_and(|limit| beats_played > limit) {
                        break;
                    }
                }
            }
            line = stdin.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) if line.trim().is_empty() => {}
                    Ok(Some(line)) => match line.parse::<TransportCommand>() {
                        Ok(command) => {
                            // Rejections are logged by the transport
                            let _ = transport.execute(command);
                        }
                        Err(e) => warn!(error = %e, "unrecognised command"),
                    },
                    Ok(None) => stdin_open = false,
                    Err(e) => {
                        warn!(error = %e, "stdin closed");
                        stdin_open = false;
                    }
                }
            }
            _ = &mut shutdown => {
                info!("interrupted");
                break;
            }
        }
    }

    transport.shutdown();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    if options.help {
        print_usage();
        return Ok(());
    }

    let mut config = match &options.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(scene) = options.scene {
        config.scene = scene;
    }
    if let Some(bpm) = options.bpm {
        config.tempo = bpm;
    }
    config.validate()?;

    if options.list_scenes {
        return list_scenes(&config);
    }

    run(config, options.beats).await
}
