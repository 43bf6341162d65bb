// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! File watcher for hot-reloading advanced settings.
//!
//! The settings panel writes a YAML file; this watcher notices the change,
//! waits for writes to settle, re-parses and validates the file, and hands
//! the result to the driver loop. A file that fails validation produces an
//! error event and never replaces the settings in use.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use super::AdvancedSettings;

/// Events emitted by the settings watcher
#[derive(Debug, Clone)]
pub enum SettingsEvent {
    /// Settings file changed and parsed cleanly
    Reloaded(AdvancedSettings),
    /// Settings file changed but could not be used
    Error(String),
}

/// Settings file watcher with debouncing and validation
pub struct SettingsWatcher {
    _watcher: RecommendedWatcher,
    event_receiver: Receiver<SettingsEvent>,
    settings_path: PathBuf,
}

impl SettingsWatcher {
    /// Watch `path` for modifications.
    ///
    /// # Arguments
    /// * `path` - Settings YAML file
    /// * `debounce_ms` - Debounce duration in milliseconds (default: 250)
    pub fn new<P: AsRef<Path>>(path: P, debounce_ms: Option<u64>) -> Result<Self> {
        let settings_path = path.as_ref().to_path_buf();
        let debounce_duration = Duration::from_millis(debounce_ms.unwrap_or(250));

        // Watch the directory so editors that replace the file are still seen
        let watch_dir = settings_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let file_name = settings_path
            .file_name()
            .map(|name| name.to_os_string())
            .ok_or_else(|| anyhow!("Settings path has no file name: {:?}", settings_path))?;

        let (event_tx, event_rx): (Sender<SettingsEvent>, Receiver<SettingsEvent>) =
            mpsc::channel();
        let (notify_tx, notify_rx): (Sender<Event>, Receiver<Event>) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    let _ = notify_tx.send(event);
                }
            },
            Config::default(),
        )
        .map_err(|e| anyhow!("Failed to create file watcher: {}", e))?;

        watcher
            .watch(&watch_dir, RecursiveMode::NonRecursive)
            .map_err(|e| anyhow!("Failed to watch path {:?}: {}", watch_dir, e))?;

        let reload_path = settings_path.clone();

        // Spawn debounce thread
        std::thread::spawn(move || {
            let mut last_event_time: Option<Instant> = None;

            loop {
                match notify_rx.recv_timeout(Duration::from_millis(50)) {
                    Ok(event) => {
                        let touches_settings = event
                            .paths
                            .iter()
                            .any(|p| p.file_name() == Some(file_name.as_os_str()));
                        if touches_settings
                            && matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
                        {
                            last_event_time = Some(Instant::now());
                        }
                    }
                    Err(mpsc::RecvTimeoutError::Timeout) => {
                        let settled = last_event_time
                            .map(|last| last.elapsed() >= debounce_duration)
                            .unwrap_or(false);
                        if !settled {
                            continue;
                        }
                        last_event_time = None;

                        if event_tx.send(reload(&reload_path)).is_err() {
                            break;
                        }
                    }
                    Err(mpsc::RecvTimeoutError::Disconnected) => {
                        // Watcher was dropped, exit thread
                        break;
                    }
                }
            }
        });

        Ok(Self {
            _watcher: watcher,
            event_receiver: event_rx,
            settings_path,
        })
    }

    /// Try to receive the next settings event (non-blocking)
    pub fn try_recv(&self) -> Option<SettingsEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Receive all pending settings events
    pub fn recv_all(&self) -> Vec<SettingsEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }

    /// Most recent valid settings among the pending events, if any
    pub fn latest(&self) -> Option<AdvancedSettings> {
        self.recv_all()
            .into_iter()
            .filter_map(|event| match event {
                SettingsEvent::Reloaded(settings) => Some(settings),
                SettingsEvent::Error(_) => None,
            })
            .last()
    }

    /// Get the settings file being watched
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }
}

/// Re-read the settings file after a change
fn reload(path: &Path) -> SettingsEvent {
    match AdvancedSettings::load(path) {
        Ok(settings) => {
            debug!(?path, "settings reloaded");
            SettingsEvent::Reloaded(settings)
        }
        Err(e) => {
            warn!(?path, error = %e, "settings reload failed");
            SettingsEvent::Error(format!("Failed to load {:?}: {:#}", path, e))
        }
    }
}
