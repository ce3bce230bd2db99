//! Headless driver for the tabsift panel.
//!
//! Runs the navigation core against the command-backed item source and an
//! in-memory hotkey registry, reading one input per stdin line and writing
//! one JSON document per output line.
//!
//! # Input
//!
//! ```text
//! key <combination>     key press, e.g. `key Control+j` or `key Enter`
//! query <text>          search box contents (empty text clears it)
//! click <index> <y>     click on a row at pixel y of the viewport
//! activate <index>      double click on a row
//! hotkey <combination>  a global hotkey fired
//! toggle-mode           exact ↔ fuzzy
//! toggle-rows           compact ↔ expanded
//! web                   enter or leave web-search mode
//! close                 hide the panel
//! tick                  advance timers now
//! quit
//! ```
//!
//! # Output
//!
//! `{"type":"view",...}` after every render-worthy event, plus
//! `{"type":"window",...}` and `{"type":"scroll",...}` for window and scroll
//! instructions.

use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tabsift::app::{handle_event, Action, AppState, Event};
use tabsift::services::CommandBridge;
use tabsift::settings::KeyPress;
use tabsift::shortcuts::{MemoryHotkeys, ReconcileReport, ShortcutManager};
use tabsift::worker::{ItemWorker, WorkerHandle};
use tabsift::{initialize, observability, Config, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// One parsed stdin line.
#[derive(Debug, Clone, PartialEq)]
enum Input {
    Event(Event),
    Hotkey(String),
    Quit,
}

struct Driver {
    state: AppState,
    worker: WorkerHandle,
    shortcuts: ShortcutManager<MemoryHotkeys>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args: BTreeMap<String, String> = std::env::args()
        .skip(1)
        .filter_map(|arg| {
            arg.split_once('=')
                .map(|(key, value)| (key.to_string(), value.to_string()))
        })
        .collect();

    let config = Config::from_map(&args);
    observability::init_tracing(&config);

    tracing::info!(
        item_command = %config.item_command,
        startup_context = ?config.startup_context,
        "tabsift starting"
    );

    let state = initialize(&config)?;

    let bridge = Arc::new(CommandBridge::new(config.item_command.clone()));
    let worker = ItemWorker::new(bridge.clone(), bridge).spawn();

    let mut driver = Driver {
        state,
        worker,
        shortcuts: ShortcutManager::new(MemoryHotkeys::new()),
    };

    let globals = driver.state.settings.shortcuts.global_bindings();
    let report = driver.shortcuts.apply(globals).await;
    log_report(&report);

    driver.dispatch(Event::ShowPanel(config.startup_context)).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::debug!("stdin closed");
                    break;
                };
                match parse_input(&line) {
                    Some(Input::Quit) => break,
                    Some(Input::Hotkey(combination)) => {
                        match driver.shortcuts.hotkeys().pressed(&combination) {
                            Some(key) => driver.dispatch(Event::GlobalShortcut(key)).await?,
                            None => tracing::debug!(combination = %combination, "no hotkey registered"),
                        }
                    }
                    Some(Input::Event(event)) => driver.dispatch(event).await?,
                    None => tracing::warn!(line = %line, "unrecognized input"),
                }
            }
            response = driver.worker.recv() => {
                let Some(response) = response else {
                    tracing::error!("worker stopped");
                    break;
                };
                driver.dispatch(Event::WorkerResponse(response)).await?;
            }
            _ = ticker.tick() => {
                driver.dispatch(Event::Tick).await?;
            }
        }
    }

    tracing::info!("tabsift exiting");
    Ok(())
}

impl Driver {
    async fn dispatch(&mut self, event: Event) -> Result<()> {
        let (render, actions) = handle_event(&mut self.state, &event, Instant::now())?;

        for action in actions {
            self.execute(action).await?;
        }

        if render {
            let now_ms = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default();
            let view = self.state.compute_viewmodel(now_ms);
            emit(&json!({ "type": "view", "view": view }));
        }
        Ok(())
    }

    async fn execute(&mut self, action: Action) -> Result<()> {
        match action {
            Action::ShowWindow => emit(&json!({ "type": "window", "visible": true })),
            Action::HideWindow => emit(&json!({ "type": "window", "visible": false })),
            Action::PostToWorker(message) => {
                tracing::debug!(operation = message.operation(), "posting to worker");
                self.worker.post(message)?;
            }
            Action::ScrollTo(scroll) => emit(&json!({ "type": "scroll", "scroll": scroll })),
            Action::ApplyShortcuts(bindings) => {
                let report = self.shortcuts.apply(bindings).await;
                log_report(&report);
            }
        }
        Ok(())
    }
}

fn emit(value: &serde_json::Value) {
    println!("{value}");
}

fn log_report(report: &ReconcileReport) {
    tracing::info!(
        registered = report.registered.len(),
        unregistered = report.unregistered.len(),
        failures = report.failures.len(),
        "global shortcuts reconciled"
    );
    for (key, error) in &report.failures {
        tracing::warn!(key = %key, error = %error, "global shortcut not applied");
    }
}

fn parse_input(line: &str) -> Option<Input> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

    let event = match command {
        "quit" => return Some(Input::Quit),
        "hotkey" => return Some(Input::Hotkey(rest.trim().to_string())),
        "key" => Event::Key(KeyPress::parse(rest)?),
        "query" => Event::QueryChanged(rest.to_string()),
        "click" => {
            let mut parts = rest.split_whitespace();
            let index = parts.next()?.parse().ok()?;
            let y = parts.next()?.parse().ok()?;
            Event::Click { index, y }
        }
        "activate" => Event::Activate {
            index: rest.trim().parse().ok()?,
        },
        "toggle-mode" => Event::ToggleSearchMode,
        "toggle-rows" => Event::ToggleRowDisplay,
        "web" => Event::ToggleWebSearch,
        "close" => Event::ClosePanel,
        "tick" => Event::Tick,
        _ => return None,
    };
    Some(Input::Event(event))
}
