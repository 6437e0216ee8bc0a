//! Watch command implementation - file watching and live re-checking

use anyhow::Result;
use camino::Utf8PathBuf;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_types::event::{Event, EventKind};
use std::collections::HashSet;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crate::check::check_file;
use crate::cli::{OutputFormat, WatchArgs};
use crate::config::load_config;
use crate::output::{SerializableDiagnostic, print_diagnostic};

/// Timeout duration for receiving events from the file watcher in watch mode.
/// Controls how often we check if there are pending file changes.
const WATCHER_RX_TIMEOUT_MS: u64 = 200;

pub fn run_watch(args: WatchArgs, config_path: Option<Utf8PathBuf>) -> Result<()> {
    let config = load_config(config_path.as_ref())?;
    let checker = config.map(|c| c.checker).unwrap_or_default();

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    // Extensions the checker declares; absent means re-check everything.
    let watched_exts: Option<HashSet<String>> = checker.extensions.as_ref().map(|exts| {
        exts.iter()
            .map(|e| e.to_ascii_lowercase())
            .collect()
    });

    let (tx, rx) = mpsc::channel();
    let mut watcher: RecommendedWatcher =
        notify::recommended_watcher(move |res: notify::Result<Event>| {
            if let Ok(event) = res {
                tx.send(event).ok();
            }
        })?;

    for path in &args.paths {
        watcher.watch(path.as_std_path(), RecursiveMode::Recursive)?;
    }

    println!("Watching {} path(s) for source changes...", args.paths.len());

    let running = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || {
            running.store(false, std::sync::atomic::Ordering::SeqCst);
        })?;
    }

    let mut last_run = Instant::now();
    while running.load(std::sync::atomic::Ordering::SeqCst) {
        if let Ok(event) = rx.recv_timeout(Duration::from_millis(WATCHER_RX_TIMEOUT_MS)) {
            if !is_relevant(&event) {
                continue;
            }

            // Debounce bursts (wait half the debounce interval since last run)
            if last_run.elapsed() < Duration::from_millis(args.debounce_ms / 2) {
                continue;
            }

            let mut files = Vec::new();
            for path in &event.paths {
                let Ok(p) = Utf8PathBuf::from_path_buf(path.to_owned()) else {
                    continue;
                };

                if let Some(ref allowed) = watched_exts {
                    let Some(ext) = p.extension().map(str::to_ascii_lowercase) else {
                        continue;
                    };
                    if !allowed.contains(ext.as_str()) {
                        continue;
                    }
                }

                files.push(p);
            }
            if files.is_empty() {
                continue;
            }

            let mut found = 0usize;
            let mut json_out: Vec<SerializableDiagnostic> = Vec::new();
            for path in files {
                // If the file vanished between the event and processing, ignore it.
                if !path.as_std_path().exists() {
                    continue;
                }

                let sink = check_file(&path, args.bin.as_deref(), &[], &checker)?;
                for (file, diagnostics) in sink.files() {
                    for diag in diagnostics {
                        match format {
                            OutputFormat::Human => print_diagnostic(file, diag),
                            OutputFormat::Json => {
                                json_out.push(SerializableDiagnostic::new(file, diag));
                            }
                        }
                        found += 1;
                    }
                }
            }

            if matches!(format, OutputFormat::Json) {
                println!("{}", serde_json::to_string_pretty(&json_out)?);
            }

            if found > 0 {
                println!("{found} diagnostic(s)");
            }

            last_run = Instant::now();
        }
    }

    Ok(())
}

const fn is_relevant(event: &Event) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
}
