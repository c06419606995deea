// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod events;
pub mod fs;
pub mod logging;
pub mod pairing;
pub mod session;
pub mod shell;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::{default_config_path, load_or_default, ConfigFile};
use crate::events::{EventSink, TracingSink};
use crate::fs::{FileSystem, RealFileSystem};
use crate::pairing::PairMatcher;
use crate::session::{SessionOptions, WatchSession};
use crate::shell::{run_shell, spawn_ctrl_c, spawn_stdin_reader, Shell, ShellEvent};

/// Load the config named on the command line, or the default one if present.
pub fn load_config(args: &CliArgs) -> crate::errors::Result<ConfigFile> {
    match &args.config {
        Some(path) => load_or_default(path, true),
        None => load_or_default(default_config_path(), false),
    }
}

/// Session options after applying CLI overrides to the config.
pub fn session_options(args: &CliArgs, cfg: &ConfigFile) -> SessionOptions {
    let mut options = cfg.session_options();
    if let Some(ms) = args.shutdown_timeout_ms {
        options.shutdown_timeout = Some(Duration::from_millis(ms));
    }
    options
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - the real filesystem and the `tracing`-backed event sink
/// - the pair matcher and the watch session
/// - the initial `--dir` / `--start` (or `[watch]`) settings
/// - the interactive shell, fed by stdin and Ctrl-C
pub async fn run(args: CliArgs, cfg: ConfigFile) -> Result<()> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let sink: Arc<dyn EventSink> = Arc::new(TracingSink);

    let matcher = PairMatcher::new(cfg.pairing_rule().clone(), Arc::clone(&fs), Arc::clone(&sink));
    let options = session_options(&args, &cfg);
    debug!(?options, rule = ?cfg.pairing_rule(), "session configured");

    let mut session = WatchSession::new(matcher).with_options(options);

    let autostart = args.start || cfg.watch.autostart;
    match args.dir.as_ref().or(cfg.watch.dir.as_ref()) {
        Some(dir) => {
            if session.set_target(dir).is_ok() && autostart {
                let _ = session.start();
            }
        }
        None if autostart => {
            // Reports NoTargetConfigured.
            let _ = session.start();
        }
        None => {}
    }

    let mut shell = Shell::new(session, fs, sink, io::stdout());
    shell.intro();

    let (tx, rx) = mpsc::channel::<ShellEvent>(16);
    spawn_stdin_reader(tx.clone())?;
    spawn_ctrl_c(tx);

    run_shell(shell, rx).await
}
