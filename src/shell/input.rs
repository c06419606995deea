// src/shell/input.rs

//! Feeding operator input into the shell.
//!
//! Stdin is read on a plain thread (reads block) and Ctrl-C is caught by a
//! Tokio task; both push [`ShellEvent`]s into one channel that
//! [`run_shell`] drains in order.

use std::io::{self, BufRead, Write};
use std::thread;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::{Command, Shell};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    Line(String),
    /// Ctrl-C.
    Interrupted,
    /// End of input (e.g. Ctrl-D or a closed pipe).
    InputClosed,
}

/// Read stdin line by line on a dedicated thread.
///
/// The thread is never joined: it stays blocked in `read_line` until the
/// process exits.
pub fn spawn_stdin_reader(tx: mpsc::Sender<ShellEvent>) -> io::Result<()> {
    thread::Builder::new()
        .name("cncwatch-stdin".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            let mut lines = stdin.lock();
            loop {
                let mut line = String::new();
                let event = match lines.read_line(&mut line) {
                    Ok(0) => ShellEvent::InputClosed,
                    Ok(_) => ShellEvent::Line(line),
                    Err(err) => {
                        eprintln!("cncwatch: failed to read input: {err}");
                        ShellEvent::InputClosed
                    }
                };
                let closed = event == ShellEvent::InputClosed;
                if tx.blocking_send(event).is_err() || closed {
                    break;
                }
            }
        })?;
    Ok(())
}

/// Translate Ctrl-C into `ShellEvent::Interrupted`.
pub fn spawn_ctrl_c(tx: mpsc::Sender<ShellEvent>) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        let _ = tx.send(ShellEvent::Interrupted).await;
    });
}

/// Main shell loop.
///
/// Session commands may block (stopping joins the observer thread), so each
/// one runs under `block_in_place`; this requires the multi-threaded runtime.
pub async fn run_shell<W: Write>(mut shell: Shell<W>, mut rx: mpsc::Receiver<ShellEvent>) -> Result<()> {
    shell.prompt();

    loop {
        let command = match rx.recv().await {
            Some(ShellEvent::Line(line)) => Command::parse(&line),
            Some(ShellEvent::Interrupted) => {
                info!("interrupt received; exiting");
                Command::Exit
            }
            Some(ShellEvent::InputClosed) | None => {
                debug!("input closed; exiting");
                Command::Exit
            }
        };

        let flow = tokio::task::block_in_place(|| shell.execute(command));
        if flow.is_break() {
            break;
        }
        shell.prompt();
    }

    Ok(())
}
