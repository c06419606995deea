// src/shell/mod.rs

//! Interactive command shell driving a [`WatchSession`].
//!
//! The shell only translates operator commands into session calls and
//! prints listings and help text. Errors from the session have already been
//! reported through the event sink, so the shell just carries on.

use std::fmt::Display;
use std::io::Write;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use tracing::debug;

use crate::events::{EventSink, Severity};
use crate::fs::FileSystem;
use crate::session::WatchSession;

pub mod command;
pub mod input;

pub use command::Command;
pub use input::{run_shell, spawn_ctrl_c, spawn_stdin_reader, ShellEvent};

pub const PROMPT: &str = "(command): ";

pub const BANNER: &str = r"
    +------------------------------------------------+
    |                                                |
    |    C N C W A T C H                             |
    |    telemetry pairing monitor                   |
    |                                                |
    +------------------------------------------------+
";

pub const INTRO: &str = "
    Welcome to the CNC Data Analysis Monitor.
    Watches a directory for TDMS data and index files and reports each
    recording once both halves have arrived.
    Type help or ? to list commands.
";

pub struct Shell<W: Write> {
    session: WatchSession,
    fs: Arc<dyn FileSystem>,
    sink: Arc<dyn EventSink>,
    out: W,
}

impl<W: Write> std::fmt::Debug for Shell<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl<W: Write> Shell<W> {
    pub fn new(
        session: WatchSession,
        fs: Arc<dyn FileSystem>,
        sink: Arc<dyn EventSink>,
        out: W,
    ) -> Self {
        Self {
            session,
            fs,
            sink,
            out,
        }
    }

    pub fn session(&self) -> &WatchSession {
        &self.session
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    fn say(&mut self, text: impl Display) {
        if let Err(err) = writeln!(self.out, "{text}").and_then(|_| self.out.flush()) {
            debug!(error = %err, "failed to write shell output");
        }
    }

    pub fn intro(&mut self) {
        self.say(format_args!("{BANNER}{INTRO}"));
    }

    pub fn prompt(&mut self) {
        if let Err(err) = write!(self.out, "{PROMPT}").and_then(|_| self.out.flush()) {
            debug!(error = %err, "failed to write prompt");
        }
    }

    pub fn execute_line(&mut self, line: &str) -> ControlFlow<()> {
        self.execute(Command::parse(line))
    }

    /// Run one command. `Break` means the shell should exit.
    pub fn execute(&mut self, command: Command) -> ControlFlow<()> {
        debug!(?command, "executing shell command");
        match command {
            Command::SetDir(path) => {
                if let Some(path) = self.path_or_cwd(path) {
                    // Failures are reported by the session itself.
                    let _ = self.session.set_target(path);
                }
            }
            Command::Start => {
                let _ = self.session.start();
            }
            Command::Stop => {
                let _ = self.session.stop();
            }
            Command::Ls(path) => {
                if let Some(path) = self.path_or_cwd(path) {
                    self.list(&path);
                }
            }
            Command::Cd(path) => self.change_dir(&path),
            Command::Clr => {
                if let Err(err) = write!(self.out, "\x1B[2J\x1B[1;1H") {
                    debug!(error = %err, "failed to clear screen");
                }
                self.intro();
            }
            Command::Help(None) => self.say(command::GENERAL_HELP),
            Command::Help(Some(name)) => match command::command_help(&name) {
                Some(text) => self.say(text),
                None => self.say(format_args!("No help available for {name}")),
            },
            Command::Exit => {
                self.session.shutdown();
                self.sink
                    .emit(Severity::Info, "Exiting the CNC Data Analysis Monitor");
                return ControlFlow::Break(());
            }
            Command::Empty => {}
            Command::Unknown(word) => self.sink.emit(
                Severity::Error,
                &format!("Unknown command: {word}. Type help or ? to list commands."),
            ),
        }
        ControlFlow::Continue(())
    }

    fn path_or_cwd(&self, path: Option<String>) -> Option<PathBuf> {
        match path {
            Some(p) => Some(PathBuf::from(p)),
            None => match std::env::current_dir() {
                Ok(cwd) => Some(cwd),
                Err(err) => {
                    self.sink.emit(
                        Severity::Error,
                        &format!("Cannot resolve the current directory: {err}"),
                    );
                    None
                }
            },
        }
    }

    fn list(&mut self, path: &Path) {
        if !self.fs.is_dir(path) {
            self.sink.emit(
                Severity::Error,
                &format!("Invalid directory: {}", path.display()),
            );
            return;
        }

        let mut entries = match self.fs.list_dir(path) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(error = %err, "directory listing failed");
                self.sink.emit(
                    Severity::Error,
                    &format!("Access denied: {}", path.display()),
                );
                return;
            }
        };
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        let shown = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        self.say(format_args!("Directory: {}", shown.display()));
        for entry in entries {
            let mtime: DateTime<Local> = entry.modified.into();
            let marker = if entry.is_dir { "<DIR>" } else { "" };
            self.say(format_args!(
                "{} {:5} {:10} {}",
                mtime.format("%Y-%m-%d %H:%M:%S"),
                marker,
                entry.size,
                entry.name
            ));
        }
    }

    fn change_dir(&mut self, path: &str) {
        let target = Path::new(path);
        if path.is_empty() || !self.fs.is_dir(target) {
            self.sink
                .emit(Severity::Error, &format!("Invalid directory: {path}"));
            return;
        }
        match std::env::set_current_dir(target) {
            Ok(()) => self.say(format_args!("Changed directory to {path}")),
            Err(err) => self.sink.emit(
                Severity::Error,
                &format!("Cannot change directory to {path}: {err}"),
            ),
        }
    }
}
