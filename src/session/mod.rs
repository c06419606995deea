// src/session/mod.rs

//! Start/stop lifecycle of directory observation.
//!
//! A [`WatchSession`] is a two-state machine:
//!
//! ```text
//! Idle --start()--> Running --stop()/set_target()/shutdown()--> Idle
//! ```
//!
//! `Running` owns the one and only [`ObservationHandle`]. Every transition
//! and every rejected command is reported through the session's event sink;
//! rejected commands leave the state untouched.

use std::mem;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Sender;

use crate::errors::SessionError;
use crate::events::{EventSink, Severity};
use crate::pairing::{PairMatcher, Recording};

pub mod observer;

pub use observer::ObservationHandle;

/// Tunables for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Upper bound on how long `stop` waits for the observer thread.
    /// `None` waits indefinitely.
    pub shutdown_timeout: Option<Duration>,
}

/// Publicly observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Running,
}

#[derive(Debug)]
enum SessionState {
    Idle,
    Running(ObservationHandle),
}

#[derive(Debug)]
pub struct WatchSession {
    matcher: Arc<PairMatcher>,
    options: SessionOptions,
    ready_tx: Option<Sender<Recording>>,
    target: Option<PathBuf>,
    state: SessionState,
}

impl WatchSession {
    pub fn new(matcher: PairMatcher) -> Self {
        Self {
            matcher: Arc::new(matcher),
            options: SessionOptions::default(),
            ready_tx: None,
            target: None,
            state: SessionState::Idle,
        }
    }

    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    /// Forward every completed recording to `tx`.
    ///
    /// Only affects observations started after this call.
    pub fn with_ready_sender(mut self, tx: Sender<Recording>) -> Self {
        self.ready_tx = Some(tx);
        self
    }

    pub fn status(&self) -> SessionStatus {
        match self.state {
            SessionState::Idle => SessionStatus::Idle,
            SessionState::Running(_) => SessionStatus::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status() == SessionStatus::Running
    }

    pub fn target(&self) -> Option<&Path> {
        self.target.as_deref()
    }

    fn sink(&self) -> &Arc<dyn EventSink> {
        self.matcher.sink()
    }

    /// Report a rejected command and hand the error back.
    fn reject<T>(&self, err: SessionError) -> Result<T, SessionError> {
        self.sink().emit(Severity::Error, &err.to_string());
        Err(err)
    }

    /// Select the directory to observe.
    ///
    /// A running observation is stopped and joined before the new target is
    /// accepted, so two directories are never watched at once.
    pub fn set_target(&mut self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let path = path.as_ref();
        let fs = self.matcher.fs();
        if !fs.is_dir(path) || !fs.can_list(path) {
            return self.reject(SessionError::InvalidDirectory(path.to_path_buf()));
        }

        if self.is_running() {
            self.halt()?;
        }

        self.target = Some(path.to_path_buf());
        self.sink()
            .emit(Severity::Info, &format!("Set directory to {}", path.display()));
        Ok(())
    }

    /// Begin observing the current target on a background thread.
    pub fn start(&mut self) -> Result<(), SessionError> {
        let Some(target) = self.target.clone() else {
            return self.reject(SessionError::NoTargetConfigured);
        };
        if self.is_running() {
            return self.reject(SessionError::AlreadyRunning);
        }

        let handle = match ObservationHandle::spawn(
            &target,
            Arc::clone(&self.matcher),
            self.ready_tx.clone(),
        ) {
            Ok(handle) => handle,
            Err(err) => return self.reject(err),
        };

        self.state = SessionState::Running(handle);
        self.sink().emit(
            Severity::Info,
            &format!("Starting directory monitoring on: {}", target.display()),
        );
        Ok(())
    }

    /// Stop observing and wait for the observer thread to exit.
    pub fn stop(&mut self) -> Result<(), SessionError> {
        if !self.is_running() {
            return self.reject(SessionError::NotRunning);
        }
        self.halt()
    }

    /// Stop if running; never fails. Called on exit and from `Drop`.
    pub fn shutdown(&mut self) {
        if !self.is_running() {
            return;
        }
        if let Err(err) = self.halt() {
            self.sink().emit(
                Severity::Critical,
                &format!("Failed to shut down directory monitoring: {err}"),
            );
        }
    }

    fn halt(&mut self) -> Result<(), SessionError> {
        let SessionState::Running(handle) = mem::replace(&mut self.state, SessionState::Idle)
        else {
            return Ok(());
        };

        self.sink()
            .emit(Severity::Warning, "Stopped directory monitoring");
        match handle.stop(self.options.shutdown_timeout) {
            Ok(()) => {
                self.sink().emit(
                    Severity::Info,
                    "Observer has been successfully stopped and joined",
                );
                Ok(())
            }
            Err(err) => self.reject(err),
        }
    }
}

impl Drop for WatchSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemorySink;
    use crate::fs::mock::MockFileSystem;
    use crate::fs::{DirEntryInfo, FileSystem, RealFileSystem};
    use crate::pairing::PairingRule;

    fn session_with(fs: Arc<dyn FileSystem>, sink: &MemorySink) -> WatchSession {
        WatchSession::new(PairMatcher::new(
            PairingRule::default(),
            fs,
            Arc::new(sink.clone()),
        ))
    }

    #[test]
    fn starts_idle_without_target() {
        let sink = MemorySink::new();
        let session = session_with(Arc::new(MockFileSystem::new()), &sink);
        assert_eq!(session.status(), SessionStatus::Idle);
        assert!(session.target().is_none());
    }

    #[test]
    fn invalid_directory_leaves_target_unchanged() {
        let fs = MockFileSystem::new();
        fs.add_dir("/data");
        fs.add_file("/data/file.tdms", 1);
        let sink = MemorySink::new();
        let mut session = session_with(Arc::new(fs), &sink);

        session.set_target("/data").unwrap();
        let err = session.set_target("/does/not/exist").unwrap_err();
        assert!(matches!(err, SessionError::InvalidDirectory(ref p) if p == Path::new("/does/not/exist")));

        let err = session.set_target("/data/file.tdms").unwrap_err();
        assert!(matches!(err, SessionError::InvalidDirectory(_)));

        assert_eq!(session.target(), Some(Path::new("/data")));
        assert_eq!(sink.count_containing(Severity::Error, "Invalid directory"), 2);
    }

    #[test]
    fn unreadable_directory_is_rejected() {
        let fs = MockFileSystem::new();
        fs.add_dir("/locked");
        fs.fail_exists_for("/locked");
        let sink = MemorySink::new();
        let mut session = session_with(Arc::new(fs), &sink);

        assert!(matches!(
            session.set_target("/locked"),
            Err(SessionError::InvalidDirectory(_))
        ));
        assert!(session.target().is_none());
    }

    /// Directory whose entries keep vanishing while they are listed.
    #[derive(Debug)]
    struct ChurningDir(MockFileSystem);

    impl FileSystem for ChurningDir {
        fn exists(&self, path: &Path) -> anyhow::Result<bool> {
            self.0.exists(path)
        }

        fn is_dir(&self, path: &Path) -> bool {
            self.0.is_dir(path)
        }

        fn can_list(&self, path: &Path) -> bool {
            self.0.can_list(path)
        }

        fn list_dir(&self, path: &Path) -> anyhow::Result<Vec<DirEntryInfo>> {
            anyhow::bail!("entry of {:?} removed while listing", path)
        }
    }

    #[test]
    fn set_target_only_needs_the_directory_to_open() {
        let fs = MockFileSystem::new();
        fs.add_file("/drop/part1.tmp", 1);
        let sink = MemorySink::new();
        let mut session = session_with(Arc::new(ChurningDir(fs)), &sink);

        session.set_target("/drop").unwrap();
        assert_eq!(session.target(), Some(Path::new("/drop")));
        assert!(sink.messages_at(Severity::Error).is_empty());
    }

    #[test]
    fn start_requires_target() {
        let sink = MemorySink::new();
        let mut session = session_with(Arc::new(MockFileSystem::new()), &sink);

        assert!(matches!(session.start(), Err(SessionError::NoTargetConfigured)));
        assert_eq!(session.status(), SessionStatus::Idle);
        assert_eq!(sink.count_containing(Severity::Error, "No directory set"), 1);
    }

    #[test]
    fn stop_without_start_is_rejected() {
        let sink = MemorySink::new();
        let mut session = session_with(Arc::new(MockFileSystem::new()), &sink);

        assert!(matches!(session.stop(), Err(SessionError::NotRunning)));
        assert_eq!(sink.count_containing(Severity::Error, "not running"), 1);
    }

    #[test]
    fn shutdown_when_idle_is_a_noop() {
        let sink = MemorySink::new();
        let mut session = session_with(Arc::new(MockFileSystem::new()), &sink);

        session.shutdown();
        session.shutdown();
        assert!(sink.is_empty());
    }

    #[test]
    fn start_stop_cycle_on_real_directory() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MemorySink::new();
        let mut session = session_with(Arc::new(RealFileSystem), &sink);

        session.set_target(dir.path()).unwrap();
        session.start().unwrap();
        assert_eq!(session.status(), SessionStatus::Running);
        assert!(matches!(session.start(), Err(SessionError::AlreadyRunning)));
        assert_eq!(session.status(), SessionStatus::Running);

        session.stop().unwrap();
        assert_eq!(session.status(), SessionStatus::Idle);
        assert!(matches!(session.stop(), Err(SessionError::NotRunning)));

        // A stopped session can be started again.
        session.start().unwrap();
        session.shutdown();
        assert_eq!(session.status(), SessionStatus::Idle);
        assert_eq!(sink.count_containing(Severity::Info, "successfully stopped and joined"), 2);
    }

    #[test]
    fn retargeting_stops_running_observation() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let sink = MemorySink::new();
        let mut session = session_with(Arc::new(RealFileSystem), &sink);

        session.set_target(first.path()).unwrap();
        session.start().unwrap();
        session.set_target(second.path()).unwrap();

        assert_eq!(session.status(), SessionStatus::Idle);
        assert_eq!(session.target(), Some(second.path()));
        assert_eq!(sink.count_containing(Severity::Warning, "Stopped directory monitoring"), 1);
    }

    #[test]
    fn bounded_stop_succeeds_for_responsive_observer() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MemorySink::new();
        let mut session = session_with(Arc::new(RealFileSystem), &sink).with_options(SessionOptions {
            shutdown_timeout: Some(Duration::from_secs(5)),
        });

        session.set_target(dir.path()).unwrap();
        session.start().unwrap();
        session.stop().unwrap();
        assert_eq!(session.status(), SessionStatus::Idle);
    }
}
