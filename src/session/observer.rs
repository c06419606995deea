// src/session/observer.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use notify::event::CreateKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::debug;

use crate::errors::SessionError;
use crate::events::Severity;
use crate::pairing::{PairMatcher, Recording, Verdict};

const OBSERVER_THREAD_NAME: &str = "cncwatch-observer";

/// Messages consumed by the observer thread, in arrival order.
#[derive(Debug)]
enum ObserverMessage {
    Notify(notify::Result<Event>),
    Shutdown,
}

/// A live, non-recursive watch on one directory.
///
/// The `notify` backend only forwards raw events into a channel; a dedicated
/// thread drains that channel and runs the [`PairMatcher`] on each creation
/// event. Stopping the handle drops the watcher, queues a shutdown marker
/// behind any pending events and joins the thread, so nothing is classified
/// once [`ObservationHandle::stop`] has returned.
pub struct ObservationHandle {
    target: PathBuf,
    watcher: Option<RecommendedWatcher>,
    control_tx: Sender<ObserverMessage>,
    done_rx: Receiver<()>,
    thread: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for ObservationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservationHandle")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl ObservationHandle {
    /// Install the watch on `target` and spawn the observer thread.
    ///
    /// The watch is active by the time this returns.
    pub fn spawn(
        target: &Path,
        matcher: Arc<PairMatcher>,
        ready_tx: Option<Sender<Recording>>,
    ) -> Result<Self, SessionError> {
        let (control_tx, control_rx) = crossbeam_channel::unbounded::<ObserverMessage>();
        let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(1);

        // Called synchronously by notify on its own thread.
        let mut watcher = RecommendedWatcher::new(
            {
                let tx = control_tx.clone();
                move |res: notify::Result<Event>| {
                    // Only fails once the observer thread is gone, at which
                    // point the event is no longer wanted.
                    let _ = tx.send(ObserverMessage::Notify(res));
                }
            },
            Config::default(),
        )?;

        watcher.watch(target, RecursiveMode::NonRecursive)?;

        let thread = thread::Builder::new()
            .name(OBSERVER_THREAD_NAME.to_string())
            .spawn(move || {
                // Dropped on exit (including unwinding), which disconnects
                // `done_rx` and unblocks a bounded stop.
                let _done = done_tx;
                observe(control_rx, &matcher, ready_tx.as_ref());
            })
            .map_err(SessionError::Spawn)?;

        debug!(dir = ?target, "observer thread spawned");

        Ok(Self {
            target: target.to_path_buf(),
            watcher: Some(watcher),
            control_tx,
            done_rx,
            thread: Some(thread),
        })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Tear the watch down and wait for the observer thread to exit.
    ///
    /// With `timeout = None` this blocks until the thread is gone. With a
    /// timeout, a thread that does not exit in time is detached and
    /// `ShutdownTimeout` is returned.
    pub fn stop(mut self, timeout: Option<Duration>) -> Result<(), SessionError> {
        self.signal_shutdown();

        if let Some(limit) = timeout {
            match self.done_rx.recv_timeout(limit) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {}
                Err(RecvTimeoutError::Timeout) => {
                    // Detach: dropping the JoinHandle leaves the thread running.
                    drop(self.thread.take());
                    return Err(SessionError::ShutdownTimeout(limit));
                }
            }
        }

        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| SessionError::ObserverPanicked),
            None => Ok(()),
        }
    }

    fn signal_shutdown(&mut self) {
        // Unsubscribe before queuing the marker. Anything notify still
        // delivers after the marker is never classified.
        drop(self.watcher.take());
        let _ = self.control_tx.send(ObserverMessage::Shutdown);
    }
}

impl Drop for ObservationHandle {
    fn drop(&mut self) {
        if let Some(thread) = self.thread.take() {
            self.signal_shutdown();
            let _ = thread.join();
        }
    }
}

/// Observer thread body: classify creation events until shut down.
fn observe(
    rx: Receiver<ObserverMessage>,
    matcher: &PairMatcher,
    ready_tx: Option<&Sender<Recording>>,
) {
    for message in rx.iter() {
        match message {
            ObserverMessage::Shutdown => break,
            ObserverMessage::Notify(Ok(event)) => handle_event(event, matcher, ready_tx),
            ObserverMessage::Notify(Err(err)) => {
                matcher
                    .sink()
                    .emit(Severity::Error, &format!("File watch error: {err}"));
            }
        }
    }
    debug!("observer loop finished");
}

fn handle_event(event: Event, matcher: &PairMatcher, ready_tx: Option<&Sender<Recording>>) {
    let EventKind::Create(kind) = event.kind else {
        return;
    };
    debug!(?event, "received creation event");

    for path in &event.paths {
        let is_directory = match kind {
            CreateKind::Folder => true,
            CreateKind::File => false,
            // Some backends cannot tell; ask the filesystem.
            _ => matcher.fs().is_dir(path),
        };

        if let Some(Verdict::Paired { recording, .. }) = matcher.classify(path, is_directory) {
            if let Some(tx) = ready_tx {
                if tx.send(recording).is_err() {
                    debug!("recording consumer dropped; not forwarding");
                }
            }
        }
    }
}
