use std::sync::Arc;

use cncwatch::events::MemorySink;
use cncwatch::fs::RealFileSystem;
use cncwatch::pairing::{PairMatcher, PairingRule};
use cncwatch::session::WatchSession;

/// Session on the real filesystem, reporting into `sink`.
pub fn disk_session(sink: &MemorySink) -> WatchSession {
    WatchSession::new(PairMatcher::new(
        PairingRule::default(),
        Arc::new(RealFileSystem),
        Arc::new(sink.clone()),
    ))
}
