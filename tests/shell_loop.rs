// tests/shell_loop.rs

use std::error::Error;
use std::sync::Arc;

use tokio::sync::mpsc;

use cncwatch::events::{EventSink, MemorySink, Severity};
use cncwatch::fs::{FileSystem, RealFileSystem};
use cncwatch::pairing::{PairMatcher, PairingRule};
use cncwatch::session::WatchSession;
use cncwatch::shell::{run_shell, Shell, ShellEvent};
use cncwatch_test_utils::{init_tracing, TelemetryDir};

type TestResult = Result<(), Box<dyn Error>>;

fn shell(sink: &MemorySink) -> Shell<Vec<u8>> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let sink: Arc<dyn EventSink> = Arc::new(sink.clone());
    let session = WatchSession::new(PairMatcher::new(
        PairingRule::default(),
        Arc::clone(&fs),
        Arc::clone(&sink),
    ));
    Shell::new(session, fs, sink, Vec::new())
}

#[tokio::test(flavor = "multi_thread")]
async fn scripted_session_runs_to_exit() -> TestResult {
    init_tracing();
    let dir = TelemetryDir::new()?;
    let sink = MemorySink::new();

    let (tx, rx) = mpsc::channel(8);
    for line in [
        format!("setdir {}", dir.path().display()),
        "start".to_string(),
        "start".to_string(),
        "stop".to_string(),
        "exit".to_string(),
        // Never reached.
        "start".to_string(),
    ] {
        tx.send(ShellEvent::Line(line)).await?;
    }

    run_shell(shell(&sink), rx).await?;

    assert_eq!(sink.count_containing(Severity::Info, "Starting directory monitoring on"), 1);
    assert_eq!(sink.count_containing(Severity::Error, "already running"), 1);
    assert_eq!(sink.count_containing(Severity::Info, "successfully stopped and joined"), 1);
    assert_eq!(sink.count_containing(Severity::Info, "Exiting the CNC Data Analysis Monitor"), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn interrupt_shuts_down_running_session() -> TestResult {
    init_tracing();
    let dir = TelemetryDir::new()?;
    let sink = MemorySink::new();

    let (tx, rx) = mpsc::channel(8);
    tx.send(ShellEvent::Line(format!("setdir {}", dir.path().display()))).await?;
    tx.send(ShellEvent::Line("start".to_string())).await?;
    tx.send(ShellEvent::Interrupted).await?;

    run_shell(shell(&sink), rx).await?;

    assert_eq!(sink.count_containing(Severity::Warning, "Stopped directory monitoring"), 1);
    assert_eq!(sink.count_containing(Severity::Info, "Exiting"), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn closed_input_exits_cleanly() -> TestResult {
    init_tracing();
    let sink = MemorySink::new();

    let (tx, rx) = mpsc::channel(8);
    drop(tx);

    run_shell(shell(&sink), rx).await?;
    assert_eq!(sink.count_containing(Severity::Info, "Exiting"), 1);
    Ok(())
}
