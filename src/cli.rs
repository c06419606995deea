// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `cncwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cncwatch",
    version,
    about = "Watch a directory for paired CNC telemetry files (data + index).",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// If omitted, `Cncwatch.toml` in the current directory is used when it
    /// exists; otherwise built-in defaults apply.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory to monitor, as if typed with `setdir` at startup.
    #[arg(long, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Start monitoring immediately (requires a directory).
    #[arg(long)]
    pub start: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `[log].level`, then `CNCWATCH_LOG`, then `info` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Write a plain-text copy of the log to this file.
    #[arg(long, value_name = "PATH", conflicts_with = "no_log_file")]
    pub log_file: Option<PathBuf>,

    /// Disable the log file.
    #[arg(long)]
    pub no_log_file: bool,

    /// Give up waiting for the observer thread after this many milliseconds.
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub shutdown_timeout_ms: Option<u64>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_command_line() {
        let args = CliArgs::try_parse_from([
            "cncwatch",
            "--dir",
            "/data",
            "--start",
            "--log-level",
            "debug",
            "--shutdown-timeout-ms",
            "2500",
        ])
        .unwrap();

        assert_eq!(args.dir, Some(PathBuf::from("/data")));
        assert!(args.start);
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
        assert_eq!(args.shutdown_timeout_ms, Some(2500));
        assert!(args.config.is_none());
    }

    #[test]
    fn log_file_flags_conflict() {
        let res = CliArgs::try_parse_from(["cncwatch", "--log-file", "x.log", "--no-log-file"]);
        assert!(res.is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(CliArgs::try_parse_from(["cncwatch", "--shutdown-timeout-ms", "0"]).is_err());
    }
}
