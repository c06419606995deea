// src/config/validate.rs

use crate::config::model::{ConfigFile, LogSection, RawConfigFile};
use crate::errors::{CncwatchError, Result};
use crate::logging::parse_level_str;
use crate::pairing::PairingRule;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = CncwatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let rule = PairingRule::new(
            raw.watch.data_extension.clone(),
            raw.watch.index_extension.clone(),
        )?;
        validate_timeout(raw.watch.shutdown_timeout_ms)?;
        let level = validate_level(&raw.log)?;

        let mut log = raw.log;
        if log.file.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
            log.file = None;
        }

        Ok(ConfigFile::new_unchecked(raw.watch, log, rule, level))
    }
}

fn validate_timeout(timeout_ms: Option<u64>) -> Result<()> {
    if timeout_ms == Some(0) {
        return Err(CncwatchError::ConfigError(
            "[watch].shutdown_timeout_ms must be >= 1 (got 0); omit it to wait indefinitely"
                .to_string(),
        ));
    }
    Ok(())
}

fn validate_level(log: &LogSection) -> Result<Option<tracing::Level>> {
    match log.level.as_deref() {
        None => Ok(None),
        Some(s) => parse_level_str(s).map(Some).ok_or_else(|| {
            CncwatchError::ConfigError(format!(
                "[log].level '{s}' is not one of error, warn, info, debug, trace"
            ))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_src: &str) -> Result<ConfigFile> {
        let raw: RawConfigFile = toml::from_str(toml_src)?;
        ConfigFile::try_from(raw)
    }

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.pairing_rule(), &PairingRule::default());
        assert!(cfg.watch.dir.is_none());
        assert!(!cfg.watch.autostart);
        assert_eq!(cfg.session_options().shutdown_timeout, None);
        assert_eq!(cfg.log_file(), Some(std::path::Path::new("logs/cncwatch.log")));
    }

    #[test]
    fn empty_log_file_disables_file_logging() {
        let cfg = parse("[log]\nfile = \"\"\n").unwrap();
        assert!(cfg.log_file().is_none());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = parse("[watch]\nshutdown_timeout_ms = 0\n").unwrap_err();
        assert!(matches!(err, CncwatchError::ConfigError(msg) if msg.contains("shutdown_timeout_ms")));
    }

    #[test]
    fn unknown_level_is_rejected() {
        let err = parse("[log]\nlevel = \"loud\"\n").unwrap_err();
        assert!(matches!(err, CncwatchError::ConfigError(msg) if msg.contains("loud")));
    }

    #[test]
    fn warning_level_alias_is_accepted() {
        let cfg = parse("[log]\nlevel = \"warning\"\n").unwrap();
        assert_eq!(cfg.log_level(), Some(tracing::Level::WARN));
    }
}
