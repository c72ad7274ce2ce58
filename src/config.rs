//! Runtime configuration from `DOBBY_*` environment variables.
//!
//! | variable                   | default          |
//! |----------------------------|------------------|
//! | `DOBBY_MODEL_DIR`          | `models`         |
//! | `DOBBY_DATA_DIR`           | `data`           |
//! | `DOBBY_REQUIRE_MANIFEST`   | `false`          |
//! | `DOBBY_BIND`               | `0.0.0.0:5000`   |
//! | `DOBBY_VOICE`              | `false`          |
//! | `DOBBY_STT_COMMAND`        | unset            |
//! | `DOBBY_TTS_COMMAND`        | platform voice   |
//! | `DOBBY_WAKE_PHRASE`        | `wake up dobby`  |
//! | `DOBBY_LOG_MODE`           | `auto`           |
//! | `DOBBY_LOG_FILE`           | `dobby.log`      |
//! | `DOBBY_SANITIZE_MAX_BYTES` | `16384`          |

use std::path::PathBuf;

use crate::adapters::sanitize::DEFAULT_SANITIZE_MAX_BYTES;

pub const DEFAULT_MODEL_DIR: &str = "models";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_BIND: &str = "0.0.0.0:5000";
pub const DEFAULT_WAKE_PHRASE: &str = "wake up dobby";
pub const DEFAULT_LOG_FILE: &str = "dobby.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// File when stdout is a terminal, stdout otherwise
    #[default]
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Self {
        match value.trim() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

/// Settings shared by both binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub model_dir: PathBuf,
    pub data_dir: PathBuf,
    pub require_manifest: bool,
    pub bind: String,
    pub voice: bool,
    pub stt_command: Option<String>,
    pub tts_command: Option<String>,
    pub wake_phrase: String,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
    pub sanitize_max_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    /// Read the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let flag = |name: &str| text(name).is_some_and(|v| parse_bool(&v));

        Self {
            model_dir: text("DOBBY_MODEL_DIR").map_or_else(|| DEFAULT_MODEL_DIR.into(), PathBuf::from),
            data_dir: text("DOBBY_DATA_DIR").map_or_else(|| DEFAULT_DATA_DIR.into(), PathBuf::from),
            require_manifest: flag("DOBBY_REQUIRE_MANIFEST"),
            bind: text("DOBBY_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            voice: flag("DOBBY_VOICE"),
            stt_command: text("DOBBY_STT_COMMAND"),
            tts_command: text("DOBBY_TTS_COMMAND"),
            wake_phrase: text("DOBBY_WAKE_PHRASE")
                .map_or_else(|| DEFAULT_WAKE_PHRASE.to_string(), |v| v.trim().to_lowercase()),
            log_mode: text("DOBBY_LOG_MODE").map_or(LogMode::Auto, |v| LogMode::parse(&v)),
            log_file: text("DOBBY_LOG_FILE").map_or_else(|| DEFAULT_LOG_FILE.into(), PathBuf::from),
            sanitize_max_bytes: text("DOBBY_SANITIZE_MAX_BYTES")
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|&v| v > 0)
                .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES),
        }
    }
}

/// `1`, `true`, `TRUE`, `yes` and `YES` are true; anything else is false.
#[must_use]
pub fn parse_bool(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "TRUE" | "yes" | "YES")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.model_dir, PathBuf::from("models"));
        assert_eq!(cfg.data_dir, PathBuf::from("data"));
        assert_eq!(cfg.bind, "0.0.0.0:5000");
        assert_eq!(cfg.wake_phrase, "wake up dobby");
        assert_eq!(cfg.log_mode, LogMode::Auto);
        assert_eq!(cfg.sanitize_max_bytes, DEFAULT_SANITIZE_MAX_BYTES);
        assert!(!cfg.voice);
        assert!(!cfg.require_manifest);
        assert!(cfg.stt_command.is_none());
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("DOBBY_MODEL_DIR", "/srv/models"),
            ("DOBBY_REQUIRE_MANIFEST", "yes"),
            ("DOBBY_VOICE", "1"),
            ("DOBBY_STT_COMMAND", "whisper-capture --once"),
            ("DOBBY_WAKE_PHRASE", "  Hey Dobby "),
            ("DOBBY_LOG_MODE", "stdout"),
            ("DOBBY_SANITIZE_MAX_BYTES", "4096"),
        ]);
        assert_eq!(cfg.model_dir, PathBuf::from("/srv/models"));
        assert!(cfg.require_manifest);
        assert!(cfg.voice);
        assert_eq!(cfg.stt_command.as_deref(), Some("whisper-capture --once"));
        assert_eq!(cfg.wake_phrase, "hey dobby");
        assert_eq!(cfg.log_mode, LogMode::Stdout);
        assert_eq!(cfg.sanitize_max_bytes, 4096);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let cfg = config(&[
            ("DOBBY_VOICE", "on"),
            ("DOBBY_SANITIZE_MAX_BYTES", "0"),
            ("DOBBY_LOG_MODE", "syslog"),
            ("DOBBY_TTS_COMMAND", "   "),
        ]);
        assert!(!cfg.voice);
        assert_eq!(cfg.sanitize_max_bytes, DEFAULT_SANITIZE_MAX_BYTES);
        assert_eq!(cfg.log_mode, LogMode::Auto);
        assert!(cfg.tts_command.is_none());
    }

    #[test]
    fn test_log_mode_resolution() {
        assert!(LogMode::Auto.use_file(true));
        assert!(!LogMode::Auto.use_file(false));
        assert!(LogMode::File.use_file(false));
        assert!(!LogMode::Stdout.use_file(true));
    }

    #[test]
    fn test_parse_bool() {
        for v in ["1", "true", "TRUE", "yes", "YES"] {
            assert!(parse_bool(v), "{v}");
        }
        for v in ["0", "false", "True", "no", ""] {
            assert!(!parse_bool(v), "{v}");
        }
    }
}
