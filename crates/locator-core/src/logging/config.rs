use crate::logging::formatter::LogFormat;
use std::path::PathBuf;

/// Environment variable naming an optional log file
pub const LOG_FILE_ENV: &str = "LOCATOR_LOG_FILE";

/// Levels accepted by `with_level`
pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Where and how annotator diagnostics are written
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directive; a bare level or an `EnvFilter` expression
    pub level: String,
    pub file: Option<PathBuf>,
    /// Writes to stderr when set
    pub console: bool,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            file: std::env::var(LOG_FILE_ENV).ok().map(PathBuf::from),
            console: true,
            format: LogFormat::Text,
        }
    }
}

impl LoggingConfig {
    /// Overrides the level when one is given
    pub fn with_level(mut self, level: Option<String>) -> Self {
        if let Some(level) = level {
            self.level = level;
        }
        self
    }

    /// Overrides the log file when one is given
    pub fn with_file(mut self, file: Option<PathBuf>) -> Self {
        if file.is_some() {
            self.file = file;
        }
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn without_console(mut self) -> Self {
        self.console = false;
        self
    }

    /// Whether `level` is one of the plain level names
    pub fn is_known_level(level: &str) -> bool {
        LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_only_apply_when_present() {
        let base = LoggingConfig {
            level: "info".to_string(),
            file: Some(PathBuf::from("a.log")),
            console: true,
            format: LogFormat::Text,
        };
        let config = base
            .with_level(None)
            .with_file(None)
            .with_format(LogFormat::Json);
        assert_eq!(config.level, "info");
        assert_eq!(config.file, Some(PathBuf::from("a.log")));
        assert_eq!(config.format, LogFormat::Json);

        let config = config
            .with_level(Some("trace".to_string()))
            .with_file(Some(PathBuf::from("b.log")))
            .without_console();
        assert_eq!(config.level, "trace");
        assert_eq!(config.file, Some(PathBuf::from("b.log")));
        assert!(!config.console);
    }

    #[test]
    fn test_known_levels() {
        assert!(LoggingConfig::is_known_level("WARN"));
        assert!(!LoggingConfig::is_known_level("verbose"));
    }
}
