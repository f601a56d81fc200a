use anyhow::{Context, Result};
use locator_core::logging::config::{LoggingConfig, LOG_LEVELS};
use locator_core::logging::formatter::LogFormat;
use locator_jsx::{AttributeMode, SplitOptions};
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Project configuration (`locator.toml`)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build environments in which files are annotated
    pub environments: Vec<String>,
    /// Tag or component names that never receive an attribute
    pub ignore_component_names: Vec<String>,
    pub include: Vec<Pattern>,
    /// Checked before `include`
    pub exclude: Vec<Pattern>,
    /// Annotate `.vue` single-file components
    pub vue: bool,
    /// Annotate `.component.html` templates and inline `@Component` templates
    pub angular: bool,
    pub jsx: JsxConfig,
    pub output: OutputConfig,
    pub logging: LoggingSection,
}

/// File pattern: a plain substring, or `{ regex = "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Pattern {
    Substring(String),
    Regex { regex: String },
}

impl Pattern {
    pub fn regex(pattern: &str) -> Self {
        Self::Regex {
            regex: pattern.to_string(),
        }
    }

    pub fn compile(&self) -> Result<CompiledPattern> {
        Ok(match self {
            Pattern::Substring(s) => CompiledPattern::Substring(s.clone()),
            Pattern::Regex { regex } => CompiledPattern::Regex(
                Regex::new(regex).with_context(|| format!("Invalid pattern regex: {}", regex))?,
            ),
        })
    }
}

#[derive(Debug, Clone)]
pub enum CompiledPattern {
    Substring(String),
    Regex(Regex),
}

impl CompiledPattern {
    pub fn is_match(&self, id: &str) -> bool {
        match self {
            CompiledPattern::Substring(s) => id.contains(s.as_str()),
            CompiledPattern::Regex(re) => re.is_match(id),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JsxConfig {
    /// `path` (self-contained attribute), `id` (attribute plus side table) or
    /// `split` (legacy file/line/column attributes)
    pub mode: AttributeMode,
    /// Project root stripped from stored file paths
    pub cwd: Option<String>,
    /// `include_elements`, `exclude_elements` and `max_elements_per_file` of split mode
    #[serde(flatten)]
    pub split: SplitOptions,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default destination of `locator build`
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub file: Option<String>,
    pub format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environments: vec!["development".to_string()],
            ignore_component_names: Vec::new(),
            include: vec![
                Pattern::regex(r"\.[jt]sx?$"),
                Pattern::regex(r"\.vue$"),
                Pattern::regex(r"\.component\.html$"),
            ],
            exclude: vec![
                Pattern::regex("node_modules"),
                Pattern::regex(r"\.next"),
                Pattern::regex(r"\.nuxt"),
                Pattern::regex(r"\.output"),
            ],
            vue: true,
            angular: true,
            jsx: JsxConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingSection::default(),
        }
    }
}

impl Config {
    /// Loads configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the config file (can be absolute or relative)
    /// * `base_path` - Optional base path for resolving relative paths in config.
    ///   If None, uses the directory of the config file as base.
    pub fn load(path: &str, base_path: Option<&Path>) -> Result<Self> {
        let config_path = Path::new(path);
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        let base =
            base_path.unwrap_or_else(|| config_path.parent().unwrap_or_else(|| Path::new(".")));
        config.resolve_relative_paths(base);

        config.validate()?;
        Ok(config)
    }

    /// Loads the file when it exists, otherwise returns the defaults
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path, None)
        } else {
            tracing::debug!(path = %path, "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.environments.is_empty() {
            anyhow::bail!("environments cannot be empty");
        }
        if self.environments.iter().any(|env| env.trim().is_empty()) {
            anyhow::bail!("environments cannot contain empty names");
        }
        if self.include.is_empty() {
            anyhow::bail!("At least one include pattern must be configured");
        }

        for (idx, pattern) in self.include.iter().enumerate() {
            pattern
                .compile()
                .with_context(|| format!("include[{}] is invalid", idx))?;
        }
        for (idx, pattern) in self.exclude.iter().enumerate() {
            pattern
                .compile()
                .with_context(|| format!("exclude[{}] is invalid", idx))?;
        }

        if let Some(cwd) = &self.jsx.cwd {
            let path = Path::new(cwd);
            if !path.is_dir() {
                anyhow::bail!("jsx.cwd must be an existing directory: {}", cwd);
            }
        }

        if let Some(level) = &self.logging.level {
            if !LoggingConfig::is_known_level(level) {
                anyhow::bail!(
                    "Unknown log level: {}. Supported levels: {}",
                    level,
                    LOG_LEVELS.join(", ")
                );
            }
        }

        Ok(())
    }

    /// Makes `jsx.cwd`, `output.dir` and `logging.file` absolute against `base`
    pub fn resolve_relative_paths(&mut self, base: &Path) {
        for path in [
            &mut self.jsx.cwd,
            &mut self.output.dir,
            &mut self.logging.file,
        ]
        .into_iter()
        .flatten()
        {
            if Path::new(path.as_str()).is_relative() {
                *path = base.join(path.as_str()).to_string_lossy().into_owned();
            }
        }
    }

    pub fn compiled_include(&self) -> Result<Vec<CompiledPattern>> {
        self.include.iter().map(Pattern::compile).collect()
    }

    pub fn compiled_exclude(&self) -> Result<Vec<CompiledPattern>> {
        self.exclude.iter().map(Pattern::compile).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.environments, vec!["development"]);
        assert!(config.vue && config.angular);
        assert_eq!(config.jsx.mode, AttributeMode::Path);
        config.validate().unwrap();

        let include = config.compiled_include().unwrap();
        for id in ["/a/App.tsx", "/a/b.js", "/a/C.vue", "/a/x.component.html"] {
            assert!(include.iter().any(|p| p.is_match(id)), "{}", id);
        }
        assert!(!include.iter().any(|p| p.is_match("/a/style.css")));
    }

    #[test]
    fn test_pattern_forms() {
        let config: Config = toml::from_str(
            r#"
include = ["src/", { regex = "\\.mdx$" }]
exclude = []
"#,
        )
        .unwrap();
        assert_eq!(config.include[0], Pattern::Substring("src/".to_string()));
        assert_eq!(config.include[1], Pattern::regex(r"\.mdx$"));
        assert!(config.exclude.is_empty());
        // untouched sections keep their defaults
        assert!(config.vue);
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let config: Config = toml::from_str(r#"exclude = [{ regex = "(" }]"#).unwrap();
        let err = config.validate().unwrap_err();
        assert!(format!("{:#}", err).contains("exclude[0]"));
    }

    #[test]
    fn test_empty_environments_rejected() {
        let config: Config = toml::from_str("environments = []").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let config: Config = toml::from_str("[logging]\nlevel = \"loud\"").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_relative_paths_resolved_against_base() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("web")).unwrap();
        let config_path = dir.path().join("locator.toml");
        std::fs::write(
            &config_path,
            "[jsx]\nmode = \"id\"\ncwd = \"web\"\n\n[output]\ndir = \"dist\"\n",
        )
        .unwrap();

        let config = Config::load(config_path.to_str().unwrap(), None).unwrap();
        assert_eq!(config.jsx.mode, AttributeMode::Id);
        assert_eq!(
            config.jsx.cwd.as_deref(),
            Some(dir.path().join("web").to_str().unwrap())
        );
        assert_eq!(
            config.output.dir.as_deref(),
            Some(dir.path().join("dist").to_str().unwrap())
        );
    }

    #[test]
    fn test_missing_cwd_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("locator.toml");
        std::fs::write(&config_path, "[jsx]\ncwd = \"nope\"\n").unwrap();
        assert!(Config::load(config_path.to_str().unwrap(), None).is_err());
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("locator.toml");
        let config = Config::load_or_default(missing.to_str().unwrap()).unwrap();
        assert_eq!(config.exclude.len(), 4);
    }
}
