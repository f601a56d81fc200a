use anyhow::Result;
use colored::Colorize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG: &str = r#"# Build environments in which files are annotated (compared with NODE_ENV)
environments = ["development"]

# Tag or component names that never receive a location attribute
ignore_component_names = []

# Patterns are plain substrings or { regex = "..." }; exclude is checked first
include = [
    { regex = "\\.[jt]sx?$" },
    { regex = "\\.vue$" },
    { regex = "\\.component\\.html$" },
]
exclude = [
    { regex = "node_modules" },
    { regex = "\\.next" },
    { regex = "\\.nuxt" },
    { regex = "\\.output" },
]

# Single-file components and Angular templates
vue = true
angular = true

[jsx]
# "path" writes data-locatorjs="file:line:column"
# "id" writes data-locatorjs-id="file::id" and registers a side table
# "split" writes data-source-file, data-source-line and data-source-column
mode = "path"
# Project root stripped from stored paths in id mode
# cwd = "."
# Split mode only: tag filters and a per-file element limit
# include_elements = ["div", "button"]
# exclude_elements = ["Fragment", "React.Fragment"]
# max_elements_per_file = 500

[output]
# Default destination of `locator build`
# dir = "dist-annotated"

[logging]
# level = "info"
# file = "locator.log"
format = "text"
"#;

/// Creates the configuration file
pub fn execute_init(path: &str) -> Result<()> {
    let config_path = Path::new(path);
    if config_path.exists() {
        anyhow::bail!("Config file already exists: {}", path);
    }

    fs::write(config_path, DEFAULT_CONFIG)?;
    println!("{} {}", "Created config file:".green(), path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_default_file_matches_defaults() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        config.validate().unwrap();
        let defaults = Config::default();
        assert_eq!(config.environments, defaults.environments);
        assert_eq!(config.include, defaults.include);
        assert_eq!(config.exclude, defaults.exclude);
    }
}
