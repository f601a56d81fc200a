use anyhow::{Context, Result};
use colored::Colorize;
use locator_core::TransformOutput;
use locator_jsx::AttributeMode;
use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::hook::TransformHook;

/// Module id the hook sees for a file on disk: its absolute path when resolvable
pub fn module_id(path: &Path) -> String {
    fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .into_owned()
}

/// Builds the hook from the config file (or defaults) plus command-line overrides
pub fn build_hook(
    config_path: &str,
    mode: Option<AttributeMode>,
    env: Option<&str>,
) -> Result<(Config, TransformHook)> {
    let mut config = Config::load_or_default(config_path)?;
    if let Some(mode) = mode {
        config.jsx.mode = mode;
    }
    let mut hook = TransformHook::from_config(&config)?;
    if let Some(env) = env {
        hook = hook.with_environment(env);
    }
    Ok((config, hook))
}

/// Runs one file through the hook
pub fn transform_file(hook: &TransformHook, path: &Path) -> Result<Option<TransformOutput>> {
    let code = fs::read_to_string(path)
        .with_context(|| format!("Failed to read source file: {}", path.display()))?;
    Ok(hook.transform(&code, &module_id(path))?)
}

/// Annotates a single file, printing the result or writing it back in place
pub fn execute_transform(
    file: &str,
    config_path: &str,
    mode: Option<AttributeMode>,
    env: Option<&str>,
    write: bool,
) -> Result<()> {
    let (_, hook) = build_hook(config_path, mode, env)?;
    let path = Path::new(file);

    match transform_file(&hook, path)? {
        Some(output) if write => {
            fs::write(path, &output.code)
                .with_context(|| format!("Failed to write file: {}", file))?;
            eprintln!("{} {}", "Annotated".green(), file);
        }
        Some(output) => print!("{}", output.code),
        None => {
            eprintln!("{} {}", "No changes:".yellow(), file);
            if !write {
                print!("{}", fs::read_to_string(path)?);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_file_uses_absolute_id() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Card.tsx");
        fs::write(&file, "export const Card = () => <section />;\n").unwrap();

        let (_, hook) = build_hook(
            dir.path().join("missing.toml").to_str().unwrap(),
            None,
            Some("development"),
        )
        .unwrap();
        let output = transform_file(&hook, &file).unwrap().unwrap();
        let expected = format!("{}:1:26", module_id(&file));
        assert!(output.code.contains(&expected), "{}", output.code);
    }

    #[test]
    fn test_mode_override() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("List.jsx");
        fs::write(&file, "const List = () => <ul />;\n").unwrap();

        let (config, hook) = build_hook(
            dir.path().join("missing.toml").to_str().unwrap(),
            Some(AttributeMode::Id),
            Some("development"),
        )
        .unwrap();
        assert_eq!(config.jsx.mode, AttributeMode::Id);
        let output = transform_file(&hook, &file).unwrap().unwrap();
        assert!(output.code.contains("data-locatorjs-id"));
        assert!(output.code.contains("__LOCATOR_DATA__"));
    }
}
