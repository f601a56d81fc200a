use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use locator_jsx::AttributeMode;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::commands::transform::{build_hook, module_id};
use crate::hook::TransformHook;

/// Written next to the annotated tree
pub const MANIFEST_FILE: &str = "locator-manifest.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Annotated,
    Unchanged,
    Copied,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestEntry {
    /// Path relative to the source directory
    pub path: String,
    pub status: FileStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildManifest {
    pub generated_at: DateTime<Utc>,
    pub source_dir: String,
    pub mode: AttributeMode,
    pub files: Vec<ManifestEntry>,
}

impl BuildManifest {
    pub fn count(&self, status: FileStatus) -> usize {
        self.files.iter().filter(|f| f.status == status).count()
    }
}

/// Annotates every matching file below `src` into `out_dir`, copying the rest
pub fn execute_build(
    src: &str,
    out_dir: Option<&str>,
    config_path: &str,
    mode: Option<AttributeMode>,
    env: Option<&str>,
) -> Result<BuildManifest> {
    let (config, hook) = build_hook(config_path, mode, env)?;
    let out_dir = out_dir
        .map(str::to_string)
        .or_else(|| config.output.dir.clone())
        .ok_or_else(|| anyhow::anyhow!("No output directory: pass --out-dir or set output.dir"))?;

    let src_dir = PathBuf::from(src);
    if !src_dir.is_dir() {
        anyhow::bail!("Source directory does not exist: {}", src);
    }
    let out_dir = PathBuf::from(out_dir);

    let mut files = Vec::new();
    find_files(&src_dir, &out_dir, &mut files)?;
    files.sort();

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
            .context("Failed to create progress bar template")?
            .progress_chars("#>-"),
    );
    pb.set_message("Annotating...");

    let mut entries = Vec::with_capacity(files.len());
    for file in &files {
        let relative = file.strip_prefix(&src_dir).unwrap_or(file);
        let dest = out_dir.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let status = build_file(&hook, file, &dest)?;
        entries.push(ManifestEntry {
            path: relative.to_string_lossy().into_owned(),
            status,
        });
        pb.inc(1);
    }
    pb.finish_with_message("Done");

    let manifest = BuildManifest {
        generated_at: Utc::now(),
        source_dir: module_id(&src_dir),
        mode: config.jsx.mode,
        files: entries,
    };
    let manifest_path = out_dir.join(MANIFEST_FILE);
    fs::create_dir_all(&out_dir)?;
    fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)
        .with_context(|| format!("Failed to write manifest: {}", manifest_path.display()))?;

    let annotated = manifest.count(FileStatus::Annotated);
    info!(
        annotated,
        unchanged = manifest.count(FileStatus::Unchanged),
        copied = manifest.count(FileStatus::Copied),
        "Build finished"
    );
    println!(
        "{} {} annotated, {} unchanged, {} copied -> {}",
        "Build completed:".green().bold(),
        annotated,
        manifest.count(FileStatus::Unchanged),
        manifest.count(FileStatus::Copied),
        out_dir.display()
    );

    Ok(manifest)
}

fn build_file(hook: &TransformHook, file: &Path, dest: &Path) -> Result<FileStatus> {
    let id = module_id(file);
    if !hook.wants(&id) {
        fs::copy(file, dest)
            .with_context(|| format!("Failed to copy file: {}", file.display()))?;
        return Ok(FileStatus::Copied);
    }

    let code = match fs::read_to_string(file) {
        Ok(code) => code,
        Err(e) => {
            warn!(file = %id, error = %e, "Unreadable source, copying as is");
            fs::copy(file, dest)?;
            return Ok(FileStatus::Copied);
        }
    };

    match hook.transform(&code, &id)? {
        Some(output) => {
            fs::write(dest, output.code)?;
            Ok(FileStatus::Annotated)
        }
        None => {
            fs::write(dest, code)?;
            Ok(FileStatus::Unchanged)
        }
    }
}

/// Collects every file below `dir`, skipping the output directory
fn find_files(dir: &Path, skip: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    if dir == skip {
        return Ok(());
    }
    if dir.is_file() {
        files.push(dir.to_path_buf());
        return Ok(());
    }
    if dir.is_dir() {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            find_files(&entry.path(), skip, files)?;
        }
    }
    Ok(())
}
