//! Input resolution: files, directories and glob patterns to a sorted path list.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions picked up when scanning a directory.
const SUPPORTED_EXTENSIONS: &[&str] = &["cpp", "h"];

/// Directory scanned when no inputs are given.
pub const DEFAULT_DIR: &str = "src/ir";

/// Expand `patterns` into real file paths.
///
/// Regular files are taken as-is (whatever their extension; unsupported ones
/// fail later, per file). Directories are scanned non-recursively for `.cpp`
/// and `.h` files. Anything else is tried as a glob.
pub fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            files.extend(scan_dir(path)?);
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            log::warn!("no files matched: {}", pattern);
            // A literal path that does not exist still gets a per-file error.
            if !pattern.contains(['*', '?', '[']) {
                files.push(path.to_path_buf());
            }
        }
        files.extend(matches);
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn scan_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries.flatten() {
        let p = entry.path();
        let supported = p
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext));
        if p.is_file() && supported {
            files.push(p);
        }
    }
    Ok(files)
}
