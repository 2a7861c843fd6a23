//! Per-file processing and the batch driver.
//!
//! `.cpp` sources go through strip → inject → compact; `.h` headers go through
//! the header cleanup. Each file is read, transformed and written on its own;
//! a failure is recorded and the batch moves on to the next file.

use crate::catalog::Catalog;
use crate::compact::compact_blank_lines;
use crate::error::{Error, Result};
use crate::header::clean_header;
use crate::inject::inject;
use crate::strip::strip;
use std::fs;
use std::path::{Path, PathBuf};

/// Which transform a file receives, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Source,
    Header,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("cpp") => Some(Self::Source),
            Some("h") => Some(Self::Header),
            _ => None,
        }
    }
}

/// Full pipeline for a source file's text.
pub fn normalize_source(text: &str, catalog: &Catalog) -> String {
    let stripped = strip(text, catalog);
    let annotated = inject(&stripped, catalog);
    compact_blank_lines(&annotated)
}

pub fn normalize(kind: FileKind, text: &str, catalog: &Catalog) -> String {
    match kind {
        FileKind::Source => normalize_source(text, catalog),
        FileKind::Header => clean_header(text),
    }
}

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// New text was written (or would be, under `--check`).
    Changed,
    Unchanged,
}

/// Process one file. With `write` false the file is only read.
pub fn process_file(path: &Path, catalog: &Catalog, write: bool) -> Result<Outcome> {
    let kind = FileKind::from_path(path).ok_or_else(|| Error::Unsupported(path.to_path_buf()))?;
    let original = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let updated = normalize(kind, &original, catalog);
    if updated == original {
        return Ok(Outcome::Unchanged);
    }
    if write {
        fs::write(path, &updated).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(Outcome::Changed)
}

/// Per-file results of one run, in processing order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub results: Vec<(PathBuf, Result<Outcome>)>,
}

impl BatchReport {
    pub fn failures(&self) -> usize {
        self.results.iter().filter(|(_, r)| r.is_err()).count()
    }

    pub fn changed(&self) -> usize {
        self.results
            .iter()
            .filter(|(_, r)| matches!(r, Ok(Outcome::Changed)))
            .count()
    }
}

/// Run every file to completion, printing one status line per file.
pub fn process_batch(paths: &[PathBuf], catalog: &Catalog, write: bool) -> BatchReport {
    let mut report = BatchReport::default();
    for path in paths {
        let result = process_file(path, catalog, write);
        match &result {
            Ok(Outcome::Changed) if write => println!("Processed: {}", path.display()),
            Ok(Outcome::Changed) => println!("Would change: {}", path.display()),
            Ok(Outcome::Unchanged) => println!("Unchanged: {}", path.display()),
            Err(e) => eprintln!("Error processing {}: {e}", path.display()),
        }
        report.results.push((path.clone(), result));
    }
    report
}
