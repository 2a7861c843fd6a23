//! Error types for catalog loading and per-file processing.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file type: {}", .0.display())]
    Unsupported(PathBuf),
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("invalid catalog TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("rule #{index} has an empty pattern")]
    EmptyPattern { index: usize },

    #[error("rule `{pattern}`: comment must start with `//`, got `{comment}`")]
    NotAComment { pattern: String, comment: String },

    #[error("catalog declares no return types")]
    NoReturnTypes,

    #[error("catalog pattern does not compile: {0}")]
    Pattern(#[from] regex::Error),
}
