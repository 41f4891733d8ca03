use chrono::NaiveDateTime;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExcerptError {
    #[error("unsupported time format directive '%{directive}' in '{format}'")]
    UnsupportedDirective { format: String, directive: char },

    #[error("invalid time format '{format}': {source}")]
    Format {
        format: String,
        #[source]
        source: regex::Error,
    },

    #[error("'{value}' does not match time format '{format}': {source}")]
    Bound {
        value: String,
        format: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("window start {start} is after its end {end}")]
    EmptyWindow {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read log input: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write excerpt: {0}")]
    Write(#[source] std::io::Error),
}

impl ExcerptError {
    pub fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    pub fn create(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Create {
            path: path.into(),
            source,
        }
    }
}
