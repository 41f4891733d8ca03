use crate::scan::record::OperationRecord;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid event pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read log input: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write slow operation log: {0}")]
    SideFile(#[source] std::io::Error),

    /// A read or write failed mid-scan. Records completed before the failure
    /// are kept so the caller can decide whether to use them.
    #[error("scan of {path} interrupted after {} operations: {source}", partial.len())]
    Interrupted {
        path: PathBuf,
        partial: Vec<OperationRecord>,
        #[source]
        source: Box<ScanError>,
    },
}

impl ScanError {
    pub fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    /// Records completed before the failure, if any were kept.
    pub fn partial_records(&self) -> &[OperationRecord] {
        match self {
            Self::Interrupted { partial, .. } => partial,
            _ => &[],
        }
    }
}
