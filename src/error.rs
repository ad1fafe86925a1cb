use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised by the pipeline. Per-row identifier failures are not
/// errors; they only show up in the summary counts.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed table in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("required column `{column}` not found in {}", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }

    /// csv wraps I/O failures in its own error type; keep those classed as I/O.
    pub(crate) fn from_csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        let path = path.into();
        match source.kind() {
            csv::ErrorKind::Io(io) => PipelineError::Io {
                path,
                source: std::io::Error::new(io.kind(), io.to_string()),
            },
            _ => PipelineError::Parse { path, source },
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
