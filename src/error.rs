// Error taxonomy for the pipeline.
//
// Only file-level I/O problems are fatal. Parse failures and unresolvable
// columns degrade to missing values inside the stage that hit them and are
// reported through logging, never through this type.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

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

    #[error("csv error on {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("input file {} has no header row", .0.display())]
    EmptyInput(PathBuf),
}
