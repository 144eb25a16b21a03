//! Error types for Zipkeep
//!
//! Uses `thiserror` for library errors. Every failure is fatal to the
//! enclosing task: there is no retry and no partial-failure compensation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Zipkeep operations
pub type ZipkeepResult<T> = Result<T, ZipkeepError>;

/// Main error type for Zipkeep operations
#[derive(Error, Debug)]
pub enum ZipkeepError {
    /// A shell invocation (zip, rm, rsync) exited non-zero
    #[error("command failed{}: {command}", exit_suffix(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
    },

    /// A shell command could not be spawned at all, e.g. the program is
    /// missing from PATH or not executable
    #[error("failed to run {command}: {source}")]
    CommandSpawn {
        command: String,
        source: std::io::Error,
    },

    /// `primary_archive_name` called with no matching archive on disk
    #[error("no archive matching '{prefix}-*.zip' in {dir}")]
    NoArchives { prefix: String, dir: PathBuf },

    /// Archive directory missing when a listing was requested
    #[error("archive directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Content path has no basename to hand to the archive tool
    #[error("content path has no basename: {path}")]
    InvalidContentPath { path: PathBuf },

    /// Task name not present in the registry
    #[error("unknown task '{name}'")]
    UnknownTask { name: String },

    /// Task registered twice under the same name
    #[error("task '{name}' is already registered")]
    DuplicateTask { name: String },

    /// Dependency chain loops back onto a task
    #[error("circular dependency through task '{name}'")]
    CircularDependency { name: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_suffix(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!(" with exit code {code}"),
        None => String::new(),
    }
}
