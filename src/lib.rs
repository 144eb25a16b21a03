//! Zipkeep - timestamped zip archiving, retention, and rsync deployment
//!
//! Zipkeep packages a directory into a timestamped zip archive, keeps a
//! bounded number of recent archives, and mirrors the archive directory to
//! a remote rsync target. The work is exposed as four named tasks with
//! declared dependencies (`make`, `sweep`, `deploy`, `deploy_suite`) that
//! the caller registers with a [`TaskRegistry`] and runs by name.
//!
//! The heavy lifting is delegated to external tools (`zip`, `rm`, `rsync`)
//! invoked synchronously; any non-zero exit aborts the task chain.

pub mod archive;
pub mod config;
pub mod error;
pub mod shell;
pub mod task;

// Re-exports for convenience
pub use archive::ArchiveTaskSet;
pub use config::{ArchiveConfig, Hook};
pub use error::{ZipkeepError, ZipkeepResult};
pub use shell::{CommandLine, ShellRunner};
pub use task::{Task, TaskBody, TaskRegistry};
