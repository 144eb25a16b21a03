//! Archive configuration
//!
//! Immutable option set captured when an [`ArchiveTaskSet`] is constructed.
//! There is no file- or environment-based configuration surface; everything
//! is supplied by the caller at construction time.
//!
//! [`ArchiveTaskSet`]: crate::archive::ArchiveTaskSet

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::archive::ArchiveTaskSet;

/// Callback invoked after `make` or `deploy`, given a read-only view of the
/// owning task set
pub type Hook = Arc<dyn Fn(&ArchiveTaskSet) + Send + Sync>;

fn noop_hook() -> Hook {
    Arc::new(|_| {})
}

/// Options for an archive task set
///
/// Captured once at construction and never mutated afterwards. Defaults
/// match the conventional layout: namespace `zip`, zip options excluding
/// `.DS_Store`, two archives retained.
#[derive(Clone)]
pub struct ArchiveConfig {
    /// Fixed leading part of archive filenames
    pub prefix: String,
    /// Directory (or file) that gets packed into the archive
    pub content: PathBuf,
    /// Directory where archives are created and swept
    pub zipdir: PathBuf,
    /// Remote sync target in rsync `host:path` form
    pub remote_path: String,
    /// Namespace grouping the four task names
    pub namespace: String,
    /// Archive tool invoked by `make`
    pub zip_tool: String,
    /// Removal tool invoked by `deploy` for the metadata file
    pub rm_tool: String,
    /// Synchronization tool invoked by `deploy`
    pub rsync_tool: String,
    /// Option string passed through to the zip tool
    pub zipopt: String,
    /// Number of newest archives `sweep` leaves in place
    pub retain: usize,
    /// Upstream task names `make` depends on
    pub depend_on: Vec<String>,
    /// Invoked after the archive command completes
    pub after_make: Hook,
    /// Invoked after synchronization completes
    pub after_deploy: Hook,
    /// Echo constructed command lines before running them
    pub echo: bool,
    /// Print progress lines while tasks run
    pub verbose: bool,
}

impl ArchiveConfig {
    pub fn new(
        prefix: impl Into<String>,
        content: impl Into<PathBuf>,
        zipdir: impl Into<PathBuf>,
        remote_path: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            content: content.into(),
            zipdir: zipdir.into(),
            remote_path: remote_path.into(),
            namespace: "zip".to_string(),
            zip_tool: "zip".to_string(),
            rm_tool: "rm".to_string(),
            rsync_tool: "rsync".to_string(),
            zipopt: "-x .DS_Store -r".to_string(),
            retain: 2,
            depend_on: Vec::new(),
            after_make: noop_hook(),
            after_deploy: noop_hook(),
            echo: true,
            verbose: false,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_zip_tool(mut self, zip_tool: impl Into<String>) -> Self {
        self.zip_tool = zip_tool.into();
        self
    }

    pub fn with_rm_tool(mut self, rm_tool: impl Into<String>) -> Self {
        self.rm_tool = rm_tool.into();
        self
    }

    pub fn with_rsync_tool(mut self, rsync_tool: impl Into<String>) -> Self {
        self.rsync_tool = rsync_tool.into();
        self
    }

    pub fn with_zipopt(mut self, zipopt: impl Into<String>) -> Self {
        self.zipopt = zipopt.into();
        self
    }

    pub fn with_retain(mut self, retain: usize) -> Self {
        self.retain = retain;
        self
    }

    pub fn with_depend_on(mut self, depend_on: Vec<String>) -> Self {
        self.depend_on = depend_on;
        self
    }

    pub fn with_after_make<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ArchiveTaskSet) + Send + Sync + 'static,
    {
        self.after_make = Arc::new(hook);
        self
    }

    pub fn with_after_deploy<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ArchiveTaskSet) + Send + Sync + 'static,
    {
        self.after_deploy = Arc::new(hook);
        self
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl fmt::Debug for ArchiveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Hooks are opaque closures, so they are elided here.
        f.debug_struct("ArchiveConfig")
            .field("prefix", &self.prefix)
            .field("content", &self.content)
            .field("zipdir", &self.zipdir)
            .field("remote_path", &self.remote_path)
            .field("namespace", &self.namespace)
            .field("zip_tool", &self.zip_tool)
            .field("rm_tool", &self.rm_tool)
            .field("rsync_tool", &self.rsync_tool)
            .field("zipopt", &self.zipopt)
            .field("retain", &self.retain)
            .field("depend_on", &self.depend_on)
            .field("echo", &self.echo)
            .field("verbose", &self.verbose)
            .finish()
    }
}
