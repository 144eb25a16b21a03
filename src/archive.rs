//! Archive task set
//!
//! [`ArchiveTaskSet`] owns the naming, retention, and orchestration of one
//! archive directory: `make` packs the content path into a timestamped zip,
//! `sweep` deletes archives beyond the retention count, `deploy` mirrors the
//! archive directory to a remote rsync target, and `deploy_suite` composes
//! the three in order.
//!
//! The archive filename is computed exactly once, at construction, from the
//! current local time. Running `make` twice on the same instance therefore
//! overwrites the same file; a fresh instance gets a fresh name.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::config::ArchiveConfig;
use crate::error::{ZipkeepError, ZipkeepResult};
use crate::shell::{CommandLine, ShellRunner};
use crate::task::Task;

/// Name of the hidden metadata file removed before deploy
const METADATA_FILE: &str = ".DS_Store";

/// Owns one archive directory: naming, retention, and the four tasks
pub struct ArchiveTaskSet {
    config: ArchiveConfig,
    zipname: String,
    zippath: PathBuf,
    shell: ShellRunner,
}

impl ArchiveTaskSet {
    /// Construct from configuration, fixing the archive filename from the
    /// current local time
    ///
    /// No filesystem or network I/O happens here; the archive directory is
    /// only created when `make` or `sweep` runs.
    pub fn new(config: ArchiveConfig) -> Arc<Self> {
        Self::with_timestamp(config, Local::now())
    }

    /// Construct with an explicit timestamp, for reproducible naming
    pub fn with_timestamp(config: ArchiveConfig, now: DateTime<Local>) -> Arc<Self> {
        let stamp = now.format("%y%m%d-%H%M");
        let zipname = format!("{}-{}.zip", config.prefix, stamp);
        let zippath = config.zipdir.join(&zipname);
        let shell = ShellRunner::new(config.echo);

        Arc::new(Self {
            config,
            zipname,
            zippath,
            shell,
        })
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Base filename this instance writes, fixed at construction
    pub fn zipname(&self) -> &str {
        &self.zipname
    }

    /// Full path this instance writes, fixed at construction
    pub fn zippath(&self) -> &Path {
        &self.zippath
    }

    /// Existing archives matching `<prefix>-*.zip`, ascending by filename
    ///
    /// The filename embeds a minute-granularity timestamp, so ascending
    /// lexicographic order equals chronological order. The listing is
    /// recomputed on every call and never cached.
    pub fn list(&self) -> ZipkeepResult<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.config.zipdir).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                ZipkeepError::DirectoryNotFound {
                    path: self.config.zipdir.clone(),
                }
            } else {
                ZipkeepError::Io(err)
            }
        })?;

        let wanted_prefix = format!("{}-", self.config.prefix);
        let mut archives = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(&wanted_prefix) && name.ends_with(".zip") {
                archives.push(entry.path());
            }
        }
        archives.sort();
        Ok(archives)
    }

    /// Base filename of the newest matching archive on disk
    pub fn primary_archive_name(&self) -> ZipkeepResult<String> {
        let archives = self.list()?;
        let newest = archives.last().ok_or_else(|| ZipkeepError::NoArchives {
            prefix: self.config.prefix.clone(),
            dir: self.config.zipdir.clone(),
        })?;
        let name = newest
            .file_name()
            .ok_or_else(|| ZipkeepError::NoArchives {
                prefix: self.config.prefix.clone(),
                dir: self.config.zipdir.clone(),
            })?;
        Ok(name.to_string_lossy().into_owned())
    }

    /// Create the archive by running the archive tool against the content
    /// path, then invoke the after-make hook
    pub fn make(&self) -> ZipkeepResult<()> {
        fs::create_dir_all(&self.config.zipdir)?;
        let command = self.zip_command()?;
        if let Some(cwd) = command.cwd() {
            self.progress(&format!("chdir {}", cwd.display()));
        }
        self.shell.run(&command)?;
        (self.config.after_make)(self);
        Ok(())
    }

    /// Delete all matching archives except the `retain` newest
    ///
    /// With fewer archives than the retention count, nothing is deleted and
    /// that is not an error. Deletions already performed are not undone if
    /// a later one fails.
    pub fn sweep(&self) -> ZipkeepResult<()> {
        fs::create_dir_all(&self.config.zipdir)?;
        let archives = self.list()?;
        let cutoff = archives.len().saturating_sub(self.config.retain);
        for old in &archives[..cutoff] {
            self.progress(&format!("delete {}", old.display()));
            fs::remove_file(old)?;
        }
        Ok(())
    }

    /// Mirror the archive directory to the remote target, then invoke the
    /// after-deploy hook
    ///
    /// The hidden metadata file is removed first; `rm -f` exits zero when
    /// the file is absent, so absence is tolerated.
    pub fn deploy(&self) -> ZipkeepResult<()> {
        self.shell.run(&self.metadata_rm_command())?;
        self.shell.run(&self.rsync_command())?;
        (self.config.after_deploy)(self);
        Ok(())
    }

    /// The four tasks under the configured namespace, ready to hand to a
    /// [`TaskRegistry`](crate::task::TaskRegistry)
    ///
    /// `deploy_suite` has no body of its own; it only orders `sweep`,
    /// `make`, `deploy`. Any `depend_on` names from the configuration
    /// become upstream dependencies of `make` and must be registered by the
    /// caller in the same registry.
    pub fn tasks(self: &Arc<Self>) -> Vec<Task> {
        let ns = &self.config.namespace;

        let make = {
            let unit = Arc::clone(self);
            Task::new(format!("{ns}:make"), "create a zip file")
                .with_deps(self.config.depend_on.clone())
                .with_body(move || unit.make())
        };

        let sweep = {
            let unit = Arc::clone(self);
            Task::new(format!("{ns}:sweep"), "sweep old zip files")
                .with_body(move || unit.sweep())
        };

        let deploy = {
            let unit = Arc::clone(self);
            Task::new(format!("{ns}:deploy"), "sync zip files with remote directory")
                .with_body(move || unit.deploy())
        };

        let deploy_suite = Task::new(
            format!("{ns}:deploy_suite"),
            "deploy suite -- sweep -> make -> deploy",
        )
        .with_deps([
            format!("{ns}:sweep"),
            format!("{ns}:make"),
            format!("{ns}:deploy"),
        ]);

        vec![make, sweep, deploy, deploy_suite]
    }

    fn zip_command(&self) -> ZipkeepResult<CommandLine> {
        let content = &self.config.content;
        let basename = content
            .file_name()
            .ok_or_else(|| ZipkeepError::InvalidContentPath {
                path: content.clone(),
            })?;
        let srcdir = match content.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut command = CommandLine::new(&self.config.zip_tool);
        if !self.config.echo {
            command = command.arg("-q");
        }
        Ok(command
            .args(self.config.zipopt.split_whitespace())
            .arg(self.zippath.display().to_string())
            .arg(basename.to_string_lossy())
            .current_dir(srcdir))
    }

    fn metadata_rm_command(&self) -> CommandLine {
        CommandLine::new(&self.config.rm_tool)
            .arg("-f")
            .arg(format!("{}/{METADATA_FILE}", self.config.zipdir.display()))
    }

    fn rsync_command(&self) -> CommandLine {
        CommandLine::new(&self.config.rsync_tool)
            .arg("-av")
            .arg("--delete")
            .arg(format!("{}/", self.config.zipdir.display()))
            .arg(&self.config.remote_path)
    }

    fn progress(&self, message: &str) {
        if self.config.verbose {
            eprintln!("{message}");
        }
    }
}

impl std::fmt::Debug for ArchiveTaskSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveTaskSet")
            .field("config", &self.config)
            .field("zipname", &self.zipname)
            .field("zippath", &self.zippath)
            .finish()
    }
}
