//! Shared helpers for integration tests

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone};
use zipkeep::{ArchiveConfig, ArchiveTaskSet};

/// Fixed construction time so archive names are deterministic
pub fn fixed_time() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

/// An archive unit over `zipdir` with a deterministic name, no echoing
pub fn unit_in(zipdir: &Path, prefix: &str, retain: usize) -> Arc<ArchiveTaskSet> {
    let config = ArchiveConfig::new(prefix, "/src/project/app", zipdir, "host:/backups")
        .with_retain(retain)
        .with_echo(false);
    ArchiveTaskSet::with_timestamp(config, fixed_time())
}

/// Create an empty file with the given name inside `dir`
pub fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), b"").unwrap();
}

/// Write an executable stand-in tool that appends its name and arguments
/// to `log`, one invocation per line
pub fn stub_tool(dir: &Path, name: &str, log: &Path) -> PathBuf {
    let path = dir.join(name);
    let script = format!("#!/bin/sh\necho \"{} $@\" >> {}\n", name, log.display());
    fs::write(&path, script).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// Base filenames of the unit's current listing
pub fn listed_names(unit: &ArchiveTaskSet) -> Vec<String> {
    unit.list()
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}
