//! Shell command construction and execution
//!
//! The archive and sync tools are external programs. Commands are built as
//! plain values so their exact argument shape can be inspected, then run
//! synchronously with inherited stdio. A spawn failure or non-zero exit
//! status is a fatal [`CommandFailed`](crate::ZipkeepError::CommandFailed).

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{ZipkeepError, ZipkeepResult};

/// A fully-constructed command line: program, arguments, and optional
/// working directory
///
/// The working directory is scoped to the child process via
/// [`Command::current_dir`], so the parent's working directory is never
/// touched, even when the command fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arg_slice(&self) -> &[String] {
        &self.args
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Render the command line as it would be typed at a shell prompt
    pub fn render(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }
}

/// Runs command lines synchronously, optionally echoing them first
#[derive(Debug, Clone, Copy)]
pub struct ShellRunner {
    echo: bool,
}

impl ShellRunner {
    pub fn new(echo: bool) -> Self {
        Self { echo }
    }

    /// Run a command to completion, blocking until the child exits
    ///
    /// Stdio is inherited from the parent so the external tool's own output
    /// is visible. Fails with `CommandSpawn` when the program cannot be
    /// started at all and `CommandFailed` on a non-zero exit status.
    pub fn run(&self, line: &CommandLine) -> ZipkeepResult<()> {
        if self.echo {
            eprintln!("{}", line.render());
        }

        let status = line.to_command().status().map_err(|source| {
            ZipkeepError::CommandSpawn {
                command: line.render(),
                source,
            }
        })?;

        if !status.success() {
            return Err(ZipkeepError::CommandFailed {
                command: line.render(),
                code: status.code(),
            });
        }

        Ok(())
    }
}
