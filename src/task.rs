//! Tasks as first-class values
//!
//! A [`Task`] carries a name, a human-readable description, the names of the
//! tasks it depends on, and an optional body. Nothing registers itself into
//! ambient global state: a task set hands its tasks to the caller, and the
//! caller puts them in a [`TaskRegistry`] (alongside any of its own) and
//! runs them by name.
//!
//! Execution is strictly sequential and fail-fast. Dependencies run before
//! the task that declared them, in declared order, and every task runs at
//! most once per `run` invocation.

use std::collections::HashSet;

use crate::error::{ZipkeepError, ZipkeepResult};

/// Body of a task
pub type TaskBody = Box<dyn Fn() -> ZipkeepResult<()> + Send + Sync>;

/// A named unit of work with declared upstream dependencies
pub struct Task {
    name: String,
    description: String,
    deps: Vec<String>,
    body: Option<TaskBody>,
}

impl Task {
    /// Create a body-less task; useful for pure composition tasks that only
    /// order their dependencies
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            deps: Vec::new(),
            body: None,
        }
    }

    pub fn depends_on(mut self, dep: impl Into<String>) -> Self {
        self.deps.push(dep.into());
        self
    }

    pub fn with_deps<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deps.extend(deps.into_iter().map(Into::into));
        self
    }

    pub fn with_body<F>(mut self, body: F) -> Self
    where
        F: Fn() -> ZipkeepResult<()> + Send + Sync + 'static,
    {
        self.body = Some(Box::new(body));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn deps(&self) -> &[String] {
        &self.deps
    }

    fn run_body(&self) -> ZipkeepResult<()> {
        match &self.body {
            Some(body) => body(),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("deps", &self.deps)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// Holds tasks by name and runs them dependency-first
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: Vec<Task>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task; registering two tasks under the same name is an
    /// error
    pub fn register(&mut self, task: Task) -> ZipkeepResult<()> {
        if self.get(task.name()).is_some() {
            return Err(ZipkeepError::DuplicateTask {
                name: task.name().to_string(),
            });
        }
        self.tasks.push(task);
        Ok(())
    }

    /// Register several tasks, stopping at the first duplicate
    pub fn register_all(&mut self, tasks: Vec<Task>) -> ZipkeepResult<()> {
        for task in tasks {
            self.register(task)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.name() == name)
    }

    /// Names of all registered tasks, in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(Task::name)
    }

    /// Run a task by name: dependencies first, in declared order, each task
    /// at most once, aborting the whole chain on the first error
    pub fn run(&self, name: &str) -> ZipkeepResult<()> {
        let mut done = HashSet::new();
        let mut in_progress = HashSet::new();
        self.run_inner(name, &mut done, &mut in_progress)
    }

    fn run_inner(
        &self,
        name: &str,
        done: &mut HashSet<String>,
        in_progress: &mut HashSet<String>,
    ) -> ZipkeepResult<()> {
        if done.contains(name) {
            return Ok(());
        }
        if !in_progress.insert(name.to_string()) {
            return Err(ZipkeepError::CircularDependency {
                name: name.to_string(),
            });
        }

        let task = self.get(name).ok_or_else(|| ZipkeepError::UnknownTask {
            name: name.to_string(),
        })?;

        for dep in task.deps() {
            self.run_inner(dep, done, in_progress)?;
        }

        task.run_body()?;

        in_progress.remove(name);
        done.insert(name.to_string());
        Ok(())
    }
}
