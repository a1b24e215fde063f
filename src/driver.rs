use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::Error;
use crate::executor::Executor;
use crate::parser;
use crate::pipeline::{BuildError, Pipeline};

/// Build-spec file looked up in every project directory.
pub const BUILD_FILE: &str = "build.bbs";

/// Discovers build specs, recursing into dependency projects first,
/// and queues one pipeline per project.
#[derive(Default)]
pub struct Driver {
    executor: Executor,
    /// Directories on the active recursion path, canonicalized; used
    /// to detect dependency cycles.
    stack: Vec<PathBuf>,
}

impl Driver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `path/build.bbs`, process its dependencies depth-first,
    /// then queue a pipeline for the project itself.
    pub fn process(&mut self, path: &Path) -> Result<(), Error> {
        let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if self.stack.contains(&canonical) {
            return Err(Error::DependencyCycle(canonical));
        }

        info!(project = %path.display(), "discovering");
        let mut job = parser::parse_file(&path.join(BUILD_FILE))?;
        job.set_project_path(path.to_path_buf());

        self.stack.push(canonical);
        let dependencies: Vec<PathBuf> = job.dependencies().to_vec();
        for dependency in &dependencies {
            let result = self.process(&path.join(dependency));
            if result.is_err() {
                self.stack.pop();
                return result;
            }
        }
        self.stack.pop();

        self.executor.add(Pipeline::new(job));
        Ok(())
    }

    /// Number of pipelines queued so far.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.executor.len()
    }

    /// Jobs queued so far, in build order.
    pub fn jobs(&self) -> impl Iterator<Item = &crate::job::Job> {
        self.executor.pipelines().map(Pipeline::job)
    }

    /// Run every queued pipeline in discovery order.
    pub fn build(&mut self) -> Result<(), BuildError> {
        self.executor.run()
    }
}
