use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::command::{CommandRunner, Shell};
use crate::compiler::{Compiler, Gnu};
use crate::job::Job;

/// Error produced while executing one pipeline; fatal to that run.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A listed source file is missing under the project path.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    /// The spec declared no source files.
    #[error("no files specified")]
    NoFilesSpecified,
    /// The compiler returned a nonzero result for a source file.
    #[error("compilation failed: {}", .0.display())]
    CompilationFailed(PathBuf),
    /// The linker returned a nonzero result.
    #[error("linking failed for project '{0}'")]
    LinkFailed(String),
    /// A pre-build command returned a nonzero result.
    #[error("pre-build command failed: {0}")]
    PreCommandFailed(String),
    /// A post-build command returned a nonzero result.
    #[error("post-build command failed: {0}")]
    PostCommandFailed(String),
    /// Filesystem or process-spawn failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Executes one job: pre-build commands, dependency-aware incremental
/// compilation, linking, post-build commands.
///
/// The pipeline owns its job; nothing else references the job once the
/// parser hands it over.
pub struct Pipeline {
    job: Job,
    compiler: Box<dyn Compiler>,
    runner: Box<dyn CommandRunner>,
}

impl Pipeline {
    /// Wire a pipeline with the default toolchain: `g++` configured
    /// from the job's flags and include directories, commands through
    /// the shell.
    #[must_use]
    pub fn new(job: Job) -> Self {
        let compiler = Gnu::new(job.cflags().to_string(), job.include_dirs().to_vec());
        Self {
            job,
            compiler: Box::new(compiler),
            runner: Box::new(Shell),
        }
    }

    /// Wire a pipeline with an explicit toolchain; used by tests to
    /// inject recording fakes.
    #[must_use]
    pub fn with_tools(
        job: Job,
        compiler: Box<dyn Compiler>,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        Self {
            job,
            compiler,
            runner,
        }
    }

    #[must_use]
    pub const fn job(&self) -> &Job {
        &self.job
    }

    /// Run the pipeline to completion. Stops at the first failure; no
    /// partial continuation.
    pub fn run(&self) -> Result<(), BuildError> {
        let job = &self.job;
        info!(project = %job.name(), "building");

        for line in job.pre_commands() {
            debug!(command = %line, "pre-build");
            let result = self.runner.run(line)?;
            if !result.success {
                return Err(BuildError::PreCommandFailed(line.clone()));
            }
        }

        let out_dir = job.path().join(job.name());
        fs::create_dir_all(&out_dir)?;

        if job.files().is_empty() {
            return Err(BuildError::NoFilesSpecified);
        }

        let mut objects = Vec::with_capacity(job.files().len());
        for file in job.files() {
            let source = job.path().join(file);
            if !source.is_file() {
                return Err(BuildError::FileNotFound(source));
            }
            let stem = source
                .file_stem()
                .ok_or_else(|| BuildError::FileNotFound(source.clone()))?;
            let object = out_dir.join(Path::new(stem).with_extension("o"));

            if self.up_to_date(&source, &object)? {
                debug!(file = %file.display(), "up to date, skipping");
            } else {
                info!(file = %file.display(), "compiling");
                self.compiler.compile(&source, &object)?;
            }
            objects.push(object);
        }

        let executable = out_dir.join(job.name());
        info!(output = %executable.display(), "linking");
        self.compiler.link(&objects, &executable)?;

        for line in job.post_commands() {
            debug!(command = %line, "post-build");
            let result = self.runner.run(line)?;
            if !result.success {
                return Err(BuildError::PostCommandFailed(line.clone()));
            }
        }

        info!(project = %job.name(), "built");
        Ok(())
    }

    /// An object is up to date when it exists and is not older than the
    /// source or any dependency the compiler reports for it. Equal
    /// timestamps count as up to date.
    fn up_to_date(&self, source: &Path, object: &Path) -> Result<bool, BuildError> {
        if !object.exists() {
            return Ok(false);
        }
        let object_mtime = fs::metadata(object)?.modified()?;
        if object_mtime < fs::metadata(source)?.modified()? {
            return Ok(false);
        }
        for dependency in self.compiler.dependencies(source)? {
            if !dependency.exists() {
                continue;
            }
            if object_mtime < fs::metadata(&dependency)?.modified()? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
