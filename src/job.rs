use std::path::{Path, PathBuf};

/// Parsed, in-memory build description for one project.
///
/// A job is created when the `prj` statement is parsed, populated by the
/// remaining statements, and then handed to exactly one pipeline by
/// value. It is deliberately not `Clone`: one job, one build unit.
#[derive(Debug, PartialEq, Eq)]
pub struct Job {
    name: String,
    path: PathBuf,
    files: Vec<PathBuf>,
    dependencies: Vec<PathBuf>,
    cflags: String,
    include_dirs: Vec<PathBuf>,
    pre_commands: Vec<String>,
    post_commands: Vec<String>,
}

impl Job {
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            name,
            path: PathBuf::new(),
            files: Vec::new(),
            dependencies: Vec::new(),
            cflags: String::new(),
            include_dirs: Vec::new(),
            pre_commands: Vec::new(),
            post_commands: Vec::new(),
        }
    }

    /// Project name; fixed at creation.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Filesystem location of the project, set by the discovery driver.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_project_path(&mut self, path: PathBuf) {
        self.path = path;
    }

    /// Source files, relative to the project path, in spec order.
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub(crate) fn add_file(&mut self, file: PathBuf) {
        self.files.push(file);
    }

    /// Sub-project directories to build first, in spec order.
    #[must_use]
    pub fn dependencies(&self) -> &[PathBuf] {
        &self.dependencies
    }

    pub(crate) fn add_dependency(&mut self, dependency: PathBuf) {
        self.dependencies.push(dependency);
    }

    /// Compilation flags passed through to the compiler.
    #[must_use]
    pub fn cflags(&self) -> &str {
        &self.cflags
    }

    pub(crate) fn set_cflags(&mut self, cflags: String) {
        self.cflags = cflags;
    }

    /// Include directories, in spec order.
    #[must_use]
    pub fn include_dirs(&self) -> &[PathBuf] {
        &self.include_dirs
    }

    pub(crate) fn add_include_dir(&mut self, dir: PathBuf) {
        self.include_dirs.push(dir);
    }

    /// Commands run before compilation, in spec order.
    #[must_use]
    pub fn pre_commands(&self) -> &[String] {
        &self.pre_commands
    }

    pub(crate) fn set_pre_commands(&mut self, commands: Vec<String>) {
        self.pre_commands = commands;
    }

    /// Commands run after linking, in spec order.
    #[must_use]
    pub fn post_commands(&self) -> &[String] {
        &self.post_commands
    }

    pub(crate) fn set_post_commands(&mut self, commands: Vec<String>) {
        self.post_commands = commands;
    }
}
