#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use bbs::{BuildError, CommandOutput, CommandRunner, Compiler};

/// Ordered log of everything the fake toolchain was asked to do.
#[derive(Default)]
pub struct Recorder {
    pub events: Vec<String>,
}

impl Recorder {
    pub fn with_prefix(&self, prefix: &str) -> Vec<String> {
        self.events
            .iter()
            .filter(|event| event.starts_with(prefix))
            .cloned()
            .collect()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.with_prefix(prefix).len()
    }
}

/// Compiler fake: records calls, "compiles" by writing a marker object
/// file, and serves a canned dependency list.
#[derive(Default)]
pub struct FakeCompiler {
    pub log: Rc<RefCell<Recorder>>,
    pub dependencies: Vec<PathBuf>,
    pub fail_compile: bool,
    pub fail_link: bool,
}

impl FakeCompiler {
    pub fn new(log: Rc<RefCell<Recorder>>) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }
}

impl Compiler for FakeCompiler {
    fn compile(&self, source: &Path, out: &Path) -> Result<(), BuildError> {
        self.log
            .borrow_mut()
            .events
            .push(format!("compile {}", source.display()));
        if self.fail_compile {
            return Err(BuildError::CompilationFailed(source.to_path_buf()));
        }
        fs::write(out, b"object")?;
        Ok(())
    }

    fn dependencies(&self, source: &Path) -> Result<Vec<PathBuf>, BuildError> {
        self.log
            .borrow_mut()
            .events
            .push(format!("deps {}", source.display()));
        Ok(self.dependencies.clone())
    }

    fn link(&self, objects: &[PathBuf], out: &Path) -> Result<(), BuildError> {
        self.log
            .borrow_mut()
            .events
            .push(format!("link {} ({} objects)", out.display(), objects.len()));
        if self.fail_link {
            return Err(BuildError::LinkFailed(
                out.file_name()
                    .map_or_else(String::new, |n| n.to_string_lossy().into_owned()),
            ));
        }
        fs::write(out, b"executable")?;
        Ok(())
    }
}

/// Command-runner fake: records command lines; an exact match against
/// `fail_on` reports a nonzero exit.
#[derive(Default)]
pub struct FakeRunner {
    pub log: Rc<RefCell<Recorder>>,
    pub fail_on: Option<String>,
}

impl FakeRunner {
    pub fn new(log: Rc<RefCell<Recorder>>) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, line: &str) -> io::Result<CommandOutput> {
        self.log.borrow_mut().events.push(format!("run {line}"));
        Ok(CommandOutput {
            success: self.fail_on.as_deref() != Some(line),
            output: String::new(),
        })
    }
}

/// Parse a spec and anchor the job at `path`.
pub fn job_at(spec: &str, path: &Path) -> bbs::Job {
    let mut job = bbs::parse_str(spec).expect("parse failed");
    job.set_project_path(path.to_path_buf());
    job
}
