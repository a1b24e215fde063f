use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::command::{CommandRunner, Shell};
use crate::pipeline::BuildError;

/// Compiler abstraction consumed by the pipeline: produce an object
/// file, report header dependencies, link objects into an executable.
pub trait Compiler {
    /// Compile `source` into the object file `out`.
    fn compile(&self, source: &Path, out: &Path) -> Result<(), BuildError>;

    /// Files the object depends on, as reported by the compiler's
    /// dependency query.
    fn dependencies(&self, source: &Path) -> Result<Vec<PathBuf>, BuildError>;

    /// Link `objects` into the executable `out`.
    fn link(&self, objects: &[PathBuf], out: &Path) -> Result<(), BuildError>;
}

const COMPILER: &str = "g++";

/// `g++` driver. Dependency queries use `-MM` and parse the emitted
/// make rule.
pub struct Gnu<R = Shell> {
    flags: String,
    include_dirs: Vec<PathBuf>,
    runner: R,
}

impl Gnu<Shell> {
    #[must_use]
    pub const fn new(flags: String, include_dirs: Vec<PathBuf>) -> Self {
        Self {
            flags,
            include_dirs,
            runner: Shell,
        }
    }
}

impl<R: CommandRunner> Gnu<R> {
    /// Run commands through `runner` instead of the shell.
    #[must_use]
    pub const fn with_runner(flags: String, include_dirs: Vec<PathBuf>, runner: R) -> Self {
        Self {
            flags,
            include_dirs,
            runner,
        }
    }

    fn includes(&self) -> String {
        let mut out = String::new();
        for dir in &self.include_dirs {
            let _ = write!(out, " -I {}", dir.display());
        }
        out
    }
}

impl<R: CommandRunner> Compiler for Gnu<R> {
    fn compile(&self, source: &Path, out: &Path) -> Result<(), BuildError> {
        let line = format!(
            "{COMPILER} {} -c {} -o {}{}",
            self.flags,
            source.display(),
            out.display(),
            self.includes(),
        );
        debug!(command = %line, "compile");
        let result = self.runner.run(&line)?;
        if !result.success {
            error!("{}", result.output.trim_end());
            return Err(BuildError::CompilationFailed(source.to_path_buf()));
        }
        Ok(())
    }

    fn dependencies(&self, source: &Path) -> Result<Vec<PathBuf>, BuildError> {
        let line = format!(
            "{COMPILER} {} -MM {}{}",
            self.flags,
            source.display(),
            self.includes(),
        );
        debug!(command = %line, "dependency query");
        let result = self.runner.run(&line)?;
        if !result.success {
            error!("{}", result.output.trim_end());
            return Err(BuildError::CompilationFailed(source.to_path_buf()));
        }
        Ok(parse_make_rule(&result.output))
    }

    fn link(&self, objects: &[PathBuf], out: &Path) -> Result<(), BuildError> {
        let mut line = String::from(COMPILER);
        for object in objects {
            let _ = write!(line, " {}", object.display());
        }
        let _ = write!(line, " -o {}", out.display());
        debug!(command = %line, "link");
        let result = self.runner.run(&line)?;
        if !result.success {
            error!("{}", result.output.trim_end());
            let name = out
                .file_name()
                .map_or_else(|| out.display().to_string(), |n| {
                    n.to_string_lossy().into_owned()
                });
            return Err(BuildError::LinkFailed(name));
        }
        Ok(())
    }
}

/// Parse `g++ -MM` output (`target.o: source.cpp dep.h …`) into the
/// dependency list, dropping the target and the source itself.
fn parse_make_rule(output: &str) -> Vec<PathBuf> {
    output
        .replace('\\', " ")
        .split_whitespace()
        .skip(2)
        .map(PathBuf::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_rule_drops_target_and_source() {
        let deps = parse_make_rule("main.o: main.cpp util.h sys/io.h\n");
        assert_eq!(
            deps,
            vec![PathBuf::from("util.h"), PathBuf::from("sys/io.h")]
        );
    }

    #[test]
    fn make_rule_handles_line_continuations() {
        let deps = parse_make_rule("main.o: main.cpp \\\n util.h \\\n deep/log.h\n");
        assert_eq!(
            deps,
            vec![PathBuf::from("util.h"), PathBuf::from("deep/log.h")]
        );
    }

    #[test]
    fn make_rule_without_headers_is_empty() {
        assert!(parse_make_rule("main.o: main.cpp\n").is_empty());
    }
}
