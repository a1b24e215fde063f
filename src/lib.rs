//! Minimal declarative build system.
//!
//! Parses `build.bbs` spec files written in a small declarative
//! language into [`Job`] descriptions, then executes each job through
//! an incremental compile-and-link pipeline, recursing into dependency
//! projects first.
//!
//! # Quick start
//!
//! ## Parse a build spec
//!
//! ```
//! let job = bbs::parse_str(
//!     "!prj \"demo\"\n\
//!      !files [\"main.cpp\",\"util.cpp\"]\n\
//!      !cflags \"-std=c++20 -O2\"\n",
//! )
//! .unwrap();
//! assert_eq!(job.name(), "demo");
//! assert_eq!(job.files().len(), 2);
//! assert_eq!(job.cflags(), "-std=c++20 -O2");
//! ```
//!
//! ## Build a project tree
//!
//! ```no_run
//! use std::path::Path;
//!
//! let mut driver = bbs::Driver::new();
//! driver.process(Path::new("demo")).unwrap();
//! driver.build().unwrap();
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod command;
pub mod compiler;
pub mod driver;
pub mod executor;
pub mod job;
pub mod lexer;
pub mod parser;
pub mod pipeline;
pub mod scanner;
pub mod token;

pub use command::{CommandOutput, CommandRunner, Shell};
pub use compiler::{Compiler, Gnu};
pub use driver::{BUILD_FILE, Driver};
pub use executor::Executor;
pub use job::Job;
pub use lexer::{LexError, Lexer};
pub use parser::{ParseError, ParseErrorKind, Parser, parse_file, parse_str};
pub use pipeline::{BuildError, Pipeline};
pub use scanner::{Context, ScanError, Scanner};
pub use token::{Op, Punct, Span, Token, TokenKind};

/// Unified error type covering spec-file scanning, lexing, parsing,
/// and build execution.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A scanner error (missing or empty spec file).
    #[error("{0}")]
    Scan(#[from] ScanError),
    /// A lexer error.
    #[error("{0}")]
    Lex(#[from] LexError),
    /// A parser error.
    #[error("{0}")]
    Parse(#[from] ParseError),
    /// A build-execution error.
    #[error("{0}")]
    Build(#[from] BuildError),
    /// A dependency path leads back to a project still being
    /// processed.
    #[error("dependency cycle involving {}", .0.display())]
    DependencyCycle(std::path::PathBuf),
}
