use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::token::Span;

/// Error opening a build-spec file.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The path does not exist or is not a regular file.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The file exists but contains nothing.
    #[error("file is empty: {}", .0.display())]
    Empty(PathBuf),
    /// Underlying I/O failure while reading the file.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Diagnostic view of the scanner's current position: the line being
/// processed and the position within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub line: String,
    pub span: Span,
}

/// Character source for one build-spec file.
///
/// Presents the file one character at a time while silently skipping
/// blank lines, leading indentation, and `#` comments. Interior spaces
/// are *not* skipped; they surface as separator tokens downstream.
#[derive(Debug)]
pub struct Scanner {
    lines: Vec<String>,
    line: usize,
    col: usize,
    open: bool,
}

impl Scanner {
    /// Open a build-spec file for scanning.
    pub fn from_path(path: &Path) -> Result<Self, ScanError> {
        if !path.is_file() {
            return Err(ScanError::NotFound(path.to_path_buf()));
        }
        let source = fs::read_to_string(path)?;
        if source.is_empty() {
            return Err(ScanError::Empty(path.to_path_buf()));
        }
        Ok(Self::from_source(&source))
    }

    /// Scan an in-memory source string.
    #[must_use]
    pub fn from_source(source: &str) -> Self {
        let lines = source.lines().map(str::to_string).collect();
        let mut scanner = Self {
            lines,
            line: 0,
            col: 0,
            open: true,
        };
        scanner.settle();
        scanner.skip();
        scanner
    }

    /// The character at the current position, or `None` at end of input.
    #[must_use]
    pub fn get(&self) -> Option<char> {
        if !self.open {
            return None;
        }
        self.current_char()
    }

    /// Move one position forward, then re-apply the skip rule.
    pub fn advance(&mut self) {
        if !self.open {
            return;
        }
        if let Some(ch) = self.current_char() {
            self.col += ch.len_utf8();
        }
        self.skip();
    }

    /// Current source location, for diagnostics.
    #[must_use]
    pub const fn span(&self) -> Span {
        Span {
            line: self.line + 1,
            column: self.col,
        }
    }

    /// Current line and position, for diagnostics.
    #[must_use]
    pub fn context(&self) -> Context {
        Context {
            line: self.lines.get(self.line).cloned().unwrap_or_default(),
            span: self.span(),
        }
    }

    fn current_char(&self) -> Option<char> {
        self.lines.get(self.line)?[self.col..].chars().next()
    }

    /// Skip rule: whenever the current line is exhausted or the rest of
    /// it is a `#` comment, move to the next line (consuming its leading
    /// indentation) until a real character or end of file is reached.
    fn skip(&mut self) {
        while self.open {
            match self.current_char() {
                Some('#') | None => self.read_line(),
                Some(_) => break,
            }
        }
    }

    fn read_line(&mut self) {
        self.line += 1;
        self.col = 0;
        self.settle();
    }

    /// Consume the leading spaces/tabs of the current line, or close the
    /// stream if there are no lines left.
    fn settle(&mut self) {
        if let Some(line) = self.lines.get(self.line) {
            let rest = line.trim_start_matches([' ', '\t']);
            self.col = line.len() - rest.len();
        } else {
            self.open = false;
        }
    }
}
