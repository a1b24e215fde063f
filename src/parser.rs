use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::Error;
use crate::job::Job;
use crate::lexer::Lexer;
use crate::scanner::ScanError;
use crate::token::{Op, Punct, Span, Token, TokenKind};

/// Classifies a parser error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A token that does not fit the grammar at this point.
    UnexpectedToken { found: String },
    /// Input ended in the middle of a statement.
    UnexpectedEndOfFile,
    /// A `!` statement with an unknown keyword.
    UnexpectedKeyword { found: String },
    /// A `$name` reference with no matching `let`.
    UndeclaredVariable { name: String },
    /// A second `prj` statement in one spec file.
    ExistingProject { name: String },
    /// A statement that needs a project before any `prj` was seen.
    NonExistentProject,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken { found } => {
                write!(f, "unexpected token '{found}'")
            }
            Self::UnexpectedEndOfFile => {
                write!(f, "unexpected end of file")
            }
            Self::UnexpectedKeyword { found } => {
                write!(f, "unexpected keyword '{found}'")
            }
            Self::UndeclaredVariable { name } => {
                write!(f, "undeclared variable '{name}'")
            }
            Self::ExistingProject { name } => {
                write!(f, "project '{name}' is already declared")
            }
            Self::NonExistentProject => {
                write!(f, "no project declared")
            }
        }
    }
}

/// Error produced during parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

/// Parse a build-spec source string into a [`Job`].
pub fn parse_str(source: &str) -> Result<Job, Error> {
    Parser::from_source(source).parse()
}

/// Parse a build-spec file into a [`Job`].
pub fn parse_file(path: &Path) -> Result<Job, Error> {
    Parser::from_path(path)?.parse()
}

/// Parser states; the machine terminates when a step yields no
/// successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Statement,
    Keyword,
    Project,
    Files,
    Deps,
    CFlags,
    Inc,
    Pre,
    Post,
    Let,
}

/// Shared parse context: the job under construction and the table of
/// declared variables. All state transitions mutate only this.
#[derive(Debug, Default)]
struct Session {
    job: Option<Job>,
    variables: HashMap<String, String>,
}

impl Session {
    fn create_job(&mut self, name: String, span: Span) -> Result<(), ParseError> {
        // Project names must be non-empty; `!prj ""` is malformed.
        if name.is_empty() {
            return Err(ParseError {
                kind: ParseErrorKind::UnexpectedToken {
                    found: "\"\"".to_string(),
                },
                span,
            });
        }
        if let Some(existing) = &self.job {
            return Err(ParseError {
                kind: ParseErrorKind::ExistingProject {
                    name: existing.name().to_string(),
                },
                span,
            });
        }
        self.job = Some(Job::new(name));
        Ok(())
    }

    fn job_mut(&mut self, span: Span) -> Result<&mut Job, ParseError> {
        self.job.as_mut().ok_or(ParseError {
            kind: ParseErrorKind::NonExistentProject,
            span,
        })
    }

    fn take_job(&mut self, span: Span) -> Result<Job, ParseError> {
        self.job.take().ok_or(ParseError {
            kind: ParseErrorKind::NonExistentProject,
            span,
        })
    }

    /// Redeclaration overwrites the earlier value.
    fn declare(&mut self, name: String, value: String) {
        self.variables.insert(name, value);
    }

    fn lookup(&self, name: &str, span: Span) -> Result<&str, ParseError> {
        self.variables
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ParseError {
                kind: ParseErrorKind::UndeclaredVariable {
                    name: name.to_string(),
                },
                span,
            })
    }
}

/// State-machine parser for one build-spec file.
#[derive(Debug)]
pub struct Parser {
    lexer: Lexer,
    session: Session,
}

impl Parser {
    /// Parse from a build-spec file.
    pub fn from_path(path: &Path) -> Result<Self, ScanError> {
        Ok(Self::new(Lexer::from_path(path)?))
    }

    /// Parse from an in-memory source string.
    #[must_use]
    pub fn from_source(source: &str) -> Self {
        Self::new(Lexer::from_source(source))
    }

    #[must_use]
    pub fn new(lexer: Lexer) -> Self {
        Self {
            lexer,
            session: Session::default(),
        }
    }

    /// Run the state machine to completion and yield the finished job.
    pub fn parse(mut self) -> Result<Job, Error> {
        let mut state = Some(State::Statement);
        while let Some(current) = state {
            state = self.step(current)?;
        }
        Ok(self.session.take_job(self.lexer.span())?)
    }

    fn step(&mut self, state: State) -> Result<Option<State>, Error> {
        match state {
            State::Statement => self.statement(),
            State::Keyword => self.keyword(),
            State::Project => self.project(),
            State::Files => self.files(),
            State::Deps => self.deps(),
            State::CFlags => self.cflags(),
            State::Inc => self.inc(),
            State::Pre => self.pre(),
            State::Post => self.post(),
            State::Let => self.let_binding(),
        }
    }

    /// Every statement begins with `!`; end of input here is a clean
    /// termination.
    fn statement(&mut self) -> Result<Option<State>, Error> {
        let Some(token) = self.skip_separators()? else {
            return Ok(None);
        };
        expect_punct(&token, Punct::Bang)?;
        Ok(Some(State::Keyword))
    }

    fn keyword(&mut self) -> Result<Option<State>, Error> {
        let token = self.require_token()?;
        if token.kind != TokenKind::Word {
            return Err(unexpected_token(&token).into());
        }
        let next = match token.text.as_str() {
            "prj" => State::Project,
            "files" => State::Files,
            "deps" => State::Deps,
            "cflags" => State::CFlags,
            "inc" => State::Inc,
            "pre" => State::Pre,
            "post" => State::Post,
            "let" => State::Let,
            _ => {
                return Err(ParseError {
                    kind: ParseErrorKind::UnexpectedKeyword { found: token.text },
                    span: token.span,
                }
                .into());
            }
        };
        Ok(Some(next))
    }

    fn project(&mut self) -> Result<Option<State>, Error> {
        let (name, span) = self.string()?;
        self.session.create_job(name, span)?;
        Ok(Some(State::Statement))
    }

    fn files(&mut self) -> Result<Option<State>, Error> {
        let (items, span) = self.array()?;
        let job = self.session.job_mut(span)?;
        for item in items {
            job.add_file(item.into());
        }
        Ok(Some(State::Statement))
    }

    fn deps(&mut self) -> Result<Option<State>, Error> {
        let (items, span) = self.array()?;
        let job = self.session.job_mut(span)?;
        for item in items {
            job.add_dependency(item.into());
        }
        Ok(Some(State::Statement))
    }

    fn cflags(&mut self) -> Result<Option<State>, Error> {
        let (value, span) = self.string()?;
        self.session.job_mut(span)?.set_cflags(value);
        Ok(Some(State::Statement))
    }

    fn inc(&mut self) -> Result<Option<State>, Error> {
        let (items, span) = self.array()?;
        let job = self.session.job_mut(span)?;
        for item in items {
            job.add_include_dir(item.into());
        }
        Ok(Some(State::Statement))
    }

    fn pre(&mut self) -> Result<Option<State>, Error> {
        let (items, span) = self.array()?;
        self.session.job_mut(span)?.set_pre_commands(items);
        Ok(Some(State::Statement))
    }

    fn post(&mut self) -> Result<Option<State>, Error> {
        let (items, span) = self.array()?;
        self.session.job_mut(span)?.set_post_commands(items);
        Ok(Some(State::Statement))
    }

    /// `let name = "value"`; the identifier may also be wrapped in
    /// double quotes (`let "name" = "value"`).
    fn let_binding(&mut self) -> Result<Option<State>, Error> {
        let token = self.skip_separators()?.ok_or_else(|| self.eof())?;
        let name = match token.kind {
            TokenKind::Word => token.text,
            TokenKind::Punctuator(Punct::Quote) => {
                let word = self.require_token()?;
                if word.kind != TokenKind::Word {
                    return Err(unexpected_token(&word).into());
                }
                let close = self.require_token()?;
                expect_punct(&close, Punct::Quote)?;
                word.text
            }
            _ => return Err(unexpected_token(&token).into()),
        };
        let eq = self.skip_separators()?.ok_or_else(|| self.eof())?;
        if eq.kind != TokenKind::Operator(Op::Equals) {
            return Err(unexpected_token(&eq).into());
        }
        let (value, _) = self.string()?;
        self.session.declare(name, value);
        Ok(Some(State::Statement))
    }

    /// `"…"` literal: token texts are concatenated until the closing
    /// quote; `$name` splices in the variable's current binding.
    /// Returns the value and the span of the opening quote.
    fn string(&mut self) -> Result<(String, Span), Error> {
        let open = self.skip_separators()?.ok_or_else(|| self.eof())?;
        expect_punct(&open, Punct::Quote)?;
        let mut value = String::new();
        loop {
            let token = self.require_token()?;
            match token.kind {
                TokenKind::Punctuator(Punct::Quote) => break,
                TokenKind::Operator(Op::Dollar) => {
                    value.push_str(&self.variable()?);
                }
                _ => value.push_str(&token.text),
            }
        }
        Ok((value, open.span))
    }

    /// `[ "…" , "…" ]`: strings separated by commas. Returns the
    /// elements and the span of the opening bracket.
    fn array(&mut self) -> Result<(Vec<String>, Span), Error> {
        let open = self.skip_separators()?.ok_or_else(|| self.eof())?;
        expect_punct(&open, Punct::OpenBracket)?;
        let mut items = Vec::new();
        loop {
            let (value, _) = self.string()?;
            items.push(value);
            let terminator = self.require_token()?;
            match terminator.kind {
                TokenKind::Punctuator(Punct::Comma) => {}
                TokenKind::Punctuator(Punct::CloseBracket) => break,
                _ => return Err(unexpected_token(&terminator).into()),
            }
        }
        Ok((items, open.span))
    }

    /// `$name`: resolves to the variable's current binding.
    fn variable(&mut self) -> Result<String, Error> {
        let token = self.require_token()?;
        if token.kind != TokenKind::Word {
            return Err(unexpected_token(&token).into());
        }
        let value = self.session.lookup(&token.text, token.span)?;
        Ok(value.to_string())
    }

    /// Next token past any separators, or `None` at end of input.
    fn skip_separators(&mut self) -> Result<Option<Token>, Error> {
        loop {
            match self.lexer.next_token()? {
                Some(token) if token.kind == TokenKind::Separator => {}
                other => return Ok(other),
            }
        }
    }

    /// Next token; end of input is an error here.
    fn require_token(&mut self) -> Result<Token, Error> {
        match self.lexer.next_token()? {
            Some(token) => Ok(token),
            None => Err(self.eof().into()),
        }
    }

    fn eof(&self) -> ParseError {
        ParseError {
            kind: ParseErrorKind::UnexpectedEndOfFile,
            span: self.lexer.span(),
        }
    }
}

fn expect_punct(token: &Token, punct: Punct) -> Result<(), ParseError> {
    if token.kind == TokenKind::Punctuator(punct) {
        return Ok(());
    }
    Err(unexpected_token(token))
}

fn unexpected_token(token: &Token) -> ParseError {
    ParseError {
        kind: ParseErrorKind::UnexpectedToken {
            found: token.text.clone(),
        },
        span: token.span.clone(),
    }
}
