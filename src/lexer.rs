use std::path::Path;

use crate::scanner::{Context, ScanError, Scanner};
use crate::token::{Op, Punct, Span, Token, TokenKind};

/// Error produced when no recognizer accepts the current character.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unexpected lexeme '{lexeme}' at line {}, column {}", span.line, span.column)]
pub struct LexError {
    pub lexeme: char,
    pub span: Span,
}

/// A token recognizer: consumes its class from the scanner or declines.
type Recognizer = fn(&mut Scanner) -> Option<Token>;

/// Recognition order for the grammar: punctuators, operators,
/// separators, then words. Each recognizer defers to the next on a
/// non-match; a character left over at the end of the chain is a fatal
/// lexical error.
const CHAIN: [Recognizer; 4] = [punctuator, operator, separator, word];

/// Streaming tokenizer over one build-spec file.
///
/// Produces tokens one at a time; only the most recently produced token
/// is retained (no further lookahead).
#[derive(Debug)]
pub struct Lexer {
    scanner: Scanner,
    last: Option<Token>,
}

impl Lexer {
    /// Lex a build-spec file.
    pub fn from_path(path: &Path) -> Result<Self, ScanError> {
        Ok(Self::new(Scanner::from_path(path)?))
    }

    /// Lex an in-memory source string.
    #[must_use]
    pub fn from_source(source: &str) -> Self {
        Self::new(Scanner::from_source(source))
    }

    #[must_use]
    pub const fn new(scanner: Scanner) -> Self {
        Self {
            scanner,
            last: None,
        }
    }

    /// Produce the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        let Some(ch) = self.scanner.get() else {
            self.last = None;
            return Ok(None);
        };
        for recognize in CHAIN {
            if let Some(token) = recognize(&mut self.scanner) {
                self.last = Some(token.clone());
                return Ok(Some(token));
            }
        }
        Err(LexError {
            lexeme: ch,
            span: self.scanner.span(),
        })
    }

    /// The most recently produced token, if any.
    #[must_use]
    pub const fn last(&self) -> Option<&Token> {
        self.last.as_ref()
    }

    /// Current source location, for diagnostics.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.scanner.span()
    }

    /// Current line and position, for diagnostics.
    #[must_use]
    pub fn context(&self) -> Context {
        self.scanner.context()
    }
}

fn punctuator(scanner: &mut Scanner) -> Option<Token> {
    let ch = scanner.get()?;
    let punct = Punct::from_char(ch)?;
    let span = scanner.span();
    scanner.advance();
    Some(Token {
        kind: TokenKind::Punctuator(punct),
        text: ch.to_string(),
        span,
    })
}

fn operator(scanner: &mut Scanner) -> Option<Token> {
    let ch = scanner.get()?;
    let op = Op::from_char(ch)?;
    let span = scanner.span();
    scanner.advance();
    Some(Token {
        kind: TokenKind::Operator(op),
        text: ch.to_string(),
        span,
    })
}

fn separator(scanner: &mut Scanner) -> Option<Token> {
    let ch = scanner.get()?;
    if ch != ' ' {
        return None;
    }
    let span = scanner.span();
    scanner.advance();
    Some(Token {
        kind: TokenKind::Separator,
        text: " ".to_string(),
        span,
    })
}

fn word(scanner: &mut Scanner) -> Option<Token> {
    let span = scanner.span();
    let mut text = String::new();
    while let Some(ch) = scanner.get() {
        if !is_word_char(ch) {
            break;
        }
        text.push(ch);
        scanner.advance();
    }
    if text.is_empty() {
        return None;
    }
    Some(Token {
        kind: TokenKind::Word,
        text,
        span,
    })
}

const fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '+' || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::from_source(source);
        let mut out = Vec::new();
        while let Some(token) = lexer.next_token().expect("lex failed") {
            out.push(token);
        }
        out
    }

    fn texts(source: &str) -> Vec<String> {
        tokens(source).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn statement_tokens() {
        let all = tokens("!prj \"demo\"");
        let kinds: Vec<_> = all.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Punctuator(Punct::Bang),
                TokenKind::Word,
                TokenKind::Separator,
                TokenKind::Punctuator(Punct::Quote),
                TokenKind::Word,
                TokenKind::Punctuator(Punct::Quote),
            ]
        );
        assert_eq!(all[1].text, "prj");
        assert_eq!(all[4].text, "demo");
    }

    #[test]
    fn words_are_maximal_runs() {
        assert_eq!(texts("main.cpp"), vec!["main", ".", "cpp"]);
        assert_eq!(texts("c++20"), vec!["c++20"]);
        assert_eq!(texts("-O2"), vec!["-", "O2"]);
    }

    #[test]
    fn operators_and_separators() {
        let all = tokens("x = $y");
        let kinds: Vec<_> = all.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Word,
                TokenKind::Separator,
                TokenKind::Operator(Op::Equals),
                TokenKind::Separator,
                TokenKind::Operator(Op::Dollar),
                TokenKind::Word,
            ]
        );
    }

    #[test]
    fn comments_and_blank_lines_vanish() {
        assert_eq!(texts("# comment\n\n!prj # tail\n"), vec!["!", "prj"]);
    }

    #[test]
    fn end_of_input_is_none() {
        let mut lexer = Lexer::from_source("a");
        assert!(lexer.next_token().expect("lex").is_some());
        assert!(lexer.next_token().expect("lex").is_none());
        assert!(lexer.next_token().expect("lex").is_none());
    }

    #[test]
    fn unexpected_lexeme_reports_position() {
        let mut lexer = Lexer::from_source("!prj @");
        while let Ok(Some(_)) = lexer.next_token() {}
        let err = lexer.next_token().unwrap_err();
        assert_eq!(err.lexeme, '@');
        assert_eq!(err.span.line, 1);
        assert_eq!(err.span.column, 5);
    }

    #[test]
    fn last_tracks_most_recent_token() {
        let mut lexer = Lexer::from_source("ab cd");
        assert!(lexer.last().is_none());
        lexer.next_token().expect("lex");
        assert_eq!(lexer.last().map(|t| t.text.as_str()), Some("ab"));
    }

    #[test]
    fn spans_follow_lines() {
        let all = tokens("!files\n[\"a\"]");
        assert_eq!(all[0].span, Span { line: 1, column: 0 });
        assert_eq!(all[2].span, Span { line: 2, column: 0 });
    }
}
