/// Source location for error reporting.
///
/// Lines are 1-based; columns are 0-based byte offsets into the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

/// Fixed single-character punctuators of the build-spec grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punct {
    /// `[`
    OpenBracket,
    /// `]`
    CloseBracket,
    /// `!`
    Bang,
    /// `"`
    Quote,
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `/`
    Slash,
    /// `\`
    Backslash,
    /// `-`
    Minus,
}

impl Punct {
    /// Classify a character as a punctuator.
    #[must_use]
    pub const fn from_char(ch: char) -> Option<Self> {
        match ch {
            '[' => Some(Self::OpenBracket),
            ']' => Some(Self::CloseBracket),
            '!' => Some(Self::Bang),
            '"' => Some(Self::Quote),
            '.' => Some(Self::Dot),
            ',' => Some(Self::Comma),
            '/' => Some(Self::Slash),
            '\\' => Some(Self::Backslash),
            '-' => Some(Self::Minus),
            _ => None,
        }
    }

    /// The literal character of this punctuator.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::OpenBracket => '[',
            Self::CloseBracket => ']',
            Self::Bang => '!',
            Self::Quote => '"',
            Self::Dot => '.',
            Self::Comma => ',',
            Self::Slash => '/',
            Self::Backslash => '\\',
            Self::Minus => '-',
        }
    }
}

/// Operators of the build-spec grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// `=`
    Equals,
    /// `$`
    Dollar,
}

impl Op {
    /// Classify a character as an operator.
    #[must_use]
    pub const fn from_char(ch: char) -> Option<Self> {
        match ch {
            '=' => Some(Self::Equals),
            '$' => Some(Self::Dollar),
            _ => None,
        }
    }

    /// The literal character of this operator.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Equals => '=',
            Self::Dollar => '$',
        }
    }
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Maximal run of word characters (alphanumerics, `+`, `_`).
    Word,
    /// One of `[ ] ! " . , / \ -`.
    Punctuator(Punct),
    /// `=` or `$`.
    Operator(Op),
    /// A single space between tokens.
    Separator,
}

/// A single token with its kind, literal text, and source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}
