use std::fmt;
use std::sync::Arc;

/// A zero-based line/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Source extent of a token or node.
///
/// Lines and columns are zero-based; `end` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    pub file: Arc<str>,
    pub start: Position,
    pub end: Position,
}

impl Span {
    #[must_use]
    pub const fn new(file: Arc<str>, start: Position, end: Position) -> Self {
        Self { file, start, end }
    }

    /// A zero-width span at `at`.
    #[must_use]
    pub const fn empty(file: Arc<str>, at: Position) -> Self {
        Self {
            file,
            start: at,
            end: at,
        }
    }

    /// The zero-width span at this span's start.
    #[must_use]
    pub fn collapse_to_start(&self) -> Self {
        Self::empty(Arc::clone(&self.file), self.start)
    }

    /// The smallest span enclosing both `self` and `other`.
    #[must_use]
    pub fn cover(&self, other: &Self) -> Self {
        Self {
            file: Arc::clone(&self.file),
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    #[must_use]
    pub fn encloses(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.file,
            self.start.line + 1,
            self.start.column + 1
        )
    }
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `;`
    Semicolon,
    /// `{`
    OpenBrace,
    /// `}`
    CloseBrace,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `[`
    OpenBracket,
    /// `]`
    CloseBracket,
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `/`
    Slash,
    /// `*`
    Star,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `&`
    Amp,
    /// `^`
    Caret,
    /// `%`
    Percent,
    /// `@`
    At,
    /// `#`
    Hash,
    /// `!`
    Bang,
    /// `?`
    Question,
    /// `|`
    Pipe,
    /// A lone `_`.
    Floor,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `~`
    Tilde,
    /// `=`
    Eq,

    /// `/=`
    SlashEq,
    /// `*=`
    StarEq,
    /// `+=`
    PlusEq,
    /// `-=`
    MinusEq,
    /// `&=`
    AmpEq,
    /// `^=`
    CaretEq,
    /// `%=`
    PercentEq,
    /// `|=`
    PipeEq,
    /// `^^=`
    CaretCaretEq,
    /// `&&=`
    AmpAmpEq,
    /// `**=`
    StarStarEq,
    /// `||=`
    PipePipeEq,
    /// `<<=`
    ShlEq,
    /// `>>=`
    ShrEq,
    /// `..`
    DotDot,
    /// `...`
    DotDotDot,
    /// `++`
    PlusPlus,
    /// `--`
    MinusMinus,
    /// `**`
    StarStar,
    /// `&&`
    AmpAmp,
    /// `^^`
    CaretCaret,
    /// `||`
    PipePipe,
    /// `>=`
    GreaterEq,
    /// `<=`
    LessEq,
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `<<`
    Shl,
    /// `>>`
    Shr,

    // Keywords
    As,
    Is,
    To,
    In,
    If,
    No,
    For,
    Use,
    Yes,
    Let,
    From,
    Func,
    Else,
    While,
    Class,

    /// Single- or double-quoted string, carrying its unescaped value.
    String { value: String },
    /// Decimal number: `8293742984`.
    Number,
    /// Hexadecimal number: `0xAB23`.
    HexNumber,
    /// Binary number: `0b1010`.
    BinNumber,
    /// Octal number: `0o1725`.
    OctNumber,
    /// Roman number: `0rIIICXVI`.
    RomanNumber,
    /// `this_is_an_identifier`
    Identifier,

    /// Synthetic end-of-input marker.
    Eof,
}

impl TokenKind {
    /// Look up a keyword by its exact text.
    #[must_use]
    pub fn keyword(text: &str) -> Option<Self> {
        let kind = match text {
            "while" => Self::While,
            "class" => Self::Class,
            "else" => Self::Else,
            "from" => Self::From,
            "func" => Self::Func,
            "for" => Self::For,
            "use" => Self::Use,
            "yes" => Self::Yes,
            "let" => Self::Let,
            "if" => Self::If,
            "in" => Self::In,
            "to" => Self::To,
            "is" => Self::Is,
            "as" => Self::As,
            "no" => Self::No,
            _ => return None,
        };
        Some(kind)
    }

    #[must_use]
    pub const fn is_keyword(&self) -> bool {
        matches!(
            self,
            Self::As
                | Self::Is
                | Self::To
                | Self::In
                | Self::If
                | Self::No
                | Self::For
                | Self::Use
                | Self::Yes
                | Self::Let
                | Self::From
                | Self::Func
                | Self::Else
                | Self::While
                | Self::Class
        )
    }

    /// Human-readable name used in diagnostics.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Semicolon => "semicolon",
            Self::OpenBrace => "opening brace",
            Self::CloseBrace => "closing brace",
            Self::OpenParen => "opening paren",
            Self::CloseParen => "closing paren",
            Self::OpenBracket => "opening bracket",
            Self::CloseBracket => "closing bracket",
            Self::String { .. } => "string",
            Self::Number
            | Self::HexNumber
            | Self::BinNumber
            | Self::OctNumber
            | Self::RomanNumber => "number",
            Self::Identifier => "identifier",
            Self::Eof => "end of input",
            kind if kind.is_keyword() => "keyword",
            _ => "operator",
        }
    }
}

/// A single token with its kind, exact source text, and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == TokenKind::Eof {
            write!(f, "{}", self.kind.describe())
        } else {
            write!(f, "{} '{}'", self.kind.describe(), self.text)
        }
    }
}
