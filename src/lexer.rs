use std::sync::Arc;

use crate::diagnostic::{Diagnostic, DiagnosticKind, ReportContext};
use crate::token::{Position, Span, Token, TokenKind};

/// Number of diagnostics after which lexing of a file stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLimit {
    Limit(usize),
    Unlimited,
}

impl ErrorLimit {
    pub const DEFAULT: usize = 15;

    const fn reached(self, count: usize) -> bool {
        match self {
            Self::Limit(limit) => count >= limit,
            Self::Unlimited => false,
        }
    }
}

impl Default for ErrorLimit {
    fn default() -> Self {
        Self::Limit(Self::DEFAULT)
    }
}

/// Raw integer convention: `0` selects the default, negative means no limit.
impl From<i64> for ErrorLimit {
    fn from(raw: i64) -> Self {
        match usize::try_from(raw) {
            Ok(0) => Self::default(),
            Ok(limit) => Self::Limit(limit),
            Err(_) => Self::Unlimited,
        }
    }
}

/// Result of tokenizing one file.
#[derive(Debug, Clone)]
pub struct Lexed {
    /// Tokens, always terminated by exactly one [`TokenKind::Eof`].
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
    /// Source holder shared with the parser and every node it builds.
    pub report: Arc<ReportContext>,
    /// Lexing stopped because the hard error limit was reached.
    pub stopped_early: bool,
}

impl Lexed {
    /// Tokenization succeeded only when it produced no diagnostics.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Tokenize Pretzel source text.
///
/// Unrecognized characters produce one diagnostic each and lexing moves on.
/// Once the number of diagnostics reaches `limit` the rest of the file is
/// abandoned and [`Lexed::stopped_early`] is set.
#[must_use]
pub fn tokenize(input: &str, file: &str, limit: ErrorLimit) -> Lexed {
    Lexer::new(input, file, limit).tokenize()
}

/// Operators tried in order, longest first.
const OPERATORS: &[(&str, TokenKind)] = &[
    ("...", TokenKind::DotDotDot),
    ("^^=", TokenKind::CaretCaretEq),
    ("&&=", TokenKind::AmpAmpEq),
    ("**=", TokenKind::StarStarEq),
    ("||=", TokenKind::PipePipeEq),
    ("<<=", TokenKind::ShlEq),
    (">>=", TokenKind::ShrEq),
    ("!=", TokenKind::BangEq),
    ("==", TokenKind::EqEq),
    ("<=", TokenKind::LessEq),
    (">=", TokenKind::GreaterEq),
    ("/=", TokenKind::SlashEq),
    ("*=", TokenKind::StarEq),
    ("+=", TokenKind::PlusEq),
    ("-=", TokenKind::MinusEq),
    ("&=", TokenKind::AmpEq),
    ("^=", TokenKind::CaretEq),
    ("%=", TokenKind::PercentEq),
    ("|=", TokenKind::PipeEq),
    ("--", TokenKind::MinusMinus),
    ("++", TokenKind::PlusPlus),
    ("||", TokenKind::PipePipe),
    ("^^", TokenKind::CaretCaret),
    ("&&", TokenKind::AmpAmp),
    ("**", TokenKind::StarStar),
    ("..", TokenKind::DotDot),
    ("<<", TokenKind::Shl),
    (">>", TokenKind::Shr),
    ("_", TokenKind::Floor),
    ("=", TokenKind::Eq),
    ("~", TokenKind::Tilde),
    (">", TokenKind::Greater),
    ("<", TokenKind::Less),
    ("|", TokenKind::Pipe),
    ("!", TokenKind::Bang),
    ("?", TokenKind::Question),
    ("#", TokenKind::Hash),
    ("@", TokenKind::At),
    ("%", TokenKind::Percent),
    ("^", TokenKind::Caret),
    ("&", TokenKind::Amp),
    ("-", TokenKind::Minus),
    ("+", TokenKind::Plus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    (":", TokenKind::Colon),
    (",", TokenKind::Comma),
    (".", TokenKind::Dot),
    ("]", TokenKind::CloseBracket),
    ("[", TokenKind::OpenBracket),
    (")", TokenKind::CloseParen),
    ("(", TokenKind::OpenParen),
    ("}", TokenKind::CloseBrace),
    ("{", TokenKind::OpenBrace),
    (";", TokenKind::Semicolon),
];

const ROMAN_DIGITS: &[char] = &['i', 'v', 'x', 'l', 'c', 'd', 'm', '_'];

/// Saved cursor for one level of backtracking.
#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    pos: usize,
    line: usize,
    col: usize,
}

struct Lexer {
    input: Vec<char>,
    file: Arc<str>,
    report: Arc<ReportContext>,
    limit: ErrorLimit,
    pos: usize,
    line: usize,
    col: usize,
    backup: Checkpoint,
    /// Start of the token being scanned.
    start: Checkpoint,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl Lexer {
    fn new(input: &str, file: &str, limit: ErrorLimit) -> Self {
        let origin = Checkpoint {
            pos: 0,
            line: 0,
            col: 0,
        };
        Self {
            input: input.chars().collect(),
            file: Arc::from(file),
            report: Arc::new(ReportContext::new(input.to_string())),
            limit,
            pos: 0,
            line: 0,
            col: 0,
            backup: origin,
            start: origin,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn tokenize(mut self) -> Lexed {
        let mut stopped_early = false;

        while !self.at_end() {
            self.scan_token();
            if self.limit.reached(self.diagnostics.len()) {
                stopped_early = true;
                tracing::warn!(
                    file = %self.file,
                    diagnostics = self.diagnostics.len(),
                    "hard error limit reached, abandoning file"
                );
                break;
            }
        }

        let eof_span = self.tokens.last().map_or_else(
            || Span::empty(Arc::clone(&self.file), Position::default()),
            |last| last.span.clone(),
        );
        self.tokens.push(Token {
            kind: TokenKind::Eof,
            text: String::new(),
            span: eof_span,
        });

        tracing::debug!(
            file = %self.file,
            tokens = self.tokens.len(),
            diagnostics = self.diagnostics.len(),
            "tokenized"
        );

        Lexed {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
            report: self.report,
            stopped_early,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        if ch == '\n' {
            self.line += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
        self.pos += 1;
        Some(ch)
    }

    const fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            line: self.line,
            col: self.col,
        }
    }

    const fn save(&mut self) {
        self.backup = self.checkpoint();
    }

    const fn restore(&mut self) {
        self.pos = self.backup.pos;
        self.line = self.backup.line;
        self.col = self.backup.col;
    }

    /// Consume `want` if the input continues with it.
    fn match_str(&mut self, want: &str) -> bool {
        let len = want.chars().count();
        if self.pos + len > self.input.len() {
            return false;
        }
        if !want
            .chars()
            .zip(&self.input[self.pos..self.pos + len])
            .all(|(a, &b)| a == b)
        {
            return false;
        }
        for _ in 0..len {
            self.advance();
        }
        true
    }

    fn begin(&mut self) {
        self.start = self.checkpoint();
    }

    /// Span from the start of the current token to the cursor.
    fn current_span(&self) -> Span {
        Span::new(
            Arc::clone(&self.file),
            Position::new(self.start.line, self.start.col),
            Position::new(self.line, self.col),
        )
    }

    fn lexeme(&self) -> String {
        self.input[self.start.pos..self.pos].iter().collect()
    }

    fn push_token(&mut self, kind: TokenKind) {
        let text = self.lexeme();
        let span = self.current_span();
        self.tokens.push(Token { kind, text, span });
    }

    fn error(&mut self, kind: DiagnosticKind, span: &Span, args: Vec<String>) {
        self.diagnostics
            .push(Diagnostic::at(kind, span, &self.report, args));
    }

    fn scan_token(&mut self) {
        self.begin();
        let Some(ch) = self.peek() else {
            return;
        };

        if ch.is_whitespace() {
            self.advance();
            return;
        }

        if ch == '/' && self.peek_at(1) == Some('/') {
            self.skip_line_comment();
            return;
        }
        if ch == '/' && self.peek_at(1) == Some('*') {
            self.skip_block_comment();
            return;
        }

        if ch == '_' && self.peek_at(1).is_some_and(is_identifier_continue) {
            self.identifier_or_keyword();
            return;
        }

        for (text, kind) in OPERATORS {
            if self.match_str(text) {
                self.push_token(kind.clone());
                return;
            }
        }

        if ch.is_alphabetic() {
            self.identifier_or_keyword();
        } else if ch == '"' || ch == '\'' {
            self.string_literal();
        } else if ch.is_ascii_digit() {
            self.number();
        } else {
            self.advance();
            let span = self.current_span();
            self.error(
                DiagnosticKind::UnexpectedCharacter,
                &span,
                vec![ch.to_string()],
            );
        }
    }

    fn skip_line_comment(&mut self) {
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) {
        self.advance();
        self.advance();
        loop {
            if self.match_str("*/") {
                return;
            }
            if self.advance().is_none() {
                let span = self.current_span();
                self.error(DiagnosticKind::UnterminatedBlockComment, &span, Vec::new());
                return;
            }
        }
    }

    fn identifier_or_keyword(&mut self) {
        while self.peek().is_some_and(is_identifier_continue) {
            self.advance();
        }
        let text = self.lexeme();
        let kind = TokenKind::keyword(&text).unwrap_or(TokenKind::Identifier);
        self.push_token(kind);
    }

    fn string_literal(&mut self) {
        let Some(quote) = self.advance() else {
            return;
        };
        let mut value = String::new();

        loop {
            let Some(ch) = self.advance() else {
                let span = self.current_span();
                self.error(DiagnosticKind::UnterminatedString, &span, Vec::new());
                break;
            };

            if ch == quote {
                break;
            }
            if ch != '\\' {
                value.push(ch);
                continue;
            }

            let escape_start = Position::new(self.line, self.col.saturating_sub(1));
            match self.advance() {
                Some('n') => value.push('\n'),
                Some('r') => value.push('\r'),
                Some('b') => value.push('\u{8}'),
                Some('t') => value.push('\t'),
                Some('\\') => value.push('\\'),
                Some('x') => self.hex_escape(&mut value, escape_start),
                Some(c) if c == quote => value.push(quote),
                Some(other) => {
                    let span = self.escape_span(escape_start);
                    self.error(
                        DiagnosticKind::IllegalEscapeCharacter,
                        &span,
                        vec![other.to_string()],
                    );
                }
                // the next iteration reports the unterminated string
                None => {}
            }
        }

        self.push_token(TokenKind::String { value });
    }

    fn hex_escape(&mut self, value: &mut String, escape_start: Position) {
        let mut digits = String::new();
        while digits.len() < 2 && self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
            if let Some(c) = self.advance() {
                digits.push(c);
            }
        }

        let decoded = if digits.len() == 2 {
            u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32)
        } else {
            None
        };
        if let Some(c) = decoded {
            value.push(c);
        } else {
            let span = self.escape_span(escape_start);
            self.error(DiagnosticKind::IllegalEscapeLength, &span, Vec::new());
        }
    }

    fn escape_span(&self, start: Position) -> Span {
        Span::new(
            Arc::clone(&self.file),
            start,
            Position::new(self.line, self.col),
        )
    }

    fn number(&mut self) {
        let Some(first) = self.advance() else {
            return;
        };

        if first == '0' {
            self.save();
            let radix = match self.advance().map(|c| c.to_ascii_lowercase()) {
                Some('x') => Some(TokenKind::HexNumber),
                Some('b') => Some(TokenKind::BinNumber),
                Some('o') => Some(TokenKind::OctNumber),
                Some('r') => Some(TokenKind::RomanNumber),
                _ => None,
            };

            if let Some(kind) = radix {
                if self.peek().is_some_and(|c| is_radix_digit(&kind, c)) {
                    while self.peek().is_some_and(|c| is_radix_digit(&kind, c)) {
                        self.advance();
                    }
                    self.push_token(kind);
                    return;
                }
            }
            self.restore();
        }

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        self.push_token(TokenKind::Number);
    }
}

fn is_radix_digit(kind: &TokenKind, ch: char) -> bool {
    match kind {
        TokenKind::HexNumber => ch.is_ascii_hexdigit(),
        TokenKind::BinNumber => ch == '0' || ch == '1',
        TokenKind::OctNumber => ('0'..='7').contains(&ch),
        TokenKind::RomanNumber => ROMAN_DIGITS.contains(&ch.to_ascii_lowercase()),
        _ => ch.is_ascii_digit(),
    }
}

fn is_identifier_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
