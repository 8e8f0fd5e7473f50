//! Diagnostic records shared by the lexer, the parser and analysis passes.

use std::fmt;

use crate::token::Span;

/// Classifies a diagnostic.
///
/// Variants are ordered: every kind from [`DiagnosticKind::RedundantParentheses`]
/// onwards is a warning, everything before it is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    UnexpectedCharacter,
    UnterminatedString,
    UnterminatedBlockComment,
    IllegalEscapeCharacter,
    IllegalEscapeLength,
    UnexpectedToken,
    UnexpectedEndOfInput,
    ExpectedIdentifier,
    ExpectedSemicolon,
    ExpectedArgumentList,
    ExpectedArrayCloseBracket,
    ExpectedBlockOpen,
    ExpectedBlockClose,
    ExpectedOperator,
    ExpectedExpression,
    ExpectedClosingParen,
    ExpectedSubscriptCloseBracket,
    NestingTooDeep,
    ReferencedEntityNotVariable,
    NoSuchVariable,

    RedundantParentheses,
    RedundantParenthesesInExpressionStatement,
    IneffectiveExpressionStatement,
}

/// Severity of a diagnostic, derived from its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

impl DiagnosticKind {
    #[must_use]
    pub fn is_warning(self) -> bool {
        self >= Self::RedundantParentheses
    }

    #[must_use]
    pub fn severity(self) -> Severity {
        if self.is_warning() {
            Severity::Warning
        } else {
            Severity::Error
        }
    }

    /// Message template; `{0}`, `{1}`, ... are replaced by format arguments.
    #[must_use]
    pub const fn template(self) -> &'static str {
        match self {
            Self::UnexpectedCharacter => "unexpected character '{0}'",
            Self::UnterminatedString => "missing closing quote in string literal",
            Self::UnterminatedBlockComment => "missing */ in block comment",
            Self::IllegalEscapeCharacter => "illegal character '{0}' after \\ in escape sequence",
            Self::IllegalEscapeLength => "illegal length of hexadecimal escape",
            Self::UnexpectedToken => "unexpected token: {0}",
            Self::UnexpectedEndOfInput => "unexpected end of input",
            Self::ExpectedIdentifier => "expected identifier, got {0}",
            Self::ExpectedSemicolon => "expected a semicolon after {0}",
            Self::ExpectedArgumentList => "expected function argument list",
            Self::ExpectedArrayCloseBracket => "expected closing ']' for array or generic type",
            Self::ExpectedBlockOpen => "expected '{' to start a block",
            Self::ExpectedBlockClose => "expected '}' to end a block",
            Self::ExpectedOperator => "expected an operator, got {0}",
            Self::ExpectedExpression => "expected expression",
            Self::ExpectedClosingParen => "expected closing parenthesis",
            Self::ExpectedSubscriptCloseBracket => "expected closing ']' for subscript",
            Self::NestingTooDeep => "nesting is too deep (maximum {0} levels)",
            Self::ReferencedEntityNotVariable => "symbol {0} is not a variable",
            Self::NoSuchVariable => "symbol {0} not found in scope",
            Self::RedundantParentheses => "redundant parentheses around expression",
            Self::RedundantParenthesesInExpressionStatement => {
                "redundant parentheses in expression statement"
            }
            Self::IneffectiveExpressionStatement => "expression statement has no effect",
        }
    }

    /// Fill the message template with positional arguments.
    #[must_use]
    pub fn render(self, args: &[String]) -> String {
        let mut message = self.template().to_string();
        for (i, arg) in args.iter().enumerate() {
            message = message.replace(&format!("{{{i}}}"), arg);
        }
        message
    }
}

/// Holds the full source text of one file.
///
/// One instance is created per file and shared by every token-derived node
/// and diagnostic from that file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    pub source: String,
}

impl ReportContext {
    #[must_use]
    pub const fn new(source: String) -> Self {
        Self { source }
    }

    /// The text of a zero-based line, or an empty string past the end.
    #[must_use]
    pub fn line(&self, line: usize) -> &str {
        self.source.lines().nth(line).unwrap_or("")
    }
}

/// A lexical, syntactic or semantic finding with its source extent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} at {}", .kind.render(.args), .begin)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub begin: Span,
    pub end: Span,
    /// The source line `begin` starts on.
    pub source_line: String,
    pub args: Vec<String>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(
        kind: DiagnosticKind,
        begin: Span,
        end: Span,
        report: &ReportContext,
        args: Vec<String>,
    ) -> Self {
        let source_line = report.line(begin.start.line).to_string();
        Self {
            kind,
            begin,
            end,
            source_line,
            args,
        }
    }

    /// Build a diagnostic whose begin and end are the same span.
    #[must_use]
    pub fn at(kind: DiagnosticKind, span: &Span, report: &ReportContext, args: Vec<String>) -> Self {
        Self::new(kind, span.clone(), span.clone(), report, args)
    }

    #[must_use]
    pub fn message(&self) -> String {
        self.kind.render(&self.args)
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}
