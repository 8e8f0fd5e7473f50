//! Front end for the Pretzel programming language: lexer, parser, syntax
//! tree, scope chain and analysis passes.
//!
//! Source text is tokenized by [`tokenize`], turned into a [`RootNode`] plus
//! its [`ScopeTree`] by [`parse`], and then checked by the passes in
//! [`pass`]. Every stage reports problems as [`Diagnostic`] values instead
//! of failing.
//!
//! # Quick start
//!
//! ```
//! use pretzel::{Options, analyze, parse_source, printer};
//!
//! let source = "func add(a int, b int) int { let c = a + b * 2; }";
//! let parsed = parse_source(source, "add.pz", &Options::default()).unwrap();
//! assert_eq!(
//!     printer::render(&parsed.root),
//!     "(func add ((a int) (b int)) int (block (let c = (+ a (* b 2)))))\n"
//! );
//! assert!(analyze(&parsed, &Options::default()).is_empty());
//! ```
//!
//! ## Working with diagnostics
//!
//! ```
//! use pretzel::{DiagnosticKind, ErrorLimit, tokenize, parse};
//!
//! let lexed = tokenize("let x = 1", "x.pz", ErrorLimit::default());
//! let parsed = parse(&lexed.tokens, &lexed.report);
//! assert_eq!(parsed.diagnostics[0].kind, DiagnosticKind::ExpectedSemicolon);
//! assert_eq!(
//!     parsed.diagnostics[0].to_string(),
//!     "expected a semicolon after variable declaration at x.pz:1:9"
//! );
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod ast;
pub mod diagnostic;
pub mod lexer;
pub mod parser;
pub mod pass;
pub mod printer;
pub mod scope;
pub mod token;
pub mod visit;

use std::path::{Path, PathBuf};

pub use ast::{Node, RootNode};
pub use diagnostic::{Diagnostic, DiagnosticKind, ReportContext, Severity};
pub use lexer::{ErrorLimit, Lexed, tokenize};
pub use parser::{Parsed, parse};
pub use pass::{ComboPass, Pass, ResolvePass, ScopeApplyPass, StatementLintPass};
pub use scope::{RefKind, ScopeId, ScopeTree};
pub use token::{Position, Span, Token, TokenKind};
pub use visit::{NodeRef, Visitor};

/// Extension of Pretzel source files, without the dot.
pub const SOURCE_EXTENSION: &str = "pz";

/// Whether `path` names a Pretzel source file.
#[must_use]
pub fn is_source_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
}

/// Settings for checking a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Lexer hard error limit.
    pub error_limit: ErrorLimit,
    /// Run the statement lint pass.
    pub lint: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            error_limit: ErrorLimit::default(),
            lint: true,
        }
    }
}

/// Failure to get a file through the front end.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The file could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Tokenizing reported diagnostics; the file was not parsed.
    #[error("{file}: {} lexical error(s)", .diagnostics.len())]
    Lex {
        file: String,
        diagnostics: Vec<Diagnostic>,
        /// The hard error limit cut lexing short.
        stopped_early: bool,
    },
    /// Parsing reported diagnostics; the tree was not analyzed.
    #[error("{file}: {} syntax error(s)", .diagnostics.len())]
    Parse {
        file: String,
        diagnostics: Vec<Diagnostic>,
    },
}

impl Error {
    /// Diagnostics carried by the error, if any.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::Io { .. } => &[],
            Self::Lex { diagnostics, .. } | Self::Parse { diagnostics, .. } => diagnostics,
        }
    }
}

/// Tokenize and parse one file in a single step.
///
/// Lexing and parsing must both be diagnostic-free; otherwise their
/// diagnostics are returned in the error.
pub fn parse_source(text: &str, file: &str, options: &Options) -> Result<Parsed, Error> {
    let lexed = tokenize(text, file, options.error_limit);
    if !lexed.succeeded() {
        return Err(Error::Lex {
            file: file.to_string(),
            diagnostics: lexed.diagnostics,
            stopped_early: lexed.stopped_early,
        });
    }

    let parsed = parse(&lexed.tokens, &lexed.report);
    if !parsed.succeeded() {
        return Err(Error::Parse {
            file: file.to_string(),
            diagnostics: parsed.diagnostics,
        });
    }
    Ok(parsed)
}

/// Run the analysis passes over a parsed file and return their diagnostics.
///
/// Populates the file's scopes as a side effect.
#[must_use]
pub fn analyze(parsed: &Parsed, options: &Options) -> Vec<Diagnostic> {
    let mut combo = ComboPass::new()
        .with(ScopeApplyPass::new(&parsed.scopes))
        .with(ResolvePass::new(&parsed.scopes));
    if options.lint {
        combo.push(Box::new(StatementLintPass::new()));
    }
    combo.run(&parsed.root);
    combo.into_diagnostics()
}

/// Parse and analyze source text, returning the analysis diagnostics.
pub fn check_source(text: &str, file: &str, options: &Options) -> Result<Vec<Diagnostic>, Error> {
    let parsed = parse_source(text, file, options)?;
    Ok(analyze(&parsed, options))
}

/// Read, parse and analyze one file.
pub fn check_file(path: &Path, options: &Options) -> Result<Vec<Diagnostic>, Error> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "checking file");
    check_source(&text, &path.to_string_lossy(), options)
}

/// Collect the source files under `path`.
///
/// A file is returned as-is whatever its extension; a directory is searched
/// recursively for files with [`SOURCE_EXTENSION`]. Results are sorted.
pub fn find_sources(path: &Path) -> Result<Vec<PathBuf>, Error> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let io_error = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut out = Vec::new();
    for entry in std::fs::read_dir(path).map_err(io_error)? {
        let entry_path = entry.map_err(io_error)?.path();
        if entry_path.is_dir() {
            out.extend(find_sources(&entry_path)?);
        } else if is_source_file(&entry_path) {
            out.push(entry_path);
        }
    }
    out.sort();
    Ok(out)
}
