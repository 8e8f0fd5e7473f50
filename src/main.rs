//! CLI tool to check Pretzel source files and inspect their tokens and trees.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use pretzel::{Diagnostic, Error, ErrorLimit, Options};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pretzel", version, about = "Pretzel compiler front end")]
struct Cli {
    /// Increase logging verbosity (-v: debug, -vv+: trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Lex, parse and analyze files or directories of `.pz` files
    Check {
        /// Lexer hard error limit (0: default, negative: unlimited)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        error_limit: i64,

        /// Skip the statement lint warnings
        #[arg(long)]
        no_lint: bool,

        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Print the tokens of a file, one per line
    Tokens { file: PathBuf },
    /// Print the syntax tree of a file
    Tree { file: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("PRETZEL_LOG")
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(cli.verbose))),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Check {
            error_limit,
            no_lint,
            paths,
        } => {
            let options = Options {
                error_limit: ErrorLimit::from(error_limit),
                lint: !no_lint,
            };
            check(&paths, &options)
        }
        Command::Tokens { file } => tokens(&file),
        Command::Tree { file } => tree(&file),
    }
}

const fn directive_for_verbosity(v: u8) -> &'static str {
    match v {
        0 => "pretzel=warn",
        1 => "pretzel=debug",
        _ => "pretzel=trace",
    }
}

fn print_diagnostic(diagnostic: &Diagnostic) {
    eprintln!("{}: {diagnostic}", diagnostic.severity());
    if !diagnostic.source_line.is_empty() {
        eprintln!("    {}", diagnostic.source_line);
    }
}

/// Print everything `error` carries.
fn report_error(error: &Error) {
    match error {
        Error::Io { .. } => eprintln!("{error}"),
        Error::Lex {
            diagnostics,
            stopped_early,
            ..
        } => {
            diagnostics.iter().for_each(print_diagnostic);
            if *stopped_early {
                eprintln!("{error}; too many errors, giving up");
            }
        }
        Error::Parse { diagnostics, .. } => diagnostics.iter().for_each(print_diagnostic),
    }
}

fn check(paths: &[PathBuf], options: &Options) -> ExitCode {
    let mut had_error = false;

    for path in paths {
        let files = match pretzel::find_sources(path) {
            Ok(files) => files,
            Err(e) => {
                report_error(&e);
                had_error = true;
                continue;
            }
        };

        for file in files {
            match pretzel::check_file(&file, options) {
                Ok(diagnostics) => {
                    diagnostics.iter().for_each(print_diagnostic);
                    had_error |= diagnostics.iter().any(Diagnostic::is_error);
                    if diagnostics.is_empty() {
                        tracing::info!(file = %file.display(), "ok");
                    }
                }
                Err(e) => {
                    report_error(&e);
                    had_error = true;
                }
            }
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn read(path: &Path) -> Result<String, Error> {
    std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn tokens(path: &Path) -> ExitCode {
    let text = match read(path) {
        Ok(text) => text,
        Err(e) => {
            report_error(&e);
            return ExitCode::FAILURE;
        }
    };

    let lexed = pretzel::tokenize(&text, &path.to_string_lossy(), ErrorLimit::default());
    for token in &lexed.tokens {
        let start = &token.span.start;
        println!("{}:{}\t{token}", start.line + 1, start.column + 1);
    }
    lexed.diagnostics.iter().for_each(print_diagnostic);

    if lexed.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn tree(path: &Path) -> ExitCode {
    let parsed = read(path).and_then(|text| {
        pretzel::parse_source(&text, &path.to_string_lossy(), &Options::default())
    });
    match parsed {
        Ok(parsed) => {
            print!("{}", pretzel::printer::render(&parsed.root));
            ExitCode::SUCCESS
        }
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}
