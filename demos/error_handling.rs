//! Demonstrate diagnostics for invalid Pretzel input.

use pretzel::{Error, Options, check_source};

fn report(name: &str, input: &str) {
    println!("{name}:");
    match check_source(input, "demo.pz", &Options::default()) {
        Ok(diagnostics) if diagnostics.is_empty() => println!("  No diagnostics"),
        Ok(diagnostics) => {
            for diagnostic in &diagnostics {
                println!("  {}: {diagnostic}", diagnostic.severity());
            }
        }
        Err(Error::Lex {
            diagnostics,
            stopped_early,
            ..
        }) => {
            for diagnostic in &diagnostics {
                println!("  Lex error: {diagnostic}");
                println!("    Kind: {:?}", diagnostic.kind);
                println!("    Line: {}", diagnostic.source_line);
            }
            if stopped_early {
                println!("  Lexing stopped at the error limit");
            }
        }
        Err(Error::Parse { diagnostics, .. }) => {
            for diagnostic in &diagnostics {
                println!("  Parse error: {diagnostic}");
                println!("    Kind: {:?}", diagnostic.kind);
                println!("    Line: {}", diagnostic.source_line);
            }
        }
        Err(e) => println!("  {e}"),
    }
    println!();
}

fn main() {
    report("Unterminated string", "let s = \"unclosed;\n");
    report("Missing semicolon", "let x = 1\nlet y = 2;\n");
    report("Unknown variable", "func f() { let a = b + 1; }\n");
    report("Statement with no effect", "func f() { let a = 1; a + 1; }\n");
}
