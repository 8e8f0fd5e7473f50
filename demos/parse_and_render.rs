//! Parse a Pretzel source string, list its items and print the tree.

use pretzel::ast::{Item, Statement};
use pretzel::{Options, analyze, parse_source, printer};

fn main() -> Result<(), pretzel::Error> {
    let input = "\
use std.io;

func area(width int, height int) int {
\tlet result = width * height;
}

let unit = area(1, 1);
";

    let options = Options::default();
    let parsed = parse_source(input, "shapes.pz", &options)?;

    println!("Items: {}", parsed.root.items.len());
    for item in &parsed.root.items {
        match item {
            Item::Function(function) => {
                println!("  Function: {} ({} args)", function.name, function.args.len());
            }
            Item::Statement(Statement::Use(_)) => println!("  Use"),
            Item::Statement(Statement::VariableDeclaration(declaration)) => {
                println!("  Variable: {}", declaration.name);
            }
            Item::Statement(Statement::Expression(_)) => println!("  Expression"),
        }
    }

    println!("\nTree:\n{}", printer::render(&parsed.root));

    let diagnostics = analyze(&parsed, &options);
    println!("Analysis diagnostics: {}", diagnostics.len());
    for diagnostic in &diagnostics {
        println!("  {}: {diagnostic}", diagnostic.severity());
    }
    Ok(())
}
