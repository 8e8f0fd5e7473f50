//! Property-based tests with proptest.
//!
//! Generate random well-formed programs and check that they parse without
//! diagnostics, that every node span sits inside its parent's span and that
//! traversal is balanced. Random token soup must never hang or panic the
//! parser, and the same span invariants must hold for its recovery trees.

use pretzel::ast::QualifiedName;
use pretzel::visit::{NodeRef, walk_root};
use pretzel::{
    DiagnosticKind, ErrorLimit, Node, Options, Span, TokenKind, Visitor, analyze, parse, tokenize,
};
use proptest::prelude::*;

// -- Leaf strategies --

const KEYWORDS: &[&str] = &[
    "as", "is", "to", "in", "if", "no", "for", "use", "yes", "let", "from", "func", "else",
    "while", "class",
];

/// Identifier that is not a keyword.
fn ident() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,6}".prop_filter("keyword", |s| !KEYWORDS.contains(&s.as_str()))
}

fn number() -> impl Strategy<Value = String> {
    prop_oneof![
        "[1-9][0-9]{0,3}",
        "0x[0-9A-F]{1,4}",
        "0b[01]{1,6}",
        "0o[0-7]{1,3}",
    ]
}

fn atom() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => ident(),
        2 => number(),
        1 => "[a-z ]{0,8}".prop_map(|s| std::format!("\"{s}\"")),
        1 => prop_oneof![Just("yes".to_string()), Just("no".to_string())],
    ]
}

/// Expression source text, nested up to `depth` levels.
fn expression(depth: u32) -> BoxedStrategy<String> {
    if depth == 0 {
        return atom().boxed();
    }
    let sub = expression(depth - 1);
    let op = prop_oneof![
        Just("+"),
        Just("-"),
        Just("*"),
        Just("/"),
        Just("**"),
        Just("=="),
        Just("!="),
        Just("<"),
        Just(">="),
    ];
    prop_oneof![
        3 => atom(),
        2 => (sub.clone(), op, sub.clone()).prop_map(|(l, op, r)| std::format!("{l} {op} {r}")),
        1 => sub.clone().prop_map(|e| std::format!("({e})")),
        1 => sub.clone().prop_map(|e| std::format!("!{e}")),
        1 => (ident(), prop::collection::vec(sub.clone(), 0..=3))
            .prop_map(|(f, args)| std::format!("{f}({})", args.join(", "))),
        1 => (ident(), sub.clone()).prop_map(|(a, i)| std::format!("{a}[{i}]")),
        1 => (sub, ident()).prop_map(|(e, m)| std::format!("{e}.{m}")),
    ]
    .boxed()
}

fn data_type() -> impl Strategy<Value = String> {
    let atom = prop_oneof![Just("int"), Just("str"), Just("std.float")];
    (atom, 0..3_usize, any::<bool>(), any::<bool>()).prop_map(|(name, arrays, generic, nullable)| {
        let mut ty = if generic {
            std::format!("map[str, {name}]")
        } else {
            name.to_string()
        };
        ty = std::format!("{}{ty}{}", "[".repeat(arrays), "]".repeat(arrays));
        if nullable {
            ty.push('?');
        }
        ty
    })
}

fn declaration() -> impl Strategy<Value = String> {
    prop_oneof![
        (ident(), expression(2)).prop_map(|(n, e)| std::format!("let {n} = {e};")),
        (ident(), data_type()).prop_map(|(n, t)| std::format!("let {n} {t};")),
        (ident(), data_type(), expression(1))
            .prop_map(|(n, t, e)| std::format!("let {n} {t} = {e};")),
    ]
}

fn statement() -> impl Strategy<Value = String> {
    prop_oneof![
        2 => declaration(),
        1 => (ident(), expression(2)).prop_map(|(n, e)| std::format!("{n} = {e};")),
        1 => expression(2).prop_map(|e| std::format!("{e};")),
        1 => ident().prop_map(|n| std::format!("{n}++;")),
    ]
}

fn function() -> impl Strategy<Value = String> {
    (
        ident(),
        prop::collection::vec((ident(), data_type()), 0..=3),
        prop::option::of(data_type()),
        prop::collection::vec(statement(), 0..=4),
    )
        .prop_map(|(name, args, ret, body)| {
            let args: Vec<String> = args.iter().map(|(n, t)| std::format!("{n} {t}")).collect();
            let ret = ret.map(|t| std::format!(" {t}")).unwrap_or_default();
            std::format!(
                "func {name}({}){ret} {{\n    {}\n}}",
                args.join(", "),
                body.join("\n    ")
            )
        })
}

fn item() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => (ident(), ident()).prop_map(|(a, b)| std::format!("use {a}.{b};")),
        2 => declaration(),
        3 => function(),
    ]
}

fn program() -> impl Strategy<Value = String> {
    prop::collection::vec(item(), 0..=6).prop_map(|items| items.join("\n"))
}

/// Lexemes that always tokenize cleanly, for building token soup.
fn lexeme() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "func", "let", "use", "if", "while", "x", "y", "int", "1", "0x2", "\"s\"", "yes", "(",
        ")", "[", "]", "{", "}", ";", ",", ".", "..", "?", "=", "+=", "+", "-", "*", "**", "++",
        "--", "!", "==", "<", "_",
    ])
}

// -- Helpers --

/// Checks that every node lies inside its parent and that enters and exits
/// pair up.
#[derive(Default)]
struct SpanNesting {
    open: Vec<(String, Span)>,
    violations: Vec<String>,
    enters: usize,
}

impl Visitor for SpanNesting {
    fn enter_node(&mut self, node: NodeRef<'_>) {
        self.enters += 1;
        let span = node.span().clone();
        if let Some((parent_kind, parent)) = self.open.last() {
            if !parent.encloses(&span) {
                self.violations.push(std::format!(
                    "{} {:?}..{:?} escapes {parent_kind} {:?}..{:?}",
                    node.kind_name(),
                    span.start,
                    span.end,
                    parent.start,
                    parent.end
                ));
            }
        }
        self.open.push((node.kind_name().to_string(), span));
    }

    fn exit_node(&mut self, node: NodeRef<'_>) {
        match self.open.pop() {
            Some((kind, _)) if kind == node.kind_name() => {}
            other => self
                .violations
                .push(std::format!("unbalanced exit of {}: {other:?}", node.kind_name())),
        }
    }
}

fn qualified(segments: &[String]) -> QualifiedName {
    let refs: Vec<&str> = segments.iter().map(String::as_str).collect();
    QualifiedName::synthetic(&refs)
}

// -- Property tests --

proptest! {
    /// Well-formed programs lex and parse without any diagnostic.
    #[test]
    fn generated_programs_parse_cleanly(source in program()) {
        let lexed = tokenize(&source, "gen.pz", ErrorLimit::default());
        prop_assert!(lexed.succeeded(), "lex: {:?}\n{}", lexed.diagnostics, source);
        let parsed = parse(&lexed.tokens, &lexed.report);
        prop_assert!(parsed.succeeded(), "parse: {:?}\n{}", parsed.diagnostics, source);
        let top_level = source
            .lines()
            .filter(|l| l.starts_with("use ") || l.starts_with("let ") || l.starts_with("func "))
            .count();
        prop_assert_eq!(parsed.root.items.len(), top_level);
    }

    /// Every node span lies inside its parent's span and traversal is balanced.
    #[test]
    fn spans_nest(source in program()) {
        let lexed = tokenize(&source, "gen.pz", ErrorLimit::default());
        let parsed = parse(&lexed.tokens, &lexed.report);
        let mut nesting = SpanNesting::default();
        walk_root(&mut nesting, &parsed.root);
        prop_assert!(nesting.violations.is_empty(), "{:?}\n{}", nesting.violations, source);
        prop_assert!(nesting.open.is_empty());
        prop_assert!(nesting.enters > 0);
    }

    /// Analysis never fails on a clean tree and only reports what it may.
    #[test]
    fn analysis_runs_on_generated_programs(source in program()) {
        let lexed = tokenize(&source, "gen.pz", ErrorLimit::default());
        let parsed = parse(&lexed.tokens, &lexed.report);
        for diagnostic in analyze(&parsed, &Options::default()) {
            prop_assert!(
                diagnostic.kind >= DiagnosticKind::ReferencedEntityNotVariable,
                "unexpected {:?}", diagnostic.kind
            );
        }
    }

    /// Arbitrary token soup terminates, and recovery trees still nest.
    #[test]
    fn token_soup_recovers(lexemes in prop::collection::vec(lexeme(), 0..40)) {
        let source = lexemes.join(" ");
        let lexed = tokenize(&source, "soup.pz", ErrorLimit::default());
        prop_assert!(lexed.succeeded(), "{:?}", lexed.diagnostics);
        let parsed = parse(&lexed.tokens, &lexed.report);
        let mut nesting = SpanNesting::default();
        walk_root(&mut nesting, &parsed.root);
        prop_assert!(nesting.violations.is_empty(), "{:?}\n{}", nesting.violations, source);
        for item in &parsed.root.items {
            prop_assert!(parsed.root.span().encloses(item.span()));
        }
    }

    /// Apart from the end marker, the lexer never emits an empty token, and
    /// token starts never move backwards.
    #[test]
    fn lexer_tokens_are_non_empty(input in "\\PC{0,64}") {
        let lexed = tokenize(&input, "any.pz", ErrorLimit::Unlimited);
        let (eof, rest) = lexed.tokens.split_last().expect("end marker");
        prop_assert_eq!(&eof.kind, &TokenKind::Eof);
        for token in rest {
            prop_assert!(!token.text.is_empty(), "empty {:?}", token.kind);
            prop_assert!(token.kind != TokenKind::Eof);
        }
        for pair in lexed.tokens.windows(2) {
            prop_assert!(pair[0].span.start <= pair[1].span.start);
        }
    }

    /// Structural name matching is an equivalence relation.
    #[test]
    fn name_matching_is_equivalence(
        a in prop::collection::vec("[ab]", 1..3),
        b in prop::collection::vec("[ab]", 1..3),
        c in prop::collection::vec("[ab]", 1..3),
    ) {
        let (a, b, c) = (qualified(&a), qualified(&b), qualified(&c));
        prop_assert!(a.matches(&a));
        prop_assert_eq!(a.matches(&b), b.matches(&a));
        if a.matches(&b) && b.matches(&c) {
            prop_assert!(a.matches(&c));
        }
    }
}
