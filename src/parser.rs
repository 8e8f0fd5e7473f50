use std::sync::Arc;

use crate::ast::{
    ArrayType, AtomType, BinaryExpression, BinaryOperator, Block, CallExpression, DataType,
    Expression, ExpressionStatement, Function, FunctionArg, GenericType, InvalidExpression, Item,
    Literal, LiteralKind, Name, Node, NodeKind, NodeMeta, NullableType, ParenExpression,
    PostfixExpression, PostfixOperator, PrefixExpression, PrefixOperator, QualifiedName, RootNode,
    Statement, SubscriptExpression, UseStatement, VariableDeclaration, VariableReference,
};
use crate::diagnostic::{Diagnostic, DiagnosticKind, ReportContext};
use crate::scope::{ScopeId, ScopeTree};
use crate::token::{Position, Span, Token, TokenKind};

/// Result of parsing one file.
#[derive(Debug, Clone)]
pub struct Parsed {
    /// Always present, even when parsing reported errors.
    pub root: RootNode,
    /// Every scope opened while parsing; the root node owns [`ScopeId::ROOT`].
    pub scopes: ScopeTree,
    pub diagnostics: Vec<Diagnostic>,
}

impl Parsed {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Parse a token stream into a syntax tree.
///
/// Never fails outright: malformed constructs are reported in
/// [`Parsed::diagnostics`] and replaced by best-effort placeholder nodes.
/// A stream that does not end with [`TokenKind::Eof`] gets one appended.
#[must_use]
pub fn parse(tokens: &[Token], report: &Arc<ReportContext>) -> Parsed {
    if tokens.last().is_some_and(|t| t.kind == TokenKind::Eof) {
        return Parser::new(tokens, report).parse();
    }

    let mut owned = tokens.to_vec();
    let eof_span = tokens.last().map_or_else(
        || Span::empty(Arc::from("<input>"), Position::default()),
        |last| last.span.clone(),
    );
    owned.push(Token {
        kind: TokenKind::Eof,
        text: String::new(),
        span: eof_span,
    });
    Parser::new(&owned, report).parse()
}

/// Deepest expression or type nesting the parser follows.
///
/// Parenthesized, prefix and right-associative operands each count one
/// level, as does every link of an operator, call or subscript chain. Input
/// nested deeper is cut off with [`DiagnosticKind::NestingTooDeep`] and a
/// placeholder, which also bounds how deep every tree walk recurses.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Stack left free before a deeper expression or type is entered, and the
/// size of each segment added on the heap when less remains.
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_SEGMENT: usize = 1024 * 1024;

/// Tokens that end synchronization recovery; left unconsumed.
const fn is_sync_boundary(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Semicolon
            | TokenKind::Class
            | TokenKind::Use
            | TokenKind::If
            | TokenKind::For
            | TokenKind::While
    )
}

/// Tokens that can start a data type.
const fn starts_type(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier | TokenKind::Floor | TokenKind::OpenBracket
    )
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    report: Arc<ReportContext>,
    /// Node kinds being parsed, innermost last. Only phrases diagnostics.
    contexts: Vec<NodeKind>,
    scopes: ScopeTree,
    /// Open block scopes, innermost last.
    open_scopes: Vec<ScopeId>,
    /// Current expression or type nesting, see [`MAX_NESTING_DEPTH`].
    depth: usize,
    /// Set once the nesting limit was hit; errors are muted until the
    /// parser is back at statement level.
    too_deep: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], report: &Arc<ReportContext>) -> Self {
        Self {
            tokens,
            pos: 0,
            report: Arc::clone(report),
            contexts: Vec::new(),
            scopes: ScopeTree::new(),
            open_scopes: Vec::new(),
            depth: 0,
            too_deep: false,
            diagnostics: Vec::new(),
        }
    }

    fn parse(mut self) -> Parsed {
        let root = self.in_context(NodeKind::Root, |p| {
            let mut items = Vec::new();
            while !p.at_end() {
                match p.peek().kind {
                    TokenKind::Use => items.push(Item::Statement(p.use_statement())),
                    TokenKind::Func => items.push(Item::Function(p.function())),
                    TokenKind::Let => items.push(Item::Statement(p.variable_declaration())),
                    TokenKind::Semicolon => {
                        p.advance();
                    }
                    _ => {
                        let tok = p.peek();
                        p.error_here(DiagnosticKind::UnexpectedToken, vec![tok.to_string()]);
                        p.sync();
                    }
                }
            }
            let children: Vec<&Span> = items.iter().map(Node::span).collect();
            let span = p.finish(0, &children);
            RootNode {
                meta: p.meta(span),
                items,
            }
        });

        tracing::debug!(
            items = root.items.len(),
            scopes = self.scopes.len(),
            diagnostics = self.diagnostics.len(),
            "parsed file"
        );

        Parsed {
            root,
            scopes: self.scopes,
            diagnostics: self.diagnostics,
        }
    }

    // Cursor

    fn peek(&self) -> &'a Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.pos.min(last)]
    }

    fn at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn is(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    /// Consume the current token. The end marker is never consumed.
    fn advance(&mut self) -> &'a Token {
        let tok = self.peek();
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.is(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Discard tokens after an error: consume one token (stopping there if it
    /// was `;`), then skip until a statement boundary or the end of input.
    fn sync(&mut self) {
        if self.at_end() {
            return;
        }
        let from = self.pos;
        if self.advance().kind != TokenKind::Semicolon {
            while !self.at_end() && !is_sync_boundary(&self.peek().kind) {
                self.advance();
            }
        }
        tracing::trace!(
            skipped = self.pos - from,
            at = %self.peek().span,
            "synchronized"
        );
    }

    // Bookkeeping

    fn in_context<T>(&mut self, kind: NodeKind, f: impl FnOnce(&mut Self) -> T) -> T {
        self.contexts.push(kind);
        let result = f(self);
        self.contexts.pop();
        result
    }

    fn current_scope(&self) -> ScopeId {
        self.open_scopes.last().copied().unwrap_or(ScopeId::ROOT)
    }

    fn meta(&self, span: Span) -> NodeMeta {
        NodeMeta::new(span, self.current_scope(), Arc::clone(&self.report))
    }

    /// Span of the tokens consumed since `start`, or a zero-width span at the
    /// current token when nothing was consumed.
    fn span_since(&self, start: usize) -> Span {
        if self.pos > start {
            self.tokens[start]
                .span
                .cover(&self.tokens[self.pos - 1].span)
        } else {
            self.peek().span.collapse_to_start()
        }
    }

    fn finish(&self, start: usize, children: &[&Span]) -> Span {
        children
            .iter()
            .fold(self.span_since(start), |span, child| span.cover(child))
    }

    fn error_here(&mut self, kind: DiagnosticKind, args: Vec<String>) {
        if self.too_deep {
            return;
        }
        let span = self.peek().span.clone();
        self.diagnostics
            .push(Diagnostic::at(kind, &span, &self.report, args));
    }

    // Nesting

    /// Go one level deeper. Past [`MAX_NESTING_DEPTH`] this reports once,
    /// skips to the next statement boundary and returns the point of the cut.
    fn enter_nesting(&mut self) -> Result<(), Span> {
        if self.depth < MAX_NESTING_DEPTH {
            self.depth += 1;
            return Ok(());
        }
        let at = self.peek().span.collapse_to_start();
        self.error_here(
            DiagnosticKind::NestingTooDeep,
            vec![MAX_NESTING_DEPTH.to_string()],
        );
        self.too_deep = true;
        tracing::debug!(at = %at, "nesting limit reached");
        if !is_sync_boundary(&self.peek().kind) {
            self.sync();
        }
        Err(at)
    }

    const fn leave_nesting(&mut self, levels: usize) {
        self.depth = self.depth.saturating_sub(levels);
        if self.depth == 0 {
            self.too_deep = false;
        }
    }

    /// Parse `f` one nesting level deeper.
    fn nested(&mut self, f: fn(&mut Self) -> Expression) -> Expression {
        match self.enter_nesting() {
            Ok(()) => {
                let expression = f(self);
                self.leave_nesting(1);
                expression
            }
            Err(at) => self.invalid(at),
        }
    }

    fn invalid(&self, span: Span) -> Expression {
        Expression::Invalid(InvalidExpression {
            meta: self.meta(span),
        })
    }

    fn require_semi(&mut self) {
        if !self.eat(&TokenKind::Semicolon) {
            let after = self.contexts.last().copied().unwrap_or(NodeKind::Root);
            self.error_here(DiagnosticKind::ExpectedSemicolon, vec![after.to_string()]);
        }
    }

    // Names

    fn name(&mut self) -> Name {
        self.in_context(NodeKind::Name, |p| {
            let tok = p.peek();
            match &tok.kind {
                TokenKind::Identifier | TokenKind::Floor => {
                    p.advance();
                }
                other => {
                    p.error_here(DiagnosticKind::ExpectedIdentifier, vec![tok.to_string()]);
                    // Words in the name slot are taken as the name.
                    if other.is_keyword() || LiteralKind::from_token(other).is_some() {
                        p.advance();
                    } else {
                        return Name {
                            meta: p.meta(tok.span.collapse_to_start()),
                            text: String::new(),
                        };
                    }
                }
            }
            Name {
                meta: p.meta(tok.span.clone()),
                text: tok.text.clone(),
            }
        })
    }

    fn qualified_name(&mut self) -> QualifiedName {
        self.in_context(NodeKind::QualifiedName, |p| {
            let start = p.pos;
            let mut names = vec![p.name()];
            while p.eat(&TokenKind::Dot) {
                names.push(p.name());
            }
            let children: Vec<&Span> = names.iter().map(Node::span).collect();
            let span = p.finish(start, &children);
            QualifiedName {
                meta: p.meta(span),
                names,
            }
        })
    }

    // Statements

    fn use_statement(&mut self) -> Statement {
        self.in_context(NodeKind::UseStatement, |p| {
            let start = p.pos;
            p.advance();
            let path = p.qualified_name();
            p.require_semi();
            let span = p.finish(start, &[path.span()]);
            Statement::Use(UseStatement {
                meta: p.meta(span),
                path,
            })
        })
    }

    fn variable_declaration(&mut self) -> Statement {
        self.in_context(NodeKind::VariableDeclaration, |p| {
            let start = p.pos;
            p.advance();
            let name = p.qualified_name();
            let declared_type = if p.is(&TokenKind::Eq) || p.is(&TokenKind::Semicolon) {
                None
            } else {
                Some(p.data_type())
            };
            let init = if p.eat(&TokenKind::Eq) {
                Some(p.expression())
            } else {
                None
            };
            p.require_semi();

            let mut children = vec![name.span()];
            children.extend(declared_type.as_ref().map(Node::span));
            children.extend(init.as_ref().map(Node::span));
            let span = p.finish(start, &children);
            Statement::VariableDeclaration(VariableDeclaration {
                meta: p.meta(span),
                name,
                declared_type,
                init,
            })
        })
    }

    fn expression_statement(&mut self) -> Statement {
        self.in_context(NodeKind::ExpressionStatement, |p| {
            let start = p.pos;
            let inner = p.expression();
            p.require_semi();
            let span = p.finish(start, &[inner.span()]);
            Statement::Expression(ExpressionStatement {
                meta: p.meta(span),
                inner,
            })
        })
    }

    fn block_statement(&mut self) -> Statement {
        if self.is(&TokenKind::Let) {
            self.variable_declaration()
        } else {
            self.expression_statement()
        }
    }

    // Functions and blocks

    fn function(&mut self) -> Function {
        self.in_context(NodeKind::Function, |p| {
            let start = p.pos;
            p.advance();
            let name = p.qualified_name();
            let args = if p.eat(&TokenKind::OpenParen) {
                p.function_args()
            } else {
                p.error_here(DiagnosticKind::ExpectedArgumentList, Vec::new());
                Vec::new()
            };
            let return_type = if starts_type(&p.peek().kind) {
                p.data_type()
            } else {
                let at = p.peek().span.collapse_to_start();
                DataType::none(p.meta(at))
            };
            let body = p.block();

            let mut children = vec![name.span(), return_type.span(), body.span()];
            children.extend(args.iter().map(Node::span));
            let span = p.finish(start, &children);
            Function {
                meta: p.meta(span),
                name,
                args,
                return_type,
                body,
            }
        })
    }

    /// Arguments after the opening paren, through the closing one.
    fn function_args(&mut self) -> Vec<FunctionArg> {
        let mut args = Vec::new();
        if self.eat(&TokenKind::CloseParen) {
            return args;
        }
        loop {
            let arg = self.in_context(NodeKind::FunctionArg, |p| {
                let start = p.pos;
                let name = p.qualified_name();
                let arg_type = p.data_type();
                let span = p.finish(start, &[name.span(), arg_type.span()]);
                FunctionArg {
                    meta: p.meta(span),
                    name,
                    arg_type,
                }
            });
            args.push(arg);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        if !self.eat(&TokenKind::CloseParen) {
            self.error_here(DiagnosticKind::ExpectedClosingParen, Vec::new());
        }
        args
    }

    fn block(&mut self) -> Block {
        self.in_context(NodeKind::Block, |p| {
            let start = p.pos;
            let scope = p.scopes.push(p.current_scope());
            p.open_scopes.push(scope);

            if !p.eat(&TokenKind::OpenBrace) {
                p.error_here(DiagnosticKind::ExpectedBlockOpen, Vec::new());
                p.sync();
            }

            let mut statements = Vec::new();
            while !p.eat(&TokenKind::CloseBrace) {
                if p.at_end() {
                    p.error_here(DiagnosticKind::ExpectedBlockClose, Vec::new());
                    break;
                }
                statements.push(p.block_statement());
            }

            let children: Vec<&Span> = statements.iter().map(Node::span).collect();
            let span = p.finish(start, &children);
            let block = Block {
                meta: p.meta(span),
                statements,
            };
            p.open_scopes.pop();
            block
        })
    }

    // Data types

    /// A type nested past the limit becomes a `none` type placeholder.
    fn data_type(&mut self) -> DataType {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || {
            if let Err(at) = self.enter_nesting() {
                return DataType::none(self.meta(at));
            }
            let data_type = self.in_context(NodeKind::DataType, |p| {
                let start = p.pos;
                let inner = if p.is(&TokenKind::OpenBracket) {
                    p.array_type()
                } else {
                    p.singlet_type()
                };
                if p.eat(&TokenKind::Question) {
                    let span = p.finish(start, &[inner.span()]);
                    DataType::Nullable(NullableType {
                        meta: p.meta(span),
                        inner: Box::new(inner),
                    })
                } else {
                    inner
                }
            });
            self.leave_nesting(1);
            data_type
        })
    }

    /// One array level per leading `[`; at most as many `]` are consumed.
    fn array_type(&mut self) -> DataType {
        let mut opens = Vec::new();
        while self.is(&TokenKind::OpenBracket) {
            if let Err(at) = self.enter_nesting() {
                self.leave_nesting(opens.len());
                return DataType::none(self.meta(at));
            }
            opens.push(self.pos);
            self.advance();
        }

        let mut inner = self.data_type();

        let mut closes = Vec::new();
        while closes.len() < opens.len() && self.is(&TokenKind::CloseBracket) {
            closes.push(self.pos);
            self.advance();
        }
        if closes.len() < opens.len() {
            self.error_here(DiagnosticKind::ExpectedArrayCloseBracket, Vec::new());
        }

        for (level, open) in opens.iter().rev().enumerate() {
            let mut span = self.tokens[*open].span.cover(inner.span());
            if let Some(close) = closes.get(level) {
                span = span.cover(&self.tokens[*close].span);
            }
            inner = DataType::Array(ArrayType {
                meta: self.meta(span),
                inner: Box::new(inner),
            });
        }
        self.leave_nesting(opens.len());
        inner
    }

    fn singlet_type(&mut self) -> DataType {
        let start = self.pos;
        let name = self.qualified_name();
        if !self.eat(&TokenKind::OpenBracket) {
            let span = self.finish(start, &[name.span()]);
            return DataType::Atom(AtomType {
                meta: self.meta(span),
                name,
            });
        }

        let mut args = Vec::new();
        if !self.is(&TokenKind::CloseBracket) {
            loop {
                args.push(self.data_type());
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        if !self.eat(&TokenKind::CloseBracket) {
            self.error_here(DiagnosticKind::ExpectedArrayCloseBracket, Vec::new());
        }

        let mut children = vec![name.span()];
        children.extend(args.iter().map(Node::span));
        let span = self.finish(start, &children);
        DataType::Generic(GenericType {
            meta: self.meta(span),
            name,
            args,
        })
    }

    // Expressions, lowest precedence first

    fn expression(&mut self) -> Expression {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || {
            self.nested(|p| p.in_context(NodeKind::Expression, Self::assignment))
        })
    }

    fn binary(
        &self,
        start: usize,
        left: Expression,
        op: BinaryOperator,
        right: Expression,
    ) -> Expression {
        let span = self.finish(start, &[left.span(), right.span()]);
        Expression::Binary(BinaryExpression {
            meta: self.meta(span),
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    /// Parse one left-associative level: `next (op next)*` for any operator
    /// accepted by `accepts`.
    fn left_assoc(
        &mut self,
        accepts: fn(BinaryOperator) -> bool,
        next: fn(&mut Self) -> Expression,
    ) -> Expression {
        let start = self.pos;
        let mut left = next(self);
        let mut links = 0;
        while let Some(op) = BinaryOperator::from_token(&self.peek().kind).filter(|op| accepts(*op))
        {
            if self.enter_nesting().is_err() {
                break;
            }
            links += 1;
            self.advance();
            let right = next(self);
            left = self.binary(start, left, op, right);
        }
        self.leave_nesting(links);
        left
    }

    fn assignment(&mut self) -> Expression {
        let start = self.pos;
        let left = self.equality();
        match BinaryOperator::from_token(&self.peek().kind) {
            Some(op) if op.is_assignment() => {
                self.advance();
                let right = self.nested(Self::assignment);
                self.binary(start, left, op, right)
            }
            _ => left,
        }
    }

    fn equality(&mut self) -> Expression {
        self.left_assoc(
            |op| matches!(op, BinaryOperator::Equals | BinaryOperator::NotEquals),
            Self::comparison,
        )
    }

    fn comparison(&mut self) -> Expression {
        self.left_assoc(
            |op| {
                matches!(
                    op,
                    BinaryOperator::LessThan
                        | BinaryOperator::LessThanOrEqual
                        | BinaryOperator::MoreThan
                        | BinaryOperator::MoreThanOrEqual
                )
            },
            Self::additive,
        )
    }

    fn additive(&mut self) -> Expression {
        self.left_assoc(
            |op| matches!(op, BinaryOperator::Plus | BinaryOperator::Minus),
            Self::multiplicative,
        )
    }

    fn multiplicative(&mut self) -> Expression {
        self.left_assoc(
            |op| matches!(op, BinaryOperator::Mul | BinaryOperator::Div),
            Self::power,
        )
    }

    fn power(&mut self) -> Expression {
        let start = self.pos;
        let left = self.prefix();
        if self.eat(&TokenKind::StarStar) {
            let right = self.nested(Self::power);
            return self.binary(start, left, BinaryOperator::Pow, right);
        }
        left
    }

    fn prefix(&mut self) -> Expression {
        let Some(op) = PrefixOperator::from_token(&self.peek().kind) else {
            return self.postfix();
        };
        let start = self.pos;
        self.advance();
        let inner = self.nested(Self::prefix);
        let span = self.finish(start, &[inner.span()]);
        Expression::Prefix(PrefixExpression {
            meta: self.meta(span),
            op,
            inner: Box::new(inner),
        })
    }

    fn postfix(&mut self) -> Expression {
        let start = self.pos;
        let mut inner = self.call();
        let mut links = 0;
        while let Some(op) = PostfixOperator::from_token(&self.peek().kind) {
            if self.enter_nesting().is_err() {
                break;
            }
            links += 1;
            self.advance();
            let span = self.finish(start, &[inner.span()]);
            inner = Expression::Postfix(PostfixExpression {
                meta: self.meta(span),
                inner: Box::new(inner),
                op,
            });
        }
        self.leave_nesting(links);
        inner
    }

    fn call(&mut self) -> Expression {
        let start = self.pos;
        let mut callee = self.member();
        let mut links = 0;
        while self.is(&TokenKind::OpenParen) {
            if self.enter_nesting().is_err() {
                break;
            }
            links += 1;
            self.advance();
            let mut args = Vec::new();
            if !self.eat(&TokenKind::CloseParen) {
                loop {
                    args.push(self.expression());
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                if !self.eat(&TokenKind::CloseParen) {
                    self.error_here(DiagnosticKind::ExpectedClosingParen, Vec::new());
                }
            }
            let mut children = vec![callee.span()];
            children.extend(args.iter().map(Node::span));
            let span = self.finish(start, &children);
            callee = Expression::Call(CallExpression {
                meta: self.meta(span),
                callee: Box::new(callee),
                args,
            });
        }
        self.leave_nesting(links);
        callee
    }

    fn member(&mut self) -> Expression {
        self.left_assoc(
            |op| matches!(op, BinaryOperator::Access | BinaryOperator::ChainAccess),
            Self::subscript,
        )
    }

    fn subscript(&mut self) -> Expression {
        let start = self.pos;
        let mut source = self.atom();
        let mut links = 0;
        while self.is(&TokenKind::OpenBracket) {
            if self.enter_nesting().is_err() {
                break;
            }
            links += 1;
            self.advance();
            let index = self.expression();
            if !self.eat(&TokenKind::CloseBracket) {
                self.error_here(DiagnosticKind::ExpectedSubscriptCloseBracket, Vec::new());
            }
            let span = self.finish(start, &[source.span(), index.span()]);
            source = Expression::Subscript(SubscriptExpression {
                meta: self.meta(span),
                source: Box::new(source),
                index: Box::new(index),
            });
        }
        self.leave_nesting(links);
        source
    }

    fn atom(&mut self) -> Expression {
        let tok = self.peek();

        if let Some(kind) = LiteralKind::from_token(&tok.kind) {
            self.advance();
            let value = match &tok.kind {
                TokenKind::String { value } => value.clone(),
                _ => tok.text.clone(),
            };
            return Expression::Literal(Literal {
                meta: self.meta(tok.span.clone()),
                kind,
                text: tok.text.clone(),
                value,
            });
        }

        match tok.kind {
            TokenKind::Identifier => {
                self.advance();
                let name = Name {
                    meta: self.meta(tok.span.clone()),
                    text: tok.text.clone(),
                };
                Expression::VariableRef(VariableReference {
                    meta: self.meta(tok.span.clone()),
                    name: QualifiedName {
                        meta: self.meta(tok.span.clone()),
                        names: vec![name],
                    },
                })
            }
            TokenKind::OpenParen => {
                let start = self.pos;
                self.advance();
                if self.eat(&TokenKind::CloseParen) {
                    self.error_here(DiagnosticKind::ExpectedExpression, Vec::new());
                    return self.invalid(self.span_since(start));
                }
                let inner = self.expression();
                if !self.eat(&TokenKind::CloseParen) {
                    self.error_here(DiagnosticKind::ExpectedClosingParen, Vec::new());
                }
                let span = self.finish(start, &[inner.span()]);
                Expression::Paren(ParenExpression {
                    meta: self.meta(span),
                    inner: Box::new(inner),
                })
            }
            _ => {
                self.error_here(DiagnosticKind::ExpectedExpression, Vec::new());
                self.sync();
                self.invalid(tok.span.collapse_to_start())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{ErrorLimit, tokenize};
    use crate::printer::render_expression;

    fn parse_input(input: &str) -> Parsed {
        let lexed = tokenize(input, "t.pz", ErrorLimit::default());
        assert!(lexed.succeeded(), "lex failed: {:?}", lexed.diagnostics);
        parse(&lexed.tokens, &lexed.report)
    }

    fn first_init(parsed: &Parsed) -> &Expression {
        match &parsed.root.items[0] {
            Item::Statement(Statement::VariableDeclaration(v)) => {
                v.init.as_ref().expect("initializer")
            }
            other => panic!("expected let, got {other:?}"),
        }
    }

    fn kinds(parsed: &Parsed) -> Vec<DiagnosticKind> {
        parsed.diagnostics.iter().map(|d| d.kind).collect()
    }

    #[test]
    fn multiplication_binds_tighter() {
        let parsed = parse_input("let x = 1 + 2 * 3;");
        assert!(parsed.succeeded(), "{:?}", parsed.diagnostics);
        assert_eq!(render_expression(first_init(&parsed)), "(+ 1 (* 2 3))");
    }

    #[test]
    fn power_is_right_associative() {
        let parsed = parse_input("let x = 2 ** 3 ** 2;");
        assert_eq!(render_expression(first_init(&parsed)), "(** 2 (** 3 2))");
    }

    #[test]
    fn subtraction_is_left_associative() {
        let parsed = parse_input("let x = 5 - 2 - 1;");
        assert_eq!(render_expression(first_init(&parsed)), "(- (- 5 2) 1)");
    }

    #[test]
    fn assignment_is_right_associative() {
        let parsed = parse_input("func f() { a = b = 1; }");
        assert!(parsed.succeeded(), "{:?}", parsed.diagnostics);
        let Item::Function(f) = &parsed.root.items[0] else {
            panic!("expected function");
        };
        let Statement::Expression(s) = &f.body.statements[0] else {
            panic!("expected expression statement");
        };
        assert_eq!(render_expression(&s.inner), "(= a (= b 1))");
    }

    #[test]
    fn postfix_decrement() {
        let parsed = parse_input("func f() { i--; }");
        let Item::Function(f) = &parsed.root.items[0] else {
            panic!("expected function");
        };
        let Statement::Expression(s) = &f.body.statements[0] else {
            panic!("expected expression statement");
        };
        assert_eq!(render_expression(&s.inner), "(post-- i)");
    }

    #[test]
    fn missing_semicolon_names_the_statement() {
        let parsed = parse_input("use std.io");
        assert_eq!(kinds(&parsed), [DiagnosticKind::ExpectedSemicolon]);
        assert_eq!(parsed.diagnostics[0].args, ["use statement"]);
        assert_eq!(parsed.root.items.len(), 1);
    }

    #[test]
    fn garbage_at_top_level_is_skipped_to_boundary() {
        let parsed = parse_input("1 2 3; use a;");
        assert_eq!(kinds(&parsed), [DiagnosticKind::UnexpectedToken]);
        assert_eq!(parsed.diagnostics[0].args, ["number '1'"]);
        assert_eq!(parsed.root.items.len(), 1);
    }

    #[test]
    fn empty_parens_are_invalid() {
        let parsed = parse_input("let x = ();");
        assert_eq!(kinds(&parsed), [DiagnosticKind::ExpectedExpression]);
        assert!(first_init(&parsed).is_invalid());
    }

    #[test]
    fn blocks_open_nested_scopes() {
        let parsed = parse_input("func f() { let a = 1; }\nfunc g() {}");
        assert!(parsed.succeeded(), "{:?}", parsed.diagnostics);
        assert_eq!(parsed.scopes.len(), 3);
        let Item::Function(f) = &parsed.root.items[0] else {
            panic!("expected function");
        };
        assert_eq!(f.scope(), ScopeId::ROOT);
        assert_ne!(f.body.scope(), ScopeId::ROOT);
        assert_eq!(f.body.statements[0].scope(), f.body.scope());
        assert_eq!(parsed.scopes.parent(f.body.scope()), Some(ScopeId::ROOT));
    }

    #[test]
    fn empty_input_yields_empty_root() {
        let parsed = parse_input("");
        assert!(parsed.succeeded());
        assert!(parsed.root.items.is_empty());
        assert!(parsed.root.span().is_empty());
    }

    #[test]
    fn token_slice_without_end_marker() {
        let lexed = tokenize("use a;", "t.pz", ErrorLimit::default());
        let without_eof = &lexed.tokens[..lexed.tokens.len() - 1];
        let parsed = parse(without_eof, &lexed.report);
        assert!(parsed.succeeded());
        assert_eq!(parsed.root.items.len(), 1);
    }
}
