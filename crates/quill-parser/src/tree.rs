//! Lossless syntax tree built by the reference driver.
//!
//! Nodes own their children in source order; every token the reader produced,
//! missing tokens included, is a leaf. Concatenating the leaves' full text
//! gives back the parsed source exactly.

use std::fmt::Write as _;

use crate::diagnostics::Diagnostic;
use crate::token::Token;

/// The kind of an interior node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Module,
    Documentation,
    ImportDecl,
    FunctionDef,
    ParamList,
    Parameter,
    ReturnTypeDesc,
    FunctionBody,
    ModuleVarDecl,
    ConstDecl,
    VarDecl,
    Block,
    ExpressionStatement,
    AssignmentStatement,
    ReturnStatement,
    IfElse,
    ElseClause,
    While,
    Break,
    Continue,
    TypeDesc,
    BinaryExpr,
    UnaryExpr,
    CallExpr,
    ArgList,
    FieldAccess,
    MemberAccess,
    BracedExpr,
    Literal,
    NameRef,
    StringTemplate,
    RegExpTemplate,
    XmlTemplate,
    PromptTemplate,
    Interpolation,
    /// A standalone expression parsed with `parse_expression`.
    ExpressionRoot,
    /// A statement list parsed with `parse_statements`.
    StatementList,
}

/// A child of a [`SyntaxNode`].
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxElement {
    Node(SyntaxNode),
    Token(Token),
}

impl From<SyntaxNode> for SyntaxElement {
    fn from(node: SyntaxNode) -> Self {
        SyntaxElement::Node(node)
    }
}

impl From<Token> for SyntaxElement {
    fn from(token: Token) -> Self {
        SyntaxElement::Token(token)
    }
}

impl SyntaxElement {
    pub fn as_node(&self) -> Option<&SyntaxNode> {
        match self {
            SyntaxElement::Node(node) => Some(node),
            SyntaxElement::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            SyntaxElement::Token(token) => Some(token),
            SyntaxElement::Node(_) => None,
        }
    }

    fn full_width(&self) -> usize {
        match self {
            SyntaxElement::Node(node) => node.width(),
            SyntaxElement::Token(token) => token.full_width(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    kind: NodeKind,
    children: Vec<SyntaxElement>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, children: Vec<SyntaxElement>) -> Self {
        Self { kind, children }
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn children(&self) -> &[SyntaxElement] {
        &self.children
    }

    /// Direct child nodes, skipping tokens.
    pub fn child_nodes(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.children.iter().filter_map(SyntaxElement::as_node)
    }

    /// Direct child tokens, skipping nodes.
    pub fn child_tokens(&self) -> impl Iterator<Item = &Token> {
        self.children.iter().filter_map(SyntaxElement::as_token)
    }

    /// Every token under this node, in source order.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens<'a>(&'a self, out: &mut Vec<&'a Token>) {
        for child in &self.children {
            match child {
                SyntaxElement::Node(node) => node.collect_tokens(out),
                SyntaxElement::Token(token) => out.push(token),
            }
        }
    }

    /// The exact source text covered by this node, trivia included.
    pub fn text(&self) -> String {
        let mut out = String::with_capacity(self.width());
        for token in self.tokens() {
            token.write_full_text(&mut out);
        }
        out
    }

    /// Byte width of [`text`](Self::text).
    pub fn width(&self) -> usize {
        self.children.iter().map(SyntaxElement::full_width).sum()
    }

    /// Every diagnostic under this node, in source order.
    pub fn diagnostics(&self) -> Vec<&Diagnostic> {
        self.tokens()
            .into_iter()
            .flat_map(Token::all_diagnostics)
            .collect()
    }

    /// Returns true if any token under this node was synthesized by recovery.
    pub fn has_missing(&self) -> bool {
        self.tokens().iter().any(|token| token.is_missing())
    }

    /// The first node of `kind` in a pre-order walk, this node included.
    pub fn find(&self, kind: NodeKind) -> Option<&SyntaxNode> {
        if self.kind == kind {
            return Some(self);
        }
        self.child_nodes().find_map(|node| node.find(kind))
    }

    /// Every node of `kind` in a pre-order walk.
    pub fn find_all(&self, kind: NodeKind) -> Vec<&SyntaxNode> {
        let mut out = Vec::new();
        self.collect_kind(kind, &mut out);
        out
    }

    fn collect_kind<'a>(&'a self, kind: NodeKind, out: &mut Vec<&'a SyntaxNode>) {
        if self.kind == kind {
            out.push(self);
        }
        for node in self.child_nodes() {
            node.collect_kind(kind, out);
        }
    }

    /// Compact s-expression of the tree shape, without trivia.
    ///
    /// ```text
    /// (BinaryExpr (NameRef (Identifier "a")) (Plus) (Literal (DecimalIntegerLiteral "1")))
    /// ```
    pub fn to_sexpr(&self) -> String {
        let mut out = String::new();
        self.write_sexpr(&mut out);
        out
    }

    fn write_sexpr(&self, out: &mut String) {
        let _ = write!(out, "({:?}", self.kind);
        for child in &self.children {
            out.push(' ');
            match child {
                SyntaxElement::Node(node) => node.write_sexpr(out),
                SyntaxElement::Token(token) => write_token_sexpr(token, out),
            }
        }
        out.push(')');
    }
}

fn write_token_sexpr(token: &Token, out: &mut String) {
    if token.is_missing() {
        let _ = write!(out, "(missing {:?})", token.kind());
    } else if token.kind().fixed_text().is_some() {
        let _ = write!(out, "({:?})", token.kind());
    } else {
        let _ = write!(out, "({:?} {:?})", token.kind(), token.text());
    }
}
