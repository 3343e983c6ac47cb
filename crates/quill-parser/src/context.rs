//! Rule contexts and the context stack shared by the driver and the
//! recovery engine.

use std::ops::{Deref, DerefMut};

use crate::error::SyntaxFault;

/// A position in the grammar.
///
/// Production contexts (`FuncDef`, `BlockStmt`, ...) are pushed on the
/// [`ContextStack`] while their production is being parsed. The remaining
/// contexts name a single expected element: a token, a choice between
/// alternatives, or a zero-width rule end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleContext {
    // Productions
    CompilationUnit,
    ImportDecl,
    FuncDef,
    ModuleVarDecl,
    ConstDecl,
    VarDecl,
    ExpressionStatement,
    AssignmentStmt,
    ReturnStmt,
    IfBlock,
    ElseBlock,
    WhileBlock,
    BlockStmt,
    BreakStmt,
    ContinueStmt,
    FuncBodyBlock,
    ParamList,
    ArgList,
    BracedExpression,
    MemberAccessKey,
    StringTemplate,
    Interpolation,

    // Choices
    TopLevelNode,
    TopLevelNodeWithoutModifier,
    ImportDeclRhs,
    AfterImportModule,
    ParamStart,
    AfterParameter,
    FuncOptionalReturns,
    Statements,
    Statement,
    IfBlockRhs,
    ElseBody,
    VarDeclRhs,
    ReturnStmtRhs,
    ExprStmtRhs,
    Expression,
    ExpressionRhs,
    ArgStart,
    ArgEnd,
    TypeDescriptor,
    TypeDescRhs,
    TemplateMember,

    // Zero-width rule ends
    RequiredParam,
    TypeDescEnd,
    ExpressionEnd,
    IfBlockEnd,

    // Terminals
    Eof,
    DocString,
    PublicKeyword,
    ImportKeyword,
    AsKeyword,
    FunctionKeyword,
    ReturnsKeyword,
    ConstKeyword,
    ReturnKeyword,
    IfKeyword,
    ElseKeyword,
    WhileKeyword,
    BreakKeyword,
    ContinueKeyword,
    ImportOrgOrModuleName,
    ImportModuleName,
    ImportPrefix,
    FuncName,
    ParamName,
    VariableName,
    VariableRef,
    FieldAccessIdentifier,
    TypeReference,
    SimpleTypeDescriptor,
    Slash,
    Dot,
    Semicolon,
    Comma,
    OpenParenthesis,
    CloseParenthesis,
    ArgListOpenParenthesis,
    ArgListEnd,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    QuestionMark,
    AssignOp,
    BasicLiteral,
    UnaryOperator,
    BinaryOperator,
    TemplateStart,
    TemplateStringContent,
    InterpolationStart,
    InterpolationEnd,
    TemplateEnd,
}

/// The stack of open productions. The bottom is always
/// [`RuleContext::CompilationUnit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextStack {
    contexts: Vec<RuleContext>,
}

impl Default for ContextStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextStack {
    pub fn new() -> Self {
        Self {
            contexts: vec![RuleContext::CompilationUnit],
        }
    }

    pub fn push(&mut self, ctx: RuleContext) {
        self.contexts.push(ctx);
    }

    pub fn pop(&mut self) -> Result<RuleContext, SyntaxFault> {
        self.contexts.pop().ok_or(SyntaxFault::ContextStackUnderflow)
    }

    /// Replace the top context. On an empty stack the context is pushed.
    pub fn switch(&mut self, ctx: RuleContext) {
        match self.contexts.last_mut() {
            Some(top) => *top = ctx,
            None => self.contexts.push(ctx),
        }
    }

    pub fn top(&self) -> Option<RuleContext> {
        self.contexts.last().copied()
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn as_slice(&self) -> &[RuleContext] {
        &self.contexts
    }

    /// Take a speculative view of the stack, restored when dropped.
    pub fn snapshot(&mut self) -> StackSnapshot<'_> {
        StackSnapshot {
            saved: self.contexts.clone(),
            stack: self,
        }
    }
}

/// A speculative copy of a [`ContextStack`].
///
/// Mutations go to the live stack through `DerefMut`; the saved contents are
/// written back on drop, on every exit path.
pub struct StackSnapshot<'a> {
    stack: &'a mut ContextStack,
    saved: Vec<RuleContext>,
}

impl Deref for StackSnapshot<'_> {
    type Target = ContextStack;

    fn deref(&self) -> &ContextStack {
        self.stack
    }
}

impl DerefMut for StackSnapshot<'_> {
    fn deref_mut(&mut self) -> &mut ContextStack {
        self.stack
    }
}

impl Drop for StackSnapshot<'_> {
    fn drop(&mut self) {
        self.stack.contexts.clone_from(&self.saved);
    }
}
