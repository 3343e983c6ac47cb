//! Grammar navigation for the recovery search.
//!
//! The search walks the grammar one [`RuleContext`] at a time. A context is a
//! terminal (matched against a token kind), a choice between alternatives, or
//! a non-terminal that only leads somewhere else. [`next_rule`] answers "what
//! comes after this context", pushing and popping productions on the context
//! stack as it goes; where the answer depends on the enclosing production it
//! looks at the stack top.

use crate::context::{ContextStack, RuleContext};
use crate::token::SyntaxKind;

/// The probed path cannot continue from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NotViable;

type Next = Result<RuleContext, NotViable>;

/// The alternatives of a choice context.
pub(crate) fn alternatives(ctx: RuleContext) -> Option<&'static [RuleContext]> {
    use RuleContext::*;
    let alternatives: &'static [RuleContext] = match ctx {
        TopLevelNode => &[
            Eof,
            DocString,
            PublicKeyword,
            ImportDecl,
            FuncDef,
            ModuleVarDecl,
            ConstDecl,
        ],
        TopLevelNodeWithoutModifier => &[FuncDef, ModuleVarDecl, ConstDecl],
        ImportDeclRhs => &[Slash, Dot, AsKeyword, Semicolon],
        AfterImportModule => &[Dot, AsKeyword, Semicolon],
        ParamStart => &[CloseParenthesis, RequiredParam],
        AfterParameter => &[Comma, CloseParenthesis],
        FuncOptionalReturns => &[ReturnsKeyword, FuncBodyBlock],
        Statements => &[CloseBrace, Statement],
        Statement => &[
            VarDecl,
            ExpressionStatement,
            ReturnStmt,
            IfBlock,
            WhileBlock,
            BlockStmt,
            BreakStmt,
            ContinueStmt,
        ],
        IfBlockRhs => &[ElseKeyword, IfBlockEnd],
        ElseBody => &[IfBlock, BlockStmt],
        VarDeclRhs => &[AssignOp, Semicolon],
        ReturnStmtRhs => &[Semicolon, Expression],
        ExprStmtRhs => &[Semicolon, AssignOp],
        Expression => &[BasicLiteral, VariableRef, BracedExpression, UnaryOperator, StringTemplate],
        ExpressionRhs => &[BinaryOperator, Dot, ArgListOpenParenthesis, OpenBracket, ExpressionEnd],
        ArgStart => &[ArgListEnd, Expression],
        ArgEnd => &[Comma, ArgListEnd],
        TypeDescriptor => &[SimpleTypeDescriptor, TypeReference],
        TypeDescRhs => &[QuestionMark, TypeDescEnd],
        TemplateMember => &[TemplateStringContent, InterpolationStart, TemplateEnd],
        _ => return None,
    };
    Some(alternatives)
}

/// Returns true if `ctx` stands for exactly one token.
pub(crate) fn is_terminal(ctx: RuleContext) -> bool {
    use RuleContext::*;
    matches!(
        ctx,
        Eof | DocString
            | PublicKeyword
            | ImportKeyword
            | AsKeyword
            | FunctionKeyword
            | ReturnsKeyword
            | ConstKeyword
            | ReturnKeyword
            | IfKeyword
            | ElseKeyword
            | WhileKeyword
            | BreakKeyword
            | ContinueKeyword
            | ImportOrgOrModuleName
            | ImportModuleName
            | ImportPrefix
            | FuncName
            | ParamName
            | VariableName
            | VariableRef
            | FieldAccessIdentifier
            | TypeReference
            | SimpleTypeDescriptor
            | Slash
            | Dot
            | Semicolon
            | Comma
            | OpenParenthesis
            | CloseParenthesis
            | ArgListOpenParenthesis
            | ArgListEnd
            | OpenBrace
            | CloseBrace
            | OpenBracket
            | CloseBracket
            | QuestionMark
            | AssignOp
            | BasicLiteral
            | UnaryOperator
            | BinaryOperator
            | TemplateStart
            | TemplateStringContent
            | InterpolationStart
            | InterpolationEnd
            | TemplateEnd
    )
}

/// Returns true if a token of `kind` satisfies the terminal context `ctx`.
pub(crate) fn matches(ctx: RuleContext, kind: SyntaxKind) -> bool {
    use RuleContext::*;
    match ctx {
        Eof => kind == SyntaxKind::Eof,
        DocString => kind == SyntaxKind::DocumentationString,
        PublicKeyword => kind == SyntaxKind::PublicKeyword,
        ImportKeyword => kind == SyntaxKind::ImportKeyword,
        AsKeyword => kind == SyntaxKind::AsKeyword,
        FunctionKeyword => kind == SyntaxKind::FunctionKeyword,
        ReturnsKeyword => kind == SyntaxKind::ReturnsKeyword,
        ConstKeyword => kind == SyntaxKind::ConstKeyword,
        ReturnKeyword => kind == SyntaxKind::ReturnKeyword,
        IfKeyword => kind == SyntaxKind::IfKeyword,
        ElseKeyword => kind == SyntaxKind::ElseKeyword,
        WhileKeyword => kind == SyntaxKind::WhileKeyword,
        BreakKeyword => kind == SyntaxKind::BreakKeyword,
        ContinueKeyword => kind == SyntaxKind::ContinueKeyword,
        ImportOrgOrModuleName | ImportModuleName | ImportPrefix | FuncName | ParamName
        | VariableName | VariableRef | FieldAccessIdentifier | TypeReference => {
            kind == SyntaxKind::Identifier
        }
        SimpleTypeDescriptor => kind.is_builtin_type() || kind == SyntaxKind::VarKeyword,
        Slash => kind == SyntaxKind::Slash,
        Dot => kind == SyntaxKind::Dot,
        Semicolon => kind == SyntaxKind::Semicolon,
        Comma => kind == SyntaxKind::Comma,
        OpenParenthesis | ArgListOpenParenthesis => kind == SyntaxKind::OpenParen,
        CloseParenthesis | ArgListEnd => kind == SyntaxKind::CloseParen,
        OpenBrace => kind == SyntaxKind::OpenBrace,
        CloseBrace | InterpolationEnd => kind == SyntaxKind::CloseBrace,
        OpenBracket => kind == SyntaxKind::OpenBracket,
        CloseBracket => kind == SyntaxKind::CloseBracket,
        QuestionMark => kind == SyntaxKind::QuestionMark,
        AssignOp => kind == SyntaxKind::Equal || kind.is_compound_assignment(),
        BasicLiteral => kind.is_literal(),
        UnaryOperator => kind.is_unary_operator(),
        BinaryOperator => kind.is_binary_operator(),
        TemplateStart | TemplateEnd => kind == SyntaxKind::Backtick,
        TemplateStringContent => is_template_content(kind),
        InterpolationStart => kind == SyntaxKind::InterpolationStart,
        _ => false,
    }
}

fn is_template_content(kind: SyntaxKind) -> bool {
    use SyntaxKind::*;
    matches!(
        kind,
        TemplateString
            | RegExpContent
            | XmlName
            | XmlTextContent
            | XmlEndTagStart
            | XmlSlashGt
            | XmlCommentStart
            | XmlCommentContent
            | XmlCommentEnd
            | XmlPiStart
            | XmlPiData
            | XmlPiEnd
            | XmlCdataStart
            | XmlCdataContent
            | XmlCdataEnd
    )
}

/// The context that follows `ctx`.
///
/// For a production this enters it: the production is pushed and its first
/// rule returned. For a terminal it is the rule after the token. Rule ends
/// pop the productions they close.
pub(crate) fn next_rule(ctx: RuleContext, stack: &mut ContextStack) -> Next {
    use RuleContext::*;
    let parent = stack.top();
    let next = match ctx {
        CompilationUnit => TopLevelNode,
        ImportDecl => enter(stack, ctx, ImportKeyword),
        FuncDef => enter(stack, ctx, FunctionKeyword),
        ModuleVarDecl | VarDecl => enter(stack, ctx, TypeDescriptor),
        ConstDecl => enter(stack, ctx, ConstKeyword),
        ExpressionStatement | AssignmentStmt | MemberAccessKey | Interpolation => {
            enter(stack, ctx, Expression)
        }
        ReturnStmt => enter(stack, ctx, ReturnKeyword),
        IfBlock => enter(stack, ctx, IfKeyword),
        ElseBlock => enter(stack, ctx, ElseBody),
        WhileBlock => enter(stack, ctx, WhileKeyword),
        BlockStmt | FuncBodyBlock => enter(stack, ctx, OpenBrace),
        BreakStmt => enter(stack, ctx, BreakKeyword),
        ContinueStmt => enter(stack, ctx, ContinueKeyword),
        ParamList => enter(stack, ctx, ParamStart),
        ArgList => enter(stack, ctx, ArgStart),
        BracedExpression => enter(stack, ctx, OpenParenthesis),
        StringTemplate => enter(stack, ctx, TemplateStart),

        RequiredParam => TypeDescriptor,
        TypeDescEnd => match parent {
            Some(VarDecl | ModuleVarDecl | ConstDecl) => VariableName,
            Some(ParamList) => ParamName,
            Some(FuncDef) => FuncBodyBlock,
            _ => return Err(NotViable),
        },
        ExpressionEnd => match parent {
            Some(VarDecl | ModuleVarDecl | ConstDecl | AssignmentStmt | ReturnStmt) => Semicolon,
            Some(ExpressionStatement) => ExprStmtRhs,
            Some(ArgList) => ArgEnd,
            Some(BracedExpression) => CloseParenthesis,
            Some(MemberAccessKey) => CloseBracket,
            Some(IfBlock | WhileBlock) => BlockStmt,
            Some(Interpolation) => InterpolationEnd,
            Some(CompilationUnit) => Eof,
            _ => return Err(NotViable),
        },
        IfBlockEnd => {
            pop_expecting(stack, IfBlock)?;
            pop_else_blocks(stack);
            Statements
        }

        DocString => TopLevelNode,
        PublicKeyword => TopLevelNodeWithoutModifier,
        ImportKeyword => ImportOrgOrModuleName,
        ImportOrgOrModuleName => ImportDeclRhs,
        Slash => ImportModuleName,
        Dot => match parent {
            Some(ImportDecl) => ImportModuleName,
            _ => FieldAccessIdentifier,
        },
        ImportModuleName => AfterImportModule,
        AsKeyword => ImportPrefix,
        ImportPrefix => Semicolon,
        Semicolon => match parent {
            Some(ImportDecl | ModuleVarDecl | ConstDecl) => {
                pop(stack)?;
                TopLevelNode
            }
            Some(
                VarDecl | ExpressionStatement | AssignmentStmt | ReturnStmt | BreakStmt
                | ContinueStmt,
            ) => {
                pop(stack)?;
                Statements
            }
            _ => return Err(NotViable),
        },
        FunctionKeyword => FuncName,
        FuncName => OpenParenthesis,
        OpenParenthesis => match parent {
            Some(FuncDef) => enter(stack, ParamList, ParamStart),
            Some(BracedExpression) => Expression,
            _ => return Err(NotViable),
        },
        CloseParenthesis => match parent {
            Some(ParamList) => {
                pop(stack)?;
                FuncOptionalReturns
            }
            Some(BracedExpression) => {
                pop(stack)?;
                ExpressionRhs
            }
            _ => return Err(NotViable),
        },
        Comma => match parent {
            Some(ParamList) => RequiredParam,
            Some(ArgList) => Expression,
            _ => return Err(NotViable),
        },
        ParamName => AfterParameter,
        ReturnsKeyword | ConstKeyword => TypeDescriptor,
        OpenBrace => match parent {
            Some(FuncBodyBlock | BlockStmt) => Statements,
            _ => return Err(NotViable),
        },
        CloseBrace => close_brace(stack)?,
        VariableName => match parent {
            Some(VarDecl | ModuleVarDecl) => VarDeclRhs,
            Some(ConstDecl) => AssignOp,
            _ => return Err(NotViable),
        },
        AssignOp => {
            if parent == Some(ExpressionStatement) {
                stack.switch(AssignmentStmt);
            }
            Expression
        }
        ReturnKeyword => ReturnStmtRhs,
        IfKeyword | WhileKeyword => Expression,
        ElseKeyword => match parent {
            Some(IfBlock) => {
                stack.switch(ElseBlock);
                ElseBody
            }
            _ => return Err(NotViable),
        },
        BreakKeyword | ContinueKeyword => Semicolon,
        BasicLiteral | VariableRef | FieldAccessIdentifier => ExpressionRhs,
        UnaryOperator | BinaryOperator => Expression,
        ArgListOpenParenthesis => enter(stack, ArgList, ArgStart),
        ArgListEnd => {
            pop_expecting(stack, ArgList)?;
            ExpressionRhs
        }
        OpenBracket => enter(stack, MemberAccessKey, Expression),
        CloseBracket => {
            pop_expecting(stack, MemberAccessKey)?;
            ExpressionRhs
        }
        SimpleTypeDescriptor | TypeReference => TypeDescRhs,
        QuestionMark => TypeDescEnd,
        TemplateStart | TemplateStringContent => TemplateMember,
        InterpolationStart => enter(stack, Interpolation, Expression),
        InterpolationEnd => {
            pop_expecting(stack, Interpolation)?;
            TemplateMember
        }
        TemplateEnd => {
            pop_expecting(stack, StringTemplate)?;
            ExpressionRhs
        }

        // Choices are expanded by the caller; nothing follows Eof.
        _ => return Err(NotViable),
    };
    Ok(next)
}

fn enter(stack: &mut ContextStack, production: RuleContext, first: RuleContext) -> RuleContext {
    stack.push(production);
    first
}

fn pop(stack: &mut ContextStack) -> Result<RuleContext, NotViable> {
    stack.pop().map_err(|_| NotViable)
}

fn pop_expecting(stack: &mut ContextStack, production: RuleContext) -> Result<(), NotViable> {
    if stack.top() != Some(production) {
        return Err(NotViable);
    }
    pop(stack).map(|_| ())
}

fn pop_else_blocks(stack: &mut ContextStack) {
    while stack.top() == Some(RuleContext::ElseBlock) {
        let _ = stack.pop();
    }
}

/// `}` closes a function body or a block; what follows depends on what the
/// block belonged to.
fn close_brace(stack: &mut ContextStack) -> Next {
    use RuleContext::*;
    match stack.top() {
        Some(FuncBodyBlock) => {
            pop(stack)?;
            pop_expecting(stack, FuncDef)?;
            Ok(TopLevelNode)
        }
        Some(BlockStmt) => {
            pop(stack)?;
            match stack.top() {
                Some(IfBlock) => Ok(IfBlockRhs),
                Some(ElseBlock) => {
                    pop_else_blocks(stack);
                    Ok(Statements)
                }
                Some(WhileBlock) => {
                    pop(stack)?;
                    Ok(Statements)
                }
                _ => Ok(Statements),
            }
        }
        _ => Err(NotViable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use RuleContext::*;

    fn stack_of(contexts: &[RuleContext]) -> ContextStack {
        let mut stack = ContextStack::new();
        for ctx in contexts {
            stack.push(*ctx);
        }
        stack
    }

    #[test]
    fn test_function_body_close_returns_to_top_level() {
        let mut stack = stack_of(&[FuncDef, FuncBodyBlock]);
        assert_eq!(next_rule(CloseBrace, &mut stack), Ok(TopLevelNode));
        assert_eq!(stack.as_slice(), &[CompilationUnit]);
    }

    #[test]
    fn test_expression_end_depends_on_parent() {
        let mut stack = stack_of(&[FuncDef, FuncBodyBlock, ExpressionStatement, ArgList]);
        assert_eq!(next_rule(ExpressionEnd, &mut stack), Ok(ArgEnd));
        assert_eq!(next_rule(ArgListEnd, &mut stack), Ok(ExpressionRhs));
        assert_eq!(next_rule(ExpressionEnd, &mut stack), Ok(ExprStmtRhs));
    }

    #[test]
    fn test_assignment_switches_statement() {
        let mut stack = stack_of(&[BlockStmt, ExpressionStatement]);
        assert_eq!(next_rule(AssignOp, &mut stack), Ok(Expression));
        assert_eq!(stack.top(), Some(AssignmentStmt));
        assert_eq!(next_rule(ExpressionEnd, &mut stack), Ok(Semicolon));
        assert_eq!(next_rule(Semicolon, &mut stack), Ok(Statements));
        assert_eq!(stack.top(), Some(BlockStmt));
    }

    #[test]
    fn test_else_if_chain_unwinds() {
        let mut stack = stack_of(&[BlockStmt, IfBlock]);
        assert_eq!(next_rule(ElseKeyword, &mut stack), Ok(ElseBody));
        assert_eq!(next_rule(IfBlock, &mut stack), Ok(IfKeyword));
        assert_eq!(stack.as_slice(), &[CompilationUnit, BlockStmt, ElseBlock, IfBlock]);
        assert_eq!(next_rule(IfBlockEnd, &mut stack), Ok(Statements));
        assert_eq!(stack.as_slice(), &[CompilationUnit, BlockStmt]);
    }

    #[test]
    fn test_mismatched_pop_is_not_viable() {
        let mut stack = stack_of(&[FuncDef]);
        assert_eq!(next_rule(ArgListEnd, &mut stack), Err(NotViable));
        assert_eq!(next_rule(Semicolon, &mut ContextStack::new()), Err(NotViable));
    }

    #[test]
    fn test_terminal_matching() {
        assert!(matches(ArgListEnd, SyntaxKind::CloseParen));
        assert!(matches(AssignOp, SyntaxKind::PlusEqual));
        assert!(matches(SimpleTypeDescriptor, SyntaxKind::IntKeyword));
        assert!(matches(BasicLiteral, SyntaxKind::TrueKeyword));
        assert!(!matches(VariableRef, SyntaxKind::IntKeyword));
        assert!(!matches(Expression, SyntaxKind::Identifier));
    }

    #[test]
    fn test_every_choice_is_not_terminal() {
        for ctx in [TopLevelNode, Statement, Expression, ExpressionRhs, TypeDescriptor] {
            assert!(alternatives(ctx).is_some());
            assert!(!is_terminal(ctx));
        }
    }
}
