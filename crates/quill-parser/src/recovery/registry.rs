//! What to synthesize for a rule context.
//!
//! Lookup is tiered: non-terminal and name contexts first, then separators and
//! operators, then keywords. Anything else is a generic syntax error with no
//! particular token kind.

use crate::context::RuleContext;
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::token::{SyntaxKind, Token};

/// The token kind expected at `ctx` and the diagnostic for its absence.
pub fn expected(ctx: RuleContext) -> (SyntaxKind, DiagnosticCode) {
    non_terminal(ctx)
        .or_else(|| separator_or_operator(ctx))
        .or_else(|| keyword(ctx))
        .unwrap_or((SyntaxKind::None, DiagnosticCode::SyntaxError))
}

/// A zero-width missing token for `ctx`.
pub fn missing_token(ctx: RuleContext) -> Token {
    let (kind, code) = expected(ctx);
    Token::missing(kind, Diagnostic::new(code))
}

/// Returns true if `ctx` has an entry in the first tier. Such contexts are
/// synthesized directly instead of through one of their alternatives.
pub(crate) fn has_direct_entry(ctx: RuleContext) -> bool {
    non_terminal(ctx).is_some()
}

fn non_terminal(ctx: RuleContext) -> Option<(SyntaxKind, DiagnosticCode)> {
    use RuleContext::*;
    let entry = match ctx {
        Expression | BasicLiteral | VariableRef | ReturnStmtRhs | ArgStart => {
            (SyntaxKind::Identifier, DiagnosticCode::MissingExpression)
        }
        TypeDescriptor | SimpleTypeDescriptor | TypeReference | RequiredParam => {
            (SyntaxKind::Identifier, DiagnosticCode::MissingTypeDesc)
        }
        FuncName => (SyntaxKind::Identifier, DiagnosticCode::MissingFunctionName),
        VariableName => (SyntaxKind::Identifier, DiagnosticCode::MissingVariableName),
        ParamName => (SyntaxKind::Identifier, DiagnosticCode::MissingParameterName),
        ImportOrgOrModuleName | ImportModuleName => {
            (SyntaxKind::Identifier, DiagnosticCode::MissingModuleName)
        }
        ImportPrefix => (SyntaxKind::Identifier, DiagnosticCode::MissingImportPrefix),
        FieldAccessIdentifier => (SyntaxKind::Identifier, DiagnosticCode::MissingIdentifier),
        TopLevelNode | TopLevelNodeWithoutModifier => {
            (SyntaxKind::None, DiagnosticCode::MissingTopLevelNode)
        }
        Statement => (SyntaxKind::None, DiagnosticCode::MissingStatement),
        _ => return None,
    };
    Some(entry)
}

fn separator_or_operator(ctx: RuleContext) -> Option<(SyntaxKind, DiagnosticCode)> {
    use RuleContext::*;
    let entry = match ctx {
        Semicolon => (SyntaxKind::Semicolon, DiagnosticCode::MissingSemicolonToken),
        Comma => (SyntaxKind::Comma, DiagnosticCode::MissingCommaToken),
        Dot => (SyntaxKind::Dot, DiagnosticCode::MissingDotToken),
        Slash => (SyntaxKind::Slash, DiagnosticCode::MissingSlashToken),
        OpenParenthesis | ArgListOpenParenthesis => {
            (SyntaxKind::OpenParen, DiagnosticCode::MissingOpenParenToken)
        }
        CloseParenthesis | ArgListEnd => {
            (SyntaxKind::CloseParen, DiagnosticCode::MissingCloseParenToken)
        }
        OpenBrace => (SyntaxKind::OpenBrace, DiagnosticCode::MissingOpenBraceToken),
        CloseBrace => (SyntaxKind::CloseBrace, DiagnosticCode::MissingCloseBraceToken),
        InterpolationEnd => (SyntaxKind::CloseBrace, DiagnosticCode::MissingInterpolationEnd),
        OpenBracket => (SyntaxKind::OpenBracket, DiagnosticCode::MissingOpenBracketToken),
        CloseBracket => (SyntaxKind::CloseBracket, DiagnosticCode::MissingCloseBracketToken),
        TemplateStart | TemplateEnd => (SyntaxKind::Backtick, DiagnosticCode::MissingBacktickToken),
        AssignOp => (SyntaxKind::Equal, DiagnosticCode::MissingAssignmentOperator),
        BinaryOperator => (SyntaxKind::Plus, DiagnosticCode::MissingBinaryOperator),
        _ => return None,
    };
    Some(entry)
}

fn keyword(ctx: RuleContext) -> Option<(SyntaxKind, DiagnosticCode)> {
    use RuleContext::*;
    let entry = match ctx {
        PublicKeyword => (SyntaxKind::PublicKeyword, DiagnosticCode::MissingPublicKeyword),
        ImportKeyword => (SyntaxKind::ImportKeyword, DiagnosticCode::MissingImportKeyword),
        AsKeyword => (SyntaxKind::AsKeyword, DiagnosticCode::MissingAsKeyword),
        FunctionKeyword => (SyntaxKind::FunctionKeyword, DiagnosticCode::MissingFunctionKeyword),
        ReturnsKeyword => (SyntaxKind::ReturnsKeyword, DiagnosticCode::MissingReturnsKeyword),
        ConstKeyword => (SyntaxKind::ConstKeyword, DiagnosticCode::MissingConstKeyword),
        ReturnKeyword => (SyntaxKind::ReturnKeyword, DiagnosticCode::MissingReturnKeyword),
        IfKeyword => (SyntaxKind::IfKeyword, DiagnosticCode::MissingIfKeyword),
        ElseKeyword => (SyntaxKind::ElseKeyword, DiagnosticCode::MissingElseKeyword),
        WhileKeyword => (SyntaxKind::WhileKeyword, DiagnosticCode::MissingWhileKeyword),
        BreakKeyword => (SyntaxKind::BreakKeyword, DiagnosticCode::MissingBreakKeyword),
        ContinueKeyword => (SyntaxKind::ContinueKeyword, DiagnosticCode::MissingContinueKeyword),
        _ => return None,
    };
    Some(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers() {
        assert_eq!(
            expected(RuleContext::Expression),
            (SyntaxKind::Identifier, DiagnosticCode::MissingExpression)
        );
        assert_eq!(
            expected(RuleContext::ArgListEnd),
            (SyntaxKind::CloseParen, DiagnosticCode::MissingCloseParenToken)
        );
        assert_eq!(
            expected(RuleContext::ElseKeyword),
            (SyntaxKind::ElseKeyword, DiagnosticCode::MissingElseKeyword)
        );
    }

    #[test]
    fn test_default_is_syntax_error() {
        assert_eq!(
            expected(RuleContext::ExpressionRhs),
            (SyntaxKind::None, DiagnosticCode::SyntaxError)
        );
        assert_eq!(
            expected(RuleContext::FuncDef),
            (SyntaxKind::None, DiagnosticCode::SyntaxError)
        );
    }

    #[test]
    fn test_missing_token_carries_diagnostic() {
        let token = missing_token(RuleContext::Semicolon);
        assert!(token.is_missing());
        assert_eq!(token.kind(), SyntaxKind::Semicolon);
        assert_eq!(token.text(), "");
        assert_eq!(token.diagnostics()[0].code, DiagnosticCode::MissingSemicolonToken);
    }
}
