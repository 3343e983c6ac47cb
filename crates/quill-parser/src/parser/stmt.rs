//! Statement parsing

use super::expr::{parse_expression, starts_expression};
use super::module::{parse_type_desc, parse_var_decl_rest};
use super::{Parser, MAX_PARSE_DEPTH};
use crate::context::RuleContext;
use crate::error::SyntaxFault;
use crate::recovery::{context_matches, Action};
use crate::token::SyntaxKind;
use crate::tree::{NodeKind, SyntaxElement, SyntaxNode};

/// Parse `{ statements }`. The caller has pushed the block's context.
pub(super) fn parse_block(parser: &mut Parser, kind: NodeKind) -> Result<SyntaxNode, SyntaxFault> {
    let mut children: Vec<SyntaxElement> = vec![parser.expect(RuleContext::OpenBrace)?.into()];
    parse_statement_list(parser, &mut children, true)?;
    children.push(parser.expect(RuleContext::CloseBrace)?.into());
    Ok(SyntaxNode::new(kind, children))
}

/// Parse statements until `}` (inside braces) or end of input.
pub(super) fn parse_statement_list(
    parser: &mut Parser,
    children: &mut Vec<SyntaxElement>,
    in_braces: bool,
) -> Result<(), SyntaxFault> {
    loop {
        match parser.peek_kind() {
            SyntaxKind::Eof => return Ok(()),
            SyntaxKind::CloseBrace if in_braces => return Ok(()),
            SyntaxKind::CloseBrace => {
                let token = parser.consume();
                parser.discard_invalid(token);
                continue;
            }
            _ => {}
        }

        if !starts_statement(parser)? {
            match parser.recover(RuleContext::Statements, false)? {
                Action::Remove | Action::Insert => {}
                Action::Keep => {
                    let token = parser.consume();
                    parser.discard_invalid(token);
                }
            }
            continue;
        }

        let start = parser.reader.current_token_index();
        if let Some(statement) = parse_statement(parser)? {
            children.push(statement.into());
        }
        if parser.reader.current_token_index() == start && parser.inserted.is_none() {
            let kind = parser.peek_kind();
            if kind != SyntaxKind::Eof && kind != SyntaxKind::CloseBrace {
                let token = parser.consume();
                parser.discard_invalid(token);
            }
        }
    }
}

/// Returns true if the next token can start a statement.
pub(super) fn starts_statement(parser: &mut Parser) -> Result<bool, SyntaxFault> {
    match parser.peek_kind() {
        SyntaxKind::ReturnKeyword
        | SyntaxKind::IfKeyword
        | SyntaxKind::WhileKeyword
        | SyntaxKind::OpenBrace
        | SyntaxKind::BreakKeyword
        | SyntaxKind::ContinueKeyword => Ok(true),
        _ => Ok(starts_var_decl(parser)? || starts_expression(parser)?),
    }
}

/// A type descriptor followed by a name: a built-in type or `var`, or a
/// type reference followed by a name or `?`.
pub(super) fn starts_var_decl(parser: &mut Parser) -> Result<bool, SyntaxFault> {
    let kind = parser.peek_kind();
    if kind == SyntaxKind::XmlKeyword {
        return Ok(parser.peek_kind_at(1)? != SyntaxKind::Backtick);
    }
    if kind.is_builtin_type() || kind == SyntaxKind::VarKeyword {
        return Ok(true);
    }
    if kind == SyntaxKind::Identifier {
        let next = parser.peek_kind_at(1)?;
        return Ok(matches!(next, SyntaxKind::Identifier | SyntaxKind::QuestionMark));
    }
    Ok(false)
}

/// Parse a statement. Returns `None` when nesting is too deep and the
/// statement was skipped.
pub(super) fn parse_statement(parser: &mut Parser) -> Result<Option<SyntaxNode>, SyntaxFault> {
    // Check depth before entering
    parser.depth += 1;
    if parser.depth > MAX_PARSE_DEPTH {
        parser.skip_too_deep();
        parser.depth -= 1;
        return Ok(None);
    }

    // Inner function so `?` can be used while the depth is always restored
    let result = parse_statement_inner(parser);

    parser.depth -= 1;
    result.map(Some)
}

fn parse_statement_inner(parser: &mut Parser) -> Result<SyntaxNode, SyntaxFault> {
    match parser.peek_kind() {
        SyntaxKind::ReturnKeyword => parse_return(parser),
        SyntaxKind::IfKeyword => parse_if(parser),
        SyntaxKind::WhileKeyword => parse_while(parser),
        SyntaxKind::OpenBrace => {
            parser.errors.push_context(RuleContext::BlockStmt);
            let block = parse_block(parser, NodeKind::Block)?;
            parser.errors.pop_context()?;
            Ok(block)
        }
        SyntaxKind::BreakKeyword => parse_jump(parser, RuleContext::BreakStmt, NodeKind::Break),
        SyntaxKind::ContinueKeyword => {
            parse_jump(parser, RuleContext::ContinueStmt, NodeKind::Continue)
        }
        _ if starts_var_decl(parser)? => {
            parser.errors.push_context(RuleContext::VarDecl);
            let mut children: Vec<SyntaxElement> = vec![parse_type_desc(parser)?.into()];
            parse_var_decl_rest(parser, &mut children)?;
            parser.errors.pop_context()?;
            Ok(SyntaxNode::new(NodeKind::VarDecl, children))
        }
        _ => parse_expression_statement(parser),
    }
}

fn parse_return(parser: &mut Parser) -> Result<SyntaxNode, SyntaxFault> {
    parser.errors.push_context(RuleContext::ReturnStmt);
    let mut children: Vec<SyntaxElement> = vec![parser.consume().into()];
    if !parser.at(SyntaxKind::Semicolon) && starts_expression(parser)? {
        children.push(parse_expression(parser)?.into());
    }
    children.push(parser.expect_terminator()?.into());
    parser.errors.pop_context()?;
    Ok(SyntaxNode::new(NodeKind::ReturnStatement, children))
}

fn parse_if(parser: &mut Parser) -> Result<SyntaxNode, SyntaxFault> {
    parser.errors.push_context(RuleContext::IfBlock);
    let mut children: Vec<SyntaxElement> = vec![parser.consume().into()];
    children.push(parse_expression(parser)?.into());
    children.push(parse_nested_block(parser)?.into());

    if !parser.at(SyntaxKind::ElseKeyword) {
        parser.errors.pop_context()?;
        return Ok(SyntaxNode::new(NodeKind::IfElse, children));
    }

    parser.errors.switch_context(RuleContext::ElseBlock);
    let mut else_clause: Vec<SyntaxElement> = vec![parser.consume().into()];
    loop {
        match parser.peek_kind() {
            SyntaxKind::IfKeyword => {
                if let Some(else_if) = parse_statement(parser)? {
                    else_clause.push(else_if.into());
                }
                break;
            }
            SyntaxKind::OpenBrace | SyntaxKind::Eof => {
                else_clause.push(parse_nested_block(parser)?.into());
                break;
            }
            _ => match parser.recover(RuleContext::ElseBody, false)? {
                Action::Remove => continue,
                Action::Insert | Action::Keep => {
                    else_clause.push(parse_nested_block(parser)?.into());
                    break;
                }
            },
        }
    }
    parser.errors.pop_context()?;

    children.push(SyntaxNode::new(NodeKind::ElseClause, else_clause).into());
    Ok(SyntaxNode::new(NodeKind::IfElse, children))
}

fn parse_while(parser: &mut Parser) -> Result<SyntaxNode, SyntaxFault> {
    parser.errors.push_context(RuleContext::WhileBlock);
    let keyword = parser.consume();
    let condition = parse_expression(parser)?;
    let body = parse_nested_block(parser)?;
    parser.errors.pop_context()?;
    Ok(SyntaxNode::new(
        NodeKind::While,
        vec![keyword.into(), condition.into(), body.into()],
    ))
}

/// The block of an `if`, `else` or `while`.
fn parse_nested_block(parser: &mut Parser) -> Result<SyntaxNode, SyntaxFault> {
    parser.errors.push_context(RuleContext::BlockStmt);
    let block = parse_block(parser, NodeKind::Block)?;
    parser.errors.pop_context()?;
    Ok(block)
}

/// `break;` and `continue;`
fn parse_jump(parser: &mut Parser, ctx: RuleContext, kind: NodeKind) -> Result<SyntaxNode, SyntaxFault> {
    parser.errors.push_context(ctx);
    let keyword = parser.consume();
    let semicolon = parser.expect_terminator()?;
    parser.errors.pop_context()?;
    Ok(SyntaxNode::new(kind, vec![keyword.into(), semicolon.into()]))
}

fn parse_expression_statement(parser: &mut Parser) -> Result<SyntaxNode, SyntaxFault> {
    parser.errors.push_context(RuleContext::ExpressionStatement);
    let mut children: Vec<SyntaxElement> = vec![parse_expression(parser)?.into()];

    let kind = if context_matches(RuleContext::AssignOp, parser.peek_kind()) {
        parser.errors.switch_context(RuleContext::AssignmentStmt);
        children.push(parser.consume().into());
        children.push(parse_expression(parser)?.into());
        NodeKind::AssignmentStatement
    } else {
        NodeKind::ExpressionStatement
    };

    children.push(parser.expect_terminator()?.into());
    parser.errors.pop_context()?;
    Ok(SyntaxNode::new(kind, children))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticCode;

    fn statements(source: &str) -> SyntaxNode {
        let tree = Parser::new(source).parse_statements().unwrap();
        assert_eq!(tree.text(), source);
        tree
    }

    fn codes(tree: &SyntaxNode) -> Vec<DiagnosticCode> {
        tree.diagnostics().iter().map(|d| d.code).collect()
    }

    #[test]
    fn test_if_else_chain() {
        let tree = statements("if a { x = 1; } else if b { x = 2; } else { x = 3; }");
        assert!(codes(&tree).is_empty());
        assert_eq!(tree.find_all(NodeKind::IfElse).len(), 2);
        assert_eq!(tree.find_all(NodeKind::ElseClause).len(), 2);
        assert_eq!(tree.find_all(NodeKind::AssignmentStatement).len(), 3);
    }

    #[test]
    fn test_while_with_jumps() {
        let tree = statements("while i < 10 { if i == 5 { break; } i += 1; continue; }");
        assert!(codes(&tree).is_empty());
        assert!(tree.find(NodeKind::Break).is_some());
        assert!(tree.find(NodeKind::Continue).is_some());
    }

    #[test]
    fn test_var_decls() {
        let tree = statements("int x = 1; string? s; Foo f = g(); var v = x;");
        assert!(codes(&tree).is_empty());
        assert_eq!(tree.find_all(NodeKind::VarDecl).len(), 4);
    }

    #[test]
    fn test_xml_template_statement_is_not_a_declaration() {
        let tree = statements("xml `<a/>`;");
        assert!(tree.find(NodeKind::VarDecl).is_none());
        assert!(tree.find(NodeKind::XmlTemplate).is_some());
    }

    #[test]
    fn test_missing_semicolon_before_next_statement() {
        let tree = statements("x = 1\ny = 2;");
        assert_eq!(codes(&tree), vec![DiagnosticCode::MissingSemicolonToken]);
        assert_eq!(tree.find_all(NodeKind::AssignmentStatement).len(), 2);
    }

    #[test]
    fn test_return_before_close_brace() {
        let tree = statements("{ return }");
        assert_eq!(codes(&tree), vec![DiagnosticCode::MissingSemicolonToken]);
        assert!(tree.find(NodeKind::ReturnStatement).is_some());
    }

    #[test]
    fn test_deep_blocks_are_skipped() {
        let depth = MAX_PARSE_DEPTH + 8;
        let source = format!("{}{}", "{".repeat(depth), "}".repeat(depth));
        let tree = statements(&source);
        assert!(codes(&tree).contains(&DiagnosticCode::TooDeeplyNested));
    }
}
