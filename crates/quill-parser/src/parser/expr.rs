//! Expression parsing

use super::precedence::{get_precedence, is_right_associative, Precedence};
use super::{template, Parser, MAX_PARSE_DEPTH};
use crate::context::RuleContext;
use crate::error::SyntaxFault;
use crate::recovery::{registry, Action};
use crate::token::SyntaxKind;
use crate::tree::{NodeKind, SyntaxElement, SyntaxNode};

/// Parse an expression.
pub(super) fn parse_expression(parser: &mut Parser) -> Result<SyntaxNode, SyntaxFault> {
    parser.depth += 1;
    if parser.depth > MAX_PARSE_DEPTH {
        parser.skip_too_deep();
        parser.depth -= 1;
        return Ok(missing_expression());
    }

    let result = parse_binary(parser, Precedence::Elvis);

    parser.depth -= 1;
    result
}

/// Returns true if the next token can start an expression.
pub(super) fn starts_expression(parser: &mut Parser) -> Result<bool, SyntaxFault> {
    let kind = parser.peek_kind();
    if kind.is_literal() || kind.is_unary_operator() {
        return Ok(true);
    }
    match kind {
        SyntaxKind::Identifier | SyntaxKind::OpenParen | SyntaxKind::Backtick => Ok(true),
        _ => template::starts_prefixed_template(parser),
    }
}

/// Precedence climbing over binary operators binding at least as tight as `min`.
fn parse_binary(parser: &mut Parser, min: Precedence) -> Result<SyntaxNode, SyntaxFault> {
    let mut lhs = parse_unary(parser)?;

    loop {
        let kind = parser.peek_kind();
        let precedence = get_precedence(kind);
        if precedence == Precedence::None || precedence < min {
            break;
        }

        let operator = parser.consume();
        let rhs = if is_right_associative(kind) {
            parse_expression(parser)?
        } else {
            parse_binary(parser, precedence.tighter())?
        };
        lhs = SyntaxNode::new(
            NodeKind::BinaryExpr,
            vec![lhs.into(), operator.into(), rhs.into()],
        );
    }

    Ok(lhs)
}

fn parse_unary(parser: &mut Parser) -> Result<SyntaxNode, SyntaxFault> {
    let mut operators = Vec::new();
    while parser.peek_kind().is_unary_operator() {
        operators.push(parser.consume());
    }

    let mut operand = parse_postfix(parser)?;
    while let Some(operator) = operators.pop() {
        operand = SyntaxNode::new(NodeKind::UnaryExpr, vec![operator.into(), operand.into()]);
    }
    Ok(operand)
}

/// Field access, calls and member access after a primary expression.
fn parse_postfix(parser: &mut Parser) -> Result<SyntaxNode, SyntaxFault> {
    let mut expr = parse_primary(parser)?;

    loop {
        expr = match parser.peek_kind() {
            SyntaxKind::Dot => {
                let dot = parser.consume();
                let name = parser.expect(RuleContext::FieldAccessIdentifier)?;
                SyntaxNode::new(NodeKind::FieldAccess, vec![expr.into(), dot.into(), name.into()])
            }
            SyntaxKind::OpenParen => {
                let args = parse_arg_list(parser)?;
                SyntaxNode::new(NodeKind::CallExpr, vec![expr.into(), args.into()])
            }
            SyntaxKind::OpenBracket => {
                parser.errors.push_context(RuleContext::MemberAccessKey);
                let open = parser.consume();
                let key = parse_expression(parser)?;
                let close = parser.expect(RuleContext::CloseBracket)?;
                parser.errors.pop_context()?;
                SyntaxNode::new(
                    NodeKind::MemberAccess,
                    vec![expr.into(), open.into(), key.into(), close.into()],
                )
            }
            _ => return Ok(expr),
        };
    }
}

fn parse_arg_list(parser: &mut Parser) -> Result<SyntaxNode, SyntaxFault> {
    parser.errors.push_context(RuleContext::ArgList);
    let mut children: Vec<SyntaxElement> = vec![parser.consume().into()];

    if !parser.at(SyntaxKind::CloseParen) && !parser.at(SyntaxKind::Eof) {
        loop {
            children.push(parse_expression(parser)?.into());
            if !parser.list_separator(RuleContext::ArgEnd, SyntaxKind::CloseParen, &mut children)? {
                break;
            }
        }
    }

    children.push(parser.expect(RuleContext::ArgListEnd)?.into());
    parser.errors.pop_context()?;
    Ok(SyntaxNode::new(NodeKind::ArgList, children))
}

fn parse_primary(parser: &mut Parser) -> Result<SyntaxNode, SyntaxFault> {
    loop {
        let kind = parser.peek_kind();

        if kind.is_literal() {
            return Ok(SyntaxNode::new(NodeKind::Literal, vec![parser.consume().into()]));
        }
        match kind {
            SyntaxKind::Identifier => {
                return Ok(SyntaxNode::new(NodeKind::NameRef, vec![parser.consume().into()]));
            }
            SyntaxKind::OpenParen => return parse_braced(parser),
            SyntaxKind::Backtick => return template::parse_string_template(parser),
            _ => {}
        }
        if template::starts_prefixed_template(parser)? {
            return template::parse_prefixed_template(parser);
        }

        match parser.recover(RuleContext::Expression, false)? {
            Action::Remove => continue,
            Action::Insert => {
                let token = match parser.inserted.take() {
                    Some(token) if token.kind() == SyntaxKind::Identifier => token,
                    _ => registry::missing_token(RuleContext::Expression),
                };
                return Ok(SyntaxNode::new(NodeKind::NameRef, vec![token.into()]));
            }
            Action::Keep => return Ok(missing_expression()),
        }
    }
}

fn parse_braced(parser: &mut Parser) -> Result<SyntaxNode, SyntaxFault> {
    parser.errors.push_context(RuleContext::BracedExpression);
    let open = parser.expect(RuleContext::OpenParenthesis)?;
    let inner = parse_expression(parser)?;
    let close = parser.expect(RuleContext::CloseParenthesis)?;
    parser.errors.pop_context()?;
    Ok(SyntaxNode::new(
        NodeKind::BracedExpr,
        vec![open.into(), inner.into(), close.into()],
    ))
}

fn missing_expression() -> SyntaxNode {
    SyntaxNode::new(
        NodeKind::NameRef,
        vec![registry::missing_token(RuleContext::Expression).into()],
    )
}
