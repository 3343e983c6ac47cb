//! String, regular-expression, XML and prompt templates.
//!
//! The lexer enters template mode on its own when it sees a backtick. For
//! prefixed templates the driver replaces that mode right after consuming
//! the opener, before anything past it is scanned.

use super::expr::parse_expression;
use super::Parser;
use crate::context::RuleContext;
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::error::SyntaxFault;
use crate::lexer::LexerMode;
use crate::token::{SyntaxKind, Token};
use crate::tree::{NodeKind, SyntaxElement, SyntaxNode};

/// `re`, `xml` or `natural` immediately followed by the template opener.
pub(super) fn starts_prefixed_template(parser: &mut Parser) -> Result<bool, SyntaxFault> {
    let opener = match parser.peek_kind() {
        SyntaxKind::ReKeyword | SyntaxKind::XmlKeyword => SyntaxKind::Backtick,
        SyntaxKind::NaturalKeyword => SyntaxKind::OpenBrace,
        _ => return Ok(false),
    };
    Ok(parser.peek_kind_at(1)? == opener)
}

pub(super) fn parse_string_template(parser: &mut Parser) -> Result<SyntaxNode, SyntaxFault> {
    parser.errors.push_context(RuleContext::StringTemplate);
    let open = parser.expect(RuleContext::TemplateStart)?;
    let mut children: Vec<SyntaxElement> = Vec::new();
    let missing_open = open.is_missing();
    children.push(open.into());
    if !missing_open {
        parse_members(parser, &mut children, SyntaxKind::Backtick)?;
    }
    parser.errors.pop_context()?;
    Ok(SyntaxNode::new(NodeKind::StringTemplate, children))
}

pub(super) fn parse_prefixed_template(parser: &mut Parser) -> Result<SyntaxNode, SyntaxFault> {
    let prefix = parser.consume();
    let (kind, close) = match prefix.kind() {
        SyntaxKind::ReKeyword => (NodeKind::RegExpTemplate, SyntaxKind::Backtick),
        SyntaxKind::XmlKeyword => (NodeKind::XmlTemplate, SyntaxKind::Backtick),
        _ => (NodeKind::PromptTemplate, SyntaxKind::CloseBrace),
    };

    parser.errors.push_context(RuleContext::StringTemplate);
    let open = parser.consume();
    match kind {
        NodeKind::RegExpTemplate => replace_template_mode(parser, LexerMode::RegExp),
        NodeKind::XmlTemplate => replace_template_mode(parser, LexerMode::XmlContent),
        _ => {
            if parser.reader.mode() == LexerMode::InterpolationBracedContent {
                parser.reader.switch_mode(LexerMode::PromptTemplate);
            } else {
                parser.reader.start_mode(LexerMode::PromptTemplate);
            }
        }
    }

    let mut children: Vec<SyntaxElement> = vec![prefix.into(), open.into()];
    parse_members(parser, &mut children, close)?;
    parser.errors.pop_context()?;
    Ok(SyntaxNode::new(kind, children))
}

/// The backtick put the lexer in plain template mode; narrow it.
fn replace_template_mode(parser: &mut Parser, mode: LexerMode) {
    if parser.reader.mode() == LexerMode::Template {
        parser.reader.switch_mode(mode);
    }
}

/// Content and interpolations up to the `close` token.
fn parse_members(
    parser: &mut Parser,
    children: &mut Vec<SyntaxElement>,
    close: SyntaxKind,
) -> Result<(), SyntaxFault> {
    loop {
        let kind = parser.peek_kind();
        if kind == close {
            children.push(parser.consume().into());
            return Ok(());
        }
        match kind {
            SyntaxKind::InterpolationStart => children.push(parse_interpolation(parser)?.into()),
            SyntaxKind::Eof => {
                let missing = Token::missing(close, Diagnostic::new(DiagnosticCode::UnterminatedTemplate));
                children.push(missing.into());
                return Ok(());
            }
            _ => children.push(parser.consume().into()),
        }
    }
}

fn parse_interpolation(parser: &mut Parser) -> Result<SyntaxNode, SyntaxFault> {
    parser.errors.push_context(RuleContext::Interpolation);
    let start = parser.consume();
    let expr = parse_expression(parser)?;
    let end = parser.expect(RuleContext::InterpolationEnd)?;
    parser.errors.pop_context()?;
    Ok(SyntaxNode::new(
        NodeKind::Interpolation,
        vec![start.into(), expr.into(), end.into()],
    ))
}
