//! Top-level declarations: imports, functions, module variables and
//! constants.

use super::expr::parse_expression;
use super::stmt::{parse_block, starts_var_decl};
use super::Parser;
use crate::context::RuleContext;
use crate::error::SyntaxFault;
use crate::lexer::documentation::documentation_warnings;
use crate::lexer::LexerMode;
use crate::recovery::{registry, Action};
use crate::token::{SyntaxKind, Token};
use crate::tree::{NodeKind, SyntaxElement, SyntaxNode};

/// Parse a whole module, up to and including end of input.
pub(super) fn parse_module(parser: &mut Parser) -> Result<SyntaxNode, SyntaxFault> {
    let mut children: Vec<SyntaxElement> = Vec::new();

    loop {
        match parser.peek_kind() {
            SyntaxKind::Eof => break,
            SyntaxKind::DocumentationString => children.push(parse_documentation(parser).into()),
            SyntaxKind::PublicKeyword => parse_public_member(parser, &mut children)?,
            SyntaxKind::ImportKeyword => children.push(parse_import(parser)?.into()),
            SyntaxKind::FunctionKeyword => children.push(parse_function(parser, None)?.into()),
            SyntaxKind::ConstKeyword => children.push(parse_const(parser, None)?.into()),
            _ if starts_var_decl(parser)? => {
                children.push(parse_module_var(parser, None)?.into())
            }
            _ => parser.recover_in_dispatch(RuleContext::TopLevelNode)?,
        }
    }

    children.push(parser.consume().into());
    Ok(SyntaxNode::new(NodeKind::Module, children))
}

/// A documentation string, with its markup problems attached as warnings.
fn parse_documentation(parser: &mut Parser) -> SyntaxNode {
    let token = parser.consume();
    let token = documentation_warnings(token.text())
        .into_iter()
        .fold(token, Token::with_diagnostic);
    SyntaxNode::new(NodeKind::Documentation, vec![token.into()])
}

fn parse_public_member(
    parser: &mut Parser,
    children: &mut Vec<SyntaxElement>,
) -> Result<(), SyntaxFault> {
    let public = parser.consume();
    loop {
        let node = match parser.peek_kind() {
            SyntaxKind::FunctionKeyword => parse_function(parser, Some(public))?,
            SyntaxKind::ConstKeyword => parse_const(parser, Some(public))?,
            _ if starts_var_decl(parser)? => parse_module_var(parser, Some(public))?,
            SyntaxKind::Eof => {
                children.push(public.into());
                children.push(registry::missing_token(RuleContext::TopLevelNodeWithoutModifier).into());
                return Ok(());
            }
            _ => match parser.recover(RuleContext::TopLevelNodeWithoutModifier, false)? {
                Action::Remove => continue,
                Action::Insert | Action::Keep => {
                    children.push(public.into());
                    children.push(registry::missing_token(RuleContext::TopLevelNodeWithoutModifier).into());
                    return Ok(());
                }
            },
        };
        children.push(node.into());
        return Ok(());
    }
}

/// `import org/module.sub as prefix;`
fn parse_import(parser: &mut Parser) -> Result<SyntaxNode, SyntaxFault> {
    parser.errors.push_context(RuleContext::ImportDecl);
    let mut children: Vec<SyntaxElement> = vec![parser.consume().into()];
    parser.reader.start_mode(LexerMode::Import);

    children.push(parser.expect(RuleContext::ImportOrgOrModuleName)?.into());
    if parser.at(SyntaxKind::Slash) {
        children.push(parser.consume().into());
        children.push(parser.expect(RuleContext::ImportModuleName)?.into());
    }
    while parser.at(SyntaxKind::Dot) {
        children.push(parser.consume().into());
        children.push(parser.expect(RuleContext::ImportModuleName)?.into());
    }
    if parser.at(SyntaxKind::AsKeyword) {
        children.push(parser.consume().into());
        children.push(parser.expect(RuleContext::ImportPrefix)?.into());
    }
    children.push(parser.expect_terminator()?.into());

    if parser.reader.mode() == LexerMode::Import {
        parser.reader.end_mode()?;
    }
    parser.errors.pop_context()?;
    Ok(SyntaxNode::new(NodeKind::ImportDecl, children))
}

/// `[public] function name(params) [returns type] { ... }`
fn parse_function(parser: &mut Parser, public: Option<Token>) -> Result<SyntaxNode, SyntaxFault> {
    parser.errors.push_context(RuleContext::FuncDef);
    let mut children: Vec<SyntaxElement> = public.into_iter().map(Into::into).collect();
    children.push(parser.expect(RuleContext::FunctionKeyword)?.into());
    children.push(parser.expect(RuleContext::FuncName)?.into());
    children.push(parse_param_list(parser)?.into());

    if parser.at(SyntaxKind::ReturnsKeyword) {
        let returns = parser.consume();
        let type_desc = parse_type_desc(parser)?;
        children.push(
            SyntaxNode::new(NodeKind::ReturnTypeDesc, vec![returns.into(), type_desc.into()]).into(),
        );
    }

    parser.errors.push_context(RuleContext::FuncBodyBlock);
    children.push(parse_block(parser, NodeKind::FunctionBody)?.into());
    parser.errors.pop_context()?;
    parser.errors.pop_context()?;
    Ok(SyntaxNode::new(NodeKind::FunctionDef, children))
}

fn parse_param_list(parser: &mut Parser) -> Result<SyntaxNode, SyntaxFault> {
    let mut children: Vec<SyntaxElement> = vec![parser.expect(RuleContext::OpenParenthesis)?.into()];
    parser.errors.push_context(RuleContext::ParamList);

    if has_parameters(parser)? {
        loop {
            let type_desc = parse_type_desc(parser)?;
            let name = parser.expect(RuleContext::ParamName)?;
            children.push(
                SyntaxNode::new(NodeKind::Parameter, vec![type_desc.into(), name.into()]).into(),
            );
            if !parser.list_separator(
                RuleContext::AfterParameter,
                SyntaxKind::CloseParen,
                &mut children,
            )? {
                break;
            }
        }
    }

    children.push(parser.expect(RuleContext::CloseParenthesis)?.into());
    parser.errors.pop_context()?;
    Ok(SyntaxNode::new(NodeKind::ParamList, children))
}

/// After `(`: either `)` or the first parameter.
fn has_parameters(parser: &mut Parser) -> Result<bool, SyntaxFault> {
    loop {
        let kind = parser.peek_kind();
        if kind == SyntaxKind::CloseParen || kind == SyntaxKind::Eof {
            return Ok(false);
        }
        if starts_type_desc(kind) {
            return Ok(true);
        }
        if parser.recover(RuleContext::ParamStart, false)? == Action::Keep {
            return Ok(false);
        }
    }
}

fn starts_type_desc(kind: SyntaxKind) -> bool {
    kind.is_builtin_type() || kind == SyntaxKind::VarKeyword || kind == SyntaxKind::Identifier
}

/// A built-in type, `var` or a type reference, optionally followed by `?`.
pub(super) fn parse_type_desc(parser: &mut Parser) -> Result<SyntaxNode, SyntaxFault> {
    let mut children: Vec<SyntaxElement> =
        vec![parser.expect_matching(RuleContext::TypeDescriptor, starts_type_desc, false)?.into()];
    if parser.at(SyntaxKind::QuestionMark) {
        children.push(parser.consume().into());
    }
    Ok(SyntaxNode::new(NodeKind::TypeDesc, children))
}

fn parse_module_var(parser: &mut Parser, public: Option<Token>) -> Result<SyntaxNode, SyntaxFault> {
    parser.errors.push_context(RuleContext::ModuleVarDecl);
    let mut children: Vec<SyntaxElement> = public.into_iter().map(Into::into).collect();
    children.push(parse_type_desc(parser)?.into());
    parse_var_decl_rest(parser, &mut children)?;
    parser.errors.pop_context()?;
    Ok(SyntaxNode::new(NodeKind::ModuleVarDecl, children))
}

/// `name [= expression];` after the type of a variable declaration.
pub(super) fn parse_var_decl_rest(
    parser: &mut Parser,
    children: &mut Vec<SyntaxElement>,
) -> Result<(), SyntaxFault> {
    children.push(parser.expect(RuleContext::VariableName)?.into());

    loop {
        let kind = parser.peek_kind();
        if crate::recovery::context_matches(RuleContext::AssignOp, kind) {
            children.push(parser.consume().into());
            children.push(parse_expression(parser)?.into());
            break;
        }
        if kind == SyntaxKind::Semicolon || kind == SyntaxKind::Eof {
            break;
        }
        if parser.recover(RuleContext::VarDeclRhs, false)? == Action::Keep {
            break;
        }
    }

    children.push(parser.expect_terminator()?.into());
    Ok(())
}

/// `[public] const type name = expression;`
fn parse_const(parser: &mut Parser, public: Option<Token>) -> Result<SyntaxNode, SyntaxFault> {
    parser.errors.push_context(RuleContext::ConstDecl);
    let mut children: Vec<SyntaxElement> = public.into_iter().map(Into::into).collect();
    children.push(parser.consume().into());
    children.push(parse_type_desc(parser)?.into());
    children.push(parser.expect(RuleContext::VariableName)?.into());
    children.push(parser.expect(RuleContext::AssignOp)?.into());
    children.push(parse_expression(parser)?.into());
    children.push(parser.expect_terminator()?.into());
    parser.errors.pop_context()?;
    Ok(SyntaxNode::new(NodeKind::ConstDecl, children))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticCode;

    fn module(source: &str) -> SyntaxNode {
        let tree = Parser::new(source).parse_module().unwrap();
        assert_eq!(tree.text(), source);
        tree
    }

    fn codes(tree: &SyntaxNode) -> Vec<DiagnosticCode> {
        tree.diagnostics().iter().map(|d| d.code).collect()
    }

    #[test]
    fn test_top_level_declarations() {
        let tree = module(
            "import foo/bar;\n\
             # Adds one.\n\
             # + x - the input\n\
             public function inc(int x, float? y) returns int {\n    return x + 1;\n}\n\
             const int LIMIT = 10;\n\
             string greeting = `hi`;\n",
        );
        assert!(codes(&tree).is_empty(), "{:?}", codes(&tree));
        let kinds: Vec<NodeKind> = tree.child_nodes().map(SyntaxNode::kind).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::ImportDecl,
                NodeKind::Documentation,
                NodeKind::FunctionDef,
                NodeKind::ConstDecl,
                NodeKind::ModuleVarDecl,
            ]
        );
        let params = tree.find(NodeKind::ParamList).unwrap();
        assert_eq!(params.child_nodes().count(), 2);
    }

    #[test]
    fn test_import_keywords_are_names() {
        let tree = module("import quill/function.int as x;");
        assert!(codes(&tree).is_empty());
        let import = tree.find(NodeKind::ImportDecl).unwrap();
        let identifiers = import
            .child_tokens()
            .filter(|t| t.kind() == SyntaxKind::Identifier)
            .count();
        assert_eq!(identifiers, 4);
    }

    #[test]
    fn test_documentation_warnings_are_attached() {
        let tree = module("# + x the input\nfunction f(int x) {}\n");
        assert!(codes(&tree).contains(&DiagnosticCode::DocMissingHyphen));
    }

    #[test]
    fn test_missing_function_name_and_parens() {
        let tree = module("function { }");
        assert!(tree.find(NodeKind::FunctionDef).is_some());
        let found = codes(&tree);
        assert!(found.contains(&DiagnosticCode::MissingFunctionName), "{found:?}");
        assert!(found.contains(&DiagnosticCode::MissingOpenParenToken), "{found:?}");
    }

    #[test]
    fn test_unclosed_function_body() {
        let tree = module("function f() {\n    int x = 1;\n");
        assert_eq!(codes(&tree), vec![DiagnosticCode::MissingCloseBraceToken]);
    }

    #[test]
    fn test_dangling_public() {
        let tree = module("public");
        assert_eq!(codes(&tree), vec![DiagnosticCode::MissingTopLevelNode]);
    }

    #[test]
    fn test_stray_tokens_at_top_level_are_discarded() {
        let tree = module("@ function f() {}");
        assert_eq!(codes(&tree), vec![DiagnosticCode::InvalidToken]);
        assert!(tree.find(NodeKind::FunctionDef).is_some());
    }
}
