//! Error recovery through the public API.

use quill_parser::{
    Action, DiagnosticCode, ErrorHandler, Lexer, NodeKind, Parser, RecoveryLimits, RuleContext,
    SyntaxKind, SyntaxNode, TokenReader, Trivia,
};

fn codes(tree: &SyntaxNode) -> Vec<DiagnosticCode> {
    tree.diagnostics().iter().map(|d| d.code).collect()
}

fn parse(source: &str) -> SyntaxNode {
    let tree = quill_parser::parse_module(source).unwrap();
    assert_eq!(tree.text(), source);
    tree
}

// ============================================================================
// Error handler
// ============================================================================

#[test]
fn test_handler_inserts_close_paren_at_eof() {
    let mut reader = TokenReader::new(Lexer::new("foo("));
    assert_eq!(reader.read().kind(), SyntaxKind::Identifier);
    assert_eq!(reader.read().kind(), SyntaxKind::OpenParen);

    let mut handler = ErrorHandler::new();
    handler.push_context(RuleContext::ExpressionStatement);
    handler.push_context(RuleContext::ArgList);
    let solution = handler
        .recover(&mut reader, RuleContext::ArgListEnd, false)
        .unwrap();

    assert_eq!(solution.action, Action::Insert);
    let token = solution.recovered.unwrap();
    assert_eq!(token.kind(), SyntaxKind::CloseParen);
    assert!(token.is_missing());
    assert_eq!(token.diagnostics()[0].code, DiagnosticCode::MissingCloseParenToken);
    assert!(reader.at_eof());
}

#[test]
fn test_handler_removes_stray_token() {
    let mut reader = TokenReader::new(Lexer::new("@ x = 1;"));
    let mut handler = ErrorHandler::new();
    handler.push_context(RuleContext::FuncDef);
    handler.push_context(RuleContext::FuncBodyBlock);

    let solution = handler
        .recover(&mut reader, RuleContext::Statement, false)
        .unwrap();

    assert_eq!(solution.action, Action::Remove);
    assert_eq!(solution.removed.unwrap().text(), "@");
    assert_eq!(reader.peek().text(), "x");
    assert_eq!(handler.current_context(), RuleContext::FuncBodyBlock);
}

#[test]
fn test_handler_limits_from_config() {
    let limits: RecoveryLimits =
        serde_json::from_str(r#"{"lookahead_limit": 2, "resolution_iter_limit": 3}"#).unwrap();
    let handler = ErrorHandler::with_limits(limits);
    assert_eq!(handler.limits().lookahead_limit, 2);
    assert_eq!(handler.limits().resolution_iter_limit, 3);
    assert_eq!(
        handler.limits().completion_iter_limit,
        RecoveryLimits::default().completion_iter_limit
    );
}

// ============================================================================
// Parser
// ============================================================================

#[test]
fn test_unclosed_call_expression() {
    let tree = Parser::new("foo(").parse_expression().unwrap();
    assert_eq!(tree.text(), "foo(");
    assert_eq!(codes(&tree), vec![DiagnosticCode::MissingCloseParenToken]);
    let args = tree.find(NodeKind::ArgList).unwrap();
    let close = args.child_tokens().last().unwrap();
    assert_eq!(close.kind(), SyntaxKind::CloseParen);
    assert!(close.is_missing());
}

#[test]
fn test_stray_token_becomes_invalid_trivia() {
    let source = "@ x = 1;";
    let tree = Parser::new(source).parse_statements().unwrap();
    assert_eq!(tree.text(), source);
    assert_eq!(codes(&tree), vec![DiagnosticCode::InvalidToken]);

    let tokens = tree.tokens();
    let x = tokens.iter().find(|t| t.text() == "x").unwrap();
    match &x.leading_trivia()[0] {
        Trivia::Invalid(token) => {
            assert_eq!(token.kind(), SyntaxKind::At);
            assert_eq!(token.diagnostics()[0].code, DiagnosticCode::InvalidToken);
        }
        other => panic!("expected invalid trivia, got {other:?}"),
    }
    assert!(tree.find(NodeKind::AssignmentStatement).is_some());
}

#[test]
fn test_missing_semicolon_in_function() {
    let tree = parse("function f() {\n    int x = 1\n    return x;\n}\n");
    assert_eq!(codes(&tree), vec![DiagnosticCode::MissingSemicolonToken]);
    assert!(tree.find(NodeKind::ReturnStatement).is_some());
}

#[test]
fn test_missing_close_brace_at_end_of_file() {
    let tree = parse("function f() {\n    return 1;\n");
    assert_eq!(codes(&tree), vec![DiagnosticCode::MissingCloseBraceToken]);
    assert!(tree.has_missing());
}

#[test]
fn test_missing_condition_expression() {
    let tree = parse("function f() { if { return; } }");
    assert!(!codes(&tree).is_empty());
    let if_else = tree.find(NodeKind::IfElse).unwrap();
    assert!(if_else.find(NodeKind::ReturnStatement).is_some());
}

#[test]
fn test_parse_continues_after_bad_declaration() {
    let tree = parse("int = ;\nfunction ok() { return; }\n");
    assert!(!codes(&tree).is_empty());
    let function = tree.find(NodeKind::FunctionDef).unwrap();
    assert!(function.text().contains("ok"));
}

#[test]
fn test_every_diagnostic_is_located_in_source() {
    let source = "function f( { x = ; } $ import";
    let tree = parse(source);
    let located = quill_parser::report::locate(tree.tokens());
    assert_eq!(located.len(), tree.diagnostics().len());
    assert!(!located.is_empty());
    for item in &located {
        assert!(item.range.end <= source.len(), "{item:?}");
        assert!(source.is_char_boundary(item.range.start));
    }
}

#[test]
fn test_clean_module_has_no_diagnostics() {
    let source = r#"
import quill.io as io;

# Adds two numbers.
# + a - first operand
# + b - second operand
public function add(int a, int b) returns int {
    return a + b;
}

const int LIMIT = 10;
string greeting = "hi";

function main() {
    int i = 0;
    while i < LIMIT {
        if i % 2 == 0 {
            i += 1;
            continue;
        } else {
            io.println(`${greeting} ${i}`);
        }
        i = add(i, 1);
    }
}
"#;
    let tree = parse(source);
    assert!(codes(&tree).is_empty(), "{:?}", codes(&tree));
    assert_eq!(tree.find_all(NodeKind::FunctionDef).len(), 2);
}
