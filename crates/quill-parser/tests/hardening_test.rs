//! Tests for parser hardening and robustness
//!
//! Malformed, incomplete or pathological source must never hang, panic or
//! fault; it produces a lossless tree with diagnostics.

use quill_parser::parser::MAX_PARSE_DEPTH;
use quill_parser::reader::DEFAULT_CAPACITY;
use quill_parser::recovery::RESOLUTION_ITER_LIMIT;
use quill_parser::{
    Action, DiagnosticCode, ErrorHandler, Lexer, Parser, RuleContext, SyntaxFault, SyntaxKind,
    TokenReader,
};

const MALFORMED: &[&str] = &[
    "))))))",
    "}}}}}",
    "else else else",
    "import import import",
    "public public public",
    "function function function",
    "if if if if",
    "while while {",
    "return return return",
    "a = = = b",
    "f(,,,)",
    "x[[[[",
    "a.b.c.",
    "+ + + + +",
    ";;;;;",
    "0x 0x 0x",
    "\"unterminated",
    "`${`${`${",
    "`${ {{{ `",
    "xml `<a <b <c",
    "xml `<a href=\"${x",
    "natural {",
    "natural {${",
    "re `[",
    "# + \n# `code",
    "@#$%^&",
    "const const = ;",
    "int ? ? ?",
    "function f(int a,, int) returns { }",
    "import a/b.c as ;",
    "public",
    "",
];

fn assert_module_survives(source: &str) {
    let tree = Parser::new(source)
        .parse_module()
        .unwrap_or_else(|fault| panic!("{source:?} faulted: {fault}"));
    assert_eq!(tree.text(), source);
}

// ============================================================================
// Malformed input
// ============================================================================

#[test]
fn test_malformed_modules_parse() {
    for source in MALFORMED {
        assert_module_survives(source);
    }
}

#[test]
fn test_malformed_statements_and_expressions_parse() {
    for source in MALFORMED {
        let tree = Parser::new(source)
            .parse_statements()
            .unwrap_or_else(|fault| panic!("{source:?} faulted: {fault}"));
        assert_eq!(tree.text(), *source);

        let tree = Parser::new(source)
            .parse_expression()
            .unwrap_or_else(|fault| panic!("{source:?} faulted: {fault}"));
        assert_eq!(tree.text(), *source);
    }
}

#[test]
fn test_malformed_input_inside_function_body() {
    for source in MALFORMED {
        assert_module_survives(&format!("function f() {{ {source} }}"));
    }
}

// ============================================================================
// Deep nesting
// ============================================================================

#[test]
fn test_deeply_nested_parentheses() {
    let depth = MAX_PARSE_DEPTH * 3;
    let source = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
    let tree = Parser::new(&source).parse_expression().unwrap();
    assert_eq!(tree.text(), source);
    let codes: Vec<DiagnosticCode> = tree.diagnostics().iter().map(|d| d.code).collect();
    assert!(codes.contains(&DiagnosticCode::TooDeeplyNested));
}

#[test]
fn test_nesting_below_limit_is_clean() {
    let depth = MAX_PARSE_DEPTH / 2;
    let source = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
    let tree = Parser::new(&source).parse_expression().unwrap();
    assert!(tree.diagnostics().is_empty());
}

#[test]
fn test_deeply_nested_blocks_in_function() {
    let depth = MAX_PARSE_DEPTH * 2;
    let source = format!("function f() {{{}{}}}", "{".repeat(depth), "}".repeat(depth));
    let tree = Parser::new(&source).parse_module().unwrap();
    assert_eq!(tree.text(), source);
    assert!(tree
        .diagnostics()
        .iter()
        .any(|d| d.code == DiagnosticCode::TooDeeplyNested));
}

#[test]
fn test_unclosed_nesting_at_end_of_file() {
    let source = format!("function f() {{ {}", "if x { while y { ".repeat(20));
    assert_module_survives(&source);
}

#[test]
fn test_long_flat_module() {
    let source = "int x = a + b * c;\n".repeat(2_000);
    let tree = Parser::new(&source).parse_module().unwrap();
    assert!(tree.diagnostics().is_empty());
}

// ============================================================================
// Bounds
// ============================================================================

#[test]
fn test_lookahead_at_capacity_is_fault() {
    let mut reader = TokenReader::new(Lexer::new("a b c"));
    assert_eq!(reader.peek_n(DEFAULT_CAPACITY - 1).unwrap().kind(), SyntaxKind::Eof);
    assert_eq!(
        reader.peek_n(DEFAULT_CAPACITY).unwrap_err(),
        SyntaxFault::LookaheadExceeded {
            requested: DEFAULT_CAPACITY,
            capacity: DEFAULT_CAPACITY,
        }
    );
    assert_eq!(reader.current_token_index(), 0);
}

#[test]
fn test_repeated_recovery_at_ceiling_diverges() {
    let mut reader = TokenReader::new(Lexer::new("; x"));
    let mut handler = ErrorHandler::new();
    handler.push_context(RuleContext::ExpressionStatement);

    for _ in 0..RESOLUTION_ITER_LIMIT {
        let solution = handler
            .recover(&mut reader, RuleContext::Expression, false)
            .unwrap();
        assert_eq!(solution.action, Action::Insert);
    }
    let fault = handler
        .recover(&mut reader, RuleContext::Expression, false)
        .unwrap_err();
    assert_eq!(
        fault,
        SyntaxFault::RecoveryDiverged {
            context: RuleContext::Expression,
            cursor: 0,
            iterations: RESOLUTION_ITER_LIMIT,
        }
    );
    assert_eq!(reader.peek().kind(), SyntaxKind::Semicolon);
}

#[test]
fn test_repeated_recovery_at_eof_diverges() {
    let mut reader = TokenReader::new(Lexer::new(""));
    let mut handler = ErrorHandler::new();
    handler.push_context(RuleContext::ExpressionStatement);

    let fault = (0..100)
        .find_map(|_| {
            handler
                .recover(&mut reader, RuleContext::Expression, false)
                .err()
        })
        .unwrap();
    assert!(matches!(fault, SyntaxFault::RecoveryDiverged { .. }), "{fault}");
}
