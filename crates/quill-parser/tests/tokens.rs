//! Token-level tests for the Quill lexer.

use quill_parser::{DiagnosticCode, Lexer, LexerMode, SyntaxKind, Token, Trivia};

fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

fn kinds(source: &str) -> Vec<SyntaxKind> {
    lex(source).iter().map(Token::kind).collect()
}

fn codes(token: &Token) -> Vec<DiagnosticCode> {
    token.diagnostics().iter().map(|d| d.code).collect()
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_single_integer() {
    let tokens = lex("123");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind(), SyntaxKind::DecimalIntegerLiteral);
    assert_eq!(tokens[0].text(), "123");
    assert!(tokens[0].diagnostics().is_empty());
    assert!(tokens[0].leading_trivia().is_empty());
    assert!(tokens[0].trailing_trivia().is_empty());
    assert_eq!(tokens[1].kind(), SyntaxKind::Eof);
}

#[test]
fn test_hex_indicator_without_digits() {
    let tokens = lex("0x");
    assert_eq!(tokens[0].kind(), SyntaxKind::HexIntegerLiteral);
    assert_eq!(tokens[0].text(), "0x");
    assert_eq!(
        codes(&tokens[0]),
        vec![DiagnosticCode::MissingHexDigitAfterHexIndicator]
    );
}

#[test]
fn test_number_forms() {
    assert_eq!(
        kinds("0 42 0xFF 1.5 2e10 0x1p3"),
        vec![
            SyntaxKind::DecimalIntegerLiteral,
            SyntaxKind::DecimalIntegerLiteral,
            SyntaxKind::HexIntegerLiteral,
            SyntaxKind::DecimalFloatingPointLiteral,
            SyntaxKind::DecimalFloatingPointLiteral,
            SyntaxKind::HexFloatingPointLiteral,
            SyntaxKind::Eof,
        ]
    );
}

#[test]
fn test_leading_zeros_are_reported() {
    let tokens = lex("007");
    assert_eq!(tokens[0].kind(), SyntaxKind::DecimalIntegerLiteral);
    assert_eq!(
        codes(&tokens[0]),
        vec![DiagnosticCode::LeadingZerosInNumericLiterals]
    );
}

#[test]
fn test_string_literal() {
    let tokens = lex(r#""hello\n" x"#);
    assert_eq!(tokens[0].kind(), SyntaxKind::StringLiteral);
    assert_eq!(tokens[0].text(), r#""hello\n""#);
    assert!(tokens[0].diagnostics().is_empty());
}

#[test]
fn test_unterminated_string() {
    let tokens = lex("\"abc\nx");
    assert_eq!(tokens[0].kind(), SyntaxKind::StringLiteral);
    assert_eq!(codes(&tokens[0]), vec![DiagnosticCode::MissingDoubleQuote]);
    assert_eq!(tokens[1].kind(), SyntaxKind::Identifier);
}

// ============================================================================
// Keywords, names and punctuation
// ============================================================================

#[test]
fn test_keywords() {
    assert_eq!(
        kinds("function return if else while break continue import as public const"),
        vec![
            SyntaxKind::FunctionKeyword,
            SyntaxKind::ReturnKeyword,
            SyntaxKind::IfKeyword,
            SyntaxKind::ElseKeyword,
            SyntaxKind::WhileKeyword,
            SyntaxKind::BreakKeyword,
            SyntaxKind::ContinueKeyword,
            SyntaxKind::ImportKeyword,
            SyntaxKind::AsKeyword,
            SyntaxKind::PublicKeyword,
            SyntaxKind::ConstKeyword,
            SyntaxKind::Eof,
        ]
    );
}

#[test]
fn test_keyword_prefix_is_identifier() {
    let tokens = lex("functional iffy");
    assert_eq!(tokens[0].kind(), SyntaxKind::Identifier);
    assert_eq!(tokens[1].kind(), SyntaxKind::Identifier);
}

#[test]
fn test_punctuation_longest_match() {
    assert_eq!(
        kinds("a >>>= b ?: c ..< d"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::TripleGtEqual,
            SyntaxKind::Identifier,
            SyntaxKind::Elvis,
            SyntaxKind::Identifier,
            SyntaxKind::DoubleDotLt,
            SyntaxKind::Identifier,
            SyntaxKind::Eof,
        ]
    );
}

#[test]
fn test_import_mode_names() {
    let mut lexer = Lexer::with_mode("if.while as x", LexerMode::Import);
    let kinds: Vec<SyntaxKind> = std::iter::from_fn(|| {
        let token = lexer.next_token();
        (token.kind() != SyntaxKind::Eof).then(|| token.kind())
    })
    .collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::Dot,
            SyntaxKind::Identifier,
            SyntaxKind::AsKeyword,
            SyntaxKind::Identifier,
        ]
    );
}

// ============================================================================
// Trivia
// ============================================================================

#[test]
fn test_trivia_attachment() {
    let tokens = lex("  // note\nx // tail\n  y");
    assert_eq!(tokens[0].text(), "x");
    assert_eq!(tokens[0].leading_trivia().len(), 3);
    assert!(tokens[0].trailing_trivia().last().is_some_and(Trivia::is_end_of_line));
    assert_eq!(tokens[1].text(), "y");
    assert!(matches!(tokens[1].leading_trivia(), [Trivia::Whitespace(_)]));
}

#[test]
fn test_token_stream_is_lossless() {
    let source = "function f(int a) {\n  // body\n  return a + 0x1F; }\n";
    let text: String = lex(source).iter().map(Token::full_text).collect();
    assert_eq!(text, source);
}

#[test]
fn test_unknown_characters_become_invalid_trivia() {
    let tokens = lex("$ x");
    assert_eq!(tokens[0].kind(), SyntaxKind::Identifier);
    assert!(tokens[0].leading_trivia()[0].is_invalid());
    assert_eq!(tokens[0].full_text(), "$ x");
}

#[test]
fn test_debug_sink_receives_dumps() {
    let mut dumps = Vec::new();
    {
        let lexer = Lexer::with_debug_sink("1;", |dump: &str| dumps.push(dump.to_string()));
        assert_eq!(lexer.count(), 3);
    }
    assert_eq!(dumps.len(), 3);
    assert!(dumps[0].starts_with("(DecimalIntegerLiteral"));
}
