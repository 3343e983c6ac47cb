//! Default, import and interpolation mode scanning.

use unicode_xid::UnicodeXID;

use super::{punct, Lexer, LexerMode, Scanned};
use crate::diagnostics::DiagnosticCode;
use crate::token::SyntaxKind;

pub(super) fn scan_default(lexer: &mut Lexer<'_>) -> Scanned {
    let mode = lexer.mode();
    let Some(c) = lexer.reader.peek() else {
        return Scanned::Token(SyntaxKind::Eof);
    };

    match c {
        '`' => {
            lexer.reader.advance();
            if matches!(
                mode,
                LexerMode::Interpolation | LexerMode::InterpolationBracedContent
            ) {
                lexer.unwind_to_template_end();
            } else {
                lexer.push_mode(LexerMode::Template);
            }
            Scanned::Token(SyntaxKind::Backtick)
        }
        '#' if mode == LexerMode::Default => {
            let len = documentation_string_len(lexer.reader.rest());
            lexer.reader.advance_bytes(len);
            Scanned::Token(SyntaxKind::DocumentationString)
        }
        '"' => Scanned::Token(scan_string(lexer)),
        '0'..='9' => Scanned::Token(scan_number(lexer)),
        '.' if lexer.reader.peek_n(1).is_some_and(|c| c.is_ascii_digit()) => {
            Scanned::Token(scan_number(lexer))
        }
        '\'' if lexer.reader.peek_n(1).is_some_and(is_identifier_start) => {
            lexer.reader.advance();
            scan_identifier_body(lexer);
            Scanned::Token(SyntaxKind::Identifier)
        }
        c if is_identifier_start(c) => {
            scan_identifier_body(lexer);
            Scanned::Token(identifier_or_keyword(lexer.reader.lexeme(), mode))
        }
        _ => match punct::scan(lexer.reader.rest()) {
            Some((kind, len)) => {
                lexer.reader.advance_bytes(len);
                track_interpolation_braces(lexer, kind);
                Scanned::Token(kind)
            }
            None => {
                skip_invalid(lexer);
                Scanned::Invalid
            }
        },
    }
}

/// Braces inside an interpolation nest; the unmatched `}` ends it.
fn track_interpolation_braces(lexer: &mut Lexer<'_>, kind: SyntaxKind) {
    match (lexer.mode(), kind) {
        (LexerMode::Interpolation | LexerMode::InterpolationBracedContent, SyntaxKind::OpenBrace) => {
            lexer.push_mode(LexerMode::InterpolationBracedContent)
        }
        (LexerMode::Interpolation | LexerMode::InterpolationBracedContent, SyntaxKind::CloseBrace) => {
            lexer.pop_mode()
        }
        _ => {}
    }
}

fn identifier_or_keyword(text: &str, mode: LexerMode) -> SyntaxKind {
    match SyntaxKind::keyword(text) {
        Some(SyntaxKind::AsKeyword) => SyntaxKind::AsKeyword,
        Some(_) if mode == LexerMode::Import => SyntaxKind::Identifier,
        Some(keyword) => keyword,
        None => SyntaxKind::Identifier,
    }
}

/// Consume an invalid run up to the next character that can start something.
fn skip_invalid(lexer: &mut Lexer<'_>) {
    lexer.reader.advance();
    lexer.reader.eat_while(|c| !is_sync_point(c));
}

fn is_sync_point(c: char) -> bool {
    c.is_whitespace()
        || punct::starts_punct(c)
        || is_identifier_start(c)
        || c.is_ascii_digit()
        || matches!(c, '"' | '`' | '#' | '\'')
}

pub(super) fn is_identifier_start(c: char) -> bool {
    c == '_' || c == '\\' || UnicodeXID::is_xid_start(c)
}

pub(super) fn is_identifier_part(c: char) -> bool {
    c == '_' || UnicodeXID::is_xid_continue(c)
}

/// Scan identifier characters, including `\` escapes.
pub(super) fn scan_identifier_body(lexer: &mut Lexer<'_>) {
    loop {
        match lexer.reader.peek() {
            Some(c) if is_identifier_part(c) => {
                lexer.reader.advance();
            }
            Some('\\') => scan_identifier_escape(lexer),
            _ => return,
        }
    }
}

fn scan_identifier_escape(lexer: &mut Lexer<'_>) {
    lexer.reader.advance();
    match lexer.reader.peek() {
        Some('u') if lexer.reader.peek_n(1) == Some('{') => {
            lexer.reader.advance_bytes(2);
            if !scan_unicode_escape_tail(lexer) {
                lexer.report(DiagnosticCode::InvalidEscapedCharacterInIdentifier);
            }
        }
        Some(c) if c.is_ascii_punctuation() => {
            lexer.reader.advance();
        }
        _ => lexer.report(DiagnosticCode::InvalidEscapedCharacterInIdentifier),
    }
}

/// After `\u{`: hex digits and `}`. Returns false if the escape is malformed.
fn scan_unicode_escape_tail(lexer: &mut Lexer<'_>) -> bool {
    let start = lexer.reader.position();
    lexer.reader.eat_while(|c| c.is_ascii_hexdigit());
    let digits = &lexer.reader.source()[start..lexer.reader.position()];
    let valid = !digits.is_empty()
        && digits.len() <= 6
        && u32::from_str_radix(digits, 16)
            .ok()
            .and_then(char::from_u32)
            .is_some();
    let closed = lexer.reader.eat("}");
    valid && closed
}

fn scan_string(lexer: &mut Lexer<'_>) -> SyntaxKind {
    lexer.reader.advance();
    loop {
        match lexer.reader.peek() {
            None | Some('\n') | Some('\r') => {
                lexer.report(DiagnosticCode::MissingDoubleQuote);
                break;
            }
            Some('"') => {
                lexer.reader.advance();
                break;
            }
            Some('\\') => scan_string_escape(lexer),
            Some(_) => {
                lexer.reader.advance();
            }
        }
    }
    SyntaxKind::StringLiteral
}

fn scan_string_escape(lexer: &mut Lexer<'_>) {
    lexer.reader.advance();
    match lexer.reader.peek() {
        Some('n' | 't' | 'r' | '\\' | '"') => {
            lexer.reader.advance();
        }
        Some('u') if lexer.reader.peek_n(1) == Some('{') => {
            lexer.reader.advance_bytes(2);
            if !scan_unicode_escape_tail(lexer) {
                lexer.report(DiagnosticCode::InvalidStringNumericEscapeSequence);
            }
        }
        Some('\n' | '\r') | None => lexer.report(DiagnosticCode::InvalidEscapeSequence),
        Some(_) => {
            lexer.reader.advance();
            lexer.report(DiagnosticCode::InvalidEscapeSequence);
        }
    }
}

fn scan_number(lexer: &mut Lexer<'_>) -> SyntaxKind {
    let reader = &mut lexer.reader;
    if reader.peek() == Some('0') && matches!(reader.peek_n(1), Some('x' | 'X')) {
        reader.advance_bytes(2);
        return scan_hex_number(lexer);
    }

    let mut kind = SyntaxKind::DecimalIntegerLiteral;
    if reader.peek() == Some('.') {
        reader.advance();
        reader.eat_while(|c| c.is_ascii_digit());
        kind = SyntaxKind::DecimalFloatingPointLiteral;
    } else {
        let leading_zero =
            reader.peek() == Some('0') && reader.peek_n(1).is_some_and(|c| c.is_ascii_digit());
        reader.eat_while(|c| c.is_ascii_digit());
        if leading_zero {
            lexer.report(DiagnosticCode::LeadingZerosInNumericLiterals);
        }
        let reader = &mut lexer.reader;
        if reader.peek() == Some('.') && reader.peek_n(1).is_some_and(|c| c.is_ascii_digit()) {
            reader.advance();
            reader.eat_while(|c| c.is_ascii_digit());
            kind = SyntaxKind::DecimalFloatingPointLiteral;
        }
    }

    if matches!(lexer.reader.peek(), Some('e' | 'E')) {
        lexer.reader.advance();
        scan_exponent_digits(lexer, |c| c.is_ascii_digit());
        kind = SyntaxKind::DecimalFloatingPointLiteral;
    }

    let reader = &mut lexer.reader;
    if matches!(reader.peek(), Some('f' | 'F' | 'd' | 'D'))
        && !reader.peek_n(1).is_some_and(is_identifier_part)
    {
        reader.advance();
        kind = SyntaxKind::DecimalFloatingPointLiteral;
    }
    kind
}

fn scan_hex_number(lexer: &mut Lexer<'_>) -> SyntaxKind {
    let start = lexer.reader.position();
    lexer.reader.eat_while(|c| c.is_ascii_hexdigit());
    let has_digits = lexer.reader.position() > start;
    let mut kind = SyntaxKind::HexIntegerLiteral;

    if lexer.reader.peek() == Some('.') && lexer.reader.peek_n(1).is_some_and(|c| c.is_ascii_hexdigit()) {
        lexer.reader.advance();
        lexer.reader.eat_while(|c| c.is_ascii_hexdigit());
        kind = SyntaxKind::HexFloatingPointLiteral;
    } else if !has_digits {
        lexer.report(DiagnosticCode::MissingHexDigitAfterHexIndicator);
        return kind;
    }

    if matches!(lexer.reader.peek(), Some('p' | 'P')) {
        lexer.reader.advance();
        scan_exponent_digits(lexer, |c| c.is_ascii_digit());
        kind = SyntaxKind::HexFloatingPointLiteral;
    }
    kind
}

fn scan_exponent_digits(lexer: &mut Lexer<'_>, is_digit: impl Fn(char) -> bool + Copy) {
    if matches!(lexer.reader.peek(), Some('+' | '-')) {
        lexer.reader.advance();
    }
    let start = lexer.reader.position();
    lexer.reader.eat_while(is_digit);
    if lexer.reader.position() == start {
        lexer.report(DiagnosticCode::MissingDigitAfterExponentIndicator);
    }
}

/// Byte length of a documentation string starting at `#`: the current line
/// plus every following line whose first non-blank character is `#`.
fn documentation_string_len(rest: &str) -> usize {
    let mut len = line_len(rest);
    loop {
        let after = &rest[len..];
        let eol = if after.starts_with("\r\n") {
            2
        } else if after.starts_with(['\n', '\r']) {
            1
        } else {
            break;
        };
        let next_line = &after[eol..];
        let indent = next_line.len() - next_line.trim_start_matches([' ', '\t']).len();
        if !next_line[indent..].starts_with('#') {
            break;
        }
        len += eol + indent + line_len(&next_line[indent..]);
    }
    len
}

fn line_len(text: &str) -> usize {
    text.find(['\n', '\r']).unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::super::tests::lex_all;
    use super::*;
    use crate::token::Token;

    fn single(source: &str) -> Token {
        let tokens = lex_all(source);
        assert_eq!(tokens.len(), 2, "expected one token in {:?}: {:?}", source, tokens);
        tokens.into_iter().next().unwrap()
    }

    fn codes(token: &Token) -> Vec<DiagnosticCode> {
        token.diagnostics().iter().map(|d| d.code).collect()
    }

    #[test]
    fn test_decimal_integer() {
        let token = single("123");
        assert_eq!(token.kind(), SyntaxKind::DecimalIntegerLiteral);
        assert_eq!(token.text(), "123");
        assert!(token.diagnostics().is_empty());
    }

    #[test]
    fn test_leading_zero() {
        let token = single("007");
        assert_eq!(token.kind(), SyntaxKind::DecimalIntegerLiteral);
        assert_eq!(codes(&token), vec![DiagnosticCode::LeadingZerosInNumericLiterals]);
        assert!(single("0").diagnostics().is_empty());
    }

    #[test]
    fn test_floats() {
        for source in ["1.5", ".5", "1e10", "1.5E-3", "2f", "3d", "0.0"] {
            let token = single(source);
            assert_eq!(token.kind(), SyntaxKind::DecimalFloatingPointLiteral, "{}", source);
            assert!(token.diagnostics().is_empty(), "{}", source);
        }
    }

    #[test]
    fn test_missing_exponent_digits() {
        let token = single("1e+");
        assert_eq!(token.kind(), SyntaxKind::DecimalFloatingPointLiteral);
        assert_eq!(codes(&token), vec![DiagnosticCode::MissingDigitAfterExponentIndicator]);
    }

    #[test]
    fn test_hex() {
        assert_eq!(single("0xFF").kind(), SyntaxKind::HexIntegerLiteral);
        assert_eq!(single("0x1.8p3").kind(), SyntaxKind::HexFloatingPointLiteral);
        let token = single("0x");
        assert_eq!(token.kind(), SyntaxKind::HexIntegerLiteral);
        assert_eq!(codes(&token), vec![DiagnosticCode::MissingHexDigitAfterHexIndicator]);
    }

    #[test]
    fn test_integer_then_range() {
        let kinds: Vec<SyntaxKind> = lex_all("1..<5").iter().map(|t| t.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::DecimalIntegerLiteral,
                SyntaxKind::DoubleDotLt,
                SyntaxKind::DecimalIntegerLiteral,
                SyntaxKind::Eof
            ]
        );
    }

    #[test]
    fn test_strings() {
        let token = single(r#""a\n\t\"\u{1F600}""#);
        assert_eq!(token.kind(), SyntaxKind::StringLiteral);
        assert!(token.diagnostics().is_empty());

        let token = single(r#""bad \q""#);
        assert_eq!(codes(&token), vec![DiagnosticCode::InvalidEscapeSequence]);

        let token = single(r#""\u{zz}""#);
        assert_eq!(codes(&token), vec![DiagnosticCode::InvalidStringNumericEscapeSequence]);
    }

    #[test]
    fn test_unterminated_string_stops_at_newline() {
        let tokens = lex_all("\"abc\nx");
        assert_eq!(tokens[0].kind(), SyntaxKind::StringLiteral);
        assert_eq!(tokens[0].text(), "\"abc");
        assert_eq!(codes(&tokens[0]), vec![DiagnosticCode::MissingDoubleQuote]);
        assert_eq!(tokens[1].text(), "x");
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(single("function").kind(), SyntaxKind::FunctionKeyword);
        assert_eq!(single("functions").kind(), SyntaxKind::Identifier);
        assert_eq!(single("'function").kind(), SyntaxKind::Identifier);
        assert_eq!(single("_x1").kind(), SyntaxKind::Identifier);
        assert_eq!(single("naïve").kind(), SyntaxKind::Identifier);
    }

    #[test]
    fn test_escaped_identifier() {
        let token = single(r"a\-b");
        assert_eq!(token.kind(), SyntaxKind::Identifier);
        assert!(token.diagnostics().is_empty());

        let token = single(r"a\u{61}");
        assert!(token.diagnostics().is_empty());

        let tokens = lex_all("a\\ b");
        assert_eq!(codes(&tokens[0]), vec![DiagnosticCode::InvalidEscapedCharacterInIdentifier]);
    }

    #[test]
    fn test_import_mode_only_knows_as() {
        let mut lexer = Lexer::new("int as");
        lexer.start_mode(LexerMode::Import);
        assert_eq!(lexer.next_token().kind(), SyntaxKind::Identifier);
        assert_eq!(lexer.next_token().kind(), SyntaxKind::AsKeyword);
    }

    #[test]
    fn test_documentation_string_spans_lines() {
        let tokens = lex_all("# one\n  # two\nfunction");
        assert_eq!(tokens[0].kind(), SyntaxKind::DocumentationString);
        assert_eq!(tokens[0].text(), "# one\n  # two");
        assert_eq!(tokens[1].kind(), SyntaxKind::FunctionKeyword);
    }
}
