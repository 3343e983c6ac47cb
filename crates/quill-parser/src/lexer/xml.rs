//! XML template scanning.
//!
//! The driver enters [`LexerMode::XmlContent`] after `xml` and a backtick.
//! Everything below that (tags, attributes, comments, processing
//! instructions, CDATA) is pushed and popped by the lexer itself.

use super::{Lexer, LexerMode, Scanned};
use crate::diagnostics::DiagnosticCode;
use crate::token::SyntaxKind;

pub(super) fn scan_xml(lexer: &mut Lexer<'_>) -> Scanned {
    if lexer.reader.peek() == Some('`') {
        lexer.reader.advance();
        if matches!(
            lexer.mode(),
            LexerMode::XmlSingleQuotedString | LexerMode::XmlDoubleQuotedString
        ) {
            lexer.report(DiagnosticCode::MissingXmlAttributeQuote);
        }
        lexer.unwind_to_template_end();
        return Scanned::Token(SyntaxKind::Backtick);
    }

    match lexer.mode() {
        LexerMode::XmlContent => scan_content(lexer),
        LexerMode::XmlElementStartTag | LexerMode::XmlAttributes | LexerMode::XmlElementEndTag => {
            scan_tag(lexer)
        }
        LexerMode::XmlSingleQuotedString => scan_quoted(lexer, '\''),
        LexerMode::XmlDoubleQuotedString => scan_quoted(lexer, '"'),
        LexerMode::XmlComment => scan_until(
            lexer,
            "-->",
            SyntaxKind::XmlCommentContent,
            SyntaxKind::XmlCommentEnd,
            DiagnosticCode::UnterminatedXmlComment,
        ),
        LexerMode::XmlPi => scan_until(
            lexer,
            "?>",
            SyntaxKind::XmlPiData,
            SyntaxKind::XmlPiEnd,
            DiagnosticCode::UnterminatedXmlPi,
        ),
        _ => scan_until(
            lexer,
            "]]>",
            SyntaxKind::XmlCdataContent,
            SyntaxKind::XmlCdataEnd,
            DiagnosticCode::UnterminatedXmlCdata,
        ),
    }
}

fn scan_content(lexer: &mut Lexer<'_>) -> Scanned {
    let openers = [
        ("${", SyntaxKind::InterpolationStart, LexerMode::Interpolation),
        ("<!--", SyntaxKind::XmlCommentStart, LexerMode::XmlComment),
        ("<![CDATA[", SyntaxKind::XmlCdataStart, LexerMode::XmlCdataSection),
        ("<?", SyntaxKind::XmlPiStart, LexerMode::XmlPi),
        ("</", SyntaxKind::XmlEndTagStart, LexerMode::XmlElementEndTag),
        ("<", SyntaxKind::Lt, LexerMode::XmlElementStartTag),
    ];
    for (text, kind, mode) in openers {
        if lexer.reader.eat(text) {
            lexer.push_mode(mode);
            return Scanned::Token(kind);
        }
    }

    let reader = &mut lexer.reader;
    while let Some(c) = reader.peek() {
        if c == '<' || c == '`' || reader.starts_with("${") {
            break;
        }
        reader.advance();
    }
    Scanned::Token(SyntaxKind::XmlTextContent)
}

fn scan_tag(lexer: &mut Lexer<'_>) -> Scanned {
    let mode = lexer.mode();
    let reader = &mut lexer.reader;

    if reader.eat("${") {
        lexer.push_mode(LexerMode::Interpolation);
        return Scanned::Token(SyntaxKind::InterpolationStart);
    }
    if mode != LexerMode::XmlElementEndTag && reader.eat("/>") {
        lexer.pop_mode();
        return Scanned::Token(SyntaxKind::XmlSlashGt);
    }

    match reader.peek() {
        Some('>') => {
            reader.advance();
            lexer.pop_mode();
            Scanned::Token(SyntaxKind::Gt)
        }
        Some('=') if mode == LexerMode::XmlAttributes => {
            reader.advance();
            Scanned::Token(SyntaxKind::Equal)
        }
        Some('"') if mode == LexerMode::XmlAttributes => {
            reader.advance();
            lexer.push_mode(LexerMode::XmlDoubleQuotedString);
            Scanned::Token(SyntaxKind::DoubleQuote)
        }
        Some('\'') if mode == LexerMode::XmlAttributes => {
            reader.advance();
            lexer.push_mode(LexerMode::XmlSingleQuotedString);
            Scanned::Token(SyntaxKind::SingleQuote)
        }
        Some(c) if is_xml_name_start(c) => {
            reader.eat_while(is_xml_name_part);
            if mode == LexerMode::XmlElementStartTag {
                lexer.switch_mode(LexerMode::XmlAttributes);
            }
            Scanned::Token(SyntaxKind::XmlName)
        }
        _ => {
            reader.advance();
            reader.eat_while(|c| {
                !(c.is_whitespace() || is_xml_name_start(c) || matches!(c, '>' | '/' | '=' | '"' | '\'' | '`' | '$'))
            });
            Scanned::Invalid
        }
    }
}

fn scan_quoted(lexer: &mut Lexer<'_>, quote: char) -> Scanned {
    if lexer.reader.eat("${") {
        lexer.push_mode(LexerMode::Interpolation);
        return Scanned::Token(SyntaxKind::InterpolationStart);
    }
    if lexer.reader.peek() == Some(quote) {
        lexer.reader.advance();
        lexer.pop_mode();
        return Scanned::Token(if quote == '"' {
            SyntaxKind::DoubleQuote
        } else {
            SyntaxKind::SingleQuote
        });
    }

    let reader = &mut lexer.reader;
    while let Some(c) = reader.peek() {
        if c == quote || c == '`' || reader.starts_with("${") {
            break;
        }
        reader.advance();
    }
    if reader.is_eof() {
        lexer.report(DiagnosticCode::MissingXmlAttributeQuote);
    }
    Scanned::Token(SyntaxKind::XmlTextContent)
}

/// Content up to `end`, or the end marker itself. A backtick or end of input
/// before `end` leaves the section unterminated.
fn scan_until(
    lexer: &mut Lexer<'_>,
    end: &str,
    content: SyntaxKind,
    end_kind: SyntaxKind,
    unterminated: DiagnosticCode,
) -> Scanned {
    if lexer.reader.eat(end) {
        lexer.pop_mode();
        return Scanned::Token(end_kind);
    }
    let reader = &mut lexer.reader;
    while let Some(c) = reader.peek() {
        if c == '`' || reader.starts_with(end) {
            break;
        }
        reader.advance();
    }
    if !reader.starts_with(end) {
        lexer.report(unterminated);
    }
    Scanned::Token(content)
}

fn is_xml_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == ':'
}

fn is_xml_name_part(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.')
}
