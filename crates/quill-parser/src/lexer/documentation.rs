//! Documentation string sub-lexer.
//!
//! A `DocumentationString` token is re-lexed with a lexer whose base mode is
//! [`LexerMode::DocLineStartHash`]:
//!
//! ```text
//! # Adds two numbers.
//! # + a - first operand, see `function sum`
//! # # Deprecated
//! ```
//!
//! Problems found here are warnings; documentation never fails a parse.

use super::scan::{is_identifier_start, scan_identifier_body};
use super::{Lexer, LexerMode, Scanned};
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::token::{SyntaxKind, Token};

const REFERENCE_TYPES: &[&str] = &[
    "annotation",
    "const",
    "function",
    "module",
    "parameter",
    "service",
    "type",
    "variable",
    "var",
];

/// Lex the text of a documentation string, `Eof` included.
pub fn lex_documentation(text: &str) -> Vec<Token> {
    Lexer::with_mode(text, LexerMode::DocLineStartHash).collect()
}

/// Warnings raised while lexing a documentation string.
pub fn documentation_warnings(text: &str) -> Vec<Diagnostic> {
    lex_documentation(text)
        .iter()
        .flat_map(|token| token.all_diagnostics().into_iter().cloned())
        .collect()
}

pub(super) fn scan_documentation(lexer: &mut Lexer<'_>) -> Scanned {
    match lexer.mode() {
        LexerMode::DocLineStartHash => scan_line_start(lexer),
        LexerMode::DocLineDifferentiator => scan_differentiator(lexer),
        LexerMode::DocParameter => scan_parameter(lexer),
        LexerMode::DocReferenceType => {
            if lexer.reader.eat("`") {
                lexer.switch_mode(LexerMode::DocSingleBacktickContent);
                Scanned::Token(SyntaxKind::Backtick)
            } else {
                lexer.pop_mode();
                Scanned::Retry
            }
        }
        LexerMode::DocSingleBacktickContent => scan_single_backtick_content(lexer),
        LexerMode::DocDoubleBacktickContent => scan_fenced_content(lexer, "``", SyntaxKind::DoubleBacktick),
        LexerMode::DocTripleBacktickContent => scan_fenced_content(lexer, "```", SyntaxKind::TripleBacktick),
        LexerMode::DocCodeRefEnd => {
            lexer.pop_mode();
            if lexer.reader.eat("`") {
                Scanned::Token(SyntaxKind::Backtick)
            } else {
                Scanned::Retry
            }
        }
        _ => scan_internal(lexer),
    }
}

/// Called after a line ending: the next line starts with `#` again. An open
/// triple-backtick block continues on the next line.
pub(super) fn reset_line(lexer: &mut Lexer<'_>) {
    let in_code_block = lexer.modes.contains(&LexerMode::DocTripleBacktickContent);
    let first_doc = lexer
        .modes
        .iter()
        .position(|mode| mode.is_documentation())
        .unwrap_or(0);
    lexer.modes.truncate(first_doc);
    if in_code_block {
        lexer.modes.extend([
            LexerMode::DocInternal,
            LexerMode::DocTripleBacktickContent,
            LexerMode::DocLineStartHash,
        ]);
    } else {
        lexer.modes.push(LexerMode::DocLineStartHash);
    }
}

fn scan_line_start(lexer: &mut Lexer<'_>) -> Scanned {
    if !lexer.reader.eat("#") {
        lexer.switch_mode(LexerMode::DocInternal);
        return Scanned::Retry;
    }
    let len = lexer.modes.len();
    if len >= 2 && lexer.modes[len - 2] == LexerMode::DocTripleBacktickContent {
        lexer.pop_mode();
    } else {
        lexer.switch_mode(LexerMode::DocLineDifferentiator);
    }
    Scanned::Token(SyntaxKind::Hash)
}

fn scan_differentiator(lexer: &mut Lexer<'_>) -> Scanned {
    if lexer.reader.eat("+") {
        lexer.switch_mode(LexerMode::DocParameter);
        if !next_non_blank(lexer).is_some_and(is_identifier_start) {
            lexer.report(DiagnosticCode::DocMissingParameterName);
        }
        return Scanned::Token(SyntaxKind::Plus);
    }
    if lexer.reader.eat("#") {
        return Scanned::Token(SyntaxKind::Hash);
    }
    let rest = lexer.reader.rest();
    if let Some(after) = rest.strip_prefix("Deprecated") {
        if after.chars().next().map_or(true, char::is_whitespace) {
            lexer.reader.advance_bytes("Deprecated".len());
            lexer.switch_mode(LexerMode::DocInternal);
            return Scanned::Token(SyntaxKind::DeprecationLiteral);
        }
    }
    lexer.switch_mode(LexerMode::DocInternal);
    Scanned::Retry
}

fn scan_parameter(lexer: &mut Lexer<'_>) -> Scanned {
    match lexer.reader.peek() {
        Some(c) if is_identifier_start(c) => {
            scan_identifier_body(lexer);
            if next_non_blank(lexer) != Some('-') {
                lexer.report(DiagnosticCode::DocMissingHyphen);
                lexer.switch_mode(LexerMode::DocInternal);
            }
            Scanned::Token(SyntaxKind::ParameterName)
        }
        Some('-') => {
            lexer.reader.advance();
            lexer.switch_mode(LexerMode::DocInternal);
            Scanned::Token(SyntaxKind::Minus)
        }
        _ => {
            lexer.switch_mode(LexerMode::DocInternal);
            Scanned::Retry
        }
    }
}

fn scan_internal(lexer: &mut Lexer<'_>) -> Scanned {
    if lexer.reader.starts_with("`") {
        let ticks = lexer.reader.rest().chars().take_while(|&c| c == '`').count();
        let (kind, mode, len) = match ticks {
            1 => (SyntaxKind::Backtick, LexerMode::DocSingleBacktickContent, 1),
            2 => (SyntaxKind::DoubleBacktick, LexerMode::DocDoubleBacktickContent, 2),
            _ => (SyntaxKind::TripleBacktick, LexerMode::DocTripleBacktickContent, 3),
        };
        lexer.reader.advance_bytes(len);
        lexer.push_mode(mode);
        return Scanned::Token(kind);
    }

    if let Some(len) = reference_type_len(lexer.reader.rest()) {
        lexer.reader.advance_bytes(len);
        lexer.push_mode(LexerMode::DocReferenceType);
        return Scanned::Token(SyntaxKind::DocReferenceType);
    }

    let reader = &mut lexer.reader;
    let mut at_word_start = false;
    while let Some(c) = reader.peek() {
        if c == '`' || c == '\n' || c == '\r' {
            break;
        }
        if at_word_start && reference_type_len(reader.rest()).is_some() {
            break;
        }
        at_word_start = c.is_whitespace();
        reader.advance();
    }
    Scanned::Token(SyntaxKind::DocumentationDescription)
}

fn scan_single_backtick_content(lexer: &mut Lexer<'_>) -> Scanned {
    if lexer.reader.eat("`") {
        lexer.pop_mode();
        return Scanned::Token(SyntaxKind::Backtick);
    }
    if at_line_end(lexer) {
        lexer.pop_mode();
        lexer.report(DiagnosticCode::DocUnclosedBacktick);
        return Scanned::Retry;
    }
    lexer
        .reader
        .eat_while(|c| !matches!(c, '`' | '\n' | '\r'));
    if lexer.reader.starts_with("`") {
        lexer.switch_mode(LexerMode::DocCodeRefEnd);
    } else {
        lexer.pop_mode();
        lexer.report(DiagnosticCode::DocUnclosedBacktick);
    }
    Scanned::Token(SyntaxKind::CodeContent)
}

/// Double and triple backtick code. A double-backtick span must close on its
/// own line; a triple-backtick block may span lines.
fn scan_fenced_content(lexer: &mut Lexer<'_>, fence: &str, fence_kind: SyntaxKind) -> Scanned {
    if lexer.reader.eat(fence) {
        lexer.pop_mode();
        return Scanned::Token(fence_kind);
    }
    let multi_line = fence_kind == SyntaxKind::TripleBacktick;
    if at_line_end(lexer) && !multi_line {
        lexer.pop_mode();
        lexer.report(DiagnosticCode::DocUnclosedBacktick);
        return Scanned::Retry;
    }

    let reader = &mut lexer.reader;
    while let Some(c) = reader.peek() {
        if c == '\n' || c == '\r' || reader.starts_with(fence) {
            break;
        }
        reader.advance();
    }
    let closed = reader.starts_with(fence);
    if !closed && (!multi_line || reader.is_eof()) {
        lexer.report(DiagnosticCode::DocUnclosedBacktick);
        if !multi_line {
            lexer.pop_mode();
        }
    }
    Scanned::Token(SyntaxKind::CodeContent)
}

fn at_line_end(lexer: &Lexer<'_>) -> bool {
    matches!(lexer.reader.peek(), None | Some('\n' | '\r'))
}

fn next_non_blank(lexer: &Lexer<'_>) -> Option<char> {
    lexer
        .reader
        .rest()
        .chars()
        .find(|&c| c != ' ' && c != '\t')
}

/// Length of a reference-type keyword at the start of `rest` if it is
/// followed by optional blanks and a backtick.
fn reference_type_len(rest: &str) -> Option<usize> {
    REFERENCE_TYPES.iter().find_map(|keyword| {
        let after = rest.strip_prefix(keyword)?;
        let trimmed = after.trim_start_matches([' ', '\t']);
        trimmed.starts_with('`').then_some(keyword.len())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(text: &str) -> Vec<(SyntaxKind, String)> {
        lex_documentation(text)
            .iter()
            .map(|t| (t.kind(), t.text().to_string()))
            .collect()
    }

    fn warnings(text: &str) -> Vec<DiagnosticCode> {
        documentation_warnings(text).iter().map(|d| d.code).collect()
    }

    #[test]
    fn test_description_and_parameter() {
        assert_eq!(
            summary("# Adds.\n# + a - first\n"),
            vec![
                (SyntaxKind::Hash, "#".into()),
                (SyntaxKind::DocumentationDescription, "Adds.".into()),
                (SyntaxKind::Hash, "#".into()),
                (SyntaxKind::Plus, "+".into()),
                (SyntaxKind::ParameterName, "a".into()),
                (SyntaxKind::Minus, "-".into()),
                (SyntaxKind::DocumentationDescription, "first".into()),
                (SyntaxKind::Eof, "".into()),
            ]
        );
        assert!(warnings("# Adds.\n# + a - first\n").is_empty());
    }

    #[test]
    fn test_reference_and_code() {
        assert_eq!(
            summary("# see function `sum` and `x`"),
            vec![
                (SyntaxKind::Hash, "#".into()),
                (SyntaxKind::DocumentationDescription, "see ".into()),
                (SyntaxKind::DocReferenceType, "function".into()),
                (SyntaxKind::Backtick, "`".into()),
                (SyntaxKind::CodeContent, "sum".into()),
                (SyntaxKind::Backtick, "`".into()),
                (SyntaxKind::DocumentationDescription, "and ".into()),
                (SyntaxKind::Backtick, "`".into()),
                (SyntaxKind::CodeContent, "x".into()),
                (SyntaxKind::Backtick, "`".into()),
                (SyntaxKind::Eof, "".into()),
            ]
        );
    }

    #[test]
    fn test_deprecation() {
        let kinds: Vec<SyntaxKind> = summary("# # Deprecated").into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::Hash,
                SyntaxKind::Hash,
                SyntaxKind::DeprecationLiteral,
                SyntaxKind::Eof
            ]
        );
    }

    #[test]
    fn test_warnings() {
        assert_eq!(warnings("# + - x"), vec![DiagnosticCode::DocMissingParameterName]);
        assert_eq!(warnings("# + a first"), vec![DiagnosticCode::DocMissingHyphen]);
        assert_eq!(warnings("# see `open\n# next"), vec![DiagnosticCode::DocUnclosedBacktick]);
        assert!(documentation_warnings("# + a first")
            .iter()
            .all(|d| d.severity() == crate::diagnostics::Severity::Warning));
    }

    #[test]
    fn test_triple_backtick_block_spans_lines() {
        let text = "# ```\n# let x;\n# ```\n# done";
        let tokens = lex_documentation(text);
        let rebuilt: String = tokens.iter().map(|t| t.full_text()).collect();
        assert_eq!(rebuilt, text);
        let kinds: Vec<SyntaxKind> = tokens.iter().map(|t| t.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::Hash,
                SyntaxKind::TripleBacktick,
                SyntaxKind::Hash,
                SyntaxKind::CodeContent,
                SyntaxKind::Hash,
                SyntaxKind::TripleBacktick,
                SyntaxKind::Hash,
                SyntaxKind::DocumentationDescription,
                SyntaxKind::Eof,
            ]
        );
        assert!(warnings(text).is_empty());
    }
}
