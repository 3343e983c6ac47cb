//! String template, prompt template and regular-expression template content.
//!
//! No trivia is collected here: whitespace is part of the content.

use super::{Lexer, LexerMode, Scanned};
use crate::token::SyntaxKind;

pub(super) fn scan_template(lexer: &mut Lexer<'_>) -> Scanned {
    let mode = lexer.mode();

    if lexer.reader.eat("${") {
        lexer.push_mode(LexerMode::Interpolation);
        return Scanned::Token(SyntaxKind::InterpolationStart);
    }
    match (mode, lexer.reader.peek()) {
        (LexerMode::Template | LexerMode::RegExp, Some('`')) => {
            lexer.reader.advance();
            lexer.pop_mode();
            return Scanned::Token(SyntaxKind::Backtick);
        }
        (LexerMode::PromptTemplate, Some('}')) => {
            lexer.reader.advance();
            lexer.pop_mode();
            return Scanned::Token(SyntaxKind::CloseBrace);
        }
        _ => {}
    }

    match mode {
        LexerMode::RegExp => {
            scan_regexp_content(lexer);
            Scanned::Token(SyntaxKind::RegExpContent)
        }
        LexerMode::PromptTemplate => {
            scan_content(lexer, '}');
            Scanned::Token(SyntaxKind::TemplateString)
        }
        _ => {
            scan_content(lexer, '`');
            Scanned::Token(SyntaxKind::TemplateString)
        }
    }
}

/// Consume content up to `terminator` or `${`.
fn scan_content(lexer: &mut Lexer<'_>, terminator: char) {
    let reader = &mut lexer.reader;
    while let Some(c) = reader.peek() {
        if c == terminator || reader.starts_with("${") {
            break;
        }
        reader.advance();
    }
}

/// Regular-expression content. Inside a character class `${` is literal, and
/// `\` escapes the following character everywhere.
fn scan_regexp_content(lexer: &mut Lexer<'_>) {
    let reader = &mut lexer.reader;
    let mut class_depth = 0usize;
    while let Some(c) = reader.peek() {
        match c {
            '`' => break,
            '$' if class_depth == 0 && reader.starts_with("${") => break,
            '\\' => {
                reader.advance();
                if reader.peek().is_some_and(|c| c != '`') {
                    reader.advance();
                }
            }
            '[' => {
                class_depth += 1;
                reader.advance();
            }
            ']' => {
                class_depth = class_depth.saturating_sub(1);
                reader.advance();
            }
            _ => {
                reader.advance();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;

    fn collect(lexer: &mut Lexer<'_>) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let eof = token.kind() == SyntaxKind::Eof;
            tokens.push(token);
            if eof {
                return tokens;
            }
        }
    }

    fn summary(tokens: &[Token]) -> Vec<(SyntaxKind, String)> {
        tokens.iter().map(|t| (t.kind(), t.text().to_string())).collect()
    }

    #[test]
    fn test_template_with_interpolation() {
        let mut lexer = Lexer::new("`a ${x} b`;");
        let tokens = collect(&mut lexer);
        assert_eq!(
            summary(&tokens),
            vec![
                (SyntaxKind::Backtick, "`".into()),
                (SyntaxKind::TemplateString, "a ".into()),
                (SyntaxKind::InterpolationStart, "${".into()),
                (SyntaxKind::Identifier, "x".into()),
                (SyntaxKind::CloseBrace, "}".into()),
                (SyntaxKind::TemplateString, " b".into()),
                (SyntaxKind::Backtick, "`".into()),
                (SyntaxKind::Semicolon, ";".into()),
                (SyntaxKind::Eof, "".into()),
            ]
        );
        assert_eq!(lexer.mode(), LexerMode::Default);
    }

    #[test]
    fn test_braces_inside_interpolation() {
        let mut lexer = Lexer::new("`${ {a} }`");
        let kinds: Vec<SyntaxKind> = collect(&mut lexer).iter().map(|t| t.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::Backtick,
                SyntaxKind::InterpolationStart,
                SyntaxKind::OpenBrace,
                SyntaxKind::Identifier,
                SyntaxKind::CloseBrace,
                SyntaxKind::CloseBrace,
                SyntaxKind::Backtick,
                SyntaxKind::Eof,
            ]
        );
        assert_eq!(lexer.mode_depth(), 1);
    }

    #[test]
    fn test_backtick_unwinds_open_interpolation() {
        let mut lexer = Lexer::new("`${ {a `x");
        let kinds: Vec<SyntaxKind> = collect(&mut lexer).iter().map(|t| t.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::Backtick,
                SyntaxKind::InterpolationStart,
                SyntaxKind::OpenBrace,
                SyntaxKind::Identifier,
                SyntaxKind::Backtick,
                SyntaxKind::Identifier,
                SyntaxKind::Eof,
            ]
        );
        assert_eq!(lexer.mode(), LexerMode::Default);
        assert_eq!(lexer.mode_depth(), 1);
    }

    #[test]
    fn test_unterminated_template_keeps_mode() {
        let mut lexer = Lexer::new("`abc");
        let tokens = collect(&mut lexer);
        assert_eq!(tokens.last().map(Token::kind), Some(SyntaxKind::Eof));
        assert_eq!(lexer.mode(), LexerMode::Template);
    }

    #[test]
    fn test_regexp_class_suppresses_interpolation() {
        let mut lexer = Lexer::new("[${x}]\\.${y}`");
        lexer.start_mode(LexerMode::RegExp);
        let tokens = collect(&mut lexer);
        assert_eq!(
            summary(&tokens),
            vec![
                (SyntaxKind::RegExpContent, "[${x}]\\.".into()),
                (SyntaxKind::InterpolationStart, "${".into()),
                (SyntaxKind::Identifier, "y".into()),
                (SyntaxKind::CloseBrace, "}".into()),
                (SyntaxKind::Backtick, "`".into()),
                (SyntaxKind::Eof, "".into()),
            ]
        );
        assert_eq!(lexer.mode_depth(), 1);
    }

    #[test]
    fn test_prompt_template_ends_at_brace() {
        let mut lexer = Lexer::new(" say ${name} now} x");
        lexer.start_mode(LexerMode::PromptTemplate);
        let tokens = collect(&mut lexer);
        assert_eq!(
            summary(&tokens),
            vec![
                (SyntaxKind::TemplateString, " say ".into()),
                (SyntaxKind::InterpolationStart, "${".into()),
                (SyntaxKind::Identifier, "name".into()),
                (SyntaxKind::CloseBrace, "}".into()),
                (SyntaxKind::TemplateString, " now".into()),
                (SyntaxKind::CloseBrace, "}".into()),
                (SyntaxKind::Identifier, "x".into()),
                (SyntaxKind::Eof, "".into()),
            ]
        );
    }
}
