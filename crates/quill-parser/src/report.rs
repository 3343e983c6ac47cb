//! Rendering diagnostics against their source.
//!
//! Diagnostics live on tokens and have no positions of their own. [`locate`]
//! recovers byte ranges by walking the tokens in order; [`to_codespan`] turns
//! a located diagnostic into a `codespan-reporting` diagnostic for terminal
//! output.

use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, Severity as CsSeverity};
use codespan_reporting::files::{self, SimpleFiles};
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{NoColor, WriteColor};

use crate::diagnostics::{Diagnostic, Severity};
use crate::token::Token;
use crate::tree::SyntaxNode;
use crate::trivia::Trivia;

/// A diagnostic together with the byte range it applies to.
#[derive(Debug, Clone, PartialEq)]
pub struct Located<'a> {
    pub diagnostic: &'a Diagnostic,
    /// Range of the token text, trivia excluded. Empty for missing tokens.
    pub range: Range<usize>,
}

/// Locate every diagnostic of `tokens`, which must be the complete token
/// sequence of a source in order.
pub fn locate<'a>(tokens: impl IntoIterator<Item = &'a Token>) -> Vec<Located<'a>> {
    let mut offset = 0;
    let mut out = Vec::new();
    for token in tokens {
        locate_token(token, &mut offset, &mut out);
    }
    out
}

fn locate_token<'a>(token: &'a Token, offset: &mut usize, out: &mut Vec<Located<'a>>) {
    for trivia in token.leading_trivia() {
        locate_trivia(trivia, offset, out);
    }
    let start = *offset;
    *offset += token.width();
    out.extend(token.diagnostics().iter().map(|diagnostic| Located {
        diagnostic,
        range: start..*offset,
    }));
    for trivia in token.trailing_trivia() {
        locate_trivia(trivia, offset, out);
    }
}

fn locate_trivia<'a>(trivia: &'a Trivia, offset: &mut usize, out: &mut Vec<Located<'a>>) {
    match trivia {
        Trivia::Invalid(token) => locate_token(token, offset, out),
        other => *offset += other.width(),
    }
}

/// Convert a located diagnostic to a codespan diagnostic in `file_id`.
pub fn to_codespan(file_id: usize, located: &Located<'_>) -> CsDiagnostic<usize> {
    let severity = match located.diagnostic.severity() {
        Severity::Error => CsSeverity::Error,
        Severity::Warning => CsSeverity::Warning,
    };
    CsDiagnostic::new(severity)
        .with_code(located.diagnostic.code.code())
        .with_message(located.diagnostic.message())
        .with_labels(vec![Label::primary(file_id, located.range.clone())
            .with_message(located.diagnostic.code.message_key())])
}

/// Create a file database holding a single source.
pub fn create_files(name: &str, source: &str) -> (SimpleFiles<String, String>, usize) {
    let mut files = SimpleFiles::new();
    let file_id = files.add(name.to_string(), source.to_string());
    (files, file_id)
}

/// Emit diagnostics to `writer`.
pub fn emit(
    writer: &mut dyn WriteColor,
    files: &SimpleFiles<String, String>,
    diagnostics: &[CsDiagnostic<usize>],
) -> Result<(), files::Error> {
    let config = term::Config::default();
    for diagnostic in diagnostics {
        term::emit(writer, &config, files, diagnostic)?;
    }
    Ok(())
}

/// Render every diagnostic of a parsed tree as plain text.
pub fn render(name: &str, source: &str, tree: &SyntaxNode) -> Result<String, files::Error> {
    let (files, file_id) = create_files(name, source);
    let diagnostics: Vec<CsDiagnostic<usize>> = locate(tree.tokens())
        .iter()
        .map(|located| to_codespan(file_id, located))
        .collect();

    let mut writer = NoColor::new(Vec::new());
    emit(&mut writer, &files, &diagnostics)?;
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticCode;
    use crate::parser::Parser;

    #[test]
    fn test_locate_discarded_token() {
        let source = "int x = @ 1;";
        let tree = Parser::new(source).parse_module().unwrap();
        let located = locate(tree.tokens());
        assert_eq!(located.len(), 1);
        assert_eq!(located[0].diagnostic.code, DiagnosticCode::InvalidToken);
        assert_eq!(&source[located[0].range.clone()], "@");
    }

    #[test]
    fn test_locate_missing_token_is_empty() {
        let source = "int x = 1";
        let tree = Parser::new(source).parse_module().unwrap();
        let located = locate(tree.tokens());
        assert_eq!(located.len(), 1);
        assert_eq!(located[0].diagnostic.code, DiagnosticCode::MissingSemicolonToken);
        assert_eq!(located[0].range, 9..9);
    }

    #[test]
    fn test_render_plain_text() {
        let source = "int x = 1";
        let tree = Parser::new(source).parse_module().unwrap();
        let output = render("main.quill", source, &tree).unwrap();
        assert!(output.contains("error[E0200]: missing semicolon token"), "{output}");
        assert!(output.contains("main.quill:1:10"), "{output}");
    }

    #[test]
    fn test_render_warning() {
        let source = "# + a first\nfunction f(int a) {}\n";
        let tree = Parser::new(source).parse_module().unwrap();
        let output = render("doc.quill", source, &tree).unwrap();
        assert!(output.contains("warning[W0002]"), "{output}");
    }
}
