//! Trivia: source material that carries no grammatical meaning.
//!
//! Whitespace, line endings, comments and invalid fragments are attached to the
//! token they precede (leading) or follow on the same line (trailing).

use std::fmt::Write as _;

use crate::diagnostics::Diagnostic;
use crate::token::Token;

#[derive(Debug, Clone, PartialEq)]
pub enum Trivia {
    Whitespace(String),
    /// `\n`, `\r` or `\r\n`.
    EndOfLine(String),
    /// A `//` comment, excluding the line terminator.
    Comment(String),
    /// An invalid fragment or a token discarded by error recovery, together with
    /// its diagnostics.
    Invalid(Box<Token>),
}

impl Trivia {
    /// Wrap a token as invalid trivia.
    pub fn invalid(token: Token) -> Self {
        Trivia::Invalid(Box::new(token))
    }

    /// The exact source text of this trivia.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    pub(crate) fn write_text(&self, out: &mut String) {
        match self {
            Trivia::Whitespace(text) | Trivia::EndOfLine(text) | Trivia::Comment(text) => {
                out.push_str(text)
            }
            Trivia::Invalid(token) => token.write_full_text(out),
        }
    }

    pub fn width(&self) -> usize {
        match self {
            Trivia::Whitespace(text) | Trivia::EndOfLine(text) | Trivia::Comment(text) => {
                text.len()
            }
            Trivia::Invalid(token) => token.full_width(),
        }
    }

    #[inline]
    pub fn is_end_of_line(&self) -> bool {
        matches!(self, Trivia::EndOfLine(_))
    }

    #[inline]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Trivia::Invalid(_))
    }

    pub(crate) fn collect_diagnostics<'a>(&'a self, out: &mut Vec<&'a Diagnostic>) {
        if let Trivia::Invalid(token) = self {
            out.extend(token.all_diagnostics());
        }
    }

    pub fn to_sexpr(&self) -> String {
        let mut out = String::new();
        let _ = match self {
            Trivia::Whitespace(text) => write!(out, "(Whitespace {:?})", text),
            Trivia::EndOfLine(text) => write!(out, "(EndOfLine {:?})", text),
            Trivia::Comment(text) => write!(out, "(Comment {:?})", text),
            Trivia::Invalid(token) => write!(out, "(Invalid {})", token.to_sexpr()),
        };
        out
    }
}
