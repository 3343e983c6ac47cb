//! Lexer for the Quill programming language.
//!
//! The lexer is lossless: every character of the source ends up either in a
//! token's text or in its leading/trailing trivia. Scanning is governed by a
//! stack of [`LexerMode`]s; the top mode decides how the next characters are
//! read. Sub-languages (string templates, regular expressions, prompts, XML,
//! documentation) push a mode when entered and pop it at their terminator.
//!
//! Lexical errors never stop scanning. They are attached as diagnostics to
//! the token being produced, and characters that start no token at all become
//! an invalid-token fragment in the next token's leading trivia.

pub mod documentation;
mod punct;
pub mod reader;
mod scan;
mod template;
mod xml;

use std::mem;

use tracing::{debug, trace};

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::error::SyntaxFault;
use crate::token::{SyntaxKind, Token};
use crate::trivia::Trivia;

pub use reader::CharReader;

/// The scanning mode on top of the lexer's mode stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexerMode {
    Default,
    Import,
    Template,
    PromptTemplate,
    RegExp,
    Interpolation,
    InterpolationBracedContent,

    DocLineStartHash,
    DocLineDifferentiator,
    DocInternal,
    DocParameter,
    DocReferenceType,
    DocSingleBacktickContent,
    DocDoubleBacktickContent,
    DocTripleBacktickContent,
    DocCodeRefEnd,

    XmlContent,
    XmlElementStartTag,
    XmlElementEndTag,
    XmlAttributes,
    XmlSingleQuotedString,
    XmlDoubleQuotedString,
    XmlComment,
    XmlPi,
    XmlCdataSection,
}

/// Which trivia a mode collects around its tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TriviaPolicy {
    /// Whitespace, line endings and `//` comments.
    Full,
    /// Whitespace and line endings only.
    Whitespace,
    /// Content modes: everything is token text.
    None,
}

impl LexerMode {
    fn trivia(self) -> TriviaPolicy {
        use LexerMode::*;
        match self {
            Default | Import | Interpolation | InterpolationBracedContent => TriviaPolicy::Full,
            DocLineStartHash | DocLineDifferentiator | DocInternal | DocParameter
            | DocReferenceType | DocCodeRefEnd | DocTripleBacktickContent | XmlElementStartTag
            | XmlElementEndTag | XmlAttributes => TriviaPolicy::Whitespace,
            Template | PromptTemplate | RegExp | DocSingleBacktickContent
            | DocDoubleBacktickContent | XmlContent
            | XmlSingleQuotedString | XmlDoubleQuotedString | XmlComment | XmlPi
            | XmlCdataSection => TriviaPolicy::None,
        }
    }

    pub fn is_documentation(self) -> bool {
        use LexerMode::*;
        matches!(
            self,
            DocLineStartHash
                | DocLineDifferentiator
                | DocInternal
                | DocParameter
                | DocReferenceType
                | DocSingleBacktickContent
                | DocDoubleBacktickContent
                | DocTripleBacktickContent
                | DocCodeRefEnd
        )
    }

    pub fn is_xml(self) -> bool {
        use LexerMode::*;
        matches!(
            self,
            XmlContent
                | XmlElementStartTag
                | XmlElementEndTag
                | XmlAttributes
                | XmlSingleQuotedString
                | XmlDoubleQuotedString
                | XmlComment
                | XmlPi
                | XmlCdataSection
        )
    }

    /// Modes whose content is delimited by backticks.
    pub fn is_backtick_template(self) -> bool {
        matches!(
            self,
            LexerMode::Template | LexerMode::RegExp | LexerMode::XmlContent
        )
    }
}

/// Receives an s-expression dump of every token the lexer produces.
pub trait DebugSink: Send {
    fn token(&mut self, dump: &str);
}

impl<F> DebugSink for F
where
    F: FnMut(&str) + Send,
{
    fn token(&mut self, dump: &str) {
        self(dump)
    }
}

/// What a mode scanner consumed.
enum Scanned {
    Token(SyntaxKind),
    /// Characters that start no token; they become invalid trivia.
    Invalid,
    /// Nothing consumed, the mode changed; collect trivia and scan again.
    Retry,
}

/// Mode-sensitive, lossless lexer.
pub struct Lexer<'a> {
    reader: CharReader<'a>,
    modes: Vec<LexerMode>,
    leading: Vec<Trivia>,
    diagnostics: Vec<Diagnostic>,
    sink: Option<Box<dyn DebugSink + 'a>>,
    exhausted: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_mode(source, LexerMode::Default)
    }

    /// Create a lexer whose base mode is `mode`.
    ///
    /// Used to re-lex documentation strings with
    /// [`LexerMode::DocLineStartHash`].
    pub fn with_mode(source: &'a str, mode: LexerMode) -> Self {
        Self {
            reader: CharReader::new(source),
            modes: vec![mode],
            leading: Vec::new(),
            diagnostics: Vec::new(),
            sink: None,
            exhausted: false,
        }
    }

    /// Create a lexer that reports every token to `sink`.
    pub fn with_debug_sink(source: &'a str, sink: impl DebugSink + 'a) -> Self {
        let mut lexer = Self::new(source);
        lexer.sink = Some(Box::new(sink));
        lexer
    }

    /// The mode on top of the stack.
    pub fn mode(&self) -> LexerMode {
        self.modes.last().copied().unwrap_or(LexerMode::Default)
    }

    /// Number of modes on the stack, base included.
    pub fn mode_depth(&self) -> usize {
        self.modes.len()
    }

    pub fn start_mode(&mut self, mode: LexerMode) {
        debug!(?mode, depth = self.modes.len(), "start lexer mode");
        self.modes.push(mode);
    }

    /// Pop the top mode. Popping the base mode is a fault.
    pub fn end_mode(&mut self) -> Result<LexerMode, SyntaxFault> {
        if self.modes.len() <= 1 {
            return Err(SyntaxFault::ModeStackUnderflow { mode: self.mode() });
        }
        let mode = self.mode();
        self.modes.pop();
        debug!(?mode, depth = self.modes.len(), "end lexer mode");
        Ok(mode)
    }

    /// Replace the top mode.
    pub fn switch_mode(&mut self, mode: LexerMode) {
        debug!(from = ?self.mode(), to = ?mode, "switch lexer mode");
        if let Some(top) = self.modes.last_mut() {
            *top = mode;
        }
    }

    /// Produce the next token. At end of input this keeps returning `Eof`.
    pub fn next_token(&mut self) -> Token {
        let token = self.scan_token();
        if let Some(sink) = self.sink.as_mut() {
            sink.token(&token.to_sexpr());
        }
        token
    }

    fn scan_token(&mut self) -> Token {
        loop {
            let mut leading = mem::take(&mut self.leading);
            self.scan_trivia(&mut leading, false);
            self.leading = leading;

            self.reader.mark();
            match self.dispatch() {
                Scanned::Token(kind) => return self.finish(kind),
                Scanned::Invalid => self.push_invalid_fragment(),
                Scanned::Retry => {}
            }
        }
    }

    fn dispatch(&mut self) -> Scanned {
        if self.reader.is_eof() {
            return Scanned::Token(SyntaxKind::Eof);
        }
        let mode = self.mode();
        match mode {
            LexerMode::Default
            | LexerMode::Import
            | LexerMode::Interpolation
            | LexerMode::InterpolationBracedContent => scan::scan_default(self),
            LexerMode::Template | LexerMode::PromptTemplate | LexerMode::RegExp => {
                template::scan_template(self)
            }
            _ if mode.is_xml() => xml::scan_xml(self),
            _ => documentation::scan_documentation(self),
        }
    }

    fn finish(&mut self, kind: SyntaxKind) -> Token {
        let text = self.reader.lexeme();
        let diagnostics = mem::take(&mut self.diagnostics);
        let mut trailing = Vec::new();
        if kind != SyntaxKind::Eof {
            self.scan_trivia(&mut trailing, true);
        }
        let leading = mem::take(&mut self.leading);
        Token::new(kind, Some(text), leading, trailing, diagnostics)
    }

    fn push_invalid_fragment(&mut self) {
        let text = self.reader.lexeme();
        trace!(text, "invalid token fragment");
        let mut diagnostics = mem::take(&mut self.diagnostics);
        diagnostics.push(Diagnostic::with_arg(DiagnosticCode::InvalidToken, text));
        let fragment = Token::new(SyntaxKind::InvalidToken, Some(text), vec![], vec![], diagnostics);
        self.leading.push(Trivia::invalid(fragment));
    }

    /// Collect trivia according to the current mode. Trailing trivia stops
    /// after the first line ending.
    fn scan_trivia(&mut self, out: &mut Vec<Trivia>, trailing: bool) {
        loop {
            let policy = self.mode().trivia();
            if policy == TriviaPolicy::None {
                return;
            }
            let Some(c) = self.reader.peek() else {
                return;
            };
            self.reader.mark();
            match c {
                ' ' | '\t' | '\u{000C}' => {
                    self.reader
                        .eat_while(|c| matches!(c, ' ' | '\t' | '\u{000C}'));
                    out.push(Trivia::Whitespace(self.reader.lexeme().to_string()));
                }
                '\n' | '\r' => {
                    if !self.reader.eat("\r\n") {
                        self.reader.advance();
                    }
                    out.push(Trivia::EndOfLine(self.reader.lexeme().to_string()));
                    self.on_end_of_line();
                    if trailing {
                        return;
                    }
                }
                '/' if policy == TriviaPolicy::Full && self.reader.starts_with("//") => {
                    self.reader.eat_while(|c| c != '\n' && c != '\r');
                    out.push(Trivia::Comment(self.reader.lexeme().to_string()));
                }
                _ => return,
            }
        }
    }

    fn on_end_of_line(&mut self) {
        if self.mode().is_documentation() {
            documentation::reset_line(self);
        }
    }

    /// Buffer a diagnostic for the token being built.
    fn report(&mut self, code: DiagnosticCode) {
        self.diagnostics.push(Diagnostic::new(code));
    }

    /// Pop a mode pushed by the lexer itself. The base mode is never popped.
    fn pop_mode(&mut self) {
        if self.modes.len() > 1 {
            let mode = self.modes.pop();
            trace!(?mode, "pop lexer mode");
        }
    }

    fn push_mode(&mut self, mode: LexerMode) {
        trace!(?mode, "push lexer mode");
        self.modes.push(mode);
    }

    /// A backtick ends the innermost backtick-delimited template, closing
    /// every interpolation and XML mode opened inside it.
    fn unwind_to_template_end(&mut self) {
        while self.modes.len() > 1 {
            let mode = self.mode();
            self.pop_mode();
            if mode.is_backtick_template() || mode == LexerMode::PromptTemplate {
                break;
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Yields tokens up to and including the first `Eof`.
    fn next(&mut self) -> Option<Token> {
        if self.exhausted {
            return None;
        }
        let token = self.next_token();
        self.exhausted = token.kind() == SyntaxKind::Eof;
        Some(token)
    }
}
