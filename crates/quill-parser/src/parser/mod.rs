//! Reference grammar driver.
//!
//! A recursive-descent parser over the core language: imports, functions,
//! module and local variables, blocks, control flow, expressions and
//! templates. Every production the driver is inside is mirrored on the
//! recovery engine's context stack, so when a token does not fit, the engine
//! can work out what may legally follow.
//!
//! The driver never fails on malformed input. Mismatches go through
//! [`ErrorHandler::recover`]; the only errors returned are [`SyntaxFault`]s.

mod expr;
mod module;
mod precedence;
mod stmt;
mod template;

use tracing::debug;

use crate::context::RuleContext;
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::error::SyntaxFault;
use crate::lexer::Lexer;
use crate::reader::TokenReader;
use crate::recovery::{registry, Action, ErrorHandler, RecoveryLimits};
use crate::token::{SyntaxKind, Token};
use crate::tree::{NodeKind, SyntaxElement, SyntaxNode};

pub use precedence::Precedence;

/// Maximum nesting of statements and expressions. Deeper input is skipped
/// and reported as too deeply nested.
pub const MAX_PARSE_DEPTH: usize = 64;

/// Parser state.
pub struct Parser<'a> {
    reader: TokenReader<'a>,
    errors: ErrorHandler,
    /// A token synthesized by recovery; it comes before the reader's next token.
    inserted: Option<Token>,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_limits(source, RecoveryLimits::default())
    }

    pub fn with_limits(source: &'a str, limits: RecoveryLimits) -> Self {
        Self::from_reader(TokenReader::new(Lexer::new(source)), limits)
    }

    /// Parse from an existing reader, e.g. one over a lexer with a debug sink.
    pub fn from_reader(reader: TokenReader<'a>, limits: RecoveryLimits) -> Self {
        Self {
            reader,
            errors: ErrorHandler::with_limits(limits),
            inserted: None,
            depth: 0,
        }
    }

    /// Parse a whole source file.
    pub fn parse_module(mut self) -> Result<SyntaxNode, SyntaxFault> {
        module::parse_module(&mut self)
    }

    /// Parse a single expression followed by end of input.
    pub fn parse_expression(mut self) -> Result<SyntaxNode, SyntaxFault> {
        let expression = expr::parse_expression(&mut self)?;
        let eof = self.expect(RuleContext::Eof)?;
        Ok(SyntaxNode::new(
            NodeKind::ExpressionRoot,
            vec![expression.into(), eof.into()],
        ))
    }

    /// Parse a statement list, as found inside a block, up to end of input.
    pub fn parse_statements(mut self) -> Result<SyntaxNode, SyntaxFault> {
        self.errors.push_context(RuleContext::BlockStmt);
        let mut children = Vec::new();
        stmt::parse_statement_list(&mut self, &mut children, false)?;
        self.errors.pop_context()?;
        children.push(self.consume().into());
        Ok(SyntaxNode::new(NodeKind::StatementList, children))
    }

    // ========================================================================
    // Token access
    // ========================================================================

    fn peek_kind(&mut self) -> SyntaxKind {
        match &self.inserted {
            Some(token) => token.kind(),
            None => self.reader.peek().kind(),
        }
    }

    /// Kind of the token `k` positions ahead, counting a pending insertion.
    fn peek_kind_at(&mut self, k: usize) -> Result<SyntaxKind, SyntaxFault> {
        match (&self.inserted, k) {
            (Some(token), 0) => Ok(token.kind()),
            (Some(_), k) => Ok(self.reader.peek_n(k - 1)?.kind()),
            (None, k) => Ok(self.reader.peek_n(k)?.kind()),
        }
    }

    #[inline]
    fn at(&mut self, kind: SyntaxKind) -> bool {
        self.peek_kind() == kind
    }

    fn consume(&mut self) -> Token {
        match self.inserted.take() {
            Some(token) => token,
            None => self.reader.read(),
        }
    }

    // ========================================================================
    // Expectation and recovery
    // ========================================================================

    /// Consume the token `ctx` stands for, recovering if it is not next.
    fn expect(&mut self, ctx: RuleContext) -> Result<Token, SyntaxFault> {
        self.expect_matching(ctx, |kind| crate::recovery::context_matches(ctx, kind), false)
    }

    /// Consume a token accepted by `accepts`. On a mismatch the engine is
    /// asked about `ctx`; the result is either a real token or a missing one.
    fn expect_matching(
        &mut self,
        ctx: RuleContext,
        accepts: impl Fn(SyntaxKind) -> bool,
        is_completion: bool,
    ) -> Result<Token, SyntaxFault> {
        loop {
            if accepts(self.peek_kind()) {
                return Ok(self.consume());
            }
            match self.recover(ctx, is_completion)? {
                Action::Remove => continue,
                Action::Insert => {
                    return Ok(match self.inserted.take() {
                        Some(token) if accepts(token.kind()) => token,
                        _ => registry::missing_token(ctx),
                    });
                }
                Action::Keep => return Ok(registry::missing_token(ctx)),
            }
        }
    }

    /// `;` ending a declaration or statement. If the next token already
    /// starts something else, only insertion is considered.
    fn expect_terminator(&mut self) -> Result<Token, SyntaxFault> {
        let kind = self.peek_kind();
        let is_completion = kind != SyntaxKind::Semicolon && self.starts_new_construct()?;
        self.expect_matching(
            RuleContext::Semicolon,
            |kind| kind == SyntaxKind::Semicolon,
            is_completion,
        )
    }

    fn starts_new_construct(&mut self) -> Result<bool, SyntaxFault> {
        use SyntaxKind::*;
        match self.peek_kind() {
            CloseBrace | FunctionKeyword | ImportKeyword | ConstKeyword | PublicKeyword
            | DocumentationString => Ok(true),
            _ => stmt::starts_statement(self),
        }
    }

    /// Run the recovery engine and apply its solution to the driver state.
    fn recover(&mut self, ctx: RuleContext, is_completion: bool) -> Result<Action, SyntaxFault> {
        self.inserted = None;
        let mut solution = self.errors.recover(&mut self.reader, ctx, is_completion)?;
        match solution.action {
            Action::Insert => {
                self.inserted = solution
                    .recovered
                    .take()
                    .filter(|token| token.kind() != SyntaxKind::None);
            }
            Action::Remove => {
                if let Some(token) = solution.removed.take() {
                    self.discard_invalid(token);
                }
            }
            Action::Keep => {}
        }
        Ok(solution.action)
    }

    /// Recovery inside a dispatch loop. A kept token has no rule in the
    /// driver, so it is discarded.
    fn recover_in_dispatch(&mut self, ctx: RuleContext) -> Result<(), SyntaxFault> {
        if self.recover(ctx, false)? == Action::Keep {
            let token = self.consume();
            self.discard_invalid(token);
        }
        Ok(())
    }

    /// After one list item: consume a `,` and return true, or return false at
    /// `close`, recovering from anything else.
    fn list_separator(
        &mut self,
        ctx: RuleContext,
        close: SyntaxKind,
        children: &mut Vec<SyntaxElement>,
    ) -> Result<bool, SyntaxFault> {
        loop {
            let kind = self.peek_kind();
            if kind == SyntaxKind::Comma {
                children.push(self.consume().into());
                return Ok(true);
            }
            if kind == close || kind == SyntaxKind::Eof {
                return Ok(false);
            }
            if self.recover(ctx, false)? == Action::Keep {
                return Ok(false);
            }
        }
    }

    fn discard_invalid(&mut self, token: Token) {
        let text = token.text().to_string();
        self.discard(token, Diagnostic::with_arg(DiagnosticCode::InvalidToken, text));
    }

    /// Move `token` into the next token's leading trivia.
    fn discard(&mut self, token: Token, diagnostic: Diagnostic) {
        self.reader
            .attach_leading_invalid(token.with_diagnostic(diagnostic));
    }

    /// Discard one balanced group of tokens nested past [`MAX_PARSE_DEPTH`].
    fn skip_too_deep(&mut self) {
        use SyntaxKind::*;
        debug!(depth = self.depth, "nesting limit reached");
        let mut balance = 0usize;
        let mut code = DiagnosticCode::TooDeeplyNested;
        loop {
            let kind = self.peek_kind();
            if kind == Eof || (balance == 0 && matches!(kind, CloseParen | CloseBrace | CloseBracket)) {
                return;
            }
            let token = self.consume();
            match kind {
                OpenParen | OpenBrace | OpenBracket => balance += 1,
                CloseParen | CloseBrace | CloseBracket => balance -= 1,
                _ => {}
            }
            let text = token.text().to_string();
            self.discard(token, Diagnostic::with_arg(code, text));
            code = DiagnosticCode::InvalidToken;
            if balance == 0 {
                return;
            }
        }
    }
}
