//! Bounded-lookahead token stream over the [`Lexer`].
//!
//! Tokens are pulled from the lexer lazily, only as far as a `peek_n` request
//! needs, and kept in a fixed-capacity ring until they are read.

use std::collections::VecDeque;

use tracing::trace;

use crate::error::SyntaxFault;
use crate::lexer::{Lexer, LexerMode};
use crate::token::{SyntaxKind, Token};
use crate::trivia::Trivia;

/// Default lookahead capacity.
pub const DEFAULT_CAPACITY: usize = 20;

pub struct TokenReader<'a> {
    lexer: Lexer<'a>,
    buffer: VecDeque<Token>,
    capacity: usize,
    consumed: usize,
}

impl<'a> TokenReader<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self::with_capacity(lexer, DEFAULT_CAPACITY)
    }

    /// Create a reader holding at most `capacity` lookahead tokens.
    /// A capacity of zero is raised to one.
    pub fn with_capacity(lexer: Lexer<'a>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lexer,
            buffer: VecDeque::with_capacity(capacity),
            capacity,
            consumed: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Consume and return the next token.
    pub fn read(&mut self) -> Token {
        self.fill(1);
        self.consumed += 1;
        match self.buffer.pop_front() {
            Some(token) => token,
            None => self.lexer.next_token(),
        }
    }

    /// The next token, without consuming it.
    pub fn peek(&mut self) -> &Token {
        self.fill(1);
        &self.buffer[0]
    }

    /// The token `k` positions ahead; `peek_n(0)` is `peek()`.
    ///
    /// Asking for lookahead the buffer cannot hold is a driver defect.
    pub fn peek_n(&mut self, k: usize) -> Result<&Token, SyntaxFault> {
        if k >= self.capacity {
            return Err(SyntaxFault::LookaheadExceeded {
                requested: k,
                capacity: self.capacity,
            });
        }
        self.fill(k + 1);
        Ok(&self.buffer[k])
    }

    /// Number of tokens read so far.
    #[inline]
    pub fn current_token_index(&self) -> usize {
        self.consumed
    }

    pub fn at_eof(&mut self) -> bool {
        self.peek().kind() == SyntaxKind::Eof
    }

    /// Prepend `token`, as invalid trivia, to the next token's leading trivia.
    pub fn attach_leading_invalid(&mut self, token: Token) {
        self.fill(1);
        if let Some(next) = self.buffer.pop_front() {
            self.buffer
                .push_front(next.with_leading_prepended(Trivia::invalid(token)));
        }
    }

    // Mode requests go straight to the lexer. Tokens already buffered were
    // scanned in the old mode.

    pub fn mode(&self) -> LexerMode {
        self.lexer.mode()
    }

    pub fn mode_depth(&self) -> usize {
        self.lexer.mode_depth()
    }

    pub fn start_mode(&mut self, mode: LexerMode) {
        self.note_buffered("start_mode");
        self.lexer.start_mode(mode);
    }

    pub fn end_mode(&mut self) -> Result<LexerMode, SyntaxFault> {
        self.note_buffered("end_mode");
        self.lexer.end_mode()
    }

    pub fn switch_mode(&mut self, mode: LexerMode) {
        self.note_buffered("switch_mode");
        self.lexer.switch_mode(mode);
    }

    fn fill(&mut self, count: usize) {
        while self.buffer.len() < count {
            let token = self.lexer.next_token();
            self.buffer.push_back(token);
        }
    }

    fn note_buffered(&self, request: &'static str) {
        if !self.buffer.is_empty() {
            trace!(request, buffered = self.buffer.len(), "mode change with buffered lookahead");
        }
    }
}
