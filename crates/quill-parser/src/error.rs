//! Internal faults.
//!
//! Malformed source never produces a [`SyntaxFault`]; it produces diagnostics
//! attached to tokens. A fault means the grammar driver or the recovery search
//! broke one of its own invariants, and parsing cannot continue.

use thiserror::Error;

use crate::context::RuleContext;
use crate::lexer::LexerMode;

/// A non-continuable internal failure of the front end.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxFault {
    /// `end_mode` was called with only the base mode on the stack.
    #[error("lexer mode stack underflow: cannot pop base mode {mode:?}")]
    ModeStackUnderflow { mode: LexerMode },

    /// `peek_n` asked for a token beyond the lookahead buffer.
    #[error("lookahead {requested} exceeds token buffer capacity {capacity}")]
    LookaheadExceeded { requested: usize, capacity: usize },

    /// `pop_context` was called on an empty rule-context stack.
    #[error("rule context stack underflow")]
    ContextStackUnderflow,

    /// Recovery kept being requested at the same position without progress.
    #[error(
        "error recovery did not converge in {context:?} at token {cursor} after {iterations} attempts"
    )]
    RecoveryDiverged {
        context: RuleContext,
        cursor: usize,
        iterations: usize,
    },
}

/// Result alias used throughout the crate.
pub type FaultResult<T> = Result<T, SyntaxFault>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_messages() {
        let fault = SyntaxFault::LookaheadExceeded {
            requested: 20,
            capacity: 20,
        };
        assert_eq!(
            fault.to_string(),
            "lookahead 20 exceeds token buffer capacity 20"
        );

        let fault = SyntaxFault::ModeStackUnderflow {
            mode: LexerMode::Default,
        };
        assert!(fault.to_string().contains("Default"));
    }
}
