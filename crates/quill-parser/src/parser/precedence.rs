//! Operator precedence table for expression parsing.
//!
//! Binding strength of every binary operator the driver understands, from
//! the loosest (`?:`) to the tightest (multiplicative). Unary operators bind
//! tighter than all of them.

use crate::token::SyntaxKind;

/// Operator precedence level (higher = tighter binding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    None = 0,
    Elvis = 1,           // ?:
    LogicalOr = 2,       // ||
    LogicalAnd = 3,      // &&
    BitwiseOr = 4,       // |
    BitwiseXor = 5,      // ^
    BitwiseAnd = 6,      // &
    Equality = 7,        // ==, !=, ===, !==
    Relational = 8,      // <, >, <=, >=
    Range = 9,           // ..., ..<
    Shift = 10,          // <<, >>, >>>
    Additive = 11,       // +, -
    Multiplicative = 12, // *, /, %
    Unary = 13,          // +, -, !, ~
}

impl Precedence {
    /// The next tighter level; `Unary` is the tightest.
    pub fn tighter(self) -> Precedence {
        use Precedence::*;
        match self {
            None => Elvis,
            Elvis => LogicalOr,
            LogicalOr => LogicalAnd,
            LogicalAnd => BitwiseOr,
            BitwiseOr => BitwiseXor,
            BitwiseXor => BitwiseAnd,
            BitwiseAnd => Equality,
            Equality => Relational,
            Relational => Range,
            Range => Shift,
            Shift => Additive,
            Additive => Multiplicative,
            Multiplicative | Unary => Unary,
        }
    }
}

/// Get the precedence of a binary operator token kind.
pub fn get_precedence(kind: SyntaxKind) -> Precedence {
    match kind {
        SyntaxKind::Elvis => Precedence::Elvis,

        SyntaxKind::LogicalOr => Precedence::LogicalOr,
        SyntaxKind::LogicalAnd => Precedence::LogicalAnd,

        SyntaxKind::Pipe => Precedence::BitwiseOr,
        SyntaxKind::BitwiseXor => Precedence::BitwiseXor,
        SyntaxKind::BitwiseAnd => Precedence::BitwiseAnd,

        SyntaxKind::DoubleEqual
        | SyntaxKind::NotEqual
        | SyntaxKind::TripleEqual
        | SyntaxKind::NotDoubleEqual => Precedence::Equality,

        SyntaxKind::Lt | SyntaxKind::LtEqual | SyntaxKind::Gt | SyntaxKind::GtEqual => {
            Precedence::Relational
        }

        SyntaxKind::Ellipsis | SyntaxKind::DoubleDotLt => Precedence::Range,

        SyntaxKind::DoubleLt | SyntaxKind::DoubleGt | SyntaxKind::TripleGt => Precedence::Shift,

        SyntaxKind::Plus | SyntaxKind::Minus => Precedence::Additive,

        SyntaxKind::Asterisk | SyntaxKind::Slash | SyntaxKind::Percent => {
            Precedence::Multiplicative
        }

        _ => Precedence::None,
    }
}

/// Check if an operator is right-associative.
pub fn is_right_associative(kind: SyntaxKind) -> bool {
    kind == SyntaxKind::Elvis
}
