//! Quill Language Parser
//!
//! Lossless, error-tolerant front end for the Quill programming language:
//! a mode-stack lexer, a bounded-lookahead token reader, and a
//! grammar-driven error recovery engine, with a reference driver that
//! builds a lossless syntax tree.
//!
//! ```ignore
//! let tree = quill_parser::parse_module("function main() { return; }")?;
//! assert_eq!(tree.text(), "function main() { return; }");
//! for diagnostic in tree.diagnostics() {
//!     println!("{diagnostic}");
//! }
//! ```

pub mod context;
pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod reader;
pub mod recovery;
pub mod report;
pub mod token;
pub mod tree;
pub mod trivia;

pub use context::{ContextStack, RuleContext};
pub use diagnostics::{Diagnostic, DiagnosticCode, Severity};
pub use error::{FaultResult, SyntaxFault};
pub use lexer::{Lexer, LexerMode};
pub use parser::Parser;
pub use reader::TokenReader;
pub use recovery::{Action, ErrorHandler, RecoveryLimits, Solution};
pub use token::{SyntaxKind, Token};
pub use tree::{NodeKind, SyntaxElement, SyntaxNode};
pub use trivia::Trivia;

/// Parse a whole source file with default recovery limits.
pub fn parse_module(source: &str) -> FaultResult<SyntaxNode> {
    Parser::new(source).parse_module()
}
