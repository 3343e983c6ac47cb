//! Punctuation and operators, matched longest-first by logos.
//!
//! Only fixed-text tokens live here. Literals, identifiers, trivia and the
//! mode-changing characters (backtick, `#`) are scanned by hand.

use logos::Logos;

use crate::token::SyntaxKind;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Punct {
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("{|")]
    OpenBracePipe,
    #[token("|}")]
    ClosePipeBrace,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,

    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("..<")]
    DoubleDotLt,
    #[token(".<")]
    DotLt,
    #[token(".@")]
    AnnotChaining,

    #[token(":")]
    Colon,
    #[token("::")]
    DoubleColon,
    #[token("@")]
    At,

    #[token("?")]
    QuestionMark,
    #[token("?.")]
    OptionalChaining,
    #[token("?:")]
    Elvis,

    #[token("=")]
    Equal,
    #[token("==")]
    DoubleEqual,
    #[token("===")]
    TripleEqual,
    #[token("=>")]
    RightDoubleArrow,

    #[token("!")]
    Exclamation,
    #[token("!=")]
    NotEqual,
    #[token("!==")]
    NotDoubleEqual,

    #[token("+")]
    Plus,
    #[token("+=")]
    PlusEqual,
    #[token("-")]
    Minus,
    #[token("-=")]
    MinusEqual,
    #[token("->")]
    RightArrow,
    #[token("*")]
    Asterisk,
    #[token("*=")]
    AsteriskEqual,
    #[token("/")]
    Slash,
    #[token("/=")]
    SlashEqual,
    #[token("%")]
    Percent,

    #[token("<")]
    Lt,
    #[token("<=")]
    LtEqual,
    #[token("<-")]
    LeftArrow,
    #[token("<<")]
    DoubleLt,
    #[token("<<=")]
    DoubleLtEqual,

    #[token(">")]
    Gt,
    #[token(">=")]
    GtEqual,
    #[token(">>")]
    DoubleGt,
    #[token(">>=")]
    DoubleGtEqual,
    #[token(">>>")]
    TripleGt,
    #[token(">>>=")]
    TripleGtEqual,

    #[token("&")]
    BitwiseAnd,
    #[token("&&")]
    LogicalAnd,
    #[token("&=")]
    BitwiseAndEqual,
    #[token("|")]
    Pipe,
    #[token("||")]
    LogicalOr,
    #[token("|=")]
    PipeEqual,
    #[token("^")]
    BitwiseXor,
    #[token("^=")]
    BitwiseXorEqual,
    #[token("~")]
    Negation,
}

impl Punct {
    fn kind(self) -> SyntaxKind {
        match self {
            Punct::OpenBrace => SyntaxKind::OpenBrace,
            Punct::CloseBrace => SyntaxKind::CloseBrace,
            Punct::OpenBracePipe => SyntaxKind::OpenBracePipe,
            Punct::ClosePipeBrace => SyntaxKind::ClosePipeBrace,
            Punct::OpenParen => SyntaxKind::OpenParen,
            Punct::CloseParen => SyntaxKind::CloseParen,
            Punct::OpenBracket => SyntaxKind::OpenBracket,
            Punct::CloseBracket => SyntaxKind::CloseBracket,
            Punct::Semicolon => SyntaxKind::Semicolon,
            Punct::Comma => SyntaxKind::Comma,
            Punct::Dot => SyntaxKind::Dot,
            Punct::Ellipsis => SyntaxKind::Ellipsis,
            Punct::DoubleDotLt => SyntaxKind::DoubleDotLt,
            Punct::DotLt => SyntaxKind::DotLt,
            Punct::AnnotChaining => SyntaxKind::AnnotChaining,
            Punct::Colon => SyntaxKind::Colon,
            Punct::DoubleColon => SyntaxKind::DoubleColon,
            Punct::At => SyntaxKind::At,
            Punct::QuestionMark => SyntaxKind::QuestionMark,
            Punct::OptionalChaining => SyntaxKind::OptionalChaining,
            Punct::Elvis => SyntaxKind::Elvis,
            Punct::Equal => SyntaxKind::Equal,
            Punct::DoubleEqual => SyntaxKind::DoubleEqual,
            Punct::TripleEqual => SyntaxKind::TripleEqual,
            Punct::RightDoubleArrow => SyntaxKind::RightDoubleArrow,
            Punct::Exclamation => SyntaxKind::Exclamation,
            Punct::NotEqual => SyntaxKind::NotEqual,
            Punct::NotDoubleEqual => SyntaxKind::NotDoubleEqual,
            Punct::Plus => SyntaxKind::Plus,
            Punct::PlusEqual => SyntaxKind::PlusEqual,
            Punct::Minus => SyntaxKind::Minus,
            Punct::MinusEqual => SyntaxKind::MinusEqual,
            Punct::RightArrow => SyntaxKind::RightArrow,
            Punct::Asterisk => SyntaxKind::Asterisk,
            Punct::AsteriskEqual => SyntaxKind::AsteriskEqual,
            Punct::Slash => SyntaxKind::Slash,
            Punct::SlashEqual => SyntaxKind::SlashEqual,
            Punct::Percent => SyntaxKind::Percent,
            Punct::Lt => SyntaxKind::Lt,
            Punct::LtEqual => SyntaxKind::LtEqual,
            Punct::LeftArrow => SyntaxKind::LeftArrow,
            Punct::DoubleLt => SyntaxKind::DoubleLt,
            Punct::DoubleLtEqual => SyntaxKind::DoubleLtEqual,
            Punct::Gt => SyntaxKind::Gt,
            Punct::GtEqual => SyntaxKind::GtEqual,
            Punct::DoubleGt => SyntaxKind::DoubleGt,
            Punct::DoubleGtEqual => SyntaxKind::DoubleGtEqual,
            Punct::TripleGt => SyntaxKind::TripleGt,
            Punct::TripleGtEqual => SyntaxKind::TripleGtEqual,
            Punct::BitwiseAnd => SyntaxKind::BitwiseAnd,
            Punct::LogicalAnd => SyntaxKind::LogicalAnd,
            Punct::BitwiseAndEqual => SyntaxKind::BitwiseAndEqual,
            Punct::Pipe => SyntaxKind::Pipe,
            Punct::LogicalOr => SyntaxKind::LogicalOr,
            Punct::PipeEqual => SyntaxKind::PipeEqual,
            Punct::BitwiseXor => SyntaxKind::BitwiseXor,
            Punct::BitwiseXorEqual => SyntaxKind::BitwiseXorEqual,
            Punct::Negation => SyntaxKind::Negation,
        }
    }
}

/// Match the longest punctuation token at the start of `input`.
///
/// Returns the token kind and its byte length, or `None` if `input` does not
/// start with punctuation.
pub fn scan(input: &str) -> Option<(SyntaxKind, usize)> {
    let mut lexer = Punct::lexer(input);
    match lexer.next() {
        Some(Ok(punct)) if lexer.span().start == 0 => Some((punct.kind(), lexer.span().end)),
        _ => None,
    }
}

/// Returns true if `c` can start a punctuation token.
pub fn starts_punct(c: char) -> bool {
    matches!(
        c,
        '{' | '}'
            | '('
            | ')'
            | '['
            | ']'
            | ';'
            | ','
            | '.'
            | ':'
            | '@'
            | '?'
            | '='
            | '!'
            | '+'
            | '-'
            | '*'
            | '/'
            | '%'
            | '<'
            | '>'
            | '&'
            | '|'
            | '^'
            | '~'
    )
}
