//! Token definitions for the Quill programming language.
//!
//! This module defines every token kind the lexer can produce, including
//! keywords, operators, literals, template/XML/documentation sub-language
//! tokens, and the lossless [`Token`] value that carries its own trivia.

use std::fmt;
use std::fmt::Write as _;

use crate::diagnostics::Diagnostic;
use crate::trivia::Trivia;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    // Keywords
    PublicKeyword,
    PrivateKeyword,
    RemoteKeyword,
    FunctionKeyword,
    TypeKeyword,
    MapKeyword,
    ErrorKeyword,
    NeverKeyword,
    ReadonlyKeyword,
    DistinctKeyword,
    ImportKeyword,
    AsKeyword,
    OnKeyword,
    ResourceKeyword,
    ListenerKeyword,
    ConstKeyword,
    FinalKeyword,
    TypedescKeyword,
    AnnotationKeyword,
    IntKeyword,
    FloatKeyword,
    BooleanKeyword,
    DecimalKeyword,
    StringKeyword,
    ByteKeyword,
    JsonKeyword,
    XmlKeyword,
    HandleKeyword,
    FutureKeyword,
    AnyKeyword,
    AnydataKeyword,
    StreamKeyword,
    TableKeyword,
    ObjectKeyword,
    RecordKeyword,
    ServiceKeyword,
    WorkerKeyword,
    ForkKeyword,
    TrapKeyword,
    CheckKeyword,
    CheckpanicKeyword,
    PanicKeyword,
    ReturnKeyword,
    ReturnsKeyword,
    IfKeyword,
    ElseKeyword,
    WhileKeyword,
    ForeachKeyword,
    InKeyword,
    BreakKeyword,
    ContinueKeyword,
    MatchKeyword,
    FromKeyword,
    WhereKeyword,
    SelectKeyword,
    JoinKeyword,
    LetKeyword,
    LimitKeyword,
    OrderKeyword,
    ByKeyword,
    AscendingKeyword,
    DescendingKeyword,
    IsolatedKeyword,
    TransactionKeyword,
    CommitKeyword,
    RollbackKeyword,
    RetryKeyword,
    FailKeyword,
    LockKeyword,
    TrueKeyword,
    FalseKeyword,
    NullKeyword,
    IsKeyword,
    NewKeyword,
    TypeofKeyword,
    StartKeyword,
    WaitKeyword,
    FlushKeyword,
    DefaultKeyword,
    ClientKeyword,
    ConfigurableKeyword,
    EnumKeyword,
    ClassKeyword,
    VarKeyword,
    ReKeyword,
    NaturalKeyword,

    // Separators
    OpenBrace,
    CloseBrace,
    OpenBracePipe,
    ClosePipeBrace,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Semicolon,
    Comma,
    Dot,
    Ellipsis,
    DoubleDotLt,
    DotLt,
    AnnotChaining,
    Colon,
    DoubleColon,
    Hash,
    At,
    Backtick,
    DoubleBacktick,
    TripleBacktick,
    DoubleQuote,
    SingleQuote,

    // Operators
    QuestionMark,
    OptionalChaining,
    Elvis,
    Equal,
    DoubleEqual,
    TripleEqual,
    NotEqual,
    NotDoubleEqual,
    Exclamation,
    Plus,
    Minus,
    Asterisk,
    Slash,
    Percent,
    Lt,
    LtEqual,
    DoubleLt,
    LeftArrow,
    Gt,
    GtEqual,
    DoubleGt,
    TripleGt,
    BitwiseAnd,
    LogicalAnd,
    Pipe,
    LogicalOr,
    BitwiseXor,
    Negation,
    RightArrow,
    RightDoubleArrow,

    // Compound assignment
    PlusEqual,
    MinusEqual,
    AsteriskEqual,
    SlashEqual,
    BitwiseAndEqual,
    PipeEqual,
    BitwiseXorEqual,
    DoubleLtEqual,
    DoubleGtEqual,
    TripleGtEqual,

    // Literals and names
    Identifier,
    DecimalIntegerLiteral,
    HexIntegerLiteral,
    DecimalFloatingPointLiteral,
    HexFloatingPointLiteral,
    StringLiteral,
    DocumentationString,

    // Templates
    TemplateString,
    RegExpContent,
    InterpolationStart,

    // XML
    XmlName,
    XmlTextContent,
    XmlEndTagStart,
    XmlSlashGt,
    XmlCommentStart,
    XmlCommentContent,
    XmlCommentEnd,
    XmlPiStart,
    XmlPiData,
    XmlPiEnd,
    XmlCdataStart,
    XmlCdataContent,
    XmlCdataEnd,

    // Documentation
    DocumentationDescription,
    ParameterName,
    DeprecationLiteral,
    DocReferenceType,
    CodeContent,

    // Special
    Eof,
    InvalidToken,
    /// No particular kind; used where a rule context has no single expected token.
    None,
}

impl SyntaxKind {
    /// The fixed source text of punctuation and keyword kinds.
    ///
    /// Kinds whose text varies (identifiers, literals, template content, ...)
    /// return `None` and store their text on the token.
    pub fn fixed_text(self) -> Option<&'static str> {
        use SyntaxKind::*;
        let text = match self {
            PublicKeyword => "public",
            PrivateKeyword => "private",
            RemoteKeyword => "remote",
            FunctionKeyword => "function",
            TypeKeyword => "type",
            MapKeyword => "map",
            ErrorKeyword => "error",
            NeverKeyword => "never",
            ReadonlyKeyword => "readonly",
            DistinctKeyword => "distinct",
            ImportKeyword => "import",
            AsKeyword => "as",
            OnKeyword => "on",
            ResourceKeyword => "resource",
            ListenerKeyword => "listener",
            ConstKeyword => "const",
            FinalKeyword => "final",
            TypedescKeyword => "typedesc",
            AnnotationKeyword => "annotation",
            IntKeyword => "int",
            FloatKeyword => "float",
            BooleanKeyword => "boolean",
            DecimalKeyword => "decimal",
            StringKeyword => "string",
            ByteKeyword => "byte",
            JsonKeyword => "json",
            XmlKeyword => "xml",
            HandleKeyword => "handle",
            FutureKeyword => "future",
            AnyKeyword => "any",
            AnydataKeyword => "anydata",
            StreamKeyword => "stream",
            TableKeyword => "table",
            ObjectKeyword => "object",
            RecordKeyword => "record",
            ServiceKeyword => "service",
            WorkerKeyword => "worker",
            ForkKeyword => "fork",
            TrapKeyword => "trap",
            CheckKeyword => "check",
            CheckpanicKeyword => "checkpanic",
            PanicKeyword => "panic",
            ReturnKeyword => "return",
            ReturnsKeyword => "returns",
            IfKeyword => "if",
            ElseKeyword => "else",
            WhileKeyword => "while",
            ForeachKeyword => "foreach",
            InKeyword => "in",
            BreakKeyword => "break",
            ContinueKeyword => "continue",
            MatchKeyword => "match",
            FromKeyword => "from",
            WhereKeyword => "where",
            SelectKeyword => "select",
            JoinKeyword => "join",
            LetKeyword => "let",
            LimitKeyword => "limit",
            OrderKeyword => "order",
            ByKeyword => "by",
            AscendingKeyword => "ascending",
            DescendingKeyword => "descending",
            IsolatedKeyword => "isolated",
            TransactionKeyword => "transaction",
            CommitKeyword => "commit",
            RollbackKeyword => "rollback",
            RetryKeyword => "retry",
            FailKeyword => "fail",
            LockKeyword => "lock",
            TrueKeyword => "true",
            FalseKeyword => "false",
            NullKeyword => "null",
            IsKeyword => "is",
            NewKeyword => "new",
            TypeofKeyword => "typeof",
            StartKeyword => "start",
            WaitKeyword => "wait",
            FlushKeyword => "flush",
            DefaultKeyword => "default",
            ClientKeyword => "client",
            ConfigurableKeyword => "configurable",
            EnumKeyword => "enum",
            ClassKeyword => "class",
            VarKeyword => "var",
            ReKeyword => "re",
            NaturalKeyword => "natural",

            OpenBrace => "{",
            CloseBrace => "}",
            OpenBracePipe => "{|",
            ClosePipeBrace => "|}",
            OpenParen => "(",
            CloseParen => ")",
            OpenBracket => "[",
            CloseBracket => "]",
            Semicolon => ";",
            Comma => ",",
            Dot => ".",
            Ellipsis => "...",
            DoubleDotLt => "..<",
            DotLt => ".<",
            AnnotChaining => ".@",
            Colon => ":",
            DoubleColon => "::",
            Hash => "#",
            At => "@",
            Backtick => "`",
            DoubleBacktick => "``",
            TripleBacktick => "```",
            DoubleQuote => "\"",
            SingleQuote => "'",

            QuestionMark => "?",
            OptionalChaining => "?.",
            Elvis => "?:",
            Equal => "=",
            DoubleEqual => "==",
            TripleEqual => "===",
            NotEqual => "!=",
            NotDoubleEqual => "!==",
            Exclamation => "!",
            Plus => "+",
            Minus => "-",
            Asterisk => "*",
            Slash => "/",
            Percent => "%",
            Lt => "<",
            LtEqual => "<=",
            DoubleLt => "<<",
            LeftArrow => "<-",
            Gt => ">",
            GtEqual => ">=",
            DoubleGt => ">>",
            TripleGt => ">>>",
            BitwiseAnd => "&",
            LogicalAnd => "&&",
            Pipe => "|",
            LogicalOr => "||",
            BitwiseXor => "^",
            Negation => "~",
            RightArrow => "->",
            RightDoubleArrow => "=>",

            PlusEqual => "+=",
            MinusEqual => "-=",
            AsteriskEqual => "*=",
            SlashEqual => "/=",
            BitwiseAndEqual => "&=",
            PipeEqual => "|=",
            BitwiseXorEqual => "^=",
            DoubleLtEqual => "<<=",
            DoubleGtEqual => ">>=",
            TripleGtEqual => ">>>=",

            InterpolationStart => "${",
            XmlEndTagStart => "</",
            XmlSlashGt => "/>",
            XmlCommentStart => "<!--",
            XmlCommentEnd => "-->",
            XmlPiStart => "<?",
            XmlPiEnd => "?>",
            XmlCdataStart => "<![CDATA[",
            XmlCdataEnd => "]]>",

            Eof => "",
            _ => return Option::None,
        };
        Some(text)
    }

    /// Maps the exact text of a reserved word to its keyword kind.
    pub fn keyword(text: &str) -> Option<SyntaxKind> {
        use SyntaxKind::*;
        let kind = match text {
            "public" => PublicKeyword,
            "private" => PrivateKeyword,
            "remote" => RemoteKeyword,
            "function" => FunctionKeyword,
            "type" => TypeKeyword,
            "map" => MapKeyword,
            "error" => ErrorKeyword,
            "never" => NeverKeyword,
            "readonly" => ReadonlyKeyword,
            "distinct" => DistinctKeyword,
            "import" => ImportKeyword,
            "as" => AsKeyword,
            "on" => OnKeyword,
            "resource" => ResourceKeyword,
            "listener" => ListenerKeyword,
            "const" => ConstKeyword,
            "final" => FinalKeyword,
            "typedesc" => TypedescKeyword,
            "annotation" => AnnotationKeyword,
            "int" => IntKeyword,
            "float" => FloatKeyword,
            "boolean" => BooleanKeyword,
            "decimal" => DecimalKeyword,
            "string" => StringKeyword,
            "byte" => ByteKeyword,
            "json" => JsonKeyword,
            "xml" => XmlKeyword,
            "handle" => HandleKeyword,
            "future" => FutureKeyword,
            "any" => AnyKeyword,
            "anydata" => AnydataKeyword,
            "stream" => StreamKeyword,
            "table" => TableKeyword,
            "object" => ObjectKeyword,
            "record" => RecordKeyword,
            "service" => ServiceKeyword,
            "worker" => WorkerKeyword,
            "fork" => ForkKeyword,
            "trap" => TrapKeyword,
            "check" => CheckKeyword,
            "checkpanic" => CheckpanicKeyword,
            "panic" => PanicKeyword,
            "return" => ReturnKeyword,
            "returns" => ReturnsKeyword,
            "if" => IfKeyword,
            "else" => ElseKeyword,
            "while" => WhileKeyword,
            "foreach" => ForeachKeyword,
            "in" => InKeyword,
            "break" => BreakKeyword,
            "continue" => ContinueKeyword,
            "match" => MatchKeyword,
            "from" => FromKeyword,
            "where" => WhereKeyword,
            "select" => SelectKeyword,
            "join" => JoinKeyword,
            "let" => LetKeyword,
            "limit" => LimitKeyword,
            "order" => OrderKeyword,
            "by" => ByKeyword,
            "ascending" => AscendingKeyword,
            "descending" => DescendingKeyword,
            "isolated" => IsolatedKeyword,
            "transaction" => TransactionKeyword,
            "commit" => CommitKeyword,
            "rollback" => RollbackKeyword,
            "retry" => RetryKeyword,
            "fail" => FailKeyword,
            "lock" => LockKeyword,
            "true" => TrueKeyword,
            "false" => FalseKeyword,
            "null" => NullKeyword,
            "is" => IsKeyword,
            "new" => NewKeyword,
            "typeof" => TypeofKeyword,
            "start" => StartKeyword,
            "wait" => WaitKeyword,
            "flush" => FlushKeyword,
            "default" => DefaultKeyword,
            "client" => ClientKeyword,
            "configurable" => ConfigurableKeyword,
            "enum" => EnumKeyword,
            "class" => ClassKeyword,
            "var" => VarKeyword,
            "re" => ReKeyword,
            "natural" => NaturalKeyword,
            _ => return Option::None,
        };
        Some(kind)
    }

    /// Returns true if this kind is a reserved word.
    pub fn is_keyword(self) -> bool {
        (self as u16) <= (SyntaxKind::NaturalKeyword as u16)
    }

    /// Returns true if this kind names a built-in simple type.
    pub fn is_builtin_type(self) -> bool {
        use SyntaxKind::*;
        matches!(
            self,
            IntKeyword
                | FloatKeyword
                | BooleanKeyword
                | DecimalKeyword
                | StringKeyword
                | ByteKeyword
                | JsonKeyword
                | XmlKeyword
                | HandleKeyword
                | AnyKeyword
                | AnydataKeyword
                | NeverKeyword
                | ReadonlyKeyword
                | ErrorKeyword
                | MapKeyword
                | TypedescKeyword
        )
    }

    /// Returns true if this kind is a basic literal.
    pub fn is_literal(self) -> bool {
        use SyntaxKind::*;
        matches!(
            self,
            DecimalIntegerLiteral
                | HexIntegerLiteral
                | DecimalFloatingPointLiteral
                | HexFloatingPointLiteral
                | StringLiteral
                | TrueKeyword
                | FalseKeyword
                | NullKeyword
        )
    }

    /// Returns true if this kind is a binary operator.
    pub fn is_binary_operator(self) -> bool {
        use SyntaxKind::*;
        matches!(
            self,
            Plus | Minus
                | Asterisk
                | Slash
                | Percent
                | Lt
                | LtEqual
                | Gt
                | GtEqual
                | DoubleEqual
                | TripleEqual
                | NotEqual
                | NotDoubleEqual
                | BitwiseAnd
                | LogicalAnd
                | Pipe
                | LogicalOr
                | BitwiseXor
                | DoubleLt
                | DoubleGt
                | TripleGt
                | Elvis
                | Ellipsis
                | DoubleDotLt
        )
    }

    /// Returns true if this kind can start a unary expression.
    pub fn is_unary_operator(self) -> bool {
        use SyntaxKind::*;
        matches!(self, Plus | Minus | Exclamation | Negation)
    }

    /// Returns true if this kind is a compound assignment operator.
    pub fn is_compound_assignment(self) -> bool {
        use SyntaxKind::*;
        matches!(
            self,
            PlusEqual
                | MinusEqual
                | AsteriskEqual
                | SlashEqual
                | BitwiseAndEqual
                | PipeEqual
                | BitwiseXorEqual
                | DoubleLtEqual
                | DoubleGtEqual
                | TripleGtEqual
        )
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fixed_text() {
            Some(text) if !text.is_empty() => write!(f, "'{}'", text),
            _ => write!(f, "{:?}", self),
        }
    }
}

/// A lossless token.
///
/// `leading trivia + text + trailing trivia` reproduces the exact source the
/// token was scanned from. A missing token (synthesized by error recovery) has
/// empty text and always carries at least one diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    kind: SyntaxKind,
    text: Option<Box<str>>,
    missing: bool,
    leading: Vec<Trivia>,
    trailing: Vec<Trivia>,
    diagnostics: Vec<Diagnostic>,
}

impl Token {
    /// Create a token. `text` may be omitted for fixed-text kinds.
    pub fn new(
        kind: SyntaxKind,
        text: Option<&str>,
        leading: Vec<Trivia>,
        trailing: Vec<Trivia>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        let text = match (text, kind.fixed_text()) {
            (Some(t), Some(fixed)) if t == fixed => None,
            (Some(t), _) => Some(t.into()),
            (None, _) => None,
        };
        Self {
            kind,
            text,
            missing: false,
            leading,
            trailing,
            diagnostics,
        }
    }

    /// Create a zero-width missing token carrying the given diagnostic.
    pub fn missing(kind: SyntaxKind, diagnostic: Diagnostic) -> Self {
        Self {
            kind,
            text: None,
            missing: true,
            leading: Vec::new(),
            trailing: Vec::new(),
            diagnostics: vec![diagnostic],
        }
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    #[inline]
    pub fn is_missing(&self) -> bool {
        self.missing
    }

    /// The token's own text, without trivia.
    pub fn text(&self) -> &str {
        if self.missing {
            return "";
        }
        match &self.text {
            Some(text) => text,
            None => self.kind.fixed_text().unwrap_or(""),
        }
    }

    pub fn leading_trivia(&self) -> &[Trivia] {
        &self.leading
    }

    pub fn trailing_trivia(&self) -> &[Trivia] {
        &self.trailing
    }

    /// Diagnostics attached directly to this token.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics of the token and of any invalid trivia around it.
    pub fn all_diagnostics(&self) -> Vec<&Diagnostic> {
        let mut all = Vec::new();
        for trivia in &self.leading {
            trivia.collect_diagnostics(&mut all);
        }
        all.extend(self.diagnostics.iter());
        for trivia in &self.trailing {
            trivia.collect_diagnostics(&mut all);
        }
        all
    }

    /// Returns true if the token or its trivia carries any diagnostic.
    pub fn has_diagnostics(&self) -> bool {
        !self.all_diagnostics().is_empty()
    }

    /// Byte width of the token text alone.
    pub fn width(&self) -> usize {
        self.text().len()
    }

    /// Byte width of the leading trivia.
    pub fn leading_width(&self) -> usize {
        self.leading.iter().map(Trivia::width).sum()
    }

    /// Byte width including leading and trailing trivia.
    pub fn full_width(&self) -> usize {
        self.leading_width() + self.width() + self.trailing.iter().map(Trivia::width).sum::<usize>()
    }

    /// Reconstruct the exact source of this token, trivia included.
    pub fn full_text(&self) -> String {
        let mut out = String::with_capacity(self.full_width());
        self.write_full_text(&mut out);
        out
    }

    pub(crate) fn write_full_text(&self, out: &mut String) {
        for trivia in &self.leading {
            trivia.write_text(out);
        }
        out.push_str(self.text());
        for trivia in &self.trailing {
            trivia.write_text(out);
        }
    }

    /// Returns a copy of this token with `trivia` placed before its existing
    /// leading trivia.
    pub fn with_leading_prepended(mut self, trivia: Trivia) -> Self {
        self.leading.insert(0, trivia);
        self
    }

    /// Returns a copy of this token with an extra diagnostic.
    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostics.push(diagnostic);
        self
    }

    /// Render the token as an s-expression, as used by token dumps.
    ///
    /// ```text
    /// (Identifier "foo" (leading (Whitespace " ")) (diagnostics E0001))
    /// ```
    pub fn to_sexpr(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "({:?}", self.kind);
        if self.missing {
            out.push_str(" missing");
        } else if self.kind.fixed_text().is_none() || self.text.is_some() {
            let _ = write!(out, " {:?}", self.text());
        }
        if !self.leading.is_empty() {
            out.push_str(" (leading");
            for trivia in &self.leading {
                out.push(' ');
                out.push_str(&trivia.to_sexpr());
            }
            out.push(')');
        }
        if !self.trailing.is_empty() {
            out.push_str(" (trailing");
            for trivia in &self.trailing {
                out.push(' ');
                out.push_str(&trivia.to_sexpr());
            }
            out.push(')');
        }
        if !self.diagnostics.is_empty() {
            out.push_str(" (diagnostics");
            for diagnostic in &self.diagnostics {
                out.push(' ');
                out.push_str(diagnostic.code.code());
            }
            out.push(')');
        }
        out.push(')');
        out
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.missing {
            write!(f, "<missing {}>", self.kind)
        } else {
            f.write_str(self.text())
        }
    }
}
