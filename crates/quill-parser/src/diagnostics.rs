//! Diagnostic codes attached to tokens and trivia.
//!
//! Codes are a stable contract: tooling and tests key off [`DiagnosticCode::code`]
//! and [`DiagnosticCode::message_key`]. New codes are appended; existing codes
//! are never renumbered.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Every diagnostic the front end can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    // Generic
    SyntaxError,
    InvalidToken,
    TooDeeplyNested,

    // Lexical
    MissingDoubleQuote,
    InvalidEscapeSequence,
    InvalidStringNumericEscapeSequence,
    LeadingZerosInNumericLiterals,
    MissingHexDigitAfterHexIndicator,
    MissingDigitAfterExponentIndicator,
    InvalidEscapedCharacterInIdentifier,
    UnterminatedTemplate,
    UnterminatedXmlComment,
    UnterminatedXmlPi,
    UnterminatedXmlCdata,
    MissingXmlAttributeQuote,

    // Missing tokens
    MissingSemicolonToken,
    MissingCommaToken,
    MissingColonToken,
    MissingDotToken,
    MissingEqualToken,
    MissingOpenParenToken,
    MissingCloseParenToken,
    MissingOpenBraceToken,
    MissingCloseBraceToken,
    MissingOpenBracketToken,
    MissingCloseBracketToken,
    MissingBacktickToken,
    MissingGtToken,
    MissingSlashToken,
    MissingIdentifier,
    MissingExpression,
    MissingTypeDesc,
    MissingFunctionName,
    MissingVariableName,
    MissingParameterName,
    MissingModuleName,
    MissingOrgName,
    MissingImportPrefix,
    MissingXmlName,
    MissingTopLevelNode,
    MissingStatement,
    MissingBinaryOperator,
    MissingAssignmentOperator,
    MissingInterpolationEnd,

    // Missing keywords
    MissingFunctionKeyword,
    MissingImportKeyword,
    MissingAsKeyword,
    MissingReturnsKeyword,
    MissingReturnKeyword,
    MissingIfKeyword,
    MissingElseKeyword,
    MissingWhileKeyword,
    MissingBreakKeyword,
    MissingContinueKeyword,
    MissingConstKeyword,
    MissingPublicKeyword,

    // Documentation (warnings)
    DocMissingParameterName,
    DocMissingHyphen,
    DocUnclosedBacktick,
}

impl DiagnosticCode {
    /// The stable code string, `E0xxx` for errors and `W0xxx` for warnings.
    pub fn code(self) -> &'static str {
        use DiagnosticCode::*;
        match self {
            SyntaxError => "E0000",
            InvalidToken => "E0001",
            TooDeeplyNested => "E0002",

            MissingDoubleQuote => "E0100",
            InvalidEscapeSequence => "E0101",
            InvalidStringNumericEscapeSequence => "E0102",
            LeadingZerosInNumericLiterals => "E0103",
            MissingHexDigitAfterHexIndicator => "E0104",
            MissingDigitAfterExponentIndicator => "E0105",
            InvalidEscapedCharacterInIdentifier => "E0106",
            UnterminatedTemplate => "E0107",
            UnterminatedXmlComment => "E0108",
            UnterminatedXmlPi => "E0109",
            UnterminatedXmlCdata => "E0110",
            MissingXmlAttributeQuote => "E0111",

            MissingSemicolonToken => "E0200",
            MissingCommaToken => "E0201",
            MissingColonToken => "E0202",
            MissingDotToken => "E0203",
            MissingEqualToken => "E0204",
            MissingOpenParenToken => "E0205",
            MissingCloseParenToken => "E0206",
            MissingOpenBraceToken => "E0207",
            MissingCloseBraceToken => "E0208",
            MissingOpenBracketToken => "E0209",
            MissingCloseBracketToken => "E0210",
            MissingBacktickToken => "E0211",
            MissingGtToken => "E0212",
            MissingSlashToken => "E0213",
            MissingIdentifier => "E0214",
            MissingExpression => "E0215",
            MissingTypeDesc => "E0216",
            MissingFunctionName => "E0217",
            MissingVariableName => "E0218",
            MissingParameterName => "E0219",
            MissingModuleName => "E0220",
            MissingOrgName => "E0221",
            MissingImportPrefix => "E0222",
            MissingXmlName => "E0223",
            MissingTopLevelNode => "E0224",
            MissingStatement => "E0225",
            MissingBinaryOperator => "E0226",
            MissingAssignmentOperator => "E0227",
            MissingInterpolationEnd => "E0228",

            MissingFunctionKeyword => "E0300",
            MissingImportKeyword => "E0301",
            MissingAsKeyword => "E0302",
            MissingReturnsKeyword => "E0303",
            MissingReturnKeyword => "E0304",
            MissingIfKeyword => "E0305",
            MissingElseKeyword => "E0306",
            MissingWhileKeyword => "E0307",
            MissingBreakKeyword => "E0308",
            MissingContinueKeyword => "E0309",
            MissingConstKeyword => "E0310",
            MissingPublicKeyword => "E0311",

            DocMissingParameterName => "W0001",
            DocMissingHyphen => "W0002",
            DocUnclosedBacktick => "W0003",
        }
    }

    /// The message key used by localized message catalogues.
    pub fn message_key(self) -> &'static str {
        use DiagnosticCode::*;
        match self {
            SyntaxError => "error.syntax.error",
            InvalidToken => "error.invalid.token",
            TooDeeplyNested => "error.too.deeply.nested",

            MissingDoubleQuote => "error.missing.double.quote",
            InvalidEscapeSequence => "error.invalid.escape.sequence",
            InvalidStringNumericEscapeSequence => "error.invalid.string.numeric.escape.sequence",
            LeadingZerosInNumericLiterals => "error.leading.zeros.in.numeric.literals",
            MissingHexDigitAfterHexIndicator => "error.missing.hex.digit.after.hex.indicator",
            MissingDigitAfterExponentIndicator => "error.missing.digit.after.exponent.indicator",
            InvalidEscapedCharacterInIdentifier => "error.invalid.escaped.character.in.identifier",
            UnterminatedTemplate => "error.unterminated.template",
            UnterminatedXmlComment => "error.unterminated.xml.comment",
            UnterminatedXmlPi => "error.unterminated.xml.pi",
            UnterminatedXmlCdata => "error.unterminated.xml.cdata",
            MissingXmlAttributeQuote => "error.missing.xml.attribute.quote",

            MissingSemicolonToken => "error.missing.semicolon.token",
            MissingCommaToken => "error.missing.comma.token",
            MissingColonToken => "error.missing.colon.token",
            MissingDotToken => "error.missing.dot.token",
            MissingEqualToken => "error.missing.equal.token",
            MissingOpenParenToken => "error.missing.open.paren.token",
            MissingCloseParenToken => "error.missing.close.paren.token",
            MissingOpenBraceToken => "error.missing.open.brace.token",
            MissingCloseBraceToken => "error.missing.close.brace.token",
            MissingOpenBracketToken => "error.missing.open.bracket.token",
            MissingCloseBracketToken => "error.missing.close.bracket.token",
            MissingBacktickToken => "error.missing.backtick.token",
            MissingGtToken => "error.missing.gt.token",
            MissingSlashToken => "error.missing.slash.token",
            MissingIdentifier => "error.missing.identifier",
            MissingExpression => "error.missing.expression",
            MissingTypeDesc => "error.missing.type.desc",
            MissingFunctionName => "error.missing.function.name",
            MissingVariableName => "error.missing.variable.name",
            MissingParameterName => "error.missing.parameter.name",
            MissingModuleName => "error.missing.module.name",
            MissingOrgName => "error.missing.org.name",
            MissingImportPrefix => "error.missing.import.prefix",
            MissingXmlName => "error.missing.xml.name",
            MissingTopLevelNode => "error.missing.top.level.node",
            MissingStatement => "error.missing.statement",
            MissingBinaryOperator => "error.missing.binary.operator",
            MissingAssignmentOperator => "error.missing.assignment.operator",
            MissingInterpolationEnd => "error.missing.interpolation.end",

            MissingFunctionKeyword => "error.missing.function.keyword",
            MissingImportKeyword => "error.missing.import.keyword",
            MissingAsKeyword => "error.missing.as.keyword",
            MissingReturnsKeyword => "error.missing.returns.keyword",
            MissingReturnKeyword => "error.missing.return.keyword",
            MissingIfKeyword => "error.missing.if.keyword",
            MissingElseKeyword => "error.missing.else.keyword",
            MissingWhileKeyword => "error.missing.while.keyword",
            MissingBreakKeyword => "error.missing.break.keyword",
            MissingContinueKeyword => "error.missing.continue.keyword",
            MissingConstKeyword => "error.missing.const.keyword",
            MissingPublicKeyword => "error.missing.public.keyword",

            DocMissingParameterName => "warning.missing.parameter.name",
            DocMissingHyphen => "warning.missing.hyphen.token",
            DocUnclosedBacktick => "warning.unclosed.backtick",
        }
    }

    /// Warnings are reserved for documentation problems.
    pub fn severity(self) -> Severity {
        if self.code().starts_with('W') {
            Severity::Warning
        } else {
            Severity::Error
        }
    }

    /// A short English description, used when no message catalogue is loaded.
    pub fn description(self) -> &'static str {
        use DiagnosticCode::*;
        match self {
            SyntaxError => "syntax error",
            InvalidToken => "invalid token",
            TooDeeplyNested => "expression nested too deeply",
            MissingDoubleQuote => "missing double quote",
            InvalidEscapeSequence => "invalid escape sequence",
            InvalidStringNumericEscapeSequence => "invalid numeric escape sequence",
            LeadingZerosInNumericLiterals => "leading zeros in numeric literals",
            MissingHexDigitAfterHexIndicator => "missing hex number after hex indicator",
            MissingDigitAfterExponentIndicator => "missing digit after exponent indicator",
            InvalidEscapedCharacterInIdentifier => "invalid escaped character in identifier",
            UnterminatedTemplate => "unterminated template",
            UnterminatedXmlComment => "unterminated XML comment",
            UnterminatedXmlPi => "unterminated XML processing instruction",
            UnterminatedXmlCdata => "unterminated XML CDATA section",
            MissingXmlAttributeQuote => "missing quote in XML attribute value",
            MissingSemicolonToken => "missing semicolon token",
            MissingCommaToken => "missing comma token",
            MissingColonToken => "missing colon token",
            MissingDotToken => "missing dot token",
            MissingEqualToken => "missing equal token",
            MissingOpenParenToken => "missing open paren",
            MissingCloseParenToken => "missing close paren",
            MissingOpenBraceToken => "missing open brace",
            MissingCloseBraceToken => "missing close brace",
            MissingOpenBracketToken => "missing open bracket",
            MissingCloseBracketToken => "missing close bracket",
            MissingBacktickToken => "missing backtick",
            MissingGtToken => "missing '>' token",
            MissingSlashToken => "missing '/' token",
            MissingIdentifier => "missing identifier",
            MissingExpression => "missing expression",
            MissingTypeDesc => "missing type descriptor",
            MissingFunctionName => "missing function name",
            MissingVariableName => "missing variable name",
            MissingParameterName => "missing parameter name",
            MissingModuleName => "missing module name",
            MissingOrgName => "missing organization name",
            MissingImportPrefix => "missing import prefix",
            MissingXmlName => "missing XML name",
            MissingTopLevelNode => "missing top level declaration",
            MissingStatement => "missing statement",
            MissingBinaryOperator => "missing binary operator",
            MissingAssignmentOperator => "missing assignment operator",
            MissingInterpolationEnd => "missing interpolation end",
            MissingFunctionKeyword => "missing 'function' keyword",
            MissingImportKeyword => "missing 'import' keyword",
            MissingAsKeyword => "missing 'as' keyword",
            MissingReturnsKeyword => "missing 'returns' keyword",
            MissingReturnKeyword => "missing 'return' keyword",
            MissingIfKeyword => "missing 'if' keyword",
            MissingElseKeyword => "missing 'else' keyword",
            MissingWhileKeyword => "missing 'while' keyword",
            MissingBreakKeyword => "missing 'break' keyword",
            MissingContinueKeyword => "missing 'continue' keyword",
            MissingConstKeyword => "missing 'const' keyword",
            MissingPublicKeyword => "missing 'public' keyword",
            DocMissingParameterName => "missing parameter name in documentation",
            DocMissingHyphen => "missing '-' after documented parameter name",
            DocUnclosedBacktick => "unclosed backtick in documentation",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for DiagnosticCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// A diagnostic attached to a token or an invalid trivia fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    /// Message arguments, e.g. the text of an invalid token.
    pub args: Vec<String>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode) -> Self {
        Self {
            code,
            args: Vec::new(),
        }
    }

    /// Create a diagnostic with a single message argument.
    pub fn with_arg(code: DiagnosticCode, arg: impl Into<String>) -> Self {
        Self {
            code,
            args: vec![arg.into()],
        }
    }

    #[inline]
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Human-readable message with arguments appended.
    pub fn message(&self) -> String {
        let mut message = self.code.description().to_string();
        if !self.args.is_empty() {
            let quoted: Vec<String> = self.args.iter().map(|a| format!("'{}'", a)).collect();
            message.push_str(": ");
            message.push_str(&quoted.join(", "));
        }
        message
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message())
    }
}

impl Serialize for Diagnostic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Diagnostic", 4)?;
        state.serialize_field("code", self.code.code())?;
        state.serialize_field("key", self.code.message_key())?;
        state.serialize_field("severity", &self.severity())?;
        state.serialize_field("args", &self.args)?;
        state.end()
    }
}
