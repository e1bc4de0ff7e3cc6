//! Error types and position tracking for HOCON parsing
//!
//! Every phase of a parse has its own error enum (tokenizing, parsing,
//! substitution resolution, typed access). They are wrapped by [`HoconError`],
//! which is what the public entry points return. All of them are fatal to
//! the parse call that raised them.

use std::fmt;
use thiserror::Error;

/// Maximum number of source characters quoted in an error snippet
pub const SNIPPET_LENGTH: usize = 20;

/// Represents a position in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Byte offset from start of input (0-based)
    pub offset: usize,
}

impl Position {
    /// Creates a new position at the start of input
    pub fn new() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
        }
    }

    /// Computes the line/column of a byte offset inside `source`
    pub fn at_offset(source: &str, offset: usize) -> Self {
        let mut position = Self::new();
        let end = offset.min(source.len());
        for c in source[..end].chars() {
            position.advance(c);
        }
        position
    }

    /// Advances the position by one character
    pub fn advance(&mut self, c: char) {
        match c {
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            '\r' => {
                self.column = 1;
            }
            _ => {
                self.column += 1;
            }
        }
        self.offset += c.len_utf8();
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Extracts a short, single-line excerpt of `source` starting at `offset`
///
/// Line breaks are rendered as `\n` / `\r` so the snippet stays on one line
/// inside error messages.
pub fn snippet_at(source: &str, offset: usize) -> String {
    let start = offset.min(source.len());
    let excerpt: String = source[start..].chars().take(SNIPPET_LENGTH).collect();
    let truncated = source[start..].chars().nth(SNIPPET_LENGTH).is_some();

    let mut snippet = excerpt.replace('\r', "\\r").replace('\n', "\\n");
    if truncated {
        snippet.push_str("...");
    }
    snippet
}

/// Main error type for HOCON operations
#[derive(Debug, Error)]
pub enum HoconError {
    /// Lexical analysis error
    #[error("Tokenizer error: {0}")]
    Tokenize(#[from] TokenizeError),

    /// Structural (syntax) error
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Substitution resolution error
    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),

    /// Typed getter could not convert a value
    #[error("Type error: {0}")]
    Coercion(#[from] CoercionError),

    /// Serde deserialization error
    #[error("Serde error: {0}")]
    Serde(#[from] SerdeError),

    /// I/O error while reading a configuration file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON conversion error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Lexical analysis errors
#[derive(Debug, Error)]
pub enum TokenizeError {
    /// Nothing recognisable starts at this position
    #[error("Unknown token at {position}: `{snippet}`")]
    UnknownToken { snippet: String, position: Position },

    /// Quoted string (or quoted key) not properly terminated
    #[error("Unterminated quoted string at {position}")]
    UnterminatedString { position: Position },

    /// Triple-quoted string without its closing `"""`
    #[error("Expected end of triple quoted string at {position}")]
    UnterminatedTripleQuotedString { position: Position },

    /// `${` without a closing `}`
    #[error("Unterminated substitution at {position}: `{snippet}`")]
    UnterminatedSubstitution { snippet: String, position: Position },

    /// Invalid escape sequence in a quoted string
    #[error("Unknown escape code `\\{sequence}` at {position}")]
    InvalidEscape {
        sequence: String,
        position: Position,
    },

    /// Invalid `\uXXXX` escape
    #[error("Invalid unicode escape '\\u{sequence}' at {position}")]
    InvalidUnicodeEscape {
        sequence: String,
        position: Position,
    },

    /// A value position held something that cannot start a value
    #[error(
        "Expected value: Null literal, Array, Quoted Text, Unquoted Text, Triple quoted Text, Object or End of array at {position}: `{snippet}`"
    )]
    ExpectedValue { snippet: String, position: Position },

    /// `]` expected
    #[error("Expected end of array at {position}: `{snippet}`")]
    ExpectedArrayEnd { snippet: String, position: Position },
}

impl TokenizeError {
    /// Returns the position the error was reported at
    pub fn position(&self) -> Position {
        match self {
            TokenizeError::UnknownToken { position, .. }
            | TokenizeError::UnterminatedString { position }
            | TokenizeError::UnterminatedTripleQuotedString { position }
            | TokenizeError::UnterminatedSubstitution { position, .. }
            | TokenizeError::InvalidEscape { position, .. }
            | TokenizeError::InvalidUnicodeEscape { position, .. }
            | TokenizeError::ExpectedValue { position, .. }
            | TokenizeError::ExpectedArrayEnd { position, .. } => *position,
        }
    }
}

/// Structural errors raised by the parser
///
/// `trace` is the diagnostic breadcrumb string of the parser at the time of
/// the failure, e.g. `Current path: {server = {port = `.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unexpected {token} at {position}, expected {expected}. {trace}")]
    UnexpectedToken {
        token: String,
        expected: String,
        position: Position,
        trace: String,
    },

    #[error("Expected {expected} but found EoF. {trace}")]
    UnexpectedEof { expected: String, trace: String },

    #[error("Hocon syntax error at {position}: `{snippet}`. {trace}")]
    EmptyValue {
        snippet: String,
        position: Position,
        trace: String,
    },

    #[error("Include of '{path}' requested but no include handler was configured")]
    IncludeUnavailable { path: String },

    #[error("Include of '{path}' failed: {source}")]
    IncludeFailed {
        path: String,
        #[source]
        source: Box<HoconError>,
    },

    #[error("Include cycle detected: {chain}")]
    IncludeCycle { chain: String },

    #[error("Maximum nesting depth of {max_depth} exceeded at {position}")]
    MaxDepthExceeded { max_depth: usize, position: Position },
}

/// Substitution resolution errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Unresolved substitution: {path}")]
    Unresolved { path: String },

    #[error("Cyclic substitution of '{path}': {chain}")]
    Cyclic { path: String, chain: String },

    /// Following `path` needs more nested substitutions than allowed
    #[error("Substitution chain through '{path}' exceeds the maximum depth of {max_depth}")]
    DepthExceeded { path: String, max_depth: usize },
}

/// Errors raised by typed getters
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoercionError {
    /// The node holds a different kind of value than requested
    #[error("Expected {expected} but found {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },

    /// A substitution was queried before the resolution pass ran
    #[error("Substitution '{path}' has not been resolved")]
    Unresolved { path: String },

    #[error("Unknown boolean format: {value}")]
    InvalidBoolean { value: String },

    #[error("Invalid {target} format for: {value}")]
    InvalidNumber { target: &'static str, value: String },
}

/// Deserialization errors
#[derive(Debug, Error)]
pub enum SerdeError {
    #[error("{0}")]
    Custom(String),

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
}

impl serde::de::Error for HoconError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        HoconError::Serde(SerdeError::Custom(msg.to_string()))
    }
}
