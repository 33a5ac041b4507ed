//! Error types for the interpreter core.
//!
//! Every failure aborts the token stream currently being executed and is
//! handed back to the caller unchanged. Side effects committed by earlier
//! tokens in the same stream are not rolled back.

use crate::Cell;

/// Result alias used throughout the core.
pub type Result<T> = std::result::Result<T, ForthError>;

/// A failure raised while executing a token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForthError {
    /// Token is neither a word, a number in the current BASE, nor a syntax word
    UnknownToken(String),
    /// `:` seen while a definition was already open
    NestedDefinition,
    /// A word needed more cells than the stack held
    StackUnderflow { word: String },
    /// `!` or `@` addressed a cell outside memory
    AddressOutOfRange(Cell),
    /// `/`, `/MOD` or `MOD` with a zero divisor
    DivisionByZero,
    /// `EMIT` given a value that is not a Unicode scalar
    InvalidCharacter(Cell),
    /// Definition replay nested deeper than the configured limit
    RecursionLimit(usize),
    /// Input ended while a definition, comment or literal was still open
    Unterminated(&'static str),
    /// The output sink failed
    Output(String),
    /// Interpreter configuration out of range
    InvalidConfig(String),
}

impl std::fmt::Display for ForthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForthError::UnknownToken(token) => write!(f, "UNKNOWN TOKEN: {}", token),
            ForthError::NestedDefinition => write!(f, ": INSIDE :"),
            ForthError::StackUnderflow { word } => write!(f, "STACK UNDERFLOW: {}", word),
            ForthError::AddressOutOfRange(addr) => write!(f, "ADDRESS OUT OF RANGE: {}", addr),
            ForthError::DivisionByZero => write!(f, "DIVISION BY ZERO"),
            ForthError::InvalidCharacter(code) => write!(f, "INVALID CHARACTER: {}", code),
            ForthError::RecursionLimit(depth) => {
                write!(f, "RECURSION LIMIT: nesting exceeded {}", depth)
            }
            ForthError::Unterminated(mode) => write!(f, "UNTERMINATED {}", mode),
            ForthError::Output(msg) => write!(f, "OUTPUT ERROR: {}", msg),
            ForthError::InvalidConfig(msg) => write!(f, "INVALID CONFIG: {}", msg),
        }
    }
}

impl std::error::Error for ForthError {}

impl From<std::io::Error> for ForthError {
    fn from(e: std::io::Error) -> Self {
        ForthError::Output(e.to_string())
    }
}
