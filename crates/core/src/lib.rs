//! toyforth core: a minimal interpreter for a Forth-like stack language
//!
//! The interpreter reads whitespace-separated tokens and executes them against
//! a data stack, a word dictionary and a 256-cell memory whose cell 0 holds
//! BASE. Callers split input into tokens; the core never sees raw lines.
//!
//! # Modules
//!
//! - `interpreter`: the token-dispatch state machine ([`Forth`], [`Mode`])
//! - `dictionary`: word name to builtin or recorded definition
//! - `builtins`: declared-arity host words and the standard operator set
//! - `stack`: the data stack
//! - `memory`: range-checked cell memory
//! - `format`: BASE-aware number parsing and rendering
//! - `config`: interpreter tunables
//! - `error`: [`ForthError`]
//!
//! # Example
//!
//! ```
//! use toyforth_core::Forth;
//!
//! let mut forth = Forth::new(Vec::new()).unwrap();
//! forth.execute_line(": SQUARE DUP * ; 7 SQUARE .").unwrap();
//! assert_eq!(forth.output().as_slice(), b"49 ");
//! ```

pub mod builtins;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod format;
pub mod interpreter;
pub mod memory;
pub mod stack;

/// The single runtime datum
pub type Cell = i64;

pub use builtins::{Arity, Builtin, Flow, Op, register_builtins};
pub use config::InterpreterConfig;
pub use dictionary::{Dictionary, Entry};
pub use error::{ForthError, Result};
pub use format::{format_cell, parse_cell};
pub use interpreter::{BOOTSTRAP, Forth, Mode};
pub use memory::{BASE_ADDR, MEMORY_CELLS, Memory};
pub use stack::Stack;
