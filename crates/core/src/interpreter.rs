//! Token-dispatch state machine
//!
//! [`Forth`] owns all interpreter state and consumes one token at a time. What
//! a token means depends on the current [`Mode`]:
//!
//! - `Interpret`: run a word, push a number, or act on a syntax word
//!   (`:` `(` `."` `SEE` `!` `@` `.`)
//! - `Definition`: the token names the word being defined
//! - `Compile`: tokens are recorded until `;`
//! - `Comment`: tokens are skipped until `)`
//! - `PrintLiteral`: tokens are collected until one ends in `"`
//! - `Inspect`: the token names a word to describe
//!
//! The mode survives between calls to [`Forth::execute`], so a definition,
//! comment or literal may span several lines of input. Batch callers use
//! [`Forth::finish`] to reject input that ends with one still open.
//!
//! Execution stops at the first failing token. Nothing is rolled back: stack
//! and memory changes made by earlier tokens stay visible. A failing token
//! itself consumes nothing from the stack.

use crate::builtins::{Flow, register_builtins};
use crate::config::InterpreterConfig;
use crate::dictionary::{Dictionary, Entry};
use crate::error::{ForthError, Result};
use crate::format::{format_cell, parse_cell};
use crate::memory::Memory;
use crate::stack::Stack;
use std::io::Write;
use tracing::{debug, trace};

const DEFINE: &str = ":";
const END_DEFINE: &str = ";";
const COMMENT_OPEN: &str = "(";
const COMMENT_CLOSE: &str = ")";
const PRINT_LITERAL: &str = ".\"";
const LITERAL_CLOSE: char = '"';
const INSPECT: &str = "SEE";
const STORE: &str = "!";
const FETCH: &str = "@";
const PRINT: &str = ".";

/// Run by every new interpreter before it accepts input
///
/// Later input relies on BASE already holding 10. Bodies are reparsed in
/// whatever BASE is current when they run, so every literal carries the `#`
/// decimal prefix.
pub const BOOTSTRAP: &str = "
: BASE #0 ;
: CR #13 EMIT #10 EMIT ;
: HEX #16 BASE ! ;
: DECIMAL #10 BASE ! ;
DECIMAL
";

/// State of the dispatch machine, with the data each state accumulates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Interpret,
    /// After `:`, waiting for the new word's name
    Definition,
    /// Recording the body of `name`
    Compile { name: String, body: Vec<String> },
    /// Inside `( ... )`
    Comment,
    /// Inside `." ... "`
    PrintLiteral { words: Vec<String> },
    /// After `SEE`, waiting for a word name
    Inspect,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Interpret => "interpret",
            Mode::Definition => "definition",
            Mode::Compile { .. } => "compile",
            Mode::Comment => "comment",
            Mode::PrintLiteral { .. } => "print literal",
            Mode::Inspect => "inspect",
        }
    }
}

/// A complete interpreter: stack, memory, dictionary, mode and output sink
pub struct Forth<W: Write> {
    stack: Stack,
    memory: Memory,
    dictionary: Dictionary,
    mode: Mode,
    out: W,
    config: InterpreterConfig,
    /// Current definition replay nesting
    depth: usize,
    halted: bool,
}

impl<W: Write> Forth<W> {
    /// Create an interpreter writing to `out`, with builtins registered and
    /// the bootstrap words defined
    pub fn new(out: W) -> Result<Self> {
        Self::with_config(out, InterpreterConfig::default())
    }

    /// Fails with `InvalidConfig` before doing anything else if `config` does
    /// not validate
    pub fn with_config(out: W, config: InterpreterConfig) -> Result<Self> {
        config.validate()?;

        let mut dictionary = Dictionary::new();
        register_builtins(&mut dictionary);

        let mut forth = Forth {
            stack: Stack::new(),
            memory: Memory::new(),
            dictionary,
            mode: Mode::Interpret,
            out,
            config,
            depth: 0,
            halted: false,
        };
        forth.execute_line(BOOTSTRAP)?;
        debug!(words = forth.dictionary.len(), "interpreter ready");
        Ok(forth)
    }

    /// Split `line` on whitespace and execute the tokens
    pub fn execute_line(&mut self, line: &str) -> Result<()> {
        self.execute(line.split_whitespace())
    }

    /// Execute tokens in order, stopping at the first failure or at `BYE`
    pub fn execute<I, S>(&mut self, tokens: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for token in tokens {
            if self.halted {
                break;
            }
            let token = token.as_ref();
            trace!(token, mode = self.mode.name(), depth = self.depth, "dispatch");
            if let Err(e) = self.step(token) {
                if self.depth == 0 {
                    debug!(token, error = %e, "execution aborted");
                }
                return Err(e);
            }
        }
        Ok(())
    }

    /// Fail if the input ended with a definition, comment, literal or `SEE`
    /// still open
    pub fn finish(&self) -> Result<()> {
        match self.mode {
            Mode::Interpret => Ok(()),
            ref open => Err(ForthError::Unterminated(open.name())),
        }
    }

    /// Clear the stack and abandon any open construct; words and memory stay
    pub fn reset(&mut self) {
        self.stack.clear();
        self.mode = Mode::Interpret;
        self.depth = 0;
        self.halted = false;
    }

    fn step(&mut self, token: &str) -> Result<()> {
        // Every arm that stays out of Interpret puts its mode back
        match std::mem::take(&mut self.mode) {
            Mode::Interpret => self.interpret(token),
            Mode::Definition => {
                self.mode = Mode::Compile {
                    name: token.to_string(),
                    body: Vec::new(),
                };
                Ok(())
            }
            Mode::Compile { name, mut body } => match token {
                // The open definition is abandoned
                DEFINE => Err(ForthError::NestedDefinition),
                END_DEFINE => {
                    self.dictionary.define_tokens(name, body);
                    Ok(())
                }
                _ => {
                    body.push(token.to_string());
                    self.mode = Mode::Compile { name, body };
                    Ok(())
                }
            },
            Mode::Comment => {
                if token != COMMENT_CLOSE {
                    self.mode = Mode::Comment;
                }
                Ok(())
            }
            Mode::PrintLiteral { mut words } => match token.strip_suffix(LITERAL_CLOSE) {
                Some(last) => {
                    words.push(last.to_string());
                    let text = words.join(" ");
                    self.write_text(&text)
                }
                None => {
                    words.push(token.to_string());
                    self.mode = Mode::PrintLiteral { words };
                    Ok(())
                }
            },
            Mode::Inspect => match self.dictionary.lookup(token) {
                Some(entry) => {
                    let text = format!("{} ", entry.describe(token));
                    self.write_text(&text)
                }
                None => Err(ForthError::UnknownToken(token.to_string())),
            },
        }
    }

    fn interpret(&mut self, token: &str) -> Result<()> {
        if let Some(entry) = self.dictionary.lookup(token) {
            let entry = entry.clone();
            return self.invoke(token, &entry);
        }

        if let Some(value) = parse_cell(token, self.memory.base()) {
            self.stack.push(value);
            return Ok(());
        }

        match token {
            DEFINE => self.mode = Mode::Definition,
            COMMENT_OPEN => self.mode = Mode::Comment,
            PRINT_LITERAL => self.mode = Mode::PrintLiteral { words: Vec::new() },
            INSPECT => self.mode = Mode::Inspect,
            STORE => return self.store(),
            FETCH => return self.fetch(),
            PRINT => return self.print(),
            _ => return Err(ForthError::UnknownToken(token.to_string())),
        }
        Ok(())
    }

    /// Run a dictionary entry; definitions replay through [`Forth::execute`]
    /// and resolve names against the dictionary as it is now
    fn invoke(&mut self, name: &str, entry: &Entry) -> Result<()> {
        match entry {
            Entry::Builtin(builtin) => {
                let flow = builtin.invoke(name, &mut self.stack, &mut self.out)?;
                self.out.flush()?;
                if flow == Flow::Halt {
                    debug!(word = name, "halt requested");
                    self.halted = true;
                }
                Ok(())
            }
            Entry::Definition(body) => {
                if self.depth >= self.config.max_depth {
                    return Err(ForthError::RecursionLimit(self.config.max_depth));
                }
                self.depth += 1;
                let result = self.execute(body.iter());
                self.depth -= 1;
                result
            }
        }
    }

    /// `!` ( value addr -- )
    fn store(&mut self) -> Result<()> {
        let cells = self.stack.top(2, STORE)?;
        let (value, addr) = (cells[0], cells[1]);
        self.memory.store(addr, value)?;
        self.stack.replace_top(2, &[]);
        Ok(())
    }

    /// `@` ( addr -- value )
    fn fetch(&mut self) -> Result<()> {
        let addr = self.stack.top(1, FETCH)?[0];
        let value = self.memory.fetch(addr)?;
        self.stack.replace_top(1, &[value]);
        Ok(())
    }

    /// `.` ( n -- ) renders in BASE followed by one space
    fn print(&mut self) -> Result<()> {
        let value = self.stack.top(1, PRINT)?[0];
        let text = format!("{} ", format_cell(value, self.memory.base()));
        self.write_text(&text)?;
        self.stack.replace_top(1, &[]);
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// For hosts that feed arguments in or take results out between lines
    pub fn stack_mut(&mut self) -> &mut Stack {
        &mut self.stack
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Mutable access for hosts registering extra builtins
    pub fn dictionary_mut(&mut self) -> &mut Dictionary {
        &mut self.dictionary
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// True once `BYE` has run; further tokens are ignored until [`Forth::reset`]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }
}
