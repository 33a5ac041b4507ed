//! Builtin words
//!
//! Every builtin declares its stack effect up front as an [`Arity`]: how many
//! cells it consumes and how many it produces. The interpreter checks the
//! declared depth before anything is popped, hands the operands to the op in
//! push order (so `a b -` sees `[a, b]`), and only replaces them with the
//! results once the op succeeds. A failing builtin leaves the stack as it was.
//!
//! # Arithmetic
//!
//! Integer arithmetic wraps on overflow, matching Forth. Division is
//! **floored**: the quotient rounds toward negative infinity and the
//! remainder takes the sign of the divisor.
//!
//! | expression  | result      |
//! |-------------|-------------|
//! | `7 2 /MOD`  | `1 3`       |
//! | `-7 2 /MOD` | `1 -4`      |
//! | `7 -2 /MOD` | `-1 -4`     |
//!
//! `/MOD` leaves the remainder below the quotient (quotient on top).

use crate::Cell;
use crate::dictionary::Dictionary;
use crate::error::{ForthError, Result};
use crate::stack::Stack;
use std::fmt;
use std::io::{self, Read, Write};

/// Declared stack effect of a builtin: `( inputs -- outputs )`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub inputs: usize,
    pub outputs: usize,
}

impl Arity {
    pub const fn new(inputs: usize, outputs: usize) -> Self {
        Arity { inputs, outputs }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "( {} -- {} )", self.inputs, self.outputs)
    }
}

/// What the interpreter should do after a builtin returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Stop executing; the host should end the session
    Halt,
}

/// The host behaviour behind a builtin
#[derive(Clone, Copy)]
pub enum Op {
    /// Pure stack transformation: operands in, results out
    Pure(fn(&[Cell]) -> Result<Vec<Cell>>),
    /// Consumes its operands and acts on the output sink; produces no cells
    Effect(fn(&[Cell], &mut dyn Write) -> Result<Flow>),
}

impl fmt::Debug for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Pure(_) => write!(f, "Op::Pure"),
            Op::Effect(_) => write!(f, "Op::Effect"),
        }
    }
}

/// A host word with its declared stack effect
#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    arity: Arity,
    op: Op,
}

impl Builtin {
    /// Effects always produce zero cells regardless of the declared outputs.
    pub fn new(arity: Arity, op: Op) -> Self {
        let arity = match op {
            Op::Pure(_) => arity,
            Op::Effect(_) => Arity::new(arity.inputs, 0),
        };
        Builtin { arity, op }
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Run the builtin against `stack`, writing any output to `out`
    pub fn invoke(&self, name: &str, stack: &mut Stack, out: &mut dyn Write) -> Result<Flow> {
        let args = stack.top(self.arity.inputs, name)?;
        match self.op {
            Op::Pure(f) => {
                let results = f(args)?;
                debug_assert_eq!(
                    results.len(),
                    self.arity.outputs,
                    "{} produced a different number of cells than declared",
                    name
                );
                stack.replace_top(self.arity.inputs, &results);
                Ok(Flow::Continue)
            }
            Op::Effect(f) => {
                let flow = f(args, out)?;
                stack.replace_top(self.arity.inputs, &[]);
                Ok(flow)
            }
        }
    }
}

/// Register one builtin: `builtin!(dict, "NAME", (in -- out), op)`
macro_rules! builtin {
    ($dict:expr, $name:literal, ($inputs:literal -- $outputs:literal), $op:expr) => {
        $dict.define_builtin($name, Arity::new($inputs, $outputs), $op)
    };
}

/// Install the standard operator set into `dict`
pub fn register_builtins(dict: &mut Dictionary) {
    // Arithmetic
    builtin!(dict, "+", (2 -- 1), Op::Pure(add));
    builtin!(dict, "-", (2 -- 1), Op::Pure(subtract));
    builtin!(dict, "*", (2 -- 1), Op::Pure(multiply));
    builtin!(dict, "/", (2 -- 1), Op::Pure(divide));
    builtin!(dict, "/MOD", (2 -- 2), Op::Pure(divide_modulo));
    builtin!(dict, "MOD", (2 -- 1), Op::Pure(modulo));

    // Stack shuffles
    builtin!(dict, "SWAP", (2 -- 2), Op::Pure(swap));
    builtin!(dict, "DUP", (1 -- 2), Op::Pure(dup));
    builtin!(dict, "OVER", (2 -- 3), Op::Pure(over));
    builtin!(dict, "ROT", (3 -- 3), Op::Pure(rot));
    builtin!(dict, "DROP", (1 -- 0), Op::Pure(drop_top));
    builtin!(dict, "TUCK", (2 -- 3), Op::Pure(tuck));

    // Host effects
    builtin!(dict, "SPACES", (1 -- 0), Op::Effect(spaces));
    builtin!(dict, "EMIT", (1 -- 0), Op::Effect(emit));
    builtin!(dict, "BYE", (0 -- 0), Op::Effect(bye));
}

/// Floored quotient and remainder
///
/// `Cell::MIN / -1` wraps to `Cell::MIN` with remainder 0.
pub fn floored_divmod(n: Cell, d: Cell) -> Result<(Cell, Cell)> {
    if d == 0 {
        return Err(ForthError::DivisionByZero);
    }
    let q = n.wrapping_div(d);
    let r = n.wrapping_rem(d);
    if r != 0 && ((r < 0) != (d < 0)) {
        Ok((q.wrapping_sub(1), r + d))
    } else {
        Ok((q, r))
    }
}

/// Stack effect: ( a b -- a+b )
fn add(args: &[Cell]) -> Result<Vec<Cell>> {
    Ok(vec![args[0].wrapping_add(args[1])])
}

/// Stack effect: ( a b -- a-b )
fn subtract(args: &[Cell]) -> Result<Vec<Cell>> {
    Ok(vec![args[0].wrapping_sub(args[1])])
}

/// Stack effect: ( a b -- a*b )
fn multiply(args: &[Cell]) -> Result<Vec<Cell>> {
    Ok(vec![args[0].wrapping_mul(args[1])])
}

/// Stack effect: ( a b -- a/b )
fn divide(args: &[Cell]) -> Result<Vec<Cell>> {
    let (q, _) = floored_divmod(args[0], args[1])?;
    Ok(vec![q])
}

/// Stack effect: ( a b -- rem quot )
fn divide_modulo(args: &[Cell]) -> Result<Vec<Cell>> {
    let (q, r) = floored_divmod(args[0], args[1])?;
    Ok(vec![r, q])
}

/// Stack effect: ( a b -- rem )
fn modulo(args: &[Cell]) -> Result<Vec<Cell>> {
    let (_, r) = floored_divmod(args[0], args[1])?;
    Ok(vec![r])
}

/// Stack effect: ( a b -- b a )
fn swap(args: &[Cell]) -> Result<Vec<Cell>> {
    Ok(vec![args[1], args[0]])
}

/// Stack effect: ( a -- a a )
fn dup(args: &[Cell]) -> Result<Vec<Cell>> {
    Ok(vec![args[0], args[0]])
}

/// Stack effect: ( a b -- a b a )
fn over(args: &[Cell]) -> Result<Vec<Cell>> {
    Ok(vec![args[0], args[1], args[0]])
}

/// Stack effect: ( a b c -- b c a )
fn rot(args: &[Cell]) -> Result<Vec<Cell>> {
    Ok(vec![args[1], args[2], args[0]])
}

/// Stack effect: ( a -- )
fn drop_top(_: &[Cell]) -> Result<Vec<Cell>> {
    Ok(Vec::new())
}

/// Stack effect: ( a b -- b a b )
fn tuck(args: &[Cell]) -> Result<Vec<Cell>> {
    Ok(vec![args[1], args[0], args[1]])
}

/// Write n spaces; negative counts write nothing
///
/// Stack effect: ( n -- )
fn spaces(args: &[Cell], out: &mut dyn Write) -> Result<Flow> {
    let count = u64::try_from(args[0]).unwrap_or(0);
    io::copy(&mut io::repeat(b' ').take(count), out)?;
    Ok(Flow::Continue)
}

/// Write the character whose code point is on top of the stack
///
/// Stack effect: ( c -- )
fn emit(args: &[Cell], out: &mut dyn Write) -> Result<Flow> {
    let ch = u32::try_from(args[0])
        .ok()
        .and_then(char::from_u32)
        .ok_or(ForthError::InvalidCharacter(args[0]))?;
    write!(out, "{}", ch)?;
    Ok(Flow::Continue)
}

/// Stack effect: ( -- )
fn bye(_: &[Cell], _: &mut dyn Write) -> Result<Flow> {
    Ok(Flow::Halt)
}
