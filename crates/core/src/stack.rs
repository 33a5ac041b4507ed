//! The data stack
//!
//! A LIFO of cells, the only way words pass data to each other. Operations
//! that can fail check first and mutate second, so an underflow never leaves
//! the stack half-consumed.

use crate::Cell;
use crate::error::{ForthError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack {
    cells: Vec<Cell>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: Cell) {
        self.cells.push(value);
    }

    /// Pop the top cell, naming `word` in the underflow error
    ///
    /// Builtins check arity up front and go through [`Stack::top`] instead;
    /// this is for hosts pulling results off the stack after a run.
    pub fn pop(&mut self, word: &str) -> Result<Cell> {
        self.cells.pop().ok_or_else(|| underflow(word))
    }

    /// Borrow the top `n` cells in push order (deepest first)
    ///
    /// Stack effect is not applied; pair with [`Stack::replace_top`].
    pub fn top(&self, n: usize, word: &str) -> Result<&[Cell]> {
        let len = self.cells.len();
        if n > len {
            return Err(underflow(word));
        }
        Ok(&self.cells[len - n..])
    }

    /// Drop the top `n` cells and push `results` in order
    ///
    /// Callers must have checked depth with [`Stack::top`] first.
    pub fn replace_top(&mut self, n: usize, results: &[Cell]) {
        let keep = self.cells.len().saturating_sub(n);
        self.cells.truncate(keep);
        self.cells.extend_from_slice(results);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Cells bottom to top
    pub fn as_slice(&self) -> &[Cell] {
        &self.cells
    }
}

fn underflow(word: &str) -> ForthError {
    ForthError::StackUnderflow {
        word: word.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_lifo() {
        let mut stack = Stack::new();
        stack.push(1);
        stack.push(2);
        stack.push(3);
        assert_eq!(stack.pop("t").unwrap(), 3);
        assert_eq!(stack.pop("t").unwrap(), 2);
        assert_eq!(stack.as_slice(), &[1]);
    }

    #[test]
    fn test_pop_empty_is_underflow() {
        let mut stack = Stack::new();
        assert_eq!(
            stack.pop("DROP"),
            Err(ForthError::StackUnderflow {
                word: "DROP".to_string()
            })
        );
        assert!(stack.is_empty());
    }

    #[test]
    fn test_top_returns_push_order() {
        let mut stack = Stack::new();
        for v in [10, 20, 30] {
            stack.push(v);
        }
        assert_eq!(stack.top(2, "t").unwrap(), &[20, 30]);
        assert_eq!(stack.top(0, "t").unwrap(), &[] as &[Cell]);
        assert!(stack.top(4, "t").is_err());
        // Peeking consumes nothing
        assert_eq!(stack.len(), 3);
    }

    #[test]
    fn test_replace_top() {
        let mut stack = Stack::new();
        for v in [1, 2, 3] {
            stack.push(v);
        }
        stack.replace_top(2, &[9]);
        assert_eq!(stack.as_slice(), &[1, 9]);
        stack.replace_top(1, &[]);
        assert_eq!(stack.as_slice(), &[1]);
        stack.replace_top(0, &[4, 5]);
        assert_eq!(stack.as_slice(), &[1, 4, 5]);
    }
}
