//! Fixed-size addressable cell memory
//!
//! Cell 0 holds BASE, the radix used to parse and print numbers.

use crate::Cell;
use crate::error::{ForthError, Result};

/// Number of addressable cells
pub const MEMORY_CELLS: usize = 256;

/// Address of the BASE cell
pub const BASE_ADDR: Cell = 0;

/// Range-checked cell memory, zero-initialised
#[derive(Debug, Clone)]
pub struct Memory {
    cells: [Cell; MEMORY_CELLS],
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            cells: [0; MEMORY_CELLS],
        }
    }

    /// Map a cell to an index, rejecting negatives and addresses past the end
    fn index(addr: Cell) -> Result<usize> {
        usize::try_from(addr)
            .ok()
            .filter(|&i| i < MEMORY_CELLS)
            .ok_or(ForthError::AddressOutOfRange(addr))
    }

    /// Read the cell at `addr`
    pub fn fetch(&self, addr: Cell) -> Result<Cell> {
        Ok(self.cells[Self::index(addr)?])
    }

    /// Write `value` into the cell at `addr`
    pub fn store(&mut self, addr: Cell, value: Cell) -> Result<()> {
        self.cells[Self::index(addr)?] = value;
        Ok(())
    }

    /// Current numeric radix
    pub fn base(&self) -> Cell {
        self.cells[BASE_ADDR as usize]
    }

    pub fn as_slice(&self) -> &[Cell] {
        &self.cells
    }
}
