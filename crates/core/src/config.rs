//! Interpreter configuration

use crate::error::{ForthError, Result};

/// Default limit on nested definition replay
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Smallest accepted limit; `HEX` and `DECIMAL` call `BASE` one level down
pub const MIN_MAX_DEPTH: usize = 2;

/// Largest accepted limit. Each replay level costs four host stack frames;
/// this many levels stay well inside an 8 MiB main-thread stack in release
/// builds.
pub const MAX_MAX_DEPTH: usize = 1024;

/// Tunables for a [`crate::Forth`] instance
///
/// # Example
///
/// ```
/// use toyforth_core::{Forth, InterpreterConfig};
///
/// let config = InterpreterConfig::new().with_max_depth(64);
/// let forth = Forth::with_config(Vec::new(), config).unwrap();
/// assert_eq!(forth.config().max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// How deeply definitions may invoke one another before execution is
    /// aborted with `RecursionLimit`. Guards the host stack against words
    /// that call themselves without end. Must lie in
    /// `MIN_MAX_DEPTH..=MAX_MAX_DEPTH`.
    pub max_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl InterpreterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Reject settings the interpreter cannot run with
    ///
    /// Called by [`crate::Forth::with_config`].
    pub fn validate(&self) -> Result<()> {
        if !(MIN_MAX_DEPTH..=MAX_MAX_DEPTH).contains(&self.max_depth) {
            return Err(ForthError::InvalidConfig(format!(
                "max_depth must be between {} and {}, got {}",
                MIN_MAX_DEPTH, MAX_MAX_DEPTH, self.max_depth
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(InterpreterConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_depth_bounds_are_inclusive() {
        for depth in [MIN_MAX_DEPTH, MAX_MAX_DEPTH] {
            let config = InterpreterConfig::new().with_max_depth(depth);
            assert_eq!(config.validate(), Ok(()), "{}", depth);
        }
    }

    #[test]
    fn test_depth_out_of_bounds_is_rejected() {
        for depth in [0, 1, MAX_MAX_DEPTH + 1, 10_000_000] {
            let config = InterpreterConfig::new().with_max_depth(depth);
            match config.validate() {
                Err(ForthError::InvalidConfig(msg)) => {
                    assert!(msg.contains("max_depth"), "{}", msg)
                }
                other => panic!("Expected InvalidConfig for {}, got {:?}", depth, other),
            }
        }
    }
}
