//! Faults raised by the calculator engines.

use thiserror::Error;

/// An arithmetic failure inside the scientific or programmer engine.
///
/// Reported to the caller and shown as an error banner; the engine that
/// produced it has already been reset to its initial state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArithmeticFault {
    /// Division or modulo by zero, or zero raised to a negative power.
    #[error("Division by zero!")]
    DivisionByZero,
    /// Operand outside the function's domain, e.g. the log of a negative number.
    #[error("Invalid input: {0}")]
    Domain(String),
    /// A real result that is not finite.
    #[error("Result is too large to display")]
    Overflow,
    /// Operand text that does not parse in the active base.
    #[error("Invalid number for current base: '{0}'")]
    InvalidOperand(String),
}

/// A key label that does not name any button of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown key '{0}'")]
pub struct UnknownKey(pub String);
