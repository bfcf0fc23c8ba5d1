//! Calculator engines for the scientific and programmer modes.
//!
//! This module provides:
//! - Numeric bases and 32-bit rendering rules
//! - The chained real-number (scientific) engine
//! - The chained fixed-width integer (programmer) engine
//! - Display state and number formatting shared by every mode
//! - Copying the display to the clipboard

mod base;
mod clipboard;
mod display;
mod error;
mod programmer;
mod scientific;
mod state;

pub use base::{Base, WORD_BITS, bit_pattern};
pub use clipboard::{copy_display, copy_to_clipboard};
pub use display::{DisplayState, format_number, group_digits};
pub use error::{ArithmeticFault, UnknownKey};
pub use programmer::{ArithmeticOp, BitwiseOp, IntegerOp, ProgrammerEngine, ProgrammerKey};
pub use scientific::{
    AngleMode, BinaryOp, Constant, ScientificEngine, ScientificKey, TrigFn, UnaryFn,
};
pub use state::{CalculatorState, PendingOperation};
