//! Function plotting.
//!
//! Expressions are parsed into an explicit tree over a closed set of operators,
//! functions and names, then evaluated at evenly spaced sample points. Nothing
//! outside that set can be expressed, let alone executed.

mod expr;
mod lexer;
mod parser;
mod sampler;

pub use expr::{BinaryOperator, Expr, Function};
pub use sampler::{DEFAULT_SAMPLES, Plot, Plotter};

use thiserror::Error;

/// Why a plot request was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlotFault {
    #[error("Enter a function")]
    Empty,
    #[error("Syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },
    #[error("'{0}' is not allowed; use x, pi, sin, cos, tan, log or exp")]
    DisallowedIdentifier(String),
    #[error("X min must be less than X max (got {xmin} and {xmax})")]
    DegenerateRange { xmin: f64, xmax: f64 },
    #[error("Function is undefined or infinite at x = {x}")]
    NonFinite { x: f64 },
    #[error("At least 2 samples are required, got {0}")]
    InvalidSampleCount(usize),
}
