//! Expression tree for single-variable functions.

use super::PlotFault;
use super::parser::Parser;

/// Named functions a plot expression may call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    /// Natural logarithm.
    Log,
    Exp,
}

impl Function {
    /// Look up a whitelisted function name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(Self::Sin),
            "cos" => Some(Self::Cos),
            "tan" => Some(Self::Tan),
            "log" => Some(Self::Log),
            "exp" => Some(Self::Exp),
            _ => None,
        }
    }

    fn apply(self, value: f64) -> f64 {
        match self {
            Self::Sin => value.sin(),
            Self::Cos => value.cos(),
            Self::Tan => value.tan(),
            Self::Log => value.ln(),
            Self::Exp => value.exp(),
        }
    }
}

/// Infix operators of plot expressions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    /// `**` or `^`, right-associative.
    Power,
}

/// A parsed expression over the variable `x`.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable,
    Negate(Box<Expr>),
    Binary {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        function: Function,
        argument: Box<Expr>,
    },
}

impl Expr {
    /// Parse expression text. Only `x`, `pi`/`π`, the whitelisted functions,
    /// numbers, `+ - * / ** ^` and parentheses are accepted.
    pub fn parse(source: &str) -> Result<Self, PlotFault> {
        Parser::new(source)?.parse()
    }

    /// Evaluate at `x`. Non-finite results are returned as-is; the sampler decides
    /// what to do with them.
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Self::Number(value) => *value,
            Self::Variable => x,
            Self::Negate(inner) => -inner.eval(x),
            Self::Binary { op, left, right } => {
                let l = left.eval(x);
                let r = right.eval(x);
                match op {
                    BinaryOperator::Add => l + r,
                    BinaryOperator::Subtract => l - r,
                    BinaryOperator::Multiply => l * r,
                    BinaryOperator::Divide => l / r,
                    BinaryOperator::Power => power(l, r),
                }
            }
            Self::Call { function, argument } => function.apply(argument.eval(x)),
        }
    }
}

/// Small integral exponents use repeated multiplication so `x**2` is exactly `x*x`.
fn power(base: f64, exponent: f64) -> f64 {
    if exponent.fract() == 0.0 && exponent.abs() <= 64.0 {
        base.powi(exponent as i32)
    } else {
        base.powf(exponent)
    }
}
