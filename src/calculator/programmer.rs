//! Chained 32-bit integer calculator with base conversion and bitwise operators.
//!
//! Every value is a 32-bit two's-complement integer and arithmetic wraps. Decimal
//! renders the signed value; binary, octal and hex render the unsigned bit pattern,
//! so `NOT 0` shows as `-1` in DEC and `FFFFFFFF` in HEX.

use std::str::FromStr;

use tracing::{debug, trace, warn};

use super::base::{Base, WORD_BITS, bit_pattern};
use super::display::DisplayState;
use super::error::{ArithmeticFault, UnknownKey};
use super::state::{CalculatorState, PendingOperation};

/// Wrapping 32-bit arithmetic operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    /// Truncates toward zero.
    Divide,
    /// Remainder with the sign of the dividend.
    Modulo,
}

/// Bitwise and shift operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitwiseOp {
    And,
    Or,
    Xor,
    /// Unary; applied to the current operand immediately.
    Not,
    ShiftLeft,
    /// Arithmetic (sign-preserving) shift.
    ShiftRight,
}

/// Operator stored in a pending programmer operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntegerOp {
    Arithmetic(ArithmeticOp),
    Bitwise(BitwiseOp),
}

impl IntegerOp {
    /// Keypad label, used when showing the pending operation.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Arithmetic(ArithmeticOp::Add) => "+",
            Self::Arithmetic(ArithmeticOp::Subtract) => "-",
            Self::Arithmetic(ArithmeticOp::Multiply) => "*",
            Self::Arithmetic(ArithmeticOp::Divide) => "/",
            Self::Arithmetic(ArithmeticOp::Modulo) => "MOD",
            Self::Bitwise(BitwiseOp::And) => "AND",
            Self::Bitwise(BitwiseOp::Or) => "OR",
            Self::Bitwise(BitwiseOp::Xor) => "XOR",
            Self::Bitwise(BitwiseOp::Not) => "NOT",
            Self::Bitwise(BitwiseOp::ShiftLeft) => "<<",
            Self::Bitwise(BitwiseOp::ShiftRight) => ">>",
        }
    }

    fn apply(self, left: i32, right: i32) -> Result<i32, ArithmeticFault> {
        let value = match self {
            Self::Arithmetic(op) => match op {
                ArithmeticOp::Add => left.wrapping_add(right),
                ArithmeticOp::Subtract => left.wrapping_sub(right),
                ArithmeticOp::Multiply => left.wrapping_mul(right),
                ArithmeticOp::Divide | ArithmeticOp::Modulo if right == 0 => {
                    return Err(ArithmeticFault::DivisionByZero);
                }
                ArithmeticOp::Divide => left.wrapping_div(right),
                ArithmeticOp::Modulo => left.wrapping_rem(right),
            },
            Self::Bitwise(op) => match op {
                BitwiseOp::And => left & right,
                BitwiseOp::Or => left | right,
                BitwiseOp::Xor => left ^ right,
                BitwiseOp::Not => !left,
                BitwiseOp::ShiftLeft | BitwiseOp::ShiftRight if right < 0 => {
                    return Err(ArithmeticFault::Domain("negative shift count".to_string()));
                }
                BitwiseOp::ShiftLeft => left.checked_shl(right as u32).unwrap_or(0),
                BitwiseOp::ShiftRight => left
                    .checked_shr(right as u32)
                    .unwrap_or(if left < 0 { -1 } else { 0 }),
            },
        };
        Ok(value)
    }
}

/// A button press on the programmer keypad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgrammerKey {
    Digit(char),
    Arithmetic(ArithmeticOp),
    Bitwise(BitwiseOp),
    Evaluate,
    Base(Base),
    Clear,
}

impl FromStr for ProgrammerKey {
    type Err = UnknownKey;

    /// Single characters are digits, so `C` is the hex digit; clear is `CLR`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(ch), None) = (chars.next(), chars.next())
            && ch.is_ascii_hexdigit()
        {
            return Ok(Self::Digit(ch.to_ascii_uppercase()));
        }
        if let Ok(base) = s.parse::<Base>() {
            return Ok(Self::Base(base));
        }

        let key = match s.to_ascii_uppercase().as_str() {
            "+" => Self::Arithmetic(ArithmeticOp::Add),
            "-" => Self::Arithmetic(ArithmeticOp::Subtract),
            "*" => Self::Arithmetic(ArithmeticOp::Multiply),
            "/" => Self::Arithmetic(ArithmeticOp::Divide),
            "MOD" | "%" => Self::Arithmetic(ArithmeticOp::Modulo),
            "AND" | "&" => Self::Bitwise(BitwiseOp::And),
            "OR" | "|" => Self::Bitwise(BitwiseOp::Or),
            "XOR" | "^" => Self::Bitwise(BitwiseOp::Xor),
            "NOT" | "~" => Self::Bitwise(BitwiseOp::Not),
            "<<" => Self::Bitwise(BitwiseOp::ShiftLeft),
            ">>" => Self::Bitwise(BitwiseOp::ShiftRight),
            "=" => Self::Evaluate,
            "CLR" | "CLEAR" => Self::Clear,
            _ => return Err(UnknownKey(s.to_string())),
        };
        Ok(key)
    }
}

/// Programmer calculator engine.
#[derive(Clone, Debug, Default)]
pub struct ProgrammerEngine {
    state: CalculatorState<IntegerOp, i32>,
    base: Base,
    error: Option<String>,
}

impl ProgrammerEngine {
    /// A cleared engine in decimal mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// A cleared engine starting in `base`.
    pub fn with_base(base: Base) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &CalculatorState<IntegerOp, i32> {
        &self.state
    }

    /// Operand text in the active base.
    pub fn current(&self) -> &str {
        &self.state.current
    }

    pub fn pending(&self) -> Option<&PendingOperation<IntegerOp>> {
        self.state.pending.as_ref()
    }

    /// Base used for digit entry and rendering.
    pub fn base(&self) -> Base {
        self.base
    }

    /// Dispatch a keypad press to the matching operation.
    pub fn press(&mut self, key: ProgrammerKey) -> Result<(), ArithmeticFault> {
        match key {
            ProgrammerKey::Digit(ch) => {
                self.enter_digit(ch);
                Ok(())
            }
            ProgrammerKey::Arithmetic(op) => self.set_arithmetic_operator(op),
            ProgrammerKey::Bitwise(op) => self.set_bitwise_operator(op),
            ProgrammerKey::Evaluate => self.evaluate(),
            ProgrammerKey::Base(base) => {
                self.change_base(base);
                Ok(())
            }
            ProgrammerKey::Clear => {
                self.clear();
                Ok(())
            }
        }
    }

    /// Append a digit of the active base to the current operand.
    ///
    /// Digits outside the base alphabet, and digits that would push the operand
    /// past 32 bits, are rejected and `false` is returned.
    pub fn enter_digit(&mut self, ch: char) -> bool {
        self.error = None;
        let digit = ch.to_ascii_uppercase();
        if !self.base.accepts(digit) {
            trace!(%ch, base = %self.base, "rejected digit");
            return false;
        }

        let current = &self.state.current;
        let candidate = if current.is_empty() || current == "0" {
            digit.to_string()
        } else {
            format!("{current}{digit}")
        };
        if self.base.parse(&candidate).is_err() {
            trace!(%candidate, "operand would exceed {} bits", WORD_BITS);
            return false;
        }
        self.state.current = candidate;
        true
    }

    pub fn set_arithmetic_operator(&mut self, op: ArithmeticOp) -> Result<(), ArithmeticFault> {
        self.record(IntegerOp::Arithmetic(op))
    }

    /// Record a bitwise operator. `NOT` is unary and applies to the current operand at once.
    pub fn set_bitwise_operator(&mut self, op: BitwiseOp) -> Result<(), ArithmeticFault> {
        match op {
            BitwiseOp::Not => self.apply_not(),
            _ => self.record(IntegerOp::Bitwise(op)),
        }
    }

    /// Resolve the pending operation against the current operand.
    pub fn evaluate(&mut self) -> Result<(), ArithmeticFault> {
        self.error = None;
        let Some(pending) = self.state.pending.as_ref() else {
            return Ok(());
        };
        if self.state.current.is_empty() {
            return Ok(());
        }

        let base = self.base;
        let outcome = base.parse(&pending.left).and_then(|left| {
            base.parse(&self.state.current)
                .and_then(|right| pending.operator.apply(left, right))
        });
        let value = self.guard(outcome)?;
        debug!(result = value, base = %base, "evaluated");
        self.state.complete(base.render(value), value);
        Ok(())
    }

    /// The 32-bit pattern of the displayed value, grouped into bytes.
    pub fn bit_preview(&self) -> String {
        let value = self.base.parse(self.state.visible_operand()).unwrap_or(0);
        bit_pattern(value)
    }

    /// Switch the active base, re-rendering the current and pending operands.
    pub fn change_base(&mut self, new_base: Base) {
        self.error = None;
        let old_base = self.base;
        let reinterpret = |text: &mut String| {
            if let Ok(value) = old_base.parse(text) {
                *text = new_base.render(value);
            }
        };

        reinterpret(&mut self.state.current);
        if let Some(pending) = self.state.pending.as_mut() {
            reinterpret(&mut pending.left);
        }
        self.base = new_base;
        debug!(from = %old_base, to = %new_base, "base changed");
    }

    /// Reset to the initial state. The active base is kept.
    pub fn clear(&mut self) {
        self.state.reset();
        self.error = None;
    }

    pub fn display_state(&self) -> DisplayState {
        DisplayState {
            text: self.state.visible_operand().to_string(),
            pending: self
                .state
                .pending
                .as_ref()
                .map(|p| format!("{} {}", p.left, p.operator.symbol())),
            indicator: Some(self.base.label().to_string()),
            bits: Some(self.bit_preview()),
            error: self.error.clone(),
        }
    }

    fn record(&mut self, op: IntegerOp) -> Result<(), ArithmeticFault> {
        self.error = None;
        if self.state.pending.is_some() && !self.state.current.is_empty() {
            self.evaluate()?;
        }
        self.state.record(op);
        debug!(operator = op.symbol(), "operator recorded");
        Ok(())
    }

    fn apply_not(&mut self) -> Result<(), ArithmeticFault> {
        self.error = None;
        if self.state.current.is_empty() {
            return Ok(());
        }
        let outcome = self.base.parse(&self.state.current).map(|value| !value);
        let value = self.guard(outcome)?;
        self.state.current = self.base.render(value);
        self.state.last_result = value;
        Ok(())
    }

    fn guard(&mut self, outcome: Result<i32, ArithmeticFault>) -> Result<i32, ArithmeticFault> {
        outcome.map_err(|fault| {
            warn!(%fault, "programmer calculation failed");
            self.state.reset();
            self.error = Some(fault.to_string());
            fault
        })
    }
}
