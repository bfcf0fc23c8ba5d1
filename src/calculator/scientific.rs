//! Chained real-number calculator.
//!
//! Operators are evaluated eagerly from left to right with no precedence:
//! pressing `3 + 4 * 2 =` computes `(3 + 4) * 2`.

use std::f64::consts::{E, PI};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::display::{DisplayState, format_number};
use super::error::{ArithmeticFault, UnknownKey};
use super::state::{CalculatorState, PendingOperation};

/// How trigonometric functions interpret their argument.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleMode {
    #[default]
    Degrees,
    Radians,
}

impl AngleMode {
    /// Short indicator shown next to the display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Degrees => "DEG",
            Self::Radians => "RAD",
        }
    }

    fn toggled(self) -> Self {
        match self {
            Self::Degrees => Self::Radians,
            Self::Radians => Self::Degrees,
        }
    }
}

/// Binary operators of the scientific calculator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl BinaryOp {
    /// Symbol used when showing the pending operation, e.g. `7 ×`.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "−",
            Self::Multiply => "×",
            Self::Divide => "÷",
            Self::Power => "^",
        }
    }

    fn apply(self, left: f64, right: f64) -> Result<f64, ArithmeticFault> {
        let value = match self {
            Self::Add => left + right,
            Self::Subtract => left - right,
            Self::Multiply => left * right,
            Self::Divide => {
                if right == 0.0 {
                    return Err(ArithmeticFault::DivisionByZero);
                }
                left / right
            }
            Self::Power => {
                if left == 0.0 && right < 0.0 {
                    return Err(ArithmeticFault::DivisionByZero);
                }
                left.powf(right)
            }
        };
        finite(value, "power of a negative number with a fractional exponent")
    }
}

/// Single-argument functions applied to the current operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryFn {
    /// Fails for negative operands.
    SquareRoot,
    Square,
    /// `1/x`; the reciprocal of zero is zero rather than a fault.
    Reciprocal,
    /// Base-10 logarithm; fails for non-positive operands.
    Log10,
    /// Natural logarithm; fails for non-positive operands.
    Ln,
    /// `e^x`.
    Exp,
}

impl UnaryFn {
    fn apply(self, value: f64) -> Result<f64, ArithmeticFault> {
        let result = match self {
            Self::SquareRoot => {
                if value < 0.0 {
                    return Err(ArithmeticFault::Domain(
                        "square root of a negative number".to_string(),
                    ));
                }
                value.sqrt()
            }
            Self::Square => value * value,
            Self::Reciprocal => {
                if value == 0.0 {
                    0.0
                } else {
                    1.0 / value
                }
            }
            Self::Log10 | Self::Ln => {
                if value <= 0.0 {
                    return Err(ArithmeticFault::Domain(
                        "log of non-positive number".to_string(),
                    ));
                }
                if self == Self::Log10 {
                    value.log10()
                } else {
                    value.ln()
                }
            }
            Self::Exp => value.exp(),
        };
        finite(result, "undefined result")
    }
}

/// Trigonometric functions; the inverse is selected by the command used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrigFn {
    Sin,
    Cos,
    Tan,
}

impl TrigFn {
    fn forward(self, radians: f64) -> f64 {
        match self {
            Self::Sin => radians.sin(),
            Self::Cos => radians.cos(),
            Self::Tan => radians.tan(),
        }
    }

    fn inverse(self, value: f64) -> f64 {
        match self {
            Self::Sin => value.asin(),
            Self::Cos => value.acos(),
            Self::Tan => value.atan(),
        }
    }
}

/// Constants that replace the current operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    fn value(self) -> f64 {
        match self {
            Self::Pi => PI,
            Self::E => E,
        }
    }
}

/// A button press on the scientific keypad.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScientificKey {
    /// `0`-`9` or the decimal point.
    Digit(char),
    Operator(BinaryOp),
    /// `=`
    Evaluate,
    Unary(UnaryFn),
    Trig(TrigFn),
    InverseTrig(TrigFn),
    Constant(Constant),
    /// `+/-`
    ToggleSign,
    /// `%`, divides the current operand by 100.
    Percent,
    ToggleAngleMode,
    Clear,
}

impl FromStr for ScientificKey {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(ch), None) = (chars.next(), chars.next())
            && (ch.is_ascii_digit() || ch == '.')
        {
            return Ok(Self::Digit(ch));
        }

        let key = match s.to_lowercase().as_str() {
            "+" => Self::Operator(BinaryOp::Add),
            "-" | "−" => Self::Operator(BinaryOp::Subtract),
            "*" | "×" => Self::Operator(BinaryOp::Multiply),
            "/" | "÷" => Self::Operator(BinaryOp::Divide),
            "^" | "**" => Self::Operator(BinaryOp::Power),
            "=" => Self::Evaluate,
            "c" | "clr" | "clear" => Self::Clear,
            "+/-" | "±" => Self::ToggleSign,
            "%" => Self::Percent,
            "sqrt" | "√" => Self::Unary(UnaryFn::SquareRoot),
            "x^2" | "x²" => Self::Unary(UnaryFn::Square),
            "1/x" => Self::Unary(UnaryFn::Reciprocal),
            "log" => Self::Unary(UnaryFn::Log10),
            "ln" => Self::Unary(UnaryFn::Ln),
            "e^x" => Self::Unary(UnaryFn::Exp),
            "sin" => Self::Trig(TrigFn::Sin),
            "cos" => Self::Trig(TrigFn::Cos),
            "tan" => Self::Trig(TrigFn::Tan),
            "asin" => Self::InverseTrig(TrigFn::Sin),
            "acos" => Self::InverseTrig(TrigFn::Cos),
            "atan" => Self::InverseTrig(TrigFn::Tan),
            "pi" | "π" => Self::Constant(Constant::Pi),
            "e" => Self::Constant(Constant::E),
            "deg" | "rad" | "deg/rad" => Self::ToggleAngleMode,
            _ => return Err(UnknownKey(s.to_string())),
        };
        Ok(key)
    }
}

/// Scientific calculator engine.
#[derive(Clone, Debug, Default)]
pub struct ScientificEngine {
    state: CalculatorState<BinaryOp>,
    angle_mode: AngleMode,
    error: Option<String>,
}

impl ScientificEngine {
    /// A cleared engine in degrees mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// A cleared engine starting in `angle_mode`.
    pub fn with_angle_mode(angle_mode: AngleMode) -> Self {
        Self {
            angle_mode,
            ..Self::default()
        }
    }

    /// The underlying operand and pending-operation state.
    pub fn state(&self) -> &CalculatorState<BinaryOp> {
        &self.state
    }

    /// Operand text being entered, or the last result.
    pub fn current(&self) -> &str {
        &self.state.current
    }

    /// The operation waiting for its right operand, if any.
    pub fn pending(&self) -> Option<&PendingOperation<BinaryOp>> {
        self.state.pending.as_ref()
    }

    pub fn angle_mode(&self) -> AngleMode {
        self.angle_mode
    }

    /// Dispatch a keypad press to the matching operation.
    pub fn press(&mut self, key: ScientificKey) -> Result<(), ArithmeticFault> {
        match key {
            ScientificKey::Digit(ch) => {
                self.enter_digit(ch);
                Ok(())
            }
            ScientificKey::Operator(op) => self.set_binary_operator(op),
            ScientificKey::Evaluate => self.evaluate(),
            ScientificKey::Unary(f) => self.apply_unary(f),
            ScientificKey::Trig(f) => self.apply_trig(f),
            ScientificKey::InverseTrig(f) => self.apply_inverse_trig(f),
            ScientificKey::Constant(c) => {
                self.insert_constant(c);
                Ok(())
            }
            ScientificKey::ToggleSign => {
                self.toggle_sign();
                Ok(())
            }
            ScientificKey::Percent => self.percent(),
            ScientificKey::ToggleAngleMode => {
                self.toggle_angle_mode();
                Ok(())
            }
            ScientificKey::Clear => {
                self.clear();
                Ok(())
            }
        }
    }

    /// Append a digit or the decimal point to the current operand.
    ///
    /// Returns `false` if the character was rejected.
    pub fn enter_digit(&mut self, ch: char) -> bool {
        self.error = None;
        let current = &mut self.state.current;

        if ch == '.' {
            if current.contains('.') {
                trace!("second decimal point ignored");
                return false;
            }
            if current.is_empty() {
                current.push('0');
            }
            current.push('.');
        } else if ch.is_ascii_digit() {
            if current == "0" {
                *current = ch.to_string();
            } else {
                current.push(ch);
            }
        } else {
            trace!(%ch, "rejected scientific digit");
            return false;
        }
        true
    }

    /// Record a binary operator, first resolving any pending operation.
    pub fn set_binary_operator(&mut self, op: BinaryOp) -> Result<(), ArithmeticFault> {
        self.error = None;
        if self.state.pending.is_some() && !self.state.current.is_empty() {
            self.evaluate()?;
        }
        self.state.record(op);
        debug!(operator = op.symbol(), left = %self.state.visible_operand(), "operator recorded");
        Ok(())
    }

    /// Resolve the pending operation against the current operand.
    ///
    /// Does nothing without a pending operation or right operand.
    pub fn evaluate(&mut self) -> Result<(), ArithmeticFault> {
        self.error = None;
        let Some(pending) = self.state.pending.as_ref() else {
            return Ok(());
        };
        if self.state.current.is_empty() {
            return Ok(());
        }

        let outcome = parse_operand(&pending.left).and_then(|left| {
            parse_operand(&self.state.current).and_then(|right| pending.operator.apply(left, right))
        });
        let value = self.guard(outcome)?;
        debug!(result = value, "evaluated");
        self.state.complete(format_number(value), value);
        Ok(())
    }

    /// Apply a unary function to the current operand.
    pub fn apply_unary(&mut self, f: UnaryFn) -> Result<(), ArithmeticFault> {
        self.transform(|value| f.apply(value))
    }

    /// Apply a forward trig function, converting degrees to radians first in degree mode.
    pub fn apply_trig(&mut self, f: TrigFn) -> Result<(), ArithmeticFault> {
        let mode = self.angle_mode;
        self.transform(|value| {
            let radians = match mode {
                AngleMode::Degrees => value.to_radians(),
                AngleMode::Radians => value,
            };
            finite(f.forward(radians), "trig function is undefined here")
        })
    }

    /// Apply an inverse trig function, converting the result to degrees in degree mode.
    pub fn apply_inverse_trig(&mut self, f: TrigFn) -> Result<(), ArithmeticFault> {
        let mode = self.angle_mode;
        self.transform(|value| {
            let radians = finite(
                f.inverse(value),
                "inverse trig argument must be between -1 and 1",
            )?;
            Ok(match mode {
                AngleMode::Degrees => radians.to_degrees(),
                AngleMode::Radians => radians,
            })
        })
    }

    /// Negate the current operand. No effect on zero or an empty operand.
    pub fn toggle_sign(&mut self) {
        self.error = None;
        let current = &mut self.state.current;
        if current.is_empty() || current == "0" {
            return;
        }
        match current.strip_prefix('-') {
            Some(rest) => *current = rest.to_string(),
            None => current.insert(0, '-'),
        }
    }

    /// Divide the current operand by 100.
    pub fn percent(&mut self) -> Result<(), ArithmeticFault> {
        self.transform(|value| Ok(value / 100.0))
    }

    /// Replace the current operand with a constant.
    pub fn insert_constant(&mut self, constant: Constant) {
        self.error = None;
        self.state.current = format_number(constant.value());
    }

    pub fn toggle_angle_mode(&mut self) {
        self.error = None;
        self.angle_mode = self.angle_mode.toggled();
        debug!(mode = self.angle_mode.label(), "angle mode toggled");
    }

    /// Reset to the initial state. The angle mode is kept.
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
            indicator: Some(self.angle_mode.label().to_string()),
            bits: None,
            error: self.error.clone(),
        }
    }

    fn transform(
        &mut self,
        f: impl FnOnce(f64) -> Result<f64, ArithmeticFault>,
    ) -> Result<(), ArithmeticFault> {
        self.error = None;
        if self.state.current.is_empty() {
            return Ok(());
        }
        let outcome = parse_operand(&self.state.current).and_then(f);
        let value = self.guard(outcome)?;
        self.state.current = format_number(value);
        self.state.last_result = value;
        Ok(())
    }

    /// On a fault, reset like Clear and keep the message for the error banner.
    fn guard(&mut self, outcome: Result<f64, ArithmeticFault>) -> Result<f64, ArithmeticFault> {
        outcome.map_err(|fault| {
            warn!(%fault, "scientific calculation failed");
            self.state.reset();
            self.error = Some(fault.to_string());
            fault
        })
    }
}

fn parse_operand(text: &str) -> Result<f64, ArithmeticFault> {
    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ArithmeticFault::InvalidOperand(text.to_string()))
}

fn finite(value: f64, domain: &str) -> Result<f64, ArithmeticFault> {
    if value.is_nan() {
        Err(ArithmeticFault::Domain(domain.to_string()))
    } else if value.is_infinite() {
        Err(ArithmeticFault::Overflow)
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press_all(engine: &mut ScientificEngine, keys: &str) -> Result<(), ArithmeticFault> {
        for label in keys.split_whitespace() {
            engine.press(label.parse().unwrap())?;
        }
        Ok(())
    }

    fn current_value(engine: &ScientificEngine) -> f64 {
        engine.current().parse().unwrap()
    }

    #[test]
    fn test_digit_entry_replaces_leading_zero() {
        let mut engine = ScientificEngine::new();
        engine.enter_digit('0');
        assert_eq!(engine.current(), "0");
        engine.enter_digit('7');
        engine.enter_digit('5');
        assert_eq!(engine.current(), "75");
    }

    #[test]
    fn test_single_decimal_point() {
        let mut engine = ScientificEngine::new();
        assert!(engine.enter_digit('.'));
        assert!(engine.enter_digit('5'));
        assert!(!engine.enter_digit('.'));
        assert_eq!(engine.current(), "0.5");
        assert!(!engine.enter_digit('A'));
    }

    #[test]
    fn test_decimal_point_after_operator() {
        let mut engine = ScientificEngine::new();
        press_all(&mut engine, "3 + . 5 =").unwrap();
        assert_eq!(engine.current(), "3.5");
    }

    #[test]
    fn test_chained_evaluation_is_left_to_right() {
        let mut engine = ScientificEngine::new();
        press_all(&mut engine, "3 + 4 * 2 =").unwrap();
        assert_eq!(engine.current(), "14");
        assert!(engine.pending().is_none());
    }

    #[test]
    fn test_operator_resolves_pending_before_recording() {
        let mut engine = ScientificEngine::new();
        press_all(&mut engine, "8 - 3 *").unwrap();
        let pending = engine.pending().unwrap();
        assert_eq!(pending.left, "5");
        assert_eq!(pending.operator, BinaryOp::Multiply);
        assert_eq!(engine.display_state().text, "5");
    }

    #[test]
    fn test_operator_replaced_while_right_operand_empty() {
        let mut engine = ScientificEngine::new();
        press_all(&mut engine, "6 + / 3 =").unwrap();
        assert_eq!(engine.current(), "2");
    }

    #[test]
    fn test_evaluate_without_pending_is_noop() {
        let mut engine = ScientificEngine::new();
        press_all(&mut engine, "4 2 =").unwrap();
        assert_eq!(engine.current(), "42");
    }

    #[test]
    fn test_power() {
        let mut engine = ScientificEngine::new();
        press_all(&mut engine, "2 ^ 1 0 =").unwrap();
        assert_eq!(engine.current(), "1024");
    }

    #[test]
    fn test_division_by_zero_resets() {
        let mut engine = ScientificEngine::new();
        let result = press_all(&mut engine, "5 / 0 =");
        assert_eq!(result, Err(ArithmeticFault::DivisionByZero));
        assert_eq!(engine.current(), "0");
        assert!(engine.pending().is_none());

        let display = engine.display_state();
        assert_eq!(display.error.as_deref(), Some("Division by zero!"));

        // Next command clears the banner
        engine.enter_digit('1');
        assert!(!engine.display_state().is_error());
    }

    #[test]
    fn test_fault_in_chained_operator_resets() {
        let mut engine = ScientificEngine::new();
        let result = press_all(&mut engine, "1 / 0 +");
        assert_eq!(result, Err(ArithmeticFault::DivisionByZero));
        assert_eq!(engine.current(), "0");
        assert!(engine.pending().is_none());
    }

    #[test]
    fn test_reciprocal_of_zero_is_zero() {
        let mut engine = ScientificEngine::new();
        engine.apply_unary(UnaryFn::Reciprocal).unwrap();
        assert_eq!(engine.current(), "0");

        engine.enter_digit('4');
        engine.apply_unary(UnaryFn::Reciprocal).unwrap();
        assert_eq!(engine.current(), "0.25");
    }

    #[test]
    fn test_log_of_non_positive_faults() {
        let mut engine = ScientificEngine::new();
        assert!(matches!(
            engine.apply_unary(UnaryFn::Log10),
            Err(ArithmeticFault::Domain(_))
        ));
        press_all(&mut engine, "5 +/-").unwrap();
        assert!(engine.apply_unary(UnaryFn::Ln).is_err());
        assert_eq!(engine.current(), "0");
    }

    #[test]
    fn test_unary_functions() {
        let mut engine = ScientificEngine::new();
        press_all(&mut engine, "1 6 sqrt").unwrap();
        assert_eq!(engine.current(), "4");
        engine.apply_unary(UnaryFn::Square).unwrap();
        assert_eq!(engine.current(), "16");

        engine.clear();
        press_all(&mut engine, "1 0 0 0 log").unwrap();
        assert_eq!(engine.current(), "3");

        engine.clear();
        press_all(&mut engine, "0 e^x").unwrap();
        assert_eq!(engine.current(), "1");
    }

    #[test]
    fn test_sqrt_of_negative_faults() {
        let mut engine = ScientificEngine::new();
        press_all(&mut engine, "9 +/-").unwrap();
        assert!(engine.apply_unary(UnaryFn::SquareRoot).is_err());
    }

    #[test]
    fn test_exp_overflow_faults() {
        let mut engine = ScientificEngine::new();
        press_all(&mut engine, "1 0 0 0 e^x").unwrap_err();
        assert_eq!(engine.current(), "0");
    }

    #[test]
    fn test_trig_in_degrees() {
        let mut engine = ScientificEngine::new();
        press_all(&mut engine, "3 0 sin").unwrap();
        assert!((current_value(&engine) - 0.5).abs() < 1e-12);

        engine.clear();
        press_all(&mut engine, "1 asin").unwrap();
        assert!((current_value(&engine) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_trig_in_radians() {
        let mut engine = ScientificEngine::with_angle_mode(AngleMode::Radians);
        engine.insert_constant(Constant::Pi);
        engine.apply_trig(TrigFn::Cos).unwrap();
        assert_eq!(engine.current(), "-1");

        engine.clear();
        press_all(&mut engine, "1 atan").unwrap();
        assert!((current_value(&engine) - PI / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_inverse_trig_out_of_domain() {
        let mut engine = ScientificEngine::new();
        press_all(&mut engine, "2").unwrap();
        assert!(matches!(
            engine.apply_inverse_trig(TrigFn::Cos),
            Err(ArithmeticFault::Domain(_))
        ));
    }

    #[test]
    fn test_angle_mode_does_not_touch_values() {
        let mut engine = ScientificEngine::new();
        press_all(&mut engine, "4 5").unwrap();
        engine.toggle_angle_mode();
        assert_eq!(engine.current(), "45");
        assert_eq!(engine.angle_mode(), AngleMode::Radians);
        assert_eq!(engine.display_state().indicator.as_deref(), Some("RAD"));
        engine.apply_unary(UnaryFn::Square).unwrap();
        assert_eq!(engine.current(), "2025");
    }

    #[test]
    fn test_constant_overwrites_current() {
        let mut engine = ScientificEngine::new();
        press_all(&mut engine, "1 2 pi").unwrap();
        assert_eq!(engine.current(), "3.141592653589793");
    }

    #[test]
    fn test_toggle_sign_and_percent() {
        let mut engine = ScientificEngine::new();
        engine.toggle_sign();
        assert_eq!(engine.current(), "0");
        press_all(&mut engine, "5 0 +/- %").unwrap();
        assert_eq!(engine.current(), "-0.5");
        engine.toggle_sign();
        assert_eq!(engine.current(), "0.5");
    }

    #[test]
    fn test_clear_keeps_angle_mode() {
        let mut engine = ScientificEngine::with_angle_mode(AngleMode::Radians);
        press_all(&mut engine, "9 + 1").unwrap();
        engine.clear();
        assert_eq!(engine.current(), "0");
        assert!(engine.pending().is_none());
        assert_eq!(engine.angle_mode(), AngleMode::Radians);
    }

    #[test]
    fn test_pending_display() {
        let mut engine = ScientificEngine::new();
        press_all(&mut engine, "7 +").unwrap();
        let display = engine.display_state();
        assert_eq!(display.text, "7");
        assert_eq!(display.pending.as_deref(), Some("7 +"));
        assert!(display.bits.is_none());
    }

    #[test]
    fn test_key_labels() {
        assert_eq!("×".parse::<ScientificKey>(), Ok(ScientificKey::Operator(BinaryOp::Multiply)));
        assert_eq!("SIN".parse::<ScientificKey>(), Ok(ScientificKey::Trig(TrigFn::Sin)));
        assert_eq!("7".parse::<ScientificKey>(), Ok(ScientificKey::Digit('7')));
        assert!("fact".parse::<ScientificKey>().is_err());
    }
}
