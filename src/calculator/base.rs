//! Numeric bases for the programmer calculator.
//!
//! A base decides which digit characters are accepted during entry and how a
//! 32-bit value is parsed from and rendered back to text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{ArithmeticFault, UnknownKey};

/// Fixed integer width of the programmer calculator, in bits.
pub const WORD_BITS: u32 = 32;

/// Numeric base used by the programmer calculator for entry and display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Base {
    #[serde(rename = "bin", alias = "binary")]
    Binary,
    #[serde(rename = "oct", alias = "octal")]
    Octal,
    #[default]
    #[serde(rename = "dec", alias = "decimal")]
    Decimal,
    #[serde(rename = "hex", alias = "hexadecimal")]
    Hexadecimal,
}

impl Base {
    /// All bases in selector order.
    pub const ALL: [Base; 4] = [Base::Decimal, Base::Hexadecimal, Base::Octal, Base::Binary];

    /// The radix of this base.
    pub fn radix(self) -> u32 {
        match self {
            Self::Binary => 2,
            Self::Octal => 8,
            Self::Decimal => 10,
            Self::Hexadecimal => 16,
        }
    }

    /// Digit characters valid in this base (uppercase for hex).
    pub fn alphabet(self) -> &'static str {
        match self {
            Self::Binary => "01",
            Self::Octal => "01234567",
            Self::Decimal => "0123456789",
            Self::Hexadecimal => "0123456789ABCDEF",
        }
    }

    /// Check if `ch` is a digit of this base. Lowercase hex digits are not accepted;
    /// callers normalize before asking.
    pub fn accepts(self, ch: char) -> bool {
        self.alphabet().contains(ch)
    }

    /// Short selector label ("DEC", "HEX", ...).
    pub fn label(self) -> &'static str {
        match self {
            Self::Binary => "BIN",
            Self::Octal => "OCT",
            Self::Decimal => "DEC",
            Self::Hexadecimal => "HEX",
        }
    }

    /// Parse operand text into a 32-bit value.
    ///
    /// Decimal text is signed and must fit `i32`. Binary, octal and hex text is the
    /// unsigned 32-bit pattern and must fit `u32`; it is reinterpreted as two's complement.
    pub fn parse(self, text: &str) -> Result<i32, ArithmeticFault> {
        let invalid = || ArithmeticFault::InvalidOperand(text.to_string());

        match self {
            Self::Decimal => text
                .parse::<i64>()
                .ok()
                .and_then(|value| i32::try_from(value).ok())
                .ok_or_else(invalid),
            _ => {
                // from_str_radix tolerates a leading '+', which is never valid operand text
                if text.starts_with('+') {
                    return Err(invalid());
                }
                u32::from_str_radix(text, self.radix())
                    .map(|pattern| pattern as i32)
                    .map_err(|_| invalid())
            }
        }
    }

    /// Render a 32-bit value as operand text in this base.
    pub fn render(self, value: i32) -> String {
        let pattern = value as u32;
        match self {
            Self::Binary => format!("{pattern:b}"),
            Self::Octal => format!("{pattern:o}"),
            Self::Decimal => value.to_string(),
            Self::Hexadecimal => format!("{pattern:X}"),
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Base {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bin" | "binary" => Ok(Self::Binary),
            "oct" | "octal" => Ok(Self::Octal),
            "dec" | "decimal" => Ok(Self::Decimal),
            "hex" | "hexadecimal" => Ok(Self::Hexadecimal),
            _ => Err(UnknownKey(s.to_string())),
        }
    }
}

/// The 32-bit two's-complement pattern of `value`, grouped into four bytes.
pub fn bit_pattern(value: i32) -> String {
    let bits = format!("{:032b}", value as u32);
    bits.as_bytes()
        .chunks(8)
        .map(|byte| String::from_utf8_lossy(byte).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
