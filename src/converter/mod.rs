//! Unit and temperature conversion.
//!
//! `convert` is a pure function over a category and two unit names. The
//! `ConverterSession` keeps the selector state a UI needs (category, units,
//! input text, last result) and re-converts after every change.

mod session;
mod temperature;
mod units;

pub use session::ConverterSession;
pub use temperature::{TemperatureScale, convert_temperature};
pub use units::Category;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// A conversion request that cannot be answered.
///
/// Reported inline; the converter's selections are left as they were.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionFault {
    #[error("Unknown category '{0}'")]
    UnknownCategory(String),
    #[error("Unknown unit '{unit}' for {category}")]
    UnknownUnit { category: String, unit: String },
    #[error("Invalid input: '{0}' is not a number")]
    InvalidValue(String),
    /// The converted value does not fit in an `f64`.
    #[error("Result is too large to display")]
    Overflow,
}

lazy_static! {
    /// A plain decimal literal with an optional exponent. Rejects the
    /// `inf`/`nan` spellings `f64::from_str` would otherwise accept.
    static ref NUMERIC_LITERAL: Regex = Regex::new(
        r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$"
    ).unwrap();
}

/// All categories, for populating the category selector.
pub fn categories() -> Vec<&'static str> {
    Category::ALL.iter().map(|c| c.name()).collect()
}

/// Unit names of a category, for populating the unit selectors.
pub fn units_for(category: Category) -> Vec<&'static str> {
    category.units()
}

/// Parse user-typed input into a finite number.
pub fn parse_value(input: &str) -> Result<f64, ConversionFault> {
    let trimmed = input.trim();
    if !NUMERIC_LITERAL.is_match(trimmed) {
        return Err(ConversionFault::InvalidValue(input.to_string()));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ConversionFault::InvalidValue(input.to_string()))
}

/// Convert `value` from one unit of `category` to another.
///
/// Linear categories scale by `factor[from] / factor[to]`; temperature uses
/// the explicit pairwise formulas.
pub fn convert(
    category: Category,
    from_unit: &str,
    to_unit: &str,
    value: f64,
) -> Result<f64, ConversionFault> {
    let result = match category {
        Category::Temperature => {
            let from: TemperatureScale = from_unit.parse()?;
            let to: TemperatureScale = to_unit.parse()?;
            convert_temperature(from, to, value)
        }
        _ => {
            let factor_from = category.factor(from_unit)?;
            let factor_to = category.factor(to_unit)?;
            value * (factor_from / factor_to)
        }
    };
    if !result.is_finite() {
        return Err(ConversionFault::Overflow);
    }
    Ok(result)
}
