//! Unit categories and their conversion factors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ConversionFault;
use super::temperature::TemperatureScale;

/// Length factors relative to the meter.
const LENGTH: &[(&str, f64)] = &[
    ("Meter", 1.0),
    ("Centimeter", 0.01),
    ("Kilometer", 1000.0),
    ("Inch", 0.0254),
    ("Foot", 0.3048),
];

/// Mass factors relative to the kilogram.
const MASS: &[(&str, f64)] = &[
    ("Kilogram", 1.0),
    ("Gram", 0.001),
    ("Pound", 0.453592),
    ("Ounce", 0.0283495),
];

/// Volume factors relative to the liter.
const VOLUME: &[(&str, f64)] = &[
    ("Liter", 1.0),
    ("Milliliter", 0.001),
    ("Gallon", 3.78541),
    ("Pint", 0.473176),
];

/// A family of units that convert into each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Length,
    Mass,
    Volume,
    /// Converted with affine formulas rather than a factor table.
    Temperature,
}

impl Category {
    /// All categories in selector order.
    pub const ALL: [Category; 4] = [
        Category::Length,
        Category::Mass,
        Category::Volume,
        Category::Temperature,
    ];

    /// Display name, also accepted (case-insensitively) by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Length => "Length",
            Self::Mass => "Mass",
            Self::Volume => "Volume",
            Self::Temperature => "Temperature",
        }
    }

    /// Scale-factor table, or `None` for temperature which needs affine formulas.
    fn factors(self) -> Option<&'static [(&'static str, f64)]> {
        match self {
            Self::Length => Some(LENGTH),
            Self::Mass => Some(MASS),
            Self::Volume => Some(VOLUME),
            Self::Temperature => None,
        }
    }

    /// Unit names of this category in selector order.
    pub fn units(self) -> Vec<&'static str> {
        match self.factors() {
            Some(table) => table.iter().map(|(name, _)| *name).collect(),
            None => TemperatureScale::ALL.iter().map(|s| s.name()).collect(),
        }
    }

    /// Resolve a unit name (case-insensitive) to its canonical spelling.
    pub fn resolve_unit(self, unit: &str) -> Result<&'static str, ConversionFault> {
        self.units()
            .into_iter()
            .find(|name| name.eq_ignore_ascii_case(unit.trim()))
            .ok_or_else(|| ConversionFault::UnknownUnit {
                category: self.name().to_string(),
                unit: unit.to_string(),
            })
    }

    /// Conversion factor of `unit` relative to the category's base unit.
    pub(super) fn factor(self, unit: &str) -> Result<f64, ConversionFault> {
        let canonical = self.resolve_unit(unit)?;
        self.factors()
            .and_then(|table| table.iter().find(|(name, _)| *name == canonical))
            .map(|(_, factor)| *factor)
            .ok_or_else(|| ConversionFault::UnknownUnit {
                category: self.name().to_string(),
                unit: unit.to_string(),
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = ConversionFault;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConversionFault::UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_in_selector_order() {
        assert_eq!(
            Category::Length.units(),
            vec!["Meter", "Centimeter", "Kilometer", "Inch", "Foot"]
        );
        assert_eq!(
            Category::Temperature.units(),
            vec!["Celsius", "Fahrenheit", "Kelvin"]
        );
    }

    #[test]
    fn test_resolve_unit_case_insensitive() {
        assert_eq!(Category::Mass.resolve_unit("pound").unwrap(), "Pound");
        assert!(matches!(
            Category::Mass.resolve_unit("Meter"),
            Err(ConversionFault::UnknownUnit { .. })
        ));
    }

    #[test]
    fn test_factor_lookup() {
        assert_eq!(Category::Volume.factor("Gallon").unwrap(), 3.78541);
        assert!(Category::Temperature.factor("Celsius").is_err());
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("volume".parse::<Category>().unwrap(), Category::Volume);
        assert_eq!(
            "Speed".parse::<Category>(),
            Err(ConversionFault::UnknownCategory("Speed".to_string()))
        );
    }
}
