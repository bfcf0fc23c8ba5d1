//! Temperature scales.
//!
//! The three scales do not share a zero point, so each pair gets its own affine
//! formula instead of a factor table.

use std::str::FromStr;

use super::ConversionFault;

/// A temperature unit of the converter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemperatureScale {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureScale {
    /// All scales in selector order.
    pub const ALL: [TemperatureScale; 3] = [Self::Celsius, Self::Fahrenheit, Self::Kelvin];

    pub fn name(self) -> &'static str {
        match self {
            Self::Celsius => "Celsius",
            Self::Fahrenheit => "Fahrenheit",
            Self::Kelvin => "Kelvin",
        }
    }
}

impl FromStr for TemperatureScale {
    type Err = ConversionFault;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scale| scale.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConversionFault::UnknownUnit {
                category: "Temperature".to_string(),
                unit: s.to_string(),
            })
    }
}

/// Convert `value` between two temperature scales.
pub fn convert_temperature(from: TemperatureScale, to: TemperatureScale, value: f64) -> f64 {
    use TemperatureScale::*;

    match (from, to) {
        (Celsius, Fahrenheit) => value * 9.0 / 5.0 + 32.0,
        (Celsius, Kelvin) => value + 273.15,
        (Fahrenheit, Celsius) => (value - 32.0) * 5.0 / 9.0,
        (Fahrenheit, Kelvin) => (value - 32.0) * 5.0 / 9.0 + 273.15,
        (Kelvin, Celsius) => value - 273.15,
        (Kelvin, Fahrenheit) => (value - 273.15) * 9.0 / 5.0 + 32.0,
        (Celsius, Celsius) | (Fahrenheit, Fahrenheit) | (Kelvin, Kelvin) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::TemperatureScale::*;
    use super::*;

    #[test]
    fn test_fixed_points() {
        assert_eq!(convert_temperature(Celsius, Fahrenheit, 0.0), 32.0);
        assert_eq!(convert_temperature(Celsius, Fahrenheit, 100.0), 212.0);
        assert_eq!(convert_temperature(Celsius, Kelvin, 0.0), 273.15);
        assert_eq!(convert_temperature(Fahrenheit, Celsius, 212.0), 100.0);
        assert_eq!(convert_temperature(Kelvin, Celsius, 273.15), 0.0);
    }

    #[test]
    fn test_fahrenheit_kelvin() {
        assert!((convert_temperature(Fahrenheit, Kelvin, 32.0) - 273.15).abs() < 1e-9);
        assert!((convert_temperature(Kelvin, Fahrenheit, 0.0) + 459.67).abs() < 1e-9);
    }

    #[test]
    fn test_minus_forty_meets() {
        assert_eq!(convert_temperature(Celsius, Fahrenheit, -40.0), -40.0);
        assert_eq!(convert_temperature(Fahrenheit, Celsius, -40.0), -40.0);
    }
}
