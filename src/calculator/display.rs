//! Display state exposed to the UI and number formatting.

use serde::Serialize;

/// Everything a UI needs to render one calculator mode.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DisplayState {
    /// Main display text.
    pub text: String,
    /// Pending operation summary, e.g. `"7 +"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<String>,
    /// Mode indicator (angle mode, active base, selected units).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicator: Option<String>,
    /// 32-bit pattern of the current value (programmer mode only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bits: Option<String>,
    /// Error banner from the last command, if it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DisplayState {
    /// Check if the last command produced a fault.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Get the text to copy to clipboard.
    /// Returns the error message while a banner is shown, so it can still be copied.
    pub fn text_for_clipboard(&self) -> &str {
        self.error.as_deref().unwrap_or(&self.text)
    }
}

/// Format a result in compact general notation.
///
/// Integral values below 1e15 print without a fractional part; very large or very
/// small magnitudes switch to exponent notation. The output always parses back
/// to the same `f64`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if value.fract() == 0.0 && magnitude < 1e15 {
        format!("{}", value as i64)
    } else if !(1e-6..1e15).contains(&magnitude) {
        format!("{:e}", value)
    } else {
        format!("{}", value)
    }
}

/// Insert thousand separators into the integer part of numeric display text.
///
/// Text in exponent notation is returned unchanged.
pub fn group_digits(text: &str) -> String {
    if text.contains(['e', 'E']) {
        return text.to_string();
    }

    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int_part, rest) = match unsigned.find('.') {
        Some(dot_pos) => unsigned.split_at(dot_pos),
        None => (unsigned, ""),
    };

    let mut grouped = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let int_grouped: String = grouped.chars().rev().collect();
    format!("{}{}{}", sign, int_grouped, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_results_drop_fraction() {
        assert_eq!(format_number(14.0), "14");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn test_decimal_results() {
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn test_exponent_notation() {
        assert_eq!(format_number(1e300), "1e300");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(1e300).parse::<f64>().unwrap(), 1e300);
    }

    #[test]
    fn test_thousand_separators() {
        assert_eq!(group_digits("1000000"), "1,000,000");
        assert_eq!(group_digits("-1234.5678"), "-1,234.5678");
        assert_eq!(group_digits("999"), "999");
        assert_eq!(group_digits("0."), "0.");
        assert_eq!(group_digits("1e300"), "1e300");
    }

    #[test]
    fn test_clipboard_text_prefers_error() {
        let mut state = DisplayState {
            text: "0".to_string(),
            ..Default::default()
        };
        assert_eq!(state.text_for_clipboard(), "0");
        state.error = Some("Division by zero!".to_string());
        assert!(state.is_error());
        assert_eq!(state.text_for_clipboard(), "Division by zero!");
    }
}
