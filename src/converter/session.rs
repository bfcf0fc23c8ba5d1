//! Converter selector state.

use tracing::{debug, warn};

use super::{Category, ConversionFault, convert, parse_value};
use crate::calculator::{DisplayState, format_number};

/// The converter tab: category, unit selectors, typed input and last result.
#[derive(Clone, Debug)]
pub struct ConverterSession {
    category: Category,
    from_unit: &'static str,
    to_unit: &'static str,
    input: String,
    result: Option<f64>,
    error: Option<String>,
}

impl Default for ConverterSession {
    fn default() -> Self {
        Self::new(Category::default())
    }
}

impl ConverterSession {
    /// Start on `category` with its first two units selected.
    pub fn new(category: Category) -> Self {
        let (from_unit, to_unit) = default_units(category);
        Self {
            category,
            from_unit,
            to_unit,
            input: String::new(),
            result: None,
            error: None,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn from_unit(&self) -> &'static str {
        self.from_unit
    }

    pub fn to_unit(&self) -> &'static str {
        self.to_unit
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn result(&self) -> Option<f64> {
        self.result
    }

    /// Switch category by name, resetting the unit selectors.
    pub fn select_category(&mut self, name: &str) -> Result<(), ConversionFault> {
        let category = self.report(name.parse::<Category>())?;
        self.set_category(category)
    }

    pub fn set_category(&mut self, category: Category) -> Result<(), ConversionFault> {
        let (from_unit, to_unit) = default_units(category);
        self.category = category;
        self.from_unit = from_unit;
        self.to_unit = to_unit;
        debug!(%category, from_unit, to_unit, "converter category changed");
        self.reconvert()
    }

    pub fn set_from_unit(&mut self, unit: &str) -> Result<(), ConversionFault> {
        self.from_unit = self.report(self.category.resolve_unit(unit))?;
        self.reconvert()
    }

    pub fn set_to_unit(&mut self, unit: &str) -> Result<(), ConversionFault> {
        self.to_unit = self.report(self.category.resolve_unit(unit))?;
        self.reconvert()
    }

    /// Replace the typed input and re-convert.
    pub fn set_input(&mut self, input: &str) -> Result<(), ConversionFault> {
        self.input = input.to_string();
        self.reconvert()
    }

    /// Swap the unit selectors. The last displayed result becomes the new input,
    /// so swapping twice returns to the original value.
    pub fn swap(&mut self) -> Result<(), ConversionFault> {
        std::mem::swap(&mut self.from_unit, &mut self.to_unit);
        if let Some(result) = self.result
            && !self.input.trim().is_empty()
        {
            self.input = format_number(result);
        }
        self.reconvert()
    }

    /// Convert the current input with the current selections.
    ///
    /// Empty input clears the result without a fault. On a fault the result is
    /// cleared and the message shown inline; the input text is kept for editing.
    pub fn reconvert(&mut self) -> Result<(), ConversionFault> {
        self.error = None;
        if self.input.trim().is_empty() {
            self.result = None;
            return Ok(());
        }

        let outcome = parse_value(&self.input)
            .and_then(|value| convert(self.category, self.from_unit, self.to_unit, value));
        self.result = outcome.as_ref().ok().copied();
        self.report(outcome).map(|_| ())
    }

    pub fn display_state(&self) -> DisplayState {
        DisplayState {
            text: self.result.map(format_number).unwrap_or_default(),
            pending: (!self.input.is_empty()).then(|| self.input.clone()),
            indicator: Some(format!(
                "{}: {} -> {}",
                self.category, self.from_unit, self.to_unit
            )),
            bits: None,
            error: self.error.clone(),
        }
    }

    /// Record a fault for the error banner without touching the selections.
    fn report<T>(&mut self, outcome: Result<T, ConversionFault>) -> Result<T, ConversionFault> {
        self.error = None;
        outcome.map_err(|fault| {
            warn!(%fault, "conversion failed");
            self.error = Some(fault.to_string());
            fault
        })
    }
}

fn default_units(category: Category) -> (&'static str, &'static str) {
    let units = category.units();
    let first = units.first().copied().unwrap_or_default();
    let second = units.get(1).copied().unwrap_or(first);
    (first, second)
}
