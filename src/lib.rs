//! Multi-mode desktop calculator engines.
//!
//! - [`calculator`]: chained scientific and 32-bit programmer engines
//! - [`converter`]: unit and temperature conversion
//! - [`plot`]: safe expression parsing and sampling for function plots
//! - [`console`]: a line-oriented front end driving all four modes

pub mod calculator;
pub mod config;
pub mod console;
pub mod converter;
pub mod plot;
