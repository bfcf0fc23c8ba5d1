//! Parsing console input lines into commands.

use std::str::FromStr;

use clap::ValueEnum;
use lazy_static::lazy_static;
use regex::Regex;

use crate::calculator::UnknownKey;

lazy_static! {
    /// `:name` meta commands, available in every mode.
    static ref META_COMMAND: Regex = Regex::new(r"^:(\w+)$").unwrap();

    /// `<expression> from <xmin> to <xmax>`
    static ref PLOT_WITH_RANGE: Regex = Regex::new(
        r"^(?P<expr>.+?)\s+from\s+(?P<xmin>\S+)\s+to\s+(?P<xmax>\S+)$"
    ).unwrap();
}

/// Calculator tab the console is forwarding input to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    #[default]
    #[value(alias = "sci")]
    Scientific,
    #[value(alias = "prog")]
    Programmer,
    #[value(alias = "conv")]
    Converter,
    Plot,
}

impl Mode {
    pub fn prompt(self) -> &'static str {
        match self {
            Self::Scientific => "sci> ",
            Self::Programmer => "prog> ",
            Self::Converter => "conv> ",
            Self::Plot => "plot> ",
        }
    }
}

/// Commands understood in every mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MetaCommand {
    Switch(Mode),
    Copy,
    Show,
    Help,
    Quit,
}

impl FromStr for MetaCommand {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = META_COMMAND
            .captures(s.trim())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_ascii_lowercase())
            .ok_or_else(|| UnknownKey(s.to_string()))?;

        let command = match name.as_str() {
            "copy" => Self::Copy,
            "show" => Self::Show,
            "help" | "h" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => Self::Switch(
                Mode::from_str(other, true).map_err(|_| UnknownKey(s.to_string()))?,
            ),
        };
        Ok(command)
    }
}

/// Converter tab input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConverterCommand {
    Category(String),
    From(String),
    To(String),
    Value(String),
    Swap,
    Units,
    Categories,
}

impl FromStr for ConverterCommand {
    type Err = UnknownKey;

    /// A bare line that is not a keyword is taken as the value to convert.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match (word.to_ascii_lowercase().as_str(), rest.is_empty()) {
            ("swap", true) => Self::Swap,
            ("units", true) => Self::Units,
            ("categories", true) => Self::Categories,
            ("category", false) => Self::Category(rest.to_string()),
            ("from", false) => Self::From(rest.to_string()),
            ("to", false) => Self::To(rest.to_string()),
            ("value", false) => Self::Value(rest.to_string()),
            ("value", true) => Self::Value(String::new()),
            ("category" | "from" | "to", true) => return Err(UnknownKey(line.to_string())),
            _ => Self::Value(line.to_string()),
        };
        Ok(command)
    }
}

/// A plot request; the range is optional and defaults to the last one used.
#[derive(Clone, Debug, PartialEq)]
pub struct PlotRequest {
    pub expression: String,
    pub range: Option<(f64, f64)>,
}

impl FromStr for PlotRequest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let Some(caps) = PLOT_WITH_RANGE.captures(line) else {
            return Ok(Self {
                expression: line.to_string(),
                range: None,
            });
        };

        let bound = |name: &str| {
            let text = &caps[name];
            text.parse::<f64>()
                .map_err(|_| format!("Invalid X range value '{}'", text))
        };
        Ok(Self {
            expression: caps["expr"].to_string(),
            range: Some((bound("xmin")?, bound("xmax")?)),
        })
    }
}

/// Split a calculator line into key labels.
///
/// A token that is not a key label but consists only of digit characters is
/// expanded into one press per character, so `12.5` or `FF` can be typed directly.
pub fn expand_keys<K>(line: &str, is_digit: impl Fn(char) -> bool) -> Result<Vec<K>, UnknownKey>
where
    K: FromStr<Err = UnknownKey>,
{
    let mut keys = Vec::new();
    for token in line.split_whitespace() {
        match token.parse::<K>() {
            Ok(key) => keys.push(key),
            Err(unknown) => {
                if !token.chars().all(&is_digit) {
                    return Err(unknown);
                }
                for ch in token.chars() {
                    keys.push(ch.to_string().parse::<K>()?);
                }
            }
        }
    }
    Ok(keys)
}
