//! Line-oriented front end over the calculator engines.
//!
//! Each input line is either a `:command`, or input for the active mode:
//! whitespace-separated key labels for the scientific and programmer modes,
//! a selector command for the converter, or an expression for the plotter.
//! The mode's display is printed after every line.

mod command;
mod render;

pub use command::{ConverterCommand, MetaCommand, Mode, PlotRequest, expand_keys};
pub use render::{render_display, render_plot};

use std::io::{self, BufRead, Write};

use serde_json::json;
use tracing::debug;

use crate::calculator::{
    DisplayState, ProgrammerEngine, ProgrammerKey, ScientificEngine, ScientificKey, copy_display,
};
use crate::config::{Config, ConfigError};
use crate::converter::{self, ConverterSession};
use crate::plot::{Plot, Plotter};

const HELP_COMMON: &str =
    ":sci :prog :conv :plot switch mode, :show redraw, :copy copy display, :quit exit";

/// Output of one handled line.
#[derive(Debug, Default, PartialEq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Reply {
    fn lines(lines: Vec<String>) -> Self {
        Self { lines, quit: false }
    }

    fn quit() -> Self {
        Self {
            lines: Vec::new(),
            quit: true,
        }
    }
}

/// All four calculator modes plus the console settings.
pub struct Console {
    mode: Mode,
    scientific: ScientificEngine,
    programmer: ProgrammerEngine,
    converter: ConverterSession,
    plotter: Plotter,
    plot_range: (f64, f64),
    plot: Option<Plot>,
    plot_error: Option<String>,
    group_digits: bool,
    json: bool,
}

impl Console {
    /// Build every engine from `config` and start in `mode`.
    ///
    /// The configured default expression is plotted straight away.
    pub fn new(config: &Config, mode: Mode, json: bool) -> Result<Self, ConfigError> {
        let plotter =
            Plotter::with_samples(config.plot.samples).map_err(|e| ConfigError::ValidationError {
                message: e.to_string(),
            })?;

        let mut console = Self {
            mode,
            scientific: ScientificEngine::with_angle_mode(config.scientific.angle_mode),
            programmer: ProgrammerEngine::with_base(config.programmer.base),
            converter: ConverterSession::new(config.converter_category()?),
            plotter,
            plot_range: (config.plot.xmin, config.plot.xmax),
            plot: None,
            plot_error: None,
            group_digits: config.display.group_digits,
            json,
        };
        console.plot_line(&config.plot.expression);
        Ok(console)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Display state of the active mode.
    pub fn display_state(&self) -> DisplayState {
        match self.mode {
            Mode::Scientific => self.scientific.display_state(),
            Mode::Programmer => self.programmer.display_state(),
            Mode::Converter => self.converter.display_state(),
            Mode::Plot => DisplayState {
                text: self.plot.as_ref().map(Plot::title).unwrap_or_default(),
                indicator: Some(format!("x in [{}, {}]", self.plot_range.0, self.plot_range.1)),
                error: self.plot_error.clone(),
                ..Default::default()
            },
        }
    }

    /// Handle one line of input.
    pub fn handle_line(&mut self, line: &str) -> Reply {
        let line = line.trim();
        if line.is_empty() {
            return Reply::default();
        }
        if line.starts_with(':') {
            return self.meta(line);
        }

        match self.mode {
            Mode::Scientific => {
                match expand_keys::<ScientificKey>(line, |c| c.is_ascii_digit() || c == '.') {
                    Ok(keys) => {
                        for key in keys {
                            // The engine has reset and holds the error banner
                            if self.scientific.press(key).is_err() {
                                break;
                            }
                        }
                    }
                    Err(unknown) => return Reply::lines(vec![format!("error: {}", unknown)]),
                }
            }
            Mode::Programmer => {
                match expand_keys::<ProgrammerKey>(line, |c| c.is_ascii_hexdigit()) {
                    Ok(keys) => {
                        for key in keys {
                            if self.programmer.press(key).is_err() {
                                break;
                            }
                        }
                    }
                    Err(unknown) => return Reply::lines(vec![format!("error: {}", unknown)]),
                }
            }
            Mode::Converter => {
                if let Some(listing) = self.converter_line(line) {
                    return Reply::lines(vec![listing]);
                }
            }
            Mode::Plot => self.plot_line(line),
        }
        Reply::lines(self.render())
    }

    /// Print the active display, then read and handle lines until EOF or `:quit`.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in self.render() {
            writeln!(output, "{}", line)?;
        }
        self.prompt(&mut output)?;

        for line in input.lines() {
            let reply = self.handle_line(&line?);
            for line in &reply.lines {
                writeln!(output, "{}", line)?;
            }
            if reply.quit {
                break;
            }
            self.prompt(&mut output)?;
        }
        Ok(())
    }

    /// Render the active mode, as text or as one JSON object per line.
    pub fn render(&self) -> Vec<String> {
        if self.json {
            let value = match (self.mode, &self.plot) {
                (Mode::Plot, Some(plot)) => json!({ "plot": plot, "error": self.plot_error }),
                _ => json!(self.display_state()),
            };
            return vec![value.to_string()];
        }

        match self.mode {
            Mode::Plot => {
                let mut lines = self.plot.as_ref().map(render_plot).unwrap_or_default();
                if let Some(error) = &self.plot_error {
                    lines.push(format!("error: {}", error));
                }
                lines
            }
            Mode::Scientific => render_display(&self.display_state(), self.group_digits),
            _ => render_display(&self.display_state(), false),
        }
    }

    fn prompt<W: Write>(&self, output: &mut W) -> io::Result<()> {
        if self.json {
            return Ok(());
        }
        write!(output, "{}", self.mode.prompt())?;
        output.flush()
    }

    fn meta(&mut self, line: &str) -> Reply {
        let command = match line.parse::<MetaCommand>() {
            Ok(command) => command,
            Err(_) => return Reply::lines(vec![format!("error: Unknown command '{}'", line)]),
        };

        match command {
            MetaCommand::Quit => Reply::quit(),
            MetaCommand::Show => Reply::lines(self.render()),
            MetaCommand::Help => Reply::lines(vec![
                self.mode_help().to_string(),
                HELP_COMMON.to_string(),
            ]),
            MetaCommand::Switch(mode) => {
                debug!(from = ?self.mode, to = ?mode, "switching mode");
                self.mode = mode;
                Reply::lines(self.render())
            }
            MetaCommand::Copy => {
                let state = self.display_state();
                match copy_display(&state) {
                    Ok(()) => {
                        Reply::lines(vec![format!("Copied '{}'", state.text_for_clipboard())])
                    }
                    Err(message) => Reply::lines(vec![format!("error: {}", message)]),
                }
            }
        }
    }

    fn mode_help(&self) -> &'static str {
        match self.mode {
            Mode::Scientific => {
                "keys: 0-9 . + - * / ^ = C +/- % sqrt x^2 1/x log ln e^x sin cos tan asin acos atan pi e deg rad"
            }
            Mode::Programmer => {
                "keys: 0-9 A-F + - * / MOD AND OR XOR NOT << >> = CLR BIN OCT DEC HEX"
            }
            Mode::Converter => {
                "category <name>, from <unit>, to <unit>, value <number> (or just the number), swap, units, categories"
            }
            Mode::Plot => {
                "<expression in x> [from <xmin> to <xmax>], using + - * / ** ( ) sin cos tan log exp pi"
            }
        }
    }

    /// Apply a converter line. Listings are returned instead of the display.
    fn converter_line(&mut self, line: &str) -> Option<String> {
        let command = match line.parse::<ConverterCommand>() {
            Ok(command) => command,
            Err(unknown) => return Some(format!("error: {}", unknown)),
        };

        // Faults are kept on the session's error banner
        let _ = match command {
            ConverterCommand::Category(name) => self.converter.select_category(&name),
            ConverterCommand::From(unit) => self.converter.set_from_unit(&unit),
            ConverterCommand::To(unit) => self.converter.set_to_unit(&unit),
            ConverterCommand::Value(value) => self.converter.set_input(&value),
            ConverterCommand::Swap => self.converter.swap(),
            ConverterCommand::Units => {
                return Some(converter::units_for(self.converter.category()).join(", "));
            }
            ConverterCommand::Categories => return Some(converter::categories().join(", ")),
        };
        None
    }

    /// Plot a request. On failure the previous plot and range stay in place.
    fn plot_line(&mut self, line: &str) {
        let request = match line.parse::<PlotRequest>() {
            Ok(request) => request,
            Err(message) => {
                self.plot_error = Some(message);
                return;
            }
        };

        let (xmin, xmax) = request.range.unwrap_or(self.plot_range);
        match self.plotter.plot(&request.expression, xmin, xmax) {
            Ok(plot) => {
                self.plot = Some(plot);
                self.plot_range = (xmin, xmax);
                self.plot_error = None;
            }
            Err(fault) => self.plot_error = Some(fault.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(mode: Mode) -> Console {
        Console::new(&Config::default(), mode, false).unwrap()
    }

    fn text(console: &Console) -> String {
        console.display_state().text
    }

    #[test]
    fn test_scientific_chain() {
        let mut console = console(Mode::Scientific);
        console.handle_line("3 + 4 * 2 =");
        assert_eq!(text(&console), "14");

        let reply = console.handle_line("C 12.5 x^2");
        assert_eq!(reply.lines, vec!["DEG", "= 156.25"]);
    }

    #[test]
    fn test_scientific_fault_stops_line() {
        let mut console = console(Mode::Scientific);
        let reply = console.handle_line("8 / 0 = 5");
        assert_eq!(text(&console), "0");
        assert_eq!(reply.lines.last().unwrap(), "error: Division by zero!");
    }

    #[test]
    fn test_unknown_key_leaves_engine_untouched() {
        let mut console = console(Mode::Scientific);
        console.handle_line("7 +");
        let reply = console.handle_line("2 foo");
        assert_eq!(reply.lines, vec!["error: Unknown key 'foo'"]);
        assert_eq!(console.display_state().pending.as_deref(), Some("7 +"));
    }

    #[test]
    fn test_grouped_scientific_display() {
        let mut config = Config::default();
        config.display.group_digits = true;
        let mut console = Console::new(&config, Mode::Scientific, false).unwrap();
        let reply = console.handle_line("1000 * 1000 =");
        assert_eq!(reply.lines[1], "= 1,000,000");
    }

    #[test]
    fn test_programmer_mode() {
        let mut console = console(Mode::Programmer);
        console.handle_line("12 AND 10 =");
        assert_eq!(text(&console), "8");

        let reply = console.handle_line("HEX");
        assert_eq!(reply.lines[0], "HEX");
        assert_eq!(reply.lines[1], "= 8");
        assert_eq!(reply.lines[2], "bits 00000000 00000000 00000000 00001000");

        console.handle_line("CLR FF + 1 =");
        assert_eq!(text(&console), "100");
    }

    #[test]
    fn test_converter_mode() {
        let mut console = console(Mode::Converter);
        console.handle_line("to Kilometer");
        console.handle_line("2500");
        assert_eq!(text(&console), "2.5");

        console.handle_line("category temperature");
        console.handle_line("value 100");
        assert_eq!(text(&console), "212");

        let reply = console.handle_line("from Rankine");
        assert!(reply.lines.last().unwrap().starts_with("error: Unknown unit"));
        assert_eq!(console.converter.from_unit(), "Celsius");

        let reply = console.handle_line("units");
        assert_eq!(reply.lines, vec!["Celsius, Fahrenheit, Kelvin"]);
    }

    #[test]
    fn test_plot_mode_keeps_previous_plot_on_fault() {
        let mut console = console(Mode::Plot);
        assert_eq!(text(&console), "y = x**2");

        console.handle_line("sin(x) from 0 to 3");
        assert_eq!(text(&console), "y = sin(x)");
        assert_eq!(console.plot_range, (0.0, 3.0));

        let reply = console.handle_line("import(x)");
        assert_eq!(text(&console), "y = sin(x)");
        assert!(reply.lines.last().unwrap().starts_with("error: 'import' is not allowed"));

        console.handle_line("x from 2 to 1");
        assert_eq!(console.plot_range, (0.0, 3.0));
        assert!(console.display_state().is_error());
    }

    #[test]
    fn test_meta_commands() {
        let mut console = console(Mode::Scientific);
        console.handle_line(":prog");
        assert_eq!(console.mode(), Mode::Programmer);

        let reply = console.handle_line(":bogus");
        assert_eq!(reply.lines, vec!["error: Unknown command ':bogus'"]);

        assert_eq!(console.handle_line(":help").lines.len(), 2);
        assert!(console.handle_line(":q").quit);
        assert_eq!(console.handle_line("   "), Reply::default());
    }

    #[test]
    fn test_modes_keep_their_state() {
        let mut console = console(Mode::Scientific);
        console.handle_line("42");
        console.handle_line(":prog");
        console.handle_line("7");
        console.handle_line(":sci");
        assert_eq!(text(&console), "42");
    }

    #[test]
    fn test_json_output() {
        let mut console = Console::new(&Config::default(), Mode::Scientific, true).unwrap();
        let reply = console.handle_line("2 + 3 =");
        let value: serde_json::Value = serde_json::from_str(&reply.lines[0]).unwrap();
        assert_eq!(value["text"], "5");
        assert_eq!(value["indicator"], "DEG");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_run_until_quit() {
        let mut console = console(Mode::Scientific);
        let input = Cursor::new("6 * 7 =\n:quit\n9\n");
        let mut output = Vec::new();
        console.run(input, &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("= 42"));
        assert!(!output.contains("= 9"));
        assert_eq!(text(&console), "42");
    }
}
