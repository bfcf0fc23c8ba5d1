//! Sampling an expression over an interval.

use serde::Serialize;
use tracing::{debug, warn};

use super::PlotFault;
use super::expr::Expr;

/// Default number of evenly spaced samples per plot.
pub const DEFAULT_SAMPLES: usize = 400;

/// A sampled function, ready to be drawn.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Plot {
    pub expression: String,
    pub points: Vec<(f64, f64)>,
}

impl Plot {
    /// Chart title, e.g. `y = x**2`.
    pub fn title(&self) -> String {
        format!("y = {}", self.expression)
    }

    /// Smallest and largest sampled `y`.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|&(_, y)| y).fold(None, |range, y| match range {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        })
    }
}

/// Evaluates expressions over `[xmin, xmax]` at a fixed number of samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Plotter {
    samples: usize,
}

impl Default for Plotter {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SAMPLES,
        }
    }
}

impl Plotter {
    pub fn with_samples(samples: usize) -> Result<Self, PlotFault> {
        if samples < 2 {
            return Err(PlotFault::InvalidSampleCount(samples));
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Sample `expression` at evenly spaced points from `xmin` to `xmax` inclusive.
    ///
    /// Fails if the expression is empty or malformed, uses a name outside the
    /// whitelist, the range is degenerate, or any sample is not finite. Nothing
    /// is returned for a partially valid plot.
    pub fn plot(&self, expression: &str, xmin: f64, xmax: f64) -> Result<Plot, PlotFault> {
        let outcome = self.sample(expression, xmin, xmax);
        if let Err(fault) = &outcome {
            warn!(%fault, expression, "plot rejected");
        }
        outcome
    }

    fn sample(&self, expression: &str, xmin: f64, xmax: f64) -> Result<Plot, PlotFault> {
        let expression = expression.trim();
        if expression.is_empty() {
            return Err(PlotFault::Empty);
        }
        if !xmin.is_finite() || !xmax.is_finite() || xmin >= xmax {
            return Err(PlotFault::DegenerateRange { xmin, xmax });
        }

        let tree = Expr::parse(expression)?;
        let last = self.samples - 1;

        let points = (0..self.samples)
            .map(|i| {
                // Interpolate from both ends; `xmax - xmin` may overflow
                let t = i as f64 / last as f64;
                let x = if i == last {
                    xmax
                } else {
                    xmin * (1.0 - t) + xmax * t
                };
                let y = tree.eval(x);
                if y.is_finite() {
                    Ok((x, y))
                } else {
                    Err(PlotFault::NonFinite { x })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(expression, samples = points.len(), "plotted");
        Ok(Plot {
            expression: expression.to_string(),
            points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_square_samples() {
        let plot = Plotter::default().plot("x**2", -2.0, 2.0).unwrap();
        assert_eq!(plot.points.len(), DEFAULT_SAMPLES);
        assert_eq!(plot.points.first(), Some(&(-2.0, 4.0)));
        assert_eq!(plot.points.last(), Some(&(2.0, 4.0)));
        for &(x, y) in &plot.points {
            assert_eq!(y, x * x);
        }
        assert_eq!(plot.title(), "y = x**2");
    }

    #[test]
    fn test_evenly_spaced() {
        let plot = Plotter::with_samples(5).unwrap().plot("x", 0.0, 1.0).unwrap();
        let xs: Vec<f64> = plot.points.iter().map(|&(x, _)| x).collect();
        assert_eq!(xs, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_reciprocal_rejected_when_zero_is_sampled() {
        let plotter = Plotter::with_samples(401).unwrap();
        assert_eq!(
            plotter.plot("1/x", -1.0, 1.0),
            Err(PlotFault::NonFinite { x: 0.0 })
        );
    }

    #[test]
    fn test_reciprocal_plots_when_zero_is_skipped() {
        // 400 samples over [-1, 1] straddle zero without hitting it
        let plot = Plotter::default().plot("1/x", -1.0, 1.0).unwrap();
        assert!(plot.points.iter().all(|&(x, _)| x != 0.0));
    }

    #[test]
    fn test_log_of_negative_rejected() {
        assert!(matches!(
            Plotter::default().plot("log(x)", -1.0, 1.0),
            Err(PlotFault::NonFinite { x }) if x == -1.0
        ));
    }

    #[test]
    fn test_degenerate_range() {
        let plotter = Plotter::default();
        assert_eq!(
            plotter.plot("x", 1.0, 1.0),
            Err(PlotFault::DegenerateRange { xmin: 1.0, xmax: 1.0 })
        );
        assert!(plotter.plot("x", 2.0, -2.0).is_err());
        assert!(plotter.plot("x", f64::NEG_INFINITY, 0.0).is_err());
    }

    #[test]
    fn test_disallowed_identifier_never_evaluated() {
        let plotter = Plotter::default();
        assert_eq!(
            plotter.plot("__import__('os')", -1.0, 1.0),
            Err(PlotFault::DisallowedIdentifier("__import__".to_string()))
        );
        assert!(matches!(
            plotter.plot("exec(x)", -1.0, 1.0),
            Err(PlotFault::DisallowedIdentifier(_))
        ));
    }

    #[test]
    fn test_widest_range_samples_finite_x() {
        let plot = Plotter::with_samples(3)
            .unwrap()
            .plot("x", -1e308, 1e308)
            .unwrap();
        let xs: Vec<f64> = plot.points.iter().map(|&(x, _)| x).collect();
        assert_eq!(xs, vec![-1e308, 0.0, 1e308]);
    }

    #[test]
    fn test_deeply_nested_expression_rejected() {
        let expression = format!("{}x", "-".repeat(50_000));
        assert!(matches!(
            Plotter::default().plot(&expression, -1.0, 1.0),
            Err(PlotFault::Syntax { .. })
        ));
    }

    #[test]
    fn test_empty_expression() {
        assert_eq!(Plotter::default().plot("  ", 0.0, 1.0), Err(PlotFault::Empty));
    }

    #[test]
    fn test_sample_count_validated() {
        assert_eq!(Plotter::with_samples(1), Err(PlotFault::InvalidSampleCount(1)));
        assert_eq!(Plotter::with_samples(2).unwrap().samples(), 2);
    }

    #[test]
    fn test_y_range() {
        let plot = Plotter::with_samples(3).unwrap().plot("x**3", -1.0, 2.0).unwrap();
        assert_eq!(plot.y_range(), Some((-1.0, 8.0)));
    }

    proptest! {
        #[test]
        fn test_square_matches_multiplication(xmin in -1e3f64..0.0, width in 1e-3f64..1e3) {
            let plot = Plotter::with_samples(50).unwrap().plot("x**2", xmin, xmin + width).unwrap();
            for (x, y) in plot.points {
                prop_assert_eq!(y, x * x);
            }
        }
    }
}
