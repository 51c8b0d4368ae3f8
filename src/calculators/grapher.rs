//! Function sampling for the grapher.
//!
//! An equation is compiled once and evaluated at evenly spaced `x` values.
//! A point that cannot be evaluated (`ln(x)` for `x <= 0`, `1/x` at `0`) is
//! kept with `y = None` so the plot shows a gap there; it never aborts the
//! curve. Syntax errors, on the other hand, make every point fail and are
//! reported once.
use crate::expression::engine::{CompiledExpression, Engine};
use crate::expression::errors::EngineError;
use crate::expression::evaluator::AngleMode;
use log::{debug, info};
use rayon::prelude::*;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("invalid range: {0}")]
    InvalidRange(String),
    #[error(transparent)]
    Expression(#[from] EngineError),
}

/// `num_values` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, num_values: usize) -> Vec<f64> {
    if num_values < 2 {
        return vec![start; num_values];
    }
    let step = (end - start) / (num_values as f64 - 1.0);
    let mut values: Vec<f64> = (0..num_values).map(|i| start + i as f64 * step).collect();
    values[num_values - 1] = end;
    values
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphPoint {
    pub x: f64,
    /// `None` where the function is undefined
    pub y: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub source: String,
    pub points: Vec<GraphPoint>,
}

#[derive(Tabled)]
struct SampleRow {
    x: String,
    #[tabled(rename = "f(x)")]
    y: String,
}

impl Curve {
    /// number of points that got a value
    pub fn plotted(&self) -> usize {
        self.points.iter().filter(|p| p.y.is_some()).count()
    }

    /// Maximal runs of consecutive plotted points; each run is drawn as one line.
    pub fn segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut segments = Vec::new();
        let mut current: Vec<(f64, f64)> = Vec::new();
        for point in &self.points {
            match point.y {
                Some(y) => current.push((point.x, y)),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    pub fn to_table(&self) -> String {
        let rows: Vec<SampleRow> = self
            .points
            .iter()
            .map(|p| SampleRow {
                x: format!("{:.6}", p.x),
                y: p.y.map(|y| format!("{:.6}", y)).unwrap_or_else(|| "-".to_string()),
            })
            .collect();
        let mut table = Table::new(&rows);
        table.with(Style::modern_rounded());
        table.to_string()
    }
}

/// Evaluates an already compiled expression at every `x`, in parallel.
pub fn sample_compiled(
    expr: &CompiledExpression,
    xs: &[f64],
    angle_mode: AngleMode,
) -> Vec<GraphPoint> {
    let f = expr.lambdify_x(angle_mode);
    xs.par_iter()
        .map(|&x| GraphPoint { x, y: f(x).ok() })
        .collect()
}

/// Samples `source` as a function of `x` over `[start, end]`.
pub fn sample_function(
    engine: &Engine,
    source: &str,
    start: f64,
    end: f64,
    num_points: usize,
    angle_mode: AngleMode,
) -> Result<Curve, GraphError> {
    if !start.is_finite() || !end.is_finite() || start >= end {
        return Err(GraphError::InvalidRange(format!(
            "start {} must be finite and below end {}",
            start, end
        )));
    }
    if num_points < 2 {
        return Err(GraphError::InvalidRange(format!(
            "at least 2 points are needed, got {}",
            num_points
        )));
    }
    let compiled = engine.compile(source)?;
    let xs = linspace(start, end, num_points);
    let points = sample_compiled(&compiled, &xs, angle_mode);
    let curve = Curve {
        source: source.to_string(),
        points,
    };
    info!(
        "sampled {} at {} points on [{}, {}], {} plotted",
        source,
        num_points,
        start,
        end,
        curve.plotted()
    );
    debug!("{} segments", curve.segments().len());
    Ok(curve)
}
