//! Collaborator interfaces
//!
//! This crate assembles expression text; it does not parse, evaluate, solve
//! or draw. Those jobs belong to a symbolic backend and a rendering surface
//! supplied by the caller through the traits below.
//!
//! ## Pipeline
//!
//! ```text
//! expanded text → SymbolicBackend::parse → Expr
//!                                          ↓
//!          SampleGrid → field(point) = evaluate(Expr, to_local(point))
//!                                          ↓
//!                                RenderSurface::render
//! ```

use std::collections::HashMap;

use crate::axes::AxisTable;
use crate::error::{BackendError, ExpandError};
use crate::shapes::ShapeColor;

/// Functions a backend must recognise in expanded text
pub const KNOWN_FUNCTIONS: [&str; 7] = ["Abs", "Max", "Min", "sqrt", "sin", "cos", "tan"];

/// Symbols bound when parsing text for a given dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    pub axes: Vec<String>,
    pub functions: Vec<&'static str>,
    /// Free symbols bound at evaluation time, e.g. user function parameters
    pub params: Vec<String>,
}

impl SymbolTable {
    pub fn for_dimension(axes: &AxisTable, dimension: usize) -> Result<Self, ExpandError> {
        Ok(Self {
            axes: axes.coords(dimension)?.to_vec(),
            functions: KNOWN_FUNCTIONS.to_vec(),
            params: Vec::new(),
        })
    }

    pub fn with_params(mut self, params: &[String]) -> Self {
        self.params.extend(params.iter().cloned());
        self
    }

    pub fn dimension(&self) -> usize {
        self.axes.len()
    }
}

/// External parser / evaluator / solver
pub trait SymbolicBackend {
    /// Parsed expression
    type Expr: Clone;

    /// Parse algebraic text (an expression, or an equation with one `=`)
    fn parse(&self, text: &str, symbols: &SymbolTable) -> Result<Self::Expr, BackendError>;

    /// Evaluate at a point given as (symbol, value) bindings
    fn evaluate(&self, expr: &Self::Expr, bindings: &[(&str, f64)]) -> Result<f64, BackendError>;

    /// Solve `expr = 0` for `variable`; zero or more solutions
    fn solve_for(&self, expr: &Self::Expr, variable: &str)
        -> Result<Vec<Self::Expr>, BackendError>;

    /// Solve `exprs[i] = 0` jointly for `variables`
    ///
    /// Each solution maps variable name to its value expression. Backends
    /// without a system solver keep the default.
    fn solve_system(
        &self,
        exprs: &[Self::Expr],
        variables: &[&str],
    ) -> Result<Vec<HashMap<String, Self::Expr>>, BackendError> {
        let _ = (exprs, variables);
        Err(BackendError::Solve(
            "this backend does not solve systems of equations".to_string(),
        ))
    }
}

/// Sampling bounds and resolution for a 2D or 3D field
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGrid {
    /// (min, max) per axis
    pub bounds: Vec<(f64, f64)>,
    /// Samples per axis
    pub resolution: usize,
}

impl SampleGrid {
    pub fn new(bounds: Vec<(f64, f64)>, resolution: usize) -> Self {
        Self { bounds, resolution }
    }

    /// Square grid `[min, max]^2`
    pub fn square(min: f64, max: f64, resolution: usize) -> Self {
        Self::new(vec![(min, max); 2], resolution)
    }

    /// Cubic grid `[min, max]^3`
    pub fn cube(min: f64, max: f64, resolution: usize) -> Self {
        Self::new(vec![(min, max); 3], resolution)
    }

    pub fn dimension(&self) -> usize {
        self.bounds.len()
    }

    /// Evenly spaced sample coordinates along one axis, ends included
    pub fn axis_values(&self, axis: usize) -> Vec<f64> {
        let Some(&(min, max)) = self.bounds.get(axis) else {
            return Vec::new();
        };
        match self.resolution {
            0 => Vec::new(),
            1 => vec![min],
            n => {
                let step = (max - min) / (n - 1) as f64;
                (0..n).map(|i| min + step * i as f64).collect()
            }
        }
    }
}

/// How a shape should be drawn
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyle {
    pub name: String,
    pub color: ShapeColor,
}

/// External plotting sink
///
/// `field` maps a world point (one coordinate per grid axis) to a value whose
/// zero crossing is the shape boundary. NaN marks points where the shape is
/// undefined.
pub trait RenderSurface {
    fn render(
        &mut self,
        field: &dyn Fn(&[f64]) -> f64,
        grid: &SampleGrid,
        style: &ShapeStyle,
    ) -> Result<(), BackendError>;
}
