//! Error types for notation expansion, equations, and collaborator calls
//!
//! Expansion failures are always caller input problems: every variant of
//! [`ExpandError`] terminates the current call with no partial result.
//! Failures raised by the external symbolic backend or rendering surface are
//! carried through [`BackendError`] without interpretation.

use thiserror::Error;
use uuid::Uuid;

/// Errors raised while expanding dimension-agnostic notation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpandError {
    #[error("Dimension {dimension} is out of range (supported: 1..={max})")]
    DimensionOutOfRange { dimension: usize, max: usize },

    #[error("Index Dim[{index}] out of range for {dimension}D")]
    IndexOutOfRange { index: usize, dimension: usize },

    #[error("Malformed call to '{name}' at position {position}: argument list is empty or not closed")]
    MalformedMacroCall { name: String, position: usize },

    #[error("'Dim' at position {position} is not inside sum/prod/max/min; use Dim[i] for a single axis")]
    StrayDim { position: usize },

    #[error("Unbalanced absolute-value bar at position {position}")]
    UnbalancedAbs { position: usize },

    #[error("Invalid parameter name '{0}'")]
    InvalidParameterName(String),

    #[error("Invalid value for parameter '{name}': {value}")]
    InvalidParameterValue { name: String, value: f64 },

    #[error("Unknown identity: {0}")]
    UnknownIdentity(String),

    #[error("{name} requires at least {required}D (got {got}D)")]
    DimensionTooLow {
        name: String,
        required: usize,
        got: usize,
    },
}

/// Errors from the textual equation helpers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EquationError {
    #[error("Not an equation (no '=' found): {0}")]
    MissingEquals(String),

    #[error("Invalid equation: {0} (multiple = signs)")]
    MultipleEquals(String),

    #[error("Equation has an empty side: {0}")]
    EmptySide(String),
}

/// Errors in a user function definition `name(a, b) = body`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FunctionError {
    #[error("Invalid function definition: {0}")]
    Syntax(String),

    #[error("'{0}' is reserved and cannot name a function or its parameter")]
    ReservedName(String),

    #[error("Parameter '{name}' appears more than once in {function}")]
    DuplicateParameter { function: String, name: String },
}

/// Errors surfaced unchanged from external collaborators
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Evaluation error: {0}")]
    Evaluation(String),

    #[error("Solve error: {0}")]
    Solve(String),

    #[error("Render error: {0}")]
    Render(String),
}

/// Errors from the shape workspace pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("Expansion error: {0}")]
    Expand(#[from] ExpandError),

    #[error("Equation error: {0}")]
    Equation(#[from] EquationError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Function error: {0}")]
    Function(#[from] FunctionError),

    #[error("Unknown shape: {0}")]
    UnknownShape(Uuid),

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("{name} takes {expected} argument(s) (got {got})")]
    Arity {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("Point has {got} coordinates but the shape is {expected}D")]
    PointDimension { expected: usize, got: usize },
}
