//! dimexpand - dimension-agnostic equation templates
//!
//! Write a shape once, expand it for any dimension:
//!
//! ```text
//! sum(Dim^2) = r^2      (2D, r=5)  →  ((x^2) + (y^2)) = 5^2
//! max(|Dim|) = 1        (3D)       →  Max(Abs(x), Abs(y), Abs(z)) = 1
//! Dim[0]^2 - Dim[1]^2 = Dim[2]     →  x^2 - y^2 = z
//! ```
//!
//! ## Modules
//!
//! - [`notation`]: tokenizer, aggregate macros, parameters and the [`TemplateExpander`]
//! - [`identities`]: named presets, built-in and YAML-loaded
//! - [`axes`]: the ordered axis-name table
//! - [`equation`]: equation splitting and level-set text
//! - [`functions`]: user-defined `name(params) = body` functions
//! - [`backend`]: traits for the external parser/evaluator and render surface
//! - [`shapes`]: placed shapes with translation and rotation
//! - [`session`]: shapes wired to a symbolic backend
//! - [`config`]: environment configuration and library loading
//!
//! The crate produces text. Parsing, evaluating and drawing belong to the
//! caller's [`SymbolicBackend`] and [`RenderSurface`].

pub mod axes;
pub mod backend;
pub mod config;
pub mod equation;
pub mod error;
pub mod functions;
pub mod identities;
pub mod notation;
pub mod session;
pub mod shapes;

pub use axes::{AxisTable, DEFAULT_AXIS_NAMES};
pub use backend::{RenderSurface, SampleGrid, ShapeStyle, SymbolTable, SymbolicBackend};
pub use config::LibraryConfig;
pub use equation::{chain_parts, level_set, split_chain, split_equation, EquationSides};
pub use error::{BackendError, EquationError, ExpandError, FunctionError, SessionError};
pub use functions::{parse_definition, FunctionDefinition, FunctionRegistry};
pub use identities::{IdentityDefinition, IdentityLibrary};
pub use notation::{parse_param_list, MacroKind, ParamListError, Params, TemplateExpander};
pub use session::Session;
pub use shapes::{EulerAngles, Shape, ShapeColor, ShapeManager};

/// Expand `notation` for `dimension` with the default axis names
///
/// Convenience wrapper over [`TemplateExpander::expand`].
pub fn expand(notation: &str, dimension: usize, params: &Params) -> Result<String, ExpandError> {
    TemplateExpander::new().expand(notation, dimension, params)
}

/// Expand a built-in identity with the default axis names
pub fn expand_identity(
    name: &str,
    dimension: usize,
    overrides: &Params,
) -> Result<String, ExpandError> {
    TemplateExpander::new().expand_identity(
        &IdentityLibrary::with_builtins(),
        name,
        dimension,
        overrides,
    )
}
