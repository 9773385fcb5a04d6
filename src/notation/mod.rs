//! Dimension-agnostic notation
//!
//! ## Vocabulary
//!
//! - `sum(E)`  → `((E_x) + (E_y) + ...)`
//! - `prod(E)` → `((E_x) * (E_y) * ...)`
//! - `max(E)`  → `Max(E_x, E_y, ...)`
//! - `min(E)`  → `Min(E_x, E_y, ...)`
//! - `Dim`     → the current axis inside one of the above
//! - `Dim[i]`  → axis `i`, anywhere
//! - `|E|`     → `Abs(E)`
//!
//! Any other identifier is a parameter, substituted when a value is given.

mod expander;
mod lexer;
mod macros;
mod params;

pub use expander::TemplateExpander;
pub use lexer::{is_identifier, tokenize, Spanned, Token, DIM_KEYWORD};
pub use macros::{Combine, MacroKind};
pub use params::{
    format_value, is_reserved, parse_param_list, ParamListError, Params, OUTPUT_FUNCTIONS,
};
