//! Parameter mappings
//!
//! Parameters are named numeric values substituted after macro expansion.
//! Names missing from a mapping are left in the output as free symbols.
//!
//! ## List syntax
//!
//! ```text
//! a=2, b=3, r=5
//! ```

use std::collections::BTreeMap;

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::all_consuming,
    error::{context, VerboseError},
    multi::separated_list0,
    number::complete::double,
    sequence::{delimited, separated_pair},
    IResult,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::lexer::{is_identifier, DIM_KEYWORD};
use super::macros::MacroKind;
use crate::backend::KNOWN_FUNCTIONS;
use crate::error::ExpandError;

/// Function names the expander itself emits
pub const OUTPUT_FUNCTIONS: [&str; 3] = ["Max", "Min", "Abs"];

/// Errors parsing a `name=value` list
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParamListError {
    #[error("Invalid parameter list: {0}")]
    Syntax(String),

    #[error("Parameter '{0}' given more than once")]
    Duplicate(String),

    #[error("Invalid parameter: {0}")]
    Invalid(#[from] ExpandError),
}

/// Parameter name → value mapping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, f64>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter (builder style)
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.0.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Merge `overrides` over these values; overrides win on collision
    pub fn merged(&self, overrides: &Params) -> Params {
        let mut merged = self.clone();
        for (name, value) in overrides.iter() {
            merged.insert(name, value);
        }
        merged
    }

    /// Check every name is a usable identifier and every value is finite
    ///
    /// See [`is_reserved`] for the names that are refused.
    pub fn validate(&self) -> Result<(), ExpandError> {
        for (name, value) in self.iter() {
            if is_reserved(name) || !is_identifier(name) {
                return Err(ExpandError::InvalidParameterName(name.to_string()));
            }
            if !value.is_finite() {
                return Err(ExpandError::InvalidParameterValue {
                    name: name.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Names that never act as parameters: `Dim`, the macro names, and every
/// function name a backend is expected to recognise
pub fn is_reserved(name: &str) -> bool {
    name == DIM_KEYWORD
        || MacroKind::from_name(name).is_some()
        || OUTPUT_FUNCTIONS.contains(&name)
        || KNOWN_FUNCTIONS.contains(&name)
}

impl<S: Into<String>> FromIterator<(S, f64)> for Params {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Format a parameter value for substitution
///
/// Negative values are parenthesized so `x^2/a^2` with `a = -2` stays
/// `x^2/(-2)^2`.
pub fn format_value(value: f64) -> String {
    if value.is_sign_negative() && value != 0.0 {
        format!("({})", value)
    } else {
        // Normalizes -0.0 as well
        format!("{}", value.abs())
    }
}

/// Parse a `name=value, name=value` list
///
/// An empty or all-whitespace input yields an empty mapping.
pub fn parse_param_list(input: &str) -> Result<Params, ParamListError> {
    let pairs = match all_consuming(delimited(multispace0, param_list, multispace0))(input) {
        Ok((_, pairs)) => pairs,
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            return Err(ParamListError::Syntax(nom::error::convert_error(input, e)))
        }
        Err(nom::Err::Incomplete(_)) => {
            return Err(ParamListError::Syntax("Incomplete input".to_string()))
        }
    };

    let mut params = Params::new();
    for (name, value) in pairs {
        if params.insert(name, value).is_some() {
            return Err(ParamListError::Duplicate(name.to_string()));
        }
    }
    params.validate()?;
    Ok(params)
}

fn param_list(input: &str) -> IResult<&str, Vec<(&str, f64)>, VerboseError<&str>> {
    separated_list0(
        delimited(multispace0, char(','), multispace0),
        separated_pair(
            context("parameter name", param_name),
            delimited(multispace0, char('='), multispace0),
            context("numeric value", double),
        ),
    )(input)
}

fn param_name(input: &str) -> IResult<&str, &str, VerboseError<&str>> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param_list() {
        let params = parse_param_list("a=2, b=3, r=5").unwrap();
        assert_eq!(params.len(), 3);
        assert_eq!(params.get("a"), Some(2.0));
        assert_eq!(params.get("r"), Some(5.0));
    }

    #[test]
    fn test_parse_param_list_spacing_and_floats() {
        let params = parse_param_list("  p = 2.5 ,R=-1e1 ").unwrap();
        assert_eq!(params.get("p"), Some(2.5));
        assert_eq!(params.get("R"), Some(-10.0));
    }

    #[test]
    fn test_parse_empty_list() {
        assert!(parse_param_list("").unwrap().is_empty());
        assert!(parse_param_list("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_param_list_errors() {
        assert!(matches!(
            parse_param_list("a=2, b"),
            Err(ParamListError::Syntax(_))
        ));
        assert!(matches!(
            parse_param_list("a=two"),
            Err(ParamListError::Syntax(_))
        ));
        assert_eq!(
            parse_param_list("a=1, a=2"),
            Err(ParamListError::Duplicate("a".into()))
        );
        assert!(matches!(
            parse_param_list("Dim=1"),
            Err(ParamListError::Invalid(ExpandError::InvalidParameterName(_)))
        ));
    }

    #[test]
    fn test_validate_rejects_reserved_names_and_non_finite_values() {
        assert!(Params::new().with("sum", 1.0).validate().is_err());
        assert!(Params::new().with("Abs", 1.0).validate().is_err());
        for function in ["sqrt", "sin", "cos", "tan"] {
            assert_eq!(
                Params::new().with(function, 3.0).validate(),
                Err(ExpandError::InvalidParameterName(function.to_string()))
            );
        }
        assert!(Params::new().with("2a", 1.0).validate().is_err());
        assert!(Params::new().with("a", f64::NAN).validate().is_err());
        assert!(Params::new().with("R", 3.0).with("r", 1.0).validate().is_ok());
    }

    #[test]
    fn test_merged_overrides_win() {
        let defaults = Params::new().with("r", 1.0).with("p", 2.5);
        let merged = defaults.merged(&Params::new().with("r", 4.0));
        assert_eq!(merged.get("r"), Some(4.0));
        assert_eq!(merged.get("p"), Some(2.5));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(3.0), "3");
        assert_eq!(format_value(2.5), "2.5");
        assert_eq!(format_value(-2.0), "(-2)");
        assert_eq!(format_value(-0.0), "0");
    }
}
