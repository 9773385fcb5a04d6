//! User-defined functions
//!
//! A definition names a notation body over its own parameters:
//!
//! ```text
//! Circle(r) = sum(Dim^2) - r^2
//! Band(lo, hi) = max(|Dim|) - (lo + hi)/2
//! ```
//!
//! The body is expanded for a dimension when the function is defined; the
//! parameters stay free symbols and are bound at evaluation time.

use std::collections::HashMap;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, multispace0},
    combinator::recognize,
    error::VerboseError,
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};
use tracing::warn;

use crate::error::FunctionError;
use crate::notation::is_reserved;

/// A parsed `name(params) = body` definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: String,
    pub params: Vec<String>,
    /// Body notation as written, trimmed
    pub body: String,
}

/// A stored function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDefinition {
    pub name: String,
    pub params: Vec<String>,
    /// Body notation as written
    pub body: String,
    /// Body expanded for `dimension`
    pub expanded: String,
    pub dimension: usize,
    /// The full definition text
    pub definition: String,
}

/// Parse `name(a, b) = body`
///
/// The body must be an expression; a second `=` is rejected.
pub fn parse_definition(text: &str) -> Result<FunctionSignature, FunctionError> {
    let (body, (name, params)) = match signature(text) {
        Ok(parsed) => parsed,
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            return Err(FunctionError::Syntax(nom::error::convert_error(text, e)))
        }
        Err(nom::Err::Incomplete(_)) => {
            return Err(FunctionError::Syntax("Incomplete input".to_string()))
        }
    };

    let body = body.trim();
    if body.is_empty() || body.contains('=') {
        return Err(FunctionError::Syntax(format!(
            "{}: body must be a single expression",
            text.trim()
        )));
    }

    let mut names = std::iter::once(name).chain(params.iter().copied());
    if let Some(reserved) = names.find(|n| is_reserved(n)) {
        return Err(FunctionError::ReservedName(reserved.to_string()));
    }

    let mut seen: Vec<&str> = Vec::with_capacity(params.len());
    for param in &params {
        if seen.contains(param) {
            return Err(FunctionError::DuplicateParameter {
                function: name.to_string(),
                name: param.to_string(),
            });
        }
        seen.push(*param);
    }

    Ok(FunctionSignature {
        name: name.to_string(),
        params: params.into_iter().map(str::to_string).collect(),
        body: body.to_string(),
    })
}

type ParseResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

fn signature(input: &str) -> ParseResult<'_, (&str, Vec<&str>)> {
    let (input, name) = preceded(multispace0, identifier)(input)?;
    let (input, params) = delimited(
        tuple((multispace0, char('('), multispace0)),
        separated_list0(delimited(multispace0, char(','), multispace0), identifier),
        tuple((multispace0, char(')'), multispace0, char('='))),
    )(input)?;
    // Whatever follows `=` is the body
    Ok((input, (name, params)))
}

fn identifier(input: &str) -> ParseResult<'_, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

/// Functions by name, in definition order
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    entries: Vec<FunctionDefinition>,
    by_name: HashMap<String, usize>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a function, replacing any earlier one with the same name
    pub fn register(&mut self, def: FunctionDefinition) {
        match self.by_name.get(&def.name) {
            Some(&index) => {
                warn!("Function {:?} redefined; replacing previous definition", def.name);
                self.entries[index] = def;
            }
            None => {
                self.by_name.insert(def.name.clone(), self.entries.len());
                self.entries.push(def);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDefinition> {
        self.by_name.get(name).map(|&i| &self.entries[i])
    }

    /// Names in definition order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunctionDefinition> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.by_name.clear();
    }
}
