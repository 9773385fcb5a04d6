//! Equation text helpers
//!
//! Expanded notation is an equation `lhs = rhs`. Collaborators want either
//! the two sides, or a single expression whose zero set is the shape
//! boundary. Chains `A = B = C` split into pairwise equations.

use crate::error::EquationError;

/// The two sides of an equation, trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquationSides {
    pub lhs: String,
    pub rhs: String,
}

impl EquationSides {
    /// Expression whose zero set is the equation's solution set
    pub fn level_set(&self) -> String {
        format!("{} - ({})", self.lhs, self.rhs)
    }
}

/// Split an equation with exactly one `=`
pub fn split_equation(text: &str) -> Result<EquationSides, EquationError> {
    let mut sides = split_chain(text)?;
    if sides.len() > 1 {
        return Err(EquationError::MultipleEquals(text.to_string()));
    }
    // split_chain never returns an empty list
    Ok(sides.remove(0))
}

/// The expressions of `A = B = C`, trimmed: `[A, B, C]`
pub fn chain_parts(text: &str) -> Result<Vec<&str>, EquationError> {
    let parts: Vec<&str> = text.split('=').map(str::trim).collect();
    if parts.len() < 2 {
        return Err(EquationError::MissingEquals(text.to_string()));
    }
    if parts.iter().any(|p| p.is_empty()) {
        return Err(EquationError::EmptySide(text.to_string()));
    }
    Ok(parts)
}

/// Split `A = B = C` into `[A = B, B = C]`
pub fn split_chain(text: &str) -> Result<Vec<EquationSides>, EquationError> {
    let parts = chain_parts(text)?;

    Ok(parts
        .windows(2)
        .map(|pair| EquationSides {
            lhs: pair[0].to_string(),
            rhs: pair[1].to_string(),
        })
        .collect())
}

/// Level-set form of an equation or bare expression
///
/// A bare expression is taken as `expr = 0` and returned trimmed.
pub fn level_set(text: &str) -> Result<String, EquationError> {
    if !text.contains('=') {
        let expr = text.trim();
        if expr.is_empty() {
            return Err(EquationError::EmptySide(text.to_string()));
        }
        return Ok(expr.to_string());
    }
    Ok(split_equation(text)?.level_set())
}
