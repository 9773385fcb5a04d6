//! Coordinate axis name table
//!
//! Axis `i` of a `d`-dimensional expansion is always entry `i` of the table,
//! so the first `d` names are the coordinates of that space.

use crate::error::ExpandError;

/// Default axis names, in expansion order
pub const DEFAULT_AXIS_NAMES: [&str; 10] = ["x", "y", "z", "w", "v", "u", "t", "s", "r", "q"];

/// Ordered, fixed list of coordinate symbol names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisTable {
    names: Vec<String>,
}

impl Default for AxisTable {
    fn default() -> Self {
        Self::new(DEFAULT_AXIS_NAMES)
    }
}

impl AxisTable {
    /// Build a table from an ordered list of names
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Largest dimension this table can instantiate
    pub fn max_dimension(&self) -> usize {
        self.names.len()
    }

    /// First `dimension` axis names
    pub fn coords(&self, dimension: usize) -> Result<&[String], ExpandError> {
        if dimension == 0 || dimension > self.names.len() {
            return Err(ExpandError::DimensionOutOfRange {
                dimension,
                max: self.names.len(),
            });
        }
        Ok(&self.names[..dimension])
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(|s| s.as_str())
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}
