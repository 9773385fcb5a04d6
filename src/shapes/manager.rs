//! Shape collection

use tracing::debug;
use uuid::Uuid;

use super::shape::{Shape, ShapeColor};

/// Ordered collection of shapes
#[derive(Debug, Default, Clone)]
pub struct ShapeManager {
    shapes: Vec<Shape>,
    /// Bumped for every auto-named shape
    counter: usize,
}

impl ShapeManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape; unnamed shapes become `Shape N`
    ///
    /// Colour follows the palette by position in the collection.
    pub fn add(
        &mut self,
        equation: impl Into<String>,
        dimension: usize,
        name: Option<&str>,
    ) -> &mut Shape {
        let name = match name {
            Some(name) => name.to_string(),
            None => {
                self.counter += 1;
                format!("Shape {}", self.counter)
            }
        };
        let color = ShapeColor::nth(self.shapes.len());
        let shape = Shape::new(name, equation, dimension, color);
        debug!("Added shape {:?} ({}) in {}D", shape.name, shape.id, dimension);

        self.shapes.push(shape);
        let last = self.shapes.len() - 1;
        &mut self.shapes[last]
    }

    /// Remove a shape by id
    pub fn remove(&mut self, id: Uuid) -> Option<Shape> {
        let index = self.shapes.iter().position(|s| s.id == id)?;
        Some(self.shapes.remove(index))
    }

    pub fn get(&self, id: Uuid) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    pub fn visible(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|s| s.visible)
    }

    /// Remove everything and restart auto-naming at `Shape 1`
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.counter = 0;
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }
}
