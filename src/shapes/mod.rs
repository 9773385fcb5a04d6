//! Shapes
//!
//! Expanded equations placed in world space with a translation and rotation.
//! Rotation is held both as Euler angles (degrees) and as a unit quaternion;
//! setting either keeps the other in sync.

mod manager;
mod shape;

pub use manager::ShapeManager;
pub use shape::{EulerAngles, Shape, ShapeColor};
