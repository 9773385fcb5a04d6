//! Identity Library
//!
//! Named notation presets ("identities") with default parameters, e.g.
//! `Circle/Sphere` → `sum(Dim^2) = r^2` with `r = 5`. The same preset
//! yields a circle in 2D, a sphere in 3D and a hypersphere beyond.
//!
//! Extra presets can be loaded from YAML:
//!
//! ```yaml
//! L4 Ball:
//!   expr: sum(Dim^4) = r^4
//!   params: { r: 2 }
//!   description: Rounded cube
//!   min_dim: 2
//! ```

mod definition;
mod registry;

pub use definition::IdentityDefinition;
pub use registry::IdentityLibrary;
