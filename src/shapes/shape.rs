//! A placed shape: equation text plus a rigid transform

use nalgebra::{UnitQuaternion, Vector3};
use uuid::Uuid;

/// Display colour; shapes cycle through [`ShapeColor::PALETTE`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeColor {
    Blue,
    Red,
    Green,
    Purple,
    Orange,
    Cyan,
    Magenta,
}

impl ShapeColor {
    pub const PALETTE: [ShapeColor; 7] = [
        ShapeColor::Blue,
        ShapeColor::Red,
        ShapeColor::Green,
        ShapeColor::Purple,
        ShapeColor::Orange,
        ShapeColor::Cyan,
        ShapeColor::Magenta,
    ];

    /// Palette entry for the n-th shape
    pub fn nth(n: usize) -> Self {
        Self::PALETTE[n % Self::PALETTE.len()]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShapeColor::Blue => "blue",
            ShapeColor::Red => "red",
            ShapeColor::Green => "green",
            ShapeColor::Purple => "purple",
            ShapeColor::Orange => "orange",
            ShapeColor::Cyan => "cyan",
            ShapeColor::Magenta => "magenta",
        }
    }
}

impl std::fmt::Display for ShapeColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Rotation in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EulerAngles {
    /// About y
    pub pitch: f64,
    /// About x
    pub roll: f64,
    /// About z; the only angle used in 2D
    pub yaw: f64,
}

impl EulerAngles {
    pub fn new(pitch: f64, roll: f64, yaw: f64) -> Self {
        Self { pitch, roll, yaw }
    }

    fn to_quaternion(self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_euler_angles(
            self.roll.to_radians(),
            self.pitch.to_radians(),
            self.yaw.to_radians(),
        )
    }

    fn from_quaternion(q: &UnitQuaternion<f64>) -> Self {
        let (roll, pitch, yaw) = q.euler_angles();
        Self {
            pitch: pitch.to_degrees(),
            roll: roll.to_degrees(),
            yaw: yaw.to_degrees(),
        }
    }
}

/// A shape placed in world space
///
/// `equation` is fully expanded text over the first `dimension` axis names.
/// The transform maps shape-local coordinates to world coordinates; sampling
/// goes the other way through [`Shape::to_local`].
#[derive(Debug, Clone)]
pub struct Shape {
    pub id: Uuid,
    pub name: String,
    pub equation: String,
    pub dimension: usize,
    pub translation: Vector3<f64>,
    euler: EulerAngles,
    rotation: UnitQuaternion<f64>,
    pub visible: bool,
    pub color: ShapeColor,
}

impl Shape {
    pub fn new(
        name: impl Into<String>,
        equation: impl Into<String>,
        dimension: usize,
        color: ShapeColor,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            equation: equation.into(),
            dimension,
            translation: Vector3::zeros(),
            euler: EulerAngles::default(),
            rotation: UnitQuaternion::identity(),
            visible: true,
            color,
        }
    }

    pub fn euler(&self) -> EulerAngles {
        self.euler
    }

    pub fn rotation(&self) -> &UnitQuaternion<f64> {
        &self.rotation
    }

    /// Set rotation from Euler angles in degrees
    pub fn set_rotation_euler(&mut self, pitch: f64, roll: f64, yaw: f64) {
        self.euler = EulerAngles::new(pitch, roll, yaw);
        self.rotation = self.euler.to_quaternion();
    }

    /// Set rotation from a quaternion; Euler angles follow
    pub fn set_rotation_quaternion(&mut self, rotation: UnitQuaternion<f64>) {
        self.euler = EulerAngles::from_quaternion(&rotation);
        self.rotation = rotation;
    }

    /// In-plane rotation in degrees
    pub fn rotation_angle_2d(&self) -> f64 {
        self.euler.yaw
    }

    pub fn set_translation(&mut self, x: f64, y: f64, z: f64) {
        self.translation = Vector3::new(x, y, z);
    }

    /// Map a world point into shape-local coordinates
    ///
    /// Only the first three coordinates are transformed; any further axes
    /// pass through unchanged. 2D shapes ignore the z translation and rotate
    /// by yaw alone.
    pub fn to_local(&self, point: &[f64]) -> Vec<f64> {
        let coord = |i: usize| point.get(i).copied().unwrap_or(0.0);

        let (offset, rotation) = if self.dimension <= 2 {
            let planar = UnitQuaternion::from_euler_angles(0.0, 0.0, self.euler.yaw.to_radians());
            (
                Vector3::new(self.translation.x, self.translation.y, 0.0),
                planar,
            )
        } else {
            (self.translation, self.rotation)
        };

        let world = Vector3::new(coord(0), coord(1), coord(2));
        let local = rotation.inverse_transform_vector(&(world - offset));

        let mut out = point.to_vec();
        for (i, value) in local.iter().enumerate().take(point.len()) {
            out[i] = *value;
        }
        out
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let vis = if self.visible { "visible" } else { "hidden" };
        write!(
            f,
            "{} ({}D, {}, {}): {}",
            self.name, self.dimension, self.color, vis, self.equation
        )
    }
}
