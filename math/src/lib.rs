use std::fmt;

mod camera;
mod geometry;
mod mat3;
mod mat4;
pub mod node;
mod transform;
mod vector;

#[cfg(test)]
mod tests;

pub use camera::Camera;
pub use geometry::Geometry;
pub use mat3::Mat3;
pub use mat4::Mat4;
pub use node::{Graph, NodeId};
pub use transform::Transform;
pub use vector::Vec3;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Error {
    // Matrix has no inverse.
    Singular,
    // Inputs don't define a valid basis or projection.
    Degenerate(&'static str),
    // Reparenting would make a node its own ancestor.
    Cycle,
    UnknownNode,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Singular => f.write_str("matrix is singular"),
            Error::Degenerate(what) => write!(f, "degenerate input: {what}"),
            Error::Cycle => f.write_str("node hierarchy would contain a cycle"),
            Error::UnknownNode => f.write_str("no such node"),
        }
    }
}

impl std::error::Error for Error {}

pub fn degrees(radians: f32) -> f32 {
    radians * 180.0 / std::f32::consts::PI
}

pub fn radians(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}
