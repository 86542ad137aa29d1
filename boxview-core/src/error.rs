/// Error types for boxview
use nalgebra::Point3;
use thiserror::Error;

/// Validation failures raised while building or projecting a box
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("points must lie in the first octant with non-negative coordinates (got {point})")]
    InvalidGeometry { point: Point3<f64> },

    #[error("camera must lie in the first octant with positive coordinates (got {camera})")]
    InvalidCamera { camera: Point3<f64> },

    #[error("box must lie entirely between the camera and the z=0 plane (vertex {vertex}, camera {camera})")]
    GeometryOutOfBounds {
        vertex: Point3<f64>,
        camera: Point3<f64>,
    },

    #[error("Scene parse error: {0}")]
    Parse(String),
}

/// Result type alias for boxview operations
pub type Result<T> = std::result::Result<T, Error>;
