/// boxview core library - box geometry and perspective projection
///
/// Builds the corners and faces of a box in the first octant and projects
/// them onto the z=0 plane as seen from a camera. Rendering is left to the
/// caller; everything here is pure arithmetic over plain values.

pub mod error;
pub mod geometry;
pub mod projection;
pub mod scene;

// Re-export commonly used types
pub use error::{Error, Result};
pub use geometry::{Face, FaceSide, Parallelepiped};
pub use projection::{bounds, Bounds, Camera, ProjectedFace};
pub use scene::{parse_point, Scene};
