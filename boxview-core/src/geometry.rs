/// Box geometry: corners and faces of a parallelepiped in the first octant
use log::debug;
use nalgebra::{Point3, Vector3};

use crate::error::{Error, Result};

pub const N_CORNERS: usize = 8;
pub const N_FACES: usize = 6;

/// Corner indices of each face, in `FaceSide::ALL` order.
///
/// Corners are numbered O, O+v1, O+v2, O+v3, O+v1+v2, O+v1+v3, O+v2+v3,
/// O+v1+v2+v3. Consecutive entries of a row are edge-adjacent.
const FACE_CORNERS: [[usize; 4]; N_FACES] = [
    [0, 1, 4, 2], // bottom
    [0, 1, 5, 3], // front
    [0, 2, 6, 3], // left
    [7, 5, 1, 4], // back
    [7, 5, 3, 6], // top
    [7, 4, 2, 6], // right
];

/// The six sides of a box, named relative to its edge vectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceSide {
    Bottom,
    Front,
    Left,
    Back,
    Top,
    Right,
}

impl FaceSide {
    pub const ALL: [FaceSide; N_FACES] = [
        FaceSide::Bottom,
        FaceSide::Front,
        FaceSide::Left,
        FaceSide::Back,
        FaceSide::Top,
        FaceSide::Right,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Indices into `Parallelepiped::corners` for this side
    pub fn corner_indices(self) -> [usize; 4] {
        FACE_CORNERS[self.index()]
    }
}

/// A quadrilateral side of a box, as four corners traced around its boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub side: FaceSide,
    pub vertices: [Point3<f64>; 4],
}

/// An axis-aligned box spanned by an origin and three edge vectors
#[derive(Debug, Clone, PartialEq)]
pub struct Parallelepiped {
    origin: Point3<f64>,
    edges: [Vector3<f64>; 3],
    corners: [Point3<f64>; N_CORNERS],
    faces: [Face; N_FACES],
}

impl Parallelepiped {
    /// Build a box from its origin and three edge vectors.
    ///
    /// The origin and the three points `origin + v` must have no negative
    /// coordinate. The edge vectors are assumed to be mutually perpendicular
    /// and non-zero; this is not checked.
    pub fn new(
        origin: Point3<f64>,
        v1: Vector3<f64>,
        v2: Vector3<f64>,
        v3: Vector3<f64>,
    ) -> Result<Self> {
        for point in [origin, origin + v1, origin + v2, origin + v3] {
            if !in_first_octant(&point) {
                return Err(Error::InvalidGeometry { point });
            }
        }

        let corners = [
            origin,
            origin + v1,
            origin + v2,
            origin + v3,
            origin + v1 + v2,
            origin + v1 + v3,
            origin + v2 + v3,
            origin + v1 + v2 + v3,
        ];

        let faces = FaceSide::ALL.map(|side| Face {
            side,
            vertices: side.corner_indices().map(|i| corners[i]),
        });

        debug!(
            "built box at {} with edges {:?}, far corner {}",
            origin,
            [v1, v2, v3].map(|v| (v.x, v.y, v.z)),
            corners[N_CORNERS - 1]
        );

        Ok(Self {
            origin,
            edges: [v1, v2, v3],
            corners,
            faces,
        })
    }

    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    pub fn edges(&self) -> [Vector3<f64>; 3] {
        self.edges
    }

    pub fn corners(&self) -> &[Point3<f64>; N_CORNERS] {
        &self.corners
    }

    pub fn faces(&self) -> &[Face; N_FACES] {
        &self.faces
    }

    pub fn face(&self, side: FaceSide) -> &Face {
        &self.faces[side.index()]
    }
}

fn in_first_octant(point: &Point3<f64>) -> bool {
    point.iter().all(|&c| c >= 0.0)
}
