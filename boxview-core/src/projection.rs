/// Camera and perspective projection onto the z=0 plane
use log::debug;
use nalgebra::{Point2, Point3};

use crate::error::{Error, Result};
use crate::geometry::{Face, FaceSide, Parallelepiped, N_FACES};

/// Pinhole camera looking down the z axis onto the plane z=0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point3<f64>,
}

/// A box face mapped onto the z=0 plane, vertices in the face's order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedFace {
    pub side: FaceSide,
    pub vertices: [Point2<f64>; 4],
}

impl ProjectedFace {
    /// Boundary segments of the quadrilateral, closing back to the first vertex
    pub fn outline(&self) -> impl Iterator<Item = (Point2<f64>, Point2<f64>)> + '_ {
        (0..4).map(move |k| (self.vertices[k], self.vertices[(k + 1) % 4]))
    }
}

/// Axis-aligned 2D extent of a set of projected faces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// Smallest rectangle containing every projected vertex, or `None` if there are none
pub fn bounds(faces: &[ProjectedFace]) -> Option<Bounds> {
    let mut points = faces.iter().flat_map(|face| face.vertices.iter());
    let first = *points.next()?;
    Some(points.fold(
        Bounds {
            min: first,
            max: first,
        },
        |b, p| Bounds {
            min: Point2::new(b.min.x.min(p.x), b.min.y.min(p.y)),
            max: Point2::new(b.max.x.max(p.x), b.max.y.max(p.y)),
        },
    ))
}

impl Camera {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Point3::new(x, y, z),
        }
    }

    /// Every coordinate must be strictly positive
    pub fn validate(&self) -> Result<()> {
        if self.position.iter().all(|&c| c > 0.0) {
            Ok(())
        } else {
            Err(Error::InvalidCamera {
                camera: self.position,
            })
        }
    }

    /// Check that every corner of the box lies strictly below the camera on all three axes
    pub fn check_contains(&self, cuboid: &Parallelepiped) -> Result<()> {
        for face in cuboid.faces() {
            for vertex in &face.vertices {
                if vertex
                    .iter()
                    .zip(self.position.iter())
                    .any(|(c, cc)| c >= cc)
                {
                    return Err(Error::GeometryOutOfBounds {
                        vertex: *vertex,
                        camera: self.position,
                    });
                }
            }
        }
        Ok(())
    }

    /// Perspective image of `point` on the z=0 frame centered under the camera.
    ///
    /// The result is where the line through `point` and the camera meets z=0,
    /// mirrored through the camera's foot point `(cx, cy)`, so the picture is
    /// not inverted. Callers must ensure `point.z != self.position.z`.
    pub fn project_point(&self, point: &Point3<f64>) -> Point2<f64> {
        let c = &self.position;
        let depth = point.z - c.z;
        Point2::new(
            c.z * (point.x - c.x) / depth + c.x,
            c.z * (point.y - c.y) / depth + c.y,
        )
    }

    fn project_face(&self, face: &Face) -> ProjectedFace {
        ProjectedFace {
            side: face.side,
            vertices: face.vertices.map(|v| self.project_point(&v)),
        }
    }

    /// Project every face of the box, preserving face and vertex order.
    ///
    /// Either all six faces are projected or an error is returned.
    pub fn project(&self, cuboid: &Parallelepiped) -> Result<[ProjectedFace; N_FACES]> {
        self.validate()?;
        self.check_contains(cuboid)?;

        let faces = *cuboid.faces();
        let projected = faces.map(|face| self.project_face(&face));
        debug!(
            "projected {} faces from camera {}",
            projected.len(),
            self.position
        );
        Ok(projected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn unit_box() -> Parallelepiped {
        Parallelepiped::new(
            Point3::new(1.0, 1.0, 1.0),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(0.0, 2.0, 0.0),
            Vector3::new(0.0, 0.0, 2.0),
        )
        .unwrap()
    }

    /// Solve camera + t * (point - camera) for z = 0, then mirror through (cx, cy)
    fn mirrored_ground_hit(camera: &Point3<f64>, point: &Point3<f64>) -> Point2<f64> {
        let dir = point - camera;
        let t = -camera.z / dir.z;
        let hit = camera + dir * t;
        Point2::new(2.0 * camera.x - hit.x, 2.0 * camera.y - hit.y)
    }

    #[test]
    fn test_camera_with_zero_coordinate_rejected() {
        let camera = Camera::new(0.0, 5.0, 5.0);
        let err = camera.project(&unit_box()).unwrap_err();
        assert!(matches!(err, Error::InvalidCamera { .. }));
    }

    #[test]
    fn test_camera_with_negative_coordinate_rejected() {
        let camera = Camera::new(6.0, -1.0, 6.0);
        assert!(matches!(
            camera.validate(),
            Err(Error::InvalidCamera { .. })
        ));
    }

    #[test]
    fn test_camera_inside_box_rejected() {
        let camera = Camera::new(2.0, 2.0, 2.0);
        let err = camera.project(&unit_box()).unwrap_err();
        assert!(matches!(err, Error::GeometryOutOfBounds { .. }));
    }

    #[test]
    fn test_camera_level_with_box_rejected() {
        // Touching along one axis is enough; (3, 3, 1) is the first hit on the bottom face
        let camera = Camera::new(6.0, 3.0, 6.0);
        let err = camera.project(&unit_box()).unwrap_err();
        assert_eq!(
            err,
            Error::GeometryOutOfBounds {
                vertex: Point3::new(3.0, 3.0, 1.0),
                camera: Point3::new(6.0, 3.0, 6.0),
            }
        );
    }

    #[test]
    fn test_points_on_camera_axis_collapse() {
        let camera = Camera::new(6.0, 6.0, 6.0);
        let near = camera.project_point(&Point3::new(1.0, 1.0, 1.0));
        let far = camera.project_point(&Point3::new(3.0, 3.0, 3.0));
        // 6 * (1 - 6) / (1 - 6) + 6
        assert_relative_eq!(near, Point2::new(12.0, 12.0));
        assert_relative_eq!(far, near);
    }

    #[test]
    fn test_projection_matches_line_plane_intersection() {
        let cuboid = unit_box();
        for camera in [Camera::new(6.0, 6.0, 6.0), Camera::new(8.0, 8.0, 5.0)] {
            let projected = camera.project(&cuboid).unwrap();
            for (face, flat) in cuboid.faces().iter().zip(projected.iter()) {
                for (v, p) in face.vertices.iter().zip(flat.vertices.iter()) {
                    let expected = mirrored_ground_hit(&camera.position, v);
                    assert_relative_eq!(*p, expected, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_known_vertex_value() {
        // (3, 1, 1) seen from (8, 8, 5): x = 5 * -5 / -4 + 8, y = 5 * -7 / -4 + 8
        let camera = Camera::new(8.0, 8.0, 5.0);
        let p = camera.project_point(&Point3::new(3.0, 1.0, 1.0));
        assert_relative_eq!(p, Point2::new(14.25, 16.75));
    }

    #[test]
    fn test_face_order_preserved() {
        let cuboid = unit_box();
        let projected = Camera::new(6.0, 6.0, 6.0).project(&cuboid).unwrap();
        for (face, flat) in cuboid.faces().iter().zip(projected.iter()) {
            assert_eq!(face.side, flat.side);
        }
    }

    #[test]
    fn test_projection_is_deterministic() {
        let cuboid = unit_box();
        let a = Camera::new(8.0, 8.0, 5.0);
        let b = Camera::new(6.0, 6.0, 6.0);
        let first = a.project(&cuboid).unwrap();
        let other = b.project(&cuboid).unwrap();
        let second = a.project(&cuboid).unwrap();
        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(other, b.project(&cuboid).unwrap());
    }

    #[test]
    fn test_outline_closes_polygon() {
        let projected = Camera::new(6.0, 6.0, 6.0).project(&unit_box()).unwrap();
        let segments: Vec<_> = projected[0].outline().collect();
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[3].1, projected[0].vertices[0]);
    }

    #[test]
    fn test_bounds() {
        assert!(bounds(&[]).is_none());
        let projected = Camera::new(8.0, 8.0, 5.0).project(&unit_box()).unwrap();
        let b = bounds(&projected).unwrap();
        assert!(b.width() > 0.0 && b.height() > 0.0);
        for face in &projected {
            for v in &face.vertices {
                assert!(v.x >= b.min.x && v.x <= b.max.x);
                assert!(v.y >= b.min.y && v.y <= b.max.y);
            }
        }
    }
}
