/// Terminal front end: draws a box projection for each camera position
use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use log::{error, info};
use std::io::{self, Write};
use boxview_core::{Camera, Error, Parallelepiped, ProjectedFace};

pub mod renderer;

pub use renderer::WireframeRenderer;

/// Renders one box from a sequence of cameras
pub struct BoxViewer {
    cuboid: Parallelepiped,
    renderer: WireframeRenderer,
    color: bool,
}

impl BoxViewer {
    pub fn new(cuboid: Parallelepiped, width: usize, height: usize) -> Self {
        Self {
            cuboid,
            renderer: WireframeRenderer::new(width, height),
            color: true,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Render every camera in turn, returning the cameras that were rejected.
    ///
    /// A rejected camera does not stop the remaining ones from rendering.
    pub fn run<W: Write>(
        &mut self,
        cameras: &[Camera],
        out: &mut W,
    ) -> io::Result<Vec<(Camera, Error)>> {
        let mut rejected = Vec::new();
        for camera in cameras {
            match camera.project(&self.cuboid) {
                Ok(faces) => {
                    info!("rendering camera {}", camera.position);
                    self.show(camera, &faces, out)?;
                }
                Err(e) => {
                    error!("camera {} rejected: {}", camera.position, e);
                    rejected.push((*camera, e));
                }
            }
        }
        Ok(rejected)
    }

    /// Write a header line and the drawn faces for one camera
    pub fn show<W: Write>(
        &mut self,
        camera: &Camera,
        faces: &[ProjectedFace],
        out: &mut W,
    ) -> io::Result<()> {
        self.renderer.clear();
        self.renderer.render_faces(faces);

        let p = camera.position;
        let header = format!("Projection with camera position ({}, {}, {})", p.x, p.y, p.z);
        if self.color {
            queue!(
                out,
                SetForegroundColor(Color::Yellow),
                Print(header),
                ResetColor,
                Print('\n')
            )?;
            self.renderer.draw(out)?;
        } else {
            writeln!(out, "{}", header)?;
            out.write_all(self.renderer.to_plain_string().as_bytes())?;
        }

        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxview_core::Scene;

    fn viewer() -> BoxViewer {
        let cuboid = Scene::default().parallelepiped().unwrap();
        BoxViewer::new(cuboid, 40, 16).with_color(false)
    }

    #[test]
    fn test_run_renders_each_camera() {
        let mut out = Vec::new();
        let rejected = viewer()
            .run(&Scene::default().cameras, &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(rejected.is_empty());
        assert!(text.contains("Projection with camera position (6, 6, 6)"));
        assert!(text.contains("Projection with camera position (8, 8, 5)"));
        assert_eq!(text.lines().count(), 2 * (1 + 16));
    }

    #[test]
    fn test_rejected_camera_does_not_stop_others() {
        let cameras = [
            Camera::new(0.0, 5.0, 5.0),
            Camera::new(2.0, 2.0, 2.0),
            Camera::new(6.0, 6.0, 6.0),
        ];
        let mut out = Vec::new();
        let rejected = viewer().run(&cameras, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(rejected.len(), 2);
        assert!(matches!(rejected[0].1, Error::InvalidCamera { .. }));
        assert!(matches!(rejected[1].1, Error::GeometryOutOfBounds { .. }));
        assert_eq!(text.matches("Projection with camera position").count(), 1);
        // Rejections go to the log only, never into the drawing output
        assert!(!text.contains("rejected"));
        assert!(!text.contains("(0, 5, 5)"));
    }

    #[test]
    fn test_colored_output_uses_escape_codes() {
        let mut out = Vec::new();
        let mut viewer = viewer().with_color(true);
        viewer.run(&[Camera::new(8.0, 8.0, 5.0)], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains('\u{1b}'));
        assert!(text.contains("(8, 8, 5)"));
    }
}
