/// boxview - project a box in the first octant onto the z=0 plane
///
/// Usage:
///   boxview                              built-in box and cameras
///   boxview --scene box.txt              box and cameras from a scene file
///   boxview --camera 6,6,6 --camera 8,8,5
use anyhow::Context;
use clap::Parser;
use log::info;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use boxview_core::{parse_point, Camera, Scene};
use boxview_terminal::BoxViewer;

const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// Lines used by the per-camera header and the shell prompt
const HEADER_LINES: u16 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "boxview",
    version,
    about = "Project a box onto the z=0 plane and draw its wireframe"
)]
struct Args {
    /// Scene file with `origin`, `edge` and `camera` statements
    #[arg(long, value_name = "FILE")]
    scene: Option<PathBuf>,

    /// Camera position, replaces the scene's cameras (repeatable)
    #[arg(long, value_name = "X,Y,Z", value_parser = parse_camera, allow_hyphen_values = true)]
    camera: Vec<Camera>,

    /// Canvas width in columns (default: terminal width)
    #[arg(long)]
    width: Option<u16>,

    /// Canvas height in rows (default: terminal height)
    #[arg(long)]
    height: Option<u16>,

    /// Plain text output without colors
    #[arg(long)]
    no_color: bool,
}

fn parse_camera(s: &str) -> Result<Camera, String> {
    parse_point(s)
        .map(|position| Camera { position })
        .map_err(|e| e.to_string())
}

fn load_scene(args: &Args) -> anyhow::Result<Scene> {
    let mut scene = match &args.scene {
        Some(path) => {
            info!("loading scene from {}", path.display());
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read scene file {}", path.display()))?;
            Scene::parse(&text)
                .with_context(|| format!("failed to parse scene file {}", path.display()))?
        }
        None => Scene::default(),
    };
    if !args.camera.is_empty() {
        scene.cameras = args.camera.clone();
    }
    Ok(scene)
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let scene = load_scene(&args)?;
    let cuboid = scene.parallelepiped().context("invalid box")?;

    let (term_width, term_height) = crossterm::terminal::size().unwrap_or(FALLBACK_SIZE);
    let width = args.width.unwrap_or(term_width);
    let height = args
        .height
        .unwrap_or_else(|| term_height.saturating_sub(HEADER_LINES));

    info!(
        "rendering {} camera(s) on a {}x{} canvas",
        scene.cameras.len(),
        width,
        height
    );

    let mut viewer =
        BoxViewer::new(cuboid, width as usize, height as usize).with_color(!args.no_color);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let rejected = viewer.run(&scene.cameras, &mut out)?;
    out.flush()?;

    // Each rejected camera was already reported through the log
    if rejected.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
