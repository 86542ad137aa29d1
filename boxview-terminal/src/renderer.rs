/// ASCII wireframe rasterizer for projected box faces
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Point2;
use std::io::Write;
use boxview_core::{bounds, Bounds, ProjectedFace};

/// Line colors, cycled per face
const FACE_COLORS: &[Color] = &[
    Color::Blue,
    Color::DarkYellow,
    Color::Green,
    Color::Red,
    Color::Magenta,
    Color::DarkCyan,
];

const GRID_CHAR: char = '.';
const GRID_COLOR: Color = Color::DarkGrey;
const MARKER_CHAR: char = 'o';
const LABEL_COLOR: Color = Color::White;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f64 = 2.0;

/// Approximate number of grid divisions along the longer axis
const GRID_DIVISIONS: f64 = 5.0;

/// Smallest grid step relative to the coordinate magnitude
const GRID_RESOLUTION: f64 = 1e-12;
const MAX_GRID_LINES: usize = 64;

pub const MIN_WIDTH: usize = 8;
pub const MIN_HEIGHT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    color: Color,
}

const BLANK: Cell = Cell {
    ch: ' ',
    color: Color::Reset,
};

/// Maps data coordinates to cell positions inside the plot area
#[derive(Debug, Clone, Copy)]
struct Viewport {
    bounds: Bounds,
    left: f64,
    bottom: f64,
    scale_x: f64,
    scale_y: f64,
}

impl Viewport {
    fn fit(bounds: Bounds, area: PlotArea) -> Self {
        let bounds = widen(bounds);
        let cols = (area.right - area.left) as f64;
        let rows = (area.bottom - area.top) as f64;

        let scale_x = (cols / bounds.width()).min(rows * CELL_ASPECT / bounds.height());
        let scale_y = scale_x / CELL_ASPECT;

        // Center the drawing in whatever room is left over
        let left = area.left as f64 + (cols - bounds.width() * scale_x) / 2.0;
        let bottom = area.bottom as f64 - (rows - bounds.height() * scale_y) / 2.0;

        Self {
            bounds,
            left,
            bottom,
            scale_x,
            scale_y,
        }
    }

    fn to_cell(&self, p: &Point2<f64>) -> (f64, f64) {
        (
            self.left + (p.x - self.bounds.min.x) * self.scale_x,
            self.bottom - (p.y - self.bounds.min.y) * self.scale_y,
        )
    }

    fn x_at(&self, col: f64) -> f64 {
        self.bounds.min.x + (col - self.left) / self.scale_x
    }

    fn y_at(&self, row: f64) -> f64 {
        self.bounds.min.y + (self.bottom - row) / self.scale_y
    }
}

/// Inclusive cell rectangle reserved for the drawing
#[derive(Debug, Clone, Copy)]
struct PlotArea {
    left: usize,
    right: usize,
    top: usize,
    bottom: usize,
}

/// Character canvas that draws projected faces as closed outlines
pub struct WireframeRenderer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl WireframeRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(MIN_WIDTH);
        let height = height.max(MIN_HEIGHT);
        Self {
            width,
            height,
            cells: vec![BLANK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    /// Character at a cell, `None` outside the canvas
    pub fn char_at(&self, col: usize, row: usize) -> Option<char> {
        if col < self.width && row < self.height {
            Some(self.cells[row * self.width + col].ch)
        } else {
            None
        }
    }

    /// Draw grid, face outlines, vertex markers and axis labels
    pub fn render_faces(&mut self, faces: &[ProjectedFace]) {
        let Some(extent) = bounds(faces) else {
            return;
        };
        let area = self.plot_area();
        let viewport = Viewport::fit(extent, area);

        self.draw_grid(&viewport, area);

        for (i, face) in faces.iter().enumerate() {
            let color = FACE_COLORS[i % FACE_COLORS.len()];
            for (from, to) in face.outline() {
                self.draw_line(viewport.to_cell(&from), viewport.to_cell(&to), color);
            }
        }

        for (i, face) in faces.iter().enumerate() {
            let color = FACE_COLORS[i % FACE_COLORS.len()];
            for vertex in &face.vertices {
                let (col, row) = viewport.to_cell(vertex);
                self.put(col.round(), row.round(), MARKER_CHAR, color);
            }
        }

        self.put((area.right + 1) as f64, (self.height - 1) as f64, 'x', LABEL_COLOR);
        self.put(0.0, 0.0, 'y', LABEL_COLOR);
    }

    /// The canvas minus a label column on the left and a label row at the bottom
    fn plot_area(&self) -> PlotArea {
        PlotArea {
            left: 2,
            right: self.width - 2,
            top: 1,
            bottom: self.height - 2,
        }
    }

    fn draw_grid(&mut self, viewport: &Viewport, area: PlotArea) {
        let x_min = viewport.x_at(area.left as f64);
        let x_max = viewport.x_at(area.right as f64);
        let y_min = viewport.y_at(area.bottom as f64);
        let y_max = viewport.y_at(area.top as f64);
        let step = nice_step((x_max - x_min).max(y_max - y_min) / GRID_DIVISIONS);

        for x in grid_lines(x_min, x_max, step) {
            let (col, _) = viewport.to_cell(&Point2::new(x, 0.0));
            for row in area.top..=area.bottom {
                self.put(col.round(), row as f64, GRID_CHAR, GRID_COLOR);
            }
        }

        for y in grid_lines(y_min, y_max, step) {
            let (_, row) = viewport.to_cell(&Point2::new(0.0, y));
            for col in (area.left..=area.right).step_by(2) {
                self.put(col as f64, row.round(), GRID_CHAR, GRID_COLOR);
            }
        }
    }

    fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), color: Color) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let ch = line_char(dx, dy);
        let steps = dx.abs().max(dy.abs()).round().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            self.put(
                (from.0 + t * dx).round(),
                (from.1 + t * dy).round(),
                ch,
                color,
            );
        }
    }

    fn put(&mut self, col: f64, row: f64, ch: char, color: Color) {
        if col < 0.0 || row < 0.0 {
            return;
        }
        let (col, row) = (col as usize, row as usize);
        if col < self.width && row < self.height {
            self.cells[row * self.width + col] = Cell { ch, color };
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for row in self.cells.chunks(self.width) {
            for cell in row {
                if current != Some(cell.color) {
                    writer.queue(SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                writer.queue(Print(cell.ch))?;
            }
            writer.queue(Print('\n'))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }

    /// Canvas contents without color codes, trailing blanks trimmed
    pub fn to_plain_string(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.cells.chunks(self.width) {
            let line: String = row.iter().map(|cell| cell.ch).collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

/// Give zero-sized extents some room so a lone point still lands on the canvas
fn widen(mut b: Bounds) -> Bounds {
    if b.width() < 1e-9 {
        b.min.x -= 1.0;
        b.max.x += 1.0;
    }
    if b.height() < 1e-9 {
        b.min.y -= 1.0;
        b.max.y += 1.0;
    }
    b
}

/// Multiples of `step` within `[min, max]`.
///
/// Empty when `step` is too small to separate values at this magnitude,
/// e.g. a tiny box seen from a very distant camera.
fn grid_lines(min: f64, max: f64, step: f64) -> Vec<f64> {
    let magnitude = min.abs().max(max.abs());
    if !(min.is_finite() && max.is_finite()) || step <= magnitude * GRID_RESOLUTION {
        return Vec::new();
    }
    let first = (min / step).ceil() * step;
    let count = ((max - first) / step).floor();
    if !(count >= 0.0) {
        return Vec::new();
    }
    let count = (count as usize).min(MAX_GRID_LINES);
    (0..=count).map(|k| first + k as f64 * step).collect()
}

/// Round a raw step up to 1, 2 or 5 times a power of ten
fn nice_step(raw: f64) -> f64 {
    if !(raw.is_finite() && raw > 0.0) {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Pick a stroke character from the on-screen direction (rows grow downward)
fn line_char(dx: f64, dy: f64) -> char {
    if dx.abs() < 1e-9 && dy.abs() < 1e-9 {
        return MARKER_CHAR;
    }
    let steepness = dy.abs() / dx.abs().max(1e-9);
    if steepness < 0.4 {
        '-'
    } else if steepness > 2.5 {
        '|'
    } else if (dx > 0.0) == (dy < 0.0) {
        '/'
    } else {
        '\\'
    }
}
