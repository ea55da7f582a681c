/// Terminal cell rasterizer for shaded triangles
use crossterm::{
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use flatshade_core::{Color, Rasterizer, RenderedTriangle};
use nalgebra::Point2;
use std::io::Write;

/// Character used for every covered cell; its color carries the shading
const FILL: char = '█';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    #[default]
    Filled,
    Wireframe,
}

impl DrawMode {
    pub fn toggled(self) -> Self {
        match self {
            DrawMode::Filled => DrawMode::Wireframe,
            DrawMode::Wireframe => DrawMode::Filled,
        }
    }
}

/// Grid of terminal cells, one optional color each
///
/// Triangles are painted in the order they arrive with no depth test.
pub struct CellRenderer {
    width: usize,
    height: usize,
    cells: Vec<Option<Color>>,
    mode: DrawMode,
}

impl CellRenderer {
    pub fn new(width: usize, height: usize, mode: DrawMode) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
            mode,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DrawMode) {
        self.mode = mode;
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![None; width * height];
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            None
        }
    }

    fn plot(&mut self, x: i32, y: i32, color: Color) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.cells[y as usize * self.width + x as usize] = Some(color);
        }
    }

    fn fill_triangle(&mut self, points: &[Point2<f32>; 3], color: Color) {
        let [v0, v1, v2] = points;
        if !points.iter().all(|p| p.x.is_finite() && p.y.is_finite()) {
            return;
        }

        // Bounding box, clipped to the grid
        let min_x = v0.x.min(v1.x).min(v2.x).floor().max(0.0) as i32;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil().min(self.width as f32 - 1.0) as i32;
        let min_y = v0.y.min(v1.y).min(v2.y).floor().max(0.0) as i32;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil().min(self.height as f32 - 1.0) as i32;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, &p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.plot(x, y, color);
                    }
                }
            }
        }
    }

    fn draw_line(&mut self, from: &Point2<f32>, to: &Point2<f32>, color: Color) {
        if !(from.x.is_finite() && from.y.is_finite() && to.x.is_finite() && to.y.is_finite()) {
            return;
        }
        // Keep far-off endpoints from turning into billions of steps
        let limit = 4.0 * (self.width + self.height) as f32;
        let clamp = |v: f32| v.clamp(-limit, limit).floor() as i32;
        let (mut x, mut y) = (clamp(from.x), clamp(from.y));
        let (x1, y1) = (clamp(to.x), clamp(to.y));

        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Write the grid row by row; rows end in `\r\n` so raw and cooked
    /// terminals both line up
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current: Option<Color> = None;

        for y in 0..self.height {
            for x in 0..self.width {
                match self.cells[y * self.width + x] {
                    Some(color) => {
                        if current != Some(color) {
                            writer.queue(SetForegroundColor(TermColor::Rgb {
                                r: color.r,
                                g: color.g,
                                b: color.b,
                            }))?;
                            current = Some(color);
                        }
                        writer.queue(Print(FILL))?;
                    }
                    None => {
                        writer.queue(Print(' '))?;
                    }
                }
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Rasterizer for CellRenderer {
    fn begin_frame(&mut self) {
        self.clear();
    }

    fn draw_triangle(&mut self, triangle: &RenderedTriangle) {
        let [a, b, c] = &triangle.points;
        match self.mode {
            DrawMode::Filled => self.fill_triangle(&triangle.points, triangle.color),
            DrawMode::Wireframe => {
                self.draw_line(a, b, triangle.color);
                self.draw_line(b, c, triangle.color);
                self.draw_line(c, a, triangle.color);
            }
        }
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: &Point2<f32>,
    v1: &Point2<f32>,
    v2: &Point2<f32>,
    p: &Point2<f32>,
) -> Option<(f32, f32, f32)> {
    let denom = (v1.y - v2.y) * (v0.x - v2.x) + (v2.x - v1.x) * (v0.y - v2.y);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.y - v2.y) * (p.x - v2.x) + (v2.x - v1.x) * (p.y - v2.y)) / denom;
    let w1 = ((v2.y - v0.y) * (p.x - v2.x) + (v0.x - v2.x) * (p.y - v2.y)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(index: usize, points: [(f32, f32); 3], color: Color) -> RenderedTriangle {
        RenderedTriangle {
            index,
            points: points.map(|(x, y)| Point2::new(x, y)),
            color,
        }
    }

    #[test]
    fn test_later_triangles_paint_over_earlier_ones() {
        let mut renderer = CellRenderer::new(10, 10, DrawMode::Filled);
        let red = Color::new(255, 0, 0);
        let blue = Color::new(0, 0, 255);

        renderer.begin_frame();
        renderer.draw_triangle(&triangle(0, [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)], red));
        renderer.draw_triangle(&triangle(1, [(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)], blue));

        assert_eq!(renderer.cell(0, 0), Some(blue));
        assert_eq!(renderer.cell(5, 1), Some(red));
        assert_eq!(renderer.cell(9, 9), None);
    }

    #[test]
    fn test_fill_ignores_winding() {
        let mut renderer = CellRenderer::new(8, 8, DrawMode::Filled);
        let color = Color::WHITE;
        renderer.draw_triangle(&triangle(0, [(0.0, 0.0), (0.0, 8.0), (8.0, 0.0)], color));
        assert_eq!(renderer.cell(1, 1), Some(color));
    }

    #[test]
    fn test_wireframe_leaves_interior_empty() {
        let mut renderer = CellRenderer::new(20, 20, DrawMode::Wireframe);
        let color = Color::new(10, 20, 30);
        renderer.draw_triangle(&triangle(0, [(1.0, 1.0), (18.0, 1.0), (1.0, 18.0)], color));

        assert_eq!(renderer.cell(1, 1), Some(color));
        assert_eq!(renderer.cell(10, 1), Some(color));
        assert_eq!(renderer.cell(4, 4), None);
    }

    #[test]
    fn test_begin_frame_clears() {
        let mut renderer = CellRenderer::new(4, 4, DrawMode::Filled);
        renderer.draw_triangle(&triangle(0, [(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)], Color::WHITE));
        renderer.begin_frame();
        assert_eq!(renderer.cell(0, 0), None);
    }

    #[test]
    fn test_draw_writes_every_row() {
        let mut renderer = CellRenderer::new(3, 2, DrawMode::Filled);
        renderer.draw_triangle(&triangle(0, [(0.0, 0.0), (3.0, 0.0), (0.0, 2.0)], Color::WHITE));

        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("\r\n").count(), 1);
        assert!(text.contains(FILL));
    }

    #[test]
    fn test_offscreen_points_are_clipped() {
        let mut renderer = CellRenderer::new(5, 5, DrawMode::Wireframe);
        renderer.draw_triangle(&triangle(
            0,
            [(-1e9, 2.0), (1e9, 2.0), (2.0, f32::INFINITY)],
            Color::WHITE,
        ));
        renderer.set_mode(DrawMode::Filled);
        renderer.draw_triangle(&triangle(
            1,
            [(-50.0, -50.0), (60.0, -50.0), (-50.0, 60.0)],
            Color::WHITE,
        ));
        assert_eq!(renderer.cell(0, 0), Some(Color::WHITE));
    }
}
