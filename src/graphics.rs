use crate::canvas::{Canvas, Color, Point, Stroke};
use crate::mapper::CANVAS_SIZE;

/// Text placed on top of the pixels, positioned in pixels
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    pub x: usize,
    pub y: usize,
    pub text: String,
    pub color: Color,
}

/// Square RGBA pixel buffer covering the whole canvas
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    side: usize,
    pixel_data: Vec<u8>,
    labels: Vec<Label>,
}

impl FrameBuffer {
    pub fn new(side: usize) -> Self {
        Self {
            side,
            pixel_data: vec![0; side * side * 4],
            labels: Vec::new(),
        }
    }

    /// Width and height in pixels
    pub fn side(&self) -> usize {
        self.side
    }

    pub fn pixel(&self, x: usize, y: usize) -> Color {
        let offset = (y * self.side + x) * 4;
        Color {
            r: self.pixel_data[offset],
            g: self.pixel_data[offset + 1],
            b: self.pixel_data[offset + 2],
            a: self.pixel_data[offset + 3],
        }
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    fn pixels_per_unit(&self) -> f64 {
        self.side as f64 / CANVAS_SIZE
    }

    fn to_pixels(&self, p: Point) -> (f64, f64) {
        let k = self.pixels_per_unit();
        (p.x * k, p.y * k)
    }

    /// Composites `color` over the pixel at `(x, y)` if it is inside
    fn blend(&mut self, x: isize, y: isize, color: Color) {
        let side = self.side as isize;
        if x < 0 || y < 0 || x >= side || y >= side {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let blended = color.over(self.pixel(x, y));
        let offset = (y * self.side + x) * 4;
        self.pixel_data[offset] = blended.r;
        self.pixel_data[offset + 1] = blended.g;
        self.pixel_data[offset + 2] = blended.b;
        self.pixel_data[offset + 3] = 255;
    }

    /// Blends a `width`×`width` block of pixels centred on `(x, y)`
    fn stamp(&mut self, x: isize, y: isize, width: isize, color: Color) {
        let low = -(width - 1) / 2;
        for dy in low..low + width {
            for dx in low..low + width {
                self.blend(x + dx, y + dy, color);
            }
        }
    }
}

/// Edge function used in rasterization
fn edge_function(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    (c.0 - a.0) * (b.1 - a.1) - (c.1 - a.1) * (b.0 - a.0)
}

/// Clips the segment to the canvas square (Liang–Barsky). Returns `None`
/// when nothing of it is visible.
fn clip_to_canvas(from: Point, to: Point) -> Option<(Point, Point)> {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;

    let edges = [
        (-dx, from.x),
        (dx, CANVAS_SIZE - from.x),
        (-dy, from.y),
        (dy, CANVAS_SIZE - from.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((
        Point::new(from.x + t0 * dx, from.y + t0 * dy),
        Point::new(from.x + t1 * dx, from.y + t1 * dy),
    ))
}

impl Canvas for FrameBuffer {
    fn fill(&mut self, color: Color) {
        let opaque = color.over(Color::rgb8(0, 0, 0));
        for pixel in self.pixel_data.chunks_exact_mut(4) {
            pixel.copy_from_slice(&[opaque.r, opaque.g, opaque.b, 255]);
        }
        self.labels.clear();
    }

    /// Draws a line using Bresenham's algorithm
    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        if !from.is_finite() || !to.is_finite() {
            return;
        }
        let Some((from, to)) = clip_to_canvas(from, to) else {
            return;
        };

        let (fx, fy) = self.to_pixels(from);
        let (tx, ty) = self.to_pixels(to);
        let (mut x0, mut y0, x1, y1) = (
            fx.round() as isize,
            fy.round() as isize,
            tx.round() as isize,
            ty.round() as isize,
        );
        let width = (stroke.width * self.pixels_per_unit()).round().max(1.0) as isize;

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy; // error value e_xy

        let steps = dx.max(-dy).max(1) as f64;
        let length = from.distance(to);
        let mut step = 0.0;

        loop {
            let visible = match stroke.dash {
                Some((on, off)) => (length * step / steps) % (on + off) < on,
                None => true,
            };
            if visible {
                self.stamp(x0, y0, width, stroke.color);
            }

            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
            step += 1.0;
        }
    }

    fn fill_triangle(&mut self, a: Point, b: Point, c: Point, color: Color) {
        if !(a.is_finite() && b.is_finite() && c.is_finite()) {
            return;
        }
        let (v0, v1, v2) = (self.to_pixels(a), self.to_pixels(b), self.to_pixels(c));
        let last = self.side as f64 - 1.0;

        // Compute bounding box of the triangle
        let min_x = v0.0.min(v1.0).min(v2.0).floor().max(0.0);
        let max_x = v0.0.max(v1.0).max(v2.0).ceil().min(last);
        let min_y = v0.1.min(v1.1).min(v2.1).floor().max(0.0);
        let max_y = v0.1.max(v1.1).max(v2.1).ceil().min(last);
        if min_x > max_x || min_y > max_y {
            return;
        }

        let area = edge_function(v0, v1, v2);
        if area == 0.0 {
            return;
        }

        for y in min_y as isize..=max_y as isize {
            for x in min_x as isize..=max_x as isize {
                let p = (x as f64 + 0.5, y as f64 + 0.5);

                let w0 = edge_function(v1, v2, p) * area;
                let w1 = edge_function(v2, v0, p) * area;
                let w2 = edge_function(v0, v1, p) * area;

                // Inside for either winding
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    self.blend(x, y, color);
                }
            }
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        if !center.is_finite() {
            return;
        }
        let (cx, cy) = self.to_pixels(center);
        let r = radius * self.pixels_per_unit();

        if r < 0.5 {
            self.blend(cx.floor() as isize, cy.floor() as isize, color);
            return;
        }

        let last = self.side as f64 - 1.0;
        let min_x = (cx - r).floor().max(0.0);
        let max_x = (cx + r).ceil().min(last);
        let min_y = (cy - r).floor().max(0.0);
        let max_y = (cy + r).ceil().min(last);

        for y in min_y as isize..=max_y as isize {
            for x in min_x as isize..=max_x as isize {
                let (px, py) = (x as f64 + 0.5 - cx, y as f64 + 0.5 - cy);
                if px * px + py * py <= r * r {
                    self.blend(x, y, color);
                }
            }
        }
    }

    fn text(&mut self, at: Point, text: &str, color: Color) {
        if !at.is_finite() {
            return;
        }
        let (x, y) = self.to_pixels(at);
        let side = self.side as f64;
        if x < 0.0 || y < 0.0 || x >= side || y >= side {
            return;
        }
        self.labels.push(Label {
            x: x as usize,
            y: y as usize,
            text: text.to_owned(),
            color,
        });
    }
}
