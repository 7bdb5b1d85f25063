use std::f64::consts::FRAC_PI_6;

/// A position in canvas units (origin top-left, y down)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Straight RGBA color
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb8(255, 255, 255);

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with a fractional opacity in `[0, 1]`
    pub fn rgba(r: u8, g: u8, b: u8, alpha: f64) -> Self {
        Self {
            r,
            g,
            b,
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
        }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Self::rgb8((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Composites `self` over an opaque `background`
    pub fn over(self, background: Self) -> Self {
        let alpha = f64::from(self.a) / 255.0;
        let mix = |fg: u8, bg: u8| {
            (f64::from(fg) * alpha + f64::from(bg) * (1.0 - alpha)).round() as u8
        };
        Self::rgb8(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }
}

/// How a line is stroked
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    /// Dash and gap lengths in canvas units, `None` for a solid line
    pub dash: Option<(f64, f64)>,
}

impl Stroke {
    pub fn new(width: f64, color: Color) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(self, on: f64, off: f64) -> Self {
        Self {
            dash: Some((on, off)),
            ..self
        }
    }
}

/// A drawing surface measured in canvas units
pub trait Canvas {
    /// Fills the whole surface
    fn fill(&mut self, color: Color);

    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke);

    fn fill_triangle(&mut self, a: Point, b: Point, c: Point, color: Color);

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color);

    /// Draws `text` with its anchor at `at`
    fn text(&mut self, at: Point, text: &str, color: Color);
}

/// Colors shared by the 2D and 3D scenes
pub mod palette {
    use super::Color;

    pub const BACKGROUND: Color = Color::from_hex(0x0a1628);
    pub const RED: Color = Color::from_hex(0xef4444);
    pub const GREEN: Color = Color::from_hex(0x22c55e);
    pub const BLUE: Color = Color::from_hex(0x3b82f6);
    pub const PURPLE: Color = Color::from_hex(0xa855f7);
    pub const VECTOR_IDLE: Color = Color::from_hex(0xf97316);
    pub const VECTOR_HOVER: Color = Color::from_hex(0xfdba74);
    pub const VECTOR_DRAG: Color = Color::from_hex(0xfb923c);
    pub const ORANGE_TEXT: Color = Color::from_hex(0xfb923c);
    pub const BLUE_TEXT: Color = Color::from_hex(0x60a5fa);

    pub fn grid(main: bool) -> Color {
        Color::rgba(59, 130, 246, if main { 0.4 } else { 0.15 })
    }

    pub fn grid_label() -> Color {
        Color::rgba(147, 197, 253, 0.5)
    }

    pub fn axis() -> Color {
        Color::rgba(96, 165, 250, 0.4)
    }

    pub fn axis_label() -> Color {
        Color::rgba(147, 197, 253, 0.7)
    }

    pub fn sum_connector() -> Color {
        Color::rgba(96, 165, 250, 0.3)
    }
}

/// Interaction state of a drawn vector
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Highlight {
    Idle,
    Hover,
    Drag,
}

impl Highlight {
    pub fn color(self) -> Color {
        match self {
            Self::Idle => palette::VECTOR_IDLE,
            Self::Hover => palette::VECTOR_HOVER,
            Self::Drag => palette::VECTOR_DRAG,
        }
    }

    pub fn line_width(self) -> f64 {
        match self {
            Self::Idle => 3.0,
            Self::Hover | Self::Drag => 4.0,
        }
    }
}

/// Style of an arrow from one canvas point to another
#[derive(Clone, Copy, Debug)]
pub struct Arrow<'a> {
    pub stroke: Stroke,
    pub head_length: f64,
    /// Radius of the dot marking the tip, `0` for none
    pub tip_radius: f64,
    pub label: Option<&'a str>,
    pub label_offset: (f64, f64),
}

impl<'a> Arrow<'a> {
    pub fn vector(width: f64, color: Color) -> Self {
        Self {
            stroke: Stroke::new(width, color),
            head_length: 15.0,
            tip_radius: 6.0,
            label: None,
            label_offset: (15.0, -15.0),
        }
    }

    pub fn labeled(self, label: &'a str) -> Self {
        Self {
            label: Some(label),
            ..self
        }
    }

    /// Draws shaft, head, tip marker and label
    pub fn draw(&self, canvas: &mut impl Canvas, start: Point, end: Point) {
        if !start.is_finite() || !end.is_finite() {
            return;
        }

        canvas.stroke_line(start, end, &self.stroke);

        let angle = (end.y - start.y).atan2(end.x - start.x);
        let barb = |side: f64| {
            let theta = angle + side * FRAC_PI_6;
            end.offset(-self.head_length * theta.cos(), -self.head_length * theta.sin())
        };
        canvas.fill_triangle(end, barb(-1.0), barb(1.0), self.stroke.color);

        if self.tip_radius > 0.0 {
            canvas.fill_circle(end, self.tip_radius, self.stroke.color);
        }

        if let Some(label) = self.label {
            let (dx, dy) = self.label_offset;
            canvas.text(end.offset(dx, dy), label, self.stroke.color);
        }
    }
}

/// Records primitives instead of drawing them
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub ops: Vec<DrawOp>,
}

#[cfg(test)]
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Fill(Color),
    Line(Point, Point, Stroke),
    Triangle([Point; 3], Color),
    Circle(Point, f64, Color),
    Text(Point, String, Color),
}

#[cfg(test)]
impl RecordingCanvas {
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text(_, text, _) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn text_position(&self, wanted: &str) -> Option<Point> {
        self.ops.iter().find_map(|op| match op {
            DrawOp::Text(at, text, _) if text == wanted => Some(*at),
            _ => None,
        })
    }

    pub fn text_color(&self, wanted: &str) -> Option<Color> {
        self.ops.iter().find_map(|op| match op {
            DrawOp::Text(_, text, color) if text == wanted => Some(*color),
            _ => None,
        })
    }

    pub fn op_index(&self, predicate: impl Fn(&DrawOp) -> bool) -> Option<usize> {
        self.ops.iter().position(predicate)
    }

    pub fn lines(&self) -> Vec<(Point, Point, Stroke)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Line(from, to, stroke) => Some((*from, *to, *stroke)),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
impl Canvas for RecordingCanvas {
    fn fill(&mut self, color: Color) {
        self.ops.push(DrawOp::Fill(color));
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        self.ops.push(DrawOp::Line(from, to, *stroke));
    }

    fn fill_triangle(&mut self, a: Point, b: Point, c: Point, color: Color) {
        self.ops.push(DrawOp::Triangle([a, b, c], color));
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.ops.push(DrawOp::Circle(center, radius, color));
    }

    fn text(&mut self, at: Point, text: &str, color: Color) {
        self.ops.push(DrawOp::Text(at, text.to_owned(), color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_is_quantized_to_a_byte() {
        assert_eq!(Color::rgba(59, 130, 246, 0.4).a, 102);
        assert_eq!(Color::rgba(0, 0, 0, 2.0).a, 255);
    }

    #[test]
    fn transparent_color_leaves_background() {
        let background = palette::BACKGROUND;
        assert_eq!(Color::rgba(255, 0, 0, 0.0).over(background), background);
        assert_eq!(palette::RED.over(background), palette::RED);
    }

    #[test]
    fn arrow_draws_shaft_head_tip_and_label_in_order() {
        let mut canvas = RecordingCanvas::default();
        let arrow = Arrow::vector(3.0, palette::VECTOR_IDLE).labeled("v1");
        arrow.draw(&mut canvas, Point::new(400.0, 400.0), Point::new(500.0, 400.0));

        assert!(matches!(canvas.ops[0], DrawOp::Line(..)));
        let DrawOp::Triangle([tip, left, right], _) = canvas.ops[1] else {
            panic!("expected arrow head, got {:?}", canvas.ops[1]);
        };
        assert_eq!(tip, Point::new(500.0, 400.0));
        assert!(left.x < 500.0 && right.x < 500.0);
        assert!((left.distance(tip) - 15.0).abs() < 1e-9);
        assert!(matches!(canvas.ops[2], DrawOp::Circle(_, r, _) if r == 6.0));
        assert_eq!(canvas.text_position("v1"), Some(Point::new(515.0, 385.0)));
    }

    #[test]
    fn arrow_with_non_finite_end_draws_nothing() {
        let mut canvas = RecordingCanvas::default();
        Arrow::vector(3.0, palette::VECTOR_IDLE).draw(
            &mut canvas,
            Point::new(400.0, 400.0),
            Point::new(f64::INFINITY, 400.0),
        );
        assert!(canvas.ops.is_empty());
    }
}
