use crate::canvas::Point;
use crate::vector::Vector2D;

/// Side length of the square canvas in canvas units
pub const CANVAS_SIZE: f64 = 800.0;

/// Default number of canvas units per world unit
pub const DEFAULT_SCALE: f64 = 40.0;

/// Maps between world coordinates (origin at the canvas centre, y up) and
/// canvas coordinates (origin top-left, y down)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    pub center: Point,
    pub scale: f64,
}

impl CoordinateMapper {
    pub fn new(scale: f64) -> Self {
        Self {
            center: Point::new(CANVAS_SIZE / 2.0, CANVAS_SIZE / 2.0),
            scale,
        }
    }

    pub fn world_to_screen(&self, v: Vector2D) -> Point {
        Point::new(
            self.center.x + v.x * self.scale,
            self.center.y - v.y * self.scale,
        )
    }

    pub fn screen_to_world(&self, p: Point) -> Vector2D {
        Vector2D::new(
            (p.x - self.center.x) / self.scale,
            -(p.y - self.center.y) / self.scale,
        )
    }
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self::new(DEFAULT_SCALE)
    }
}
