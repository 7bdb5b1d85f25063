use crate::canvas::Point;
use crate::mapper::CoordinateMapper;
use crate::vector::{Vector2D, Vector3D};

/// Distance from the camera to the origin used for perspective
pub const CAMERA_DISTANCE: f64 = 8.0;

/// Initial camera tilt about the X axis
pub const INITIAL_ROTATION_X: f64 = 0.4;
/// Initial camera turn about the Y axis
pub const INITIAL_ROTATION_Y: f64 = 0.6;

type Matrix3 = [[f64; 3]; 3];

/// Rotates `v` about the X axis by `angle` radians (right-hand rule)
pub fn rotate_x(v: Vector3D, angle: f64) -> Vector3D {
    multiply_matrix_vector(&rotation_x(angle), v)
}

/// Rotates `v` about the Y axis by `angle` radians (right-hand rule)
pub fn rotate_y(v: Vector3D, angle: f64) -> Vector3D {
    multiply_matrix_vector(&rotation_y(angle), v)
}

/// Perspective divide onto the plane `z = 0` as seen from
/// `(0, 0, -camera_distance)`. Points on the camera plane
/// (`camera_distance + z == 0`) project to non-finite coordinates.
pub fn project(v: Vector3D, camera_distance: f64) -> Vector2D {
    let scale = camera_distance / (camera_distance + v.z);
    Vector2D::new(v.x * scale, v.y * scale)
}

fn rotation_x(angle: f64) -> Matrix3 {
    let (sin, cos) = angle.sin_cos();
    [[1.0, 0.0, 0.0], [0.0, cos, -sin], [0.0, sin, cos]]
}

fn rotation_y(angle: f64) -> Matrix3 {
    let (sin, cos) = angle.sin_cos();
    [[cos, 0.0, sin], [0.0, 1.0, 0.0], [-sin, 0.0, cos]]
}

/// Multiplies a 3x3 matrix by a 3-dimensional vector
fn multiply_matrix_vector(matrix: &Matrix3, v: Vector3D) -> Vector3D {
    let row = |r: usize| matrix[r][0] * v.x + matrix[r][1] * v.y + matrix[r][2] * v.z;
    Vector3D::new(row(0), row(1), row(2))
}

/// Orbiting view of the 3D scene
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Rotation about the X axis in radians
    pub rotation_x: f64,
    /// Rotation about the Y axis in radians
    pub rotation_y: f64,
}

impl Camera {
    pub fn new(rotation_x: f64, rotation_y: f64) -> Self {
        Self {
            rotation_x,
            rotation_y,
        }
    }

    /// Turns `v` into camera space: X rotation first, then Y
    pub fn rotate(&self, v: Vector3D) -> Vector3D {
        rotate_y(rotate_x(v, self.rotation_x), self.rotation_y)
    }

    pub fn orbit(&mut self, delta_x: f64, delta_y: f64) {
        self.rotation_x += delta_x;
        self.rotation_y += delta_y;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(INITIAL_ROTATION_X, INITIAL_ROTATION_Y)
    }
}

/// A world point as seen on the canvas
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    pub position: Point,
    /// Z of the camera-rotated point. Points are painted in ascending depth
    /// order; see [`project`] for where the camera sits.
    pub depth: f64,
}

/// Camera, perspective and canvas mapping of the 3D scene
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport3D {
    pub camera: Camera,
    pub mapper: CoordinateMapper,
    pub camera_distance: f64,
}

impl Viewport3D {
    pub fn new(mapper: CoordinateMapper) -> Self {
        Self {
            camera: Camera::default(),
            mapper,
            camera_distance: CAMERA_DISTANCE,
        }
    }

    pub fn depth(&self, v: Vector3D) -> f64 {
        self.camera.rotate(v).z
    }

    pub fn world_to_screen(&self, v: Vector3D) -> ScreenPoint {
        let rotated = self.camera.rotate(v);
        let projected = project(rotated, self.camera_distance);
        ScreenPoint {
            position: self.mapper.world_to_screen(projected),
            depth: rotated.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{abs_diff_eq, assert_abs_diff_eq};
    use proptest::prelude::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn quarter_turn_about_x_takes_y_to_z() {
        assert_abs_diff_eq!(rotate_x(Vector3D::Y, FRAC_PI_2), Vector3D::Z, epsilon = 1e-15);
        assert_abs_diff_eq!(rotate_x(Vector3D::X, FRAC_PI_2), Vector3D::X);
    }

    #[test]
    fn quarter_turn_about_y_takes_z_to_x() {
        assert_abs_diff_eq!(rotate_y(Vector3D::Z, FRAC_PI_2), Vector3D::X, epsilon = 1e-15);
        assert_abs_diff_eq!(rotate_y(Vector3D::X, FRAC_PI_2), -Vector3D::Z, epsilon = 1e-15);
    }

    #[test]
    fn projection_shrinks_points_behind_the_origin() {
        assert_eq!(project(Vector3D::new(2.0, 4.0, 0.0), 8.0), Vector2D::new(2.0, 4.0));
        assert_eq!(project(Vector3D::new(2.0, 4.0, 8.0), 8.0), Vector2D::new(1.0, 2.0));
    }

    #[test]
    fn projection_at_camera_plane_is_not_finite() {
        let projected = project(Vector3D::new(1.0, 1.0, -8.0), 8.0);
        assert!(!projected.x.is_finite());
        assert!(!projected.y.is_finite());
    }

    #[test]
    fn camera_at_rest_keeps_origin_at_canvas_center() {
        let viewport = Viewport3D::new(CoordinateMapper::default());
        let origin = viewport.world_to_screen(Vector3D::ZERO);
        assert_eq!(origin.position, Point::new(400.0, 400.0));
        assert_eq!(origin.depth, 0.0);
    }

    #[test]
    fn camera_reset_restores_initial_angles() {
        let mut camera = Camera::default();
        camera.orbit(1.0, -2.0);
        assert_eq!(camera.rotation_x, INITIAL_ROTATION_X + 1.0);
        camera.reset();
        assert_eq!(camera, Camera::new(0.4, 0.6));
    }

    #[test]
    fn camera_applies_x_rotation_before_y_rotation() {
        // Y then X would leave the Y axis on Z instead
        let camera = Camera::new(FRAC_PI_2, FRAC_PI_2);
        assert_abs_diff_eq!(camera.rotate(Vector3D::Y), Vector3D::X, epsilon = 1e-15);
    }

    proptest! {
        #[test]
        fn rotations_preserve_length(
            x in -10.0..10.0_f64,
            y in -10.0..10.0_f64,
            z in -10.0..10.0_f64,
            angle in -7.0..7.0_f64,
        ) {
            let v = Vector3D::new(x, y, z);
            let length = v.magnitude();
            prop_assert!(abs_diff_eq!(rotate_x(v, angle).magnitude(), length, epsilon = 1e-9));
            prop_assert!(abs_diff_eq!(rotate_y(v, angle).magnitude(), length, epsilon = 1e-9));
        }
    }
}
