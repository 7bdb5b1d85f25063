use crate::canvas::{Highlight, Point};
use crate::mapper::CoordinateMapper;
use crate::math::Matrix2D;
use crate::projection::Viewport3D;
use crate::state::{Scene2D, Scene3D};
use crate::vector::{Vector2D, Vector3D};

/// Pointer distance in canvas units within which an endpoint is grabbed
pub const HIT_RADIUS: f64 = 15.0;

/// Camera rotation in radians per canvas unit of pointer travel
pub const ORBIT_SENSITIVITY: f64 = 0.01;

/// Returns the index of the topmost endpoint under `pointer`. Endpoints are
/// given in draw order, so the scan runs from the last one back.
pub fn hit_test(pointer: Point, endpoints: &[Point]) -> Option<usize> {
    endpoints
        .iter()
        .enumerate()
        .rev()
        .find(|(_, endpoint)| endpoint.distance(pointer) < HIT_RADIUS)
        .map(|(index, _)| index)
}

/// Which vector is hovered or dragged
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerState {
    pub hovered: Option<usize>,
    pub dragging: Option<usize>,
}

impl PointerState {
    pub fn highlight(&self, index: usize) -> Highlight {
        if self.dragging == Some(index) {
            Highlight::Drag
        } else if self.hovered == Some(index) {
            Highlight::Hover
        } else {
            Highlight::Idle
        }
    }

    fn release(&mut self) {
        self.dragging = None;
    }

    fn leave(&mut self) {
        self.dragging = None;
        self.hovered = None;
    }

    fn update_hover(&mut self, hit: Option<usize>) {
        self.hovered = hit;
    }
}

/// Pointer handling for the plane scene
#[derive(Clone, Debug, Default)]
pub struct Controller2D {
    pub pointer: PointerState,
}

impl Controller2D {
    fn endpoints(scene: &Scene2D, display: &Matrix2D, mapper: &CoordinateMapper) -> Vec<Point> {
        scene
            .vectors
            .iter()
            .map(|&v| mapper.world_to_screen(display.apply(v)))
            .collect()
    }

    pub fn pointer_down(
        &mut self,
        at: Point,
        scene: &Scene2D,
        display: &Matrix2D,
        mapper: &CoordinateMapper,
    ) {
        if let Some(index) = hit_test(at, &Self::endpoints(scene, display, mapper)) {
            log::debug!("Dragging v{}", index + 1);
            self.pointer.dragging = Some(index);
        }
    }

    /// Reports the dragged vector's new value through `on_vector_update`, or
    /// refreshes the hover state when nothing is dragged
    pub fn pointer_move(
        &mut self,
        at: Point,
        scene: &Scene2D,
        display: &Matrix2D,
        mapper: &CoordinateMapper,
        mut on_vector_update: impl FnMut(usize, Vector2D),
    ) {
        if let Some(index) = self.pointer.dragging {
            on_vector_update(index, mapper.screen_to_world(at));
            return;
        }
        let hit = hit_test(at, &Self::endpoints(scene, display, mapper));
        self.pointer.update_hover(hit);
    }

    pub fn pointer_up(&mut self) {
        self.pointer.release();
    }

    pub fn pointer_leave(&mut self) {
        self.pointer.leave();
    }
}

/// An in-progress drag of a vector endpoint in the space scene
#[derive(Clone, Copy, Debug, PartialEq)]
struct VectorDrag {
    index: usize,
    depth: f64,
}

/// Pointer handling for the space scene: drags endpoints or orbits the
/// camera
#[derive(Clone, Debug, Default)]
pub struct Controller3D {
    pub pointer: PointerState,
    drag: Option<VectorDrag>,
    /// Last pointer position while orbiting
    orbit_from: Option<Point>,
}

impl Controller3D {
    fn endpoints(scene: &Scene3D, viewport: &Viewport3D) -> Vec<Point> {
        scene
            .scaled_vectors()
            .map(|v| viewport.world_to_screen(v).position)
            .collect()
    }

    pub fn is_orbiting(&self) -> bool {
        self.orbit_from.is_some()
    }

    pub fn pointer_down(&mut self, at: Point, scene: &Scene3D, viewport: &Viewport3D) {
        match hit_test(at, &Self::endpoints(scene, viewport)) {
            Some(index) => {
                log::debug!("Dragging v{}", index + 1);
                self.pointer.dragging = Some(index);
                self.drag = Some(VectorDrag {
                    index,
                    depth: scene.vectors[index].z,
                });
            }
            None => {
                log::debug!("Orbiting camera");
                self.orbit_from = Some(at);
            }
        }
    }

    /// Orbits the camera, reports the dragged vector through
    /// `on_vector_update` (depth unchanged), or refreshes the hover state
    pub fn pointer_move(
        &mut self,
        at: Point,
        scene: &Scene3D,
        viewport: &mut Viewport3D,
        mut on_vector_update: impl FnMut(usize, Vector3D),
    ) {
        if let Some(from) = self.orbit_from {
            viewport.camera.orbit(
                (at.y - from.y) * ORBIT_SENSITIVITY,
                (at.x - from.x) * ORBIT_SENSITIVITY,
            );
            self.orbit_from = Some(at);
            return;
        }

        if let Some(VectorDrag { index, depth }) = self.drag {
            let world = viewport.mapper.screen_to_world(at);
            on_vector_update(index, Vector3D::new(world.x, world.y, depth));
            return;
        }

        let hit = hit_test(at, &Self::endpoints(scene, viewport));
        self.pointer.update_hover(hit);
    }

    pub fn pointer_up(&mut self) {
        self.pointer.release();
        self.drag = None;
        self.orbit_from = None;
    }

    pub fn pointer_leave(&mut self) {
        self.pointer.leave();
        self.drag = None;
        self.orbit_from = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Camera;

    fn scene_2d() -> Scene2D {
        Scene2D {
            vectors: vec![Vector2D::new(3.0, 2.0), Vector2D::new(-2.0, 3.0)],
            ..Scene2D::default()
        }
    }

    #[test]
    fn pointer_on_endpoint_hits_and_sixteen_units_away_misses() {
        let endpoints = [Point::new(520.0, 320.0), Point::new(320.0, 280.0)];
        assert_eq!(hit_test(Point::new(520.0, 320.0), &endpoints), Some(0));
        assert_eq!(hit_test(Point::new(536.0, 320.0), &endpoints), None);
        assert_eq!(hit_test(Point::new(320.0, 296.0), &endpoints), None);
        assert_eq!(hit_test(Point::new(320.0, 294.9), &endpoints), Some(1));
    }

    #[test]
    fn topmost_endpoint_wins_when_endpoints_overlap() {
        let endpoints = [Point::new(100.0, 100.0), Point::new(105.0, 100.0)];
        assert_eq!(hit_test(Point::new(102.0, 100.0), &endpoints), Some(1));
    }

    #[test]
    fn drag_reports_pointer_world_position_until_release() {
        let scene = scene_2d();
        let mapper = CoordinateMapper::default();
        let display = Matrix2D::identity();
        let mut controller = Controller2D::default();

        controller.pointer_down(Point::new(520.0, 320.0), &scene, &display, &mapper);
        assert_eq!(controller.pointer.dragging, Some(0));
        assert_eq!(controller.pointer.highlight(0), Highlight::Drag);

        let mut updates = Vec::new();
        controller.pointer_move(Point::new(440.0, 360.0), &scene, &display, &mapper, |i, v| {
            updates.push((i, v))
        });
        assert_eq!(updates, vec![(0, Vector2D::new(1.0, 1.0))]);

        controller.pointer_up();
        assert_eq!(controller.pointer.dragging, None);
    }

    #[test]
    fn hit_test_follows_displayed_transformation() {
        let scene = scene_2d();
        let mapper = CoordinateMapper::default();
        let display = Matrix2D::scaling(2.0, 2.0);
        let mut controller = Controller2D::default();

        controller.pointer_down(Point::new(520.0, 320.0), &scene, &display, &mapper);
        assert_eq!(controller.pointer.dragging, None);

        controller.pointer_down(Point::new(640.0, 240.0), &scene, &display, &mapper);
        assert_eq!(controller.pointer.dragging, Some(0));
    }

    #[test]
    fn hover_is_set_on_approach_and_cleared_on_leave() {
        let scene = scene_2d();
        let mapper = CoordinateMapper::default();
        let display = Matrix2D::identity();
        let mut controller = Controller2D::default();
        let no_update = |_: usize, _: Vector2D| panic!("nothing is dragged");

        controller.pointer_move(Point::new(325.0, 285.0), &scene, &display, &mapper, no_update);
        assert_eq!(controller.pointer.hovered, Some(1));
        assert_eq!(controller.pointer.highlight(1), Highlight::Hover);

        controller.pointer_move(Point::new(0.0, 0.0), &scene, &display, &mapper, no_update);
        assert_eq!(controller.pointer.hovered, None);

        controller.pointer_move(Point::new(325.0, 285.0), &scene, &display, &mapper, no_update);
        controller.pointer_leave();
        assert_eq!(controller.pointer, PointerState::default());
    }

    #[test]
    fn missing_every_vector_orbits_the_camera() {
        let scene = Scene3D::default();
        let mut viewport = Viewport3D::new(CoordinateMapper::default());
        let mut controller = Controller3D::default();

        controller.pointer_down(Point::new(10.0, 10.0), &scene, &viewport);
        assert!(controller.is_orbiting());

        controller.pointer_move(Point::new(30.0, 0.0), &scene, &mut viewport, |_, _| {
            panic!("orbiting must not edit vectors")
        });
        assert_eq!(viewport.camera.rotation_y, 0.6 + 20.0 * ORBIT_SENSITIVITY);
        assert_eq!(viewport.camera.rotation_x, 0.4 - 10.0 * ORBIT_SENSITIVITY);

        controller.pointer_up();
        assert!(!controller.is_orbiting());
    }

    #[test]
    fn dragging_in_space_keeps_depth() {
        let scene = Scene3D::default();
        let mut viewport = Viewport3D::new(CoordinateMapper::default());
        let mut controller = Controller3D::default();

        let tip = viewport.world_to_screen(scene.vectors[1]).position;
        controller.pointer_down(tip, &scene, &viewport);
        assert_eq!(controller.pointer.dragging, Some(1));
        assert!(!controller.is_orbiting());

        let mut updates = Vec::new();
        controller.pointer_move(Point::new(480.0, 320.0), &scene, &mut viewport, |i, v| {
            updates.push((i, v))
        });
        assert_eq!(updates, vec![(1, Vector3D::new(2.0, 2.0, scene.vectors[1].z))]);
        assert_eq!(viewport.camera, Camera::default());
    }

    #[test]
    fn releasing_a_space_drag_returns_to_hovering() {
        let scene = Scene3D::default();
        let mut viewport = Viewport3D::new(CoordinateMapper::default());
        let mut controller = Controller3D::default();
        let tip = viewport.world_to_screen(scene.vectors[1]).position;

        controller.pointer_down(tip, &scene, &viewport);
        controller.pointer_up();
        assert_eq!(controller.pointer.dragging, None);
        assert!(!controller.is_orbiting());

        controller.pointer_move(tip, &scene, &mut viewport, |_, _| {
            panic!("released drag must not edit vectors")
        });
        assert_eq!(controller.pointer.hovered, Some(1));
        assert_eq!(viewport.camera, Camera::default());
    }

    #[test]
    fn space_hover_follows_the_pointer_until_it_leaves() {
        let scene = Scene3D::default();
        let mut viewport = Viewport3D::new(CoordinateMapper::default());
        let mut controller = Controller3D::default();
        let tip = viewport.world_to_screen(scene.vectors[0]).position;
        let no_update = |_: usize, _: Vector3D| panic!("nothing is dragged");

        controller.pointer_move(tip, &scene, &mut viewport, no_update);
        assert_eq!(controller.pointer.hovered, Some(0));

        controller.pointer_move(Point::new(0.0, 0.0), &scene, &mut viewport, no_update);
        assert_eq!(controller.pointer.hovered, None);

        controller.pointer_move(tip, &scene, &mut viewport, no_update);
        controller.pointer_leave();
        assert_eq!(controller.pointer, PointerState::default());
    }

    #[test]
    fn leaving_cancels_a_space_drag() {
        let scene = Scene3D::default();
        let mut viewport = Viewport3D::new(CoordinateMapper::default());
        let mut controller = Controller3D::default();
        let tip = viewport.world_to_screen(scene.vectors[0]).position;

        controller.pointer_down(tip, &scene, &viewport);
        assert_eq!(controller.pointer.dragging, Some(0));
        controller.pointer_leave();

        controller.pointer_move(Point::new(700.0, 100.0), &scene, &mut viewport, |_, _| {
            panic!("cancelled drag must not edit vectors")
        });
        assert_eq!(controller.pointer.dragging, None);
        assert_eq!(controller.pointer.hovered, None);
    }

    #[test]
    fn scaled_vectors_are_hit_at_their_scaled_tips() {
        let mut scene = Scene3D::default();
        scene.scales[0] = 2.0;
        let viewport = Viewport3D::new(CoordinateMapper::default());
        let mut controller = Controller3D::default();

        let scaled_tip = viewport.world_to_screen(scene.vectors[0].scale(2.0)).position;
        controller.pointer_down(scaled_tip, &scene, &viewport);
        assert_eq!(controller.pointer.dragging, Some(0));
    }
}
