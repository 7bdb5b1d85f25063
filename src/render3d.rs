use crate::canvas::{palette, Arrow, Canvas, Stroke};
use crate::interaction::PointerState;
use crate::projection::Viewport3D;
use crate::state::Scene3D;
use crate::vector::Vector3D;

/// Grid lines run from `-GRID_EXTENT` to `GRID_EXTENT` on each plane
const GRID_EXTENT: i32 = 5;

/// Length of the coordinate axis arrows in world units
const AXIS_LENGTH: f64 = 6.0;

/// A grid segment with the camera depth it is sorted by
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLine {
    pub start: Vector3D,
    pub end: Vector3D,
    pub depth: f64,
}

impl GridLine {
    /// Whether the segment lies on one of the coordinate axes
    pub fn is_on_axis(&self) -> bool {
        let zero_on_both = |a: f64, b: f64| a == 0.0 && b == 0.0;
        let zero_coordinates = [
            zero_on_both(self.start.x, self.end.x),
            zero_on_both(self.start.y, self.end.y),
            zero_on_both(self.start.z, self.end.z),
        ];
        zero_coordinates.iter().filter(|&&zero| zero).count() >= 2
    }
}

/// Grid segments on the XY, XZ and YZ planes, farthest first
pub fn depth_sorted_grid(viewport: &Viewport3D) -> Vec<GridLine> {
    let s = f64::from(GRID_EXTENT);
    let mut lines = Vec::new();

    for i in -GRID_EXTENT..=GRID_EXTENT {
        let t = f64::from(i);
        let segments = [
            // XY plane
            (Vector3D::new(-s, t, 0.0), Vector3D::new(s, t, 0.0)),
            (Vector3D::new(t, -s, 0.0), Vector3D::new(t, s, 0.0)),
            // XZ plane
            (Vector3D::new(-s, 0.0, t), Vector3D::new(s, 0.0, t)),
            (Vector3D::new(t, 0.0, -s), Vector3D::new(t, 0.0, s)),
            // YZ plane
            (Vector3D::new(0.0, -s, t), Vector3D::new(0.0, s, t)),
            (Vector3D::new(0.0, t, -s), Vector3D::new(0.0, t, s)),
        ];
        lines.extend(segments.into_iter().map(|(start, end)| GridLine {
            start,
            end,
            depth: viewport.depth(start),
        }));
    }

    lines.sort_by(|a, b| a.depth.total_cmp(&b.depth));
    lines
}

/// A user vector queued for drawing
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QueuedVector {
    pub index: usize,
    /// The vector multiplied by its multiplier
    pub scaled: Vector3D,
    pub depth: f64,
}

/// The scene's vectors after scaling, farthest first
pub fn depth_sorted_vectors(scene: &Scene3D, viewport: &Viewport3D) -> Vec<QueuedVector> {
    let mut queue: Vec<_> = scene
        .scaled_vectors()
        .enumerate()
        .map(|(index, scaled)| QueuedVector {
            index,
            scaled,
            depth: viewport.depth(scaled),
        })
        .collect();
    queue.sort_by(|a, b| a.depth.total_cmp(&b.depth));
    queue
}

/// Draws the space scene
#[derive(Clone, Copy, Debug, Default)]
pub struct Renderer3D;

impl Renderer3D {
    /// Renders one frame of `scene` as seen through `viewport`
    pub fn render(
        &self,
        canvas: &mut impl Canvas,
        scene: &Scene3D,
        viewport: &Viewport3D,
        pointer: &PointerState,
    ) {
        canvas.fill(palette::BACKGROUND);

        if scene.show_grid {
            self.draw_grid(canvas, viewport);
        }

        self.draw_axes(canvas, viewport);
        self.draw_vectors(canvas, scene, viewport, pointer);
    }

    fn draw_grid(&self, canvas: &mut impl Canvas, viewport: &Viewport3D) {
        for line in depth_sorted_grid(viewport) {
            let main = line.is_on_axis();
            let stroke = Stroke::new(if main { 1.5 } else { 1.0 }, palette::grid(main));
            canvas.stroke_line(
                viewport.world_to_screen(line.start).position,
                viewport.world_to_screen(line.end).position,
                &stroke,
            );
        }
    }

    fn draw_axes(&self, canvas: &mut impl Canvas, viewport: &Viewport3D) {
        let origin = viewport.world_to_screen(Vector3D::ZERO).position;
        let axes = [
            (Vector3D::X, palette::RED, "x"),
            (Vector3D::Y, palette::GREEN, "y"),
            (Vector3D::Z, palette::BLUE, "z"),
        ];

        for (direction, color, label) in axes {
            let tip = viewport.world_to_screen(direction.scale(AXIS_LENGTH)).position;
            let arrow = Arrow {
                head_length: 12.0,
                tip_radius: 0.0,
                label_offset: (15.0, -10.0),
                ..Arrow::vector(3.0, color)
            };
            arrow.labeled(label).draw(canvas, origin, tip);
        }
    }

    fn draw_vectors(
        &self,
        canvas: &mut impl Canvas,
        scene: &Scene3D,
        viewport: &Viewport3D,
        pointer: &PointerState,
    ) {
        let to_screen = |v: Vector3D| viewport.world_to_screen(v).position;
        let origin = to_screen(Vector3D::ZERO);
        let queue = depth_sorted_vectors(scene, viewport);
        let connector = Arrow::vector(2.0, palette::sum_connector());
        let connector = Arrow {
            stroke: connector.stroke.dashed(8.0, 4.0),
            ..connector
        };

        let mut partial_sum = Vector3D::ZERO;
        for (position, queued) in queue.iter().enumerate() {
            let highlight = pointer.highlight(queued.index);
            let label = format!("v{}", queued.index + 1);
            Arrow::vector(highlight.line_width(), highlight.color())
                .labeled(&label)
                .draw(canvas, origin, to_screen(queued.scaled));

            let next_sum = partial_sum + queued.scaled;
            if scene.show_vector_sum && position + 1 < queue.len() {
                connector.draw(canvas, to_screen(partial_sum), to_screen(next_sum));
            }
            partial_sum = next_sum;
        }

        if scene.show_vector_sum && !queue.is_empty() {
            Arrow::vector(4.0, palette::GREEN)
                .labeled("sum")
                .draw(canvas, origin, to_screen(partial_sum));
        }
    }
}
