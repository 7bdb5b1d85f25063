use crate::animation::AnimationDriver;
use crate::canvas::{palette, Arrow, Canvas, Point, Stroke};
use crate::interaction::PointerState;
use crate::mapper::{CoordinateMapper, CANVAS_SIZE};
use crate::math::{Matrix2D, Orientation};
use crate::state::Scene2D;
use crate::vector::Vector2D;

/// Grid lines run from `-GRID_EXTENT` to `GRID_EXTENT` on both axes
const GRID_EXTENT: i32 = 10;

/// Draws the plane scene
#[derive(Clone, Copy, Debug, Default)]
pub struct Renderer2D {
    pub mapper: CoordinateMapper,
}

impl Renderer2D {
    pub fn new(mapper: CoordinateMapper) -> Self {
        Self { mapper }
    }

    /// Renders one frame of `scene` as transformed by the current state of
    /// `animation`
    pub fn render(
        &self,
        canvas: &mut impl Canvas,
        scene: &Scene2D,
        animation: &AnimationDriver,
        pointer: &PointerState,
    ) {
        canvas.fill(palette::BACKGROUND);

        let display = animation.display_matrix();

        if scene.show_grid {
            self.draw_grid(canvas, &display);
        }

        self.draw_axes(canvas);

        if scene.show_eigenvectors {
            self.draw_eigen_directions(canvas, &animation.target());
        }

        if scene.show_basis_vectors {
            let origin = self.mapper.world_to_screen(Vector2D::ZERO);
            let i_hat = self.mapper.world_to_screen(display.apply(Vector2D::X));
            let j_hat = self.mapper.world_to_screen(display.apply(Vector2D::Y));
            Arrow::vector(4.0, palette::RED).labeled("î").draw(canvas, origin, i_hat);
            Arrow::vector(4.0, palette::GREEN).labeled("ĵ").draw(canvas, origin, j_hat);
        }

        self.draw_vectors(canvas, scene, &display, pointer);
        self.draw_info(canvas, &animation.target());
    }

    fn draw_grid(&self, canvas: &mut impl Canvas, display: &Matrix2D) {
        let extent = f64::from(GRID_EXTENT);
        let to_screen =
            |x: f64, y: f64| self.mapper.world_to_screen(display.apply(Vector2D::new(x, y)));

        for k in -GRID_EXTENT..=GRID_EXTENT {
            let main = k == 0;
            let stroke = Stroke::new(if main { 1.5 } else { 1.0 }, palette::grid(main));
            let k = f64::from(k);

            canvas.stroke_line(to_screen(k, -extent), to_screen(k, extent), &stroke);
            canvas.stroke_line(to_screen(-extent, k), to_screen(extent, k), &stroke);
        }

        for i in (-8..=8).step_by(2).filter(|&i| i != 0) {
            let label = i.to_string();
            let i = f64::from(i);
            canvas.text(to_screen(i, 0.0).offset(0.0, 15.0), &label, palette::grid_label());
            canvas.text(to_screen(0.0, i).offset(-15.0, 0.0), &label, palette::grid_label());
        }
    }

    /// Fixed screen-space reference axes
    fn draw_axes(&self, canvas: &mut impl Canvas) {
        let center = self.mapper.center;
        let stroke = Stroke::new(2.0, palette::axis());

        canvas.stroke_line(Point::new(0.0, center.y), Point::new(CANVAS_SIZE, center.y), &stroke);
        canvas.stroke_line(Point::new(center.x, 0.0), Point::new(center.x, CANVAS_SIZE), &stroke);

        canvas.text(Point::new(CANVAS_SIZE - 20.0, center.y - 10.0), "x", palette::axis_label());
        canvas.text(Point::new(center.x + 15.0, 20.0), "y", palette::axis_label());
    }

    /// Lines through the origin left in place by `target`
    fn draw_eigen_directions(&self, canvas: &mut impl Canvas, target: &Matrix2D) {
        let extent = f64::from(GRID_EXTENT);
        let stroke = Stroke::new(1.5, palette::PURPLE).dashed(6.0, 4.0);

        for (n, (lambda, v)) in target.eigenvalues().pairs(target).into_iter().enumerate() {
            let from = self.mapper.world_to_screen(v.scale(-extent));
            let to = self.mapper.world_to_screen(v.scale(extent));
            canvas.stroke_line(from, to, &stroke);

            let label = format!("λ{} = {lambda:.2}", n + 1);
            let anchor = self.mapper.world_to_screen(v.scale(extent - 1.0));
            canvas.text(anchor.offset(8.0, -8.0), &label, palette::PURPLE);
        }
    }

    fn draw_vectors(
        &self,
        canvas: &mut impl Canvas,
        scene: &Scene2D,
        display: &Matrix2D,
        pointer: &PointerState,
    ) {
        let origin = self.mapper.world_to_screen(Vector2D::ZERO);

        for (index, &v) in scene.vectors.iter().enumerate() {
            let highlight = pointer.highlight(index);
            let tip = self.mapper.world_to_screen(display.apply(v));
            let label = format!("v{}", index + 1);

            Arrow::vector(highlight.line_width(), highlight.color())
                .labeled(&label)
                .draw(canvas, origin, tip);
        }
    }

    /// Matrix, determinant and eigen summary in the lower-left corner
    fn draw_info(&self, canvas: &mut impl Canvas, target: &Matrix2D) {
        let determinant = target.determinant();
        let determinant_color = match target.orientation() {
            Orientation::Preserved => palette::ORANGE_TEXT,
            Orientation::Reversed => palette::BLUE_TEXT,
        };

        let mut lines = vec![
            (format!("[{:>5.2} {:>5.2}]", target.a, target.b), palette::axis_label()),
            (format!("[{:>5.2} {:>5.2}]", target.c, target.d), palette::axis_label()),
            (format!("det = {determinant:.3}"), determinant_color),
        ];

        let eigen = target.eigenvalues();
        if eigen.is_real() {
            for (n, (lambda, v)) in eigen.pairs(target).into_iter().enumerate() {
                lines.push((
                    format!("λ{} = {lambda:.3}  v{} = [{:.2}, {:.2}]", n + 1, n + 1, v.x, v.y),
                    palette::PURPLE,
                ));
            }
        } else {
            lines.push(("no real eigenvalues".to_owned(), palette::axis_label()));
        }

        let top = CANVAS_SIZE - 20.0 * lines.len() as f64 - 10.0;
        for (row, (text, color)) in lines.iter().enumerate() {
            canvas.text(Point::new(16.0, top + 20.0 * row as f64), text, *color);
        }
    }
}
