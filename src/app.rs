use crate::animation::AnimationDriver;
use crate::canvas::{Canvas, Color, Point};
use crate::graphics::FrameBuffer;
use crate::interaction::{Controller2D, Controller3D};
use crate::mapper::CoordinateMapper;
use crate::math::Preset;
use crate::projection::Viewport3D;
use crate::render2d::Renderer2D;
use crate::render3d::Renderer3D;
use crate::state::{AppState, Mode};
use crate::terminal::{self, TerminalViewport};
use crate::Cli;
use anyhow::Context;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::io::Write;
use std::time::{Duration, Instant};

/// Step applied to a vector multiplier by `+` and `-`
const SCALE_STEP: f64 = 0.1;

/// Visualizer host: owns the state, turns terminal events into controller
/// calls and renders frames
pub struct App {
    state: AppState,
    animation: AnimationDriver,
    renderer2d: Renderer2D,
    renderer3d: Renderer3D,
    viewport3d: Viewport3D,
    controller2d: Controller2D,
    controller3d: Controller3D,
    terminal: TerminalViewport,
    frame: FrameBuffer,
    frame_interval: Duration,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
    /// Whether the pointer was last seen inside the canvas
    pointer_inside: bool,
    needs_redraw: bool,
    quit: bool,
}

impl App {
    pub fn new(cli: &Cli) -> Self {
        let mapper = CoordinateMapper::new(cli.scale);
        let (columns, rows) = terminal::size();
        let viewport = TerminalViewport::fit(columns, rows);

        Self {
            state: AppState {
                mode: cli.mode,
                debug: cli.debug,
                ..AppState::default()
            },
            animation: AnimationDriver::new(),
            renderer2d: Renderer2D::new(mapper),
            renderer3d: Renderer3D,
            viewport3d: Viewport3D::new(mapper),
            controller2d: Controller2D::default(),
            controller3d: Controller3D::default(),
            terminal: viewport,
            frame: FrameBuffer::new(usize::from(viewport.side)),
            frame_interval: Duration::from_secs(1) / cli.fps.max(1),
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
            pointer_inside: false,
            needs_redraw: true,
            quit: false,
        }
    }

    /// Runs until the user quits
    pub fn run(&mut self, out: &mut impl Write) -> anyhow::Result<()> {
        while !self.quit {
            if self.animation.is_animating() {
                self.animation.tick(Instant::now());
                self.needs_redraw = true;
            }
            if self.needs_redraw || self.state.debug {
                self.draw(out).context("Failed to draw frame")?;
                self.needs_redraw = false;
            }

            if event::poll(self.frame_interval).context("Failed to poll terminal events")? {
                loop {
                    let event = event::read().context("Failed to read terminal event")?;
                    self.handle_event(event, Instant::now());
                    if !event::poll(Duration::ZERO)? {
                        break;
                    }
                }
                self.needs_redraw = true;
            }
        }
        Ok(())
    }

    /// Handle events for the visualizer
    fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            Event::Key(key) => self.handle_key(key, now),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::FocusLost => self.pointer_leave(),
            Event::Resize(columns, rows) => {
                log::debug!("Terminal resized to {columns}x{rows}");
                self.terminal = TerminalViewport::fit(columns, rows);
                self.frame = FrameBuffer::new(usize::from(self.terminal.side));
                self.pointer_leave();
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit = true,
            KeyCode::Tab => {
                self.pointer_leave();
                self.state.mode = self.state.mode.toggled();
                log::info!("Switched to {:?} mode", self.state.mode);
            }
            KeyCode::Char('d') => self.state.debug = !self.state.debug,
            KeyCode::Char('g') => match self.state.mode {
                Mode::Flat => self.state.flat.show_grid = !self.state.flat.show_grid,
                Mode::Space => self.state.space.show_grid = !self.state.space.show_grid,
            },
            KeyCode::Char('a') => match self.state.mode {
                Mode::Flat => self.state.flat.add_vector(),
                Mode::Space => self.state.space.add_vector(),
            },
            KeyCode::Char('x') => self.remove_vector(),
            KeyCode::Char(c) => match self.state.mode {
                Mode::Flat => self.handle_flat_key(c, now),
                Mode::Space => self.handle_space_key(c),
            },
            _ => {}
        }
    }

    fn handle_flat_key(&mut self, c: char, now: Instant) {
        let scene = &mut self.state.flat;
        match c {
            'b' => scene.show_basis_vectors = !scene.show_basis_vectors,
            'e' => scene.show_eigenvectors = !scene.show_eigenvectors,
            _ => {
                if let Some(preset) = Preset::from_digit(c) {
                    log::info!("Applying {}", preset.name());
                    self.animation.request(preset.matrix(), now);
                }
            }
        }
    }

    fn handle_space_key(&mut self, c: char) {
        let scene = &mut self.state.space;
        match c {
            's' => scene.show_vector_sum = !scene.show_vector_sum,
            'r' => self.viewport3d.camera.reset(),
            '+' | '=' | '-' => {
                let Some(index) = self.controller3d.pointer.hovered else {
                    return;
                };
                let step = if c == '-' { -SCALE_STEP } else { SCALE_STEP };
                let scale = ((scene.scale_of(index) + step) * 10.0).round() / 10.0;
                scene.set_scale(index, scale);
            }
            _ => {}
        }
    }

    /// Removes the hovered vector, or the last one when none is hovered
    fn remove_vector(&mut self) {
        match self.state.mode {
            Mode::Flat => {
                let scene = &mut self.state.flat;
                let last = scene.vectors.len().checked_sub(1);
                if let Some(index) = self.controller2d.pointer.hovered.or(last) {
                    scene.remove_vector(index);
                }
                self.controller2d.pointer_leave();
            }
            Mode::Space => {
                let scene = &mut self.state.space;
                let last = scene.vectors.len().checked_sub(1);
                if let Some(index) = self.controller3d.pointer.hovered.or(last) {
                    scene.remove_vector(index);
                }
                self.controller3d.pointer_leave();
            }
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let Some(at) = self.terminal.to_canvas(mouse.column, mouse.row) else {
            if self.pointer_inside {
                self.pointer_leave();
            }
            return;
        };
        self.pointer_inside = true;

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.pointer_down(at),
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                self.pointer_move(at)
            }
            MouseEventKind::Up(MouseButton::Left) => match self.state.mode {
                Mode::Flat => self.controller2d.pointer_up(),
                Mode::Space => self.controller3d.pointer_up(),
            },
            _ => {}
        }
    }

    fn pointer_down(&mut self, at: Point) {
        match self.state.mode {
            Mode::Flat => {
                let display = self.animation.display_matrix();
                self.controller2d
                    .pointer_down(at, &self.state.flat, &display, &self.renderer2d.mapper);
            }
            Mode::Space => self.controller3d.pointer_down(at, &self.state.space, &self.viewport3d),
        }
    }

    fn pointer_move(&mut self, at: Point) {
        match self.state.mode {
            Mode::Flat => {
                let display = self.animation.display_matrix();
                let mut update = None;
                self.controller2d.pointer_move(
                    at,
                    &self.state.flat,
                    &display,
                    &self.renderer2d.mapper,
                    |index, v| update = Some((index, v)),
                );
                if let Some((index, v)) = update {
                    self.state.flat.update_vector(index, v);
                }
            }
            Mode::Space => {
                let mut update = None;
                self.controller3d.pointer_move(
                    at,
                    &self.state.space,
                    &mut self.viewport3d,
                    |index, v| update = Some((index, v)),
                );
                if let Some((index, v)) = update {
                    self.state.space.update_vector(index, v);
                }
            }
        }
    }

    fn pointer_leave(&mut self) {
        self.pointer_inside = false;
        self.controller2d.pointer_leave();
        self.controller3d.pointer_leave();
    }

    fn draw(&mut self, out: &mut impl Write) -> std::io::Result<()> {
        // Update FPS calculation
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }

        match self.state.mode {
            Mode::Flat => self.renderer2d.render(
                &mut self.frame,
                &self.state.flat,
                &self.animation,
                &self.controller2d.pointer,
            ),
            Mode::Space => self.renderer3d.render(
                &mut self.frame,
                &self.state.space,
                &self.viewport3d,
                &self.controller3d.pointer,
            ),
        }

        if self.state.debug {
            for (row, line) in self.debug_lines().iter().enumerate() {
                self.frame
                    .text(Point::new(10.0, 10.0 + 20.0 * row as f64), line, Color::WHITE);
            }
        }

        terminal::present(out, &self.frame, &self.terminal)
    }

    fn debug_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            format!("Mode: {:?}", self.state.mode),
        ];
        match self.state.mode {
            Mode::Flat => {
                lines.push(format!("Transition: {:.2}", self.animation.value()));
                lines.push(format!("Resting: {}", self.animation.resting()));
            }
            Mode::Space => {
                let camera = self.viewport3d.camera;
                lines.push(format!(
                    "Camera: ({:.2}, {:.2})",
                    camera.rotation_x, camera.rotation_y
                ));
                if self.controller3d.is_orbiting() {
                    lines.push("Orbiting".to_owned());
                }
            }
        }
        lines.push(format!("FPS: {:.2}", self.fps));
        lines
    }
}
