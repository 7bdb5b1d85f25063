use crate::vector::{Vector2D, Vector3D};
use clap::ValueEnum;

/// Smallest and largest per-vector multiplier in the space scene
pub const SCALE_RANGE: (f64, f64) = (-3.0, 3.0);

/// Which scene is shown
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// 2D vectors under an animated matrix transformation
    #[default]
    Flat,
    /// 3D vectors with scalar multipliers and an orbiting camera
    Space,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Flat => Self::Space,
            Self::Space => Self::Flat,
        }
    }
}

/// Application state
#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub mode: Mode,
    pub flat: Scene2D,
    pub space: Scene3D,
    /// Show the debug overlay
    pub debug: bool,
}

/// Vectors and toggles of the plane scene
#[derive(Clone, Debug, PartialEq)]
pub struct Scene2D {
    pub vectors: Vec<Vector2D>,
    pub show_grid: bool,
    pub show_basis_vectors: bool,
    pub show_eigenvectors: bool,
}

/// Vectors, multipliers and toggles of the space scene
#[derive(Clone, Debug, PartialEq)]
pub struct Scene3D {
    pub vectors: Vec<Vector3D>,
    /// Multiplier for the vector at the same index
    pub scales: Vec<f64>,
    pub show_grid: bool,
    pub show_vector_sum: bool,
}

impl Scene2D {
    pub fn add_vector(&mut self) {
        self.vectors.push(Vector2D::new(1.0, 1.0));
        log::info!("Added v{}", self.vectors.len());
    }

    /// Removes the vector at `index`; later vectors move down one slot
    pub fn remove_vector(&mut self, index: usize) {
        if index < self.vectors.len() {
            self.vectors.remove(index);
            log::info!("Removed v{}", index + 1);
        }
    }

    pub fn update_vector(&mut self, index: usize, vector: Vector2D) {
        if let Some(slot) = self.vectors.get_mut(index) {
            *slot = vector;
        }
    }
}

impl Default for Scene2D {
    fn default() -> Self {
        Self {
            vectors: vec![Vector2D::new(3.0, 2.0), Vector2D::new(-2.0, 3.0)],
            show_grid: true,
            show_basis_vectors: true,
            show_eigenvectors: true,
        }
    }
}

impl Scene3D {
    pub fn add_vector(&mut self) {
        self.vectors.push(Vector3D::new(1.0, 1.0, 1.0));
        self.scales.resize(self.vectors.len() - 1, 1.0);
        self.scales.push(1.0);
        log::info!("Added v{}", self.vectors.len());
    }

    /// Removes the vector and its multiplier at `index`; later vectors move
    /// down one slot
    pub fn remove_vector(&mut self, index: usize) {
        if index < self.vectors.len() {
            self.vectors.remove(index);
            if index < self.scales.len() {
                self.scales.remove(index);
            }
            log::info!("Removed v{}", index + 1);
        }
    }

    pub fn update_vector(&mut self, index: usize, vector: Vector3D) {
        if let Some(slot) = self.vectors.get_mut(index) {
            *slot = vector;
        }
    }

    /// Multiplier of the vector at `index`, 1 when none was set
    pub fn scale_of(&self, index: usize) -> f64 {
        self.scales.get(index).copied().unwrap_or(1.0)
    }

    /// Sets the multiplier at `index`, clamped to [`SCALE_RANGE`]
    pub fn set_scale(&mut self, index: usize, scale: f64) {
        if index >= self.vectors.len() {
            return;
        }
        if self.scales.len() <= index {
            self.scales.resize(index + 1, 1.0);
        }
        let (min, max) = SCALE_RANGE;
        self.scales[index] = scale.clamp(min, max);
    }

    /// Every vector multiplied by its multiplier, in index order
    pub fn scaled_vectors(&self) -> impl Iterator<Item = Vector3D> + '_ {
        self.vectors
            .iter()
            .enumerate()
            .map(|(index, v)| v.scale(self.scale_of(index)))
    }
}

impl Default for Scene3D {
    fn default() -> Self {
        Self {
            vectors: vec![Vector3D::new(3.0, 2.0, 1.0), Vector3D::new(1.0, 3.0, 2.0)],
            scales: vec![1.0, 1.0],
            show_grid: true,
            show_vector_sum: true,
        }
    }
}
