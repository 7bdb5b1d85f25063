use crate::vector::Vector2D;
use std::fmt;
use std::ops::Mul;

/// Threshold below which matrix entries count as zero during the
/// eigenvector search
pub const EIGEN_EPSILON: f64 = 1e-4;

/// The 2x2 matrix `[[a, b], [c, d]]` acting on column vectors
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix2D {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

/// Real eigenvalues of a 2x2 matrix, `lambda1 >= lambda2`. Both values are
/// NaN when the eigenvalues are complex.
#[derive(Clone, Copy, Debug)]
pub struct EigenResult {
    pub lambda1: f64,
    pub lambda2: f64,
}

/// Whether a transformation keeps or flips the handedness of the plane
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Preserved,
    Reversed,
}

/// Transformations offered as one-key shortcuts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    Identity,
    Rotate90,
    Rotate45,
    Scale2,
    ScaleX,
    ScaleY,
    ShearX,
    ShearY,
    Reflection,
    Projection,
}

impl Matrix2D {
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0);

    pub const fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Counter-clockwise rotation by `angle` radians
    pub fn rotation(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(cos, -sin, sin, cos)
    }

    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy)
    }

    pub fn shear(shx: f64, shy: f64) -> Self {
        Self::new(1.0, shx, shy, 1.0)
    }

    pub fn apply(&self, v: Vector2D) -> Vector2D {
        Vector2D::new(self.a * v.x + self.b * v.y, self.c * v.x + self.d * v.y)
    }

    /// Composition `self ∘ other`: `other` is applied first
    pub fn multiply(&self, other: &Self) -> Self {
        Self::new(
            self.a * other.a + self.b * other.c,
            self.a * other.b + self.b * other.d,
            self.c * other.a + self.d * other.c,
            self.c * other.b + self.d * other.d,
        )
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    pub fn trace(&self) -> f64 {
        self.a + self.d
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::of(self.determinant())
    }

    /// Component-wise interpolation. `t` is not clamped.
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let lerp = |from: f64, to: f64| from + (to - from) * t;
        Self::new(
            lerp(self.a, other.a),
            lerp(self.b, other.b),
            lerp(self.c, other.c),
            lerp(self.d, other.d),
        )
    }

    /// Roots of `λ² − trace·λ + det = 0`
    pub fn eigenvalues(&self) -> EigenResult {
        let trace = self.trace();
        let discriminant = trace * trace - 4.0 * self.determinant();

        if discriminant < 0.0 {
            return EigenResult::COMPLEX;
        }

        let sqrt_discriminant = discriminant.sqrt();
        EigenResult {
            lambda1: (trace + sqrt_discriminant) / 2.0,
            lambda2: (trace - sqrt_discriminant) / 2.0,
        }
    }

    /// Finds a unit direction in the null space of `self − λI`.
    ///
    /// Tries the first row, then the second row. When both off-diagonal
    /// entries vanish the matrix is diagonal and the axis whose diagonal entry
    /// matches `λ` is returned, `(1, 0)` first so that `λI` yields `(1, 0)`.
    /// Any other degenerate case yields `None`.
    pub fn eigenvector(&self, lambda: f64) -> Option<Vector2D> {
        if lambda.is_nan() {
            return None;
        }

        let shifted = Self::new(self.a - lambda, self.b, self.c, self.d - lambda);

        if shifted.b.abs() > EIGEN_EPSILON {
            Some(Vector2D::new(-shifted.b, shifted.a).normalize())
        } else if shifted.c.abs() > EIGEN_EPSILON {
            Some(Vector2D::new(-shifted.d, shifted.c).normalize())
        } else if shifted.a.abs() < EIGEN_EPSILON {
            Some(Vector2D::X)
        } else if shifted.d.abs() < EIGEN_EPSILON {
            Some(Vector2D::Y)
        } else {
            log::trace!("No stable eigenvector direction for λ = {lambda} in {self}");
            None
        }
    }
}

impl Default for Matrix2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Matrix2D {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}

impl Mul<Vector2D> for Matrix2D {
    type Output = Vector2D;

    fn mul(self, rhs: Vector2D) -> Vector2D {
        self.apply(rhs)
    }
}

impl fmt::Display for Matrix2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[[{:.2}, {:.2}], [{:.2}, {:.2}]]",
            self.a, self.b, self.c, self.d
        )
    }
}

impl EigenResult {
    pub const COMPLEX: Self = Self {
        lambda1: f64::NAN,
        lambda2: f64::NAN,
    };

    pub fn is_real(&self) -> bool {
        !self.lambda1.is_nan()
    }

    /// Eigenvalue/eigenvector pairs of `matrix` worth displaying: nothing for
    /// complex eigenvalues, a single pair for a repeated eigenvalue, and only
    /// pairs whose eigenvector search succeeded.
    pub fn pairs(&self, matrix: &Matrix2D) -> Vec<(f64, Vector2D)> {
        if !self.is_real() {
            return Vec::new();
        }
        let mut lambdas = vec![self.lambda1];
        if self.lambda2 != self.lambda1 {
            lambdas.push(self.lambda2);
        }
        lambdas
            .into_iter()
            .filter_map(|lambda| matrix.eigenvector(lambda).map(|v| (lambda, v)))
            .collect()
    }
}

impl Orientation {
    /// Classifies the sign of a determinant
    pub fn of(determinant: f64) -> Self {
        if determinant < 0.0 {
            Self::Reversed
        } else {
            Self::Preserved
        }
    }
}

impl Preset {
    /// Maps the number keys to presets, `0` resets
    pub fn from_digit(digit: char) -> Option<Self> {
        let preset = match digit {
            '0' => Self::Identity,
            '1' => Self::Rotate90,
            '2' => Self::Rotate45,
            '3' => Self::Scale2,
            '4' => Self::ScaleX,
            '5' => Self::ScaleY,
            '6' => Self::ShearX,
            '7' => Self::ShearY,
            '8' => Self::Reflection,
            '9' => Self::Projection,
            _ => return None,
        };
        Some(preset)
    }

    pub fn matrix(self) -> Matrix2D {
        use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

        match self {
            Self::Identity => Matrix2D::identity(),
            Self::Rotate90 => Matrix2D::rotation(FRAC_PI_2),
            Self::Rotate45 => Matrix2D::rotation(FRAC_PI_4),
            Self::Scale2 => Matrix2D::scaling(2.0, 2.0),
            Self::ScaleX => Matrix2D::scaling(2.0, 1.0),
            Self::ScaleY => Matrix2D::scaling(1.0, 2.0),
            Self::ShearX => Matrix2D::shear(1.0, 0.0),
            Self::ShearY => Matrix2D::shear(0.0, 1.0),
            Self::Reflection => Matrix2D::new(-1.0, 0.0, 0.0, 1.0),
            Self::Projection => Matrix2D::new(1.0, 0.0, 0.0, 0.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Rotate90 => "rotate 90°",
            Self::Rotate45 => "rotate 45°",
            Self::Scale2 => "scale ×2",
            Self::ScaleX => "scale x ×2",
            Self::ScaleY => "scale y ×2",
            Self::ShearX => "shear x",
            Self::ShearY => "shear y",
            Self::Reflection => "reflection",
            Self::Projection => "projection",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{abs_diff_eq, assert_abs_diff_eq};
    use proptest::prelude::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    prop_compose! {
        fn matrix_strategy(max: f64)(
            a in -max..max,
            b in -max..max,
            c in -max..max,
            d in -max..max,
        ) -> Matrix2D {
            Matrix2D::new(a, b, c, d)
        }
    }

    proptest! {
        #[test]
        fn identity_leaves_vectors_unchanged(x in -1e6..1e6_f64, y in -1e6..1e6_f64) {
            let v = Vector2D::new(x, y);
            prop_assert_eq!(Matrix2D::identity().apply(v), v);
        }
    }

    proptest! {
        #[test]
        fn rotation_has_unit_determinant(angle in -10.0 * PI..10.0 * PI) {
            let determinant = Matrix2D::rotation(angle).determinant();
            prop_assert!(abs_diff_eq!(determinant, 1.0, epsilon = 1e-12));
        }
    }

    proptest! {
        #[test]
        fn scaling_determinant_is_product_of_factors(sx in -1e3..1e3_f64, sy in -1e3..1e3_f64) {
            prop_assert_eq!(Matrix2D::scaling(sx, sy).determinant(), sx * sy);
        }
    }

    proptest! {
        #[test]
        fn composition_applies_right_operand_first(
            m1 in matrix_strategy(10.0),
            m2 in matrix_strategy(10.0),
            x in -10.0..10.0_f64,
            y in -10.0..10.0_f64,
        ) {
            let v = Vector2D::new(x, y);
            let composed = (m1 * m2).apply(v);
            let sequential = m1.apply(m2.apply(v));
            prop_assert!(abs_diff_eq!(composed, sequential, epsilon = 1e-9));
        }
    }

    #[test]
    fn rotation_is_counter_clockwise() {
        let rotated = Matrix2D::rotation(FRAC_PI_2).apply(Vector2D::X);
        assert_abs_diff_eq!(rotated, Vector2D::Y, epsilon = 1e-15);
    }

    #[test]
    fn shear_moves_x_by_multiple_of_y() {
        let sheared = Matrix2D::shear(1.0, 0.0).apply(Vector2D::new(0.0, 2.0));
        assert_eq!(sheared, Vector2D::new(2.0, 2.0));
    }

    #[test]
    fn lerp_hits_endpoints_and_does_not_clamp() {
        let target = Matrix2D::scaling(2.0, 2.0);
        let identity = Matrix2D::identity();
        assert_eq!(identity.lerp(&target, 0.0), identity);
        assert_eq!(identity.lerp(&target, 1.0), target);
        assert_eq!(identity.lerp(&target, 0.5), Matrix2D::scaling(1.5, 1.5));
        assert_eq!(identity.lerp(&target, 2.0), Matrix2D::scaling(3.0, 3.0));
    }

    #[test]
    fn quarter_rotation_has_no_real_eigenvalues() {
        let eigen = Matrix2D::rotation(FRAC_PI_2).eigenvalues();
        assert!(eigen.lambda1.is_nan());
        assert!(eigen.lambda2.is_nan());
        assert!(!eigen.is_real());
        assert!(Matrix2D::rotation(FRAC_PI_2).eigenvector(eigen.lambda1).is_none());
    }

    #[test]
    fn identity_has_repeated_unit_eigenvalue() {
        let identity = Matrix2D::identity();
        let eigen = identity.eigenvalues();
        assert_eq!(eigen.lambda1, 1.0);
        assert_eq!(eigen.lambda2, 1.0);
        assert_eq!(identity.eigenvector(1.0), Some(Vector2D::X));
        assert_eq!(eigen.pairs(&identity), vec![(1.0, Vector2D::X)]);
    }

    #[test]
    fn diagonal_matrix_eigenpairs_are_ordered_descending() {
        let m = Matrix2D::new(2.0, 0.0, 0.0, 3.0);
        let eigen = m.eigenvalues();
        assert_eq!(eigen.lambda1, 3.0);
        assert_eq!(eigen.lambda2, 2.0);

        let v1 = m.eigenvector(eigen.lambda1).unwrap();
        let v2 = m.eigenvector(eigen.lambda2).unwrap();
        assert_abs_diff_eq!(v1, Vector2D::new(0.0, 1.0));
        assert_abs_diff_eq!(v2, Vector2D::new(1.0, 0.0));
    }

    #[test]
    fn shear_eigenvector_lies_along_x_axis() {
        let m = Matrix2D::shear(1.0, 0.0);
        let eigen = m.eigenvalues();
        assert_eq!((eigen.lambda1, eigen.lambda2), (1.0, 1.0));

        let v = m.eigenvector(1.0).unwrap();
        assert_abs_diff_eq!(v, -Vector2D::X);
        assert_abs_diff_eq!(m.apply(v), v);
    }

    #[test]
    fn eigenvector_is_scaled_by_its_eigenvalue() {
        let m = Matrix2D::new(2.0, 1.0, 1.0, 2.0);
        for (lambda, v) in m.eigenvalues().pairs(&m) {
            assert_abs_diff_eq!(m.apply(v), v.scale(lambda), epsilon = 1e-12);
        }
    }

    #[test]
    fn eigenvector_search_gives_up_on_mismatched_diagonal() {
        let m = Matrix2D::scaling(2.0, 3.0);
        assert!(m.eigenvector(5.0).is_none());
    }

    #[test]
    fn diagonal_matrices_take_the_axis_matching_each_eigenvalue() {
        let m = Matrix2D::scaling(2.0, 3.0);
        assert_eq!(m.eigenvector(2.0), Some(Vector2D::X));
        assert_eq!(m.eigenvector(3.0), Some(Vector2D::Y));
        assert_eq!(Matrix2D::identity().eigenvector(1.0), Some(Vector2D::X));
    }

    #[test]
    fn determinant_sign_classifies_orientation() {
        assert_eq!(Preset::Reflection.matrix().orientation(), Orientation::Reversed);
        assert_eq!(Preset::Rotate45.matrix().orientation(), Orientation::Preserved);
        assert_eq!(Preset::Projection.matrix().orientation(), Orientation::Preserved);
    }

    #[test]
    fn digits_select_presets() {
        assert_eq!(Preset::from_digit('0'), Some(Preset::Identity));
        assert_eq!(Preset::from_digit('3').map(Preset::matrix), Some(Matrix2D::scaling(2.0, 2.0)));
        assert_eq!(Preset::from_digit('a'), None);
    }
}
