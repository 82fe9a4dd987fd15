#![forbid(unsafe_code)]

//! Coarse grid of unit gradient vectors.
//!
//! The grid holds `(height + 1) x (width + 1)` gradients so every cell has
//! four corners. Interior gradients are shared by up to four adjacent tiles.

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{ConfigError, FieldDimensions};

/// Tolerance for accepting hand-specified gradients as unit vectors.
const UNIT_TOLERANCE: f64 = 1e-6;

/// Plain 2-D vector: gradients, corner offsets, and interpolation weights.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

/// Unit [`Vec2`] stored at a lattice point.
pub type Gradient = Vec2;

impl Vec2 {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector at `angle` radians from the +x axis.
    #[inline]
    pub fn from_angle(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self { x: cos, y: sin }
    }

    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Rotate around the origin given a precomputed `(sin, cos)` pair.
    #[inline]
    fn rotated_by(self, sin: f64, cos: f64) -> Self {
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }
}

/// Row-major grid of unit gradients, mutated in place every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientField {
    dimensions: FieldDimensions,
    cols: usize,
    rows: usize,
    cells: Vec<Gradient>,
}

impl GradientField {
    /// Random unit gradients at uniform angles in `[0, 2π)`.
    pub fn random<R: Rng + ?Sized>(dimensions: FieldDimensions, rng: &mut R) -> Self {
        let rows = dimensions.height + 1;
        let cols = dimensions.width + 1;
        let cells = (0..rows * cols)
            .map(|_| Gradient::from_angle(rng.gen_range(0.0..TAU)))
            .collect();
        Self {
            dimensions,
            cols,
            rows,
            cells,
        }
    }

    /// Reproducible random field for a given seed.
    pub fn from_seed(dimensions: FieldDimensions, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::random(dimensions, &mut rng)
    }

    /// Hand-specified field, row-major, `(height + 1) * (width + 1)` cells.
    pub fn from_gradients(
        dimensions: FieldDimensions,
        cells: Vec<Gradient>,
    ) -> Result<Self, ConfigError> {
        let rows = dimensions.height + 1;
        let cols = dimensions.width + 1;
        let expected = rows * cols;
        if cells.len() != expected {
            return Err(ConfigError::GradientCount {
                expected,
                actual: cells.len(),
            });
        }
        if let Some((index, g)) = cells
            .iter()
            .enumerate()
            .find(|(_, g)| (g.length() - 1.0).abs() > UNIT_TOLERANCE)
        {
            return Err(ConfigError::NonUnitGradient {
                index,
                length: g.length(),
            });
        }
        Ok(Self {
            dimensions,
            cols,
            rows,
            cells,
        })
    }

    /// Rotate every gradient, including the last row and column, by `angle`.
    pub fn rotate_all(&mut self, angle: f64) {
        if angle == 0.0 {
            return;
        }
        let (sin, cos) = angle.sin_cos();
        for g in &mut self.cells {
            *g = g.rotated_by(sin, cos);
        }
    }

    #[inline]
    pub const fn dimensions(&self) -> FieldDimensions {
        self.dimensions
    }

    #[inline]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Gradient at grid point `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the point is outside the grid.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Gradient {
        assert!(
            row < self.rows && col < self.cols,
            "gradient ({row}, {col}) outside {}x{} grid",
            self.rows,
            self.cols
        );
        self.cells[row * self.cols + col]
    }

    /// Corner gradients of cell `(gi, gj)` in NW, NE, SW, SE order.
    #[inline]
    pub fn corners(&self, gi: usize, gj: usize) -> [Gradient; 4] {
        let top = gi * self.cols + gj;
        let bottom = top + self.cols;
        [
            self.cells[top],
            self.cells[top + 1],
            self.cells[bottom],
            self.cells[bottom + 1],
        ]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Gradient> {
        self.cells.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-9;

    fn dims(w: usize, h: usize) -> FieldDimensions {
        FieldDimensions::new(w, h)
    }

    #[test]
    fn random_field_has_one_extra_row_and_col() {
        let field = GradientField::from_seed(dims(16, 10), 7);
        assert_eq!(field.rows(), 11);
        assert_eq!(field.cols(), 17);
        assert_eq!(field.len(), 11 * 17);
    }

    #[test]
    fn random_gradients_are_unit_length() {
        let field = GradientField::from_seed(dims(8, 8), 42);
        for g in field.iter() {
            assert!((g.length() - 1.0).abs() < EPS, "length {}", g.length());
        }
    }

    #[test]
    fn same_seed_same_field() {
        let a = GradientField::from_seed(dims(5, 3), 99);
        let b = GradientField::from_seed(dims(5, 3), 99);
        assert_eq!(a, b);
        let c = GradientField::from_seed(dims(5, 3), 100);
        assert_ne!(a, c);
    }

    #[test]
    fn zero_dimensions_give_single_gradient() {
        let field = GradientField::from_seed(dims(0, 0), 1);
        assert_eq!(field.len(), 1);
        assert!(field.dimensions().is_empty());
    }

    #[test]
    fn rotate_quarter_turn() {
        let mut field =
            GradientField::from_gradients(dims(0, 0), vec![Gradient::new(1.0, 0.0)]).unwrap();
        field.rotate_all(FRAC_PI_2);
        let g = field.get(0, 0);
        assert!(g.x.abs() < EPS);
        assert!((g.y - 1.0).abs() < EPS);
    }

    #[test]
    fn rotate_touches_last_row_and_col() {
        let mut field = GradientField::from_gradients(
            dims(1, 1),
            vec![Gradient::new(1.0, 0.0); 4],
        )
        .unwrap();
        field.rotate_all(PI);
        for g in field.iter() {
            assert!((g.x + 1.0).abs() < EPS);
            assert!(g.y.abs() < EPS);
        }
    }

    #[test]
    fn rotation_preserves_length() {
        let mut field = GradientField::from_seed(dims(4, 4), 3);
        for _ in 0..10_000 {
            field.rotate_all(0.0137);
        }
        for g in field.iter() {
            assert!((g.length() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn corners_order_is_nw_ne_sw_se() {
        let cells = vec![
            Gradient::from_angle(0.0),
            Gradient::from_angle(1.0),
            Gradient::from_angle(2.0),
            Gradient::from_angle(3.0),
            Gradient::from_angle(4.0),
            Gradient::from_angle(5.0),
        ];
        let field = GradientField::from_gradients(dims(2, 1), cells.clone()).unwrap();
        assert_eq!(field.corners(0, 1), [cells[1], cells[2], cells[4], cells[5]]);
    }

    #[test]
    fn wrong_cell_count_rejected() {
        let err = GradientField::from_gradients(dims(1, 1), vec![Gradient::new(1.0, 0.0)])
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::GradientCount {
                expected: 4,
                actual: 1
            }
        );
    }

    #[test]
    fn non_unit_gradient_rejected() {
        let mut cells = vec![Gradient::new(0.0, 1.0); 4];
        cells[2] = Gradient::new(2.0, 0.0);
        let err = GradientField::from_gradients(dims(1, 1), cells).unwrap_err();
        assert_eq!(
            err,
            ConfigError::NonUnitGradient {
                index: 2,
                length: 2.0
            }
        );
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn get_out_of_range_panics() {
        let field = GradientField::from_seed(dims(1, 1), 0);
        let _ = field.get(2, 0);
    }
}
