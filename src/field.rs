// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use ndarray::Array2;

use crate::error::{EikonalError, Result};

/// Read access to a speed field paired with an arrival-time field.
///
/// Indices are `[x, y]` with `x` the row in `0..H` and `y` the column in
/// `0..W`. Callers are responsible for bounds; implementations may panic on
/// out-of-range indices.
pub trait GridData {
    /// Get the arrival time at the given cell.
    fn get_t(&self, idx: [usize; 2]) -> f64;

    /// Get the propagation speed at the given cell.
    fn get_speed(&self, idx: [usize; 2]) -> f64;

    /// Get the grid shape `[H, W]`.
    fn shape(&self) -> [usize; 2];
}

/// Immutable 2D field of non-negative propagation speeds with unit cell spacing.
///
/// A cell with speed 0 is impassable.
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityField {
    shape: [usize; 2],
    speed: Box<[f64]>,
}

impl VelocityField {
    /// Create a velocity field from row-major data.
    ///
    /// # Errors
    /// Returns [`EikonalError::EmptyField`] if either dimension is zero,
    /// [`EikonalError::ShapeMismatch`] if `speed.len()` is not `H * W`, and
    /// [`EikonalError::InvalidSpeed`] for any negative, NaN or infinite value.
    pub fn new(shape: [usize; 2], speed: Vec<f64>) -> Result<Self> {
        if shape[0] == 0 || shape[1] == 0 {
            return Err(EikonalError::EmptyField);
        }

        let num_cells = cell_count(shape)?;
        if speed.len() != num_cells {
            return Err(EikonalError::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![speed.len()],
            });
        }

        for (index, &value) in speed.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(EikonalError::InvalidSpeed {
                    x: index / shape[1],
                    y: index % shape[1],
                    value,
                });
            }
        }

        Ok(VelocityField {
            shape,
            speed: speed.into_boxed_slice(),
        })
    }

    /// Create a velocity field from nested rows, one `Vec` per `x`.
    ///
    /// # Errors
    /// Fails on an empty or ragged array, or on invalid speeds.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(EikonalError::EmptyField);
        }

        let mut speed = Vec::with_capacity(height * width);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != width {
                return Err(EikonalError::RaggedRows {
                    row,
                    expected: width,
                    got: values.len(),
                });
            }
            speed.extend(values);
        }
        Self::new([height, width], speed)
    }

    /// Create a velocity field from an `ndarray` array of any memory layout.
    pub fn from_array(array: Array2<f64>) -> Result<Self> {
        let (height, width) = array.dim();
        let speed = array.as_standard_layout().iter().copied().collect();
        Self::new([height, width], speed)
    }

    /// Create a field with the same speed in every cell.
    pub fn uniform(shape: [usize; 2], speed: f64) -> Result<Self> {
        Self::new(shape, vec![speed; cell_count(shape)?])
    }

    /// Speed at cell `(x, y)`.
    ///
    /// # Panics
    /// Panics if the cell is outside the grid.
    pub fn speed(&self, x: usize, y: usize) -> f64 {
        self.speed[x * self.shape[1] + y]
    }

    /// Grid shape `[H, W]`.
    pub fn shape(&self) -> [usize; 2] {
        self.shape
    }

    /// Total number of cells.
    pub fn num_cells(&self) -> usize {
        self.speed.len()
    }

    /// Row-major speed values.
    pub fn as_slice(&self) -> &[f64] {
        &self.speed
    }

    /// Copy the field into an `ndarray` array.
    pub fn to_array(&self) -> Array2<f64> {
        to_array2(self.shape, &self.speed)
    }

    /// Check whether `(x, y)` lies inside the grid.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.shape[0] && y < self.shape[1]
    }
}

/// Best-known arrival time per cell.
///
/// Starts at +infinity everywhere except the source cell, which is 0 and stays
/// 0. Values only ever decrease.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrivalTimeField {
    shape: [usize; 2],
    source: [usize; 2],
    time: Box<[f64]>,
}

impl ArrivalTimeField {
    /// Create a field of the given shape seeded at `source`.
    ///
    /// # Errors
    /// Returns [`EikonalError::SourceOutOfBounds`] if `source` is outside
    /// `[0, H) x [0, W)`.
    pub fn new(shape: [usize; 2], source: [usize; 2]) -> Result<Self> {
        if source[0] >= shape[0] || source[1] >= shape[1] {
            return Err(EikonalError::SourceOutOfBounds { source, shape });
        }

        let mut time = vec![f64::INFINITY; cell_count(shape)?].into_boxed_slice();
        time[source[0] * shape[1] + source[1]] = 0.0;

        Ok(ArrivalTimeField {
            shape,
            source,
            time,
        })
    }

    /// Arrival time at cell `(x, y)`.
    ///
    /// # Panics
    /// Panics if the cell is outside the grid.
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.time[x * self.shape[1] + y]
    }

    pub(crate) fn set(&mut self, x: usize, y: usize, value: f64) {
        let flat = x * self.shape[1] + y;
        self.time[flat] = value;
    }

    /// Write `value` only if it is strictly below the stored time.
    /// Returns true if the field changed.
    pub(crate) fn update(&mut self, x: usize, y: usize, value: f64) -> bool {
        if value < self.get(x, y) {
            self.set(x, y, value);
            true
        } else {
            false
        }
    }

    /// Grid shape `[H, W]`.
    pub fn shape(&self) -> [usize; 2] {
        self.shape
    }

    /// The seeded source cell.
    pub fn source(&self) -> [usize; 2] {
        self.source
    }

    /// Total number of cells.
    pub fn num_cells(&self) -> usize {
        self.time.len()
    }

    /// True once a finite arrival time is known for `(x, y)`.
    pub fn is_reached(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_finite()
    }

    /// Largest finite arrival time. The source is always finite, so this is
    /// `Some` for any constructed field.
    pub fn max_finite(&self) -> Option<f64> {
        self.time
            .iter()
            .copied()
            .filter(|t| t.is_finite())
            .fold(None, |acc, t| Some(acc.map_or(t, |m: f64| m.max(t))))
    }

    /// Row-major arrival times.
    pub fn as_slice(&self) -> &[f64] {
        &self.time
    }

    /// Copy the field into an `ndarray` array for rendering or export.
    pub fn to_array(&self) -> Array2<f64> {
        to_array2(self.shape, &self.time)
    }

    /// Forget every computed time: all cells back to +inf, source back to 0.
    pub(crate) fn reset(&mut self) {
        self.time.fill(f64::INFINITY);
        let [x, y] = self.source;
        self.set(x, y, 0.0);
    }
}

/// Borrowed view pairing a velocity field with a same-shaped time field.
pub struct GridView<'a> {
    pub(crate) velocity: &'a VelocityField,
    pub(crate) times: &'a ArrivalTimeField,
}

impl<'a> GridView<'a> {
    /// Pair the two fields.
    ///
    /// # Errors
    /// Returns [`EikonalError::ShapeMismatch`] if the shapes differ.
    pub fn new(velocity: &'a VelocityField, times: &'a ArrivalTimeField) -> Result<Self> {
        if velocity.shape() != times.shape() {
            return Err(EikonalError::ShapeMismatch {
                expected: velocity.shape().to_vec(),
                got: times.shape().to_vec(),
            });
        }
        Ok(GridView { velocity, times })
    }
}

impl GridData for GridView<'_> {
    fn get_t(&self, idx: [usize; 2]) -> f64 {
        self.times.get(idx[0], idx[1])
    }

    fn get_speed(&self, idx: [usize; 2]) -> f64 {
        self.velocity.speed(idx[0], idx[1])
    }

    fn shape(&self) -> [usize; 2] {
        self.velocity.shape()
    }
}

/// `H * W`, or a shape mismatch if the product overflows.
fn cell_count(shape: [usize; 2]) -> Result<usize> {
    shape[0]
        .checked_mul(shape[1])
        .ok_or_else(|| EikonalError::ShapeMismatch {
            expected: shape.to_vec(),
            got: vec![usize::MAX],
        })
}

fn to_array2(shape: [usize; 2], data: &[f64]) -> Array2<f64> {
    Array2::from_shape_fn((shape[0], shape[1]), |(x, y)| data[x * shape[1] + y])
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn velocity_row_major_layout() {
        let field = VelocityField::new([2, 3], vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(field.shape(), [2, 3]);
        assert_eq!(field.speed(0, 2), 2.0);
        assert_eq!(field.speed(1, 0), 3.0);
        assert_eq!(field.num_cells(), 6);
    }

    #[test]
    fn velocity_from_rows() {
        let field = VelocityField::from_rows(vec![vec![1.0, 0.5], vec![0.0, 2.0]]).unwrap();
        assert_eq!(field.shape(), [2, 2]);
        assert_eq!(field.speed(1, 1), 2.0);
        assert_eq!(field.speed(1, 0), 0.0);
    }

    #[test]
    fn velocity_from_transposed_array() {
        let arr = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let field = VelocityField::from_array(arr.t().to_owned()).unwrap();
        assert_eq!(field.shape(), [2, 3]);
        assert_eq!(field.speed(0, 1), 3.0);
        assert_eq!(field.speed(1, 2), 6.0);
        assert_eq!(field.to_array(), arr.t());
    }

    #[test]
    fn velocity_rejects_empty() {
        assert!(matches!(
            VelocityField::new([0, 4], vec![]),
            Err(EikonalError::EmptyField)
        ));
        assert!(matches!(
            VelocityField::from_rows(vec![]),
            Err(EikonalError::EmptyField)
        ));
        assert!(matches!(
            VelocityField::from_rows(vec![vec![], vec![]]),
            Err(EikonalError::EmptyField)
        ));
    }

    #[test]
    fn velocity_rejects_ragged_rows() {
        let result = VelocityField::from_rows(vec![vec![1.0, 1.0], vec![1.0]]);
        assert!(matches!(
            result,
            Err(EikonalError::RaggedRows {
                row: 1,
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn velocity_rejects_negative_and_nan() {
        let result = VelocityField::new([2, 2], vec![1.0, 1.0, -0.1, 1.0]);
        assert!(matches!(
            result,
            Err(EikonalError::InvalidSpeed { x: 1, y: 0, .. })
        ));

        let result = VelocityField::new([1, 3], vec![1.0, f64::NAN, 1.0]);
        assert!(matches!(
            result,
            Err(EikonalError::InvalidSpeed { x: 0, y: 1, .. })
        ));

        let result = VelocityField::uniform([2, 2], f64::INFINITY);
        assert!(result.unwrap_err().is_invalid_input());
    }

    #[test]
    fn velocity_rejects_length_mismatch() {
        let result = VelocityField::new([3, 3], vec![1.0; 8]);
        assert!(matches!(result, Err(EikonalError::ShapeMismatch { .. })));
    }

    #[test]
    fn overflowing_shape_is_rejected() {
        let huge = [usize::MAX, 2];
        assert!(matches!(
            VelocityField::new(huge, vec![1.0]),
            Err(EikonalError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            VelocityField::uniform(huge, 1.0),
            Err(EikonalError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            ArrivalTimeField::new(huge, [0, 0]),
            Err(EikonalError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn arrival_times_reset_to_seed() {
        let mut times = ArrivalTimeField::new([2, 3], [1, 1]).unwrap();
        assert!(times.update(0, 0, 2.5));
        assert!(times.update(1, 1, -1.0));
        times.reset();
        assert_eq!(times, ArrivalTimeField::new([2, 3], [1, 1]).unwrap());
    }

    #[test]
    fn arrival_times_seeded_at_source() {
        let times = ArrivalTimeField::new([3, 4], [1, 2]).unwrap();
        for x in 0..3 {
            for y in 0..4 {
                if [x, y] == [1, 2] {
                    assert_eq!(times.get(x, y), 0.0);
                } else {
                    assert!(times.get(x, y).is_infinite());
                }
            }
        }
        assert_eq!(times.max_finite(), Some(0.0));
    }

    #[test]
    fn arrival_times_source_out_of_bounds() {
        let result = ArrivalTimeField::new([3, 3], [3, 0]);
        assert!(matches!(
            result,
            Err(EikonalError::SourceOutOfBounds {
                source: [3, 0],
                shape: [3, 3]
            })
        ));
        assert!(ArrivalTimeField::new([3, 3], [0, 3])
            .unwrap_err()
            .is_out_of_bounds());
    }

    #[test]
    fn update_only_decreases() {
        let mut times = ArrivalTimeField::new([2, 2], [0, 0]).unwrap();

        assert!(times.update(1, 1, 10.0));
        assert_eq!(times.get(1, 1), 10.0);

        assert!(times.update(1, 1, 5.0));
        assert_eq!(times.get(1, 1), 5.0);

        assert!(!times.update(1, 1, 7.0));
        assert!(!times.update(1, 1, 5.0));
        assert_eq!(times.get(1, 1), 5.0);
        assert!(times.is_reached(1, 1));
        assert!(!times.is_reached(0, 1));
    }

    #[test]
    fn grid_view_shape_check() {
        let velocity = VelocityField::uniform([2, 3], 1.0).unwrap();
        let times = ArrivalTimeField::new([3, 2], [0, 0]).unwrap();
        assert!(matches!(
            GridView::new(&velocity, &times),
            Err(EikonalError::ShapeMismatch { .. })
        ));

        let times = ArrivalTimeField::new([2, 3], [1, 2]).unwrap();
        let view = GridView::new(&velocity, &times).unwrap();
        assert_eq!(view.shape(), [2, 3]);
        assert_eq!(view.get_t([1, 2]), 0.0);
        assert_eq!(view.get_speed([0, 0]), 1.0);
    }
}
