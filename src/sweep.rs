// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

//! Sweep-order generation.
//!
//! Sweep `n` visits every cell once, with the outer loop over `x` and the
//! inner loop over `y`, each axis either ascending or descending. The four
//! sign combinations repeat with period 4, so every corner of the grid acts
//! as the sweep origin once per cycle.

use std::iter::FusedIterator;
use std::ops::Range;

/// Traversal direction along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `0, 1, ..., len - 1`
    Ascending,
    /// `len - 1, ..., 1, 0`
    Descending,
}

impl Direction {
    /// +1 for ascending, -1 for descending.
    pub fn sign(self) -> i8 {
        match self {
            Direction::Ascending => 1,
            Direction::Descending => -1,
        }
    }
}

/// Assignment of the four diagonal directions to `n mod 4`.
///
/// Both tables enumerate every `(x, y)` sign combination once per period and
/// converge to the same field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepOrder {
    /// `(+,+), (+,-), (-,-), (-,+)`
    #[default]
    Original,
    /// `(-,-), (+,-), (-,+), (+,+)`, the ordering used by Zhao (2005).
    Paper,
}

impl SweepOrder {
    /// Directions `(x_dir, y_dir)` used for sweep index `n`.
    pub fn directions(self, n: usize) -> (Direction, Direction) {
        use Direction::{Ascending as A, Descending as D};
        let table = match self {
            SweepOrder::Original => [(A, A), (A, D), (D, D), (D, A)],
            SweepOrder::Paper => [(D, D), (A, D), (D, A), (A, A)],
        };
        table[n % 4]
    }
}

/// The index sequence for one axis of one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    len: usize,
    direction: Direction,
}

impl AxisRange {
    /// Range over `0..len` in the given direction.
    pub fn new(len: usize, direction: Direction) -> Self {
        AxisRange { len, direction }
    }

    /// Direction of travel.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of indices produced.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True for a zero-length axis.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl IntoIterator for AxisRange {
    type Item = usize;
    type IntoIter = AxisIter;

    fn into_iter(self) -> AxisIter {
        AxisIter {
            positions: 0..self.len,
            len: self.len,
            direction: self.direction,
        }
    }
}

/// Iterator over an [`AxisRange`].
#[derive(Debug, Clone)]
pub struct AxisIter {
    positions: Range<usize>,
    len: usize,
    direction: Direction,
}

impl AxisIter {
    #[inline]
    fn index(&self, pos: usize) -> usize {
        match self.direction {
            Direction::Ascending => pos,
            Direction::Descending => self.len - 1 - pos,
        }
    }
}

impl Iterator for AxisIter {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        let pos = self.positions.next()?;
        Some(self.index(pos))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl DoubleEndedIterator for AxisIter {
    fn next_back(&mut self) -> Option<usize> {
        let pos = self.positions.next_back()?;
        Some(self.index(pos))
    }
}

impl ExactSizeIterator for AxisIter {}

impl FusedIterator for AxisIter {}

/// Maps sweep indices to traversal orders over a fixed grid shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepOrderGenerator {
    shape: [usize; 2],
    order: SweepOrder,
}

impl SweepOrderGenerator {
    /// Generator for a grid of shape `[H, W]` using the given direction table.
    pub fn new(shape: [usize; 2], order: SweepOrder) -> Self {
        SweepOrderGenerator { shape, order }
    }

    /// The direction table in use.
    pub fn order(&self) -> SweepOrder {
        self.order
    }

    /// Axis ranges `(x_sequence, y_sequence)` for sweep `n`.
    pub fn ranges_for(&self, n: usize) -> (AxisRange, AxisRange) {
        let (x_dir, y_dir) = self.order.directions(n);
        (
            AxisRange::new(self.shape[0], x_dir),
            AxisRange::new(self.shape[1], y_dir),
        )
    }

    /// Every cell of sweep `n` in visiting order (outer `x`, inner `y`).
    pub fn cells(&self, n: usize) -> impl Iterator<Item = [usize; 2]> {
        let (xs, ys) = self.ranges_for(n);
        xs.into_iter()
            .flat_map(move |x| ys.into_iter().map(move |y| [x, y]))
    }
}
