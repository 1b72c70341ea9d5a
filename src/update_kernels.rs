// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use crate::field::GridData;

/// Solve the first-order upwind eikonal update for a single cell.
///
/// `tx` and `ty` are the smallest known neighbor times along each axis and
/// `h = 1 / speed` is the local travel time across one cell. When the two
/// neighbors differ by more than `h` the 2D solution would not be causal, so
/// the 1D update `min(tx, ty) + h` is used instead. Otherwise the larger root
/// of `(u - tx)^2 + (u - ty)^2 = h^2` is returned.
///
/// Returns infinity if both neighbors are infinite, if `h` is infinite
/// (a speed so small that `1 / speed` overflows) or if the discriminant is
/// negative. Never returns NaN.
pub fn solve_2d(tx: f64, ty: f64, h: f64) -> f64 {
    if !h.is_finite() || (tx.is_infinite() && ty.is_infinite()) {
        return f64::INFINITY;
    }

    // Also covers a single infinite neighbor: |inf - t| > h.
    if (tx - ty).abs() > h {
        return tx.min(ty) + h;
    }

    let diff = tx - ty;
    let disc = 2.0 * h * h - diff * diff;
    if disc < 0.0 {
        // Guard only: the causality check keeps disc >= h^2.
        return f64::INFINITY;
    }

    (tx + ty + disc.sqrt()) / 2.0
}

/// Minimum arrival time among the in-bounds neighbors of `idx` along `axis`.
#[inline]
fn axis_min<G: GridData>(grid: &G, idx: [usize; 2], axis: usize) -> f64 {
    let len = grid.shape()[axis];
    let i = idx[axis];

    let lo = if i > 0 {
        let mut n = idx;
        n[axis] = i - 1;
        grid.get_t(n)
    } else {
        f64::INFINITY
    };
    let hi = if i + 1 < len {
        let mut n = idx;
        n[axis] = i + 1;
        grid.get_t(n)
    } else {
        f64::INFINITY
    };

    lo.min(hi)
}

/// Compute the candidate arrival time for cell `idx = [x, y]`.
///
/// Reads the up-to-four axis neighbors, keeps the smaller value per axis and
/// calls [`solve_2d`] with `h = 1 / speed`. Impassable cells (speed 0) always
/// yield infinity. The result is never below the smaller axis minimum.
pub fn update_node<G: GridData>(grid: &G, idx: [usize; 2]) -> f64 {
    let speed = grid.get_speed(idx);
    if speed == 0.0 {
        return f64::INFINITY;
    }

    let tx = axis_min(grid, idx, 0);
    let ty = axis_min(grid, idx, 1);

    solve_2d(tx, ty, 1.0 / speed)
}
