// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

//! An eikonal equation solver using the Fast Sweeping Method (FSM).
//!
//! This library computes first-arrival times on 2D regular grids with unit
//! cell spacing by solving |∇T|·W = 1, where T is the arrival time and W the
//! local propagation speed, with T = 0 at a single source cell. Gauss-Seidel
//! sweeps alternate between the four diagonal directions until a full sweep
//! leaves every cell unchanged.
//!
//! ```
//! use eikonal_fsm::{FastSweepingSolver, VelocityField};
//!
//! let velocity = VelocityField::uniform([3, 3], 1.0).unwrap();
//! let mut solver = FastSweepingSolver::new(velocity, [1, 1]).unwrap();
//! let sweeps = solver.solve();
//! assert_eq!(sweeps, 3);
//! assert_eq!(solver.arrival_times().get(0, 1), 1.0);
//! ```

#![warn(missing_docs)]

/// Error types for the library.
pub mod error;
/// Velocity and arrival-time fields.
pub mod field;
/// File I/O for loading velocity fields and saving arrival times.
pub mod io;
/// Fast sweeping solver.
pub mod solver;
/// Sweep direction tables and cell orderings.
pub mod sweep;
/// Upwind eikonal update kernels.
pub mod update_kernels;

pub use crate::error::{EikonalError, Result};
pub use crate::field::{ArrivalTimeField, GridData, VelocityField};
pub use crate::solver::{FastSweepingSolver, ProgressInfo, Relaxation, RunInfo, SolverState};
pub use crate::sweep::{Direction, SweepOrder, SweepOrderGenerator};
