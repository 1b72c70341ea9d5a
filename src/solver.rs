// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::time::{Duration, Instant};

use crate::error::{EikonalError, Result};
use crate::field::{ArrivalTimeField, GridView, VelocityField};
use crate::sweep::{Direction, SweepOrder, SweepOrderGenerator};
use crate::update_kernels::update_node;

/// Progress information passed to the optional callback after every sweep.
#[derive(Debug, Clone, Copy)]
pub struct ProgressInfo {
    /// 1-indexed number of sweeps executed so far.
    pub sweep: usize,
    /// Directions `(x, y)` of the sweep that just finished.
    pub direction: (Direction, Direction),
    /// Number of cells whose arrival time decreased during that sweep.
    pub cells_updated: usize,
    /// Elapsed time since the solve started.
    pub elapsed: Duration,
}

/// How updated values become visible to later cells of the same sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Relaxation {
    /// Writes are visible immediately (in-place). Converges in a handful of
    /// sweeps.
    #[default]
    GaussSeidel,
    /// Every cell of a sweep reads the field as it was before the sweep.
    /// Converges to the same field, but needs on the order of the grid
    /// diameter in sweeps.
    Jacobi,
}

/// Lifecycle of a solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverState {
    /// Sweeps are still changing the field (or none have run yet).
    Sweeping,
    /// A full sweep changed no cell.
    Converged,
    /// The configured sweep limit was hit before convergence.
    SweepLimitReached,
    /// The goal cell has a finite time that the last sweep did not improve.
    GoalReached,
}

impl SolverState {
    /// True for every state except [`SolverState::Sweeping`].
    pub fn is_terminal(self) -> bool {
        self != SolverState::Sweeping
    }
}

/// Summary of the work done by a solver.
#[derive(Debug, Clone, Copy)]
pub struct RunInfo {
    /// Total sweeps performed.
    pub sweeps: usize,
    /// Configured sweep limit, if any.
    pub max_sweeps: Option<usize>,
    /// Time spent inside sweeps.
    pub elapsed: Duration,
    /// State after the last sweep.
    pub state: SolverState,
}

impl fmt::Display for RunInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Fast Sweeping Method")?;
        match self.max_sweeps {
            Some(limit) => writeln!(f, "\tMaximum sweeps: {}", limit)?,
            None => writeln!(f, "\tMaximum sweeps: unlimited")?,
        }
        writeln!(f, "\tSweeps performed: {}", self.sweeps)?;
        writeln!(f, "\tFinal state: {:?}", self.state)?;
        write!(f, "\tElapsed time: {} ms", self.elapsed.as_millis())
    }
}

/// A Fast Sweeping Method solver for the 2D eikonal equation.
///
/// Owns the velocity field and the arrival-time field for the duration of a
/// solve. Each sweep visits every cell in one of four diagonal orders and
/// lowers its arrival time to the upwind candidate whenever that is strictly
/// smaller. Solving stops after the first sweep that changes nothing.
///
/// Zero-speed cells and regions cut off by them keep an infinite arrival time;
/// they never block convergence.
pub struct FastSweepingSolver {
    velocity: VelocityField,
    times: ArrivalTimeField,
    order: SweepOrder,
    relaxation: Relaxation,
    tolerance: f64,
    max_sweeps: Option<usize>,
    goal: Option<[usize; 2]>,
    progress_callback: Option<Box<dyn Fn(ProgressInfo)>>,
    sweeps: usize,
    elapsed: Duration,
    state: SolverState,
}

impl FastSweepingSolver {
    /// Create a solver for `velocity` with the wavefront starting at `source = [x, y]`.
    ///
    /// # Errors
    /// Returns [`EikonalError::SourceOutOfBounds`] if the source lies outside
    /// the velocity field.
    pub fn new(velocity: VelocityField, source: [usize; 2]) -> Result<Self> {
        let times = ArrivalTimeField::new(velocity.shape(), source)?;
        Ok(FastSweepingSolver {
            velocity,
            times,
            order: SweepOrder::default(),
            relaxation: Relaxation::default(),
            tolerance: 0.0,
            max_sweeps: None,
            goal: None,
            progress_callback: None,
            sweeps: 0,
            elapsed: Duration::ZERO,
            state: SolverState::Sweeping,
        })
    }

    /// Choose the direction table (builder method). Default is [`SweepOrder::Original`].
    pub fn with_sweep_order(mut self, order: SweepOrder) -> Self {
        self.order = order;
        self
    }

    /// Choose in-place or double-buffered updates (builder method).
    /// Default is [`Relaxation::GaussSeidel`].
    pub fn with_relaxation(mut self, relaxation: Relaxation) -> Self {
        self.relaxation = relaxation;
        self
    }

    /// Require candidates to improve on the current value by more than
    /// `tolerance` before they are written (builder method). Default is 0,
    /// i.e. any strict decrease is accepted.
    ///
    /// # Errors
    /// Returns an error if the tolerance is negative or not finite.
    pub fn with_tolerance(mut self, tolerance: f64) -> Result<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(EikonalError::InvalidTolerance(tolerance));
        }
        self.tolerance = tolerance;
        Ok(self)
    }

    /// Stop once `max_sweeps` sweeps have run in total (builder method).
    /// Sweeps already performed count towards the limit. Unlimited by default.
    ///
    /// # Errors
    /// Returns an error if `max_sweeps` is zero.
    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Result<Self> {
        if max_sweeps == 0 {
            return Err(EikonalError::InvalidMaxSweeps);
        }
        self.max_sweeps = Some(max_sweeps);
        Ok(self)
    }

    /// Stop as soon as `goal` holds a finite time that a full sweep did not
    /// improve (builder method).
    ///
    /// # Errors
    /// Returns an error if the goal is outside the grid.
    pub fn with_goal(mut self, goal: [usize; 2]) -> Result<Self> {
        if !self.velocity.contains(goal[0], goal[1]) {
            return Err(EikonalError::GoalOutOfBounds {
                goal,
                shape: self.velocity.shape(),
            });
        }
        self.goal = Some(goal);
        Ok(self)
    }

    /// Set a callback invoked after every sweep (builder method).
    pub fn with_progress(mut self, callback: Box<dyn Fn(ProgressInfo)>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// The velocity field.
    pub fn velocity(&self) -> &VelocityField {
        &self.velocity
    }

    /// The current arrival-time field.
    pub fn arrival_times(&self) -> &ArrivalTimeField {
        &self.times
    }

    /// Consume the solver and return the arrival-time field.
    pub fn into_arrival_times(self) -> ArrivalTimeField {
        self.times
    }

    /// Current state.
    pub fn state(&self) -> SolverState {
        self.state
    }

    /// Total sweeps performed across all calls.
    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    /// Summary of the sweeps performed so far.
    pub fn run_info(&self) -> RunInfo {
        RunInfo {
            sweeps: self.sweeps,
            max_sweeps: self.max_sweeps,
            elapsed: self.elapsed,
            state: self.state,
        }
    }

    /// Save the arrival-time field to a file. Format is inferred from the extension.
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        crate::io::save_arrival_times(&self.times, path.as_ref())
    }

    /// Discard all computed times and start over from the seeded source.
    ///
    /// Sweep count, elapsed time and state are cleared as well. The
    /// configuration (order, relaxation, tolerance, limit, goal, callback)
    /// is kept.
    pub fn reset(&mut self) {
        self.times.reset();
        self.sweeps = 0;
        self.elapsed = Duration::ZERO;
        self.state = SolverState::Sweeping;
    }

    /// Sweep until a full pass changes no cell, or until a configured limit or
    /// goal stops the solve early.
    ///
    /// Returns the number of sweeps executed by this call, counting the final
    /// sweep that detected convergence. The sweep limit caps the total over
    /// the solver's lifetime, so once it is reached further calls return 0
    /// without touching the field. Never fails: unreachable cells simply keep
    /// an infinite arrival time.
    pub fn solve(&mut self) -> usize {
        let start_time = Instant::now();
        let mut executed = 0;

        loop {
            if self.max_sweeps.is_some_and(|limit| self.sweeps >= limit) {
                self.state = SolverState::SweepLimitReached;
                return executed;
            }

            let outcome = self.run_sweep(start_time);
            executed += 1;

            self.state = if outcome.changed == 0 {
                SolverState::Converged
            } else if outcome.goal_settled {
                SolverState::GoalReached
            } else {
                SolverState::Sweeping
            };

            if self.state.is_terminal() {
                return executed;
            }
        }
    }

    /// Run exactly one sweep and return the number of cells it updated.
    ///
    /// Leaves the state at [`SolverState::Converged`] when nothing changed and
    /// [`SolverState::Sweeping`] otherwise. Goal and sweep limit only apply
    /// to [`solve`](Self::solve), but sweeps run here count towards the limit.
    pub fn sweep(&mut self) -> usize {
        let outcome = self.run_sweep(Instant::now());
        self.state = if outcome.changed == 0 {
            SolverState::Converged
        } else {
            SolverState::Sweeping
        };
        outcome.changed
    }

    fn run_sweep(&mut self, start_time: Instant) -> SweepOutcome {
        let sweep_start = Instant::now();
        let generator = SweepOrderGenerator::new(self.velocity.shape(), self.order);
        let (xs, ys) = generator.ranges_for(self.sweeps);
        let goal_before = self.goal.map(|[x, y]| self.times.get(x, y));

        let mut changed = 0;
        match self.relaxation {
            Relaxation::GaussSeidel => {
                for x in xs {
                    for y in ys {
                        let candidate = update_node(
                            &GridView {
                                velocity: &self.velocity,
                                times: &self.times,
                            },
                            [x, y],
                        );
                        if accept(&mut self.times, self.tolerance, x, y, candidate) {
                            changed += 1;
                        }
                    }
                }
            }
            Relaxation::Jacobi => {
                let previous = self.times.clone();
                let view = GridView {
                    velocity: &self.velocity,
                    times: &previous,
                };
                for x in xs {
                    for y in ys {
                        let candidate = update_node(&view, [x, y]);
                        if accept(&mut self.times, self.tolerance, x, y, candidate) {
                            changed += 1;
                        }
                    }
                }
            }
        }

        self.sweeps += 1;
        self.elapsed += sweep_start.elapsed();

        let goal_settled = match (self.goal, goal_before) {
            (Some([x, y]), Some(before)) => {
                let after = self.times.get(x, y);
                after.is_finite() && after == before
            }
            _ => false,
        };

        if let Some(cb) = &self.progress_callback {
            cb(ProgressInfo {
                sweep: self.sweeps,
                direction: (xs.direction(), ys.direction()),
                cells_updated: changed,
                elapsed: start_time.elapsed(),
            });
        }

        SweepOutcome {
            changed,
            goal_settled,
        }
    }
}

struct SweepOutcome {
    changed: usize,
    goal_settled: bool,
}

/// Write `candidate` if it is finite and beats the current value by more than
/// `tolerance`.
#[inline]
fn accept(
    times: &mut ArrivalTimeField,
    tolerance: f64,
    x: usize,
    y: usize,
    candidate: f64,
) -> bool {
    candidate.is_finite() && candidate + tolerance < times.get(x, y) && times.update(x, y, candidate)
}
