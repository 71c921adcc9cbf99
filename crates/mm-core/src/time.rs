//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Tick` counter of fixed
//! duration `dt_secs`.  The mapping to clock seconds is held in `SimClock`:
//!
//!   time = start_secs + tick * dt_secs
//!
//! Using an integer tick as the canonical time unit means the step loop and
//! all flow-update scheduling arithmetic is exact (no floating-point drift);
//! seconds only appear at the edges (demand departure times, vehicle
//! kinematics within a tick).

use std::fmt;

use crate::error::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and simulation seconds.
///
/// `SimClock` is cheap to copy and intentionally holds no heap data.
#[derive(Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct SimClock {
    /// Simulation seconds at tick 0 (e.g. 07:00 = 25 200).
    pub start_secs: f64,
    /// How many seconds one tick represents.
    pub dt_secs: f64,
    /// The current tick — advanced by `SimClock::advance()` each step.
    pub current_tick: Tick,
}

impl SimClock {
    /// Create a clock starting at `start_secs` with the given resolution.
    pub fn new(start_secs: f64, dt_secs: f64) -> Self {
        Self {
            start_secs,
            dt_secs,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Simulation seconds at the start of `current_tick`.
    #[inline]
    pub fn now_secs(&self) -> f64 {
        self.start_secs + self.current_tick.0 as f64 * self.dt_secs
    }

    /// Half-open window `[start, end)` in seconds covered by `current_tick`.
    #[inline]
    pub fn tick_window(&self) -> (f64, f64) {
        let start = self.now_secs();
        (start, start + self.dt_secs)
    }

    /// How many whole ticks are needed to span `secs` seconds (rounds up so
    /// travelers never arrive before the correct tick).
    #[inline]
    pub fn ticks_for_secs(&self, secs: f64) -> u64 {
        (secs / self.dt_secs).ceil().max(0.0) as u64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.now_secs().max(0.0) as u64;
        let h = secs / 3_600;
        let m = (secs % 3_600) / 60;
        let s = secs % 60;
        write!(f, "{} ({:02}:{:02}:{:02})", self.current_tick, h, m, s)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a TOML/JSON file by the application crate and passed
/// to the supervisor builder.
#[derive(Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct SimConfig {
    /// Simulation seconds at tick 0.
    pub start_secs: f64,

    /// Simulation seconds at which the run terminates (exclusive).
    pub end_secs: f64,

    /// Seconds per tick.
    pub dt_secs: f64,

    /// Recompute reservoir speeds every N ticks.  1 = every tick.  Vehicle
    /// advance always uses the most recently computed speeds.
    pub flow_update_period: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Worker thread count for batch routing.  `None` uses all logical cores.
    pub workers: Option<usize>,
}

impl SimConfig {
    /// Checks the time parameters.  Called by run assembly before anything
    /// is built on top of them.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.dt_secs > 0.0) {
            return Err(CoreError::Config(format!(
                "dt must be positive, got {}",
                self.dt_secs
            )));
        }
        if self.end_secs <= self.start_secs {
            return Err(CoreError::Config(format!(
                "end ({}) must be after start ({})",
                self.end_secs, self.start_secs
            )));
        }
        Ok(())
    }

    /// Total number of whole ticks in the run.
    #[inline]
    pub fn total_ticks(&self) -> u64 {
        ((self.end_secs - self.start_secs) / self.dt_secs).ceil().max(0.0) as u64
    }

    /// The tick at which the run ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks())
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start_secs, self.dt_secs)
    }
}
