//! Speed–accumulation relations.

use mm_core::{Mode, MODE_COUNT};
use serde::{Deserialize, Serialize};

use crate::error::{FlowError, FlowResult};

// ── Per-mode state vectors ────────────────────────────────────────────────────

/// Vehicle counts per mode inside one reservoir.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModeAccumulation([f64; MODE_COUNT]);

impl ModeAccumulation {
    pub const ZERO: Self = Self([0.0; MODE_COUNT]);

    #[inline]
    pub fn get(&self, mode: Mode) -> f64 {
        self.0[mode.index()]
    }

    #[inline]
    pub fn add(&mut self, mode: Mode, count: f64) {
        self.0[mode.index()] += count;
    }

    #[inline]
    pub fn sub(&mut self, mode: Mode, count: f64) {
        self.0[mode.index()] -= count;
    }

    /// Total accumulation over the vehicular modes (walking does not
    /// contribute to congestion).
    pub fn total_vehicular(&self) -> f64 {
        Mode::ALL
            .iter()
            .filter(|m| m.is_vehicular())
            .map(|m| self.0[m.index()])
            .sum()
    }
}

/// Mean speed per mode, the output of an MFD evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeSpeeds([f64; MODE_COUNT]);

impl ModeSpeeds {
    pub fn uniform(speed: f64) -> Self {
        Self([speed; MODE_COUNT])
    }

    #[inline]
    pub fn get(&self, mode: Mode) -> f64 {
        self.0[mode.index()]
    }

    #[inline]
    pub fn set(&mut self, mode: Mode, speed: f64) {
        self.0[mode.index()] = speed;
    }
}

// ── MFD trait ─────────────────────────────────────────────────────────────────

/// A zone-level relation mapping per-mode accumulation to per-mode mean
/// speed.  Implementations must return strictly positive speeds.
pub trait MfdFunction: Send + Sync {
    fn speeds(&self, accumulation: &ModeAccumulation) -> ModeSpeeds;
}

// ── Three-parameter MFD ───────────────────────────────────────────────────────

/// Piecewise production MFD with critical accumulation `nc`, jam
/// accumulation `njam` and critical production `Pc`:
///
/// - `n < nc`:          `P(n) = Pc * (2*nc - n) / nc²  * n`
/// - `nc ≤ n < njam`:   `P(n) = Pc * (njam - n) * (njam + n - 2*nc) / (njam - nc)²`
/// - `n ≥ njam`:        `P(n) = 0`
///
/// Mean speed is `P(n)/n`, continuous at `nc` and equal to `2*Pc/nc` at
/// `n = 0`.  The result is clamped to `speed_floor` so a jammed reservoir
/// yields finite (if enormous) travel times instead of division by zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThreeParamMfd {
    pub critical_acc:  f64,
    pub jam_acc:       f64,
    pub critical_prod: f64,
    pub speed_floor:   f64,
}

impl ThreeParamMfd {
    pub const DEFAULT_SPEED_FLOOR: f64 = 0.001;

    pub fn new(critical_acc: f64, jam_acc: f64, critical_prod: f64) -> FlowResult<Self> {
        Self::with_floor(critical_acc, jam_acc, critical_prod, Self::DEFAULT_SPEED_FLOOR)
    }

    pub fn with_floor(
        critical_acc: f64,
        jam_acc: f64,
        critical_prod: f64,
        speed_floor: f64,
    ) -> FlowResult<Self> {
        if !(critical_acc > 0.0 && jam_acc > critical_acc) {
            return Err(FlowError::InvalidMfd(format!(
                "require 0 < critical ({critical_acc}) < jam ({jam_acc})"
            )));
        }
        if !(critical_prod > 0.0) {
            return Err(FlowError::InvalidMfd(format!(
                "critical production must be positive, got {critical_prod}"
            )));
        }
        if !(speed_floor > 0.0) {
            return Err(FlowError::InvalidMfd(format!(
                "speed floor must be positive, got {speed_floor}"
            )));
        }
        Ok(Self { critical_acc, jam_acc, critical_prod, speed_floor })
    }

    /// Mean speed at total accumulation `n`, before the per-mode fan-out.
    pub fn speed_at(&self, n: f64) -> f64 {
        let nc = self.critical_acc;
        let njam = self.jam_acc;
        let pc = self.critical_prod;
        let v = if n <= 0.0 {
            2.0 * pc / nc
        } else if n < nc {
            pc * (2.0 * nc - n) / (nc * nc)
        } else if n < njam {
            pc * (njam - n) * (njam + n - 2.0 * nc) / ((njam - nc) * (njam - nc) * n)
        } else {
            0.0
        };
        v.max(self.speed_floor)
    }
}

impl MfdFunction for ThreeParamMfd {
    fn speeds(&self, accumulation: &ModeAccumulation) -> ModeSpeeds {
        ModeSpeeds::uniform(self.speed_at(accumulation.total_vehicular()))
    }
}
