//! `mm-core` — foundational types for the `mm` multimodal mobility simulator.
//!
//! This crate is a dependency of every other `mm-*` crate.  It intentionally
//! has no `mm-*` dependencies and minimal external ones (`rand`, `thiserror`,
//! `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                                  |
//! |-----------|-----------------------------------------------------------|
//! | [`ids`]   | `NodeIndex`, `LinkIndex`, `SectionIndex`, `LayerIndex`, … |
//! | [`point`] | `Point` — planar metric coordinates                       |
//! | [`time`]  | `Tick`, `SimClock`, `SimConfig`                           |
//! | [`mode`]  | `Mode` enum and per-mode array sizing                     |
//! | [`rng`]   | `SimRng` — deterministic run-level RNG                    |
//! | [`error`] | `CoreError`, `CoreResult`                                 |

pub mod error;
pub mod ids;
pub mod mode;
pub mod point;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{
    LayerIndex, LinkIndex, NodeIndex, ReservoirIndex, SectionIndex, TravelerIndex, VehicleIndex,
};
pub use mode::{Mode, MODE_COUNT};
pub use point::Point;
pub use rng::SimRng;
pub use time::{SimClock, SimConfig, Tick};
