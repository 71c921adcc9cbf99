//! The simulation supervisor: a fixed-Δt tick loop that injects demand,
//! routes travelers, advances vehicles, updates congestion and notifies
//! observers, all inside one self-contained context object.
//!
//! | Module       | Contents                                         |
//! |--------------|--------------------------------------------------|
//! | `supervisor` | `Supervisor`, `RunState`, the five-phase `step`  |
//! | `builder`    | `SupervisorBuilder`                              |
//! | `decision`   | `DecisionModel`, shortest-path + logit models    |
//! | `traveler`   | runtime `Traveler` registry and lifecycle        |
//! | `observer`   | `SimObserver` hooks, `TickSummary`               |
//! | `error`      | `SimError` / `SimResult`                         |

mod builder;
mod decision;
mod error;
mod observer;
mod supervisor;
mod traveler;

pub use builder::SupervisorBuilder;
pub use decision::{DecisionModel, LogitDecision, ShortestPathDecision};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, TickSummary, VehicleTransition};
pub use supervisor::{RunState, Supervisor};
pub use traveler::{Traveler, TravelerRegistry, TravelerState};

#[cfg(test)]
mod tests;
