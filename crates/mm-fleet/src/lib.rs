//! Vehicle management: the fleet registry that moves vehicles along their
//! routes tick by tick (feeding reservoir entries/exits to the flow motor),
//! and fixed-capacity depots for parked vehicles.
//!
//! | Module    | Contents                                        |
//! |-----------|-------------------------------------------------|
//! | `vehicle` | `Vehicle`, `VehicleState`, `RouteLeg`           |
//! | `fleet`   | `VehicleFleet`: spawn, assign, advance, park    |
//! | `depot`   | `Depot`: FIFO queue with capacity + membership  |
//! | `error`   | `FleetError` / `FleetResult`                    |

mod depot;
mod error;
mod fleet;
mod vehicle;

pub use depot::Depot;
pub use error::{FleetError, FleetResult};
pub use fleet::VehicleFleet;
pub use vehicle::{RouteLeg, Vehicle, VehicleState};

#[cfg(test)]
mod tests;
