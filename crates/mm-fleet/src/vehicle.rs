use mm_core::{LinkIndex, Mode, ReservoirIndex, TravelerIndex, VehicleIndex};
use serde::{Deserialize, Serialize};

/// Lifecycle: `Created → EnRoute → (Parked | Completed)`, with `EnRoute`
/// self-transitions every tick while the vehicle moves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleState {
    Created,
    EnRoute,
    Parked,
    Completed,
}

/// One link of an assigned route, with its length and owning reservoir
/// resolved once at assignment time.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub link:      LinkIndex,
    pub length:    f64,
    pub reservoir: Option<ReservoirIndex>,
}

/// A vehicle and its route progress.  Mutated only through `VehicleFleet`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vehicle {
    pub(crate) id:         VehicleIndex,
    pub(crate) mode:       Mode,
    pub(crate) state:      VehicleState,
    pub(crate) route:      Vec<RouteLeg>,
    pub(crate) leg:        usize,
    pub(crate) leg_pos:    f64,
    pub(crate) capacity:   usize,
    pub(crate) passengers: Vec<TravelerIndex>,
}

impl Vehicle {
    pub(crate) fn new(id: VehicleIndex, mode: Mode, capacity: usize) -> Self {
        Self {
            id,
            mode,
            state: VehicleState::Created,
            route: Vec::new(),
            leg: 0,
            leg_pos: 0.0,
            capacity,
            passengers: Vec::new(),
        }
    }

    pub fn id(&self) -> VehicleIndex {
        self.id
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> VehicleState {
        self.state
    }

    pub fn route(&self) -> &[RouteLeg] {
        &self.route
    }

    /// The leg currently being traversed, or `None` when not en route.
    pub fn current_leg(&self) -> Option<&RouteLeg> {
        if self.state == VehicleState::EnRoute { self.route.get(self.leg) } else { None }
    }

    /// Distance already covered on the current leg, in metres.
    pub fn leg_position(&self) -> f64 {
        self.leg_pos
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn passengers(&self) -> &[TravelerIndex] {
        &self.passengers
    }

    pub fn occupancy(&self) -> usize {
        self.passengers.len()
    }
}
