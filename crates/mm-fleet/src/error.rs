use mm_core::VehicleIndex;
use thiserror::Error;

use crate::vehicle::VehicleState;

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("unknown vehicle: {0}")]
    VehicleNotFound(VehicleIndex),

    /// Depot queue is at capacity; the queue is left unchanged.
    #[error("depot {depot} is full (capacity {capacity})")]
    CapacityExceeded { depot: String, capacity: usize },

    #[error("vehicle {vehicle} is full (capacity {capacity})")]
    VehicleFull { vehicle: VehicleIndex, capacity: usize },

    #[error("vehicle {vehicle}: cannot {action} while {from:?}")]
    InvalidTransition { vehicle: VehicleIndex, from: VehicleState, action: &'static str },

    #[error("vehicle {0}: route must have at least one leg")]
    EmptyRoute(VehicleIndex),
}

pub type FleetResult<T> = Result<T, FleetError>;
