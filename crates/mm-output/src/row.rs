//! Plain data row types written by output backends.

/// One completed trip.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrivalRow {
    pub traveler:        String,
    pub departure_secs:  f64,
    pub arrival_secs:    f64,
    /// Routed cost at assignment time; actual travel time may differ once
    /// congestion evolves mid-trip.
    pub planned_cost:    f64,
}

/// One vehicle state transition.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleEventRow {
    pub vehicle: u32,
    pub state:   String,
    pub at_secs: f64,
}

/// Aggregate statistics for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub tick:       u64,
    pub time_secs:  f64,
    pub departures: u64,
    pub arrivals:   u64,
    pub unservable: u64,
    pub en_route:   u64,
}
