use mm_core::{Tick, VehicleIndex};
use mm_fleet::VehicleState;

use crate::traveler::Traveler;

/// A vehicle state transition worth reporting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VehicleTransition {
    pub vehicle: VehicleIndex,
    pub state:   VehicleState,
    pub at_secs: f64,
}

/// Aggregate counters published at the end of every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickSummary {
    pub tick:       Tick,
    pub now_secs:   f64,
    pub departures: usize,
    pub arrivals:   usize,
    pub unservable: usize,
    pub en_route:   usize,
}

/// Hook points the supervisor fires during a run.  All methods default to
/// no-ops so observers implement only what they record.
pub trait SimObserver {
    fn on_tick_start(&mut self, _tick: Tick, _now_secs: f64) {}

    /// A traveler was assigned a path and departed.
    fn on_departure(&mut self, _traveler: &Traveler) {}

    /// A traveler reached their destination.
    fn on_arrival(&mut self, _traveler: &Traveler, _at_secs: f64) {}

    fn on_vehicle_event(&mut self, _event: &VehicleTransition) {}

    fn on_tick_end(&mut self, _summary: &TickSummary) {}

    fn on_run_end(&mut self, _final_tick: Tick) {}
}

/// Observer that records nothing.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
