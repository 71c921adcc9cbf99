//! `RecordingObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use mm_core::Tick;
use mm_fleet::VehicleState;
use mm_sim::{SimObserver, TickSummary, Traveler, VehicleTransition};

use crate::row::{ArrivalRow, TickSummaryRow, VehicleEventRow};
use crate::writer::OutputWriter;
use crate::OutputError;

/// A [`SimObserver`] that forwards arrivals, vehicle transitions and tick
/// summaries to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver`
/// methods have no return value.  After `sim.run()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct RecordingObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> RecordingObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect buffered rows after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

fn state_name(state: VehicleState) -> &'static str {
    match state {
        VehicleState::Created => "created",
        VehicleState::EnRoute => "en_route",
        VehicleState::Parked => "parked",
        VehicleState::Completed => "completed",
    }
}

impl<W: OutputWriter> SimObserver for RecordingObserver<W> {
    fn on_arrival(&mut self, traveler: &Traveler, at_secs: f64) {
        let row = ArrivalRow {
            traveler:       traveler.name().to_owned(),
            departure_secs: traveler.departure_secs(),
            arrival_secs:   at_secs,
            planned_cost:   traveler.path().map_or(0.0, |p| p.cost),
        };
        let result = self.writer.write_arrival(&row);
        self.store_err(result);
    }

    fn on_vehicle_event(&mut self, event: &VehicleTransition) {
        let row = VehicleEventRow {
            vehicle: event.vehicle.0,
            state:   state_name(event.state).to_owned(),
            at_secs: event.at_secs,
        };
        let result = self.writer.write_vehicle_event(&row);
        self.store_err(result);
    }

    fn on_tick_end(&mut self, summary: &TickSummary) {
        let row = TickSummaryRow {
            tick:       summary.tick.0,
            time_secs:  summary.now_secs,
            departures: summary.departures as u64,
            arrivals:   summary.arrivals as u64,
            unservable: summary.unservable as u64,
            en_route:   summary.en_route as u64,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_run_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
