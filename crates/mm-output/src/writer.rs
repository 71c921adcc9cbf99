//! The `OutputWriter` trait implemented by all backend writers.

use crate::{ArrivalRow, OutputResult, TickSummaryRow, VehicleEventRow};

/// Trait implemented by the CSV and in-memory writers.
///
/// All methods are infallible from the observer's perspective — errors are
/// stored internally and retrieved with [`RecordingObserver::take_error`].
pub trait OutputWriter {
    fn write_arrival(&mut self, row: &ArrivalRow) -> OutputResult<()>;

    fn write_vehicle_event(&mut self, row: &VehicleEventRow) -> OutputResult<()>;

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
