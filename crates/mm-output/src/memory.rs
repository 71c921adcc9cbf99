//! In-memory output backend for tests and programmatic inspection.

use crate::writer::OutputWriter;
use crate::{ArrivalRow, OutputResult, TickSummaryRow, VehicleEventRow};

/// Keeps every row in `Vec`s instead of writing files.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    pub arrivals:    Vec<ArrivalRow>,
    pub vehicles:    Vec<VehicleEventRow>,
    pub summaries:   Vec<TickSummaryRow>,
    pub finished:    bool,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutputWriter for MemoryWriter {
    fn write_arrival(&mut self, row: &ArrivalRow) -> OutputResult<()> {
        self.arrivals.push(row.clone());
        Ok(())
    }

    fn write_vehicle_event(&mut self, row: &VehicleEventRow) -> OutputResult<()> {
        self.vehicles.push(row.clone());
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.push(*row);
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.finished = true;
        Ok(())
    }
}
