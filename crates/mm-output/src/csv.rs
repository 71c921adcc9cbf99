//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `arrivals.csv`
//! - `vehicle_events.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{ArrivalRow, OutputResult, TickSummaryRow, VehicleEventRow};

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    arrivals:  Writer<File>,
    vehicles:  Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the three CSV files in `dir` and write header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut arrivals = Writer::from_path(dir.join("arrivals.csv"))?;
        arrivals.write_record(["traveler", "departure_secs", "arrival_secs", "planned_cost"])?;

        let mut vehicles = Writer::from_path(dir.join("vehicle_events.csv"))?;
        vehicles.write_record(["vehicle", "state", "at_secs"])?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record([
            "tick",
            "time_secs",
            "departures",
            "arrivals",
            "unservable",
            "en_route",
        ])?;

        Ok(Self { arrivals, vehicles, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_arrival(&mut self, row: &ArrivalRow) -> OutputResult<()> {
        self.arrivals.write_record(&[
            row.traveler.clone(),
            row.departure_secs.to_string(),
            row.arrival_secs.to_string(),
            row.planned_cost.to_string(),
        ])?;
        Ok(())
    }

    fn write_vehicle_event(&mut self, row: &VehicleEventRow) -> OutputResult<()> {
        self.vehicles.write_record(&[
            row.vehicle.to_string(),
            row.state.clone(),
            row.at_secs.to_string(),
        ])?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.time_secs.to_string(),
            row.departures.to_string(),
            row.arrivals.to_string(),
            row.unservable.to_string(),
            row.en_route.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.arrivals.flush()?;
        self.vehicles.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
