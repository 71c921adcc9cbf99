//! CSV demand loader.
//!
//! Expected header: `name,origin,destination,departure,labels`.  Origins and
//! destinations are either node names or `x;y` coordinates; `labels` is a
//! `|`-separated list and may be empty.  Malformed rows — bad fields and
//! bad field counts alike — are logged and skipped; only I/O failures abort
//! the load.

use std::io::Read;
use std::path::Path;

use log::{info, warn};

use crate::error::{DemandError, DemandResult};
use crate::source::{DemandSource, VecDemand};
use crate::traveler::{EndpointRef, TravelerRecord};

pub struct CsvDemand {
    inner: VecDemand,
}

impl CsvDemand {
    pub fn from_path<P: AsRef<Path>>(path: P) -> DemandResult<Self> {
        let reader = csv::Reader::from_path(path.as_ref())?;
        Self::load(reader)
    }

    pub fn from_reader<R: Read>(reader: R) -> DemandResult<Self> {
        Self::load(csv::Reader::from_reader(reader))
    }

    fn load<R: Read>(mut reader: csv::Reader<R>) -> DemandResult<Self> {
        let mut records = Vec::new();
        let mut skipped = 0usize;
        for (i, row) in reader.records().enumerate() {
            let line = i as u64 + 2; // 1-based, after the header
            let row = match row {
                Ok(row) => row,
                Err(err) if err.is_io_error() => return Err(err.into()),
                // Framing errors (e.g. a wrong field count) spoil one row,
                // not the whole load.
                Err(err) => {
                    warn!("skipping demand row {line}: {err}");
                    skipped += 1;
                    continue;
                }
            };
            match parse_record(&row, line) {
                Ok(record) => records.push(record),
                Err(err) => {
                    warn!("skipping demand row: {err}");
                    skipped += 1;
                }
            }
        }
        info!("loaded {} travelers ({} rows skipped)", records.len(), skipped);
        Ok(Self { inner: VecDemand::new(records) })
    }
}

impl DemandSource for CsvDemand {
    fn next_departures(&mut self, from_secs: f64, to_secs: f64) -> Vec<TravelerRecord> {
        self.inner.next_departures(from_secs, to_secs)
    }

    fn len_hint(&self) -> Option<usize> {
        self.inner.len_hint()
    }
}

fn parse_record(row: &csv::StringRecord, line: u64) -> DemandResult<TravelerRecord> {
    let field = |i: usize, what: &str| {
        row.get(i).ok_or_else(|| DemandError::Parse {
            line,
            reason: format!("missing {what} column"),
        })
    };

    let name = field(0, "name")?;
    if name.is_empty() {
        return Err(DemandError::Parse { line, reason: "empty name".to_owned() });
    }
    let origin = EndpointRef::parse(field(1, "origin")?)
        .map_err(|reason| DemandError::Parse { line, reason })?;
    let destination = EndpointRef::parse(field(2, "destination")?)
        .map_err(|reason| DemandError::Parse { line, reason })?;
    let departure = field(3, "departure")?;
    let departure_secs: f64 = departure.trim().parse().map_err(|_| DemandError::Parse {
        line,
        reason: format!("bad departure time: {departure:?}"),
    })?;
    if !departure_secs.is_finite() || departure_secs < 0.0 {
        return Err(DemandError::Parse {
            line,
            reason: format!("departure time out of range: {departure_secs}"),
        });
    }

    let labels = match row.get(4) {
        Some("") | None => Vec::new(),
        Some(raw) => raw.split('|').map(|s| s.trim().to_owned()).collect(),
    };

    Ok(TravelerRecord {
        name: name.to_owned(),
        origin,
        destination,
        departure_secs,
        labels,
    })
}
