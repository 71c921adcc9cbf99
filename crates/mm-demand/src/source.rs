use crate::traveler::TravelerRecord;

/// Pull interface the supervisor drains once per tick.
///
/// `next_departures(from, to)` yields every traveler departing in the
/// half-open window `[from, to)`.  The supervisor calls it with
/// non-overlapping, increasing windows, so implementations may keep a
/// cursor instead of re-scanning.
pub trait DemandSource {
    fn next_departures(&mut self, from_secs: f64, to_secs: f64) -> Vec<TravelerRecord>;

    /// Total number of travelers the source will ever produce, if known.
    fn len_hint(&self) -> Option<usize> {
        None
    }
}

/// In-memory demand, sorted by departure time at construction.
#[derive(Debug, Default)]
pub struct VecDemand {
    records: Vec<TravelerRecord>,
    cursor:  usize,
}

impl VecDemand {
    pub fn new(mut records: Vec<TravelerRecord>) -> Self {
        records.sort_by(|a, b| a.departure_secs.total_cmp(&b.departure_secs));
        Self { records, cursor: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.records.len() - self.cursor
    }
}

impl DemandSource for VecDemand {
    fn next_departures(&mut self, from_secs: f64, to_secs: f64) -> Vec<TravelerRecord> {
        let mut out = Vec::new();
        while let Some(record) = self.records.get(self.cursor) {
            if record.departure_secs >= to_secs {
                break;
            }
            if record.departure_secs >= from_secs {
                out.push(record.clone());
            } else {
                // Departure before the first requested window (e.g. before
                // the simulation start); never re-delivered.
                log::warn!(
                    "traveler {} departs at {}s, before the window [{from_secs}, {to_secs})",
                    record.name,
                    record.departure_secs
                );
            }
            self.cursor += 1;
        }
        out
    }

    fn len_hint(&self) -> Option<usize> {
        Some(self.records.len())
    }
}
