//! `mm-output` — simulation output sinks.
//!
//! Two backends implement [`OutputWriter`]:
//!
//! | Backend        | Destination                                                   |
//! |----------------|---------------------------------------------------------------|
//! | [`CsvWriter`]  | `arrivals.csv`, `vehicle_events.csv`, `tick_summaries.csv`    |
//! | [`MemoryWriter`] | in-memory `Vec`s, for tests and programmatic inspection     |
//!
//! Both are driven by [`RecordingObserver`], which implements
//! `mm_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mm_output::{CsvWriter, RecordingObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output")).unwrap();
//! let mut obs = RecordingObserver::new(writer);
//! sim.run(&mut obs).unwrap();
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod memory;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use memory::MemoryWriter;
pub use observer::RecordingObserver;
pub use row::{ArrivalRow, TickSummaryRow, VehicleEventRow};
pub use writer::OutputWriter;
