//! Travel demand: trip records and the pull-based sources that feed them to
//! the simulation loop one departure window at a time.
//!
//! | Module     | Contents                                        |
//! |------------|-------------------------------------------------|
//! | `traveler` | `TravelerRecord`, `EndpointRef`                 |
//! | `source`   | `DemandSource` trait, in-memory `VecDemand`     |
//! | `csv`      | `CsvDemand` file loader (bad rows are skipped)  |
//! | `error`    | `DemandError` / `DemandResult`                  |

mod csv;
mod error;
mod source;
mod traveler;

pub use csv::CsvDemand;
pub use error::{DemandError, DemandResult};
pub use source::{DemandSource, VecDemand};
pub use traveler::{EndpointRef, TravelerRecord};
