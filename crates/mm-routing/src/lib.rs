//! `mm-routing` — label-constrained routing over the multi-layer graph.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`path`]     | `Path` — link sequence + total cost                      |
//! | [`dijkstra`] | `shortest_path` with deterministic tie-breaking          |
//! | [`astar`]    | `astar_shortest_path` — straight-line heuristic variant  |
//! | [`ksp`]      | `k_shortest_paths` — Yen-style candidate generation      |
//! | [`batch`]    | `parallel_shortest_paths` / `parallel_k_shortest_paths`  |
//! | [`error`]    | `RoutingError`, `RoutingResult<T>`                       |
//!
//! # Concurrency model
//!
//! Every search takes the graph by `&self` and performs no mutation, so any
//! number of queries may run concurrently over one graph.  The batch
//! functions in [`batch`] exploit this with Rayon; the supervisor freezes
//! link costs for the duration of a tick, so all queries of a tick see one
//! consistent cost snapshot.

pub mod astar;
pub mod batch;
pub mod dijkstra;
pub mod error;
pub mod ksp;
pub mod path;

#[cfg(test)]
mod tests;

pub use astar::astar_shortest_path;
pub use batch::{parallel_k_shortest_paths, parallel_shortest_paths, PathRequest};
pub use dijkstra::{shortest_path, shortest_path_resolved};
pub use error::{RoutingError, RoutingResult};
pub use ksp::{k_shortest_paths, k_shortest_paths_resolved};
pub use path::Path;
