//! `mm-graph` — road descriptor, per-mode layers, and the multi-layer
//! routing graph.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`road`]     | `RoadDescriptor` — immutable geometry, sections, zones    |
//! | [`layer`]    | `Layer`, `LayerBuilder` — per-mode topology input         |
//! | [`graph`]    | `MultiLayerGraph` — flattened SoA graph + R-tree          |
//! | [`labels`]   | `LabelSet` bitmasks, `LabelRegistry` interning            |
//! | [`costs`]    | `CostTable` — column-oriented named link costs            |
//! | [`snapshot`] | `GraphSnapshot` — serde persistence shape                 |
//! | [`error`]    | `GraphError`, `GraphResult<T>`                            |

pub mod costs;
pub mod error;
pub mod graph;
pub mod labels;
pub mod layer;
pub mod road;
pub mod snapshot;


pub use costs::{cost, CostId, CostTable};
pub use error::{GraphError, GraphResult};
pub use graph::{LayerMeta, MultiLayerGraph};
pub use labels::{LabelRegistry, LabelSet};
pub use layer::{Layer, LayerBuilder, LayerLink, LayerNode};
pub use road::{RoadDescriptor, RoadDescriptorBuilder, Section};
pub use snapshot::{GraphSnapshot, LayerSnapshot, LinkSnapshot, NodeSnapshot};
