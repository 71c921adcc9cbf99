//! Named link-cost columns.
//!
//! # Data layout
//!
//! Costs are stored column-wise: each registered cost name owns a `Vec<f64>`
//! indexed by `LinkIndex`.  Routing resolves a cost name to a [`CostId`] once
//! per query and then reads a dense column — no per-link hash lookups on the
//! Dijkstra hot path.
//!
//! Only the flow motor (and graph construction) writes columns; routing
//! reads them through `&self`.

use rustc_hash::FxHashMap;

use mm_core::LinkIndex;

use crate::{GraphError, GraphResult};

/// Well-known cost attribute names.
pub mod cost {
    pub const TRAVEL_TIME: &str = "travel_time";
    pub const LENGTH: &str = "length";
    pub const WAITING_TIME: &str = "waiting_time";
    pub const SPEED: &str = "speed";
    pub const FARE: &str = "fare";
}

/// Resolved handle for a cost column.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct CostId(pub(crate) u32);

/// Column-oriented link cost storage.
#[derive(Clone, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct CostTable {
    names: Vec<String>,
    #[serde(skip)]
    index: FxHashMap<String, u32>,
    columns: Vec<Vec<f64>>,
    link_count: usize,
}

impl CostTable {
    /// A table pre-registered with the five well-known cost names.
    pub fn standard() -> Self {
        let mut table = Self::default();
        for name in [
            cost::TRAVEL_TIME,
            cost::LENGTH,
            cost::WAITING_TIME,
            cost::SPEED,
            cost::FARE,
        ] {
            table.register(name);
        }
        table
    }

    /// Register a cost name, returning its handle.  Idempotent.  A column
    /// registered after links exist is backfilled with zeros.
    pub fn register(&mut self, name: &str) -> CostId {
        if let Some(&i) = self.index.get(name) {
            return CostId(i);
        }
        let i = self.names.len() as u32;
        self.names.push(name.to_owned());
        self.index.insert(name.to_owned(), i);
        self.columns.push(vec![0.0; self.link_count]);
        CostId(i)
    }

    /// Resolve a cost name to its handle.
    pub fn resolve(&self, name: &str) -> GraphResult<CostId> {
        self.index
            .get(name)
            .map(|&i| CostId(i))
            .ok_or_else(|| GraphError::UnknownCost(name.to_owned()))
    }

    /// Grow every column by one link, all values zero.  Returns the new
    /// link's row so the caller can fill in initial costs.
    pub(crate) fn push_link(&mut self) -> LinkIndex {
        let link = LinkIndex(self.link_count as u32);
        for column in &mut self.columns {
            column.push(0.0);
        }
        self.link_count += 1;
        link
    }

    #[inline]
    pub fn value(&self, id: CostId, link: LinkIndex) -> f64 {
        self.columns[id.0 as usize][link.index()]
    }

    #[inline]
    pub fn set(&mut self, id: CostId, link: LinkIndex, value: f64) {
        self.columns[id.0 as usize][link.index()] = value;
    }

    /// Read-only view of a whole column.
    pub fn column(&self, id: CostId) -> &[f64] {
        &self.columns[id.0 as usize]
    }

    /// All `(name, value)` pairs for one link — used by snapshots.
    pub fn row(&self, link: LinkIndex) -> Vec<(String, f64)> {
        self.names
            .iter()
            .zip(&self.columns)
            .map(|(name, col)| (name.clone(), col[link.index()]))
            .collect()
    }

    pub fn link_count(&self) -> usize {
        self.link_count
    }

    /// Rebuild the name → column index after deserialization.
    pub fn rebuild_index(&mut self) {
        self.index = self
            .names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i as u32))
            .collect();
    }
}
