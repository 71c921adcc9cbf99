//! Eligibility labels as interned bitmasks.
//!
//! A label restricts which travelers or vehicle classes may traverse a link
//! (e.g. the name of the mobility service operating it).  Labels are interned
//! into bit positions of a `u64` by the graph's [`LabelRegistry`], so the
//! per-link eligibility check in Dijkstra's inner loop is a single AND.
//!
//! # Eligibility rule
//!
//! - A link with an **empty** label set is open to everyone (transfer and
//!   walk links).
//! - A link with a non-empty set requires the query set to intersect it.
//! - An **empty query set** means "no restriction" — every link is eligible.

use rustc_hash::FxHashMap;

use crate::{GraphError, GraphResult};

// ── LabelSet ──────────────────────────────────────────────────────────────────

/// A set of interned eligibility labels, stored as a bitmask.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct LabelSet(pub u64);

impl LabelSet {
    pub const EMPTY: LabelSet = LabelSet(0);

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Insert the label with bit position `bit`.
    #[inline]
    pub fn insert(&mut self, bit: u8) {
        self.0 |= 1 << bit;
    }

    #[inline]
    pub fn contains(self, bit: u8) -> bool {
        self.0 & (1 << bit) != 0
    }

    #[inline]
    pub fn intersects(self, other: LabelSet) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn union(self, other: LabelSet) -> LabelSet {
        LabelSet(self.0 | other.0)
    }

    /// `true` if a link carrying `self` may be traversed under `query`.
    ///
    /// See the module docs for the rule.  Restricting the query set can only
    /// shrink the set of eligible links, which is what makes shortest-path
    /// costs monotone under label restriction.
    #[inline]
    pub fn eligible_under(self, query: LabelSet) -> bool {
        self.is_empty() || query.is_empty() || self.intersects(query)
    }

    pub fn len(self) -> u32 {
        self.0.count_ones()
    }
}

// ── LabelRegistry ─────────────────────────────────────────────────────────────

/// Interns label names to bit positions.  Owned by the graph; at most 64
/// distinct labels per graph.
#[derive(Clone, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct LabelRegistry {
    names: Vec<String>,
    #[serde(skip)]
    index: FxHashMap<String, u8>,
}

impl LabelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `name`, returning its bit position.  Idempotent.
    pub fn register(&mut self, name: &str) -> GraphResult<u8> {
        if let Some(&bit) = self.index.get(name) {
            return Ok(bit);
        }
        if self.names.len() >= 64 {
            return Err(GraphError::LabelOverflow(name.to_owned()));
        }
        let bit = self.names.len() as u8;
        self.names.push(name.to_owned());
        self.index.insert(name.to_owned(), bit);
        Ok(bit)
    }

    /// Bit position of `name`, if registered.
    pub fn get(&self, name: &str) -> Option<u8> {
        self.index.get(name).copied()
    }

    /// Name registered at `bit`.
    pub fn name(&self, bit: u8) -> Option<&str> {
        self.names.get(bit as usize).map(String::as_str)
    }

    /// Build a `LabelSet` from names without registering — unknown names are
    /// simply absent from the result (a traveler declaring a label no link
    /// carries is eligible for nothing under that label).
    pub fn lookup_set<S: AsRef<str>>(&self, names: &[S]) -> LabelSet {
        let mut set = LabelSet::EMPTY;
        for name in names {
            if let Some(bit) = self.get(name.as_ref()) {
                set.insert(bit);
            }
        }
        set
    }

    /// Names of all labels in `set`, in bit order.
    pub fn names_of(&self, set: LabelSet) -> Vec<String> {
        (0..self.names.len() as u8)
            .filter(|&bit| set.contains(bit))
            .map(|bit| self.names[bit as usize].clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Rebuild the name → bit index after deserialization (the map is not
    /// serialized; `names` order defines the bits).
    pub fn rebuild_index(&mut self) {
        self.index = self
            .names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i as u8))
            .collect();
    }
}
