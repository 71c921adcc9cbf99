//! The multi-layer routing graph.
//!
//! # Data layout
//!
//! All layers are flattened into one SoA node/link space at `add_layer` time:
//! names are interned into dense [`NodeIndex`]/[`LinkIndex`] values, costs go
//! into the column-oriented [`CostTable`], and eligibility labels become
//! [`LabelSet`] bitmasks.  Adjacency is a per-node `Vec<LinkIndex>` so layers
//! and transfer links can keep arriving incrementally.
//!
//! # Query reentrancy
//!
//! The whole query surface (`neighbors`, cost reads, spatial snaps) takes
//! `&self`; every mutation (`add_layer`, `connect`, cost writes) takes
//! `&mut self`.  The borrow checker therefore guarantees the graph is
//! immutable for as long as any routing query holds it — which is what makes
//! the parallel batch query safe without locks.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps planar positions to the nearest graph node.
//! Used to snap coordinate-based demand onto the network.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::{FxHashMap, FxHashSet};

use mm_core::{LayerIndex, LinkIndex, Mode, NodeIndex, Point, SectionIndex};

use crate::costs::{cost, CostId, CostTable};
use crate::labels::{LabelRegistry, LabelSet};
use crate::layer::Layer;
use crate::road::RoadDescriptor;
use crate::{GraphError, GraphResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a planar point with the
/// associated graph node.
#[derive(Clone)]
pub(crate) struct NodeEntry {
    point: [f64; 2],
    id: NodeIndex,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Layer metadata ────────────────────────────────────────────────────────────

/// Per-layer metadata kept after flattening.
#[derive(Clone, Debug)]
pub struct LayerMeta {
    pub name: String,
    pub mode: Mode,
    pub services: Vec<String>,
    /// Union of the service labels — stamped on every link of the layer.
    pub label_mask: LabelSet,
}

// ── MultiLayerGraph ───────────────────────────────────────────────────────────

/// Composition of per-mode layers plus transfer links into one queryable
/// graph.  Node and link names are globally unique across all layers.
pub struct MultiLayerGraph {
    /// Shared read-only geometric substrate.
    pub roads: RoadDescriptor,

    // ── Node data (indexed by NodeIndex) ──────────────────────────────────
    pub(crate) node_names: Vec<String>,
    pub(crate) node_pos: Vec<Point>,
    pub(crate) node_layer: Vec<LayerIndex>,
    /// Outgoing links per node.
    pub(crate) out_links: Vec<Vec<LinkIndex>>,

    // ── Link data (indexed by LinkIndex) ──────────────────────────────────
    pub(crate) link_names: Vec<String>,
    pub(crate) link_from: Vec<NodeIndex>,
    pub(crate) link_to: Vec<NodeIndex>,
    pub(crate) link_labels: Vec<LabelSet>,
    /// `LayerIndex::INVALID` for transfer links.
    pub(crate) link_layer: Vec<LayerIndex>,
    pub(crate) link_sections: Vec<Vec<SectionIndex>>,

    pub(crate) costs: CostTable,
    pub(crate) labels: LabelRegistry,
    pub(crate) layers: Vec<LayerMeta>,

    pub(crate) node_index: FxHashMap<String, NodeIndex>,
    pub(crate) link_index: FxHashMap<String, LinkIndex>,
    pub(crate) spatial_idx: RTree<NodeEntry>,

    // Resolved handles for the two columns every component touches.
    pub(crate) travel_time_col: CostId,
    pub(crate) length_col: CostId,
    pub(crate) speed_col: CostId,
}

impl MultiLayerGraph {
    /// Create an empty graph over `roads`.
    pub fn new(roads: RoadDescriptor) -> Self {
        let mut costs = CostTable::standard();
        // register() is idempotent; on a standard table these are lookups.
        let travel_time_col = costs.register(cost::TRAVEL_TIME);
        let length_col = costs.register(cost::LENGTH);
        let speed_col = costs.register(cost::SPEED);
        Self {
            roads,
            node_names: Vec::new(),
            node_pos: Vec::new(),
            node_layer: Vec::new(),
            out_links: Vec::new(),
            link_names: Vec::new(),
            link_from: Vec::new(),
            link_to: Vec::new(),
            link_labels: Vec::new(),
            link_layer: Vec::new(),
            link_sections: Vec::new(),
            costs,
            labels: LabelRegistry::new(),
            layers: Vec::new(),
            node_index: FxHashMap::default(),
            link_index: FxHashMap::default(),
            spatial_idx: RTree::new(),
            travel_time_col,
            length_col,
            speed_col,
        }
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Flatten `layer` into the graph.
    ///
    /// Fails with [`GraphError::DuplicateIdentifier`] if the layer's name or
    /// any of its node/link names collides with one already in the graph.
    /// The check runs before any mutation, so a failed call leaves the graph
    /// untouched.
    pub fn add_layer(&mut self, layer: Layer) -> GraphResult<LayerIndex> {
        if self.layers.iter().any(|l| l.name == layer.name) {
            return Err(GraphError::DuplicateIdentifier(layer.name));
        }
        for node in &layer.nodes {
            if self.node_index.contains_key(&node.name) {
                return Err(GraphError::DuplicateIdentifier(node.name.clone()));
            }
        }
        for link in &layer.links {
            if self.link_index.contains_key(&link.name) {
                return Err(GraphError::DuplicateIdentifier(link.name.clone()));
            }
        }

        let layer_id = LayerIndex(self.layers.len() as u16);
        let mut label_mask = LabelSet::EMPTY;
        for service in &layer.services {
            label_mask.insert(self.labels.register(service)?);
        }

        for node in &layer.nodes {
            self.push_node(&node.name, node.pos, layer_id);
        }

        for link in &layer.links {
            // Endpoints are names local to this layer; the builder already
            // validated their existence, so the lookups cannot fail here.
            let from = self.node_index[&link.upstream];
            let to = self.node_index[&link.downstream];
            let id = self.push_link(
                &link.name,
                from,
                to,
                label_mask,
                layer_id,
                link.sections.clone(),
            );
            self.costs.set(self.length_col, id, link.length);
            self.costs.set(self.travel_time_col, id, link.travel_time);
            self.costs.set(self.speed_col, id, link.speed);
            for (name, value) in &link.extra_costs {
                let col = self.costs.register(name);
                self.costs.set(col, id, *value);
            }
        }

        self.layers.push(LayerMeta {
            name: layer.name,
            mode: layer.mode,
            services: layer.services,
            label_mask,
        });
        Ok(layer_id)
    }

    /// Add a directed transfer link between two existing nodes (usually on
    /// different layers) with the given traversal cost in seconds.
    ///
    /// Transfer links carry no eligibility labels — everyone may use them.
    pub fn connect(&mut self, from: &str, to: &str, cost_secs: f64) -> GraphResult<LinkIndex> {
        let up = self.node_by_name(from)?;
        let down = self.node_by_name(to)?;
        let name = format!("{from}_TO_{to}");
        if self.link_index.contains_key(&name) {
            return Err(GraphError::DuplicateIdentifier(name));
        }

        let length = self.node_pos[up.index()].distance(self.node_pos[down.index()]);
        let id = self.push_link(&name, up, down, LabelSet::EMPTY, LayerIndex::INVALID, vec![]);
        self.costs.set(self.length_col, id, length);
        self.costs.set(self.travel_time_col, id, cost_secs);
        if cost_secs > 0.0 {
            self.costs.set(self.speed_col, id, length / cost_secs);
        }
        Ok(id)
    }

    pub(crate) fn push_node(&mut self, name: &str, pos: Point, layer: LayerIndex) -> NodeIndex {
        let id = NodeIndex(self.node_names.len() as u32);
        self.node_names.push(name.to_owned());
        self.node_pos.push(pos);
        self.node_layer.push(layer);
        self.out_links.push(Vec::new());
        self.node_index.insert(name.to_owned(), id);
        self.spatial_idx.insert(NodeEntry { point: [pos.x, pos.y], id });
        id
    }

    pub(crate) fn push_link(
        &mut self,
        name: &str,
        from: NodeIndex,
        to: NodeIndex,
        labels: LabelSet,
        layer: LayerIndex,
        sections: Vec<SectionIndex>,
    ) -> LinkIndex {
        let id = self.costs.push_link();
        debug_assert_eq!(id.index(), self.link_names.len());
        self.link_names.push(name.to_owned());
        self.link_from.push(from);
        self.link_to.push(to);
        self.link_labels.push(labels);
        self.link_layer.push(layer);
        self.link_sections.push(sections);
        self.link_index.insert(name.to_owned(), id);
        self.out_links[from.index()].push(id);
        id
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_names.len()
    }

    pub fn link_count(&self) -> usize {
        self.link_names.len()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// Outgoing links of `node` eligible under `labels`.
    ///
    /// An empty `labels` set means "no restriction".
    #[inline]
    pub fn neighbors(
        &self,
        node: NodeIndex,
        labels: LabelSet,
    ) -> impl Iterator<Item = LinkIndex> + '_ {
        self.out_links[node.index()]
            .iter()
            .copied()
            .filter(move |&l| self.link_labels[l.index()].eligible_under(labels))
    }

    /// All outgoing links of `node`, unfiltered.
    #[inline]
    pub fn out_links(&self, node: NodeIndex) -> &[LinkIndex] {
        &self.out_links[node.index()]
    }

    #[inline]
    pub fn link_endpoints(&self, link: LinkIndex) -> (NodeIndex, NodeIndex) {
        (self.link_from[link.index()], self.link_to[link.index()])
    }

    #[inline]
    pub fn link_target(&self, link: LinkIndex) -> NodeIndex {
        self.link_to[link.index()]
    }

    #[inline]
    pub fn link_label_set(&self, link: LinkIndex) -> LabelSet {
        self.link_labels[link.index()]
    }

    /// Layer a link belongs to; `None` for transfer links.
    pub fn link_layer(&self, link: LinkIndex) -> Option<LayerIndex> {
        let l = self.link_layer[link.index()];
        (l != LayerIndex::INVALID).then_some(l)
    }

    /// Mode of the layer a link belongs to.  Transfer links are walked.
    pub fn link_mode(&self, link: LinkIndex) -> Mode {
        match self.link_layer(link) {
            Some(l) => self.layers[l.index()].mode,
            None => Mode::Walk,
        }
    }

    pub fn link_sections(&self, link: LinkIndex) -> &[SectionIndex] {
        &self.link_sections[link.index()]
    }

    /// All links running over any of `sections` — the coverage set used to
    /// bind a reservoir to the graph.
    pub fn links_over_sections(&self, sections: &[SectionIndex]) -> Vec<LinkIndex> {
        let wanted: FxHashSet<SectionIndex> = sections.iter().copied().collect();
        (0..self.link_count())
            .map(|i| LinkIndex(i as u32))
            .filter(|&l| self.link_sections[l.index()].iter().any(|s| wanted.contains(s)))
            .collect()
    }

    // ── Name and position lookups ─────────────────────────────────────────

    pub fn node_by_name(&self, name: &str) -> GraphResult<NodeIndex> {
        self.node_index
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::UnknownNode(name.to_owned()))
    }

    pub fn link_by_name(&self, name: &str) -> Option<LinkIndex> {
        self.link_index.get(name).copied()
    }

    pub fn node_name(&self, node: NodeIndex) -> &str {
        &self.node_names[node.index()]
    }

    pub fn link_name(&self, link: LinkIndex) -> &str {
        &self.link_names[link.index()]
    }

    #[inline]
    pub fn node_pos(&self, node: NodeIndex) -> Point {
        self.node_pos[node.index()]
    }

    pub fn node_layer(&self, node: NodeIndex) -> LayerIndex {
        self.node_layer[node.index()]
    }

    pub fn layer(&self, layer: LayerIndex) -> &LayerMeta {
        &self.layers[layer.index()]
    }

    pub fn layer_by_name(&self, name: &str) -> Option<LayerIndex> {
        self.layers
            .iter()
            .position(|l| l.name == name)
            .map(|i| LayerIndex(i as u16))
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest graph node to `pos`, or `None` for an empty graph.
    pub fn nearest_node(&self, pos: Point) -> Option<NodeIndex> {
        self.spatial_idx
            .nearest_neighbor(&[pos.x, pos.y])
            .map(|e| e.id)
    }

    /// Nearest node belonging to `layer`.
    pub fn nearest_node_in_layer(&self, pos: Point, layer: LayerIndex) -> Option<NodeIndex> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.x, pos.y])
            .find(|e| self.node_layer[e.id.index()] == layer)
            .map(|e| e.id)
    }

    // ── Costs and labels ──────────────────────────────────────────────────

    /// Resolve a cost attribute name to a dense column handle.
    pub fn resolve_cost(&self, name: &str) -> GraphResult<CostId> {
        self.costs.resolve(name)
    }

    #[inline]
    pub fn cost_value(&self, id: CostId, link: LinkIndex) -> f64 {
        self.costs.value(id, link)
    }

    #[inline]
    pub fn set_cost_value(&mut self, id: CostId, link: LinkIndex, value: f64) {
        self.costs.set(id, link, value);
    }

    /// Handles for the columns the flow motor rewrites every update.
    pub fn flow_columns(&self) -> (CostId, CostId, CostId) {
        (self.travel_time_col, self.length_col, self.speed_col)
    }

    pub fn costs(&self) -> &CostTable {
        &self.costs
    }

    pub fn labels(&self) -> &LabelRegistry {
        &self.labels
    }

    /// Resolve a traveler's label names into a query mask.  Names never
    /// registered by any layer are dropped (a label no link carries can
    /// never make a link eligible).
    pub fn label_set<S: AsRef<str>>(&self, names: &[S]) -> LabelSet {
        self.labels.lookup_set(names)
    }
}
