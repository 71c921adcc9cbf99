//! Road descriptor — the immutable geometric substrate shared by all layers.
//!
//! The descriptor knows nothing about modes, services, or costs: it is pure
//! geometry.  Layers reference its directed sections so that flow reservoirs
//! (defined over geographic zones of sections) can later be mapped onto the
//! links of every layer that runs over those sections.

use rustc_hash::FxHashMap;

use mm_core::{NodeIndex, Point, SectionIndex};

use crate::{GraphError, GraphResult};

/// A directed road section between two road nodes.
#[derive(Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Section {
    pub name: String,
    pub upstream: NodeIndex,
    pub downstream: NodeIndex,
    /// Physical length in metres.  Always positive.
    pub length: f64,
}

/// Immutable base geometry: road nodes, directed sections, and named zones.
///
/// Node and section indices here are **descriptor-local** — they are a
/// different index space from the flattened multi-layer graph's nodes and
/// links.  Do not construct directly; use [`RoadDescriptorBuilder`].
#[derive(Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct RoadDescriptor {
    pub node_names: Vec<String>,
    pub node_pos: Vec<Point>,
    pub sections: Vec<Section>,
    /// Named geographic zones: zone name → the sections it covers.  Used to
    /// bind flow reservoirs to links.
    pub zones: FxHashMap<String, Vec<SectionIndex>>,

    #[serde(skip)]
    node_index: FxHashMap<String, NodeIndex>,
    #[serde(skip)]
    section_index: FxHashMap<String, SectionIndex>,
}

impl RoadDescriptor {
    /// A descriptor with no geometry — for layer-only graphs (e.g. pure
    /// transit tests) that never bind reservoirs.
    pub fn empty() -> Self {
        RoadDescriptorBuilder::new().build()
    }

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn node_by_name(&self, name: &str) -> Option<NodeIndex> {
        self.node_index.get(name).copied()
    }

    pub fn section_by_name(&self, name: &str) -> Option<SectionIndex> {
        self.section_index.get(name).copied()
    }

    /// Sections covered by `zone`, or an empty slice for unknown zones.
    pub fn zone_sections(&self, zone: &str) -> &[SectionIndex] {
        self.zones.get(zone).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rebuild the name indices after deserialization.
    pub fn rebuild_index(&mut self) {
        self.node_index = self
            .node_names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), NodeIndex(i as u32)))
            .collect();
        self.section_index = self
            .sections
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.clone(), SectionIndex(i as u32)))
            .collect();
    }
}

// ── RoadDescriptorBuilder ─────────────────────────────────────────────────────

/// Construct a [`RoadDescriptor`] incrementally, then call
/// [`build`](Self::build).
pub struct RoadDescriptorBuilder {
    node_names: Vec<String>,
    node_pos: Vec<Point>,
    node_index: FxHashMap<String, NodeIndex>,
    sections: Vec<Section>,
    section_index: FxHashMap<String, SectionIndex>,
    zones: FxHashMap<String, Vec<SectionIndex>>,
}

impl RoadDescriptorBuilder {
    pub fn new() -> Self {
        Self {
            node_names: Vec::new(),
            node_pos: Vec::new(),
            node_index: FxHashMap::default(),
            sections: Vec::new(),
            section_index: FxHashMap::default(),
            zones: FxHashMap::default(),
        }
    }

    /// Add a road node.  Duplicate names are a construction error.
    pub fn add_node(&mut self, name: &str, pos: Point) -> GraphResult<NodeIndex> {
        if self.node_index.contains_key(name) {
            return Err(GraphError::DuplicateIdentifier(name.to_owned()));
        }
        let id = NodeIndex(self.node_names.len() as u32);
        self.node_names.push(name.to_owned());
        self.node_pos.push(pos);
        self.node_index.insert(name.to_owned(), id);
        Ok(id)
    }

    /// Add a directed section from `upstream` to `downstream`.
    ///
    /// Fails with `UnknownNode` for unregistered endpoints and
    /// `InvalidGeometry` for a non-positive length.
    pub fn add_section(
        &mut self,
        name: &str,
        upstream: &str,
        downstream: &str,
        length: f64,
    ) -> GraphResult<SectionIndex> {
        if self.section_index.contains_key(name) {
            return Err(GraphError::DuplicateIdentifier(name.to_owned()));
        }
        if !(length > 0.0) {
            return Err(GraphError::InvalidGeometry(name.to_owned()));
        }
        let up = self.node(upstream)?;
        let down = self.node(downstream)?;

        let id = SectionIndex(self.sections.len() as u32);
        self.sections.push(Section {
            name: name.to_owned(),
            upstream: up,
            downstream: down,
            length,
        });
        self.section_index.insert(name.to_owned(), id);
        Ok(id)
    }

    /// Declare a named zone over a set of sections.  Later declarations of
    /// the same zone extend it.
    pub fn add_zone(&mut self, zone: &str, sections: Vec<SectionIndex>) {
        self.zones.entry(zone.to_owned()).or_default().extend(sections);
    }

    fn node(&self, name: &str) -> GraphResult<NodeIndex> {
        self.node_index
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::UnknownNode(name.to_owned()))
    }

    pub fn build(self) -> RoadDescriptor {
        RoadDescriptor {
            node_names: self.node_names,
            node_pos: self.node_pos,
            sections: self.sections,
            zones: self.zones,
            node_index: self.node_index,
            section_index: self.section_index,
        }
    }
}

impl Default for RoadDescriptorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
