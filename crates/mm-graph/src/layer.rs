//! Per-mode layer description.
//!
//! A `Layer` is the input shape consumed by
//! [`MultiLayerGraph::add_layer`][crate::MultiLayerGraph::add_layer]: a named
//! node/link topology for one mode, with initial costs and the mobility
//! services operating on it.  Node and link references inside a layer are by
//! name; the graph interns everything into dense indices when the layer is
//! added.

use rustc_hash::FxHashMap;

use mm_core::{Mode, Point, SectionIndex};

use crate::{GraphError, GraphResult};

/// Free-flow speed in m/s assumed when a link does not override its
/// `travel_time` — per-mode defaults, overridable per builder.
fn default_speed(mode: Mode) -> f64 {
    match mode {
        Mode::Car => 13.9,
        Mode::Bus => 11.0,
        Mode::Tram => 14.0,
        Mode::Walk => 1.4,
        Mode::OnDemand => 13.9,
        _ => 13.9,
    }
}

/// A node of a layer.
#[derive(Clone, Debug)]
pub struct LayerNode {
    pub name: String,
    pub pos: Point,
}

/// A directed link of a layer, endpoints referenced by node name.
#[derive(Clone, Debug)]
pub struct LayerLink {
    pub name: String,
    pub upstream: String,
    pub downstream: String,
    /// Physical length in metres.
    pub length: f64,
    /// Underlying road sections this link runs over (may be empty for
    /// abstract links such as transit dwell legs).
    pub sections: Vec<SectionIndex>,
    /// Initial cost values beyond `length`/`travel_time`/`speed`, e.g.
    /// `waiting_time` or `fare`.
    pub extra_costs: Vec<(String, f64)>,
    /// Initial travel time in seconds (free-flow).
    pub travel_time: f64,
    /// Initial speed in m/s (free-flow).
    pub speed: f64,
}

/// A per-mode topology ready to be composed into a [`MultiLayerGraph`].
#[derive(Clone, Debug)]
pub struct Layer {
    pub name: String,
    pub mode: Mode,
    pub nodes: Vec<LayerNode>,
    pub links: Vec<LayerLink>,
    /// Mobility services bound to this layer.  Each service name becomes an
    /// eligibility label carried by every link of the layer.
    pub services: Vec<String>,
}

// ── LayerBuilder ──────────────────────────────────────────────────────────────

/// Incremental [`Layer`] construction with name-uniqueness checks local to
/// the layer (cross-layer uniqueness is the graph's job).
///
/// # Example
///
/// ```
/// use mm_core::{Mode, Point};
/// use mm_graph::LayerBuilder;
///
/// let mut b = LayerBuilder::new("car", Mode::Car);
/// b.add_node("C0", Point::new(0.0, 0.0)).unwrap();
/// b.add_node("C1", Point::new(100.0, 0.0)).unwrap();
/// b.add_link("C0_C1", "C0", "C1", 100.0, vec![]).unwrap();
/// let layer = b.build();
/// assert_eq!(layer.links.len(), 1);
/// ```
pub struct LayerBuilder {
    name: String,
    mode: Mode,
    free_flow_speed: f64,
    nodes: Vec<LayerNode>,
    node_names: FxHashMap<String, ()>,
    links: Vec<LayerLink>,
    link_names: FxHashMap<String, ()>,
    services: Vec<String>,
}

impl LayerBuilder {
    pub fn new(name: &str, mode: Mode) -> Self {
        Self {
            name: name.to_owned(),
            mode,
            free_flow_speed: default_speed(mode),
            nodes: Vec::new(),
            node_names: FxHashMap::default(),
            links: Vec::new(),
            link_names: FxHashMap::default(),
            services: Vec::new(),
        }
    }

    /// Override the free-flow speed used for default link travel times.
    pub fn free_flow_speed(mut self, speed: f64) -> Self {
        self.free_flow_speed = speed;
        self
    }

    /// Bind a mobility service to this layer.  Its name becomes an
    /// eligibility label on every link.
    pub fn add_service(&mut self, service: &str) {
        if !self.services.iter().any(|s| s == service) {
            self.services.push(service.to_owned());
        }
    }

    /// Add a layer node.  Duplicate names within the layer are an error.
    pub fn add_node(&mut self, name: &str, pos: Point) -> GraphResult<()> {
        if self.node_names.insert(name.to_owned(), ()).is_some() {
            return Err(GraphError::DuplicateIdentifier(name.to_owned()));
        }
        self.nodes.push(LayerNode { name: name.to_owned(), pos });
        Ok(())
    }

    /// Add a directed link with free-flow costs derived from `length` and
    /// the builder's free-flow speed.
    pub fn add_link(
        &mut self,
        name: &str,
        upstream: &str,
        downstream: &str,
        length: f64,
        sections: Vec<SectionIndex>,
    ) -> GraphResult<()> {
        self.add_link_with_costs(name, upstream, downstream, length, sections, &[])
    }

    /// Add a directed link with extra initial cost attributes (e.g.
    /// `waiting_time`, `fare`).
    pub fn add_link_with_costs(
        &mut self,
        name: &str,
        upstream: &str,
        downstream: &str,
        length: f64,
        sections: Vec<SectionIndex>,
        extra_costs: &[(&str, f64)],
    ) -> GraphResult<()> {
        if self.link_names.insert(name.to_owned(), ()).is_some() {
            return Err(GraphError::DuplicateIdentifier(name.to_owned()));
        }
        if !self.node_names.contains_key(upstream) {
            return Err(GraphError::UnknownNode(upstream.to_owned()));
        }
        if !self.node_names.contains_key(downstream) {
            return Err(GraphError::UnknownNode(downstream.to_owned()));
        }
        let speed = self.free_flow_speed;
        self.links.push(LayerLink {
            name: name.to_owned(),
            upstream: upstream.to_owned(),
            downstream: downstream.to_owned(),
            length,
            sections,
            extra_costs: extra_costs
                .iter()
                .map(|&(n, v)| (n.to_owned(), v))
                .collect(),
            travel_time: length / speed,
            speed,
        });
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn build(self) -> Layer {
        Layer {
            name: self.name,
            mode: self.mode,
            nodes: self.nodes,
            links: self.links,
            services: self.services,
        }
    }
}
