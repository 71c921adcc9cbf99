use log::debug;
use mm_core::{LinkIndex, Mode, ReservoirIndex};
use mm_graph::MultiLayerGraph;
use rustc_hash::FxHashMap;

use crate::error::{FlowError, FlowResult};
use crate::mfd::MfdFunction;
use crate::reservoir::Reservoir;

/// Owns every reservoir and the link→reservoir assignment, and performs the
/// per-tick cost rewrite that couples congestion to routing.
#[derive(Debug, Default)]
pub struct FlowMotor {
    reservoirs: Vec<Reservoir>,
    link_res:   FxHashMap<LinkIndex, ReservoirIndex>,
}

impl FlowMotor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reservoir.  Fails if its name is taken or any of its links
    /// is already covered; on failure the motor is unchanged.
    pub fn add_reservoir(&mut self, reservoir: Reservoir) -> FlowResult<ReservoirIndex> {
        if self.reservoirs.iter().any(|r| r.name() == reservoir.name()) {
            return Err(FlowError::DuplicateReservoir(reservoir.name().to_owned()));
        }
        for &link in reservoir.links() {
            if self.link_res.contains_key(&link) {
                return Err(FlowError::LinkAlreadyCovered(link));
            }
        }
        let idx = ReservoirIndex(self.reservoirs.len() as u16);
        for &link in reservoir.links() {
            self.link_res.insert(link, idx);
        }
        self.reservoirs.push(reservoir);
        Ok(idx)
    }

    /// Register a reservoir covering every link that crosses a named zone of
    /// the road descriptor.
    pub fn add_zone_reservoir(
        &mut self,
        graph: &MultiLayerGraph,
        zone: &str,
        mfd: Box<dyn MfdFunction>,
    ) -> FlowResult<ReservoirIndex> {
        let sections = graph.roads.zone_sections(zone);
        if sections.is_empty() {
            return Err(FlowError::UnknownZone(zone.to_owned()));
        }
        let links = graph.links_over_sections(sections);
        self.add_reservoir(Reservoir::new(zone, links, mfd))
    }

    pub fn reservoir(&self, idx: ReservoirIndex) -> &Reservoir {
        &self.reservoirs[idx.index()]
    }

    pub fn reservoir_count(&self) -> usize {
        self.reservoirs.len()
    }

    pub fn reservoirs(&self) -> impl Iterator<Item = &Reservoir> {
        self.reservoirs.iter()
    }

    /// The reservoir covering `link`, if any.
    pub fn reservoir_for_link(&self, link: LinkIndex) -> Option<ReservoirIndex> {
        self.link_res.get(&link).copied()
    }

    /// A vehicle of `mode` started occupying one of the reservoir's links.
    pub fn vehicle_entered(&mut self, reservoir: ReservoirIndex, mode: Mode) {
        self.reservoirs[reservoir.index()].enter(mode);
    }

    /// A vehicle of `mode` left the reservoir's links.  Must pair with an
    /// earlier `vehicle_entered` for the same mode.
    pub fn vehicle_exited(&mut self, reservoir: ReservoirIndex, mode: Mode) {
        self.reservoirs[reservoir.index()].exit(mode);
    }

    /// Evaluate every reservoir's MFD and rewrite the `speed` and
    /// `travel_time` costs of all covered vehicular links.  Queries issued
    /// after this call see the new costs.  Non-vehicular (walk, transfer)
    /// links keep their free-flow costs.
    pub fn update(&self, graph: &mut MultiLayerGraph) {
        let (travel_time, length, speed_col) = graph.flow_columns();
        for reservoir in &self.reservoirs {
            let speeds = reservoir.speeds();
            debug!(
                "reservoir {}: n={:.1}",
                reservoir.name(),
                reservoir.accumulation().total_vehicular()
            );
            for &link in reservoir.links() {
                let mode = graph.link_mode(link);
                if !mode.is_vehicular() {
                    continue;
                }
                let v = speeds.get(mode);
                graph.set_cost_value(speed_col, link, v);
                let len = graph.cost_value(length, link);
                graph.set_cost_value(travel_time, link, len / v);
            }
        }
    }
}
