use mm_core::{CoreError, SimConfig, SimRng};
use mm_demand::DemandSource;
use mm_fleet::VehicleFleet;
use mm_flow::FlowMotor;
use mm_graph::MultiLayerGraph;

use crate::decision::{DecisionModel, ShortestPathDecision};
use crate::error::SimResult;
use crate::supervisor::{RunState, Supervisor};
use crate::traveler::TravelerRegistry;

/// Assembles a `Supervisor`.  Graph, config and a demand source are
/// mandatory; the flow motor defaults to empty (no congestion feedback) and
/// the decision model to all-or-nothing shortest path.
pub struct SupervisorBuilder {
    config:   SimConfig,
    graph:    MultiLayerGraph,
    motor:    FlowMotor,
    demand:   Option<Box<dyn DemandSource>>,
    decision: Box<dyn DecisionModel>,
}

impl SupervisorBuilder {
    pub fn new(graph: MultiLayerGraph, config: SimConfig) -> Self {
        Self {
            config,
            graph,
            motor: FlowMotor::new(),
            demand: None,
            decision: Box::new(ShortestPathDecision),
        }
    }

    pub fn demand(mut self, demand: Box<dyn DemandSource>) -> Self {
        self.demand = Some(demand);
        self
    }

    pub fn flow_motor(mut self, motor: FlowMotor) -> Self {
        self.motor = motor;
        self
    }

    pub fn decision(mut self, decision: Box<dyn DecisionModel>) -> Self {
        self.decision = decision;
        self
    }

    pub fn build(self) -> SimResult<Supervisor> {
        self.config.validate()?;
        let demand = self
            .demand
            .ok_or_else(|| CoreError::Config("a demand source is required".to_owned()))?;

        let clock = self.config.make_clock();
        let rng = SimRng::new(self.config.seed);
        Ok(Supervisor {
            config: self.config,
            clock,
            state: RunState::Initialized,
            graph: self.graph,
            motor: self.motor,
            fleet: VehicleFleet::new(),
            travelers: TravelerRegistry::new(),
            demand,
            decision: self.decision,
            rng,
        })
    }
}
