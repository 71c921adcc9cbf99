use log::{debug, info, warn};
use mm_core::{SimClock, SimConfig, SimRng};
use mm_demand::{DemandSource, EndpointRef};
use mm_fleet::{RouteLeg, VehicleFleet, VehicleState};
use mm_flow::FlowMotor;
use mm_graph::MultiLayerGraph;
use mm_routing::{parallel_k_shortest_paths, Path, PathRequest, RoutingError};

use crate::decision::DecisionModel;
use crate::error::{SimError, SimResult};
use crate::observer::{SimObserver, TickSummary, VehicleTransition};
use crate::traveler::{TravelerRegistry, TravelerState};

/// How many upstream nodes Yen spur searches re-check for loops.
const LOOP_WINDOW: usize = 0;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    Initialized,
    Running,
    Terminated,
}

/// Owns the entire mutable state of one simulation run.  Two supervisors
/// share nothing, so independent runs can never contaminate each other.
///
/// One `step()`:
/// 1. drain the demand window `[t, t+Δt)` and admit travelers;
/// 2. batch k-shortest queries (parallel, against costs as of tick start),
///    let the decision model pick, assign vehicles and routes;
/// 3. advance every en-route vehicle, recording arrivals;
/// 4. recompute reservoir speeds and rewrite link costs (every
///    `flow_update_period` ticks);
/// 5. notify the observer and advance the clock.
pub struct Supervisor {
    pub(crate) config:    SimConfig,
    pub(crate) clock:     SimClock,
    pub(crate) state:     RunState,
    pub(crate) graph:     MultiLayerGraph,
    pub(crate) motor:     FlowMotor,
    pub(crate) fleet:     VehicleFleet,
    pub(crate) travelers: TravelerRegistry,
    pub(crate) demand:    Box<dyn DemandSource>,
    pub(crate) decision:  Box<dyn DecisionModel>,
    pub(crate) rng:       SimRng,
}

impl Supervisor {
    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn graph(&self) -> &MultiLayerGraph {
        &self.graph
    }

    pub fn motor(&self) -> &FlowMotor {
        &self.motor
    }

    pub fn fleet(&self) -> &VehicleFleet {
        &self.fleet
    }

    pub fn travelers(&self) -> &TravelerRegistry {
        &self.travelers
    }

    /// Run until the configured end time, firing `observer` along the way.
    pub fn run(&mut self, observer: &mut dyn SimObserver) -> SimResult<()> {
        if self.state == RunState::Terminated {
            return Err(SimError::InvalidState("run() on a terminated supervisor".to_owned()));
        }
        self.state = RunState::Running;
        info!(
            "starting run: {} ticks of {}s from t={}s",
            self.config.total_ticks(),
            self.config.dt_secs,
            self.config.start_secs
        );

        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer)?;
        }

        self.state = RunState::Terminated;
        observer.on_run_end(self.clock.current_tick);
        info!(
            "run finished at {}: {} travelers ({} arrived, {} unservable)",
            self.clock,
            self.travelers.len(),
            self.travelers.arrived_count(),
            self.travelers.unservable_count()
        );
        Ok(())
    }

    /// Execute one tick.  Public so callers can interleave their own logic
    /// between ticks; `run` is a plain loop over this.
    pub fn step(&mut self, observer: &mut dyn SimObserver) -> SimResult<TickSummary> {
        if self.state == RunState::Terminated {
            return Err(SimError::InvalidState("step() on a terminated supervisor".to_owned()));
        }
        self.state = RunState::Running;

        let tick = self.clock.current_tick;
        let (from_secs, to_secs) = self.clock.tick_window();
        observer.on_tick_start(tick, from_secs);

        let departures = self.inject_demand(from_secs, to_secs, observer)?;
        let arrivals = self.advance_vehicles(to_secs, observer);

        if tick.0 % self.config.flow_update_period.max(1) == 0 {
            self.motor.update(&mut self.graph);
        }

        let summary = TickSummary {
            tick,
            now_secs: from_secs,
            departures,
            arrivals,
            unservable: self.travelers.unservable_count(),
            en_route: self.fleet.en_route_count(),
        };
        debug!(
            "{}: {} departed, {} arrived, {} en route",
            self.clock, summary.departures, summary.arrivals, summary.en_route
        );
        observer.on_tick_end(&summary);
        self.clock.advance();
        Ok(summary)
    }

    // ── Step 1–2: demand + route choice ───────────────────────────────────

    /// Admit this window's travelers, route them in one parallel batch and
    /// put the served ones into vehicles.  Returns the departure count.
    fn inject_demand(
        &mut self,
        from_secs: f64,
        to_secs: f64,
        observer: &mut dyn SimObserver,
    ) -> SimResult<usize> {
        let records = self.demand.next_departures(from_secs, to_secs);
        if records.is_empty() {
            return Ok(0);
        }

        let mut admitted = Vec::with_capacity(records.len());
        for record in records {
            let origin = match self.resolve_endpoint(&record.origin) {
                Some(n) => n,
                None => {
                    warn!("traveler {}: unresolvable origin {:?}", record.name, record.origin);
                    continue;
                }
            };
            let destination = match self.resolve_endpoint(&record.destination) {
                Some(n) => n,
                None => {
                    warn!(
                        "traveler {}: unresolvable destination {:?}",
                        record.name, record.destination
                    );
                    continue;
                }
            };
            let labels = self.graph.label_set(&record.labels);
            let id = self.travelers.admit(
                record.name,
                origin,
                destination,
                record.departure_secs,
                labels,
            );
            admitted.push((id, PathRequest { origin, destination, labels }));
        }

        // One read-only batch over the costs fixed at tick start; the graph
        // is not mutated until every worker has returned.
        let requests: Vec<PathRequest> = admitted.iter().map(|&(_, q)| q).collect();
        let k = self.decision.candidate_count().max(1);
        let candidates = parallel_k_shortest_paths(
            &self.graph,
            &requests,
            mm_graph::cost::TRAVEL_TIME,
            k,
            LOOP_WINDOW,
            self.config.workers,
        )?;

        let mut departures = 0;
        for ((id, _), result) in admitted.into_iter().zip(candidates) {
            match result {
                Ok(paths) => {
                    let choice = {
                        let traveler = match self.travelers.get(id) {
                            Some(t) => t,
                            None => continue,
                        };
                        self.decision.choose(traveler, &paths, &mut self.rng)
                    };
                    match choice {
                        Some(i) if i < paths.len() => {
                            let mut paths = paths;
                            self.depart(id, paths.swap_remove(i), observer)?;
                            departures += 1;
                        }
                        _ => self.mark_unservable(id, "decision model abstained"),
                    }
                }
                Err(RoutingError::PathNotFound { .. }) => {
                    self.mark_unservable(id, "no path");
                }
                Err(other) => return Err(other.into()),
            }
        }
        Ok(departures)
    }

    fn resolve_endpoint(&self, endpoint: &EndpointRef) -> Option<mm_core::NodeIndex> {
        match endpoint {
            EndpointRef::Node(name) => self.graph.node_by_name(name).ok(),
            EndpointRef::Coord(pos) => self.graph.nearest_node(*pos),
        }
    }

    fn mark_unservable(&mut self, id: mm_core::TravelerIndex, why: &str) {
        if let Some(t) = self.travelers.get_mut(id) {
            warn!("traveler {} is unservable: {why}", t.name);
            t.state = TravelerState::Unservable;
        }
    }

    /// Spawn a vehicle for a routed traveler and set it moving.
    fn depart(
        &mut self,
        id: mm_core::TravelerIndex,
        path: Path,
        observer: &mut dyn SimObserver,
    ) -> SimResult<()> {
        if path.is_trivial() {
            // Origin == destination: an immediate arrival.
            if let Some(t) = self.travelers.get_mut(id) {
                t.state = TravelerState::Arrived { at_secs: t.departure_secs };
                observer.on_arrival(t, t.departure_secs);
            }
            return Ok(());
        }

        let (_, length_col, _) = self.graph.flow_columns();
        let legs: Vec<RouteLeg> = path
            .links
            .iter()
            .map(|&link| RouteLeg {
                link,
                length:    self.graph.cost_value(length_col, link),
                reservoir: self.motor.reservoir_for_link(link),
            })
            .collect();
        let mode = self.graph.link_mode(path.links[0]);

        let vehicle = self.fleet.spawn(mode, 1);
        self.fleet.board(vehicle, id)?;
        self.fleet.assign_route(vehicle, legs, &mut self.motor)?;

        if let Some(t) = self.travelers.get_mut(id) {
            t.state = TravelerState::EnRoute;
            t.path = Some(path);
            t.vehicle = Some(vehicle);
            observer.on_departure(t);
        }
        observer.on_vehicle_event(&VehicleTransition {
            vehicle,
            state:   VehicleState::EnRoute,
            at_secs: self.clock.now_secs(),
        });
        Ok(())
    }

    // ── Step 3: movement ──────────────────────────────────────────────────

    fn advance_vehicles(&mut self, tick_end_secs: f64, observer: &mut dyn SimObserver) -> usize {
        let completed =
            self.fleet.advance_all(self.config.dt_secs, &self.graph, &mut self.motor);

        let mut arrivals = 0;
        for vehicle in completed {
            observer.on_vehicle_event(&VehicleTransition {
                vehicle,
                state: VehicleState::Completed,
                at_secs: tick_end_secs,
            });
            let passengers: Vec<_> = match self.fleet.vehicle(vehicle) {
                Ok(v) => v.passengers().to_vec(),
                Err(_) => continue,
            };
            for id in passengers {
                if let Some(t) = self.travelers.get_mut(id) {
                    t.state = TravelerState::Arrived { at_secs: tick_end_secs };
                    observer.on_arrival(t, tick_end_secs);
                    arrivals += 1;
                }
            }
        }
        arrivals
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunState::Initialized => "initialized",
            RunState::Running => "running",
            RunState::Terminated => "terminated",
        };
        f.write_str(s)
    }
}
