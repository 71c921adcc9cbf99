//! Unit and end-to-end tests for mm-sim.

#[cfg(test)]
mod helpers {
    use mm_core::{Mode, Point, SimConfig, Tick, VehicleIndex};
    use mm_demand::{EndpointRef, TravelerRecord, VecDemand};
    use mm_graph::{LayerBuilder, MultiLayerGraph, RoadDescriptor};

    use crate::{SimObserver, TickSummary, VehicleTransition};

    pub fn config(end_secs: f64) -> SimConfig {
        SimConfig {
            start_secs:         0.0,
            end_secs,
            dt_secs:            10.0,
            flow_update_period: 1,
            seed:               42,
            workers:            None,
        }
    }

    /// Two-link car corridor, 100 m per link at 10 m/s.
    pub fn corridor() -> MultiLayerGraph {
        let mut graph = MultiLayerGraph::new(RoadDescriptor::empty());
        let mut car = LayerBuilder::new("car", Mode::Car).free_flow_speed(10.0);
        car.add_node("C0", Point::new(0.0, 0.0)).unwrap();
        car.add_node("C1", Point::new(100.0, 0.0)).unwrap();
        car.add_node("C2", Point::new(200.0, 0.0)).unwrap();
        car.add_link("C0_C1", "C0", "C1", 100.0, vec![]).unwrap();
        car.add_link("C1_C2", "C1", "C2", 100.0, vec![]).unwrap();
        graph.add_layer(car.build()).unwrap();
        graph
    }

    pub fn trip(name: &str, from: &str, to: &str, departure_secs: f64) -> TravelerRecord {
        TravelerRecord {
            name:           name.to_owned(),
            origin:         EndpointRef::Node(from.to_owned()),
            destination:    EndpointRef::Node(to.to_owned()),
            departure_secs,
            labels:         vec![],
        }
    }

    pub fn demand(records: Vec<TravelerRecord>) -> Box<VecDemand> {
        Box::new(VecDemand::new(records))
    }

    /// Observer that keeps everything it is told.
    #[derive(Default)]
    pub struct Recorder {
        pub ticks:      Vec<Tick>,
        pub departures: Vec<String>,
        pub arrivals:   Vec<(String, f64)>,
        pub vehicles:   Vec<(VehicleIndex, mm_fleet::VehicleState)>,
        pub summaries:  Vec<TickSummary>,
        pub run_ended:  bool,
    }

    impl SimObserver for Recorder {
        fn on_tick_start(&mut self, tick: Tick, _now_secs: f64) {
            self.ticks.push(tick);
        }

        fn on_departure(&mut self, traveler: &crate::Traveler) {
            self.departures.push(traveler.name().to_owned());
        }

        fn on_arrival(&mut self, traveler: &crate::Traveler, at_secs: f64) {
            self.arrivals.push((traveler.name().to_owned(), at_secs));
        }

        fn on_vehicle_event(&mut self, event: &VehicleTransition) {
            self.vehicles.push((event.vehicle, event.state));
        }

        fn on_tick_end(&mut self, summary: &TickSummary) {
            self.summaries.push(*summary);
        }

        fn on_run_end(&mut self, _final_tick: Tick) {
            self.run_ended = true;
        }
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use crate::{SimError, SupervisorBuilder};

    use super::helpers::{config, corridor, demand};

    #[test]
    fn demand_source_is_required() {
        // `Supervisor` is not Debug (boxed trait objects), so pull the error
        // out through `err()` instead of `unwrap_err()`.
        let err = SupervisorBuilder::new(corridor(), config(100.0)).build().err().unwrap();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn time_parameters_are_validated() {
        let mut bad_dt = config(100.0);
        bad_dt.dt_secs = 0.0;
        assert!(SupervisorBuilder::new(corridor(), bad_dt).demand(demand(vec![])).build().is_err());

        let backwards = config(-10.0);
        assert!(
            SupervisorBuilder::new(corridor(), backwards).demand(demand(vec![])).build().is_err()
        );
    }
}

// ── Decision models ───────────────────────────────────────────────────────────

#[cfg(test)]
mod decision {
    use mm_core::{LinkIndex, SimRng};
    use mm_routing::Path;

    use crate::{DecisionModel, LogitDecision, ShortestPathDecision, TravelerRegistry};

    fn candidates(costs: &[f64]) -> Vec<Path> {
        costs
            .iter()
            .enumerate()
            .map(|(i, &cost)| Path { links: vec![LinkIndex(i as u32)], cost })
            .collect()
    }

    fn dummy_traveler(registry: &mut TravelerRegistry) -> mm_core::TravelerIndex {
        registry.admit(
            "t".to_owned(),
            mm_core::NodeIndex(0),
            mm_core::NodeIndex(1),
            0.0,
            mm_graph::LabelSet::EMPTY,
        )
    }

    #[test]
    fn shortest_path_always_takes_the_first() {
        let mut registry = TravelerRegistry::new();
        let id = dummy_traveler(&mut registry);
        let traveler = registry.get(id).unwrap();
        let mut rng = SimRng::new(1);

        let model = ShortestPathDecision;
        assert_eq!(model.candidate_count(), 1);
        assert_eq!(model.choose(traveler, &candidates(&[10.0, 12.0]), &mut rng), Some(0));
        assert_eq!(model.choose(traveler, &[], &mut rng), None);
    }

    #[test]
    fn sharp_logit_concentrates_on_the_cheapest() {
        let mut registry = TravelerRegistry::new();
        let id = dummy_traveler(&mut registry);
        let traveler = registry.get(id).unwrap();
        let mut rng = SimRng::new(7);

        // theta = 50 over a 10 s cost gap: alternative weight ~ e^-500.
        let model = LogitDecision::new(50.0, 3);
        for _ in 0..100 {
            assert_eq!(model.choose(traveler, &candidates(&[10.0, 20.0, 30.0]), &mut rng), Some(0));
        }
    }

    #[test]
    fn logit_is_reproducible_per_seed() {
        let mut registry = TravelerRegistry::new();
        let id = dummy_traveler(&mut registry);
        let traveler = registry.get(id).unwrap();
        let model = LogitDecision::new(0.05, 3);
        let paths = candidates(&[10.0, 11.0, 12.0]);

        let draw = |seed: u64| -> Vec<Option<usize>> {
            let mut rng = SimRng::new(seed);
            (0..32).map(|_| model.choose(traveler, &paths, &mut rng)).collect()
        };
        assert_eq!(draw(99), draw(99));
        // A near-uniform logit over 32 draws should not be constant.
        let spread = draw(99);
        assert!(spread.iter().any(|c| *c != spread[0]));
    }
}

// ── End-to-end runs ───────────────────────────────────────────────────────────

#[cfg(test)]
mod run {
    use mm_fleet::VehicleState;

    use crate::{RunState, SimError, SupervisorBuilder, TravelerState};

    use super::helpers::{config, corridor, demand, trip, Recorder};

    #[test]
    fn one_traveler_departs_travels_and_arrives() {
        let mut sim = SupervisorBuilder::new(corridor(), config(100.0))
            .demand(demand(vec![trip("alice", "C0", "C2", 0.0)]))
            .build()
            .unwrap();

        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        assert_eq!(sim.state(), RunState::Terminated);
        assert!(rec.run_ended);
        assert_eq!(rec.ticks.len(), 10);

        // 200 m at 10 m/s = 20 s: departs in tick 0, arrives at its end of
        // tick 1 (t = 20 s).
        assert_eq!(rec.departures, ["alice"]);
        assert_eq!(rec.arrivals, [("alice".to_owned(), 20.0)]);
        assert_eq!(
            rec.vehicles.iter().map(|&(_, s)| s).collect::<Vec<_>>(),
            [VehicleState::EnRoute, VehicleState::Completed]
        );

        let alice = sim.travelers().iter().next().unwrap();
        assert_eq!(alice.state(), TravelerState::Arrived { at_secs: 20.0 });
        assert_eq!(alice.path().unwrap().cost, 20.0);

        assert_eq!(rec.summaries[0].departures, 1);
        assert_eq!(rec.summaries[1].arrivals, 1);
        assert_eq!(rec.summaries[0].en_route, 1);
        assert_eq!(rec.summaries[2].en_route, 0);
    }

    #[test]
    fn unroutable_traveler_is_unservable_and_run_continues() {
        let mut sim = SupervisorBuilder::new(corridor(), config(50.0))
            .demand(demand(vec![
                // C2 has no outgoing links.
                trip("stuck", "C2", "C0", 0.0),
                trip("fine", "C0", "C1", 10.0),
            ]))
            .build()
            .unwrap();

        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        assert_eq!(sim.travelers().unservable_count(), 1);
        assert_eq!(sim.travelers().arrived_count(), 1);
        assert_eq!(rec.departures, ["fine"]);
    }

    #[test]
    fn same_origin_and_destination_arrives_immediately() {
        let mut sim = SupervisorBuilder::new(corridor(), config(20.0))
            .demand(demand(vec![trip("lazy", "C1", "C1", 0.0)]))
            .build()
            .unwrap();

        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        assert_eq!(rec.arrivals.len(), 1);
        assert_eq!(sim.travelers().arrived_count(), 1);
        // No vehicle was ever spawned.
        assert!(sim.fleet().is_empty());
    }

    #[test]
    fn stepping_a_terminated_run_is_rejected() {
        let mut sim = SupervisorBuilder::new(corridor(), config(20.0))
            .demand(demand(vec![]))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        assert!(matches!(sim.step(&mut rec), Err(SimError::InvalidState(_))));
        assert!(matches!(sim.run(&mut rec), Err(SimError::InvalidState(_))));
    }

    #[test]
    fn identical_seeds_produce_identical_runs() {
        let outcome = || {
            let mut sim = SupervisorBuilder::new(corridor(), config(100.0))
                .demand(demand(vec![
                    trip("a", "C0", "C2", 0.0),
                    trip("b", "C0", "C1", 12.0),
                    trip("c", "C1", "C2", 31.0),
                ]))
                .decision(Box::new(crate::LogitDecision::new(0.1, 2)))
                .build()
                .unwrap();
            let mut rec = Recorder::default();
            sim.run(&mut rec).unwrap();
            rec.arrivals
        };
        assert_eq!(outcome(), outcome());
    }
}

// ── Congestion coupling ───────────────────────────────────────────────────────

#[cfg(test)]
mod congestion {
    use mm_core::{Mode, Point};
    use mm_flow::{FlowMotor, Reservoir, ThreeParamMfd};
    use mm_graph::{LayerBuilder, MultiLayerGraph, RoadDescriptor};

    use crate::{SupervisorBuilder, TravelerState};

    use super::helpers::{config, demand, trip, Recorder};

    /// One-link corridor where a tiny MFD jams as soon as a handful of cars
    /// are inside.
    #[test]
    fn accumulation_rises_during_transit_and_empties_after() {
        let mut graph = MultiLayerGraph::new(RoadDescriptor::empty());
        let mut car = LayerBuilder::new("car", Mode::Car).free_flow_speed(10.0);
        car.add_node("C0", Point::new(0.0, 0.0)).unwrap();
        car.add_node("C1", Point::new(100.0, 0.0)).unwrap();
        car.add_link("C0_C1", "C0", "C1", 100.0, vec![]).unwrap();
        graph.add_layer(car.build()).unwrap();
        let link = graph.link_by_name("C0_C1").unwrap();

        let mut motor = FlowMotor::new();
        let mfd = ThreeParamMfd::new(50.0, 200.0, 500.0).unwrap();
        let zone = motor.add_reservoir(Reservoir::new("Z", vec![link], Box::new(mfd))).unwrap();

        let mut sim = SupervisorBuilder::new(graph, config(100.0))
            .flow_motor(motor)
            .demand(demand(vec![trip("a", "C0", "C1", 0.0)]))
            .build()
            .unwrap();

        let mut rec = Recorder::default();
        // Tick 0: departure puts the car inside the reservoir, and the link
        // is fully traversed within the same 10 s tick.
        sim.step(&mut rec).unwrap();
        assert_eq!(sim.motor().reservoir(zone).accumulation().total_vehicular(), 0.0);
        assert_eq!(sim.travelers().iter().next().unwrap().state(), TravelerState::Arrived {
            at_secs: 10.0
        });
    }
}
