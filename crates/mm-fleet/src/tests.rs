//! Unit tests for mm-fleet.

#[cfg(test)]
mod helpers {
    use mm_core::{LinkIndex, Mode, Point, ReservoirIndex};
    use mm_flow::{FlowMotor, Reservoir, ThreeParamMfd};
    use mm_graph::{LayerBuilder, MultiLayerGraph, RoadDescriptor};

    use crate::RouteLeg;

    /// Three-link car corridor (100 m each at 10 m/s) with the first two
    /// links in reservoir "A" and the third in reservoir "B".
    pub fn corridor() -> (MultiLayerGraph, FlowMotor, [ReservoirIndex; 2], Vec<RouteLeg>) {
        let mut graph = MultiLayerGraph::new(RoadDescriptor::empty());
        let mut car = LayerBuilder::new("car", Mode::Car).free_flow_speed(10.0);
        for (i, x) in [0.0, 100.0, 200.0, 300.0].iter().enumerate() {
            car.add_node(&format!("C{i}"), Point::new(*x, 0.0)).unwrap();
        }
        car.add_link("C0_C1", "C0", "C1", 100.0, vec![]).unwrap();
        car.add_link("C1_C2", "C1", "C2", 100.0, vec![]).unwrap();
        car.add_link("C2_C3", "C2", "C3", 100.0, vec![]).unwrap();
        graph.add_layer(car.build()).unwrap();

        let l0 = graph.link_by_name("C0_C1").unwrap();
        let l1 = graph.link_by_name("C1_C2").unwrap();
        let l2 = graph.link_by_name("C2_C3").unwrap();

        let mfd = || Box::new(ThreeParamMfd::new(50.0, 200.0, 500.0).unwrap());
        let mut motor = FlowMotor::new();
        let a = motor.add_reservoir(Reservoir::new("A", vec![l0, l1], mfd())).unwrap();
        let b = motor.add_reservoir(Reservoir::new("B", vec![l2], mfd())).unwrap();

        let route = route_over(&motor, &[l0, l1, l2]);
        (graph, motor, [a, b], route)
    }

    pub fn route_over(motor: &FlowMotor, links: &[LinkIndex]) -> Vec<RouteLeg> {
        links
            .iter()
            .map(|&link| RouteLeg {
                link,
                length: 100.0,
                reservoir: motor.reservoir_for_link(link),
            })
            .collect()
    }
}

// ── Vehicle lifecycle ─────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use mm_core::{Mode, VehicleIndex};

    use crate::{FleetError, VehicleFleet, VehicleState};

    use super::helpers::corridor;

    #[test]
    fn spawn_assign_complete() {
        let (graph, mut motor, [a, b], route) = corridor();
        let mut fleet = VehicleFleet::new();
        let car = fleet.spawn(Mode::Car, 4);
        assert_eq!(fleet.vehicle(car).unwrap().state(), VehicleState::Created);

        fleet.assign_route(car, route, &mut motor).unwrap();
        assert_eq!(fleet.vehicle(car).unwrap().state(), VehicleState::EnRoute);
        assert_eq!(motor.reservoir(a).accumulation().get(Mode::Car), 1.0);

        // 100 m at 10 m/s per tick of 10 s: one leg per tick, three ticks.
        assert!(fleet.advance_all(10.0, &graph, &mut motor).is_empty());
        assert!(fleet.advance_all(10.0, &graph, &mut motor).is_empty());
        // Crossed from A into B after leg 2.
        assert_eq!(motor.reservoir(a).accumulation().get(Mode::Car), 0.0);
        assert_eq!(motor.reservoir(b).accumulation().get(Mode::Car), 1.0);

        let done = fleet.advance_all(10.0, &graph, &mut motor);
        assert_eq!(done, vec![car]);
        assert_eq!(fleet.vehicle(car).unwrap().state(), VehicleState::Completed);
        // Final exit: everything balanced back to zero.
        assert_eq!(motor.reservoir(a).accumulation().total_vehicular(), 0.0);
        assert_eq!(motor.reservoir(b).accumulation().total_vehicular(), 0.0);
    }

    #[test]
    fn partial_tick_advances_within_a_leg() {
        let (graph, mut motor, _, route) = corridor();
        let mut fleet = VehicleFleet::new();
        let car = fleet.spawn(Mode::Car, 4);
        fleet.assign_route(car, route, &mut motor).unwrap();

        fleet.advance_all(5.0, &graph, &mut motor);
        let v = fleet.vehicle(car).unwrap();
        assert_eq!(v.leg_position(), 50.0);
        assert_eq!(v.current_leg().unwrap().length, 100.0);
    }

    #[test]
    fn re_assigning_en_route_vehicle_is_rejected() {
        let (_, mut motor, _, route) = corridor();
        let mut fleet = VehicleFleet::new();
        let car = fleet.spawn(Mode::Car, 4);
        fleet.assign_route(car, route.clone(), &mut motor).unwrap();
        assert!(matches!(
            fleet.assign_route(car, route, &mut motor),
            Err(FleetError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn empty_route_is_rejected() {
        let (_, mut motor, _, _) = corridor();
        let mut fleet = VehicleFleet::new();
        let car = fleet.spawn(Mode::Car, 4);
        assert!(matches!(
            fleet.assign_route(car, vec![], &mut motor),
            Err(FleetError::EmptyRoute(_))
        ));
        assert_eq!(fleet.vehicle(car).unwrap().state(), VehicleState::Created);
    }

    #[test]
    fn park_only_from_created_or_completed() {
        let (_, mut motor, _, route) = corridor();
        let mut fleet = VehicleFleet::new();
        let idle = fleet.spawn(Mode::Car, 4);
        fleet.park(idle).unwrap();
        assert_eq!(fleet.vehicle(idle).unwrap().state(), VehicleState::Parked);

        let moving = fleet.spawn(Mode::Car, 4);
        fleet.assign_route(moving, route, &mut motor).unwrap();
        assert!(matches!(fleet.park(moving), Err(FleetError::InvalidTransition { .. })));
    }

    #[test]
    fn unknown_vehicle_is_typed_failure() {
        let fleet = VehicleFleet::new();
        assert!(matches!(
            fleet.vehicle(VehicleIndex(42)),
            Err(FleetError::VehicleNotFound(VehicleIndex(42)))
        ));
    }
}

// ── Passengers ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod passengers {
    use mm_core::{Mode, TravelerIndex};

    use crate::{FleetError, VehicleFleet};

    #[test]
    fn board_up_to_capacity() {
        let mut fleet = VehicleFleet::new();
        let bus = fleet.spawn(Mode::Bus, 2);
        fleet.board(bus, TravelerIndex(0)).unwrap();
        fleet.board(bus, TravelerIndex(1)).unwrap();
        assert!(matches!(
            fleet.board(bus, TravelerIndex(2)),
            Err(FleetError::VehicleFull { capacity: 2, .. })
        ));
        assert_eq!(fleet.vehicle(bus).unwrap().occupancy(), 2);

        fleet.alight(bus, TravelerIndex(0)).unwrap();
        fleet.board(bus, TravelerIndex(2)).unwrap();
        assert_eq!(fleet.vehicle(bus).unwrap().occupancy(), 2);
    }
}

// ── Depot ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod depot {
    use mm_core::{Tick, VehicleIndex};

    use crate::{Depot, FleetError};

    #[test]
    fn fifo_order_with_enqueue_ticks() {
        let mut depot = Depot::new("D", 4);
        depot.add_vehicle(VehicleIndex(3), Tick(10)).unwrap();
        depot.add_vehicle(VehicleIndex(1), Tick(11)).unwrap();
        depot.add_vehicle(VehicleIndex(2), Tick(12)).unwrap();

        assert_eq!(depot.get_first_vehicle(), Some((VehicleIndex(3), Tick(10))));
        assert_eq!(depot.pop_first(), Some((VehicleIndex(3), Tick(10))));
        assert_eq!(depot.pop_first(), Some((VehicleIndex(1), Tick(11))));
        assert_eq!(depot.pop_first(), Some((VehicleIndex(2), Tick(12))));
        assert_eq!(depot.pop_first(), None);
    }

    #[test]
    fn duplicate_add_is_a_logged_no_op() {
        let mut depot = Depot::new("D", 4);
        assert!(depot.add_vehicle(VehicleIndex(7), Tick(0)).unwrap());
        assert!(!depot.add_vehicle(VehicleIndex(7), Tick(5)).unwrap());
        assert_eq!(depot.len(), 1);
        // The original enqueue tick is kept.
        assert_eq!(depot.get_first_vehicle(), Some((VehicleIndex(7), Tick(0))));
    }

    #[test]
    fn full_depot_rejects_and_keeps_queue_unchanged() {
        let mut depot = Depot::new("D", 2);
        depot.add_vehicle(VehicleIndex(0), Tick(0)).unwrap();
        depot.add_vehicle(VehicleIndex(1), Tick(1)).unwrap();
        assert!(matches!(
            depot.add_vehicle(VehicleIndex(2), Tick(2)),
            Err(FleetError::CapacityExceeded { capacity: 2, .. })
        ));
        assert_eq!(depot.len(), 2);
        assert!(!depot.contains(VehicleIndex(2)));
    }

    #[test]
    fn remove_by_identity_from_the_middle() {
        let mut depot = Depot::new("D", 4);
        depot.add_vehicle(VehicleIndex(0), Tick(0)).unwrap();
        depot.add_vehicle(VehicleIndex(1), Tick(1)).unwrap();
        depot.add_vehicle(VehicleIndex(2), Tick(2)).unwrap();

        assert_eq!(depot.remove_vehicle(VehicleIndex(1)).unwrap(), (VehicleIndex(1), Tick(1)));
        assert!(matches!(
            depot.remove_vehicle(VehicleIndex(1)),
            Err(FleetError::VehicleNotFound(_))
        ));
        // FIFO order of the remainder is preserved.
        assert_eq!(depot.pop_first(), Some((VehicleIndex(0), Tick(0))));
        assert_eq!(depot.pop_first(), Some((VehicleIndex(2), Tick(2))));
    }
}
