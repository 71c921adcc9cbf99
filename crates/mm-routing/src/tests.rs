//! Unit tests for mm-routing.
//!
//! Fixtures are hand-crafted via the mm-graph builders; costs are chosen so
//! expected totals are exact in f64.

#[cfg(test)]
mod helpers {
    use mm_core::{Mode, NodeIndex, Point};
    use mm_graph::{LayerBuilder, MultiLayerGraph, RoadDescriptor};

    /// Single-mode diamond with a shortcut:
    ///
    /// ```text
    ///   A ──10── B ──10── D
    ///   │        │        │
    ///   └──15── C ───10───┘
    ///            ↑ B──2──C
    /// ```
    ///
    /// Travel times (free-flow speed 10 m/s): A→D candidates are
    /// A-B-D = 20, A-B-C-D = 22, A-C-D = 25.
    pub fn diamond() -> (MultiLayerGraph, [NodeIndex; 4]) {
        let mut graph = MultiLayerGraph::new(RoadDescriptor::empty());
        let mut car = LayerBuilder::new("car", Mode::Car).free_flow_speed(10.0);
        car.add_node("A", Point::new(0.0, 0.0)).unwrap();
        car.add_node("B", Point::new(100.0, 0.0)).unwrap();
        car.add_node("C", Point::new(100.0, 50.0)).unwrap();
        car.add_node("D", Point::new(200.0, 0.0)).unwrap();
        car.add_link("A_B", "A", "B", 100.0, vec![]).unwrap();
        car.add_link("B_D", "B", "D", 100.0, vec![]).unwrap();
        car.add_link("A_C", "A", "C", 150.0, vec![]).unwrap();
        car.add_link("C_D", "C", "D", 100.0, vec![]).unwrap();
        car.add_link("B_C", "B", "C", 20.0, vec![]).unwrap();
        graph.add_layer(car.build()).unwrap();

        let ids = [
            graph.node_by_name("A").unwrap(),
            graph.node_by_name("B").unwrap(),
            graph.node_by_name("C").unwrap(),
            graph.node_by_name("D").unwrap(),
        ];
        (graph, ids)
    }

    /// Two-layer corridor: a labeled car path and a labeled bus path between
    /// the same endpoints, joined by unlabeled transfer links.
    ///
    /// Car: C0 →(10)→ C1 →(10)→ C2, label `personal_car`.
    /// Bus: B0 →(40)→ B1, label `bus_line`.
    /// Transfers: C0→B0 (5 s), B1→C2 (5 s).
    pub fn two_mode_corridor() -> MultiLayerGraph {
        let mut graph = MultiLayerGraph::new(RoadDescriptor::empty());

        let mut car = LayerBuilder::new("car", Mode::Car).free_flow_speed(10.0);
        car.add_service("personal_car");
        car.add_node("C0", Point::new(0.0, 0.0)).unwrap();
        car.add_node("C1", Point::new(100.0, 0.0)).unwrap();
        car.add_node("C2", Point::new(200.0, 0.0)).unwrap();
        car.add_link("C0_C1", "C0", "C1", 100.0, vec![]).unwrap();
        car.add_link("C1_C2", "C1", "C2", 100.0, vec![]).unwrap();
        graph.add_layer(car.build()).unwrap();

        let mut bus = LayerBuilder::new("bus", Mode::Bus).free_flow_speed(5.0);
        bus.add_service("bus_line");
        bus.add_node("B0", Point::new(0.0, 5.0)).unwrap();
        bus.add_node("B1", Point::new(200.0, 5.0)).unwrap();
        bus.add_link("B0_B1", "B0", "B1", 200.0, vec![]).unwrap();
        graph.add_layer(bus.build()).unwrap();

        graph.connect("C0", "B0", 5.0).unwrap();
        graph.connect("B1", "C2", 5.0).unwrap();
        graph
    }
}

// ── Single queries ────────────────────────────────────────────────────────────

#[cfg(test)]
mod single {
    use mm_core::{Mode, Point};
    use mm_graph::{cost, LabelSet, LayerBuilder, MultiLayerGraph, RoadDescriptor};

    use crate::{shortest_path, RoutingError};

    use super::helpers::{diamond, two_mode_corridor};

    #[test]
    fn one_link_network() {
        // 100 m link at 10 m/s ⇒ travel time 10 s.
        let mut graph = MultiLayerGraph::new(RoadDescriptor::empty());
        let mut car = LayerBuilder::new("car", Mode::Car).free_flow_speed(10.0);
        car.add_node("U", Point::new(0.0, 0.0)).unwrap();
        car.add_node("V", Point::new(100.0, 0.0)).unwrap();
        car.add_link("U_V", "U", "V", 100.0, vec![]).unwrap();
        graph.add_layer(car.build()).unwrap();

        let u = graph.node_by_name("U").unwrap();
        let v = graph.node_by_name("V").unwrap();
        let path = shortest_path(&graph, u, v, cost::TRAVEL_TIME, LabelSet::EMPTY).unwrap();
        assert_eq!(path.cost, 10.0);
        assert_eq!(path.links, vec![graph.link_by_name("U_V").unwrap()]);
    }

    #[test]
    fn disconnected_pair_is_typed_failure() {
        let mut graph = MultiLayerGraph::new(RoadDescriptor::empty());
        let mut car = LayerBuilder::new("car", Mode::Car);
        car.add_node("U", Point::new(0.0, 0.0)).unwrap();
        car.add_node("V", Point::new(100.0, 0.0)).unwrap();
        graph.add_layer(car.build()).unwrap();

        let u = graph.node_by_name("U").unwrap();
        let v = graph.node_by_name("V").unwrap();
        let err = shortest_path(&graph, u, v, cost::TRAVEL_TIME, LabelSet::EMPTY).unwrap_err();
        assert!(matches!(err, RoutingError::PathNotFound { .. }));
    }

    #[test]
    fn trivial_query_is_empty_path() {
        let (graph, [a, ..]) = diamond();
        let path = shortest_path(&graph, a, a, cost::TRAVEL_TIME, LabelSet::EMPTY).unwrap();
        assert!(path.is_trivial());
        assert_eq!(path.cost, 0.0);
    }

    #[test]
    fn diamond_shortest() {
        let (graph, [a, _, _, d]) = diamond();
        let path = shortest_path(&graph, a, d, cost::TRAVEL_TIME, LabelSet::EMPTY).unwrap();
        assert_eq!(path.cost, 20.0);
        let names: Vec<_> = path.links.iter().map(|&l| graph.link_name(l)).collect();
        assert_eq!(names, ["A_B", "B_D"]);
    }

    #[test]
    fn cost_by_length_differs_from_time() {
        let (graph, [a, _, _, d]) = diamond();
        let by_len = shortest_path(&graph, a, d, cost::LENGTH, LabelSet::EMPTY).unwrap();
        assert_eq!(by_len.cost, 200.0); // A-B-D, 100 + 100
    }

    #[test]
    fn unknown_cost_name_is_graph_error() {
        let (graph, [a, _, _, d]) = diamond();
        assert!(matches!(
            shortest_path(&graph, a, d, "bogus", LabelSet::EMPTY),
            Err(RoutingError::Graph(_))
        ));
    }

    #[test]
    fn label_restriction_is_monotone() {
        let graph = two_mode_corridor();
        let o = graph.node_by_name("C0").unwrap();
        let d = graph.node_by_name("C2").unwrap();

        // Unrestricted: drives straight through, 20 s.
        let free = shortest_path(&graph, o, d, cost::TRAVEL_TIME, LabelSet::EMPTY).unwrap();
        assert_eq!(free.cost, 20.0);

        // Bus-only traveler: transfer + 40 s ride + transfer = 50 s.
        let bus = shortest_path(&graph, o, d, cost::TRAVEL_TIME, graph.label_set(&["bus_line"])).unwrap();
        assert_eq!(bus.cost, 50.0);
        assert!(bus.cost >= free.cost);
    }
}

// ── Tie-breaking ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tie_break {
    use mm_core::{Mode, Point};
    use mm_graph::{cost, LabelSet, LayerBuilder, MultiLayerGraph, RoadDescriptor};

    use crate::shortest_path;

    /// Equal-cost paths with different hop counts: A→D direct (20 s, 1 hop)
    /// vs A→B→D (20 s, 2 hops).  Fewer hops must win.
    #[test]
    fn fewer_hops_wins_on_equal_cost() {
        let mut graph = MultiLayerGraph::new(RoadDescriptor::empty());
        let mut car = LayerBuilder::new("car", Mode::Car).free_flow_speed(10.0);
        car.add_node("A", Point::new(0.0, 0.0)).unwrap();
        car.add_node("B", Point::new(100.0, 0.0)).unwrap();
        car.add_node("D", Point::new(200.0, 0.0)).unwrap();
        car.add_link("A_B", "A", "B", 100.0, vec![]).unwrap();
        car.add_link("B_D", "B", "D", 100.0, vec![]).unwrap();
        car.add_link("A_D", "A", "D", 200.0, vec![]).unwrap();
        graph.add_layer(car.build()).unwrap();

        let a = graph.node_by_name("A").unwrap();
        let d = graph.node_by_name("D").unwrap();
        let path = shortest_path(&graph, a, d, cost::TRAVEL_TIME, LabelSet::EMPTY).unwrap();
        assert_eq!(path.cost, 20.0);
        assert_eq!(path.links, vec![graph.link_by_name("A_D").unwrap()]);
    }

    /// Two 2-hop paths of identical cost through different middles: the
    /// link-index-lexicographically smaller sequence must be returned, and
    /// repeatedly so.
    #[test]
    fn lexicographic_link_order_breaks_remaining_ties() {
        let mut graph = MultiLayerGraph::new(RoadDescriptor::empty());
        let mut car = LayerBuilder::new("car", Mode::Car).free_flow_speed(10.0);
        car.add_node("A", Point::new(0.0, 0.0)).unwrap();
        car.add_node("M1", Point::new(100.0, 10.0)).unwrap();
        car.add_node("M2", Point::new(100.0, -10.0)).unwrap();
        car.add_node("D", Point::new(200.0, 0.0)).unwrap();
        // Insertion order assigns ascending link indices.
        car.add_link("A_M1", "A", "M1", 100.0, vec![]).unwrap();
        car.add_link("M1_D", "M1", "D", 100.0, vec![]).unwrap();
        car.add_link("A_M2", "A", "M2", 100.0, vec![]).unwrap();
        car.add_link("M2_D", "M2", "D", 100.0, vec![]).unwrap();
        graph.add_layer(car.build()).unwrap();

        let a = graph.node_by_name("A").unwrap();
        let d = graph.node_by_name("D").unwrap();
        for _ in 0..4 {
            let path = shortest_path(&graph, a, d, cost::TRAVEL_TIME, LabelSet::EMPTY).unwrap();
            let names: Vec<_> = path.links.iter().map(|&l| graph.link_name(l)).collect();
            assert_eq!(names, ["A_M1", "M1_D"]);
        }
    }

    /// Sequences must be compared from the first link, not the last.  The
    /// insertion order makes the paths [A_M1, M1_D] = [3, 0] and
    /// [A_M2, M2_D] = [1, 2]: picking the smaller incoming link at D would
    /// return [3, 0], but [1, 2] orders first.
    #[test]
    fn lexicographic_order_starts_at_the_first_link() {
        let mut graph = MultiLayerGraph::new(RoadDescriptor::empty());
        let mut car = LayerBuilder::new("car", Mode::Car).free_flow_speed(10.0);
        car.add_node("A", Point::new(0.0, 0.0)).unwrap();
        car.add_node("M1", Point::new(100.0, 10.0)).unwrap();
        car.add_node("M2", Point::new(100.0, -10.0)).unwrap();
        car.add_node("D", Point::new(200.0, 0.0)).unwrap();
        car.add_link("M1_D", "M1", "D", 100.0, vec![]).unwrap();
        car.add_link("A_M2", "A", "M2", 100.0, vec![]).unwrap();
        car.add_link("M2_D", "M2", "D", 100.0, vec![]).unwrap();
        car.add_link("A_M1", "A", "M1", 100.0, vec![]).unwrap();
        graph.add_layer(car.build()).unwrap();

        let a = graph.node_by_name("A").unwrap();
        let d = graph.node_by_name("D").unwrap();
        let path = shortest_path(&graph, a, d, cost::TRAVEL_TIME, LabelSet::EMPTY).unwrap();
        let names: Vec<_> = path.links.iter().map(|&l| graph.link_name(l)).collect();
        assert_eq!(names, ["A_M2", "M2_D"]);
    }
}

// ── A* ────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod astar {
    use mm_graph::{cost, LabelSet};

    use crate::{astar_shortest_path, shortest_path, RoutingError};

    use super::helpers::diamond;

    #[test]
    fn agrees_with_dijkstra_under_admissible_bound() {
        let (graph, [a, _, _, d]) = diamond();
        // 10 m/s is the fastest speed anywhere in the fixture.
        let astar = astar_shortest_path(&graph, a, d, cost::TRAVEL_TIME, LabelSet::EMPTY, 10.0).unwrap();
        let dijkstra = shortest_path(&graph, a, d, cost::TRAVEL_TIME, LabelSet::EMPTY).unwrap();
        assert_eq!(astar.cost, dijkstra.cost);
        assert_eq!(astar.links, dijkstra.links);
    }

    #[test]
    fn unreachable_is_path_not_found() {
        let (graph, [a, ..]) = diamond();
        // No link enters A, so nothing reaches it from D's side... but A→A
        // is trivial; query B→A instead (diamond is one-directional).
        let b = graph.node_by_name("B").unwrap();
        assert!(matches!(
            astar_shortest_path(&graph, b, a, cost::TRAVEL_TIME, LabelSet::EMPTY, 10.0),
            Err(RoutingError::PathNotFound { .. })
        ));
    }
}

// ── k-shortest paths ──────────────────────────────────────────────────────────

#[cfg(test)]
mod ksp {
    use mm_graph::{cost, LabelSet};

    use crate::{k_shortest_paths, shortest_path};

    use super::helpers::diamond;

    #[test]
    fn ordered_unique_and_first_equals_shortest() {
        let (graph, [a, _, _, d]) = diamond();
        let paths = k_shortest_paths(&graph, a, d, cost::TRAVEL_TIME, LabelSet::EMPTY, 3, 0).unwrap();
        assert_eq!(paths.len(), 3);

        // Non-decreasing cost, no duplicate link sequences.
        assert_eq!(paths[0].cost, 20.0);
        assert_eq!(paths[1].cost, 22.0);
        assert_eq!(paths[2].cost, 25.0);
        assert_ne!(paths[0].links, paths[1].links);
        assert_ne!(paths[1].links, paths[2].links);

        let first = shortest_path(&graph, a, d, cost::TRAVEL_TIME, LabelSet::EMPTY).unwrap();
        assert_eq!(paths[0].links, first.links);
        assert_eq!(paths[0].cost, first.cost);
    }

    #[test]
    fn exhausted_pool_returns_fewer_than_k() {
        let (graph, [a, _, _, d]) = diamond();
        let paths = k_shortest_paths(&graph, a, d, cost::TRAVEL_TIME, LabelSet::EMPTY, 10, 0).unwrap();
        // Only three simple paths exist in the diamond.
        assert_eq!(paths.len(), 3);
    }

    #[test]
    fn k_one_is_just_the_shortest() {
        let (graph, [a, _, _, d]) = diamond();
        let paths = k_shortest_paths(&graph, a, d, cost::TRAVEL_TIME, LabelSet::EMPTY, 1, 0).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].cost, 20.0);
    }
}

// ── Parallel batch ────────────────────────────────────────────────────────────

#[cfg(test)]
mod batch {
    use mm_core::{Mode, Point, SimRng};
    use mm_graph::{cost, LabelSet, LayerBuilder, MultiLayerGraph, RoadDescriptor};

    use crate::{parallel_shortest_paths, shortest_path, PathRequest, RoutingError};

    use super::helpers::diamond;

    #[test]
    fn batch_matches_serial_per_index() {
        let (graph, nodes) = diamond();

        // All ordered pairs, repeated to get a decently sized batch.
        let mut requests = Vec::new();
        for _ in 0..50 {
            for &o in &nodes {
                for &d in &nodes {
                    requests.push(PathRequest { origin: o, destination: d, labels: LabelSet::EMPTY });
                }
            }
        }

        let parallel =
            parallel_shortest_paths(&graph, &requests, cost::TRAVEL_TIME, Some(4)).unwrap();
        assert_eq!(parallel.len(), requests.len());

        for (q, result) in requests.iter().zip(&parallel) {
            let serial = shortest_path(&graph, q.origin, q.destination, cost::TRAVEL_TIME, q.labels);
            match (result, serial) {
                (Ok(p), Ok(s)) => {
                    assert_eq!(p.cost, s.cost);
                    assert_eq!(p.links, s.links);
                }
                (Err(RoutingError::PathNotFound { .. }), Err(RoutingError::PathNotFound { .. })) => {}
                (a, b) => panic!("parallel/serial disagree: {a:?} vs {b:?}"),
            }
        }
    }

    /// A batch of 20 000 random queries over a one-way grid, so the set
    /// covers reachable and unreachable pairs alike.
    #[test]
    fn large_random_batch_matches_serial() {
        let side = 15usize;
        let mut graph = MultiLayerGraph::new(RoadDescriptor::empty());
        let mut car = LayerBuilder::new("car", Mode::Car).free_flow_speed(10.0);
        for r in 0..side {
            for c in 0..side {
                let name = format!("N{r}_{c}");
                car.add_node(&name, Point::new(c as f64 * 100.0, r as f64 * 100.0)).unwrap();
            }
        }
        // Rightward and downward links only, with lengths varied so most
        // equal-hop pairs still differ in cost.
        for r in 0..side {
            for c in 0..side {
                let length = 100.0 + ((r * 31 + c * 17) % 7) as f64 * 10.0;
                if c + 1 < side {
                    let link = format!("R{r}_{c}");
                    car.add_link(&link, &format!("N{r}_{c}"), &format!("N{r}_{}", c + 1), length, vec![])
                        .unwrap();
                }
                if r + 1 < side {
                    let link = format!("D{r}_{c}");
                    car.add_link(&link, &format!("N{r}_{c}"), &format!("N{}_{c}", r + 1), length, vec![])
                        .unwrap();
                }
            }
        }
        graph.add_layer(car.build()).unwrap();

        let mut rng = SimRng::new(4242);
        let node = |rng: &mut SimRng, g: &MultiLayerGraph| {
            let r = rng.gen_range(0..side);
            let c = rng.gen_range(0..side);
            g.node_by_name(&format!("N{r}_{c}")).unwrap()
        };
        let requests: Vec<PathRequest> = (0..20_000)
            .map(|_| PathRequest {
                origin: node(&mut rng, &graph),
                destination: node(&mut rng, &graph),
                labels: LabelSet::EMPTY,
            })
            .collect();

        let parallel =
            parallel_shortest_paths(&graph, &requests, cost::TRAVEL_TIME, None).unwrap();
        assert_eq!(parallel.len(), requests.len());

        for (q, result) in requests.iter().zip(&parallel) {
            let serial = shortest_path(&graph, q.origin, q.destination, cost::TRAVEL_TIME, q.labels);
            match (result, serial) {
                (Ok(p), Ok(s)) => {
                    assert_eq!(p.cost, s.cost);
                    assert_eq!(p.links, s.links);
                }
                (Err(RoutingError::PathNotFound { .. }), Err(RoutingError::PathNotFound { .. })) => {}
                (a, b) => panic!("parallel/serial disagree: {a:?} vs {b:?}"),
            }
        }
    }

    #[test]
    fn one_failure_does_not_abort_the_batch() {
        let (graph, [a, b, _, d]) = diamond();
        let requests = [
            PathRequest { origin: a, destination: d, labels: LabelSet::EMPTY },
            // B cannot reach A in the one-directional diamond.
            PathRequest { origin: b, destination: a, labels: LabelSet::EMPTY },
            PathRequest { origin: a, destination: b, labels: LabelSet::EMPTY },
        ];
        let results =
            parallel_shortest_paths(&graph, &requests, cost::TRAVEL_TIME, None).unwrap();
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(RoutingError::PathNotFound { .. })));
        assert!(results[2].is_ok());
    }
}
