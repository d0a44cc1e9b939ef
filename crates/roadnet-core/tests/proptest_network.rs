//! Property-based tests for the road network engine.
//!
//! Uses proptest to generate small random networks and operation sequences,
//! then checks structural invariants, atomicity of failed operations, and
//! route optimality against a brute-force enumeration of simple paths.

use roadnet_core::network::RoadNetwork;
use roadnet_core::test_utils::*;
use proptest::prelude::*;
use std::collections::HashMap;

const CITIES: usize = 6;

fn name(index: usize) -> String {
    format!("c{index}")
}

// ===========================================================================
// Generators
// ===========================================================================

/// Random roads over `CITIES` cities with short lengths and few distinct
/// years, so ties are common. Self-loops and duplicates are skipped.
fn arb_network() -> impl Strategy<Value = RoadNetwork> {
    proptest::collection::vec((0..CITIES, 0..CITIES, 1..5u32, 1..4i32), 1..14).prop_map(
        |roads| {
            let mut net = RoadNetwork::new();
            for (a, b, length, year) in roads {
                let _ = net.add_road(&name(a), &name(b), length, year);
            }
            net
        },
    )
}

#[derive(Debug, Clone)]
enum Op {
    AddRoad(usize, usize, u32, i32),
    Repair(usize, usize, i32),
    RemoveRoad(usize, usize),
    NewRoute(u32, usize, usize),
    Extend(u32, usize),
    RemoveRoute(u32),
}

fn arb_ops(max_ops: usize) -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(
        prop_oneof![
            (0..CITIES, 0..CITIES, 1..5u32, 1..4i32)
                .prop_map(|(a, b, l, y)| Op::AddRoad(a, b, l, y)),
            (0..CITIES, 0..CITIES, 1..6i32).prop_map(|(a, b, y)| Op::Repair(a, b, y)),
            (0..CITIES, 0..CITIES).prop_map(|(a, b)| Op::RemoveRoad(a, b)),
            (1..4u32, 0..CITIES, 0..CITIES).prop_map(|(id, a, b)| Op::NewRoute(id, a, b)),
            (1..4u32, 0..CITIES).prop_map(|(id, c)| Op::Extend(id, c)),
            (1..4u32).prop_map(Op::RemoveRoute),
        ],
        1..=max_ops,
    )
}

fn apply(net: &mut RoadNetwork, op: &Op) -> bool {
    match *op {
        Op::AddRoad(a, b, l, y) => net.add_road(&name(a), &name(b), l, y).is_ok(),
        Op::Repair(a, b, y) => net.repair_road(&name(a), &name(b), y).is_ok(),
        Op::RemoveRoad(a, b) => net.remove_road(&name(a), &name(b)).is_ok(),
        Op::NewRoute(id, a, b) => net.new_route(route_id(id), &name(a), &name(b)).is_ok(),
        Op::Extend(id, c) => net.extend_route(route_id(id), &name(c)).is_ok(),
        Op::RemoveRoute(id) => net.remove_route(route_id(id)).is_ok(),
    }
}

// ===========================================================================
// Brute-force oracle
// ===========================================================================

/// Best `(length, min_year)` over all simple paths and how many paths
/// achieve it. `None` if no path exists.
fn best_simple_path(net: &RoadNetwork, from: &str, to: &str) -> Option<((u64, i32), usize)> {
    let mut adjacency: HashMap<String, Vec<(String, u32, i32)>> = HashMap::new();
    for road in net.summary().roads {
        let [a, b] = road.cities;
        adjacency
            .entry(a.clone())
            .or_default()
            .push((b.clone(), road.length, road.year));
        adjacency.entry(b).or_default().push((a, road.length, road.year));
    }

    let mut best: Option<((u64, i32), usize)> = None;
    let mut visited = vec![from.to_owned()];
    walk(&adjacency, to, &mut visited, 0, i32::MAX, &mut best);
    best
}

fn walk(
    adjacency: &HashMap<String, Vec<(String, u32, i32)>>,
    to: &str,
    visited: &mut Vec<String>,
    length: u64,
    year: i32,
    best: &mut Option<((u64, i32), usize)>,
) {
    let Some(here) = visited.last().cloned() else {
        return;
    };
    if here == to {
        let key = (length, year);
        *best = match *best {
            None => Some((key, 1)),
            Some((current, count)) => {
                let better = key.0 < current.0 || (key.0 == current.0 && key.1 > current.1);
                if better {
                    Some((key, 1))
                } else if key == current {
                    Some((current, count + 1))
                } else {
                    Some((current, count))
                }
            }
        };
        return;
    }
    for (next, l, y) in adjacency.get(&here).into_iter().flatten() {
        if visited.contains(next) {
            continue;
        }
        visited.push(next.clone());
        walk(adjacency, to, visited, length + u64::from(*l), year.min(*y), best);
        visited.pop();
    }
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A created route is optimal, and a unique optimum is always found.
    #[test]
    fn new_route_matches_brute_force(
        net in arb_network(),
        from in 0..CITIES,
        to in 0..CITIES,
    ) {
        prop_assume!(from != to);
        let mut net = net;
        let (a, b) = (name(from), name(to));
        let oracle = if net.graph().city(&a).is_some() && net.graph().city(&b).is_some() {
            best_simple_path(&net, &a, &b)
        } else {
            None
        };
        let outcome = net.new_route(route_id(1), &a, &b);

        match oracle {
            None => prop_assert!(outcome.is_err()),
            Some(((length, year), count)) => {
                if count == 1 {
                    prop_assert!(outcome.is_ok(), "unique optimum not found: {:?}", outcome);
                }
                if outcome.is_ok() {
                    let route = net.route(route_id(1)).unwrap();
                    prop_assert_eq!(route.length(), length);
                    prop_assert_eq!(route.min_year(), year);
                }
            }
        }
        assert_valid(&net);
    }

    /// Random operation sequences never break invariants, and every failed
    /// operation leaves the network exactly as it was.
    #[test]
    fn operations_preserve_invariants(net in arb_network(), ops in arb_ops(30)) {
        let mut net = net;
        for op in &ops {
            let before = net.summary();
            if !apply(&mut net, op) {
                prop_assert_eq!(&net.summary(), &before, "failed {:?} changed the network", op);
            }
            assert_valid(&net);
        }
    }

    /// Every stored route re-ingests into an empty network unchanged.
    #[test]
    fn descriptions_reingest(net in arb_network(), ops in arb_ops(20)) {
        let mut net = net;
        for op in &ops {
            apply(&mut net, op);
        }
        for (id, _) in net.routes().iter() {
            let text = net.describe_route(u32::from(id));
            let mut fresh = RoadNetwork::new();
            prop_assert!(fresh.ingest_route_text(&text).is_ok(), "{}", text);
            prop_assert_eq!(fresh.describe_route(u32::from(id)), text);
        }
    }
}
