use proptest::prelude::*;
use seedcast::{
    plan, rank, select, select_candidates, CampaignConfig, CandidateConfig, CentralityWeights,
    CostTable, GraphBuilder, GreedyConfig, NodeId, SocialGraph, Termination,
};
use std::collections::HashSet;

fn graph_from_pairs(n: usize, pairs: &[(usize, usize)]) -> SocialGraph {
    let mut b = GraphBuilder::new();
    for i in 0..n {
        b.add_node(i as NodeId);
    }
    for &(a, c) in pairs {
        b.add_edge((a % n) as NodeId, (c % n) as NodeId);
    }
    b.build()
}

fn costs_from(n: usize, raw: &[f64]) -> CostTable {
    // Leave every third node out of the table so "free" nodes are always exercised.
    let entries: Vec<(NodeId, f64)> = (0..n)
        .filter(|i| i % 3 != 2)
        .map(|i| (i as NodeId, raw[i % raw.len()]))
        .collect();
    CostTable::from_entries(entries).unwrap()
}

/// Two dense communities joined by a single bridge node.
fn barbell() -> SocialGraph {
    let mut edges = Vec::new();
    for a in 0..5u64 {
        for b in (a + 1)..5 {
            edges.push((a, b));
            edges.push((a + 10, b + 10));
        }
    }
    edges.push((4, 99));
    edges.push((99, 10));
    SocialGraph::from_edges(edges)
}

#[test]
fn hubs_then_bridge_on_barbell() {
    let g = barbell();
    let ranked = rank(&g, CentralityWeights::default());
    let top: HashSet<NodeId> = ranked[..2].iter().map(|&(v, _)| g.id_of(v)).collect();
    // The community hubs touching the bridge lead; the bridge itself has the highest betweenness
    // and closeness but the lowest degree, and comes next.
    assert_eq!(top, HashSet::from([4, 10]));
    assert_eq!(g.id_of(ranked[2].0), 99);
}

#[test]
fn free_candidates_are_always_affordable() {
    let g = barbell();
    let costs = CostTable::from_entries(vec![(4, 1e9), (10, 1e9)]).unwrap();
    let cfg = CandidateConfig { top_n: 3, max_cost: 0.0, ..CandidateConfig::default() };
    let picked = select_candidates(&g, &costs, &cfg).unwrap();
    assert_eq!(picked.len(), 3);
    assert!(picked.iter().all(|&v| costs.cost(g.id_of(v)) == 0.0));
}

#[test]
fn end_to_end_runs_are_reproducible() {
    let g = barbell();
    let costs = CostTable::from_entries((0u64..15).map(|i| (i, 20.0 + i as f64))).unwrap();
    let mut cfg = CampaignConfig::default();
    cfg.greedy.budget = 80.0;
    cfg.greedy.iterations = 16;
    cfg.seed = 7;

    let a = plan(&g, &costs, &cfg).unwrap();
    let b = plan(&g, &costs, &cfg).unwrap();
    assert_eq!(a, b);
    assert!(a.selection.spent <= 80.0);
}

proptest! {
    // Property: scores in [0,1]; order non-increasing.
    #[test]
    fn prop_rank_scores_are_unit_and_sorted(
        n in 1usize..20,
        pairs in prop::collection::vec((0usize..20, 0usize..20), 0..50),
    ) {
        let g = graph_from_pairs(n, &pairs);
        let ranked = rank(&g, CentralityWeights::default());
        prop_assert_eq!(ranked.len(), n);
        for &(_, s) in &ranked {
            prop_assert!((0.0..=1.0 + 1e-12).contains(&s), "score {}", s);
        }
        for w in ranked.windows(2) {
            prop_assert!(w[0].1 >= w[1].1);
        }
    }

    // Property: every candidate is affordable, at most top_n, in ranking order.
    #[test]
    fn prop_candidates_filter_and_truncate(
        n in 1usize..20,
        pairs in prop::collection::vec((0usize..20, 0usize..20), 0..50),
        raw_costs in prop::collection::vec(0.0f64..500.0, 1..10),
        top_n in 0usize..12,
        max_cost in 0.0f64..500.0,
    ) {
        let g = graph_from_pairs(n, &pairs);
        let costs = costs_from(n, &raw_costs);
        let cfg = CandidateConfig { top_n, max_cost, weights: CentralityWeights::default() };
        let picked = select_candidates(&g, &costs, &cfg).unwrap();
        prop_assert!(picked.len() <= top_n);
        for &v in &picked {
            prop_assert!(costs.cost(g.id_of(v)) <= max_cost);
        }
        let ranked = rank(&g, cfg.weights);
        let position: Vec<usize> = picked
            .iter()
            .map(|&v| ranked.iter().position(|&(u, _)| u == v).unwrap())
            .collect();
        for w in position.windows(2) {
            prop_assert!(w[0] < w[1]);
        }
    }

    // Property: greedy output fits the budget, is a subset of the pool, and takes at most
    // |pool| rounds.
    #[test]
    fn prop_greedy_respects_budget(
        n in 1usize..14,
        pairs in prop::collection::vec((0usize..14, 0usize..14), 0..30),
        raw_costs in prop::collection::vec(0.0f64..100.0, 1..6),
        pool in prop::collection::vec(0usize..14, 0..10),
        budget in 0.0f64..200.0,
        seed in any::<u64>(),
    ) {
        let g = graph_from_pairs(n, &pairs);
        let costs = costs_from(n, &raw_costs);
        let pool: Vec<usize> = pool.into_iter().map(|v| v % n).collect();
        let cfg = GreedyConfig { budget, iterations: 3, seed, ..GreedyConfig::default() };
        let sel = select(&g, &pool, &costs, &cfg).unwrap();

        let distinct: HashSet<usize> = pool.iter().copied().collect();
        prop_assert!(sel.picks.len() <= distinct.len());
        prop_assert!(sel.spent <= budget);
        let mut running = 0.0;
        let mut seen = HashSet::new();
        for p in &sel.picks {
            prop_assert!(distinct.contains(&p.node));
            prop_assert!(seen.insert(p.node), "node {} committed twice", p.node);
            running += p.cost;
            prop_assert!(running <= budget);
            prop_assert!(p.normalized_gain > 0.0);
        }
        prop_assert!(matches!(
            sel.termination,
            Termination::NoPositiveGain | Termination::NoAffordableCandidate
        ));
    }
}
