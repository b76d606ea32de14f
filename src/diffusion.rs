//! Stochastic purchase diffusion.
//!
//! One round visits every non-purchaser `u` and converts it with probability
//! \(p = b / n\), where \(b\) is the number of purchasing neighbors and \(n\) the degree.
//!
//! Public invariants:
//! - The returned set is a superset of the input set (purchases are never revoked).
//! - Isolated nodes have \(p = 0\) and never convert.
//! - \(p = 0\) never converts, even on a draw of exactly `0.0`.
//! - Nodes are visited in ascending index order, one uniform draw per candidate with \(p > 0\).

use crate::graph::GraphRef;
use crate::set::NodeSet;
use rand::Rng;

/// Conversion probability for a node with `purchasing` of `degree` neighbors buying.
pub fn conversion_probability(purchasing: usize, degree: usize) -> f64 {
    if degree == 0 {
        return 0.0;
    }
    purchasing as f64 / degree as f64
}

/// Run a single diffusion round and return the new purchased set.
pub fn advance<G, R>(graph: &G, purchased: &NodeSet, rng: &mut R) -> NodeSet
where
    G: GraphRef + ?Sized,
    R: Rng + ?Sized,
{
    let mut next = purchased.clone();
    for u in 0..graph.node_count() {
        if purchased.contains(u) {
            continue;
        }
        let nbrs = graph.neighbors_ref(u);
        let p = conversion_probability(purchased.count_in(nbrs), nbrs.len());
        if p <= 0.0 {
            continue;
        }
        let r: f64 = rng.random();
        if p >= r {
            next.insert(u);
        }
    }
    next
}

/// Apply [`advance`] exactly `rounds` times starting from `seeds`.
pub fn run<G, R>(graph: &G, seeds: &NodeSet, rounds: usize, rng: &mut R) -> NodeSet
where
    G: GraphRef + ?Sized,
    R: Rng + ?Sized,
{
    let mut purchased = seeds.clone();
    for round in 1..=rounds {
        purchased = advance(graph, &purchased, rng);
        tracing::debug!(round, purchased = purchased.len(), "diffusion round");
    }
    purchased
}

/// Like [`run`], but keep every snapshot.
///
/// `trace[0]` is `seeds`, `trace[t]` the set after round `t`.
pub fn run_trace<G, R>(graph: &G, seeds: &NodeSet, rounds: usize, rng: &mut R) -> Vec<NodeSet>
where
    G: GraphRef + ?Sized,
    R: Rng + ?Sized,
{
    let mut trace = Vec::with_capacity(rounds + 1);
    trace.push(seeds.clone());
    for _ in 0..rounds {
        let next = advance(graph, &trace[trace.len() - 1], rng);
        trace.push(next);
    }
    trace
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, SocialGraph};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn probability_guards_isolated_nodes() {
        assert_eq!(conversion_probability(0, 0), 0.0);
        assert_eq!(conversion_probability(1, 2), 0.5);
        assert_eq!(conversion_probability(3, 3), 1.0);
    }

    #[test]
    fn fully_surrounded_node_always_converts() {
        // Star: the leaf's only neighbor is the purchasing hub, so p = 1.
        let g = SocialGraph::from_edges([(0, 1), (0, 2), (0, 3)]);
        let seeds = NodeSet::from_nodes(g.node_count(), [g.index_of(0).unwrap()]);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let next = advance(&g, &seeds, &mut rng);
        assert_eq!(next.len(), 4);
    }

    #[test]
    fn isolated_node_never_converts() {
        let mut b = GraphBuilder::new();
        b.add_edge(1, 2);
        b.add_node(3);
        let g = b.build();
        let lonely = g.index_of(3).unwrap();
        let seeds = NodeSet::from_nodes(g.node_count(), [g.index_of(1).unwrap()]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let out = run(&g, &seeds, 50, &mut rng);
        assert!(!out.contains(lonely));
    }

    #[test]
    fn zero_rounds_returns_seeds() {
        let g = SocialGraph::from_edges([(1, 2)]);
        let seeds = NodeSet::from_nodes(g.node_count(), [0]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(run(&g, &seeds, 0, &mut rng), seeds);
        let trace = run_trace(&g, &seeds, 0, &mut rng);
        assert_eq!(trace, vec![seeds]);
    }

    #[test]
    fn run_matches_last_snapshot_of_trace() {
        let g = SocialGraph::from_edges([(1, 2), (2, 3), (3, 4), (4, 5), (2, 5)]);
        let seeds = NodeSet::from_nodes(g.node_count(), [0]);
        let a = run(&g, &seeds, 4, &mut ChaCha8Rng::seed_from_u64(9));
        let trace = run_trace(&g, &seeds, 4, &mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(trace.len(), 5);
        assert_eq!(trace.last(), Some(&a));
    }
}
