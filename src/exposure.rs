//! Product exposure score.
//!
//! A node "sees" the product if it purchased it, or, with logistic probability
//! \(1 / (1 + 10 e^{-b/2})\), if \(b > 0\) of its neighbors purchased it.
//!
//! The score is deliberately noisy: two calls with the same purchased set generally disagree.
//! Callers that compare scores should average over many draws (see [`crate::sampling`]).

use crate::graph::GraphRef;
use crate::set::NodeSet;
use rand::Rng;

/// Probability that a non-purchaser with `purchasing` buying neighbors is exposed.
pub fn exposure_probability(purchasing: usize) -> f64 {
    if purchasing == 0 {
        return 0.0;
    }
    1.0 / (1.0 + 10.0 * (-(purchasing as f64) / 2.0).exp())
}

/// Count of exposed nodes; always in `purchased.len()..=graph.node_count()` for in-range sets.
pub fn exposure_score<G, R>(graph: &G, purchased: &NodeSet, rng: &mut R) -> usize
where
    G: GraphRef + ?Sized,
    R: Rng + ?Sized,
{
    let mut exposed = 0usize;
    for u in 0..graph.node_count() {
        if purchased.contains(u) {
            exposed += 1;
            continue;
        }
        let b = purchased.count_in(graph.neighbors_ref(u));
        if b == 0 {
            continue;
        }
        let r: f64 = rng.random();
        if r < exposure_probability(b) {
            exposed += 1;
        }
    }
    exposed
}
