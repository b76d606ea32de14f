//! Budgeted greedy seed selection.
//!
//! Cost-normalized greedy for budgeted submodular maximization:
//! each round, every affordable candidate `v` is scored by
//!
//! ```text
//! mean_t [ f(S ∪ {v}) - f(S) ] / cost(v)
//! ```
//!
//! over `iterations` Monte-Carlo trials of the noisy objective `f`, and the strictly best one is
//! committed. Selection stops as soon as no candidate has a strictly positive normalized gain.
//!
//! Public invariants:
//! - `spent <= budget` after every commit.
//! - Seeds are a subset of the candidates, each committed at most once.
//! - At most `candidates.len()` rounds.
//! - Ties go to the earliest candidate in pool order.
//! - Trial randomness is keyed by `(seed, round, candidate, trial)`; results do not depend on
//!   the `parallel` feature.

use crate::cost::CostTable;
use crate::diffusion;
use crate::exposure::exposure_score;
use crate::graph::{GraphRef, NodeId, SocialGraph};
use crate::pool::CandidatePool;
use crate::sampling::{mean_of_trials, substream_seed};
use crate::set::NodeSet;
use crate::{Error, Result};
use rand::Rng;
use std::time::{Duration, Instant};

/// What the marginal gain is measured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GainObjective {
    /// Exposure score of the seed set itself, with no diffusion.
    ///
    /// This is a one-hop proxy and differs from end-to-end scoring, which diffuses first.
    #[default]
    SeedExposure,
    /// Exposure score after diffusing the seed set for `rounds` rounds.
    Diffused { rounds: usize },
}

/// Early-stop guards, checked between greedy rounds.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionGuard {
    pub max_rounds: Option<usize>,
    pub time_limit: Option<Duration>,
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GreedyConfig {
    /// Total spend allowed on seeds.
    pub budget: f64,
    /// Monte-Carlo trials per (seed set, candidate) estimate.
    pub iterations: usize,
    pub objective: GainObjective,
    pub guard: SelectionGuard,
    pub seed: u64,
}

impl Default for GreedyConfig {
    fn default() -> Self {
        Self {
            budget: 1000.0,
            iterations: 50,
            objective: GainObjective::SeedExposure,
            guard: SelectionGuard::default(),
            seed: 42,
        }
    }
}

impl GreedyConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.budget.is_finite() || self.budget < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "budget must be finite and >= 0, got {}",
                self.budget
            )));
        }
        if self.iterations == 0 {
            return Err(Error::InvalidParameter("iterations must be >= 1".to_string()));
        }
        Ok(())
    }
}

/// Why selection stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// No affordable candidate had a strictly positive gain.
    NoPositiveGain,
    /// No remaining candidate fits in the remaining budget (or the pool is empty).
    NoAffordableCandidate,
    RoundLimit,
    TimeLimit,
}

/// One committed seed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pick {
    pub node: usize,
    pub id: NodeId,
    pub cost: f64,
    /// Estimated mean marginal gain divided by cost.
    pub normalized_gain: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Selection {
    /// Picks in commit order.
    pub picks: Vec<Pick>,
    pub spent: f64,
    pub termination: Termination,
}

impl Selection {
    pub fn ids(&self) -> Vec<NodeId> {
        self.picks.iter().map(|p| p.id).collect()
    }

    pub fn nodes(&self) -> Vec<usize> {
        self.picks.iter().map(|p| p.node).collect()
    }
}

/// One draw of the objective on `set`.
fn sample_objective<G, R>(graph: &G, set: &NodeSet, objective: GainObjective, rng: &mut R) -> f64
where
    G: GraphRef + ?Sized,
    R: Rng + ?Sized,
{
    match objective {
        GainObjective::SeedExposure => exposure_score(graph, set, rng) as f64,
        GainObjective::Diffused { rounds } => {
            let purchased = diffusion::run(graph, set, rounds, rng);
            exposure_score(graph, &purchased, rng) as f64
        }
    }
}

/// Estimated mean marginal gain of adding `v` to `seeds`.
///
/// Each trial scores `seeds ∪ {v}` and `seeds` with independent draws, as two separate
/// objective evaluations.
pub fn avg_marginal_gain<G: GraphRef + Sync + ?Sized>(
    graph: &G,
    seeds: &NodeSet,
    v: usize,
    objective: GainObjective,
    iterations: usize,
    seed: u64,
) -> f64 {
    let with_v = seeds.with(v);
    mean_of_trials(iterations, seed, |rng| {
        sample_objective(graph, &with_v, objective, rng)
            - sample_objective(graph, seeds, objective, rng)
    })
}

/// Gain per unit cost. Free candidates are infinitely attractive when the gain is positive.
fn normalize_gain(gain: f64, cost: f64) -> f64 {
    if cost > 0.0 {
        gain / cost
    } else if gain > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

/// Build a seed set from `candidates` under `config.budget`.
pub fn select(
    graph: &SocialGraph,
    candidates: &[usize],
    costs: &CostTable,
    config: &GreedyConfig,
) -> Result<Selection> {
    config.validate()?;
    let mut pool = CandidatePool::new(candidates.to_vec());
    let n = graph.node_count();
    if let Some(&bad) = pool.as_slice().iter().find(|&&v| v >= n) {
        return Err(Error::InvalidParameter(format!(
            "candidate index {bad} out of range for {n} nodes"
        )));
    }

    let started = Instant::now();
    let mut seeds = NodeSet::empty(n);
    let mut picks: Vec<Pick> = Vec::new();
    let mut spent = 0.0f64;
    let mut round = 0usize;

    let termination = loop {
        if config.guard.max_rounds.is_some_and(|max| round >= max) {
            tracing::warn!(round, "round limit reached; stopping selection");
            break Termination::RoundLimit;
        }
        if config.guard.time_limit.is_some_and(|limit| started.elapsed() >= limit) {
            tracing::warn!(
                round,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "time limit reached; stopping selection"
            );
            break Termination::TimeLimit;
        }

        let affordable: Vec<(usize, f64)> = pool
            .as_slice()
            .iter()
            .map(|&v| (v, costs.cost(graph.id_of(v))))
            .filter(|&(_, c)| spent + c <= config.budget)
            .collect();
        if affordable.is_empty() {
            break Termination::NoAffordableCandidate;
        }

        let estimate = |&(v, cost): &(usize, f64)| {
            let stream = substream_seed(config.seed, &[round as u64, v as u64]);
            let gain =
                avg_marginal_gain(graph, &seeds, v, config.objective, config.iterations, stream);
            (v, cost, normalize_gain(gain, cost))
        };
        #[cfg(feature = "parallel")]
        let estimates: Vec<(usize, f64, f64)> = {
            use rayon::prelude::*;
            affordable.par_iter().map(estimate).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let estimates: Vec<(usize, f64, f64)> = affordable.iter().map(estimate).collect();

        let mut best: Option<(usize, f64)> = None;
        let mut best_value = 0.0f64;
        for &(v, cost, value) in &estimates {
            tracing::debug!(round, node = graph.id_of(v), cost, value, "candidate estimate");
            if value > best_value {
                best = Some((v, cost));
                best_value = value;
            }
        }

        let Some((v, cost)) = best else {
            break Termination::NoPositiveGain;
        };

        seeds.insert(v);
        pool.commit(v);
        spent += cost;
        let pick = Pick { node: v, id: graph.id_of(v), cost, normalized_gain: best_value };
        tracing::info!(round, node = pick.id, cost, spent, gain = best_value, "committed seed");
        picks.push(pick);
        round += 1;
    };

    Ok(Selection { picks, spent, termination })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star_with_tail() -> SocialGraph {
        // Hub 0 with leaves 1..=6, and a tail 6 - 7 - 8.
        let mut edges: Vec<(NodeId, NodeId)> = (1..=6).map(|i| (0, i)).collect();
        edges.extend([(6, 7), (7, 8)]);
        SocialGraph::from_edges(edges)
    }

    #[test]
    fn normalize_handles_free_candidates() {
        assert_eq!(normalize_gain(2.0, 4.0), 0.5);
        assert_eq!(normalize_gain(2.0, 0.0), f64::INFINITY);
        assert_eq!(normalize_gain(-1.0, 0.0), 0.0);
        assert_eq!(normalize_gain(0.0, 0.0), 0.0);
    }

    #[test]
    fn respects_budget() {
        let g = star_with_tail();
        let costs = CostTable::from_entries((0u64..9).map(|i| (i, 40.0))).unwrap();
        let cfg = GreedyConfig { budget: 100.0, iterations: 20, ..GreedyConfig::default() };
        let sel = select(&g, &(0..9).collect::<Vec<usize>>(), &costs, &cfg).unwrap();
        assert!(sel.spent <= 100.0);
        assert!(sel.picks.len() <= 2);
        let total: f64 = sel.picks.iter().map(|p| p.cost).sum();
        assert_eq!(total, sel.spent);
    }

    #[test]
    fn zero_budget_with_priced_candidates_selects_nothing() {
        let g = star_with_tail();
        let costs = CostTable::from_entries(vec![(0, 1.0), (7, 1.0)]).unwrap();
        let pool = vec![g.index_of(0).unwrap(), g.index_of(7).unwrap()];
        let cfg = GreedyConfig { budget: 0.0, iterations: 5, ..GreedyConfig::default() };
        let sel = select(&g, &pool, &costs, &cfg).unwrap();
        assert!(sel.picks.is_empty());
        assert_eq!(sel.termination, Termination::NoAffordableCandidate);
    }

    #[test]
    fn first_pick_is_the_hub() {
        // Equal costs: the hub exposes itself plus many leaves, so it dominates.
        let g = star_with_tail();
        let costs = CostTable::from_entries((0u64..9).map(|i| (i, 10.0))).unwrap();
        let cfg = GreedyConfig { budget: 10.0, iterations: 200, ..GreedyConfig::default() };
        let sel = select(&g, &(0..9).collect::<Vec<usize>>(), &costs, &cfg).unwrap();
        assert_eq!(sel.ids(), vec![0]);
    }

    #[test]
    fn free_candidates_commit_in_pool_order() {
        // Every free candidate has +inf normalized gain; ties go to the earliest in the pool.
        let g = SocialGraph::from_edges([(1, 2), (2, 3), (3, 4), (4, 5), (5, 6)]);
        let pool: Vec<usize> = [4, 1, 3].iter().map(|&id| g.index_of(id).unwrap()).collect();
        let cfg = GreedyConfig { budget: 0.0, ..GreedyConfig::default() };
        let sel = select(&g, &pool, &CostTable::new(), &cfg).unwrap();
        assert_eq!(sel.ids(), vec![4, 1, 3]);
        assert!(sel.picks.iter().all(|p| p.normalized_gain == f64::INFINITY));
        assert_eq!(sel.spent, 0.0);
        assert_eq!(sel.termination, Termination::NoAffordableCandidate);
    }

    #[test]
    fn stops_without_positive_gain_while_budget_remains() {
        // On a complete graph a near-saturated seed set gains nothing from one more seed.
        let n = 30u64;
        let edges: Vec<(NodeId, NodeId)> =
            (0..n).flat_map(|a| ((a + 1)..n).map(move |b| (a, b))).collect();
        let g = SocialGraph::from_edges(edges);
        let costs = CostTable::from_entries((0..n).map(|i| (i, 1.0))).unwrap();
        let pool: Vec<usize> = (0..g.node_count()).collect();
        for seed in 0..10 {
            let cfg =
                GreedyConfig { budget: 100.0, iterations: 1, seed, ..GreedyConfig::default() };
            let sel = select(&g, &pool, &costs, &cfg).unwrap();
            assert_eq!(sel.termination, Termination::NoPositiveGain, "seed {seed}");
            assert!(sel.picks.len() < pool.len(), "seed {seed}");
            assert!(cfg.budget - sel.spent >= 1.0, "seed {seed}");
        }
    }

    #[test]
    fn round_guard_stops_early() {
        let g = star_with_tail();
        let cfg = GreedyConfig {
            budget: 1000.0,
            iterations: 5,
            guard: SelectionGuard { max_rounds: Some(1), time_limit: None },
            ..GreedyConfig::default()
        };
        let costs = CostTable::from_entries((0u64..9).map(|i| (i, 1.0))).unwrap();
        let sel = select(&g, &(0..9).collect::<Vec<usize>>(), &costs, &cfg).unwrap();
        assert_eq!(sel.picks.len(), 1);
        assert_eq!(sel.termination, Termination::RoundLimit);
    }

    #[test]
    fn zero_time_limit_selects_nothing() {
        let g = star_with_tail();
        let cfg = GreedyConfig {
            guard: SelectionGuard { max_rounds: None, time_limit: Some(Duration::ZERO) },
            ..GreedyConfig::default()
        };
        let sel = select(&g, &[0, 1], &CostTable::new(), &cfg).unwrap();
        assert!(sel.picks.is_empty());
        assert_eq!(sel.termination, Termination::TimeLimit);
    }

    #[test]
    fn rejects_bad_config_and_out_of_range_candidates() {
        let g = star_with_tail();
        let costs = CostTable::new();
        let bad = GreedyConfig { iterations: 0, ..GreedyConfig::default() };
        assert!(select(&g, &[0], &costs, &bad).is_err());
        assert!(select(&g, &[99], &costs, &GreedyConfig::default()).is_err());
    }

    #[test]
    fn diffused_objective_also_respects_budget() {
        let g = star_with_tail();
        let costs = CostTable::from_entries((0u64..9).map(|i| (i, 30.0))).unwrap();
        let cfg = GreedyConfig {
            budget: 60.0,
            iterations: 10,
            objective: GainObjective::Diffused { rounds: 2 },
            ..GreedyConfig::default()
        };
        let sel = select(&g, &(0..9).collect::<Vec<usize>>(), &costs, &cfg).unwrap();
        assert!(sel.spent <= 60.0);
    }
}
