//! End-to-end campaign: rank, select, diffuse, score.
//!
//! One campaign seed feeds two independent substreams: greedy selection and final
//! diffusion + scoring.

use crate::centrality::{select_candidates, CandidateConfig};
use crate::cost::{total_cost, CostTable};
use crate::diffusion::run_trace;
use crate::exposure::exposure_score;
use crate::graph::{GraphRef, NodeId, SocialGraph};
use crate::greedy::{select, GreedyConfig, Selection};
use crate::sampling::substream_seed;
use crate::set::NodeSet;
use crate::{Error, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SELECTION_STREAM: u64 = 1;
const EVALUATION_STREAM: u64 = 2;

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CampaignConfig {
    /// Hard cap on the total cost of an evaluated influencer list.
    pub ceiling: f64,
    /// Diffusion rounds before the final exposure score.
    pub rounds: usize,
    pub candidates: CandidateConfig,
    /// `greedy.seed` is ignored; it is derived from `seed`.
    pub greedy: GreedyConfig,
    pub seed: u64,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            ceiling: 1000.0,
            rounds: 6,
            candidates: CandidateConfig::default(),
            greedy: GreedyConfig::default(),
            seed: 42,
        }
    }
}

/// Result of scoring one influencer list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evaluation {
    pub cost: f64,
    /// `purchased_per_round[t]` is the purchased-set size after round `t` (`[0]` = seeds).
    pub purchased_per_round: Vec<usize>,
    pub purchased: Vec<NodeId>,
    pub score: usize,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plan {
    pub candidates: Vec<NodeId>,
    pub selection: Selection,
    pub evaluation: Evaluation,
}

/// Score a fixed influencer list: ceiling check, `rounds` diffusion rounds, exposure score.
///
/// Returns [`Error::BudgetExceeded`] before any simulation when the list costs more than
/// `config.ceiling`.
pub fn evaluate(
    graph: &SocialGraph,
    costs: &CostTable,
    influencers: &[NodeId],
    config: &CampaignConfig,
) -> Result<Evaluation> {
    let cost = total_cost(costs, influencers);
    tracing::info!(cost, ceiling = config.ceiling, "influencers cost");
    if cost > config.ceiling {
        return Err(Error::BudgetExceeded { cost, ceiling: config.ceiling });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(substream_seed(config.seed, &[EVALUATION_STREAM]));
    let seeds = NodeSet::from_nodes(graph.node_count(), graph.indices_of(influencers)?);
    let trace = run_trace(graph, &seeds, config.rounds, &mut rng);
    for (round, snapshot) in trace.iter().enumerate().skip(1) {
        tracing::info!(round, purchased = snapshot.len(), "finished round");
    }
    let purchased = trace.last().unwrap_or(&seeds);
    let score = exposure_score(graph, purchased, &mut rng);
    tracing::info!(score, "final score");

    Ok(Evaluation {
        cost,
        purchased_per_round: trace.iter().map(NodeSet::len).collect(),
        purchased: purchased.iter().map(|v| graph.id_of(v)).collect(),
        score,
    })
}

/// Rank candidates, select seeds greedily, then evaluate the selection.
pub fn plan(graph: &SocialGraph, costs: &CostTable, config: &CampaignConfig) -> Result<Plan> {
    let candidates = select_candidates(graph, costs, &config.candidates)?;
    let candidate_ids: Vec<NodeId> = candidates.iter().map(|&v| graph.id_of(v)).collect();

    let greedy = GreedyConfig {
        seed: substream_seed(config.seed, &[SELECTION_STREAM]),
        ..config.greedy
    };
    let selection = select(graph, &candidates, costs, &greedy)?;
    tracing::info!(
        seeds = ?selection.ids(),
        spent = selection.spent,
        termination = ?selection.termination,
        "selection finished"
    );

    let evaluation = evaluate(graph, costs, &selection.ids(), config)?;
    Ok(Plan { candidates: candidate_ids, selection, evaluation })
}
