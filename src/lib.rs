//! `seedcast`: budgeted influencer selection under stochastic purchase diffusion.
//!
//! The crate models a "purchase" signal spreading over an undirected friendship graph and picks a
//! cost-constrained seed set that maximizes a noisy exposure score.
//!
//! Public invariants (must not drift):
//! - **Node order**: internal node indices are dense \(0..n-1\), assigned in first-seen order by
//!   [`GraphBuilder`]. External ids ([`NodeId`]) only appear at the API boundary.
//! - **Determinism**: every stochastic operator takes an injected RNG (or a seed it derives
//!   substreams from). Identical inputs + seeds give identical outputs, with or without the
//!   `parallel` feature.
//! - **Monotone diffusion**: a diffusion round never removes a purchaser.
//! - **Budget**: no seed set produced by [`select`] ever costs more than its budget.
//!
//! Swappable (allowed to change without breaking the contract):
//! - iteration strategy (serial vs parallel trials)
//! - centrality internals (so long as normalization semantics hold)

pub mod campaign;
pub mod centrality;
pub mod cost;
pub mod diffusion;
pub mod exposure;
pub mod graph;
pub mod greedy;
pub mod io;
pub mod pool;
pub mod sampling;
pub mod set;
pub mod topk;

pub use campaign::{evaluate, plan, CampaignConfig, Evaluation, Plan};
pub use centrality::{
    betweenness_centrality, closeness_centrality, degree_centrality, rank, select_candidates,
    CandidateConfig, CentralityWeights,
};
pub use cost::{total_cost, CostTable};
pub use diffusion::{advance, conversion_probability, run, run_trace};
pub use exposure::{exposure_probability, exposure_score};
pub use graph::{GraphBuilder, GraphRef, NodeId, SocialGraph};
pub use greedy::{
    avg_marginal_gain, select, GainObjective, GreedyConfig, Pick, Selection, SelectionGuard,
    Termination,
};
pub use pool::CandidatePool;
pub use sampling::{mean_of_trials, substream_seed};
pub use set::NodeSet;
pub use topk::{min_max_normalize, rank_descending};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing column `{0}`")]
    MissingColumn(String),
    #[error("invalid record at line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("influencers are too expensive: cost {cost} exceeds ceiling {ceiling}")]
    BudgetExceeded { cost: f64, ceiling: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
