//! Composite structural centrality and cost-filtered candidate selection.
//!
//! The composite score is a weighted sum of three measures, each min-max normalized over all
//! nodes first:
//!
//! ```text
//! score(v) = w_d * deg(v) + w_b * betw(v) + w_c * clos(v)
//! ```
//!
//! Public invariants:
//! - Every normalized measure is in `[0, 1]`; a constant measure normalizes to 0.
//! - With non-negative weights summing to 1, every composite score is in `[0, 1]`.
//! - Ranking order is descending by score, ties by ascending node index.
//!
//! Notes:
//! - Graphs are treated as **undirected, unweighted**.
//! - Betweenness is Brandes' algorithm, \(O(nm)\); it dominates on large graphs.

use crate::cost::CostTable;
use crate::graph::{GraphRef, SocialGraph};
use crate::topk::{min_max_normalize, rank_descending};
use crate::{Error, Result};
use std::collections::VecDeque;

/// Weights of the three centrality measures in the composite score.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CentralityWeights {
    pub degree: f64,
    pub betweenness: f64,
    pub closeness: f64,
}

impl Default for CentralityWeights {
    fn default() -> Self {
        Self { degree: 0.4, betweenness: 0.4, closeness: 0.2 }
    }
}

impl CentralityWeights {
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("degree", self.degree),
            ("betweenness", self.betweenness),
            ("closeness", self.closeness),
        ];
        for (name, w) in named {
            if !w.is_finite() || w < 0.0 {
                return Err(Error::InvalidParameter(format!(
                    "{name} weight must be finite and >= 0, got {w}"
                )));
            }
        }
        Ok(())
    }
}

/// Parameters for [`select_candidates`].
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CandidateConfig {
    /// Maximum number of candidates returned.
    pub top_n: usize,
    /// Nodes costing more than this are skipped.
    pub max_cost: f64,
    pub weights: CentralityWeights,
}

impl Default for CandidateConfig {
    fn default() -> Self {
        Self { top_n: 100, max_cost: 300.0, weights: CentralityWeights::default() }
    }
}

/// Degree centrality: `deg(v) / (n - 1)`.
pub fn degree_centrality<G: GraphRef + ?Sized>(graph: &G) -> Vec<f64> {
    let n = graph.node_count();
    if n <= 1 {
        return vec![0.0; n];
    }
    let scale = 1.0 / (n - 1) as f64;
    (0..n).map(|v| graph.degree(v) as f64 * scale).collect()
}

/// Betweenness centrality (Brandes) for undirected, unweighted graphs.
///
/// Normalized by \(2 / ((n-1)(n-2))\) for \(n \ge 3\); smaller graphs are all zeros.
/// Disconnected graphs are allowed; unreachable pairs contribute 0.
pub fn betweenness_centrality<G: GraphRef + ?Sized>(graph: &G) -> Vec<f64> {
    let n = graph.node_count();
    if n <= 2 {
        return vec![0.0; n];
    }

    let mut betweenness = vec![0.0; n];
    let mut stack: Vec<usize> = Vec::with_capacity(n);
    let mut pred: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sigma = vec![0.0f64; n];
    let mut dist: Vec<i64> = vec![-1; n];
    let mut delta = vec![0.0f64; n];
    let mut queue: VecDeque<usize> = VecDeque::new();

    for s in 0..n {
        stack.clear();
        for p in &mut pred {
            p.clear();
        }
        sigma.fill(0.0);
        dist.fill(-1);
        delta.fill(0.0);

        sigma[s] = 1.0;
        dist[s] = 0;
        queue.push_back(s);

        while let Some(v) = queue.pop_front() {
            stack.push(v);
            for &w in graph.neighbors_ref(v) {
                if dist[w] < 0 {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
                if dist[w] == dist[v] + 1 {
                    sigma[w] += sigma[v];
                    pred[w].push(v);
                }
            }
        }

        while let Some(w) = stack.pop() {
            let sigma_w = sigma[w];
            if sigma_w > 0.0 {
                for &v in &pred[w] {
                    delta[v] += (sigma[v] / sigma_w) * (1.0 + delta[w]);
                }
            }
            if w != s {
                betweenness[w] += delta[w];
            }
        }
    }

    // Each unordered pair was counted from both endpoints.
    let norm = 1.0 / ((n - 1) * (n - 2)) as f64;
    for b in &mut betweenness {
        *b *= norm;
    }
    betweenness
}

/// Closeness centrality with the Wasserman–Faust correction for disconnected graphs:
///
/// ```text
/// C(v) = (r - 1) / Σ d(v, u)  *  (r - 1) / (n - 1)
/// ```
///
/// where `r` is the number of nodes reachable from `v` (including `v`). Isolated nodes score 0.
pub fn closeness_centrality<G: GraphRef + ?Sized>(graph: &G) -> Vec<f64> {
    let n = graph.node_count();
    if n <= 1 {
        return vec![0.0; n];
    }

    let mut out = vec![0.0; n];
    let mut dist: Vec<i64> = vec![-1; n];
    let mut queue: VecDeque<usize> = VecDeque::new();

    for (source, slot) in out.iter_mut().enumerate() {
        dist.fill(-1);
        dist[source] = 0;
        queue.push_back(source);
        let mut reachable = 0usize;
        let mut total = 0i64;
        while let Some(v) = queue.pop_front() {
            reachable += 1;
            total += dist[v];
            for &w in graph.neighbors_ref(v) {
                if dist[w] < 0 {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
            }
        }
        if total > 0 {
            let others = (reachable - 1) as f64;
            *slot = (others / total as f64) * (others / (n - 1) as f64);
        }
    }
    out
}

/// Composite centrality ranking, best first.
pub fn rank<G: GraphRef + ?Sized>(graph: &G, weights: CentralityWeights) -> Vec<(usize, f64)> {
    let mut degree = degree_centrality(graph);
    let mut betweenness = betweenness_centrality(graph);
    let mut closeness = closeness_centrality(graph);
    min_max_normalize(&mut degree);
    min_max_normalize(&mut betweenness);
    min_max_normalize(&mut closeness);

    let composite: Vec<f64> = (0..graph.node_count())
        .map(|v| {
            weights.degree * degree[v]
                + weights.betweenness * betweenness[v]
                + weights.closeness * closeness[v]
        })
        .collect();
    tracing::debug!(nodes = composite.len(), "computed composite centrality");
    rank_descending(&composite)
}

/// Highest-ranked affordable nodes: cost `<= max_cost`, in ranking order, at most `top_n`.
///
/// Nodes without a cost entry are free and always affordable.
pub fn select_candidates(
    graph: &SocialGraph,
    costs: &CostTable,
    config: &CandidateConfig,
) -> Result<Vec<usize>> {
    config.weights.validate()?;
    let candidates: Vec<usize> = rank(graph, config.weights)
        .into_iter()
        .map(|(v, _)| v)
        .filter(|&v| costs.cost(graph.id_of(v)) <= config.max_cost)
        .take(config.top_n)
        .collect();
    tracing::info!(
        candidates = candidates.len(),
        top_n = config.top_n,
        max_cost = config.max_cost,
        "selected candidates"
    );
    Ok(candidates)
}
