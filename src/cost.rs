//! Influencer cost table.

use crate::graph::NodeId;
use crate::{Error, Result};
use std::collections::HashMap;

/// Mapping from user id to a non-negative cost. Users absent from the table are free.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostTable {
    costs: HashMap<NodeId, f64>,
}

impl CostTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(id, cost)` pairs; later entries replace earlier ones.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NodeId, f64)>,
    {
        let mut table = CostTable::new();
        for (id, cost) in entries {
            table.insert(id, cost)?;
        }
        Ok(table)
    }

    /// Set the cost of `id`, replacing any previous entry.
    pub fn insert(&mut self, id: NodeId, cost: f64) -> Result<()> {
        if !cost.is_finite() || cost < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "cost of {id} must be finite and >= 0, got {cost}"
            )));
        }
        self.costs.insert(id, cost);
        Ok(())
    }

    /// Cost of `id`; `0.0` when the table has no entry.
    pub fn cost(&self, id: NodeId) -> f64 {
        self.costs.get(&id).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

/// Sum of costs over `influencers`; unknown ids contribute 0.
pub fn total_cost(costs: &CostTable, influencers: &[NodeId]) -> f64 {
    influencers.iter().map(|&id| costs.cost(id)).sum()
}
