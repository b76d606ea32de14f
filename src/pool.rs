//! Candidate pool consumed by the greedy selector.

/// Ordered, owned sequence of candidate node indices.
///
/// The pool only ever shrinks: [`CandidatePool::commit`] removes a node and keeps the relative
/// order of the rest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CandidatePool {
    nodes: Vec<usize>,
}

impl CandidatePool {
    /// Build a pool, dropping repeated nodes (first occurrence wins).
    pub fn new(nodes: Vec<usize>) -> Self {
        let mut seen = std::collections::HashSet::with_capacity(nodes.len());
        let nodes = nodes.into_iter().filter(|v| seen.insert(*v)).collect();
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.nodes
    }

    /// Remove `node`, returning `true` if it was present.
    pub fn commit(&mut self, node: usize) -> bool {
        match self.nodes.iter().position(|&v| v == node) {
            Some(pos) => {
                self.nodes.remove(pos);
                true
            }
            None => false,
        }
    }
}
