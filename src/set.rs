//! Dense node sets (purchased sets, seed sets).

/// A set of dense node indices backed by a membership mask.
///
/// Iteration is always in ascending index order, which keeps RNG draw order (and therefore
/// results) reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeSet {
    mask: Vec<bool>,
    len: usize,
}

impl NodeSet {
    /// Empty set over a universe of `n` nodes.
    pub fn empty(n: usize) -> Self {
        Self { mask: vec![false; n], len: 0 }
    }

    /// Set over `n` nodes containing `nodes`. Out-of-range indices are ignored.
    pub fn from_nodes<I: IntoIterator<Item = usize>>(n: usize, nodes: I) -> Self {
        let mut set = Self::empty(n);
        for v in nodes {
            set.insert(v);
        }
        set
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, node: usize) -> bool {
        self.mask.get(node).copied().unwrap_or(false)
    }

    /// Insert `node`; returns `true` if it was newly added.
    pub fn insert(&mut self, node: usize) -> bool {
        match self.mask.get_mut(node) {
            Some(slot) if !*slot => {
                *slot = true;
                self.len += 1;
                true
            }
            _ => false,
        }
    }

    /// A copy of this set with `node` added.
    pub fn with(&self, node: usize) -> Self {
        let mut next = self.clone();
        next.insert(node);
        next
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.mask.iter().enumerate().filter(|(_, &m)| m).map(|(i, _)| i)
    }

    pub fn is_superset(&self, other: &NodeSet) -> bool {
        other.iter().all(|v| self.contains(v))
    }

    /// Number of `nodes` that are members.
    pub fn count_in(&self, nodes: &[usize]) -> usize {
        nodes.iter().filter(|&&v| self.contains(v)).count()
    }
}
