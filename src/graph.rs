//! Graph adapter trait and the in-memory friendship graph.

use std::collections::HashMap;

/// External user identifier, as it appears in edge lists and cost tables.
pub type NodeId = u64;

/// A graph view that can return **borrowed** neighbor slices.
///
/// Every operator in this crate is written against this trait, so callers can plug in their own
/// adjacency representation. Nodes are dense indices `0..node_count()`; for the undirected
/// semantics the operators assume, `v ∈ neighbors_ref(u)` iff `u ∈ neighbors_ref(v)`.
pub trait GraphRef {
    fn node_count(&self) -> usize;
    fn neighbors_ref(&self, node: usize) -> &[usize];
    fn degree(&self, node: usize) -> usize {
        self.neighbors_ref(node).len()
    }
}

/// Undirected friendship graph with stable id <-> index mapping.
///
/// Neighbor lists are sorted and deduplicated; self-loops are dropped. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct SocialGraph {
    adj: Vec<Vec<usize>>,
    ids: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
}

impl SocialGraph {
    /// Build from undirected `(a, b)` id pairs.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let mut builder = GraphBuilder::new();
        for (a, b) in edges {
            builder.add_edge(a, b);
        }
        builder.build()
    }

    /// Build from an undirected `petgraph::Graph`; node ids are `NodeIndex::index()`.
    #[cfg(feature = "petgraph")]
    pub fn from_petgraph<N, E, Ix>(graph: &petgraph::Graph<N, E, petgraph::Undirected, Ix>) -> Self
    where
        Ix: petgraph::graph::IndexType,
    {
        use petgraph::visit::EdgeRef;

        let mut builder = GraphBuilder::new();
        for idx in graph.node_indices() {
            builder.add_node(idx.index() as NodeId);
        }
        for e in graph.edge_references() {
            builder.add_edge(e.source().index() as NodeId, e.target().index() as NodeId);
        }
        builder.build()
    }

    pub fn edge_count(&self) -> usize {
        self.adj.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Dense index of an external id.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// External id of a dense index.
    ///
    /// Panics if `node >= node_count()`.
    pub fn id_of(&self, node: usize) -> NodeId {
        self.ids[node]
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    /// Map external ids to dense indices, failing on the first unknown id.
    pub fn indices_of<'a, I>(&self, ids: I) -> crate::Result<Vec<usize>>
    where
        I: IntoIterator<Item = &'a NodeId>,
    {
        ids.into_iter()
            .map(|&id| self.index_of(id).ok_or(crate::Error::UnknownNode(id)))
            .collect()
    }
}

impl GraphRef for SocialGraph {
    fn node_count(&self) -> usize {
        self.adj.len()
    }

    fn neighbors_ref(&self, node: usize) -> &[usize] {
        self.adj.get(node).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Incremental constructor for [`SocialGraph`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
    adj: Vec<Vec<usize>>,
    ids: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node (no-op if present) and return its dense index.
    pub fn add_node(&mut self, id: NodeId) -> usize {
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = self.ids.len();
        self.ids.push(id);
        self.adj.push(Vec::new());
        self.index.insert(id, idx);
        idx
    }

    pub fn add_edge(&mut self, a: NodeId, b: NodeId) {
        let u = self.add_node(a);
        let v = self.add_node(b);
        if u == v {
            return;
        }
        self.adj[u].push(v);
        self.adj[v].push(u);
    }

    pub fn build(mut self) -> SocialGraph {
        for nbrs in &mut self.adj {
            nbrs.sort_unstable();
            nbrs.dedup();
        }
        SocialGraph { adj: self.adj, ids: self.ids, index: self.index }
    }
}
