//! Dependency graph management using `petgraph`.
//!
//! Edges point from a formula cell to each cell or range its formula reads.
//! Nodes are identified by their qualified name (`Sheet1!A1`,
//! `Sheet1!A1:B3`) and are created the first time an edge touches them.

use std::collections::{HashMap, HashSet};
use std::fmt;

use graphedexcel_common::types::CellRef;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;

/// Whether a node stands for one cell or a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A single cell.
    Cell,
    /// A rectangular range.
    Range,
}

/// A node of the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellNode {
    /// Qualified name, unique within the graph.
    pub name: String,
    /// Sheet the cell or range lives on.
    pub sheet: String,
    /// Cell or range.
    pub kind: NodeKind,
}

impl fmt::Display for CellNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A directed dependency graph of cells.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// Internal petgraph representation.
    graph: DiGraph<CellNode, ()>,
    /// Node lookup by qualified name.
    index: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Creates an empty dependency graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node for `reference`, adding it if needed.
    pub fn ensure_node(&mut self, reference: &CellRef) -> NodeIndex {
        let name = reference.to_string();
        if let Some(&idx) = self.index.get(&name) {
            return idx;
        }
        let kind = if reference.target.is_range() {
            NodeKind::Range
        } else {
            NodeKind::Cell
        };
        let idx = self.graph.add_node(CellNode {
            name: name.clone(),
            sheet: reference.sheet.clone(),
            kind,
        });
        let _ = self.index.insert(name, idx);
        idx
    }

    /// Adds a dependency edge: `dependent` reads `dependency`.
    ///
    /// Returns `false` if the edge already existed; the graph never holds
    /// parallel edges.
    pub fn add_dependency(&mut self, dependent: &CellRef, dependency: &CellRef) -> bool {
        let from = self.ensure_node(dependent);
        let to = self.ensure_node(dependency);
        if self.graph.find_edge(from, to).is_some() {
            return false;
        }
        let _ = self.graph.add_edge(from, to, ());
        true
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of dependency edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` when the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Looks a node up by qualified name.
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&CellNode> {
        self.index.get(name).map(|&idx| &self.graph[idx])
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &CellNode> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Edges as `(dependent, dependency)` pairs in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&CellNode, &CellNode)> {
        self.graph
            .edge_indices()
            .filter_map(move |e| self.graph.edge_endpoints(e))
            .map(move |(a, b)| (&self.graph[a], &self.graph[b]))
    }

    /// Edges as `(dependent, dependency)` node positions, matching the
    /// order of [`nodes`](Self::nodes).
    #[must_use]
    pub fn edge_positions(&self) -> Vec<(usize, usize)> {
        self.graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| (a.index(), b.index()))
            .collect()
    }

    /// Edge positions with direction dropped: a pair of mutual edges
    /// becomes one edge. Self-loops are kept.
    #[must_use]
    pub fn undirected_edges(&self) -> Vec<(usize, usize)> {
        let mut seen = HashSet::new();
        self.edge_positions()
            .into_iter()
            .filter(|&(a, b)| seen.insert((a.min(b), a.max(b))))
            .collect()
    }

    fn degree_of(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Direction::Outgoing).count()
            + self.graph.edges_directed(idx, Direction::Incoming).count()
    }

    /// In-degree plus out-degree of `name`. A self-loop counts twice.
    #[must_use]
    pub fn degree(&self, name: &str) -> Option<usize> {
        self.index.get(name).map(|&idx| self.degree_of(idx))
    }

    /// The `n` nodes with the highest degree, highest first. Ties keep
    /// insertion order.
    #[must_use]
    pub fn top_by_degree(&self, n: usize) -> Vec<(&str, usize)> {
        let mut degrees: Vec<(&str, usize)> = self
            .graph
            .node_indices()
            .map(|idx| (self.graph[idx].name.as_str(), self.degree_of(idx)))
            .collect();
        degrees.sort_by(|a, b| b.1.cmp(&a.1));
        degrees.truncate(n);
        degrees
    }

    fn neighbors(&self, name: &str, direction: Direction) -> Option<Vec<&str>> {
        let &idx = self.index.get(name)?;
        // petgraph walks adjacency lists newest-first
        let mut names: Vec<&str> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| self.graph[n].name.as_str())
            .collect();
        names.reverse();
        Some(names)
    }

    /// What `name`'s formula reads directly. `None` if the node is unknown.
    #[must_use]
    pub fn dependencies_of(&self, name: &str) -> Option<Vec<&str>> {
        self.neighbors(name, Direction::Outgoing)
    }

    /// Which formulas read `name` directly. `None` if the node is unknown.
    #[must_use]
    pub fn dependents_of(&self, name: &str) -> Option<Vec<&str>> {
        self.neighbors(name, Direction::Incoming)
    }

    /// Groups of nodes that depend on each other in a loop, each sorted by
    /// name. A cell whose formula reads itself forms a group of one.
    #[must_use]
    pub fn circular_references(&self) -> Vec<Vec<String>> {
        let mut groups: Vec<Vec<String>> = petgraph::algo::tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| match component.as_slice() {
                [single] => self.graph.find_edge(*single, *single).is_some(),
                _ => true,
            })
            .map(|component| {
                let mut names: Vec<String> = component
                    .into_iter()
                    .map(|idx| self.graph[idx].name.clone())
                    .collect();
                names.sort();
                names
            })
            .collect();
        groups.sort();
        groups
    }
}
