//! The dependency graph and its fixed-point closure.

use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

type NodeIdx = u32;

/// Directed "emitting A requires B" graph.
///
/// Nodes keep the order in which they were first declared; that order is
/// the order of the pruned output.
pub struct DepGraph<K> {
    nodes: Vec<K>,
    index: FxHashMap<K, NodeIdx>,
    edges: Vec<SmallVec<[NodeIdx; 4]>>,
}

/// Result of pruning: reachable and unreachable nodes, each in
/// first-declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pruned<K> {
    pub live: Vec<K>,
    pub dead: Vec<K>,
}

impl<K: Clone + Eq + Hash> DepGraph<K> {
    pub fn new() -> Self {
        DepGraph {
            nodes: Vec::new(),
            index: FxHashMap::default(),
            edges: Vec::new(),
        }
    }

    /// Register a node, returning its index. Idempotent.
    fn node(&mut self, key: &K) -> NodeIdx {
        if let Some(&idx) = self.index.get(key) {
            return idx;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "declaration count is bounded well below u32::MAX"
        )]
        let idx = self.nodes.len() as NodeIdx;
        self.nodes.push(key.clone());
        self.index.insert(key.clone(), idx);
        self.edges.push(SmallVec::new());
        idx
    }

    /// Make `key` known to the graph without any edges.
    pub fn declare(&mut self, key: &K) {
        self.node(key);
    }

    /// Record that emitting `from` requires `to`.
    pub fn declare_dependency(&mut self, from: &K, to: &K) {
        let from = self.node(from);
        let to = self.node(to);
        let out = &mut self.edges[from as usize];
        if !out.contains(&to) {
            out.push(to);
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Direct dependencies of `key`, in the order they were recorded.
    pub fn dependencies<'a>(&'a self, key: &K) -> impl Iterator<Item = &'a K> + 'a {
        let out = self
            .index
            .get(key)
            .map(|&idx| self.edges[idx as usize].as_slice())
            .unwrap_or_default();
        out.iter().map(move |&to| &self.nodes[to as usize])
    }

    /// All nodes in first-declaration order.
    pub fn nodes(&self) -> &[K] {
        &self.nodes
    }

    /// Add every node and edge of `other`. Nodes new to `self` are
    /// appended in `other`'s declaration order.
    pub fn merge(&mut self, other: &DepGraph<K>) {
        for (from, out) in other.nodes.iter().zip(&other.edges) {
            let from_idx = self.node(from);
            for &to in out {
                let to_idx = self.node(&other.nodes[to as usize]);
                let edges = &mut self.edges[from_idx as usize];
                if !edges.contains(&to_idx) {
                    edges.push(to_idx);
                }
            }
        }
    }

    fn reachable_from(&self, entries: &[NodeIdx]) -> FxHashSet<NodeIdx> {
        let mut seen: FxHashSet<NodeIdx> = FxHashSet::default();
        let mut stack: Vec<NodeIdx> = entries.to_vec();
        while let Some(idx) = stack.pop() {
            if !seen.insert(idx) {
                continue;
            }
            stack.extend(self.edges[idx as usize].iter().copied());
        }
        seen
    }

    fn entry_indices(&mut self, entries: &[K]) -> Vec<NodeIdx> {
        entries.iter().map(|e| self.node(e)).collect()
    }

    fn split(&self, live: &FxHashSet<NodeIdx>) -> Pruned<K> {
        let mut pruned = Pruned {
            live: Vec::with_capacity(live.len()),
            dead: Vec::new(),
        };
        for (idx, key) in self.nodes.iter().enumerate() {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "node indices were assigned as u32"
            )]
            let idx = idx as NodeIdx;
            if live.contains(&idx) {
                pruned.live.push(key.clone());
            } else {
                pruned.dead.push(key.clone());
            }
        }
        pruned
    }

    /// Split the current graph into nodes reachable from `entries` and the
    /// rest. Entry points not yet in the graph are added.
    pub fn prune(&mut self, entries: &[K]) -> Pruned<K> {
        let roots = self.entry_indices(entries);
        let live = self.reachable_from(&roots);
        tracing::debug!(live = live.len(), total = self.nodes.len(), "pruned dependency graph");
        self.split(&live)
    }

    /// Close the graph from `entries`, expanding each reached node once.
    ///
    /// `expand` is called for every node the first time it becomes
    /// reachable; it may record further edges, from any node to any node
    /// (new or old). Iteration stops when a full pass finds nothing left to
    /// expand. Nodes are expanded in first-declaration order within a pass,
    /// so the result is deterministic.
    pub fn close<E>(
        &mut self,
        entries: &[K],
        mut expand: impl FnMut(&mut Self, &K) -> Result<(), E>,
    ) -> Result<Pruned<K>, E> {
        let roots = self.entry_indices(entries);
        let mut expanded: FxHashSet<NodeIdx> = FxHashSet::default();
        let mut iterations = 0u32;

        let live = loop {
            iterations += 1;
            let live = self.reachable_from(&roots);
            let mut pending: Vec<NodeIdx> = live
                .iter()
                .copied()
                .filter(|idx| !expanded.contains(idx))
                .collect();
            if pending.is_empty() {
                break live;
            }
            pending.sort_unstable();
            for idx in pending {
                expanded.insert(idx);
                let key = self.nodes[idx as usize].clone();
                expand(self, &key)?;
            }
        };

        tracing::debug!(
            iterations,
            live = live.len(),
            dead = self.nodes.len() - live.len(),
            "dce converged"
        );
        Ok(self.split(&live))
    }
}

impl<K: Clone + Eq + Hash> Default for DepGraph<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
