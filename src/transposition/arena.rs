use std::collections::HashMap;
use std::hash::Hash;

/// Index of a node inside a `NodeArena`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Nodes stored in insertion order and addressable both by key and by index.
/// A key, once inserted, keeps its node for the lifetime of the arena.
#[derive(Debug)]
pub struct NodeArena<K, V> {
    index: HashMap<K, NodeId>,
    nodes: Vec<V>,
}

impl<K: Hash + Eq + Clone, V> Default for NodeArena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone, V> NodeArena<K, V> {
    pub fn new() -> Self {
        NodeArena {
            index: HashMap::new(),
            nodes: Vec::new(),
        }
    }

    /// Returns the node stored under `key`, creating it with `make` if absent.
    /// The flag is `true` when a new node was created.
    pub fn get_or_insert_with(&mut self, key: K, make: impl FnOnce() -> V) -> (NodeId, bool) {
        if let Some(&id) = self.index.get(&key) {
            return (id, false);
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(make());
        self.index.insert(key, id);
        (id, true)
    }

    pub fn get(&self, key: &K) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    pub fn node(&self, id: NodeId) -> &V {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut V {
        &mut self.nodes[id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &V)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.nodes.clear();
    }
}
