use crate::key::{PortalKey, PortalNodeMap};

/// One mounted portal: a two-layer mount point inside a host container.
///
/// The outer layer stretches over the whole container and ignores pointer
/// events so it never swallows input meant for the content underneath; the
/// inner layer re-enables pointer events for the mounted subtree. Hosts map
/// [`PortalNode::id`] to whatever real mount object they manage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortalNode {
    id: u64,
}

impl PortalNode {
    /// Registry-unique identifier, assigned in acquisition order.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Inline style for the outer layer.
    pub fn outer_style(&self) -> &'static str {
        "position:absolute;z-index:999;top:0;left:0;width:100%;height:100%;pointer-events:none"
    }

    /// Inline style for the inner layer.
    pub fn inner_style(&self) -> &'static str {
        "pointer-events:auto"
    }
}

/// Owns at most one [`PortalNode`] per container key.
///
/// `acquire` is idempotent: repeated calls with the same key hand back the
/// node created by the first call. Nodes live until `release`d, so a host
/// that acquires on mount must release on unmount to avoid leaking mounts.
#[derive(Debug)]
pub struct PortalRegistry<K> {
    nodes: PortalNodeMap<K>,
    next_id: u64,
}

impl<K: PortalKey> PortalRegistry<K> {
    pub fn new() -> Self {
        Self {
            nodes: PortalNodeMap::new(),
            next_id: 0,
        }
    }

    /// Returns the node mounted in `key`, creating it on first acquisition.
    pub fn acquire(&mut self, key: K) -> PortalNode {
        let next_id = &mut self.next_id;
        *self.nodes.entry(key).or_insert_with(|| {
            let node = PortalNode { id: *next_id };
            *next_id += 1;
            node
        })
    }

    /// Drops the node mounted in `key`. Returns whether one existed.
    pub fn release(&mut self, key: &K) -> bool {
        self.nodes.remove(key).is_some()
    }

    pub fn get(&self, key: &K) -> Option<PortalNode> {
        self.nodes.get(key).copied()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<K: PortalKey> Default for PortalRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}
