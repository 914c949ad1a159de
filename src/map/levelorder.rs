use std::collections::VecDeque;
use std::iter::FusedIterator;

use crate::slab::{Ptr, Slab};

use super::InnerNode;

/// Breadth-first iterator: the root, then each depth from left to right
pub struct IterLevelorder<'a, K, V> {
    nodes: &'a Slab<InnerNode<K, V>>,
    queue: VecDeque<Ptr>,
}

impl<'a, K, V> IterLevelorder<'a, K, V> {
    pub(super) fn new(nodes: &'a Slab<InnerNode<K, V>>, root: Ptr) -> Self {
        Self {
            nodes,
            queue: root.non_null().into_iter().collect(),
        }
    }
}

impl<'a, K, V> Iterator for IterLevelorder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        let node = &nodes[self.queue.pop_front()?];
        // Left before right keeps each level in key order
        self.queue.extend(node.left.non_null());
        self.queue.extend(node.right.non_null());
        Some((&node.key, &node.value))
    }
}

impl<'a, K, V> FusedIterator for IterLevelorder<'a, K, V> {}
