use std::iter::FusedIterator;

use crate::slab::{Ptr, Slab};

use super::InnerNode;

pub struct IterInorder<'a, K, V> {
    nodes: &'a Slab<InnerNode<K, V>>,
    stack: Vec<Ptr>,
}

// See: https://www.geeksforgeeks.org/inorder-tree-traversal-without-recursion/
impl<'a, K, V> IterInorder<'a, K, V> {
    pub(super) fn new(nodes: &'a Slab<InnerNode<K, V>>, root: Ptr) -> Self {
        let mut iter = Self {nodes, stack: Vec::new()};
        iter.push_left_spine(root);
        iter
    }

    /// Pushes `ptr` and every node reachable from it by following left links
    fn push_left_spine(&mut self, ptr: Ptr) {
        let mut current = ptr.non_null();
        while let Some(ptr) = current {
            self.stack.push(ptr);
            current = self.nodes[ptr].left.non_null();
        }
    }
}

impl<'a, K, V> Iterator for IterInorder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        let node = &nodes[self.stack.pop()?];
        self.push_left_spine(node.right);
        Some((&node.key, &node.value))
    }
}

impl<'a, K, V> FusedIterator for IterInorder<'a, K, V> {}
