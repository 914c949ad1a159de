use std::iter::FusedIterator;

use crate::slab::{Ptr, Slab};

use super::InnerNode;

pub struct IterPostorder<'a, K, V> {
    nodes: &'a Slab<InnerNode<K, V>>,
    stack: Vec<Ptr>,
}

// See: https://www.geeksforgeeks.org/iterative-postorder-traversal-using-stack/
impl<'a, K, V> IterPostorder<'a, K, V> {
    pub(super) fn new(nodes: &'a Slab<InnerNode<K, V>>, root: Ptr) -> Self {
        let mut iter = Self {nodes, stack: Vec::new()};
        iter.descend(root);
        iter
    }

    /// Walks down the left spine starting at `ptr`, pushing each node's right child (if any)
    /// underneath the node itself
    fn descend(&mut self, ptr: Ptr) {
        let nodes = self.nodes;
        let mut current = ptr.non_null();
        while let Some(ptr) = current {
            let node = &nodes[ptr];
            self.stack.extend(node.right.non_null());
            self.stack.push(ptr);

            current = node.left.non_null();
        }
    }
}

// See: https://www.geeksforgeeks.org/iterative-postorder-traversal-using-stack/
impl<'a, K, V> Iterator for IterPostorder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;

        while let Some(ptr) = self.stack.pop() {
            let node = &nodes[ptr];

            // If the top of the stack is the current node's right child, that subtree has not
            // been visited yet
            match node.right.non_null() {
                Some(right) if self.stack.last().copied() == Some(right) => {
                    // Swap the right child with the current node so the node is visited after
                    // its right subtree
                    self.stack.pop();
                    self.stack.push(ptr);

                    self.descend(right);
                },

                _ => return Some((&node.key, &node.value)),
            }
        }

        None
    }
}

impl<'a, K, V> FusedIterator for IterPostorder<'a, K, V> {}
