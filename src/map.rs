mod node;
mod preorder;
mod inorder;
mod postorder;
mod levelorder;

pub use node::*;
pub use preorder::*;
pub use inorder::*;
pub use postorder::*;
pub use levelorder::*;

use std::fmt;
use std::mem;
use std::cmp::Ordering;
use std::borrow::Borrow;
use std::iter::FromIterator;

use tracing::trace;

use crate::error::StructureError;
use crate::slab::{Ptr, Slab};

#[derive(Debug, Clone)]
struct InnerNode<K, V> {
    key: K,
    value: V,
    left: Ptr,
    right: Ptr,
    /// Back-reference used to splice nodes out during removal. Only `left`/`right` imply
    /// ownership.
    parent: Ptr,
}

impl<K, V> InnerNode<K, V> {
    fn new(key: K, value: V, parent: Ptr) -> Self {
        Self {
            key,
            value,
            left: Ptr::null(),
            right: Ptr::null(),
            parent,
        }
    }
}

/// An ordered map backed by an unbalanced binary search tree (BST)
///
/// BST properties: For each node with key `k`:
/// - The key of each node in the left subtree is less than `k`
/// - The key of each node in the right subtree is greater than `k`
///
/// Duplicate keys are not allowed. Inserting a key that already exists replaces its value.
///
/// The tree is never rebalanced, so its shape depends entirely on the order of insertions and
/// removals. Sorted insertions produce a tree shaped like a linked list. None of the traversals
/// recurse, so such trees are slow but safe to walk.
///
/// Nodes are stored in a slab and refer to each other by index. Each node also knows its parent,
/// which lets `remove` splice a node out without searching for it twice.
#[derive(Clone)]
pub struct OrderedMap<K, V> {
    nodes: Slab<InnerNode<K, V>>,
    root: Ptr,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self {
            nodes: Slab::new(),
            root: Ptr::null(),
        }
    }
}

impl<K, V> fmt::Debug for OrderedMap<K, V>
    where K: fmt::Debug,
          V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord + PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        // Two maps with the same entries may have different shapes (e.g. if insertion order is
        // different). In-order traversal always produces the entries in sorted order, so compare
        // that instead.

        if self.len() != other.len() {
            return false;
        }

        self.iter_inorder().zip(other.iter_inorder()).all(|((k1, v1), (k2, v2))| {
            k1.eq(k2) && v1.eq(v2)
        })
    }
}

impl<K: Ord + Eq, V: Eq> Eq for OrderedMap<K, V> {}

impl<K, V> OrderedMap<K, V> {
    /// Creates an empty `OrderedMap`
    ///
    /// The map is initially created with a capacity of 0, so it will not allocate until it is
    /// first inserted into.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstmap::OrderedMap;
    /// let mut map: OrderedMap<&str, i32> = OrderedMap::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty map with the specified capacity.
    ///
    /// The map will be able to hold at least `capacity` elements without reallocating. If
    /// `capacity` is 0, the map will not allocate.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstmap::OrderedMap;
    /// let mut map: OrderedMap<&str, i32> = OrderedMap::with_capacity(10);
    /// assert!(map.capacity() >= 10);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Slab::with_capacity(capacity),
            root: Ptr::null(),
        }
    }

    /// Returns the number of entries in the map (i.e. the number of nodes in the binary search
    /// tree)
    ///
    /// Time complexity: `O(1)`
    ///
    /// # Examples
    ///
    /// ```
    /// use bstmap::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// assert_eq!(map.len(), 0);
    /// map.insert(1, "a");
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the map is empty
    ///
    /// Time complexity: `O(1)`
    pub fn is_empty(&self) -> bool {
        debug_assert_eq!(self.nodes.is_empty(), self.root.is_null());
        self.nodes.is_empty()
    }

    /// Returns the number of elements the map can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Reserves capacity for at least `additional` more entries.
    pub fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional)
    }

    /// Shrinks the capacity of the map as much as possible.
    ///
    /// Space left behind by removed entries is only reclaimed once the map is cleared.
    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit()
    }

    /// Returns the number of levels in the tree: 0 for an empty tree, 1 for a lone root
    ///
    /// Time complexity: `O(n)`
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut level: Vec<Ptr> = self.root.non_null().into_iter().collect();
        while !level.is_empty() {
            height += 1;
            level = level.iter()
                .flat_map(|&ptr| {
                    let node = &self.nodes[ptr];
                    node.left.non_null().into_iter().chain(node.right.non_null())
                })
                .collect();
        }

        height
    }

    /// Clears the map, removing all elements
    ///
    /// # Examples
    ///
    /// ```
    /// use bstmap::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.insert(1, "a");
    /// assert!(!map.is_empty());
    /// map.clear();
    /// assert!(map.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = Ptr::null();
        trace!(len = 0usize, "cleared map");
    }

    /// Performs a pre-order traversal of the tree
    pub fn iter_preorder(&self) -> IterPreorder<'_, K, V> {
        IterPreorder::new(&self.nodes, self.root)
    }

    /// Performs an in-order traversal of the tree, yielding entries sorted by key
    pub fn iter_inorder(&self) -> IterInorder<'_, K, V> {
        IterInorder::new(&self.nodes, self.root)
    }

    /// Performs a post-order traversal of the tree
    pub fn iter_postorder(&self) -> IterPostorder<'_, K, V> {
        IterPostorder::new(&self.nodes, self.root)
    }

    /// Performs a level-order (breadth-first) traversal of the tree
    pub fn iter_levelorder(&self) -> IterLevelorder<'_, K, V> {
        IterLevelorder::new(&self.nodes, self.root)
    }

    /// Returns every entry of the map, sorted by key
    ///
    /// Same as [`iter_inorder`](Self::iter_inorder).
    pub fn iter(&self) -> IterInorder<'_, K, V> {
        self.iter_inorder()
    }

    /// Calls `visitor` with every entry in post-order: left subtree, right subtree, then the node
    /// itself
    ///
    /// Does nothing on an empty map.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstmap::orderedmap;
    ///
    /// //      4
    /// //   2     5
    /// // 1   3
    /// let map = orderedmap! {4 => 'd', 2 => 'b', 5 => 'e', 1 => 'a', 3 => 'c'};
    ///
    /// let mut keys = Vec::new();
    /// map.traverse_postorder(|&key, _| keys.push(key));
    /// assert_eq!(keys, &[1, 3, 2, 5, 4]);
    /// ```
    pub fn traverse_postorder<F>(&self, mut visitor: F)
        where F: FnMut(&K, &V),
    {
        for (key, value) in self.iter_postorder() {
            visitor(key, value);
        }
    }

    /// Calls `visitor` with every entry in level order: the root, then every node one level down
    /// from left to right, and so on
    ///
    /// Does nothing on an empty map.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstmap::orderedmap;
    ///
    /// //      4
    /// //   2     5
    /// // 1   3
    /// let map = orderedmap! {4 => 'd', 2 => 'b', 5 => 'e', 1 => 'a', 3 => 'c'};
    ///
    /// let mut keys = Vec::new();
    /// map.traverse_levelorder(|&key, _| keys.push(key));
    /// assert_eq!(keys, &[4, 2, 5, 1, 3]);
    /// ```
    pub fn traverse_levelorder<F>(&self, mut visitor: F)
        where F: FnMut(&K, &V),
    {
        for (key, value) in self.iter_levelorder() {
            visitor(key, value);
        }
    }

    /// Returns the root node of the tree, or `None` if the tree is empty
    ///
    /// Note that the root can be **any** node inserted into the tree. For a guaranteed ordering,
    /// use the various iteration methods.
    ///
    /// This is a low-level, read-only API meant for custom traversals and for drawing the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstmap::{OrderedMap, map::Node};
    ///
    /// // Lays out each key at (depth, in-order column)
    /// fn layout<'a>(node: Option<Node<'a, i32, ()>>, depth: usize, column: &mut usize, out: &mut Vec<(i32, usize, usize)>) {
    ///     if let Some(node) = node {
    ///         layout(node.left(), depth + 1, column, out);
    ///         out.push((*node.key(), depth, *column));
    ///         *column += 1;
    ///         layout(node.right(), depth + 1, column, out);
    ///     }
    /// }
    ///
    /// let map: OrderedMap<_, _> = vec![(2, ()), (1, ()), (3, ())].into_iter().collect();
    ///
    /// let mut positions = Vec::new();
    /// layout(map.root(), 0, &mut 0, &mut positions);
    /// assert_eq!(positions, &[(1, 1, 0), (2, 0, 1), (3, 1, 2)]);
    /// ```
    pub fn root(&self) -> Option<Node<'_, K, V>> {
        Node::new(&self.nodes, self.root)
    }

    /// Replaces `old` in its parent's child slot (or as the root) with `new`, updating the
    /// parent link of `new`
    ///
    /// `old` keeps its own links. The caller is responsible for releasing it.
    fn replace_in_parent(&mut self, old: Ptr, new: Ptr) {
        let parent = self.nodes[old].parent;

        if let Some(new) = new.non_null() {
            self.nodes[new].parent = parent;
        }

        match parent.non_null() {
            None => self.root = new,
            Some(parent) => {
                let parent_node = &mut self.nodes[parent];
                if parent_node.left == old {
                    parent_node.left = new;
                } else {
                    debug_assert_eq!(parent_node.right, old);
                    parent_node.right = new;
                }
            },
        }
    }

    /// Returns the leftmost node of the subtree rooted at `ptr`
    fn leftmost(&self, ptr: Ptr) -> Ptr {
        let mut current = ptr;
        while let Some(left) = self.nodes[current].left.non_null() {
            current = left;
        }

        current
    }
}

impl<K: Ord, V> OrderedMap<K, V> {
    /// Returns the node with the given key, or null
    fn find<Q>(&self, key: &Q) -> Ptr
        where K: Borrow<Q>,
              Q: Ord + ?Sized,
    {
        let mut current = self.root;
        while let Some(ptr) = current.non_null() {
            let node = &self.nodes[ptr];
            match key.cmp(node.key.borrow()) {
                Ordering::Less => current = node.left,
                Ordering::Greater => current = node.right,
                Ordering::Equal => return ptr,
            }
        }

        Ptr::null()
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering on the borrowed
    /// form must match the ordering on the key type.
    ///
    /// Time complexity: `O(height)`
    ///
    /// # Examples
    ///
    /// ```
    /// use bstmap::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.insert(1, "a");
    /// assert!(map.contains_key(&1));
    /// assert!(!map.contains_key(&2));
    /// ```
    pub fn contains_key<Q>(&self, key: &Q) -> bool
        where K: Borrow<Q>,
              Q: Ord + ?Sized,
    {
        !self.find(key).is_null()
    }

    /// Returns a reference to the value corresponding to the given key, or `None` if no such key
    /// exists in the binary search tree
    ///
    /// Time complexity: `O(height)`
    ///
    /// # Examples
    ///
    /// ```
    /// use bstmap::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
        where K: Borrow<Q>,
              Q: Ord + ?Sized,
    {
        self.nodes.get(self.find(key)).map(|node| &node.value)
    }

    /// Returns a mutable reference to the value corresponding to the given key, or `None` if no
    /// such key exists in the binary search tree
    ///
    /// Time complexity: `O(height)`
    ///
    /// # Examples
    ///
    /// ```
    /// use bstmap::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.insert(1, "a");
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map.get(&1), Some(&"b"));
    /// assert_eq!(map.get_mut(&2), None);
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
        where K: Borrow<Q>,
              Q: Ord + ?Sized,
    {
        let ptr = self.find(key);
        self.nodes.get_mut(ptr).map(|node| &mut node.value)
    }

    /// Returns a key-value pair corresponding to the given key, or `None` if no such key exists in
    /// the binary search tree
    ///
    /// Time complexity: `O(height)`
    pub fn get_entry<Q>(&self, key: &Q) -> Option<(&K, &V)>
        where K: Borrow<Q>,
              Q: Ord + ?Sized,
    {
        self.nodes.get(self.find(key)).map(|node| (&node.key, &node.value))
    }

    /// Inserts a new value into the binary search tree
    ///
    /// Returns the previous value if the key was already present in an existing node or `None` if
    /// a new node was inserted.
    ///
    /// Time complexity: `O(height)`
    ///
    /// # Examples
    ///
    /// ```
    /// use bstmap::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert!(!map.is_empty());
    ///
    /// map.insert(37, "b");
    /// assert_eq!(map.insert(37, "c"), Some("b"));
    /// assert_eq!(map.get(&37), Some(&"c"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut parent = Ptr::null();
        // Which side of `parent` the new node goes on
        let mut ordering = Ordering::Equal;

        let mut current = self.root;
        while let Some(ptr) = current.non_null() {
            let node = &mut self.nodes[ptr];
            ordering = key.cmp(&node.key);
            match ordering {
                Ordering::Less => current = node.left,
                Ordering::Greater => current = node.right,
                Ordering::Equal => {
                    // Replacing, so the length does not change
                    return Some(mem::replace(&mut node.value, value));
                },
            }
            parent = ptr;
        }

        // Key not found, insert where we stopped
        let new_ptr = self.nodes.push(InnerNode::new(key, value, parent));
        match parent.non_null() {
            None => self.root = new_ptr,
            Some(parent) => match ordering {
                Ordering::Less => self.nodes[parent].left = new_ptr,
                _ => self.nodes[parent].right = new_ptr,
            },
        }

        trace!(len = self.len(), "inserted node");

        None
    }

    /// Removes a key from the map, returning the value at the key if the key was previously in the
    /// map.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering on the borrowed
    /// form must match the ordering on the key type.
    ///
    /// Time complexity: `O(height)`
    ///
    /// # Examples
    ///
    /// ```
    /// use bstmap::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
        where K: Borrow<Q>,
              Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map, returning the stored key and value if the key was previously in
    /// the map.
    ///
    /// A node with two children is replaced by its in-order successor, which is moved (not
    /// copied) into the removed node's position. Every other node keeps its key and value.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstmap::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove_entry(&1), Some((1, "a")));
    /// assert_eq!(map.remove_entry(&1), None);
    /// ```
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
        where K: Borrow<Q>,
              Q: Ord + ?Sized,
    {
        let target = self.find(key).non_null()?;
        let (left, right) = (self.nodes[target].left, self.nodes[target].right);

        match (left.non_null(), right.non_null()) {
            (None, None) => {
                self.replace_in_parent(target, Ptr::null());
                trace!(len = self.len() - 1, "removed leaf node");
            },

            (Some(child), None) | (None, Some(child)) => {
                self.replace_in_parent(target, child);
                trace!(len = self.len() - 1, "removed node with one child");
            },

            (Some(left), Some(right)) => {
                // The successor has no left child since it is the leftmost node of `right`
                let successor = self.leftmost(right);

                if successor != right {
                    // Detach the successor by moving its right subtree into its place
                    let successor_right = self.nodes[successor].right;
                    self.replace_in_parent(successor, successor_right);

                    self.nodes[successor].right = right;
                    self.nodes[right].parent = successor;
                }

                self.nodes[successor].left = left;
                self.nodes[left].parent = successor;

                self.replace_in_parent(target, successor);
                trace!(len = self.len() - 1, "removed node with two children");
            },
        }

        let InnerNode {key, value, ..} = self.nodes.remove(target)?;
        Some((key, value))
    }

    /// Verifies every invariant of the tree
    ///
    /// Checks that the root has no parent, that each child links back to its parent, that an
    /// in-order walk yields strictly increasing keys, and that exactly `len()` nodes are
    /// reachable from the root.
    ///
    /// Time complexity: `O(n)`
    pub fn check_structure(&self) -> Result<(), StructureError> {
        let root = match self.root.non_null() {
            Some(root) => root,
            None if self.nodes.is_empty() => return Ok(()),
            None => return Err(StructureError::LenMismatch {reachable: 0, len: self.len()}),
        };

        let root_node = self.nodes.get(root).ok_or(StructureError::DanglingLink)?;
        if !root_node.parent.is_null() {
            return Err(StructureError::RootHasParent);
        }

        let mut reachable = 0;
        let mut stack = vec![root];
        while let Some(ptr) = stack.pop() {
            reachable += 1;
            // A cycle would keep this loop going forever
            if reachable > self.len() {
                return Err(StructureError::LenMismatch {reachable, len: self.len()});
            }

            let node = &self.nodes[ptr];
            for child in node.left.non_null().into_iter().chain(node.right.non_null()) {
                let child_node = self.nodes.get(child).ok_or(StructureError::DanglingLink)?;
                if child_node.parent != ptr {
                    return Err(StructureError::ParentMismatch);
                }
                stack.push(child);
            }
        }

        if reachable != self.len() {
            return Err(StructureError::LenMismatch {reachable, len: self.len()});
        }

        let mut keys = self.iter_inorder().map(|(key, _)| key);
        if let Some(mut prev) = keys.next() {
            for (i, key) in keys.enumerate() {
                if prev >= key {
                    return Err(StructureError::OutOfOrder {position: i + 1});
                }
                prev = key;
            }
        }

        Ok(())
    }
}

impl<K: Ord, V> Extend<(K, V)> for OrderedMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = IterInorder<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_inorder()
    }
}
