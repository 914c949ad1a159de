//! An ordered map backed by an unbalanced binary search tree
//!
//! Nodes live in a slab and link to each other by index. Besides lookups and insertion, the map
//! supports removal of any node and read-only access to the tree structure, which makes it
//! suitable for drawing the tree or teaching how BST operations reshape it.

mod slab;
pub mod error;
pub mod map;

pub use error::StructureError;
pub use map::OrderedMap;

#[macro_export(local_inner_macros)]
macro_rules! orderedmap {
    // trailing comma case
    ($($key:expr => $value:expr,)+) => (orderedmap!($($key => $value),+));

    ( $($key:expr => $value:expr),* ) => {
        {
            let mut _map = $crate::OrderedMap::new();
            $(
                let _ = _map.insert($key, $value);
            )*
            _map
        }
    };
}
