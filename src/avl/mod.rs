//! Height-balanced (AVL) ordered map.
//!
//! This module provides [`BalancedMap`], an ordered map that keeps
//! `|height(left) - height(right)| <= 1` at every node across any sequence of
//! insertions and removals.
//!
//! - O(log N) get
//! - O(log N) insert
//! - O(log N) remove
//! - O(N) count (walks the tree on every call)
//! - O(1) height and `is_empty`
//!
//! # Examples
//!
//! ```rust
//! use balanced_map::avl::BalancedMap;
//!
//! let mut map = BalancedMap::new();
//! for key in [12, 8, 11, 4, 10, 18, 17, 5] {
//!     map.insert(key, ()).unwrap();
//!     assert!(map.is_height_balanced());
//! }
//!
//! // Entries come back in key order
//! let keys: Vec<&i32> = map.keys().collect();
//! assert_eq!(keys, vec![&4, &5, &8, &10, &11, &12, &17, &18]);
//!
//! // The tree can be read row by row for drawing
//! assert_eq!(map.row(0), vec![Some(&11)]);
//! assert_eq!(map.row(1), vec![Some(&8), Some(&17)]);
//! ```
//!
//! # Internal Structure
//!
//! Each node exclusively owns its two children; there are no parent
//! pointers. Insert and remove recurse down to the affected position and
//! rebalance every ancestor on the way back up, each level writing its
//! possibly rotated subtree root back into the slot it came from.
//!
//! After an insert, the rotation is chosen by where the new key went below
//! the heavy child. After a remove, it is chosen by the heavy child's own
//! balance, and a perfectly balanced child gets a single rotation.

mod error;
mod map;
mod node;

pub use error::BalancedMapError;
pub use error::DuplicateKeyError;
pub use error::KeyNotFoundError;
pub use map::BalancedMap;
pub use map::BalancedMapIntoIterator;
pub use map::BalancedMapIterator;
