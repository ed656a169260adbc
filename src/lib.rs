//! # balanced-map
//!
//! A height-balanced (AVL) ordered map with strictly owned nodes and unique
//! keys.
//!
//! ## Overview
//!
//! - **[`BalancedMap`](avl::BalancedMap)**: insert, remove, lookup, count
//! - **Duplicate rejection**: inserting an existing key is an error, never an
//!   overwrite
//! - **Row access**: the keys at each depth, for drawing the tree as text
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for `BalancedMap` as a plain map
//!
//! ## Example
//!
//! ```rust
//! use balanced_map::prelude::*;
//!
//! let mut map = BalancedMap::new();
//! map.insert("one", 1).unwrap();
//! map.insert("two", 2).unwrap();
//!
//! assert_eq!(map.get("one"), Some(&1));
//! assert!(matches!(
//!     map.insert("one", 10),
//!     Err(DuplicateKeyError { key: "one", value: 10 })
//! ));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use balanced_map::prelude::*;
/// ```
pub mod prelude {
    pub use crate::avl::*;
}

pub mod avl;
