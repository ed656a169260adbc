//! The [`BalancedMap`] container.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::error::{DuplicateKeyError, KeyNotFoundError};
use super::node::{self, Link};

// =============================================================================
// BalancedMap Definition
// =============================================================================

/// An ordered map kept height-balanced (AVL) across every insert and remove.
///
/// Each key is stored at most once: inserting a key that is already present
/// fails with [`DuplicateKeyError`] instead of overwriting. Values can be
/// changed in place through [`get_mut`](Self::get_mut).
///
/// The tree owns its nodes outright. Cloning the map deep-copies every node
/// and yields a tree of exactly the same shape.
///
/// # Time Complexity
///
/// | Operation      | Complexity |
/// |----------------|------------|
/// | `new`          | O(1)       |
/// | `get`          | O(log N)   |
/// | `insert`       | O(log N)   |
/// | `remove`       | O(log N)   |
/// | `contains_key` | O(log N)   |
/// | `height`       | O(1)       |
/// | `count`        | O(N)       |
/// | `row`          | O(2^depth) |
/// | `is_empty`     | O(1)       |
///
/// # Examples
///
/// ```rust
/// use balanced_map::avl::BalancedMap;
///
/// let mut map = BalancedMap::new();
/// map.insert("one", 1).unwrap();
/// map.insert("two", 2).unwrap();
/// map.insert("three", 3).unwrap();
///
/// assert!(map.contains_key("two"));
/// assert_eq!(map.remove("two"), Some(2));
/// assert_eq!(map.count(), 2);
///
/// // Duplicates are rejected, not overwritten
/// assert!(map.insert("one", 100).is_err());
/// assert_eq!(map.get("one"), Some(&1));
/// ```
#[derive(Clone)]
pub struct BalancedMap<K, V> {
    root: Link<K, V>,
}

impl<K, V> BalancedMap<K, V> {
    /// Creates a new empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_map::avl::BalancedMap;
    ///
    /// let map: BalancedMap<i32, String> = BalancedMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { root: None }
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Counts the entries in the map.
    ///
    /// The count is not cached: every call walks the whole tree.
    ///
    /// # Complexity
    ///
    /// O(N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_map::avl::BalancedMap;
    ///
    /// let mut map = BalancedMap::new();
    /// map.insert(1, "one").unwrap();
    /// map.insert(2, "two").unwrap();
    /// assert_eq!(map.count(), 2);
    /// ```
    #[must_use]
    pub fn count(&self) -> usize {
        node::count(&self.root)
    }

    /// Returns the height of the tree: 0 when empty, 1 for a single entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_map::avl::BalancedMap;
    ///
    /// let mut map = BalancedMap::new();
    /// for key in 1..=7 {
    ///     map.insert(key, ()).unwrap();
    /// }
    /// assert_eq!(map.height(), 3);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        usize::from(node::height(&self.root))
    }

    /// Returns the keys found at `depth`, left to right, for drawing the
    /// tree row by row.
    ///
    /// Depth 0 is the root. A child missing below a node at `depth - 1`
    /// shows up as `None`, so a renderer can keep columns aligned. Rows
    /// deeper than [`height`](Self::height) are empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_map::avl::BalancedMap;
    ///
    /// let mut map = BalancedMap::new();
    /// for key in [2, 1, 3, 4] {
    ///     map.insert(key, ()).unwrap();
    /// }
    ///
    /// assert_eq!(map.row(0), vec![Some(&2)]);
    /// assert_eq!(map.row(1), vec![Some(&1), Some(&3)]);
    /// assert_eq!(map.row(2), vec![None, None, None, Some(&4)]);
    /// ```
    #[must_use]
    pub fn row(&self, depth: usize) -> Vec<Option<&K>> {
        let mut row = Vec::new();
        node::collect_row(&self.root, depth, &mut row);
        row
    }

    /// Returns every row from the root down to the deepest level.
    ///
    /// Equivalent to calling [`row`](Self::row) for each depth in
    /// `0..self.height()`.
    pub fn rows(&self) -> impl Iterator<Item = Vec<Option<&K>>> + '_ {
        (0..self.height()).map(move |depth| self.row(depth))
    }

    /// Removes every entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_map::avl::BalancedMap;
    ///
    /// let mut map = BalancedMap::new();
    /// map.insert(1, "one").unwrap();
    /// map.clear();
    /// assert!(map.is_empty());
    /// ```
    pub fn clear(&mut self) {
        if self.root.take().is_some() {
            tracing::debug!("cleared balanced map");
        }
    }

    /// Checks the height-balance property at every node.
    ///
    /// Always `true` for a map built through the public API; exposed so that
    /// callers and tests can verify it.
    #[must_use]
    pub fn is_height_balanced(&self) -> bool {
        node::checked_height(&self.root).is_some()
    }

    /// Returns the entry with the smallest key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_map::avl::BalancedMap;
    ///
    /// let mut map = BalancedMap::new();
    /// map.insert(3, "three").unwrap();
    /// map.insert(1, "one").unwrap();
    /// assert_eq!(map.min(), Some((&1, &"one")));
    /// ```
    #[must_use]
    pub fn min(&self) -> Option<(&K, &V)> {
        node::leftmost(&self.root).map(|node| (&node.key, &node.value))
    }

    /// Returns the entry with the largest key.
    #[must_use]
    pub fn max(&self) -> Option<(&K, &V)> {
        node::rightmost(&self.root).map(|node| (&node.key, &node.value))
    }

    /// Returns an iterator over entries in ascending key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_map::avl::BalancedMap;
    ///
    /// let mut map = BalancedMap::new();
    /// map.insert(3, "three").unwrap();
    /// map.insert(1, "one").unwrap();
    /// map.insert(2, "two").unwrap();
    ///
    /// let keys: Vec<&i32> = map.iter().map(|(key, _)| key).collect();
    /// assert_eq!(keys, vec![&1, &2, &3]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> BalancedMapIterator<'_, K, V> {
        let mut entries = Vec::new();
        node::collect_in_order(&self.root, &mut entries);
        BalancedMapIterator {
            entries: entries.into_iter(),
        }
    }

    /// Returns an iterator over keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values in ascending key order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }
}

impl<K: Ord, V> BalancedMap<K, V> {
    /// Builds a map from entries, failing on the first repeated key.
    ///
    /// # Errors
    ///
    /// Returns the first [`DuplicateKeyError`] met; entries before it are
    /// discarded along with the partially built map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_map::avl::BalancedMap;
    ///
    /// let map = BalancedMap::try_from_entries([(2, 'b'), (1, 'a')]).unwrap();
    /// assert_eq!(map.count(), 2);
    ///
    /// let error = BalancedMap::try_from_entries([(1, 'a'), (1, 'z')]).unwrap_err();
    /// assert_eq!(error.into_entry(), (1, 'z'));
    /// ```
    pub fn try_from_entries<I>(entries: I) -> Result<Self, DuplicateKeyError<K, V>>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::new();
        for (key, value) in entries {
            map.insert(key, value)?;
        }
        Ok(map)
    }

    /// Inserts a new entry, rebalancing the tree on the way back up.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateKeyError`], carrying the rejected key and value,
    /// when `key` is already present. The map is left unchanged.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_map::avl::BalancedMap;
    ///
    /// let mut map = BalancedMap::new();
    /// assert!(map.insert(1, "one").is_ok());
    /// assert!(map.insert(1, "uno").is_err());
    /// assert_eq!(map.get(&1), Some(&"one"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<(), DuplicateKeyError<K, V>> {
        node::insert(&mut self.root, key, value)
            .map(|_| ())
            .inspect_err(|_| tracing::debug!("rejected insert of duplicate key"))
    }

    /// Removes the entry for `key`, returning its value.
    ///
    /// Removing an absent key is a no-op that returns `None`.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_map::avl::BalancedMap;
    ///
    /// let mut map = BalancedMap::new();
    /// map.insert("key".to_string(), 42).unwrap();
    ///
    /// assert_eq!(map.remove("key"), Some(42));
    /// assert_eq!(map.remove("key"), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        node::remove(&mut self.root, key).map(|(_, value)| value)
    }

    /// Returns a reference to the value stored for `key`.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form must match the ordering on the key type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_map::avl::BalancedMap;
    ///
    /// let mut map = BalancedMap::new();
    /// map.insert("hello".to_string(), 42).unwrap();
    ///
    /// assert_eq!(map.get("hello"), Some(&42));
    /// assert_eq!(map.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        node::find(&self.root, key).map(|node| &node.value)
    }

    /// Returns the value stored for `key`, or an error when it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`KeyNotFoundError`] if the map has no entry for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_map::avl::{BalancedMap, KeyNotFoundError};
    ///
    /// let mut map = BalancedMap::new();
    /// map.insert(1, "one").unwrap();
    ///
    /// assert_eq!(map.try_get(&1), Ok(&"one"));
    /// assert_eq!(map.try_get(&2), Err(KeyNotFoundError));
    /// ```
    pub fn try_get<Q>(&self, key: &Q) -> Result<&V, KeyNotFoundError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).ok_or(KeyNotFoundError)
    }

    /// Returns a mutable reference to the value stored for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_map::avl::BalancedMap;
    ///
    /// let mut map = BalancedMap::new();
    /// map.insert("count", 1).unwrap();
    /// if let Some(value) = map.get_mut("count") {
    ///     *value += 1;
    /// }
    /// assert_eq!(map.get("count"), Some(&2));
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        node::find_mut(&mut self.root, key)
    }

    /// Returns `true` if the map holds an entry for `key`.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }
}

// Send/Sync follow the entry types.
static_assertions::assert_impl_all!(BalancedMap<i32, String>: Send, Sync);
static_assertions::assert_not_impl_any!(BalancedMap<std::rc::Rc<i32>, i32>: Send, Sync);

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over key-value pairs of a [`BalancedMap`], in key order.
pub struct BalancedMapIterator<'a, K, V> {
    entries: std::vec::IntoIter<(&'a K, &'a V)>,
}

impl<'a, K, V> Iterator for BalancedMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> ExactSizeIterator for BalancedMapIterator<'_, K, V> {}

/// An owning iterator over key-value pairs of a [`BalancedMap`], in key
/// order.
pub struct BalancedMapIntoIterator<K, V> {
    entries: std::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for BalancedMapIntoIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> ExactSizeIterator for BalancedMapIntoIterator<K, V> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for BalancedMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> IntoIterator for BalancedMap<K, V> {
    type Item = (K, V);
    type IntoIter = BalancedMapIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let mut entries = Vec::new();
        node::drain_in_order(self.root, &mut entries);
        BalancedMapIntoIterator {
            entries: entries.into_iter(),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a BalancedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = BalancedMapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Two maps are equal when they hold the same entries, whatever their shape.
impl<K: PartialEq, V: PartialEq> PartialEq for BalancedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for BalancedMap<K, V> {}

impl<K: Hash, V: Hash> Hash for BalancedMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let entries = self.iter();
        entries.len().hash(state);
        for (key, value) in entries {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for BalancedMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for BalancedMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for BalancedMap<K, V>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let entries = self.iter();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct BalancedMapVisitor<K, V> {
    marker: std::marker::PhantomData<fn() -> BalancedMap<K, V>>,
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for BalancedMapVisitor<K, V>
where
    K: serde::Deserialize<'de> + Ord + fmt::Debug,
    V: serde::Deserialize<'de>,
{
    type Value = BalancedMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map with unique keys")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut map = BalancedMap::new();
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value)
                .map_err(<A::Error as serde::de::Error>::custom)?;
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for BalancedMap<K, V>
where
    K: serde::Deserialize<'de> + Ord + fmt::Debug,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(BalancedMapVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
