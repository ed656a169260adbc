//! Error types for the balanced map.
//!
//! Two recoverable failures exist: inserting a key that is already present,
//! and asking for the value of a key that is absent through the unchecked
//! accessor. Both leave the map exactly as it was before the call.

use std::fmt;

/// Returned by [`BalancedMap::insert`](super::BalancedMap::insert) when the
/// key is already present.
///
/// The rejected key and value are handed back to the caller so that nothing
/// is lost; to update an existing entry use
/// [`BalancedMap::get_mut`](super::BalancedMap::get_mut) instead.
///
/// # Examples
///
/// ```rust
/// use balanced_map::avl::BalancedMap;
///
/// let mut map = BalancedMap::new();
/// map.insert("answer", 42).unwrap();
///
/// let error = map.insert("answer", 0).unwrap_err();
/// assert_eq!(error.key, "answer");
/// assert_eq!(error.value, 0);
/// assert_eq!(map.get("answer"), Some(&42));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKeyError<K, V> {
    /// The key that was already present.
    pub key: K,
    /// The value that was not inserted.
    pub value: V,
}

impl<K, V> DuplicateKeyError<K, V> {
    /// Consumes the error, returning the rejected entry.
    pub fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K: fmt::Debug, V> fmt::Display for DuplicateKeyError<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "duplicate key {:?}: keys in a balanced map must be unique",
            self.key
        )
    }
}

impl<K: fmt::Debug, V: fmt::Debug> std::error::Error for DuplicateKeyError<K, V> {}

/// Returned by [`BalancedMap::try_get`](super::BalancedMap::try_get) when the
/// key is absent.
///
/// The checked lookups (`get`, `contains_key`) never produce this error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyNotFoundError;

impl fmt::Display for KeyNotFoundError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("key not found in balanced map")
    }
}

impl std::error::Error for KeyNotFoundError {}

/// Every error a [`BalancedMap`](super::BalancedMap) operation can report.
///
/// Lets callers chain `insert` and `try_get` with `?` in one function.
///
/// # Examples
///
/// ```rust
/// use balanced_map::avl::{BalancedMap, BalancedMapError};
///
/// fn bump(map: &mut BalancedMap<&'static str, i32>) -> Result<i32, BalancedMapError<&'static str, i32>> {
///     map.insert("b", 2)?;
///     Ok(*map.try_get("a")? + 1)
/// }
///
/// let mut map = BalancedMap::new();
/// map.insert("a", 1).unwrap();
/// assert_eq!(bump(&mut map), Ok(2));
/// assert!(matches!(bump(&mut map), Err(BalancedMapError::DuplicateKey(_))));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalancedMapError<K, V> {
    /// An insert hit an existing key.
    DuplicateKey(DuplicateKeyError<K, V>),
    /// An unchecked lookup missed.
    KeyNotFound(KeyNotFoundError),
}

impl<K, V> From<DuplicateKeyError<K, V>> for BalancedMapError<K, V> {
    fn from(error: DuplicateKeyError<K, V>) -> Self {
        Self::DuplicateKey(error)
    }
}

impl<K, V> From<KeyNotFoundError> for BalancedMapError<K, V> {
    fn from(error: KeyNotFoundError) -> Self {
        Self::KeyNotFound(error)
    }
}

impl<K: fmt::Debug, V> fmt::Display for BalancedMapError<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateKey(error) => write!(formatter, "{error}"),
            Self::KeyNotFound(error) => write!(formatter, "{error}"),
        }
    }
}

// Display already prints the wrapped error, so neither variant reports a source.
impl<K: fmt::Debug, V: fmt::Debug> std::error::Error for BalancedMapError<K, V> {}
