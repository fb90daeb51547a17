//! Shape-preserving collections for iteration and joins

use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::hash::Hash;

/// A collection that can be split into keyed entries and rebuilt in the same shape
///
/// Iteration order is the collection's natural order: ascending index for
/// `Vec`, insertion order for `IndexMap`, key order for `BTreeMap`.
/// `from_entries` receives entries in that same order and must produce a
/// container of the same shape, including when there are no entries.
pub trait Collection: Send + 'static {
    /// Position of an entry (index or key)
    type Key: Clone + Send + 'static;

    /// Value stored at each position
    type Item: Send + 'static;

    /// The same shape holding results of type `R`
    type Mapped<R: Send + 'static>: Send + 'static;

    /// Split into entries in natural order
    fn into_entries(self) -> Vec<(Self::Key, Self::Item)>;

    /// Rebuild the shape from entries in natural order
    fn from_entries<R: Send + 'static>(entries: Vec<(Self::Key, R)>) -> Self::Mapped<R>;
}

impl<V: Send + 'static> Collection for Vec<V> {
    type Key = usize;
    type Item = V;
    type Mapped<R: Send + 'static> = Vec<R>;

    fn into_entries(self) -> Vec<(usize, V)> {
        self.into_iter().enumerate().collect()
    }

    fn from_entries<R: Send + 'static>(entries: Vec<(usize, R)>) -> Vec<R> {
        entries.into_iter().map(|(_, result)| result).collect()
    }
}

impl<K, V> Collection for IndexMap<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Send + 'static,
{
    type Key = K;
    type Item = V;
    type Mapped<R: Send + 'static> = IndexMap<K, R>;

    fn into_entries(self) -> Vec<(K, V)> {
        self.into_iter().collect()
    }

    fn from_entries<R: Send + 'static>(entries: Vec<(K, R)>) -> IndexMap<K, R> {
        entries.into_iter().collect()
    }
}

impl<K, V> Collection for BTreeMap<K, V>
where
    K: Ord + Clone + Send + 'static,
    V: Send + 'static,
{
    type Key = K;
    type Item = V;
    type Mapped<R: Send + 'static> = BTreeMap<K, R>;

    fn into_entries(self) -> Vec<(K, V)> {
        self.into_iter().collect()
    }

    fn from_entries<R: Send + 'static>(entries: Vec<(K, R)>) -> BTreeMap<K, R> {
        entries.into_iter().collect()
    }
}
