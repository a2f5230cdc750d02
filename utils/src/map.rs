use std::hash::Hash;

use fnv::FnvHashMap;

/// Small insert-once lookup table keyed by a hashable id.
#[derive(Clone, Debug)]
pub struct Map<K, V>(pub FnvHashMap<K, V>);

impl<K: Eq + Hash, V> Map<K, V> {
    pub fn new() -> Self {
        Self(FnvHashMap::<K, V>::default())
    }

    pub fn insert(&mut self, k: K, data: V) -> Option<V> {
        self.0.insert(k, data)
    }

    pub fn get(&self, k: &K) -> Option<&V> {
        self.0.get(k)
    }

    pub fn contains(&self, k: &K) -> bool {
        self.0.contains_key(k)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Eq + Hash, V> Default for Map<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
