use std::borrow::Borrow;
use std::collections::HashMap;
use std::collections::hash_map;
use std::hash::Hash;

/// Two-directional map used for closed vocabularies that must stay auditable
/// in both directions (e.g. status value ↔ wire string).
#[derive(Debug, Clone)]
pub struct BiMap<K, V> {
    forward: HashMap<K, V>,
    backward: HashMap<V, K>,
}

impl<K, V> BiMap<K, V>
where
    K: Hash + Eq + Clone,
    V: Hash + Eq + Clone,
{
    pub fn new() -> Self {
        BiMap {
            forward: HashMap::new(),
            backward: HashMap::new(),
        }
    }

    /// Inserts a pair, displacing any previous association of either side.
    pub fn insert(&mut self, k: K, v: V) {
        if let Some(old_v) = self.forward.get(&k) {
            self.backward.remove(old_v);
        }
        if let Some(old_k) = self.backward.get(&v) {
            self.forward.remove(old_k);
        }
        self.forward.insert(k.clone(), v.clone());
        self.backward.insert(v, k);
    }

    pub fn get_by_key<Q>(&self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.forward.get(k)
    }

    pub fn get_by_value<Q>(&self, v: &Q) -> Option<&K>
    where
        V: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.backward.get(v)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, K, V> {
        self.forward.iter()
    }
}

impl<K: Hash + Eq + Clone, V: Hash + Eq + Clone> Default for BiMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, K, V> IntoIterator for &'a BiMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = hash_map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.forward.iter()
    }
}
