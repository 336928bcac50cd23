//! Keyed memoization of derived values.

/// A derived value cached under the key it was computed from.
///
/// [`Memo::update`] recomputes only when the key differs from the cached one,
/// so repeated updates with unchanged inputs return the same value without
/// running the derivation.
#[derive(Debug, Clone)]
pub struct Memo<K, V> {
    key: Option<K>,
    value: V,
    computations: u64,
}

impl<K: PartialEq, V: Default> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            key: None,
            value: V::default(),
            computations: 0,
        }
    }
}

impl<K: PartialEq, V: Default> Memo<K, V> {
    /// Create an empty memo holding `V::default()`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K: PartialEq, V> Memo<K, V> {
    /// Recompute the value if `key` differs from the cached key.
    ///
    /// Returns whether the derivation ran.
    pub fn update(&mut self, key: K, derive: impl FnOnce(&K) -> V) -> bool {
        if self.key.as_ref() == Some(&key) {
            return false;
        }
        self.value = derive(&key);
        self.key = Some(key);
        self.computations += 1;
        true
    }

    /// Current derived value.
    #[must_use]
    pub fn get(&self) -> &V {
        &self.value
    }

    /// Key the current value was derived from.
    #[must_use]
    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    /// Number of times the derivation has run.
    #[must_use]
    pub const fn computations(&self) -> u64 {
        self.computations
    }
}
