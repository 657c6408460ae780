//! Id-keyed storage for per-code-object resources.
//!
//! The manager keeps two of these: one for surfaces (inside
//! [`crate::surface::SurfaceFactory`]) and one for sketch instances. A
//! registry only stores; it never creates or tears anything down.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use events::CodeObjectId;

/// Map from code object id to one resource.
#[derive(Debug)]
pub struct Registry<T> {
    entries: HashMap<CodeObjectId, T>,
}

impl<T> Registry<T> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    #[must_use]
    pub fn has(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Store `value` under `id`, returning whatever was there before.
    pub fn put(&mut self, id: &str, value: T) -> Option<T> {
        self.entries.insert(id.to_owned(), value)
    }

    /// The entry for `id`, built with `make` if there is none. The flag is
    /// `true` when `make` ran. A failing `make` leaves the registry as it was.
    ///
    /// # Errors
    ///
    /// Whatever `make` returns.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        id: &str,
        make: impl FnOnce() -> Result<T, E>,
    ) -> Result<(&mut T, bool), E> {
        match self.entries.entry(id.to_owned()) {
            Entry::Occupied(entry) => Ok((entry.into_mut(), false)),
            Entry::Vacant(entry) => Ok((entry.insert(make()?), true)),
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&T> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.entries.get_mut(id)
    }

    /// Remove and return the entry for `id`. Unknown ids are a no-op.
    pub fn remove(&mut self, id: &str) -> Option<T> {
        self.entries.remove(id)
    }

    /// All ids, sorted so that iteration order does not depend on hashing.
    #[must_use]
    pub fn ids(&self) -> Vec<CodeObjectId> {
        let mut ids: Vec<CodeObjectId> = self.entries.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Mutable access to every entry, in unspecified order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&CodeObjectId, &mut T)> {
        self.entries.iter_mut()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}
