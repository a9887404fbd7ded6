use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

/// Explicit identifier of a cached program resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgramKey(Cow<'static, str>);

impl ProgramKey {
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Map from [`ProgramKey`] to compiled, shared program resources.
///
/// Resources are immutable once built, so handing out `Arc`s for concurrent
/// read-only use is fine. Replacing or removing an entry needs `&mut self`,
/// which serializes relinking against other cache users; draws already holding
/// an `Arc` keep the old resource alive until they finish.
#[derive(Debug)]
pub struct ProgramCache<R> {
    entries: HashMap<ProgramKey, Arc<R>>,
}

impl<R> Default for ProgramCache<R> {
    fn default() -> Self {
        Self { entries: HashMap::new() }
    }
}

impl<R> ProgramCache<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ProgramKey) -> Option<Arc<R>> {
        self.entries.get(key).cloned()
    }

    /// Returns the cached resource or builds, stores and returns a new one.
    ///
    /// A failed build leaves the cache untouched.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        key: ProgramKey,
        build: impl FnOnce() -> Result<R, E>,
    ) -> Result<Arc<R>, E> {
        if let Some(existing) = self.entries.get(&key) {
            return Ok(Arc::clone(existing));
        }

        let resource = Arc::new(build()?);
        log::debug!("program cache: stored `{}`", key.as_str());
        self.entries.insert(key, Arc::clone(&resource));
        Ok(resource)
    }

    /// Stores `resource` under `key`, returning the previous entry.
    pub fn insert(&mut self, key: ProgramKey, resource: R) -> Option<Arc<R>> {
        self.entries.insert(key, Arc::new(resource))
    }

    pub fn remove(&mut self, key: &ProgramKey) -> Option<Arc<R>> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &ProgramKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_once_per_key() {
        let mut cache: ProgramCache<u32> = ProgramCache::new();
        let mut builds = 0;

        let a = cache
            .get_or_try_insert_with::<()>(ProgramKey::new("outline"), || {
                builds += 1;
                Ok(7)
            })
            .unwrap();
        let b = cache
            .get_or_try_insert_with::<()>(ProgramKey::new("outline"), || {
                builds += 1;
                Ok(8)
            })
            .unwrap();

        assert_eq!(builds, 1);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*b, 7);
    }

    #[test]
    fn failed_build_is_not_cached() {
        let mut cache: ProgramCache<u32> = ProgramCache::new();
        let key = ProgramKey::new("broken");

        let err = cache.get_or_try_insert_with(key.clone(), || Err("link failed"));
        assert_eq!(err.unwrap_err(), "link failed");
        assert!(!cache.contains(&key));
        assert!(cache.is_empty());
    }

    #[test]
    fn insert_replaces_but_outstanding_handles_survive() {
        let mut cache = ProgramCache::new();
        let key = ProgramKey::new(String::from("outline"));
        cache.insert(key.clone(), 1u32);
        let held = cache.get(&key).unwrap();

        let previous = cache.insert(key.clone(), 2u32).unwrap();
        assert!(Arc::ptr_eq(&previous, &held));
        assert_eq!(*held, 1);
        assert_eq!(*cache.get(&key).unwrap(), 2);
    }

    #[test]
    fn remove_and_clear() {
        let mut cache = ProgramCache::new();
        cache.insert(ProgramKey::new("a"), 1u8);
        cache.insert(ProgramKey::new("b"), 2u8);
        assert_eq!(cache.len(), 2);

        assert!(cache.remove(&ProgramKey::new("a")).is_some());
        assert!(cache.remove(&ProgramKey::new("a")).is_none());
        cache.clear();
        assert!(cache.is_empty());
    }
}
