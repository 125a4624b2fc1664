use std::cell::OnceCell;

/// A derived value that is dropped on every write and recomputed on the next read
///
/// Writers need `&mut self` to invalidate, while readers only need `&self` to
/// fill the cache. The value can therefore never be observed stale: anything
/// that changes the inputs must go through [`Cached::invalidate`], and the
/// borrow checker rules out a read in progress at the same time.
#[derive(Clone, Debug)]
pub struct Cached<T>(OnceCell<T>);

impl<T> Cached<T> {
    /// An empty cache
    pub fn new() -> Self {
        Self(OnceCell::new())
    }

    /// The cached value, computing it with `f` if it is missing
    pub fn get_or_init(&self, f: impl FnOnce() -> T) -> &T {
        self.0.get_or_init(f)
    }

    /// The cached value, if it is current
    pub fn get(&self) -> Option<&T> {
        self.0.get()
    }

    /// Whether the next read will recompute
    pub fn is_stale(&self) -> bool {
        self.0.get().is_none()
    }

    /// Drop the cached value, returning it if there was one
    pub fn invalidate(&mut self) -> Option<T> {
        self.0.take()
    }
}

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn computes_once_per_invalidation() {
        let calls = Cell::new(0);
        let mut cache = Cached::new();
        assert!(cache.is_stale());

        let compute = || {
            calls.set(calls.get() + 1);
            calls.get() * 10
        };

        assert_eq!(*cache.get_or_init(compute), 10);
        assert_eq!(*cache.get_or_init(compute), 10);
        assert_eq!(calls.get(), 1);
        assert!(!cache.is_stale());

        assert_eq!(cache.invalidate(), Some(10));
        assert!(cache.is_stale());
        assert_eq!(cache.get(), None);

        assert_eq!(*cache.get_or_init(compute), 20);
        assert_eq!(calls.get(), 2);
    }
}
