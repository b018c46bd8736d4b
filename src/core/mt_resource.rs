use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A thread-safe, reference-counted value with read-write locking.
///
/// `MtResource` is the shared container behind every store, queue and the
/// observer position. Clones share the same underlying value, so a resource can
/// be handed to each worker loop while the foreground thread keeps its own copy.
///
/// Guards must never be held across chunk generation or meshing; take what is
/// needed, drop the guard, then compute.
///
/// # Poisoning
/// A worker that panics while holding a guard does not take the resource down
/// with it: the poisoned lock is recovered and the inner value handed out as-is.
/// Every mutation done through this type is a single map/queue operation, so the
/// value is never left half-written.
///
/// # Examples
///
/// ```
/// use voxel_streaming::core::MtResource;
///
/// let counter = MtResource::new(0);
/// let counter_clone = counter.clone();
///
/// std::thread::spawn(move || {
///     *counter_clone.get_mut() += 1;
/// })
/// .join()
/// .unwrap();
///
/// assert_eq!(counter.snapshot(), 1);
/// ```
pub struct MtResource<T: Send + Sync> {
    resource: Arc<RwLock<T>>,
}

impl<T: Send + Sync + 'static> MtResource<T> {
    /// Creates a new `MtResource` containing the given value.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Returns a read guard; concurrent readers do not block each other.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns an exclusive write guard.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the contained value and returns the previous one.
    pub fn replace(&self, value: T) -> T {
        std::mem::replace(&mut *self.get_mut(), value)
    }
}

impl<T: Send + Sync + Clone + 'static> MtResource<T> {
    /// Copies the contained value out, releasing the lock before returning.
    pub fn snapshot(&self) -> T {
        self.get().clone()
    }
}

impl<T: Send + Sync + Default + 'static> Default for MtResource<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Send + Sync> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}
