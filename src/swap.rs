//! Atomically swapped immutable snapshot.
//!
//! [`SwapCell`] keeps one `Arc`-shared value behind an [`ArcSwap`]. Writers never mutate the
//! value in place: they read the current snapshot, build a new one, and compare-and-swap it
//! in, retrying if another writer won. Readers see a whole snapshot, never a torn one, and a
//! replaced snapshot is freed when its last reader drops it.

use arc_swap::{ArcSwap, Guard};
use log::trace;
use std::fmt;
use std::sync::Arc;

pub struct SwapCell<T> {
    current: ArcSwap<T>,
}

impl<T: Clone> SwapCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            current: ArcSwap::from_pointee(value),
        }
    }

    /// Runs `f` against the current snapshot without copying it.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.current.load();
        f(&**guard)
    }

    /// Copy of the current snapshot.
    pub fn load(&self) -> T {
        self.read(T::clone)
    }

    /// Optimistic read-modify-write.
    ///
    /// `f` receives the current snapshot and returns the replacement plus a side result, or
    /// an error that aborts the update with the cell untouched. `f` may run more than once
    /// under contention and must not have side effects beyond its return value.
    pub fn update<R, E>(&self, mut f: impl FnMut(&T) -> Result<(T, R), E>) -> Result<R, E> {
        let mut current = self.current.load_full();
        loop {
            let (next, out) = f(&current)?;
            let prev = self.current.compare_and_swap(&current, Arc::new(next));
            if Arc::ptr_eq(&prev, &current) {
                return Ok(out);
            }
            trace!("snapshot swap contended, retrying");
            current = Guard::into_inner(prev);
        }
    }
}

impl<T: Clone + Default> Default for SwapCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for SwapCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read(|value| f.debug_tuple("SwapCell").field(value).finish())
    }
}
