#[cfg(not(feature = "parking-lot"))]
pub use std::sync::{Mutex, MutexGuard};

#[cfg(feature = "parking-lot")]
pub use parking_lot::{Mutex, MutexGuard};

/// Acquires `mutex`, recovering the guard if a previous holder panicked.
///
/// Every critical section in this crate writes its state back as a whole, so a
/// poisoned lock still guards a consistent value.
#[cfg(not(feature = "parking-lot"))]
#[inline]
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(feature = "parking-lot")]
#[inline]
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock()
}
