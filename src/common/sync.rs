//! Thread helpers shared by the fetch cache and the batch runner
//!
//! Documents and versions fan out on rayon pools. Downloads are capped
//! separately by [`Permits`]: document workers times version workers can
//! exceed the fetch limit.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{CookbookError, Result};

/// Lock a mutex, recovering the guard if another thread panicked while holding it
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Build a rayon pool with `threads` workers (at least one)
pub fn worker_pool(threads: usize) -> Result<ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()
        .map_err(|e| CookbookError::WorkerPoolFailed {
            reason: e.to_string(),
        })
}

/// Counting semaphore bounding the number of outstanding operations
#[derive(Debug)]
pub struct Permits {
    available: Mutex<usize>,
    released: Condvar,
}

/// A held permit, returned to its pool on drop
pub struct Permit<'a> {
    permits: &'a Permits,
}

impl Permits {
    /// Create a pool of `limit` permits (at least one)
    pub fn new(limit: usize) -> Self {
        Self {
            available: Mutex::new(limit.max(1)),
            released: Condvar::new(),
        }
    }

    /// Block until a permit is free and take it
    pub fn acquire(&self) -> Permit<'_> {
        let mut available = lock(&self.available);
        while *available == 0 {
            available = self
                .released
                .wait(available)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *available -= 1;
        Permit { permits: self }
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        *lock(&self.permits.available) += 1;
        self.permits.released.notify_one();
    }
}
