//! A registry shared between threads behind one external lock.
//!
//! [`Topology`] itself is single-threaded; concurrent users wrap the whole
//! registry in a mutex and hold the guard for each compound operation.

use std::sync::Arc;

use parking_lot::Mutex;

use super::registry::Topology;

/// `Arc`-shared registry guarded by a single `parking_lot` mutex.
pub type SharedTopology = Arc<Mutex<Topology>>;

impl Topology {
    /// Move the registry behind a shared lock.
    pub fn into_shared(self) -> SharedTopology {
        Arc::new(Mutex::new(self))
    }
}
