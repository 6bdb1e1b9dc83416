pub mod fake;
#[cfg(feature = "iio")]
pub mod iio;

#[cfg(test)]
mod mod_test;

use std::{
    sync::{Mutex, MutexGuard},
    thread::{self, JoinHandle},
    time::Duration,
};

use thiserror::Error;
use tokio::runtime::RuntimeFlavor;

use super::Attitude;

/// Callback invoked for every motion update. Exactly one of the arguments is
/// normally set, but a provider may deliver neither when it has no data.
pub type MotionCallback = Box<dyn FnMut(Option<Attitude>, Option<MotionError>) + Send>;

/// Possible errors reported by a motion provider
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    #[error("motion sensor is not available")]
    Unavailable,
    #[error("failed to read motion sensor: {0}")]
    Read(String),
    #[error("failed to subscribe to motion updates: {0}")]
    Subscribe(String),
}

/// Identifies an active motion subscription
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// A platform capability that delivers device attitude updates
pub trait MotionProvider: Send + Sync {
    /// Returns true if the motion sensor can currently be used
    fn is_available(&self) -> bool;

    /// Start delivering updates to the given callback roughly every `interval`
    fn subscribe(
        &self,
        interval: Duration,
        callback: MotionCallback,
    ) -> Result<SubscriptionHandle, MotionError>;

    /// Stop delivering updates for the given subscription. Once this returns
    /// the subscription's callback will not be called again.
    fn unsubscribe(&self, handle: SubscriptionHandle);
}

/// Provider for platforms without a motion sensor
#[derive(Debug, Default)]
pub struct NullMotion;

impl MotionProvider for NullMotion {
    fn is_available(&self) -> bool {
        false
    }

    fn subscribe(
        &self,
        _interval: Duration,
        _callback: MotionCallback,
    ) -> Result<SubscriptionHandle, MotionError> {
        Err(MotionError::Unavailable)
    }

    fn unsubscribe(&self, _handle: SubscriptionHandle) {}
}

/// Lock the given mutex, recovering the data if a callback panicked while
/// holding it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            log::warn!("Recovering poisoned motion provider lock");
            poisoned.into_inner()
        }
    }
}

/// Wait for a polling thread to exit. On a multi-threaded tokio runtime the
/// wait is moved off the async worker with `block_in_place`; elsewhere the
/// thread is joined directly.
pub(crate) fn join_thread<T>(thread: JoinHandle<T>) -> thread::Result<T> {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(|| thread.join())
        }
        _ => thread.join(),
    }
}
