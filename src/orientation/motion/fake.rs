use std::{
    collections::HashMap,
    fmt::Debug,
    sync::{Arc, Mutex},
    time::Duration,
};

use crate::orientation::Attitude;

use super::{lock, MotionCallback, MotionError, MotionProvider, SubscriptionHandle};

#[derive(Default)]
struct Inner {
    available: bool,
    fail_subscribe: bool,
    next_id: u64,
    subscriptions: HashMap<u64, MotionCallback>,
    last_interval: Option<Duration>,
    total_subscriptions: usize,
}

/// Deterministic [MotionProvider] driven by explicit calls. Updates are
/// delivered synchronously on the caller's thread.
#[derive(Clone, Default)]
pub struct FakeMotion {
    inner: Arc<Mutex<Inner>>,
}

impl FakeMotion {
    pub fn new(available: bool) -> Self {
        let fake = Self::default();
        fake.set_available(available);
        fake
    }

    pub fn set_available(&self, available: bool) {
        lock(&self.inner).available = available;
    }

    /// Make subscribing fail even while the sensor reports itself available
    pub fn set_fail_subscribe(&self, fail: bool) {
        lock(&self.inner).fail_subscribe = fail;
    }

    /// Deliver the given attitude to every active subscription
    pub fn emit(&self, attitude: Attitude) {
        self.deliver(Some(attitude), None);
    }

    /// Deliver the given error to every active subscription
    pub fn emit_error(&self, error: MotionError) {
        self.deliver(None, Some(error));
    }

    /// Deliver an update carrying neither data nor an error
    pub fn emit_empty(&self) {
        self.deliver(None, None);
    }

    /// Number of currently active subscriptions
    pub fn subscription_count(&self) -> usize {
        lock(&self.inner).subscriptions.len()
    }

    /// Number of subscriptions ever made
    pub fn total_subscriptions(&self) -> usize {
        lock(&self.inner).total_subscriptions
    }

    /// Update interval requested by the most recent subscription
    pub fn last_interval(&self) -> Option<Duration> {
        lock(&self.inner).last_interval
    }

    fn deliver(&self, attitude: Option<Attitude>, error: Option<MotionError>) {
        let mut inner = lock(&self.inner);
        for callback in inner.subscriptions.values_mut() {
            callback(attitude, error.clone());
        }
    }
}

impl MotionProvider for FakeMotion {
    fn is_available(&self) -> bool {
        lock(&self.inner).available
    }

    fn subscribe(
        &self,
        interval: Duration,
        callback: MotionCallback,
    ) -> Result<SubscriptionHandle, MotionError> {
        let mut inner = lock(&self.inner);
        if !inner.available {
            return Err(MotionError::Unavailable);
        }
        if inner.fail_subscribe {
            return Err(MotionError::Subscribe("sensor refused subscription".into()));
        }
        inner.next_id += 1;
        let id = inner.next_id;
        inner.subscriptions.insert(id, callback);
        inner.last_interval = Some(interval);
        inner.total_subscriptions += 1;
        Ok(SubscriptionHandle::new(id))
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        lock(&self.inner).subscriptions.remove(&handle.id());
    }
}

impl Debug for FakeMotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("FakeMotion")
            .field("available", &inner.available)
            .field("subscriptions", &inner.subscriptions.len())
            .finish()
    }
}
