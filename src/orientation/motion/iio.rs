use std::{
    collections::HashMap,
    fmt::Debug,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use crate::{
    config,
    drivers::iio_imu::{
        driver::{find_accel_device, DeviceId, Driver},
        info::MountMatrix,
    },
};

use super::{join_thread, lock, MotionCallback, MotionError, MotionProvider, SubscriptionHandle};

struct Subscription {
    running: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

/// [MotionProvider] backed by a Linux IIO accelerometer. Each subscription
/// polls the device on its own thread.
pub struct IioMotion {
    config: Option<config::Iio>,
    next_id: AtomicU64,
    subscriptions: Mutex<HashMap<u64, Subscription>>,
}

impl IioMotion {
    pub fn new(config: Option<config::Iio>) -> Self {
        Self {
            config,
            next_id: AtomicU64::new(0),
            subscriptions: Mutex::new(HashMap::new()),
        }
    }

    fn find_device(&self) -> Option<DeviceId> {
        let wanted = self.config.as_ref().and_then(|c| c.device.as_deref());
        find_accel_device(wanted)
    }

    fn mount_matrix(&self) -> Option<MountMatrix> {
        self.config
            .as_ref()
            .and_then(|c| c.mount_matrix.as_ref())
            .map(MountMatrix::from)
    }
}

impl MotionProvider for IioMotion {
    fn is_available(&self) -> bool {
        self.find_device().is_some()
    }

    fn subscribe(
        &self,
        interval: Duration,
        mut callback: MotionCallback,
    ) -> Result<SubscriptionHandle, MotionError> {
        let Some(device) = self.find_device() else {
            return Err(MotionError::Unavailable);
        };
        let matrix = self.mount_matrix();
        let running = Arc::new(AtomicBool::new(true));
        let thread_running = running.clone();

        // The IIO context is not thread-safe, so the driver lives entirely
        // on the polling thread.
        let thread = thread::Builder::new()
            .name(format!("iio-motion-{}", device.id))
            .spawn(move || {
                let driver = match Driver::new(&device, matrix) {
                    Ok(driver) => driver,
                    Err(e) => {
                        log::error!("Failed to open IIO device {}: {e}", device.id);
                        callback(None, Some(MotionError::Read(e.to_string())));
                        return;
                    }
                };
                if let Some(device_hz) = driver.sample_rate() {
                    let requested_hz = 1.0 / interval.as_secs_f64();
                    if requested_hz > device_hz {
                        log::warn!(
                            "Requested {requested_hz}Hz but {} only samples at {device_hz}Hz",
                            device.name
                        );
                    }
                }
                log::debug!("Polling {} every {interval:?}", device.name);
                while thread_running.load(Ordering::Acquire) {
                    match driver.poll() {
                        Ok(data) => callback(Some(data.to_attitude()), None),
                        Err(e) => callback(None, Some(MotionError::Read(e.to_string()))),
                    }
                    thread::sleep(interval);
                }
                log::debug!("Stopped polling {}", device.name);
            })
            .map_err(|e| MotionError::Subscribe(e.to_string()))?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        lock(&self.subscriptions).insert(id, Subscription { running, thread });
        Ok(SubscriptionHandle::new(id))
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        let Some(subscription) = lock(&self.subscriptions).remove(&handle.id()) else {
            return;
        };
        subscription.running.store(false, Ordering::Release);
        if join_thread(subscription.thread).is_err() {
            log::error!("IIO polling thread panicked");
        }
    }
}

impl Drop for IioMotion {
    fn drop(&mut self) {
        let ids: Vec<u64> = lock(&self.subscriptions).keys().copied().collect();
        for id in ids {
            self.unsubscribe(SubscriptionHandle::new(id));
        }
    }
}

impl Debug for IioMotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IioMotion")
            .field("config", &self.config)
            .finish()
    }
}
