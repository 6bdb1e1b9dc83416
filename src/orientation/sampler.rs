use std::{sync::Arc, time::Duration};

use thiserror::Error;
use tokio::{
    sync::mpsc::{error::TrySendError, Sender},
    time::Instant,
};

use super::{
    motion::{MotionCallback, MotionProvider, SubscriptionHandle},
    synthetic::SyntheticGenerator,
    ticker::{CancelToken, Ticker},
    OrientationSample, SampleSource,
};

/// Possible errors when starting the sampler
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SamplerError {
    #[error("invalid sample rate: {0}Hz")]
    InvalidRate(f64),
}

/// An orientation sample tagged with the sampler generation that produced it
#[derive(Clone, Copy, Debug)]
pub struct Tick {
    pub generation: u64,
    pub sample: OrientationSample,
}

/// Produces orientation ticks from either a [MotionProvider] or the
/// synthetic generator. At most one source is active at a time. Ticks are
/// sent to the channel given at construction.
pub struct OrientationSampler {
    provider: Arc<dyn MotionProvider>,
    tx: Sender<Tick>,
    /// Incremented whenever a source starts or stops so consumers can discard
    /// ticks from a previous source.
    generation: u64,
    source: Option<SampleSource>,
    rate_hz: Option<f64>,
    subscription: Option<SubscriptionHandle>,
    synthetic: Option<CancelToken>,
}

impl OrientationSampler {
    pub fn new(provider: Arc<dyn MotionProvider>, tx: Sender<Tick>) -> Self {
        Self {
            provider,
            tx,
            generation: 0,
            source: None,
            rate_hz: None,
            subscription: None,
            synthetic: None,
        }
    }

    /// Generation of the currently active source
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The active source, if any
    pub fn source(&self) -> Option<SampleSource> {
        self.source
    }

    /// The rate of the active source, if any
    pub fn rate_hz(&self) -> Option<f64> {
        self.rate_hz
    }

    /// Start producing ticks at the given rate, replacing any active source.
    /// The synthetic generator is used when requested or when the motion
    /// sensor cannot be used. Must be called from within a tokio runtime.
    pub fn start(
        &mut self,
        update_hz: f64,
        use_synthetic_source: bool,
    ) -> Result<SampleSource, SamplerError> {
        let Some(interval) = tick_interval(update_hz) else {
            return Err(SamplerError::InvalidRate(update_hz));
        };
        self.stop();

        let source = if use_synthetic_source {
            SampleSource::Synthetic
        } else if !self.provider.is_available() {
            log::warn!("Motion sensor is unavailable, falling back to synthetic source");
            SampleSource::Synthetic
        } else {
            match self.provider.subscribe(interval, self.hardware_callback()) {
                Ok(handle) => {
                    self.subscription = Some(handle);
                    SampleSource::Hardware
                }
                Err(e) => {
                    log::warn!("{e}, falling back to synthetic source");
                    SampleSource::Synthetic
                }
            }
        };

        if source == SampleSource::Synthetic {
            self.synthetic = Some(self.spawn_synthetic(update_hz, interval));
        }

        log::info!("Started {source} orientation source at {update_hz}Hz");
        self.source = Some(source);
        self.rate_hz = Some(update_hz);
        Ok(source)
    }

    /// Stop the active source. Safe to call when nothing is running.
    pub fn stop(&mut self) {
        if let Some(handle) = self.subscription.take() {
            log::debug!("Unsubscribing from motion updates");
            self.provider.unsubscribe(handle);
        }
        if let Some(token) = self.synthetic.take() {
            log::debug!("Cancelling synthetic orientation source");
            token.cancel();
        }
        if let Some(source) = self.source.take() {
            log::info!("Stopped {source} orientation source");
        }
        self.rate_hz = None;
        self.generation += 1;
    }

    /// Build the callback handed to the motion provider. Updates carrying an
    /// error or no attitude are dropped.
    fn hardware_callback(&self) -> MotionCallback {
        let tx = self.tx.clone();
        let generation = self.generation;
        Box::new(move |attitude, error| {
            if let Some(e) = error {
                log::debug!("Ignoring motion update with error: {e}");
                return;
            }
            let Some(attitude) = attitude else {
                log::trace!("Ignoring empty motion update");
                return;
            };
            let sample = OrientationSample::new(attitude, SampleSource::Hardware);
            match tx.try_send(Tick { generation, sample }) {
                Ok(()) => (),
                Err(TrySendError::Full(_)) => {
                    log::warn!("Orientation tick queue is full, dropping sample")
                }
                Err(TrySendError::Closed(_)) => {
                    log::trace!("Orientation tick receiver closed")
                }
            }
        })
    }

    /// Spawn the synthetic generator task and return its cancellation token
    fn spawn_synthetic(&self, update_hz: f64, interval: Duration) -> CancelToken {
        let token = CancelToken::new();
        let task_token = token.clone();
        let tx = self.tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let mut generator = SyntheticGenerator::new(update_hz);
            let mut ticker = Ticker::new(interval, task_token);
            while ticker.tick().await {
                let sample = generator.next_sample();
                if tx.send(Tick { generation, sample }).await.is_err() {
                    log::debug!("Orientation tick receiver closed");
                    break;
                }
            }
            log::debug!("Synthetic orientation source exited after t={}s", generator.time());
        });
        token
    }
}

/// Period between ticks at the given rate. Returns None for rates that do not
/// give a usable timer period, including rates so high the period rounds to
/// zero and rates so low the first deadline cannot be represented.
fn tick_interval(update_hz: f64) -> Option<Duration> {
    if !update_hz.is_finite() || update_hz <= 0.0 {
        return None;
    }
    let interval = Duration::try_from_secs_f64(1.0 / update_hz).ok()?;
    if interval.is_zero() {
        return None;
    }
    Instant::now().checked_add(interval)?;
    Some(interval)
}

impl Drop for OrientationSampler {
    fn drop(&mut self) {
        self.stop();
    }
}
