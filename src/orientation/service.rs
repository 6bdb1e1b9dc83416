use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::constants::{DEFAULT_FILTER_ALPHA, FALLBACK_MESSAGE};

use super::{
    client::OrientationClient,
    motion::MotionProvider,
    sampler::{OrientationSampler, SamplerError, Tick},
    state::OrientationState,
    CalibrationOffset, DisplayState, SampleSource,
};

const BUFFER_SIZE: usize = 64;
const TICK_BUFFER_SIZE: usize = 256;

/// Commands define all the different ways to interact with the
/// [OrientationService] over a channel. Commands are processed in order on
/// the service task.
#[derive(Debug)]
pub enum OrientationCommand {
    Start {
        rate_hz: f64,
        synthetic: bool,
        reply: mpsc::Sender<Result<SampleSource, SamplerError>>,
    },
    Stop(mpsc::Sender<()>),
    Calibrate(mpsc::Sender<CalibrationOffset>),
    GetDisplayState(mpsc::Sender<DisplayState>),
    GetCalibration(mpsc::Sender<CalibrationOffset>),
    GetSource(mpsc::Sender<Option<SampleSource>>),
    Shutdown,
}

/// Exclusive owner of the [OrientationState] and its sampler. All ticks and
/// commands are applied on the task running [OrientationService::run], and
/// every applied tick is published as a whole [DisplayState].
pub struct OrientationService {
    state: OrientationState,
    sampler: OrientationSampler,
    tx: mpsc::Sender<OrientationCommand>,
    rx: mpsc::Receiver<OrientationCommand>,
    ticks: mpsc::Receiver<Tick>,
    display: watch::Sender<DisplayState>,
}

impl OrientationService {
    pub fn new(provider: Arc<dyn MotionProvider>) -> Self {
        let (tx, rx) = mpsc::channel(BUFFER_SIZE);
        let (tick_tx, ticks) = mpsc::channel(TICK_BUFFER_SIZE);
        let state = OrientationState::new(DEFAULT_FILTER_ALPHA);
        let (display, _) = watch::channel(state.display().clone());

        Self {
            state,
            sampler: OrientationSampler::new(provider, tick_tx),
            tx,
            rx,
            ticks,
            display,
        }
    }

    /// Return a client to communicate with the service while it is running
    pub fn client(&self) -> OrientationClient {
        OrientationClient::new(self.tx.clone())
    }

    /// Return a receiver that observes every published display state
    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.display.subscribe()
    }

    /// Process commands and ticks until shut down or until every client has
    /// been dropped.
    pub async fn run(mut self) {
        log::debug!("Orientation service started");
        loop {
            tokio::select! {
                // Commands take priority so a stop is never queued behind ticks
                biased;
                cmd = self.rx.recv() => {
                    let Some(cmd) = cmd else {
                        log::debug!("All orientation clients dropped");
                        break;
                    };
                    if !self.handle_command(cmd).await {
                        break;
                    }
                }
                Some(tick) = self.ticks.recv() => self.process_tick(tick),
            }
        }
        self.sampler.stop();
        log::debug!("Orientation service stopped");
    }

    /// Handle a single command. Returns false if the service should exit.
    async fn handle_command(&mut self, cmd: OrientationCommand) -> bool {
        log::trace!("Received command: {cmd:?}");
        match cmd {
            OrientationCommand::Start {
                rate_hz,
                synthetic,
                reply,
            } => {
                let result = self.start(rate_hz, synthetic);
                if let Err(e) = reply.send(result).await {
                    log::error!("Failed to send start result: {e:?}");
                }
            }
            OrientationCommand::Stop(reply) => {
                self.sampler.stop();
                if let Err(e) = reply.send(()).await {
                    log::error!("Failed to send stop response: {e:?}");
                }
            }
            OrientationCommand::Calibrate(reply) => {
                let offset = self.state.calibrate();
                if let Err(e) = reply.send(offset).await {
                    log::error!("Failed to send calibration offset: {e:?}");
                }
            }
            OrientationCommand::GetDisplayState(reply) => {
                if let Err(e) = reply.send(self.state.display().clone()).await {
                    log::error!("Failed to send display state: {e:?}");
                }
            }
            OrientationCommand::GetCalibration(reply) => {
                if let Err(e) = reply.send(self.state.offset()).await {
                    log::error!("Failed to send calibration offset: {e:?}");
                }
            }
            OrientationCommand::GetSource(reply) => {
                if let Err(e) = reply.send(self.sampler.source()).await {
                    log::error!("Failed to send sample source: {e:?}");
                }
            }
            OrientationCommand::Shutdown => {
                log::debug!("Stopping orientation service");
                return false;
            }
        }
        true
    }

    /// Start sampling, recording on the display whether the motion sensor
    /// had to be replaced by simulated data.
    fn start(&mut self, rate_hz: f64, synthetic: bool) -> Result<SampleSource, SamplerError> {
        let source = self.sampler.start(rate_hz, synthetic)?;
        self.state.set_sample_rate(rate_hz);
        let fell_back = !synthetic && source == SampleSource::Synthetic;
        self.state
            .set_error_message(fell_back.then(|| FALLBACK_MESSAGE.to_string()));
        self.publish();
        Ok(source)
    }

    fn process_tick(&mut self, tick: Tick) {
        if tick.generation != self.sampler.generation() {
            log::trace!(
                "Dropping tick from stale generation {} (current {})",
                tick.generation,
                self.sampler.generation()
            );
            return;
        }
        self.state.on_sample(&tick.sample);
        self.publish();
    }

    fn publish(&self) {
        self.display.send_replace(self.state.display().clone());
    }
}
