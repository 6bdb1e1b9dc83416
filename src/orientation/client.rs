use std::time::Duration;

use thiserror::Error;
use tokio::{
    sync::mpsc::{channel, error::SendTimeoutError, Receiver, Sender},
    time::timeout,
};

use super::{
    sampler::SamplerError, service::OrientationCommand, CalibrationOffset, DisplayState,
    SampleSource,
};

/// Maximum duration to wait for a response from a command. If this timeout
/// is reached, that typically indicates a deadlock somewhere in the code.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Possible errors for an orientation service client
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("failed to start sampling: {0}")]
    Sampler(#[from] SamplerError),
    #[error("timed out waiting for the orientation service")]
    Timeout,
    #[error("orientation service no longer exists")]
    ChannelClosed,
}

/// A client for the [OrientationService](super::service::OrientationService)
#[derive(Debug, Clone)]
pub struct OrientationClient {
    tx: Sender<OrientationCommand>,
}

impl From<Sender<OrientationCommand>> for OrientationClient {
    fn from(tx: Sender<OrientationCommand>) -> Self {
        OrientationClient::new(tx)
    }
}

impl OrientationClient {
    pub fn new(tx: Sender<OrientationCommand>) -> Self {
        Self { tx }
    }

    /// Send the given command to the service. This method uses a timeout to
    /// detect potential deadlocks.
    async fn send(&self, cmd: OrientationCommand) -> Result<(), ClientError> {
        let Err(err) = self.tx.send_timeout(cmd, DEFAULT_TIMEOUT).await else {
            return Ok(());
        };
        match err {
            SendTimeoutError::Timeout(cmd) => {
                log::error!("POSSIBLE DEADLOCK: timed out after {DEFAULT_TIMEOUT:?} sending command to orientation service: {cmd:?}");
                Err(ClientError::Timeout)
            }
            SendTimeoutError::Closed(_) => Err(ClientError::ChannelClosed),
        }
    }

    /// Wait for a response from the service using the given receiver
    async fn recv<T>(mut rx: Receiver<T>) -> Result<T, ClientError> {
        match timeout(DEFAULT_TIMEOUT, rx.recv()).await {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Err(ClientError::ChannelClosed),
            Err(_) => {
                log::error!("POSSIBLE DEADLOCK: timed out after {DEFAULT_TIMEOUT:?} waiting for response from orientation service");
                Err(ClientError::Timeout)
            }
        }
    }

    /// Start sampling at the given rate. Returns the source that was started,
    /// which is synthetic if the motion sensor could not be used.
    pub async fn start(&self, rate_hz: f64, synthetic: bool) -> Result<SampleSource, ClientError> {
        let (tx, rx) = channel(1);
        self.send(OrientationCommand::Start {
            rate_hz,
            synthetic,
            reply: tx,
        })
        .await?;
        Ok(Self::recv(rx).await??)
    }

    /// Stop sampling. No tick from the stopped source is applied after this
    /// returns. Calibration is kept.
    pub async fn stop(&self) -> Result<(), ClientError> {
        let (tx, rx) = channel(1);
        self.send(OrientationCommand::Stop(tx)).await?;
        Self::recv(rx).await
    }

    /// Make the current reading the zero point. Returns the new offset.
    pub async fn calibrate(&self) -> Result<CalibrationOffset, ClientError> {
        let (tx, rx) = channel(1);
        self.send(OrientationCommand::Calibrate(tx)).await?;
        Self::recv(rx).await
    }

    /// Get the current display state
    pub async fn get_display_state(&self) -> Result<DisplayState, ClientError> {
        let (tx, rx) = channel(1);
        self.send(OrientationCommand::GetDisplayState(tx)).await?;
        Self::recv(rx).await
    }

    /// Get the accumulated calibration offset
    pub async fn get_calibration(&self) -> Result<CalibrationOffset, ClientError> {
        let (tx, rx) = channel(1);
        self.send(OrientationCommand::GetCalibration(tx)).await?;
        Self::recv(rx).await
    }

    /// Get the active sample source, if sampling
    pub async fn get_source(&self) -> Result<Option<SampleSource>, ClientError> {
        let (tx, rx) = channel(1);
        self.send(OrientationCommand::GetSource(tx)).await?;
        Self::recv(rx).await
    }

    /// Stop the service task
    pub async fn shutdown(&self) -> Result<(), ClientError> {
        self.send(OrientationCommand::Shutdown).await
    }
}
