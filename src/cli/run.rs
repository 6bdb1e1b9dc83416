use std::{error::Error, sync::Arc, time::Duration};

use clap::Args;
use serde::Serialize;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    time::interval,
};

use crate::{
    config::Config,
    orientation::{
        bubble::bubble_offset_scaled,
        motion::MotionProvider,
        service::OrientationService,
        DisplayState,
    },
};

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Use simulated data instead of the motion sensor
    #[arg(long)]
    pub synthetic: bool,
    /// Sample rate in Hz (overrides the config)
    #[arg(long)]
    pub rate: Option<f64>,
    /// Bubble dial radius (overrides the config)
    #[arg(long)]
    pub radius: Option<f64>,
    /// How many times per second to print the display state
    #[arg(long, default_value_t = 10.0)]
    pub refresh: f64,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            synthetic: false,
            rate: None,
            radius: None,
            refresh: 10.0,
        }
    }
}

const MIN_REFRESH_HZ: f64 = 0.1;
const MAX_REFRESH_HZ: f64 = 1000.0;

/// One line of output
#[derive(Serialize)]
struct StateLine<'a> {
    #[serde(flatten)]
    state: &'a DisplayState,
    bubble_x: f64,
    bubble_y: f64,
}

/// Run the orientation service and print the display state until stopped.
/// Lines read from stdin control the service: "c" calibrates, "q" quits.
pub async fn handle_run(config: Config, args: RunArgs) -> Result<(), Box<dyn Error + Send + Sync>> {
    let rate = args.rate.unwrap_or(config.sample_rate_hz);
    let synthetic = args.synthetic || config.synthetic;
    let radius = args.radius.unwrap_or(config.bubble.radius);
    let full_scale = config.bubble.full_scale_deg;

    let service = OrientationService::new(motion_provider(&config));
    let client = service.client();
    let mut display = service.subscribe();
    let service_task = tokio::spawn(service.run());

    let source = client.start(rate, synthetic).await?;
    log::info!("Sampling orientation from the {source} source at {rate}Hz");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut refresh = interval(refresh_period(args.refresh));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                log::info!("Shutting down");
                break;
            }
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    log::debug!("stdin closed");
                    stdin_open = false;
                    continue;
                };
                match line.trim() {
                    "c" | "calibrate" => {
                        let offset = client.calibrate().await?;
                        log::info!("New zero point: roll={:.2} pitch={:.2}", offset.roll, offset.pitch);
                    }
                    "q" | "quit" => break,
                    "" => (),
                    other => log::warn!("Unknown command: {other}"),
                }
            }
            _ = refresh.tick() => {
                let state = display.borrow_and_update().clone();
                let (bubble_x, bubble_y) =
                    bubble_offset_scaled(state.roll_deg, state.pitch_deg, radius, full_scale);
                let line = StateLine { state: &state, bubble_x, bubble_y };
                println!("{}", serde_json::to_string(&line)?);
            }
        }
    }

    client.stop().await?;
    client.shutdown().await?;
    service_task.await?;

    Ok(())
}

/// Period between printed state lines. Out of range or NaN rates are clamped
/// so the period is never zero.
pub(crate) fn refresh_period(refresh_hz: f64) -> Duration {
    let hz = refresh_hz.max(MIN_REFRESH_HZ).min(MAX_REFRESH_HZ);
    Duration::from_secs_f64(1.0 / hz)
}

/// Returns the motion provider for this platform
fn motion_provider(config: &Config) -> Arc<dyn MotionProvider> {
    #[cfg(feature = "iio")]
    {
        Arc::new(crate::orientation::motion::iio::IioMotion::new(config.iio.clone()))
    }
    #[cfg(not(feature = "iio"))]
    {
        if config.iio.is_some() {
            log::warn!("IIO options are set but this build has no IIO support");
        }
        Arc::new(crate::orientation::motion::NullMotion)
    }
}
