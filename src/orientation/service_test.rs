use std::{error::Error, sync::Arc, time::Duration};

use tokio::{sync::watch, task::JoinHandle, time::timeout};

use crate::{
    constants::{DEFAULT_FILTER_ALPHA, FALLBACK_MESSAGE},
    orientation::{
        client::{ClientError, OrientationClient},
        motion::{fake::FakeMotion, MotionProvider},
        service::OrientationService,
        synthetic::SyntheticGenerator,
        Attitude, DisplayState, SampleSource,
    },
};

fn spawn_service(
    provider: Arc<dyn MotionProvider>,
) -> (OrientationClient, watch::Receiver<DisplayState>, JoinHandle<()>) {
    let service = OrientationService::new(provider);
    let client = service.client();
    let display = service.subscribe();
    let task = tokio::spawn(service.run());
    (client, display, task)
}

fn tilt(roll_deg: f64, pitch_deg: f64) -> Attitude {
    Attitude::from_euler(roll_deg.to_radians(), pitch_deg.to_radians(), 0.0)
}

async fn wait_for_change(display: &mut watch::Receiver<DisplayState>) -> Result<(), Box<dyn Error>> {
    timeout(Duration::from_secs(1), display.changed()).await??;
    Ok(())
}

#[tokio::test]
async fn test_hardware_updates_display() -> Result<(), Box<dyn Error>> {
    let fake = FakeMotion::new(true);
    let (client, mut display, _task) = spawn_service(Arc::new(fake.clone()));

    assert_eq!(client.start(50.0, false).await?, SampleSource::Hardware);
    assert_eq!(client.get_source().await?, Some(SampleSource::Hardware));
    display.borrow_and_update();

    fake.emit(tilt(4.0, -2.0));
    wait_for_change(&mut display).await?;
    let state = display.borrow_and_update().clone();
    assert!((state.roll_deg - 4.0).abs() < 1e-9);
    assert!((state.pitch_deg + 2.0).abs() < 1e-9);
    assert_eq!(state.sample_hz, 50.0);
    assert_eq!(state.error_message, None);
    assert_eq!(client.get_display_state().await?, state);

    Ok(())
}

#[tokio::test]
async fn test_no_updates_after_stop() -> Result<(), Box<dyn Error>> {
    let fake = FakeMotion::new(true);
    let (client, mut display, _task) = spawn_service(Arc::new(fake.clone()));
    client.start(50.0, false).await?;
    let before = client.get_display_state().await?;

    // This tick is queued before the stop and must be discarded
    fake.emit(tilt(20.0, 20.0));
    client.stop().await?;
    assert_eq!(client.get_source().await?, None);
    assert_eq!(fake.subscription_count(), 0);

    display.borrow_and_update();
    fake.emit(tilt(30.0, 30.0));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!display.has_changed()?);
    assert_eq!(client.get_display_state().await?, before);

    Ok(())
}

#[tokio::test]
async fn test_fallback_sets_error_message() -> Result<(), Box<dyn Error>> {
    let fake = FakeMotion::new(false);
    let (client, display, _task) = spawn_service(Arc::new(fake.clone()));

    assert_eq!(client.start(60.0, false).await?, SampleSource::Synthetic);
    let state = client.get_display_state().await?;
    assert_eq!(state.error_message.as_deref(), Some(FALLBACK_MESSAGE));
    assert_eq!(display.borrow().error_message.as_deref(), Some(FALLBACK_MESSAGE));

    // Explicitly asking for simulated data is not an error
    assert_eq!(client.start(60.0, true).await?, SampleSource::Synthetic);
    assert_eq!(client.get_display_state().await?.error_message, None);

    // Neither is a working sensor
    fake.set_available(true);
    client.start(60.0, false).await?;
    client.start(60.0, false).await?;
    assert_eq!(client.get_display_state().await?.error_message, None);

    Ok(())
}

#[tokio::test]
async fn test_subscribe_failure_sets_error_message() -> Result<(), Box<dyn Error>> {
    let fake = FakeMotion::new(true);
    fake.set_fail_subscribe(true);
    let (client, _display, _task) = spawn_service(Arc::new(fake.clone()));

    assert_eq!(client.start(60.0, false).await?, SampleSource::Synthetic);
    assert_eq!(client.get_source().await?, Some(SampleSource::Synthetic));
    let state = client.get_display_state().await?;
    assert_eq!(state.error_message.as_deref(), Some(FALLBACK_MESSAGE));

    Ok(())
}

#[tokio::test]
async fn test_invalid_rate_is_reported() -> Result<(), Box<dyn Error>> {
    let (client, _display, _task) = spawn_service(Arc::new(FakeMotion::new(true)));
    let result = client.start(0.0, false).await;
    assert!(matches!(result, Err(ClientError::Sampler(_))));
    assert_eq!(client.get_source().await?, None);

    let result = client.start(1e10, true).await;
    assert!(matches!(result, Err(ClientError::Sampler(_))));
    assert_eq!(client.get_source().await?, None);

    Ok(())
}

#[tokio::test]
async fn test_calibrate() -> Result<(), Box<dyn Error>> {
    let fake = FakeMotion::new(true);
    let (client, mut display, _task) = spawn_service(Arc::new(fake.clone()));

    // Calibration is valid before sampling starts
    let offset = client.calibrate().await?;
    assert_eq!(offset.roll, 0.0);

    client.start(50.0, false).await?;
    display.borrow_and_update();
    fake.emit(tilt(6.0, 3.0));
    wait_for_change(&mut display).await?;

    let offset = client.calibrate().await?;
    assert!((offset.roll - 6.0).abs() < 1e-9);
    assert!((offset.pitch - 3.0).abs() < 1e-9);
    assert_eq!(client.get_calibration().await?, offset);

    fake.emit(tilt(6.0, 3.0));
    wait_for_change(&mut display).await?;
    let state = display.borrow_and_update().clone();
    assert!(state.roll_deg.abs() < 1e-9);
    assert!(state.pitch_deg.abs() < 1e-9);

    // Stopping keeps the calibration
    client.stop().await?;
    assert_eq!(client.get_calibration().await?, offset);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_synthetic_publishes_smoothed_state() -> Result<(), Box<dyn Error>> {
    let (client, mut display, _task) = spawn_service(Arc::new(FakeMotion::new(false)));
    client.start(60.0, true).await?;
    display.borrow_and_update();

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(display.has_changed()?);
    let state = display.borrow_and_update().clone();
    assert_eq!(state.sample_hz, 60.0);
    assert_eq!(state.yaw_deg, 0.0);
    assert_eq!(state.qw, 1.0);
    // Smoothed values lag far behind the raw +-8 degree swing
    assert!(state.roll_deg.abs() < 8.0);
    assert!(state.roll_deg != 0.0);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_synthetic_uses_fixed_alpha() -> Result<(), Box<dyn Error>> {
    let (client, _display, _task) = spawn_service(Arc::new(FakeMotion::new(false)));
    client.start(10.0, true).await?;

    // Exactly one tick at t = 0.1s, the next one is due at 0.2s
    tokio::time::sleep(Duration::from_millis(150)).await;
    let state = client.get_display_state().await?;
    let expected_roll = DEFAULT_FILTER_ALPHA * SyntheticGenerator::roll_deg_at(0.1);
    let expected_pitch = DEFAULT_FILTER_ALPHA * SyntheticGenerator::pitch_deg_at(0.1);
    assert!((state.roll_deg - expected_roll).abs() < 1e-9);
    assert!((state.pitch_deg - expected_pitch).abs() < 1e-9);

    Ok(())
}

#[tokio::test]
async fn test_shutdown() -> Result<(), Box<dyn Error>> {
    let fake = FakeMotion::new(true);
    let (client, _display, task) = spawn_service(Arc::new(fake.clone()));
    client.start(50.0, false).await?;

    client.shutdown().await?;
    task.await?;
    assert_eq!(fake.subscription_count(), 0, "shutdown should stop sampling");
    assert!(matches!(
        client.get_display_state().await,
        Err(ClientError::ChannelClosed)
    ));

    Ok(())
}
