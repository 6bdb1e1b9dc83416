use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use bubblelevel::constants::FALLBACK_MESSAGE;
use bubblelevel::orientation::{
    bubble::bubble_offset, motion::fake::FakeMotion, service::OrientationService, Attitude,
    SampleSource,
};
use tokio::time::timeout;

#[tokio::test]
async fn test_level_workflow() -> Result<(), Box<dyn Error>> {
    let fake = FakeMotion::new(true);
    let service = OrientationService::new(Arc::new(fake.clone()));
    let client = service.client();
    let mut display = service.subscribe();
    let task = tokio::spawn(service.run());

    assert_eq!(client.start(100.0, false).await?, SampleSource::Hardware);
    display.borrow_and_update();

    // Device resting on a slope
    fake.emit(Attitude::from_euler(
        25f64.to_radians(),
        (-5f64).to_radians(),
        0.0,
    ));
    timeout(Duration::from_secs(1), display.changed()).await??;
    let state = display.borrow_and_update().clone();
    let (x, y) = bubble_offset(state.roll_deg, state.pitch_deg, 50.0);
    assert!(((x * x + y * y).sqrt() - 50.0).abs() < 1e-9, "bubble should rest on the rim");
    assert!(x > 0.0 && y > 0.0);

    // Use the slope as the reference
    client.calibrate().await?;
    fake.emit(Attitude::from_euler(
        25f64.to_radians(),
        (-5f64).to_radians(),
        0.0,
    ));
    timeout(Duration::from_secs(1), display.changed()).await??;
    let state = display.borrow_and_update().clone();
    let (x, y) = bubble_offset(state.roll_deg, state.pitch_deg, 50.0);
    assert!(x.abs() < 1e-6 && y.abs() < 1e-6, "bubble should be centered");

    // Sensor goes away; restarting falls back to simulated data
    fake.set_available(false);
    assert_eq!(client.start(100.0, false).await?, SampleSource::Synthetic);
    let state = client.get_display_state().await?;
    assert_eq!(state.error_message.as_deref(), Some(FALLBACK_MESSAGE));

    client.stop().await?;
    client.shutdown().await?;
    task.await?;

    Ok(())
}
