use std::{
    error::Error,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use crate::orientation::motion::join_thread;

fn spawn_poller(running: Arc<AtomicBool>) -> thread::JoinHandle<u32> {
    thread::spawn(move || {
        let mut polls = 0;
        loop {
            polls += 1;
            if !running.load(Ordering::Acquire) {
                break polls;
            }
            thread::sleep(Duration::from_millis(1));
        }
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_join_thread_on_worker() -> Result<(), Box<dyn Error>> {
    let running = Arc::new(AtomicBool::new(true));
    let poller = spawn_poller(running.clone());
    thread::sleep(Duration::from_millis(5));

    running.store(false, Ordering::Release);
    let polls = join_thread(poller).map_err(|_| "polling thread panicked")?;
    assert!(polls > 0);

    Ok(())
}

#[tokio::test]
async fn test_join_thread_on_current_thread_runtime() -> Result<(), Box<dyn Error>> {
    let running = Arc::new(AtomicBool::new(false));
    let poller = spawn_poller(running);
    assert_eq!(join_thread(poller).map_err(|_| "polling thread panicked")?, 1);

    Ok(())
}

#[test]
fn test_join_thread_outside_runtime() {
    let poller = thread::spawn(|| 7);
    assert_eq!(join_thread(poller).ok(), Some(7));
}
