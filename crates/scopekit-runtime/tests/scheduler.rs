//! Scheduler behavior against a paused tokio clock.
//!
//! Cycles run on the blocking pool, which holds the clock still until they
//! finish, so cycle counts follow virtual time exactly.
//!
//! Run with: `cargo test -p scopekit-runtime`

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use scopekit_core::color::Rgb8;
use scopekit_core::{OwnedFrame, PixelLayout, ScopeConfig, ScopeImages, ScopeKind, ScopeVisibility};
use scopekit_runtime::{
    ControlSnapshot, LatestFrameSlot, ScopePipeline, ScopeScheduler, SharedControls,
};

const CADENCE: Duration = Duration::from_millis(10);

fn fast_config() -> ScopeConfig {
    ScopeConfig {
        cadence_ms: 10,
        ..ScopeConfig::default()
    }
}

fn collector() -> (Arc<Mutex<Vec<ScopeImages>>>, impl FnMut(ScopeImages) + Send + 'static) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let received = Arc::clone(&received);
        move |images| received.lock().push(images)
    };
    (received, sink)
}

#[tokio::test(start_paused = true)]
async fn test_cycles_are_delivered_at_cadence() {
    let slot = Arc::new(LatestFrameSlot::new());
    slot.publish(OwnedFrame::solid(32, 18, Rgb8::new(40, 80, 120)));
    let (received, sink) = collector();

    let handle = ScopeScheduler::spawn(
        Arc::clone(&slot),
        sink,
        SharedControls::default(),
        ScopePipeline::new(fast_config()),
    );
    // Ticks at 0, 10, 20, 30 and 40ms.
    tokio::time::sleep(CADENCE * 4 + CADENCE / 2).await;
    let pipeline = handle.shutdown().await.unwrap();

    assert_eq!(received.lock().len(), 5);
    assert_eq!(pipeline.stats().cycles, 5);
    assert!(received.lock().iter().all(|images| images.len() == 4));
}

#[tokio::test(start_paused = true)]
async fn test_last_published_frame_wins() {
    let slot = Arc::new(LatestFrameSlot::new());
    slot.publish(OwnedFrame::solid(16, 16, Rgb8::new(255, 0, 0)));
    slot.publish(OwnedFrame::solid(16, 16, Rgb8::new(0, 255, 0)));
    let last = OwnedFrame::solid(16, 16, Rgb8::new(0, 0, 255));
    slot.publish(last.clone());
    let (received, sink) = collector();

    let handle = ScopeScheduler::spawn(
        Arc::clone(&slot),
        sink,
        SharedControls::default(),
        ScopePipeline::new(fast_config()),
    );
    tokio::time::sleep(CADENCE * 2 + CADENCE / 2).await;
    handle.shutdown().await.unwrap();

    assert_eq!(slot.dropped(), 2);
    let expected = ScopePipeline::new(fast_config())
        .run_cycle(&last, ControlSnapshot::default())
        .unwrap();
    let received = received.lock();
    assert_eq!(received.len(), 3);
    assert!(received.iter().all(|images| *images == expected));
}

#[tokio::test(start_paused = true)]
async fn test_frames_published_between_ticks_are_picked_up() {
    let slot = Arc::new(LatestFrameSlot::new());
    let (received, sink) = collector();

    let handle = ScopeScheduler::spawn(
        Arc::clone(&slot),
        sink,
        SharedControls::default(),
        ScopePipeline::new(fast_config()),
    );
    // The tick at 0ms finds the slot empty.
    tokio::time::sleep(CADENCE / 2).await;
    assert!(received.lock().is_empty());

    slot.publish(OwnedFrame::solid(16, 16, Rgb8::new(255, 255, 255)));
    tokio::time::sleep(CADENCE).await;
    assert_eq!(received.lock().len(), 1);
    assert_eq!(slot.generation(), 1);
    assert_eq!(slot.dropped(), 0);
    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_no_output_after_shutdown() {
    let slot = Arc::new(LatestFrameSlot::new());
    slot.publish(OwnedFrame::solid(8, 8, Rgb8::new(10, 10, 10)));
    let (received, sink) = collector();

    let handle = ScopeScheduler::spawn(
        Arc::clone(&slot),
        sink,
        SharedControls::default(),
        ScopePipeline::new(fast_config()),
    );
    tokio::time::sleep(CADENCE * 2 + CADENCE / 2).await;
    handle.shutdown().await.unwrap();

    let at_stop = received.lock().len();
    assert_eq!(at_stop, 3);
    tokio::time::advance(CADENCE * 5).await;
    assert_eq!(received.lock().len(), at_stop);
}

#[tokio::test(start_paused = true)]
async fn test_stop_finishes_the_loop() {
    let slot = Arc::new(LatestFrameSlot::new());
    slot.publish(OwnedFrame::solid(8, 8, Rgb8::new(10, 10, 10)));
    let (_received, sink) = collector();

    let handle = ScopeScheduler::spawn(
        Arc::clone(&slot),
        sink,
        SharedControls::default(),
        ScopePipeline::new(fast_config()),
    );
    tokio::time::sleep(CADENCE / 2).await;
    assert!(!handle.is_finished());

    handle.stop();
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert!(handle.is_finished());
    let pipeline = handle.shutdown().await.unwrap();
    assert_eq!(pipeline.stats().cycles, 1);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_frames_are_skipped() {
    let slot = Arc::new(LatestFrameSlot::new());
    slot.publish(OwnedFrame::new(4, 4, PixelLayout::Rgba, vec![0; 5]));
    let (received, sink) = collector();

    let handle = ScopeScheduler::spawn(
        Arc::clone(&slot),
        sink,
        SharedControls::default(),
        ScopePipeline::new(fast_config()),
    );
    tokio::time::sleep(CADENCE * 3 + CADENCE / 2).await;
    let pipeline = handle.shutdown().await.unwrap();

    assert!(received.lock().is_empty());
    assert_eq!(pipeline.stats().cycles, 0);
    assert_eq!(pipeline.stats().skipped, 4);
}

#[tokio::test(start_paused = true)]
async fn test_idle_without_frames() {
    let slot = Arc::new(LatestFrameSlot::new());
    let (received, sink) = collector();

    let handle = ScopeScheduler::spawn(
        Arc::clone(&slot),
        sink,
        SharedControls::default(),
        ScopePipeline::new(fast_config()),
    );
    tokio::time::sleep(CADENCE * 3).await;
    let pipeline = handle.shutdown().await.unwrap();

    assert!(received.lock().is_empty());
    assert_eq!(pipeline.stats().cycles + pipeline.stats().skipped, 0);
}

#[tokio::test(start_paused = true)]
async fn test_visibility_controls_apply_to_cycles() {
    let slot = Arc::new(LatestFrameSlot::new());
    slot.publish(OwnedFrame::solid(24, 24, Rgb8::new(200, 150, 100)));
    let mut only_waveform = ScopeVisibility::NONE;
    only_waveform.set(ScopeKind::Waveform, true);
    let controls = SharedControls::new(only_waveform);
    let (received, sink) = collector();

    let handle = ScopeScheduler::spawn(
        Arc::clone(&slot),
        sink,
        controls.clone(),
        ScopePipeline::new(fast_config()),
    );
    tokio::time::sleep(CADENCE + CADENCE / 2).await;
    assert_eq!(received.lock().len(), 2);

    // Hiding everything mid-run skips the following cycles.
    controls.set_visibility(ScopeVisibility::NONE);
    tokio::time::sleep(CADENCE * 2).await;
    let pipeline = handle.shutdown().await.unwrap();

    let received = received.lock();
    assert_eq!(received.len(), 2);
    assert_eq!(pipeline.stats().skipped, 2);
    for images in received.iter() {
        assert_eq!(images.len(), 1);
        assert!(images.get(ScopeKind::Waveform).is_some());
    }
}
