use crate::config::Config;
use crate::device_camera::interface::Frame;
use crate::error::PipelineError;
use crate::orientation::resolver::{DeviceOrientation, OrientationTag};
use crate::presentation::impl_fake::PresentationFake;
use crate::presentation::interface::Transition;
use crate::rock_finder::core::{Effect, Lifecycle, Msg};
use crate::rock_finder::tests::fixture::{
    frame, other, rock, DeviceCameraManual, Fixture, ImageClassifierScripted,
};
use crate::stability_filter::core::StableState;
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn transition(from: StableState, to: StableState) -> Transition {
    Transition { from, to }
}

#[test]
fn test_start_failure_is_source_unavailable() {
    let f = Fixture::new(
        Config::default(),
        DeviceCameraManual::unavailable(),
        ImageClassifierScripted::new(rock()),
        PresentationFake::new(),
    );

    let result = f.rock_finder.start();

    assert!(matches!(result, Err(PipelineError::SourceUnavailable(_))));
    f.rock_finder.process_pending().unwrap();
    assert_eq!(
        f.rock_finder.snapshot().unwrap().lifecycle,
        Lifecycle::Stopped
    );
    assert!(f.presentation.transitions().is_empty());
}

#[test]
fn test_rocks_reach_presentation() {
    let f = Fixture::started(ImageClassifierScripted::new(rock()));

    for _ in 0..3 {
        f.classify_one();
    }

    assert_eq!(f.counter(), 3);
    assert_eq!(
        f.presentation.transitions(),
        vec![
            transition(StableState::Clear, StableState::Pending),
            transition(StableState::Pending, StableState::Found),
        ]
    );
}

#[test]
fn test_found_then_clear() {
    let f = Fixture::started(ImageClassifierScripted::new(other()).with_script(vec![
        Ok(rock()),
        Ok(rock()),
        Ok(rock()),
    ]));

    for _ in 0..6 {
        f.classify_one();
    }

    assert_eq!(f.counter(), 0);
    assert_eq!(
        f.presentation.transitions(),
        vec![
            transition(StableState::Clear, StableState::Pending),
            transition(StableState::Pending, StableState::Found),
            transition(StableState::Found, StableState::Pending),
            transition(StableState::Pending, StableState::Clear),
        ]
    );
}

#[test]
fn test_orientation_is_resolved_per_frame() {
    let f = Fixture::started(ImageClassifierScripted::new(vec![]));

    for device_orientation in [
        DeviceOrientation::LandscapeRight,
        DeviceOrientation::PortraitUpsideDown,
        DeviceOrientation::FaceDown,
    ] {
        assert!(f.device_camera.deliver(Frame {
            device_orientation,
            ..frame()
        }));
        f.rock_finder.process_next().unwrap();
        f.rock_finder.process_next().unwrap();
    }

    assert_eq!(
        f.image_classifier.orientations(),
        vec![OrientationTag::Down, OrientationTag::Left, OrientationTag::Up]
    );
}

#[test]
fn test_frames_dropped_while_classifying() {
    let (classifier, open) = ImageClassifierScripted::new(rock()).gated();
    let f = Fixture::started(classifier);

    assert!(f.device_camera.deliver(frame()));
    assert!(f.device_camera.deliver(frame()));
    assert!(f.device_camera.deliver(frame()));
    for _ in 0..3 {
        f.rock_finder.process_next().unwrap();
    }

    open.send(()).unwrap();
    f.rock_finder.process_next().unwrap();

    assert_eq!(f.image_classifier.calls(), 1);
    assert_eq!(f.counter(), 1);
    assert!(f.rock_finder.snapshot().unwrap().in_flight.is_none());
}

#[test]
fn test_stop_discards_in_flight_result() {
    let (classifier, open) = ImageClassifierScripted::new(rock()).gated();
    let f = Fixture::started(classifier);
    open.send(()).unwrap();
    f.classify_one();
    assert_eq!(f.counter(), 1);

    assert!(f.device_camera.deliver(frame()));
    f.rock_finder.process_next().unwrap();
    f.rock_finder.stop().unwrap();
    f.rock_finder.process_next().unwrap();

    open.send(()).unwrap();
    f.rock_finder.process_next().unwrap();

    let model = f.rock_finder.snapshot().unwrap();
    assert_eq!(model.lifecycle, Lifecycle::Stopped);
    assert_eq!(model.filter.counter(), 1);
    assert_eq!(f.image_classifier.calls(), 2);
    assert!(f
        .logger
        .lines()
        .iter()
        .any(|line| line.contains("Discarding result of request 1")));
}

#[test]
fn test_stop_takes_effect_before_returning() {
    let f = Fixture::started(ImageClassifierScripted::new(rock()));
    f.classify_one();

    f.rock_finder.stop().unwrap();

    let model = f.rock_finder.snapshot().unwrap();
    assert_eq!(model.lifecycle, Lifecycle::Stopped);
    assert!(model.in_flight.is_none());
    assert_eq!(model.filter.counter(), 1);
}

#[test]
fn test_stop_discards_result_already_queued() {
    let (classifier, _gate) = ImageClassifierScripted::new(rock()).gated();
    let f = Fixture::started(classifier);
    assert!(f.device_camera.deliver(frame()));
    f.rock_finder.process_next().unwrap();

    // The worker finished and queued its result before stop was called.
    f.rock_finder
        .send(Msg::FrameClassifyDone {
            request_id: 0,
            result: Ok(rock()),
        })
        .unwrap();
    f.rock_finder.stop().unwrap();
    assert_eq!(f.counter(), 0);

    f.rock_finder.process_pending().unwrap();

    let model = f.rock_finder.snapshot().unwrap();
    assert_eq!(model.lifecycle, Lifecycle::Stopped);
    assert_eq!(model.filter.counter(), 0);
    assert!(f.presentation.transitions().is_empty());
}

#[test]
fn test_stop_failure_still_stops_pipeline() {
    let f = Fixture::new(
        Config::default(),
        DeviceCameraManual::stuck(),
        ImageClassifierScripted::new(rock()),
        PresentationFake::new(),
    );
    f.rock_finder.start().unwrap();
    f.rock_finder.process_pending().unwrap();

    let result = f.rock_finder.stop();

    assert!(matches!(result, Err(PipelineError::SourceStop(_))));
    assert_eq!(
        f.rock_finder.snapshot().unwrap().lifecycle,
        Lifecycle::Stopped
    );

    assert!(f.device_camera.deliver(frame()));
    f.rock_finder.process_pending().unwrap();
    assert_eq!(f.image_classifier.calls(), 0);
}

#[test]
fn test_stop_while_starting_wins() {
    let f = Fixture::with_classifier(ImageClassifierScripted::new(rock()));
    f.rock_finder.send(Msg::StartRequested).unwrap();
    f.rock_finder.process_next().unwrap();
    assert_eq!(
        f.rock_finder.snapshot().unwrap().lifecycle,
        Lifecycle::Starting
    );

    f.rock_finder.stop().unwrap();
    f.rock_finder.send(Msg::SourceStartDone(Ok(()))).unwrap();
    f.rock_finder.process_pending().unwrap();

    assert_eq!(
        f.rock_finder.snapshot().unwrap().lifecycle,
        Lifecycle::Stopped
    );
}

#[test]
fn test_start_then_immediate_stop_ends_stopped() {
    let f = Fixture::with_classifier(ImageClassifierScripted::new(rock()));

    f.rock_finder.start().unwrap();
    f.rock_finder.stop().unwrap();
    f.rock_finder.process_pending().unwrap();

    assert_eq!(
        f.rock_finder.snapshot().unwrap().lifecycle,
        Lifecycle::Stopped
    );
}

#[test]
fn test_ticks_abandon_slow_classification() {
    let config = Config {
        tick_rate: Duration::from_millis(5),
        classify_timeout: Some(Duration::from_millis(20)),
        ..Config::default()
    };
    let (classifier, open) = ImageClassifierScripted::new(rock()).gated();
    let f = Fixture::new(
        config,
        DeviceCameraManual::new(),
        classifier,
        PresentationFake::new(),
    );
    f.rock_finder.start().unwrap();
    f.rock_finder.process_pending().unwrap();
    assert!(f.device_camera.deliver(frame()));
    f.rock_finder.process_next().unwrap();

    f.rock_finder.execute_effects(vec![Effect::SubscribeTick]);
    for _ in 0..1000 {
        if f.rock_finder.snapshot().unwrap().in_flight.is_none() {
            break;
        }
        f.rock_finder.process_next().unwrap();
    }
    assert!(f.rock_finder.snapshot().unwrap().in_flight.is_none());
    assert!(f
        .logger
        .lines()
        .iter()
        .any(|line| line.starts_with("WARN") && line.contains("timed out")));

    open.send(()).unwrap();
    let discarded = |lines: Vec<String>| {
        lines
            .iter()
            .any(|line| line.contains("Discarding result of request 0"))
    };
    for _ in 0..1000 {
        if discarded(f.logger.lines()) {
            break;
        }
        f.rock_finder.process_next().unwrap();
    }
    assert!(discarded(f.logger.lines()));
    assert_eq!(f.counter(), 0);
}

#[test]
fn test_tick_thread_does_not_keep_pipeline_alive() {
    let config = Config {
        tick_rate: Duration::from_millis(1),
        ..Config::default()
    };
    let f = Fixture::new(
        config,
        DeviceCameraManual::new(),
        ImageClassifierScripted::new(rock()),
        PresentationFake::new(),
    );
    f.rock_finder.execute_effects(vec![Effect::SubscribeTick]);
    f.rock_finder.process_next().unwrap();

    let queue = Arc::downgrade(&f.rock_finder.event_receiver);
    drop(f);
    std::thread::sleep(Duration::from_millis(50));

    assert!(queue.upgrade().is_none());
}

#[test]
fn test_frames_ignored_after_stop() {
    let f = Fixture::started(ImageClassifierScripted::new(rock()));
    f.rock_finder.stop().unwrap();
    f.rock_finder.process_pending().unwrap();

    assert!(!f.device_camera.deliver(frame()));
    f.rock_finder.on_frame(frame());
    f.rock_finder.process_pending().unwrap();

    assert_eq!(f.image_classifier.calls(), 0);
}

#[test]
fn test_classifier_failure_is_logged_and_skipped() {
    let f = Fixture::started(
        ImageClassifierScripted::new(rock())
            .with_script(vec![Ok(rock()), Err("gpu lost".to_string())]),
    );

    f.classify_one();
    f.classify_one();

    assert_eq!(f.counter(), 1);
    assert!(f
        .logger
        .lines()
        .iter()
        .any(|line| line.starts_with("WARN") && line.contains("gpu lost")));

    f.classify_one();
    assert_eq!(f.counter(), 2);
}

#[test]
fn test_restart_resets_counter_and_display() {
    let f = Fixture::started(ImageClassifierScripted::new(rock()));
    f.classify_one();
    f.classify_one();
    assert_eq!(f.counter(), 2);

    f.rock_finder.stop().unwrap();
    f.rock_finder.start().unwrap();
    f.rock_finder.process_pending().unwrap();

    assert_eq!(f.counter(), 0);
    assert_eq!(
        f.presentation.transitions(),
        vec![
            transition(StableState::Clear, StableState::Pending),
            transition(StableState::Pending, StableState::Clear),
        ]
    );
}

#[test]
fn test_presentation_failure_is_reported() {
    let f = Fixture::new(
        Config::default(),
        DeviceCameraManual::new(),
        ImageClassifierScripted::new(rock()),
        PresentationFake::failing(),
    );
    f.rock_finder.start().unwrap();
    f.rock_finder.process_pending().unwrap();

    assert!(f.device_camera.deliver(frame()));
    f.rock_finder.process_next().unwrap();
    let result = f.rock_finder.process_next();

    assert!(matches!(result, Err(PipelineError::Presentation(_))));
    assert_eq!(f.counter(), 1);
}

#[test]
fn test_run_loop_reports_found() {
    let (notify, transitions) = channel();
    let f = Fixture::new(
        Config::default(),
        DeviceCameraManual::new(),
        ImageClassifierScripted::new(rock()),
        PresentationFake::with_notify(notify),
    );
    f.rock_finder.start().unwrap();

    let rock_finder = f.rock_finder.clone();
    std::thread::spawn(move || rock_finder.run());

    let deadline = Instant::now() + Duration::from_secs(5);
    let mut found = false;
    while !found && Instant::now() < deadline {
        f.device_camera.deliver(frame());
        while let Ok(transition) = transitions.recv_timeout(Duration::from_millis(20)) {
            if transition.to == StableState::Found {
                found = true;
            }
        }
    }

    assert!(found);
    assert_eq!(f.counter(), 3);
}
