extern crate yolo_predict;

use image::{Rgb, RgbImage};
use yolo_predict::common::PredictImage;
use yolo_predict::predictor::Predictor;
use yolo_predict::predictors::YoloDetector;
use yolo_predict::run_counting;
use yolo_predict::tracking::{CountingSession, CrossingDirection};

use mock_engine::{detector_sequence, write_bundle, MockEngine};

fn frame() -> PredictImage {
    PredictImage::new(RgbImage::from_pixel(200, 100, Rgb([0, 0, 0])))
}

/// One apple moving left to right across the 100 px model input, which letterboxes a 200x100 frame.
fn moving_apple(dir: &std::path::Path) -> YoloDetector<MockEngine> {
    let steps: Vec<[(f32, f32, f32, f32, usize, f32); 1]> = [30., 45., 55., 70.]
        .into_iter()
        .map(|cx| [(cx, 50., 10., 10., 0, 0.9)])
        .collect();
    let frames: Vec<&[_]> = steps.iter().map(|s| &s[..]).collect();
    let bundle = write_bundle(dir, "names: {0: Apple}\nimgsz: [100, 100]\n", detector_sequence(1, 8, &frames));

    let mut detector = YoloDetector::<MockEngine>::default();
    detector.load_model(&bundle, false).unwrap();
    detector
}

#[test]
fn detections_are_counted_at_the_center_line() {
    let dir = tempfile::tempdir().unwrap();
    let mut detector = moving_apple(dir.path());

    let mut session = CountingSession::new();
    session.start(200, 100);

    let mut crossings = Vec::new();
    let mut centroids = Vec::new();
    for _ in 0..4 {
        let counted = run_counting(&mut detector, &mut session, frame()).unwrap();
        assert_eq!(counted.result.len(), 1);
        assert_eq!(counted.tracked.len(), 1);
        assert_eq!(counted.tracked[0].id, 0);
        centroids.push(counted.tracked[0].centroid);
        crossings.extend(counted.crossings);
    }

    assert_eq!(centroids, vec![(60., 50.), (90., 50.), (110., 50.), (140., 50.)]);
    assert_eq!(crossings.len(), 1);
    assert_eq!(crossings[0].direction, CrossingDirection::Forward);

    let stats = session.stats();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.by_label.get("apple"), Some(&1));
}

#[test]
fn inactive_session_still_returns_detections() {
    let dir = tempfile::tempdir().unwrap();
    let mut detector = moving_apple(dir.path());
    let mut session = CountingSession::new();

    let counted = run_counting(&mut detector, &mut session, frame()).unwrap();
    assert_eq!(counted.result.len(), 1);
    assert!(counted.tracked.is_empty());
    assert!(counted.crossings.is_empty());

    session.start(200, 100);
    session.stop();
    assert!(!session.is_active());
    let counted = run_counting(&mut detector, &mut session, frame()).unwrap();
    assert!(counted.tracked.is_empty());
    assert_eq!(session.stats().total, 0);
}
