use std::time::Instant;
use crate::common::DetectionResult;
use crate::tracking::{CentroidTracker, Crossing, CrossingStats, LineCrossingDetector, TrackedObject};

/// One detector result together with the tracking it produced.
#[derive(Debug, Clone)]
pub struct CountedFrame {
    pub result: DetectionResult,
    pub tracked: Vec<TrackedObject>,
    pub crossings: Vec<Crossing>,
}

/// Tracks detections frame to frame and counts them across a vertical line through the middle
/// of the frame.
#[derive(Debug, Clone, Default)]
pub struct CountingSession {
    tracker: Option<CentroidTracker>,
    line: Option<LineCrossingDetector>,
    active: bool,
}

impl CountingSession {
    pub fn new() -> Self {
        Default::default()
    }

    /// Starts a fresh session for frames of the given size, discarding earlier tracks and counts.
    pub fn start(&mut self, image_width: u32, image_height: u32) {
        let line_x = image_width as f32 * 0.5;
        self.tracker = Some(CentroidTracker::default());
        self.line = Some(LineCrossingDetector::new((line_x, 0.), (line_x, image_height as f32)));
        self.active = true;
        log::info!("Counting started, line at x={line_x}");
    }

    /// Pauses counting. Tracks and counts are kept until the next `start` or `reset`.
    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn reset(&mut self) {
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.reset();
        }
        if let Some(line) = self.line.as_mut() {
            line.reset();
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn stats(&self) -> CrossingStats {
        self.line.as_ref().map(|line| line.stats().clone()).unwrap_or_default()
    }

    pub fn line_detector(&self) -> Option<&LineCrossingDetector> {
        self.line.as_ref()
    }

    /// Feeds one detector result. Returns nothing while the session is inactive.
    pub fn update(&mut self, result: &DetectionResult) -> (Vec<TrackedObject>, Vec<Crossing>) {
        self.update_at(result, Instant::now())
    }

    pub fn update_at(&mut self, result: &DetectionResult, now: Instant) -> (Vec<TrackedObject>, Vec<Crossing>) {
        match (self.active, self.tracker.as_mut(), self.line.as_mut()) {
            (true, Some(tracker), Some(line)) => {
                let objects = tracker.update(&result.detections);
                let crossings = line.update_at(&objects, now);
                (objects, crossings)
            }
            _ => (Vec::new(), Vec::new()),
        }
    }
}
