use std::collections::VecDeque;
use std::time::Instant;
use crate::common::Detection;

/// Longest position trail kept per object.
pub const HISTORY_LEN: usize = 30;

pub type Point = (f32, f32);

/// A detection followed across frames under a stable id.
#[derive(Debug, Clone)]
pub struct TrackedObject {
    pub id: usize,
    pub detection: Detection,
    pub centroid: Point,
    /// Oldest first, ends with `centroid`.
    pub position_history: VecDeque<Point>,
    pub timestamp: Instant,
}

impl TrackedObject {
    pub fn from_detection(id: usize, detection: Detection) -> Self {
        let centroid = detection.bbox.centroid();
        Self {
            id,
            detection,
            centroid,
            position_history: VecDeque::from([centroid]),
            timestamp: Instant::now(),
        }
    }

    /// Moves the object onto a newer detection of the same thing.
    pub fn update(&mut self, detection: Detection) {
        self.centroid = detection.bbox.centroid();
        self.detection = detection;
        self.timestamp = Instant::now();

        self.position_history.push_back(self.centroid);
        while self.position_history.len() > HISTORY_LEN {
            self.position_history.pop_front();
        }
    }

    /// The centroid before the latest update, if the object has moved at least once.
    pub fn previous_position(&self) -> Option<Point> {
        let n = self.position_history.len();
        if n < 2 {
            return None;
        }
        self.position_history.get(n - 2).copied()
    }
}
