//! File/code adapted from https://github.com/jamjamjon/usls

use std::collections::VecDeque;
use std::time::Duration;

/// Frame durations used for the rolling frames-per-second figure.
const DEFAULT_WINDOW: usize = 30;

/// Rolling window of per-frame durations.
#[derive(Debug)]
pub struct TimeCalc {
    window: usize,
    duration: VecDeque<Duration>,
}

impl Default for TimeCalc {
    fn default() -> Self {
        Self::with_window(DEFAULT_WINDOW)
    }
}

impl TimeCalc {
    pub fn with_window(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            duration: VecDeque::with_capacity(window),
        }
    }

    pub fn total(&self) -> Duration {
        self.duration.iter().sum::<Duration>()
    }

    pub fn n(&self) -> usize {
        self.duration.len()
    }

    pub fn avg(&self) -> Duration {
        match self.n() {
            0 => Duration::ZERO,
            n => self.total() / n as u32,
        }
    }

    /// Frames per second over the window, `0.0` while nothing measurable was recorded.
    pub fn per_second(&self) -> f32 {
        let total = self.total().as_secs_f32();
        if total > 0. {
            self.n() as f32 / total
        } else {
            0.
        }
    }

    pub fn push(&mut self, x: Duration) {
        if self.duration.len() == self.window {
            self.duration.pop_front();
        }
        self.duration.push_back(x);
    }

    pub fn clear(&mut self) {
        self.duration.clear();
    }
}
