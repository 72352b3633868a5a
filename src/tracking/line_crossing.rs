use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::{Duration, Instant};
use serde::{Deserialize, Serialize};
use crate::tracking::{Point, TrackedObject};

/// Minimum time between two counted crossings of the same object.
pub const CROSSING_COOLDOWN: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossingDirection {
    /// Onto the positive side of the line, upwards across a left-to-right line in image coordinates.
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub id: usize,
    pub direction: CrossingDirection,
}

/// Running counters, keyed by lower-cased label for the per-class tally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossingStats {
    pub total: usize,
    pub forward: usize,
    pub backward: usize,
    pub by_label: BTreeMap<String, usize>,
}

/// Counts tracked objects whose centroid passes over a line segment.
#[derive(Debug, Clone)]
pub struct LineCrossingDetector {
    line_start: Point,
    line_end: Point,
    stats: CrossingStats,
    recently_crossed: HashMap<usize, Instant>,
    last_side: HashMap<usize, bool>,
}

impl LineCrossingDetector {
    pub fn new(line_start: Point, line_end: Point) -> Self {
        Self {
            line_start,
            line_end,
            stats: CrossingStats::default(),
            recently_crossed: HashMap::new(),
            last_side: HashMap::new(),
        }
    }

    pub fn update(&mut self, objects: &[TrackedObject]) -> Vec<Crossing> {
        self.update_at(objects, Instant::now())
    }

    /// Like [`update`](Self::update) with the clock supplied by the caller.
    pub fn update_at(&mut self, objects: &[TrackedObject], now: Instant) -> Vec<Crossing> {
        self.recently_crossed
            .retain(|_, at| now.saturating_duration_since(*at) <= CROSSING_COOLDOWN);

        let mut crossings = Vec::new();
        for obj in objects {
            if self.recently_crossed.contains_key(&obj.id) {
                continue;
            }

            let current = obj.centroid;
            let Some(previous) = obj.previous_position() else {
                self.last_side.insert(obj.id, self.on_positive_side(current));
                continue;
            };

            if segments_intersect(previous, current, self.line_start, self.line_end) {
                let was_positive = self.last_side.get(&obj.id).copied().unwrap_or_else(|| self.on_positive_side(previous));
                let on_positive_side = self.on_positive_side(current);

                if was_positive != on_positive_side {
                    let direction = if on_positive_side { CrossingDirection::Forward } else { CrossingDirection::Backward };
                    self.record(obj, direction);
                    self.recently_crossed.insert(obj.id, now);
                    crossings.push(Crossing { id: obj.id, direction });
                }
            }

            self.last_side.insert(obj.id, self.on_positive_side(current));
        }

        let live: HashSet<usize> = objects.iter().map(|o| o.id).collect();
        self.last_side.retain(|id, _| live.contains(id));

        crossings
    }

    pub fn stats(&self) -> &CrossingStats {
        &self.stats
    }

    pub fn total(&self) -> usize {
        self.stats.total
    }

    /// Crossings counted for `label`, compared case-insensitively.
    pub fn count_for(&self, label: &str) -> usize {
        self.stats.by_label.get(&label.to_lowercase()).copied().unwrap_or(0)
    }

    pub fn line(&self) -> (Point, Point) {
        (self.line_start, self.line_end)
    }

    pub fn set_line(&mut self, start: Point, end: Point) {
        self.line_start = start;
        self.line_end = end;
    }

    pub fn reset(&mut self) {
        self.stats = CrossingStats::default();
        self.recently_crossed.clear();
        self.last_side.clear();
    }

    fn record(&mut self, obj: &TrackedObject, direction: CrossingDirection) {
        self.stats.total += 1;
        match direction {
            CrossingDirection::Forward => self.stats.forward += 1,
            CrossingDirection::Backward => self.stats.backward += 1,
        }
        let label = obj.detection.get_label().to_lowercase();
        *self.stats.by_label.entry(label).or_default() += 1;

        log::debug!("Object {} crossed the line ({:?}), total {}", obj.id, direction, self.stats.total);
    }

    fn on_positive_side(&self, point: Point) -> bool {
        orientation(self.line_start, self.line_end, point) > 0.
    }
}

/// Cross product sign of `p - a` against `b - a`.
fn orientation(a: Point, b: Point, p: Point) -> f32 {
    (p.0 - a.0) * (b.1 - a.1) - (b.0 - a.0) * (p.1 - a.1)
}

fn on_segment(a: Point, p: Point, b: Point) -> bool {
    p.0 <= a.0.max(b.0) && p.0 >= a.0.min(b.0) && p.1 <= a.1.max(b.1) && p.1 >= a.1.min(b.1)
}

fn segments_intersect(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    let d1 = orientation(p3, p4, p1);
    let d2 = orientation(p3, p4, p2);
    let d3 = orientation(p1, p2, p3);
    let d4 = orientation(p1, p2, p4);

    if ((d1 > 0. && d2 < 0.) || (d1 < 0. && d2 > 0.)) && ((d3 > 0. && d4 < 0.) || (d3 < 0. && d4 > 0.)) {
        return true;
    }

    (d1 == 0. && on_segment(p3, p1, p4))
        || (d2 == 0. && on_segment(p3, p2, p4))
        || (d3 == 0. && on_segment(p1, p3, p2))
        || (d4 == 0. && on_segment(p1, p4, p2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_segments() {
        assert!(segments_intersect((0., -1.), (0., 1.), (-5., 0.), (5., 0.)));
        assert!(!segments_intersect((0., 1.), (0., 2.), (-5., 0.), (5., 0.)));
        // touching the end of the line counts
        assert!(segments_intersect((5., -1.), (5., 0.), (-5., 0.), (5., 0.)));
        assert!(!segments_intersect((6., -1.), (6., 1.), (-5., 0.), (5., 0.)));
    }

    #[test]
    fn sides_have_opposite_orientation() {
        let (a, b) = ((0., 0.), (10., 0.));
        assert!(orientation(a, b, (5., -1.)) > 0.);
        assert!(orientation(a, b, (5., 1.)) < 0.);
        assert_eq!(orientation(a, b, (5., 0.)), 0.);
    }
}
