use std::collections::{BTreeMap, HashSet};
use crate::common::Detection;
use crate::tracking::{Point, TrackedObject};

pub const DEFAULT_MAX_DISAPPEARED: u32 = 30;
pub const DEFAULT_MAX_DISTANCE: f32 = 100.;

#[derive(Debug, Clone)]
struct Track {
    object: TrackedObject,
    disappeared: u32,
}

/// Assigns stable ids to detections by matching centroids between frames.
#[derive(Debug, Clone)]
pub struct CentroidTracker {
    max_disappeared: u32,
    max_distance: f32,
    tracks: BTreeMap<usize, Track>,
    next_id: usize,
}

impl Default for CentroidTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DISAPPEARED, DEFAULT_MAX_DISTANCE)
    }
}

impl CentroidTracker {
    pub fn new(max_disappeared: u32, max_distance: f32) -> Self {
        Self {
            max_disappeared,
            max_distance,
            tracks: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Feeds one frame of detections and returns every object still being tracked, by id.
    pub fn update(&mut self, detections: &[Detection]) -> Vec<TrackedObject> {
        if detections.is_empty() {
            let ids: Vec<usize> = self.tracks.keys().copied().collect();
            for id in ids {
                self.mark_missing(id);
            }
            return self.tracked_objects();
        }

        if self.tracks.is_empty() {
            for detection in detections {
                self.register(detection.clone());
            }
            return self.tracked_objects();
        }

        let ids: Vec<usize> = self.tracks.keys().copied().collect();
        let centroids: Vec<Point> = detections.iter().map(|d| d.bbox.centroid()).collect();

        let mut pairs: Vec<(usize, usize, f32)> = Vec::with_capacity(ids.len() * centroids.len());
        for (row, id) in ids.iter().enumerate() {
            let known = self.tracks[id].object.centroid;
            for (col, c) in centroids.iter().enumerate() {
                pairs.push((row, col, distance(known, *c)));
            }
        }
        pairs.sort_by(|a, b| a.2.total_cmp(&b.2));

        let mut used_rows = HashSet::new();
        let mut used_cols = HashSet::new();
        for (row, col, dist) in pairs {
            if dist > self.max_distance || used_rows.contains(&row) || used_cols.contains(&col) {
                continue;
            }
            if let Some(track) = self.tracks.get_mut(&ids[row]) {
                track.object.update(detections[col].clone());
                track.disappeared = 0;
            }
            used_rows.insert(row);
            used_cols.insert(col);
        }

        for (row, id) in ids.iter().enumerate() {
            if !used_rows.contains(&row) {
                self.mark_missing(*id);
            }
        }
        for (col, detection) in detections.iter().enumerate() {
            if !used_cols.contains(&col) {
                self.register(detection.clone());
            }
        }

        self.tracked_objects()
    }

    pub fn tracked_objects(&self) -> Vec<TrackedObject> {
        self.tracks.values().map(|t| t.object.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Forgets every object and restarts ids from zero.
    pub fn reset(&mut self) {
        self.tracks.clear();
        self.next_id = 0;
    }

    fn register(&mut self, detection: Detection) {
        let id = self.next_id;
        self.next_id += 1;
        self.tracks.insert(id, Track {
            object: TrackedObject::from_detection(id, detection),
            disappeared: 0,
        });
    }

    fn mark_missing(&mut self, id: usize) {
        let expired = match self.tracks.get_mut(&id) {
            Some(track) => {
                track.disappeared += 1;
                track.disappeared > self.max_disappeared
            }
            None => false,
        };
        if expired {
            log::debug!("Dropping track {id}");
            self.tracks.remove(&id);
        }
    }
}

fn distance(a: Point, b: Point) -> f32 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::BBox;

    fn det(cx: f32, cy: f32) -> Detection {
        Detection::new(0, BBox::from_cxcy_wh(cx, cy, 10., 10.), None, 0.9)
    }

    #[test]
    fn nearest_detection_keeps_its_id() {
        let mut tracker = CentroidTracker::default();
        tracker.update(&[det(10., 10.), det(200., 200.)]);

        let objects = tracker.update(&[det(205., 200.), det(15., 12.)]);
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].id, 0);
        assert_eq!(objects[0].centroid, (15., 12.));
        assert_eq!(objects[1].id, 1);
        assert_eq!(objects[1].centroid, (205., 200.));
    }

    #[test]
    fn far_detection_gets_a_new_id() {
        let mut tracker = CentroidTracker::new(1, 50.);
        tracker.update(&[det(0., 0.)]);

        let objects = tracker.update(&[det(300., 0.)]);
        let ids: Vec<usize> = objects.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![0, 1]);

        // id 0 has now missed two frames, past the limit of one
        let objects = tracker.update(&[det(300., 0.)]);
        let ids: Vec<usize> = objects.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn empty_frames_expire_tracks() {
        let mut tracker = CentroidTracker::new(2, 100.);
        tracker.update(&[det(0., 0.)]);
        for _ in 0..2 {
            assert_eq!(tracker.update(&[]).len(), 1);
        }
        assert!(tracker.update(&[]).is_empty());
    }

    #[test]
    fn reset_restarts_ids() {
        let mut tracker = CentroidTracker::default();
        tracker.update(&[det(0., 0.), det(500., 500.)]);
        tracker.reset();
        assert!(tracker.is_empty());

        let objects = tracker.update(&[det(1., 1.)]);
        assert_eq!(objects[0].id, 0);
    }
}
