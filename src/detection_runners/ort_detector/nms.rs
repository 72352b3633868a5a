use std::cmp::Ordering;

pub trait Nms {
    fn iou(&self, other: &Self) -> f32;
    fn confidence(&self) -> f32;
}

/// Greedy non-maximum suppression. Leaves `boxes` sorted by descending confidence.
pub fn nms<T: Nms>(boxes: &mut Vec<T>, iou_threshold: f32) {
    boxes.sort_by(|a, b| b.confidence().partial_cmp(&a.confidence()).unwrap_or(Ordering::Equal));

    let mut kept = 0;
    for i in 0..boxes.len() {
        let overlaps = boxes[..kept].iter().any(|k| k.iou(&boxes[i]) > iou_threshold);
        if !overlaps {
            boxes.swap(kept, i);
            kept += 1;
        }
    }
    boxes.truncate(kept);
}
