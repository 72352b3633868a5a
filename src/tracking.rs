mod centroid_tracker;
mod counting;
mod line_crossing;
mod tracked_object;

pub use centroid_tracker::*;
pub use counting::*;
pub use line_crossing::*;
pub use tracked_object::*;
