//! Comparisons against the caller's own listening data

pub mod comparator;
pub mod library;

pub use comparator::{compare_taste, TasteProfile, TasteReport};
pub use library::{find_missing, saved_track_ids, MissingReport};
