//! Filter implementations for the feed pipeline.

pub mod already_swiped;
pub mod distinct;

pub use already_swiped::AlreadySwipedFilter;
pub use distinct::DistinctReelFilter;
