//! Pipeline for filtering feed candidates.
//!
//! This crate provides:
//! - Filter trait and implementations for candidate filtering
//! - FilterPipeline for composing filters
//!
//! ## Architecture
//! Candidates come from the mood tag source and pass through the filters
//! in order:
//! 1. Repeated reels collapse to one candidate
//! 2. Reels the user already swiped are removed
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::FilterPipeline;
//! use pipeline::filters::*;
//!
//! let pipeline = FilterPipeline::new()
//!     .add_filter(DistinctReelFilter)
//!     .add_filter(AlreadySwipedFilter);
//!
//! let filtered = pipeline.apply(candidates, &context)?;
//! ```

pub mod traits;
pub mod filters;
pub mod filter_pipeline;

pub use traits::Filter;
pub use filter_pipeline::FilterPipeline;
