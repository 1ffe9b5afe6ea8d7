//! The FilterPipeline chains filters together using the builder pattern.

use crate::filters::{AlreadySwipedFilter, DistinctReelFilter};
use crate::traits::Filter;
use anyhow::Result;
use sources::{Candidate, FeedContext};

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(DistinctReelFilter)
///     .add_filter(AlreadySwipedFilter);
///
/// let filtered = pipeline.apply(candidates, &context)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The pipeline the feed resolver runs: collapse repeated reels, then
    /// drop everything the user already swiped.
    pub fn feed_default() -> Self {
        Self::new()
            .add_filter(DistinctReelFilter)
            .add_filter(AlreadySwipedFilter)
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in sequence. The first failing filter aborts the run.
    pub fn apply(&self, candidates: Vec<Candidate>, context: &FeedContext) -> Result<Vec<Candidate>> {
        let mut current = candidates;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, context)?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
