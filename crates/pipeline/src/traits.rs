//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to feed candidates.

use anyhow::Result;
use sources::{Candidate, FeedContext};

/// Core trait for filtering candidates.
///
/// All filters must implement this trait to be used in the FilterPipeline.
/// Filters take ownership of the candidates and return the survivors in
/// their original order.
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates.
    ///
    /// # Arguments
    /// * `candidates` - The candidates to filter (takes ownership)
    /// * `context` - Mood tags and swipe history of the user
    fn apply(&self, candidates: Vec<Candidate>, context: &FeedContext) -> Result<Vec<Candidate>>;
}
