//! Filter to remove reels the user has already swiped.
//!
//! Left and right swipes both count: a decided reel never comes back.

use crate::traits::Filter;
use anyhow::Result;
use sources::{Candidate, FeedContext};

/// Removes candidates present in `FeedContext::swiped_reels`.
///
/// ## Algorithm
/// Uses the HashSet in the context for O(1) lookups.
pub struct AlreadySwipedFilter;

impl Filter for AlreadySwipedFilter {
    fn name(&self) -> &str {
        "AlreadySwipedFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, context: &FeedContext) -> Result<Vec<Candidate>> {
        if context.swiped_reels.is_empty() {
            return Ok(candidates);
        }
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| !context.swiped_reels.contains(&candidate.reel_id))
            .collect();
        Ok(filtered)
    }
}
