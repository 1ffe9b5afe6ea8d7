//! Filter that keeps the first occurrence of every reel.

use crate::traits::Filter;
use anyhow::Result;
use sources::{Candidate, FeedContext};
use std::collections::HashSet;

pub struct DistinctReelFilter;

impl Filter for DistinctReelFilter {
    fn name(&self) -> &str {
        "DistinctReelFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, _context: &FeedContext) -> Result<Vec<Candidate>> {
        let mut seen = HashSet::with_capacity(candidates.len());
        Ok(candidates
            .into_iter()
            .filter(|candidate| seen.insert(candidate.reel_id))
            .collect())
    }
}
