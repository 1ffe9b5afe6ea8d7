//! Mood Tag Source - reels matching the user's moods
//!
//! Generates feed candidates from the user's mood selection:
//! "Show me anything that feels like one of these moods"
//!
//! ## Algorithm
//! 1. Take the user's mood tags from the FeedContext
//! 2. Ask the store for every reel tagged with ANY of them (union, not
//!    intersection)
//! 3. Emit one candidate per reel

use crate::types::{Candidate, CandidateSource, FeedContext};
use std::sync::Arc;
use store::{Result, Store};
use tracing::{debug, instrument};

/// Candidate source backed by the store's tag index
#[derive(Clone)]
pub struct MoodTagSource {
    store: Arc<dyn Store>,
}

impl MoodTagSource {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Generate candidates for a user. Empty when the user has no moods.
    #[instrument(skip(self, context), fields(user_id = %context.user_id))]
    pub async fn get_candidates(&self, context: &FeedContext) -> Result<Vec<Candidate>> {
        if !context.has_moods() {
            return Ok(Vec::new());
        }

        let tag_ids = context.mood_tag_list();
        let reel_ids = self.store.reel_ids_tagged_any(&tag_ids).await?;
        debug!(
            "Found {} reels matching {} mood tags",
            reel_ids.len(),
            tag_ids.len()
        );

        Ok(reel_ids
            .into_iter()
            .map(|reel_id| Candidate::new(reel_id, CandidateSource::MoodTags))
            .collect())
    }
}
