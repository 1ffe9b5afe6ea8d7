//! Candidate and context types shared by the source and the filter pipeline.

use std::collections::HashSet;
use store::{ReelId, TagId, UserId};

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateSource {
    /// Reel carries at least one of the user's mood tags
    MoodTags,
}

/// A reel that may end up in the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub reel_id: ReelId,
    pub source: CandidateSource,
}

impl Candidate {
    pub fn new(reel_id: ReelId, source: CandidateSource) -> Self {
        Self { reel_id, source }
    }
}

/// Everything the feed needs to know about the user, gathered up front.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedContext {
    pub user_id: UserId,
    /// Selected mood tags (`T`)
    pub mood_tags: HashSet<TagId>,
    /// Reels the user already swiped (`S`)
    pub swiped_reels: HashSet<ReelId>,
}

impl FeedContext {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            mood_tags: HashSet::new(),
            swiped_reels: HashSet::new(),
        }
    }

    pub fn has_moods(&self) -> bool {
        !self.mood_tags.is_empty()
    }

    /// Mood tags as a slice-friendly vector, sorted for stable queries
    pub fn mood_tag_list(&self) -> Vec<TagId> {
        let mut tags: Vec<TagId> = self.mood_tags.iter().copied().collect();
        tags.sort();
        tags
    }
}
