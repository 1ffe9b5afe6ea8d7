//! # Feed Resolver
//!
//! Computes the reels a gamer has not yet evaluated:
//! 1. Load the user's mood tags `T` (empty `T` means an empty feed)
//! 2. Load the reels the user already swiped `S`
//! 3. Collect every reel tagged with any tag in `T`
//! 4. Drop the reels in `S`
//! 5. Fetch the survivors with their game and tags, newest first
//!
//! Each call recomputes from current store state. Any failed lookup aborts
//! the whole resolution.

use std::sync::Arc;
use std::time::Instant;

use pipeline::FilterPipeline;
use sources::{feed_context::build_feed_context, FeedContext, MoodTagSource};
use store::{ReelId, ReelWithContext, Store};
use tracing::info;

use crate::error::{DiscoveryError, Result};
use crate::session::Session;

/// Counts gathered while resolving a feed, for `--explain` style output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub mood_tags: usize,
    pub swiped: usize,
    pub candidates: usize,
    pub remaining: usize,
}

#[derive(Clone)]
pub struct FeedResolver {
    store: Arc<dyn Store>,
    source: MoodTagSource,
    filter_pipeline: Arc<FilterPipeline>,
}

impl FeedResolver {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_pipeline(store, FilterPipeline::feed_default())
    }

    /// Resolver running a custom filter pipeline after the mood tag source
    pub fn with_pipeline(store: Arc<dyn Store>, filter_pipeline: FilterPipeline) -> Self {
        Self {
            source: MoodTagSource::new(store.clone()),
            store,
            filter_pipeline: Arc::new(filter_pipeline),
        }
    }

    /// The reels to present, newest first.
    pub async fn resolve(&self, session: &Session) -> Result<Vec<ReelWithContext>> {
        let (reels, _) = self.resolve_with_stats(session).await?;
        Ok(reels)
    }

    pub async fn resolve_with_stats(
        &self,
        session: &Session,
    ) -> Result<(Vec<ReelWithContext>, FeedStats)> {
        session.require_gamer()?;
        let start_time = Instant::now();

        let context = build_feed_context(self.store.as_ref(), session.user_id).await?;
        let mut stats = FeedStats {
            mood_tags: context.mood_tags.len(),
            swiped: context.swiped_reels.len(),
            ..FeedStats::default()
        };
        if !context.has_moods() {
            info!("User {} has no mood tags, feed is empty", session.user_id);
            return Ok((Vec::new(), stats));
        }

        let reel_ids = self.candidate_reel_ids(&context).await?;
        stats.candidates = reel_ids.len();
        if reel_ids.is_empty() {
            info!("No unswiped reels match the moods of user {}", session.user_id);
            return Ok((Vec::new(), stats));
        }

        let reels = self.store.reels_with_context(&reel_ids).await?;
        stats.remaining = reels.len();

        info!(
            "Resolved feed for user {}: {} moods, {} swiped, {} reels in {:.2?}",
            session.user_id,
            stats.mood_tags,
            stats.swiped,
            stats.remaining,
            start_time.elapsed()
        );
        Ok((reels, stats))
    }

    /// Steps 3 and 4: mood tag union minus swiped reels
    async fn candidate_reel_ids(&self, context: &FeedContext) -> Result<Vec<ReelId>> {
        let candidates = self.source.get_candidates(context).await?;
        let filtered = self
            .filter_pipeline
            .apply(candidates, context)
            .map_err(DiscoveryError::Pipeline)?;
        Ok(filtered.into_iter().map(|c| c.reel_id).collect())
    }
}
