//! Helper to build a FeedContext from the store
//!
//! Loads the two per-user sets the feed depends on, in order:
//! 1. the user's mood tags (`T`)
//! 2. the reels the user already swiped (`S`)
//!
//! When `T` is empty the swipe lookup is skipped: the feed is empty anyway.

use crate::types::FeedContext;
use store::{Result, Store, UserId};

pub async fn build_feed_context(store: &dyn Store, user_id: UserId) -> Result<FeedContext> {
    let mut context = FeedContext::new(user_id);

    context.mood_tags = store.mood_tag_ids(user_id).await?.into_iter().collect();
    if context.mood_tags.is_empty() {
        // Return early for users without moods
        return Ok(context);
    }

    context.swiped_reels = store.swiped_reel_ids(user_id).await?.into_iter().collect();
    Ok(context)
}
