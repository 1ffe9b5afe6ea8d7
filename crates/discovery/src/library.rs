//! A gamer's saved reels. Entries are only ever created by right swipes.

use std::sync::Arc;

use store::{LibraryReel, ReelId, Store};
use tracing::info;

use crate::error::Result;
use crate::session::Session;

#[derive(Clone)]
pub struct Library {
    store: Arc<dyn Store>,
}

impl Library {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Saved reels with their game and tags, most recently saved first
    pub async fn list(&self, session: &Session) -> Result<Vec<LibraryReel>> {
        session.require_gamer()?;
        Ok(self.store.library(session.user_id).await?)
    }

    /// Remove a saved reel. Returns whether it was saved. The swipe stays,
    /// so the reel does not come back to the feed.
    pub async fn remove(&self, session: &Session, reel_id: ReelId) -> Result<bool> {
        session.require_gamer()?;
        let removed = self.store.remove_from_library(session.user_id, reel_id).await?;
        if removed {
            info!("User {} removed reel {} from library", session.user_id, reel_id);
        }
        Ok(removed)
    }
}
