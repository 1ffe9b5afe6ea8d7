//! # Mood Preference Manager
//!
//! Replaces a gamer's mood tag set wholesale. The old rows are deleted and
//! the new ones inserted in one atomic store call, so a failure leaves the
//! previous selection in place.

use std::collections::HashSet;
use std::sync::Arc;

use store::{Store, Tag, TagId};
use tracing::info;

use crate::error::{DiscoveryError, Result};
use crate::session::Session;

/// Check a selection holds at least `min` distinct tags.
///
/// Callers run this before `MoodPreferenceManager::replace`; the manager
/// itself accepts any selection.
pub fn validate_mood_selection(tag_ids: &[TagId], min: usize) -> Result<()> {
    let distinct: HashSet<&TagId> = tag_ids.iter().collect();
    if distinct.len() < min {
        return Err(DiscoveryError::validation(format!(
            "select at least {min} moods (got {})",
            distinct.len()
        )));
    }
    Ok(())
}

#[derive(Clone)]
pub struct MoodPreferenceManager {
    store: Arc<dyn Store>,
}

impl MoodPreferenceManager {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Replace the user's mood tags with `tag_ids`. Repeated ids are kept.
    pub async fn replace(&self, session: &Session, tag_ids: &[TagId]) -> Result<()> {
        session.require_gamer()?;
        self.store.replace_mood_tags(session.user_id, tag_ids).await?;
        info!("Saved {} mood tags for user {}", tag_ids.len(), session.user_id);
        Ok(())
    }

    /// The user's current mood tags
    pub async fn current(&self, session: &Session) -> Result<Vec<Tag>> {
        session.require_gamer()?;
        Ok(self.store.mood_tags(session.user_id).await?)
    }
}
