//! # Catalog
//!
//! Developer-side management of game profiles and their reels.
//!
//! Input is validated before any store call. A developer only sees and
//! edits their own games; another developer's game reads as not found.

use std::collections::HashSet;
use std::sync::Arc;

use store::{
    GameId, GameProfile, GameProfileUpdate, MediaStore, NewGameProfile, NewReel, Reel, ReelId,
    ReelUpdate, ReelWithTags, Store, StoreError, TagId,
};
use tracing::info;

use crate::config::DiscoveryConfig;
use crate::error::{DiscoveryError, Result};
use crate::session::Session;

/// Trim a required field, failing when nothing is left
fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DiscoveryError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional field; blank becomes `None`
fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Drop repeated tag ids, keeping first occurrences
fn distinct(tag_ids: Vec<TagId>) -> Vec<TagId> {
    let mut seen = HashSet::new();
    tag_ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn Store>,
    media: Arc<dyn MediaStore>,
    config: DiscoveryConfig,
}

impl Catalog {
    pub fn new(store: Arc<dyn Store>, media: Arc<dyn MediaStore>, config: DiscoveryConfig) -> Self {
        Self { store, media, config }
    }

    // --- games -------------------------------------------------------------

    pub async fn create_game(&self, session: &Session, game: NewGameProfile) -> Result<GameProfile> {
        session.require_developer()?;
        let game = NewGameProfile {
            title: required("title", &game.title)?,
            itch_url: required("itch url", &game.itch_url)?,
            description: optional(game.description),
            thumbnail_url: optional(game.thumbnail_url),
        };

        let created = self.store.create_game(session.user_id, game).await?;
        info!("Developer {} created game {} ({})", session.user_id, created.id, created.title);
        Ok(created)
    }

    pub async fn update_game(
        &self,
        session: &Session,
        game_id: GameId,
        update: GameProfileUpdate,
    ) -> Result<GameProfile> {
        session.require_developer()?;
        let update = GameProfileUpdate {
            title: update.title.map(|t| required("title", &t)).transpose()?,
            itch_url: update.itch_url.map(|u| required("itch url", &u)).transpose()?,
            description: optional(update.description),
            thumbnail_url: optional(update.thumbnail_url),
        };

        self.owned_game(session, game_id).await?;
        Ok(self.store.update_game(game_id, update).await?)
    }

    /// Delete a game with all of its reels
    pub async fn delete_game(&self, session: &Session, game_id: GameId) -> Result<()> {
        session.require_developer()?;
        self.owned_game(session, game_id).await?;
        self.store.delete_game(game_id).await?;
        info!("Developer {} deleted game {}", session.user_id, game_id);
        Ok(())
    }

    /// The developer's games, newest first
    pub async fn list_games(&self, session: &Session) -> Result<Vec<GameProfile>> {
        session.require_developer()?;
        Ok(self.store.games_by_developer(session.user_id).await?)
    }

    // --- reels -------------------------------------------------------------

    pub async fn create_reel(&self, session: &Session, game_id: GameId, reel: NewReel) -> Result<Reel> {
        session.require_developer()?;
        let reel = NewReel {
            video_url: required("video url", &reel.video_url)?,
            caption: optional(reel.caption),
            tag_ids: distinct(reel.tag_ids),
        };
        self.check_caption(reel.caption.as_deref())?;
        self.check_tag_count(&reel.tag_ids)?;

        self.owned_game(session, game_id).await?;
        self.check_mood_tags(&reel.tag_ids).await?;

        let created = self.store.create_reel(game_id, reel).await?;
        info!(
            "Added reel {} to game {} at position {}",
            created.id, game_id, created.order_index
        );
        Ok(created)
    }

    /// Update a reel. `tag_ids: Some(..)` replaces the whole tag set.
    pub async fn update_reel(&self, session: &Session, reel_id: ReelId, update: ReelUpdate) -> Result<Reel> {
        session.require_developer()?;
        let update = ReelUpdate {
            video_url: update.video_url.map(|u| required("video url", &u)).transpose()?,
            caption: optional(update.caption),
            tag_ids: update.tag_ids.map(distinct),
        };
        self.check_caption(update.caption.as_deref())?;
        if let Some(tag_ids) = &update.tag_ids {
            self.check_tag_count(tag_ids)?;
        }

        self.owned_reel(session, reel_id).await?;
        if let Some(tag_ids) = &update.tag_ids {
            self.check_mood_tags(tag_ids).await?;
        }
        Ok(self.store.update_reel(reel_id, update).await?)
    }

    pub async fn delete_reel(&self, session: &Session, reel_id: ReelId) -> Result<()> {
        session.require_developer()?;
        self.owned_reel(session, reel_id).await?;
        self.store.delete_reel(reel_id).await?;
        info!("Developer {} deleted reel {}", session.user_id, reel_id);
        Ok(())
    }

    /// Reels of a game with their tags, by display order
    pub async fn list_reels(&self, game_id: GameId) -> Result<Vec<ReelWithTags>> {
        Ok(self.store.reels_for_game(game_id).await?)
    }

    /// Store a video and return its public URL
    pub async fn upload_video(&self, session: &Session, file_name: &str, bytes: &[u8]) -> Result<String> {
        session.require_developer()?;
        if bytes.is_empty() {
            return Err(DiscoveryError::validation("video file is empty"));
        }
        Ok(self.media.upload(session.user_id, file_name, bytes).await?)
    }

    // --- checks ------------------------------------------------------------

    async fn owned_game(&self, session: &Session, game_id: GameId) -> Result<GameProfile> {
        match self.store.get_game(game_id).await? {
            Some(game) if game.developer_id == session.user_id => Ok(game),
            _ => Err(StoreError::not_found("game", game_id).into()),
        }
    }

    async fn owned_reel(&self, session: &Session, reel_id: ReelId) -> Result<Reel> {
        let reel = self
            .store
            .get_reel(reel_id)
            .await?
            .ok_or_else(|| StoreError::not_found("reel", reel_id))?;
        self.owned_game(session, reel.game_id).await?;
        Ok(reel)
    }

    fn check_caption(&self, caption: Option<&str>) -> Result<()> {
        match caption {
            Some(caption) if caption.chars().count() > self.config.max_caption_len => {
                Err(DiscoveryError::validation(format!(
                    "caption is longer than {} characters",
                    self.config.max_caption_len
                )))
            }
            _ => Ok(()),
        }
    }

    fn check_tag_count(&self, tag_ids: &[TagId]) -> Result<()> {
        if tag_ids.len() > self.config.max_reel_tags {
            return Err(DiscoveryError::validation(format!(
                "a reel takes at most {} tags",
                self.config.max_reel_tags
            )));
        }
        Ok(())
    }

    async fn check_mood_tags(&self, tag_ids: &[TagId]) -> Result<()> {
        if tag_ids.is_empty() {
            return Ok(());
        }
        let moods: HashSet<TagId> = self
            .store
            .tags_by_kind(&self.config.mood_tag_kind)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();
        match tag_ids.iter().find(|id| !moods.contains(*id)) {
            Some(id) => Err(DiscoveryError::validation(format!("tag {id} is not a mood tag"))),
            None => Ok(()),
        }
    }
}
