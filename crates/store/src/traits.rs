//! The collaborator contract.
//!
//! `Store` is the row-level API the discovery services are written against.
//! Every method is a single request/response round trip; methods that touch
//! more than one collection are transactional in the implementation.

use crate::error::Result;
use crate::types::*;
use async_trait::async_trait;

#[async_trait]
pub trait Store: Send + Sync {
    // --- users -------------------------------------------------------------

    async fn get_user(&self, id: UserId) -> Result<Option<User>>;

    /// Insert an account row. Returns `StoreError::Duplicate` when the email
    /// (compared case-insensitively) is already registered.
    async fn create_user(&self, user: NewUser) -> Result<User>;

    /// Overwrite the profile fields of a user and bump `updated_at`.
    async fn update_user(&self, id: UserId, update: ProfileUpdate) -> Result<User>;

    // --- tag catalog -------------------------------------------------------

    /// All tags of `kind`, ordered by name.
    async fn tags_by_kind(&self, kind: &str) -> Result<Vec<Tag>>;

    // --- mood preferences --------------------------------------------------

    async fn mood_tag_ids(&self, user_id: UserId) -> Result<Vec<TagId>>;

    async fn mood_tags(&self, user_id: UserId) -> Result<Vec<Tag>>;

    /// Delete every mood row of the user and insert one row per id, as one
    /// transaction. Fails without touching the old rows if any id is unknown.
    async fn replace_mood_tags(&self, user_id: UserId, tag_ids: &[TagId]) -> Result<()>;

    // --- feed lookups ------------------------------------------------------

    async fn swiped_reel_ids(&self, user_id: UserId) -> Result<Vec<ReelId>>;

    /// Reels carrying at least one of `tag_ids`. Each reel appears once.
    async fn reel_ids_tagged_any(&self, tag_ids: &[TagId]) -> Result<Vec<ReelId>>;

    /// Full reels for `ids`, newest first. Unknown ids are skipped.
    async fn reels_with_context(&self, ids: &[ReelId]) -> Result<Vec<ReelWithContext>>;

    // --- swipes and library ------------------------------------------------

    /// Insert a swipe and, for `Direction::Right`, the matching library
    /// entry in the same transaction. Returns `StoreError::Duplicate` when
    /// the user already swiped the reel.
    async fn record_swipe(
        &self,
        user_id: UserId,
        reel_id: ReelId,
        direction: Direction,
    ) -> Result<Swipe>;

    /// Swipes received by any of `reel_ids`.
    async fn swipes_for_reels(&self, reel_ids: &[ReelId]) -> Result<Vec<Swipe>>;

    /// Saved reels, most recently saved first.
    async fn library(&self, user_id: UserId) -> Result<Vec<LibraryReel>>;

    async fn remove_from_library(&self, user_id: UserId, reel_id: ReelId) -> Result<bool>;

    // --- games -------------------------------------------------------------

    async fn get_game(&self, id: GameId) -> Result<Option<GameProfile>>;

    /// Games owned by a developer, newest first.
    async fn games_by_developer(&self, developer_id: UserId) -> Result<Vec<GameProfile>>;

    async fn create_game(&self, developer_id: UserId, game: NewGameProfile) -> Result<GameProfile>;

    async fn update_game(&self, id: GameId, update: GameProfileUpdate) -> Result<GameProfile>;

    /// Delete a game and everything hanging off its reels.
    async fn delete_game(&self, id: GameId) -> Result<()>;

    // --- reels -------------------------------------------------------------

    async fn get_reel(&self, id: ReelId) -> Result<Option<Reel>>;

    /// Reels of a game with their tags, by `order_index`.
    async fn reels_for_game(&self, game_id: GameId) -> Result<Vec<ReelWithTags>>;

    /// Insert a reel at the end of the game's order, with its tags.
    async fn create_reel(&self, game_id: GameId, reel: NewReel) -> Result<Reel>;

    async fn update_reel(&self, id: ReelId, update: ReelUpdate) -> Result<Reel>;

    async fn delete_reel(&self, id: ReelId) -> Result<()>;
}
