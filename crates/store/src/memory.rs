//! In-memory implementation of the `Store` contract.
//!
//! `MemoryStore` keeps every collection in HashMaps behind a single
//! `tokio::sync::RwLock`. Reads share the lock; every write operation takes
//! the write lock exactly once, which makes multi-row writes (swipe plus
//! library entry, mood replacement, cascade deletes) atomic.
//!
//! Secondary indices kept alongside the primary tables:
//! - `tag_reels`: reels carrying each tag (feed step 3)
//! - `swiped`: reels each user has swiped (feed step 2, swipe uniqueness)

use crate::error::{Result, StoreError};
use crate::traits::Store;
use crate::types::*;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) users: HashMap<UserId, User>,
    pub(crate) games: HashMap<GameId, GameProfile>,
    pub(crate) reels: HashMap<ReelId, Reel>,
    pub(crate) tags: HashMap<TagId, Tag>,

    /// Tags attached to each reel, in attachment order
    pub(crate) reel_tags: HashMap<ReelId, Vec<TagId>>,
    /// Reels carrying each tag
    pub(crate) tag_reels: HashMap<TagId, HashSet<ReelId>>,

    pub(crate) moods: HashMap<UserId, Vec<TagId>>,

    /// Append-only swipe log
    pub(crate) swipes: Vec<Swipe>,
    /// Reels swiped by each user
    pub(crate) swiped: HashMap<UserId, HashSet<ReelId>>,

    pub(crate) library: HashMap<UserId, Vec<LibraryEntry>>,
}

impl Tables {
    fn tags_of(&self, reel_id: ReelId) -> Vec<Tag> {
        self.reel_tags
            .get(&reel_id)
            .map(|ids| ids.iter().filter_map(|id| self.tags.get(id).cloned()).collect())
            .unwrap_or_default()
    }

    fn with_context(&self, reel: &Reel) -> Option<ReelWithContext> {
        let game = self.games.get(&reel.game_id)?;
        Some(ReelWithContext {
            reel: reel.clone(),
            game: GameSummary::from(game),
            tags: self.tags_of(reel.id),
        })
    }

    fn check_tags_exist(&self, tag_ids: &[TagId]) -> Result<()> {
        match tag_ids.iter().find(|id| !self.tags.contains_key(*id)) {
            Some(missing) => Err(StoreError::not_found("tag", missing)),
            None => Ok(()),
        }
    }

    /// Attach tags to a reel, replacing any previous links.
    pub(crate) fn set_reel_tags(&mut self, reel_id: ReelId, tag_ids: &[TagId]) {
        if let Some(old) = self.reel_tags.remove(&reel_id) {
            for tag_id in old {
                if let Some(reels) = self.tag_reels.get_mut(&tag_id) {
                    reels.remove(&reel_id);
                }
            }
        }
        for &tag_id in tag_ids {
            self.tag_reels.entry(tag_id).or_default().insert(reel_id);
        }
        self.reel_tags.insert(reel_id, tag_ids.to_vec());
    }

    pub(crate) fn push_swipe(&mut self, swipe: Swipe) {
        self.swiped
            .entry(swipe.user_id)
            .or_default()
            .insert(swipe.reel_id);
        self.swipes.push(swipe);
    }

    /// Remove a reel together with its tag links, swipes and library entries.
    fn remove_reel(&mut self, reel_id: ReelId) -> Option<Reel> {
        let reel = self.reels.remove(&reel_id)?;
        self.set_reel_tags(reel_id, &[]);
        self.reel_tags.remove(&reel_id);

        self.swipes.retain(|s| s.reel_id != reel_id);
        for reels in self.swiped.values_mut() {
            reels.remove(&reel_id);
        }
        for entries in self.library.values_mut() {
            entries.retain(|e| e.reel_id != reel_id);
        }
        Some(reel)
    }

    fn next_order_index(&self, game_id: GameId) -> u32 {
        self.reels
            .values()
            .filter(|r| r.game_id == game_id)
            .map(|r| r.order_index + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Summary counts, mostly for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCounts {
    pub users: usize,
    pub games: usize,
    pub reels: usize,
    pub tags: usize,
    pub swipes: usize,
}

/// In-memory `Store`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub(crate) tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    // Seeding helpers. These take `&mut self`, so they are only usable while
    // the store is still exclusively owned (before it is shared in an Arc).

    pub fn insert_user(&mut self, user: User) {
        self.tables.get_mut().users.insert(user.id, user);
    }

    pub fn insert_tag(&mut self, tag: Tag) {
        self.tables.get_mut().tags.insert(tag.id, tag);
    }

    pub fn insert_game(&mut self, game: GameProfile) {
        self.tables.get_mut().games.insert(game.id, game);
    }

    /// Insert a reel with explicit timestamps and attach its tags
    pub fn insert_reel(&mut self, reel: Reel, tag_ids: &[TagId]) {
        let tables = self.tables.get_mut();
        tables.set_reel_tags(reel.id, tag_ids);
        tables.reels.insert(reel.id, reel);
    }

    pub async fn counts(&self) -> StoreCounts {
        let tables = self.tables.read().await;
        StoreCounts {
            users: tables.users.len(),
            games: tables.games.len(),
            reels: tables.reels.len(),
            tags: tables.tags.len(),
            swipes: tables.swipes.len(),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(StoreError::Duplicate {
                entity: "user",
                key: user.email,
            });
        }

        let now = Utc::now();
        let row = User {
            id: Uuid::now_v7(),
            email: user.email,
            role: user.role,
            display_name: user.display_name,
            studio_name: None,
            bio: None,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(row.id, row.clone());
        debug!("Created {} account {}", row.role, row.id);
        Ok(row)
    }

    async fn update_user(&self, id: UserId, update: ProfileUpdate) -> Result<User> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("user", id))?;

        user.display_name = update.display_name;
        user.studio_name = update.studio_name;
        user.bio = update.bio;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn tags_by_kind(&self, kind: &str) -> Result<Vec<Tag>> {
        let tables = self.tables.read().await;
        let mut tags: Vec<Tag> = tables
            .tags
            .values()
            .filter(|t| t.kind == kind)
            .cloned()
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn mood_tag_ids(&self, user_id: UserId) -> Result<Vec<TagId>> {
        let tables = self.tables.read().await;
        Ok(tables.moods.get(&user_id).cloned().unwrap_or_default())
    }

    async fn mood_tags(&self, user_id: UserId) -> Result<Vec<Tag>> {
        let tables = self.tables.read().await;
        Ok(tables
            .moods
            .get(&user_id)
            .map(|ids| ids.iter().filter_map(|id| tables.tags.get(id).cloned()).collect())
            .unwrap_or_default())
    }

    async fn replace_mood_tags(&self, user_id: UserId, tag_ids: &[TagId]) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::not_found("user", user_id));
        }
        tables.check_tags_exist(tag_ids)?;

        let previous = tables.moods.insert(user_id, tag_ids.to_vec());
        debug!(
            "Replaced mood tags for user {}: {} -> {}",
            user_id,
            previous.map(|p| p.len()).unwrap_or(0),
            tag_ids.len()
        );
        Ok(())
    }

    async fn swiped_reel_ids(&self, user_id: UserId) -> Result<Vec<ReelId>> {
        let tables = self.tables.read().await;
        Ok(tables
            .swiped
            .get(&user_id)
            .map(|reels| reels.iter().copied().collect())
            .unwrap_or_default())
    }

    async fn reel_ids_tagged_any(&self, tag_ids: &[TagId]) -> Result<Vec<ReelId>> {
        let tables = self.tables.read().await;
        let matching: HashSet<ReelId> = tag_ids
            .iter()
            .filter_map(|tag_id| tables.tag_reels.get(tag_id))
            .flatten()
            .copied()
            .collect();
        Ok(matching.into_iter().collect())
    }

    async fn reels_with_context(&self, ids: &[ReelId]) -> Result<Vec<ReelWithContext>> {
        let tables = self.tables.read().await;
        let unique: HashSet<&ReelId> = ids.iter().collect();
        let mut reels: Vec<ReelWithContext> = unique
            .into_iter()
            .filter_map(|id| tables.reels.get(id))
            .filter_map(|reel| tables.with_context(reel))
            .collect();

        // Newest first; id breaks ties so the order is stable
        reels.sort_by(|a, b| {
            b.reel
                .created_at
                .cmp(&a.reel.created_at)
                .then_with(|| b.reel.id.cmp(&a.reel.id))
        });
        Ok(reels)
    }

    async fn record_swipe(
        &self,
        user_id: UserId,
        reel_id: ReelId,
        direction: Direction,
    ) -> Result<Swipe> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::not_found("user", user_id));
        }
        if !tables.reels.contains_key(&reel_id) {
            return Err(StoreError::not_found("reel", reel_id));
        }
        let already = tables
            .swiped
            .get(&user_id)
            .is_some_and(|reels| reels.contains(&reel_id));
        if already {
            return Err(StoreError::Duplicate {
                entity: "swipe",
                key: format!("{user_id}/{reel_id}"),
            });
        }

        let now = Utc::now();
        let swipe = Swipe {
            id: Uuid::now_v7(),
            user_id,
            reel_id,
            direction,
            created_at: now,
        };
        tables.push_swipe(swipe.clone());

        if direction == Direction::Right {
            let entries = tables.library.entry(user_id).or_default();
            if !entries.iter().any(|e| e.reel_id == reel_id) {
                entries.push(LibraryEntry {
                    user_id,
                    reel_id,
                    saved_at: now,
                });
            }
        }
        Ok(swipe)
    }

    async fn swipes_for_reels(&self, reel_ids: &[ReelId]) -> Result<Vec<Swipe>> {
        let tables = self.tables.read().await;
        let wanted: HashSet<&ReelId> = reel_ids.iter().collect();
        Ok(tables
            .swipes
            .iter()
            .filter(|s| wanted.contains(&s.reel_id))
            .cloned()
            .collect())
    }

    async fn library(&self, user_id: UserId) -> Result<Vec<LibraryReel>> {
        let tables = self.tables.read().await;
        let mut saved: Vec<LibraryReel> = tables
            .library
            .get(&user_id)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| {
                        let reel = tables.reels.get(&entry.reel_id)?;
                        Some(LibraryReel {
                            reel: tables.with_context(reel)?,
                            saved_at: entry.saved_at,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        saved.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(saved)
    }

    async fn remove_from_library(&self, user_id: UserId, reel_id: ReelId) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let Some(entries) = tables.library.get_mut(&user_id) else {
            return Ok(false);
        };
        let before = entries.len();
        entries.retain(|e| e.reel_id != reel_id);
        Ok(entries.len() != before)
    }

    async fn get_game(&self, id: GameId) -> Result<Option<GameProfile>> {
        Ok(self.tables.read().await.games.get(&id).cloned())
    }

    async fn games_by_developer(&self, developer_id: UserId) -> Result<Vec<GameProfile>> {
        let tables = self.tables.read().await;
        let mut games: Vec<GameProfile> = tables
            .games
            .values()
            .filter(|g| g.developer_id == developer_id)
            .cloned()
            .collect();
        games.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(games)
    }

    async fn create_game(&self, developer_id: UserId, game: NewGameProfile) -> Result<GameProfile> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&developer_id) {
            return Err(StoreError::not_found("user", developer_id));
        }
        let now = Utc::now();
        let profile = GameProfile {
            id: Uuid::now_v7(),
            developer_id,
            title: game.title,
            itch_url: game.itch_url,
            description: game.description,
            thumbnail_url: game.thumbnail_url,
            created_at: now,
            updated_at: now,
        };
        tables.games.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn update_game(&self, id: GameId, update: GameProfileUpdate) -> Result<GameProfile> {
        let mut tables = self.tables.write().await;
        let game = tables
            .games
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("game", id))?;

        if let Some(title) = update.title {
            game.title = title;
        }
        if let Some(itch_url) = update.itch_url {
            game.itch_url = itch_url;
        }
        if let Some(description) = update.description {
            game.description = Some(description);
        }
        if let Some(thumbnail_url) = update.thumbnail_url {
            game.thumbnail_url = Some(thumbnail_url);
        }
        game.updated_at = Utc::now();
        Ok(game.clone())
    }

    async fn delete_game(&self, id: GameId) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.games.remove(&id).is_none() {
            return Err(StoreError::not_found("game", id));
        }
        let reel_ids: Vec<ReelId> = tables
            .reels
            .values()
            .filter(|r| r.game_id == id)
            .map(|r| r.id)
            .collect();
        for reel_id in &reel_ids {
            tables.remove_reel(*reel_id);
        }
        debug!("Deleted game {} with {} reels", id, reel_ids.len());
        Ok(())
    }

    async fn get_reel(&self, id: ReelId) -> Result<Option<Reel>> {
        Ok(self.tables.read().await.reels.get(&id).cloned())
    }

    async fn reels_for_game(&self, game_id: GameId) -> Result<Vec<ReelWithTags>> {
        let tables = self.tables.read().await;
        let mut reels: Vec<ReelWithTags> = tables
            .reels
            .values()
            .filter(|r| r.game_id == game_id)
            .map(|reel| ReelWithTags {
                reel: reel.clone(),
                tags: tables.tags_of(reel.id),
            })
            .collect();
        reels.sort_by_key(|r| r.reel.order_index);
        Ok(reels)
    }

    async fn create_reel(&self, game_id: GameId, reel: NewReel) -> Result<Reel> {
        let mut tables = self.tables.write().await;
        if !tables.games.contains_key(&game_id) {
            return Err(StoreError::not_found("game", game_id));
        }
        tables.check_tags_exist(&reel.tag_ids)?;

        let now = Utc::now();
        let row = Reel {
            id: Uuid::now_v7(),
            game_id,
            video_url: reel.video_url,
            caption: reel.caption,
            order_index: tables.next_order_index(game_id),
            created_at: now,
            updated_at: now,
        };
        tables.set_reel_tags(row.id, &reel.tag_ids);
        tables.reels.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_reel(&self, id: ReelId, update: ReelUpdate) -> Result<Reel> {
        let mut tables = self.tables.write().await;
        if !tables.reels.contains_key(&id) {
            return Err(StoreError::not_found("reel", id));
        }
        if let Some(tag_ids) = &update.tag_ids {
            tables.check_tags_exist(tag_ids)?;
            tables.set_reel_tags(id, tag_ids);
        }

        let reel = tables
            .reels
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("reel", id))?;
        if let Some(video_url) = update.video_url {
            reel.video_url = video_url;
        }
        if let Some(caption) = update.caption {
            reel.caption = Some(caption);
        }
        reel.updated_at = Utc::now();
        Ok(reel.clone())
    }

    async fn delete_reel(&self, id: ReelId) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables
            .remove_reel(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("reel", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    struct Fixture {
        store: MemoryStore,
        gamer: UserId,
        game: GameId,
        cozy: TagId,
        spooky: TagId,
        old_reel: ReelId,
        new_reel: ReelId,
    }

    fn create_fixture() -> Fixture {
        let mut store = MemoryStore::new();
        let developer = Uuid::new_v4();
        let gamer = Uuid::new_v4();

        for (id, role) in [(developer, Role::Developer), (gamer, Role::Gamer)] {
            store.insert_user(User {
                id,
                email: format!("{role}@example.com"),
                role,
                display_name: None,
                studio_name: None,
                bio: None,
                avatar_url: None,
                created_at: at(0),
                updated_at: at(0),
            });
        }

        let cozy = Uuid::new_v4();
        let spooky = Uuid::new_v4();
        store.insert_tag(Tag { id: spooky, name: "Spooky".into(), kind: VIBE_TAG_KIND.into() });
        store.insert_tag(Tag { id: cozy, name: "Cozy".into(), kind: VIBE_TAG_KIND.into() });
        store.insert_tag(Tag { id: Uuid::new_v4(), name: "Pixel".into(), kind: "style".into() });

        let game = Uuid::new_v4();
        store.insert_game(GameProfile {
            id: game,
            developer_id: developer,
            title: "Lantern Woods".into(),
            itch_url: "https://example.itch.io/lantern-woods".into(),
            description: None,
            thumbnail_url: None,
            created_at: at(1),
            updated_at: at(1),
        });

        let old_reel = Uuid::new_v4();
        let new_reel = Uuid::new_v4();
        for (id, order, created, tags) in [
            (old_reel, 0, at(10), vec![cozy]),
            (new_reel, 1, at(20), vec![cozy, spooky]),
        ] {
            store.insert_reel(
                Reel {
                    id,
                    game_id: game,
                    video_url: format!("https://cdn.example.com/{id}.mp4"),
                    caption: None,
                    order_index: order,
                    created_at: created,
                    updated_at: created,
                },
                &tags,
            );
        }

        Fixture { store, gamer, game, cozy, spooky, old_reel, new_reel }
    }

    #[tokio::test]
    async fn test_tags_by_kind_sorted_by_name() {
        let f = create_fixture();
        let tags = f.store.tags_by_kind(VIBE_TAG_KIND).await.unwrap();
        let names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Cozy", "Spooky"]);
    }

    #[tokio::test]
    async fn test_reel_ids_tagged_any_is_a_union_without_duplicates() {
        let f = create_fixture();
        let mut ids = f.store.reel_ids_tagged_any(&[f.cozy, f.spooky]).await.unwrap();
        ids.sort();
        let mut expected = vec![f.old_reel, f.new_reel];
        expected.sort();
        assert_eq!(ids, expected);

        let spooky_only = f.store.reel_ids_tagged_any(&[f.spooky]).await.unwrap();
        assert_eq!(spooky_only, vec![f.new_reel]);
    }

    #[tokio::test]
    async fn test_reels_with_context_newest_first() {
        let f = create_fixture();
        let reels = f
            .store
            .reels_with_context(&[f.old_reel, f.new_reel, Uuid::new_v4()])
            .await
            .unwrap();
        assert_eq!(reels.len(), 2);
        assert_eq!(reels[0].reel.id, f.new_reel);
        assert_eq!(reels[1].reel.id, f.old_reel);
        assert_eq!(reels[0].game.title, "Lantern Woods");
        assert_eq!(reels[0].tags.len(), 2);
    }

    #[tokio::test]
    async fn test_right_swipe_writes_library_entry() {
        let f = create_fixture();
        f.store.record_swipe(f.gamer, f.new_reel, Direction::Right).await.unwrap();
        f.store.record_swipe(f.gamer, f.old_reel, Direction::Left).await.unwrap();

        let library = f.store.library(f.gamer).await.unwrap();
        assert_eq!(library.len(), 1);
        assert_eq!(library[0].reel.reel.id, f.new_reel);

        let mut swiped = f.store.swiped_reel_ids(f.gamer).await.unwrap();
        swiped.sort();
        let mut expected = vec![f.old_reel, f.new_reel];
        expected.sort();
        assert_eq!(swiped, expected);
    }

    #[tokio::test]
    async fn test_reels_with_context_ignores_repeated_ids() {
        let f = create_fixture();
        let reels = f
            .store
            .reels_with_context(&[f.old_reel, f.old_reel, f.new_reel])
            .await
            .unwrap();
        let ids: Vec<ReelId> = reels.iter().map(|r| r.reel.id).collect();
        assert_eq!(ids, vec![f.new_reel, f.old_reel]);
    }

    #[tokio::test]
    async fn test_create_user_rejects_registered_email() {
        let f = create_fixture();
        let user = f
            .store
            .create_user(NewUser {
                email: "newcomer@example.com".into(),
                role: Role::Developer,
                display_name: Some("Moth Lamp Games".into()),
            })
            .await
            .unwrap();
        assert_eq!(user.role, Role::Developer);
        assert_eq!(user.created_at, user.updated_at);
        assert_eq!(f.store.get_user(user.id).await.unwrap(), Some(user));

        // The fixture gamer registered as gamer@example.com
        let err = f
            .store
            .create_user(NewUser {
                email: "GAMER@example.com".into(),
                role: Role::Gamer,
                display_name: None,
            })
            .await
            .unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(f.store.counts().await.users, 3);
    }

    #[tokio::test]
    async fn test_update_user_overwrites_profile_fields() {
        let f = create_fixture();
        f.store
            .update_user(
                f.gamer,
                ProfileUpdate {
                    display_name: Some("Wren".into()),
                    studio_name: None,
                    bio: Some("Cozy games only".into()),
                },
            )
            .await
            .unwrap();

        let user = f
            .store
            .update_user(
                f.gamer,
                ProfileUpdate {
                    display_name: Some("Wren".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Wren"));
        assert_eq!(user.bio, None);
        assert!(user.updated_at > user.created_at);

        let missing = f.store.update_user(Uuid::new_v4(), ProfileUpdate::default()).await;
        assert!(matches!(missing, Err(StoreError::NotFound { entity: "user", .. })));
    }

    #[tokio::test]
    async fn test_duplicate_swipe_rejected() {
        let f = create_fixture();
        f.store.record_swipe(f.gamer, f.new_reel, Direction::Right).await.unwrap();
        let err = f
            .store
            .record_swipe(f.gamer, f.new_reel, Direction::Right)
            .await
            .unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(f.store.counts().await.swipes, 1);
        assert_eq!(f.store.library(f.gamer).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_swipe_on_unknown_reel() {
        let f = create_fixture();
        let err = f
            .store
            .record_swipe(f.gamer, Uuid::new_v4(), Direction::Left)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "reel", .. }));
    }

    #[tokio::test]
    async fn test_replace_mood_tags_is_all_or_nothing() {
        let f = create_fixture();
        f.store.replace_mood_tags(f.gamer, &[f.cozy]).await.unwrap();

        let result = f.store.replace_mood_tags(f.gamer, &[f.spooky, Uuid::new_v4()]).await;
        assert!(result.is_err());
        assert_eq!(f.store.mood_tag_ids(f.gamer).await.unwrap(), vec![f.cozy]);

        f.store.replace_mood_tags(f.gamer, &[f.spooky]).await.unwrap();
        assert_eq!(f.store.mood_tag_ids(f.gamer).await.unwrap(), vec![f.spooky]);
    }

    #[tokio::test]
    async fn test_delete_game_cascades() {
        let f = create_fixture();
        f.store.record_swipe(f.gamer, f.new_reel, Direction::Right).await.unwrap();

        f.store.delete_game(f.game).await.unwrap();

        assert!(f.store.get_reel(f.new_reel).await.unwrap().is_none());
        assert!(f.store.reel_ids_tagged_any(&[f.cozy, f.spooky]).await.unwrap().is_empty());
        assert!(f.store.library(f.gamer).await.unwrap().is_empty());
        assert!(f.store.swiped_reel_ids(f.gamer).await.unwrap().is_empty());
        assert!(f.store.delete_game(f.game).await.is_err());
    }

    #[tokio::test]
    async fn test_create_reel_appends_order_and_tags() {
        let f = create_fixture();
        let reel = f
            .store
            .create_reel(
                f.game,
                NewReel {
                    video_url: "https://cdn.example.com/new.mp4".into(),
                    caption: Some("boss fight".into()),
                    tag_ids: vec![f.spooky],
                },
            )
            .await
            .unwrap();
        assert_eq!(reel.order_index, 2);

        let reels = f.store.reels_for_game(f.game).await.unwrap();
        let orders: Vec<u32> = reels.iter().map(|r| r.reel.order_index).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert_eq!(reels[2].tags[0].name, "Spooky");
    }

    #[tokio::test]
    async fn test_update_reel_replaces_tags() {
        let f = create_fixture();
        f.store
            .update_reel(
                f.new_reel,
                ReelUpdate {
                    caption: Some("new caption".into()),
                    tag_ids: Some(vec![f.spooky]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(!f.store.reel_ids_tagged_any(&[f.cozy]).await.unwrap().contains(&f.new_reel));
        let reel = f.store.get_reel(f.new_reel).await.unwrap().unwrap();
        assert_eq!(reel.caption.as_deref(), Some("new caption"));
    }

    #[tokio::test]
    async fn test_remove_from_library() {
        let f = create_fixture();
        f.store.record_swipe(f.gamer, f.old_reel, Direction::Right).await.unwrap();
        assert!(f.store.remove_from_library(f.gamer, f.old_reel).await.unwrap());
        assert!(!f.store.remove_from_library(f.gamer, f.old_reel).await.unwrap());
        // The swipe itself stays
        assert_eq!(f.store.swiped_reel_ids(f.gamer).await.unwrap(), vec![f.old_reel]);
    }
}
