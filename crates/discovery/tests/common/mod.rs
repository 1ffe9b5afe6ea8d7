//! Shared setup for the discovery integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use discovery::Session;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use store::*;
use uuid::Uuid;

pub struct Scenario {
    pub developer: UserId,
    pub gamer: UserId,
    pub second_gamer: UserId,
    pub game: GameId,
    pub cozy: TagId,
    pub spooky: TagId,
    pub action: TagId,
    pub retro: TagId,
    pub reel_a: ReelId,
    pub reel_b: ReelId,
    pub reel_c: ReelId,
}

impl Scenario {
    pub fn gamer_session(&self) -> Session {
        Session::new(self.gamer, Role::Gamer)
    }

    pub fn second_gamer_session(&self) -> Session {
        Session::new(self.second_gamer, Role::Gamer)
    }

    pub fn developer_session(&self) -> Session {
        Session::new(self.developer, Role::Developer)
    }
}

/// Reels A {Cozy}, B {Action}, C {Spooky, Action}, created in that order.
pub fn build_store() -> (MemoryStore, Scenario) {
    let mut store = MemoryStore::new();
    let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

    let developer = Uuid::new_v4();
    let gamer = Uuid::new_v4();
    let second_gamer = Uuid::new_v4();
    for (id, role) in [(developer, Role::Developer), (gamer, Role::Gamer), (second_gamer, Role::Gamer)] {
        store.insert_user(User {
            id,
            email: format!("{id}@example.com"),
            role,
            display_name: None,
            studio_name: None,
            bio: None,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        });
    }

    let [cozy, spooky, action, retro] = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
    for (id, name) in [(cozy, "Cozy"), (spooky, "Spooky"), (action, "Action"), (retro, "Retro")] {
        store.insert_tag(Tag { id, name: name.into(), kind: VIBE_TAG_KIND.into() });
    }

    let game = Uuid::new_v4();
    store.insert_game(GameProfile {
        id: game,
        developer_id: developer,
        title: "Lantern Hollow".into(),
        itch_url: "https://example.itch.io/lantern-hollow".into(),
        description: None,
        thumbnail_url: None,
        created_at: now,
        updated_at: now,
    });

    let [reel_a, reel_b, reel_c] = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
    let reels = [(reel_a, vec![cozy]), (reel_b, vec![action]), (reel_c, vec![spooky, action])];
    for (index, (id, tags)) in reels.into_iter().enumerate() {
        store.insert_reel(
            Reel {
                id,
                game_id: game,
                video_url: format!("https://cdn.example.com/{id}.mp4"),
                caption: None,
                order_index: index as u32,
                created_at: now + Duration::seconds(index as i64),
                updated_at: now,
            },
            &tags,
        );
    }

    let scenario = Scenario { developer, gamer, second_gamer, game, cozy, spooky, action, retro, reel_a, reel_b, reel_c };
    (store, scenario)
}

/// `Store` that delegates to a `MemoryStore` but can fail one named
/// operation, or hang swipes forever.
pub struct FaultyStore {
    pub inner: MemoryStore,
    failing: Mutex<Option<&'static str>>,
    stall_swipes: AtomicBool,
}

impl FaultyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            failing: Mutex::new(None),
            stall_swipes: AtomicBool::new(false),
        }
    }

    pub fn fail_on(&self, operation: &'static str) {
        *self.failing.lock().unwrap() = Some(operation);
    }

    pub fn heal(&self) {
        *self.failing.lock().unwrap() = None;
    }

    pub fn stall_swipes(&self, stall: bool) {
        self.stall_swipes.store(stall, Ordering::SeqCst);
    }

    fn check(&self, operation: &'static str) -> Result<()> {
        if *self.failing.lock().unwrap() == Some(operation) {
            return Err(StoreError::Unavailable(format!("{operation} failed")));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for FaultyStore {
    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        self.check("get_user")?;
        self.inner.get_user(id).await
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        self.check("create_user")?;
        self.inner.create_user(user).await
    }

    async fn update_user(&self, id: UserId, update: ProfileUpdate) -> Result<User> {
        self.check("update_user")?;
        self.inner.update_user(id, update).await
    }

    async fn tags_by_kind(&self, kind: &str) -> Result<Vec<Tag>> {
        self.check("tags_by_kind")?;
        self.inner.tags_by_kind(kind).await
    }

    async fn mood_tag_ids(&self, user_id: UserId) -> Result<Vec<TagId>> {
        self.check("mood_tag_ids")?;
        self.inner.mood_tag_ids(user_id).await
    }

    async fn mood_tags(&self, user_id: UserId) -> Result<Vec<Tag>> {
        self.check("mood_tags")?;
        self.inner.mood_tags(user_id).await
    }

    async fn replace_mood_tags(&self, user_id: UserId, tag_ids: &[TagId]) -> Result<()> {
        self.check("replace_mood_tags")?;
        self.inner.replace_mood_tags(user_id, tag_ids).await
    }

    async fn swiped_reel_ids(&self, user_id: UserId) -> Result<Vec<ReelId>> {
        self.check("swiped_reel_ids")?;
        self.inner.swiped_reel_ids(user_id).await
    }

    async fn reel_ids_tagged_any(&self, tag_ids: &[TagId]) -> Result<Vec<ReelId>> {
        self.check("reel_ids_tagged_any")?;
        self.inner.reel_ids_tagged_any(tag_ids).await
    }

    async fn reels_with_context(&self, ids: &[ReelId]) -> Result<Vec<ReelWithContext>> {
        self.check("reels_with_context")?;
        self.inner.reels_with_context(ids).await
    }

    async fn record_swipe(&self, user_id: UserId, reel_id: ReelId, direction: Direction) -> Result<Swipe> {
        self.check("record_swipe")?;
        if self.stall_swipes.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        self.inner.record_swipe(user_id, reel_id, direction).await
    }

    async fn swipes_for_reels(&self, reel_ids: &[ReelId]) -> Result<Vec<Swipe>> {
        self.check("swipes_for_reels")?;
        self.inner.swipes_for_reels(reel_ids).await
    }

    async fn library(&self, user_id: UserId) -> Result<Vec<LibraryReel>> {
        self.check("library")?;
        self.inner.library(user_id).await
    }

    async fn remove_from_library(&self, user_id: UserId, reel_id: ReelId) -> Result<bool> {
        self.check("remove_from_library")?;
        self.inner.remove_from_library(user_id, reel_id).await
    }

    async fn get_game(&self, id: GameId) -> Result<Option<GameProfile>> {
        self.check("get_game")?;
        self.inner.get_game(id).await
    }

    async fn games_by_developer(&self, developer_id: UserId) -> Result<Vec<GameProfile>> {
        self.check("games_by_developer")?;
        self.inner.games_by_developer(developer_id).await
    }

    async fn create_game(&self, developer_id: UserId, game: NewGameProfile) -> Result<GameProfile> {
        self.check("create_game")?;
        self.inner.create_game(developer_id, game).await
    }

    async fn update_game(&self, id: GameId, update: GameProfileUpdate) -> Result<GameProfile> {
        self.check("update_game")?;
        self.inner.update_game(id, update).await
    }

    async fn delete_game(&self, id: GameId) -> Result<()> {
        self.check("delete_game")?;
        self.inner.delete_game(id).await
    }

    async fn get_reel(&self, id: ReelId) -> Result<Option<Reel>> {
        self.check("get_reel")?;
        self.inner.get_reel(id).await
    }

    async fn reels_for_game(&self, game_id: GameId) -> Result<Vec<ReelWithTags>> {
        self.check("reels_for_game")?;
        self.inner.reels_for_game(game_id).await
    }

    async fn create_reel(&self, game_id: GameId, reel: NewReel) -> Result<Reel> {
        self.check("create_reel")?;
        self.inner.create_reel(game_id, reel).await
    }

    async fn update_reel(&self, id: ReelId, update: ReelUpdate) -> Result<Reel> {
        self.check("update_reel")?;
        self.inner.update_reel(id, update).await
    }

    async fn delete_reel(&self, id: ReelId) -> Result<()> {
        self.check("delete_reel")?;
        self.inner.delete_reel(id).await
    }
}
