//! Snapshot persistence for `MemoryStore`.
//!
//! The whole store serializes to one JSON document. Loading rebuilds the
//! secondary indices and validates every cross-table reference.

use crate::error::{Result, StoreError};
use crate::memory::{MemoryStore, Tables};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// Flat, serializable view of every table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub users: Vec<User>,
    pub tags: Vec<Tag>,
    pub games: Vec<GameProfile>,
    pub reels: Vec<Reel>,
    pub reel_tags: Vec<ReelTag>,
    pub mood_preferences: Vec<MoodPreference>,
    pub swipes: Vec<Swipe>,
    pub library: Vec<LibraryEntry>,
}

impl Snapshot {
    /// Check that every reference points at an existing row and that the
    /// (user, reel) swipe pairs are unique.
    pub fn validate(&self) -> Result<()> {
        let users = unique_ids("user", self.users.iter().map(|u| u.id))?;
        let tags = unique_ids("tag", self.tags.iter().map(|t| t.id))?;
        let games = unique_ids("game", self.games.iter().map(|g| g.id))?;
        let reels = unique_ids("reel", self.reels.iter().map(|r| r.id))?;

        let mut emails = HashSet::new();
        for user in &self.users {
            if !emails.insert(user.email.to_lowercase()) {
                return Err(StoreError::Duplicate {
                    entity: "user",
                    key: user.email.clone(),
                });
            }
        }

        let missing = |what: &str, owner: &dyn std::fmt::Display, id: &dyn std::fmt::Display| {
            StoreError::Constraint(format!("{owner} references missing {what} {id}"))
        };

        for game in &self.games {
            if !users.contains(&game.developer_id) {
                return Err(missing("user", &format!("game {}", game.id), &game.developer_id));
            }
        }
        for reel in &self.reels {
            if !games.contains(&reel.game_id) {
                return Err(missing("game", &format!("reel {}", reel.id), &reel.game_id));
            }
        }
        for link in &self.reel_tags {
            if !reels.contains(&link.reel_id) {
                return Err(missing("reel", &"reel tag", &link.reel_id));
            }
            if !tags.contains(&link.tag_id) {
                return Err(missing("tag", &"reel tag", &link.tag_id));
            }
        }
        for mood in &self.mood_preferences {
            if !users.contains(&mood.user_id) {
                return Err(missing("user", &"mood preference", &mood.user_id));
            }
            if !tags.contains(&mood.tag_id) {
                return Err(missing("tag", &"mood preference", &mood.tag_id));
            }
        }

        let mut pairs = HashSet::new();
        for swipe in &self.swipes {
            if !users.contains(&swipe.user_id) {
                return Err(missing("user", &format!("swipe {}", swipe.id), &swipe.user_id));
            }
            if !reels.contains(&swipe.reel_id) {
                return Err(missing("reel", &format!("swipe {}", swipe.id), &swipe.reel_id));
            }
            if !pairs.insert((swipe.user_id, swipe.reel_id)) {
                return Err(StoreError::Duplicate {
                    entity: "swipe",
                    key: format!("{}/{}", swipe.user_id, swipe.reel_id),
                });
            }
        }
        for entry in &self.library {
            if !users.contains(&entry.user_id) {
                return Err(missing("user", &"library entry", &entry.user_id));
            }
            if !reels.contains(&entry.reel_id) {
                return Err(missing("reel", &"library entry", &entry.reel_id));
            }
        }
        Ok(())
    }
}

/// Collect primary ids, rejecting any id that appears twice.
fn unique_ids(entity: &'static str, ids: impl Iterator<Item = Uuid>) -> Result<HashSet<Uuid>> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(StoreError::Duplicate {
                entity,
                key: id.to_string(),
            });
        }
    }
    Ok(seen)
}

impl MemoryStore {
    /// Build a store from a snapshot, after validating it.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        snapshot.validate()?;

        let mut tables = Tables::default();
        tables.users = snapshot.users.into_iter().map(|u| (u.id, u)).collect();
        tables.tags = snapshot.tags.into_iter().map(|t| (t.id, t)).collect();
        tables.games = snapshot.games.into_iter().map(|g| (g.id, g)).collect();
        tables.reels = snapshot.reels.into_iter().map(|r| (r.id, r)).collect();

        for link in snapshot.reel_tags {
            tables.reel_tags.entry(link.reel_id).or_default().push(link.tag_id);
            tables.tag_reels.entry(link.tag_id).or_default().insert(link.reel_id);
        }
        for mood in snapshot.mood_preferences {
            tables.moods.entry(mood.user_id).or_default().push(mood.tag_id);
        }
        for swipe in snapshot.swipes {
            tables.push_swipe(swipe);
        }
        for entry in snapshot.library {
            tables.library.entry(entry.user_id).or_default().push(entry);
        }

        Ok(Self {
            tables: tokio::sync::RwLock::new(tables),
        })
    }

    /// Flatten the store into a snapshot. Rows are sorted so that saving an
    /// unchanged store produces an identical file.
    pub async fn snapshot(&self) -> Snapshot {
        let tables = self.tables.read().await;

        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by_key(|u| (u.created_at, u.id));
        let mut tags: Vec<Tag> = tables.tags.values().cloned().collect();
        tags.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.name.cmp(&b.name)));
        let mut games: Vec<GameProfile> = tables.games.values().cloned().collect();
        games.sort_by_key(|g| (g.created_at, g.id));
        let mut reels: Vec<Reel> = tables.reels.values().cloned().collect();
        reels.sort_by_key(|r| (r.game_id, r.order_index, r.id));

        let reel_tags = reels
            .iter()
            .flat_map(|reel| {
                tables
                    .reel_tags
                    .get(&reel.id)
                    .into_iter()
                    .flatten()
                    .map(move |&tag_id| ReelTag { reel_id: reel.id, tag_id })
            })
            .collect();

        let mut mood_preferences: Vec<MoodPreference> = tables
            .moods
            .iter()
            .flat_map(|(&user_id, ids)| ids.iter().map(move |&tag_id| MoodPreference { user_id, tag_id }))
            .collect();
        mood_preferences.sort_by_key(|m| m.user_id);

        let mut library: Vec<LibraryEntry> = tables.library.values().flatten().copied().collect();
        library.sort_by_key(|e| (e.user_id, e.saved_at, e.reel_id));

        Snapshot {
            users,
            tags,
            games,
            reels,
            reel_tags,
            mood_preferences,
            swipes: tables.swipes.clone(),
            library,
        }
    }

    /// Load a store from a JSON snapshot file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        info!(
            "Loaded snapshot from {:?}: {} users, {} games, {} reels, {} swipes",
            path,
            snapshot.users.len(),
            snapshot.games.len(),
            snapshot.reels.len(),
            snapshot.swipes.len()
        );
        Self::from_snapshot(snapshot)
    }

    /// Write the store to a JSON snapshot file, creating parent directories
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        let snapshot = self.snapshot().await;
        let json = serde_json::to_string_pretty(&snapshot)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Store;
    use chrono::Utc;
    use uuid::Uuid;

    fn build_snapshot() -> (Snapshot, UserId, ReelId, TagId) {
        let now = Utc::now();
        let developer = Uuid::new_v4();
        let gamer = Uuid::new_v4();
        let tag = Uuid::new_v4();
        let game = Uuid::new_v4();
        let reel = Uuid::new_v4();

        let user = |id, role| User {
            id,
            email: format!("{id}@example.com"),
            role,
            display_name: None,
            studio_name: None,
            bio: None,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        };

        let snapshot = Snapshot {
            users: vec![user(developer, Role::Developer), user(gamer, Role::Gamer)],
            tags: vec![Tag { id: tag, name: "Cozy".into(), kind: VIBE_TAG_KIND.into() }],
            games: vec![GameProfile {
                id: game,
                developer_id: developer,
                title: "Moss".into(),
                itch_url: "https://example.itch.io/moss".into(),
                description: None,
                thumbnail_url: None,
                created_at: now,
                updated_at: now,
            }],
            reels: vec![Reel {
                id: reel,
                game_id: game,
                video_url: "https://cdn.example.com/moss.mp4".into(),
                caption: None,
                order_index: 0,
                created_at: now,
                updated_at: now,
            }],
            reel_tags: vec![ReelTag { reel_id: reel, tag_id: tag }],
            mood_preferences: vec![MoodPreference { user_id: gamer, tag_id: tag }],
            swipes: vec![],
            library: vec![],
        };
        (snapshot, gamer, reel, tag)
    }

    #[tokio::test]
    async fn test_from_snapshot_rebuilds_indices() {
        let (snapshot, gamer, reel, tag) = build_snapshot();
        let store = MemoryStore::from_snapshot(snapshot).unwrap();

        assert_eq!(store.mood_tag_ids(gamer).await.unwrap(), vec![tag]);
        assert_eq!(store.reel_ids_tagged_any(&[tag]).await.unwrap(), vec![reel]);
    }

    #[test]
    fn test_validate_rejects_dangling_reel_tag() {
        let (mut snapshot, _, _, _) = build_snapshot();
        snapshot.reel_tags.push(ReelTag { reel_id: Uuid::new_v4(), tag_id: snapshot.tags[0].id });
        assert!(matches!(snapshot.validate(), Err(StoreError::Constraint(_))));
    }

    #[test]
    fn test_validate_rejects_repeated_primary_ids() {
        let (mut snapshot, _, _, _) = build_snapshot();
        let copy = snapshot.reels[0].clone();
        snapshot.reels.push(copy);
        assert!(matches!(
            snapshot.validate(),
            Err(StoreError::Duplicate { entity: "reel", .. })
        ));

        let (mut snapshot, _, _, _) = build_snapshot();
        let copy = snapshot.tags[0].clone();
        snapshot.tags.push(copy);
        assert!(matches!(
            snapshot.validate(),
            Err(StoreError::Duplicate { entity: "tag", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_repeated_email() {
        let (mut snapshot, _, _, _) = build_snapshot();
        let mut copy = snapshot.users[0].clone();
        copy.id = Uuid::new_v4();
        copy.email = copy.email.to_uppercase();
        snapshot.users.push(copy);
        assert!(matches!(
            snapshot.validate(),
            Err(StoreError::Duplicate { entity: "user", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_swipes() {
        let (mut snapshot, gamer, reel, _) = build_snapshot();
        for _ in 0..2 {
            snapshot.swipes.push(Swipe {
                id: Uuid::new_v4(),
                user_id: gamer,
                reel_id: reel,
                direction: Direction::Left,
                created_at: Utc::now(),
            });
        }
        assert!(matches!(snapshot.validate(), Err(StoreError::Duplicate { .. })));
    }

    #[tokio::test]
    async fn test_save_and_load_file() {
        let (snapshot, gamer, reel, _) = build_snapshot();
        let store = MemoryStore::from_snapshot(snapshot).unwrap();
        store.record_swipe(gamer, reel, Direction::Right).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        store.save_to_file(&path).await.unwrap();

        let loaded = MemoryStore::load_from_file(&path).unwrap();
        assert_eq!(loaded.snapshot().await, store.snapshot().await);
        assert_eq!(loaded.library(gamer).await.unwrap().len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let result = MemoryStore::load_from_file(Path::new("/nonexistent/store.json"));
        assert!(matches!(result, Err(StoreError::Io(_))));
    }
}
