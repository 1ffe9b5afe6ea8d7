//! Core domain types for the discovery catalog.
//!
//! These are the rows the collaborator store hands back. Every entity is
//! keyed by a UUID; timestamps are UTC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user (developer or gamer)
pub type UserId = Uuid;

/// Unique identifier for a game profile
pub type GameId = Uuid;

/// Unique identifier for a reel
pub type ReelId = Uuid;

/// Unique identifier for a tag
pub type TagId = Uuid;

/// Tag kind used for mood tags.
pub const VIBE_TAG_KIND: &str = "vibe";

// =============================================================================
// Users
// =============================================================================

/// Account role, fixed at sign-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Developer,
    Gamer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Developer => f.write_str("developer"),
            Role::Gamer => f.write_str("gamer"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "developer" | "dev" => Ok(Role::Developer),
            "gamer" => Ok(Role::Gamer),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub studio_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for an account row. The role never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub role: Role,
    pub display_name: Option<String>,
}

/// Replacement for the editable profile fields. Unlike the game and reel
/// updates, every field is written: `None` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub studio_name: Option<String>,
    pub bio: Option<String>,
}

// =============================================================================
// Catalog
// =============================================================================

/// A game published by a developer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameProfile {
    pub id: GameId,
    pub developer_id: UserId,
    pub title: String,
    pub itch_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a game profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewGameProfile {
    pub title: String,
    pub itch_url: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// Partial update for a game profile. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameProfileUpdate {
    pub title: Option<String>,
    pub itch_url: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// The slice of a game profile shown next to each reel in a feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: GameId,
    pub title: String,
    pub itch_url: String,
    pub thumbnail_url: Option<String>,
}

impl From<&GameProfile> for GameSummary {
    fn from(game: &GameProfile) -> Self {
        Self {
            id: game.id,
            title: game.title.clone(),
            itch_url: game.itch_url.clone(),
            thumbnail_url: game.thumbnail_url.clone(),
        }
    }
}

/// A short video attached to a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reel {
    pub id: ReelId,
    pub game_id: GameId,
    pub video_url: String,
    #[serde(default)]
    pub caption: Option<String>,
    /// Display order within the game. Never shown to gamers.
    pub order_index: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a reel. `tag_ids` are attached in the same write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewReel {
    pub video_url: String,
    pub caption: Option<String>,
    pub tag_ids: Vec<TagId>,
}

/// Partial update for a reel. `tag_ids: Some(..)` replaces the whole tag set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReelUpdate {
    pub video_url: Option<String>,
    pub caption: Option<String>,
    pub tag_ids: Option<Vec<TagId>>,
}

/// Named, typed label. The catalog is immutable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub kind: String,
}

/// Link row between a reel and one of its tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReelTag {
    pub reel_id: ReelId,
    pub tag_id: TagId,
}

/// A reel joined with its tags (developer view).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelWithTags {
    pub reel: Reel,
    pub tags: Vec<Tag>,
}

/// A reel joined with its parent game and its tags (gamer view).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelWithContext {
    pub reel: Reel,
    pub game: GameSummary,
    pub tags: Vec<Tag>,
}

// =============================================================================
// Discovery
// =============================================================================

/// Swipe decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => f.write_str("left"),
            Direction::Right => f.write_str("right"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Direction::Left),
            "right" | "r" => Ok(Direction::Right),
            other => Err(format!("unknown swipe direction: {other}")),
        }
    }
}

/// One recorded decision. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swipe {
    pub id: Uuid,
    pub user_id: UserId,
    pub reel_id: ReelId,
    pub direction: Direction,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodPreference {
    pub user_id: UserId,
    pub tag_id: TagId,
}

/// A reel saved by a right swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub user_id: UserId,
    pub reel_id: ReelId,
    pub saved_at: DateTime<Utc>,
}

/// A library entry joined with the saved reel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryReel {
    pub reel: ReelWithContext,
    pub saved_at: DateTime<Utc>,
}
