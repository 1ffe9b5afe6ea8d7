//! # Store Crate
//!
//! Domain types and the collaborator contract for the ReelSwipe discovery
//! service.
//!
//! ## Main Components
//!
//! - **types**: Users, games, reels, tags, swipes, library entries
//! - **traits**: The `Store` trait every service is written against
//! - **memory**: `MemoryStore`, an in-memory `Store` with secondary indices
//! - **snapshot**: JSON snapshots of a `MemoryStore`
//! - **media**: `MediaStore` for video uploads
//! - **error**: `StoreError`
//!
//! ## Example Usage
//!
//! ```ignore
//! use store::{MemoryStore, Store};
//! use std::path::Path;
//!
//! let store = MemoryStore::load_from_file(Path::new("data/reelswipe.json"))?;
//! let moods = store.mood_tag_ids(user_id).await?;
//! let reels = store.reel_ids_tagged_any(&moods).await?;
//! ```

pub mod error;
pub mod types;
pub mod traits;
pub mod memory;
pub mod snapshot;
pub mod media;

pub use error::{Result, StoreError};
pub use media::{LocalMediaStore, MediaStore};
pub use memory::{MemoryStore, StoreCounts};
pub use snapshot::Snapshot;
pub use traits::Store;
pub use types::{
    // Type aliases
    UserId,
    GameId,
    ReelId,
    TagId,
    // Rows
    User,
    GameProfile,
    Reel,
    Tag,
    ReelTag,
    Swipe,
    MoodPreference,
    LibraryEntry,
    // Write payloads
    NewUser,
    ProfileUpdate,
    NewGameProfile,
    GameProfileUpdate,
    NewReel,
    ReelUpdate,
    // Joined views
    GameSummary,
    ReelWithTags,
    ReelWithContext,
    LibraryReel,
    // Enums
    Role,
    Direction,
    VIBE_TAG_KIND,
};
