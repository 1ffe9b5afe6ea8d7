//! # Discovery Crate
//!
//! The services behind the swipe feed:
//!
//! - **feed**: `FeedResolver`, the unswiped reels matching a gamer's moods
//! - **swipe**: `SwipeRecorder`, one decision per reel, right swipes saved
//! - **mood**: `MoodPreferenceManager`, wholesale mood replacement
//! - **tags**: `TagSelector`, the mood tag catalog
//! - **feed_session**: client-side swipe state machine
//! - **catalog**: developer game and reel management
//! - **library**: saved reels
//! - **analytics**: swipe stats per game
//! - **profile**: `ProfileManager`, registration and profile edits
//!
//! Every user-scoped call takes an explicit `Session`.
//!
//! ## Example Usage
//!
//! ```ignore
//! use discovery::{FeedResolver, Session, SwipeRecorder};
//! use store::Direction;
//!
//! let session = Session::resolve(store.as_ref(), Some(user_id)).await?;
//! let feed = FeedResolver::new(store.clone()).resolve(&session).await?;
//! if let Some(first) = feed.first() {
//!     SwipeRecorder::new(store.clone())
//!         .record(&session, first.reel.id, Direction::Right)
//!         .await?;
//! }
//! ```

pub mod error;
pub mod config;
pub mod session;
pub mod feed;
pub mod swipe;
pub mod mood;
pub mod tags;
pub mod feed_session;
pub mod catalog;
pub mod library;
pub mod analytics;
pub mod profile;

pub use analytics::{Analytics, AnalyticsReport, AnalyticsTotals, GameStats};
pub use catalog::Catalog;
pub use config::{ConfigError, DiscoveryConfig};
pub use error::{DiscoveryError, ErrorCategory, Result};
pub use feed::{FeedResolver, FeedStats};
pub use feed_session::{FeedSession, FeedState};
pub use library::Library;
pub use mood::{validate_mood_selection, MoodPreferenceManager};
pub use profile::{ProfileEdit, ProfileManager};
pub use session::Session;
pub use swipe::{SwipeOutcome, SwipeRecorder};
pub use tags::TagSelector;
