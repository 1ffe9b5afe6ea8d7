//! # Sources Crate
//!
//! Candidate generation for the discovery feed.
//!
//! ## Components
//!
//! ### Feed Context
//! Gathers the per-user sets the feed is computed from:
//! - mood tags the user selected
//! - reels the user already swiped
//!
//! ### Mood Tag Source
//! Every reel tagged with at least one of the user's mood tags.
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{feed_context::build_feed_context, MoodTagSource};
//! use std::sync::Arc;
//!
//! let context = build_feed_context(store.as_ref(), user_id).await?;
//! let source = MoodTagSource::new(store.clone());
//! let candidates = source.get_candidates(&context).await?;
//! ```

pub mod types;
pub mod feed_context;
pub mod mood_tags;

pub use types::{Candidate, CandidateSource, FeedContext};
pub use mood_tags::MoodTagSource;
