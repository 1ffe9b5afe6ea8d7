//! # Feed Session
//!
//! Client-side state of one pass through the feed:
//!
//! ```text
//! Idle --refresh--> Presenting(0) --swipe--> Swiping(i) --ok--> Presenting(i + 1)
//!                                                      \--err--> Presenting(i)
//! Presenting(last) --swipe ok--> Exhausted
//! any state --refresh--> Presenting(0) | Exhausted
//! ```
//!
//! Only `refresh` fetches a new feed. Swiped reels stay out of it because
//! the resolver excludes them.

use store::{Direction, ReelWithContext};
use tracing::debug;

use crate::error::{DiscoveryError, Result};
use crate::feed::FeedResolver;
use crate::session::Session;
use crate::swipe::{SwipeOutcome, SwipeRecorder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    /// No feed loaded yet
    Idle,
    /// Showing the reel at this index
    Presenting(usize),
    /// A swipe on the reel at this index is being recorded
    Swiping(usize),
    /// Every loaded reel was swiped, or the feed was empty
    Exhausted,
}

pub struct FeedSession {
    session: Session,
    resolver: FeedResolver,
    recorder: SwipeRecorder,
    reels: Vec<ReelWithContext>,
    state: FeedState,
}

impl FeedSession {
    pub fn new(session: Session, resolver: FeedResolver, recorder: SwipeRecorder) -> Self {
        Self {
            session,
            resolver,
            recorder,
            reels: Vec::new(),
            state: FeedState::Idle,
        }
    }

    pub fn state(&self) -> FeedState {
        self.state
    }

    /// Resolve the feed from scratch and start at its first reel.
    /// Returns the number of reels loaded.
    pub async fn refresh(&mut self) -> Result<usize> {
        self.reels.clear();
        self.state = FeedState::Idle;

        self.reels = self.resolver.resolve(&self.session).await?;
        self.state = if self.reels.is_empty() {
            FeedState::Exhausted
        } else {
            FeedState::Presenting(0)
        };
        debug!("Feed session loaded {} reels", self.reels.len());
        Ok(self.reels.len())
    }

    /// The reel on screen, if any
    pub fn current(&self) -> Option<&ReelWithContext> {
        match self.state {
            FeedState::Presenting(index) | FeedState::Swiping(index) => self.reels.get(index),
            FeedState::Idle | FeedState::Exhausted => None,
        }
    }

    /// Reels left to swipe, the current one included
    pub fn remaining(&self) -> usize {
        match self.state {
            FeedState::Presenting(index) | FeedState::Swiping(index) => {
                self.reels.len().saturating_sub(index)
            }
            FeedState::Idle | FeedState::Exhausted => 0,
        }
    }

    /// Swipe the current reel and move on. On failure the same reel stays
    /// current.
    pub async fn swipe(&mut self, direction: Direction) -> Result<SwipeOutcome> {
        let index = match self.state {
            FeedState::Presenting(index) => index,
            FeedState::Swiping(_) => {
                return Err(DiscoveryError::validation("a swipe is already in progress"));
            }
            FeedState::Idle | FeedState::Exhausted => {
                return Err(DiscoveryError::validation("no reel to swipe"));
            }
        };
        let reel_id = match self.reels.get(index) {
            Some(reel) => reel.reel.id,
            None => return Err(DiscoveryError::validation("no reel to swipe")),
        };

        self.state = FeedState::Swiping(index);
        match self.recorder.record(&self.session, reel_id, direction).await {
            Ok(outcome) => {
                let next = index + 1;
                self.state = if next < self.reels.len() {
                    FeedState::Presenting(next)
                } else {
                    FeedState::Exhausted
                };
                Ok(outcome)
            }
            Err(err) => {
                self.state = FeedState::Presenting(index);
                Err(err)
            }
        }
    }
}
