//! # Swipe Recorder
//!
//! Persists one swipe decision. A right swipe also saves the reel to the
//! user's library; the store writes both rows in one transaction.
//!
//! Each (user, reel) pair takes one decision. The store rejects repeats
//! and the recorder reports them as `SwipeOutcome::AlreadyRecorded`.

use std::sync::Arc;

use store::{Direction, ReelId, Store, Swipe};
use tracing::{info, warn};

use crate::error::Result;
use crate::session::Session;

#[derive(Debug, Clone, PartialEq)]
pub enum SwipeOutcome {
    Recorded(Swipe),
    /// The user had already swiped this reel; nothing was written
    AlreadyRecorded,
}

impl SwipeOutcome {
    pub fn is_new(&self) -> bool {
        matches!(self, SwipeOutcome::Recorded(_))
    }
}

#[derive(Clone)]
pub struct SwipeRecorder {
    store: Arc<dyn Store>,
}

impl SwipeRecorder {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn record(
        &self,
        session: &Session,
        reel_id: ReelId,
        direction: Direction,
    ) -> Result<SwipeOutcome> {
        session.require_gamer()?;

        match self.store.record_swipe(session.user_id, reel_id, direction).await {
            Ok(swipe) => {
                info!("User {} swiped {} on reel {}", session.user_id, direction, reel_id);
                Ok(SwipeOutcome::Recorded(swipe))
            }
            Err(err) if err.is_duplicate() => {
                warn!("User {} already swiped reel {}, ignoring", session.user_id, reel_id);
                Ok(SwipeOutcome::AlreadyRecorded)
            }
            Err(err) => Err(err.into()),
        }
    }
}
