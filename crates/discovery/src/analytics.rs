//! # Developer Analytics
//!
//! Swipe counts for each of a developer's games. Store reads happen up
//! front; the per-game aggregation then runs in parallel with rayon.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use store::{Direction, GameId, GameProfile, ReelId, Store, Swipe};
use tracing::info;

use crate::error::Result;
use crate::session::Session;

/// Right swipes as a percentage of all swipes; 0 when there are none.
pub fn right_swipe_rate(right_swipes: usize, total_swipes: usize) -> f64 {
    if total_swipes == 0 {
        0.0
    } else {
        right_swipes as f64 / total_swipes as f64 * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameStats {
    pub game_id: GameId,
    pub title: String,
    pub reel_count: usize,
    pub total_swipes: usize,
    pub right_swipes: usize,
    pub right_swipe_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyticsTotals {
    pub games: usize,
    pub reel_count: usize,
    pub total_swipes: usize,
    pub right_swipes: usize,
    /// Computed from the summed counts, not averaged over games
    pub right_swipe_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub games: Vec<GameStats>,
    pub totals: AnalyticsTotals,
}

#[derive(Clone)]
pub struct Analytics {
    store: Arc<dyn Store>,
}

impl Analytics {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Stats for every game of the acting developer, newest game first
    pub async fn game_stats(&self, session: &Session) -> Result<AnalyticsReport> {
        session.require_developer()?;
        let start_time = Instant::now();

        let games = self.store.games_by_developer(session.user_id).await?;
        let mut reels_by_game: HashMap<GameId, Vec<ReelId>> = HashMap::with_capacity(games.len());
        for game in &games {
            let reels = self.store.reels_for_game(game.id).await?;
            reels_by_game.insert(game.id, reels.into_iter().map(|r| r.reel.id).collect());
        }

        let all_reels: Vec<ReelId> = reels_by_game.values().flatten().copied().collect();
        let swipes = if all_reels.is_empty() {
            Vec::new()
        } else {
            self.store.swipes_for_reels(&all_reels).await?
        };

        let report = aggregate(&games, &reels_by_game, &swipes);
        info!(
            "Computed analytics for developer {}: {} games, {} swipes in {:.2?}",
            session.user_id,
            report.totals.games,
            report.totals.total_swipes,
            start_time.elapsed()
        );
        Ok(report)
    }
}

fn aggregate(
    games: &[GameProfile],
    reels_by_game: &HashMap<GameId, Vec<ReelId>>,
    swipes: &[Swipe],
) -> AnalyticsReport {
    // (total, right) per reel
    let mut per_reel: HashMap<ReelId, (usize, usize)> = HashMap::new();
    for swipe in swipes {
        let counts = per_reel.entry(swipe.reel_id).or_default();
        counts.0 += 1;
        if swipe.direction == Direction::Right {
            counts.1 += 1;
        }
    }

    let stats: Vec<GameStats> = games
        .par_iter()
        .map(|game| {
            let reels = reels_by_game.get(&game.id).map(Vec::as_slice).unwrap_or_default();
            let (total_swipes, right_swipes) = reels
                .iter()
                .filter_map(|id| per_reel.get(id))
                .fold((0, 0), |(t, r), &(dt, dr)| (t + dt, r + dr));
            GameStats {
                game_id: game.id,
                title: game.title.clone(),
                reel_count: reels.len(),
                total_swipes,
                right_swipes,
                right_swipe_rate: right_swipe_rate(right_swipes, total_swipes),
            }
        })
        .collect();

    let mut totals = AnalyticsTotals { games: stats.len(), ..AnalyticsTotals::default() };
    for game in &stats {
        totals.reel_count += game.reel_count;
        totals.total_swipes += game.total_swipes;
        totals.right_swipes += game.right_swipes;
    }
    totals.right_swipe_rate = right_swipe_rate(totals.right_swipes, totals.total_swipes);

    AnalyticsReport { games: stats, totals }
}
