//! Example: Generate feed candidates for a gamer
//!
//! Run with: cargo run --package sources --example generate_candidates -- <snapshot.json> <user-id>
//!
//! This example shows how to:
//! 1. Load a store snapshot
//! 2. Build the feed context (moods and swiped reels)
//! 3. Generate mood tag candidates
//! 4. Display the results

use anyhow::{Context, bail};
use sources::{feed_context::build_feed_context, MoodTagSource};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use store::{MemoryStore, Store, UserId};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    println!("=== ReelSwipe Candidate Generation Example ===\n");

    let mut args = std::env::args().skip(1);
    let (Some(path), Some(user)) = (args.next(), args.next()) else {
        bail!("usage: generate_candidates <snapshot.json> <user-id>");
    };
    let path = PathBuf::from(path);
    let user_id: UserId = user.parse().context("user id must be a UUID")?;

    println!("Loading snapshot {}...", path.display());
    let start = Instant::now();
    let store = Arc::new(MemoryStore::load_from_file(&path)?);
    println!("Loaded snapshot in {:?}\n", start.elapsed());

    println!("Building feed context...");
    let start = Instant::now();
    let context = build_feed_context(store.as_ref(), user_id).await?;
    println!("Built context in {:?}", start.elapsed());
    println!("  Mood tags: {}", context.mood_tags.len());
    println!("  Swiped reels: {}\n", context.swiped_reels.len());

    println!("Generating mood tag candidates...");
    let source = MoodTagSource::new(store.clone());
    let start = Instant::now();
    let candidates = source.get_candidates(&context).await?;
    println!("Generated {} candidates in {:?}\n", candidates.len(), start.elapsed());

    let unswiped: Vec<_> = candidates
        .iter()
        .map(|c| c.reel_id)
        .filter(|id| !context.swiped_reels.contains(id))
        .collect();
    let reels = store.reels_with_context(&unswiped).await?;

    println!("Top unswiped reels:");
    for (i, reel) in reels.iter().take(10).enumerate() {
        let tags: Vec<&str> = reel.tags.iter().map(|t| t.name.as_str()).collect();
        println!("  {}. {} [{}]", i + 1, reel.game.title, tags.join(", "));
    }
    Ok(())
}
