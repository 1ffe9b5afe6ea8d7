mod seed;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use discovery::{
    Analytics, Catalog, DiscoveryConfig, DiscoveryError, FeedResolver, Library,
    MoodPreferenceManager, ProfileEdit, ProfileManager, Session, SwipeOutcome, SwipeRecorder,
    TagSelector, validate_mood_selection,
};
use rand::seq::IndexedRandom;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use store::{
    Direction, GameId, GameProfileUpdate, LocalMediaStore, MemoryStore, NewGameProfile, NewReel,
    NewUser, ReelId, ReelUpdate, ReelWithContext, Role, Store, TagId, UserId,
};
use tracing::info;

/// ReelSwipe - swipe through indie game reels
#[derive(Parser)]
#[command(name = "reelswipe")]
#[command(about = "Swipe-based discovery of indie game reels", long_about = None)]
struct Cli {
    /// Snapshot file holding the whole store
    #[arg(short, long, default_value = "data/reelswipe.json")]
    data: PathBuf,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Acting user id
    #[arg(short, long, global = true)]
    user: Option<UserId>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a random demo catalog to the snapshot file
    Seed {
        #[arg(long, default_value = "2")]
        developers: usize,

        #[arg(long, default_value = "3")]
        gamers: usize,

        #[arg(long, default_value = "2")]
        games_per_developer: usize,

        #[arg(long, default_value = "4")]
        reels_per_game: usize,

        /// Seed for reproducible catalogs
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Create an account
    Register {
        email: String,

        /// developer or gamer; fixed for the life of the account
        #[arg(long)]
        role: Role,

        /// Display name, required for developers
        #[arg(long)]
        name: Option<String>,
    },

    /// Show your profile, or edit it when any field is given
    Profile {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        studio: Option<String>,

        #[arg(long)]
        bio: Option<String>,
    },

    /// List the mood tags
    Tags,

    /// Show your mood tags
    Moods,

    /// Replace your mood tags
    SetMoods {
        /// Mood tag names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Show your feed
    Feed {
        /// Show why each reel is in the feed
        #[arg(long)]
        explain: bool,
    },

    /// Swipe a reel left or right
    Swipe {
        reel: ReelId,

        /// left or right
        direction: Direction,
    },

    /// Show your saved reels
    Library,

    /// Remove a reel from your library
    Unsave { reel: ReelId },

    /// List your games
    Games,

    /// Create a game profile
    CreateGame {
        #[arg(long)]
        title: String,

        #[arg(long)]
        itch_url: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        thumbnail_url: Option<String>,
    },

    /// Edit a game profile
    UpdateGame {
        game: GameId,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        itch_url: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        thumbnail_url: Option<String>,
    },

    /// Delete a game and all of its reels
    DeleteGame { game: GameId },

    /// Add a reel to a game
    AddReel {
        game: GameId,

        /// Public URL of the video
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        video_url: Option<String>,

        /// Local video file to upload
        #[arg(long)]
        file: Option<PathBuf>,

        #[arg(long)]
        caption: Option<String>,

        /// Mood tag names, up to three
        #[arg(long, num_args = 1..)]
        tags: Vec<String>,
    },

    /// Edit a reel
    UpdateReel {
        reel: ReelId,

        #[arg(long)]
        video_url: Option<String>,

        #[arg(long)]
        caption: Option<String>,

        /// Replace the tag set with these mood tag names
        #[arg(long, num_args = 1..)]
        tags: Option<Vec<String>>,
    },

    /// Delete a reel
    DeleteReel { reel: ReelId },

    /// List the reels of a game
    Reels { game: GameId },

    /// Swipe stats for your games
    Analytics,

    /// Run benchmark to test feed resolution performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,
    },
}

impl Commands {
    fn mutates(&self) -> bool {
        matches!(
            self,
            Commands::Register { .. }
                | Commands::SetMoods { .. }
                | Commands::Swipe { .. }
                | Commands::Unsave { .. }
                | Commands::CreateGame { .. }
                | Commands::UpdateGame { .. }
                | Commands::DeleteGame { .. }
                | Commands::AddReel { .. }
                | Commands::UpdateReel { .. }
                | Commands::DeleteReel { .. }
        ) || matches!(
            self,
            Commands::Profile { name, studio, bio }
                if name.is_some() || studio.is_some() || bio.is_some()
        )
    }
}

/// Everything a command handler needs
struct App {
    store: Arc<MemoryStore>,
    config: DiscoveryConfig,
    user: Option<UserId>,
}

impl App {
    async fn session(&self) -> Result<Session> {
        Ok(Session::resolve(self.store.as_ref(), self.user).await?)
    }

    fn tag_selector(&self) -> TagSelector {
        TagSelector::new(self.store.clone(), self.config.mood_tag_kind.clone())
    }

    fn catalog(&self) -> Catalog {
        let media = Arc::new(LocalMediaStore::new(
            &self.config.media_root,
            self.config.media_base_url.clone(),
        ));
        Catalog::new(self.store.clone(), media, self.config.clone())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        if let Some(err) = err.downcast_ref::<DiscoveryError>() {
            eprintln!("{} {}", "✗".red(), err.user_message().red());
            eprintln!("  ({})", err.category());
        }
        return Err(err);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = DiscoveryConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load config")?;

    if let Commands::Seed { developers, gamers, games_per_developer, reels_per_game, seed } = cli.command {
        let options = seed::SeedOptions { developers, gamers, games_per_developer, reels_per_game, seed };
        return handle_seed(&cli.data, &config, options).await;
    }

    let start = Instant::now();
    let store = Arc::new(
        MemoryStore::load_from_file(&cli.data)
            .with_context(|| format!("Failed to load {} (run `reelswipe seed` first?)", cli.data.display()))?,
    );
    info!("Loaded store in {:?}", start.elapsed());

    let mutates = cli.command.mutates();
    let app = App { store, config, user: cli.user };

    match cli.command {
        // Handled before the store is loaded
        Commands::Seed { .. } => {}
        Commands::Register { email, role, name } => {
            let account = NewUser { email, role, display_name: name };
            handle_register(&app, account).await?
        }
        Commands::Profile { name, studio, bio } => {
            let edit = ProfileEdit { display_name: name, studio_name: studio, bio };
            handle_profile(&app, edit).await?
        }
        Commands::Tags => handle_tags(&app).await?,
        Commands::Moods => handle_moods(&app).await?,
        Commands::SetMoods { names } => handle_set_moods(&app, &names).await?,
        Commands::Feed { explain } => handle_feed(&app, explain).await?,
        Commands::Swipe { reel, direction } => handle_swipe(&app, reel, direction).await?,
        Commands::Library => handle_library(&app).await?,
        Commands::Unsave { reel } => handle_unsave(&app, reel).await?,
        Commands::Games => handle_games(&app).await?,
        Commands::CreateGame { title, itch_url, description, thumbnail_url } => {
            let game = NewGameProfile { title, itch_url, description, thumbnail_url };
            handle_create_game(&app, game).await?
        }
        Commands::UpdateGame { game, title, itch_url, description, thumbnail_url } => {
            let update = GameProfileUpdate { title, itch_url, description, thumbnail_url };
            let session = app.session().await?;
            let updated = app.catalog().update_game(&session, game, update).await?;
            println!("{} Updated {}", "✓".green(), updated.title.bold());
        }
        Commands::DeleteGame { game } => {
            let session = app.session().await?;
            app.catalog().delete_game(&session, game).await?;
            println!("{} Deleted game {}", "✓".green(), game);
        }
        Commands::AddReel { game, video_url, file, caption, tags } => {
            handle_add_reel(&app, game, video_url, file, caption, &tags).await?
        }
        Commands::UpdateReel { reel, video_url, caption, tags } => {
            handle_update_reel(&app, reel, video_url, caption, tags).await?
        }
        Commands::DeleteReel { reel } => {
            let session = app.session().await?;
            app.catalog().delete_reel(&session, reel).await?;
            println!("{} Deleted reel {}", "✓".green(), reel);
        }
        Commands::Reels { game } => handle_reels(&app, game).await?,
        Commands::Analytics => handle_analytics(&app).await?,
        Commands::Benchmark { requests } => handle_benchmark(&app, requests).await?,
    }

    if mutates {
        app.store
            .save_to_file(&cli.data)
            .await
            .with_context(|| format!("Failed to save {}", cli.data.display()))?;
    }
    Ok(())
}

/// Handle the 'seed' command
async fn handle_seed(path: &Path, config: &DiscoveryConfig, options: seed::SeedOptions) -> Result<()> {
    let seeded = seed::build(options);
    let store = Arc::new(seeded.store);

    let tags = store.tags_by_kind(&config.mood_tag_kind).await?;
    let moods = seed::pick_moods(seeded.gamers.len(), &tags, options.seed);
    for (gamer, tag_ids) in seeded.gamers.iter().zip(&moods) {
        store.replace_mood_tags(*gamer, tag_ids).await?;
    }

    store
        .save_to_file(path)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    let counts = store.counts().await;
    println!(
        "{} Seeded {} games with {} reels into {}",
        "✓".green(),
        counts.games,
        counts.reels,
        path.display()
    );
    println!("{}", "Developers:".bold().blue());
    for id in &seeded.developers {
        println!("  {id}");
    }
    println!("{}", "Gamers:".bold().blue());
    for id in &seeded.gamers {
        println!("  {id}");
    }
    Ok(())
}

/// Handle the 'register' command
async fn handle_register(app: &App, account: NewUser) -> Result<()> {
    let user = ProfileManager::new(app.store.clone()).register(account).await?;
    println!("{} Registered {} as a {}", "✓".green(), user.email.bold(), user.role);
    println!("  Your user id: {}", user.id);
    Ok(())
}

/// Handle the 'profile' command
async fn handle_profile(app: &App, edit: ProfileEdit) -> Result<()> {
    let session = app.session().await?;
    let profiles = ProfileManager::new(app.store.clone());

    let user = if edit == ProfileEdit::default() {
        profiles.current(&session).await?
    } else {
        let user = profiles.update(&session, edit).await?;
        println!("{} Profile updated", "✓".green());
        user
    };

    let shown = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".dimmed().to_string());
    println!("{}", user.email.bold().blue());
    println!("  Role:    {}", user.role);
    println!("  Name:    {}", shown(&user.display_name));
    println!("  Studio:  {}", shown(&user.studio_name));
    println!("  Bio:     {}", shown(&user.bio));
    println!("  Joined:  {}", user.created_at.format("%Y-%m-%d"));
    Ok(())
}

/// Handle the 'tags' command
async fn handle_tags(app: &App) -> Result<()> {
    let tags = app.tag_selector().tags().await?;
    println!("{}", format!("Mood tags ({}):", tags.len()).bold().blue());
    for tag in tags {
        println!("{}{}", "• ".green(), tag.name);
    }
    Ok(())
}

/// Handle the 'moods' command
async fn handle_moods(app: &App) -> Result<()> {
    let session = app.session().await?;
    let moods = MoodPreferenceManager::new(app.store.clone()).current(&session).await?;
    if moods.is_empty() {
        println!("No moods selected yet. Try `reelswipe set-moods <names...>`.");
        return Ok(());
    }
    println!("{}", "Your moods:".bold().blue());
    for tag in moods {
        println!("{}{}", "• ".green(), tag.name);
    }
    Ok(())
}

/// Handle the 'set-moods' command
async fn handle_set_moods(app: &App, names: &[String]) -> Result<()> {
    let distinct: HashSet<String> = names.iter().map(|n| n.trim().to_lowercase()).collect();
    if distinct.len() < app.config.min_mood_tags {
        return Err(DiscoveryError::validation(format!(
            "select at least {} moods (got {})",
            app.config.min_mood_tags,
            distinct.len()
        ))
        .into());
    }

    let session = app.session().await?;
    let tag_ids = app.tag_selector().resolve_names(names).await?;
    validate_mood_selection(&tag_ids, app.config.min_mood_tags)?;

    MoodPreferenceManager::new(app.store.clone()).replace(&session, &tag_ids).await?;
    println!("{} Saved {} moods", "✓".green(), tag_ids.len());
    Ok(())
}

/// Handle the 'feed' command
async fn handle_feed(app: &App, explain: bool) -> Result<()> {
    let session = app.session().await?;
    let resolver = FeedResolver::new(app.store.clone());
    let (reels, stats) = resolver.resolve_with_stats(&session).await?;

    if explain {
        println!(
            "{} moods, {} reels already swiped, {} candidates",
            stats.mood_tags, stats.swiped, stats.candidates
        );
    }
    if stats.mood_tags == 0 {
        println!("Pick some moods first: `reelswipe set-moods <names...>`.");
        return Ok(());
    }
    if reels.is_empty() {
        println!("You're all caught up. Check back later for new reels.");
        return Ok(());
    }

    let moods: HashSet<TagId> = if explain {
        app.store.mood_tag_ids(session.user_id).await?.into_iter().collect()
    } else {
        HashSet::new()
    };

    println!("{}", format!("Your feed ({} reels):", reels.len()).bold().blue());
    for (i, reel) in reels.iter().enumerate() {
        print_reel(i + 1, reel);
        if explain {
            let matched: Vec<&str> = reel
                .tags
                .iter()
                .filter(|t| moods.contains(&t.id))
                .map(|t| t.name.as_str())
                .collect();
            println!("   Matches your moods: {}", matched.join(", "));
        }
    }
    Ok(())
}

/// Handle the 'swipe' command
async fn handle_swipe(app: &App, reel: ReelId, direction: Direction) -> Result<()> {
    let session = app.session().await?;
    let outcome = SwipeRecorder::new(app.store.clone())
        .record(&session, reel, direction)
        .await?;

    match (outcome, direction) {
        (SwipeOutcome::AlreadyRecorded, _) => println!("You already swiped this reel."),
        (SwipeOutcome::Recorded(_), Direction::Right) => {
            println!("{} Saved to your library", "♥".red())
        }
        (SwipeOutcome::Recorded(_), Direction::Left) => println!("{} Skipped", "✓".green()),
    }
    Ok(())
}

/// Handle the 'library' command
async fn handle_library(app: &App) -> Result<()> {
    let session = app.session().await?;
    let saved = Library::new(app.store.clone()).list(&session).await?;
    if saved.is_empty() {
        println!("Your library is empty. Swipe right on reels you like.");
        return Ok(());
    }
    println!("{}", format!("Your library ({} reels):", saved.len()).bold().blue());
    for (i, entry) in saved.iter().enumerate() {
        print_reel(i + 1, &entry.reel);
        println!("   Saved {}", entry.saved_at.format("%Y-%m-%d %H:%M"));
    }
    Ok(())
}

/// Handle the 'unsave' command
async fn handle_unsave(app: &App, reel: ReelId) -> Result<()> {
    let session = app.session().await?;
    if Library::new(app.store.clone()).remove(&session, reel).await? {
        println!("{} Removed from your library", "✓".green());
    } else {
        println!("That reel is not in your library.");
    }
    Ok(())
}

/// Handle the 'games' command
async fn handle_games(app: &App) -> Result<()> {
    let session = app.session().await?;
    let games = app.catalog().list_games(&session).await?;
    println!("{}", format!("Your games ({}):", games.len()).bold().blue());
    for game in games {
        println!("{} {} {}", "•".green(), game.title.bold(), game.itch_url);
        println!("   id {}", game.id);
        if let Some(description) = &game.description {
            println!("   {description}");
        }
    }
    Ok(())
}

/// Handle the 'create-game' command
async fn handle_create_game(app: &App, game: NewGameProfile) -> Result<()> {
    let session = app.session().await?;
    let game = app.catalog().create_game(&session, game).await?;
    println!("{} Created {} ({})", "✓".green(), game.title.bold(), game.id);
    Ok(())
}

/// Handle the 'add-reel' command
async fn handle_add_reel(
    app: &App,
    game: GameId,
    video_url: Option<String>,
    file: Option<PathBuf>,
    caption: Option<String>,
    tags: &[String],
) -> Result<()> {
    let session = app.session().await?;
    let catalog = app.catalog();

    let video_url = match (video_url, file) {
        (Some(url), _) => url,
        (None, Some(path)) => {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("video");
            catalog.upload_video(&session, file_name, &bytes).await?
        }
        (None, None) => bail!("either --video-url or --file is required"),
    };
    let tag_ids = app.tag_selector().resolve_names(tags).await?;

    let reel = catalog
        .create_reel(&session, game, NewReel { video_url, caption, tag_ids })
        .await?;
    println!(
        "{} Added reel {} at position {}",
        "✓".green(),
        reel.id,
        reel.order_index
    );
    Ok(())
}

/// Handle the 'update-reel' command
async fn handle_update_reel(
    app: &App,
    reel: ReelId,
    video_url: Option<String>,
    caption: Option<String>,
    tags: Option<Vec<String>>,
) -> Result<()> {
    let session = app.session().await?;
    let tag_ids = match tags {
        Some(names) => Some(app.tag_selector().resolve_names(&names).await?),
        None => None,
    };
    let update = ReelUpdate { video_url, caption, tag_ids };
    let reel = app.catalog().update_reel(&session, reel, update).await?;
    println!("{} Updated reel {}", "✓".green(), reel.id);
    Ok(())
}

/// Handle the 'reels' command
async fn handle_reels(app: &App, game: GameId) -> Result<()> {
    let reels = app.catalog().list_reels(game).await?;
    println!("{}", format!("Reels ({}):", reels.len()).bold().blue());
    for entry in reels {
        let tags: Vec<&str> = entry.tags.iter().map(|t| t.name.as_str()).collect();
        println!(
            "{}. {} [{}]",
            (entry.reel.order_index + 1).to_string().green(),
            entry.reel.caption.as_deref().unwrap_or("(no caption)"),
            tags.join(", ")
        );
        println!("   id {}  {}", entry.reel.id, entry.reel.video_url);
    }
    Ok(())
}

/// Handle the 'analytics' command
async fn handle_analytics(app: &App) -> Result<()> {
    let session = app.session().await?;
    let report = Analytics::new(app.store.clone()).game_stats(&session).await?;

    println!("{}", "Game analytics:".bold().blue());
    for game in &report.games {
        println!("{} {}", "•".green(), game.title.bold());
        println!(
            "   {} reels, {} swipes, {} right ({:.1}%)",
            game.reel_count, game.total_swipes, game.right_swipes, game.right_swipe_rate
        );
    }
    let totals = &report.totals;
    println!(
        "{} {} games, {} reels, {} swipes, {} right ({:.1}%)",
        "Total:".bold(),
        totals.games,
        totals.reel_count,
        totals.total_swipes,
        totals.right_swipes,
        totals.right_swipe_rate
    );
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(app: &App, requests: usize) -> Result<()> {
    let gamers: Vec<UserId> = app
        .store
        .snapshot()
        .await
        .users
        .into_iter()
        .filter(|u| u.role == Role::Gamer)
        .map(|u| u.id)
        .collect();
    if gamers.is_empty() || requests == 0 {
        bail!("benchmark needs at least one gamer and one request");
    }

    let resolver = FeedResolver::new(app.store.clone());
    let sessions: Vec<Session> = {
        let mut rng = rand::rng();
        (0..requests)
            .filter_map(|_| gamers.choose(&mut rng))
            .map(|&id| Session::new(id, Role::Gamer))
            .collect()
    };

    // Use tokio::spawn to make concurrent requests
    let wall = Instant::now();
    let mut handles = Vec::with_capacity(sessions.len());
    for session in sessions {
        let resolver = resolver.clone();
        handles.push(tokio::spawn(async move {
            let start = Instant::now();
            resolver.resolve(&session).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        }));
    }
    let mut timings = Vec::with_capacity(handles.len());
    for handle in handles {
        timings.push(handle.await??);
    }
    let wall = wall.elapsed();

    timings.sort();
    let total: Duration = timings.iter().sum();
    let avg = total / timings.len() as u32;
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {}", timings.len());
    println!("Wall time: {:?}", wall);
    println!("Average latency: {:?}", avg);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!(
        "Throughput: {:.2} requests/second",
        timings.len() as f64 / wall.as_secs_f64()
    );
    Ok(())
}

fn print_reel(rank: usize, reel: &ReelWithContext) {
    let tags: Vec<&str> = reel.tags.iter().map(|t| t.name.as_str()).collect();
    println!(
        "{}. {} [{}]",
        rank.to_string().green(),
        reel.game.title.bold(),
        tags.join(", ")
    );
    if let Some(caption) = &reel.reel.caption {
        println!("   {caption}");
    }
    println!("   {}  {}", reel.reel.video_url, reel.game.itch_url.dimmed());
    println!("   id {}", reel.reel.id);
}
