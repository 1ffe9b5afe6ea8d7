//! Random demo catalog for trying the CLI.

use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use store::{GameProfile, MemoryStore, Reel, Role, Tag, TagId, User, UserId, VIBE_TAG_KIND};
use uuid::Uuid;

const MOODS: &[&str] = &[
    "Chaotic", "Chill", "Cozy", "Dreamy", "Funny", "Intense", "Mysterious", "Retro", "Spooky",
    "Wholesome",
];

const TITLE_WORDS: &[&str] = &[
    "Lantern", "Moss", "Tide", "Ember", "Pixel", "Hollow", "Comet", "Fable", "Drift", "Bramble",
    "Echo", "Velvet",
];

const CAPTIONS: &[&str] = &[
    "First five minutes, no cuts",
    "Boss fight preview",
    "Crafting loop in 30 seconds",
    "Our favorite bug, now a feature",
    "Night level teaser",
];

#[derive(Debug, Clone, Copy)]
pub struct SeedOptions {
    pub developers: usize,
    pub gamers: usize,
    pub games_per_developer: usize,
    pub reels_per_game: usize,
    pub seed: Option<u64>,
}

pub struct Seeded {
    pub store: MemoryStore,
    pub developers: Vec<UserId>,
    pub gamers: Vec<UserId>,
}

pub fn build(options: SeedOptions) -> Seeded {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut store = MemoryStore::new();
    let now = Utc::now();

    let tags: Vec<TagId> = MOODS
        .iter()
        .map(|name| {
            let id = Uuid::now_v7();
            store.insert_tag(Tag { id, name: name.to_string(), kind: VIBE_TAG_KIND.to_string() });
            id
        })
        .collect();

    let add_user = |store: &mut MemoryStore, role: Role, n: usize| {
        let id = Uuid::now_v7();
        store.insert_user(User {
            id,
            email: format!("{role}{n}@reelswipe.local"),
            role,
            display_name: Some(format!("{role} {n}")),
            studio_name: (role == Role::Developer).then(|| format!("Studio {n}")),
            bio: None,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        });
        id
    };
    let developers: Vec<UserId> = (1..=options.developers)
        .map(|n| add_user(&mut store, Role::Developer, n))
        .collect();
    let gamers: Vec<UserId> = (1..=options.gamers)
        .map(|n| add_user(&mut store, Role::Gamer, n))
        .collect();

    for &developer in &developers {
        for _ in 0..options.games_per_developer {
            let title = TITLE_WORDS
                .choose_multiple(&mut rng, 2)
                .copied()
                .collect::<Vec<_>>()
                .join(" ");
            let slug = title.to_lowercase().replace(' ', "-");
            let created_at = now - Duration::days(rng.random_range(1..60));
            let game = GameProfile {
                id: Uuid::now_v7(),
                developer_id: developer,
                title,
                itch_url: format!("https://indie.itch.io/{slug}"),
                description: None,
                thumbnail_url: None,
                created_at,
                updated_at: created_at,
            };
            let game_id = game.id;
            store.insert_game(game);

            for order_index in 0..options.reels_per_game {
                let reel_id = Uuid::now_v7();
                let created_at = now - Duration::minutes(rng.random_range(1..60 * 24 * 30));
                let tag_count = rng.random_range(1..=3);
                let reel_tags: Vec<TagId> = tags.choose_multiple(&mut rng, tag_count).copied().collect();
                store.insert_reel(
                    Reel {
                        id: reel_id,
                        game_id,
                        video_url: format!("https://cdn.reelswipe.local/{reel_id}.mp4"),
                        caption: CAPTIONS.choose(&mut rng).map(|c| c.to_string()),
                        order_index: order_index as u32,
                        created_at,
                        updated_at: created_at,
                    },
                    &reel_tags,
                );
            }
        }
    }

    Seeded { store, developers, gamers }
}

/// Three random moods per gamer
pub fn pick_moods(count: usize, tags: &[Tag], seed: Option<u64>) -> Vec<Vec<TagId>> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_os_rng(),
    };
    (0..count)
        .map(|_| tags.choose_multiple(&mut rng, 3).map(|t| t.id).collect())
        .collect()
}
