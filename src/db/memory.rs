use async_trait::async_trait;
use tracing::info;

use super::model::*;
use super::repo::*;

/// Roster and catalog held in memory, either the built-in demo data or
/// the contents of a YAML seed file.
pub struct MemoryRepository {
    seed: Seed,
}

impl MemoryRepository {
    pub fn new(seed: Seed) -> Self {
        Self { seed }
    }

    pub fn from_file(path: &str) -> DbResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DbError::SeedRead(path.to_string(), e))?;

        let seed: Seed = serde_yaml::from_str(&content)
            .map_err(|e| DbError::SeedParse(path.to_string(), e))?;

        info!(
            tracks = seed.tracks.len(),
            users = seed.users.len(),
            "Loaded seed file {}",
            path
        );

        Ok(Self::new(seed))
    }

    pub fn builtin() -> Self {
        Self::new(builtin_seed())
    }
}

#[async_trait]
impl RosterRepo for MemoryRepository {
    async fn fetch_roster(&self) -> DbResult<Vec<User>> {
        Ok(self.seed.users.clone())
    }
}

#[async_trait]
impl CatalogRepo for MemoryRepository {
    async fn fetch_catalog(&self) -> DbResult<Vec<Track>> {
        Ok(self.seed.tracks.clone())
    }
}

impl Repository for MemoryRepository {
    fn kind(&self) -> &'static str {
        "memory"
    }
}

fn track(id: &str, title: &str, artist: &str, genre: &str, duration: i64) -> Track {
    Track {
        id: id.to_string(),
        title: title.to_string(),
        artist: artist.to_string(),
        genre: genre.to_string(),
        duration,
    }
}

fn user(id: &str, name: &str, history: &[&str]) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        history: history.iter().map(|s| s.to_string()).collect(),
    }
}

/// Demo data used when neither a seed file nor a database is configured.
pub fn builtin_seed() -> Seed {
    Seed {
        tracks: vec![
            track("4", "Amazing Grace", "Traditional", "Gospel", 180),
            track("1", "Shape of You", "Ed Sheeran", "Pop", 233),
            track("2", "Bohemian Rhapsody", "Queen", "Rock", 354),
            track("3", "Billie Jean", "Michael Jackson", "Pop", 292),
            track("5", "Despacito", "Luis Fonsi", "Latin", 228),
            track("6", "Hotel California", "Eagles", "Rock", 391),
            track("7", "Uptown Funk", "Mark Ronson ft. Bruno Mars", "Funk", 270),
            track("8", "Rolling in the Deep", "Adele", "Soul", 228),
        ],
        users: vec![
            user("user1", "Tolu", &["1", "3"]),
            user("user2", "James", &["2"]),
            user("user3", "Ben", &["1", "4"]),
            user("user4", "Tom", &["2", "3"]),
            user("user5", "Shola", &["1", "2"]),
            user("user6", "Paul", &["3", "4"]),
            user("user7", "Jacob", &["2", "4"]),
        ],
    }
}
