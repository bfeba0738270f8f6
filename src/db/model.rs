use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub genre: String,
    /// Length in seconds.
    pub duration: i64,
}

/// A listener and the tracks they played, in order. A track that appears
/// more than once counts once per play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub history: Vec<String>,
}

/// Contents of a seed file: the catalog and the roster.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub users: Vec<User>,
}

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Failed to read seed file {0}: {1}")]
    SeedRead(String, std::io::Error),
    #[error("Failed to parse seed file {0}: {1}")]
    SeedParse(String, serde_yaml::Error),
}

pub type DbResult<T> = Result<T, DbError>;
