use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{info, warn};

use super::model::*;
use super::repo::*;

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(db_path: &str) -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str(db_path)?.create_if_missing(true);

        // Every connection to ":memory:" opens a fresh database.
        let in_memory = db_path.contains(":memory:");
        let mut pool_options = SqlitePoolOptions::new().max_connections(if in_memory { 1 } else { 5 });
        if in_memory {
            pool_options = pool_options
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        }

        let pool = pool_options.connect_with(options).await?;

        let repo = Self { pool };
        repo.init_schema().await?;

        info!("Database initialized at {}", db_path);

        Ok(repo)
    }

    async fn init_schema(&self) -> DbResult<()> {
        let schema = include_str!("schema.sql");
        sqlx::query(schema).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl RosterRepo for SqliteRepository {
    async fn fetch_roster(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, (String, String)>("SELECT id, name FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT userid, trackid FROM history ORDER BY userid, position",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut histories: HashMap<String, Vec<String>> = HashMap::new();
        for (userid, trackid) in rows {
            histories.entry(userid).or_default().push(trackid);
        }

        let roster: Vec<User> = users
            .into_iter()
            .map(|(id, name)| {
                let history = histories.remove(&id).unwrap_or_default();
                User { id, name, history }
            })
            .collect();

        if !histories.is_empty() {
            warn!(
                "Ignoring history rows for {} user(s) missing from the users table",
                histories.len()
            );
        }

        Ok(roster)
    }
}

#[async_trait]
impl CatalogRepo for SqliteRepository {
    async fn fetch_catalog(&self) -> DbResult<Vec<Track>> {
        let tracks = sqlx::query_as::<_, Track>(
            "SELECT id, title, artist, genre, duration FROM tracks ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(tracks)
    }
}

impl Repository for SqliteRepository {
    fn kind(&self) -> &'static str {
        "sqlite"
    }
}
