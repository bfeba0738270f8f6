use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::db::{Track, User};

/// Tracks and users as loaded at startup, indexed for lookups by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
    track_index: HashMap<String, usize>,
    users: Vec<User>,
}

impl Catalog {
    /// Later duplicates of a track or user id replace earlier ones, matching
    /// how the interaction matrix treats the roster.
    pub fn new(tracks: Vec<Track>, roster: Vec<User>) -> Self {
        let mut catalog = Self::default();

        for track in tracks {
            match catalog.track_index.get(&track.id) {
                Some(&pos) => {
                    warn!("Duplicate track id {} in catalog, keeping the last one", track.id);
                    catalog.tracks[pos] = track;
                }
                None => {
                    catalog.track_index.insert(track.id.clone(), catalog.tracks.len());
                    catalog.tracks.push(track);
                }
            }
        }

        let mut users: HashMap<String, User> = HashMap::new();
        for user in roster {
            let unknown = user
                .history
                .iter()
                .filter(|id| !catalog.track_index.contains_key(id.as_str()))
                .collect::<HashSet<_>>();
            if !unknown.is_empty() {
                warn!(
                    "User {} played {} track(s) missing from the catalog",
                    user.id,
                    unknown.len()
                );
            }
            if let Some(previous) = users.insert(user.id.clone(), user) {
                warn!("Duplicate user id {} in roster, keeping the last one", previous.id);
            }
        }
        catalog.users = users.into_values().collect();
        catalog.users.sort_by(|a, b| a.id.cmp(&b.id));

        catalog
    }

    pub fn track(&self, id: &str) -> Option<&Track> {
        self.track_index.get(id).map(|&pos| &self.tracks[pos])
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Users sorted by id.
    pub fn users(&self) -> &[User] {
        &self.users
    }
}
