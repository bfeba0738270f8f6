use std::collections::{BTreeMap, HashMap, HashSet};

use crate::db::User;

/// Sparse play counts of one user, keyed by track id. Absent keys count as zero.
pub type ItemVector = HashMap<String, u32>;

/// Play counts for every user in the roster.
///
/// Users are kept in id order so that everything derived from the matrix
/// (sums of similarities in particular) comes out the same on every run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionMatrix {
    rows: BTreeMap<String, ItemVector>,
}

impl InteractionMatrix {
    /// Count every play in every user's history. Users with an empty history
    /// still get a row. A user id listed twice keeps the last entry.
    pub fn build(roster: &[User]) -> Self {
        let mut rows = BTreeMap::new();

        for user in roster {
            let mut counts = ItemVector::with_capacity(user.history.len());
            for track_id in &user.history {
                *counts.entry(track_id.clone()).or_insert(0) += 1;
            }
            rows.insert(user.id.clone(), counts);
        }

        Self { rows }
    }

    pub fn vector(&self, user_id: &str) -> Option<&ItemVector> {
        self.rows.get(user_id)
    }

    /// All rows in ascending user id order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &ItemVector)> {
        self.rows.iter().map(|(id, v)| (id.as_str(), v))
    }

    pub fn user_ids(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(|id| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of distinct tracks anyone has played.
    pub fn item_count(&self) -> usize {
        self.rows
            .values()
            .flat_map(|v| v.keys())
            .collect::<HashSet<_>>()
            .len()
    }
}

pub fn build_matrix(roster: &[User]) -> InteractionMatrix {
    InteractionMatrix::build(roster)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, history: &[&str]) -> User {
        User {
            id: id.to_string(),
            name: String::new(),
            history: history.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_counts_repeated_plays() {
        let matrix = build_matrix(&[user("u1", &["1", "2", "1", "1"])]);
        let v = matrix.vector("u1").unwrap();

        assert_eq!(v.len(), 2);
        assert_eq!(v["1"], 3);
        assert_eq!(v["2"], 1);
        assert_eq!(v.get("3"), None);
    }

    #[test]
    fn test_empty_history_gets_a_row() {
        let matrix = build_matrix(&[user("u1", &[]), user("u2", &["5"])]);

        assert_eq!(matrix.len(), 2);
        assert!(matrix.vector("u1").unwrap().is_empty());
        assert!(matrix.vector("u3").is_none());
    }

    #[test]
    fn test_duplicate_user_keeps_last() {
        let matrix = build_matrix(&[user("u1", &["1"]), user("u1", &["2", "2"])]);

        assert_eq!(matrix.len(), 1);
        let v = matrix.vector("u1").unwrap();
        assert_eq!(v.get("1"), None);
        assert_eq!(v["2"], 2);
    }

    #[test]
    fn test_rows_are_ordered() {
        let matrix = build_matrix(&[user("c", &["1"]), user("a", &["2"]), user("b", &["1"])]);

        let ids: Vec<&str> = matrix.user_ids().collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(matrix.item_count(), 2);
    }

    #[test]
    fn test_empty_roster() {
        let matrix = build_matrix(&[]);
        assert!(matrix.is_empty());
        assert_eq!(matrix.item_count(), 0);
    }
}
