use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::matrix::{InteractionMatrix, ItemVector};
use super::similarity::SimilarityMetric;
use super::topk::{Scored, TopK};

/// What to do when asked about a user who is not in the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownUserPolicy {
    /// Fail with [`RecommendError::UnknownUser`].
    #[default]
    NotFound,
    /// Treat the user as having played nothing. Every track any other user
    /// played becomes a candidate.
    EmptyHistory,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RecommendOptions {
    pub metric: SimilarityMetric,
    pub unknown_user: UnknownUserPolicy,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecommendError {
    #[error("Unknown user: {0}")]
    UnknownUser(String),
}

pub type RecommendResult<T> = Result<T, RecommendError>;

/// Immutable matrix plus the options used to query it. Safe to share
/// between request handlers behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Recommender {
    matrix: InteractionMatrix,
    options: RecommendOptions,
}

impl Recommender {
    pub fn new(matrix: InteractionMatrix, options: RecommendOptions) -> Self {
        Self { matrix, options }
    }

    pub fn matrix(&self) -> &InteractionMatrix {
        &self.matrix
    }

    pub fn options(&self) -> RecommendOptions {
        self.options
    }

    pub fn recommend(&self, user_id: &str, count: i64) -> RecommendResult<Vec<String>> {
        recommend_with(user_id, count, &self.matrix, &self.options)
    }

    pub fn recommend_scored(&self, user_id: &str, count: i64) -> RecommendResult<Vec<Scored>> {
        recommend_scored_with(user_id, count, &self.matrix, &self.options)
    }

    pub fn similar_users(&self, user_id: &str, count: i64) -> RecommendResult<Vec<Scored>> {
        similar_users(user_id, count, &self.matrix, &self.options)
    }
}

/// Top `count` tracks for `user_id` with the default options: true cosine
/// similarity, unknown users rejected.
pub fn recommend(
    user_id: &str,
    count: i64,
    matrix: &InteractionMatrix,
) -> RecommendResult<Vec<String>> {
    recommend_with(user_id, count, matrix, &RecommendOptions::default())
}

pub fn recommend_with(
    user_id: &str,
    count: i64,
    matrix: &InteractionMatrix,
    options: &RecommendOptions,
) -> RecommendResult<Vec<String>> {
    let ranked = recommend_scored_with(user_id, count, matrix, options)?;
    Ok(ranked.into_iter().map(|s| s.id).collect())
}

/// Ranked candidates, highest score first, ties by ascending track id.
/// Returns at most `count` entries and none when `count <= 0`.
pub fn recommend_scored_with(
    user_id: &str,
    count: i64,
    matrix: &InteractionMatrix,
    options: &RecommendOptions,
) -> RecommendResult<Vec<Scored>> {
    let scores = candidate_scores(user_id, matrix, options)?;
    let ranked = top(scores, count);

    debug!(
        user = user_id,
        requested = count,
        returned = ranked.len(),
        "Computed recommendations"
    );

    Ok(ranked)
}

/// Sum, per track the user has not played, the similarity of every other
/// user who played it.
pub fn candidate_scores(
    user_id: &str,
    matrix: &InteractionMatrix,
    options: &RecommendOptions,
) -> RecommendResult<HashMap<String, f64>> {
    let empty = ItemVector::new();
    let target = target_vector(user_id, matrix, options.unknown_user, &empty)?;

    let mut scores: HashMap<String, f64> = HashMap::new();

    for (other_id, other) in matrix.rows() {
        if other_id == user_id {
            continue;
        }
        let similarity = options.metric.score(target, other);
        for track_id in other.keys() {
            if target.get(track_id).copied().unwrap_or(0) == 0 {
                *scores.entry(track_id.clone()).or_insert(0.0) += similarity;
            }
        }
    }

    Ok(scores)
}

/// The `count` other users most similar to `user_id`. Users with zero
/// similarity are left out.
pub fn similar_users(
    user_id: &str,
    count: i64,
    matrix: &InteractionMatrix,
    options: &RecommendOptions,
) -> RecommendResult<Vec<Scored>> {
    let empty = ItemVector::new();
    let target = target_vector(user_id, matrix, options.unknown_user, &empty)?;

    let scores = matrix
        .rows()
        .filter(|(other_id, _)| *other_id != user_id)
        .map(|(other_id, other)| (other_id.to_string(), options.metric.score(target, other)))
        .filter(|(_, similarity)| *similarity > 0.0);

    Ok(top(scores, count))
}

fn target_vector<'a>(
    user_id: &str,
    matrix: &'a InteractionMatrix,
    policy: UnknownUserPolicy,
    empty: &'a ItemVector,
) -> RecommendResult<&'a ItemVector> {
    match matrix.vector(user_id) {
        Some(v) => Ok(v),
        None => match policy {
            UnknownUserPolicy::NotFound => Err(RecommendError::UnknownUser(user_id.to_string())),
            UnknownUserPolicy::EmptyHistory => {
                debug!(user = user_id, "Unknown user, treating history as empty");
                Ok(empty)
            }
        },
    }
}

fn top<I>(scores: I, count: i64) -> Vec<Scored>
where
    I: IntoIterator<Item = (String, f64)>,
{
    if count <= 0 {
        return Vec::new();
    }
    let k = usize::try_from(count).unwrap_or(usize::MAX);

    let scores = scores.into_iter();
    let mut topk = TopK::new(k, scores.size_hint().0);
    for (id, score) in scores {
        topk.offer(Scored::new(id, score));
    }
    topk.into_sorted_vec()
}
