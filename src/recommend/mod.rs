//! User-based collaborative filtering over play counts.
//!
//! The matrix is built once from the roster and never changes afterwards;
//! every query is a pure function of it.

pub mod matrix;
pub mod recommender;
pub mod similarity;
pub mod topk;

pub use matrix::{build_matrix, InteractionMatrix, ItemVector};
pub use recommender::{
    candidate_scores, recommend, recommend_scored_with, recommend_with, similar_users,
    RecommendError, RecommendOptions, RecommendResult, Recommender, UnknownUserPolicy,
};
pub use similarity::{cosine_similarity, legacy_cosine_similarity, SimilarityMetric};
pub use topk::Scored;
