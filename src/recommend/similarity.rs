use serde::{Deserialize, Serialize};

use super::matrix::ItemVector;

/// How two users' play counts are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMetric {
    /// Cosine similarity over the union of both vectors' tracks. Symmetric.
    #[default]
    Cosine,
    /// Walks only the first vector's tracks, so the second vector's magnitude
    /// ignores tracks the first user never played. Not symmetric; kept for
    /// output compatibility with older deployments.
    Legacy,
}

impl SimilarityMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityMetric::Cosine => "cosine",
            SimilarityMetric::Legacy => "legacy",
        }
    }

    pub fn score(&self, a: &ItemVector, b: &ItemVector) -> f64 {
        match self {
            SimilarityMetric::Cosine => cosine_similarity(a, b),
            SimilarityMetric::Legacy => legacy_cosine_similarity(a, b),
        }
    }
}

fn sum_of_squares(v: &ItemVector) -> u64 {
    v.values().map(|&c| (c as u64) * (c as u64)).sum()
}

fn normalize(dot: u64, sum_sq_a: u64, sum_sq_b: u64) -> f64 {
    if sum_sq_a == 0 || sum_sq_b == 0 {
        return 0.0;
    }
    let similarity = dot as f64 / ((sum_sq_a as f64).sqrt() * (sum_sq_b as f64).sqrt());
    similarity.min(1.0)
}

/// Cosine similarity of two sparse play-count vectors, in `[0, 1]`.
/// Returns 0 when either vector has no plays.
pub fn cosine_similarity(a: &ItemVector, b: &ItemVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    let dot: u64 = small
        .iter()
        .filter_map(|(track, &count)| large.get(track).map(|&other| (count as u64) * (other as u64)))
        .sum();

    normalize(dot, sum_of_squares(a), sum_of_squares(b))
}

pub fn legacy_cosine_similarity(a: &ItemVector, b: &ItemVector) -> f64 {
    let mut dot = 0u64;
    let mut sum_sq_a = 0u64;
    let mut sum_sq_b = 0u64;

    for (track, &count) in a {
        let count = count as u64;
        let other = b.get(track).copied().unwrap_or(0) as u64;
        dot += count * other;
        sum_sq_a += count * count;
        sum_sq_b += other * other;
    }

    normalize(dot, sum_sq_a, sum_sq_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(entries: &[(&str, u32)]) -> ItemVector {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_self_similarity_is_one() {
        for v in [
            vector(&[("1", 1)]),
            vector(&[("1", 1), ("3", 1)]),
            vector(&[("1", 3), ("2", 7), ("9", 2)]),
        ] {
            assert_close(cosine_similarity(&v, &v), 1.0);
            assert_close(legacy_cosine_similarity(&v, &v), 1.0);
        }
    }

    #[test]
    fn test_empty_vector_scores_zero() {
        let empty = ItemVector::new();
        let zeros = vector(&[("1", 0), ("2", 0)]);
        let v = vector(&[("1", 2)]);

        assert_eq!(cosine_similarity(&empty, &v), 0.0);
        assert_eq!(cosine_similarity(&v, &empty), 0.0);
        assert_eq!(cosine_similarity(&empty, &empty), 0.0);
        assert_eq!(cosine_similarity(&zeros, &v), 0.0);
        assert_eq!(legacy_cosine_similarity(&empty, &v), 0.0);
        assert_eq!(legacy_cosine_similarity(&zeros, &v), 0.0);
    }

    #[test]
    fn test_disjoint_vectors_score_zero() {
        let a = vector(&[("1", 1), ("2", 1)]);
        let b = vector(&[("3", 4)]);
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        let a = vector(&[("1", 1), ("3", 1)]);
        let b = vector(&[("1", 1), ("4", 1)]);
        assert_close(cosine_similarity(&a, &b), 0.5);

        let c = vector(&[("1", 2), ("2", 1)]);
        let d = vector(&[("1", 1), ("2", 2), ("3", 2)]);
        // (2 + 2) / (sqrt(5) * 3)
        assert_close(cosine_similarity(&c, &d), 4.0 / (5f64.sqrt() * 3.0));
    }

    #[test]
    fn test_cosine_is_symmetric() {
        let pairs = [
            (vector(&[("1", 1), ("3", 1)]), vector(&[("1", 1), ("4", 1)])),
            (vector(&[("1", 5)]), vector(&[("1", 1), ("2", 9), ("3", 1)])),
            (vector(&[("a", 2), ("b", 3)]), vector(&[("b", 1)])),
            (ItemVector::new(), vector(&[("x", 1)])),
        ];
        for (a, b) in &pairs {
            assert_eq!(cosine_similarity(a, b), cosine_similarity(b, a));
        }
    }

    #[test]
    fn test_legacy_is_not_symmetric() {
        // B's extra track is invisible when walking A's keys.
        let a = vector(&[("1", 1)]);
        let b = vector(&[("1", 1), ("2", 1)]);

        assert_close(legacy_cosine_similarity(&a, &b), 1.0);
        assert_close(legacy_cosine_similarity(&b, &a), 1.0 / 2f64.sqrt());
        assert_close(cosine_similarity(&a, &b), 1.0 / 2f64.sqrt());
    }

    #[test]
    fn test_result_is_bounded() {
        let a = vector(&[("1", 1000), ("2", 1)]);
        let b = vector(&[("1", 999), ("2", 2), ("3", 5)]);
        let s = cosine_similarity(&a, &b);
        assert!((0.0..=1.0).contains(&s));
    }

    #[test]
    fn test_metric_names() {
        assert_eq!(SimilarityMetric::Cosine.as_str(), "cosine");
        assert_eq!(SimilarityMetric::Legacy.as_str(), "legacy");
        let parsed: SimilarityMetric = serde_yaml::from_str("legacy").unwrap();
        assert_eq!(parsed, SimilarityMetric::Legacy);
    }
}
