//! Vector similarity metrics, selected once at configuration time.

use std::str::FromStr;

/// Blend weights for the combined metric: geometry (euclidean) slightly
/// over direction (cosine).
const COSINE_WEIGHT: f32 = 0.4;
const EUCLIDEAN_WEIGHT: f32 = 0.6;

/// Raw cosine above this gets compressed toward the ceiling.
const COSINE_COMPRESS_FROM: f32 = 0.9;
const COSINE_COMPRESS_BASE: f32 = 0.85;
const COSINE_COMPRESS_RATE: f32 = 0.5;

/// How two facet vectors are compared. Callers guarantee neither side is
/// the zero-vector sentinel; that case is handled upstream as "no data".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimilarityMetric {
    Cosine,
    Euclidean,
    #[default]
    Combined,
}

impl SimilarityMetric {
    /// Similarity in [0, 1].
    pub fn compare(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            SimilarityMetric::Cosine => cosine(a, b).clamp(0.0, 1.0),
            SimilarityMetric::Euclidean => normalized_euclidean(a, b),
            SimilarityMetric::Combined => {
                // Raw cosine is negative for opposed vectors; the blend must
                // stay non-negative or it would collide with the downstream
                // "not comparable" sentinel.
                (COSINE_WEIGHT * adjusted_cosine(a, b)
                    + EUCLIDEAN_WEIGHT * normalized_euclidean(a, b))
                .clamp(0.0, 1.0)
            }
        }
    }
}

impl FromStr for SimilarityMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cosine" => Ok(SimilarityMetric::Cosine),
            "euclidean" => Ok(SimilarityMetric::Euclidean),
            "combined" => Ok(SimilarityMetric::Combined),
            other => Err(format!("unknown similarity metric '{other}'")),
        }
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let (na, nb) = (norm(a), norm(b));
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot(a, b) / (na * nb)
}

/// Cosine with the top of the range compressed: encoders hand out raw
/// cosines above 0.9 too freely, so scores there map to
/// `0.85 + (c - 0.9) * 0.5`, a ceiling near 0.9.
fn adjusted_cosine(a: &[f32], b: &[f32]) -> f32 {
    let c = cosine(a, b);
    if c > COSINE_COMPRESS_FROM {
        COSINE_COMPRESS_BASE + (c - COSINE_COMPRESS_FROM) * COSINE_COMPRESS_RATE
    } else {
        c
    }
}

/// `1 - ||a/|a| - b/|b||| / 2` on unit-normalized vectors; the maximum
/// distance between unit vectors is 2, so this lands in [0, 1].
fn normalized_euclidean(a: &[f32], b: &[f32]) -> f32 {
    let (na, nb) = (norm(a), norm(b));
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    let dist_sq: f32 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x / na - y / nb;
            d * d
        })
        .sum();
    (1.0 - dist_sq.sqrt() / 2.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_are_near_ceiling_not_one() {
        let v = vec![0.3, 0.4, 0.5];
        let sim = SimilarityMetric::Combined.compare(&v, &v);
        // adjusted cosine caps at 0.9, euclidean hits 1.0:
        // 0.4 * 0.9 + 0.6 * 1.0 = 0.96
        assert!((sim - 0.96).abs() < 1e-5);
    }

    #[test]
    fn orthogonal_vectors_score_low() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        let sim = SimilarityMetric::Combined.compare(&a, &b);
        // cosine 0, unit distance sqrt(2): euclidean 1 - sqrt(2)/2 ≈ 0.293
        assert!((sim - 0.6 * 0.2928932).abs() < 1e-5);
    }

    #[test]
    fn combined_stays_in_unit_interval() {
        let cases = [
            (vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]),
            (vec![1.0, 0.0, 0.0], vec![-1.0, 0.0, 0.0]),
            (vec![0.5, -0.5, 0.1], vec![-0.3, 0.9, 2.0]),
        ];
        for metric in [
            SimilarityMetric::Cosine,
            SimilarityMetric::Euclidean,
            SimilarityMetric::Combined,
        ] {
            for (a, b) in &cases {
                let sim = metric.compare(a, b);
                assert!((0.0..=1.0).contains(&sim), "{metric:?} gave {sim}");
            }
        }
    }

    #[test]
    fn antiparallel_vectors_floor_at_zero() {
        // Raw cosine -1, normalized euclidean 0: the unclamped blend would
        // be -0.4, a negative score indistinguishable from "no data".
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![-1.0, 0.0, 0.0];
        assert_eq!(SimilarityMetric::Combined.compare(&a, &b), 0.0);
        assert_eq!(SimilarityMetric::Cosine.compare(&a, &b), 0.0);
    }

    #[test]
    fn cosine_compression_above_point_nine() {
        // Two vectors with raw cosine very close to 1.0.
        let a = vec![1.0, 0.0];
        let b = vec![1.0, 0.01];
        let raw = cosine(&a, &b);
        assert!(raw > 0.9);
        let adjusted = adjusted_cosine(&a, &b);
        assert!(adjusted <= 0.9 + 1e-6);
        assert!(adjusted >= COSINE_COMPRESS_BASE);
        // Below the knee the score is untouched.
        let c = vec![1.0, 1.0];
        assert_eq!(adjusted_cosine(&a, &c), cosine(&a, &c));
    }

    #[test]
    fn metric_parses_from_config_string() {
        assert_eq!("combined".parse(), Ok(SimilarityMetric::Combined));
        assert_eq!("cosine".parse(), Ok(SimilarityMetric::Cosine));
        assert_eq!("euclidean".parse(), Ok(SimilarityMetric::Euclidean));
        assert!("manhattan".parse::<SimilarityMetric>().is_err());
    }
}
