//! Novelty scoring: compare a tagged item's facet vectors against recently
//! accepted history and produce per-facet similarities plus the aggregate
//! coincidence score.

use newswire_common::FACET_COUNT;

use crate::embedding::is_zero_vector;

use super::metric::SimilarityMetric;

/// Sentinel for "nothing to compare": a facet pair where either side is
/// the zero vector. Distinct from 0.0 ("totally dissimilar").
pub const NO_DATA: f32 = -1.0;

pub fn is_no_data(score: f32) -> bool {
    score < 0.0
}

/// Facet vectors of one prior accepted item.
#[derive(Debug, Clone)]
pub struct PriorVectors {
    pub id: i64,
    pub vectors: [Vec<f32>; FACET_COUNT],
}

/// What the novelty stage persists for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct NoveltyScores {
    /// Discretized per-facet similarities against the single most similar
    /// prior item; `NO_DATA` where not comparable.
    pub facet_scores: [f32; FACET_COUNT],
    /// Mean of the valid facet scores; 0.0 when none are valid.
    pub coincide: f32,
}

/// Per-facet similarities between one item and one prior item. A pair with
/// a zero vector on either side is `NO_DATA`.
pub fn facet_similarities(
    metric: SimilarityMetric,
    current: &[Vec<f32>; FACET_COUNT],
    prior: &[Vec<f32>; FACET_COUNT],
) -> [f32; FACET_COUNT] {
    std::array::from_fn(|i| {
        if is_zero_vector(&current[i]) || is_zero_vector(&prior[i]) {
            NO_DATA
        } else {
            metric.compare(&current[i], &prior[i])
        }
    })
}

/// Mean of the valid (non-sentinel) entries; 0.0 when there are none.
pub fn mean_of_valid(scores: &[f32; FACET_COUNT]) -> f32 {
    let valid: Vec<f32> = scores.iter().copied().filter(|s| !is_no_data(*s)).collect();
    if valid.is_empty() {
        0.0
    } else {
        valid.iter().sum::<f32>() / valid.len() as f32
    }
}

/// Quantize a similarity into the bands the coincidence score is built
/// from. Sentinels pass through untouched.
pub fn discretize(score: f32) -> f32 {
    if is_no_data(score) {
        NO_DATA
    } else if score >= 0.7 {
        1.0
    } else if score >= 0.4 {
        0.5
    } else if score >= 0.2 {
        0.25
    } else {
        0.0
    }
}

/// Whole-item best match: the single prior item with the highest mean of
/// valid facet similarities contributes all five facet scores, so every
/// score is attributable to one historical item. Priors with no comparable
/// facet are skipped; no priors (or none comparable) yields all-sentinel.
pub fn best_prior_match(
    metric: SimilarityMetric,
    current: &[Vec<f32>; FACET_COUNT],
    priors: &[PriorVectors],
) -> [f32; FACET_COUNT] {
    let mut best: Option<(f32, [f32; FACET_COUNT])> = None;

    for prior in priors {
        let sims = facet_similarities(metric, current, &prior.vectors);
        if sims.iter().all(|s| is_no_data(*s)) {
            continue;
        }
        let avg = mean_of_valid(&sims);
        if best.as_ref().is_none_or(|(best_avg, _)| avg > *best_avg) {
            best = Some((avg, sims));
        }
    }

    best.map(|(_, sims)| sims).unwrap_or([NO_DATA; FACET_COUNT])
}

/// Full novelty computation for one item: best prior match, discretize,
/// aggregate.
pub fn score_novelty(
    metric: SimilarityMetric,
    current: &[Vec<f32>; FACET_COUNT],
    priors: &[PriorVectors],
) -> NoveltyScores {
    let raw = best_prior_match(metric, current, priors);
    let facet_scores = raw.map(discretize);
    let coincide = mean_of_valid(&facet_scores);
    NoveltyScores { facet_scores, coincide }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::zero_vector;
    use newswire_common::EMBEDDING_DIM;

    fn unit(direction: usize) -> Vec<f32> {
        let mut v = vec![0.0; EMBEDDING_DIM];
        v[direction] = 1.0;
        v
    }

    fn prior(id: i64, vectors: [Vec<f32>; FACET_COUNT]) -> PriorVectors {
        PriorVectors { id, vectors }
    }

    #[test]
    fn aggregate_is_mean_of_valid_facets() {
        let scores = [0.8, NO_DATA, 0.4, NO_DATA, NO_DATA];
        assert!((mean_of_valid(&scores) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn aggregate_with_no_valid_facets_is_zero() {
        assert_eq!(mean_of_valid(&[NO_DATA; FACET_COUNT]), 0.0);
    }

    #[test]
    fn discretization_bands() {
        assert_eq!(discretize(0.95), 1.0);
        assert_eq!(discretize(0.7), 1.0);
        assert_eq!(discretize(0.5), 0.5);
        assert_eq!(discretize(0.4), 0.5);
        assert_eq!(discretize(0.3), 0.25);
        assert_eq!(discretize(0.2), 0.25);
        assert_eq!(discretize(0.1), 0.0);
        assert_eq!(discretize(NO_DATA), NO_DATA);
    }

    #[test]
    fn zero_vector_on_either_side_is_no_data() {
        let current = [unit(0), zero_vector(), unit(2), unit(3), unit(4)];
        let prior_vecs = [unit(0), unit(1), zero_vector(), unit(3), unit(4)];
        let sims = facet_similarities(SimilarityMetric::Combined, &current, &prior_vecs);

        assert!(!is_no_data(sims[0]));
        assert!(is_no_data(sims[1])); // current side zero
        assert!(is_no_data(sims[2])); // prior side zero
        assert!(!is_no_data(sims[3]));
    }

    #[test]
    fn opposed_facets_are_dissimilar_not_missing() {
        let mut opposed = unit(0);
        opposed[0] = -1.0;
        let current = [unit(0), unit(1), unit(2), unit(3), unit(4)];
        let prior_vecs = [opposed, unit(1), unit(2), unit(3), unit(4)];
        let sims = facet_similarities(SimilarityMetric::Combined, &current, &prior_vecs);

        // Maximal dissimilarity is a real comparison result, not "no data".
        assert_eq!(sims[0], 0.0);
        assert!(!is_no_data(sims[0]));
    }

    #[test]
    fn no_priors_yields_all_sentinel_and_zero_coincide() {
        let current = [unit(0), unit(1), unit(2), unit(3), unit(4)];
        let scores = score_novelty(SimilarityMetric::Combined, &current, &[]);
        assert_eq!(scores.facet_scores, [NO_DATA; FACET_COUNT]);
        assert_eq!(scores.coincide, 0.0);
    }

    #[test]
    fn best_match_takes_all_five_facets_from_one_prior() {
        let current = [unit(0), unit(1), unit(2), unit(3), unit(4)];

        // Prior A matches facets 0 and 1 exactly, nothing else.
        let a = prior(1, [unit(0), unit(1), unit(10), unit(11), unit(12)]);
        // Prior B matches facet 2 exactly but is dissimilar elsewhere.
        let b = prior(2, [unit(20), unit(21), unit(2), unit(22), unit(23)]);

        let sims = best_prior_match(SimilarityMetric::Combined, &current, &[b.clone(), a.clone()]);

        // A wins on average; its facet-2 score must be A's (low), not B's
        // (high); no per-facet max across priors.
        let a_sims = facet_similarities(SimilarityMetric::Combined, &current, &a.vectors);
        assert_eq!(sims, a_sims);
        let b_sims = facet_similarities(SimilarityMetric::Combined, &current, &b.vectors);
        assert!(sims[2] < b_sims[2]);
    }

    #[test]
    fn priors_with_no_comparable_facet_are_skipped() {
        let current = [unit(0), unit(1), unit(2), unit(3), unit(4)];
        let all_zero = prior(1, std::array::from_fn(|_| zero_vector()));
        let real = prior(2, [unit(0), unit(1), unit(2), unit(3), unit(4)]);

        let sims = best_prior_match(SimilarityMetric::Combined, &current, &[all_zero.clone(), real]);
        assert!(sims.iter().all(|s| !is_no_data(*s)));

        let sims = best_prior_match(SimilarityMetric::Combined, &current, &[all_zero]);
        assert_eq!(sims, [NO_DATA; FACET_COUNT]);
    }

    #[test]
    fn near_duplicate_scores_high_coincidence() {
        let current = [unit(0), unit(1), unit(2), unit(3), unit(4)];
        let dup = prior(1, [unit(0), unit(1), unit(2), unit(3), unit(4)]);
        let scores = score_novelty(SimilarityMetric::Combined, &current, &[dup]);

        // combined similarity of identical vectors is 0.96 -> band 1.0
        assert_eq!(scores.facet_scores, [1.0; FACET_COUNT]);
        assert_eq!(scores.coincide, 1.0);
    }

    #[test]
    fn partial_facets_aggregate_over_valid_only() {
        // Current has only three real facets.
        let current = [unit(0), zero_vector(), unit(2), zero_vector(), unit(4)];
        let p = prior(1, [unit(0), unit(1), unit(7), unit(3), unit(4)]);
        let scores = score_novelty(SimilarityMetric::Combined, &current, &[p]);

        assert!(is_no_data(scores.facet_scores[1]));
        assert!(is_no_data(scores.facet_scores[3]));
        // facets 0 and 4 identical (band 1.0), facet 2 orthogonal (band 0.0)
        assert_eq!(scores.facet_scores[0], 1.0);
        assert_eq!(scores.facet_scores[2], 0.0);
        assert_eq!(scores.facet_scores[4], 1.0);
        assert!((scores.coincide - 2.0 / 3.0).abs() < 1e-6);
    }
}
