use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::enrichment::Term;

pub fn tokenize(name: &str) -> HashSet<String> {
    name.split_whitespace().map(str::to_lowercase).collect()
}

/// Jaccard index of two token sets; 0 when both are empty.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let (smaller, larger) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let intersection = smaller.iter().filter(|token| larger.contains(*token)).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Symmetric pairwise scores keyed by `(low, high)` index. Pairs that were
/// not retained read as 0.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimilarityMatrix {
    scores: BTreeMap<(usize, usize), f64>,
}

impl SimilarityMatrix {
    pub fn get(&self, a: usize, b: usize) -> f64 {
        let key = if a <= b { (a, b) } else { (b, a) };
        self.scores.get(&key).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.scores
            .iter()
            .map(|(&(from, to), &score)| (from, to, score))
    }
}

/// Scores every pair `i < j` once and keeps those at or above `threshold`.
/// Each name is tokenized a single time.
pub fn similarity_matrix(terms: &[Term], threshold: f64) -> SimilarityMatrix {
    let tokens = terms
        .iter()
        .map(|term| tokenize(&term.term_name))
        .collect::<Vec<_>>();

    let mut scores = BTreeMap::new();
    for i in 0..tokens.len() {
        for j in (i + 1)..tokens.len() {
            let score = jaccard(&tokens[i], &tokens[j]);
            if score >= threshold {
                scores.insert((i, j), score);
            }
        }
    }

    debug!(
        terms = terms.len(),
        pairs = tokens.len() * tokens.len().saturating_sub(1) / 2,
        retained = scores.len(),
        threshold,
        "scored term similarities"
    );
    SimilarityMatrix { scores }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::enrichment::term::fixtures::term;

    #[test]
    fn shared_word_scores_one_third() {
        let score = jaccard(&tokenize("cell adhesion"), &tokenize("cell migration"));
        assert!((score - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn tokenization_folds_case_and_collapses_repeats() {
        let tokens = tokenize("  Cell  cell ADHESION\tcell ");
        assert_eq!(tokens.len(), 2);
        assert!(tokens.contains("cell"));
        assert!(tokens.contains("adhesion"));
    }

    #[test]
    fn empty_names_score_zero() {
        assert_eq!(jaccard(&tokenize(""), &tokenize("   ")), 0.0);
    }

    #[test]
    fn matrix_keeps_only_pairs_meeting_threshold() {
        let terms = vec![
            term("cell adhesion", 0.001),
            term("cell migration", 0.002),
            term("synaptic signaling", 0.003),
        ];

        let matrix = similarity_matrix(&terms, 0.3);
        assert_eq!(matrix.len(), 1);
        assert!((matrix.get(1, 0) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(matrix.get(0, 2), 0.0);

        let everything = similarity_matrix(&terms, 0.0);
        assert_eq!(everything.len(), 3);
        assert!(everything.iter().all(|(from, to, _)| from < to));
    }

    fn term_name() -> impl Strategy<Value = String> {
        prop::collection::vec("[a-cA-C]{1,3}", 0..5).prop_map(|words| words.join(" "))
    }

    proptest! {
        #[test]
        fn similarity_is_bounded_and_symmetric(a in term_name(), b in term_name()) {
            let (ta, tb) = (tokenize(&a), tokenize(&b));
            let forward = jaccard(&ta, &tb);
            prop_assert!((0.0..=1.0).contains(&forward));
            prop_assert_eq!(forward, jaccard(&tb, &ta));
        }

        #[test]
        fn matrix_lookup_is_order_independent(names in prop::collection::vec(term_name(), 2..8)) {
            let terms = names.iter().map(|name| term(name, 0.01)).collect::<Vec<_>>();
            let matrix = similarity_matrix(&terms, 0.0);
            for i in 0..terms.len() {
                for j in (i + 1)..terms.len() {
                    prop_assert_eq!(matrix.get(i, j), matrix.get(j, i));
                }
            }
        }
    }
}
