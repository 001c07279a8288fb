//! Ranking of scored channel sets.
//!
//! Ratings are computed once per combination and sorted descending with a
//! stable sort, so equal ratings keep enumeration order and the result is
//! deterministic.

use serde::Serialize;

use crate::scoring::{EnhancedScorer, ImdBreakdown, RatingStrategy};
use crate::{Combination, Mhz};

/// A combination and its rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranked<R> {
    pub rating: R,
    pub frequencies: Combination,
}

/// Combinations sorted best first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ranking<R> {
    entries: Vec<Ranked<R>>,
}

impl<R> Ranking<R> {
    pub fn entries(&self) -> &[Ranked<R>] {
        &self.entries
    }

    /// The best `k` entries (fewer if the ranking is shorter).
    pub fn top(&self, k: usize) -> &[Ranked<R>] {
        &self.entries[..k.min(self.entries.len())]
    }

    pub fn best(&self) -> Option<&Ranked<R>> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<R> Default for Ranking<R> {
    fn default() -> Self {
        Ranking {
            entries: Vec::new(),
        }
    }
}

/// Rates and orders combinations with one [`RatingStrategy`].
#[derive(Debug, Clone)]
pub struct Ranker<S> {
    scorer: S,
}

impl<S: RatingStrategy> Ranker<S> {
    pub fn new(scorer: S) -> Self {
        Ranker { scorer }
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    pub fn rank(&self, combinations: Vec<Combination>) -> Ranking<S::Rating> {
        let mut entries: Vec<Ranked<S::Rating>> = combinations
            .into_iter()
            .map(|frequencies| Ranked {
                rating: self.scorer.rate(&frequencies),
                frequencies,
            })
            .collect();
        entries.sort_by(|a, b| b.rating.cmp(&a.rating));
        Ranking { entries }
    }
}

impl Ranker<EnhancedScorer> {
    /// Per-product IMD breakdown for any combination.
    pub fn detail(&self, combination: &[Mhz]) -> ImdBreakdown {
        self.scorer.breakdown(combination)
    }
}
