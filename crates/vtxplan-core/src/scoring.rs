//! # Interference Scoring
//!
//! Each in-range IMD product is compared with the closest real channel in
//! the combination. A product further than its mechanism's threshold is
//! harmless; a closer one costs `(threshold - separation)^2 * weight`, so
//! near-exact collisions dominate.
//!
//! Two independent strategies turn those costs into a 0–100 rating:
//!
//! - [`EnhancedScorer`]: all three mechanisms, weighted, normalised by
//!   `15 * n`.
//! - [`LegacyScorer`]: 2nd order only, unweighted, normalised by `5 * n`.
//!
//! The two scales are not comparable. They are separate types
//! ([`EnhancedRating`], [`LegacyRating`]) so they cannot be mixed up.

use std::fmt;

use serde::Serialize;

use crate::config::{DisplayRange, LegacyParams, ScoringConfig};
use crate::imd::{self, ImdOrder, ImdProduct};
use crate::Mhz;

// ─── Ratings ────────────────────────────────────────────────────────────────

/// Rating from the weighted multi-order model. Higher is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EnhancedRating(pub u32);

/// Rating from the 2nd-order-only model. Kept for comparison only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct LegacyRating(pub u32);

impl EnhancedRating {
    pub fn value(self) -> u32 {
        self.0
    }
}

impl LegacyRating {
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EnhancedRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for LegacyRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A pure `combination -> rating` model.
pub trait RatingStrategy {
    type Rating: Copy + Ord + fmt::Debug + fmt::Display;

    fn name(&self) -> &'static str;

    /// Sum of every product's interference score.
    fn total_interference(&self, combination: &[Mhz]) -> f64;

    fn rate(&self, combination: &[Mhz]) -> Self::Rating;
}

/// `max - total / (normalization * n)`, rounded half-to-even, floored at 0.
///
/// An empty combination has no products and rates `max`.
fn normalize(total: f64, n: usize, normalization_per_channel: f64, max: f64) -> u32 {
    let rating = if n == 0 {
        max
    } else {
        max - total / (normalization_per_channel * n as f64)
    };
    rating.round_ties_even().max(0.0) as u32
}

// ─── Proximity ──────────────────────────────────────────────────────────────

/// Channel in `frequencies` closest to `target`.
///
/// On equal distance the earliest element wins, not the lowest frequency.
pub fn nearest_frequency(target: Mhz, frequencies: &[Mhz]) -> Option<Mhz> {
    let (&first, rest) = frequencies.split_first()?;
    let mut nearest = first;
    for &f in rest {
        if f.abs_diff(target) < nearest.abs_diff(target) {
            nearest = f;
        }
    }
    Some(nearest)
}

/// Cost of one ghost carrier at `imd_freq` against the combination.
pub fn weighted_interference(
    imd_freq: Mhz,
    frequencies: &[Mhz],
    weight: f64,
    threshold: Mhz,
) -> f64 {
    match nearest_frequency(imd_freq, frequencies) {
        Some(nearest) => proximity_score(distance(imd_freq, nearest), weight, threshold),
        None => 0.0,
    }
}

/// `|a - b|`, saturating at `Mhz::MAX`.
fn distance(a: Mhz, b: Mhz) -> Mhz {
    Mhz::try_from(a.abs_diff(b)).unwrap_or(Mhz::MAX)
}

fn proximity_score(separation: Mhz, weight: f64, threshold: Mhz) -> f64 {
    if separation > threshold {
        return 0.0;
    }
    let value = f64::from(threshold - separation);
    value * value * weight
}

// ─── Breakdown ──────────────────────────────────────────────────────────────

/// Diagnostic record for one IMD product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImdDetail {
    pub imd_freq: Mhz,
    pub source_freqs: Vec<Mhz>,
    pub formula: String,
    pub nearest_freq: Mhz,
    pub separation: Mhz,
    pub interference_score: f64,
    pub weight: f64,
}

impl ImdDetail {
    pub fn is_significant(&self) -> bool {
        self.interference_score > 0.0
    }
}

/// Per-mechanism IMD detail for one combination.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImdBreakdown {
    #[serde(rename = "2nd_order")]
    pub second_order: Vec<ImdDetail>,
    #[serde(rename = "3rd_order_2freq")]
    pub third_order_2freq: Vec<ImdDetail>,
    #[serde(rename = "3rd_order_3freq")]
    pub third_order_3freq: Vec<ImdDetail>,
}

/// Number of products with a non-zero score, per mechanism.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SignificantCounts {
    #[serde(rename = "2nd_order")]
    pub second_order: usize,
    #[serde(rename = "3rd_order_2freq")]
    pub third_order_2freq: usize,
    #[serde(rename = "3rd_order_3freq")]
    pub third_order_3freq: usize,
}

impl ImdBreakdown {
    pub fn group(&self, order: ImdOrder) -> &[ImdDetail] {
        match order {
            ImdOrder::Second => &self.second_order,
            ImdOrder::ThirdTwoFreq => &self.third_order_2freq,
            ImdOrder::ThirdThreeFreq => &self.third_order_3freq,
        }
    }

    fn group_mut(&mut self, order: ImdOrder) -> &mut Vec<ImdDetail> {
        match order {
            ImdOrder::Second => &mut self.second_order,
            ImdOrder::ThirdTwoFreq => &mut self.third_order_2freq,
            ImdOrder::ThirdThreeFreq => &mut self.third_order_3freq,
        }
    }

    /// Every record with its mechanism, 2nd order first.
    pub fn iter(&self) -> impl Iterator<Item = (ImdOrder, &ImdDetail)> + '_ {
        ImdOrder::ALL
            .into_iter()
            .flat_map(move |order| self.group(order).iter().map(move |d| (order, d)))
    }

    pub fn total_score(&self) -> f64 {
        self.iter().map(|(_, d)| d.interference_score).sum()
    }

    pub fn significant_counts(&self) -> SignificantCounts {
        let count = |order| {
            self.group(order)
                .iter()
                .filter(|d| d.is_significant())
                .count()
        };
        SignificantCounts {
            second_order: count(ImdOrder::Second),
            third_order_2freq: count(ImdOrder::ThirdTwoFreq),
            third_order_3freq: count(ImdOrder::ThirdThreeFreq),
        }
    }

    /// Up to `limit` significant products, highest score first. Equal
    /// scores keep mechanism-then-generation order.
    pub fn worst(&self, limit: usize) -> Vec<(ImdOrder, &ImdDetail)> {
        let mut hits: Vec<_> = self.iter().filter(|(_, d)| d.is_significant()).collect();
        hits.sort_by(|a, b| b.1.interference_score.total_cmp(&a.1.interference_score));
        hits.truncate(limit);
        hits
    }
}

// ─── Enhanced ───────────────────────────────────────────────────────────────

/// Weighted 2nd + 3rd order model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnhancedScorer {
    config: ScoringConfig,
}

impl EnhancedScorer {
    pub fn new(config: ScoringConfig) -> Self {
        EnhancedScorer { config }
    }

    fn score(&self, product: &ImdProduct, combination: &[Mhz]) -> f64 {
        let params = self.config.params(product.order);
        weighted_interference(product.freq_mhz, combination, params.weight(), params.threshold)
    }

    /// Every in-range product with its nearest channel and score.
    pub fn breakdown(&self, combination: &[Mhz]) -> ImdBreakdown {
        let mut out = ImdBreakdown::default();
        for product in imd::all_products(combination, &self.config.display_range) {
            let Some(nearest) = nearest_frequency(product.freq_mhz, combination) else {
                continue;
            };
            let params = self.config.params(product.order);
            let separation = distance(product.freq_mhz, nearest);
            let weight = params.weight();
            out.group_mut(product.order).push(ImdDetail {
                imd_freq: product.freq_mhz,
                formula: product.formula(),
                source_freqs: product.sources,
                nearest_freq: nearest,
                separation,
                interference_score: proximity_score(separation, weight, params.threshold),
                weight,
            });
        }
        out
    }
}

impl Default for EnhancedScorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl RatingStrategy for EnhancedScorer {
    type Rating = EnhancedRating;

    fn name(&self) -> &'static str {
        "enhanced"
    }

    fn total_interference(&self, combination: &[Mhz]) -> f64 {
        imd::all_products(combination, &self.config.display_range)
            .iter()
            .map(|p| self.score(p, combination))
            .sum()
    }

    fn rate(&self, combination: &[Mhz]) -> EnhancedRating {
        EnhancedRating(normalize(
            self.total_interference(combination),
            combination.len(),
            self.config.normalization_per_channel,
            self.config.rating_max,
        ))
    }
}

// ─── Legacy ─────────────────────────────────────────────────────────────────

/// Unweighted 2nd-order-only model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegacyScorer {
    display_range: DisplayRange,
    params: LegacyParams,
    rating_max: f64,
}

impl LegacyScorer {
    pub fn new(config: &ScoringConfig) -> Self {
        LegacyScorer {
            display_range: config.display_range,
            params: config.legacy,
            rating_max: config.rating_max,
        }
    }
}

impl Default for LegacyScorer {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

impl RatingStrategy for LegacyScorer {
    type Rating = LegacyRating;

    fn name(&self) -> &'static str {
        "legacy"
    }

    fn total_interference(&self, combination: &[Mhz]) -> f64 {
        imd::products(ImdOrder::Second, combination, &self.display_range)
            .iter()
            .map(|p| weighted_interference(p.freq_mhz, combination, 1.0, self.params.threshold))
            .sum()
    }

    fn rate(&self, combination: &[Mhz]) -> LegacyRating {
        LegacyRating(normalize(
            self.total_interference(combination),
            combination.len(),
            self.params.normalization_per_channel,
            self.rating_max,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SELF_TEST: [Mhz; 3] = [5760, 5800, 5840];

    #[test]
    fn nearest_prefers_first_on_ties() {
        assert_eq!(nearest_frequency(5780, &[5760, 5800]), Some(5760));
        assert_eq!(nearest_frequency(5780, &[5800, 5760]), Some(5800));
        assert_eq!(nearest_frequency(5795, &[5760, 5800]), Some(5800));
        assert_eq!(nearest_frequency(5795, &[]), None);
    }

    #[test]
    fn interference_is_quadratic_inside_threshold() {
        assert_eq!(weighted_interference(5800, &[5800], 1.0, 35), 1225.0);
        assert_eq!(weighted_interference(5810, &[5800], 1.0, 35), 625.0);
        assert_eq!(weighted_interference(5835, &[5800], 1.0, 35), 0.0);
        assert_eq!(weighted_interference(5836, &[5800], 1.0, 35), 0.0);
        assert!((weighted_interference(5800, &[5800], 0.01, 25) - 6.25).abs() < 1e-9);
    }

    #[test]
    fn self_test_ratings() {
        let enhanced = EnhancedScorer::default();
        let legacy = LegacyScorer::default();

        // 2 × 1225 (2nd) + 2 × 6.25 (3rd, 2-freq) + 0.625 (3rd, 3-freq)
        let total = enhanced.total_interference(&SELF_TEST);
        assert!((total - 2463.125).abs() < 1e-6);
        assert_eq!(enhanced.rate(&SELF_TEST), EnhancedRating(45));

        // 100 - 2450 / 15 = -63.3, floored at zero
        assert_eq!(legacy.total_interference(&SELF_TEST), 2450.0);
        assert_eq!(legacy.rate(&SELF_TEST), LegacyRating(0));

        assert_ne!(
            enhanced.rate(&SELF_TEST).value(),
            legacy.rate(&SELF_TEST).value()
        );
    }

    #[test]
    fn wide_threshold_saturates_rating() {
        let mut config = ScoringConfig::default();
        config.second_order.threshold = 50_000;
        let scorer = EnhancedScorer::new(config);
        assert!(scorer.total_interference(&SELF_TEST).is_finite());
        assert_eq!(scorer.rate(&SELF_TEST), EnhancedRating(0));
        let max = f64::from(Mhz::MAX);
        assert_eq!(proximity_score(0, 1.0, Mhz::MAX), max * max);
    }

    #[test]
    fn distant_channels_do_not_overflow() {
        assert_eq!(distance(Mhz::MIN, Mhz::MAX), Mhz::MAX);
        assert_eq!(nearest_frequency(0, &[Mhz::MIN, Mhz::MAX]), Some(Mhz::MAX));
        assert_eq!(weighted_interference(5800, &[Mhz::MIN], 1.0, 35), 0.0);
    }

    #[test]
    fn strategies_are_named() {
        assert_eq!(EnhancedScorer::default().name(), "enhanced");
        assert_eq!(LegacyScorer::default().name(), "legacy");
    }

    #[test]
    fn rounding_is_half_to_even() {
        assert_eq!(normalize(0.0, 4, 15.0, 100.0), 100);
        // 100 - 30 / 4 = 92.5 → 92
        assert_eq!(normalize(30.0, 4, 1.0, 100.0), 92);
        // 100 - 26 / 4 = 93.5 → 94
        assert_eq!(normalize(26.0, 4, 1.0, 100.0), 94);
        // 100 - 1 / 4 = 99.75 → 100, not truncated to 99
        assert_eq!(normalize(1.0, 4, 1.0, 100.0), 100);
        assert_eq!(normalize(1e9, 4, 15.0, 100.0), 0);
    }

    #[test]
    fn empty_and_single_channel_rate_max() {
        let enhanced = EnhancedScorer::default();
        assert_eq!(enhanced.rate(&[]), EnhancedRating(100));
        assert_eq!(enhanced.rate(&[5800]), EnhancedRating(100));
        assert_eq!(LegacyScorer::default().rate(&[5800]), LegacyRating(100));
    }

    #[test]
    fn breakdown_matches_rating_total() {
        let scorer = EnhancedScorer::default();
        let combo = [5658, 5695, 5732, 5769];
        let breakdown = scorer.breakdown(&combo);
        assert!((breakdown.total_score() - scorer.total_interference(&combo)).abs() < 1e-9);
        assert_eq!(scorer.rate(&combo), EnhancedRating(18));
    }

    #[test]
    fn breakdown_records() {
        let breakdown = EnhancedScorer::default().breakdown(&SELF_TEST);
        assert_eq!(breakdown.second_order.len(), 6);
        assert_eq!(breakdown.third_order_2freq.len(), 6);
        assert_eq!(breakdown.third_order_3freq.len(), 3);

        let hit = &breakdown.second_order[2];
        assert_eq!(hit.imd_freq, 5840);
        assert_eq!(hit.source_freqs, vec![5800, 5760]);
        assert_eq!(hit.formula, "2×5800 - 5760");
        assert_eq!(hit.nearest_freq, 5840);
        assert_eq!(hit.separation, 0);
        assert_eq!(hit.interference_score, 1225.0);
        assert_eq!(hit.weight, 1.0);

        assert_eq!(
            breakdown.significant_counts(),
            SignificantCounts {
                second_order: 2,
                third_order_2freq: 2,
                third_order_3freq: 1,
            }
        );
    }

    #[test]
    fn worst_is_sorted_and_stable() {
        let breakdown = EnhancedScorer::default().breakdown(&SELF_TEST);
        let worst = breakdown.worst(5);
        assert_eq!(worst.len(), 5);
        assert_eq!(worst[0].0, ImdOrder::Second);
        assert_eq!(worst[0].1.imd_freq, 5840);
        assert_eq!(worst[1].1.imd_freq, 5760);
        assert_eq!(worst[2].0, ImdOrder::ThirdTwoFreq);
        assert_eq!(worst[4].0, ImdOrder::ThirdThreeFreq);
        assert!(worst
            .windows(2)
            .all(|w| w[0].1.interference_score >= w[1].1.interference_score));

        assert_eq!(breakdown.worst(1).len(), 1);
    }

    #[test]
    fn scoring_is_idempotent() {
        let scorer = EnhancedScorer::default();
        assert_eq!(scorer.rate(&SELF_TEST), scorer.rate(&SELF_TEST));
        assert_eq!(scorer.breakdown(&SELF_TEST), scorer.breakdown(&SELF_TEST));
    }

    #[test]
    fn breakdown_serialises_with_group_keys() {
        let breakdown = EnhancedScorer::default().breakdown(&SELF_TEST);
        let json = serde_json::to_value(&breakdown).unwrap();
        assert!(json["2nd_order"].is_array());
        assert!(json["3rd_order_2freq"].is_array());
        assert_eq!(json["3rd_order_3freq"][0]["imd_freq"], 5800);
        assert_eq!(json["3rd_order_3freq"][0]["formula"], "5760 - 5800 + 5840");
    }
}
