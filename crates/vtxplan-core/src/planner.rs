//! End-to-end planning run.
//!
//! Catalog → candidate filter → enumeration → enhanced rating → ranking,
//! plus a deep report for the best combination. The run is a pure function
//! of the catalog and the [`PlannerConfig`].

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::candidates::{filter_candidates, ChannelEdges, OverlapFilter};
use crate::catalog::{BandwidthMode, Catalog};
use crate::config::PlannerConfig;
use crate::enumerate::enumerate_combinations;
use crate::ranking::{Ranker, Ranking};
use crate::scoring::{
    EnhancedRating, EnhancedScorer, ImdBreakdown, LegacyRating, LegacyScorer, RatingStrategy,
    SignificantCounts,
};
use crate::{Combination, Mhz, PlanError};

/// Deep report for one combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinationReport {
    pub frequencies: Combination,
    pub enhanced: EnhancedRating,
    /// Different scale from `enhanced`; never compare the two.
    pub legacy: LegacyRating,
    pub significant: SignificantCounts,
    pub breakdown: ImdBreakdown,
}

/// Everything a planning run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanReport {
    pub mode: BandwidthMode,
    pub channel_width: Mhz,
    pub min_freq: Mhz,
    pub max_freq: Mhz,
    pub segments_needed: usize,
    pub edges: ChannelEdges,
    /// Unique frequencies in the catalog before range filtering.
    pub catalog_frequencies: usize,
    pub candidates: Vec<Mhz>,
    pub total_combinations: usize,
    pub ranking: Ranking<EnhancedRating>,
    /// `None` when no feasible combination exists.
    pub best: Option<CombinationReport>,
}

impl PlanReport {
    pub fn is_feasible(&self) -> bool {
        !self.ranking.is_empty()
    }
}

/// Validated planner, ready to run against any catalog.
#[derive(Debug, Clone)]
pub struct Planner {
    config: PlannerConfig,
    enhanced: Ranker<EnhancedScorer>,
    legacy: LegacyScorer,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Result<Self, PlanError> {
        config.validate()?;
        Ok(Planner {
            enhanced: Ranker::new(EnhancedScorer::new(config.scoring)),
            legacy: LegacyScorer::new(&config.scoring),
            config,
        })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Legacy rating of any combination, for side-by-side display.
    pub fn legacy_rating(&self, combination: &[Mhz]) -> LegacyRating {
        self.legacy.rate(combination)
    }

    /// Deep report (both ratings and the IMD breakdown) for one combination.
    pub fn report(&self, combination: &[Mhz]) -> CombinationReport {
        let breakdown = self.enhanced.detail(combination);
        CombinationReport {
            frequencies: combination.to_vec(),
            enhanced: self.enhanced.scorer().rate(combination),
            legacy: self.legacy.rate(combination),
            significant: breakdown.significant_counts(),
            breakdown,
        }
    }

    pub fn run(&self, catalog: &Catalog) -> PlanReport {
        let started = Instant::now();
        let search = &self.config.search;

        let all = catalog.unique_frequencies();
        let candidates = filter_candidates(all.iter().copied(), search);
        debug!(
            catalog = all.len(),
            candidates = candidates.len(),
            min_freq = search.min_freq,
            max_freq = search.max_freq,
            channel_width = search.channel_width,
            "candidates filtered"
        );

        let filter = OverlapFilter::from(search);
        let combinations = enumerate_combinations(&candidates, search.segments_needed, &filter);
        let total_combinations = combinations.len();
        debug!(
            combinations = total_combinations,
            segments = search.segments_needed,
            "combinations enumerated"
        );

        let ranking = self.enhanced.rank(combinations);
        let best = ranking.best().map(|top| self.report(&top.frequencies));

        info!(
            mode = %self.config.mode,
            scorer = self.enhanced.scorer().name(),
            legacy = self.legacy.name(),
            candidates = candidates.len(),
            combinations = total_combinations,
            best_rating = best.as_ref().map(|b| b.enhanced.value()),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "plan complete"
        );

        PlanReport {
            mode: self.config.mode,
            channel_width: search.channel_width,
            min_freq: search.min_freq,
            max_freq: search.max_freq,
            segments_needed: search.segments_needed,
            edges: ChannelEdges::of(search),
            catalog_frequencies: all.len(),
            candidates,
            total_combinations,
            ranking,
            best,
        }
    }
}
