//! Planner configuration.
//!
//! Built-in defaults, optionally overridden by a TOML file. The file is
//! parsed into `*Input` structs (every field optional) and then resolved
//! into the validated, immutable [`PlannerConfig`] that every component
//! receives.
//!
//! ```toml
//! version = 1
//! mode = "hdzero"
//! top = 10
//!
//! [search]
//! min_freq_mhz = 5640
//! max_freq_mhz = 5830
//! segments = 4
//!
//! [scoring.third_order_2freq]
//! weight_db = -20.0
//! threshold_mhz = 25
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::{Band, BandwidthMode, Catalog};
use crate::imd::ImdOrder;
use crate::{Mhz, PlanError};

pub const CONFIG_VERSION: u32 = 1;

pub const DEFAULT_MIN_FREQ: Mhz = 5640;
pub const DEFAULT_MAX_FREQ: Mhz = 5830;
pub const DEFAULT_SEGMENTS: usize = 4;
/// Edge-to-edge gap required beyond the full channel width.
pub const DEFAULT_GUARD_GAP: Mhz = 1;
pub const DEFAULT_TOP: usize = 10;

/// Receiver sensitivity bound; IMD products outside it are ignored.
pub const DISPLAY_MIN_FREQ: Mhz = 5100;
pub const DISPLAY_MAX_FREQ: Mhz = 6099;

pub const RATING_MAX: f64 = 100.0;
/// Empirical: keeps typical 4-channel enhanced ratings inside 0–100.
pub const ENHANCED_NORMALIZATION: f64 = 15.0;
pub const LEGACY_NORMALIZATION: f64 = 5.0;

pub const THRESHOLD_2ND_ORDER: Mhz = 35;
pub const THRESHOLD_3RD_ORDER: Mhz = 25;
pub const WEIGHT_2ND_ORDER_DB: f64 = 0.0;
pub const WEIGHT_3RD_ORDER_2FREQ_DB: f64 = -20.0;
pub const WEIGHT_3RD_ORDER_3FREQ_DB: f64 = -30.0;

/// Power ratio for a dB value.
pub fn db_to_linear(db: f64) -> f64 {
    10f64.powf(db / 10.0)
}

// ─── Resolved Config ────────────────────────────────────────────────────────

/// Channel search parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchConfig {
    /// Occupied bandwidth of one transmitter (MHz).
    pub channel_width: Mhz,
    pub min_freq: Mhz,
    pub max_freq: Mhz,
    /// Number of simultaneous channels to select.
    pub segments_needed: usize,
    pub guard_gap: Mhz,
}

impl SearchConfig {
    pub fn for_mode(mode: BandwidthMode) -> Self {
        SearchConfig {
            channel_width: mode.channel_width(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if self.channel_width <= 0 {
            return Err(PlanError::InvalidChannelWidth(self.channel_width));
        }
        if self.min_freq >= self.max_freq {
            return Err(PlanError::InvalidRange {
                min: self.min_freq,
                max: self.max_freq,
            });
        }
        if self.segments_needed == 0 {
            return Err(PlanError::InvalidSegmentCount);
        }
        if self.guard_gap < 0 {
            return Err(PlanError::InvalidGuardGap(self.guard_gap));
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            channel_width: BandwidthMode::Analog.channel_width(),
            min_freq: DEFAULT_MIN_FREQ,
            max_freq: DEFAULT_MAX_FREQ,
            segments_needed: DEFAULT_SEGMENTS,
            guard_gap: DEFAULT_GUARD_GAP,
        }
    }
}

/// Inclusive frequency window in which IMD products can hurt a receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayRange {
    pub min: Mhz,
    pub max: Mhz,
}

impl DisplayRange {
    pub fn contains(&self, freq: Mhz) -> bool {
        self.min <= freq && freq <= self.max
    }
}

impl Default for DisplayRange {
    fn default() -> Self {
        DisplayRange {
            min: DISPLAY_MIN_FREQ,
            max: DISPLAY_MAX_FREQ,
        }
    }
}

/// Weight and proximity threshold for one IMD mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrderParams {
    /// Weight relative to the 2nd-order reference, in dB.
    pub weight_db: f64,
    /// Products further than this from every channel score zero.
    pub threshold: Mhz,
}

impl OrderParams {
    pub fn weight(&self) -> f64 {
        db_to_linear(self.weight_db)
    }
}

/// Parameters of the 2nd-order-only legacy rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegacyParams {
    pub threshold: Mhz,
    pub normalization_per_channel: f64,
}

impl Default for LegacyParams {
    fn default() -> Self {
        LegacyParams {
            threshold: THRESHOLD_2ND_ORDER,
            normalization_per_channel: LEGACY_NORMALIZATION,
        }
    }
}

/// Scoring constants. All values are empirical tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringConfig {
    pub display_range: DisplayRange,
    pub rating_max: f64,
    /// Enhanced rating divisor per channel in the combination.
    pub normalization_per_channel: f64,
    pub second_order: OrderParams,
    pub third_order_2freq: OrderParams,
    pub third_order_3freq: OrderParams,
    pub legacy: LegacyParams,
}

impl ScoringConfig {
    pub fn params(&self, order: ImdOrder) -> OrderParams {
        match order {
            ImdOrder::Second => self.second_order,
            ImdOrder::ThirdTwoFreq => self.third_order_2freq,
            ImdOrder::ThirdThreeFreq => self.third_order_3freq,
        }
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if self.display_range.min > self.display_range.max {
            return Err(PlanError::InvalidDisplayRange {
                min: self.display_range.min,
                max: self.display_range.max,
            });
        }
        if !(self.rating_max > 0.0 && self.rating_max <= RATING_MAX) {
            return Err(PlanError::InvalidRatingMax(self.rating_max));
        }
        for order in ImdOrder::ALL {
            let OrderParams {
                weight_db,
                threshold,
            } = self.params(order);
            if threshold < 0 {
                return Err(PlanError::InvalidThreshold {
                    order: order.key(),
                    threshold,
                });
            }
            if !weight_db.is_finite() {
                return Err(PlanError::InvalidWeight {
                    order: order.key(),
                    weight_db,
                });
            }
        }
        if self.legacy.threshold < 0 {
            return Err(PlanError::InvalidThreshold {
                order: "legacy",
                threshold: self.legacy.threshold,
            });
        }
        check_normalization("enhanced", self.normalization_per_channel)?;
        check_normalization("legacy", self.legacy.normalization_per_channel)?;
        Ok(())
    }
}

fn check_normalization(name: &'static str, value: f64) -> Result<(), PlanError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(PlanError::InvalidNormalization { name, value })
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            display_range: DisplayRange::default(),
            rating_max: RATING_MAX,
            normalization_per_channel: ENHANCED_NORMALIZATION,
            second_order: OrderParams {
                weight_db: WEIGHT_2ND_ORDER_DB,
                threshold: THRESHOLD_2ND_ORDER,
            },
            third_order_2freq: OrderParams {
                weight_db: WEIGHT_3RD_ORDER_2FREQ_DB,
                threshold: THRESHOLD_3RD_ORDER,
            },
            third_order_3freq: OrderParams {
                weight_db: WEIGHT_3RD_ORDER_3FREQ_DB,
                threshold: THRESHOLD_3RD_ORDER,
            },
            legacy: LegacyParams::default(),
        }
    }
}

/// Everything a planning run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub version: u32,
    pub mode: BandwidthMode,
    pub search: SearchConfig,
    pub scoring: ScoringConfig,
    /// How many ranked combinations consumers should show.
    pub top: usize,
    /// Replaces the mode's built-in band table when set.
    pub bands: Option<Vec<Band>>,
}

impl PlannerConfig {
    pub fn for_mode(mode: BandwidthMode) -> Self {
        PlannerConfig {
            version: CONFIG_VERSION,
            mode,
            search: SearchConfig::for_mode(mode),
            scoring: ScoringConfig::default(),
            top: DEFAULT_TOP,
            bands: None,
        }
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        self.search.validate()?;
        self.scoring.validate()
    }

    /// Custom bands if configured, otherwise the mode's built-in table.
    pub fn catalog(&self) -> Catalog {
        match &self.bands {
            Some(bands) => Catalog::new(bands.clone()),
            None => Catalog::for_mode(self.mode),
        }
    }

    pub fn from_toml_str(input: &str) -> Result<Self, PlanError> {
        PlannerConfigInput::from_toml_str(input)?.resolve()
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::for_mode(BandwidthMode::default())
    }
}

// ─── TOML Input ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlannerConfigInput {
    pub version: u32,
    pub mode: Option<String>,
    pub top: Option<usize>,
    pub search: SearchConfigInput,
    pub scoring: ScoringConfigInput,
    pub bands: Vec<Band>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchConfigInput {
    /// Overrides the mode's channel width.
    pub channel_width_mhz: Option<Mhz>,
    pub min_freq_mhz: Option<Mhz>,
    pub max_freq_mhz: Option<Mhz>,
    pub segments: Option<usize>,
    pub guard_gap_mhz: Option<Mhz>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScoringConfigInput {
    pub display_min_mhz: Option<Mhz>,
    pub display_max_mhz: Option<Mhz>,
    pub rating_max: Option<f64>,
    pub normalization_per_channel: Option<f64>,
    pub second_order: OrderParamsInput,
    pub third_order_2freq: OrderParamsInput,
    pub third_order_3freq: OrderParamsInput,
    pub legacy: LegacyParamsInput,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrderParamsInput {
    pub weight_db: Option<f64>,
    pub threshold_mhz: Option<Mhz>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LegacyParamsInput {
    pub threshold_mhz: Option<Mhz>,
    pub normalization_per_channel: Option<f64>,
}

impl OrderParamsInput {
    fn resolve(&self, default: OrderParams) -> OrderParams {
        OrderParams {
            weight_db: self.weight_db.unwrap_or(default.weight_db),
            threshold: self.threshold_mhz.unwrap_or(default.threshold),
        }
    }
}

impl PlannerConfigInput {
    pub fn from_toml_str(input: &str) -> Result<Self, PlanError> {
        if input.trim().is_empty() {
            return Ok(PlannerConfigInput::default());
        }
        toml::from_str(input).map_err(|e| PlanError::ConfigParse(e.to_string()))
    }

    pub fn resolve(self) -> Result<PlannerConfig, PlanError> {
        let version = if self.version == 0 {
            CONFIG_VERSION
        } else {
            self.version
        };
        if version != CONFIG_VERSION {
            return Err(PlanError::UnsupportedConfigVersion(version));
        }

        let mode = match self.mode.as_deref() {
            Some(name) => name.parse()?,
            None => BandwidthMode::default(),
        };

        let base = SearchConfig::for_mode(mode);
        let search = SearchConfig {
            channel_width: self.search.channel_width_mhz.unwrap_or(base.channel_width),
            min_freq: self.search.min_freq_mhz.unwrap_or(base.min_freq),
            max_freq: self.search.max_freq_mhz.unwrap_or(base.max_freq),
            segments_needed: self.search.segments.unwrap_or(base.segments_needed),
            guard_gap: self.search.guard_gap_mhz.unwrap_or(base.guard_gap),
        };

        let d = ScoringConfig::default();
        let s = &self.scoring;
        let scoring = ScoringConfig {
            display_range: DisplayRange {
                min: s.display_min_mhz.unwrap_or(d.display_range.min),
                max: s.display_max_mhz.unwrap_or(d.display_range.max),
            },
            rating_max: s.rating_max.unwrap_or(d.rating_max),
            normalization_per_channel: s
                .normalization_per_channel
                .unwrap_or(d.normalization_per_channel),
            second_order: s.second_order.resolve(d.second_order),
            third_order_2freq: s.third_order_2freq.resolve(d.third_order_2freq),
            third_order_3freq: s.third_order_3freq.resolve(d.third_order_3freq),
            legacy: LegacyParams {
                threshold: s.legacy.threshold_mhz.unwrap_or(d.legacy.threshold),
                normalization_per_channel: s
                    .legacy
                    .normalization_per_channel
                    .unwrap_or(d.legacy.normalization_per_channel),
            },
        };

        let bands = if self.bands.is_empty() {
            None
        } else {
            Some(self.bands)
        };

        let config = PlannerConfig {
            version,
            mode,
            search,
            scoring,
            top: self.top.unwrap_or(DEFAULT_TOP),
            bands,
        };
        config.validate()?;
        Ok(config)
    }
}
