use thiserror::Error;

use crate::Mhz;

// ── Errors ──────────────────────────────────────────────────────────

/// Configuration failures. Raised before any search begins.
///
/// Empty candidate lists and "not enough channels" are *not* errors: the
/// planner returns an empty ranking for those.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("channel width must be positive, got {0} MHz")]
    InvalidChannelWidth(Mhz),
    #[error("invalid search range: min {min} MHz must be below max {max} MHz")]
    InvalidRange { min: Mhz, max: Mhz },
    #[error("segments needed must be at least 1")]
    InvalidSegmentCount,
    #[error("guard gap must not be negative, got {0} MHz")]
    InvalidGuardGap(Mhz),
    #[error("invalid display range: min {min} MHz must not exceed max {max} MHz")]
    InvalidDisplayRange { min: Mhz, max: Mhz },
    #[error("{order} threshold must not be negative, got {threshold} MHz")]
    InvalidThreshold { order: &'static str, threshold: Mhz },
    #[error("{name} normalization must be positive, got {value}")]
    InvalidNormalization { name: &'static str, value: f64 },
    #[error("rating max must be in (0, 100], got {0}")]
    InvalidRatingMax(f64),
    #[error("{order} weight must be a finite dB value, got {weight_db}")]
    InvalidWeight { order: &'static str, weight_db: f64 },
    #[error("unsupported config version {0}")]
    UnsupportedConfigVersion(u32),
    #[error("invalid config TOML: {0}")]
    ConfigParse(String),
    #[error("unknown bandwidth mode `{name}` (available: {available})")]
    UnknownMode { name: String, available: String },
}
