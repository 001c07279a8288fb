//! Channel planning for simultaneous FPV video transmitters.
//!
//! This crate contains:
//! - **Catalog**: named 5.8 GHz band tables and bandwidth modes
//! - **Candidates**: range filtering and the channel overlap rule
//! - **Enumerate**: exhaustive search for non-overlapping channel sets
//! - **IMD**: 2nd/3rd-order intermodulation product model
//! - **Scoring**: enhanced and legacy interference ratings
//! - **Ranking**: stable descending ranking of scored channel sets
//! - **Planner**: end-to-end orchestration producing a [`planner::PlanReport`]

pub mod candidates;
pub mod catalog;
pub mod config;
pub mod enumerate;
pub mod error;
pub mod imd;
pub mod planner;
pub mod ranking;
pub mod scoring;

pub use error::PlanError;

/// Frequency in MHz.
///
/// Signed so that IMD arithmetic (`2*f1 - f2 - f3`, ...) can go negative
/// before the display-range check discards it.
pub type Mhz = i32;

/// A set of simultaneously used channel centre frequencies, in ascending
/// catalog order.
pub type Combination = Vec<Mhz>;
