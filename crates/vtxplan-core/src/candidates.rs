//! Candidate preparation and the channel overlap rule.
//!
//! A channel centred on `f` occupies `[f - width/2, f + width/2]`. Only
//! channels whose whole span fits in the search range become candidates,
//! so every combination built from them is in range as well. Spans are
//! compared in doubled units to stay in integer arithmetic with odd widths.

use serde::Serialize;

use crate::config::SearchConfig;
use crate::Mhz;

/// Decides whether two channel centres are far enough apart to coexist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapFilter {
    pub channel_width: Mhz,
    pub guard_gap: Mhz,
}

impl OverlapFilter {
    pub fn new(channel_width: Mhz, guard_gap: Mhz) -> Self {
        OverlapFilter {
            channel_width,
            guard_gap,
        }
    }

    /// Smallest centre-to-centre distance that does not overlap.
    pub fn min_separation(&self) -> i64 {
        i64::from(self.channel_width) + i64::from(self.guard_gap)
    }

    pub fn overlaps(&self, a: Mhz, b: Mhz) -> bool {
        i64::from(a.abs_diff(b)) < self.min_separation()
    }
}

impl From<&SearchConfig> for OverlapFilter {
    fn from(cfg: &SearchConfig) -> Self {
        OverlapFilter::new(cfg.channel_width, cfg.guard_gap)
    }
}

/// Whether the channel centred on `freq` lies entirely in `[min, max]`.
pub fn fits_in_range(freq: Mhz, channel_width: Mhz, min_freq: Mhz, max_freq: Mhz) -> bool {
    let (freq, width) = (i64::from(freq), i64::from(channel_width));
    2 * freq - width >= 2 * i64::from(min_freq) && 2 * freq + width <= 2 * i64::from(max_freq)
}

/// Sorted, value-unique frequencies whose full span lies in the search range.
pub fn filter_candidates<I>(frequencies: I, cfg: &SearchConfig) -> Vec<Mhz>
where
    I: IntoIterator<Item = Mhz>,
{
    let mut out: Vec<Mhz> = frequencies
        .into_iter()
        .filter(|&f| fits_in_range(f, cfg.channel_width, cfg.min_freq, cfg.max_freq))
        .collect();
    out.sort_unstable();
    out.dedup();
    out
}

/// Lowest and highest centre frequency a channel may use in the range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelEdges {
    pub low: f64,
    pub high: f64,
}

impl ChannelEdges {
    pub fn of(cfg: &SearchConfig) -> Self {
        let half = f64::from(cfg.channel_width) / 2.0;
        ChannelEdges {
            low: f64::from(cfg.min_freq) + half,
            high: f64::from(cfg.max_freq) - half,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search(width: Mhz) -> SearchConfig {
        SearchConfig {
            channel_width: width,
            ..SearchConfig::default()
        }
    }

    #[test]
    fn overlap_boundary_is_exclusive() {
        let filter = OverlapFilter::new(17, 1);
        assert_eq!(filter.min_separation(), 18);
        assert!(filter.overlaps(5800, 5817));
        assert!(!filter.overlaps(5800, 5818));
        assert!(!filter.overlaps(5818, 5800));
        assert!(filter.overlaps(5800, 5800));
    }

    #[test]
    fn guard_gap_is_configurable() {
        let filter = OverlapFilter::new(17, 5);
        assert!(filter.overlaps(5800, 5821));
        assert!(!filter.overlaps(5800, 5822));
    }

    #[test]
    fn span_must_fit_inside_range() {
        // 5661 ± 8.5 → [5652.5, 5669.5]
        assert!(fits_in_range(5661, 17, 5640, 5830));
        // 5645 ± 8.5 → lower edge 5636.5 < 5640
        assert!(!fits_in_range(5645, 17, 5640, 5830));
        // Upper edge exactly on max is allowed.
        assert!(fits_in_range(5820, 20, 5640, 5830));
        assert!(!fits_in_range(5821, 20, 5640, 5830));
    }

    #[test]
    fn extreme_values_do_not_overflow() {
        assert!(fits_in_range(5800, 17, 5640, 2_000_000_000));
        assert!(!fits_in_range(Mhz::MAX, 17, 5640, Mhz::MAX));
        assert!(!fits_in_range(Mhz::MIN, 17, Mhz::MIN, 5830));

        let filter = OverlapFilter::new(17, 1);
        assert!(!filter.overlaps(Mhz::MIN, Mhz::MAX));
        let wide = OverlapFilter::new(Mhz::MAX, 1);
        assert_eq!(wide.min_separation(), 1 << 31);
        assert!(wide.overlaps(0, Mhz::MAX));
    }

    #[test]
    fn filter_sorts_and_dedups() {
        let freqs = [5880, 5800, 5645, 5661, 5800, 5740];
        let cfg = SearchConfig {
            max_freq: 5900,
            ..search(17)
        };
        assert_eq!(filter_candidates(freqs, &cfg), vec![5661, 5740, 5800, 5880]);
    }

    #[test]
    fn filter_may_be_empty() {
        let cfg = SearchConfig {
            min_freq: 5000,
            max_freq: 5010,
            ..search(17)
        };
        assert!(filter_candidates([5658, 5695], &cfg).is_empty());
    }

    #[test]
    fn channel_edges_use_half_width() {
        let edges = ChannelEdges::of(&search(17));
        assert_eq!(edges.low, 5648.5);
        assert_eq!(edges.high, 5821.5);
    }
}
