//! # Intermodulation Product Model
//!
//! Transmitters sharing a site mix in each other's output stages and
//! radiate "ghost" carriers at integer linear combinations of their
//! frequencies. Three mechanisms are modelled:
//!
//! | Mechanism            | Sources              | Patterns                               |
//! |----------------------|----------------------|----------------------------------------|
//! | 2nd order            | ordered pair `f1,f2` | `2f1 - f2`                             |
//! | 3rd order, 2 freq    | ordered pair `f1,f2` | `2f2 - f1`, `f1 + 2f2`, `2f1 + f2`     |
//! | 3rd order, 3 freq    | triple `i < j < k`   | ten fixed patterns, coefficients ±1, 2 |
//!
//! Only products inside the receiver display range are kept.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::DisplayRange;
use crate::Mhz;

// ─── Mechanisms ─────────────────────────────────────────────────────────────

/// IMD mechanism. Serialises to the group keys used in breakdown output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ImdOrder {
    #[serde(rename = "2nd_order")]
    Second,
    #[serde(rename = "3rd_order_2freq")]
    ThirdTwoFreq,
    #[serde(rename = "3rd_order_3freq")]
    ThirdThreeFreq,
}

const SECOND_ORDER_PATTERNS: &[&[i32]] = &[&[2, -1]];

const THIRD_ORDER_2FREQ_PATTERNS: &[&[i32]] = &[&[-1, 2], &[1, 2], &[2, 1]];

const THIRD_ORDER_3FREQ_PATTERNS: &[&[i32]] = &[
    &[1, -1, 1],
    &[1, 1, -1],
    &[2, -1, -1],
    &[1, 1, 1],
    &[-1, 1, 1],
    &[2, 1, -1],
    &[2, -1, 1],
    &[1, -2, 1],
    &[1, 2, -1],
    &[-1, 2, 1],
];

impl ImdOrder {
    pub const ALL: [ImdOrder; 3] = [
        ImdOrder::Second,
        ImdOrder::ThirdTwoFreq,
        ImdOrder::ThirdThreeFreq,
    ];

    /// Machine key, e.g. `3rd_order_2freq`.
    pub fn key(self) -> &'static str {
        match self {
            ImdOrder::Second => "2nd_order",
            ImdOrder::ThirdTwoFreq => "3rd_order_2freq",
            ImdOrder::ThirdThreeFreq => "3rd_order_3freq",
        }
    }

    /// Number of source frequencies per product.
    pub fn arity(self) -> usize {
        match self {
            ImdOrder::Second | ImdOrder::ThirdTwoFreq => 2,
            ImdOrder::ThirdThreeFreq => 3,
        }
    }

    /// Coefficient vectors applied to the sources, one per product.
    pub fn patterns(self) -> &'static [&'static [i32]] {
        match self {
            ImdOrder::Second => SECOND_ORDER_PATTERNS,
            ImdOrder::ThirdTwoFreq => THIRD_ORDER_2FREQ_PATTERNS,
            ImdOrder::ThirdThreeFreq => THIRD_ORDER_3FREQ_PATTERNS,
        }
    }

    /// Source tuples this mechanism draws from a combination.
    ///
    /// Two-source mechanisms use every ordered pair of distinct positions;
    /// the three-source mechanism uses every position triple `i < j < k`.
    fn source_sets(self, freqs: &[Mhz]) -> Vec<Vec<Mhz>> {
        let n = freqs.len();
        let mut sets = Vec::new();
        match self.arity() {
            2 => {
                for i in 0..n {
                    for j in 0..n {
                        if i != j {
                            sets.push(vec![freqs[i], freqs[j]]);
                        }
                    }
                }
            }
            _ => {
                for i in 0..n {
                    for j in i + 1..n {
                        for k in j + 1..n {
                            sets.push(vec![freqs[i], freqs[j], freqs[k]]);
                        }
                    }
                }
            }
        }
        sets
    }
}

impl fmt::Display for ImdOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImdOrder::Second => write!(f, "2nd order"),
            ImdOrder::ThirdTwoFreq => write!(f, "3rd order (2-freq)"),
            ImdOrder::ThirdThreeFreq => write!(f, "3rd order (3-freq)"),
        }
    }
}

// ─── Products ───────────────────────────────────────────────────────────────

/// One ghost carrier and how it was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImdProduct {
    pub order: ImdOrder,
    pub freq_mhz: Mhz,
    pub sources: Vec<Mhz>,
    pub coefficients: &'static [i32],
    /// Whether the product lies in the receiver display range.
    pub in_range: bool,
}

impl ImdProduct {
    fn mix(
        order: ImdOrder,
        sources: &[Mhz],
        coefficients: &'static [i32],
        range: &DisplayRange,
    ) -> Self {
        let wide: i64 = coefficients
            .iter()
            .zip(sources)
            .map(|(&c, &f)| i64::from(c) * i64::from(f))
            .sum();
        // Out-of-range sums saturate; they can never be in the display range.
        let freq_mhz = wide.clamp(i64::from(Mhz::MIN), i64::from(Mhz::MAX)) as Mhz;
        ImdProduct {
            order,
            freq_mhz,
            sources: sources.to_vec(),
            coefficients,
            in_range: i64::from(range.min) <= wide && wide <= i64::from(range.max),
        }
    }

    /// Human-readable arithmetic, e.g. `2×5800 - 5840`.
    pub fn formula(&self) -> String {
        let mut out = String::new();
        for (idx, (&c, &f)) in self.coefficients.iter().zip(&self.sources).enumerate() {
            let magnitude = c.abs();
            let term = if magnitude == 1 {
                f.to_string()
            } else {
                format!("{magnitude}×{f}")
            };
            match (idx, c < 0) {
                (0, false) => out.push_str(&term),
                (0, true) => {
                    out.push('-');
                    out.push_str(&term);
                }
                (_, false) => {
                    out.push_str(" + ");
                    out.push_str(&term);
                }
                (_, true) => {
                    out.push_str(" - ");
                    out.push_str(&term);
                }
            }
        }
        out
    }
}

/// Every product of one mechanism, in range or not, in generation order.
pub fn raw_products(order: ImdOrder, freqs: &[Mhz], range: &DisplayRange) -> Vec<ImdProduct> {
    order
        .source_sets(freqs)
        .iter()
        .flat_map(|sources| {
            order
                .patterns()
                .iter()
                .map(move |&pattern| ImdProduct::mix(order, sources, pattern, range))
        })
        .collect()
}

/// Products of one mechanism that fall inside the display range.
pub fn products(order: ImdOrder, freqs: &[Mhz], range: &DisplayRange) -> Vec<ImdProduct> {
    let mut out = raw_products(order, freqs, range);
    out.retain(|p| p.in_range);
    out
}

/// In-range products of all three mechanisms: 2nd order first, then
/// 3rd order two-frequency, then 3rd order three-frequency.
pub fn all_products(freqs: &[Mhz], range: &DisplayRange) -> Vec<ImdProduct> {
    ImdOrder::ALL
        .into_iter()
        .flat_map(|order| products(order, freqs, range))
        .collect()
}
