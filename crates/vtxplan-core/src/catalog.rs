//! # FPV Band Catalog
//!
//! Static 5.8 GHz channel tables and the bandwidth modes that select them.
//!
//! | Band | Name       | Channels                        |
//! |------|------------|---------------------------------|
//! | R    | Raceband   | 5658–5917 MHz, 37 MHz spacing   |
//! | F    | Fatshark   | 5740–5880 MHz, 20 MHz spacing   |
//! | A    | Boscam A   | 5865–5725 MHz, descending       |
//! | B    | Boscam B   | 5733–5866 MHz, 19 MHz spacing   |
//! | E    | Band E     | 5705–5645, then 5885–5945 MHz   |
//!
//! The same frequency can appear in more than one band (`5880` is both R7
//! and F8). The catalog keeps every label for display and only collapses
//! duplicates by value when building the search candidate list.
//!
//! ## Usage
//!
//! ```
//! use vtxplan_core::catalog::{BandwidthMode, Catalog};
//!
//! let mode: BandwidthMode = "hdzero".parse().unwrap();
//! let catalog = Catalog::for_mode(mode);
//! assert_eq!(mode.channel_width(), 27);
//! assert_eq!(catalog.labels().describe(5880), "R7");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Mhz, PlanError};

// ─── Band Tables ────────────────────────────────────────────────────────────

type BandTable = &'static [(&'static str, &'static [(Mhz, u8)])];

/// Every band and channel usable by analog video transmitters.
pub const ANALOG_BANDS: BandTable = &[
    (
        "R",
        &[
            (5658, 1),
            (5695, 2),
            (5732, 3),
            (5769, 4),
            (5806, 5),
            (5843, 6),
            (5880, 7),
            (5917, 8),
        ],
    ),
    (
        "F",
        &[
            (5740, 1),
            (5760, 2),
            (5780, 3),
            (5800, 4),
            (5820, 5),
            (5840, 6),
            (5860, 7),
            (5880, 8),
        ],
    ),
    (
        "A",
        &[
            (5865, 1),
            (5845, 2),
            (5825, 3),
            (5805, 4),
            (5785, 5),
            (5765, 6),
            (5745, 7),
            (5725, 8),
        ],
    ),
    (
        "B",
        &[
            (5733, 1),
            (5752, 2),
            (5771, 3),
            (5790, 4),
            (5809, 5),
            (5828, 6),
            (5847, 7),
            (5866, 8),
        ],
    ),
    (
        "E",
        &[
            (5705, 1),
            (5685, 2),
            (5665, 3),
            (5645, 4),
            (5885, 5),
            (5905, 6),
            (5925, 7),
            (5945, 8),
        ],
    ),
];

/// Channels HDZero VTXs can tune: all of Raceband, F1/F4 and E1.
pub const HDZERO_BANDS: BandTable = &[
    (
        "R",
        &[
            (5658, 1),
            (5695, 2),
            (5732, 3),
            (5769, 4),
            (5806, 5),
            (5843, 6),
            (5880, 7),
            (5917, 8),
        ],
    ),
    ("F", &[(5740, 1), (5800, 4)]),
    ("E", &[(5705, 1)]),
];

// ─── Bandwidth Modes ────────────────────────────────────────────────────────

/// Transmission system; fixes the occupied channel width and which band
/// table is searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BandwidthMode {
    /// Traditional analog FPV.
    #[default]
    Analog,
    /// HDZero narrow mode.
    HdzeroNarrow,
    /// HDZero standard mode.
    Hdzero,
    /// DJI digital FPV (approximate width).
    Dji,
}

impl BandwidthMode {
    pub const ALL: [BandwidthMode; 4] = [
        BandwidthMode::Analog,
        BandwidthMode::HdzeroNarrow,
        BandwidthMode::Hdzero,
        BandwidthMode::Dji,
    ];

    /// Occupied bandwidth in MHz.
    pub fn channel_width(self) -> Mhz {
        match self {
            BandwidthMode::Analog => 17,
            BandwidthMode::HdzeroNarrow => 17,
            BandwidthMode::Hdzero => 27,
            BandwidthMode::Dji => 20,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BandwidthMode::Analog => "analog",
            BandwidthMode::HdzeroNarrow => "hdzero-narrow",
            BandwidthMode::Hdzero => "hdzero",
            BandwidthMode::Dji => "dji",
        }
    }

    /// Whether this mode is restricted to the HDZero channel table.
    pub fn uses_hdzero_table(self) -> bool {
        matches!(self, BandwidthMode::Hdzero | BandwidthMode::HdzeroNarrow)
    }

    fn available() -> String {
        Self::ALL
            .iter()
            .map(|m| m.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for BandwidthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BandwidthMode {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.name() == wanted)
            .ok_or_else(|| PlanError::UnknownMode {
                name: s.to_string(),
                available: Self::available(),
            })
    }
}

// ─── Catalog ────────────────────────────────────────────────────────────────

/// One tunable channel within a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub freq_mhz: Mhz,
    pub number: u8,
}

/// A named band: short label plus channels in table order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub name: String,
    pub channels: Vec<Channel>,
}

/// Ordered set of bands the planner may draw channels from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    bands: Vec<Band>,
}

impl Catalog {
    pub fn new(bands: Vec<Band>) -> Self {
        Catalog { bands }
    }

    pub fn analog() -> Self {
        Self::from_table(ANALOG_BANDS)
    }

    pub fn hdzero() -> Self {
        Self::from_table(HDZERO_BANDS)
    }

    /// The built-in table matching a bandwidth mode.
    pub fn for_mode(mode: BandwidthMode) -> Self {
        if mode.uses_hdzero_table() {
            Self::hdzero()
        } else {
            Self::analog()
        }
    }

    fn from_table(table: BandTable) -> Self {
        let bands = table
            .iter()
            .map(|(name, channels)| Band {
                name: (*name).to_string(),
                channels: channels
                    .iter()
                    .map(|&(freq_mhz, number)| Channel { freq_mhz, number })
                    .collect(),
            })
            .collect();
        Catalog { bands }
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Total number of (band, channel) entries, duplicates included.
    pub fn channel_count(&self) -> usize {
        self.bands.iter().map(|b| b.channels.len()).sum()
    }

    /// Every frequency in the catalog, ascending, each value once.
    pub fn unique_frequencies(&self) -> Vec<Mhz> {
        let mut freqs: Vec<Mhz> = self
            .bands
            .iter()
            .flat_map(|b| b.channels.iter().map(|c| c.freq_mhz))
            .collect();
        freqs.sort_unstable();
        freqs.dedup();
        freqs
    }

    /// Frequency → labels map, keeping every band that lists the frequency.
    pub fn labels(&self) -> FrequencyLabels {
        let mut map: BTreeMap<Mhz, Vec<ChannelLabel>> = BTreeMap::new();
        for band in &self.bands {
            for ch in &band.channels {
                map.entry(ch.freq_mhz).or_default().push(ChannelLabel {
                    band: band.name.clone(),
                    number: ch.number,
                });
            }
        }
        FrequencyLabels { map }
    }
}

// ─── Labels ─────────────────────────────────────────────────────────────────

/// Band + channel number, rendered as e.g. `R7`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelLabel {
    pub band: String,
    pub number: u8,
}

impl fmt::Display for ChannelLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.band, self.number)
    }
}

/// Lookup from frequency to every (band, channel) that uses it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrequencyLabels {
    map: BTreeMap<Mhz, Vec<ChannelLabel>>,
}

impl FrequencyLabels {
    pub fn get(&self, freq: Mhz) -> &[ChannelLabel] {
        self.map.get(&freq).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Band of the first label for `freq`, if any.
    pub fn primary_band(&self, freq: Mhz) -> Option<&str> {
        self.get(freq).first().map(|l| l.band.as_str())
    }

    /// `R7/F8` style label; `?` for a frequency with no catalog entry.
    pub fn describe(&self, freq: Mhz) -> String {
        let labels = self.get(freq);
        if labels.is_empty() {
            return "?".to_string();
        }
        labels
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("/")
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
