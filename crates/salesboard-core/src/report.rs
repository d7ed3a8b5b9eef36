use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Fixed price intervals used by the histogram report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PriceBand {
    UpTo100,
    UpTo200,
    UpTo300,
    UpTo400,
    UpTo500,
    UpTo600,
    UpTo700,
    UpTo800,
    UpTo900,
    Above900,
    Other,
}

/// Bands closed by an upper bound, in the order they are checked.
const BOUNDED: [(f64, PriceBand); 9] = [
    (100.0, PriceBand::UpTo100),
    (200.0, PriceBand::UpTo200),
    (300.0, PriceBand::UpTo300),
    (400.0, PriceBand::UpTo400),
    (500.0, PriceBand::UpTo500),
    (600.0, PriceBand::UpTo600),
    (700.0, PriceBand::UpTo700),
    (800.0, PriceBand::UpTo800),
    (900.0, PriceBand::UpTo900),
];

/// Lower bound of [`PriceBand::Above900`].
pub const OPEN_BAND_FLOOR: f64 = 901.0;

impl PriceBand {
    pub const ALL: [PriceBand; 11] = [
        PriceBand::UpTo100,
        PriceBand::UpTo200,
        PriceBand::UpTo300,
        PriceBand::UpTo400,
        PriceBand::UpTo500,
        PriceBand::UpTo600,
        PriceBand::UpTo700,
        PriceBand::UpTo800,
        PriceBand::UpTo900,
        PriceBand::Above900,
        PriceBand::Other,
    ];

    /// First band whose upper bound admits `price`. Prices between 900 and
    /// 901, and NaN, fall through to [`PriceBand::Other`].
    pub fn classify(price: f64) -> Self {
        BOUNDED
            .iter()
            .find(|(upper, _)| price <= *upper)
            .map(|(_, band)| *band)
            .unwrap_or(if price >= OPEN_BAND_FLOOR {
                PriceBand::Above900
            } else {
                PriceBand::Other
            })
    }

    /// `(upper bound, band)` pairs in evaluation order.
    pub fn bounded() -> &'static [(f64, PriceBand)] {
        &BOUNDED
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriceBand::UpTo100 => "0-100",
            PriceBand::UpTo200 => "101-200",
            PriceBand::UpTo300 => "201-300",
            PriceBand::UpTo400 => "301-400",
            PriceBand::UpTo500 => "401-500",
            PriceBand::UpTo600 => "501-600",
            PriceBand::UpTo700 => "601-700",
            PriceBand::UpTo800 => "701-800",
            PriceBand::UpTo900 => "801-900",
            PriceBand::Above900 => "901-above",
            PriceBand::Other => "Other",
        }
    }
}

impl fmt::Display for PriceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PriceBand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PriceBand::ALL
            .into_iter()
            .find(|band| band.label() == s)
            .ok_or_else(|| Error::UnknownBand(s.to_string()))
    }
}

impl Serialize for PriceBand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BandCount {
    #[serde(rename = "_id")]
    pub band: PriceBand,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    #[serde(rename = "_id")]
    pub category: String,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_sale_amount: f64,
    pub total_sold_items: u64,
    pub total_not_sold_items: u64,
}
