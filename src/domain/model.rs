use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A price quoted for one serve size, in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub serve_size_id: i64,
    pub amount_minor: i64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beer {
    pub id: i64,
    pub name: String,
    pub brewery: String,
    pub style: String,
    #[serde(default)]
    pub abv: Option<f64>,
    #[serde(default)]
    pub badge_asset_id: Option<i64>,
    #[serde(default)]
    pub is_guest: Option<bool>,
    #[serde(default)]
    pub color_hex: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub prices: Vec<Price>,
}

/// Tri-state reading of `Beer::is_guest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuestStatus {
    Guest,
    House,
    Unknown,
}

impl Beer {
    pub fn guest_status(&self) -> GuestStatus {
        match self.is_guest {
            Some(true) => GuestStatus::Guest,
            Some(false) => GuestStatus::House,
            None => GuestStatus::Unknown,
        }
    }

    pub fn has_prices(&self) -> bool {
        !self.prices.is_empty()
    }

    pub fn price_for(&self, serve_size_id: i64) -> Option<&Price> {
        self.prices.iter().find(|p| p.serve_size_id == serve_size_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TapStatus {
    On,
    Off,
    ComingSoon,
    Kicked,
}

impl TapStatus {
    pub const ALL: [TapStatus; 4] = [
        TapStatus::On,
        TapStatus::Off,
        TapStatus::ComingSoon,
        TapStatus::Kicked,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TapStatus::On => "on",
            TapStatus::Off => "off",
            TapStatus::ComingSoon => "coming_soon",
            TapStatus::Kicked => "kicked",
        }
    }

    /// Only `on` means the tap is actively pouring; whether an `off` or
    /// `kicked` tap still lists its last beer is up to the backend.
    pub fn is_pouring(self) -> bool {
        matches!(self, TapStatus::On)
    }
}

impl fmt::Display for TapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tap {
    pub tap_number: i64,
    pub status: TapStatus,
    #[serde(default)]
    pub beer: Option<Beer>,
}

impl Tap {
    /// No beer assigned, independent of status.
    pub fn is_empty(&self) -> bool {
        self.beer.is_none()
    }
}

/// All taps of one venue, as delivered in a single payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TapList {
    pub taps: Vec<Tap>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TapSummary {
    pub total: usize,
    pub by_status: BTreeMap<TapStatus, usize>,
    pub empty: usize,
    pub unpriced: usize,
}

impl TapList {
    pub fn new(taps: Vec<Tap>) -> Self {
        Self { taps }
    }

    pub fn len(&self) -> usize {
        self.taps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    pub fn find(&self, tap_number: i64) -> Option<&Tap> {
        self.taps.iter().find(|t| t.tap_number == tap_number)
    }

    pub fn summary(&self) -> TapSummary {
        let mut summary = TapSummary {
            total: self.taps.len(),
            ..TapSummary::default()
        };
        for tap in &self.taps {
            *summary.by_status.entry(tap.status).or_insert(0) += 1;
            match &tap.beer {
                None => summary.empty += 1,
                Some(beer) if !beer.has_prices() => summary.unpriced += 1,
                Some(_) => {}
            }
        }
        summary
    }
}

// `prices: null` 與缺少欄位同義
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
