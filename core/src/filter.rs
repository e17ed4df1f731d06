//! Player search criteria and their query-string form.

use serde::{Deserialize, Serialize};

use crate::error::FilterError;
use crate::types::{Nationality, Position};

pub const MIN_OVERALL: u8 = 1;
pub const MAX_OVERALL: u8 = 99;

/// Order of the player search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "desc")]
    OverallDescending,
    #[serde(rename = "asc")]
    OverallAscending,
}

impl SortOrder {
    /// Display order of the sort rows.
    pub const ALL: [SortOrder; 2] = [SortOrder::OverallDescending, SortOrder::OverallAscending];

    pub fn query_value(&self) -> &'static str {
        match self {
            SortOrder::OverallDescending => "desc",
            SortOrder::OverallAscending => "asc",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SortOrder::OverallDescending => "Overall: high to low",
            SortOrder::OverallAscending => "Overall: low to high",
        }
    }
}

/// Inclusive overall rating bounds, always within `1..=99` and non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOverallRange")]
pub struct OverallRange {
    min: u8,
    max: u8,
}

impl OverallRange {
    pub fn new(min: u8, max: u8) -> Result<Self, FilterError> {
        for bound in [min, max] {
            if !(MIN_OVERALL..=MAX_OVERALL).contains(&bound) {
                return Err(FilterError::RatingOutOfBounds(bound));
            }
        }
        if min > max {
            return Err(FilterError::EmptyRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u8 {
        self.min
    }

    pub fn max(&self) -> u8 {
        self.max
    }
}

#[derive(Deserialize)]
struct RawOverallRange {
    min: u8,
    max: u8,
}

impl TryFrom<RawOverallRange> for OverallRange {
    type Error = FilterError;

    fn try_from(raw: RawOverallRange) -> Result<Self, Self::Error> {
        OverallRange::new(raw.min, raw.max)
    }
}

impl Default for OverallRange {
    fn default() -> Self {
        Self {
            min: MIN_OVERALL,
            max: MAX_OVERALL,
        }
    }
}

/// User-selected constraints for `GET /players/search`.
///
/// Fields missing from a serialized filter take their default.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerFilterData {
    pub nationality: Option<Nationality>,
    pub position: Option<Position>,
    pub overall: OverallRange,
    pub sort: SortOrder,
}

impl PlayerFilterData {
    /// Query parameters in a fixed order. Unset criteria are omitted.
    pub fn parameters(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(5);
        if let Some(nationality) = &self.nationality {
            params.push(("nationality".to_string(), nationality.id.clone()));
        }
        if let Some(position) = self.position {
            params.push(("position".to_string(), position.code().to_string()));
        }
        params.push(("ovr_min".to_string(), self.overall.min().to_string()));
        params.push(("ovr_max".to_string(), self.overall.max().to_string()));
        params.push(("sort".to_string(), self.sort.query_value().to_string()));
        params
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}
