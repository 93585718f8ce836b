//! Location catalog and lease-year rent/rate resolution.
//!
//! A location carries a per-sqft rate and the resulting monthly rent for each
//! of the three lease years, plus the length of the rent-free renovation
//! period granted at lease start. Locations are looked up by a stable
//! identifier; an unknown identifier is a `LocationNotFound` error rather than
//! a silent fallback to whichever entry happens to be first.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::KioskPnlError;
use crate::types::Money;
use crate::KioskPnlResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Identifier of the single location shipped in the built-in catalog.
pub const DEFAULT_LOCATION_ID: &str = "lg-15-14";

/// A rent-free period longer than one lease year makes no sense for the
/// Year 1 amortisation.
const MAX_RENOVATION_MONTHS: u32 = 12;

// ---------------------------------------------------------------------------
// Lease year
// ---------------------------------------------------------------------------

/// One of the three annual periods of the rental agreement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaseYear {
    #[default]
    #[serde(rename = "Year 1")]
    Year1,
    #[serde(rename = "Year 2")]
    Year2,
    #[serde(rename = "Year 3")]
    Year3,
}

impl LeaseYear {
    pub const ALL: [LeaseYear; 3] = [LeaseYear::Year1, LeaseYear::Year2, LeaseYear::Year3];

    /// 1-based ordinal of the year within the lease.
    pub fn ordinal(self) -> u32 {
        match self {
            LeaseYear::Year1 => 1,
            LeaseYear::Year2 => 2,
            LeaseYear::Year3 => 3,
        }
    }

    /// The renovation benefit is only recognised in the first lease year.
    pub fn has_renovation_benefit(self) -> bool {
        self == LeaseYear::Year1
    }
}

impl fmt::Display for LeaseYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Year {}", self.ordinal())
    }
}

impl FromStr for LeaseYear {
    type Err = KioskPnlError;

    /// Accepts "Year 1", "year1", "y1" and "1" (and the same for 2 and 3).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        let digits = normalized
            .strip_prefix("year")
            .or_else(|| normalized.strip_prefix('y'))
            .unwrap_or(&normalized);
        match digits {
            "1" => Ok(LeaseYear::Year1),
            "2" => Ok(LeaseYear::Year2),
            "3" => Ok(LeaseYear::Year3),
            _ => Err(KioskPnlError::InvalidInput {
                field: "lease_year".into(),
                reason: format!("'{s}' is not one of Year 1, Year 2, Year 3"),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Location record
// ---------------------------------------------------------------------------

/// Immutable reference record for a rentable unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    /// Stable catalog identifier, e.g. "lg-15-14"
    pub id: String,
    /// Unit label as shown on the floor plan
    pub unit: String,
    /// Floor area in square feet
    pub sqft: Decimal,
    pub y1_rate: Money,
    pub y2_rate: Money,
    pub y3_rate: Money,
    pub y1_rent: Money,
    pub y2_rent: Money,
    pub y3_rent: Money,
    /// Rent-free months granted at lease start for fit-out
    pub renovation_months: u32,
}

impl LocationInfo {
    /// Build a record whose monthly rents are `sqft × rate` for each year.
    pub fn from_rates(
        id: impl Into<String>,
        unit: impl Into<String>,
        sqft: Decimal,
        rates: [Money; 3],
        renovation_months: u32,
    ) -> Self {
        let [y1_rate, y2_rate, y3_rate] = rates;
        LocationInfo {
            id: id.into(),
            unit: unit.into(),
            sqft,
            y1_rate,
            y2_rate,
            y3_rate,
            y1_rent: sqft * y1_rate,
            y2_rent: sqft * y2_rate,
            y3_rent: sqft * y3_rate,
            renovation_months,
        }
    }

    /// Human-readable label, e.g. "LG 15 + 14 (666 sqft)".
    pub fn display_name(&self) -> String {
        format!("{} ({} sqft)", self.unit, self.sqft.normalize())
    }

    fn validate(&self) -> KioskPnlResult<()> {
        if self.id.trim().is_empty() {
            return Err(KioskPnlError::InvalidInput {
                field: "id".into(),
                reason: "Location identifier cannot be empty".into(),
            });
        }
        if self.sqft <= Decimal::ZERO {
            return Err(KioskPnlError::InvalidInput {
                field: format!("{}.sqft", self.id),
                reason: "Floor area must be positive".into(),
            });
        }
        for year in LeaseYear::ALL {
            let terms = resolve_terms(self, year);
            if terms.rate < Decimal::ZERO || terms.rent < Decimal::ZERO {
                return Err(KioskPnlError::InvalidInput {
                    field: format!("{}.y{}", self.id, year.ordinal()),
                    reason: "Rate and rent cannot be negative".into(),
                });
            }
        }
        if self.renovation_months > MAX_RENOVATION_MONTHS {
            return Err(KioskPnlError::InvalidInput {
                field: format!("{}.renovation_months", self.id),
                reason: format!("Renovation period cannot exceed {MAX_RENOVATION_MONTHS} months"),
            });
        }
        Ok(())
    }
}

/// Rent and per-sqft rate applicable to one lease year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearTerms {
    pub year: LeaseYear,
    pub rate: Money,
    pub rent: Money,
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Rent and rate of `location` for `year`.
pub fn resolve_terms(location: &LocationInfo, year: LeaseYear) -> YearTerms {
    let (rate, rent) = match year {
        LeaseYear::Year1 => (location.y1_rate, location.y1_rent),
        LeaseYear::Year2 => (location.y2_rate, location.y2_rent),
        LeaseYear::Year3 => (location.y3_rate, location.y3_rent),
    };
    YearTerms { year, rate, rent }
}

pub fn current_rent(location: &LocationInfo, year: LeaseYear) -> Money {
    resolve_terms(location, year).rent
}

pub fn current_rate(location: &LocationInfo, year: LeaseYear) -> Money {
    resolve_terms(location, year).rate
}

/// Terms for all three years, in lease order.
pub fn all_year_terms(location: &LocationInfo) -> Vec<YearTerms> {
    LeaseYear::ALL
        .iter()
        .map(|year| resolve_terms(location, *year))
        .collect()
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Set of rentable locations with an explicit default entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCatalog {
    pub default_id: String,
    pub locations: Vec<LocationInfo>,
}

impl LocationCatalog {
    pub fn get(&self, id: &str) -> KioskPnlResult<&LocationInfo> {
        self.locations
            .iter()
            .find(|loc| loc.id == id)
            .ok_or_else(|| KioskPnlError::LocationNotFound(id.to_string()))
    }

    pub fn default_location(&self) -> KioskPnlResult<&LocationInfo> {
        self.get(&self.default_id)
    }

    /// Look up `id`, or the default entry when no identifier is given.
    pub fn resolve(&self, id: Option<&str>) -> KioskPnlResult<&LocationInfo> {
        match id {
            Some(id) => self.get(id),
            None => self.default_location(),
        }
    }

    pub fn ids(&self) -> Vec<&str> {
        self.locations.iter().map(|loc| loc.id.as_str()).collect()
    }

    /// Check a catalog loaded from configuration before it is used.
    pub fn validate(&self) -> KioskPnlResult<()> {
        if self.locations.is_empty() {
            return Err(KioskPnlError::InvalidInput {
                field: "locations".into(),
                reason: "Catalog must contain at least one location".into(),
            });
        }

        let mut seen = HashSet::new();
        for loc in &self.locations {
            loc.validate()?;
            if !seen.insert(loc.id.as_str()) {
                return Err(KioskPnlError::InvalidInput {
                    field: "locations".into(),
                    reason: format!("Duplicate location identifier '{}'", loc.id),
                });
            }
        }

        self.default_location().map(|_| ())
    }
}

impl Default for LocationCatalog {
    fn default() -> Self {
        default_catalog()
    }
}

/// The built-in catalog: a single 666 sqft unit on the lower ground floor.
pub fn default_catalog() -> LocationCatalog {
    LocationCatalog {
        default_id: DEFAULT_LOCATION_ID.to_string(),
        locations: vec![LocationInfo::from_rates(
            DEFAULT_LOCATION_ID,
            "LG 15 + 14",
            dec!(666),
            [dec!(8.50), dec!(9.00), dec!(9.50)],
            3,
        )],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
