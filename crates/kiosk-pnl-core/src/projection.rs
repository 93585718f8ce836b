//! Full recompute of a kiosk projection.
//!
//! Resolves the lease-year rent for the selected location, merges it into
//! the cost settings, runs the P&L, then derives the cost breakdown, ROI and
//! recovery timeline from that single P&L. Every call starts from scratch;
//! callers rebuild the input on each edit rather than mutating shared state.

use std::time::Instant;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::breakdown::{build_cost_breakdown, CostBreakdownEntry, CostComponents};
use crate::calendar::{build_lease_calendar, LeaseCalendar, LeaseSigning};
use crate::format::{format_currency, summary_rows, SummaryRow};
use crate::location::{all_year_terms, resolve_terms, LeaseYear, LocationCatalog, YearTerms};
use crate::pnl::{calculate_pnl, CostSettings, PnlOutput, RevenueSettings, StoreFees};
use crate::roi::{build_recovery_timeline, calculate_roi, RecoveryPoint, RoiMetrics};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::KioskPnlResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    /// Catalog identifier; the catalog default when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(default)]
    pub lease_year: LeaseYear,
    /// Signing month/year, used only to date the lease calendar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing: Option<LeaseSigning>,
    #[serde(default)]
    pub revenue: RevenueSettings,
    #[serde(default)]
    pub costs: CostSettings,
    #[serde(default)]
    pub fees: StoreFees,
    #[serde(default = "default_initial_investment")]
    pub initial_investment: Money,
}

fn default_initial_investment() -> Money {
    dec!(150000)
}

impl Default for ProjectionInput {
    fn default() -> Self {
        ProjectionInput {
            location_id: None,
            lease_year: LeaseYear::default(),
            signing: None,
            revenue: RevenueSettings::default(),
            costs: CostSettings::default(),
            fees: StoreFees::default(),
            initial_investment: default_initial_investment(),
        }
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionOutput {
    pub location_id: String,
    pub location_name: String,
    pub lease_year: LeaseYear,
    /// Rent and rate applied to this projection
    pub terms: YearTerms,
    /// Rate and rent for every lease year, for comparison
    pub all_years: Vec<YearTerms>,
    /// Cost settings with the resolved rent merged in
    pub costs: CostSettings,
    pub pnl: PnlOutput,
    /// adjusted_margin - profit_margin
    pub margin_uplift: Percent,
    pub cost_breakdown: Vec<CostBreakdownEntry>,
    /// Absent when the initial investment is zero
    pub roi: Option<RoiMetrics>,
    pub recovery_timeline: Vec<RecoveryPoint>,
    pub renovation_note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lease_calendar: Option<LeaseCalendar>,
    pub summary: Vec<SummaryRow>,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

pub fn run_projection(
    catalog: &LocationCatalog,
    input: &ProjectionInput,
) -> KioskPnlResult<ComputationOutput<ProjectionOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let location = catalog.resolve(input.location_id.as_deref())?;
    let year = input.lease_year;

    let terms = resolve_terms(location, year);
    debug!(location = %location.id, %year, rent = %terms.rent, rate = %terms.rate, "resolved lease terms");

    let costs = input.costs.with_rent(terms.rent);
    let pnl = calculate_pnl(&input.revenue, &costs, &input.fees, year, location)?;

    if pnl.monthly_sales <= Decimal::ZERO {
        warnings.push("Monthly sales are zero or negative; margins are reported as 0".to_string());
    }
    if !pnl.is_profitable() {
        warn!(net_profit = %pnl.net_profit, "business is not profitable");
        warnings.push(
            "Business is not currently profitable; the initial investment cannot be recovered"
                .to_string(),
        );
    }

    let cost_breakdown = build_cost_breakdown(
        &CostComponents::from_pnl(&costs, &pnl),
        pnl.total_fixed_costs,
    )?;

    let roi = if input.initial_investment.is_zero() {
        warnings.push("Initial investment is zero; ROI metrics are undefined".to_string());
        None
    } else {
        Some(calculate_roi(pnl.net_profit, input.initial_investment)?)
    };
    let recovery_timeline = build_recovery_timeline(pnl.net_profit, input.initial_investment)?;

    let lease_calendar = input
        .signing
        .as_ref()
        .map(|signing| build_lease_calendar(location, signing))
        .transpose()?;

    let output = ProjectionOutput {
        location_id: location.id.clone(),
        location_name: location.display_name(),
        lease_year: year,
        terms,
        all_years: all_year_terms(location),
        margin_uplift: pnl.margin_uplift(),
        renovation_note: renovation_note(year, location.renovation_months, &terms, &pnl),
        summary: summary_rows(&input.revenue, &costs, &pnl),
        costs,
        pnl,
        cost_breakdown,
        roi,
        recovery_timeline,
        lease_calendar,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Monthly P&L with Year 1 renovation amortisation, cost breakdown and simple payback ROI",
        &serde_json::json!({
            "location": output.location_id,
            "lease_year": year.to_string(),
            "monthly_rent": terms.rent.to_string(),
            "renovation_amortisation_months": 12,
            "initial_investment": input.initial_investment.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn renovation_note(
    year: LeaseYear,
    renovation_months: u32,
    terms: &YearTerms,
    pnl: &PnlOutput,
) -> String {
    if year.has_renovation_benefit() && pnl.monthly_renovation_benefit > Decimal::ZERO {
        format!(
            "Year 1 renovation savings: {} total ({} months × {}) = +{} monthly benefit",
            format_currency(pnl.renovation_savings),
            renovation_months,
            format_currency(terms.rent),
            format_currency(pnl.monthly_renovation_benefit),
        )
    } else if year.has_renovation_benefit() {
        "No renovation benefit calculated".to_string()
    } else {
        format!("{year}: no renovation benefit (rent-free period was in Year 1 only)")
    }
}
