use std::str::FromStr;

use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use kiosk_pnl_core::breakdown::CostComponents;
use kiosk_pnl_core::location::{default_catalog, LeaseYear, LocationCatalog};
use kiosk_pnl_core::pnl::{CostSettings, RevenueSettings, StoreFees};
use kiosk_pnl_core::types::Money;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_decimal(field: &str, text: &str) -> NapiResult<Decimal> {
    Decimal::from_str(text.trim())
        .map_err(|e| napi::Error::from_reason(format!("{field}: {e}")))
}

/// The built-in catalog, or the supplied JSON catalog after validation.
fn catalog_from(catalog_json: Option<String>) -> NapiResult<LocationCatalog> {
    let catalog = match catalog_json {
        Some(json) => serde_json::from_str(&json).map_err(to_napi_error)?,
        None => default_catalog(),
    };
    catalog.validate().map_err(to_napi_error)?;
    Ok(catalog)
}

// ---------------------------------------------------------------------------
// Location catalog
// ---------------------------------------------------------------------------

#[napi]
pub fn list_locations(catalog_json: Option<String>) -> NapiResult<String> {
    let catalog = catalog_from(catalog_json)?;
    serde_json::to_string(&catalog).map_err(to_napi_error)
}

#[napi]
pub fn resolve_rent(
    location_id: Option<String>,
    lease_year: String,
    catalog_json: Option<String>,
) -> NapiResult<String> {
    let catalog = catalog_from(catalog_json)?;
    let location = catalog
        .resolve(location_id.as_deref())
        .map_err(to_napi_error)?;
    let year = LeaseYear::from_str(&lease_year).map_err(to_napi_error)?;
    let terms = kiosk_pnl_core::location::resolve_terms(location, year);
    serde_json::to_string(&terms).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// P&L and breakdown
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct PnlRequest {
    #[serde(default)]
    location_id: Option<String>,
    lease_year: LeaseYear,
    revenue: RevenueSettings,
    /// Rent must already be merged in for the selected year
    costs: CostSettings,
    fees: StoreFees,
}

#[napi]
pub fn calculate_pnl(input_json: String, catalog_json: Option<String>) -> NapiResult<String> {
    let catalog = catalog_from(catalog_json)?;
    let req: PnlRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = kiosk_pnl_core::pnl::calculate_pnl_in_catalog(
        &catalog,
        req.location_id.as_deref(),
        &req.revenue,
        &req.costs,
        &req.fees,
        req.lease_year,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct BreakdownRequest {
    components: CostComponents,
    total_fixed_costs: Money,
}

#[napi]
pub fn cost_breakdown(input_json: String) -> NapiResult<String> {
    let req: BreakdownRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        kiosk_pnl_core::breakdown::build_cost_breakdown(&req.components, req.total_fixed_costs)
            .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// ROI
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_roi(net_profit: String, initial_investment: String) -> NapiResult<String> {
    let net_profit = parse_decimal("net_profit", &net_profit)?;
    let initial_investment = parse_decimal("initial_investment", &initial_investment)?;
    let output = kiosk_pnl_core::roi::calculate_roi(net_profit, initial_investment)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn recovery_timeline(net_profit: String, initial_investment: String) -> NapiResult<String> {
    let net_profit = parse_decimal("net_profit", &net_profit)?;
    let initial_investment = parse_decimal("initial_investment", &initial_investment)?;
    let output = kiosk_pnl_core::roi::build_recovery_timeline(net_profit, initial_investment)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Full projection
// ---------------------------------------------------------------------------

#[napi]
pub fn run_projection(input_json: String, catalog_json: Option<String>) -> NapiResult<String> {
    let catalog = catalog_from(catalog_json)?;
    let input: kiosk_pnl_core::projection::ProjectionInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        kiosk_pnl_core::projection::run_projection(&catalog, &input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

#[napi]
pub fn format_currency(amount: String) -> NapiResult<String> {
    let amount = parse_decimal("amount", &amount)?;
    Ok(kiosk_pnl_core::format::format_currency(amount))
}

#[napi]
pub fn format_percentage(percentage: String) -> NapiResult<String> {
    let percentage = parse_decimal("percentage", &percentage)?;
    Ok(kiosk_pnl_core::format::format_percentage(percentage))
}

