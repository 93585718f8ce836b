use clap::Args;
use serde_json::{json, Value};

use kiosk_pnl_core::calendar::{build_lease_calendar, LeaseSigning};
use kiosk_pnl_core::location::{all_year_terms, resolve_terms, LeaseYear, LocationCatalog};

/// Arguments for lease-year rent lookup
#[derive(Args)]
pub struct RentArgs {
    /// Location identifier (defaults to the catalog default)
    #[arg(long)]
    pub location: Option<String>,

    /// Lease year: "Year 1", "Year 2", "Year 3" (or 1/2/3)
    #[arg(long, default_value = "Year 1")]
    pub year: LeaseYear,
}

/// Arguments for the lease calendar
#[derive(Args)]
pub struct CalendarArgs {
    /// Location identifier (defaults to the catalog default)
    #[arg(long)]
    pub location: Option<String>,

    /// Signing month, 1-12
    #[arg(long, default_value = "8")]
    pub signing_month: u32,

    /// Signing year
    #[arg(long, default_value = "2025")]
    pub signing_year: i32,
}

pub fn run_rent(
    args: RentArgs,
    catalog: &LocationCatalog,
) -> Result<Value, Box<dyn std::error::Error>> {
    let location = catalog.resolve(args.location.as_deref())?;
    let terms = resolve_terms(location, args.year);
    Ok(json!({
        "location_id": location.id,
        "location_name": location.display_name(),
        "lease_year": terms.year,
        "rate": terms.rate,
        "rent": terms.rent,
        "renovation_months": location.renovation_months,
        "all_years": all_year_terms(location),
    }))
}

pub fn run_locations(catalog: &LocationCatalog) -> Result<Value, Box<dyn std::error::Error>> {
    let rows: Vec<Value> = catalog
        .locations
        .iter()
        .map(|loc| {
            json!({
                "id": loc.id,
                "name": loc.display_name(),
                "default": loc.id == catalog.default_id,
                "y1_rent": loc.y1_rent,
                "y2_rent": loc.y2_rent,
                "y3_rent": loc.y3_rent,
                "renovation_months": loc.renovation_months,
            })
        })
        .collect();
    Ok(Value::Array(rows))
}

pub fn run_calendar(
    args: CalendarArgs,
    catalog: &LocationCatalog,
) -> Result<Value, Box<dyn std::error::Error>> {
    let location = catalog.resolve(args.location.as_deref())?;
    let signing = LeaseSigning {
        month: args.signing_month,
        year: args.signing_year,
    };
    let calendar = build_lease_calendar(location, &signing)?;
    Ok(serde_json::to_value(calendar)?)
}
