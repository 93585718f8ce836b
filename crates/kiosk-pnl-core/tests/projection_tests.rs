use kiosk_pnl_core::breakdown::CostCategory;
use kiosk_pnl_core::calendar::LeaseSigning;
use kiosk_pnl_core::location::{
    current_rent, default_catalog, LeaseYear, LocationCatalog, LocationInfo,
};
use kiosk_pnl_core::pnl::{calculate_pnl_in_catalog, CostSettings, RevenueSettings, StoreFees};
use kiosk_pnl_core::projection::{run_projection, ProjectionInput};
use kiosk_pnl_core::KioskPnlError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Input parsing
// ===========================================================================

#[test]
fn test_json_input_with_defaults() {
    let json = r#"{ "lease_year": "Year 2" }"#;
    let input: ProjectionInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.lease_year, LeaseYear::Year2);
    assert_eq!(input.initial_investment, dec!(150000));
    assert_eq!(input.revenue.transactions_per_day, dec!(20));
    assert_eq!(input.fees.usd_to_rm, dec!(4.28));
}

#[test]
fn test_json_input_with_numeric_values() {
    let json = r#"{
        "lease_year": "Year 1",
        "signing": { "month": 8, "year": 2025 },
        "revenue": { "transactions_per_day": 30, "avg_transaction_value": 18.5, "days_open": 26 },
        "costs": { "employee_count": 2, "employee_salary": 1700, "electricity": 350, "water": 90 },
        "fees": { "tech_fee_usd": 150, "usd_to_rm": 4.4, "royalty_percent": 6, "marketing_percent": 1 },
        "initial_investment": 120000
    }"#;
    let input: ProjectionInput = serde_json::from_str(json).unwrap();
    let out = run_projection(&default_catalog(), &input).unwrap();
    let r = &out.result;

    // 30 × 18.5 × 26
    assert_eq!(r.pnl.monthly_sales, dec!(14430));
    assert_eq!(r.pnl.tech_fee_rm, dec!(660));
    assert_eq!(r.pnl.total_salary, dec!(3400));
    assert!(r.lease_calendar.is_some());
}

// ===========================================================================
// End-to-end
// ===========================================================================

#[test]
fn test_profitable_projection_has_timeline() {
    let mut input = ProjectionInput::default();
    input.revenue.transactions_per_day = dec!(45);
    let out = run_projection(&default_catalog(), &input).unwrap();
    let r = &out.result;

    assert!(r.pnl.is_profitable());
    let roi = r.roi.as_ref().unwrap();
    assert_eq!(roi.break_even_point, "Month 1");
    assert_eq!(
        roi.payback_months.unwrap(),
        input.initial_investment / r.pnl.net_profit
    );
    assert!(!r.recovery_timeline.is_empty());
    assert!(r.recovery_timeline.len() <= 60);
    assert!(out.warnings.is_empty());
}

#[test]
fn test_breakdown_matches_pnl_components() {
    let out = run_projection(&default_catalog(), &ProjectionInput::default()).unwrap();
    let r = &out.result;
    let rent = r
        .cost_breakdown
        .iter()
        .find(|e| e.category == CostCategory::Rent)
        .unwrap();
    assert_eq!(rent.amount, r.costs.monthly_rent);
    let total: Decimal = r.cost_breakdown.iter().map(|e| e.amount).sum();
    assert_eq!(total, r.pnl.total_fixed_costs);
}

#[test]
fn test_summary_rows_formatted() {
    let out = run_projection(&default_catalog(), &ProjectionInput::default()).unwrap();
    let rows = &out.result.summary;
    assert_eq!(rows[0].metric, "Daily Transactions");
    assert_eq!(rows[0].value, "20");
    assert_eq!(rows[3].metric, "Monthly Revenue");
    assert_eq!(rows[3].value, "RM 9,000");
    assert_eq!(rows[11].value, "RM 9,043");
    assert_eq!(rows[12].value, "RM -43");
    assert_eq!(rows[13].value, "-0.5%");
}

#[test]
fn test_all_years_listed() {
    let out = run_projection(&default_catalog(), &ProjectionInput::default()).unwrap();
    let rents: Vec<Decimal> = out.result.all_years.iter().map(|t| t.rent).collect();
    assert_eq!(rents, vec![dec!(5661), dec!(5994), dec!(6327)]);
}

#[test]
fn test_lease_calendar_dates() {
    let input = ProjectionInput {
        signing: Some(LeaseSigning {
            month: 8,
            year: 2025,
        }),
        ..ProjectionInput::default()
    };
    let out = run_projection(&default_catalog(), &input).unwrap();
    let cal = out.result.lease_calendar.unwrap();
    let window = cal.renovation_window.unwrap();
    assert_eq!(window.start.to_string(), "2025-08-01");
    assert_eq!(window.end.to_string(), "2025-10-31");
}

#[test]
fn test_invalid_signing_month_is_error() {
    let input = ProjectionInput {
        signing: Some(LeaseSigning { month: 0, year: 2025 }),
        ..ProjectionInput::default()
    };
    assert!(matches!(
        run_projection(&default_catalog(), &input),
        Err(KioskPnlError::InvalidInput { .. })
    ));
}

// ===========================================================================
// Multi-location catalog
// ===========================================================================

fn two_location_catalog() -> LocationCatalog {
    let mut catalog = default_catalog();
    catalog.locations.push(LocationInfo::from_rates(
        "g-02",
        "G 02",
        dec!(400),
        [dec!(12), dec!(12.5), dec!(13)],
        2,
    ));
    catalog
}

#[test]
fn test_projection_for_named_location() {
    let catalog = two_location_catalog();
    assert!(catalog.validate().is_ok());
    let input = ProjectionInput {
        location_id: Some("g-02".into()),
        ..ProjectionInput::default()
    };
    let out = run_projection(&catalog, &input).unwrap();
    assert_eq!(out.result.costs.monthly_rent, dec!(4800));
    // 4800 × 2 / 12
    assert_eq!(out.result.pnl.monthly_renovation_benefit, dec!(800));
    assert_eq!(out.result.location_name, "G 02 (400 sqft)");
}

#[test]
fn test_pnl_resolves_location_in_supplied_catalog() {
    let catalog = two_location_catalog();
    let rent = current_rent(catalog.get("g-02").unwrap(), LeaseYear::Year1);
    let pnl = calculate_pnl_in_catalog(
        &catalog,
        Some("g-02"),
        &RevenueSettings::default(),
        &CostSettings::default().with_rent(rent),
        &StoreFees::default(),
        LeaseYear::Year1,
    )
    .unwrap();
    assert_eq!(pnl.renovation_savings, dec!(9600));
    assert_eq!(pnl.monthly_renovation_benefit, dec!(800));

    assert!(matches!(
        calculate_pnl_in_catalog(
            &default_catalog(),
            Some("g-02"),
            &RevenueSettings::default(),
            &CostSettings::default().with_rent(rent),
            &StoreFees::default(),
            LeaseYear::Year1,
        ),
        Err(KioskPnlError::LocationNotFound(_))
    ));
}

#[test]
fn test_catalog_round_trips_through_json() {
    let catalog = two_location_catalog();
    let json = serde_json::to_string(&catalog).unwrap();
    let back: LocationCatalog = serde_json::from_str(&json).unwrap();
    assert_eq!(back, catalog);
}

#[test]
fn test_missing_location_reports_identifier() {
    let input = ProjectionInput {
        location_id: Some("LG 15 + 14 (666 sqft)".into()),
        ..ProjectionInput::default()
    };
    match run_projection(&default_catalog(), &input) {
        Err(KioskPnlError::LocationNotFound(id)) => assert_eq!(id, "LG 15 + 14 (666 sqft)"),
        other => panic!("Expected LocationNotFound, got {other:?}"),
    }
}

// ===========================================================================
// Range limits
// ===========================================================================

#[test]
fn test_oversized_sales_are_an_error() {
    let json = r#"{
        "revenue": {
            "transactions_per_day": "1000000000000000",
            "avg_transaction_value": "1000000000000000",
            "days_open": "30"
        }
    }"#;
    let input: ProjectionInput = serde_json::from_str(json).unwrap();
    assert!(matches!(
        run_projection(&default_catalog(), &input),
        Err(KioskPnlError::Overflow { .. })
    ));
}
