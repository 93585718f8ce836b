use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use kiosk_pnl_core::calendar::LeaseSigning;
use kiosk_pnl_core::location::{LeaseYear, LocationCatalog};
use kiosk_pnl_core::projection::{run_projection, ProjectionInput};

use crate::input;

/// Arguments shared by the projection, breakdown and summary commands
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ProjectionArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Location identifier (defaults to the catalog default)
    #[arg(long)]
    pub location: Option<String>,

    /// Lease year: "Year 1", "Year 2", "Year 3" (or 1/2/3)
    #[arg(long)]
    pub year: Option<LeaseYear>,

    /// Customers served per day
    #[arg(long, alias = "txns")]
    pub transactions_per_day: Option<Decimal>,

    /// Average spend per customer (RM)
    #[arg(long, alias = "ticket")]
    pub avg_transaction: Option<Decimal>,

    /// Operating days per month
    #[arg(long)]
    pub days_open: Option<Decimal>,

    /// Number of employees
    #[arg(long)]
    pub employees: Option<u32>,

    /// Monthly salary per employee (RM)
    #[arg(long)]
    pub salary: Option<Decimal>,

    /// Monthly electricity bill (RM)
    #[arg(long)]
    pub electricity: Option<Decimal>,

    /// Monthly water bill (RM)
    #[arg(long)]
    pub water: Option<Decimal>,

    /// Monthly tech fee (USD)
    #[arg(long)]
    pub tech_fee_usd: Option<Decimal>,

    /// USD to RM exchange rate
    #[arg(long)]
    pub usd_to_rm: Option<Decimal>,

    /// Royalty as a percentage of gross sales (e.g. 5.5)
    #[arg(long)]
    pub royalty_pct: Option<Decimal>,

    /// Marketing levy as a percentage of gross sales (e.g. 0.5)
    #[arg(long)]
    pub marketing_pct: Option<Decimal>,

    /// Initial investment (RM)
    #[arg(long)]
    pub investment: Option<Decimal>,

    /// Lease signing month (1-12), enables the lease calendar
    #[arg(long, requires = "signing_year")]
    pub signing_month: Option<u32>,

    /// Lease signing year
    #[arg(long, requires = "signing_month")]
    pub signing_year: Option<i32>,
}

impl ProjectionArgs {
    fn to_input(&self) -> Result<ProjectionInput, Box<dyn std::error::Error>> {
        let mut input: ProjectionInput = if let Some(ref path) = self.input {
            input::file::read_structured(path)?
        } else if let Some(data) = input::stdin::read_stdin()? {
            serde_json::from_value(data)?
        } else {
            self.input_from_flags()
        };

        // The location flag still applies to file and stdin input
        if self.location.is_some() {
            input.location_id = self.location.clone();
        }

        check_edit_bounds(&input)?;
        Ok(input)
    }

    fn input_from_flags(&self) -> ProjectionInput {
        let mut input = ProjectionInput::default();
        if let Some(year) = self.year {
            input.lease_year = year;
        }

        let revenue = &mut input.revenue;
        set(&mut revenue.transactions_per_day, self.transactions_per_day);
        set(&mut revenue.avg_transaction_value, self.avg_transaction);
        set(&mut revenue.days_open, self.days_open);

        let costs = &mut input.costs;
        set(&mut costs.employee_count, self.employees);
        set(&mut costs.employee_salary, self.salary);
        set(&mut costs.electricity, self.electricity);
        set(&mut costs.water, self.water);

        let fees = &mut input.fees;
        set(&mut fees.tech_fee_usd, self.tech_fee_usd);
        set(&mut fees.usd_to_rm, self.usd_to_rm);
        set(&mut fees.royalty_percent, self.royalty_pct);
        set(&mut fees.marketing_percent, self.marketing_pct);

        set(&mut input.initial_investment, self.investment);

        if let (Some(month), Some(year)) = (self.signing_month, self.signing_year) {
            input.signing = Some(LeaseSigning { month, year });
        }
        input
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

/// The calculators accept any number; this is where nonsense is stopped.
fn check_edit_bounds(input: &ProjectionInput) -> Result<(), Box<dyn std::error::Error>> {
    let non_negative = [
        ("transactions_per_day", input.revenue.transactions_per_day),
        ("avg_transaction_value", input.revenue.avg_transaction_value),
        ("days_open", input.revenue.days_open),
        ("employee_salary", input.costs.employee_salary),
        ("electricity", input.costs.electricity),
        ("water", input.costs.water),
        ("tech_fee_usd", input.fees.tech_fee_usd),
        ("initial_investment", input.initial_investment),
    ];
    for (field, value) in non_negative {
        if value < Decimal::ZERO {
            return Err(format!("{field} cannot be negative (got {value})").into());
        }
    }

    if input.revenue.days_open > dec!(31) {
        return Err(format!(
            "days_open cannot exceed 31 (got {})",
            input.revenue.days_open
        )
        .into());
    }

    if input.fees.usd_to_rm <= Decimal::ZERO {
        return Err("usd_to_rm must be positive".into());
    }

    for (field, pct) in [
        ("royalty_percent", input.fees.royalty_percent),
        ("marketing_percent", input.fees.marketing_percent),
    ] {
        if pct < Decimal::ZERO || pct > dec!(100) {
            return Err(format!("{field} must be between 0 and 100 (got {pct})").into());
        }
    }

    Ok(())
}

pub fn run_project(
    args: ProjectionArgs,
    catalog: &LocationCatalog,
) -> Result<Value, Box<dyn std::error::Error>> {
    let input = args.to_input()?;
    let result = run_projection(catalog, &input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_breakdown(
    args: ProjectionArgs,
    catalog: &LocationCatalog,
) -> Result<Value, Box<dyn std::error::Error>> {
    let input = args.to_input()?;
    let result = run_projection(catalog, &input)?;
    Ok(serde_json::to_value(result.result.cost_breakdown)?)
}

pub fn run_summary(
    args: ProjectionArgs,
    catalog: &LocationCatalog,
) -> Result<Value, Box<dyn std::error::Error>> {
    let input = args.to_input()?;
    let result = run_projection(catalog, &input)?;
    Ok(serde_json::to_value(result.result.summary)?)
}
