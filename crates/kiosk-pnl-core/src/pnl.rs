//! Monthly profit-and-loss for a single lease year.
//!
//! Sales are transactions × ticket × operating days. Costs are rent,
//! salaries, utilities, a USD-denominated tech fee converted at a manually
//! entered rate, and royalty/marketing fees charged as a share of gross
//! sales. In Year 1 the rent-free renovation period is recognised as a
//! monthly benefit spread over twelve months.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::KioskPnlError;
use crate::location::{LeaseYear, LocationCatalog, LocationInfo};
use crate::types::{Money, Percent};
use crate::KioskPnlResult;

/// The rent-free value is always spread over one reporting year, whatever the
/// lease length.
const RENOVATION_AMORTISATION_MONTHS: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSettings {
    /// Customers served per day
    pub transactions_per_day: Decimal,
    /// Average spend per customer
    pub avg_transaction_value: Money,
    /// Operating days per month
    pub days_open: Decimal,
}

impl Default for RevenueSettings {
    fn default() -> Self {
        RevenueSettings {
            transactions_per_day: dec!(20),
            avg_transaction_value: dec!(15),
            days_open: dec!(30),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSettings {
    /// Derived from the location and lease year on every recompute; any
    /// value supplied by the caller is overwritten by the projection.
    #[serde(default)]
    pub monthly_rent: Money,
    pub employee_count: u32,
    /// Monthly salary per employee
    pub employee_salary: Money,
    pub electricity: Money,
    pub water: Money,
}

impl CostSettings {
    /// Copy of these settings with the resolved rent merged in.
    pub fn with_rent(&self, monthly_rent: Money) -> CostSettings {
        CostSettings {
            monthly_rent,
            ..self.clone()
        }
    }
}

impl Default for CostSettings {
    fn default() -> Self {
        CostSettings {
            monthly_rent: Decimal::ZERO,
            employee_count: 1,
            employee_salary: dec!(1800),
            electricity: dec!(300),
            water: dec!(100),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreFees {
    /// Monthly technology fee billed in USD
    pub tech_fee_usd: Decimal,
    /// Manually entered USD → RM exchange rate
    pub usd_to_rm: Decimal,
    /// Franchise royalty as a percentage of gross sales
    pub royalty_percent: Percent,
    /// Marketing levy as a percentage of gross sales
    pub marketing_percent: Percent,
}

impl Default for StoreFees {
    fn default() -> Self {
        StoreFees {
            tech_fee_usd: dec!(150),
            usd_to_rm: dec!(4.28),
            royalty_percent: dec!(5.5),
            marketing_percent: dec!(0.5),
        }
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlOutput {
    pub monthly_sales: Money,
    pub tech_fee_rm: Money,
    pub royalty_fee: Money,
    pub marketing_fee: Money,
    pub total_salary: Money,
    /// Rent + salaries + utilities + all fees
    pub total_fixed_costs: Money,
    /// monthly_sales - total_fixed_costs, may be negative
    pub net_profit: Money,
    /// net_profit / monthly_sales × 100, zero when there are no sales
    pub profit_margin: Percent,
    /// Year 1 only: rent × rent-free months
    pub renovation_savings: Money,
    /// Year 1 only: renovation_savings / 12
    pub monthly_renovation_benefit: Money,
    pub adjusted_profit: Money,
    pub adjusted_margin: Percent,
}

impl PnlOutput {
    pub fn is_profitable(&self) -> bool {
        self.net_profit > Decimal::ZERO
    }

    /// Margin points gained from the renovation benefit.
    pub fn margin_uplift(&self) -> Percent {
        self.adjusted_margin.saturating_sub(self.profit_margin)
    }
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Compute the monthly P&L. `costs.monthly_rent` must already hold the rent
/// resolved for `year`.
///
/// Returns `Overflow` when an amount exceeds the decimal range.
pub fn calculate_pnl(
    revenue: &RevenueSettings,
    costs: &CostSettings,
    fees: &StoreFees,
    year: LeaseYear,
    location: &LocationInfo,
) -> KioskPnlResult<PnlOutput> {
    let monthly_sales = revenue
        .transactions_per_day
        .checked_mul(revenue.avg_transaction_value)
        .and_then(|daily| daily.checked_mul(revenue.days_open))
        .ok_or_else(|| KioskPnlError::overflow("monthly sales"))?;

    let tech_fee_rm = fees
        .tech_fee_usd
        .checked_mul(fees.usd_to_rm)
        .ok_or_else(|| KioskPnlError::overflow("tech fee conversion"))?;
    let royalty_fee = share_of(fees.royalty_percent, monthly_sales, "royalty fee")?;
    let marketing_fee = share_of(fees.marketing_percent, monthly_sales, "marketing fee")?;
    let total_salary = Decimal::from(costs.employee_count)
        .checked_mul(costs.employee_salary)
        .ok_or_else(|| KioskPnlError::overflow("total salary"))?;

    let total_fixed_costs = [
        total_salary,
        costs.electricity,
        costs.water,
        tech_fee_rm,
        royalty_fee,
        marketing_fee,
    ]
    .iter()
    .try_fold(costs.monthly_rent, |acc, cost| acc.checked_add(*cost))
    .ok_or_else(|| KioskPnlError::overflow("total fixed costs"))?;

    let net_profit = monthly_sales
        .checked_sub(total_fixed_costs)
        .ok_or_else(|| KioskPnlError::overflow("net profit"))?;
    let profit_margin = margin_of(net_profit, monthly_sales, "profit margin")?;

    let (renovation_savings, monthly_renovation_benefit) = if year.has_renovation_benefit() {
        let savings = costs
            .monthly_rent
            .checked_mul(Decimal::from(location.renovation_months))
            .ok_or_else(|| KioskPnlError::overflow("renovation savings"))?;
        (savings, savings / RENOVATION_AMORTISATION_MONTHS)
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    let adjusted_profit = net_profit
        .checked_add(monthly_renovation_benefit)
        .ok_or_else(|| KioskPnlError::overflow("adjusted profit"))?;
    let adjusted_margin = margin_of(adjusted_profit, monthly_sales, "adjusted margin")?;

    debug!(
        %year,
        location = %location.id,
        %monthly_sales,
        %total_fixed_costs,
        %net_profit,
        %adjusted_profit,
        "computed monthly P&L"
    );

    Ok(PnlOutput {
        monthly_sales,
        tech_fee_rm,
        royalty_fee,
        marketing_fee,
        total_salary,
        total_fixed_costs,
        net_profit,
        profit_margin,
        renovation_savings,
        monthly_renovation_benefit,
        adjusted_profit,
        adjusted_margin,
    })
}

/// [`calculate_pnl`] for the catalog entry `location_id`, or the catalog
/// default when it is `None`. Fails with `LocationNotFound` for an unknown id.
pub fn calculate_pnl_in_catalog(
    catalog: &LocationCatalog,
    location_id: Option<&str>,
    revenue: &RevenueSettings,
    costs: &CostSettings,
    fees: &StoreFees,
    year: LeaseYear,
) -> KioskPnlResult<PnlOutput> {
    let location = catalog.resolve(location_id)?;
    calculate_pnl(revenue, costs, fees, year, location)
}

fn share_of(percent: Percent, base: Money, context: &str) -> KioskPnlResult<Money> {
    (percent / dec!(100))
        .checked_mul(base)
        .ok_or_else(|| KioskPnlError::overflow(context))
}

/// `amount` as a percentage of `sales`; zero when there are no positive sales.
fn margin_of(amount: Money, sales: Money, context: &str) -> KioskPnlResult<Percent> {
    if sales <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    amount
        .checked_div(sales)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .ok_or_else(|| KioskPnlError::overflow(context))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{current_rent, default_catalog};
    use rust_decimal_macros::dec;

    fn location() -> LocationInfo {
        default_catalog().default_location().unwrap().clone()
    }

    fn run(year: LeaseYear) -> PnlOutput {
        let loc = location();
        let costs = CostSettings::default().with_rent(current_rent(&loc, year));
        calculate_pnl(
            &RevenueSettings::default(),
            &costs,
            &StoreFees::default(),
            year,
            &loc,
        )
        .unwrap()
    }

    #[test]
    fn test_monthly_sales_is_product_of_inputs() {
        let out = run(LeaseYear::Year1);
        assert_eq!(out.monthly_sales, dec!(9000));
    }

    #[test]
    fn test_fees() {
        let out = run(LeaseYear::Year1);
        assert_eq!(out.tech_fee_rm, dec!(642));
        assert_eq!(out.royalty_fee, dec!(495));
        assert_eq!(out.marketing_fee, dec!(45));
        assert_eq!(out.total_salary, dec!(1800));
    }

    #[test]
    fn test_default_year1_is_marginally_unprofitable() {
        let out = run(LeaseYear::Year1);
        assert_eq!(out.total_fixed_costs, dec!(9043));
        assert_eq!(out.net_profit, dec!(-43));
        assert!(!out.is_profitable());
        assert!(out.profit_margin < Decimal::ZERO);
    }

    #[test]
    fn test_year1_renovation_benefit() {
        let out = run(LeaseYear::Year1);
        assert_eq!(out.renovation_savings, dec!(16983));
        assert_eq!(out.monthly_renovation_benefit, dec!(1415.25));
        assert_eq!(out.adjusted_profit, dec!(1372.25));
        assert!(out.margin_uplift() > Decimal::ZERO);
    }

    #[test]
    fn test_no_renovation_benefit_after_year1() {
        for year in [LeaseYear::Year2, LeaseYear::Year3] {
            let out = run(year);
            assert_eq!(out.renovation_savings, Decimal::ZERO);
            assert_eq!(out.monthly_renovation_benefit, Decimal::ZERO);
            assert_eq!(out.adjusted_profit, out.net_profit);
            assert_eq!(out.adjusted_margin, out.profit_margin);
        }
    }

    #[test]
    fn test_year2_uses_higher_rent() {
        let out = run(LeaseYear::Year2);
        // 9043 - 5661 + 5994
        assert_eq!(out.total_fixed_costs, dec!(9376));
        assert_eq!(out.net_profit, dec!(-376));
    }

    #[test]
    fn test_zero_sales_margins_are_zero() {
        let loc = location();
        let revenue = RevenueSettings {
            transactions_per_day: Decimal::ZERO,
            ..RevenueSettings::default()
        };
        let costs = CostSettings::default().with_rent(loc.y1_rent);
        let out = calculate_pnl(&revenue, &costs, &StoreFees::default(), LeaseYear::Year1, &loc)
            .unwrap();
        assert_eq!(out.monthly_sales, Decimal::ZERO);
        assert_eq!(out.profit_margin, Decimal::ZERO);
        assert_eq!(out.adjusted_margin, Decimal::ZERO);
        assert_eq!(out.royalty_fee, Decimal::ZERO);
    }

    #[test]
    fn test_negative_revenue_propagates() {
        let loc = location();
        let revenue = RevenueSettings {
            avg_transaction_value: dec!(-1),
            ..RevenueSettings::default()
        };
        let costs = CostSettings::default().with_rent(loc.y2_rent);
        let out = calculate_pnl(&revenue, &costs, &StoreFees::default(), LeaseYear::Year2, &loc)
            .unwrap();
        assert_eq!(out.monthly_sales, dec!(-600));
        assert_eq!(out.profit_margin, Decimal::ZERO);
    }

    #[test]
    fn test_oversized_sales_inputs_report_overflow() {
        let loc = location();
        let revenue = RevenueSettings {
            transactions_per_day: dec!(1_000_000_000_000_000),
            avg_transaction_value: dec!(1_000_000_000_000_000),
            days_open: dec!(30),
        };
        let costs = CostSettings::default().with_rent(loc.y1_rent);
        let result = calculate_pnl(&revenue, &costs, &StoreFees::default(), LeaseYear::Year1, &loc);
        match result {
            Err(KioskPnlError::Overflow { context }) => assert_eq!(context, "monthly sales"),
            other => panic!("Expected Overflow, got {other:?}"),
        }
    }

    #[test]
    fn test_oversized_costs_report_overflow() {
        let loc = location();
        let costs = CostSettings {
            electricity: Decimal::MAX,
            ..CostSettings::default().with_rent(loc.y1_rent)
        };
        let result = calculate_pnl(
            &RevenueSettings::default(),
            &costs,
            &StoreFees::default(),
            LeaseYear::Year1,
            &loc,
        );
        assert!(matches!(result, Err(KioskPnlError::Overflow { .. })));
    }

    #[test]
    fn test_with_rent_overwrites_only_rent() {
        let costs = CostSettings {
            monthly_rent: dec!(1),
            ..CostSettings::default()
        };
        let merged = costs.with_rent(dec!(5661));
        assert_eq!(merged.monthly_rent, dec!(5661));
        assert_eq!(merged.employee_salary, costs.employee_salary);
        assert_eq!(merged.employee_count, costs.employee_count);
    }

    #[test]
    fn test_cost_settings_rent_is_optional_in_json() {
        let json = r#"{"employee_count":2,"employee_salary":"1500","electricity":"250","water":"80"}"#;
        let costs: CostSettings = serde_json::from_str(json).unwrap();
        assert_eq!(costs.monthly_rent, Decimal::ZERO);
        assert_eq!(costs.employee_count, 2);
    }
}
