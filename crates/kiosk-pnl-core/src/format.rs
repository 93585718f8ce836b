//! Display formatting for computed figures.
//!
//! The calculators never round; everything here is presentation only.
//! Currency is whole ringgit with comma thousands separators, percentages
//! carry one decimal place.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::pnl::{CostSettings, PnlOutput, RevenueSettings};
use crate::types::{Money, Months, Percent};

const CURRENCY_PREFIX: &str = "RM";

/// "RM 9,000", "RM -43".
pub fn format_currency(amount: Money) -> String {
    format!("{CURRENCY_PREFIX} {}", group_thousands(round_to(amount, 0)))
}

/// "10.9%".
pub fn format_percentage(percentage: Percent) -> String {
    format!("{}%", round_to(percentage, 1))
}

/// "109.3 months", or "Never" when payback is not reached.
pub fn format_payback_months(months: Option<Months>) -> String {
    match months {
        Some(m) => format!("{} months", round_to(m, 1)),
        None => "Never".to_string(),
    }
}

/// "9.1 years", or "Never" when payback is not reached.
pub fn format_payback_years(years: Option<Decimal>) -> String {
    match years {
        Some(y) => format!("{} years", round_to(y, 1)),
        None => "Never".to_string(),
    }
}

/// Plain count with thousands separators, e.g. "1,200".
pub fn format_count(value: Decimal) -> String {
    group_thousands(value.normalize())
}

/// Round half away from zero and pin the scale so trailing zeros print.
fn round_to(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(dp);
    rounded
}

fn group_thousands(value: Decimal) -> String {
    let text = value.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }

    if value.is_sign_negative() && !value.is_zero() {
        format!("-{grouped}")
    } else {
        grouped
    }
}

// ---------------------------------------------------------------------------
// Summary table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub metric: String,
    pub value: String,
}

fn row(metric: &str, value: String) -> SummaryRow {
    SummaryRow {
        metric: metric.to_string(),
        value,
    }
}

/// Metric/value rows for the summary table, inputs first then results.
pub fn summary_rows(
    revenue: &RevenueSettings,
    costs: &CostSettings,
    pnl: &PnlOutput,
) -> Vec<SummaryRow> {
    vec![
        row("Daily Transactions", format_count(revenue.transactions_per_day)),
        row(
            "Avg Transaction Value",
            format_currency(revenue.avg_transaction_value),
        ),
        row("Operating Days", format_count(revenue.days_open)),
        row("Monthly Revenue", format_currency(pnl.monthly_sales)),
        row("Staff Salaries", format_currency(pnl.total_salary)),
        row("Rent", format_currency(costs.monthly_rent)),
        row("Electricity", format_currency(costs.electricity)),
        row("Water", format_currency(costs.water)),
        row("Technology Fee", format_currency(pnl.tech_fee_rm)),
        row("Royalty Fees", format_currency(pnl.royalty_fee)),
        row("Marketing Fees", format_currency(pnl.marketing_fee)),
        row("Total Costs", format_currency(pnl.total_fixed_costs)),
        row("Net Profit", format_currency(pnl.net_profit)),
        row("Profit Margin", format_percentage(pnl.profit_margin)),
    ]
}
