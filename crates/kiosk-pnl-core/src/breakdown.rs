use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::KioskPnlError;
use crate::pnl::{CostSettings, PnlOutput};
use crate::types::{Money, Percent};
use crate::KioskPnlResult;

/// Cost categories in display order. Chart colours and legends key off this
/// order, so it must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostCategory {
    Rent,
    Salaries,
    Electricity,
    Water,
    #[serde(rename = "Tech Fee")]
    TechFee,
    Royalties,
    Marketing,
}

impl CostCategory {
    pub const ORDERED: [CostCategory; 7] = [
        CostCategory::Rent,
        CostCategory::Salaries,
        CostCategory::Electricity,
        CostCategory::Water,
        CostCategory::TechFee,
        CostCategory::Royalties,
        CostCategory::Marketing,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CostCategory::Rent => "Rent",
            CostCategory::Salaries => "Salaries",
            CostCategory::Electricity => "Electricity",
            CostCategory::Water => "Water",
            CostCategory::TechFee => "Tech Fee",
            CostCategory::Royalties => "Royalties",
            CostCategory::Marketing => "Marketing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdownEntry {
    pub category: CostCategory,
    pub amount: Money,
    /// Share of total fixed costs, zero when the total is not positive
    pub percentage: Percent,
}

impl CostBreakdownEntry {
    /// Entries with no amount or share are hidden by charts and legends.
    pub fn is_visible(&self) -> bool {
        self.amount > Decimal::ZERO && self.percentage > Decimal::ZERO
    }
}

/// The seven resolved cost magnitudes feeding the breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostComponents {
    pub rent: Money,
    pub salaries: Money,
    pub electricity: Money,
    pub water: Money,
    pub tech_fee: Money,
    pub royalties: Money,
    pub marketing: Money,
}

impl CostComponents {
    pub fn from_pnl(costs: &CostSettings, pnl: &PnlOutput) -> Self {
        CostComponents {
            rent: costs.monthly_rent,
            salaries: pnl.total_salary,
            electricity: costs.electricity,
            water: costs.water,
            tech_fee: pnl.tech_fee_rm,
            royalties: pnl.royalty_fee,
            marketing: pnl.marketing_fee,
        }
    }

    pub fn amount(&self, category: CostCategory) -> Money {
        match category {
            CostCategory::Rent => self.rent,
            CostCategory::Salaries => self.salaries,
            CostCategory::Electricity => self.electricity,
            CostCategory::Water => self.water,
            CostCategory::TechFee => self.tech_fee,
            CostCategory::Royalties => self.royalties,
            CostCategory::Marketing => self.marketing,
        }
    }
}

/// Percentage-of-total breakdown, one entry per category in display order.
/// Zero-amount entries are kept.
pub fn build_cost_breakdown(
    components: &CostComponents,
    total_fixed_costs: Money,
) -> KioskPnlResult<Vec<CostBreakdownEntry>> {
    CostCategory::ORDERED
        .iter()
        .map(|category| {
            let amount = components.amount(*category);
            let percentage = if total_fixed_costs > Decimal::ZERO {
                amount
                    .checked_div(total_fixed_costs)
                    .and_then(|share| share.checked_mul(dec!(100)))
                    .ok_or_else(|| KioskPnlError::overflow("cost breakdown percentage"))?
            } else {
                Decimal::ZERO
            };
            Ok(CostBreakdownEntry {
                category: *category,
                amount,
                percentage,
            })
        })
        .collect()
}
