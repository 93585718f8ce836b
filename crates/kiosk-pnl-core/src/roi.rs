//! Payback period, annual ROI and investment-recovery timeline.
//!
//! Payback is a straight division of the initial investment by the monthly
//! net profit. A business that does not make a monthly profit never pays
//! back: payback is reported as `None` (infinite) and ROI as zero.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::KioskPnlError;
use crate::types::{Money, Months, Percent, Years};
use crate::KioskPnlResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const BREAK_EVEN_PROFITABLE: &str = "Month 1";
pub const BREAK_EVEN_NOT_PROFITABLE: &str = "Not Profitable";

/// Months shown past the payback month on the recovery timeline.
const TIMELINE_TAIL_MONTHS: u32 = 12;
/// Hard cap on the timeline length (five years).
const TIMELINE_MAX_MONTHS: u32 = 60;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiMetrics {
    /// None when the investment is never recovered
    pub payback_months: Option<Months>,
    /// None when the investment is never recovered
    pub payback_years: Option<Years>,
    /// Annualised return as a percentage of the initial investment
    pub annual_roi: Percent,
    /// "Month 1" when operations are profitable, otherwise "Not Profitable"
    pub break_even_point: String,
}

impl RoiMetrics {
    fn not_profitable() -> Self {
        RoiMetrics {
            payback_months: None,
            payback_years: None,
            annual_roi: Decimal::ZERO,
            break_even_point: BREAK_EVEN_NOT_PROFITABLE.to_string(),
        }
    }

    pub fn is_profitable(&self) -> bool {
        self.payback_months.is_some()
    }

    /// Payback in months with "never" mapped to positive infinity.
    pub fn payback_months_f64(&self) -> f64 {
        self.payback_months
            .and_then(|m| m.to_f64())
            .unwrap_or(f64::INFINITY)
    }

    /// Payback in years with "never" mapped to positive infinity.
    pub fn payback_years_f64(&self) -> f64 {
        self.payback_years
            .and_then(|y| y.to_f64())
            .unwrap_or(f64::INFINITY)
    }
}

/// One month on the investment-recovery chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryPoint {
    pub month: u32,
    /// Cumulative profit, capped at the initial investment
    pub recovered: Money,
    /// Investment still outstanding
    pub remaining: Money,
    /// Constant target line at the initial investment
    pub target: Money,
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Payback and annual ROI for a monthly `net_profit` against
/// `initial_investment`.
///
/// Returns `DivisionByZero` for a profitable business with no initial
/// investment, where annual ROI is undefined, and `Overflow` when payback or
/// ROI exceed the decimal range.
pub fn calculate_roi(net_profit: Money, initial_investment: Money) -> KioskPnlResult<RoiMetrics> {
    if net_profit <= Decimal::ZERO {
        debug!(%net_profit, "not profitable, payback is never reached");
        return Ok(RoiMetrics::not_profitable());
    }

    if initial_investment.is_zero() {
        return Err(KioskPnlError::DivisionByZero {
            context: "annual ROI with zero initial investment".into(),
        });
    }

    let payback_months = initial_investment
        .checked_div(net_profit)
        .ok_or_else(|| KioskPnlError::overflow("payback months"))?;
    let payback_years = payback_months / dec!(12);
    let annual_roi = net_profit
        .checked_mul(dec!(12))
        .and_then(|annual| annual.checked_div(initial_investment))
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .ok_or_else(|| KioskPnlError::overflow("annual ROI"))?;

    debug!(%payback_months, %annual_roi, "computed ROI");

    Ok(RoiMetrics {
        payback_months: Some(payback_months),
        payback_years: Some(payback_years),
        annual_roi,
        break_even_point: BREAK_EVEN_PROFITABLE.to_string(),
    })
}

/// Month-by-month cumulative recovery, running to twelve months past the
/// payback month and never beyond five years. Empty when `net_profit` is not
/// positive.
pub fn build_recovery_timeline(
    net_profit: Money,
    initial_investment: Money,
) -> KioskPnlResult<Vec<RecoveryPoint>> {
    if net_profit <= Decimal::ZERO {
        return Ok(Vec::new());
    }

    let months = match initial_investment.checked_div(net_profit) {
        Some(payback) => {
            let horizon = payback.ceil() + Decimal::from(TIMELINE_TAIL_MONTHS);
            if horizon >= Decimal::from(TIMELINE_MAX_MONTHS) {
                TIMELINE_MAX_MONTHS
            } else {
                horizon.to_u32().unwrap_or(0)
            }
        }
        // Payback beyond the decimal range is well past the cap
        None => TIMELINE_MAX_MONTHS,
    };

    (1..=months)
        .map(|month| {
            let cumulative = net_profit
                .checked_mul(Decimal::from(month))
                .ok_or_else(|| KioskPnlError::overflow("cumulative recovery"))?;
            let remaining = initial_investment
                .checked_sub(cumulative)
                .ok_or_else(|| KioskPnlError::overflow("remaining investment"))?;
            Ok(RecoveryPoint {
                month,
                recovered: cumulative.min(initial_investment),
                remaining: remaining.max(Decimal::ZERO),
                target: initial_investment,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_roi_profitable_example() {
        let roi = calculate_roi(dec!(1372.25), dec!(150000)).unwrap();
        let months = roi.payback_months.unwrap();
        assert!((months - dec!(109.31)).abs() < dec!(0.01), "got {months}");
        let years = roi.payback_years.unwrap();
        assert!((years - dec!(9.109)).abs() < dec!(0.001), "got {years}");
        assert_eq!(roi.annual_roi, dec!(10.978));
        assert_eq!(roi.break_even_point, "Month 1");
    }

    #[test]
    fn test_roi_payback_is_exact_division() {
        let roi = calculate_roi(dec!(2500), dec!(150000)).unwrap();
        assert_eq!(roi.payback_months, Some(dec!(60)));
        assert_eq!(roi.payback_years, Some(dec!(5)));
        assert_eq!(roi.annual_roi, dec!(20));
    }

    #[test]
    fn test_roi_not_profitable() {
        for profit in [dec!(-43), Decimal::ZERO] {
            let roi = calculate_roi(profit, dec!(150000)).unwrap();
            assert_eq!(roi.payback_months, None);
            assert_eq!(roi.payback_years, None);
            assert_eq!(roi.annual_roi, Decimal::ZERO);
            assert_eq!(roi.break_even_point, "Not Profitable");
            assert!(roi.payback_months_f64().is_infinite());
            assert!(roi.payback_years_f64().is_infinite());
        }
    }

    #[test]
    fn test_roi_zero_investment_is_error() {
        assert!(matches!(
            calculate_roi(dec!(100), Decimal::ZERO),
            Err(KioskPnlError::DivisionByZero { .. })
        ));
        // Unprofitable short-circuits before the investment is used
        assert!(calculate_roi(dec!(-1), Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_roi_serializes_never_as_null() {
        let roi = calculate_roi(dec!(-43), dec!(150000)).unwrap();
        let json = serde_json::to_value(&roi).unwrap();
        assert!(json["payback_months"].is_null());
    }

    #[test]
    fn test_roi_overflow_is_error() {
        assert!(matches!(
            calculate_roi(Decimal::MAX, dec!(150000)),
            Err(KioskPnlError::Overflow { .. })
        ));
        assert!(matches!(
            calculate_roi(dec!(0.0000001), Decimal::MAX),
            Err(KioskPnlError::Overflow { .. })
        ));
    }

    #[test]
    fn test_timeline_overflow_is_error() {
        assert!(matches!(
            build_recovery_timeline(Decimal::MAX / dec!(2), dec!(150000)),
            Err(KioskPnlError::Overflow { .. })
        ));
    }

    #[test]
    fn test_timeline_empty_when_unprofitable() {
        assert!(build_recovery_timeline(dec!(-43), dec!(150000)).unwrap().is_empty());
        assert!(build_recovery_timeline(Decimal::ZERO, dec!(150000)).unwrap().is_empty());
    }

    #[test]
    fn test_timeline_runs_twelve_months_past_payback() {
        // Payback at exactly 10 months -> 22 points
        let points = build_recovery_timeline(dec!(1000), dec!(10000)).unwrap();
        assert_eq!(points.len(), 22);
        assert_eq!(points[0].month, 1);
        assert_eq!(points[0].recovered, dec!(1000));
        assert_eq!(points[0].remaining, dec!(9000));
        assert_eq!(points[9].recovered, dec!(10000));
        assert_eq!(points[9].remaining, Decimal::ZERO);
        assert_eq!(points[21].recovered, dec!(10000));
        assert!(points.iter().all(|p| p.target == dec!(10000)));
    }

    #[test]
    fn test_timeline_fractional_payback_rounds_up() {
        // 10000 / 3000 = 3.33 -> ceil 4 -> 16 points
        let points = build_recovery_timeline(dec!(3000), dec!(10000)).unwrap();
        assert_eq!(points.len(), 16);
        assert_eq!(points[3].recovered, dec!(10000));
    }

    #[test]
    fn test_timeline_capped_at_five_years() {
        let points = build_recovery_timeline(dec!(1372.25), dec!(150000)).unwrap();
        assert_eq!(points.len(), 60);
        assert_eq!(points.last().unwrap().month, 60);
        assert_eq!(points.last().unwrap().recovered, dec!(82335));
    }
}
