use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use kiosk_pnl_core::format::{format_payback_months, format_payback_years};
use kiosk_pnl_core::roi::{build_recovery_timeline, calculate_roi};

/// Arguments for payback / ROI calculation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct RoiArgs {
    /// Monthly net profit (RM), may be negative
    #[arg(long)]
    pub net_profit: Decimal,

    /// Initial investment (RM)
    #[arg(long, default_value = "150000")]
    pub investment: Decimal,

    /// Include the month-by-month recovery timeline
    #[arg(long)]
    pub timeline: bool,
}

pub fn run_roi(args: RoiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if args.investment < Decimal::ZERO {
        return Err("--investment cannot be negative".into());
    }

    let roi = calculate_roi(args.net_profit, args.investment)?;
    let mut value = json!({
        "roi": roi,
        "payback_months_display": format_payback_months(roi.payback_months),
        "payback_years_display": format_payback_years(roi.payback_years),
    });
    if args.timeline {
        let timeline = build_recovery_timeline(args.net_profit, args.investment)?;
        value["recovery_timeline"] = serde_json::to_value(timeline)?;
    }
    Ok(json!({ "result": value }))
}
