//! Reverse pricing: from a profit target back to the sales, orders and ads
//! budget needed per day. Pure functions only.

use crate::types::{PricingInputs, PricingResult};

/// Share of each sale kept after product cost, ads and platform fee.
pub fn net_margin_pct(gross_margin_pct: f64, ads_pct: f64, platform_fee_pct: f64) -> f64 {
    gross_margin_pct - ads_pct - platform_fee_pct
}

/// Orders per day, rounded up. Returns `0` when there is no usable basket size.
pub fn daily_order_count(daily_sales: f64, avg_basket_size: Option<f64>) -> u64 {
    match avg_basket_size {
        Some(basket) if basket > 0.0 => (daily_sales / basket).ceil() as u64,
        _ => 0,
    }
}

/// Sales at which the fixed cost is exactly covered. `None` for a non-positive margin.
pub fn break_even_sales(fixed_cost: f64, net_margin_pct: f64) -> Option<f64> {
    if net_margin_pct <= 0.0 {
        return None;
    }
    Some(fixed_cost / (net_margin_pct / 100.0))
}

/// Daily mission for a profit target. A net margin `<= 0` yields `Infeasible`
/// and nothing else is computed.
pub fn resolve(inputs: PricingInputs) -> PricingResult {
    let net_margin_pct = net_margin_pct(
        inputs.gross_margin_pct,
        inputs.ads_pct,
        inputs.platform_fee_pct,
    );
    if net_margin_pct <= 0.0 {
        return PricingResult::Infeasible { net_margin_pct };
    }

    let required_total_sales = inputs.total_required_money() / (net_margin_pct / 100.0);
    let daily_sales_target = required_total_sales / f64::from(inputs.days_in_period);

    PricingResult::Feasible {
        net_margin_pct,
        required_total_sales,
        daily_sales_target,
        daily_order_count: daily_order_count(daily_sales_target, inputs.avg_basket_size),
        daily_ads_budget: daily_sales_target * (inputs.ads_pct / 100.0),
    }
}
