//! Per-product profit check: price minus cost, fee and ads spend.

use crate::types::{MarginCheckInputs, MarginCheckResult};

/// Returns `None` for a non-positive price; there is nothing to check.
pub fn check(inputs: MarginCheckInputs) -> Option<MarginCheckResult> {
    if inputs.price <= 0.0 {
        return None;
    }
    let fee_amount = inputs.price * (inputs.fee_pct / 100.0);
    let ads_amount = inputs.price * (inputs.ads_pct / 100.0);
    let profit = inputs.price - inputs.cost - fee_amount - ads_amount;
    Some(MarginCheckResult {
        fee_amount,
        ads_amount,
        profit,
        margin_pct: profit / inputs.price * 100.0,
    })
}
