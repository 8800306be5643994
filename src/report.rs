//! Render resolver and margin-check results for the operator.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::{self, Write as _};

use crate::config::DisplayCfg;
use crate::resolver::break_even_sales;
use crate::types::{MarginCheckInputs, MarginCheckResult, PricingInputs, PricingResult};
use crate::utils::{format_amount, format_pct};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

fn to_json_line<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let mut s = serde_json::to_string_pretty(value)?;
    s.push('\n');
    Ok(s)
}

#[derive(Serialize)]
struct MissionReport<'a> {
    date: NaiveDate,
    currency: &'a str,
    inputs: &'a PricingInputs,
    result: &'a PricingResult,
    break_even_sales: Option<f64>,
}

#[derive(Serialize)]
struct MarginReport<'a> {
    currency: &'a str,
    inputs: &'a MarginCheckInputs,
    result: Option<&'a MarginCheckResult>,
    profitable: Option<bool>,
}

struct Money<'a> {
    display: &'a DisplayCfg,
}

impl Money<'_> {
    fn fmt(&self, v: f64) -> String {
        format!(
            "{} {}",
            format_amount(v, self.display.amount_decimals),
            self.display.currency
        )
    }
}

pub fn render_mission(
    inputs: &PricingInputs,
    result: &PricingResult,
    display: &DisplayCfg,
    date: NaiveDate,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let break_even = break_even_sales(inputs.fixed_cost, result.net_margin_pct());
    if format == OutputFormat::Json {
        let report = MissionReport {
            date,
            currency: &display.currency,
            inputs,
            result,
            break_even_sales: break_even,
        };
        return to_json_line(&report);
    }

    let money = Money { display };
    let mut out = String::new();
    match *result {
        PricingResult::Infeasible { net_margin_pct } => {
            writeln!(
                out,
                "NOT FEASIBLE: this price structure loses money (net margin {}).",
                format_pct(net_margin_pct)
            )?;
            writeln!(
                out,
                "  gross {}% - ads {}% - fee {}%",
                inputs.gross_margin_pct, inputs.ads_pct, inputs.platform_fee_pct
            )?;
            writeln!(out, "Advice: raise the gross margin or cut the ads budget.")?;
        }
        PricingResult::Feasible {
            net_margin_pct,
            required_total_sales,
            daily_sales_target,
            daily_order_count,
            daily_ads_budget,
        } => {
            writeln!(out, "Daily mission for {}", date.format("%Y-%m-%d"))?;
            if daily_order_count > 0 {
                writeln!(out, "  Orders today:      {} orders", daily_order_count)?;
            } else {
                writeln!(out, "  Orders today:      n/a (set basket=<order value>)")?;
            }
            writeln!(out, "  Sales target:      {}/day", money.fmt(daily_sales_target))?;
            writeln!(
                out,
                "  Ads budget today:  {} ({}% of the sales target)",
                money.fmt(daily_ads_budget),
                inputs.ads_pct
            )?;
            writeln!(out, "Breakdown")?;
            writeln!(
                out,
                "  1. Net margin kept:   {} (gross {}% - ads {}% - fee {}%)",
                format_pct(net_margin_pct),
                inputs.gross_margin_pct,
                inputs.ads_pct,
                inputs.platform_fee_pct
            )?;
            writeln!(
                out,
                "  2. Money to cover:    {} (profit + fixed cost)",
                money.fmt(inputs.total_required_money())
            )?;
            writeln!(
                out,
                "  3. Required sales:    {} over {} days",
                money.fmt(required_total_sales),
                inputs.days_in_period
            )?;
            if let Some(be) = break_even {
                writeln!(out, "  4. Break-even sales:  {}", money.fmt(be))?;
            }
            writeln!(out, "  5. Daily sales:       {}", money.fmt(daily_sales_target))?;
        }
    }
    Ok(out)
}

pub fn render_margin(
    inputs: &MarginCheckInputs,
    result: Option<&MarginCheckResult>,
    display: &DisplayCfg,
    format: OutputFormat,
) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        let report = MarginReport {
            currency: &display.currency,
            inputs,
            result,
            profitable: result.map(MarginCheckResult::is_profitable),
        };
        return to_json_line(&report);
    }

    let Some(r) = result else {
        return Ok("Enter a price above zero to check a product.\n".to_string());
    };
    let money = Money { display };
    let mut out = String::new();
    writeln!(
        out,
        "Product check: price {}, cost {}",
        money.fmt(inputs.price),
        money.fmt(inputs.cost)
    )?;
    writeln!(out, "  Fee ({}%):  {}", inputs.fee_pct, money.fmt(r.fee_amount))?;
    writeln!(out, "  Ads ({}%):  {}", inputs.ads_pct, money.fmt(r.ads_amount))?;
    if r.is_profitable() {
        writeln!(
            out,
            "PROFIT {} ({}) per unit",
            money.fmt(r.profit),
            format_pct(r.margin_pct)
        )?;
    } else {
        writeln!(out, "LOSS {} per unit", money.fmt(r.profit))?;
    }
    Ok(out)
}

pub fn render_inputs(inputs: &PricingInputs, display: &DisplayCfg) -> String {
    let money = Money { display };
    let basket = match inputs.avg_basket_size {
        Some(b) if b > 0.0 => money.fmt(b),
        _ => "none".to_string(),
    };
    format!(
        "profit={} fixed={} gm={}% ads={}% fee={}% basket={} days={}\n",
        money.fmt(inputs.target_net_profit),
        money.fmt(inputs.fixed_cost),
        inputs.gross_margin_pct,
        inputs.ads_pct,
        inputs.platform_fee_pct,
        basket,
        inputs.days_in_period
    )
}
