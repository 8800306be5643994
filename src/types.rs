//! Core value types for the target-sales resolver and the margin checker.

use serde::{Deserialize, Serialize};

pub const DEFAULT_DAYS_IN_PERIOD: u32 = 30;

/// Business parameters for one resolver evaluation. Missing fields in a
/// config file fall back to [`PricingInputs::default`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PricingInputs {
    pub target_net_profit: f64,
    pub fixed_cost: f64,
    pub gross_margin_pct: f64,
    pub ads_pct: f64,
    pub platform_fee_pct: f64,
    /// Average order value. `None`, zero or negative means "unknown".
    pub avg_basket_size: Option<f64>,
    pub days_in_period: u32,
}

impl Default for PricingInputs {
    fn default() -> Self {
        Self {
            target_net_profit: 100_000.0,
            fixed_cost: 20_000.0,
            gross_margin_pct: 40.0,
            ads_pct: 20.0,
            platform_fee_pct: 12.0,
            avg_basket_size: Some(500.0),
            days_in_period: DEFAULT_DAYS_IN_PERIOD,
        }
    }
}

impl PricingInputs {
    /// Profit target plus fixed cost: the money the sales have to cover.
    pub fn total_required_money(&self) -> f64 {
        self.target_net_profit + self.fixed_cost
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PricingResult {
    /// Net margin is zero or negative; no sales volume can reach the target.
    Infeasible { net_margin_pct: f64 },
    Feasible {
        net_margin_pct: f64,
        required_total_sales: f64,
        daily_sales_target: f64,
        /// `0` means the count could not be computed (no basket size).
        daily_order_count: u64,
        daily_ads_budget: f64,
    },
}

impl PricingResult {
    pub fn is_feasible(&self) -> bool {
        matches!(self, PricingResult::Feasible { .. })
    }

    pub fn net_margin_pct(&self) -> f64 {
        match *self {
            PricingResult::Infeasible { net_margin_pct }
            | PricingResult::Feasible { net_margin_pct, .. } => net_margin_pct,
        }
    }
}

/// Partial update of [`PricingInputs`]. `avg_basket_size` is doubly optional
/// so that an override can clear the basket size.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputOverrides {
    pub target_net_profit: Option<f64>,
    pub fixed_cost: Option<f64>,
    pub gross_margin_pct: Option<f64>,
    pub ads_pct: Option<f64>,
    pub platform_fee_pct: Option<f64>,
    #[serde(with = "double_option")]
    pub avg_basket_size: Option<Option<f64>>,
    pub days_in_period: Option<u32>,
}

impl InputOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, base: PricingInputs) -> PricingInputs {
        PricingInputs {
            target_net_profit: self.target_net_profit.unwrap_or(base.target_net_profit),
            fixed_cost: self.fixed_cost.unwrap_or(base.fixed_cost),
            gross_margin_pct: self.gross_margin_pct.unwrap_or(base.gross_margin_pct),
            ads_pct: self.ads_pct.unwrap_or(base.ads_pct),
            platform_fee_pct: self.platform_fee_pct.unwrap_or(base.platform_fee_pct),
            avg_basket_size: self.avg_basket_size.unwrap_or(base.avg_basket_size),
            days_in_period: self.days_in_period.unwrap_or(base.days_in_period),
        }
    }
}

// `null` in YAML clears the basket size; a missing key leaves it alone.
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &Option<Option<f64>>, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(ser),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(de: D) -> Result<Option<Option<f64>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<f64>::deserialize(de).map(Some)
    }
}

/// Single-product profitability check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarginCheckInputs {
    pub price: f64,
    pub cost: f64,
    pub fee_pct: f64,
    pub ads_pct: f64,
}

impl Default for MarginCheckInputs {
    fn default() -> Self {
        Self {
            price: 500.0,
            cost: 250.0,
            fee_pct: 12.0,
            ads_pct: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MarginCheckResult {
    pub fee_amount: f64,
    pub ads_amount: f64,
    pub profit: f64,
    pub margin_pct: f64,
}

impl MarginCheckResult {
    pub fn is_profitable(&self) -> bool {
        self.profit > 0.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarginOverrides {
    pub price: Option<f64>,
    pub cost: Option<f64>,
    pub fee_pct: Option<f64>,
    pub ads_pct: Option<f64>,
}

impl MarginOverrides {
    pub fn apply(&self, base: MarginCheckInputs) -> MarginCheckInputs {
        MarginCheckInputs {
            price: self.price.unwrap_or(base.price),
            cost: self.cost.unwrap_or(base.cost),
            fee_pct: self.fee_pct.unwrap_or(base.fee_pct),
            ads_pct: self.ads_pct.unwrap_or(base.ads_pct),
        }
    }
}
