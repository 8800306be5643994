//! Load and validate runtime configuration.

use anyhow::Context;
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::warn;

use crate::types::{InputOverrides, MarginCheckInputs, PricingInputs};

pub const CONFIG_ENV: &str = "MERCHANT_CONFIG";
const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("unknown profile '{0}'")]
    UnknownProfile(String),
    #[error("{0}: days_in_period must be at least 1")]
    ZeroDays(String),
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayCfg {
    pub currency: String,
    pub amount_decimals: usize,
    pub json: bool,
}

impl Default for DisplayCfg {
    fn default() -> Self {
        Self {
            currency: "THB".to_string(),
            amount_decimals: 0,
            json: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ProfileCfg {
    pub description: Option<String>,
    #[serde(flatten)]
    pub overrides: InputOverrides,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub defaults: PricingInputs,
    pub margin_check: MarginCheckInputs,
    pub profiles: BTreeMap<String, ProfileCfg>,
    pub display: DisplayCfg,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&s).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn from_yaml(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Range checks. Zero days would divide the period away; out-of-range
    /// percentages are only reported, the resolver handles them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_inputs("defaults", &self.defaults)?;
        for name in self.profiles.keys() {
            let inputs = self.profile_inputs(name)?;
            check_inputs(&format!("profile '{name}'"), &inputs)?;
        }
        Ok(())
    }

    /// Defaults with the named profile applied on top.
    pub fn profile_inputs(&self, name: &str) -> Result<PricingInputs, ConfigError> {
        let key = name.trim();
        let profile = self
            .profiles
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, p)| p)
            .ok_or_else(|| ConfigError::UnknownProfile(name.to_string()))?;
        Ok(profile.overrides.apply(self.defaults))
    }
}

fn check_inputs(label: &str, inputs: &PricingInputs) -> Result<(), ConfigError> {
    if inputs.days_in_period == 0 {
        return Err(ConfigError::ZeroDays(label.to_string()));
    }
    for (field, v) in [
        ("gross_margin_pct", inputs.gross_margin_pct),
        ("ads_pct", inputs.ads_pct),
        ("platform_fee_pct", inputs.platform_fee_pct),
    ] {
        if !(0.0..=100.0).contains(&v) {
            warn!("{}: {} = {} is outside 0..=100", label, field, v);
        }
    }
    Ok(())
}

/// Pick the config file: explicit path, then `$MERCHANT_CONFIG`, then
/// `./config.yaml`, then the per-user config dir. `None` means built-in defaults.
pub fn locate(explicit: Option<&str>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(PathBuf::from(p));
    }
    if let Ok(p) = std::env::var(CONFIG_ENV) {
        if !p.trim().is_empty() {
            return Some(PathBuf::from(p));
        }
    }
    let local = PathBuf::from(CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }
    user_config_file().filter(|p| p.exists())
}

fn user_config_file() -> Option<PathBuf> {
    ProjectDirs::from("com", "MerchantCommander", "merchant-commander")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
defaults:
  target_net_profit: 150000
  fixed_cost: 30000
  gross_margin_pct: 45
  ads_pct: 15
  platform_fee_pct: 12
  avg_basket_size: 400
profiles:
  tiktok:
    description: "TikTok Shop"
    platform_fee_pct: 8
  cod:
    avg_basket_size: null
    days_in_period: 7
display:
  currency: "USD"
"#;

    #[test]
    fn parses_full_file() {
        let cfg = AppConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(cfg.defaults.target_net_profit, 150_000.0);
        assert_eq!(cfg.defaults.days_in_period, 30);
        assert_eq!(cfg.display.currency, "USD");
        assert_eq!(cfg.display.amount_decimals, 0);
        assert_eq!(cfg.margin_check, MarginCheckInputs::default());
        assert_eq!(cfg.profiles.len(), 2);
    }

    #[test]
    fn profile_applies_over_defaults() {
        let cfg = AppConfig::from_yaml(SAMPLE).unwrap();
        let tiktok = cfg.profile_inputs("TikTok").unwrap();
        assert_eq!(tiktok.platform_fee_pct, 8.0);
        assert_eq!(tiktok.gross_margin_pct, 45.0);
        assert_eq!(tiktok.avg_basket_size, Some(400.0));

        let cod = cfg.profile_inputs("cod").unwrap();
        assert_eq!(cod.avg_basket_size, None);
        assert_eq!(cod.days_in_period, 7);
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let cfg = AppConfig::from_yaml(SAMPLE).unwrap();
        let err = cfg.profile_inputs("lazada").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProfile(ref n) if n == "lazada"));
    }

    #[test]
    fn empty_file_uses_builtin_defaults() {
        let cfg = AppConfig::from_yaml("{}").unwrap();
        assert_eq!(cfg.defaults, PricingInputs::default());
        assert!(cfg.profiles.is_empty());
        assert_eq!(cfg.display.currency, "THB");
    }

    #[test]
    fn zero_days_rejected() {
        let err = AppConfig::from_yaml(
            "profiles:\n  broken:\n    days_in_period: 0\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroDays(_)));
    }

    #[test]
    fn out_of_range_percent_is_accepted() {
        let cfg = AppConfig::from_yaml("defaults:\n  gross_margin_pct: 140\n").unwrap();
        assert_eq!(cfg.defaults.gross_margin_pct, 140.0);
    }

    #[test]
    fn shipped_config_parses() {
        let cfg = AppConfig::from_yaml(include_str!("../config.yaml")).unwrap();
        assert_eq!(cfg.defaults, PricingInputs::default());
        assert_eq!(cfg.profile_inputs("tiktok").unwrap().platform_fee_pct, 8.0);
        assert_eq!(cfg.profile_inputs("weekly").unwrap().days_in_period, 7);
    }

    #[test]
    fn explicit_path_wins() {
        assert_eq!(locate(Some("/tmp/x.yaml")), Some(PathBuf::from("/tmp/x.yaml")));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = AppConfig::load("/nonexistent/merchant.yaml").unwrap_err();
        assert!(format!("{err:#}").contains("read config"));
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let err = AppConfig::from_yaml("defaults: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = AppConfig::from_yaml("defaults:\n  ads_pct: lots\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
