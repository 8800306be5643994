//! Parse operator commands typed at the prompt or passed on the command line.
//! Supported: mission / margin / set / profile / profiles / show / format / help / quit.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use crate::report::OutputFormat;
use crate::types::{InputOverrides, MarginOverrides};
use crate::utils::{normalize_key, parse_number};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Mission(InputOverrides),
    Margin(MarginOverrides),
    Set(InputOverrides),
    Profile(String),
    Profiles,
    Show,
    Format(OutputFormat),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("'{command}' does not take '{key}'")]
    UnknownKey { command: &'static str, key: String },
    #[error("bad value for {key}: '{value}'")]
    BadValue { key: String, value: String },
    #[error("expected key=value, got '{0}'")]
    MissingEquals(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
}

fn command_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z?]+)(?:\s+(.*))?$").expect("static regex"))
}

fn kv_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z][A-Za-z_\-]*)=(\S+)$").expect("static regex"))
}

fn spaced_eq_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*=\s*").expect("static regex"))
}

pub fn parse_command(text: &str) -> Result<Command, ParseError> {
    let t = text.trim();
    if t.is_empty() {
        return Err(ParseError::Empty);
    }

    let Some(c) = command_re().captures(t) else {
        let word = t.split_whitespace().next().unwrap_or(t);
        return Err(ParseError::UnknownCommand(word.to_string()));
    };
    let word = c[1].to_ascii_lowercase();
    let rest = c.get(2).map(|m| m.as_str().trim()).unwrap_or("");

    match word.as_str() {
        "mission" | "m" | "target" => Ok(Command::Mission(parse_pricing_pairs("mission", rest)?)),
        "set" => Ok(Command::Set(parse_pricing_pairs("set", rest)?)),
        "margin" | "check" => Ok(Command::Margin(parse_margin_pairs(rest)?)),
        "profile" | "use" => {
            let name = rest.split_whitespace().next().ok_or(ParseError::MissingArgument("profile"))?;
            Ok(Command::Profile(name.to_string()))
        }
        "profiles" => Ok(Command::Profiles),
        "show" => Ok(Command::Show),
        "format" => {
            let arg = rest.split_whitespace().next().ok_or(ParseError::MissingArgument("format"))?;
            match arg.to_ascii_lowercase().as_str() {
                "text" => Ok(Command::Format(OutputFormat::Text)),
                "json" => Ok(Command::Format(OutputFormat::Json)),
                _ => Err(ParseError::BadValue {
                    key: "format".to_string(),
                    value: arg.to_string(),
                }),
            }
        }
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        _ => Err(ParseError::UnknownCommand(c[1].to_string())),
    }
}

/// Split `a=1 b = 2` into `(key, value)` pairs, tolerating spaces around '='.
fn pairs(rest: &str) -> Result<Vec<(String, String)>, ParseError> {
    let joined = spaced_eq_re().replace_all(rest, "=");
    joined
        .split_whitespace()
        .map(|tok| match kv_re().captures(tok) {
            Some(c) => Ok((normalize_key(&c[1]), c[2].to_string())),
            None => Err(ParseError::MissingEquals(tok.to_string())),
        })
        .collect()
}

fn number(key: &str, value: &str) -> Result<f64, ParseError> {
    parse_number(value).ok_or_else(|| ParseError::BadValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_pricing_pairs(command: &'static str, rest: &str) -> Result<InputOverrides, ParseError> {
    let mut o = InputOverrides::default();
    for (key, value) in pairs(rest)? {
        match key.as_str() {
            "profit" | "target" | "target_net_profit" => o.target_net_profit = Some(number(&key, &value)?),
            "fixed" | "fixed_cost" => o.fixed_cost = Some(number(&key, &value)?),
            "gm" | "gross" | "margin" | "gross_margin_pct" => o.gross_margin_pct = Some(number(&key, &value)?),
            "ads" | "ads_pct" => o.ads_pct = Some(number(&key, &value)?),
            "fee" | "platform" | "platform_fee_pct" => o.platform_fee_pct = Some(number(&key, &value)?),
            "basket" | "aov" | "avg_basket_size" => {
                o.avg_basket_size = match value.to_ascii_lowercase().as_str() {
                    "none" | "-" => Some(None),
                    _ => Some(Some(number(&key, &value)?)),
                };
            }
            "days" | "days_in_period" => o.days_in_period = Some(days(&key, &value)?),
            _ => return Err(ParseError::UnknownKey { command, key }),
        }
    }
    Ok(o)
}

fn days(key: &str, value: &str) -> Result<u32, ParseError> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|d| *d >= 1)
        .ok_or_else(|| ParseError::BadValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

fn parse_margin_pairs(rest: &str) -> Result<MarginOverrides, ParseError> {
    let mut o = MarginOverrides::default();
    for (key, value) in pairs(rest)? {
        match key.as_str() {
            "price" => o.price = Some(number(&key, &value)?),
            "cost" => o.cost = Some(number(&key, &value)?),
            "fee" | "fee_pct" => o.fee_pct = Some(number(&key, &value)?),
            "ads" | "ads_pct" => o.ads_pct = Some(number(&key, &value)?),
            _ => {
                return Err(ParseError::UnknownKey {
                    command: "margin",
                    key,
                })
            }
        }
    }
    Ok(o)
}
