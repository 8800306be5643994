//! Command dispatch over the operator's working inputs.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::margin;
use crate::parser::{parse_command, Command};
use crate::report::{render_inputs, render_margin, render_mission, OutputFormat};
use crate::resolver::resolve;
use crate::types::{MarginCheckInputs, PricingInputs};

pub const HELP: &str = "\
Commands:
  mission [key=value ...]   daily target from a profit goal
                            keys: profit fixed gm ads fee basket days
  margin [key=value ...]    single product check; keys: price cost fee ads
  set key=value ...         change the working inputs
  profile <name>            reset working inputs to a config profile
  profiles                  list profiles
  show                      print the working inputs
  format text|json          switch output format
  help                      this text
  quit                      leave
";

#[derive(Debug, PartialEq)]
pub enum Outcome {
    Output(String),
    Quit,
}

pub struct Session {
    cfg: AppConfig,
    inputs: PricingInputs,
    margin: MarginCheckInputs,
    format: OutputFormat,
}

impl Session {
    pub fn new(cfg: AppConfig) -> Self {
        let format = if cfg.display.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };
        Self {
            inputs: cfg.defaults,
            margin: cfg.margin_check,
            cfg,
            format,
        }
    }

    pub fn set_format(&mut self, format: OutputFormat) {
        self.format = format;
    }

    pub fn inputs(&self) -> PricingInputs {
        self.inputs
    }

    /// Parse and run one line. Parse errors are reported as output; the
    /// session keeps going.
    pub fn handle_line(&mut self, line: &str, today: NaiveDate) -> anyhow::Result<Outcome> {
        match parse_command(line) {
            Ok(cmd) => self.handle(cmd, today),
            Err(e) => {
                warn!("rejected input {:?}: {}", line.trim(), e);
                Ok(Outcome::Output(format!("error: {e} (type 'help')\n")))
            }
        }
    }

    pub fn handle(&mut self, cmd: Command, today: NaiveDate) -> anyhow::Result<Outcome> {
        let display = &self.cfg.display;
        let out = match cmd {
            Command::Mission(overrides) => {
                if !overrides.is_empty() {
                    debug!(?overrides, "one-off overrides");
                }
                let inputs = overrides.apply(self.inputs);
                let result = resolve(inputs);
                debug!(?inputs, ?result, "mission resolved");
                if !result.is_feasible() {
                    info!("infeasible structure: net margin {:.1}%", result.net_margin_pct());
                }
                render_mission(&inputs, &result, display, today, self.format)?
            }
            Command::Margin(overrides) => {
                let inputs = overrides.apply(self.margin);
                let result = margin::check(inputs);
                debug!(?inputs, ?result, "margin checked");
                render_margin(&inputs, result.as_ref(), display, self.format)?
            }
            Command::Set(overrides) => {
                self.inputs = overrides.apply(self.inputs);
                render_inputs(&self.inputs, display)
            }
            Command::Profile(name) => match self.cfg.profile_inputs(&name) {
                Ok(inputs) => {
                    info!("switched to profile {}", name);
                    self.inputs = inputs;
                    render_inputs(&self.inputs, display)
                }
                Err(e) => format!("error: {e}; known: {}\n", self.profile_list()),
            },
            Command::Profiles => {
                let mut out = String::new();
                for (name, p) in &self.cfg.profiles {
                    match &p.description {
                        Some(d) => out.push_str(&format!("{name}: {d}\n")),
                        None => out.push_str(&format!("{name}\n")),
                    }
                }
                if out.is_empty() {
                    out.push_str("no profiles configured\n");
                }
                out
            }
            Command::Show => render_inputs(&self.inputs, display),
            Command::Format(f) => {
                self.format = f;
                format!("output format: {f}\n")
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Outcome::Quit),
        };
        Ok(Outcome::Output(out))
    }

    fn profile_list(&self) -> String {
        if self.cfg.profiles.is_empty() {
            return "none".to_string();
        }
        self.cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn session() -> Session {
        let cfg = AppConfig::from_yaml(
            "profiles:\n  tiktok:\n    description: TikTok Shop\n    platform_fee_pct: 8\n",
        )
        .unwrap();
        Session::new(cfg)
    }

    fn output(o: Outcome) -> String {
        match o {
            Outcome::Output(s) => s,
            Outcome::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn mission_uses_working_inputs_plus_overrides() {
        let mut s = session();
        let text = output(s.handle_line("mission", day()).unwrap());
        assert!(text.contains("100 orders"));

        let text = output(s.handle_line("mission basket=1000", day()).unwrap());
        assert!(text.contains("50 orders"));
        // overrides on mission are not sticky
        assert_eq!(s.inputs().avg_basket_size, Some(500.0));
    }

    #[test]
    fn set_is_sticky() {
        let mut s = session();
        output(s.handle_line("set gm=30 ads=25", day()).unwrap());
        assert_eq!(s.inputs().gross_margin_pct, 30.0);
        let text = output(s.handle_line("mission", day()).unwrap());
        assert!(text.starts_with("NOT FEASIBLE"));
    }

    #[test]
    fn profile_switch_and_unknown() {
        let mut s = session();
        output(s.handle_line("profile TIKTOK", day()).unwrap());
        assert_eq!(s.inputs().platform_fee_pct, 8.0);

        let text = output(s.handle_line("profile lazada", day()).unwrap());
        assert!(text.contains("unknown profile 'lazada'"));
        assert!(text.contains("known: tiktok"));
        assert_eq!(s.inputs().platform_fee_pct, 8.0);
    }

    #[test]
    fn profiles_are_listed_with_descriptions() {
        let mut s = session();
        let text = output(s.handle_line("profiles", day()).unwrap());
        assert_eq!(text, "tiktok: TikTok Shop\n");
    }

    #[test]
    fn format_switch_changes_mission_output() {
        let mut s = session();
        assert_eq!(
            output(s.handle_line("format json", day()).unwrap()),
            "output format: json\n"
        );
        let json = output(s.handle_line("mission", day()).unwrap());
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["result"]["status"], "feasible");
        assert!(json.ends_with('\n'));
        assert_eq!(
            output(s.handle_line("format text", day()).unwrap()),
            "output format: text\n"
        );
    }

    #[test]
    fn margin_command_uses_config_defaults() {
        let mut s = session();
        let text = output(s.handle_line("margin", day()).unwrap());
        assert!(text.contains("PROFIT 90 THB"));
        let text = output(s.handle_line("margin price=0", day()).unwrap());
        assert!(text.contains("price above zero"));
    }

    #[test]
    fn parse_errors_do_not_end_the_session() {
        let mut s = session();
        let text = output(s.handle_line("mission ads=lots", day()).unwrap());
        assert!(text.starts_with("error: bad value for ads"));
        assert_eq!(s.handle_line("quit", day()).unwrap(), Outcome::Quit);
    }

    #[test]
    fn help_and_show() {
        let mut s = session();
        assert_eq!(output(s.handle_line("help", day()).unwrap()), HELP);
        let shown = output(s.handle_line("show", day()).unwrap());
        assert!(shown.starts_with("profit=100,000 THB"));
    }
}
