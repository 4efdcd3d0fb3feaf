//! Scenario comparison.
//!
//! A scenario is a TOML file with one `[assumptions]` table:
//!
//! ```toml
//! name = "Q3 plan"
//!
//! [assumptions]
//! industry = "saas"
//! spend = 25000.0
//! cpm = 30.0
//! mql_to_sql = 0.45
//! ```
//!
//! Fields left out come from the industry benchmark (for rates) or from
//! `[defaults]` in `.funnelmap.toml`.

use super::forward::{build_assumptions, ForwardConfig};
use super::{emit, OutputTarget, RateOverrides};
use crate::config::{DefaultsConfig, FunnelmapConfig};
use crate::core::errors::{Error, Result as CoreResult};
use crate::funnel::{compute_forward, Assumptions, Industry};
use crate::insight::compute_insight;
use crate::io::{self, Report};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct CompareConfig {
    pub baseline: PathBuf,
    pub current: PathBuf,
    pub output: OutputTarget,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioFile {
    #[serde(default)]
    pub name: Option<String>,
    pub assumptions: ScenarioAssumptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioAssumptions {
    #[serde(default)]
    pub industry: Option<Industry>,
    pub spend: f64,
    #[serde(default)]
    pub cpm: Option<f64>,
    #[serde(default)]
    pub ctr: Option<f64>,
    #[serde(default)]
    pub avg_deal_size: Option<f64>,
    #[serde(default, alias = "click_to_lead")]
    pub visitor_to_lead: Option<f64>,
    #[serde(default)]
    pub lead_to_mql: Option<f64>,
    #[serde(default)]
    pub mql_to_sql: Option<f64>,
    #[serde(default)]
    pub sql_to_opp: Option<f64>,
    #[serde(default)]
    pub opp_to_close: Option<f64>,
}

impl From<ScenarioAssumptions> for ForwardConfig {
    fn from(s: ScenarioAssumptions) -> Self {
        ForwardConfig {
            spend: s.spend,
            cpm: s.cpm,
            ctr: s.ctr,
            avg_deal_size: s.avg_deal_size,
            rates: RateOverrides {
                industry: s.industry,
                visitor_to_lead: s.visitor_to_lead,
                lead_to_mql: s.lead_to_mql,
                mql_to_sql: s.mql_to_sql,
                sql_to_opp: s.sql_to_opp,
                opp_to_close: s.opp_to_close,
            },
            output: OutputTarget::default(),
        }
    }
}

/// Parse and validate scenario TOML into forward assumptions.
pub fn parse_scenario(contents: &str, defaults: &DefaultsConfig) -> CoreResult<Assumptions> {
    let scenario: ScenarioFile = toml::from_str(contents)?;
    if let Some(name) = &scenario.name {
        log::debug!("Parsed scenario '{name}'");
    }
    build_assumptions(&ForwardConfig::from(scenario.assumptions), defaults)
}

pub fn load_scenario(path: &Path, defaults: &DefaultsConfig) -> CoreResult<Assumptions> {
    let contents = io::read_file(path).map_err(|e| Error::invalid_file(path, e.to_string()))?;
    parse_scenario(&contents, defaults).map_err(|e| Error::invalid_file(path, e.to_string()))
}

pub fn run_compare(config: CompareConfig, settings: &FunnelmapConfig) -> Result<()> {
    let defaults = settings.defaults();
    let baseline_assumptions = load_scenario(&config.baseline, &defaults)
        .context("Failed to load baseline scenario")?;
    let current_assumptions =
        load_scenario(&config.current, &defaults).context("Failed to load current scenario")?;

    let baseline = compute_forward(&baseline_assumptions);
    let current = compute_forward(&current_assumptions);
    let insight = compute_insight(
        &current,
        &baseline,
        &current_assumptions,
        &baseline_assumptions,
        &settings.insight(),
    );

    emit(
        &Report::Compare {
            baseline,
            current,
            insight,
        },
        &config.output,
        settings,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funnel::Transition;
    use indoc::indoc;

    #[test]
    fn scenario_overrides_industry_rates() {
        let assumptions = parse_scenario(
            indoc! {r#"
                name = "Q3 plan"

                [assumptions]
                industry = "saas"
                spend = 25000.0
                cpm = 30.0
                click_to_lead = 0.04
            "#},
            &DefaultsConfig::default(),
        )
        .unwrap();

        assert_eq!(assumptions.spend, 25_000.0);
        assert_eq!(assumptions.cpm, 30.0);
        assert_eq!(assumptions.rates.get(Transition::VisitorToLead), 0.04);
        assert_eq!(
            assumptions.rates.get(Transition::LeadToMql),
            Industry::Saas.rates().lead_to_mql
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = parse_scenario(
            "[assumptions]\nspend = 1.0\nbudget = 2.0\n",
            &DefaultsConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }

    #[test]
    fn out_of_range_rate_is_a_validation_error() {
        let err = parse_scenario(
            "[assumptions]\nspend = 1.0\nmql_to_sql = 4.5\n",
            &DefaultsConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn load_reports_the_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[assumptions]\nspend = -5.0\n").unwrap();

        let err = load_scenario(&path, &DefaultsConfig::default()).unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }
}
