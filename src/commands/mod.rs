//! CLI command implementations for funnelmap.
//!
//! Each submodule handles one command: it sanitizes its inputs, runs the
//! calculator, and hands a [`Report`] to the configured writer.
//!
//! Available commands:
//! - **forward**: project a funnel from ad spend
//! - **reverse**: derive required volumes and budget from a revenue goal
//! - **compare**: explain the difference between two scenario files
//! - **score**: score a lead profile
//! - **rates**: print the benchmark tables
//! - **init**: write a default `.funnelmap.toml`
//!
//! Commands are the only place raw numbers are checked. Everything below
//! them assumes rates are in `[0, 1]` and amounts are non-negative.

pub mod compare;
pub mod forward;
pub mod init;
pub mod rates;
pub mod reverse;
pub mod score;

pub use compare::{load_scenario, parse_scenario, run_compare, CompareConfig, ScenarioFile};
pub use forward::{build_assumptions, run_forward, ForwardConfig};
pub use init::{init_config, init_config_in};
pub use rates::run_rates;
pub use reverse::{build_calculator_state, run_reverse, ReverseConfig};
pub use score::{load_profile, run_score, ScoreConfig};

use crate::config::FunnelmapConfig;
use crate::core::errors::Error;
use crate::core::refined::{NonNegativeAmount, PositiveAmount, Probability};
use crate::funnel::{ConversionRates, Industry, Transition};
use crate::io::{self, create_writer, OutputFormat, Report};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Where and how a report is written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputTarget {
    pub format: Option<OutputFormat>,
    pub path: Option<PathBuf>,
}

impl OutputTarget {
    /// Explicit format, then `[output] default_format`, then terminal.
    pub fn resolve_format(&self, config: &FunnelmapConfig) -> OutputFormat {
        self.format
            .or_else(|| {
                config
                    .default_format()
                    .and_then(|name| match name.parse::<OutputFormat>() {
                        Ok(format) => Some(format),
                        Err(e) => {
                            log::warn!("Ignoring [output] default_format: {e}");
                            None
                        }
                    })
            })
            .unwrap_or_default()
    }
}

/// Render a report to a string in the given format.
pub fn render(report: &Report, format: OutputFormat) -> Result<String> {
    let mut buf = Vec::new();
    create_writer(format, Box::new(&mut buf)).write_report(report)?;
    Ok(String::from_utf8(buf)?)
}

/// Write a report to stdout or to the target file.
pub fn emit(report: &Report, target: &OutputTarget, config: &FunnelmapConfig) -> Result<()> {
    let format = target.resolve_format(config);
    match &target.path {
        Some(path) => {
            colored::control::set_override(false);
            let rendered = render(report, format)?;
            io::write_file(path, &rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            log::info!("Wrote {:?} report to {}", format, path.display());
        }
        None => print!("{}", render(report, format)?),
    }
    Ok(())
}

/// Per-transition rate overrides on top of an industry benchmark.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RateOverrides {
    pub industry: Option<Industry>,
    pub visitor_to_lead: Option<f64>,
    pub lead_to_mql: Option<f64>,
    pub mql_to_sql: Option<f64>,
    pub sql_to_opp: Option<f64>,
    pub opp_to_close: Option<f64>,
}

impl RateOverrides {
    fn get(&self, transition: Transition) -> Option<f64> {
        match transition {
            Transition::VisitorToLead => self.visitor_to_lead,
            Transition::LeadToMql => self.lead_to_mql,
            Transition::MqlToSql => self.mql_to_sql,
            Transition::SqlToOpp => self.sql_to_opp,
            Transition::OppToClose => self.opp_to_close,
        }
    }

    /// The selected industry and its rate chain with overrides applied.
    pub fn resolve(&self, fallback: Industry) -> std::result::Result<(Industry, ConversionRates), Error> {
        let industry = self.industry.unwrap_or(fallback);
        let rates = Transition::ALL
            .iter()
            .try_fold(industry.rates(), |rates, &transition| match self.get(transition) {
                Some(value) => probability(transition.label(), value)
                    .map(|rate| rates.with(transition, rate)),
                None => Ok(rates),
            })?;
        Ok((industry, rates))
    }
}

pub(crate) fn probability(field: &str, value: f64) -> std::result::Result<f64, Error> {
    Probability::new(value)
        .map(Probability::into_inner)
        .map_err(|e| Error::invalid_field(field, e))
}

pub(crate) fn positive(field: &str, value: f64) -> std::result::Result<f64, Error> {
    PositiveAmount::new(value)
        .map(PositiveAmount::into_inner)
        .map_err(|e| Error::invalid_field(field, e))
}

pub(crate) fn non_negative(field: &str, value: f64) -> std::result::Result<f64, Error> {
    NonNegativeAmount::new(value)
        .map(NonNegativeAmount::into_inner)
        .map_err(|e| Error::invalid_field(field, e))
}
