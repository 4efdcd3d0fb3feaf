use super::{emit, non_negative, positive, probability, OutputTarget, RateOverrides};
use crate::config::{DefaultsConfig, FunnelmapConfig};
use crate::core::errors::Error;
use crate::funnel::{compute_forward, AssumptionChange, Assumptions};
use crate::io::Report;
use anyhow::{Context, Result};

#[derive(Debug, Clone, Default)]
pub struct ForwardConfig {
    pub spend: f64,
    pub cpm: Option<f64>,
    pub ctr: Option<f64>,
    pub avg_deal_size: Option<f64>,
    pub rates: RateOverrides,
    pub output: OutputTarget,
}

/// Validated forward inputs, filling gaps from `[defaults]`.
pub fn build_assumptions(
    config: &ForwardConfig,
    defaults: &DefaultsConfig,
) -> std::result::Result<Assumptions, Error> {
    let spend = non_negative("spend", config.spend)?;
    let cpm = positive("cpm", config.cpm.unwrap_or(defaults.cpm))?;
    let ctr = probability("ctr", config.ctr.unwrap_or(defaults.ctr))?;
    let avg_deal_size = positive(
        "avg_deal_size",
        config.avg_deal_size.unwrap_or(defaults.avg_deal_size),
    )?;
    let (_, rates) = config.rates.resolve(defaults.industry)?;
    if !(spend / cpm * 1000.0).is_finite() {
        return Err(Error::invalid_field(
            "spend",
            format!("buys more impressions than can be represented at a cpm of {cpm}"),
        ));
    }

    Ok([
        AssumptionChange::Spend(spend),
        AssumptionChange::Cpm(cpm),
        AssumptionChange::Ctr(ctr),
        AssumptionChange::Rates(rates),
        AssumptionChange::AvgDealSize(avg_deal_size),
    ]
    .into_iter()
    .fold(Assumptions::default(), Assumptions::apply))
}

pub fn run_forward(config: ForwardConfig, settings: &FunnelmapConfig) -> Result<()> {
    let assumptions =
        build_assumptions(&config, &settings.defaults()).context("Invalid forward inputs")?;
    log::debug!("Forward assumptions: {assumptions:?}");

    let funnel = compute_forward(&assumptions);
    emit(
        &Report::Forward {
            assumptions,
            funnel,
        },
        &config.output,
        settings,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funnel::Industry;

    #[test]
    fn fills_unset_inputs_from_defaults() {
        let defaults = DefaultsConfig {
            cpm: 40.0,
            industry: Industry::Saas,
            ..Default::default()
        };
        let config = ForwardConfig {
            spend: 2_000.0,
            ctr: Some(0.05),
            ..Default::default()
        };

        let assumptions = build_assumptions(&config, &defaults).unwrap();
        assert_eq!(assumptions.spend, 2_000.0);
        assert_eq!(assumptions.cpm, 40.0);
        assert_eq!(assumptions.ctr, 0.05);
        assert_eq!(assumptions.avg_deal_size, 5_000.0);
        assert_eq!(assumptions.rates, Industry::Saas.rates());
    }

    #[test]
    fn zero_spend_is_accepted() {
        let config = ForwardConfig::default();
        let assumptions = build_assumptions(&config, &DefaultsConfig::default()).unwrap();
        assert_eq!(compute_forward(&assumptions).closed_won, 0.0);
    }

    #[test]
    fn rejects_negative_spend_and_zero_cpm() {
        let negative = ForwardConfig {
            spend: -1.0,
            ..Default::default()
        };
        assert!(build_assumptions(&negative, &DefaultsConfig::default()).is_err());

        let free = ForwardConfig {
            spend: 100.0,
            cpm: Some(0.0),
            ..Default::default()
        };
        let err = build_assumptions(&free, &DefaultsConfig::default()).unwrap_err();
        assert!(err.to_string().contains("cpm"));
    }

    #[test]
    fn rejects_spend_that_overflows_impressions() {
        let config = ForwardConfig {
            spend: 1e308,
            cpm: Some(0.5),
            ctr: Some(0.0),
            ..Default::default()
        };
        let err = build_assumptions(&config, &DefaultsConfig::default()).unwrap_err();
        assert!(err.to_string().contains("spend"));
    }
}
