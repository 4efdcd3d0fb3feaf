use super::{emit, non_negative, positive, OutputTarget, RateOverrides};
use crate::config::{DefaultsConfig, FunnelmapConfig};
use crate::core::errors::Error;
use crate::funnel::{
    compute_reverse, CalculatorInput, CalculatorState, CompanyScale, ConversionRates,
    ReverseFunnel,
};
use crate::io::Report;
use anyhow::{Context, Result};

#[derive(Debug, Clone, Default)]
pub struct ReverseConfig {
    pub revenue_goal: f64,
    pub avg_deal_size: Option<f64>,
    pub scale: Option<CompanyScale>,
    pub rates: RateOverrides,
    pub output: OutputTarget,
}

/// Validated reverse inputs and the rate chain to invert.
pub fn build_calculator_state(
    config: &ReverseConfig,
    defaults: &DefaultsConfig,
) -> std::result::Result<(CalculatorState, ConversionRates), Error> {
    let revenue_goal = non_negative("revenue_goal", config.revenue_goal)?;
    let avg_deal_size = positive(
        "avg_deal_size",
        config.avg_deal_size.unwrap_or(defaults.avg_deal_size),
    )?;
    let (industry, rates) = config.rates.resolve(defaults.industry)?;

    let state = [
        CalculatorInput::RevenueGoal(revenue_goal),
        CalculatorInput::AvgDealSize(avg_deal_size),
        CalculatorInput::Industry(industry),
        CalculatorInput::Scale(config.scale.or(defaults.scale)),
    ]
    .into_iter()
    .fold(CalculatorState::default(), CalculatorState::apply);

    Ok((state, rates))
}

pub fn run_reverse(config: ReverseConfig, settings: &FunnelmapConfig) -> Result<()> {
    let (inputs, rates) =
        build_calculator_state(&config, &settings.defaults()).context("Invalid reverse inputs")?;

    let result = compute_reverse(&inputs, &rates);
    if let ReverseFunnel::Infeasible(infeasible) = &result {
        log::info!("Revenue goal is unreachable: {}", infeasible.blocker);
    }

    emit(
        &Report::Reverse {
            inputs,
            rates,
            result,
        },
        &config.output,
        settings,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funnel::{scale_cac, Industry};

    #[test]
    fn scale_from_defaults_prices_the_budget() {
        let defaults = DefaultsConfig {
            scale: Some(CompanyScale::Smb),
            ..Default::default()
        };
        let config = ReverseConfig {
            revenue_goal: 100_000.0,
            avg_deal_size: Some(10_000.0),
            ..Default::default()
        };

        let (state, rates) = build_calculator_state(&config, &defaults).unwrap();
        assert_eq!(state.scale, Some(CompanyScale::Smb));
        assert_eq!(state.industry, Industry::Average);

        let required = *compute_reverse(&state, &rates).required().unwrap();
        assert_eq!(required.closed_won, 10.0);
        assert_eq!(
            required.required_budget,
            Some(10.0 * scale_cac(CompanyScale::Smb))
        );
    }

    #[test]
    fn zero_rate_override_is_infeasible_not_an_error() {
        let config = ReverseConfig {
            revenue_goal: 50_000.0,
            rates: RateOverrides {
                lead_to_mql: Some(0.0),
                ..Default::default()
            },
            ..Default::default()
        };

        let (state, rates) = build_calculator_state(&config, &DefaultsConfig::default()).unwrap();
        assert!(!compute_reverse(&state, &rates).is_feasible());
    }

    #[test]
    fn rejects_negative_goal() {
        let config = ReverseConfig {
            revenue_goal: -10.0,
            ..Default::default()
        };
        assert!(build_calculator_state(&config, &DefaultsConfig::default()).is_err());
    }
}
