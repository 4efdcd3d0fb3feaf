//! Section-level config validation.
//!
//! Each check returns the section it belongs to so the loader can drop just
//! that section and keep the rest of the file.

use super::core::FunnelmapConfig;
use crate::core::refined::{PositiveAmount, Probability, ScoreThreshold};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigProblem {
    pub section: &'static str,
    pub message: String,
}

impl ConfigProblem {
    fn new(section: &'static str, message: impl Into<String>) -> Self {
        Self {
            section,
            message: message.into(),
        }
    }
}

/// Collect every problem in the config; empty means valid.
pub fn validate_config(config: &FunnelmapConfig) -> Vec<ConfigProblem> {
    let mut problems = Vec::new();

    if let Some(defaults) = &config.defaults {
        if let Err(e) = PositiveAmount::new(defaults.cpm) {
            problems.push(ConfigProblem::new("defaults", format!("cpm {e}")));
        }
        if let Err(e) = Probability::new(defaults.ctr) {
            problems.push(ConfigProblem::new("defaults", format!("ctr {e}")));
        }
        if let Err(e) = PositiveAmount::new(defaults.avg_deal_size) {
            problems.push(ConfigProblem::new(
                "defaults",
                format!("avg_deal_size {e}"),
            ));
        }
    }

    if let Some(insight) = &config.insight {
        if insight.noise_threshold_pct.is_nan() || insight.noise_threshold_pct < 0.0 {
            problems.push(ConfigProblem::new(
                "insight",
                "noise_threshold_pct must be non-negative",
            ));
        }
        if let Err(e) = Probability::new(insight.bottleneck_threshold) {
            problems.push(ConfigProblem::new(
                "insight",
                format!("bottleneck_threshold {e}"),
            ));
        }
    }

    if let Some(scoring) = &config.scoring {
        for (name, value) in [
            ("mql_threshold", scoring.mql_threshold),
            ("sql_threshold", scoring.sql_threshold),
        ] {
            if ScoreThreshold::new(value).is_err() {
                problems.push(ConfigProblem::new(
                    "scoring",
                    format!("{name} must be between 0 and 100"),
                ));
            }
        }
        if let Err(e) = scoring.validate() {
            problems.push(ConfigProblem::new("scoring", e));
        }
    }

    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DefaultsConfig;
    use crate::insight::InsightConfig;
    use crate::scoring::ScoringThresholds;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&FunnelmapConfig::default()).is_empty());
    }

    #[test]
    fn reports_each_bad_field() {
        let config = FunnelmapConfig {
            defaults: Some(DefaultsConfig {
                cpm: 0.0,
                ctr: 2.0,
                ..Default::default()
            }),
            insight: Some(InsightConfig {
                noise_threshold_pct: -1.0,
                bottleneck_threshold: 0.15,
            }),
            scoring: Some(ScoringThresholds {
                mql_threshold: 60,
                sql_threshold: 75,
            }),
            output: None,
        };

        let problems = validate_config(&config);
        let sections: Vec<&str> = problems.iter().map(|p| p.section).collect();
        assert_eq!(sections, vec!["defaults", "defaults", "insight"]);
    }
}
