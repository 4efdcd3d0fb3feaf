use serde::{Deserialize, Serialize};

use crate::funnel::{CompanyScale, Industry};
use crate::insight::InsightConfig;
use crate::scoring::ScoringThresholds;

/// Root configuration structure for funnelmap
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FunnelmapConfig {
    /// Defaults for calculator inputs not given on the command line
    #[serde(default)]
    pub defaults: Option<DefaultsConfig>,

    /// Insight narrative thresholds
    #[serde(default)]
    pub insight: Option<InsightConfig>,

    /// Lead-score cutoffs
    #[serde(default)]
    pub scoring: Option<ScoringThresholds>,

    /// Output configuration
    #[serde(default)]
    pub output: Option<OutputConfig>,
}

impl FunnelmapConfig {
    pub fn defaults(&self) -> DefaultsConfig {
        self.defaults.clone().unwrap_or_default()
    }

    pub fn insight(&self) -> InsightConfig {
        self.insight.unwrap_or_default()
    }

    pub fn scoring(&self) -> ScoringThresholds {
        self.scoring.unwrap_or_default()
    }

    pub fn default_format(&self) -> Option<String> {
        self.output.as_ref().and_then(|o| o.default_format.clone())
    }
}

/// Calculator defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DefaultsConfig {
    #[serde(default = "default_cpm")]
    pub cpm: f64,

    #[serde(default = "default_ctr")]
    pub ctr: f64,

    #[serde(default = "default_avg_deal_size")]
    pub avg_deal_size: f64,

    #[serde(default)]
    pub industry: Industry,

    #[serde(default)]
    pub scale: Option<CompanyScale>,
}

fn default_cpm() -> f64 {
    25.0
}

fn default_ctr() -> f64 {
    0.02
}

fn default_avg_deal_size() -> f64 {
    5_000.0
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            cpm: default_cpm(),
            ctr: default_ctr(),
            avg_deal_size: default_avg_deal_size(),
            industry: Industry::default(),
            scale: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OutputConfig {
    /// Default output format (terminal, json, markdown)
    #[serde(default)]
    pub default_format: Option<String>,
}
