// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod formatting;
pub mod funnel;
pub mod insight;
pub mod io;
pub mod scoring;

// Re-export commonly used types
pub use crate::core::{Error, Result};

pub use crate::funnel::{
    compute_forward, compute_reverse, scale_cac, AssumptionChange, Assumptions, Blocker,
    CalculatorInput, CalculatorState, CompanyScale, ConversionRates, FunnelMetrics, FunnelModel,
    Industry, RequiredFunnel, ReverseFunnel, Stage, Transition,
};

pub use crate::insight::{compute_insight, Insight, InsightConfig};

pub use crate::scoring::{
    determine_state, score_profile, BuyerState, EngagementAction, EngagementEvent, LeadScore,
    ProfileEvent, ScoringProfile, ScoringThresholds,
};

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter, Report};
