//! Buyer state classification.
//!
//! Identity and engagement gate the first two states; past that, the clamped
//! fit plus engagement total is compared against the MQL and SQL cutoffs.

use super::engagement::MAX_ENGAGEMENT_SCORE;
use super::fit::MAX_FIT_SCORE;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a buyer sits in the qualification funnel.
///
/// States are ordered; a later state is further along. The state is always
/// recomputed from the current score, never carried forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuyerState {
    /// Anonymous visitor.
    UnknownUnknown,
    /// Identified, but no engagement yet.
    KnownUnknown,
    /// Identified and engaging, below the MQL cutoff.
    KnownLead,
    Mql,
    Sql,
}

impl BuyerState {
    pub fn slug(&self) -> &'static str {
        match self {
            BuyerState::UnknownUnknown => "unknown-unknown",
            BuyerState::KnownUnknown => "known-unknown",
            BuyerState::KnownLead => "known-lead",
            BuyerState::Mql => "mql",
            BuyerState::Sql => "sql",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BuyerState::UnknownUnknown => "Unknown unknown",
            BuyerState::KnownUnknown => "Known unknown",
            BuyerState::KnownLead => "Known lead",
            BuyerState::Mql => "Marketing-qualified lead",
            BuyerState::Sql => "Sales-qualified lead",
        }
    }
}

impl fmt::Display for BuyerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Total-score cutoffs for the qualified states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringThresholds {
    #[serde(default = "default_mql_threshold")]
    pub mql_threshold: u32,
    #[serde(default = "default_sql_threshold")]
    pub sql_threshold: u32,
}

fn default_mql_threshold() -> u32 {
    60
}

fn default_sql_threshold() -> u32 {
    75
}

impl Default for ScoringThresholds {
    fn default() -> Self {
        Self {
            mql_threshold: default_mql_threshold(),
            sql_threshold: default_sql_threshold(),
        }
    }
}

impl ScoringThresholds {
    pub fn validate(&self) -> Result<(), String> {
        let max_total = MAX_FIT_SCORE + MAX_ENGAGEMENT_SCORE;
        if self.mql_threshold > self.sql_threshold {
            return Err(format!(
                "mql_threshold ({}) must not exceed sql_threshold ({})",
                self.mql_threshold, self.sql_threshold
            ));
        }
        if self.sql_threshold > max_total {
            return Err(format!(
                "sql_threshold ({}) is above the maximum total score ({max_total})",
                self.sql_threshold
            ));
        }
        Ok(())
    }
}

/// Classify a buyer with the default 60/75 cutoffs.
pub fn determine_state(fit_score: u32, engagement_score: u32, has_identity: bool) -> BuyerState {
    determine_state_with(
        fit_score,
        engagement_score,
        has_identity,
        &ScoringThresholds::default(),
    )
}

/// Classify a buyer. Both scores are clamped to their ceilings before the
/// total is compared against the cutoffs.
pub fn determine_state_with(
    fit_score: u32,
    engagement_score: u32,
    has_identity: bool,
    thresholds: &ScoringThresholds,
) -> BuyerState {
    if !has_identity {
        return BuyerState::UnknownUnknown;
    }
    if engagement_score == 0 {
        return BuyerState::KnownUnknown;
    }

    let total = fit_score.min(MAX_FIT_SCORE) + engagement_score.min(MAX_ENGAGEMENT_SCORE);
    if total >= thresholds.sql_threshold {
        BuyerState::Sql
    } else if total >= thresholds.mql_threshold {
        BuyerState::Mql
    } else {
        BuyerState::KnownLead
    }
}
