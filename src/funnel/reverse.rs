//! Reverse projection: revenue goal in, required funnel out.
//!
//! The walk starts at closed-won (`goal / deal size`) and divides by each
//! conversion rate on the way up. A zero rate would make that division
//! undefined, and a vanishingly small one overflows it. Either way the result
//! becomes [`ReverseFunnel::Infeasible`] and names the transition that blocked
//! it, so no `inf` or `NaN` ever reaches a report.

use super::rates::scale_cac;
use super::{CalculatorState, ConversionRates, Stage, Transition};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Volumes each stage must reach to hit a revenue goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RequiredFunnel {
    pub visitors: f64,
    pub leads: f64,
    pub mql: f64,
    pub sql: f64,
    pub opportunities: f64,
    pub closed_won: f64,
    pub revenue_goal: f64,
    pub avg_deal_size: f64,
    /// Acquisition cost per deal for the selected company scale.
    pub cac: Option<f64>,
    /// `closed_won × cac`, present when a company scale was selected.
    pub required_budget: Option<f64>,
}

impl RequiredFunnel {
    /// Volume for a stage; impressions are not derived in reverse mode.
    pub fn volume(&self, stage: Stage) -> Option<f64> {
        match stage {
            Stage::Impressions => None,
            Stage::Clicks => Some(self.visitors),
            Stage::Leads => Some(self.leads),
            Stage::Mql => Some(self.mql),
            Stage::Sql => Some(self.sql),
            Stage::Opportunities => Some(self.opportunities),
            Stage::ClosedWon => Some(self.closed_won),
        }
    }

    /// `(stage, volume)` pairs from visitors down to closed-won.
    pub fn stages(&self) -> impl Iterator<Item = (Stage, f64)> + '_ {
        REVERSE_STAGES
            .iter()
            .filter_map(move |stage| self.volume(*stage).map(|v| (*stage, v)))
    }
}

const REVERSE_STAGES: [Stage; 6] = [
    Stage::Clicks,
    Stage::Leads,
    Stage::Mql,
    Stage::Sql,
    Stage::Opportunities,
    Stage::ClosedWon,
];

/// What made a goal unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "transition", rename_all = "kebab-case")]
pub enum Blocker {
    /// A conversion rate of zero; nothing upstream can produce the next stage.
    ZeroRate(Transition),
    /// Dividing by this rate needs more upstream volume than an `f64` holds.
    Overflow(Transition),
    /// Average deal size is not positive, or so small the deal count overflows.
    DealSize,
    /// Closed-won times the scale's CAC is too large to represent.
    Budget,
}

impl fmt::Display for Blocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Blocker::ZeroRate(transition) => write!(f, "{transition} rate is 0"),
            Blocker::Overflow(transition) => {
                write!(f, "{transition} rate is too small to reach the goal")
            }
            Blocker::DealSize => f.write_str("average deal size cannot reach the goal"),
            Blocker::Budget => f.write_str("required budget is too large to represent"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Infeasibility {
    pub blocker: Blocker,
    pub revenue_goal: f64,
}

/// Outcome of a reverse projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum ReverseFunnel {
    Feasible(RequiredFunnel),
    Infeasible(Infeasibility),
}

impl ReverseFunnel {
    pub fn is_feasible(&self) -> bool {
        matches!(self, ReverseFunnel::Feasible(_))
    }

    pub fn required(&self) -> Option<&RequiredFunnel> {
        match self {
            ReverseFunnel::Feasible(funnel) => Some(funnel),
            ReverseFunnel::Infeasible(_) => None,
        }
    }
}

/// Derive the volume each stage needs for `state.revenue_goal`.
///
/// Rates come in separately from `state` so callers can override the
/// industry benchmark with their own chain.
pub fn compute_reverse(state: &CalculatorState, rates: &ConversionRates) -> ReverseFunnel {
    let infeasible = |blocker| {
        ReverseFunnel::Infeasible(Infeasibility {
            blocker,
            revenue_goal: state.revenue_goal,
        })
    };

    let closed_won = match invert(state.revenue_goal, state.avg_deal_size) {
        Ok(deals) => deals,
        Err(_) => return infeasible(Blocker::DealSize),
    };

    // Walk upward from the bottom of the funnel; the first rate that fails is the blocker.
    let mut volumes = [0.0; 5];
    let mut below = closed_won;
    for (slot, transition) in Transition::ALL.iter().enumerate().rev() {
        match invert(below, rates.get(*transition)) {
            Ok(volume) => {
                volumes[slot] = volume;
                below = volume;
            }
            Err(Shortfall::NotPositive) => return infeasible(Blocker::ZeroRate(*transition)),
            Err(Shortfall::Overflow) => return infeasible(Blocker::Overflow(*transition)),
        }
    }
    let [visitors, leads, mql, sql, opportunities] = volumes;

    let cac = state.scale.map(scale_cac);
    let required_budget = cac.map(|cost| closed_won * cost);
    if required_budget.is_some_and(|budget| !budget.is_finite()) {
        return infeasible(Blocker::Budget);
    }

    ReverseFunnel::Feasible(RequiredFunnel {
        visitors,
        leads,
        mql,
        sql,
        opportunities,
        closed_won,
        revenue_goal: state.revenue_goal,
        avg_deal_size: state.avg_deal_size,
        cac,
        required_budget,
    })
}

enum Shortfall {
    NotPositive,
    Overflow,
}

// volume / rate, defined only for a positive rate and a finite quotient
fn invert(volume: f64, rate: f64) -> Result<f64, Shortfall> {
    if rate.is_nan() || rate <= 0.0 {
        return Err(Shortfall::NotPositive);
    }
    let quotient = volume / rate;
    if quotient.is_finite() {
        Ok(quotient)
    } else {
        Err(Shortfall::Overflow)
    }
}
