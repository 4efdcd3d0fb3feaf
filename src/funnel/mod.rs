//! Bidirectional marketing-funnel model.
//!
//! The funnel is a chain of stage-to-stage conversion rates. Given one anchor
//! value the rest of the funnel follows:
//!
//! - [`forward::compute_forward`] starts from media spend and projects every
//!   downstream stage.
//! - [`reverse::compute_reverse`] starts from a revenue goal and derives the
//!   volume each upstream stage must reach.
//!
//! Both directions share the stage vocabulary in [`Stage`] and the rate chain
//! in [`ConversionRates`]. All functions here are pure: they never validate,
//! never fail, and return fresh values on every call.
//!
//! # Example
//!
//! ```rust
//! use funnelmap::funnel::{compute_forward, Assumptions, ConversionRates};
//!
//! let assumptions = Assumptions {
//!     spend: 10_000.0,
//!     cpm: 20.0,
//!     ctr: 0.02,
//!     rates: ConversionRates::new(0.05, 0.4, 0.5, 0.5, 0.25),
//!     avg_deal_size: 5_000.0,
//! };
//!
//! let model = compute_forward(&assumptions);
//! assert_eq!(model.impressions, 500_000.0);
//! assert!((model.clicks - 10_000.0).abs() < 1e-6);
//! ```

pub mod forward;
pub mod rates;
pub mod reverse;

pub use forward::{compute_forward, FunnelMetrics, FunnelModel};
pub use rates::{scale_cac, CompanyScale, Industry};
pub use reverse::{compute_reverse, Blocker, Infeasibility, RequiredFunnel, ReverseFunnel};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Funnel stage, ordered from top of funnel to closed revenue.
///
/// `Clicks` doubles as the visitor stage: a paid click lands on the site as a
/// visitor, so forward mode reports clicks and reverse mode reports visitors
/// for the same position in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Impressions,
    Clicks,
    Leads,
    Mql,
    Sql,
    Opportunities,
    ClosedWon,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Impressions => "Impressions",
            Stage::Clicks => "Clicks",
            Stage::Leads => "Leads",
            Stage::Mql => "MQL",
            Stage::Sql => "SQL",
            Stage::Opportunities => "Opportunities",
            Stage::ClosedWon => "Closed-won",
        }
    }

    /// Label used by reverse mode, where the click stage is read as site visitors.
    pub fn reverse_label(&self) -> &'static str {
        match self {
            Stage::Clicks => "Visitors",
            other => other.label(),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named transition between two adjacent stages below the click stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transition {
    VisitorToLead,
    LeadToMql,
    MqlToSql,
    SqlToOpp,
    OppToClose,
}

impl Transition {
    /// Transitions in funnel order.
    pub const ALL: [Transition; 5] = [
        Transition::VisitorToLead,
        Transition::LeadToMql,
        Transition::MqlToSql,
        Transition::SqlToOpp,
        Transition::OppToClose,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Transition::VisitorToLead => "visitor → lead",
            Transition::LeadToMql => "lead → MQL",
            Transition::MqlToSql => "MQL → SQL",
            Transition::SqlToOpp => "SQL → opportunity",
            Transition::OppToClose => "opportunity → close",
        }
    }

    /// The stage this transition converts into.
    pub fn target(&self) -> Stage {
        match self {
            Transition::VisitorToLead => Stage::Leads,
            Transition::LeadToMql => Stage::Mql,
            Transition::MqlToSql => Stage::Sql,
            Transition::SqlToOpp => Stage::Opportunities,
            Transition::OppToClose => Stage::ClosedWon,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stage-to-stage conversion probabilities, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionRates {
    /// Also accepted as `click_to_lead`: a paid click is a site visitor.
    #[serde(alias = "click_to_lead")]
    pub visitor_to_lead: f64,
    pub lead_to_mql: f64,
    pub mql_to_sql: f64,
    pub sql_to_opp: f64,
    pub opp_to_close: f64,
}

impl ConversionRates {
    pub const fn new(
        visitor_to_lead: f64,
        lead_to_mql: f64,
        mql_to_sql: f64,
        sql_to_opp: f64,
        opp_to_close: f64,
    ) -> Self {
        Self {
            visitor_to_lead,
            lead_to_mql,
            mql_to_sql,
            sql_to_opp,
            opp_to_close,
        }
    }

    pub fn get(&self, transition: Transition) -> f64 {
        match transition {
            Transition::VisitorToLead => self.visitor_to_lead,
            Transition::LeadToMql => self.lead_to_mql,
            Transition::MqlToSql => self.mql_to_sql,
            Transition::SqlToOpp => self.sql_to_opp,
            Transition::OppToClose => self.opp_to_close,
        }
    }

    /// Return a copy with one transition replaced.
    pub fn with(self, transition: Transition, rate: f64) -> Self {
        let mut rates = self;
        match transition {
            Transition::VisitorToLead => rates.visitor_to_lead = rate,
            Transition::LeadToMql => rates.lead_to_mql = rate,
            Transition::MqlToSql => rates.mql_to_sql = rate,
            Transition::SqlToOpp => rates.sql_to_opp = rate,
            Transition::OppToClose => rates.opp_to_close = rate,
        }
        rates
    }

    /// `(transition, rate)` pairs in funnel order.
    pub fn iter(&self) -> impl Iterator<Item = (Transition, f64)> + '_ {
        Transition::ALL.iter().map(move |t| (*t, self.get(*t)))
    }

    /// Probability that a visitor eventually closes.
    pub fn visitor_to_close(&self) -> f64 {
        self.iter().map(|(_, rate)| rate).product()
    }
}

impl Default for ConversionRates {
    fn default() -> Self {
        Industry::default().rates()
    }
}

/// Forward-mode inputs.
///
/// Callers are expected to pass sanitized values: `spend >= 0`, `cpm > 0`,
/// every rate in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    pub spend: f64,
    /// Cost per thousand impressions.
    pub cpm: f64,
    /// Click-through rate on impressions.
    pub ctr: f64,
    #[serde(flatten)]
    pub rates: ConversionRates,
    /// Revenue credited per closed-won deal.
    pub avg_deal_size: f64,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            spend: 10_000.0,
            cpm: 25.0,
            ctr: 0.02,
            rates: ConversionRates::default(),
            avg_deal_size: 5_000.0,
        }
    }
}

/// A single edit to forward-mode inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssumptionChange {
    Spend(f64),
    Cpm(f64),
    Ctr(f64),
    Rate(Transition, f64),
    Rates(ConversionRates),
    AvgDealSize(f64),
}

impl Assumptions {
    /// Apply one edit, producing the next input state.
    pub fn apply(self, change: AssumptionChange) -> Self {
        match change {
            AssumptionChange::Spend(spend) => Self { spend, ..self },
            AssumptionChange::Cpm(cpm) => Self { cpm, ..self },
            AssumptionChange::Ctr(ctr) => Self { ctr, ..self },
            AssumptionChange::Rate(transition, rate) => Self {
                rates: self.rates.with(transition, rate),
                ..self
            },
            AssumptionChange::Rates(rates) => Self { rates, ..self },
            AssumptionChange::AvgDealSize(avg_deal_size) => Self {
                avg_deal_size,
                ..self
            },
        }
    }
}

/// Reverse-mode inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculatorState {
    pub revenue_goal: f64,
    pub avg_deal_size: f64,
    #[serde(default)]
    pub industry: Industry,
    /// Company-scale bracket used to price the required budget.
    #[serde(default)]
    pub scale: Option<CompanyScale>,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            revenue_goal: 1_000_000.0,
            avg_deal_size: 25_000.0,
            industry: Industry::default(),
            scale: None,
        }
    }
}

/// A single edit to reverse-mode inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalculatorInput {
    RevenueGoal(f64),
    AvgDealSize(f64),
    Industry(Industry),
    Scale(Option<CompanyScale>),
}

impl CalculatorState {
    /// Apply one edit, producing the next input state.
    pub fn apply(self, input: CalculatorInput) -> Self {
        match input {
            CalculatorInput::RevenueGoal(revenue_goal) => Self {
                revenue_goal,
                ..self
            },
            CalculatorInput::AvgDealSize(avg_deal_size) => Self {
                avg_deal_size,
                ..self
            },
            CalculatorInput::Industry(industry) => Self { industry, ..self },
            CalculatorInput::Scale(scale) => Self { scale, ..self },
        }
    }

    /// Resolve the industry selector to its benchmark rate chain.
    pub fn rates(&self) -> ConversionRates {
        self.industry.rates()
    }
}
