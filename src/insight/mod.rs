//! Baseline-vs-current comparison for funnel scenarios.
//!
//! Given two sets of [`Assumptions`] and the models they produce, this module
//! answers two questions a reader of the calculator asks after changing an
//! input: *which input moved the result the most*, and *where is the funnel
//! leaking hardest right now*.
//!
//! Percent deltas against a zero baseline are undefined; they are carried as
//! `None` and rendered as "n/a" rather than letting NaN or infinity into the
//! narrative.

use crate::funnel::{Assumptions, FunnelModel, Transition};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Thresholds for the insight narrative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InsightConfig {
    /// Closed-won changes smaller than this (in percent) produce no insight.
    #[serde(default = "default_noise_threshold_pct")]
    pub noise_threshold_pct: f64,

    /// A conversion rate below this is called out as a bottleneck.
    #[serde(default = "default_bottleneck_threshold")]
    pub bottleneck_threshold: f64,
}

fn default_noise_threshold_pct() -> f64 {
    0.1
}

fn default_bottleneck_threshold() -> f64 {
    0.15
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            noise_threshold_pct: default_noise_threshold_pct(),
            bottleneck_threshold: default_bottleneck_threshold(),
        }
    }
}

/// A tracked forward-mode input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Parameter {
    Spend,
    Cpm,
    Ctr,
    VisitorToLead,
    LeadToMql,
    MqlToSql,
    SqlToOpp,
    OppToClose,
    AvgDealSize,
}

impl Parameter {
    pub const ALL: [Parameter; 9] = [
        Parameter::Spend,
        Parameter::Cpm,
        Parameter::Ctr,
        Parameter::VisitorToLead,
        Parameter::LeadToMql,
        Parameter::MqlToSql,
        Parameter::SqlToOpp,
        Parameter::OppToClose,
        Parameter::AvgDealSize,
    ];

    /// Whether this parameter is a conversion probability (CTR or a stage rate).
    pub fn is_rate(&self) -> bool {
        !matches!(
            self,
            Parameter::Spend | Parameter::Cpm | Parameter::AvgDealSize
        )
    }

    pub fn value(&self, assumptions: &Assumptions) -> f64 {
        match self {
            Parameter::Spend => assumptions.spend,
            Parameter::Cpm => assumptions.cpm,
            Parameter::Ctr => assumptions.ctr,
            Parameter::AvgDealSize => assumptions.avg_deal_size,
            rate => match rate.transition() {
                Some(transition) => assumptions.rates.get(transition),
                None => 0.0,
            },
        }
    }

    pub fn transition(&self) -> Option<Transition> {
        match self {
            Parameter::VisitorToLead => Some(Transition::VisitorToLead),
            Parameter::LeadToMql => Some(Transition::LeadToMql),
            Parameter::MqlToSql => Some(Transition::MqlToSql),
            Parameter::SqlToOpp => Some(Transition::SqlToOpp),
            Parameter::OppToClose => Some(Transition::OppToClose),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Parameter::Spend => "spend",
            Parameter::Cpm => "CPM",
            Parameter::Ctr => "click-through rate",
            Parameter::AvgDealSize => "average deal size",
            rate => rate.transition().map_or("", |t| t.label()),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    fn between(baseline: f64, current: f64) -> Self {
        match current.total_cmp(&baseline) {
            Ordering::Greater => Direction::Up,
            Ordering::Less => Direction::Down,
            Ordering::Equal => Direction::Flat,
        }
    }
}

/// Baseline and current value of one quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    pub baseline: f64,
    pub current: f64,
    /// `(current - baseline) / baseline × 100`; `None` when the baseline is zero.
    pub percent: Option<f64>,
}

impl Delta {
    pub fn new(baseline: f64, current: f64) -> Self {
        Self {
            baseline,
            current,
            percent: percent_delta(baseline, current),
        }
    }

    pub fn direction(&self) -> Direction {
        Direction::between(self.baseline, self.current)
    }

    pub fn changed(&self) -> bool {
        self.direction() != Direction::Flat
    }

    // A change from zero has no percent but outranks every finite change.
    fn rank(&self) -> f64 {
        match self.percent {
            Some(pct) => pct.abs(),
            None if self.changed() => f64::INFINITY,
            None => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterDelta {
    pub parameter: Parameter,
    #[serde(flatten)]
    pub delta: Delta,
}

/// The input change credited with moving the result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub parameter: Parameter,
    pub direction: Direction,
    /// Absolute percent change, `None` when the baseline was zero.
    pub magnitude_pct: Option<f64>,
}

/// The weakest-converting stage in the current scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bottleneck {
    pub transition: Transition,
    pub rate: f64,
    /// Whether the rate is below the call-out threshold.
    pub flagged: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub driver: Driver,
    pub bottleneck: Bottleneck,
    pub closed_won: Delta,
    pub revenue: Delta,
    pub deltas: Vec<ParameterDelta>,
}

impl Insight {
    /// One-paragraph narrative for display.
    pub fn headline(&self) -> String {
        let outcome = match self.closed_won.percent {
            Some(pct) => format!(
                "Closed-won is {} {:.1}%",
                direction_word(self.closed_won.direction()),
                pct.abs()
            ),
            None => "Closed-won moved off zero".to_string(),
        };
        let driver = match self.driver.magnitude_pct {
            Some(pct) => format!(
                "driven mostly by {} ({}{:.1}%)",
                self.driver.parameter,
                sign(self.driver.direction),
                pct
            ),
            None => format!("driven mostly by {} (from zero)", self.driver.parameter),
        };
        let mut text = format!("{outcome}, {driver}.");
        if self.bottleneck.flagged {
            text.push_str(&format!(
                " Bottleneck: {} converts at {:.1}%.",
                self.bottleneck.transition,
                self.bottleneck.rate * 100.0
            ));
        }
        text
    }
}

fn direction_word(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "up",
        Direction::Down => "down",
        Direction::Flat => "flat",
    }
}

fn sign(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "+",
        Direction::Down => "-",
        Direction::Flat => "",
    }
}

/// Percent change from `baseline` to `current`, `None` for a zero baseline.
pub fn percent_delta(baseline: f64, current: f64) -> Option<f64> {
    (baseline != 0.0).then(|| (current - baseline) / baseline * 100.0)
}

/// Compare two scenarios and explain the difference.
///
/// Returns `None` when closed-won barely moved (below
/// `config.noise_threshold_pct`), since there is nothing worth narrating.
pub fn compute_insight(
    current: &FunnelModel,
    baseline: &FunnelModel,
    current_assumptions: &Assumptions,
    baseline_assumptions: &Assumptions,
    config: &InsightConfig,
) -> Option<Insight> {
    let closed_won = Delta::new(baseline.closed_won, current.closed_won);
    if is_noise(&closed_won, config.noise_threshold_pct) {
        log::debug!(
            "closed-won change {:?}% below noise threshold, no insight",
            closed_won.percent
        );
        return None;
    }

    let deltas: Vec<ParameterDelta> = Parameter::ALL
        .iter()
        .map(|parameter| ParameterDelta {
            parameter: *parameter,
            delta: Delta::new(
                parameter.value(baseline_assumptions),
                parameter.value(current_assumptions),
            ),
        })
        .collect();

    Some(Insight {
        driver: primary_driver(&deltas),
        bottleneck: find_bottleneck(current_assumptions, config.bottleneck_threshold),
        closed_won,
        revenue: Delta::new(baseline.revenue, current.revenue),
        deltas,
    })
}

fn is_noise(closed_won: &Delta, threshold_pct: f64) -> bool {
    match closed_won.percent {
        Some(pct) => pct.abs() < threshold_pct,
        None => !closed_won.changed(),
    }
}

/// Largest-moving rate parameter; falls back to spend, CPM or deal size
/// only when no rate moved at all. Ties go to the earlier funnel position.
pub fn primary_driver(deltas: &[ParameterDelta]) -> Driver {
    let largest = |rates: bool| {
        deltas
            .iter()
            .filter(|d| d.parameter.is_rate() == rates && d.delta.changed())
            .fold(None::<&ParameterDelta>, |best, d| match best {
                Some(b) if b.delta.rank() >= d.delta.rank() => Some(b),
                _ => Some(d),
            })
    };

    let chosen = largest(true)
        .or_else(|| largest(false))
        .or_else(|| deltas.iter().find(|d| d.parameter.is_rate()));

    match chosen {
        Some(d) => Driver {
            parameter: d.parameter,
            direction: d.delta.direction(),
            magnitude_pct: d.delta.percent.map(f64::abs),
        },
        None => Driver {
            parameter: Parameter::Ctr,
            direction: Direction::Flat,
            magnitude_pct: Some(0.0),
        },
    }
}

/// Lowest current stage rate; flagged when below `threshold`.
pub fn find_bottleneck(assumptions: &Assumptions, threshold: f64) -> Bottleneck {
    let (transition, rate) = assumptions
        .rates
        .iter()
        .fold(None::<(Transition, f64)>, |lowest, (t, r)| match lowest {
            Some((_, low)) if low <= r => lowest,
            _ => Some((t, r)),
        })
        .unwrap_or((Transition::VisitorToLead, assumptions.rates.visitor_to_lead));

    Bottleneck {
        transition,
        rate,
        flagged: rate < threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funnel::{compute_forward, AssumptionChange, ConversionRates};
    use pretty_assertions::assert_eq;

    fn baseline() -> Assumptions {
        Assumptions {
            spend: 10_000.0,
            cpm: 20.0,
            ctr: 0.02,
            rates: ConversionRates::new(0.05, 0.4, 0.5, 0.5, 0.25),
            avg_deal_size: 5_000.0,
        }
    }

    fn insight_for(current: Assumptions) -> Option<Insight> {
        let base = baseline();
        compute_insight(
            &compute_forward(&current),
            &compute_forward(&base),
            &current,
            &base,
            &InsightConfig::default(),
        )
    }

    #[test]
    fn percent_delta_guards_zero_baseline() {
        assert_eq!(percent_delta(0.0, 5.0), None);
        assert_eq!(percent_delta(50.0, 75.0), Some(50.0));
        assert_eq!(percent_delta(50.0, 25.0), Some(-50.0));
    }

    #[test]
    fn identical_scenarios_are_suppressed() {
        assert_eq!(insight_for(baseline()), None);
    }

    #[test]
    fn tiny_change_is_suppressed() {
        // +0.05% spend moves closed-won by +0.05%
        let current = baseline().apply(AssumptionChange::Spend(10_005.0));
        assert_eq!(insight_for(current), None);
    }

    #[test]
    fn largest_rate_change_is_the_driver() {
        let current = baseline()
            .apply(AssumptionChange::Rate(Transition::MqlToSql, 0.75))
            .apply(AssumptionChange::Rate(Transition::LeadToMql, 0.44));

        let insight = insight_for(current).expect("insight");
        assert_eq!(insight.driver.parameter, Parameter::MqlToSql);
        assert_eq!(insight.driver.direction, Direction::Up);
        let magnitude = insight.driver.magnitude_pct.unwrap();
        assert!((magnitude - 50.0).abs() < 1e-9);
    }

    #[test]
    fn spend_is_not_a_driver_when_a_rate_moved() {
        let current = baseline()
            .apply(AssumptionChange::Spend(30_000.0))
            .apply(AssumptionChange::Rate(Transition::OppToClose, 0.2));

        let insight = insight_for(current).expect("insight");
        assert_eq!(insight.driver.parameter, Parameter::OppToClose);
        assert_eq!(insight.driver.direction, Direction::Down);
    }

    #[test]
    fn spend_drives_when_no_rate_moved() {
        let current = baseline().apply(AssumptionChange::Spend(20_000.0));
        let insight = insight_for(current).expect("insight");
        assert_eq!(insight.driver.parameter, Parameter::Spend);
    }

    #[test]
    fn bottleneck_is_lowest_current_rate() {
        let bottleneck = find_bottleneck(&baseline(), 0.15);
        assert_eq!(bottleneck.transition, Transition::VisitorToLead);
        assert_eq!(bottleneck.rate, 0.05);
        assert!(bottleneck.flagged);

        let healthy = Assumptions {
            rates: ConversionRates::new(0.5, 0.4, 0.3, 0.6, 0.7),
            ..baseline()
        };
        let bottleneck = find_bottleneck(&healthy, 0.15);
        assert_eq!(bottleneck.transition, Transition::MqlToSql);
        assert!(!bottleneck.flagged);
    }

    #[test]
    fn change_from_zero_baseline_reports_na() {
        let base = Assumptions {
            spend: 0.0,
            ..baseline()
        };
        let current = baseline();
        let insight = compute_insight(
            &compute_forward(&current),
            &compute_forward(&base),
            &current,
            &base,
            &InsightConfig::default(),
        )
        .expect("moving off zero is worth narrating");

        assert_eq!(insight.closed_won.percent, None);
        assert_eq!(insight.driver.parameter, Parameter::Spend);
        assert_eq!(insight.driver.magnitude_pct, None);
        assert!(insight.headline().contains("from zero"));
    }

    #[test]
    fn headline_names_driver_and_bottleneck() {
        let current = baseline().apply(AssumptionChange::Rate(Transition::MqlToSql, 0.75));
        let headline = insight_for(current).expect("insight").headline();

        assert!(headline.starts_with("Closed-won is up 50.0%"), "{headline}");
        assert!(headline.contains("MQL → SQL (+50.0%)"), "{headline}");
        assert!(headline.contains("visitor → lead converts at 5.0%"), "{headline}");
    }

    #[test]
    fn every_parameter_gets_a_delta() {
        let current = baseline().apply(AssumptionChange::Ctr(0.03));
        let insight = insight_for(current).expect("insight");
        assert_eq!(insight.deltas.len(), Parameter::ALL.len());
    }
}
