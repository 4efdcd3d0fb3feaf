//! Forward projection: spend in, funnel out.

use super::{Assumptions, CalculatorState, Industry, Stage};
use serde::{Deserialize, Serialize};

/// Projected funnel for a set of [`Assumptions`].
///
/// Volumes are expected values, so fractional counts are normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FunnelModel {
    pub impressions: f64,
    pub clicks: f64,
    pub leads: f64,
    pub mql: f64,
    pub sql: f64,
    pub opportunities: f64,
    pub closed_won: f64,
    pub spend: f64,
    pub revenue: f64,
    pub avg_deal_size: f64,
    pub metrics: FunnelMetrics,
}

/// Summary ratios derived from a projected funnel.
///
/// A ratio is `None` when its denominator is zero; callers render it as "n/a".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FunnelMetrics {
    /// `(revenue - spend) / spend`
    pub roi: Option<f64>,
    /// `revenue / spend`
    pub roas: Option<f64>,
    /// `spend / closed_won`
    pub cac: Option<f64>,
    pub cost_per_click: Option<f64>,
    pub cost_per_lead: Option<f64>,
    pub cost_per_mql: Option<f64>,
}

impl FunnelModel {
    pub fn volume(&self, stage: Stage) -> f64 {
        match stage {
            Stage::Impressions => self.impressions,
            Stage::Clicks => self.clicks,
            Stage::Leads => self.leads,
            Stage::Mql => self.mql,
            Stage::Sql => self.sql,
            Stage::Opportunities => self.opportunities,
            Stage::ClosedWon => self.closed_won,
        }
    }

    /// `(stage, volume)` pairs from impressions down to closed-won.
    pub fn stages(&self) -> impl Iterator<Item = (Stage, f64)> + '_ {
        STAGE_ORDER.iter().map(move |stage| (*stage, self.volume(*stage)))
    }

    /// The reverse-mode input that asks for exactly this model's revenue.
    pub fn as_goal(&self) -> CalculatorState {
        CalculatorState {
            revenue_goal: self.revenue,
            avg_deal_size: self.avg_deal_size,
            industry: Industry::default(),
            scale: None,
        }
    }
}

const STAGE_ORDER: [Stage; 7] = [
    Stage::Impressions,
    Stage::Clicks,
    Stage::Leads,
    Stage::Mql,
    Stage::Sql,
    Stage::Opportunities,
    Stage::ClosedWon,
];

/// Project every funnel stage from media spend.
///
/// Each stage is the previous stage times its conversion rate, so with
/// probabilities as rates no stage exceeds its predecessor.
/// Zero spend yields an all-zero model with `roi == None`. Volumes saturate at
/// `f64::MAX`, so the model never carries `inf` or `NaN`.
pub fn compute_forward(assumptions: &Assumptions) -> FunnelModel {
    let rates = &assumptions.rates;
    let spend = assumptions.spend;

    let impressions = if assumptions.cpm > 0.0 {
        saturate(spend / assumptions.cpm * 1000.0)
    } else {
        0.0
    };
    let clicks = saturate(impressions * assumptions.ctr);
    let leads = saturate(clicks * rates.visitor_to_lead);
    let mql = saturate(leads * rates.lead_to_mql);
    let sql = saturate(mql * rates.mql_to_sql);
    let opportunities = saturate(sql * rates.sql_to_opp);
    let closed_won = saturate(opportunities * rates.opp_to_close);
    let revenue = saturate(closed_won * assumptions.avg_deal_size);

    let metrics = FunnelMetrics {
        roi: ratio(revenue - spend, spend),
        roas: ratio(revenue, spend),
        cac: ratio(spend, closed_won),
        cost_per_click: ratio(spend, clicks),
        cost_per_lead: ratio(spend, leads),
        cost_per_mql: ratio(spend, mql),
    };

    FunnelModel {
        impressions,
        clicks,
        leads,
        mql,
        sql,
        opportunities,
        closed_won,
        spend,
        revenue,
        avg_deal_size: assumptions.avg_deal_size,
        metrics,
    }
}

/// `numerator / denominator`, or `None` when the denominator is not positive
/// or the quotient does not fit in an `f64`.
pub(crate) fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator > 0.0)
        .then(|| numerator / denominator)
        .filter(|quotient| quotient.is_finite())
}

// Volumes pin at f64::MAX instead of overflowing to inf.
fn saturate(volume: f64) -> f64 {
    volume.min(f64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funnel::ConversionRates;
    use proptest::prelude::*;

    fn assumptions() -> Assumptions {
        Assumptions {
            spend: 10_000.0,
            cpm: 20.0,
            ctr: 0.02,
            rates: ConversionRates::new(0.05, 0.4, 0.5, 0.5, 0.25),
            avg_deal_size: 5_000.0,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn projects_each_stage_multiplicatively() {
        let model = compute_forward(&assumptions());

        assert_close(model.impressions, 500_000.0);
        assert_close(model.clicks, 10_000.0);
        assert_close(model.leads, 500.0);
        assert_close(model.mql, 200.0);
        assert_close(model.sql, 100.0);
        assert_close(model.opportunities, 50.0);
        assert_close(model.closed_won, 12.5);
        assert_close(model.revenue, 62_500.0);
    }

    #[test]
    fn summary_metrics_follow_spend_and_revenue() {
        let metrics = compute_forward(&assumptions()).metrics;

        assert_close(metrics.roi.unwrap(), 5.25);
        assert_close(metrics.roas.unwrap(), 6.25);
        assert_close(metrics.cac.unwrap(), 800.0);
        assert_close(metrics.cost_per_click.unwrap(), 1.0);
        assert_close(metrics.cost_per_lead.unwrap(), 20.0);
        assert_close(metrics.cost_per_mql.unwrap(), 50.0);
    }

    #[test]
    fn zero_spend_yields_empty_funnel_and_no_roi() {
        let model = compute_forward(&Assumptions {
            spend: 0.0,
            ..assumptions()
        });

        assert!(model.stages().all(|(_, volume)| volume == 0.0));
        assert_eq!(model.revenue, 0.0);
        assert_eq!(model.metrics.roi, None);
        assert_eq!(model.metrics.roas, None);
        assert_eq!(model.metrics.cac, None);
    }

    #[test]
    fn zero_rate_zeroes_everything_downstream() {
        let mut input = assumptions();
        input.rates.mql_to_sql = 0.0;
        let model = compute_forward(&input);

        assert!(model.mql > 0.0);
        assert_eq!(model.sql, 0.0);
        assert_eq!(model.opportunities, 0.0);
        assert_eq!(model.closed_won, 0.0);
        assert_eq!(model.metrics.cac, None);
        assert_eq!(model.metrics.roi, Some(-1.0));
    }

    #[test]
    fn stages_come_out_in_funnel_order() {
        let model = compute_forward(&assumptions());
        let order: Vec<Stage> = model.stages().map(|(stage, _)| stage).collect();
        assert_eq!(order, STAGE_ORDER.to_vec());
    }

    #[test]
    fn as_goal_carries_revenue_and_deal_size() {
        let model = compute_forward(&assumptions());
        let goal = model.as_goal();
        assert_close(goal.revenue_goal, 62_500.0);
        assert_eq!(goal.avg_deal_size, 5_000.0);
    }

    #[test]
    fn overflowing_impressions_saturate_instead_of_going_nan() {
        let model = compute_forward(&Assumptions {
            spend: 1e308,
            cpm: 0.5,
            ctr: 0.0,
            ..assumptions()
        });

        assert_eq!(model.impressions, f64::MAX);
        assert_eq!(model.clicks, 0.0);
        assert_eq!(model.closed_won, 0.0);
        assert_eq!(model.metrics.roi, Some(-1.0));
        assert_eq!(model.metrics.cost_per_click, None);
    }

    fn rate() -> impl Strategy<Value = f64> {
        0.0..=1.0f64
    }

    fn extreme_rate() -> impl Strategy<Value = f64> {
        prop_oneof![Just(0.0), Just(f64::MIN_POSITIVE), Just(1.0), 0.0..=1.0f64]
    }

    proptest! {
        #[test]
        fn stage_volumes_never_grow(
            spend in 0.0..1_000_000.0f64,
            cpm in 0.5..200.0f64,
            ctr in rate(),
            a in rate(), b in rate(), c in rate(), d in rate(), e in rate(),
        ) {
            let model = compute_forward(&Assumptions {
                spend,
                cpm,
                ctr,
                rates: ConversionRates::new(a, b, c, d, e),
                avg_deal_size: 1_000.0,
            });

            let volumes: Vec<f64> = model.stages().map(|(_, v)| v).collect();
            for pair in volumes.windows(2) {
                prop_assert!(pair[1] <= pair[0]);
            }
            for volume in volumes {
                prop_assert!(volume.is_finite() && volume >= 0.0);
            }
        }

        #[test]
        fn extreme_inputs_stay_finite_and_ordered(
            spend in prop_oneof![Just(f64::MAX), 0.0..=f64::MAX],
            cpm in prop_oneof![Just(f64::MIN_POSITIVE), 1e-300..=1e6f64],
            ctr in extreme_rate(),
            a in extreme_rate(), b in extreme_rate(), c in extreme_rate(),
            d in extreme_rate(), e in extreme_rate(),
            deal in prop_oneof![Just(f64::MAX), 1.0..=f64::MAX],
        ) {
            let model = compute_forward(&Assumptions {
                spend,
                cpm,
                ctr,
                rates: ConversionRates::new(a, b, c, d, e),
                avg_deal_size: deal,
            });

            let volumes: Vec<f64> = model.stages().map(|(_, v)| v).collect();
            prop_assert!(volumes.iter().all(|v| v.is_finite() && *v >= 0.0), "{:?}", volumes);
            for pair in volumes.windows(2) {
                prop_assert!(pair[1] <= pair[0]);
            }
            prop_assert!(model.revenue.is_finite());
            let metrics = model.metrics;
            for metric in [
                metrics.roi,
                metrics.roas,
                metrics.cac,
                metrics.cost_per_click,
                metrics.cost_per_lead,
                metrics.cost_per_mql,
            ] {
                prop_assert!(metric.is_none_or(f64::is_finite));
            }
        }
    }
}
