//! Buyer profile and its immutable update function.

use super::engagement::{engagement_breakdown, engagement_score, ActionContribution, EngagementEvent};
use super::fit::{fit_score, FitFactor, Firmographics};
use super::state::{determine_state_with, BuyerState, ScoringThresholds};
use chrono::{DateTime, Utc};
use im::Vector;
use serde::{Deserialize, Serialize};

/// Resolved identity of a visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Everything scoring needs to know about one buyer.
///
/// `events` is kept ordered by timestamp. Profiles are updated through
/// [`ScoringProfile::apply`], which returns a new profile and shares the
/// unchanged part of the log with the old one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoringProfile {
    #[serde(default)]
    pub identity: Option<Identity>,
    #[serde(default)]
    pub firmographics: Firmographics,
    #[serde(default)]
    pub events: Vector<EngagementEvent>,
}

/// Something that happened to a buyer.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileEvent {
    Identify(Identity),
    Engage(EngagementEvent),
    UpdateFirmographics(Firmographics),
}

impl ScoringProfile {
    pub fn has_identity(&self) -> bool {
        self.identity.is_some()
    }

    pub fn last_engaged_at(&self) -> Option<DateTime<Utc>> {
        self.events.last().map(|event| event.at)
    }

    /// Produce the profile that results from `event`.
    pub fn apply(&self, event: ProfileEvent) -> ScoringProfile {
        match event {
            ProfileEvent::Identify(identity) => ScoringProfile {
                identity: Some(identity),
                ..self.clone()
            },
            ProfileEvent::UpdateFirmographics(firmographics) => ScoringProfile {
                firmographics,
                ..self.clone()
            },
            ProfileEvent::Engage(engagement) => {
                let mut events = self.events.clone();
                // Late-arriving events slot in behind anything at the same instant.
                let position = events
                    .iter()
                    .position(|existing| existing.at > engagement.at)
                    .unwrap_or(events.len());
                events.insert(position, engagement);
                ScoringProfile {
                    events,
                    ..self.clone()
                }
            }
        }
    }

    /// Sort the log by timestamp; used after loading a profile from disk.
    pub fn normalized(mut self) -> ScoringProfile {
        self.events.sort_by(|a, b| a.at.cmp(&b.at));
        self
    }
}

/// Scored view of a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadScore {
    pub fit: u32,
    pub engagement: u32,
    pub total: u32,
    pub state: BuyerState,
    pub fit_breakdown: Vec<(FitFactor, u32)>,
    pub engagement_breakdown: Vec<ActionContribution>,
    pub last_engaged_at: Option<DateTime<Utc>>,
}

/// Score a profile from scratch.
pub fn score_profile(profile: &ScoringProfile, thresholds: &ScoringThresholds) -> LeadScore {
    let fit = fit_score(&profile.firmographics);
    let engagement = engagement_score(&profile.events);
    let state = determine_state_with(fit, engagement, profile.has_identity(), thresholds);

    log::trace!(
        "scored profile: fit={fit} engagement={engagement} state={}",
        state
    );

    LeadScore {
        fit,
        engagement,
        total: fit + engagement,
        state,
        fit_breakdown: profile.firmographics.breakdown(),
        engagement_breakdown: engagement_breakdown(&profile.events),
        last_engaged_at: profile.last_engaged_at(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::engagement::EngagementAction;
    use crate::scoring::fit::{CompanySize, Geography, Role, Vertical};
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 2, hour, 0, 0).unwrap()
    }

    fn engage(action: EngagementAction, hour: u32) -> ProfileEvent {
        ProfileEvent::Engage(EngagementEvent {
            action,
            at: at(hour),
        })
    }

    fn identity() -> ProfileEvent {
        ProfileEvent::Identify(Identity {
            email: "buyer@example.com".into(),
            name: None,
        })
    }

    #[test]
    fn anonymous_profile_is_unknown_unknown() {
        let profile = ScoringProfile::default().apply(engage(EngagementAction::PageView, 9));
        let score = score_profile(&profile, &ScoringThresholds::default());
        assert_eq!(score.state, BuyerState::UnknownUnknown);
        assert_eq!(score.engagement, 1);
    }

    #[test]
    fn identify_without_engagement_is_known_unknown() {
        let profile = ScoringProfile::default().apply(identity());
        let score = score_profile(&profile, &ScoringThresholds::default());
        assert_eq!(score.state, BuyerState::KnownUnknown);
    }

    #[test]
    fn buyer_progresses_to_sql() {
        let thresholds = ScoringThresholds::default();
        let profile = ScoringProfile::default()
            .apply(identity())
            .apply(ProfileEvent::UpdateFirmographics(Firmographics {
                company_size: Some(CompanySize::MidMarket),
                industry: Some(Vertical::Saas),
                role: Some(Role::Director),
                geography: Some(Geography::NorthAmerica),
            }))
            .apply(engage(EngagementAction::PricingPageView, 9));

        // fit 50 (53 clamped) + engagement 10
        let score = score_profile(&profile, &thresholds);
        assert_eq!(score.fit, 50);
        assert_eq!(score.state, BuyerState::Mql);

        let profile = profile.apply(engage(EngagementAction::DemoRequest, 10));
        let score = score_profile(&profile, &thresholds);
        assert_eq!(score.total, 80);
        assert_eq!(score.state, BuyerState::Sql);
    }

    #[test]
    fn apply_leaves_the_original_untouched() {
        let before = ScoringProfile::default().apply(identity());
        let after = before.apply(engage(EngagementAction::BlogRead, 9));
        assert!(before.events.is_empty());
        assert_eq!(after.events.len(), 1);
    }

    #[test]
    fn events_stay_in_timestamp_order() {
        let profile = ScoringProfile::default()
            .apply(engage(EngagementAction::PageView, 12))
            .apply(engage(EngagementAction::BlogRead, 8))
            .apply(engage(EngagementAction::EmailOpen, 10));

        let hours: Vec<DateTime<Utc>> = profile.events.iter().map(|e| e.at).collect();
        assert_eq!(hours, vec![at(8), at(10), at(12)]);
        assert_eq!(profile.last_engaged_at(), Some(at(12)));
    }

    #[test]
    fn normalized_sorts_a_loaded_log() {
        let json = r#"{
            "identity": {"email": "a@b.co"},
            "events": [
                {"action": "demo-request", "at": "2026-04-02T12:00:00Z"},
                {"action": "page-view", "at": "2026-04-02T08:00:00Z"}
            ]
        }"#;
        let profile: ScoringProfile = serde_json::from_str(json).unwrap();
        let profile = profile.normalized();
        assert_eq!(profile.events[0].action, EngagementAction::PageView);
        assert_eq!(profile.firmographics, Firmographics::default());
    }
}
