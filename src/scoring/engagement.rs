//! Behavioral engagement score.
//!
//! Each logged action is worth a fixed number of points. Repeatable actions
//! (page views, email clicks) count every time; one-off actions (a demo
//! request, a trial signup) count once no matter how often they were logged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub const MAX_ENGAGEMENT_SCORE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngagementAction {
    PageView,
    BlogRead,
    EmailOpen,
    EmailClick,
    CaseStudyView,
    ContentDownload,
    NewsletterSignup,
    PricingPageView,
    WebinarAttended,
    TrialSignup,
    DemoRequest,
    ContactSales,
}

impl EngagementAction {
    pub fn points(&self) -> u32 {
        match self {
            EngagementAction::PageView => 1,
            EngagementAction::BlogRead => 2,
            EngagementAction::EmailOpen => 1,
            EngagementAction::EmailClick => 3,
            EngagementAction::CaseStudyView => 4,
            EngagementAction::ContentDownload => 8,
            EngagementAction::NewsletterSignup => 5,
            EngagementAction::PricingPageView => 10,
            EngagementAction::WebinarAttended => 12,
            EngagementAction::TrialSignup => 15,
            EngagementAction::DemoRequest => 20,
            EngagementAction::ContactSales => 25,
        }
    }

    /// Whether repeated log entries keep adding points.
    pub fn is_repeatable(&self) -> bool {
        matches!(
            self,
            EngagementAction::PageView
                | EngagementAction::BlogRead
                | EngagementAction::EmailOpen
                | EngagementAction::EmailClick
                | EngagementAction::CaseStudyView
                | EngagementAction::ContentDownload
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            EngagementAction::PageView => "Page view",
            EngagementAction::BlogRead => "Blog read",
            EngagementAction::EmailOpen => "Email open",
            EngagementAction::EmailClick => "Email click",
            EngagementAction::CaseStudyView => "Case study view",
            EngagementAction::ContentDownload => "Content download",
            EngagementAction::NewsletterSignup => "Newsletter signup",
            EngagementAction::PricingPageView => "Pricing page view",
            EngagementAction::WebinarAttended => "Webinar attended",
            EngagementAction::TrialSignup => "Trial signup",
            EngagementAction::DemoRequest => "Demo request",
            EngagementAction::ContactSales => "Contact sales",
        }
    }
}

/// One logged action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementEvent {
    pub action: EngagementAction,
    pub at: DateTime<Utc>,
}

/// Points an action contributed after de-duplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionContribution {
    pub action: EngagementAction,
    /// Log entries for this action.
    pub logged: usize,
    /// Entries that earned points.
    pub counted: usize,
    pub points: u32,
}

/// Per-action contributions, ordered by action.
pub fn engagement_breakdown<'a>(
    events: impl IntoIterator<Item = &'a EngagementEvent>,
) -> Vec<ActionContribution> {
    let mut by_action: BTreeMap<EngagementAction, usize> = BTreeMap::new();
    for event in events {
        *by_action.entry(event.action).or_default() += 1;
    }

    by_action
        .into_iter()
        .map(|(action, logged)| {
            let counted = if action.is_repeatable() { logged } else { 1 };
            ActionContribution {
                action,
                logged,
                counted,
                points: contribution_points(action, counted),
            }
        })
        .collect()
}

fn contribution_points(action: EngagementAction, counted: usize) -> u32 {
    action
        .points()
        .saturating_mul(u32::try_from(counted).unwrap_or(u32::MAX))
}

/// Engagement score over a log, clamped to `[0, MAX_ENGAGEMENT_SCORE]`.
pub fn engagement_score<'a>(events: impl IntoIterator<Item = &'a EngagementEvent>) -> u32 {
    let mut seen_once = HashSet::new();
    let raw: u32 = events
        .into_iter()
        .filter(|event| event.action.is_repeatable() || seen_once.insert(event.action))
        .map(|event| event.action.points())
        .fold(0u32, u32::saturating_add);
    raw.min(MAX_ENGAGEMENT_SCORE)
}
