//! Behavioral lead scoring.
//!
//! A buyer's total score (0-100) is the sum of two halves:
//!
//! - **Fit** (0-50): who they are, from a fixed firmographic lookup
//!   ([`fit`]).
//! - **Engagement** (0-50): what they did, from their action log
//!   ([`engagement`]).
//!
//! The total maps to one of five ordered [`BuyerState`]s ([`state`]). The
//! mapping is a pure classification and is recomputed on every event; no
//! history of state changes is kept.
//!
//! # Example
//!
//! ```rust
//! use funnelmap::scoring::{determine_state, BuyerState};
//!
//! assert_eq!(determine_state(0, 0, false), BuyerState::UnknownUnknown);
//! assert_eq!(determine_state(15, 10, true), BuyerState::KnownLead);
//! assert_eq!(determine_state(40, 20, true), BuyerState::Mql);
//! ```

pub mod engagement;
pub mod fit;
pub mod profile;
pub mod state;

pub use engagement::{
    engagement_breakdown, engagement_score, ActionContribution, EngagementAction, EngagementEvent,
    MAX_ENGAGEMENT_SCORE,
};
pub use fit::{fit_score, FitFactor, Firmographics, MAX_FIT_SCORE};
pub use profile::{score_profile, Identity, LeadScore, ProfileEvent, ScoringProfile};
pub use state::{determine_state, determine_state_with, BuyerState, ScoringThresholds};
