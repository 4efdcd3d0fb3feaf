use super::{emit, OutputTarget};
use crate::config::FunnelmapConfig;
use crate::core::errors::{Error, Result as CoreResult};
use crate::io::{self, Report};
use crate::scoring::{score_profile, ScoringProfile};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct ScoreConfig {
    pub profile: PathBuf,
    pub output: OutputTarget,
}

/// Read a profile JSON file; events are re-sorted by timestamp.
pub fn load_profile(path: &Path) -> CoreResult<ScoringProfile> {
    let contents = io::read_file(path).map_err(|e| Error::invalid_file(path, e.to_string()))?;
    let profile: ScoringProfile = serde_json::from_str(&contents)
        .map_err(|e| Error::invalid_file(path, e.to_string()))?;
    log::debug!(
        "Loaded profile from {} with {} events",
        path.display(),
        profile.events.len()
    );
    Ok(profile.normalized())
}

pub fn run_score(config: ScoreConfig, settings: &FunnelmapConfig) -> Result<()> {
    let profile = load_profile(&config.profile).context("Failed to load profile")?;
    let score = score_profile(&profile, &settings.scoring());
    emit(&Report::Score { score }, &config.output, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{BuyerState, EngagementAction};
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn loads_and_orders_events() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lead.json");
        std::fs::write(
            &path,
            indoc! {r#"
                {
                  "identity": { "email": "pat@example.com" },
                  "firmographics": {
                    "company_size": "enterprise",
                    "industry": "saas",
                    "role": "director",
                    "geography": "north-america"
                  },
                  "events": [
                    { "action": "demo-request", "at": "2026-03-02T10:00:00Z" },
                    { "action": "pricing-page-view", "at": "2026-03-01T09:00:00Z" }
                  ]
                }
            "#},
        )
        .unwrap();

        let profile = load_profile(&path).unwrap();
        let actions: Vec<EngagementAction> = profile.events.iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![EngagementAction::PricingPageView, EngagementAction::DemoRequest]
        );

        let score = score_profile(&profile, &Default::default());
        // 56 raw fit points, capped
        assert_eq!(score.fit, 50);
        assert_eq!(score.engagement, 30);
        assert_eq!(score.state, BuyerState::Sql);
    }

    #[test]
    fn malformed_profile_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ \"events\": [ { \"action\": \"teleport\" } ] }").unwrap();

        let err = load_profile(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidFile { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
