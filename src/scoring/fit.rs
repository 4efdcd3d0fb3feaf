//! Firmographic fit score.
//!
//! Four factors, each looked up from a fixed point table worth 0-15 points.
//! The sum is clamped to [`MAX_FIT_SCORE`]. Unknown attributes score zero.

use serde::{Deserialize, Serialize};

pub const MAX_FIT_SCORE: u32 = 50;

/// Ceiling for any single factor.
pub const MAX_FACTOR_POINTS: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitFactor {
    CompanySize,
    Industry,
    Role,
    Geography,
}

impl FitFactor {
    pub const ALL: [FitFactor; 4] = [
        FitFactor::CompanySize,
        FitFactor::Industry,
        FitFactor::Role,
        FitFactor::Geography,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FitFactor::CompanySize => "Company size",
            FitFactor::Industry => "Industry",
            FitFactor::Role => "Role",
            FitFactor::Geography => "Geography",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompanySize {
    Enterprise,
    MidMarket,
    Smb,
    Startup,
    Solo,
}

impl CompanySize {
    pub fn points(&self) -> u32 {
        match self {
            CompanySize::Enterprise => 15,
            CompanySize::MidMarket => 12,
            CompanySize::Smb => 8,
            CompanySize::Startup => 5,
            CompanySize::Solo => 1,
        }
    }
}

/// Buyer's vertical, scored against the ideal customer profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Vertical {
    Saas,
    FinancialServices,
    ProfessionalServices,
    Healthcare,
    Manufacturing,
    Ecommerce,
    Education,
    Other,
}

impl Vertical {
    pub fn points(&self) -> u32 {
        match self {
            Vertical::Saas => 15,
            Vertical::FinancialServices => 12,
            Vertical::ProfessionalServices => 11,
            Vertical::Healthcare => 9,
            Vertical::Manufacturing => 8,
            Vertical::Ecommerce => 6,
            Vertical::Education => 4,
            Vertical::Other => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Executive,
    VicePresident,
    Director,
    Manager,
    IndividualContributor,
    Student,
}

impl Role {
    pub fn points(&self) -> u32 {
        match self {
            Role::Executive => 15,
            Role::VicePresident => 13,
            Role::Director => 11,
            Role::Manager => 8,
            Role::IndividualContributor => 4,
            Role::Student => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Geography {
    NorthAmerica,
    WesternEurope,
    AsiaPacific,
    LatinAmerica,
    Other,
}

impl Geography {
    pub fn points(&self) -> u32 {
        match self {
            Geography::NorthAmerica => 15,
            Geography::WesternEurope => 12,
            Geography::AsiaPacific => 8,
            Geography::LatinAmerica => 6,
            Geography::Other => 3,
        }
    }
}

/// What is known about the buyer's company and position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Firmographics {
    #[serde(default)]
    pub company_size: Option<CompanySize>,
    #[serde(default)]
    pub industry: Option<Vertical>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub geography: Option<Geography>,
}

impl Firmographics {
    /// Points contributed by one factor; zero when the attribute is unknown.
    pub fn points(&self, factor: FitFactor) -> u32 {
        let points = match factor {
            FitFactor::CompanySize => self.company_size.map(|v| v.points()),
            FitFactor::Industry => self.industry.map(|v| v.points()),
            FitFactor::Role => self.role.map(|v| v.points()),
            FitFactor::Geography => self.geography.map(|v| v.points()),
        };
        points.unwrap_or(0).min(MAX_FACTOR_POINTS)
    }

    pub fn breakdown(&self) -> Vec<(FitFactor, u32)> {
        FitFactor::ALL
            .iter()
            .map(|factor| (*factor, self.points(*factor)))
            .collect()
    }
}

/// Total fit score, clamped to `[0, MAX_FIT_SCORE]`.
pub fn fit_score(firmographics: &Firmographics) -> u32 {
    FitFactor::ALL
        .iter()
        .map(|factor| firmographics.points(*factor))
        .sum::<u32>()
        .min(MAX_FIT_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_profile_scores_zero() {
        assert_eq!(fit_score(&Firmographics::default()), 0);
    }

    #[test]
    fn ideal_profile_is_clamped_to_ceiling() {
        let ideal = Firmographics {
            company_size: Some(CompanySize::Enterprise),
            industry: Some(Vertical::Saas),
            role: Some(Role::Executive),
            geography: Some(Geography::NorthAmerica),
        };
        assert_eq!(fit_score(&ideal), MAX_FIT_SCORE);
    }

    #[test]
    fn partial_profile_sums_known_factors() {
        let partial = Firmographics {
            company_size: Some(CompanySize::Smb),
            role: Some(Role::Manager),
            ..Default::default()
        };
        assert_eq!(fit_score(&partial), 16);
        assert_eq!(
            partial.breakdown(),
            vec![
                (FitFactor::CompanySize, 8),
                (FitFactor::Industry, 0),
                (FitFactor::Role, 8),
                (FitFactor::Geography, 0),
            ]
        );
    }

    #[test]
    fn firmographics_deserialize_from_kebab_case() {
        let json = r#"{"company_size": "mid-market", "role": "vice-president"}"#;
        let firmographics: Firmographics = serde_json::from_str(json).unwrap();
        assert_eq!(firmographics.company_size, Some(CompanySize::MidMarket));
        assert_eq!(firmographics.role, Some(Role::VicePresident));
        assert_eq!(firmographics.geography, None);
    }
}
