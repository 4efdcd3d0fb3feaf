//! Benchmark rate tables.
//!
//! Two fixed lookup tables back the calculators:
//!
//! - [`Industry`] → [`ConversionRates`], used to seed both calculators when
//!   the caller picks an industry instead of typing rates.
//! - [`CompanyScale`] → customer-acquisition cost, used to price the
//!   required budget in reverse mode.
//!
//! Both selectors parse from strings (`"saas"`, `"middle-market"`) so that a
//! config file or command line can name them directly.

use super::ConversionRates;
use crate::core::errors::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Industry selector for benchmark conversion rates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Industry {
    /// Cross-industry average.
    #[default]
    Average,
    Saas,
    Ecommerce,
    FinancialServices,
    Healthcare,
    Manufacturing,
    ProfessionalServices,
    Education,
}

impl Industry {
    pub const ALL: [Industry; 8] = [
        Industry::Average,
        Industry::Saas,
        Industry::Ecommerce,
        Industry::FinancialServices,
        Industry::Healthcare,
        Industry::Manufacturing,
        Industry::ProfessionalServices,
        Industry::Education,
    ];

    /// Benchmark rate chain for this industry.
    pub fn rates(&self) -> ConversionRates {
        match self {
            Industry::Average => ConversionRates::new(0.029, 0.31, 0.37, 0.42, 0.27),
            Industry::Saas => ConversionRates::new(0.032, 0.39, 0.38, 0.41, 0.25),
            Industry::Ecommerce => ConversionRates::new(0.025, 0.22, 0.45, 0.50, 0.36),
            Industry::FinancialServices => ConversionRates::new(0.021, 0.36, 0.33, 0.39, 0.22),
            Industry::Healthcare => ConversionRates::new(0.023, 0.28, 0.34, 0.44, 0.24),
            Industry::Manufacturing => ConversionRates::new(0.022, 0.30, 0.36, 0.45, 0.28),
            Industry::ProfessionalServices => {
                ConversionRates::new(0.046, 0.33, 0.40, 0.43, 0.31)
            }
            Industry::Education => ConversionRates::new(0.030, 0.27, 0.31, 0.38, 0.29),
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Industry::Average => "average",
            Industry::Saas => "saas",
            Industry::Ecommerce => "ecommerce",
            Industry::FinancialServices => "financial-services",
            Industry::Healthcare => "healthcare",
            Industry::Manufacturing => "manufacturing",
            Industry::ProfessionalServices => "professional-services",
            Industry::Education => "education",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Industry::Average => "Cross-industry average",
            Industry::Saas => "B2B SaaS",
            Industry::Ecommerce => "E-commerce",
            Industry::FinancialServices => "Financial services",
            Industry::Healthcare => "Healthcare",
            Industry::Manufacturing => "Manufacturing",
            Industry::ProfessionalServices => "Professional services",
            Industry::Education => "Education",
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Industry {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_key(s);
        Industry::ALL
            .iter()
            .copied()
            .find(|industry| industry.slug() == key)
            .ok_or_else(|| Error::Validation(format!("unknown industry '{s}'")))
    }
}

/// Company-scale bracket for acquisition cost.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum CompanyScale {
    Consumer,
    Smb,
    MiddleMarket,
    Enterprise,
}

impl CompanyScale {
    pub const ALL: [CompanyScale; 4] = [
        CompanyScale::Consumer,
        CompanyScale::Smb,
        CompanyScale::MiddleMarket,
        CompanyScale::Enterprise,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            CompanyScale::Consumer => "consumer",
            CompanyScale::Smb => "smb",
            CompanyScale::MiddleMarket => "middle-market",
            CompanyScale::Enterprise => "enterprise",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompanyScale::Consumer => "Consumer",
            CompanyScale::Smb => "SMB",
            CompanyScale::MiddleMarket => "Middle market",
            CompanyScale::Enterprise => "Enterprise",
        }
    }
}

impl fmt::Display for CompanyScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for CompanyScale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_key(s);
        CompanyScale::ALL
            .iter()
            .copied()
            .find(|scale| scale.slug() == key)
            .ok_or_else(|| Error::Validation(format!("unknown company scale '{s}'")))
    }
}

/// Customer-acquisition cost per closed deal for a scale bracket.
pub fn scale_cac(scale: CompanyScale) -> f64 {
    match scale {
        CompanyScale::Consumer => 45.0,
        CompanyScale::Smb => 650.0,
        CompanyScale::MiddleMarket => 4_800.0,
        CompanyScale::Enterprise => 18_500.0,
    }
}

// "Middle Market", "middle_market" and "MIDDLE-MARKET" all name the same bracket.
fn normalize_key(s: &str) -> String {
    s.trim()
        .to_ascii_lowercase()
        .replace([' ', '_'], "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_rate_is_a_probability() {
        for industry in Industry::ALL {
            for (transition, rate) in industry.rates().iter() {
                assert!(
                    (0.0..=1.0).contains(&rate),
                    "{industry} {transition} = {rate}"
                );
            }
        }
    }

    #[test]
    fn industry_parses_from_slug_and_loose_spelling() {
        assert_eq!("saas".parse::<Industry>().unwrap(), Industry::Saas);
        assert_eq!(
            "Financial Services".parse::<Industry>().unwrap(),
            Industry::FinancialServices
        );
        assert_eq!(
            "professional_services".parse::<Industry>().unwrap(),
            Industry::ProfessionalServices
        );
    }

    #[test]
    fn unknown_industry_is_a_validation_error() {
        let err = "aerospace".parse::<Industry>().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn scale_parses_all_brackets() {
        for scale in CompanyScale::ALL {
            assert_eq!(scale.slug().parse::<CompanyScale>().unwrap(), scale);
        }
        assert_eq!(
            "Middle Market".parse::<CompanyScale>().unwrap(),
            CompanyScale::MiddleMarket
        );
    }

    #[test]
    fn cac_grows_with_scale() {
        let costs: Vec<f64> = CompanyScale::ALL.iter().map(|s| scale_cac(*s)).collect();
        assert!(costs.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
