//! Risk-profile scoring and the portfolio catalogue served by the advisor.

use std::fmt;
use std::str::FromStr;

use mudra_shared::{PortfolioItem, Recommendations};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest score that is no longer `Conservative`.
pub const MODERATE_MIN_SCORE: i64 = 10;
/// Highest score that is still `Moderate`.
pub const MODERATE_MAX_SCORE: i64 = 15;

/// Coarse appetite for investment risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskProfile {
    /// Capital preservation.
    Conservative,
    /// Balanced growth.
    Moderate,
    /// High growth.
    Aggressive,
}

/// Raised for a label outside the three profiles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid risk profile provided.")]
pub struct UnknownProfile;

impl RiskProfile {
    /// Classifies a questionnaire by the sum of its answers.
    #[must_use]
    pub fn from_answers(answers: &[i32]) -> Self {
        let score: i64 = answers.iter().map(|&a| i64::from(a)).sum();
        match score {
            s if s < MODERATE_MIN_SCORE => Self::Conservative,
            s if s <= MODERATE_MAX_SCORE => Self::Moderate,
            _ => Self::Aggressive,
        }
    }

    /// Label as exchanged with the advisor.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Conservative => "Conservative",
            Self::Moderate => "Moderate",
            Self::Aggressive => "Aggressive",
        }
    }

    /// The fixed portfolio suggested for this profile.
    #[must_use]
    pub fn recommendations(&self) -> Recommendations {
        let (description, portfolio): (&str, &[(&str, &str, &str)]) = match self {
            Self::Conservative => (
                "Focuses on capital preservation with minimal risk.",
                &[
                    ("Fixed Deposit (FD)", "50%", "Safe, guaranteed returns from a bank."),
                    (
                        "Public Provident Fund (PPF)",
                        "30%",
                        "Government-backed long-term savings scheme.",
                    ),
                    (
                        "Debt Mutual Funds (Liquid Funds)",
                        "20%",
                        "Low-risk funds investing in short-term government securities.",
                    ),
                ],
            ),
            Self::Moderate => (
                "A balanced approach aiming for steady growth with manageable risk.",
                &[
                    (
                        "NIFTY 50 Index Fund",
                        "40%",
                        "Diversified investment in India's top 50 companies.",
                    ),
                    (
                        "Hybrid Mutual Funds",
                        "30%",
                        "A mix of stocks and bonds for balanced growth.",
                    ),
                    (
                        "Gold ETFs / Sovereign Gold Bonds",
                        "15%",
                        "Hedge against inflation and market volatility.",
                    ),
                    ("Fixed Deposit (FD)", "15%", "Provides stability to the portfolio."),
                ],
            ),
            Self::Aggressive => (
                "Aims for high long-term growth by taking on higher market risk.",
                &[
                    (
                        "Equity Mutual Funds (Mid & Small Cap)",
                        "60%",
                        "High growth potential from smaller, dynamic companies.",
                    ),
                    (
                        "NIFTY 50 Index Fund",
                        "25%",
                        "Core of the portfolio with exposure to large-cap stocks.",
                    ),
                    (
                        "International Stocks (e.g., via NASDAQ 100 ETF)",
                        "15%",
                        "Diversification across global markets.",
                    ),
                ],
            ),
        };

        Recommendations {
            description: description.to_string(),
            portfolio: portfolio
                .iter()
                .map(|(instrument, allocation, details)| PortfolioItem {
                    instrument: (*instrument).to_string(),
                    allocation: (*allocation).to_string(),
                    details: (*details).to_string(),
                })
                .collect(),
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskProfile {
    type Err = UnknownProfile;

    /// Exact, case-sensitive match on the label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Conservative" => Ok(Self::Conservative),
            "Moderate" => Ok(Self::Moderate),
            "Aggressive" => Ok(Self::Aggressive),
            _ => Err(UnknownProfile),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[1, 2, 3], RiskProfile::Conservative)]
    #[case(&[9], RiskProfile::Conservative)]
    #[case(&[4, 3, 3], RiskProfile::Moderate)]
    #[case(&[5, 5, 5], RiskProfile::Moderate)]
    #[case(&[4, 4, 4, 4], RiskProfile::Aggressive)]
    #[case(&[-5, 30], RiskProfile::Aggressive)]
    #[case(&[], RiskProfile::Conservative)]
    fn test_from_answers(#[case] answers: &[i32], #[case] expected: RiskProfile) {
        assert_eq!(RiskProfile::from_answers(answers), expected);
    }

    #[test]
    fn test_score_does_not_overflow() {
        let answers = [i32::MAX, i32::MAX];
        assert_eq!(RiskProfile::from_answers(&answers), RiskProfile::Aggressive);
    }

    #[rstest]
    #[case(RiskProfile::Conservative, 3)]
    #[case(RiskProfile::Moderate, 4)]
    #[case(RiskProfile::Aggressive, 3)]
    fn test_catalogue_allocations_sum_to_100(#[case] profile: RiskProfile, #[case] lines: usize) {
        let recs = profile.recommendations();
        assert_eq!(recs.portfolio.len(), lines);

        let total: u32 = recs
            .portfolio
            .iter()
            .map(|p| p.allocation.trim_end_matches('%').parse::<u32>().unwrap())
            .sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_label_parsing_is_exact() {
        assert_eq!("Moderate".parse::<RiskProfile>(), Ok(RiskProfile::Moderate));
        assert_eq!("moderate".parse::<RiskProfile>(), Err(UnknownProfile));
        for profile in [
            RiskProfile::Conservative,
            RiskProfile::Moderate,
            RiskProfile::Aggressive,
        ] {
            assert_eq!(profile.to_string().parse::<RiskProfile>(), Ok(profile));
        }
    }
}
