//! Risk questionnaire and investment recommendations.
//!
//! `RiskService` delegates classification and recommendations to the
//! advisor. `RiskProfile` holds the scoring rule and catalogue the advisor
//! binary serves.

pub mod profile;
pub mod service;

#[cfg(test)]
mod tests;

pub use profile::{RiskProfile, UnknownProfile};
pub use service::{RiskAssessment, RiskError, RiskService, RiskSubmission};
