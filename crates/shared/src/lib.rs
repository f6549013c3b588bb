//! Shared configuration, errors, tokens and collaborator clients for Mudra.
//!
//! This crate provides common pieces used across all other crates:
//! - Application-wide error types
//! - Configuration management
//! - JWT issuing and validation
//! - The OTP mailer and advisor clients (every external collaborator lives here)

pub mod advisor;
pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod jwt;


pub use advisor::{Advisor, AdvisorClient, AdvisorError, PortfolioItem, Recommendations};
pub use auth::{Claims, TokenUser};
pub use config::AppConfig;
pub use email::{EmailError, EmailService, OtpMailer};
pub use error::AppError;
pub use jwt::{JwtError, JwtService};
