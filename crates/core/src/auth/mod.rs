//! Account registration, email verification and login.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Six-digit one-time codes with an expiry
//! - The `UserStore` seam and the `AuthService` built on it

mod error;
mod otp;
mod password;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use error::AuthError;
pub use otp::{IssuedOtp, generate_code};
pub use password::{PasswordError, hash_password, verify_password};
pub use service::AuthService;
pub use types::{
    CredentialsRequest, NewUser, Registration, RegistrationOutcome, Session, SessionUser, User,
    UserStore, VerifyOtpRequest,
};
