//! One-time verification codes.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use super::error::AuthError;

/// Smallest code that still has six digits.
const OTP_MIN: u32 = 100_000;
/// Largest six-digit code.
const OTP_MAX: u32 = 999_999;

/// A freshly issued code and when it stops being accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedOtp {
    /// Six ASCII digits, no leading zero.
    pub code: String,
    /// Last instant the code is valid.
    pub expires_at: DateTime<Utc>,
}

impl IssuedOtp {
    /// Issues a new random code valid for `ttl` from `now`.
    ///
    /// An expiry past the representable range saturates.
    #[must_use]
    pub fn issue(now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            code: generate_code(),
            expires_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }
}

/// Draws a uniformly random six-digit code.
#[must_use]
pub fn generate_code() -> String {
    rand::rng().random_range(OTP_MIN..=OTP_MAX).to_string()
}

/// Checks a presented code against what is stored for the account.
///
/// # Errors
///
/// - `NoPendingOtp` if nothing is stored
/// - `InvalidOtp` if the codes differ
/// - `OtpExpired` if `now` is past the stored expiry
pub fn check(
    stored_code: Option<&str>,
    stored_expiry: Option<DateTime<Utc>>,
    presented: &str,
    now: DateTime<Utc>,
) -> Result<(), AuthError> {
    let (Some(code), Some(expires_at)) = (stored_code, stored_expiry) else {
        return Err(AuthError::NoPendingOtp);
    };

    if code != presented.trim() {
        return Err(AuthError::InvalidOtp);
    }
    if now > expires_at {
        return Err(AuthError::OtpExpired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_issue_sets_expiry() {
        let otp = IssuedOtp::issue(at(0), Duration::minutes(10));
        assert_eq!(otp.expires_at, at(600));
        assert_eq!(otp.code.len(), 6);
    }

    #[test]
    fn test_issue_saturates_huge_lifetime() {
        let otp = IssuedOtp::issue(at(0), Duration::MAX);
        assert_eq!(otp.expires_at, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_check_accepts_matching_code_before_expiry() {
        assert!(check(Some("123456"), Some(at(600)), "123456", at(599)).is_ok());
        // Expiry instant itself is still valid.
        assert!(check(Some("123456"), Some(at(600)), "123456", at(600)).is_ok());
    }

    #[test]
    fn test_check_rejects_mismatch() {
        let err = check(Some("123456"), Some(at(600)), "654321", at(1)).unwrap_err();
        assert!(matches!(err, AuthError::InvalidOtp));
    }

    #[test]
    fn test_check_rejects_expired() {
        let err = check(Some("123456"), Some(at(600)), "123456", at(601)).unwrap_err();
        assert!(matches!(err, AuthError::OtpExpired));
    }

    #[test]
    fn test_check_without_pending_code() {
        let err = check(None, None, "123456", at(0)).unwrap_err();
        assert!(matches!(err, AuthError::NoPendingOtp));
    }

    proptest! {
        #[test]
        fn test_generated_codes_are_six_digits(_seed in 0u8..64) {
            let code = generate_code();
            prop_assert_eq!(code.len(), 6);
            prop_assert!(code.chars().all(|c| c.is_ascii_digit()));
            prop_assert!(!code.starts_with('0'));
        }
    }
}
