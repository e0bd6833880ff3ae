//! One-time code entity.
//!
//! A code is bound to an email (a matching user need not exist yet), lives
//! for a fixed window from issuance and is consumable exactly once. The
//! store guarantees at most one live (unused) code per email.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::Rng;
use uuid::Uuid;

use crate::config::OTP_LENGTH;

/// One-time code issued during phase-1 login.
#[derive(Debug, Clone)]
pub struct OtpCode {
    pub id: Uuid,
    pub email: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl OtpCode {
    /// Issue a fresh code for an email with the given time-to-live.
    pub fn issue(email: impl Into<String>, ttl_minutes: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            code: generate_code(),
            expires_at: now + Duration::minutes(ttl_minutes),
            used: false,
            created_at: now,
        }
    }

    /// Whether the code is past its expiry window.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Generate a fixed-length numeric code from a CSPRNG.
fn generate_code() -> String {
    let mut rng = OsRng;
    (0..OTP_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_codes_are_six_digits() {
        let otp = OtpCode::issue("a@sion.com", 15);
        assert_eq!(otp.code.len(), OTP_LENGTH);
        assert!(otp.code.chars().all(|c| c.is_ascii_digit()));
        assert!(!otp.used);
    }

    #[test]
    fn expiry_is_checked_against_the_window() {
        let otp = OtpCode::issue("a@sion.com", 15);
        assert!(!otp.is_expired(Utc::now()));
        assert!(otp.is_expired(Utc::now() + Duration::minutes(16)));
    }
}
