//! Accounts, profiles and email verification.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use kara_macros::Record;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of digits in a verification code.
pub const CODE_LENGTH: usize = 6;

/// Minutes a verification code stays valid after it was issued.
pub const CODE_TTL_MINUTES: i64 = 10;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Record)]
pub struct User {
    #[field(Numeric)]
    pub id: u64,
    #[field(ShortText)]
    pub username: String,
    #[field(ShortText)]
    pub email: String,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}

/// Profile attached to every user.
#[derive(Debug, Clone, Record)]
#[record(name = "user_profile", primary_key = "user")]
pub struct UserProfile {
    #[field(Reference, to = User)]
    pub user: Arc<User>,
    #[field(LongText, label = "About Me")]
    pub bio: Option<String>,
    #[field(Boolean, label = "Email Confirmed ?")]
    pub email_confirmed: bool,
}

impl UserProfile {
    /// Profile created alongside a new user: no bio, email unconfirmed.
    pub fn for_user(user: Arc<User>) -> Self {
        UserProfile {
            user,
            bio: None,
            email_confirmed: false,
        }
    }

    /// Marks the email confirmed once `input` verifies against `code`.
    ///
    /// The profile is left untouched when verification fails.
    pub fn confirm_email(
        &mut self,
        code: &mut VerificationCode,
        input: &str,
        now: DateTime<Utc>,
    ) -> Result<(), VerificationError> {
        code.verify(input, now)?;
        self.email_confirmed = true;
        Ok(())
    }

    /// Status line shown next to the confirmation flag.
    pub fn email_status(&self) -> &'static str {
        if self.email_confirmed {
            "You have verified your email."
        } else {
            "You have not verified your email yet. \
             Some features may be limited until you verify your email."
        }
    }
}

impl fmt::Display for UserProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user.username)
    }
}

/// Reasons a verification code is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("The verification code does not match.")]
    Mismatch,

    #[error("The verification code has expired.")]
    Expired,

    #[error("The verification code has already been used.")]
    AlreadyUsed,
}

/// A single-use code mailed to confirm an email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCode {
    code: String,
    email: String,
    issued_at: DateTime<Utc>,
    used: bool,
}

impl VerificationCode {
    /// Issues a fresh random code for `email`.
    pub fn issue<R: Rng + ?Sized>(rng: &mut R, email: impl Into<String>, now: DateTime<Utc>) -> Self {
        let code: String = (0..CODE_LENGTH)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect();
        VerificationCode::with_code(code, email, now)
    }

    /// Wraps a known code, e.g. one restored from a session.
    pub fn with_code(code: impl Into<String>, email: impl Into<String>, now: DateTime<Utc>) -> Self {
        VerificationCode {
            code: code.into(),
            email: email.into(),
            issued_at: now,
            used: false,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued_at + TimeDelta::minutes(CODE_TTL_MINUTES)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at()
    }

    pub fn is_used(&self) -> bool {
        self.used
    }

    /// Checks `input` against the code and consumes it on success.
    ///
    /// Spaces are ignored and the comparison is case-insensitive, so
    /// `"123 456"` verifies a `123456` code.
    pub fn verify(&mut self, input: &str, now: DateTime<Utc>) -> Result<(), VerificationError> {
        if self.used {
            return Err(VerificationError::AlreadyUsed);
        }
        if self.is_expired(now) {
            return Err(VerificationError::Expired);
        }

        let expected = normalize_code(&self.code);
        if expected.is_empty() || expected != normalize_code(input) {
            return Err(VerificationError::Mismatch);
        }

        self.used = true;
        Ok(())
    }
}

fn normalize_code(code: &str) -> String {
    code.replace(' ', "").to_lowercase()
}
