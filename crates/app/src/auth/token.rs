//! Session token signing and verification.
//!
//! Tokens are HS256 JWTs carrying the operator's name and role. Expiry is
//! checked against a caller-supplied clock so verification is deterministic
//! under test.

use std::fmt;

use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    domain::users::{Role, UserRef},
    secret::Secret,
};

/// Lifetime of a session token from issuance.
pub const SESSION_TTL: SignedDuration = SignedDuration::from_hours(12);

/// Claims embedded in a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user: String,
    pub role: Role,

    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,

    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl SessionClaims {
    #[must_use]
    pub fn identity(&self) -> UserRef {
        UserRef::new(self.user.clone(), self.role)
    }

    /// # Errors
    ///
    /// Returns an error when `exp` is outside the representable range.
    pub fn expires_at(&self) -> Result<Timestamp, SessionTokenError> {
        Timestamp::from_second(self.exp).map_err(SessionTokenError::Clock)
    }
}

/// A freshly signed token together with its claims.
#[derive(Clone)]
pub struct SignedSession {
    pub token: String,
    pub claims: SessionClaims,
}

impl fmt::Debug for SignedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedSession")
            .field("token", &"**redacted**")
            .field("claims", &self.claims)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum SessionTokenError {
    #[error("failed to sign session token")]
    Sign(#[source] jsonwebtoken::errors::Error),

    #[error("session token is invalid")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("session token has expired")]
    Expired,

    #[error("session timestamp out of range")]
    Clock(#[source] jiff::Error),
}

/// Signs and verifies session tokens with a server-held secret.
#[derive(Clone)]
pub struct SessionSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl SessionSigner {
    #[must_use]
    pub fn new(secret: &Secret) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);

        // Expiry is compared against the caller's clock in `verify_at`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Self {
            encoding: EncodingKey::from_secret(secret.expose().as_bytes()),
            decoding: DecodingKey::from_secret(secret.expose().as_bytes()),
            validation,
        }
    }

    /// Sign a token for `identity`, valid for [`SESSION_TTL`] from `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the expiry overflows or signing fails.
    pub fn issue_at(
        &self,
        identity: &UserRef,
        now: Timestamp,
    ) -> Result<SignedSession, SessionTokenError> {
        let expires_at = now
            .checked_add(SESSION_TTL)
            .map_err(SessionTokenError::Clock)?;

        let claims = SessionClaims {
            user: identity.name.clone(),
            role: identity.role,
            iat: now.as_second(),
            exp: expires_at.as_second(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(SessionTokenError::Sign)?;

        Ok(SignedSession { token, claims })
    }

    /// # Errors
    ///
    /// See [`SessionSigner::issue_at`].
    pub fn issue(&self, identity: &UserRef) -> Result<SignedSession, SessionTokenError> {
        self.issue_at(identity, Timestamp::now())
    }

    /// Verify signature and expiry of `token` as of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionTokenError::Invalid`] for malformed or tampered tokens
    /// and [`SessionTokenError::Expired`] once `now` reaches the expiry.
    pub fn verify_at(&self, token: &str, now: Timestamp) -> Result<SessionClaims, SessionTokenError> {
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map_err(SessionTokenError::Invalid)?;

        if now.as_second() >= data.claims.exp {
            return Err(SessionTokenError::Expired);
        }

        Ok(data.claims)
    }

    /// # Errors
    ///
    /// See [`SessionSigner::verify_at`].
    pub fn verify(&self, token: &str) -> Result<SessionClaims, SessionTokenError> {
        self.verify_at(token, Timestamp::now())
    }
}

impl fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionSigner(**redacted**)")
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn signer(secret: &str) -> Result<SessionSigner, crate::errors::ConfigurationError> {
        Ok(SessionSigner::new(&Secret::new("SESSION_SECRET", secret)?))
    }

    fn alice() -> UserRef {
        UserRef::new("alice", Role::Staff)
    }

    #[test]
    fn issued_token_verifies_with_same_claims() -> TestResult {
        let signer = signer("correct horse battery staple")?;
        let now: Timestamp = "2024-01-01T10:00:00Z".parse()?;

        let signed = signer.issue_at(&alice(), now)?;
        let claims = signer.verify_at(&signed.token, now)?;

        assert_eq!(claims, signed.claims);
        assert_eq!(claims.identity(), alice());
        assert_eq!(claims.exp - claims.iat, 12 * 60 * 60);

        Ok(())
    }

    #[test]
    fn token_expires_twelve_hours_after_issue() -> TestResult {
        let signer = signer("correct horse battery staple")?;
        let issued_at: Timestamp = "2024-01-01T10:00:00Z".parse()?;
        let signed = signer.issue_at(&alice(), issued_at)?;

        let just_before = issued_at.checked_add(SESSION_TTL - SignedDuration::from_secs(1))?;
        let at_expiry = issued_at.checked_add(SESSION_TTL)?;

        assert!(signer.verify_at(&signed.token, just_before).is_ok());
        assert!(matches!(
            signer.verify_at(&signed.token, at_expiry),
            Err(SessionTokenError::Expired)
        ));

        Ok(())
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() -> TestResult {
        let now: Timestamp = "2024-01-01T10:00:00Z".parse()?;
        let signed = signer("first secret")?.issue_at(&alice(), now)?;

        let result = signer("second secret")?.verify_at(&signed.token, now);

        assert!(matches!(result, Err(SessionTokenError::Invalid(_))));

        Ok(())
    }

    #[test]
    fn tampered_claims_invalidate_signature() -> TestResult {
        let signer = signer("correct horse battery staple")?;
        let now: Timestamp = "2024-01-01T10:00:00Z".parse()?;
        let signed = signer.issue_at(&alice(), now)?;

        let forged_claims = SessionClaims {
            role: Role::Admin,
            ..signed.claims.clone()
        };
        let forged_payload = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &forged_claims,
            &EncodingKey::from_secret(b"attacker"),
        )?;

        let mut parts = signed.token.split('.');
        let header = parts.next().ok_or("missing header")?;
        let signature = signed.token.rsplit('.').next().ok_or("missing signature")?;
        let payload = forged_payload.split('.').nth(1).ok_or("missing payload")?;

        let spliced = format!("{header}.{payload}.{signature}");

        assert!(matches!(
            signer.verify_at(&spliced, now),
            Err(SessionTokenError::Invalid(_))
        ));

        Ok(())
    }

    #[test]
    fn garbage_token_is_invalid() -> TestResult {
        let signer = signer("correct horse battery staple")?;

        assert!(matches!(
            signer.verify("not-a-token"),
            Err(SessionTokenError::Invalid(_))
        ));

        Ok(())
    }
}
