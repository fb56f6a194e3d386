use chrono::{Duration, Utc};

use jwt::{RegisteredClaims, SignWithKey, VerifyWithKey};

use super::SigningKey;

/// Errors that can occur when handling session tokens
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token is expired")]
    Expired,
    #[error("Token does not name a subject")]
    MissingSubject,
    #[error("Failed to sign, decode or verify token")]
    Invalid(#[from] jwt::Error),
}

/// Wrapper for token results
pub type TokenResult<T> = Result<T, TokenError>;

/// Issue a session token for the identity-provider user `subject`
pub fn issue_session_token(key: &SigningKey, subject: &str, ttl: Duration) -> TokenResult<String> {
    let expiration = (Utc::now() + ttl).timestamp();
    let claims = RegisteredClaims {
        subject: Some(subject.to_string()),
        issued_at: u64::try_from(Utc::now().timestamp()).ok(),
        expiration: u64::try_from(expiration).ok(),
        ..Default::default()
    };

    Ok(claims.sign_with_key(key.as_ref())?)
}

/// Verify a session token, returning the subject it was issued for
pub fn verify_session_token(key: &SigningKey, token: &str) -> TokenResult<String> {
    let claims: RegisteredClaims = token.verify_with_key(key.as_ref())?;

    let now = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
    match claims.expiration {
        Some(expiration) if expiration > now => {}
        _ => return Err(TokenError::Expired),
    }

    claims
        .subject
        .filter(|subject| !subject.is_empty())
        .ok_or(TokenError::MissingSubject)
}
