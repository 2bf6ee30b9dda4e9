use async_trait::async_trait;
use thiserror::Error;

/// The authenticated caller, derived from a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Subject identifier of the caller
    pub subject: String,
}

impl Identity {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }
}

/// Reasons a request fails authentication
///
/// Callers only ever see "Unauthorized"; the variant is for logs.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingHeader,

    #[error("Invalid authorization format. Use: Bearer <token>")]
    MalformedHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token has no subject")]
    MissingSubject,

    #[error("Invalid verification key: {0}")]
    InvalidKey(String),
}

/// Verifies bearer tokens and resolves them to an identity
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError>;
}

/// Extracts the token from an `Authorization` header value
///
/// # Example
/// ```
/// use carlist_api::auth::verifier::bearer_token;
///
/// assert_eq!(bearer_token(Some("Bearer abc")).unwrap(), "abc");
/// assert!(bearer_token(Some("Basic abc")).is_err());
/// assert!(bearer_token(None).is_err());
/// ```
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingHeader)?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedHeader)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }

    Ok(token)
}
