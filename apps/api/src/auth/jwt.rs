// JWT token creation and verification
// Verification accepts HS256 shared secrets or RS256 public keys

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::verifier::{AuthError, Identity, TokenVerifier};

/// JWT claims structure
///
/// # Fields
/// * `sub` - Subject (user id)
/// * `exp` - Expiry time (seconds since epoch)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID (subject)
    pub sub: String,
    /// Expiry timestamp (seconds since epoch)
    pub exp: usize,
}

/// Creates an HS256 JWT token for a user
///
/// Used for local development and tests; production tokens come from
/// the identity provider.
///
/// # Token Properties
/// - Expires after 8 hours
/// - Signed with HS256 algorithm
/// - Contains user id in 'sub' claim
///
/// # Example
/// ```
/// use carlist_api::auth::jwt::create_token;
///
/// let token = create_token("user-1", "your-secret-key").expect("valid token");
/// assert_eq!(token.split('.').count(), 3);
/// ```
pub fn create_token(user_id: &str, secret: &str) -> Result<String, AuthError> {
    let expiry = Utc::now() + Duration::hours(8);
    let claims = Claims {
        sub: user_id.to_string(),
        exp: expiry.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| AuthError::InvalidKey(e.to_string()))
}

/// Token verifier backed by `jsonwebtoken`
///
/// Always validates `exp`. Issuer and audience are validated only when
/// configured.
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    /// Verifier for HS256 tokens signed with a shared secret
    pub fn hs256(secret: &str) -> Self {
        Self::with_key(DecodingKey::from_secret(secret.as_ref()), Algorithm::HS256)
    }

    /// Verifier for RS256 tokens signed by the holder of the PEM's private key
    pub fn rs256_pem(pem: &str) -> Result<Self, AuthError> {
        let key = DecodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| AuthError::InvalidKey(e.to_string()))?;
        Ok(Self::with_key(key, Algorithm::RS256))
    }

    fn with_key(key: DecodingKey, algorithm: Algorithm) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.validate_aud = false;
        Self { key, validation }
    }

    /// Require the `iss` claim to be present and equal `issuer`
    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.validation.set_issuer(&[issuer]);
        self.validation.required_spec_claims.insert("iss".to_string());
        self
    }

    /// Require the `aud` claim to be present and contain `audience`
    pub fn with_audience(mut self, audience: &str) -> Self {
        self.validation.set_audience(&[audience]);
        self.validation.validate_aud = true;
        self.validation.required_spec_claims.insert("aud".to_string());
        self
    }

    /// Verifies and decodes a token into its claims
    pub fn decode_claims(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let claims = self.decode_claims(token)?;
        if claims.sub.is_empty() {
            return Err(AuthError::MissingSubject);
        }
        Ok(Identity::new(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TEST_SECRET: &str = "test-secret-key-for-unit-tests";

    #[derive(Serialize)]
    struct ProviderClaims<'a> {
        sub: &'a str,
        exp: usize,
        iss: &'a str,
        aud: &'a str,
    }

    fn provider_token(sub: &str, iss: &str, aud: &str, exp: usize) -> String {
        let claims = ProviderClaims { sub, exp, iss, aud };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_ref()),
        )
        .expect("valid token")
    }

    fn sign(claims: &serde_json::Value) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(TEST_SECRET.as_ref()),
        )
        .expect("valid token")
    }

    fn in_one_hour() -> usize {
        (Utc::now() + Duration::hours(1)).timestamp() as usize
    }

    #[tokio::test]
    async fn create_and_verify_token() {
        let token = create_token("user-1", TEST_SECRET).expect("valid token");

        let identity = JwtVerifier::hs256(TEST_SECRET)
            .verify(&token)
            .await
            .expect("valid verification");
        assert_eq!(identity.subject, "user-1");
    }

    #[tokio::test]
    async fn wrong_secret_fails() {
        let token = create_token("user-1", TEST_SECRET).expect("valid token");

        let result = JwtVerifier::hs256("wrong-secret").verify(&token).await;
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn invalid_token_fails() {
        let result = JwtVerifier::hs256(TEST_SECRET)
            .verify("invalid.token.string")
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn expired_token_fails() {
        let expired = (Utc::now() - Duration::hours(2)).timestamp() as usize;
        let token = provider_token("user-1", "issuer", "audience", expired);

        let result = JwtVerifier::hs256(TEST_SECRET).verify(&token).await;
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn empty_subject_fails() {
        let token = create_token("", TEST_SECRET).expect("valid token");

        let result = JwtVerifier::hs256(TEST_SECRET).verify(&token).await;
        assert!(matches!(result, Err(AuthError::MissingSubject)));
    }

    #[tokio::test]
    async fn audience_is_ignored_unless_configured() {
        let token = provider_token("user-1", "issuer", "some-project", in_one_hour());

        let identity = JwtVerifier::hs256(TEST_SECRET)
            .verify(&token)
            .await
            .expect("valid verification");
        assert_eq!(identity.subject, "user-1");
    }

    #[tokio::test]
    async fn configured_issuer_and_audience_are_enforced() {
        let verifier = JwtVerifier::hs256(TEST_SECRET)
            .with_issuer("https://securetoken.google.com/cars")
            .with_audience("cars");

        let good = provider_token(
            "user-1",
            "https://securetoken.google.com/cars",
            "cars",
            in_one_hour(),
        );
        assert!(verifier.verify(&good).await.is_ok());

        let wrong_aud = provider_token(
            "user-1",
            "https://securetoken.google.com/cars",
            "other",
            in_one_hour(),
        );
        assert!(verifier.verify(&wrong_aud).await.is_err());

        let wrong_iss = provider_token("user-1", "https://evil.example", "cars", in_one_hour());
        assert!(verifier.verify(&wrong_iss).await.is_err());
    }

    #[tokio::test]
    async fn configured_issuer_and_audience_must_be_present() {
        let verifier = JwtVerifier::hs256(TEST_SECRET)
            .with_issuer("https://securetoken.google.com/cars")
            .with_audience("cars");

        let bare = create_token("user-1", TEST_SECRET).expect("valid token");
        assert!(matches!(
            verifier.verify(&bare).await,
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[tokio::test]
    async fn each_configured_claim_is_required_on_its_own() {
        let without_iss = sign(&json!({ "sub": "user-1", "exp": in_one_hour(), "aud": "cars" }));
        let without_aud = sign(&json!({
            "sub": "user-1",
            "exp": in_one_hour(),
            "iss": "https://securetoken.google.com/cars"
        }));

        let issuer_only =
            JwtVerifier::hs256(TEST_SECRET).with_issuer("https://securetoken.google.com/cars");
        assert!(issuer_only.verify(&without_iss).await.is_err());
        assert!(issuer_only.verify(&without_aud).await.is_ok());

        let audience_only = JwtVerifier::hs256(TEST_SECRET).with_audience("cars");
        assert!(audience_only.verify(&without_aud).await.is_err());
        assert!(audience_only.verify(&without_iss).await.is_ok());
    }

    #[test]
    fn token_expiry_set() {
        let token = create_token("user-1", TEST_SECRET).expect("valid token");

        let claims = JwtVerifier::hs256(TEST_SECRET)
            .decode_claims(&token)
            .expect("valid verification");
        let expiry_time = claims.exp as i64;
        let now = Utc::now().timestamp();
        let in_8_hours = (Utc::now() + Duration::hours(8)).timestamp();

        assert!(expiry_time > now);
        assert!(expiry_time <= in_8_hours + 10);
    }

    #[test]
    fn malformed_pem_is_rejected() {
        assert!(matches!(
            JwtVerifier::rs256_pem("not a pem"),
            Err(AuthError::InvalidKey(_))
        ));
    }
}
