// Authentication: bearer token parsing and verification

pub mod jwt;
pub mod verifier;

pub use jwt::JwtVerifier;
pub use verifier::{AuthError, Identity, TokenVerifier};
