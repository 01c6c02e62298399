use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bearer credential handed back after a successful authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

impl AccessToken {
    pub const BEARER: &'static str = "bearer";

    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            access_token: token.into(),
            token_type: Self::BEARER.to_string(),
        }
    }
}

/// Credential issuer capability.
pub trait CredentialIssuer: Send + Sync {
    fn issue(&self, subject: &str) -> AccessToken;
}

/// Issues `"{subject}-{uuid v4}-token"` strings.
///
/// No server-side session, no expiry, no revocation: replace with a signed,
/// expiring scheme before exposing this beyond a trusted network.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpaqueTokenIssuer;

impl CredentialIssuer for OpaqueTokenIssuer {
    fn issue(&self, subject: &str) -> AccessToken {
        AccessToken::bearer(format!("{subject}-{}-token", Uuid::new_v4()))
    }
}
