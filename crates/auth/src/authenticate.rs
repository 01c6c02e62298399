use std::sync::Arc;

use thiserror::Error;

use bankledger_core::LedgerError;

use crate::{AccessToken, CredentialIssuer, CredentialVerifier, OpaqueTokenIssuer, PlaintextPinVerifier, StoredCredential};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown account or PIN mismatch. Deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("PIN must be exactly 4 digits")]
    InvalidPin,
}

impl From<AuthError> for LedgerError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => LedgerError::Unauthorized,
            AuthError::InvalidPin => LedgerError::validation(err.to_string()),
        }
    }
}

/// Read-only access to enrolled credentials, keyed by account name.
pub trait CredentialLookup {
    fn stored_credential(&self, name: &str) -> Option<StoredCredential>;
}

impl<L> CredentialLookup for Arc<L>
where
    L: CredentialLookup + ?Sized,
{
    fn stored_credential(&self, name: &str) -> Option<StoredCredential> {
        (**self).stored_credential(name)
    }
}

/// Validates name + PIN pairs and issues bearer tokens.
///
/// Holds no session state of its own.
#[derive(Clone)]
pub struct Authenticator {
    verifier: Arc<dyn CredentialVerifier>,
    issuer: Arc<dyn CredentialIssuer>,
}

impl Authenticator {
    pub fn new(verifier: Arc<dyn CredentialVerifier>, issuer: Arc<dyn CredentialIssuer>) -> Self {
        Self { verifier, issuer }
    }

    pub fn authenticate<L>(&self, accounts: &L, name: &str, pin: &str) -> Result<AccessToken, AuthError>
    where
        L: CredentialLookup + ?Sized,
    {
        let stored = accounts
            .stored_credential(name)
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.verifier.verify(&stored, pin) {
            tracing::debug!(account = name, "authentication rejected");
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(account = name, "authenticated");
        Ok(self.issuer.issue(name))
    }
}

impl Default for Authenticator {
    fn default() -> Self {
        Self::new(Arc::new(PlaintextPinVerifier), Arc::new(OpaqueTokenIssuer))
    }
}

impl core::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Authenticator").finish_non_exhaustive()
    }
}
