use std::sync::Arc;

use bankledger_auth::{AccessToken, Authenticator, CredentialVerifier, OpaqueTokenIssuer, PlaintextPinVerifier};
use bankledger_core::LedgerResult;
use bankledger_ledger::LedgerStore;

/// Shared handle injected into every handler.
///
/// The ledger and the authenticator share one credential verifier, so PINs
/// enrolled by the store are checked the same way at `/auth` and on transfers.
#[derive(Debug)]
pub struct AppServices {
    ledger: Arc<LedgerStore>,
    auth: Authenticator,
}

impl AppServices {
    pub fn new(ledger: Arc<LedgerStore>, auth: Authenticator) -> Self {
        Self { ledger, auth }
    }

    /// Default in-memory wiring: plaintext PINs, opaque bearer tokens.
    pub fn in_memory(seed_accounts: bool) -> LedgerResult<Self> {
        let verifier: Arc<dyn CredentialVerifier> = Arc::new(PlaintextPinVerifier);
        let ledger = LedgerStore::with_verifier(verifier.clone());
        if seed_accounts {
            ledger.seed_defaults()?;
        }
        let auth = Authenticator::new(verifier, Arc::new(OpaqueTokenIssuer));
        Ok(Self::new(Arc::new(ledger), auth))
    }

    pub fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    pub fn authenticate(&self, name: &str, pin: &str) -> LedgerResult<AccessToken> {
        Ok(self.auth.authenticate(self.ledger.as_ref(), name, pin)?)
    }
}
