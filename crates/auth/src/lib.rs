//! `bankledger-auth` — session/auth check for account holders.
//!
//! Decoupled from HTTP and from the ledger: PIN storage and token issuance are
//! both capabilities behind traits, so a hashing verifier or a signed, expiring
//! token scheme can replace the defaults without touching ledger logic.

pub mod authenticate;
pub mod credential;
pub mod token;

pub use authenticate::{AuthError, Authenticator, CredentialLookup};
pub use credential::{CredentialVerifier, Pin, PlaintextPinVerifier, StoredCredential};
pub use token::{AccessToken, CredentialIssuer, OpaqueTokenIssuer};
