use crate::AuthError;

/// A validated 4-digit PIN.
#[derive(Clone, PartialEq, Eq)]
pub struct Pin(String);

impl Pin {
    pub const LENGTH: usize = 4;

    /// Accept exactly four ASCII digits.
    pub fn parse(raw: &str) -> Result<Self, AuthError> {
        if raw.len() != Self::LENGTH || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AuthError::InvalidPin);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for Pin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Pin(****)")
    }
}

/// Verifier-specific representation of an enrolled PIN (plaintext, hash, ...).
///
/// Opaque to the ledger; only the verifier that produced it interprets it.
#[derive(Clone, PartialEq, Eq)]
pub struct StoredCredential(String);

impl StoredCredential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("StoredCredential(..)")
    }
}

/// Credential verifier capability.
///
/// Implementations must be deterministic: `verify(&enroll(pin), pin)` is true.
pub trait CredentialVerifier: Send + Sync {
    /// Turn a freshly supplied PIN into the form kept on the account.
    fn enroll(&self, pin: &Pin) -> StoredCredential;

    /// Compare a presented PIN against the enrolled credential.
    fn verify(&self, stored: &StoredCredential, presented: &str) -> bool;
}

/// Stores PINs verbatim and compares them verbatim.
///
/// Stand-in only; a real deployment substitutes a hashing verifier.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaintextPinVerifier;

impl CredentialVerifier for PlaintextPinVerifier {
    fn enroll(&self, pin: &Pin) -> StoredCredential {
        StoredCredential::new(pin.expose())
    }

    fn verify(&self, stored: &StoredCredential, presented: &str) -> bool {
        stored.as_str() == presented
    }
}
