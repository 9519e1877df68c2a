//! Credential primitives and the persistence seam.
//!
//! # Design
//! - The credential is opaque; the only validation is that it is non-blank.
//! - Persistence sits behind [`CredentialStore`] so only the controller touches it.
//! - `Debug` never prints the secret.

use std::cell::RefCell;
use std::fmt;

/// Bearer secret identifying a user to the gateway.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Trim raw input and reject blank values.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Raw value for header encoding and persistence.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Durable slot holding the last-used credential.
///
/// Implementations swallow and log their own I/O failures; a storage problem
/// must never take the console down.
pub trait CredentialStore {
    /// Read the persisted credential, if any.
    fn load(&self) -> Option<Credential>;
    /// Persist the credential, replacing any previous value.
    fn save(&self, credential: &Credential);
    /// Remove the persisted credential.
    fn clear(&self);
}

/// In-process store used by tests and by consoles that opt out of persistence.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: RefCell<Option<Credential>>,
}

impl MemoryCredentialStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a credential, as if persisted by an earlier visit.
    #[must_use]
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: RefCell::new(Some(credential)),
        }
    }

    /// Current contents, for assertions.
    #[must_use]
    pub fn stored(&self) -> Option<Credential> {
        self.slot.borrow().clone()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<Credential> {
        self.stored()
    }

    fn save(&self, credential: &Credential) {
        *self.slot.borrow_mut() = Some(credential.clone());
    }

    fn clear(&self) {
        self.slot.borrow_mut().take();
    }
}
