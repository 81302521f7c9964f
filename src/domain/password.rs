//! Password credentials - Domain layer password handling.
//!
//! A credential is a pair of base64 strings: a random HMAC key (the salt)
//! and the HMAC-SHA-512 digest of the UTF-8 password under that key.
//! Neither half is useful without the other.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, TryRngCore};
use sha2::Sha512;
use thiserror::Error;

use crate::config::SALT_KEY_LENGTH;
use crate::errors::{AppError, AppResult};

type HmacSha512 = Hmac<Sha512>;

/// Source of salt key material.
///
/// One handle is shared by every request in the process; tests inject
/// a deterministic implementation.
pub trait SaltSource: Send + Sync {
    /// Fill `key` with fresh random bytes.
    fn fill(&self, key: &mut [u8]) -> AppResult<()>;
}

/// Operating-system CSPRNG. Stateless, safe to share across threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsSaltSource;

impl SaltSource for OsSaltSource {
    fn fill(&self, key: &mut [u8]) -> AppResult<()> {
        OsRng
            .try_fill_bytes(key)
            .map_err(|e| AppError::internal(format!("Random source failed: {}", e)))
    }
}

/// Stored password credential (hash + salt, both base64).
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    hash: String,
    salt: String,
}

// Don't expose key material in debug output
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("hash", &"[REDACTED]")
            .field("salt", &"[REDACTED]")
            .finish()
    }
}

impl Credential {
    /// Rebuild a credential from the persisted pair.
    pub fn from_stored(hash: String, salt: String) -> Self {
        Self { hash, salt }
    }

    /// Credential that never verifies but costs the same HMAC work.
    ///
    /// Login checks unknown emails against it so both paths take
    /// comparable time.
    pub fn placeholder() -> Self {
        Self {
            hash: String::new(),
            salt: STANDARD.encode([0u8; SALT_KEY_LENGTH]),
        }
    }

    /// Encoded digest for storage.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Encoded salt for storage.
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// Consume and return `(hash, salt)`.
    pub fn into_parts(self) -> (String, String) {
        (self.hash, self.salt)
    }

    /// Verify a plain text password against this credential.
    ///
    /// # Errors
    /// Returns a consistency error if the stored salt cannot be decoded.
    /// A stored hash that is not valid base64 simply never matches.
    pub fn verify(&self, plain_text: &str) -> AppResult<bool> {
        let key = STANDARD
            .decode(&self.salt)
            .map_err(|e| AppError::consistency(format!("Stored password salt is malformed: {}", e)))?;
        if key.is_empty() {
            return Err(AppError::consistency("Stored password salt is empty"));
        }

        let expected = match STANDARD.decode(&self.hash) {
            Ok(digest) => digest,
            Err(_) => return Ok(false),
        };

        Ok(keyed_mac(&key, plain_text)?.verify_slice(&expected).is_ok())
    }
}

/// Rejections of the password-change protocol.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordChangeError {
    #[error("The current password you entered is incorrect")]
    IncorrectCurrentPassword,

    #[error("New password and confirmation do not match")]
    ConfirmationMismatch,

    #[error("New password cannot be the same as the current password")]
    UnchangedPassword,
}

impl PasswordChangeError {
    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            PasswordChangeError::IncorrectCurrentPassword => "INVALID_CURRENT_PASSWORD",
            PasswordChangeError::ConfirmationMismatch => "PASSWORD_CONFIRMATION_MISMATCH",
            PasswordChangeError::UnchangedPassword => "PASSWORD_UNCHANGED",
        }
    }

    /// Authentication failures get a different retry policy than validation failures.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, PasswordChangeError::IncorrectCurrentPassword)
    }
}

/// Password change request as submitted by the account owner.
#[derive(Clone)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

impl std::fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordChange").finish_non_exhaustive()
    }
}

/// Derives and checks credentials using an injected salt source.
#[derive(Clone)]
pub struct CredentialManager {
    salts: Arc<dyn SaltSource>,
}

impl Default for CredentialManager {
    fn default() -> Self {
        Self::new(Arc::new(OsSaltSource))
    }
}

impl CredentialManager {
    /// Create a manager drawing salts from `salts`.
    pub fn new(salts: Arc<dyn SaltSource>) -> Self {
        Self { salts }
    }

    /// Derive a fresh credential for a plain text password.
    ///
    /// Confirmation equality and account uniqueness are the caller's job.
    ///
    /// # Errors
    /// Returns validation error if the password is empty.
    pub fn create(&self, plain_text: &str) -> AppResult<Credential> {
        if plain_text.is_empty() {
            return Err(AppError::validation("Password must not be empty"));
        }

        let mut key = vec![0u8; SALT_KEY_LENGTH];
        self.salts.fill(&mut key)?;

        let digest = keyed_mac(&key, plain_text)?.finalize().into_bytes();

        Ok(Credential {
            hash: STANDARD.encode(digest),
            salt: STANDARD.encode(&key),
        })
    }

    /// Run one password-change transition against the stored credential.
    ///
    /// Steps run in order: verify current, check confirmation, reject
    /// no-op changes, derive the replacement. The caller persists the
    /// returned credential as a single hash+salt write.
    pub fn change_password(
        &self,
        stored: &Credential,
        request: &PasswordChange,
    ) -> AppResult<Credential> {
        if !stored.verify(&request.current_password)? {
            return Err(PasswordChangeError::IncorrectCurrentPassword.into());
        }

        if request.new_password != request.new_password_confirm {
            return Err(PasswordChangeError::ConfirmationMismatch.into());
        }

        if request.new_password == request.current_password {
            return Err(PasswordChangeError::UnchangedPassword.into());
        }

        self.create(&request.new_password)
    }
}

/// HMAC-SHA-512 keyed with `key`, fed with the password bytes.
fn keyed_mac(key: &[u8], plain_text: &str) -> AppResult<HmacSha512> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| AppError::internal(format!("Invalid HMAC key: {}", e)))?;
    mac.update(plain_text.as_bytes());
    Ok(mac)
}
