//! Encrypted bearer tokens.
//!
//! A token is the AES-256-GCM sealing of a JSON [`TokenPayload`] under the
//! server key, laid out as `v1.` followed by base64url (no padding) of
//! `nonce || ciphertext || tag`. The version prefix is bound as associated
//! data, so it cannot be swapped without breaking the tag. Nothing about a
//! token is stored server-side; it dies when `expires_at` passes.

use aes_gcm::aead::generic_array::typenum::Unsigned;
use aes_gcm::aead::{self, Aead, AeadCore, KeyInit, KeySizeUser, OsRng, Payload};
use aes_gcm::Aes256Gcm;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Exact key length the cipher accepts.
pub const KEY_SIZE: usize = <Aes256Gcm as KeySizeUser>::KeySize::USIZE;

const NONCE_SIZE: usize = <Aes256Gcm as AeadCore>::NonceSize::USIZE;
const TAG_SIZE: usize = <Aes256Gcm as AeadCore>::TagSize::USIZE;
const TOKEN_VERSION: &str = "v1";

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid key size: expected {expected} bytes, got {actual}")]
    InvalidKeySize { expected: usize, actual: usize },
    /// Malformed, tampered, sealed under another key, or expired.
    #[error("invalid token")]
    InvalidToken,
    #[error("token duration must be positive")]
    InvalidDuration,
    #[error("token encryption failed")]
    Encryption,
    #[error("token payload could not be encoded: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Identity and validity window sealed inside a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub user_id: i32,
    pub username: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TokenPayload {
    fn new(
        user_id: i32,
        username: &str,
        now: DateTime<Utc>,
        duration: Duration,
    ) -> Result<Self, TokenError> {
        if duration <= Duration::zero() {
            return Err(TokenError::InvalidDuration);
        }
        let expires_at = now
            .checked_add_signed(duration)
            .ok_or(TokenError::InvalidDuration)?;

        Ok(Self {
            user_id,
            username: username.to_owned(),
            issued_at: now,
            expires_at,
        })
    }
}

/// Issues and verifies tokens under one immutable key.
///
/// Cheap to share behind an `Arc`; every call is independent.
pub struct TokenService {
    cipher: Aes256Gcm,
}

impl TokenService {
    /// Builds the service, refusing any key that is not exactly [`KEY_SIZE`] bytes.
    pub fn new(key: &[u8]) -> Result<Self, TokenError> {
        if key.len() != KEY_SIZE {
            return Err(TokenError::InvalidKeySize {
                expected: KEY_SIZE,
                actual: key.len(),
            });
        }
        let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| TokenError::InvalidKeySize {
            expected: KEY_SIZE,
            actual: key.len(),
        })?;

        Ok(Self { cipher })
    }

    /// Issues a token for `user_id`/`username` valid for `duration` from now.
    pub fn issue_token(
        &self,
        user_id: i32,
        username: &str,
        duration: Duration,
    ) -> Result<String, TokenError> {
        self.issue_token_at(user_id, username, duration, Utc::now())
    }

    /// Same as [`issue_token`](Self::issue_token) with an explicit issue time.
    pub fn issue_token_at(
        &self,
        user_id: i32,
        username: &str,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let payload = TokenPayload::new(user_id, username, now, duration)?;
        let plaintext = serde_json::to_vec(&payload)?;

        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(
                &nonce,
                Payload {
                    msg: &plaintext,
                    aad: TOKEN_VERSION.as_bytes(),
                },
            )
            .map_err(|_| TokenError::Encryption)?;

        let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);

        Ok(format!("{}.{}", TOKEN_VERSION, URL_SAFE_NO_PAD.encode(sealed)))
    }

    /// Decrypts and authenticates `token`, then checks it has not expired.
    pub fn verify_token(&self, token: &str) -> Result<TokenPayload, TokenError> {
        self.verify_token_at(token, Utc::now())
    }

    /// Same as [`verify_token`](Self::verify_token) against an explicit clock reading.
    ///
    /// A payload is accepted while `now <= expires_at`. There is no skew allowance.
    pub fn verify_token_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenPayload, TokenError> {
        let encoded = token
            .strip_prefix(TOKEN_VERSION)
            .and_then(|rest| rest.strip_prefix('.'))
            .ok_or(TokenError::InvalidToken)?;
        let sealed = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| TokenError::InvalidToken)?;

        let payload = self.open(&sealed)?;
        if payload.expires_at < now {
            return Err(TokenError::InvalidToken);
        }

        Ok(payload)
    }

    fn open(&self, sealed: &[u8]) -> Result<TokenPayload, TokenError> {
        if sealed.len() < NONCE_SIZE + TAG_SIZE {
            return Err(TokenError::InvalidToken);
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_SIZE);

        let plaintext = self
            .cipher
            .decrypt(
                aead::Nonce::<Aes256Gcm>::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: TOKEN_VERSION.as_bytes(),
                },
            )
            .map_err(|_| TokenError::InvalidToken)?;

        serde_json::from_slice(&plaintext).map_err(|_| TokenError::InvalidToken)
    }
}
