//! Opaque cursor tokens.
//!
//! A cursor wraps the sort-key material of the last row a caller has seen.
//! Callers receive it as an uninterpreted string and hand it back verbatim to
//! resume a listing. The token is URL-safe base64 over a small versioned JSON
//! envelope, so the key layout can evolve without breaking the wire contract
//! for tokens issued by the current version.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Envelope version written into every issued token.
pub const CURSOR_VERSION: u8 = 1;

/// Errors raised while encoding or decoding a cursor token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// The token is empty or only whitespace.
    #[error("cursor token must not be empty")]
    Empty,
    /// The token is not valid URL-safe base64.
    #[error("cursor token is not valid base64: {message}")]
    InvalidEncoding {
        /// Decoder diagnostic.
        message: String,
    },
    /// The decoded payload does not match the expected key layout.
    #[error("cursor payload is malformed: {message}")]
    InvalidPayload {
        /// Deserialiser diagnostic.
        message: String,
    },
    /// The token was issued by an incompatible envelope version.
    #[error("unsupported cursor version: expected {expected}, found {found}")]
    UnsupportedVersion {
        /// Version this build understands.
        expected: u8,
        /// Version carried by the token.
        found: u8,
    },
    /// The key could not be serialised.
    #[error("cursor key could not be encoded: {message}")]
    Encode {
        /// Serialiser diagnostic.
        message: String,
    },
}

#[derive(Serialize)]
struct EnvelopeRef<'a, K> {
    v: u8,
    k: &'a K,
}

#[derive(Deserialize)]
struct Envelope<K> {
    v: u8,
    k: K,
}

/// Resume position for an ordered listing.
///
/// # Examples
/// ```
/// use pagination::Cursor;
///
/// let cursor = Cursor::new(("ada".to_owned(), 7_u32));
/// let token = cursor.encode().expect("key serialises");
/// let decoded = Cursor::<(String, u32)>::decode(&token).expect("token decodes");
/// assert_eq!(decoded.key(), &("ada".to_owned(), 7));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor<K> {
    key: K,
}

impl<K> Cursor<K> {
    /// Wrap the sort key of the last row on a page.
    pub const fn new(key: K) -> Self {
        Self { key }
    }

    /// Borrow the decoded key.
    #[must_use]
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Consume the cursor and return its key.
    #[must_use]
    pub fn into_key(self) -> K {
        self.key
    }
}

impl<K: Serialize> Cursor<K> {
    /// Encode the cursor as an opaque token.
    pub fn encode(&self) -> Result<String, CursorError> {
        let envelope = EnvelopeRef {
            v: CURSOR_VERSION,
            k: &self.key,
        };
        let bytes = serde_json::to_vec(&envelope).map_err(|err| CursorError::Encode {
            message: err.to_string(),
        })?;
        Ok(URL_SAFE_NO_PAD.encode(bytes))
    }
}

impl<K: DeserializeOwned> Cursor<K> {
    /// Decode a token previously produced by [`Cursor::encode`].
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(CursorError::Empty);
        }

        let bytes =
            URL_SAFE_NO_PAD
                .decode(trimmed)
                .map_err(|err| CursorError::InvalidEncoding {
                    message: err.to_string(),
                })?;

        let version = serde_json::from_slice::<Envelope<serde_json::Value>>(&bytes)
            .map_err(|err| CursorError::InvalidPayload {
                message: err.to_string(),
            })?
            .v;
        if version != CURSOR_VERSION {
            return Err(CursorError::UnsupportedVersion {
                expected: CURSOR_VERSION,
                found: version,
            });
        }

        let envelope = serde_json::from_slice::<Envelope<K>>(&bytes).map_err(|err| {
            CursorError::InvalidPayload {
                message: err.to_string(),
            }
        })?;
        Ok(Self::new(envelope.k))
    }
}
