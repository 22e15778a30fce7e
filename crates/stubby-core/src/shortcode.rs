use crate::codec;
use crate::error::CodecError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Longest short code accepted from clients. Matches the width of the
/// `hash` column.
pub const MAX_CODE_LEN: usize = 14;

/// A short code: a non-empty string over the base-62 code alphabet.
///
/// Codes produced by [`codec::encode`] are always valid. Codes coming from
/// clients go through [`ShortCode::parse`], which rejects anything outside
/// the alphabet (whitespace, `/`, control characters) before it can reach a
/// storage engine.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortCode(String);

impl ShortCode {
    /// Validates a client-supplied code.
    ///
    /// # Examples
    ///
    /// ```
    /// use stubby_core::ShortCode;
    ///
    /// assert!(ShortCode::parse("b").is_ok());
    /// assert!(ShortCode::parse("has space").is_err());
    /// ```
    pub fn parse(code: &str) -> Result<Self, CodecError> {
        if code.is_empty() {
            return Err(CodecError::Empty);
        }

        if let Some((position, ch)) = code
            .chars()
            .enumerate()
            .find(|(_, ch)| codec::digit_of(*ch).is_none())
        {
            return Err(CodecError::InvalidCharacter { ch, position });
        }

        // Alphabet-only input is ASCII, so the byte length is the char count.
        if code.len() > MAX_CODE_LEN {
            return Err(CodecError::TooLong {
                len: code.len(),
                max: MAX_CODE_LEN,
            });
        }

        Ok(Self(code.to_owned()))
    }

    /// Wraps output of the encoder, which is valid by construction.
    pub(crate) fn from_encoded(code: String) -> Self {
        Self(code)
    }

    /// Decodes the identifier this code was derived from.
    pub fn id(&self) -> Result<u64, CodecError> {
        codec::decode(&self.0)
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for ShortCode {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ShortCode {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ShortCode> for String {
    fn from(code: ShortCode) -> Self {
        code.0
    }
}
