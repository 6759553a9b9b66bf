use crate::EncoderOperation;
use std::fmt;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned by the `*_with` operations of [`CookieParser`].
///
/// [`CookieParser`]: crate::CookieParser
pub enum CookieError {
    /// The per-call options carried an incomplete encoder.
    #[error(transparent)]
    InvalidEncoder(#[from] InvalidEncoderError),
    /// The input was rejected in strict mode.
    #[error(transparent)]
    InvalidCookieString(#[from] InvalidCookieStringError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid cookie encoder: missing the `{operation}` operation")]
/// A [`PartialEncoder`] was used where a complete [`Encoder`] is required.
///
/// The reported operation is the first missing one, following the order of
/// [`EncoderOperation::ALL`].
///
/// [`PartialEncoder`]: crate::PartialEncoder
/// [`Encoder`]: crate::Encoder
pub struct InvalidEncoderError {
    pub(crate) operation: EncoderOperation,
}

impl InvalidEncoderError {
    /// The operation that the encoder doesn't provide.
    pub fn operation(&self) -> EncoderOperation {
        self.operation
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
/// A cookie string, or a cookie about to be serialized, was rejected in strict mode.
pub struct InvalidCookieStringError {
    pub(crate) reason: &'static str,
    pub(crate) fragment: String,
}

impl InvalidCookieStringError {
    pub(crate) fn empty_name(fragment: String) -> Self {
        InvalidCookieStringError {
            reason: "Name cannot be empty!",
            fragment,
        }
    }

    /// Why the input was rejected.
    pub fn reason(&self) -> &str {
        self.reason
    }

    /// The offending input: the raw `Set-Cookie` string, or a debug rendition of
    /// the cookie that failed to serialize.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }
}

impl fmt::Display for InvalidCookieStringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid cookie string: {}\n{}", self.reason, self.fragment)
    }
}
