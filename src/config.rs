//! Configuration for a [`CookieParser`].
//!
//! There are two layers:
//!
//! - [`ParserConfig`], a plain, deserializable description of the parser's
//!   behaviour, convertible into a [`CookieParser`];
//! - [`ParserOptions`], a set of overrides that can be applied either when the
//!   parser is built or on a single call, via the `*_with` methods.
//!
//! [`CookieParser`]: crate::CookieParser
use crate::errors::InvalidEncoderError;
use crate::{Clock, Encoder, EncoderOptions, PartialEncoder};
use std::fmt;
use std::sync::Arc;

/// `ParserConfig` specifies how a [`CookieParser`] validates and encodes cookies.
///
/// Check out the documentation for the fields of this struct for more information.
///
/// # [`CookieParser`]
///
/// To action the rules specified in this struct, you must convert it into a [`CookieParser`]:
///
/// ```rust
/// use cantucci::{CookieParser, ParserConfig};
///
/// let mut config = ParserConfig::default();
/// config.strict = true;
/// let parser: CookieParser = config.into();
/// assert!(parser.parse_set_cookie("=5").is_err());
/// ```
///
/// [`CookieParser`]: crate::CookieParser
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct ParserConfig {
    /// If `true`:
    ///
    /// - parsing a `Set-Cookie` string with an empty name fails;
    /// - `Cookie` header entries with an empty name are dropped;
    /// - serializing a `Cookie` header fails if any cookie encodes to an empty name.
    ///
    /// By default, this field is `false`.
    pub strict: bool,
    /// If `true`, cookie values are automatically:
    ///
    /// - percent-decoded, when parsing;
    /// - percent-encoded, when serializing.
    ///
    /// If `false`, cookie values are used as is.
    ///
    /// By default, this field is `true`.
    pub percent_encode: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            strict: false,
            percent_encode: true,
        }
    }
}

/// Overrides for the settings of a [`CookieParser`].
///
/// Every field is optional: unset fields fall back to the parser's defaults.
/// Merging is shallow, field by field.
///
/// ```rust
/// use cantucci::{CookieParser, FixedClock, ParserOptions};
///
/// let parser = CookieParser::new();
/// let cookie = parser
///     .parse_set_cookie_with(
///         "id=5; Max-Age=60; Expires=Thu, 01 Jan 1970 00:00:15 GMT",
///         &ParserOptions::new().clock(FixedClock(0)),
///     )
///     .unwrap();
/// // `Max-Age` takes precedence over `Expires`.
/// assert_eq!(cookie.expires(), Some(60_000));
/// ```
///
/// [`CookieParser`]: crate::CookieParser
pub struct ParserOptions<T = String> {
    pub(crate) encoder: Option<PartialEncoder<T>>,
    pub(crate) clock: Option<Arc<dyn Clock>>,
    pub(crate) strict: Option<bool>,
}

impl<T> ParserOptions<T> {
    /// No overrides at all.
    pub fn new() -> Self {
        ParserOptions {
            encoder: None,
            clock: None,
            strict: None,
        }
    }

    /// Turns strict mode on or off.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }

    /// Replaces the time source.
    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Replaces the time source with a shared one.
    pub fn shared_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Replaces the encoder.
    ///
    /// A [`PartialEncoder`] is accepted, but it must provide all operations:
    /// merging the options fails with an [`InvalidEncoderError`] otherwise.
    /// Use [`PartialEncoder::merge_over`] to fill the gaps beforehand.
    pub fn encoder<E: Into<PartialEncoder<T>>>(mut self, encoder: E) -> Self {
        self.encoder = Some(encoder.into());
        self
    }
}

impl<T> Default for ParserOptions<T> {
    fn default() -> Self {
        ParserOptions::new()
    }
}

impl<T> Clone for ParserOptions<T> {
    fn clone(&self) -> Self {
        ParserOptions {
            encoder: self.encoder.clone(),
            clock: self.clock.clone(),
            strict: self.strict,
        }
    }
}

impl<T> fmt::Debug for ParserOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserOptions")
            .field("encoder", &self.encoder)
            .field("clock", &self.clock)
            .field("strict", &self.strict)
            .finish()
    }
}

/// A fully specified set of options: what every operation actually runs with.
pub(crate) struct ResolvedOptions<T> {
    pub(crate) encoder: Encoder<T>,
    pub(crate) encoder_options: EncoderOptions,
}

impl<T> ResolvedOptions<T> {
    pub(crate) fn new(encoder: Encoder<T>) -> Self {
        ResolvedOptions {
            encoder,
            encoder_options: EncoderOptions::default(),
        }
    }

    pub(crate) fn strict(&self) -> bool {
        self.encoder_options.strict
    }

    /// Layers `overrides` on top of `self`.
    pub(crate) fn merge(
        &self,
        overrides: &ParserOptions<T>,
    ) -> Result<ResolvedOptions<T>, InvalidEncoderError> {
        let encoder = match &overrides.encoder {
            Some(encoder) => Encoder::try_from(encoder.clone())?,
            None => self.encoder.clone(),
        };
        let clock = overrides
            .clock
            .clone()
            .unwrap_or_else(|| self.encoder_options.clock.clone());
        let strict = overrides.strict.unwrap_or(self.encoder_options.strict);
        Ok(ResolvedOptions {
            encoder,
            encoder_options: EncoderOptions::new(strict, clock),
        })
    }
}

impl<T> Clone for ResolvedOptions<T> {
    fn clone(&self) -> Self {
        ResolvedOptions {
            encoder: self.encoder.clone(),
            encoder_options: self.encoder_options.clone(),
        }
    }
}

impl<T> fmt::Debug for ResolvedOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedOptions")
            .field("encoder", &self.encoder)
            .field("encoder_options", &self.encoder_options)
            .finish()
    }
}
