//! Per-attribute conversions between wire text and structured cookie fields.
//!
//! Check out [`Encoder`] for more information.
use crate::date::{format_http_date, parse_http_date};
use crate::encoding::{decode, encode};
use crate::errors::InvalidEncoderError;
use crate::{is_safe_integer, Clock, SystemClock, MAX_SAFE_INTEGER};
use std::fmt;
use std::sync::Arc;

type TextFn<R> = Arc<dyn Fn(&str, &EncoderOptions) -> Option<R> + Send + Sync>;
type OptionalTextFn = Arc<dyn Fn(Option<&str>, &EncoderOptions) -> Option<String> + Send + Sync>;
type TimestampFn = Arc<dyn Fn(Option<i64>, &EncoderOptions) -> Option<String> + Send + Sync>;
type ValueFn<T> = Arc<dyn Fn(&T, &EncoderOptions) -> Option<String> + Send + Sync>;

/// The settings an [`Encoder`] operation can rely on.
///
/// Operations that need the current time must go through [`EncoderOptions::now`]
/// rather than reading the wall clock.
#[derive(Debug, Clone)]
pub struct EncoderOptions {
    pub(crate) strict: bool,
    pub(crate) clock: Arc<dyn Clock>,
}

impl EncoderOptions {
    /// Options for a direct call to an [`Encoder`] operation.
    pub fn new(strict: bool, clock: Arc<dyn Clock>) -> Self {
        EncoderOptions { strict, clock }
    }

    /// Whether the parser runs in strict mode.
    pub fn strict(&self) -> bool {
        self.strict
    }

    /// The current time, in milliseconds since the Unix epoch.
    pub fn now(&self) -> i64 {
        self.clock.now_millis()
    }
}

impl Default for EncoderOptions {
    fn default() -> Self {
        EncoderOptions::new(false, Arc::new(SystemClock))
    }
}

/// The twelve operations an [`Encoder`] is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncoderOperation {
    /// [`Encoder::serialize_name`].
    SerializeName,
    /// [`Encoder::parse_name`].
    ParseName,
    /// [`Encoder::serialize_value`].
    SerializeValue,
    /// [`Encoder::parse_value`].
    ParseValue,
    /// [`Encoder::serialize_domain`].
    SerializeDomain,
    /// [`Encoder::parse_domain`].
    ParseDomain,
    /// [`Encoder::serialize_path`].
    SerializePath,
    /// [`Encoder::parse_path`].
    ParsePath,
    /// [`Encoder::serialize_expires`].
    SerializeExpires,
    /// [`Encoder::parse_expires`].
    ParseExpires,
    /// [`Encoder::serialize_max_age`].
    SerializeMaxAge,
    /// [`Encoder::parse_max_age`].
    ParseMaxAge,
}

impl EncoderOperation {
    /// Every operation, in the order used to validate encoders.
    pub const ALL: [EncoderOperation; 12] = [
        EncoderOperation::SerializeName,
        EncoderOperation::ParseName,
        EncoderOperation::SerializeValue,
        EncoderOperation::ParseValue,
        EncoderOperation::SerializeDomain,
        EncoderOperation::ParseDomain,
        EncoderOperation::SerializePath,
        EncoderOperation::ParsePath,
        EncoderOperation::SerializeExpires,
        EncoderOperation::ParseExpires,
        EncoderOperation::SerializeMaxAge,
        EncoderOperation::ParseMaxAge,
    ];

    /// The snake_case name of the operation, e.g. `parse_max_age`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EncoderOperation::SerializeName => "serialize_name",
            EncoderOperation::ParseName => "parse_name",
            EncoderOperation::SerializeValue => "serialize_value",
            EncoderOperation::ParseValue => "parse_value",
            EncoderOperation::SerializeDomain => "serialize_domain",
            EncoderOperation::ParseDomain => "parse_domain",
            EncoderOperation::SerializePath => "serialize_path",
            EncoderOperation::ParsePath => "parse_path",
            EncoderOperation::SerializeExpires => "serialize_expires",
            EncoderOperation::ParseExpires => "parse_expires",
            EncoderOperation::SerializeMaxAge => "serialize_max_age",
            EncoderOperation::ParseMaxAge => "parse_max_age",
        }
    }
}

impl fmt::Display for EncoderOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts each cookie field between its wire representation and its structured
/// form.
///
/// An `Encoder` is a set of twelve independent operations, one serialize/parse pair
/// per field: name, value, `Domain`, `Path`, `Expires` and `Max-Age`.
/// Every operation may return `None` ("absent"): the parser then leaves the field
/// unset, while the serializer omits the attribute altogether.
///
/// # The default encoder
///
/// [`Encoder::default()`] works with `String` values:
///
/// - names, domains and paths are passed through as they are;
/// - values are percent-encoded with the same character set as ECMAScript's
///   `encodeURIComponent`. Decoding is permissive: malformed escapes are kept
///   verbatim, and only values that don't decode to valid UTF-8 are absent;
/// - `Expires` is formatted as an RFC 1123 date (`Thu, 01 Jan 1970 00:00:15 GMT`)
///   and parsed leniently;
/// - `Max-Age` is derived from the expiry and the current time, and vice versa.
///
/// # Customizing
///
/// Build a [`PartialEncoder`] with the operations you want to replace, then merge
/// it over a complete encoder:
///
/// ```rust
/// use cantucci::{Cookie, CookieParser, Encoder, PartialEncoder, ParserOptions};
///
/// let encoder = PartialEncoder::new()
///     .serialize_value(|value: &String, _| Some(value.to_uppercase()))
///     .merge_over(Encoder::default());
/// let parser = CookieParser::with_options(ParserOptions::new().encoder(encoder)).unwrap();
/// assert_eq!(
///     parser.serialize_set_cookie(&Cookie::new("id", "abc")),
///     "id=ABC; Path=/"
/// );
/// ```
pub struct Encoder<T = String> {
    pub(crate) serialize_name: TextFn<String>,
    pub(crate) parse_name: TextFn<String>,
    pub(crate) serialize_value: ValueFn<T>,
    pub(crate) parse_value: TextFn<T>,
    pub(crate) serialize_domain: OptionalTextFn,
    pub(crate) parse_domain: TextFn<String>,
    pub(crate) serialize_path: OptionalTextFn,
    pub(crate) parse_path: TextFn<String>,
    pub(crate) serialize_expires: TimestampFn,
    pub(crate) parse_expires: TextFn<i64>,
    pub(crate) serialize_max_age: TimestampFn,
    pub(crate) parse_max_age: TextFn<i64>,
}

impl<T> Encoder<T> {
    /// Replaces the operations set in `overrides`, keeping the others.
    pub fn with(self, overrides: PartialEncoder<T>) -> Self {
        overrides.merge_over(self)
    }

    /// Turns a cookie name into its wire form.
    pub fn serialize_name(&self, name: &str, options: &EncoderOptions) -> Option<String> {
        (self.serialize_name)(name, options)
    }

    /// Turns a wire name into a cookie name.
    pub fn parse_name(&self, name: &str, options: &EncoderOptions) -> Option<String> {
        (self.parse_name)(name, options)
    }

    /// Turns a cookie value into its wire form.
    pub fn serialize_value(&self, value: &T, options: &EncoderOptions) -> Option<String> {
        (self.serialize_value)(value, options)
    }

    /// Turns a wire value into a cookie value.
    pub fn parse_value(&self, value: &str, options: &EncoderOptions) -> Option<T> {
        (self.parse_value)(value, options)
    }

    /// Turns a `Domain` into its wire form.
    pub fn serialize_domain(&self, domain: Option<&str>, options: &EncoderOptions) -> Option<String> {
        (self.serialize_domain)(domain, options)
    }

    /// Turns a `Domain` attribute value into a domain.
    pub fn parse_domain(&self, domain: &str, options: &EncoderOptions) -> Option<String> {
        (self.parse_domain)(domain, options)
    }

    /// Turns a `Path` into its wire form.
    pub fn serialize_path(&self, path: Option<&str>, options: &EncoderOptions) -> Option<String> {
        (self.serialize_path)(path, options)
    }

    /// Turns a `Path` attribute value into a path.
    pub fn parse_path(&self, path: &str, options: &EncoderOptions) -> Option<String> {
        (self.parse_path)(path, options)
    }

    /// Turns an expiry (milliseconds since the Unix epoch) into an `Expires` value.
    pub fn serialize_expires(&self, expires: Option<i64>, options: &EncoderOptions) -> Option<String> {
        (self.serialize_expires)(expires, options)
    }

    /// Turns an `Expires` value into an expiry (milliseconds since the Unix epoch).
    pub fn parse_expires(&self, expires: &str, options: &EncoderOptions) -> Option<i64> {
        (self.parse_expires)(expires, options)
    }

    /// Turns an expiry (milliseconds since the Unix epoch) into a `Max-Age` value.
    pub fn serialize_max_age(&self, expires: Option<i64>, options: &EncoderOptions) -> Option<String> {
        (self.serialize_max_age)(expires, options)
    }

    /// Turns a `Max-Age` value into an expiry (milliseconds since the Unix epoch).
    pub fn parse_max_age(&self, max_age: &str, options: &EncoderOptions) -> Option<i64> {
        (self.parse_max_age)(max_age, options)
    }
}

impl Encoder<String> {
    /// An encoder that behaves like [`Encoder::default()`] but leaves cookie values
    /// untouched instead of percent-encoding them.
    pub fn unencoded() -> Self {
        PartialEncoder::new()
            .serialize_value(|value: &String, _| Some(value.clone()))
            .parse_value(pass_through)
            .merge_over(Encoder::default())
    }
}

impl Default for Encoder<String> {
    fn default() -> Self {
        Encoder {
            serialize_name: Arc::new(pass_through),
            parse_name: Arc::new(pass_through),
            serialize_value: Arc::new(percent_encode_value),
            parse_value: Arc::new(percent_decode_value),
            serialize_domain: Arc::new(pass_through_optional),
            parse_domain: Arc::new(pass_through),
            serialize_path: Arc::new(pass_through_optional),
            parse_path: Arc::new(pass_through),
            serialize_expires: Arc::new(serialize_expires),
            parse_expires: Arc::new(parse_expires),
            serialize_max_age: Arc::new(serialize_max_age),
            parse_max_age: Arc::new(parse_max_age),
        }
    }
}

fn pass_through(text: &str, _: &EncoderOptions) -> Option<String> {
    Some(text.to_owned())
}

fn pass_through_optional(text: Option<&str>, _: &EncoderOptions) -> Option<String> {
    text.map(str::to_owned)
}

#[allow(clippy::ptr_arg)]
fn percent_encode_value(value: &String, _: &EncoderOptions) -> Option<String> {
    Some(encode(value).to_string())
}

fn percent_decode_value(value: &str, _: &EncoderOptions) -> Option<String> {
    decode(value)
}

fn serialize_expires(expires: Option<i64>, _: &EncoderOptions) -> Option<String> {
    expires
        .filter(|e| is_safe_integer(*e))
        .and_then(format_http_date)
}

fn parse_expires(expires: &str, _: &EncoderOptions) -> Option<i64> {
    parse_http_date(expires)
}

fn serialize_max_age(expires: Option<i64>, options: &EncoderOptions) -> Option<String> {
    let expires = expires.filter(|e| is_safe_integer(*e))?;
    Some(format_max_age(expires, options.now()))
}

fn parse_max_age(max_age: &str, options: &EncoderOptions) -> Option<i64> {
    let seconds = coerce_safe_integer(max_age)?;
    let expires = i128::from(options.now()) + i128::from(seconds) * 1000;
    i64::try_from(expires).ok().filter(|e| is_safe_integer(*e))
}

impl<T> Clone for Encoder<T> {
    fn clone(&self) -> Self {
        Encoder {
            serialize_name: self.serialize_name.clone(),
            parse_name: self.parse_name.clone(),
            serialize_value: self.serialize_value.clone(),
            parse_value: self.parse_value.clone(),
            serialize_domain: self.serialize_domain.clone(),
            parse_domain: self.parse_domain.clone(),
            serialize_path: self.serialize_path.clone(),
            parse_path: self.parse_path.clone(),
            serialize_expires: self.serialize_expires.clone(),
            parse_expires: self.parse_expires.clone(),
            serialize_max_age: self.serialize_max_age.clone(),
            parse_max_age: self.parse_max_age.clone(),
        }
    }
}

impl<T> fmt::Debug for Encoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoder").finish_non_exhaustive()
    }
}

/// A set of [`Encoder`] operations, some of which may be missing.
///
/// A `PartialEncoder` becomes an [`Encoder`] in one of two ways:
///
/// - [`PartialEncoder::merge_over`], which fills the gaps from another encoder;
/// - [`Encoder::try_from`], which fails with an [`InvalidEncoderError`] naming the
///   first missing operation.
///
/// The second path is the one taken when a `PartialEncoder` is passed via
/// [`ParserOptions::encoder`].
///
/// ```rust
/// use cantucci::{Encoder, EncoderOperation, PartialEncoder};
///
/// let partial: PartialEncoder = PartialEncoder::new()
///     .serialize_name(|name, _| Some(name.to_owned()));
/// let err = Encoder::try_from(partial).unwrap_err();
/// assert_eq!(err.operation(), EncoderOperation::ParseName);
/// ```
///
/// [`ParserOptions::encoder`]: crate::ParserOptions::encoder
pub struct PartialEncoder<T = String> {
    serialize_name: Option<TextFn<String>>,
    parse_name: Option<TextFn<String>>,
    serialize_value: Option<ValueFn<T>>,
    parse_value: Option<TextFn<T>>,
    serialize_domain: Option<OptionalTextFn>,
    parse_domain: Option<TextFn<String>>,
    serialize_path: Option<OptionalTextFn>,
    parse_path: Option<TextFn<String>>,
    serialize_expires: Option<TimestampFn>,
    parse_expires: Option<TextFn<i64>>,
    serialize_max_age: Option<TimestampFn>,
    parse_max_age: Option<TextFn<i64>>,
}

impl<T> PartialEncoder<T> {
    /// An encoder with no operations at all.
    pub fn new() -> Self {
        PartialEncoder {
            serialize_name: None,
            parse_name: None,
            serialize_value: None,
            parse_value: None,
            serialize_domain: None,
            parse_domain: None,
            serialize_path: None,
            parse_path: None,
            serialize_expires: None,
            parse_expires: None,
            serialize_max_age: None,
            parse_max_age: None,
        }
    }

    /// Sets the name serialization.
    pub fn serialize_name<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &EncoderOptions) -> Option<String> + Send + Sync + 'static,
    {
        self.serialize_name = Some(Arc::new(f));
        self
    }

    /// Sets the name parsing.
    pub fn parse_name<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &EncoderOptions) -> Option<String> + Send + Sync + 'static,
    {
        self.parse_name = Some(Arc::new(f));
        self
    }

    /// Sets the value serialization.
    pub fn serialize_value<F>(mut self, f: F) -> Self
    where
        F: Fn(&T, &EncoderOptions) -> Option<String> + Send + Sync + 'static,
    {
        self.serialize_value = Some(Arc::new(f));
        self
    }

    /// Sets the value parsing.
    pub fn parse_value<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &EncoderOptions) -> Option<T> + Send + Sync + 'static,
    {
        self.parse_value = Some(Arc::new(f));
        self
    }

    /// Sets the `Domain` serialization.
    pub fn serialize_domain<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<&str>, &EncoderOptions) -> Option<String> + Send + Sync + 'static,
    {
        self.serialize_domain = Some(Arc::new(f));
        self
    }

    /// Sets the `Domain` parsing.
    pub fn parse_domain<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &EncoderOptions) -> Option<String> + Send + Sync + 'static,
    {
        self.parse_domain = Some(Arc::new(f));
        self
    }

    /// Sets the `Path` serialization.
    pub fn serialize_path<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<&str>, &EncoderOptions) -> Option<String> + Send + Sync + 'static,
    {
        self.serialize_path = Some(Arc::new(f));
        self
    }

    /// Sets the `Path` parsing.
    pub fn parse_path<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &EncoderOptions) -> Option<String> + Send + Sync + 'static,
    {
        self.parse_path = Some(Arc::new(f));
        self
    }

    /// Sets the `Expires` serialization.
    pub fn serialize_expires<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<i64>, &EncoderOptions) -> Option<String> + Send + Sync + 'static,
    {
        self.serialize_expires = Some(Arc::new(f));
        self
    }

    /// Sets the `Expires` parsing.
    pub fn parse_expires<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &EncoderOptions) -> Option<i64> + Send + Sync + 'static,
    {
        self.parse_expires = Some(Arc::new(f));
        self
    }

    /// Sets the `Max-Age` serialization.
    pub fn serialize_max_age<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<i64>, &EncoderOptions) -> Option<String> + Send + Sync + 'static,
    {
        self.serialize_max_age = Some(Arc::new(f));
        self
    }

    /// Sets the `Max-Age` parsing.
    pub fn parse_max_age<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &EncoderOptions) -> Option<i64> + Send + Sync + 'static,
    {
        self.parse_max_age = Some(Arc::new(f));
        self
    }

    /// Completes `self` with the operations of `defaults` wherever `self` has none.
    pub fn merge_over(self, defaults: Encoder<T>) -> Encoder<T> {
        Encoder {
            serialize_name: self.serialize_name.unwrap_or(defaults.serialize_name),
            parse_name: self.parse_name.unwrap_or(defaults.parse_name),
            serialize_value: self.serialize_value.unwrap_or(defaults.serialize_value),
            parse_value: self.parse_value.unwrap_or(defaults.parse_value),
            serialize_domain: self.serialize_domain.unwrap_or(defaults.serialize_domain),
            parse_domain: self.parse_domain.unwrap_or(defaults.parse_domain),
            serialize_path: self.serialize_path.unwrap_or(defaults.serialize_path),
            parse_path: self.parse_path.unwrap_or(defaults.parse_path),
            serialize_expires: self.serialize_expires.unwrap_or(defaults.serialize_expires),
            parse_expires: self.parse_expires.unwrap_or(defaults.parse_expires),
            serialize_max_age: self.serialize_max_age.unwrap_or(defaults.serialize_max_age),
            parse_max_age: self.parse_max_age.unwrap_or(defaults.parse_max_age),
        }
    }
}

impl<T> TryFrom<PartialEncoder<T>> for Encoder<T> {
    type Error = InvalidEncoderError;

    /// Fields are checked in [`EncoderOperation::ALL`] order.
    fn try_from(partial: PartialEncoder<T>) -> Result<Self, Self::Error> {
        fn require<F>(f: Option<F>, operation: EncoderOperation) -> Result<F, InvalidEncoderError> {
            f.ok_or(InvalidEncoderError { operation })
        }

        use EncoderOperation::*;
        Ok(Encoder {
            serialize_name: require(partial.serialize_name, SerializeName)?,
            parse_name: require(partial.parse_name, ParseName)?,
            serialize_value: require(partial.serialize_value, SerializeValue)?,
            parse_value: require(partial.parse_value, ParseValue)?,
            serialize_domain: require(partial.serialize_domain, SerializeDomain)?,
            parse_domain: require(partial.parse_domain, ParseDomain)?,
            serialize_path: require(partial.serialize_path, SerializePath)?,
            parse_path: require(partial.parse_path, ParsePath)?,
            serialize_expires: require(partial.serialize_expires, SerializeExpires)?,
            parse_expires: require(partial.parse_expires, ParseExpires)?,
            serialize_max_age: require(partial.serialize_max_age, SerializeMaxAge)?,
            parse_max_age: require(partial.parse_max_age, ParseMaxAge)?,
        })
    }
}

impl<T> From<Encoder<T>> for PartialEncoder<T> {
    fn from(encoder: Encoder<T>) -> Self {
        PartialEncoder {
            serialize_name: Some(encoder.serialize_name),
            parse_name: Some(encoder.parse_name),
            serialize_value: Some(encoder.serialize_value),
            parse_value: Some(encoder.parse_value),
            serialize_domain: Some(encoder.serialize_domain),
            parse_domain: Some(encoder.parse_domain),
            serialize_path: Some(encoder.serialize_path),
            parse_path: Some(encoder.parse_path),
            serialize_expires: Some(encoder.serialize_expires),
            parse_expires: Some(encoder.parse_expires),
            serialize_max_age: Some(encoder.serialize_max_age),
            parse_max_age: Some(encoder.parse_max_age),
        }
    }
}

impl<T> Default for PartialEncoder<T> {
    fn default() -> Self {
        PartialEncoder::new()
    }
}

impl<T> Clone for PartialEncoder<T> {
    fn clone(&self) -> Self {
        PartialEncoder {
            serialize_name: self.serialize_name.clone(),
            parse_name: self.parse_name.clone(),
            serialize_value: self.serialize_value.clone(),
            parse_value: self.parse_value.clone(),
            serialize_domain: self.serialize_domain.clone(),
            parse_domain: self.parse_domain.clone(),
            serialize_path: self.serialize_path.clone(),
            parse_path: self.parse_path.clone(),
            serialize_expires: self.serialize_expires.clone(),
            parse_expires: self.parse_expires.clone(),
            serialize_max_age: self.serialize_max_age.clone(),
            parse_max_age: self.parse_max_age.clone(),
        }
    }
}

impl<T> fmt::Debug for PartialEncoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let missing: Vec<_> = EncoderOperation::ALL
            .iter()
            .filter(|op| !self.provides(**op))
            .map(EncoderOperation::as_str)
            .collect();
        f.debug_struct("PartialEncoder")
            .field("missing", &missing)
            .finish()
    }
}

impl<T> PartialEncoder<T> {
    fn provides(&self, operation: EncoderOperation) -> bool {
        match operation {
            EncoderOperation::SerializeName => self.serialize_name.is_some(),
            EncoderOperation::ParseName => self.parse_name.is_some(),
            EncoderOperation::SerializeValue => self.serialize_value.is_some(),
            EncoderOperation::ParseValue => self.parse_value.is_some(),
            EncoderOperation::SerializeDomain => self.serialize_domain.is_some(),
            EncoderOperation::ParseDomain => self.parse_domain.is_some(),
            EncoderOperation::SerializePath => self.serialize_path.is_some(),
            EncoderOperation::ParsePath => self.parse_path.is_some(),
            EncoderOperation::SerializeExpires => self.serialize_expires.is_some(),
            EncoderOperation::ParseExpires => self.parse_expires.is_some(),
            EncoderOperation::SerializeMaxAge => self.serialize_max_age.is_some(),
            EncoderOperation::ParseMaxAge => self.parse_max_age.is_some(),
        }
    }
}

/// `max(0, (expires - now) / 1000)`, printed without rounding.
fn format_max_age(expires: i64, now: i64) -> String {
    let delta = i128::from(expires) - i128::from(now);
    if delta <= 0 {
        return "0".to_string();
    }
    let (seconds, millis) = (delta / 1000, delta % 1000);
    if millis == 0 {
        seconds.to_string()
    } else {
        let fraction = format!("{millis:03}");
        format!("{seconds}.{}", fraction.trim_end_matches('0'))
    }
}

/// Numeric coercion of a `Max-Age` value.
///
/// Surrounding whitespace is ignored and an empty string counts as zero.
/// Decimal (including exponent notation) and `0x`/`0o`/`0b` literals are accepted,
/// as long as they denote an integer within the safe range.
fn coerce_safe_integer(input: &str) -> Option<i64> {
    let input = input.trim();
    if input.is_empty() {
        return Some(0);
    }
    let radix = match input.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        // `from_str_radix` tolerates a leading `+`, radix literals don't.
        let digits = &input[2..];
        if digits.starts_with('+') {
            return None;
        }
        let value = u64::from_str_radix(digits, radix).ok()?;
        return i64::try_from(value).ok().filter(|v| is_safe_integer(*v));
    }
    // Rust accepts `inf`/`nan` spellings here; they are rejected below anyway.
    let value: f64 = input.parse().ok()?;
    if !value.is_finite() || value.fract() != 0.0 || value.abs() > MAX_SAFE_INTEGER as f64 {
        return None;
    }
    Some(value as i64)
}

#[cfg(test)]
mod tests {
    use super::{coerce_safe_integer, format_max_age};
    use crate::{Encoder, EncoderOperation, EncoderOptions, FixedClock, PartialEncoder};
    use googletest::prelude::*;
    use std::sync::Arc;

    fn options_at(now: i64) -> EncoderOptions {
        EncoderOptions::new(false, Arc::new(FixedClock(now)))
    }

    #[test]
    fn default_text_fields_pass_through() {
        let encoder: Encoder = Encoder::default();
        let options = options_at(0);
        assert_eq!(encoder.serialize_name("%&$", &options).as_deref(), Some("%&$"));
        assert_eq!(encoder.parse_name("john", &options).as_deref(), Some("john"));
        assert_eq!(
            encoder.serialize_domain(Some("*.example.com"), &options).as_deref(),
            Some("*.example.com")
        );
        assert_eq!(encoder.serialize_domain(None, &options), None);
        assert_eq!(
            encoder.parse_domain("*.example.com", &options).as_deref(),
            Some("*.example.com")
        );
        assert_eq!(encoder.serialize_path(Some("%&$"), &options).as_deref(), Some("%&$"));
        assert_eq!(encoder.serialize_path(None, &options), None);
        assert_eq!(encoder.parse_path("/", &options).as_deref(), Some("/"));
    }

    #[test]
    fn default_value() {
        let encoder: Encoder = Encoder::default();
        let options = options_at(0);
        assert_eq!(
            encoder
                .serialize_value(&"%&$".to_string(), &options)
                .as_deref(),
            Some("%25%26%24")
        );
        assert_eq!(encoder.parse_value("%25%26%24", &options).as_deref(), Some("%&$"));
        assert_eq!(encoder.parse_value("%zz", &options).as_deref(), Some("%zz"));
        assert_eq!(encoder.parse_value("%FF", &options), None);
    }

    #[test]
    fn unencoded_value() {
        let encoder = Encoder::unencoded();
        let options = options_at(0);
        assert_eq!(
            encoder
                .serialize_value(&"a b".to_string(), &options)
                .as_deref(),
            Some("a b")
        );
        assert_eq!(encoder.parse_value("a%20b", &options).as_deref(), Some("a%20b"));
    }

    #[test]
    fn default_expires() {
        let encoder: Encoder = Encoder::default();
        let options = options_at(0);
        assert_eq!(
            encoder.serialize_expires(Some(0), &options).as_deref(),
            Some("Thu, 01 Jan 1970 00:00:00 GMT")
        );
        assert_eq!(encoder.serialize_expires(None, &options), None);
        assert_eq!(
            encoder.serialize_expires(Some(crate::MAX_SAFE_INTEGER + 1), &options),
            None
        );
        assert_eq!(
            encoder.parse_expires("Thu, 01 Jan 1970 00:01:00 GMT", &options),
            Some(60_000)
        );
        assert_eq!(encoder.parse_expires("not a date", &options), None);
    }

    #[test]
    fn default_max_age() {
        let encoder: Encoder = Encoder::default();
        assert_eq!(
            encoder
                .serialize_max_age(Some(15_000), &options_at(0))
                .as_deref(),
            Some("15")
        );
        assert_eq!(
            encoder
                .serialize_max_age(Some(15_000), &options_at(20_000))
                .as_deref(),
            Some("0")
        );
        assert_eq!(encoder.serialize_max_age(None, &options_at(0)), None);
        assert_eq!(encoder.parse_max_age("15", &options_at(0)), Some(15_000));
        assert_eq!(encoder.parse_max_age("15", &options_at(1_000)), Some(16_000));
        assert_eq!(encoder.parse_max_age("-5", &options_at(0)), Some(-5_000));
        assert_eq!(encoder.parse_max_age("soon", &options_at(0)), None);
        assert_eq!(encoder.parse_max_age("1.5", &options_at(0)), None);
        assert_eq!(
            encoder.parse_max_age("9007199254740991", &options_at(0)),
            None
        );
    }

    #[test]
    fn max_age_formatting() {
        let cases = [
            (15_000, 0, "15"),
            (1_500, 0, "1.5"),
            (1_001, 0, "1.001"),
            (1_010, 0, "1.01"),
            (999, 0, "0.999"),
            (0, 0, "0"),
            (-1, 0, "0"),
            (0, 1_000, "0"),
            (10_000, -5_000, "15"),
        ];
        for (expires, now, expected) in cases {
            assert_eq!(
                format_max_age(expires, now),
                expected,
                "Failed for {expires} - {now}"
            );
        }
    }

    #[test]
    fn max_age_coercion() {
        let cases = [
            ("15", Some(15)),
            ("  15  ", Some(15)),
            ("", Some(0)),
            ("   ", Some(0)),
            ("+7", Some(7)),
            ("-7", Some(-7)),
            ("1e3", Some(1_000)),
            ("15.0", Some(15)),
            ("0x10", Some(16)),
            ("0b101", Some(5)),
            ("0o17", Some(15)),
            ("1.5", None),
            ("15s", None),
            ("Infinity", None),
            ("inf", None),
            ("NaN", None),
            ("9007199254740992", None),
            ("-0x10", None),
            ("0x+5", None),
            ("0x", None),
        ];
        for (input, expected) in cases {
            assert_eq!(coerce_safe_integer(input), expected, "Failed for `{input}`");
        }
    }

    #[test]
    fn validation_reports_the_first_missing_operation() {
        let empty = PartialEncoder::<String>::new();
        assert_that!(
            Encoder::try_from(empty).unwrap_err(),
            displays_as(eq("Invalid cookie encoder: missing the `serialize_name` operation"))
        );

        let ops = EncoderOperation::ALL;
        let partial = PartialEncoder::<String>::new().serialize_name(|n, _| Some(n.to_owned()));
        assert_eq!(
            Encoder::try_from(partial.clone()).unwrap_err().operation(),
            ops[1]
        );

        let partial = partial
            .parse_name(|n, _| Some(n.to_owned()))
            .serialize_value(|v: &String, _| Some(v.clone()))
            .parse_value(|v, _| Some(v.to_owned()));
        assert_eq!(
            Encoder::try_from(partial).unwrap_err().operation(),
            EncoderOperation::SerializeDomain
        );

        // Only the last operation is missing.
        let encoder: Encoder = Encoder::default();
        let mut partial = PartialEncoder::from(encoder);
        partial.parse_max_age = None;
        assert_eq!(
            Encoder::try_from(partial).unwrap_err().operation(),
            EncoderOperation::ParseMaxAge
        );
    }

    #[test]
    fn complete_partial_encoders_validate() {
        let encoder: Encoder = Encoder::default();
        assert!(Encoder::try_from(PartialEncoder::from(encoder)).is_ok());
    }

    #[test]
    fn merge_over_keeps_defaults_for_missing_operations() {
        let encoder = PartialEncoder::<String>::new()
            .parse_name(|name, _| Some(name.to_uppercase()))
            .merge_over(Encoder::default());
        let options = options_at(0);
        assert_eq!(encoder.parse_name("id", &options).as_deref(), Some("ID"));
        assert_eq!(encoder.serialize_name("id", &options).as_deref(), Some("id"));
        assert_eq!(encoder.parse_value("a%20b", &options).as_deref(), Some("a b"));
    }

    #[test]
    fn debug_lists_missing_operations() {
        let encoder: Encoder = Encoder::default();
        let partial = PartialEncoder::from(encoder);
        assert_eq!(format!("{partial:?}"), "PartialEncoder { missing: [] }");

        let partial = PartialEncoder::<String>::new().parse_name(|n, _| Some(n.to_owned()));
        let debug = format!("{partial:?}");
        assert_that!(debug, contains_substring("\"serialize_name\""));
        assert_that!(debug, not(contains_substring("\"parse_name\"")));
    }
}
