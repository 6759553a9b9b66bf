use crate::config::ResolvedOptions;
use crate::errors::{CookieError, InvalidCookieStringError, InvalidEncoderError};
use crate::{is_safe_integer, Cookie, CookiePrefix, Encoder, ParserConfig, ParserOptions, SameSite};
use tracing::{debug, trace};

/// Parses and serializes `Set-Cookie` and `Cookie` header strings.
///
/// # Creating a `CookieParser`
///
/// The default parser is permissive, percent-encodes cookie values and reads the
/// system clock to resolve `Max-Age`:
///
/// ```rust
/// use cantucci::CookieParser;
///
/// let parser = CookieParser::new();
/// let cookie = parser.parse_set_cookie("__Host-id=a%20b; HttpOnly").unwrap();
/// assert_eq!(cookie.name(), "id");
/// assert_eq!(cookie.value(), "a b");
/// assert_eq!(cookie.host_prefix(), Some(true));
/// assert_eq!(cookie.secure(), Some(true));
/// assert_eq!(cookie.path(), Some("/"));
/// ```
///
/// You can also start from a [`ParserConfig`], or customize the encoder, the clock
/// and strictness through [`ParserOptions`].
///
/// # Per-call overrides
///
/// Every operation has a `*_with` twin taking [`ParserOptions`], which are layered
/// on top of the options the parser was built with, for that call only.
///
/// # Error policy
///
/// Parsing is permissive: malformed attributes are dropped, undecodable values
/// become empty. The only parsing error is an empty `Set-Cookie` name in strict mode.
/// Serializing a `Cookie` header, instead, is validated in strict mode.
#[derive(Clone, Debug)]
pub struct CookieParser<T = String> {
    pub(crate) defaults: ResolvedOptions<T>,
}

impl CookieParser {
    /// A parser using the default [`Encoder`], the system clock and non-strict mode.
    pub fn new() -> Self {
        CookieParser {
            defaults: ResolvedOptions::new(Encoder::default()),
        }
    }

    /// A parser using the default [`Encoder`], with `options` applied on top.
    pub fn with_options(options: ParserOptions) -> Result<Self, InvalidEncoderError> {
        CookieParser::with_encoder(Encoder::default(), options)
    }
}

impl Default for CookieParser {
    fn default() -> Self {
        CookieParser::new()
    }
}

impl From<ParserConfig> for CookieParser {
    fn from(config: ParserConfig) -> Self {
        let encoder = if config.percent_encode {
            Encoder::default()
        } else {
            Encoder::unencoded()
        };
        let mut defaults = ResolvedOptions::new(encoder);
        defaults.encoder_options.strict = config.strict;
        CookieParser { defaults }
    }
}

impl<T> CookieParser<T> {
    /// A parser built around a custom [`Encoder`], with `options` applied on top.
    ///
    /// This is the only way to build a parser for values that are not `String`s.
    pub fn with_encoder(
        encoder: Encoder<T>,
        options: ParserOptions<T>,
    ) -> Result<Self, InvalidEncoderError> {
        let defaults = ResolvedOptions::new(encoder).merge(&options)?;
        Ok(CookieParser { defaults })
    }

    /// The encoder used when no per-call override is provided.
    pub fn encoder(&self) -> &Encoder<T> {
        &self.defaults.encoder
    }

    /// Whether the parser runs in strict mode by default.
    pub fn is_strict(&self) -> bool {
        self.defaults.strict()
    }

    /// Resolves per-call `options` against the parser defaults.
    pub(crate) fn resolve(
        &self,
        options: &ParserOptions<T>,
    ) -> Result<ResolvedOptions<T>, InvalidEncoderError> {
        self.defaults.merge(options)
    }
}

impl<T: Default> CookieParser<T> {
    /// Parses a `Set-Cookie` string (the header value, without the header name).
    ///
    /// Attribute names are matched case-insensitively, unknown attributes are
    /// ignored. If both `Max-Age` and `Expires` are valid, `Max-Age` wins.
    ///
    /// # Errors
    ///
    /// Only in strict mode, if the cookie name is empty.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cantucci::{CookieParser, SameSite};
    ///
    /// let parser = CookieParser::new();
    /// let cookie = parser
    ///     .parse_set_cookie("id=5; Path=/docs; SameSite=lax; Secure; Foo=bar")
    ///     .unwrap();
    /// assert_eq!(cookie.name(), "id");
    /// assert_eq!(cookie.value(), "5");
    /// assert_eq!(cookie.path(), Some("/docs"));
    /// assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    /// assert_eq!(cookie.secure(), Some(true));
    /// assert_eq!(cookie.http_only(), None);
    /// ```
    pub fn parse_set_cookie(&self, header: &str) -> Result<Cookie<T>, InvalidCookieStringError> {
        parse_set_cookie(header, &self.defaults)
    }

    /// Like [`CookieParser::parse_set_cookie`], with `options` applied for this call.
    pub fn parse_set_cookie_with(
        &self,
        header: &str,
        options: &ParserOptions<T>,
    ) -> Result<Cookie<T>, CookieError> {
        let options = self.resolve(options)?;
        Ok(parse_set_cookie(header, &options)?)
    }

    /// Parses a `Cookie` header value into its `name=value` pairs.
    ///
    /// Order and duplicates are preserved. Entries with an empty name are dropped
    /// in strict mode; otherwise only entries with both an empty name and an
    /// empty value are.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cantucci::CookieParser;
    ///
    /// let parser = CookieParser::new();
    /// let cookies = parser.parse_cookie("id=5; ; name=first%20value; id=6");
    /// let pairs: Vec<_> = cookies
    ///     .iter()
    ///     .map(|c| (c.name(), c.value().as_str()))
    ///     .collect();
    /// assert_eq!(pairs, [("id", "5"), ("name", "first value"), ("id", "6")]);
    /// ```
    pub fn parse_cookie(&self, header: &str) -> Vec<Cookie<T>> {
        parse_cookie(header, &self.defaults)
    }

    /// Like [`CookieParser::parse_cookie`], with `options` applied for this call.
    pub fn parse_cookie_with(
        &self,
        header: &str,
        options: &ParserOptions<T>,
    ) -> Result<Vec<Cookie<T>>, CookieError> {
        let options = self.resolve(options)?;
        Ok(parse_cookie(header, &options))
    }
}

/// Splits `name=value` on the first `=`, trimming both sides.
/// Without an `=`, the whole fragment is the value.
fn split_pair(fragment: &str) -> (&str, &str) {
    match fragment.split_once('=') {
        Some((name, value)) => (name.trim(), value.trim()),
        None => ("", fragment.trim()),
    }
}

/// Marks `cookie` with `prefix` and forces the attributes the prefix requires.
fn apply_prefix<T>(cookie: &mut Cookie<T>, prefix: CookiePrefix) {
    cookie.prefix = Some(prefix);
    cookie.secure = Some(true);
    if prefix == CookiePrefix::Host {
        cookie.path = Some("/".to_string());
    }
}

fn parse_set_cookie<T: Default>(
    header: &str,
    options: &ResolvedOptions<T>,
) -> Result<Cookie<T>, InvalidCookieStringError> {
    let encoder = &options.encoder;
    let encoder_options = &options.encoder_options;

    let mut parts = header.split(';');
    let (name, value) = split_pair(parts.next().unwrap_or_default());
    if options.strict() && name.is_empty() {
        return Err(InvalidCookieStringError::empty_name(header.to_string()));
    }

    let (prefix, name) = CookiePrefix::strip(name);
    let mut cookie = Cookie::from_parts(
        encoder.parse_name(name, encoder_options).unwrap_or_default(),
        encoder.parse_value(value, encoder_options).unwrap_or_default(),
    );
    if let Some(prefix) = prefix {
        apply_prefix(&mut cookie, prefix);
    }
    let host_prefix = prefix == Some(CookiePrefix::Host);

    let mut max_age = None;
    let mut expires = None;
    for part in parts {
        let Some((key, value)) = part.split_once('=') else {
            let flag = part.trim();
            if flag.eq_ignore_ascii_case("secure") {
                cookie.secure = Some(true);
            } else if flag.eq_ignore_ascii_case("httponly") {
                cookie.http_only = Some(true);
            } else if flag.eq_ignore_ascii_case("samesite") {
                cookie.same_site = Some(SameSite::from_attribute(None));
            } else if !flag.is_empty() {
                trace!(attribute = flag, "Ignoring unknown `Set-Cookie` attribute");
            }
            continue;
        };

        let (key, value) = (key.trim(), value.trim());
        if key.eq_ignore_ascii_case("max-age") {
            max_age = encoder.parse_max_age(value, encoder_options);
        } else if key.eq_ignore_ascii_case("expires") {
            expires = encoder.parse_expires(value, encoder_options);
        } else if key.eq_ignore_ascii_case("path") {
            if host_prefix {
                debug!(path = value, "Ignoring `Path` on a `__Host-` cookie");
                continue;
            }
            if let Some(path) = encoder.parse_path(value, encoder_options) {
                if !path.is_empty() {
                    cookie.path = Some(path);
                }
            }
        } else if key.eq_ignore_ascii_case("domain") {
            if host_prefix {
                debug!(domain = value, "Ignoring `Domain` on a `__Host-` cookie");
                continue;
            }
            if let Some(domain) = encoder.parse_domain(value, encoder_options) {
                if !domain.is_empty() {
                    cookie.domain = Some(domain);
                }
            }
        } else if key.eq_ignore_ascii_case("samesite") {
            cookie.same_site = Some(SameSite::from_attribute(Some(value)));
        } else {
            trace!(attribute = key, "Ignoring unknown `Set-Cookie` attribute");
        }
    }

    let max_age = max_age.filter(|m| is_safe_integer(*m));
    let expires = expires.filter(|e| is_safe_integer(*e));
    if max_age.is_some() && expires.is_some() {
        debug!(cookie = cookie.name.as_str(), "`Max-Age` takes precedence over `Expires`");
    }
    cookie.expires = max_age.or(expires);

    Ok(cookie)
}

fn parse_cookie<T: Default>(header: &str, options: &ResolvedOptions<T>) -> Vec<Cookie<T>> {
    let encoder = &options.encoder;
    let encoder_options = &options.encoder_options;
    let strict = options.strict();

    let mut cookies = Vec::new();
    for fragment in header.split(';') {
        let (name, raw_value) = split_pair(fragment);
        let (prefix, name) = CookiePrefix::strip(name);
        let name = encoder.parse_name(name, encoder_options).unwrap_or_default();
        let value = encoder.parse_value(raw_value, encoder_options);

        if name.is_empty() {
            if strict {
                trace!(fragment, "Dropping a cookie with an empty name");
                continue;
            }
            if value.is_none() || raw_value.is_empty() {
                trace!(fragment, "Dropping an empty cookie pair");
                continue;
            }
        }

        let mut cookie = Cookie::from_parts(name, value.unwrap_or_default());
        if let Some(prefix) = prefix {
            apply_prefix(&mut cookie, prefix);
        }
        cookies.push(cookie);
    }
    cookies
}
