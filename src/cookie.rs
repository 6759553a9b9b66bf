use crate::{CookiePrefix, SameSite};
use std::fmt;
use time::OffsetDateTime;

/// The largest integer that round-trips through an IEEE 754 double without loss,
/// `2^53 - 1`.
///
/// Timestamps outside of `-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER` are treated as absent.
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

/// Returns `true` if `value` lies within `-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER`.
///
/// ```rust
/// use cantucci::{is_safe_integer, MAX_SAFE_INTEGER};
///
/// assert!(is_safe_integer(0));
/// assert!(is_safe_integer(-MAX_SAFE_INTEGER));
/// assert!(!is_safe_integer(MAX_SAFE_INTEGER + 1));
/// ```
#[inline]
pub fn is_safe_integer(value: i64) -> bool {
    (-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&value)
}

/// A single cookie, as found in a `Set-Cookie` header or as one entry of a
/// `Cookie` header.
///
/// Cookies produced by [`CookieParser`] always carry a name and a value, possibly
/// empty. Every attribute is optional: `None` means the attribute was absent (or
/// malformed) in the parsed string, and that it won't be emitted on serialization.
///
/// The value type defaults to `String`. Other types can be used together with a
/// custom [`Encoder`].
///
/// ## Constructing a `Cookie`
///
/// ```rust
/// use cantucci::{Cookie, SameSite};
///
/// let cookie = Cookie::new("id", "5")
///     .set_domain("example.com")
///     .set_http_only(true)
///     .set_same_site(SameSite::Lax);
/// assert_eq!(cookie.name(), "id");
/// assert_eq!(cookie.value(), "5");
/// assert_eq!(cookie.path(), None);
/// ```
///
/// ## Serialization
///
/// With the `serde` feature enabled, a `Cookie` maps to an object with camelCase
/// keys (`name`, `value`, `expires`, `path`, `domain`, `httpOnly`, `secure`,
/// `sameSite`, `prefix`). Unset attributes are omitted.
/// The name prefix is a single `prefix` key, holding `"Host"` or `"Secure"`,
/// rather than a pair of `hostPrefix`/`securePrefix` booleans:
///
/// ```json
/// { "name": "id", "value": "5", "secure": true, "prefix": "Host", "path": "/" }
/// ```
///
/// [`CookieParser`]: crate::CookieParser
/// [`Encoder`]: crate::Encoder
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Cookie<T = String> {
    /// The cookie's name, without any `__Host-`/`__Secure-` prefix.
    pub(crate) name: String,
    /// The cookie's value.
    pub(crate) value: T,
    /// Expiry, in milliseconds since the Unix epoch.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub(crate) expires: Option<i64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub(crate) path: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub(crate) domain: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub(crate) http_only: Option<bool>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub(crate) secure: Option<bool>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub(crate) same_site: Option<SameSite>,
    /// A single field keeps `__Host-` and `__Secure-` mutually exclusive.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub(crate) prefix: Option<CookiePrefix>,
}

impl Cookie {
    /// Creates a new [`Cookie`] with the given name and value and no attributes.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cantucci::Cookie;
    ///
    /// let cookie = Cookie::new("name", "value");
    /// assert_eq!(cookie.name(), "name");
    /// assert_eq!(cookie.value(), "value");
    /// assert_eq!(cookie.to_string(), "name=value");
    /// ```
    pub fn new<N, V>(name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Cookie::from_parts(name, value.into())
    }
}

impl<T> Cookie<T> {
    /// Creates a new [`Cookie`] holding a value of an arbitrary type.
    pub fn from_parts<N: Into<String>>(name: N, value: T) -> Self {
        Cookie {
            name: name.into(),
            value,
            expires: None,
            path: None,
            domain: None,
            http_only: None,
            secure: None,
            same_site: None,
            prefix: None,
        }
    }

    /// Returns the name of this cookie, without its prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value of this cookie.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consumes the cookie, returning its value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Returns the expiry of this cookie, in milliseconds since the Unix epoch.
    ///
    /// `None` identifies a session cookie.
    pub fn expires(&self) -> Option<i64> {
        self.expires
    }

    /// Returns the expiry of this cookie as an [`OffsetDateTime`], if it has one
    /// and it is representable.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cantucci::Cookie;
    ///
    /// let cookie = Cookie::new("name", "value").set_expires(15_000);
    /// assert_eq!(
    ///     cookie.expires_datetime().map(|t| t.unix_timestamp()),
    ///     Some(15)
    /// );
    /// assert_eq!(Cookie::new("name", "value").expires_datetime(), None);
    /// ```
    pub fn expires_datetime(&self) -> Option<OffsetDateTime> {
        let nanos = i128::from(self.expires?) * 1_000_000;
        OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()
    }

    /// Returns `true` if the cookie has no (valid) expiry.
    pub fn is_session(&self) -> bool {
        !matches!(self.expires, Some(expires) if is_safe_integer(expires))
    }

    /// Returns `true` if the cookie carries a valid expiry that is not later
    /// than `now_millis`.
    ///
    /// Session cookies never expire according to this method.
    pub fn is_expired_at(&self, now_millis: i64) -> bool {
        match self.expires {
            Some(expires) if is_safe_integer(expires) => expires <= now_millis,
            _ => false,
        }
    }

    /// Returns the `Path` of the cookie, if one was specified.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns the `Domain` of the cookie, if one was specified.
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Returns whether this cookie was marked `HttpOnly` or not. Returns `None`
    /// if the `HttpOnly` attribute is not specified.
    pub fn http_only(&self) -> Option<bool> {
        self.http_only
    }

    /// Returns whether this cookie was marked `Secure` or not. Returns `None`
    /// if the `Secure` attribute is not specified.
    pub fn secure(&self) -> Option<bool> {
        self.secure
    }

    /// Returns the `SameSite` attribute of this cookie, if one was specified.
    pub fn same_site(&self) -> Option<SameSite> {
        self.same_site
    }

    /// Returns the name prefix of this cookie, if any.
    pub fn prefix(&self) -> Option<CookiePrefix> {
        self.prefix
    }

    /// `Some(true)` if the name carried the `__Host-` prefix, `None` otherwise.
    pub fn host_prefix(&self) -> Option<bool> {
        (self.prefix == Some(CookiePrefix::Host)).then_some(true)
    }

    /// `Some(true)` if the name carried the `__Secure-` prefix, `None` otherwise.
    pub fn secure_prefix(&self) -> Option<bool> {
        (self.prefix == Some(CookiePrefix::Secure)).then_some(true)
    }

    /// Sets the name of `self` to `name`.
    pub fn set_name<N: Into<String>>(mut self, name: N) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the value of `self` to `value`.
    pub fn set_value(mut self, value: T) -> Self {
        self.value = value;
        self
    }

    /// Sets the expiry of `self`, in milliseconds since the Unix epoch.
    /// Passing `None` turns `self` into a session cookie.
    pub fn set_expires<E: Into<Option<i64>>>(mut self, expires: E) -> Self {
        self.expires = expires.into();
        self
    }

    /// Removes the expiry of `self`.
    pub fn unset_expires(mut self) -> Self {
        self.expires = None;
        self
    }

    /// Sets the `path` of `self` to `path`.
    pub fn set_path<P: Into<String>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Unsets the `path` of `self`.
    pub fn unset_path(mut self) -> Self {
        self.path = None;
        self
    }

    /// Sets the `domain` of `self` to `domain`.
    pub fn set_domain<D: Into<String>>(mut self, domain: D) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Unsets the `domain` of `self`.
    pub fn unset_domain(mut self) -> Self {
        self.domain = None;
        self
    }

    /// Sets the value of `http_only` in `self` to `value`.  If `value` is
    /// `None`, the field is unset.
    pub fn set_http_only<V: Into<Option<bool>>>(mut self, value: V) -> Self {
        self.http_only = value.into();
        self
    }

    /// Sets the value of `secure` in `self` to `value`. If `value` is `None`,
    /// the field is unset.
    pub fn set_secure<V: Into<Option<bool>>>(mut self, value: V) -> Self {
        self.secure = value.into();
        self
    }

    /// Sets the value of `same_site` in `self` to `value`. If `value` is
    /// `None`, the field is unset.
    pub fn set_same_site<V: Into<Option<SameSite>>>(mut self, value: V) -> Self {
        self.same_site = value.into();
        self
    }

    /// Sets the name prefix of `self`.
    ///
    /// The prefix is re-attached in front of the name on serialization, and it
    /// forces the attributes it requires.
    ///
    /// ```rust
    /// use cantucci::{Cookie, CookiePrefix};
    ///
    /// let cookie = Cookie::new("id", "5").set_prefix(CookiePrefix::Host);
    /// assert_eq!(cookie.host_prefix(), Some(true));
    /// assert_eq!(cookie.secure_prefix(), None);
    /// ```
    pub fn set_prefix<P: Into<Option<CookiePrefix>>>(mut self, prefix: P) -> Self {
        self.prefix = prefix.into();
        self
    }
}

impl<T: fmt::Display> fmt::Display for Cookie<T> {
    /// Formats the raw `name=value` pair, prefix included, without any encoding.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = self.prefix {
            write!(f, "{prefix}")?;
        }
        write!(f, "{}={}", self.name, self.value)
    }
}

impl<N, V> From<(N, V)> for Cookie
where
    N: Into<String>,
    V: Into<String>,
{
    fn from((name, value): (N, V)) -> Self {
        Cookie::new(name, value)
    }
}
