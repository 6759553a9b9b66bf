use crate::config::ResolvedOptions;
use crate::errors::{CookieError, InvalidCookieStringError};
use crate::{Cookie, CookieParser, CookiePrefix, ParserOptions, SameSite};
use std::fmt;
use tracing::debug;

impl<T> CookieParser<T> {
    /// Formats `cookie` as a `Set-Cookie` header value.
    ///
    /// Attributes are emitted in a fixed order: `Expires`, `Max-Age`, `Domain`,
    /// `Path`, `SameSite`, `HttpOnly`, `Secure`. `Path` defaults to `/`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cantucci::{Cookie, CookieParser, CookiePrefix, SameSite};
    ///
    /// let parser = CookieParser::new();
    /// let cookie = Cookie::new("id", "a b")
    ///     .set_domain("example.com")
    ///     .set_same_site(SameSite::Lax)
    ///     .set_http_only(true);
    /// assert_eq!(
    ///     parser.serialize_set_cookie(&cookie),
    ///     "id=a%20b; Domain=example.com; Path=/; SameSite=Lax; HttpOnly"
    /// );
    ///
    /// // `__Host-` cookies are always `Secure`, host-only and scoped to `/`.
    /// let cookie = cookie.set_prefix(CookiePrefix::Host).set_path("/docs");
    /// assert_eq!(
    ///     parser.serialize_set_cookie(&cookie),
    ///     "__Host-id=a%20b; Path=/; SameSite=Lax; HttpOnly; Secure"
    /// );
    /// ```
    pub fn serialize_set_cookie(&self, cookie: &Cookie<T>) -> String {
        serialize_set_cookie(cookie, &self.defaults)
    }

    /// Like [`CookieParser::serialize_set_cookie`], with `options` applied for this call.
    pub fn serialize_set_cookie_with(
        &self,
        cookie: &Cookie<T>,
        options: &ParserOptions<T>,
    ) -> Result<String, CookieError> {
        let options = self.resolve(options)?;
        Ok(serialize_set_cookie(cookie, &options))
    }
}

impl<T: fmt::Debug> CookieParser<T> {
    /// Formats `cookies` as a `Cookie` header value: `name=value` pairs joined by `; `.
    ///
    /// Attributes are not part of a `Cookie` header and are ignored, the name
    /// prefix excepted.
    ///
    /// # Errors
    ///
    /// Only in strict mode, if any cookie name encodes to an empty string.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cantucci::{Cookie, CookieParser};
    ///
    /// let parser = CookieParser::new();
    /// let cookies = [Cookie::new("id", "5").set_path("/"), Cookie::new("name", "a b")];
    /// assert_eq!(parser.serialize_cookie(&cookies).unwrap(), "id=5; name=a%20b");
    /// ```
    pub fn serialize_cookie<'a, I>(&self, cookies: I) -> Result<String, InvalidCookieStringError>
    where
        I: IntoIterator<Item = &'a Cookie<T>>,
        T: 'a,
    {
        serialize_cookie(cookies, &self.defaults)
    }

    /// Like [`CookieParser::serialize_cookie`], with `options` applied for this call.
    pub fn serialize_cookie_with<'a, I>(
        &self,
        cookies: I,
        options: &ParserOptions<T>,
    ) -> Result<String, CookieError>
    where
        I: IntoIterator<Item = &'a Cookie<T>>,
        T: 'a,
    {
        let options = self.resolve(options)?;
        Ok(serialize_cookie(cookies, &options)?)
    }
}

/// An encoded `Set-Cookie` header value, ready to be formatted.
struct SetCookieString {
    prefix: Option<CookiePrefix>,
    name: String,
    value: String,
    expires: Option<String>,
    max_age: Option<String>,
    domain: Option<String>,
    path: Option<String>,
    same_site: Option<SameSite>,
    http_only: bool,
    secure: bool,
}

impl SetCookieString {
    fn new<T>(cookie: &Cookie<T>, options: &ResolvedOptions<T>) -> Self {
        let encoder = &options.encoder;
        let encoder_options = &options.encoder_options;

        let host_prefix = cookie.prefix == Some(CookiePrefix::Host);
        let (domain, path) = if host_prefix {
            if cookie.domain.is_some() {
                debug!(cookie = cookie.name.as_str(), "Dropping `Domain` from a `__Host-` cookie");
            }
            (None, Some("/"))
        } else {
            (cookie.domain.as_deref(), cookie.path.as_deref())
        };

        let name = encoder
            .serialize_name(&cookie.name, encoder_options)
            .unwrap_or_default();
        if options.strict() && name.is_empty() {
            debug!("Serializing a `Set-Cookie` string with an empty name");
        }

        SetCookieString {
            prefix: cookie.prefix,
            name,
            value: encoder
                .serialize_value(&cookie.value, encoder_options)
                .unwrap_or_default(),
            expires: encoder.serialize_expires(cookie.expires, encoder_options),
            max_age: encoder.serialize_max_age(cookie.expires, encoder_options),
            domain: encoder.serialize_domain(domain, encoder_options),
            path: encoder.serialize_path(path, encoder_options),
            same_site: cookie.same_site,
            http_only: cookie.http_only == Some(true),
            secure: cookie.prefix.is_some() || cookie.secure == Some(true),
        }
    }

    fn fmt_parameters(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(expires) = &self.expires {
            write!(f, "; Expires={}", expires)?;
        }

        if let Some(max_age) = &self.max_age {
            write!(f, "; Max-Age={}", max_age)?;
        }

        if let Some(domain) = &self.domain {
            write!(f, "; Domain={}", domain)?;
        }

        match self.path.as_deref() {
            Some(path) if !path.is_empty() => write!(f, "; Path={}", path)?,
            _ => write!(f, "; Path=/")?,
        }

        if let Some(same_site) = self.same_site {
            write!(f, "; SameSite={}", same_site)?;
        }

        if self.http_only {
            write!(f, "; HttpOnly")?;
        }

        if self.secure {
            write!(f, "; Secure")?;
        }

        Ok(())
    }
}

impl fmt::Display for SetCookieString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(prefix) = self.prefix {
            write!(f, "{}", prefix)?;
        }
        write!(f, "{}={}", self.name, self.value)?;
        self.fmt_parameters(f)
    }
}

fn serialize_set_cookie<T>(cookie: &Cookie<T>, options: &ResolvedOptions<T>) -> String {
    SetCookieString::new(cookie, options).to_string()
}

fn serialize_cookie<'a, T, I>(
    cookies: I,
    options: &ResolvedOptions<T>,
) -> Result<String, InvalidCookieStringError>
where
    T: fmt::Debug + 'a,
    I: IntoIterator<Item = &'a Cookie<T>>,
{
    let encoder = &options.encoder;
    let encoder_options = &options.encoder_options;

    let mut pairs = Vec::new();
    for cookie in cookies {
        let name = encoder
            .serialize_name(&cookie.name, encoder_options)
            .unwrap_or_default();
        if options.strict() && name.is_empty() {
            return Err(InvalidCookieStringError::empty_name(format!("{cookie:?}")));
        }
        let value = encoder
            .serialize_value(&cookie.value, encoder_options)
            .unwrap_or_default();
        let prefix = cookie.prefix.map(|p| p.as_str()).unwrap_or_default();
        pairs.push(format!("{prefix}{name}={value}"));
    }
    Ok(pairs.join("; "))
}
