use std::fmt;

/// A cookie name prefix, as defined by the [cookie prefixes draft].
///
/// Prefixes are matched case-sensitively: `__host-id` is a cookie named
/// `__host-id`, not a host-prefixed cookie named `id`.
///
/// [cookie prefixes draft]: https://tools.ietf.org/html/draft-ietf-httpbis-cookie-prefixes-00
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum CookiePrefix {
    /// `__Host-`: the cookie must be `Secure`, must not carry a `Domain` and
    /// must use `Path=/`.
    Host,
    /// `__Secure-`: the cookie must be `Secure`.
    Secure,
}

impl CookiePrefix {
    /// The literal text that precedes the cookie name on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            CookiePrefix::Host => "__Host-",
            CookiePrefix::Secure => "__Secure-",
        }
    }

    /// Splits a recognised prefix off `name`.
    ///
    /// `__Host-` is checked first; a name can carry at most one prefix.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cantucci::CookiePrefix;
    ///
    /// assert_eq!(CookiePrefix::strip("__Host-id"), (Some(CookiePrefix::Host), "id"));
    /// assert_eq!(CookiePrefix::strip("__Secure-id"), (Some(CookiePrefix::Secure), "id"));
    /// assert_eq!(CookiePrefix::strip("__secure-id"), (None, "__secure-id"));
    /// ```
    pub fn strip(name: &str) -> (Option<CookiePrefix>, &str) {
        for prefix in [CookiePrefix::Host, CookiePrefix::Secure] {
            if let Some(rest) = name.strip_prefix(prefix.as_str()) {
                return (Some(prefix), rest);
            }
        }
        (None, name)
    }
}

impl fmt::Display for CookiePrefix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::CookiePrefix;

    #[test]
    fn strip() {
        let cases = [
            ("__Host-id", (Some(CookiePrefix::Host), "id")),
            ("__Secure-id", (Some(CookiePrefix::Secure), "id")),
            ("__Host-", (Some(CookiePrefix::Host), "")),
            ("__Host-__Secure-id", (Some(CookiePrefix::Host), "__Secure-id")),
            ("__host-id", (None, "__host-id")),
            ("__SECURE-id", (None, "__SECURE-id")),
            ("__Host", (None, "__Host")),
            ("id", (None, "id")),
            ("", (None, "")),
        ];
        for (name, expected) in cases {
            assert_eq!(CookiePrefix::strip(name), expected, "Failed for `{name}`");
        }
    }
}
