//! The `SameSite` attribute, a draft extension to RFC 6265.

use std::fmt;

/// The `SameSite` cookie attribute.
///
/// A cookie with a `SameSite` attribute is imposed restrictions on when it is
/// sent to the origin server in a cross-site request. If the `SameSite`
/// attribute is "Strict", then the cookie is never sent in cross-site requests.
/// If the `SameSite` attribute is "Lax", the cookie is only sent in cross-site
/// requests with "safe" HTTP methods, i.e, `GET`, `HEAD`, `OPTIONS`, `TRACE`.
///
/// Only two values are recognised. Anything that isn't `Lax` (compared
/// case-insensitively), including a bare `SameSite` flag, is read as `Strict`.
///
/// **Note:** This cookie attribute is an [HTTP draft]! Its meaning and
/// definition are subject to change.
///
/// [HTTP draft]: https://tools.ietf.org/html/draft-west-first-party-cookies-07
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum SameSite {
    /// The "Strict" `SameSite` attribute.
    #[cfg_attr(feature = "serde", serde(alias = "strict"))]
    Strict,
    /// The "Lax" `SameSite` attribute.
    #[cfg_attr(feature = "serde", serde(alias = "lax"))]
    Lax,
}

impl SameSite {
    /// Interprets the value of a `SameSite` attribute.
    ///
    /// `None` stands for the bare flag form (`SameSite` with no `=`).
    ///
    /// # Example
    ///
    /// ```rust
    /// use cantucci::SameSite;
    ///
    /// assert_eq!(SameSite::from_attribute(Some("lAx")), SameSite::Lax);
    /// assert_eq!(SameSite::from_attribute(Some("Strict")), SameSite::Strict);
    /// assert_eq!(SameSite::from_attribute(Some("None")), SameSite::Strict);
    /// assert_eq!(SameSite::from_attribute(None), SameSite::Strict);
    /// ```
    pub fn from_attribute(value: Option<&str>) -> SameSite {
        match value {
            Some(v) if v.eq_ignore_ascii_case("lax") => SameSite::Lax,
            _ => SameSite::Strict,
        }
    }

    /// Returns `true` if `self` is `SameSite::Strict` and `false` otherwise.
    #[inline]
    pub fn is_strict(&self) -> bool {
        match *self {
            SameSite::Strict => true,
            SameSite::Lax => false,
        }
    }

    /// Returns `true` if `self` is `SameSite::Lax` and `false` otherwise.
    #[inline]
    pub fn is_lax(&self) -> bool {
        match *self {
            SameSite::Lax => true,
            SameSite::Strict => false,
        }
    }

    /// Returns the `SameSite` attribute as a string slice.
    pub fn as_str(&self) -> &'static str {
        match *self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::SameSite;

    #[test]
    fn normalization() {
        let cases = [
            (Some("Lax"), SameSite::Lax),
            (Some("LAX"), SameSite::Lax),
            (Some("lax"), SameSite::Lax),
            (Some("strict"), SameSite::Strict),
            (Some("None"), SameSite::Strict),
            (Some(""), SameSite::Strict),
            (Some(" lax"), SameSite::Strict),
            (None, SameSite::Strict),
        ];
        for (input, expected) in cases {
            assert_eq!(
                SameSite::from_attribute(input),
                expected,
                "Failed for {input:?}"
            );
        }
    }
}
