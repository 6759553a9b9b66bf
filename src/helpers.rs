//! Utilities to maintain a collection of cookies, e.g. a client-side jar.
use crate::errors::InvalidEncoderError;
use crate::{Cookie, CookieParser, ParserOptions};
use std::collections::HashSet;
use tracing::debug;

/// Drops the cookies that have expired as of `now_millis`.
///
/// A cookie is kept if its expiry lies strictly after `now_millis`.
/// Session cookies (no expiry, or one outside the safe integer range) are kept,
/// unless `remove_session_cookies` is `true`. Order is preserved.
///
/// **Note:** the flag means what its name says. Some JavaScript `removeExpired`
/// helpers drop session cookies when their flag is `false` instead: negate the
/// argument when porting such calls.
///
/// # Example
///
/// ```rust
/// use cantucci::{remove_expired, Cookie};
///
/// let cookies = vec![
///     Cookie::new("stale", "1").set_expires(1_000),
///     Cookie::new("fresh", "2").set_expires(3_000),
///     Cookie::new("session", "3"),
/// ];
/// let kept = remove_expired(cookies.clone(), false, 2_000);
/// assert_eq!(kept, [cookies[1].clone(), cookies[2].clone()]);
///
/// let kept = remove_expired(cookies.clone(), true, 2_000);
/// assert_eq!(kept, [cookies[1].clone()]);
/// ```
pub fn remove_expired<T, I>(
    cookies: I,
    remove_session_cookies: bool,
    now_millis: i64,
) -> Vec<Cookie<T>>
where
    I: IntoIterator<Item = Cookie<T>>,
{
    cookies
        .into_iter()
        .filter(|cookie| {
            let keep = if cookie.is_session() {
                !remove_session_cookies
            } else {
                !cookie.is_expired_at(now_millis)
            };
            if !keep {
                debug!(cookie = cookie.name.as_str(), "Removing an expired cookie");
            }
            keep
        })
        .collect()
}

/// Combines two lists of cookies, by name.
///
/// Every cookie in `existing` whose name appears in `incoming` is dropped;
/// the survivors come first, followed by all of `incoming` in its original order.
/// Duplicates within `incoming` are all kept.
///
/// # Example
///
/// ```rust
/// use cantucci::{merge, Cookie};
///
/// let existing = vec![Cookie::new("a", "1"), Cookie::new("b", "2")];
/// let incoming = vec![Cookie::new("a", "3"), Cookie::new("c", "4")];
/// let merged = merge(existing, incoming);
/// let pairs: Vec<_> = merged.iter().map(|c| (c.name(), c.value().as_str())).collect();
/// assert_eq!(pairs, [("b", "2"), ("a", "3"), ("c", "4")]);
/// ```
pub fn merge<T, E, I>(existing: E, incoming: I) -> Vec<Cookie<T>>
where
    E: IntoIterator<Item = Cookie<T>>,
    I: IntoIterator<Item = Cookie<T>>,
{
    let incoming: Vec<_> = incoming.into_iter().collect();
    let mut merged: Vec<_> = {
        let replaced: HashSet<&str> = incoming.iter().map(|c| c.name.as_str()).collect();
        existing
            .into_iter()
            .filter(|c| !replaced.contains(c.name.as_str()))
            .collect()
    };
    merged.extend(incoming);
    merged
}

impl<T> CookieParser<T> {
    /// [`remove_expired`], using the parser's clock as the current time.
    pub fn remove_expired<I>(&self, cookies: I, remove_session_cookies: bool) -> Vec<Cookie<T>>
    where
        I: IntoIterator<Item = Cookie<T>>,
    {
        remove_expired(
            cookies,
            remove_session_cookies,
            self.defaults.encoder_options.now(),
        )
    }

    /// Like [`CookieParser::remove_expired`], with `options` applied for this call.
    ///
    /// Only the clock is relevant here.
    pub fn remove_expired_with<I>(
        &self,
        cookies: I,
        remove_session_cookies: bool,
        options: &ParserOptions<T>,
    ) -> Result<Vec<Cookie<T>>, InvalidEncoderError>
    where
        I: IntoIterator<Item = Cookie<T>>,
    {
        let options = self.resolve(options)?;
        Ok(remove_expired(
            cookies,
            remove_session_cookies,
            options.encoder_options.now(),
        ))
    }

    /// See [`merge`].
    pub fn merge<E, I>(&self, existing: E, incoming: I) -> Vec<Cookie<T>>
    where
        E: IntoIterator<Item = Cookie<T>>,
        I: IntoIterator<Item = Cookie<T>>,
    {
        merge(existing, incoming)
    }
}

#[cfg(test)]
mod tests {
    use super::{merge, remove_expired};
    use crate::{Cookie, CookieParser, FixedClock, ParserOptions};

    fn names<T>(cookies: &[Cookie<T>]) -> Vec<&str> {
        cookies.iter().map(|c| c.name()).collect()
    }

    #[test]
    fn remove_expired_cookies() {
        let jar = || {
            vec![
                Cookie::new("past", "1").set_expires(999),
                Cookie::new("now", "2").set_expires(1_000),
                Cookie::new("future", "3").set_expires(1_001),
                Cookie::new("session", "4"),
            ]
        };
        let cases = [
            (false, vec!["future", "session"]),
            (true, vec!["future"]),
        ];
        for (remove_session_cookies, expected) in cases {
            let kept = remove_expired(jar(), remove_session_cookies, 1_000);
            assert_eq!(
                names(&kept),
                expected,
                "Failed for remove_session_cookies={remove_session_cookies}"
            );
        }
    }

    #[test]
    fn remove_expired_is_idempotent() {
        let jar = vec![
            Cookie::new("a", "1").set_expires(10),
            Cookie::new("b", "2").set_expires(30),
            Cookie::new("c", "3"),
        ];
        let once = remove_expired(jar, false, 20);
        let twice = remove_expired(once.clone(), false, 20);
        assert_eq!(once, twice);
    }

    #[test]
    fn remove_expired_uses_the_parser_clock() {
        let parser = CookieParser::with_options(ParserOptions::new().clock(FixedClock(20))).unwrap();
        let jar = vec![
            Cookie::new("a", "1").set_expires(10),
            Cookie::new("b", "2").set_expires(30),
        ];
        assert_eq!(names(&parser.remove_expired(jar.clone(), false)), ["b"]);

        let kept = parser
            .remove_expired_with(jar, false, &ParserOptions::new().clock(FixedClock(0)))
            .unwrap();
        assert_eq!(names(&kept), ["a", "b"]);
    }

    #[test]
    fn merge_by_name() {
        let cases = [
            (vec![], vec![], vec![]),
            (vec![("a", "1")], vec![], vec![("a", "1")]),
            (vec![], vec![("a", "1")], vec![("a", "1")]),
            (
                vec![("a", "1"), ("b", "2")],
                vec![("a", "3")],
                vec![("b", "2"), ("a", "3")],
            ),
            (
                vec![("a", "1"), ("a", "2"), ("b", "3")],
                vec![("a", "4")],
                vec![("b", "3"), ("a", "4")],
            ),
            (
                vec![("b", "1")],
                vec![("a", "2"), ("a", "3")],
                vec![("b", "1"), ("a", "2"), ("a", "3")],
            ),
        ];
        for (existing, incoming, expected) in cases {
            let existing: Vec<Cookie> = existing.into_iter().map(Cookie::from).collect();
            let incoming: Vec<Cookie> = incoming.into_iter().map(Cookie::from).collect();
            let expected: Vec<Cookie> = expected.into_iter().map(Cookie::from).collect();
            assert_eq!(
                merge(existing.clone(), incoming.clone()),
                expected,
                "Failed for {existing:?} <- {incoming:?}"
            );
        }
    }

    #[test]
    fn merge_is_idempotent() {
        let existing = vec![Cookie::new("a", "1"), Cookie::new("b", "2")];
        let incoming = vec![Cookie::new("b", "3")];
        let once = merge(existing, incoming.clone());
        let twice = merge(once.clone(), incoming);
        assert_eq!(once, twice);
    }
}
