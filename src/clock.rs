use std::fmt;
use time::OffsetDateTime;

/// A source of the current time, in milliseconds since the Unix epoch.
///
/// The clock is used to convert between `Max-Age` and an absolute expiry and
/// to decide which cookies have expired.
/// It defaults to [`SystemClock`] and can be replaced through [`ParserOptions`].
///
/// Any `Fn() -> i64` closure is a clock:
///
/// ```rust
/// use cantucci::{CookieParser, ParserOptions};
///
/// let options = ParserOptions::new().clock(|| 0_i64);
/// let parser = CookieParser::with_options(options).unwrap();
/// let cookie = parser.parse_set_cookie("id=5; Max-Age=15").unwrap();
/// assert_eq!(cookie.expires(), Some(15_000));
/// ```
///
/// [`ParserOptions`]: crate::ParserOptions
pub trait Clock: Send + Sync {
    /// Milliseconds elapsed since January 1, 1970 00:00:00 UTC.
    fn now_millis(&self) -> i64;
}

impl<F> Clock for F
where
    F: Fn() -> i64 + Send + Sync,
{
    fn now_millis(&self) -> i64 {
        self()
    }
}

/// The host's wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
        (nanos / 1_000_000) as i64
    }
}

/// A clock frozen at a given instant. Handy in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

impl fmt::Debug for dyn Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clock").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, FixedClock, SystemClock};

    #[test]
    fn closures_are_clocks() {
        let clock = || 42_i64;
        assert_eq!(clock.now_millis(), 42);
        assert_eq!(FixedClock(-7).now_millis(), -7);
    }

    #[test]
    fn system_clock_is_past_2020() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }
}
