//! Conversions between HTTP date strings and millisecond timestamps.
use crate::is_safe_integer;
use time::format_description::well_known::Rfc3339;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, Time};

// From http://tools.ietf.org/html/rfc2616#section-3.3.1.
static RFC_1123: &[FormatItem<'_>] = format_description!(
    "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
);
static ISO_MINUTES: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]T[hour]:[minute]");
static ISO_DATE: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Formats a timestamp (milliseconds since the Unix epoch) as an RFC 1123 date,
/// e.g. `Thu, 01 Jan 1970 00:00:15 GMT`.
///
/// Sub-second precision is dropped. Returns `None` for instants that can't be
/// represented as a calendar date.
pub(crate) fn format_http_date(millis: i64) -> Option<String> {
    let nanos = i128::from(millis) * 1_000_000;
    let datetime = OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()?;
    datetime.format(&RFC_1123).ok()
}

/// Parses a date string into milliseconds since the Unix epoch.
///
/// ISO 8601 strings are tried first, then the lenient cookie-date algorithm from
/// [RFC 6265 §5.1.1], which covers RFC 1123, RFC 850 and asctime dates.
/// A trailing numeric zone (`+0100`) is honoured, named zones are read as UTC.
///
/// [RFC 6265 §5.1.1]: https://www.rfc-editor.org/rfc/rfc6265#section-5.1.1
pub(crate) fn parse_http_date(input: &str) -> Option<i64> {
    let input = input.trim();
    let datetime = parse_iso8601(input).or_else(|| parse_cookie_date(input))?;
    let millis = datetime.unix_timestamp_nanos().div_euclid(1_000_000);
    i64::try_from(millis).ok().filter(|millis| is_safe_integer(*millis))
}

fn parse_iso8601(input: &str) -> Option<OffsetDateTime> {
    if let Ok(datetime) = OffsetDateTime::parse(input, &Rfc3339) {
        return Some(datetime);
    }
    if let Some(local) = input.strip_suffix(['Z', 'z']) {
        if let Ok(datetime) = PrimitiveDateTime::parse(local, &ISO_MINUTES) {
            return Some(datetime.assume_utc());
        }
    }
    Date::parse(input, &ISO_DATE)
        .ok()
        .map(|date| date.midnight().assume_utc())
}

fn parse_cookie_date(input: &str) -> Option<OffsetDateTime> {
    let (input, offset) = split_numeric_zone(input);

    let mut time = None;
    let mut day = None;
    let mut month = None;
    let mut year = None;
    for token in input.split(is_delimiter).filter(|t| !t.is_empty()) {
        if time.is_none() {
            if let Some(t) = parse_hms(token) {
                time = Some(t);
                continue;
            }
        }
        if day.is_none() {
            if let Some((d, _)) = leading_number(token, 1, 2) {
                day = Some(d);
                continue;
            }
        }
        if month.is_none() {
            if let Some(m) = parse_month(token) {
                month = Some(m);
                continue;
            }
        }
        if year.is_none() {
            if let Some((y, _)) = leading_number(token, 2, 4) {
                year = Some(y);
            }
        }
    }

    let (hour, minute, second) = time?;
    let year = match year? {
        y @ 70..=99 => y + 1900,
        y @ 0..=69 => y + 2000,
        y => y,
    };
    if year < 1601 {
        return None;
    }
    let date = Date::from_calendar_date(year as i32, month?, u8::try_from(day?).ok()?).ok()?;
    let time = Time::from_hms(
        u8::try_from(hour).ok()?,
        u8::try_from(minute).ok()?,
        u8::try_from(second).ok()?,
    )
    .ok()?;
    PrimitiveDateTime::new(date, time)
        .assume_utc()
        .checked_sub(offset)
}

/// RFC 6265 date delimiters: `%x09 / %x20-2F / %x3B-40 / %x5B-60 / %x7B-7E`.
fn is_delimiter(c: char) -> bool {
    matches!(c, '\t' | '\x20'..='\x2f' | '\x3b'..='\x40' | '\x5b'..='\x60' | '\x7b'..='\x7e')
}

/// Splits a trailing `+hhmm`/`-hh` zone off the date.
fn split_numeric_zone(input: &str) -> (&str, Duration) {
    let Some((rest, zone)) = input.rsplit_once(' ') else {
        return (input, Duration::ZERO);
    };
    let (sign, digits) = match zone.as_bytes().first() {
        Some(b'+') => (1, &zone[1..]),
        Some(b'-') => (-1, &zone[1..]),
        _ => return (input, Duration::ZERO),
    };
    if digits.is_empty() || digits.len() > 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return (input, Duration::ZERO);
    }
    // `digits` is at most four ASCII digits, so neither parse can fail.
    let (hours, minutes) = if digits.len() <= 2 {
        (digits.parse::<i64>().unwrap_or(0), 0)
    } else {
        let (h, m) = digits.split_at(digits.len() - 2);
        (h.parse::<i64>().unwrap_or(0), m.parse::<i64>().unwrap_or(0))
    };
    (
        rest,
        Duration::minutes(sign * (hours * 60 + minutes)),
    )
}

/// Matches `min..=max` leading digits that are not followed by another digit.
/// Returns the number and the unconsumed remainder of the token.
fn leading_number(token: &str, min: usize, max: usize) -> Option<(u32, &str)> {
    let len = token.bytes().take_while(u8::is_ascii_digit).count();
    if len < min || len > max {
        return None;
    }
    let (digits, rest) = token.split_at(len);
    Some((digits.parse().ok()?, rest))
}

/// `hms-time = time-field ":" time-field ":" time-field ( non-digit *OCTET )`
fn parse_hms(token: &str) -> Option<(u32, u32, u32)> {
    let (hour, rest) = leading_number(token, 1, 2)?;
    let (minute, rest) = leading_number(rest.strip_prefix(':')?, 1, 2)?;
    let (second, _) = leading_number(rest.strip_prefix(':')?, 1, 2)?;
    Some((hour, minute, second))
}

fn parse_month(token: &str) -> Option<Month> {
    let month = match token.get(..3)?.to_ascii_lowercase().as_str() {
        "jan" => Month::January,
        "feb" => Month::February,
        "mar" => Month::March,
        "apr" => Month::April,
        "may" => Month::May,
        "jun" => Month::June,
        "jul" => Month::July,
        "aug" => Month::August,
        "sep" => Month::September,
        "oct" => Month::October,
        "nov" => Month::November,
        "dec" => Month::December,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::{format_http_date, parse_http_date};

    #[test]
    fn format() {
        let cases = [
            (0, Some("Thu, 01 Jan 1970 00:00:00 GMT")),
            (15_000, Some("Thu, 01 Jan 1970 00:00:15 GMT")),
            (15_999, Some("Thu, 01 Jan 1970 00:00:15 GMT")),
            (-1, Some("Wed, 31 Dec 1969 23:59:59 GMT")),
            (1_445_412_480_000, Some("Wed, 21 Oct 2015 07:28:00 GMT")),
            (i64::MAX, None),
            (i64::MIN, None),
        ];
        for (millis, expected) in cases {
            assert_eq!(
                format_http_date(millis).as_deref(),
                expected,
                "Failed for {millis}"
            );
        }
    }

    #[test]
    fn parse_iso8601() {
        let cases = [
            "1970-01-01T00:01:00.000Z",
            "1970-01-01T00:01:00+00:00",
            "1970-01-01T00:01:00Z",
            "1970-01-01T00:01Z",
            "1970-01-01T01:01:00+01:00",
        ];
        for date in cases {
            assert_eq!(parse_http_date(date), Some(60_000), "Failed for `{date}`");
        }
        assert_eq!(parse_http_date("1970-01-02"), Some(86_400_000));
    }

    #[test]
    fn parse_rfc822_family() {
        let cases = [
            "Thu, 01 Jan 1970 00:01:00 GMT",
            "thu, 01 jan 1970 00:01:00 gmt",
            "Thu, 01 Jan 1970 00:01:00 UT",
            "Thu, 01 Jan 1970 00:01:00 UTC",
            "Thu, 01 Jan 1970 00:01:00 Z",
            "Thu, 01 Jan 1970 00:01:00Z",
            "01 Jan 1970 00:01:00 GMT",
            "01-Jan-1970 00:01:00 GMT",
            "Thursday, 01-Jan-70 00:01:00 GMT",
            "Thu Jan  1 00:01:00 1970",
            "Thu, 01 Jan 1970 00:01:00 +0",
            "Thu, 01 Jan 1970 00:01:00 -0",
            "Thu, 01 Jan 1970 00:01:00 +0000",
            "Thu, 01 Jan 1970 01:01:00 +0100",
            "Wed, 31 Dec 1969 23:01:00 -0100",
            "  Thu, 01 Jan 1970 00:01:00 GMT  ",
        ];
        for date in cases {
            assert_eq!(parse_http_date(date), Some(60_000), "Failed for `{date}`");
        }
    }

    #[test]
    fn two_digit_years() {
        assert_eq!(
            parse_http_date("Sun, 06-Nov-94 08:49:37 GMT"),
            Some(784_111_777_000)
        );
        assert_eq!(
            parse_http_date("Wed, 21-Oct-15 07:28:00 GMT"),
            Some(1_445_412_480_000)
        );
    }

    #[test]
    fn reject_garbage() {
        let cases = [
            "",
            "tomorrow",
            "Thu, 01 Jan 1970",
            "01 Jan 00:01:00",
            "Thu, 32 Jan 1970 00:01:00 GMT",
            "Thu, 30 Feb 1970 00:01:00 GMT",
            "Thu, 01 Foo 1970 00:01:00 GMT",
            "Thu, 01 Jan 1970 24:01:00 GMT",
            "Thu, 01 Jan 1970 00:60:00 GMT",
            "Mon, 01 Jan 1600 00:00:00 GMT",
            // Out of the representable range once the zone is applied.
            "Fri, 31 Dec 9999 23:59:59 -0100",
            "Fri, 31 Dec 9999 23:59:59 -2359",
        ];
        for date in cases {
            assert_eq!(parse_http_date(date), None, "Failed for `{date}`");
        }
    }

    #[test]
    fn format_then_parse() {
        for millis in [0, 15_000, 1_445_412_480_000, -86_400_000] {
            let formatted = format_http_date(millis).unwrap();
            assert_eq!(parse_http_date(&formatted), Some(millis));
        }
    }
}
