use percent_encoding::{percent_decode_str, AsciiSet, NON_ALPHANUMERIC};

/// Every byte except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
///
/// This is the set escaped by ECMAScript's `encodeURIComponent`, which keeps
/// encoded values interoperable with browser-side cookie code.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a cookie value.
pub(crate) fn encode(string: &str) -> impl std::fmt::Display + '_ {
    percent_encoding::utf8_percent_encode(string, COMPONENT)
}

/// Percent-decode a cookie value.
///
/// Malformed escapes (e.g. `%zz` or a trailing `%`) are kept verbatim.
/// `None` is returned only when the decoded bytes are not valid UTF-8.
pub(crate) fn decode(string: &str) -> Option<String> {
    percent_decode_str(string)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::{decode, encode};

    #[test]
    fn encode_component() {
        let cases = [
            ("", ""),
            ("value", "value"),
            ("%&$", "%25%26%24"),
            ("a value", "a%20value"),
            ("-_.!~*'()", "-_.!~*'()"),
            ("a=b;c,d", "a%3Db%3Bc%2Cd"),
            ("\"quoted\"", "%22quoted%22"),
            ("ü", "%C3%BC"),
        ];
        for (input, expected) in cases {
            assert_eq!(encode(input).to_string(), expected, "Failed for `{input}`");
        }
    }

    #[test]
    fn decode_component() {
        let cases = [
            ("", Some("")),
            ("%25%26%24", Some("%&$")),
            ("a%20value", Some("a value")),
            ("a+b", Some("a+b")),
            ("%C3%BC", Some("ü")),
            // Malformed escapes pass through untouched.
            ("%zz", Some("%zz")),
            ("100%", Some("100%")),
            ("%%41", Some("%A")),
            // Well-formed escapes that don't decode to UTF-8.
            ("%F1%F2%F3%C0%C1%C2", None),
            ("%FF", None),
        ];
        for (input, expected) in cases {
            assert_eq!(
                decode(input).as_deref(),
                expected,
                "Failed for `{input}`"
            );
        }
    }
}
