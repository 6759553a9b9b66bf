//! A crate to parse and serialize HTTP cookie headers.
//!
//! # Overview
//!
//! `cantucci` converts between the text of `Set-Cookie`/`Cookie` headers and a
//! structured [`Cookie`] record, in both directions.
//!
//! It has support for:
//!
//! - Parsing `Set-Cookie` strings, via [`CookieParser::parse_set_cookie`]
//! - Parsing `Cookie` request headers, via [`CookieParser::parse_cookie`]
//! - Building `Set-Cookie` and `Cookie` strings, via [`CookieParser::serialize_set_cookie`]
//!   and [`CookieParser::serialize_cookie`]
//! - Customizing how every single attribute is encoded and decoded, via [`Encoder`]
//!
//! In particular:
//!
//! - The `__Host-` and `__Secure-` [name prefixes](CookiePrefix) are understood and enforced
//! - `Max-Age` is resolved into an absolute expiry, and it takes precedence over `Expires`
//! - Cookie values are percent-encoded/decoded by default (but you can opt out)
//! - Time is read through an injectable [`Clock`], which makes expiry handling testable
//!
//! Parsing is permissive: a malformed attribute is dropped rather than reported.
//! Errors are only raised in [strict mode](ParserConfig::strict) or when an
//! incomplete [`Encoder`] is supplied.
//!
//! # Non-goals
//!
//! `cantucci` is not a cookie jar: it doesn't match cookies against request URLs and
//! it has no knowledge of public suffixes.
//! It works on header *values*: splitting multiple headers and stripping header names
//! is up to the caller.
//!
//! # Quickstart
//!
//! ## Reading cookies
//!
//! ```rust
//! use cantucci::{CookieParser, CookiePrefix, FixedClock, ParserOptions, SameSite};
//!
//! // Start by creating a `CookieParser`.
//! // Here we pin the clock, to resolve `Max-Age` deterministically.
//! let parser = CookieParser::with_options(ParserOptions::new().clock(FixedClock(0))).unwrap();
//!
//! // `Set-Cookie` strings, as received from a server...
//! let cookie = parser
//!     .parse_set_cookie("__Secure-session=a%20b; Max-Age=60; SameSite=Lax; HttpOnly")
//!     .unwrap();
//! assert_eq!(cookie.name(), "session");
//! assert_eq!(cookie.value(), "a b");
//! assert_eq!(cookie.prefix(), Some(CookiePrefix::Secure));
//! assert_eq!(cookie.secure(), Some(true));
//! assert_eq!(cookie.expires(), Some(60_000));
//! assert_eq!(cookie.same_site(), Some(SameSite::Lax));
//!
//! // ...or `Cookie` headers, as sent by a client.
//! let cookies = parser.parse_cookie("name=first%20value; name2=val; name=another%20value");
//! assert_eq!(cookies.len(), 3);
//! assert_eq!(cookies[0].value(), "first value");
//! assert_eq!(cookies[2].value(), "another value");
//! ```
//!
//! ## Writing cookies
//!
//! ```rust
//! use cantucci::{Cookie, CookieParser, FixedClock, ParserOptions, SameSite};
//!
//! let parser = CookieParser::with_options(ParserOptions::new().clock(FixedClock(0))).unwrap();
//!
//! let cookie = Cookie::new("name", "a value")
//!     .set_expires(15_000)
//!     .set_same_site(SameSite::Strict)
//!     .set_secure(true);
//! assert_eq!(
//!     parser.serialize_set_cookie(&cookie),
//!     "name=a%20value; Expires=Thu, 01 Jan 1970 00:00:15 GMT; Max-Age=15; Path=/; SameSite=Strict; Secure"
//! );
//!
//! let cookies = [Cookie::new("a", "1"), Cookie::new("b", "2")];
//! assert_eq!(parser.serialize_cookie(&cookies).unwrap(), "a=1; b=2");
//! ```
//!
//! ## Keeping cookies around
//!
//! [`merge`] and [`remove_expired`] help maintaining a list of cookies over time.
//!
//! ```rust
//! use cantucci::{merge, remove_expired, Cookie};
//!
//! let stored = vec![Cookie::new("id", "5"), Cookie::new("theme", "dark").set_expires(1_000)];
//! let received = vec![Cookie::new("id", "10")];
//!
//! let cookies = remove_expired(merge(stored, received), false, 2_000);
//! assert_eq!(cookies, [Cookie::new("id", "10")]);
//! ```

#![warn(missing_docs)]

pub mod config;
mod clock;
mod cookie;
mod date;
mod encoder;
mod encoding;
mod error;
mod helpers;
mod parser;
mod prefix;
mod same_site;
mod serializer;

pub use crate::same_site::*;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ParserConfig, ParserOptions};
pub use cookie::{is_safe_integer, Cookie, MAX_SAFE_INTEGER};
pub use encoder::{Encoder, EncoderOperation, EncoderOptions, PartialEncoder};
pub use helpers::{merge, remove_expired};
pub use parser::CookieParser;
pub use prefix::CookiePrefix;
pub use time;

/// Errors that can occur when using `cantucci`.
pub mod errors {
    pub use crate::error::{CookieError, InvalidCookieStringError, InvalidEncoderError};
}
