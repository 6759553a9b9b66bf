use cantucci::errors::CookieError;
use cantucci::{
    Cookie, CookieParser, Encoder, EncoderOperation, EncoderOptions, ParserOptions, PartialEncoder,
};
use serde_json::{json, Value};

fn text(input: &str, _: &EncoderOptions) -> Option<String> {
    Some(input.to_owned())
}

fn optional_text(input: Option<&str>, _: &EncoderOptions) -> Option<String> {
    input.map(str::to_owned)
}

fn json_encoder() -> PartialEncoder<Value> {
    PartialEncoder::<Value>::new()
        .serialize_name(text)
        .parse_name(text)
        .serialize_value(|value: &Value, _| serde_json::to_string(value).ok())
        .parse_value(|value, _| serde_json::from_str(value).ok())
        .serialize_domain(optional_text)
        .parse_domain(text)
        .serialize_path(optional_text)
        .parse_path(text)
        .serialize_expires(|expires, _| expires.map(|e| e.to_string()))
        .parse_expires(|expires, _| expires.parse().ok())
        .serialize_max_age(|_, _| None)
        .parse_max_age(|_, _| None)
}

fn json_parser() -> CookieParser<Value> {
    let encoder = Encoder::try_from(json_encoder()).unwrap();
    CookieParser::with_encoder(encoder, ParserOptions::new()).unwrap()
}

#[test]
fn json_values() {
    let parser = json_parser();

    let cookie = parser
        .parse_set_cookie(r#"prefs={"theme":"dark","size":3}; Expires=15000; Max-Age=60"#)
        .unwrap();
    assert_eq!(cookie.name(), "prefs");
    assert_eq!(cookie.value(), &json!({"theme": "dark", "size": 3}));
    assert_eq!(cookie.expires(), Some(15_000));

    let header = parser.serialize_set_cookie(&cookie);
    assert_eq!(header, r#"prefs={"size":3,"theme":"dark"}; Expires=15000; Path=/"#);
}

#[test]
fn undecodable_values_fall_back_to_default() {
    let parser = json_parser();
    let cookie = parser.parse_set_cookie("prefs={not json").unwrap();
    assert_eq!(cookie.value(), &Value::Null);

    let cookies = parser.parse_cookie("a=1; b=[true]; c=nope");
    let values: Vec<_> = cookies.iter().map(|c| c.value().clone()).collect();
    assert_eq!(values, [json!(1), json!([true]), Value::Null]);
}

#[test]
fn incomplete_encoders_are_rejected() {
    let partial = PartialEncoder::<Value>::new()
        .serialize_name(text)
        .parse_name(text)
        .serialize_value(|value: &Value, _| serde_json::to_string(value).ok());
    let err = Encoder::try_from(partial.clone()).unwrap_err();
    assert_eq!(err.operation(), EncoderOperation::ParseValue);
    assert_eq!(
        err.to_string(),
        "Invalid cookie encoder: missing the `parse_value` operation"
    );

    // Per-call overrides are validated too.
    let parser = json_parser();
    let outcome = parser.parse_set_cookie_with("a=1", &ParserOptions::new().encoder(partial));
    assert!(matches!(outcome, Err(CookieError::InvalidEncoder(_))));
}

#[test]
fn partial_overrides_on_string_cookies() {
    let upper = PartialEncoder::<String>::new()
        .serialize_name(|name, _| Some(name.to_uppercase()))
        .merge_over(Encoder::default());
    let parser = CookieParser::new();

    let header = parser
        .serialize_set_cookie_with(
            &Cookie::new("id", "a b"),
            &ParserOptions::new().encoder(upper),
        )
        .unwrap();
    assert_eq!(header, "ID=a%20b; Path=/");
    // The parser defaults are untouched.
    assert_eq!(parser.serialize_set_cookie(&Cookie::new("id", "a b")), "id=a%20b; Path=/");
}

#[test]
fn absent_name_is_an_empty_name() {
    let strict = PartialEncoder::<String>::new()
        .serialize_name(|_, _| None)
        .merge_over(Encoder::default());
    let parser =
        CookieParser::with_options(ParserOptions::new().encoder(strict).strict(true)).unwrap();

    assert!(parser.serialize_cookie(&[Cookie::new("id", "5")]).is_err());
    // `Set-Cookie` serialization doesn't validate names.
    assert_eq!(parser.serialize_set_cookie(&Cookie::new("id", "5")), "=5; Path=/");
}
