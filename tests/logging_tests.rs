use plainhttp::prelude::*;

#[test]
fn test_interpolate_replaces_placeholders() {
    let context = [("a", "x".to_string()), ("b", "y".to_string())];

    assert_eq!(interpolate("{a}-{b}", &context), "x-y");
    assert_eq!(interpolate("{a} and {a}", &context), "x and x");
}

#[test]
fn test_interpolate_leaves_unknown_keys() {
    let context = [("host", "example.com".to_string())];

    assert_eq!(
        interpolate("Look up for '{host}' at {missing}", &context),
        "Look up for 'example.com' at {missing}"
    );
}

#[test]
fn test_mask_secrets_hides_password_parameters() {
    assert_eq!(
        mask_secrets("http://h/?password=s3cret&user=me"),
        "http://h/?password=*private*&user=me"
    );
    assert_eq!(
        mask_secrets("pwd=topsecret&x=1"),
        "pwd=*private*&x=1"
    );
    assert_eq!(
        mask_secrets("PassPhrase=abc&other=2"),
        "PassPhrase=*private*&other=2"
    );
}

#[test]
fn test_mask_secrets_ignores_innocent_parameters() {
    assert_eq!(mask_secrets("user=me&q=hello"), "user=me&q=hello");
}

#[test]
fn test_standardize_header_key() {
    assert_eq!(standardize_header_key("content-type"), "Content-Type");
    assert_eq!(standardize_header_key("CONTENT-LENGTH"), "Content-Length");
    assert_eq!(standardize_header_key("x-b3-traceid"), "X-B3-Traceid");
    assert_eq!(standardize_header_key("etag"), "Etag");
}

#[test]
fn test_cookie_jar_keeps_insertion_order() {
    let mut jar = CookieJar::new();
    jar.insert("first", "1");
    jar.insert("second", "2");
    jar.insert("first", "one");

    assert_eq!(jar.header_value(), "first=one; second=2");
    assert_eq!(jar.len(), 2);
    assert_eq!(jar.get("first"), Some("one"));
}
