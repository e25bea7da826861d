//! Header name normalization and typed header values.

use std::fmt;

/// Canonical form of a header name: lowercase, then each hyphen-separated
/// word capitalized (`content-type` -> `Content-Type`). All lookups and
/// collision checks happen on this form.
#[must_use]
pub fn standardize_header_key(key: &str) -> String {
    let lower = key.to_lowercase();
    let mut out = String::with_capacity(lower.len());
    let mut upper_next = true;

    for ch in lower.chars() {
        if upper_next {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        upper_next = ch == '-';
    }

    out
}

/// A single header value: a string or an integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    Str(String),
    Int(i64),
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Str(value) => f.write_str(value),
            HeaderValue::Int(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::Str(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::Str(value)
    }
}

impl From<i64> for HeaderValue {
    fn from(value: i64) -> Self {
        HeaderValue::Int(value)
    }
}

impl From<u64> for HeaderValue {
    fn from(value: u64) -> Self {
        HeaderValue::Int(value as i64)
    }
}

impl From<usize> for HeaderValue {
    fn from(value: usize) -> Self {
        HeaderValue::Int(value as i64)
    }
}

/// One or several header values, accepted wherever a header is set.
pub trait IntoHeaderValues {
    fn into_values(self) -> Vec<HeaderValue>;
}

impl IntoHeaderValues for HeaderValue {
    fn into_values(self) -> Vec<HeaderValue> {
        vec![self]
    }
}

impl IntoHeaderValues for &str {
    fn into_values(self) -> Vec<HeaderValue> {
        vec![self.into()]
    }
}

impl IntoHeaderValues for String {
    fn into_values(self) -> Vec<HeaderValue> {
        vec![self.into()]
    }
}

impl IntoHeaderValues for i64 {
    fn into_values(self) -> Vec<HeaderValue> {
        vec![self.into()]
    }
}

impl IntoHeaderValues for u64 {
    fn into_values(self) -> Vec<HeaderValue> {
        vec![self.into()]
    }
}

impl IntoHeaderValues for usize {
    fn into_values(self) -> Vec<HeaderValue> {
        vec![self.into()]
    }
}

impl IntoHeaderValues for Vec<HeaderValue> {
    fn into_values(self) -> Vec<HeaderValue> {
        self
    }
}

impl IntoHeaderValues for Vec<&str> {
    fn into_values(self) -> Vec<HeaderValue> {
        self.into_iter().map(HeaderValue::from).collect()
    }
}

impl IntoHeaderValues for Vec<String> {
    fn into_values(self) -> Vec<HeaderValue> {
        self.into_iter().map(HeaderValue::from).collect()
    }
}

/// Join values with `,` the way a replaced raw header line renders them.
#[must_use]
pub(crate) fn join_values(values: &[HeaderValue]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
