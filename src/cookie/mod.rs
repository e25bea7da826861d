//! Session cookie jar and `Set-Cookie` line parsing.
//!
//! Cookies are carried as raw key/value couples, never URL-decoded or
//! re-encoded. Attributes (`Path`, `HttpOnly`, ...) are discarded at
//! extraction time; only the leading `key=value` couple survives.

/// Case-insensitive prefix identifying a cookie-bearing response header.
const SET_COOKIE_PREFIX: &str = "set-cookie: ";

/// In-memory cookie store scoped to one client session.
///
/// Couples keep their insertion order; storing an existing key again
/// overwrites its value in place (last write wins).
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    couples: Vec<(String, String)>,
}

impl CookieJar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct cookies held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.couples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.couples.is_empty()
    }

    /// Value stored for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.couples
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Store a couple; an existing key keeps its position and gets the new
    /// value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        match self.couples.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.couples.push((key, value)),
        }
    }

    /// Iterate couples in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.couples
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render the jar as a `Cookie` header value: `k1=v1; k2=v2; ...` in
    /// insertion order.
    #[must_use]
    pub fn header_value(&self) -> String {
        self.couples
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Payload of a `Set-Cookie` header line, when `line` is one
/// (case-insensitive match on the key).
#[must_use]
pub(crate) fn set_cookie_payload(line: &str) -> Option<&str> {
    line.to_lowercase()
        .starts_with(SET_COOKIE_PREFIX)
        .then(|| &line[SET_COOKIE_PREFIX.len()..])
}

/// Split a `Set-Cookie` payload into its leading key/value couple,
/// discarding attributes after the first `; `. `None` when the couple has
/// no `=`.
#[must_use]
pub(crate) fn split_couple(payload: &str) -> Option<(&str, &str)> {
    let couple = payload
        .split_once("; ")
        .map_or(payload, |(head, _)| head);

    couple.split_once('=')
}

/// The couple part of a `Set-Cookie` payload, with attributes dropped.
/// Used for warning messages when the couple is malformed.
#[must_use]
pub(crate) fn couple_part(payload: &str) -> &str {
    payload.split_once("; ").map_or(payload, |(head, _)| head)
}
