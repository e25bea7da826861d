//! HTTP response message object.

use hashbrown::HashMap;

use crate::error::{Error, Result};
use crate::stream::Stream;

use super::headers::standardize_header_key;

/// Maximum number of body bytes scanned by [`Response::page_title`].
const TITLE_SCAN_LIMIT: usize = 10_000;

/// HTTP response message.
///
/// Built from the ordered raw header lines of a completed exchange; line 0
/// is the status line `PROTOCOL/VERSION CODE REASON`. The derived index is
/// last-write-wins per normalized key, unlike the request's additive
/// behavior; separator-less lines are stored verbatim, keyed by their
/// position.
#[derive(Debug)]
pub struct Response {
    headers: Vec<String>,
    headers_by_key: HashMap<String, String>,
    code: u16,
    reason: String,
    protocol: String,
    protocol_version: String,
    body: Box<dyn Stream>,
}

impl Response {
    /// Parse raw header lines into a response.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedResponse`] when the header list is empty, the
    /// status line has fewer than two space-separated tokens, or the status
    /// code is not numeric.
    pub fn parse(headers: Vec<String>, body: Box<dyn Stream>) -> Result<Self> {
        if headers.is_empty() {
            return Err(Error::MalformedResponse("no header lines".to_string()));
        }

        let mut headers_by_key = HashMap::new();
        let mut code = 0u16;
        let mut reason = String::new();
        let mut protocol = String::from("HTTPS");
        let mut protocol_version = String::new();

        for (i, line) in headers.iter().enumerate() {
            match line.split_once(": ") {
                Some((key, value)) => {
                    // later same-key lines replace earlier ones
                    headers_by_key.insert(standardize_header_key(key), value.to_string());
                }
                None => {
                    headers_by_key.insert(i.to_string(), line.clone());

                    if i == 0 {
                        let words: Vec<&str> = line.split(' ').collect();
                        if words.len() < 2 {
                            return Err(Error::MalformedResponse(format!(
                                "Incomplete first response header: {line}"
                            )));
                        }

                        code = words[1].parse().map_err(|_| {
                            Error::MalformedResponse(format!("Non-numeric status code: {}", words[1]))
                        })?;
                        reason = words[2..].join(" ");

                        match words[0].split_once('/') {
                            Some((name, version)) => {
                                protocol = name.to_string();
                                protocol_version = version.to_string();
                            }
                            None => protocol = words[0].to_string(),
                        }
                    }
                }
            }
        }

        Ok(Self {
            headers,
            headers_by_key,
            code,
            reason,
            protocol,
            protocol_version,
            body,
        })
    }

    /// Degraded response for failed exchanges: status 0, no reason, no
    /// headers. Callers must check the status code before trusting it.
    #[must_use]
    pub fn degraded(body: Box<dyn Stream>) -> Self {
        Self {
            headers: Vec::new(),
            headers_by_key: HashMap::new(),
            code: 0,
            reason: String::new(),
            protocol: String::from("HTTPS"),
            protocol_version: String::new(),
            body,
        }
    }

    /// Status code; 0 for degraded responses.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.code
    }

    /// Reason phrase of the status line.
    #[must_use]
    pub fn reason_phrase(&self) -> &str {
        &self.reason
    }

    /// Protocol name from the status line, e.g. `HTTP`.
    #[must_use]
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// HTTP version from the status line.
    #[must_use]
    pub fn protocol_version(&self) -> &str {
        &self.protocol_version
    }

    /// Ordered raw header lines, status line included.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Indexed value for a header key, ignoring case. Empty when absent.
    #[must_use]
    pub fn header(&self, key: &str) -> String {
        self.headers_by_key
            .get(&standardize_header_key(key))
            .cloned()
            .unwrap_or_default()
    }

    /// All raw-line values matching `name`, case-insensitively.
    #[must_use]
    pub fn header_all(&self, name: &str) -> Vec<String> {
        let search = format!("{}: ", name.to_lowercase());

        self.headers
            .iter()
            .filter_map(|line| {
                line.to_lowercase()
                    .starts_with(&search)
                    .then(|| line[search.len()..].to_string())
            })
            .collect()
    }

    /// Matching values joined with `, `.
    #[must_use]
    pub fn header_line(&self, name: &str) -> String {
        self.header_all(name).join(", ")
    }

    /// True when a header with this key is present, judged
    /// case-insensitively.
    #[must_use]
    pub fn has_header(&self, name: &str) -> bool {
        self.headers_by_key
            .contains_key(&standardize_header_key(name))
    }

    /// Body size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.body.size().unwrap_or(0)
    }

    /// Body stream.
    #[must_use]
    pub fn body(&self) -> &dyn Stream {
        self.body.as_ref()
    }

    /// Mutable body stream.
    pub fn body_mut(&mut self) -> &mut dyn Stream {
        self.body.as_mut()
    }

    /// Decode the JSON body.
    ///
    /// # Errors
    ///
    /// [`Error::UnexpectedContent`] when a Content-type header is present
    /// without a `JSON` substring (case-insensitive) or the body is empty;
    /// [`Error::MalformedJson`] when the body does not parse.
    pub fn json_decode(&self) -> Result<serde_json::Value> {
        let content_type = self.header("Content-type");
        if !content_type.is_empty() && !content_type.to_uppercase().contains("JSON") {
            return Err(Error::UnexpectedContent(format!(
                "Wrong response type (not JSON): {content_type}"
            )));
        }

        let text = self.body.text();
        if text.is_empty() {
            return Err(Error::UnexpectedContent("Empty response body".to_string()));
        }

        serde_json::from_str(&text).map_err(|error| Error::MalformedJson(error.to_string()))
    }

    /// Title of an HTML or XML page, or an empty string when not found.
    ///
    /// Best-effort: scans the first 10 000 bytes line by line for the first
    /// line containing `<title`, strips markup and decodes entities. Not a
    /// full HTML parse.
    #[must_use]
    pub fn page_title(&self) -> String {
        let text = self.body.text();

        let mut end = TITLE_SCAN_LIMIT.min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }

        for line in text[..end].split('\n') {
            if line.to_lowercase().contains("<title") {
                return decode_entities(strip_tags(line).trim());
            }
        }

        String::new()
    }

    /// New value with a different status line.
    #[must_use]
    pub fn with_status(mut self, code: u16, reason: impl Into<String>) -> Self {
        self.code = code;
        self.reason = reason.into();
        self
    }

    /// New value with `key` set in the index; raw lines are left as
    /// received.
    #[must_use]
    pub fn with_header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers_by_key
            .insert(standardize_header_key(key), value.into());
        self
    }

    /// New value with `key` set in the index. The response index is
    /// last-write-wins, so this behaves like [`Response::with_header`].
    #[must_use]
    pub fn with_added_header(self, key: &str, value: impl Into<String>) -> Self {
        self.with_header(key, value)
    }

    /// New value without `key` in the index.
    #[must_use]
    pub fn without_header(mut self, key: &str) -> Self {
        self.headers_by_key.remove(&standardize_header_key(key));
        self
    }

    /// New value with a replaced body.
    #[must_use]
    pub fn with_body(mut self, body: Box<dyn Stream>) -> Self {
        self.body = body;
        self
    }

    /// New value with a different HTTP version.
    #[must_use]
    pub fn with_protocol_version(mut self, version: impl Into<String>) -> Self {
        self.protocol_version = version.into();
        self
    }
}

/// Drop every `<...>` markup segment.
fn strip_tags(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_tag = false;

    for ch in line.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }

    out
}

/// Decode the common named entities plus numeric `&#NNN;` / `&#xHH;` forms.
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        match tail.find(';').filter(|end| *end <= 10) {
            Some(end) => {
                let entity = &tail[1..end];
                match decode_entity(entity) {
                    Some(decoded) => out.push_str(&decoded),
                    None => out.push_str(&tail[..=end]),
                }
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);

    out
}

fn decode_entity(entity: &str) -> Option<String> {
    let named = match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "eacute" => Some('é'),
        "egrave" => Some('è'),
        "agrave" => Some('à'),
        "ccedil" => Some('ç'),
        _ => None,
    };
    if let Some(ch) = named {
        return Some(ch.to_string());
    }

    let code = entity.strip_prefix('#')?;
    let value = match code.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => code.parse().ok()?,
    };

    char::from_u32(value).map(|ch| ch.to_string())
}
