//! HTTP request message object.

use std::fmt;

use bytes::Bytes;
use hashbrown::HashMap;
use http::Method;
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::stream::{MemoryStream, Stream};

use super::headers::{join_values, standardize_header_key, HeaderValue, IntoHeaderValues};
use super::uri::Uri;

/// Option bag a request is built from, passed through opaquely to the
/// transport. Recognized keys: `header` (ordered raw lines), `content`
/// (initial body bytes), `method` (defaults to GET) and `timeout`
/// (fractional seconds, advisory to the transport).
#[derive(Debug, Clone, Default, Serialize)]
pub struct RequestOptions {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub header: Vec<String>,
    #[serde(
        serialize_with = "serialize_content",
        skip_serializing_if = "Bytes::is_empty"
    )]
    pub content: Bytes,
    #[serde(
        serialize_with = "serialize_method",
        skip_serializing_if = "Option::is_none"
    )]
    pub method: Option<Method>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<f64>,
}

impl RequestOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one raw `Key: value` header line.
    #[must_use]
    pub fn header_line(mut self, line: impl Into<String>) -> Self {
        self.header.push(line.into());
        self
    }

    /// Append a CRLF-joined block of header lines.
    #[must_use]
    pub fn header_block(mut self, block: &str) -> Self {
        for line in block.trim().split("\r\n") {
            if !line.is_empty() {
                self.header.push(line.to_string());
            }
        }
        self
    }

    /// Initial body bytes.
    #[must_use]
    pub fn content(mut self, content: impl Into<Bytes>) -> Self {
        self.content = content.into();
        self
    }

    /// HTTP method. GET when never set.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Advisory timeout in fractional seconds.
    #[must_use]
    pub fn timeout(mut self, seconds: f64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    /// JSON rendering used for diagnostic logging.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

fn serialize_content<S: Serializer>(content: &Bytes, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(content))
}

fn serialize_method<S: Serializer>(
    method: &Option<Method>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match method {
        Some(method) => serializer.serialize_str(method.as_str()),
        None => serializer.serialize_none(),
    }
}

/// HTTP request message.
///
/// Headers live twice: as an ordered list of raw `Key: value` lines, and as
/// a case-insensitive index from normalized name to the ordered value list.
/// Every mutation keeps both in sync. All `with_*` mutators consume `self`
/// and return the changed value, leaving any clone the caller kept
/// untouched.
#[derive(Debug)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: Vec<String>,
    headers_by_key: HashMap<String, Vec<HeaderValue>>,
    protocol: String,
    protocol_version: String,
    preserve_host: bool,
    request_target: String,
    body: Box<dyn Stream>,
    duration_ms: u64,
    options: RequestOptions,
}

impl Request {
    /// Build a request for `uri` from an option bag.
    ///
    /// The protocol name is the uppercased URI scheme; the version defaults
    /// to `1.1`. Body and headers come from the options.
    #[must_use]
    pub fn new(uri: Uri, options: RequestOptions) -> Self {
        let headers = options.header.clone();

        let mut headers_by_key: HashMap<String, Vec<HeaderValue>> = HashMap::new();
        for line in &headers {
            if let Some((key, value)) = line.split_once(": ") {
                headers_by_key
                    .entry(standardize_header_key(key))
                    .or_default()
                    .push(HeaderValue::Str(value.to_string()));
            }
        }

        Self {
            method: options.method.clone().unwrap_or(Method::GET),
            protocol: uri.scheme().to_uppercase(),
            protocol_version: "1.1".to_string(),
            preserve_host: false,
            request_target: format!("{}?{}#{}", uri.path(), uri.query(), uri.fragment()),
            body: Box::new(MemoryStream::new(options.content.to_vec())),
            duration_ms: 0,
            uri,
            headers,
            headers_by_key,
            options,
        }
    }

    /// Target URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Protocol name derived from the URI scheme, e.g. `HTTPS`.
    #[must_use]
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// HTTP version, `1.1` unless overridden.
    #[must_use]
    pub fn protocol_version(&self) -> &str {
        &self.protocol_version
    }

    /// `path?query#fragment` of the target URI.
    #[must_use]
    pub fn request_target(&self) -> &str {
        &self.request_target
    }

    /// The option bag this request was built from.
    #[must_use]
    pub fn context(&self) -> &RequestOptions {
        &self.options
    }

    /// Whether the last `with_uri` asked to keep the original Host header.
    #[must_use]
    pub fn preserve_host(&self) -> bool {
        self.preserve_host
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

    /// Ordered raw header lines.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// True when a header with this name exists, judged case-insensitively.
    #[must_use]
    pub fn has_header(&self, name: &str) -> bool {
        self.headers_by_key
            .contains_key(&standardize_header_key(name))
    }

    /// All raw-line values matching `name`, case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Vec<String> {
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

    /// Matching values joined with `,`.
    #[must_use]
    pub fn header_line(&self, name: &str) -> String {
        self.header(name).join(",")
    }

    /// Milliseconds the last execution of this request took.
    #[must_use]
    pub fn duration_in_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Record the elapsed wall time of an execution, rounded to the
    /// nearest millisecond.
    pub fn set_duration(&mut self, ms: f64) {
        self.duration_ms = ms.round().max(0.0) as u64;
    }

    /// New value with `name` set to `value`, replacing any existing values
    /// for that name.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when the name is blank.
    pub fn with_header<V: IntoHeaderValues>(mut self, name: &str, value: V) -> Result<Self> {
        self.apply_header(name, value.into_values(), true)?;
        Ok(self)
    }

    /// New value with `value` appended to any existing values for `name`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when the name is blank.
    pub fn with_added_header<V: IntoHeaderValues>(mut self, name: &str, value: V) -> Result<Self> {
        self.apply_header(name, value.into_values(), false)?;
        Ok(self)
    }

    /// New value without any header named `name`.
    #[must_use]
    pub fn without_header(mut self, name: &str) -> Self {
        let normalized = standardize_header_key(name);
        self.headers_by_key.remove(&normalized);

        let prefix = format!("{normalized}: ");
        self.headers.retain(|line| !line.starts_with(&prefix));

        self
    }

    /// New value with a replaced body; a `Content-length` header for the new
    /// body size is appended.
    pub fn with_body(mut self, body: Box<dyn Stream>) -> Result<Self> {
        let size = body.size().unwrap_or(0);
        self.body = body;
        self.apply_header("Content-length", vec![HeaderValue::Int(size as i64)], false)?;

        Ok(self)
    }

    /// New value with a different method.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// New value with a different HTTP version.
    #[must_use]
    pub fn with_protocol_version(mut self, version: impl Into<String>) -> Self {
        self.protocol_version = version.into();
        self
    }

    /// New value with an explicit request target.
    #[must_use]
    pub fn with_request_target(mut self, target: impl Into<String>) -> Self {
        self.request_target = target.into();
        self
    }

    /// New value aimed at a different URI.
    #[must_use]
    pub fn with_uri(mut self, uri: Uri, preserve_host: bool) -> Self {
        self.preserve_host = preserve_host;
        self.uri = uri;
        self
    }

    /// Replace-semantics header mutation on a borrowed request; used by the
    /// client when it completes the message before dispatch.
    pub(crate) fn set_header(&mut self, name: &str, values: Vec<HeaderValue>) -> Result<()> {
        self.apply_header(name, values, true)
    }

    fn apply_header(&mut self, name: &str, values: Vec<HeaderValue>, replace: bool) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::InvalidArgument(format!(
                "Invalid header name: '{name}'"
            )));
        }

        let normalized = standardize_header_key(name);

        if replace {
            let prefix = format!("{normalized}: ");
            self.headers.retain(|line| !line.starts_with(&prefix));
            self.headers_by_key.insert(normalized.clone(), values.clone());
        } else {
            self.headers_by_key
                .entry(normalized.clone())
                .or_default()
                .extend(values.iter().cloned());
        }

        self.headers
            .push(format!("{normalized}: {}", join_values(&values)));

        Ok(())
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.uri)?;
        if self.duration_ms > 0 {
            write!(f, " took {}ms", self.duration_ms)?;
        }
        Ok(())
    }
}
