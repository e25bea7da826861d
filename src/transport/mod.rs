//! Transport capability: the thing that actually performs an HTTP exchange.
//!
//! The client only knows this trait; [`TcpTransport`] is the shipped
//! implementation, a deliberately small plain-HTTP/1.1 exchange over
//! `std::net::TcpStream`. TLS is out of scope, so an `https` URL is refused
//! with a transport error and callers wanting it inject their own
//! implementation.

use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use bytes::Bytes;
use http::Method;
use thiserror::Error;
use url::Url;

use crate::http::RequestOptions;

/// Raw result of a completed exchange: the response header lines (status
/// line first) and the body bytes.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub headers: Vec<String>,
    pub body: Bytes,
}

/// Failure raised by a transport, with an HTTP status code when the
/// exchange got far enough to produce one.
#[derive(Debug, Clone, Error)]
#[error("{reason}")]
pub struct TransportError {
    pub reason: String,
    pub code: Option<u16>,
}

impl TransportError {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            code: None,
        }
    }

    #[must_use]
    pub fn with_code(reason: impl Into<String>, code: u16) -> Self {
        Self {
            reason: reason.into(),
            code: Some(code),
        }
    }
}

/// Perform one HTTP exchange for `url` with the assembled options.
pub trait Transport {
    /// # Errors
    ///
    /// [`TransportError`] when the exchange could not be completed; `code`
    /// carries an HTTP status when one was produced.
    fn fetch(&self, url: &str, options: &RequestOptions)
        -> std::result::Result<Exchange, TransportError>;
}

/// Plain-HTTP/1.1 transport over a TCP socket, one connection per call
/// (`Connection: close`). The advisory option timeout becomes the socket
/// connect/read/write timeout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpTransport;

impl Transport for TcpTransport {
    fn fetch(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> std::result::Result<Exchange, TransportError> {
        let parsed =
            Url::parse(url).map_err(|error| TransportError::new(format!("{url}: {error}")))?;

        if parsed.scheme() != "http" {
            return Err(TransportError::new(format!(
                "scheme '{}' is not supported by TcpTransport, inject a TLS-capable transport",
                parsed.scheme()
            )));
        }

        let host = parsed
            .host_str()
            .ok_or_else(|| TransportError::new(format!("no host in URL: {url}")))?;
        let port = parsed.port().unwrap_or(80);
        let timeout = options
            .timeout
            .filter(|seconds| seconds.is_finite() && *seconds > 0.0)
            .map(Duration::from_secs_f64);

        let stream = connect(host, port, timeout)?;
        let payload = build_payload(&parsed, host, options);

        let raw = exchange(stream, &payload, timeout)
            .map_err(|error| TransportError::new(error.to_string()))?;

        Ok(split_response(&raw))
    }
}

fn connect(
    host: &str,
    port: u16,
    timeout: Option<Duration>,
) -> std::result::Result<TcpStream, TransportError> {
    let addr = (host, port)
        .to_socket_addrs()
        .map_err(|error| TransportError::new(format!("cannot resolve {host}:{port}: {error}")))?
        .next()
        .ok_or_else(|| TransportError::new(format!("no address for {host}:{port}")))?;

    let stream = match timeout {
        Some(limit) => TcpStream::connect_timeout(&addr, limit),
        None => TcpStream::connect(addr),
    }
    .map_err(|error| TransportError::new(format!("connect to {host}:{port} failed: {error}")))?;

    Ok(stream)
}

fn build_payload(url: &Url, host: &str, options: &RequestOptions) -> Vec<u8> {
    let method = options.method.clone().unwrap_or(Method::GET);

    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target = format!("{target}?{query}");
    }

    let host_header = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    let mut head = format!("{method} {target} HTTP/1.1\r\nHost: {host_header}\r\n");
    for line in &options.header {
        head.push_str(line);
        head.push_str("\r\n");
    }

    let has_length = options
        .header
        .iter()
        .any(|line| line.to_lowercase().starts_with("content-length:"));
    if !options.content.is_empty() && !has_length {
        head.push_str(&format!("Content-Length: {}\r\n", options.content.len()));
    }
    head.push_str("Connection: close\r\n\r\n");

    let mut payload = head.into_bytes();
    payload.extend_from_slice(&options.content);

    payload
}

fn exchange(
    mut stream: TcpStream,
    payload: &[u8],
    timeout: Option<Duration>,
) -> std::io::Result<Vec<u8>> {
    stream.set_read_timeout(timeout)?;
    stream.set_write_timeout(timeout)?;

    stream.write_all(payload)?;
    stream.flush()?;

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw)?;

    Ok(raw)
}

/// Split a raw HTTP/1.1 response into header lines and body, undoing
/// chunked transfer encoding when announced.
fn split_response(raw: &[u8]) -> Exchange {
    let split_at = find_blank_line(raw);
    let (head, body) = match split_at {
        Some(at) => (&raw[..at], &raw[at + 4..]),
        None => (raw, &raw[raw.len()..]),
    };

    let headers: Vec<String> = String::from_utf8_lossy(head)
        .split("\r\n")
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    let chunked = headers.iter().any(|line| {
        line.to_lowercase()
            .starts_with("transfer-encoding:")
            && line.to_lowercase().contains("chunked")
    });

    let body = if chunked {
        decode_chunked(body).unwrap_or_else(|| body.to_vec())
    } else {
        body.to_vec()
    };

    Exchange {
        headers,
        body: Bytes::from(body),
    }
}

fn find_blank_line(raw: &[u8]) -> Option<usize> {
    raw.windows(4).position(|window| window == b"\r\n\r\n")
}

fn decode_chunked(body: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(body.len());
    let mut rest = body;

    loop {
        let line_end = rest.windows(2).position(|window| window == b"\r\n")?;
        let size_line = std::str::from_utf8(&rest[..line_end]).ok()?;
        let size_token = size_line.split(';').next()?.trim();
        let size = usize::from_str_radix(size_token, 16).ok()?;

        rest = &rest[line_end + 2..];
        if size == 0 {
            break;
        }

        if rest.len() < size {
            return None;
        }
        out.extend_from_slice(&rest[..size]);
        rest = rest.get(size + 2..)?;
    }

    Some(out)
}
