//! Client execution pipeline.

use std::time::Instant;

use crate::cookie::{couple_part, set_cookie_payload, split_couple, CookieJar};
use crate::dns::{has_alphabetic, DnsCache, Resolve, SystemResolver};
use crate::error::{Error, Result};
use crate::http::headers::HeaderValue;
use crate::http::{Request, Response};
use crate::logging::{mask_secrets, Context, Logger};
use crate::stream::{MemoryStream, Stream};
use crate::transport::{TcpTransport, Transport};

use super::config::ClientConfig;

/// A `Cookie` header value at or above this length is worth a warning but
/// is still sent.
pub const MAX_COOKIE_LENGTH: usize = 1024;

/// Payloads above this size are previewed rather than dumped whole in
/// diagnostic reports.
const PAYLOAD_DUMP_LIMIT: u64 = 1_000;
const PAYLOAD_PREVIEW_BYTES: usize = 100;

/// Synchronous HTTP client.
///
/// Executes one request at a time: DNS lookup (cached), option assembly
/// (content length, session cookies), transport call, response parsing and
/// cookie extraction. Transient network trouble is downgraded into the
/// per-call error/warning lists and a degraded status-0 response; a
/// transport failure carrying a genuine HTTP status code is re-raised.
///
/// Not designed for concurrent use: the jar, DNS cache and per-call lists
/// are instance state mutated in place. Use one client per thread or
/// serialize access.
pub struct Client {
    config: ClientConfig,
    cookie_couples: CookieJar,
    dns_cache: DnsCache,
    errors: Vec<String>,
    last_url: String,
    logger: Option<Box<dyn Logger>>,
    request_counter: u64,
    resolver: Box<dyn Resolve>,
    transport: Box<dyn Transport>,
    warnings: Vec<String>,
}

impl Client {
    /// Client with default configuration, the system resolver and the
    /// plain-HTTP transport, logger-less.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Client with an explicit configuration.
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            config,
            cookie_couples: CookieJar::new(),
            dns_cache: DnsCache::new(),
            errors: Vec::new(),
            last_url: String::new(),
            logger: None,
            request_counter: 0,
            resolver: Box::new(SystemResolver),
            transport: Box::new(TcpTransport),
            warnings: Vec::new(),
        }
    }

    /// Attach a logger.
    #[must_use]
    pub fn with_logger(mut self, logger: impl Logger + 'static) -> Self {
        logger.info("Web client created", &[]);
        self.logger = Some(Box::new(logger));
        self
    }

    /// Substitute the transport implementation.
    #[must_use]
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Box::new(transport);
        self
    }

    /// Substitute the resolver implementation.
    #[must_use]
    pub fn with_resolver(mut self, resolver: impl Resolve + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Cookies accumulated across responses.
    #[must_use]
    pub fn cookies(&self) -> &CookieJar {
        &self.cookie_couples
    }

    /// Fatal error messages recorded during the last `send_request`.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Warning messages recorded during the last `send_request`.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// The last URL a request went out to.
    #[must_use]
    pub fn last_url(&self) -> &str {
        &self.last_url
    }

    /// Number of requests sent over this client's lifetime.
    #[must_use]
    pub fn request_count(&self) -> u64 {
        self.request_counter
    }

    /// Resolved addresses remembered so far.
    #[must_use]
    pub fn dns_cache(&self) -> &DnsCache {
        &self.dns_cache
    }

    /// Forget every cached address; logs the cleared count.
    pub fn reset_dns_cache(&mut self) {
        let count = self.dns_cache.len();
        if count == 0 {
            return;
        }

        let suffix = if count == 1 { "" } else { "es" };
        self.log_debug(
            &format!("Clean up {count} IP address{suffix} from DNS cache"),
            &[],
        );
        self.dns_cache.clear();
    }

    /// Send a request and return its response.
    ///
    /// The request is borrowed mutably so the client can complete its
    /// headers (`Content-length`) and record the execution duration.
    ///
    /// # Errors
    ///
    /// [`Error::Client`] when DNS resolution fails or the transport raises
    /// with an HTTP-range status code. [`Error::MalformedResponse`] when
    /// the transport produced an unparseable status line. Other transport
    /// failures are downgraded to a degraded status-0 response.
    pub fn send_request(&mut self, request: &mut Request) -> Result<Response> {
        self.errors.clear();
        self.warnings.clear();

        let uri = request.uri().clone();
        let fqdn = uri.host().trim_end().to_string();
        if !self.dns_cache.contains(&fqdn) && has_alphabetic(&fqdn) {
            self.log_debug(
                "Look up for '{host}' IP address...",
                &[("host", fqdn.clone())],
            );

            let addr = self.resolver.resolve(&fqdn)?;
            self.dns_cache.insert(fqdn.clone(), addr);

            self.log_debug(
                "Found numerical IP address for '{host}': '{addr}'",
                &[("host", fqdn.clone()), ("addr", addr.to_string())],
            );
        }
        // The cached address is not substituted into the outgoing request;
        // it goes out under the original hostname.
        let url = uri.to_string().trim().to_string();

        if let Some(size) = request.body().size() {
            if size > 0 {
                request.set_header("Content-length", vec![HeaderValue::Int(size as i64)])?;
            }
        }

        let mut options = request.context().clone();

        // Present previously collected cookies to this new request
        if !self.cookie_couples.is_empty() {
            let cookie_values = self.cookie_couples.header_value();
            if cookie_values.len() >= MAX_COOKIE_LENGTH {
                self.warnings
                    .push(format!("Cookie length is: {}", cookie_values.len()));
            }

            options.header.push(format!("Cookie: {cookie_values}"));
        }

        self.log_public_request(&uri, &url, &options);

        self.request_counter += 1;
        self.last_url = url.clone();

        let start = Instant::now();
        let exchange = match self.transport.fetch(&url, &options) {
            Ok(exchange) => exchange,
            Err(failure) => {
                if let Some(code) = failure.code {
                    if (100..600).contains(&code) {
                        return Err(Error::client(failure.reason, code));
                    }
                }

                match &self.logger {
                    Some(logger) => logger.error(&failure.reason, &[]),
                    None => self.errors.push(failure.reason.clone()),
                }

                let degraded = Response::degraded(Box::new(MemoryStream::empty()))
                    .with_status(0, failure.reason);

                return Ok(degraded);
            }
        };

        let duration_ms = start.elapsed().as_secs_f64() * 1e3;
        request.set_duration(duration_ms);

        let body: Box<dyn Stream> = Box::new(MemoryStream::new(exchange.body.to_vec()));
        let response = if exchange.headers.is_empty() {
            let message = "Request failed, no response headers";
            self.errors.push(message.to_string());
            if let Some(logger) = &self.logger {
                logger.error(message, &[]);
            }

            Response::degraded(body)
        } else {
            Response::parse(exchange.headers, body)?
        };

        let http_code = response.status_code();
        if http_code >= 302 {
            let message = format!(
                "HTTP response status: {http_code} {}",
                response.reason_phrase()
            );
            match &self.logger {
                Some(logger) => logger.warning(&message, &[]),
                None => self.warnings.push(message),
            }
        }

        self.extract_cookies(&response);
        self.report_errors(request, &response);

        Ok(response)
    }

    /// Harvest `Set-Cookie` couples from the response into the jar.
    fn extract_cookies(&mut self, response: &Response) {
        for header in response.headers() {
            let Some(payload) = set_cookie_payload(header) else {
                continue;
            };

            match split_couple(payload) {
                Some((key, value)) => {
                    self.cookie_couples.insert(key, value);
                }
                None => {
                    let message = format!(
                        "Did not find '=' in cookie value: {}",
                        couple_part(payload)
                    );
                    match &self.logger {
                        Some(logger) => logger.warning(&message, &[]),
                        None => self.warnings.push(message),
                    }
                }
            }
        }
    }

    /// Debug-trace the request with secrets masked out.
    fn log_public_request(&self, uri: &crate::http::Uri, url: &str, options: &crate::http::RequestOptions) {
        if !self.config.debug || self.logger.is_none() {
            return;
        }

        let user_info = uri.user_info();
        let pub_url = match user_info.split_once(':') {
            Some((user, _)) => uri
                .with_user_info(user, Some("*private*"))
                .map(|masked| masked.to_string())
                .unwrap_or_else(|_| url.to_string()),
            None => url.to_string(),
        };
        let public_url = mask_secrets(&pub_url);
        self.log_debug(&format!("Request (public) URL: {public_url}"), &[]);

        let rendered = serde_json::to_string_pretty(&options.to_json()).unwrap_or_default();
        let public_options = mask_secrets(&rendered);
        self.log_debug(&format!("Request (public) options: {public_options}"), &[]);
    }

    /// Aggregate recorded errors into one report: request line, masked
    /// request/response headers and a payload preview.
    fn report_errors(&self, request: &Request, response: &Response) {
        let Some(logger) = &self.logger else {
            return;
        };
        if self.errors.is_empty() {
            return;
        }

        let mut message = format!("{request}\n {}", self.errors.join("\n"));
        message = message.trim_end().to_string();

        message.push_str(&format!(
            "\n Request headers were: {}",
            pretty_json(request.headers())
        ));
        message.push_str(&format!(
            "\n Response headers were: {}",
            pretty_json(response.headers())
        ));

        let body_size = request.body().size().unwrap_or(1_000_000);
        if body_size > 0 && body_size < PAYLOAD_DUMP_LIMIT {
            message.push_str(&format!(
                "\n\nPayload ({body_size} B) was: {}",
                request.body().text()
            ));
        } else if body_size > 0 {
            let preview: String = request
                .body()
                .text()
                .chars()
                .take(PAYLOAD_PREVIEW_BYTES)
                .collect();
            message.push_str(&format!(
                "\n\nPayload ({body_size} B) starts with: {preview}"
            ));
        }

        logger.error(&mask_secrets(&message), &[]);
    }

    fn log_debug(&self, message: &str, context: &Context<'_>) {
        if !self.config.debug {
            return;
        }

        if let Some(logger) = &self.logger {
            logger.debug(message, context);
        }
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        if self.logger.is_none() {
            return;
        }

        self.reset_dns_cache();

        let cookies = self.cookie_couples.len();
        let requests = self.request_counter;
        let sc = if cookies == 1 { "" } else { "s" };
        let sr = if requests == 1 { "" } else { "s" };
        if let Some(logger) = &self.logger {
            logger.info(
                &format!("Web client did {requests} request{sr} and used {cookies} cookie{sc}"),
                &[],
            );
        }
    }
}

fn pretty_json(lines: &[String]) -> String {
    serde_json::to_string_pretty(lines).unwrap_or_default()
}
