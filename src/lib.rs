//! # plainhttp
//!
//! Minimal synchronous HTTP client with PSR-7 style message values: an
//! immutable [`Uri`](crate::http::Uri), [`Request`](crate::http::Request)
//! and [`Response`](crate::http::Response) objects with case-insensitive
//! header semantics, a byte-stream body abstraction, and a
//! [`Client`](crate::client::Client) that runs one blocking exchange at a
//! time while keeping a session cookie jar and a best-effort DNS cache.
//!
//! The byte-level exchange and the log sink are capabilities: inject any
//! [`Transport`](crate::transport::Transport) or
//! [`Logger`](crate::logging::Logger); the crate ships a plain-HTTP
//! [`TcpTransport`](crate::transport::TcpTransport) and a
//! [`TracingLogger`](crate::logging::TracingLogger).
//!
//! ```no_run
//! use plainhttp::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let uri = Uri::parse("http://example.com/search?q=hello")?;
//!     let options = RequestOptions::new()
//!         .header_line("Accept: text/html")
//!         .timeout(1.5);
//!     let mut request = Request::new(uri, options);
//!
//!     let mut client = Client::new().with_logger(TracingLogger);
//!     let response = client.send_request(&mut request)?;
//!
//!     println!("{} {}", response.status_code(), response.page_title());
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod client;
pub mod cookie;
pub mod dns;
pub mod error;
pub mod http;
pub mod logging;
pub mod stream;
pub mod transport;

pub mod prelude;

pub use crate::prelude::*;
