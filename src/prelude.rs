//! Canonical public types, importable in one line.

pub use crate::client::{Client, ClientConfig, MAX_COOKIE_LENGTH};
pub use crate::cookie::CookieJar;
pub use crate::dns::{DnsCache, Resolve, SystemResolver};
pub use crate::error::{Error, Result};
pub use crate::http::{
    standardize_header_key, HeaderValue, IntoHeaderValues, Request, RequestOptions, Response, Uri,
};
pub use crate::logging::{interpolate, mask_secrets, Level, Logger, TracingLogger};
pub use crate::stream::{FileStream, MemoryStream, Stream, StreamMetadata, StreamMode};
pub use crate::transport::{Exchange, TcpTransport, Transport, TransportError};
