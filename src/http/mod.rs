//! HTTP message objects: URI, request and response values plus header
//! normalization rules shared between them.

pub mod headers;
pub mod request;
pub mod response;
pub mod uri;

pub use headers::{standardize_header_key, HeaderValue, IntoHeaderValues};
pub use request::{Request, RequestOptions};
pub use response::Response;
pub use uri::Uri;
