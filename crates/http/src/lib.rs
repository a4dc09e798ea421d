//! A typed domain model for HTTP/1.1 request messages
//!
//! This crate provides a validated, immutable representation of an HTTP/1.1
//! request as specified by RFC 7230: the request-target in its four syntactic
//! forms, an order-preserving case-insensitive header multimap, the protocol
//! version, and the request aggregate tying them together. Values that would
//! be illegal on the wire (a header value containing a line break, an
//! authority-form target on a GET) either cannot be constructed or fail an
//! explicit validation step.
//!
//! # Features
//!
//! - Four-variant [`protocol::RequestTarget`] with per-form component accessors
//! - [`protocol::HeaderMap`]: case-insensitive lookup, insertion-order iteration,
//!   multi-value headers
//! - CR/LF injection rejected at [`protocol::HeaderValue`] construction
//! - [`protocol::HttpVersion`] parsing, formatting, and ordering
//! - Opt-in method/target compatibility validation on [`protocol::Request`]
//! - JSON serialization of the whole model via serde, with a tagged
//!   request-target encoding
//!
//! Wire-level concerns are out of scope: no byte-stream tokenization, no
//! TCP/TLS, no transfer framing. A wire parser produces these values and a
//! printer consumes them; this crate only defines the data in between.
//!
//! # Example
//!
//! ```
//! use http::Method;
//! use http1_model::protocol::{HeaderField, HeaderValue, HttpError, Request};
//!
//! fn main() -> Result<(), HttpError> {
//!     let request = Request::builder()
//!         .method(Method::GET)
//!         .path("/api/users")
//!         .query("page=1")
//!         .header(HeaderField::new("Accept", HeaderValue::new("application/json")?))
//!         .build()?;
//!
//!     request.validate()?;
//!
//!     assert_eq!(request.request_line(), "GET /api/users?page=1 HTTP/1.1");
//!
//!     // header lookup is case-insensitive
//!     let accept = request.first_header("accept").unwrap();
//!     assert_eq!(accept.as_str(), "application/json");
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Everything lives under [`protocol`], built bottom-up: header field
//! primitives compose into the multimap, the request-target is built
//! independently from URI components, and [`protocol::Request`] aggregates
//! them with a method and version.
//!
//! The method vocabulary is `http::Method` and the URI value type is
//! `url::Url`; both are consumed as-is rather than redefined. Bodies are
//! opaque `bytes::Bytes`.
//!
//! # Error Handling
//!
//! Construction-time validation failures are returned as typed errors, never
//! logged and swallowed:
//!
//! - [`protocol::InvalidHeaderValue`]: CR or LF in a header value
//! - [`protocol::InvalidVersion`]: malformed version string
//! - [`protocol::InvalidRequest`]: method/target mismatch or a bad
//!   component-assembled URI
//! - [`protocol::HttpError`]: any of the above, for callers with a single
//!   error path
//!
//! Note that constructing a [`protocol::Request`] does not automatically
//! enforce the method/target rules; [`protocol::Request::validate`] is
//! opt-in, so intermediate or deliberately non-compliant values are cheap to
//! hold.

pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
