//! The HTTP/1.1 message model types.
//!
//! This module contains the full data model, organized bottom-up:
//!
//! - **Header fields** ([`header`]): value and name primitives plus
//!   the ordered multimap
//!   - [`HeaderValue`]: validated field value (CR/LF rejected)
//!   - [`HeaderName`]: case-insensitive field name
//!   - [`HeaderField`]: an owned (name, value) pair
//!   - [`HeaderMap`]: insertion-ordered, case-insensitive multimap
//!
//! - **Version** ([`version`]): [`HttpVersion`] with parse/format and
//!   lexicographic ordering
//!
//! - **Request target** ([`target`]): [`RequestTarget`], the four-form
//!   RFC 7230 request-target with per-form component accessors
//!
//! - **Request** ([`request`]): the [`Request`] aggregate and its
//!   builder, owning cross-field validation
//!
//! - **Errors** ([`error`]): one enum per validation concern, rolled
//!   up into [`HttpError`]
//!
//! Everything here is an immutable value type. There is no I/O, no
//! async, and no interior mutability; concurrent readers can share any
//! of these values freely.

mod header;
pub use header::HeaderField;
pub use header::HeaderIter;
pub use header::HeaderMap;
pub use header::HeaderName;
pub use header::HeaderValue;

mod version;
pub use version::HttpVersion;

mod target;
pub use target::RequestTarget;

mod request;
pub use request::Request;
pub use request::RequestBuilder;

mod error;
pub use error::HttpError;
pub use error::InvalidHeaderValue;
pub use error::InvalidRequest;
pub use error::InvalidVersion;
