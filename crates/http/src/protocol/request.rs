//! The validated HTTP/1.1 request aggregate.
//!
//! A [`Request`] composes a method, a [`RequestTarget`], a protocol
//! version, the header multimap, and an optional opaque body. It is a
//! plain immutable value: "mutating" operations like
//! [`Request::adding_header`] return a new request and leave the
//! original untouched, so sharing a request across threads needs no
//! synchronization.
//!
//! Construction is deliberately cheap: the method/target compatibility
//! rules of RFC 7230 are enforced by the opt-in [`Request::validate`],
//! not by the constructors. A caller that skips `validate` can hold a
//! well-typed but non-compliant request on purpose (test fixtures,
//! intermediate builder states).

use std::fmt;

use bytes::Bytes;
use http::Method;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use tracing::trace;
use url::Url;

use crate::ensure;
use crate::protocol::error::InvalidRequest;
use crate::protocol::{HeaderField, HeaderMap, HeaderValue, HttpVersion, RequestTarget};

/// An HTTP/1.1 request message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    target: RequestTarget,
    version: HttpVersion,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl Request {
    /// Creates a request with the given method and target, HTTP/1.1,
    /// no headers, and no body.
    pub fn new(method: Method, target: RequestTarget) -> Self {
        Self { method, target, version: HttpVersion::HTTP_11, headers: HeaderMap::new(), body: None }
    }

    /// Starts building a request; the target can be given directly or
    /// derived from URI components.
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn target(&self) -> &RequestTarget {
        &self.target
    }

    pub fn version(&self) -> HttpVersion {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// All values stored under `name`, case-insensitive, in append
    /// order; empty when the header is absent.
    pub fn header(&self, name: &str) -> impl Iterator<Item = &HeaderValue> {
        self.headers.get_all(name).into_iter().flatten().map(HeaderField::value)
    }

    /// The first value stored under `name`, case-insensitive.
    pub fn first_header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    /// Returns a new request with `field` appended; `self` is unchanged.
    pub fn adding_header(&self, field: HeaderField) -> Self {
        let mut next = self.clone();
        next.headers.append(field);
        next
    }

    /// Returns a new request with every value under `name` removed;
    /// `self` is unchanged.
    pub fn removing_headers(&self, name: &str) -> Self {
        let mut next = self.clone();
        next.headers.remove_all(name);
        next
    }

    /// The path of the active target form, when it carries one.
    pub fn path(&self) -> Option<&str> {
        self.target.path()
    }

    pub fn query(&self) -> Option<&str> {
        self.target.query()
    }

    pub fn scheme(&self) -> Option<&str> {
        self.target.scheme()
    }

    pub fn authority(&self) -> Option<&str> {
        self.target.authority_part()
    }

    pub fn host(&self) -> Option<&str> {
        self.target.host()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.target.fragment()
    }

    /// The request line: `<method> <target> <version>`.
    pub fn request_line(&self) -> String {
        format!("{} {} {}", self.method, self.target, self.version)
    }

    /// Checks the method/target compatibility rules of RFC 7230:
    /// authority form is CONNECT-only and asterisk form is
    /// OPTIONS-only. Every other combination passes.
    pub fn validate(&self) -> Result<(), InvalidRequest> {
        match &self.target {
            RequestTarget::Authority { .. } => ensure!(
                self.method == Method::CONNECT,
                InvalidRequest::authority_form_requires_connect(self.method.clone(), &self.target)
            ),
            RequestTarget::Asterisk => ensure!(
                self.method == Method::OPTIONS,
                InvalidRequest::asterisk_form_requires_options(self.method.clone())
            ),
            RequestTarget::Origin { .. } | RequestTarget::Absolute { .. } => {}
        }
        Ok(())
    }
}

/// Renders the request line, one `Name: Value` line per stored header
/// value, and a byte-count summary after a blank line when a body is
/// present.
impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.request_line())?;
        for field in &self.headers {
            writeln!(f, "{field}")?;
        }
        if let Some(body) = &self.body {
            writeln!(f)?;
            write!(f, "<{} bytes of body>", body.len())?;
        }
        Ok(())
    }
}

/// Builder for [`Request`].
///
/// The target comes from one of two places: a pre-built
/// [`RequestTarget`] via [`target`](RequestBuilder::target), or URI
/// components. With both scheme and host set the components assemble
/// into an absolute-form target; otherwise path (default `/`) and
/// query become an origin-form target. An explicit target wins over
/// components.
#[derive(Debug, Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    target: Option<RequestTarget>,
    scheme: Option<String>,
    userinfo: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    path: Option<String>,
    query: Option<String>,
    version: Option<HttpVersion>,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl RequestBuilder {
    /// Sets the method; defaults to GET.
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets a pre-built target, overriding component derivation.
    pub fn target(mut self, target: RequestTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    pub fn userinfo(mut self, userinfo: impl Into<String>) -> Self {
        self.userinfo = Some(userinfo.into());
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the path; defaults to `/`.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Sets the version; defaults to HTTP/1.1.
    pub fn version(mut self, version: HttpVersion) -> Self {
        self.version = Some(version);
        self
    }

    /// Appends one header field.
    pub fn header(mut self, field: HeaderField) -> Self {
        self.headers.append(field);
        self
    }

    /// Replaces the whole header map.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Assembles the request.
    ///
    /// Fails only when an absolute-form target is derived from
    /// components and the assembled URI does not parse.
    pub fn build(self) -> Result<Request, InvalidRequest> {
        let target = match self.target {
            Some(target) => target,
            None => Self::derive_target(
                self.scheme.as_deref(),
                self.userinfo.as_deref(),
                self.host.as_deref(),
                self.port,
                self.path.as_deref(),
                self.query.as_deref(),
            )?,
        };

        Ok(Request {
            method: self.method.unwrap_or(Method::GET),
            target,
            version: self.version.unwrap_or(HttpVersion::HTTP_11),
            headers: self.headers,
            body: self.body,
        })
    }

    fn derive_target(
        scheme: Option<&str>,
        userinfo: Option<&str>,
        host: Option<&str>,
        port: Option<u16>,
        path: Option<&str>,
        query: Option<&str>,
    ) -> Result<RequestTarget, InvalidRequest> {
        let path = path.unwrap_or("/");

        if let (Some(scheme), Some(host)) = (scheme, host) {
            let mut raw = String::with_capacity(scheme.len() + host.len() + path.len() + 16);
            raw.push_str(scheme);
            raw.push_str("://");
            if let Some(userinfo) = userinfo {
                raw.push_str(userinfo);
                raw.push('@');
            }
            raw.push_str(host);
            if let Some(port) = port {
                raw.push(':');
                raw.push_str(&port.to_string());
            }
            raw.push_str(path);
            if let Some(query) = query {
                raw.push('?');
                raw.push_str(query);
            }

            let uri = Url::parse(&raw)?;
            trace!(form = "absolute", uri = %uri, "derived request target");
            Ok(RequestTarget::Absolute { uri })
        } else {
            trace!(form = "origin", path, "derived request target");
            Ok(RequestTarget::origin(path, query))
        }
    }
}

/// Encodes as `{ method, requestTarget, httpVersion, headers, body }`,
/// with `headers` omitted when empty and `body` omitted when absent.
impl Serialize for Request {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut len = 3;
        if !self.headers.is_empty() {
            len += 1;
        }
        if self.body.is_some() {
            len += 1;
        }

        let mut state = serializer.serialize_struct("Request", len)?;
        state.serialize_field("method", self.method.as_str())?;
        state.serialize_field("requestTarget", &self.target)?;
        state.serialize_field("httpVersion", &self.version)?;
        if self.headers.is_empty() {
            state.skip_field("headers")?;
        } else {
            state.serialize_field("headers", &self.headers)?;
        }
        match &self.body {
            Some(body) => state.serialize_field("body", body)?,
            None => state.skip_field("body")?,
        }
        state.end()
    }
}

/// Mirror of the serialized shape; missing optional keys take their
/// documented defaults.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestRepr {
    method: String,
    request_target: RequestTarget,
    #[serde(default)]
    http_version: Option<HttpVersion>,
    #[serde(default)]
    headers: HeaderMap,
    #[serde(default)]
    body: Option<Bytes>,
}

impl<'de> Deserialize<'de> for Request {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = RequestRepr::deserialize(deserializer)?;
        let method = Method::from_bytes(repr.method.as_bytes()).map_err(de::Error::custom)?;
        Ok(Self {
            method,
            target: repr.request_target,
            version: repr.http_version.unwrap_or(HttpVersion::HTTP_11),
            headers: repr.headers,
            body: repr.body,
        })
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    fn field(name: &str, value: &str) -> HeaderField {
        HeaderField::new(name, HeaderValue::new(value).unwrap())
    }

    #[test]
    fn end_to_end_origin_request() {
        let request = Request::builder()
            .method(Method::GET)
            .path("/api/users")
            .query("page=1")
            .header(field("Accept", "application/json"))
            .build()
            .unwrap();

        assert_eq!(request.request_line(), "GET /api/users?page=1 HTTP/1.1");
        assert_eq!(request.first_header("accept").unwrap().as_str(), "application/json");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn builder_defaults_to_get_slash_http11() {
        let request = Request::builder().build().unwrap();
        assert_eq!(request.request_line(), "GET / HTTP/1.1");
        assert!(request.headers().is_empty());
        assert!(request.body().is_none());
    }

    #[test]
    fn builder_derives_absolute_target_from_components() {
        let request = Request::builder()
            .scheme("https")
            .userinfo("alice")
            .host("example.com")
            .port(8443)
            .path("/index.html")
            .query("a=1")
            .build()
            .unwrap();

        assert!(request.target().is_absolute_form());
        assert_eq!(request.scheme(), Some("https"));
        assert_eq!(request.host(), Some("example.com"));
        assert_eq!(request.path(), Some("/index.html"));
        assert_eq!(request.query(), Some("a=1"));
        assert_eq!(request.request_line(), "GET https://alice@example.com:8443/index.html?a=1 HTTP/1.1");
    }

    #[test]
    fn builder_without_scheme_stays_origin_form() {
        let request = Request::builder().host("example.com").path("/p").build().unwrap();
        assert!(request.target().is_origin_form());
        assert_eq!(request.host(), None);
    }

    #[test]
    fn explicit_target_wins_over_components() {
        let request = Request::builder()
            .target(RequestTarget::Asterisk)
            .path("/ignored")
            .method(Method::OPTIONS)
            .build()
            .unwrap();
        assert!(request.target().is_asterisk_form());
        assert_eq!(request.request_line(), "OPTIONS * HTTP/1.1");
    }

    #[test]
    fn builder_rejects_unparseable_component_uri() {
        let result = Request::builder().scheme("http").host("exa mple").build();
        assert!(matches!(result, Err(InvalidRequest::InvalidUri { .. })));
    }

    #[test]
    fn validate_enforces_connect_for_authority_form() {
        let target = RequestTarget::authority("example.com:443");

        assert!(Request::new(Method::CONNECT, target.clone()).validate().is_ok());

        let err = Request::new(Method::GET, target).validate().unwrap_err();
        assert!(matches!(err, InvalidRequest::AuthorityFormRequiresConnect { .. }));
        let message = err.to_string();
        assert!(message.contains("GET"));
        assert!(message.contains("example.com:443"));
    }

    #[test]
    fn validate_enforces_options_for_asterisk_form() {
        assert!(Request::new(Method::OPTIONS, RequestTarget::Asterisk).validate().is_ok());

        let err = Request::new(Method::GET, RequestTarget::Asterisk).validate().unwrap_err();
        assert!(matches!(err, InvalidRequest::AsteriskFormRequiresOptions { .. }));
    }

    #[test]
    fn validate_allows_any_method_for_origin_and_absolute_forms() {
        let origin = RequestTarget::origin("/p", None);
        let absolute: RequestTarget = "http://example.com/".parse().unwrap();
        for method in [Method::GET, Method::POST, Method::CONNECT, Method::OPTIONS] {
            assert!(Request::new(method.clone(), origin.clone()).validate().is_ok());
            assert!(Request::new(method, absolute.clone()).validate().is_ok());
        }
    }

    #[test]
    fn construction_does_not_auto_validate() {
        // cheap construction, explicit validation
        let request = Request::new(Method::GET, RequestTarget::Asterisk);
        assert_eq!(request.request_line(), "GET * HTTP/1.1");
        assert!(request.validate().is_err());
    }

    #[test]
    fn header_reads_are_case_insensitive() {
        let request = Request::builder()
            .header(field("Accept", "text/html"))
            .header(field("ACCEPT", "application/json"))
            .build()
            .unwrap();

        let values: Vec<&str> = request.header("accept").map(HeaderValue::as_str).collect();
        assert_eq!(values, ["text/html", "application/json"]);
        assert_eq!(request.first_header("aCCept").unwrap().as_str(), "text/html");
        assert_eq!(request.header("host").count(), 0);
    }

    #[test]
    fn adding_and_removing_headers_leave_the_original_untouched() {
        let request = Request::builder().header(field("Accept", "*/*")).build().unwrap();

        let extended = request.adding_header(field("Host", "example.com"));
        assert_eq!(extended.headers().len(), 2);
        assert_eq!(request.headers().len(), 1);

        let stripped = extended.removing_headers("accept");
        assert!(stripped.first_header("Accept").is_none());
        assert_eq!(extended.headers().len(), 2);
    }

    #[test]
    fn display_renders_request_line_headers_and_body_summary() {
        let request = Request::builder()
            .method(Method::POST)
            .path("/submit")
            .header(field("Host", "example.com"))
            .header(field("Content-Type", "text/plain"))
            .body(&b"ping"[..])
            .build()
            .unwrap();

        let expected = indoc! {"
            POST /submit HTTP/1.1
            Host: example.com
            Content-Type: text/plain

            <4 bytes of body>"};
        assert_eq!(request.to_string(), expected);
    }

    #[test]
    fn display_without_body_has_no_summary() {
        let request = Request::builder().header(field("Host", "example.com")).build().unwrap();
        let expected = indoc! {"
            GET / HTTP/1.1
            Host: example.com
        "};
        assert_eq!(request.to_string(), expected);
    }

    #[test]
    fn serde_encoding_omits_empty_headers_and_missing_body() {
        let request = Request::builder().path("/p").build().unwrap();
        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(
            encoded,
            serde_json::json!({
                "method": "GET",
                "requestTarget": { "form": "origin", "path": "/p" },
                "httpVersion": { "major": 1, "minor": 1 },
            })
        );
    }

    #[test]
    fn serde_decoding_applies_defaults_for_missing_keys() {
        let decoded: Request = serde_json::from_value(serde_json::json!({
            "method": "HEAD",
            "requestTarget": { "form": "origin", "path": "/p" },
        }))
        .unwrap();

        assert_eq!(decoded.method(), &Method::HEAD);
        assert_eq!(decoded.version(), HttpVersion::HTTP_11);
        assert!(decoded.headers().is_empty());
        assert!(decoded.body().is_none());
    }

    #[test]
    fn serde_round_trips_each_target_form() {
        let targets = [
            RequestTarget::origin("/a", Some("b=c")),
            "https://example.com/x?y=z#frag".parse().unwrap(),
            RequestTarget::authority("example.com:443"),
            RequestTarget::Asterisk,
        ];

        for target in targets {
            let request = Request::builder()
                .method(Method::POST)
                .target(target)
                .version(HttpVersion::HTTP_10)
                .header(field("Accept", "*/*"))
                .header(field("X-Trace", "abc123"))
                .body(&b"payload"[..])
                .build()
                .unwrap();

            let encoded = serde_json::to_string(&request).unwrap();
            let decoded: Request = serde_json::from_str(&encoded).unwrap();
            assert_eq!(decoded, request);
        }
    }

    #[test]
    fn serde_rejects_garbage_methods() {
        let result: Result<Request, _> = serde_json::from_value(serde_json::json!({
            "method": "G E T",
            "requestTarget": { "form": "origin", "path": "/" },
        }));
        assert!(result.is_err());
    }
}
