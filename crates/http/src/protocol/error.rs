use http::Method;
use thiserror::Error;

/// Top-level error type covering every validation failure this crate
/// can produce.
///
/// Each component reports its own error enum; this type aggregates them
/// for callers that funnel all failures through a single result type.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("header error: {source}")]
    Header {
        #[from]
        source: InvalidHeaderValue,
    },

    #[error("version error: {source}")]
    Version {
        #[from]
        source: InvalidVersion,
    },

    #[error("request error: {source}")]
    Request {
        #[from]
        source: InvalidRequest,
    },
}

/// A header value was rejected at construction time.
///
/// Values carrying CR or LF are refused unconditionally: a raw line
/// break inside a field value is how header injection smuggles extra
/// fields onto the wire. The offending value is echoed for diagnostics.
#[derive(Debug, Error)]
pub enum InvalidHeaderValue {
    #[error("header value contains a carriage return: {value:?}")]
    CarriageReturn { value: String },

    #[error("header value contains a line feed: {value:?}")]
    LineFeed { value: String },
}

impl InvalidHeaderValue {
    pub fn carriage_return<S: ToString>(value: S) -> Self {
        Self::CarriageReturn { value: value.to_string() }
    }

    pub fn line_feed<S: ToString>(value: S) -> Self {
        Self::LineFeed { value: value.to_string() }
    }
}

/// A version string did not match the `HTTP/<major>.<minor>` grammar.
#[derive(Debug, Error)]
pub enum InvalidVersion {
    #[error("http version must start with \"HTTP/\": {input:?}")]
    MissingPrefix { input: String },

    #[error("http version must be two components separated by a single dot: {input:?}")]
    WrongComponentCount { input: String },

    #[error("http version component is not an unsigned integer: {component:?}")]
    NotANumber { component: String },
}

impl InvalidVersion {
    pub fn missing_prefix<S: ToString>(input: S) -> Self {
        Self::MissingPrefix { input: input.to_string() }
    }

    pub fn wrong_component_count<S: ToString>(input: S) -> Self {
        Self::WrongComponentCount { input: input.to_string() }
    }

    pub fn not_a_number<S: ToString>(component: S) -> Self {
        Self::NotANumber { component: component.to_string() }
    }
}

/// A request failed cross-field validation, or could not be assembled
/// from its components.
#[derive(Debug, Error)]
pub enum InvalidRequest {
    #[error("{method} cannot use the authority-form target {target:?}, only CONNECT can")]
    AuthorityFormRequiresConnect { method: Method, target: String },

    #[error("{method} cannot use the asterisk-form target, only OPTIONS can")]
    AsteriskFormRequiresOptions { method: Method },

    #[error("invalid uri assembled from request components: {source}")]
    InvalidUri {
        #[from]
        source: url::ParseError,
    },
}

impl InvalidRequest {
    pub fn authority_form_requires_connect<S: ToString>(method: Method, target: S) -> Self {
        Self::AuthorityFormRequiresConnect { method, target: target.to_string() }
    }

    pub fn asterisk_form_requires_options(method: Method) -> Self {
        Self::AsteriskFormRequiresOptions { method }
    }
}
