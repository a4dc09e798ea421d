//! The RFC 7230 request-target in its four syntactic forms.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

/// The target of an HTTP/1.1 request.
///
/// RFC 7230 defines four mutually exclusive request-target syntaxes,
/// each carrying a different payload. Modelling them as one enum makes
/// "exactly one form is active" structural instead of a runtime check.
///
/// The serialized form is internally tagged under the `form` key
/// (`origin`, `absolute`, `authority`, `asterisk`); decoding an
/// unrecognized tag fails with an error naming it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "lowercase")]
pub enum RequestTarget {
    /// An absolute path plus optional query, as in `GET /where?q=now`.
    Origin {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        query: Option<String>,
    },
    /// A complete URI, as sent to proxies: `GET http://example.com/ HTTP/1.1`.
    Absolute { uri: Url },
    /// Just `host[:port]`, used by CONNECT.
    Authority { authority: String },
    /// The literal `*`, used by server-wide OPTIONS.
    Asterisk,
}

impl RequestTarget {
    /// Creates an origin-form target from a path and optional query.
    pub fn origin(path: impl Into<String>, query: Option<&str>) -> Self {
        Self::Origin { path: path.into(), query: query.map(str::to_owned) }
    }

    /// Creates an absolute-form target from a full URI.
    pub fn absolute(uri: Url) -> Self {
        Self::Absolute { uri }
    }

    /// Creates an authority-form target from a `host[:port]` string.
    pub fn authority(authority: impl Into<String>) -> Self {
        Self::Authority { authority: authority.into() }
    }

    /// The path component, when the active form carries one.
    ///
    /// Present for origin form (directly) and absolute form (from the
    /// URI); absent for authority and asterisk forms.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Origin { path, .. } => Some(path),
            Self::Absolute { uri } => Some(uri.path()),
            Self::Authority { .. } | Self::Asterisk => None,
        }
    }

    /// The query component, when the active form carries one.
    pub fn query(&self) -> Option<&str> {
        match self {
            Self::Origin { query, .. } => query.as_deref(),
            Self::Absolute { uri } => uri.query(),
            Self::Authority { .. } | Self::Asterisk => None,
        }
    }

    /// The scheme; absolute form only.
    pub fn scheme(&self) -> Option<&str> {
        match self {
            Self::Absolute { uri } => Some(uri.scheme()),
            _ => None,
        }
    }

    /// The authority component; absolute and authority forms.
    pub fn authority_part(&self) -> Option<&str> {
        match self {
            Self::Absolute { uri } => Some(uri.authority()),
            Self::Authority { authority } => Some(authority),
            Self::Origin { .. } | Self::Asterisk => None,
        }
    }

    /// The host; absolute and authority forms.
    ///
    /// For the authority form this is a best-effort split of
    /// `host[:port]`: bracketed IPv6 literals are kept whole, and a
    /// trailing `:suffix` only counts as a port when fully numeric.
    pub fn host(&self) -> Option<&str> {
        match self {
            Self::Absolute { uri } => uri.host_str(),
            Self::Authority { authority } => Some(split_authority(authority).0),
            Self::Origin { .. } | Self::Asterisk => None,
        }
    }

    /// The port; absolute and authority forms, when present.
    pub fn port(&self) -> Option<u16> {
        match self {
            Self::Absolute { uri } => uri.port(),
            Self::Authority { authority } => {
                split_authority(authority).1.and_then(|port| port.parse().ok())
            }
            Self::Origin { .. } | Self::Asterisk => None,
        }
    }

    /// The fragment; absolute form only.
    pub fn fragment(&self) -> Option<&str> {
        match self {
            Self::Absolute { uri } => uri.fragment(),
            _ => None,
        }
    }

    #[inline]
    pub fn is_origin_form(&self) -> bool {
        matches!(self, Self::Origin { .. })
    }

    #[inline]
    pub fn is_absolute_form(&self) -> bool {
        matches!(self, Self::Absolute { .. })
    }

    #[inline]
    pub fn is_authority_form(&self) -> bool {
        matches!(self, Self::Authority { .. })
    }

    #[inline]
    pub fn is_asterisk_form(&self) -> bool {
        matches!(self, Self::Asterisk)
    }
}

/// Splits `host[:port]`, keeping bracketed IPv6 literals intact.
fn split_authority(authority: &str) -> (&str, Option<&str>) {
    if authority.starts_with('[') {
        if let Some(end) = authority.find(']') {
            let port = authority[end + 1..].strip_prefix(':');
            return (&authority[..=end], port);
        }
    }
    match authority.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => {
            (host, Some(port))
        }
        _ => (authority, None),
    }
}

/// Renders the target in its RFC 7230 grammar form.
impl fmt::Display for RequestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Origin { path, query } => {
                f.write_str(path)?;
                match query {
                    Some(query) if !query.is_empty() => write!(f, "?{query}"),
                    _ => Ok(()),
                }
            }
            Self::Absolute { uri } => write!(f, "{uri}"),
            Self::Authority { authority } => f.write_str(authority),
            Self::Asterisk => f.write_str("*"),
        }
    }
}

/// Parses a request-target string back into its form.
///
/// `*` is asterisk form, a leading `/` selects origin form, a string
/// containing `://` parses as a full URI, and anything else is taken
/// as an authority. Only the absolute form can fail.
impl FromStr for RequestTarget {
    type Err = url::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "*" {
            return Ok(Self::Asterisk);
        }
        if s.starts_with('/') {
            return Ok(match s.split_once('?') {
                Some((path, query)) => Self::origin(path, Some(query)),
                None => Self::origin(s, None),
            });
        }
        if s.contains("://") {
            return Ok(Self::Absolute { uri: Url::parse(s)? });
        }
        Ok(Self::authority(s))
    }
}
