//! HTTP protocol version as a (major, minor) pair.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ensure;
use crate::protocol::error::InvalidVersion;

/// An HTTP protocol version.
///
/// Ordering is lexicographic: major first, minor breaks ties, so
/// `HTTP_10 < HTTP_11 < HTTP_2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HttpVersion {
    pub major: u16,
    pub minor: u16,
}

impl HttpVersion {
    pub const HTTP_09: HttpVersion = HttpVersion::new(0, 9);
    pub const HTTP_10: HttpVersion = HttpVersion::new(1, 0);
    pub const HTTP_11: HttpVersion = HttpVersion::new(1, 1);
    pub const HTTP_2: HttpVersion = HttpVersion::new(2, 0);
    pub const HTTP_3: HttpVersion = HttpVersion::new(3, 0);

    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }
}

impl Default for HttpVersion {
    fn default() -> Self {
        Self::HTTP_11
    }
}

/// Parses the `HTTP/<major>.<minor>` form.
///
/// The `HTTP/` prefix is case-sensitive and exactly one dot must
/// separate the two unsigned integer components; each violated
/// constraint gets its own [`InvalidVersion`] variant.
impl FromStr for HttpVersion {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(rest) = s.strip_prefix("HTTP/") else {
            return Err(InvalidVersion::missing_prefix(s));
        };
        let Some((major, minor)) = rest.split_once('.') else {
            return Err(InvalidVersion::wrong_component_count(s));
        };
        ensure!(!minor.contains('.'), InvalidVersion::wrong_component_count(s));

        Ok(Self::new(parse_component(major)?, parse_component(minor)?))
    }
}

fn parse_component(component: &str) -> Result<u16, InvalidVersion> {
    match component.parse() {
        Ok(number) => Ok(number),
        Err(_) => Err(InvalidVersion::not_a_number(component)),
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP/{}.{}", self.major, self.minor)
    }
}
