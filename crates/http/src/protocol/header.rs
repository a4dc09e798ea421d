//! HTTP header field primitives and the ordered multimap holding them.
//!
//! Header identity in HTTP is asymmetric: field *names* compare
//! case-insensitively while field *values* compare verbatim. The types
//! here encode that split once so every consumer gets it for free:
//!
//! - [`HeaderValue`]: validated value, CR/LF rejected at construction
//! - [`HeaderName`]: case-insensitive identity, original casing kept
//! - [`HeaderField`]: an owned (name, value) pair
//! - [`HeaderMap`]: insertion-ordered multimap with O(1) lookup
//!
//! [`HeaderName`] deliberately performs no token-grammar validation;
//! enforcing the RFC 7230 token character set is the wire parser's job,
//! and tightening it here would reject names that layer must be able to
//! represent.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::str::FromStr;

use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::protocol::error::InvalidHeaderValue;

/// A validated HTTP header field value.
///
/// Guaranteed to contain neither CR (0x0D) nor LF (0x0A), which closes
/// the header-injection hole where an embedded line break smuggles
/// additional fields onto the wire. The empty string is a legal value.
///
/// Equality and hashing are structural and case-sensitive; unlike
/// names, header values are never case-folded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeaderValue {
    value: String,
}

impl HeaderValue {
    /// Creates a header value, rejecting any input containing CR or LF.
    ///
    /// The error names the offending character class and echoes the
    /// rejected input.
    pub fn new(value: impl Into<String>) -> Result<Self, InvalidHeaderValue> {
        let value = value.into();
        if value.contains('\r') {
            return Err(InvalidHeaderValue::carriage_return(value));
        }
        if value.contains('\n') {
            return Err(InvalidHeaderValue::line_feed(value));
        }
        Ok(Self { value })
    }

    /// Creates a header value without the CR/LF check.
    ///
    /// The caller asserts the input is free of line breaks; passing
    /// untrusted data through here reopens the injection hole that
    /// [`HeaderValue::new`] exists to close.
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }

    /// Returns the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns true if the value is the empty string.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl FromStr for HeaderValue {
    type Err = InvalidHeaderValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl Serialize for HeaderValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de> Deserialize<'de> for HeaderValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(de::Error::custom)
    }
}

/// An HTTP header field name.
///
/// Identity is case-insensitive: two names are equal (and hash equal)
/// iff they match ignoring ASCII case. The original spelling is kept
/// and used for display and serialization.
///
/// Construction is total. No token-grammar validation happens at this
/// layer; see the module docs for why.
#[derive(Debug, Clone)]
pub struct HeaderName {
    name: String,
}

impl HeaderName {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the name with its original casing.
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// The lowercased form used as the case-insensitive map key.
    pub(crate) fn folded(&self) -> String {
        self.name.to_ascii_lowercase()
    }
}

impl From<&str> for HeaderName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for HeaderName {
    fn from(name: String) -> Self {
        Self { name }
    }
}

impl PartialEq for HeaderName {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for HeaderName {}

/// Hashes the lowercased bytes so that names equal under
/// [`PartialEq`] always hash to the same value.
impl Hash for HeaderName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.name.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
    }
}

impl fmt::Display for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Serialize for HeaderName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

impl<'de> Deserialize<'de> for HeaderName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from(String::deserialize(deserializer)?))
    }
}

/// An owned (name, value) header pair.
///
/// Equality follows the parts: name case-insensitive, value verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderField {
    name: HeaderName,
    value: HeaderValue,
}

impl HeaderField {
    pub fn new(name: impl Into<HeaderName>, value: HeaderValue) -> Self {
        Self { name: name.into(), value }
    }

    pub fn name(&self) -> &HeaderName {
        &self.name
    }

    pub fn value(&self) -> &HeaderValue {
        &self.value
    }

    pub fn into_parts(self) -> (HeaderName, HeaderValue) {
        (self.name, self.value)
    }
}

/// Renders the field in wire spelling: `Name: Value`.
impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// An insertion-ordered, case-insensitive multimap of header fields.
///
/// Three ordering guarantees hold at all times:
///
/// 1. values stored under one name stay in append order
/// 2. distinct names iterate in first-insertion order
/// 3. iteration yields one field per stored value, flattened in
///    (name order, then value order), each with the spelling it was
///    appended with
///
/// Lookup by name is case-insensitive and O(1) amortized. Cloning
/// produces a fully independent collection; `&mut` methods can never
/// alias-mutate another holder's copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    /// Values keyed by the lowercased name.
    fields: HashMap<String, Vec<HeaderField>>,
    /// Lowercased names in first-insertion order.
    order: Vec<String>,
}

impl HeaderMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map by appending `fields` in order.
    ///
    /// Duplicate names accumulate values; nothing is overwritten.
    pub fn from_fields(fields: impl IntoIterator<Item = HeaderField>) -> Self {
        let mut map = Self::new();
        map.extend(fields);
        map
    }

    /// Appends one more value under the field's name.
    ///
    /// A new name goes to the end of the name order; an existing name
    /// gets the value appended to its list.
    pub fn append(&mut self, field: HeaderField) {
        let key = field.name().folded();
        match self.fields.get_mut(&key) {
            Some(values) => values.push(field),
            None => {
                self.order.push(key.clone());
                self.fields.insert(key, vec![field]);
            }
        }
    }

    /// Removes the name and all its values; case-insensitive, no-op
    /// when the name was never appended.
    pub fn remove_all(&mut self, name: &str) {
        let key = name.to_ascii_lowercase();
        if self.fields.remove(&key).is_some() {
            self.order.retain(|k| *k != key);
        }
    }

    /// Returns every field stored under `name` in append order, or
    /// `None` if the name was never appended.
    ///
    /// `None` is distinct from "present with an empty value": a field
    /// appended with the empty string still shows up here.
    pub fn get_all(&self, name: &str) -> Option<&[HeaderField]> {
        self.fields.get(&name.to_ascii_lowercase()).map(Vec::as_slice)
    }

    /// Returns the first value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.get_all(name).and_then(<[HeaderField]>::first).map(HeaderField::value)
    }

    /// Returns true if at least one value is stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(&name.to_ascii_lowercase())
    }

    /// Number of distinct names (not total values).
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates all stored fields in the deterministic flattened order.
    ///
    /// The iterator is lazy and restartable; call `iter` again for a
    /// fresh pass.
    pub fn iter(&self) -> HeaderIter<'_> {
        HeaderIter { map: self, keys: self.order.iter(), current: [].iter() }
    }
}

impl FromIterator<HeaderField> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = HeaderField>>(fields: I) -> Self {
        Self::from_fields(fields)
    }
}

impl Extend<HeaderField> for HeaderMap {
    fn extend<I: IntoIterator<Item = HeaderField>>(&mut self, fields: I) {
        for field in fields {
            self.append(field);
        }
    }
}

impl<'a> IntoIterator for &'a HeaderMap {
    type Item = &'a HeaderField;
    type IntoIter = HeaderIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`HeaderMap`], flattened in (name-insertion-order,
/// value-append-order).
#[derive(Debug)]
pub struct HeaderIter<'a> {
    map: &'a HeaderMap,
    keys: std::slice::Iter<'a, String>,
    current: std::slice::Iter<'a, HeaderField>,
}

impl<'a> Iterator for HeaderIter<'a> {
    type Item = &'a HeaderField;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(field) = self.current.next() {
                return Some(field);
            }
            let key = self.keys.next()?;
            if let Some(values) = self.map.fields.get(key) {
                self.current = values.iter();
            }
        }
    }
}

impl FusedIterator for HeaderIter<'_> {}

/// Serializes as a sequence of `{name, value}` objects in iteration
/// order, so the encoded form carries the same deterministic order the
/// map guarantees.
impl Serialize for HeaderMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let total = self.fields.values().map(Vec::len).sum();
        let mut seq = serializer.serialize_seq(Some(total))?;
        for field in self {
            seq.serialize_element(field)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for HeaderMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Vec::<HeaderField>::deserialize(deserializer)?;
        Ok(Self::from_fields(fields))
    }
}
