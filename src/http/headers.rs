//! Ordered header multi-map.
//!
//! # Design Decisions
//! - Entries are kept as a flat list of `(name, value)` pairs in arrival order,
//!   so a repeated header keeps every value in its original position
//! - Lookups compare names ASCII case-insensitively; the stored name keeps
//!   whatever casing it was inserted with
//! - Values are stored as raw octets; text accessors only see UTF-8 values,
//!   the wire conversion sees all of them
//! - `axum::http::HeaderMap` lowercases names, so conversion happens only at
//!   the transport boundary

use std::str;

use axum::http::header::{HeaderName, HeaderValue, InvalidHeaderName, InvalidHeaderValue};
use axum::http::HeaderMap;
use bytes::Bytes;
use thiserror::Error;

/// Errors raised when a collection is converted into wire headers.
#[derive(Debug, Error)]
pub enum HeaderConversionError {
    #[error("invalid header name '{name}': {source}")]
    Name {
        name: String,
        #[source]
        source: InvalidHeaderName,
    },

    #[error("invalid value for header '{name}': {source}")]
    Value {
        name: String,
        #[source]
        source: InvalidHeaderValue,
    },
}

/// Ordered, case-insensitive header multi-map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderCollection {
    entries: Vec<(String, Bytes)>,
}

impl HeaderCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value, keeping any existing values for the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let value: String = value.into();
        self.append_bytes(name, value);
    }

    /// Append a value given as raw octets.
    pub fn append_bytes(&mut self, name: impl Into<String>, value: impl Into<Bytes>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Set a single value for `name`.
    ///
    /// The first existing entry is overwritten in place (its casing replaced by
    /// `name`) and any later duplicates are dropped. Appends when absent.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value: String = value.into();
        let value = Bytes::from(value);
        match self.position(&name) {
            Some(idx) => {
                self.entries[idx] = (name.clone(), value);
                let mut seen = 0usize;
                self.entries.retain(|(n, _)| {
                    if n.eq_ignore_ascii_case(&name) {
                        seen += 1;
                        seen == 1
                    } else {
                        true
                    }
                });
            }
            None => self.entries.push((name, value)),
        }
    }

    /// Remove every entry for `name`, returning how many were removed.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        before - self.entries.len()
    }

    /// First value for `name` as text.
    ///
    /// `None` when absent or when that value is not UTF-8; use
    /// [`get_bytes`](Self::get_bytes) for the raw octets.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_bytes(name).and_then(|v| str::from_utf8(v).ok())
    }

    /// First value for `name`, as received.
    pub fn get_bytes(&self, name: &str) -> Option<&[u8]> {
        self.position(name).map(|idx| self.entries[idx].1.as_ref())
    }

    /// All UTF-8 values for `name`, in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .filter_map(|(_, v)| str::from_utf8(v).ok())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Every entry with its raw value, in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert into an `http` header map, preserving value order per name.
    pub fn to_header_map(&self) -> Result<HeaderMap, HeaderConversionError> {
        let mut map = HeaderMap::with_capacity(self.entries.len());
        for (name, value) in &self.entries {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|source| HeaderConversionError::Name {
                    name: name.clone(),
                    source,
                })?;
            let header_value = HeaderValue::from_maybe_shared(value.clone()).map_err(|source| {
                HeaderConversionError::Value {
                    name: name.clone(),
                    source,
                }
            })?;
            map.append(header_name, header_value);
        }
        Ok(map)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n.eq_ignore_ascii_case(name))
    }
}

impl<K, V> FromIterator<(K, V)> for HeaderCollection
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| {
                    let value: String = v.into();
                    (k.into(), Bytes::from(value))
                })
                .collect(),
        }
    }
}

impl From<&HeaderMap> for HeaderCollection {
    /// Values are copied byte for byte, including non-UTF-8 ones.
    fn from(map: &HeaderMap) -> Self {
        Self {
            entries: map
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        Bytes::copy_from_slice(value.as_bytes()),
                    )
                })
                .collect(),
        }
    }
}
