//! Pagination parameter for list endpoints.
//!
//! List endpoints accept at most one of `limit`, `afterId` or `beforeId`.
//! The parameter is passed through to the API; the client never iterates
//! pages itself.

use serde_json::Value;
use std::fmt;
use tracing::debug;

use crate::error::{Error, Result};

/// Single optional pagination parameter of a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pagination {
    /// Maximum number of items to return
    Limit(u64),
    /// Return items after this ID
    AfterId(u64),
    /// Return items before this ID
    BeforeId(u64),
}

impl Pagination {
    /// Query string key of the parameter.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Limit(_) => "limit",
            Self::AfterId(_) => "afterId",
            Self::BeforeId(_) => "beforeId",
        }
    }

    /// Value of the parameter.
    #[must_use]
    pub const fn value(&self) -> u64 {
        match self {
            Self::Limit(value) | Self::AfterId(value) | Self::BeforeId(value) => *value,
        }
    }

    /// Convert to a URL query pair.
    #[must_use]
    pub fn to_pair(&self) -> (&'static str, String) {
        (self.key(), self.value().to_string())
    }

    /// Parse a dynamically typed pagination object such as `{"limit": 10}`.
    ///
    /// `null` means no parameter. Otherwise the value must be an object with
    /// exactly one of `limit`, `afterId`, `beforeId`, holding a non-negative
    /// integer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPagination`] for any other shape.
    pub fn parse(value: &Value) -> Result<Option<Self>> {
        let object = match value {
            Value::Null => return Ok(None),
            Value::Object(object) => object,
            other => return reject(format!("expected an object, got `{other}`")),
        };

        if object.len() != 1 {
            return reject(format!(
                "exactly one of limit, afterId or beforeId is allowed, got {}",
                object.len()
            ));
        }

        let Some((key, raw)) = object.iter().next() else {
            return reject("empty pagination object".to_string());
        };
        let Some(number) = raw.as_u64() else {
            return reject(format!("`{key}` must be a non-negative integer, got `{raw}`"));
        };

        let pagination = match key.as_str() {
            "limit" => Self::Limit(number),
            "afterId" => Self::AfterId(number),
            "beforeId" => Self::BeforeId(number),
            other => return reject(format!("unknown pagination key `{other}`")),
        };
        Ok(Some(pagination))
    }
}

impl fmt::Display for Pagination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key(), self.value())
    }
}

fn reject<T>(reason: String) -> Result<T> {
    debug!(%reason, "rejected pagination parameter");
    Err(Error::InvalidPagination(reason))
}
