//! Product identifiers.
//!
//! The remote catalog keys products by an opaque string (a document ID on the
//! catalog service, a short numeric string in the embedded dataset). Wrapping it
//! keeps product IDs from being mixed up with names, handles or other strings.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a catalog product.
///
/// Serialized transparently as the underlying string.
///
/// ```
/// use techsphere_core::ProductId;
///
/// let id = ProductId::new("1");
/// assert_eq!(id.as_str(), "1");
/// assert_eq!(id.to_string(), "1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product ID from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the ID and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
