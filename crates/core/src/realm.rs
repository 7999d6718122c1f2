//! Realm naming scope.

use serde::{Deserialize, Serialize};

const HEADER_PREFIX: &str = "#$REALM_NAME=";
const HEADER_SUFFIX: &str = "$";

/// Naming scope mixed into credential digests.
///
/// The empty realm is the default when neither the credential file nor the
/// caller names one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Realm(String);

impl Realm {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a `#$REALM_NAME=<name>$` header line.
    ///
    /// Returns `None` if the line is not a realm header.
    pub fn from_header_line(line: &str) -> Option<Self> {
        let name = line
            .trim()
            .strip_prefix(HEADER_PREFIX)?
            .strip_suffix(HEADER_SUFFIX)?;
        Some(Self(name.to_string()))
    }

    /// Render this realm as a credential file header line.
    pub fn header_line(&self) -> String {
        format!("{HEADER_PREFIX}{}{HEADER_SUFFIX}", self.0)
    }
}

impl core::fmt::Display for Realm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Realm {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
