use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Identifier of a single advisory opinion, e.g. `A-24-001`.
///
/// Restricted to characters that can be placed in a URL path segment
/// without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OpinionId(String);

impl OpinionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for OpinionId {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidOpinionId("empty id".to_string()));
        }
        if trimmed == "." || trimmed == ".." {
            return Err(CoreError::InvalidOpinionId(trimmed.to_string()));
        }
        if !trimmed
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.')
        {
            return Err(CoreError::InvalidOpinionId(trimmed.to_string()));
        }
        Ok(OpinionId(trimmed.to_string()))
    }
}

impl TryFrom<String> for OpinionId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        OpinionId::try_from(value.as_str())
    }
}

impl From<OpinionId> for String {
    fn from(value: OpinionId) -> Self {
        value.0
    }
}

impl fmt::Display for OpinionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
