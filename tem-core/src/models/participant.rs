use std::{borrow::Borrow, fmt};

/// The identifier of a market participant (a building, or a remote proxy for one)
///
/// Identifiers are unique per participant and stable for its lifetime.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// View the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ParticipantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ParticipantId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<ParticipantId> for String {
    fn from(value: ParticipantId) -> Self {
        value.0
    }
}

// Allows map lookups keyed by ParticipantId to accept a plain &str
impl Borrow<str> for ParticipantId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
