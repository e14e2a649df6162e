use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for a member of a group.
///
/// Usually a display name or a canonical wallet address. The engine never
/// normalizes or resolves these; two identifiers are the same participant
/// only if their strings are equal.
///
/// # Examples
///
/// ```
/// use group_settlement::core::participant::Participant;
///
/// let alice = Participant::new("alice.eth");
/// let wallet = Participant::new("0x71C7656EC7ab88b098defB751B7401B5f6d8976F");
/// assert_ne!(alice, wallet);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Participant(String);

impl Participant {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Participant {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Participant {
    fn from(s: String) -> Self {
        Self(s)
    }
}
