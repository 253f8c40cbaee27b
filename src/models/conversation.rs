use serde::{Deserialize, Serialize};

use super::enums::TurnRole;

/// One message of a simulated interview.
///
/// Role is kept as the raw string from the case file so an unexpected
/// role never rejects the whole collection; `role()` parses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

impl Turn {
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role: role.as_str().to_string(),
            content: content.into(),
        }
    }

    pub fn role(&self) -> Option<TurnRole> {
        self.role.parse().ok()
    }

    pub fn is(&self, role: TurnRole) -> bool {
        self.role() == Some(role)
    }
}
