use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of the front-end module a user interacted with.
///
/// Any string is a valid id and is kept exactly as given; two ids are equal
/// only when their text is. Callers echoing an id to a terminal escape it
/// themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ModuleId(String);

impl ModuleId {
    /// Module ids the stock front-end emits.
    pub const KNOWN: [&'static str; 6] = [
        "mirror",
        "stream",
        "framework",
        "memory",
        "calibration",
        "emotion",
    ];

    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        Self::KNOWN.contains(&self.0.as_str())
    }
}

impl From<String> for ModuleId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ModuleId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<ModuleId> for String {
    fn from(value: ModuleId) -> Self {
        value.0
    }
}

impl AsRef<str> for ModuleId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_text_is_an_id() {
        assert_eq!(ModuleId::new("").as_str(), "");
        assert_eq!(ModuleId::new("mirror\x1b[2J").as_str(), "mirror\x1b[2J");
    }

    #[test]
    fn equality_is_exact() {
        assert_ne!(ModuleId::new(" mirror"), ModuleId::new("mirror"));
        assert!(ModuleId::new("mirror").is_known());
        assert!(!ModuleId::new("mirror ").is_known());
    }

    #[test]
    fn unknown_ids_are_still_valid() {
        let id = ModuleId::from("breathing-widget");
        assert!(!id.is_known());
    }

    #[test]
    fn serde_keeps_text_verbatim() {
        let id: ModuleId = serde_json::from_str("\"  stream \"").unwrap();
        assert_eq!(id.as_str(), "  stream ");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"  stream \"");
    }
}
