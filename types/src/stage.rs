use std::fmt;

use serde::{Deserialize, Serialize};

/// One step in the fixed five-step guided session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStage {
    #[default]
    Awareness,
    Introspection,
    Insight,
    Reframe,
    Reflection,
}

impl SessionStage {
    pub const ALL: [SessionStage; 5] = [
        SessionStage::Awareness,
        SessionStage::Introspection,
        SessionStage::Insight,
        SessionStage::Reframe,
        SessionStage::Reflection,
    ];

    pub const COUNT: usize = Self::ALL.len();
    pub const FIRST: SessionStage = SessionStage::Awareness;
    pub const LAST: SessionStage = SessionStage::Reflection;

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stage at `index`, clamped into the valid range.
    #[must_use]
    pub fn from_index_clamped(index: usize) -> Self {
        Self::ALL[index.min(Self::COUNT - 1)]
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::from_index_clamped(self.index() + 1)
    }

    #[must_use]
    pub fn previous(self) -> Self {
        Self::from_index_clamped(self.index().saturating_sub(1))
    }

    #[must_use]
    pub const fn is_last(self) -> bool {
        matches!(self, Self::Reflection)
    }

    /// Progress through the session, 20 at the first stage and 100 at the last.
    #[must_use]
    pub const fn progress_percent(self) -> u8 {
        ((self.index() + 1) * 100 / Self::COUNT) as u8
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Awareness => "Awareness",
            Self::Introspection => "Introspection",
            Self::Insight => "Insight",
            Self::Reframe => "Reframe",
            Self::Reflection => "Reflection",
        }
    }
}

impl fmt::Display for SessionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
