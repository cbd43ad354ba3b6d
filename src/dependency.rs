use serde::{Deserialize, Serialize};
use std::fmt;

/// Temporal relation carried by a dependency between two tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DependencyType {
    /// The destination starts once the origin has finished.
    #[default]
    EndStart,
    /// The destination starts no earlier than the origin starts.
    StartStart,
    /// The destination finishes no earlier than the origin finishes.
    EndEnd,
}

impl DependencyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyType::EndStart => "END_START",
            DependencyType::StartStart => "START_START",
            DependencyType::EndEnd => "END_END",
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
