use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CriticalPathConfig {
    /// When set, task date constraints are ignored and dates follow from
    /// dependencies alone.
    #[serde(default)]
    pub dependencies_constraints_have_priority: bool,
}

impl CriticalPathConfig {
    pub fn new(dependencies_constraints_have_priority: bool) -> Self {
        Self {
            dependencies_constraints_have_priority,
        }
    }

    pub fn applies_constraints(&self) -> bool {
        !self.dependencies_constraints_have_priority
    }
}
