//! Date bounds a collaborator can attach to the start or end of a task.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single bound on a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "date", rename_all = "snake_case")]
pub enum Constraint {
    /// The date may not be earlier than the bound.
    BiggerOrEqualThan(NaiveDate),
    /// The date may not be later than the bound.
    LessOrEqualThan(NaiveDate),
    /// The date is pinned to the bound.
    EqualTo(NaiveDate),
}

impl Constraint {
    pub fn apply_to(&self, date: NaiveDate) -> NaiveDate {
        match *self {
            Constraint::BiggerOrEqualThan(bound) => date.max(bound),
            Constraint::LessOrEqualThan(bound) => date.min(bound),
            Constraint::EqualTo(bound) => bound,
        }
    }

    pub fn is_satisfied_by(&self, date: NaiveDate) -> bool {
        self.apply_to(date) == date
    }
}

/// Several constraints coalesced into one, applied in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintChain {
    constraints: Vec<Constraint>,
}

impl ConstraintChain {
    /// Coalesces start constraints followed by end constraints. Returns `None`
    /// when both lists are empty.
    pub fn coalesce(start: Vec<Constraint>, end: Vec<Constraint>) -> Option<Self> {
        if start.is_empty() && end.is_empty() {
            return None;
        }
        let mut constraints = start;
        constraints.extend(end);
        Some(Self { constraints })
    }

    pub fn apply_to(&self, date: NaiveDate) -> NaiveDate {
        self.constraints
            .iter()
            .fold(date, |current, constraint| constraint.apply_to(current))
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}
