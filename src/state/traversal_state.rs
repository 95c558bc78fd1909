/// Traversal state definitions
///
/// This module defines the lifecycle of a single crawl traversal.
use crate::SiftError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the lifecycle stage of a traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalState {
    /// Coordinator built, no traversal started yet
    #[default]
    Idle,

    /// Traversal in progress
    Running,

    // ===== Terminal States =====
    /// Frontier exhausted or page budget reached
    Completed,

    /// Stopped early: invalid configuration, deadline, or cancellation
    Aborted,
}

impl TraversalState {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }

    /// Returns true if `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: TraversalState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Completed)
                | (Self::Running, Self::Aborted)
        )
    }

    /// Moves to `next`, rejecting transitions outside the lifecycle
    pub fn transition(&mut self, next: TraversalState) -> Result<(), SiftError> {
        if !self.can_transition_to(next) {
            return Err(SiftError::InvalidTransition {
                from: *self,
                to: next,
            });
        }
        *self = next;
        Ok(())
    }

    /// Lowercase name used in logs and serialized reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for TraversalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
