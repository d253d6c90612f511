//! Goal-creation state machine.
//!
//! ```text
//! started        -> plan_generated
//! started        -> generation_failed
//! plan_generated -> generation_failed
//! plan_generated -> validated
//! plan_generated -> rejected
//! validated      -> persisted
//! ```
//!
//! `generation_failed`, `rejected` and `persisted` are terminal.

use std::fmt;

use tracing::{debug, warn};

/// Where a single goal-creation request currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationStage {
    Started,
    PlanGenerated,
    GenerationFailed,
    Validated,
    Rejected,
    Persisted,
}

impl CreationStage {
    /// Check whether `from -> to` is an edge of the state graph.
    pub fn is_valid_transition(from: Self, to: Self) -> bool {
        matches!(
            (from, to),
            (Self::Started, Self::PlanGenerated)
                | (Self::Started, Self::GenerationFailed)
                | (Self::PlanGenerated, Self::GenerationFailed)
                | (Self::PlanGenerated, Self::Validated)
                | (Self::PlanGenerated, Self::Rejected)
                | (Self::Validated, Self::Persisted)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::GenerationFailed | Self::Rejected | Self::Persisted
        )
    }
}

impl fmt::Display for CreationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Started => "started",
            Self::PlanGenerated => "plan_generated",
            Self::GenerationFailed => "generation_failed",
            Self::Validated => "validated",
            Self::Rejected => "rejected",
            Self::Persisted => "persisted",
        };
        f.write_str(s)
    }
}

/// Tracks one request through the state graph and logs each step.
#[derive(Debug)]
pub struct CreationTracker {
    stage: CreationStage,
    history: Vec<CreationStage>,
}

impl CreationTracker {
    pub fn start() -> Self {
        Self {
            stage: CreationStage::Started,
            history: vec![CreationStage::Started],
        }
    }

    pub fn stage(&self) -> CreationStage {
        self.stage
    }

    /// Every stage visited, in order, starting with `started`.
    pub fn history(&self) -> &[CreationStage] {
        &self.history
    }

    /// Move to `to`. Returns `false` and stays put on an illegal edge.
    pub fn advance(&mut self, to: CreationStage) -> bool {
        if !CreationStage::is_valid_transition(self.stage, to) {
            warn!(from = %self.stage, to = %to, "invalid goal creation transition");
            return false;
        }
        debug!(from = %self.stage, to = %to, "goal creation transition");
        self.stage = to;
        self.history.push(to);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CreationStage::*;

    const ALL: [CreationStage; 6] = [
        Started,
        PlanGenerated,
        GenerationFailed,
        Validated,
        Rejected,
        Persisted,
    ];

    #[test]
    fn terminal_stages_have_no_outgoing_edges() {
        for from in ALL.into_iter().filter(|s| s.is_terminal()) {
            for to in ALL {
                assert!(
                    !CreationStage::is_valid_transition(from, to),
                    "{from} -> {to} should be invalid"
                );
            }
        }
    }

    #[test]
    fn rejected_cannot_reach_persisted() {
        assert!(!CreationStage::is_valid_transition(Rejected, Persisted));
        assert!(!CreationStage::is_valid_transition(PlanGenerated, Persisted));
    }

    #[test]
    fn tracker_records_happy_path() {
        let mut t = CreationTracker::start();
        assert!(t.advance(PlanGenerated));
        assert!(t.advance(Validated));
        assert!(t.advance(Persisted));
        assert_eq!(t.history(), &[Started, PlanGenerated, Validated, Persisted]);
        assert!(t.stage().is_terminal());
    }

    #[test]
    fn generation_can_fail_before_or_after_model_answers() {
        assert!(CreationStage::is_valid_transition(Started, GenerationFailed));
        assert!(CreationStage::is_valid_transition(PlanGenerated, GenerationFailed));

        let mut t = CreationTracker::start();
        assert!(t.advance(PlanGenerated));
        assert!(t.advance(GenerationFailed));
        assert_eq!(t.history(), &[Started, PlanGenerated, GenerationFailed]);
        assert!(t.stage().is_terminal());
    }

    #[test]
    fn tracker_refuses_illegal_edge() {
        let mut t = CreationTracker::start();
        assert!(!t.advance(Validated));
        assert_eq!(t.stage(), Started);
        assert_eq!(t.history(), &[Started]);
    }

    #[test]
    fn display_is_snake_case() {
        assert_eq!(GenerationFailed.to_string(), "generation_failed");
        assert_eq!(PlanGenerated.to_string(), "plan_generated");
    }
}
