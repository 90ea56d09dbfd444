use std::fmt;

/// Steps of a publish run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishState {
    Init,
    BranchEnsured,
    Classified,
    Bumped,
    Resolved,
    Tagged,
    Pushed,
    Done,
    /// Terminal failure; `at` is the state the run was leaving
    Failed { at: FailedStep },
}

/// Non-terminal states a run can fail out of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedStep {
    Init,
    BranchEnsured,
    Classified,
    Bumped,
    Resolved,
    Tagged,
    Pushed,
}

impl PublishState {
    /// The failure state for a run currently in `self`
    pub fn fail(self) -> PublishState {
        let at = match self {
            PublishState::Init => FailedStep::Init,
            PublishState::BranchEnsured => FailedStep::BranchEnsured,
            PublishState::Classified => FailedStep::Classified,
            PublishState::Bumped => FailedStep::Bumped,
            PublishState::Resolved => FailedStep::Resolved,
            PublishState::Tagged => FailedStep::Tagged,
            PublishState::Pushed => FailedStep::Pushed,
            terminal @ (PublishState::Done | PublishState::Failed { .. }) => return terminal,
        };
        PublishState::Failed { at }
    }
}

impl fmt::Display for FailedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailedStep::Init => "Init",
            FailedStep::BranchEnsured => "BranchEnsured",
            FailedStep::Classified => "Classified",
            FailedStep::Bumped => "Bumped",
            FailedStep::Resolved => "Resolved",
            FailedStep::Tagged => "Tagged",
            FailedStep::Pushed => "Pushed",
        };
        f.write_str(name)
    }
}

impl fmt::Display for PublishState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishState::Init => f.write_str("Init"),
            PublishState::BranchEnsured => f.write_str("BranchEnsured"),
            PublishState::Classified => f.write_str("Classified"),
            PublishState::Bumped => f.write_str("Bumped"),
            PublishState::Resolved => f.write_str("Resolved"),
            PublishState::Tagged => f.write_str("Tagged"),
            PublishState::Pushed => f.write_str("Pushed"),
            PublishState::Done => f.write_str("Done"),
            PublishState::Failed { at } => write!(f, "Failed (after {})", at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_records_origin() {
        assert_eq!(
            PublishState::Resolved.fail(),
            PublishState::Failed {
                at: FailedStep::Resolved
            }
        );
    }

    #[test]
    fn test_fail_keeps_terminal_states() {
        assert_eq!(PublishState::Done.fail(), PublishState::Done);
        let failed = PublishState::Init.fail();
        assert_eq!(failed.fail(), failed);
    }

    #[test]
    fn test_display() {
        assert_eq!(PublishState::Bumped.to_string(), "Bumped");
        assert_eq!(
            PublishState::Tagged.fail().to_string(),
            "Failed (after Tagged)"
        );
    }
}
