use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressionError {
    #[error("unknown mission: {0}")]
    UnknownMission(String),
    #[error("mission {id} is not claimable: progress {progress}/{target}")]
    MissionIncomplete {
        id: String,
        progress: u32,
        target: u32,
    },
    #[error("mission {0} has already been claimed")]
    MissionAlreadyClaimed(String),
}
