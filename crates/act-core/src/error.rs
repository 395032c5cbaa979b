use thiserror::Error;

/// Fatal scheduler errors.
///
/// These abort the failing action's evaluation for the frame and propagate
/// to the host's per-frame error boundary; the scheduler performs no
/// structural retries.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("repeat container must own exactly one child (got {got})")]
    MalformedRepeat { got: usize },

    #[error("just-completed repetition has an unresolved duration")]
    UnresolvedRepetition,

    #[error("repeat-forever container reached the satisfied-count branch")]
    RepeatForeverSatisfied,

    #[error("sound '{name}' is in an error state")]
    SoundFailed { name: String },

    #[error("no audio backend available for sound '{name}'")]
    SoundUnavailable { name: String },
}
