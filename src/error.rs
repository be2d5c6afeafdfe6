use thiserror::Error;

/// Error taxonomy for the session state machine and its collaborators.
///
/// `InvalidState` and `AlreadySubmitting` point at a broken invariant or a
/// lost race and are always returned to the caller, never swallowed.
/// `CollaboratorUnavailable` is absorbed by the session itself: a practice
/// interview must keep moving even when the AI service is down.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("a submission is already in flight for question index {0}")]
    AlreadySubmitting(usize),

    #[error("interview not found: {0}")]
    NotFound(String),

    #[error("collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    #[error("storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;
