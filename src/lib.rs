pub mod ai;
pub mod candidate;
pub mod config;
pub mod error;
pub mod interview;
pub mod server;
pub mod store;

pub use ai::{Collaborator, HttpCollaborator, ScoreResult, SUMMARY_UNAVAILABLE};
pub use candidate::{
    extract_profile, Candidate, CandidateDirectory, CandidateProfile, CandidateStatus,
};
pub use config::Config;
pub use error::{Result, SessionError};
pub use interview::{
    AnswerReview, Difficulty, GeneratedQuestion, Interview, InterviewRepository,
    InterviewSession, InterviewStatus, Question, QuestionTimer, SubmitOutcome, TimerTick,
};
pub use store::{DurableStore, FileStore, MemoryStore};
