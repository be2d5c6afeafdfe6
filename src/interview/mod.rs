pub mod questions;
pub mod repository;
pub mod session;
pub mod timer;

pub use questions::{Difficulty, GeneratedQuestion, Question};
pub use repository::{InterviewRepository, SessionContext};
pub use session::{AnswerReview, InterviewSession, SubmitOutcome, AUTO_SUBMIT_PLACEHOLDER};
pub use timer::{QuestionTimer, TimerTick};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    InProgress,
    Completed,
}

/// One timed attempt by one candidate.
///
/// The interview owns its Question Set exclusively; nothing else mutates
/// it. `status` moves in_progress -> completed exactly once, and
/// `completed_at`/`final_score`/`summary` are written together in that same
/// transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: String,
    pub candidate_id: String,
    pub questions: Vec<Question>,
    /// Monotonically non-decreasing over the attempt's lifetime.
    pub current_question_index: usize,
    pub status: InterviewStatus,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub final_score: Option<f64>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl Interview {
    /// Creates a fresh in-progress attempt. The id folds in the creation
    /// timestamp, so it cannot collide within the process lifetime.
    pub fn new(candidate_id: &str, questions: Vec<Question>) -> Self {
        let started_at = Utc::now();
        Self {
            id: format!("{}_{}", candidate_id, started_at.timestamp_millis()),
            candidate_id: candidate_id.to_string(),
            questions,
            current_question_index: 0,
            status: InterviewStatus::InProgress,
            started_at,
            completed_at: None,
            final_score: None,
            summary: None,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_question_index)
    }

    pub fn is_last_question(&self) -> bool {
        self.current_question_index + 1 == self.questions.len()
    }

    /// Mean of the scores the collaborator actually produced, rounded to
    /// one decimal. Unscored questions stay out of both sides of the
    /// division; with nothing scored the result is 0.0.
    pub fn aggregate_score(&self) -> f64 {
        let scored: Vec<u8> = self.questions.iter().filter_map(|q| q.score).collect();
        if scored.is_empty() {
            return 0.0;
        }
        let sum: u32 = scored.iter().map(|&s| u32::from(s)).sum();
        (sum as f64 / scored.len() as f64 * 10.0).round() / 10.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question_with_score(id: u32, score: Option<u8>) -> Question {
        let mut question = Question::from_generated(GeneratedQuestion {
            id,
            question: format!("Question {id}?"),
            difficulty: Difficulty::Medium,
            correct_answer: String::new(),
            time_limit: 0,
        });
        question.answered = true;
        question.score = score;
        question
    }

    #[test]
    fn test_aggregate_score_skips_unscored_questions() {
        let interview = Interview::new(
            "cand-1",
            vec![
                question_with_score(1, Some(8)),
                question_with_score(2, Some(6)),
                question_with_score(3, Some(10)),
                question_with_score(4, None),
                question_with_score(5, Some(7)),
            ],
        );
        // (8 + 6 + 10 + 7) / 4 = 7.75, one decimal -> 7.8
        assert_eq!(interview.aggregate_score(), 7.8);
    }

    #[test]
    fn test_aggregate_score_defaults_to_zero_without_scores() {
        let interview = Interview::new(
            "cand-1",
            vec![question_with_score(1, None), question_with_score(2, None)],
        );
        assert_eq!(interview.aggregate_score(), 0.0);
    }

    #[test]
    fn test_new_interview_starts_at_question_zero() {
        let interview = Interview::new("cand-9", vec![question_with_score(1, None)]);
        assert_eq!(interview.current_question_index, 0);
        assert_eq!(interview.status, InterviewStatus::InProgress);
        assert!(interview.id.starts_with("cand-9_"));
        assert!(interview.completed_at.is_none());
        assert!(interview.final_score.is_none());
        assert!(interview.summary.is_none());
    }
}
