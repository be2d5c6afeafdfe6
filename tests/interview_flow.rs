use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use intervue::{
    extract_profile, Candidate, Collaborator, Difficulty, FileStore, GeneratedQuestion,
    InterviewSession, InterviewStatus, Question, Result, ScoreResult, SessionError,
    SubmitOutcome,
};

const RESUME_TEXT: &str = "\
Priya Narayan
Backend Engineer
priya.narayan@example.com
+1 415-555-0188
6 years experience with distributed systems.

Skills: Rust, Tokio, PostgreSQL, Redis
";

/// Deterministic collaborator: a fixed 2/2/2 question set and a rolling
/// score per call.
struct FixedCollaborator {
    scores: Mutex<Vec<u8>>,
}

impl FixedCollaborator {
    fn new(scores: Vec<u8>) -> Self {
        Self {
            scores: Mutex::new(scores),
        }
    }
}

#[async_trait]
impl Collaborator for FixedCollaborator {
    async fn generate_questions(&self, role: &str) -> Result<Vec<GeneratedQuestion>> {
        let difficulties = [
            Difficulty::Easy,
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Hard,
        ];
        Ok(difficulties
            .iter()
            .enumerate()
            .map(|(i, &difficulty)| GeneratedQuestion {
                id: i as u32 + 1,
                question: format!("{role} question {}?", i + 1),
                difficulty,
                correct_answer: String::new(),
                time_limit: 0,
            })
            .collect())
    }

    async fn score_answer(
        &self,
        _question: &str,
        _answer: &str,
        _difficulty: Difficulty,
    ) -> Result<ScoreResult> {
        let mut scores = self.scores.lock();
        if scores.is_empty() {
            return Err(SessionError::CollaboratorUnavailable(
                "out of scripted scores".to_string(),
            ));
        }
        let score = scores.remove(0);
        Ok(ScoreResult {
            score,
            feedback: format!("Feedback for score {score}."),
            timestamp: None,
        })
    }

    async fn generate_summary(
        &self,
        candidate: &Candidate,
        answers: &[Question],
    ) -> Result<String> {
        Ok(format!(
            "{} answered {} questions.",
            candidate.name,
            answers.len()
        ))
    }
}

#[tokio::test]
async fn test_full_interview_survives_a_process_restart() {
    let data_dir = tempfile::tempdir().unwrap();

    // First "process": admit the candidate and answer two questions.
    let interview_id = {
        let session = InterviewSession::new(
            Arc::new(FixedCollaborator::new(vec![8, 6, 10, 7, 9, 5])),
            Arc::new(FileStore::new(data_dir.path()).unwrap()),
        );

        let profile = extract_profile(RESUME_TEXT);
        let candidate = session.candidates().admit(profile).unwrap();
        assert_eq!(candidate.name, "Priya Narayan");
        assert!(candidate.skills.contains(&"Tokio".to_string()));

        let interview = session
            .begin_for_role(&candidate.id, "Backend Engineer")
            .await
            .unwrap();
        assert_eq!(interview.questions.len(), 6);
        assert_eq!(session.remaining_seconds(), 20);

        session.submit_answer("Answer one", 12).await.unwrap();
        session.submit_answer("Answer two", 8).await.unwrap();
        interview.id
    };

    // Second "process": rehydrate from disk and resume mid-interview.
    let session = InterviewSession::new(
        Arc::new(FixedCollaborator::new(vec![10, 7, 9, 5])),
        Arc::new(FileStore::new(data_dir.path()).unwrap()),
    );
    session.rehydrate().unwrap();

    assert_eq!(session.interviews().len(), 1);
    assert_eq!(session.candidates().len(), 1);
    assert!(session.current_interview().is_none());

    let resumed = session.resume(&interview_id).unwrap();
    assert_eq!(resumed.status, InterviewStatus::InProgress);
    assert_eq!(resumed.current_question_index, 2);
    assert_eq!(resumed.questions[0].answer, "Answer one");
    // Question 3 is medium: the full 60-second budget comes back.
    assert_eq!(session.remaining_seconds(), 60);

    // Drive the remaining four questions to completion.
    let mut last_outcome = None;
    for i in 2..6 {
        last_outcome = Some(
            session
                .submit_answer(&format!("Answer {}", i + 1), 20)
                .await
                .unwrap(),
        );
    }

    let final_score = match last_outcome.unwrap() {
        SubmitOutcome::Completed { final_score, .. } => final_score,
        other => panic!("expected completion, got {other:?}"),
    };
    // Scores 8, 6, 10, 7, 9, 5 -> mean 7.5.
    assert_eq!(final_score, 7.5);

    let interview = session.interviews().get(&interview_id).unwrap();
    assert_eq!(interview.status, InterviewStatus::Completed);
    assert_eq!(interview.final_score, Some(7.5));
    assert!(interview
        .summary
        .as_deref()
        .unwrap()
        .contains("Priya Narayan answered 6 questions."));

    // The candidate record carries the copy for the dashboard.
    let candidate = session.candidates().list().pop().unwrap();
    assert_eq!(candidate.final_score, Some(7.5));
    assert!(candidate.interview_completed_at.is_some());

    // Third "process": the completed attempt is durable and no longer
    // resumable.
    let reread = InterviewSession::new(
        Arc::new(FixedCollaborator::new(vec![])),
        Arc::new(FileStore::new(data_dir.path()).unwrap()),
    );
    reread.rehydrate().unwrap();
    let stored = reread.interviews().get(&interview_id).unwrap();
    assert_eq!(stored.status, InterviewStatus::Completed);
    assert!(matches!(
        reread.resume(&interview_id),
        Err(SessionError::NotFound(_))
    ));
}
