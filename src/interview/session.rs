use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{error, info, warn};
use parking_lot::Mutex;

use crate::ai::{Collaborator, SUMMARY_UNAVAILABLE};
use crate::candidate::{Candidate, CandidateDirectory};
use crate::error::{Result, SessionError};
use crate::store::{DurableStore, CANDIDATES_KEY, INTERVIEWS_KEY};

use super::{
    Difficulty, GeneratedQuestion, Interview, InterviewRepository, InterviewStatus, Question,
    QuestionTimer, SessionContext, TimerTick,
};

/// Placeholder recorded when the clock runs out before anything was typed.
pub const AUTO_SUBMIT_PLACEHOLDER: &str = "No answer provided (time expired)";

/// Score and feedback attached to one submitted answer. A `None` score
/// means the scoring collaborator was unreachable and the answer stays
/// unscored.
#[derive(Debug, Clone)]
pub struct AnswerReview {
    pub question_index: usize,
    pub score: Option<u8>,
    pub feedback: Option<String>,
}

/// What a submission led to.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The session moved on; the timer is armed for `next_index`.
    Advanced {
        review: AnswerReview,
        next_index: usize,
    },
    /// That was the last question; the interview is complete.
    Completed {
        review: AnswerReview,
        final_score: f64,
        summary: String,
    },
}

/// Mutable state behind the session handle. Locked only for synchronous
/// windows, never across a collaborator call.
struct SessionState {
    context: SessionContext,
    timer: QuestionTimer,
    draft: String,
    submitting: bool,
}

/// Everything a scoring call needs once the answer is locked in.
struct PendingSubmission {
    interview_id: String,
    index: usize,
    question_text: String,
    answer: String,
    difficulty: Difficulty,
    last: bool,
}

/// The interview session state machine.
///
/// Coordinates the question set, the countdown, the scoring collaborator
/// and the durable snapshot. There is at most one interview being driven
/// at a time; the full map of attempts lives in the repository. The handle
/// is cheap to clone and every clone drives the same session.
///
/// Every mutation writes the interview back into the repository and then
/// writes the durable snapshot before returning (write-after-mutate).
#[derive(Clone)]
pub struct InterviewSession {
    state: Arc<Mutex<SessionState>>,
    interviews: InterviewRepository,
    candidates: CandidateDirectory,
    collaborator: Arc<dyn Collaborator>,
    store: Arc<dyn DurableStore>,
}

impl InterviewSession {
    pub fn new(collaborator: Arc<dyn Collaborator>, store: Arc<dyn DurableStore>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState {
                context: SessionContext::default(),
                timer: QuestionTimer::new(),
                draft: String::new(),
                submitting: false,
            })),
            interviews: InterviewRepository::new(),
            candidates: CandidateDirectory::new(),
            collaborator,
            store,
        }
    }

    /// Reloads both persisted collections. The timer and the
    /// current-interview pointer come back idle; `resume` re-activates a
    /// stored attempt.
    pub fn rehydrate(&self) -> Result<()> {
        if let Some(value) = self.store.get(INTERVIEWS_KEY)? {
            let interviews: std::collections::HashMap<String, Interview> =
                serde_json::from_value(value)
                    .map_err(|e| SessionError::Storage(format!("corrupt interview snapshot: {e}")))?;
            self.interviews.replace_all(interviews.into_values());
        }
        if let Some(value) = self.store.get(CANDIDATES_KEY)? {
            let candidates: Vec<Candidate> = serde_json::from_value(value)
                .map_err(|e| SessionError::Storage(format!("corrupt candidate snapshot: {e}")))?;
            self.candidates.replace_all(candidates);
        }
        info!(
            "💾 rehydrated {} interviews and {} candidates",
            self.interviews.len(),
            self.candidates.len()
        );
        Ok(())
    }

    pub fn interviews(&self) -> &InterviewRepository {
        &self.interviews
    }

    pub fn candidates(&self) -> &CandidateDirectory {
        &self.candidates
    }

    /// Snapshot of the interview the session is driving, fetched through
    /// the repository so it can never diverge from the stored entry.
    pub fn current_interview(&self) -> Option<Interview> {
        let id = {
            let state = self.state.lock();
            state.context.current_id().map(str::to_string)
        }?;
        self.interviews.get(&id)
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.state.lock().timer.remaining()
    }

    pub fn is_timer_active(&self) -> bool {
        self.state.lock().timer.is_active()
    }

    /// True while a scoring or summary call is in flight; the UI treats
    /// the session as busy and accepts no new submit.
    pub fn is_submitting(&self) -> bool {
        self.state.lock().submitting
    }

    /// Tracks what the candidate has typed so far, so a timeout can
    /// auto-submit it.
    pub fn update_draft(&self, text: &str) {
        self.state.lock().draft = text.to_string();
    }

    /// Starts a fresh attempt for `candidate_id`. The generated prompts
    /// are deep-copied into questions the interview owns exclusively.
    pub fn begin(&self, candidate_id: &str, generated: Vec<GeneratedQuestion>) -> Result<Interview> {
        if generated.is_empty() {
            return Err(SessionError::InvalidInput(
                "cannot begin an interview with no questions".to_string(),
            ));
        }
        let questions: Vec<Question> = generated.into_iter().map(Question::from_generated).collect();
        if let Some(bad) = questions.iter().find(|q| q.time_limit == 0) {
            return Err(SessionError::InvalidInput(format!(
                "question {} has no time budget",
                bad.id
            )));
        }

        let interview = Interview::new(candidate_id, questions);
        let first_limit = interview.questions[0].time_limit;

        {
            let mut state = self.state.lock();
            state.context.set(&interview.id);
            state.draft.clear();
            state.submitting = false;
            state.timer.start(first_limit);
        }
        self.interviews.upsert(interview.clone());
        self.persist()?;

        info!(
            "🎬 interview {} started for candidate {} ({} questions)",
            interview.id,
            candidate_id,
            interview.questions.len()
        );
        Ok(interview)
    }

    /// Generates a question set for `role` and begins with it. An error or
    /// an empty set means the interview cannot begin; no attempt is
    /// created.
    pub async fn begin_for_role(&self, candidate_id: &str, role: &str) -> Result<Interview> {
        let generated = self.collaborator.generate_questions(role).await?;
        if generated.is_empty() {
            return Err(SessionError::CollaboratorUnavailable(
                "question generation returned no questions".to_string(),
            ));
        }
        self.begin(candidate_id, generated)
    }

    /// Records the candidate's answer for the active question, has the
    /// collaborator score it, then advances or completes the interview.
    ///
    /// First caller wins the race against `time_expired`; a concurrent
    /// call for the same index is rejected with `AlreadySubmitting`, never
    /// queued.
    pub async fn submit_answer(&self, answer: &str, time_spent: u32) -> Result<SubmitOutcome> {
        let pending = self.begin_submission(answer, time_spent)?;
        self.finish_submission(pending).await
    }

    /// Timer-expiry path: auto-submits whatever was typed, or the
    /// placeholder when the draft is blank, charging the full time limit.
    pub async fn time_expired(&self) -> Result<SubmitOutcome> {
        let draft = {
            let state = self.state.lock();
            state.draft.trim().to_string()
        };
        let answer = if draft.is_empty() {
            AUTO_SUBMIT_PLACEHOLDER.to_string()
        } else {
            draft
        };
        let limit = self
            .current_interview()
            .and_then(|i| i.current_question().map(|q| q.time_limit))
            .unwrap_or(0);
        self.submit_answer(&answer, limit).await
    }

    /// Drives the countdown; call once per scheduled second. When the
    /// clock reaches zero this auto-submits via `time_expired`. Ticks
    /// while idle or while a submission is in flight are no-ops.
    pub async fn tick(&self) -> Result<Option<SubmitOutcome>> {
        let fired = {
            let mut state = self.state.lock();
            matches!(state.timer.tick(), TimerTick::Expired)
        };
        if !fired {
            return Ok(None);
        }
        self.time_expired().await.map(Some)
    }

    /// Spawns the wall-clock tick driver: one `tick` per second until the
    /// returned handle is aborted. Kept out of the state machine itself so
    /// tests can advance time synthetically instead.
    pub fn spawn_ticker(&self) -> tokio::task::JoinHandle<()> {
        let session = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if let Err(e) = session.tick().await {
                    // Tick errors indicate a broken invariant.
                    error!("❌ timer tick failed: {e}");
                }
            }
        })
    }

    /// Completes the current interview once every question is answered.
    /// Normally driven internally by the last submission; calling it again
    /// on a completed interview is rejected.
    pub async fn finalize(&self) -> Result<(f64, String)> {
        let interview = self.current_interview().ok_or_else(|| {
            SessionError::InvalidState("no interview is in progress".to_string())
        })?;
        if interview.status == InterviewStatus::Completed {
            return Err(SessionError::InvalidState(
                "interview is already completed".to_string(),
            ));
        }
        {
            let state = self.state.lock();
            if state.submitting {
                return Err(SessionError::AlreadySubmitting(
                    interview.current_question_index,
                ));
            }
        }
        if interview.questions.iter().any(|q| !q.answered) {
            return Err(SessionError::InvalidState(
                "not every question has been answered".to_string(),
            ));
        }
        self.complete_interview(&interview.id).await
    }

    /// Makes a stored in-progress attempt current again and re-arms the
    /// timer with the active question's full time limit. Time already
    /// spent before the reload is deliberately not reconstructed.
    pub fn resume(&self, interview_id: &str) -> Result<Interview> {
        let interview = self
            .interviews
            .get(interview_id)
            .ok_or_else(|| SessionError::NotFound(interview_id.to_string()))?;
        if interview.status != InterviewStatus::InProgress {
            return Err(SessionError::NotFound(format!(
                "interview {interview_id} is already completed"
            )));
        }
        let limit = interview
            .current_question()
            .map(|q| q.time_limit)
            .ok_or_else(|| {
                SessionError::InvalidState(format!(
                    "interview {interview_id} has no active question"
                ))
            })?;

        {
            let mut state = self.state.lock();
            state.context.set(interview_id);
            state.draft.clear();
            state.submitting = false;
            state.timer.start(limit);
        }
        info!(
            "▶️ interview {} resumed at question {}",
            interview_id,
            interview.current_question_index + 1
        );
        Ok(interview)
    }

    /// Locks in the answer and claims the in-flight slot. Everything here
    /// is synchronous and atomic under the state lock.
    fn begin_submission(&self, answer: &str, time_spent: u32) -> Result<PendingSubmission> {
        let mut state = self.state.lock();
        let id = state
            .context
            .current_id()
            .map(str::to_string)
            .ok_or_else(|| {
                SessionError::InvalidState("no interview is in progress".to_string())
            })?;
        let mut interview = self
            .interviews
            .get(&id)
            .ok_or_else(|| SessionError::NotFound(id.clone()))?;

        if interview.status == InterviewStatus::Completed {
            return Err(SessionError::InvalidState(
                "interview is already completed".to_string(),
            ));
        }
        let index = interview.current_question_index;
        if state.submitting {
            return Err(SessionError::AlreadySubmitting(index));
        }
        if interview.questions[index].answered {
            return Err(SessionError::InvalidState(format!(
                "question {} was already answered",
                interview.questions[index].id
            )));
        }

        // The answered flip is final; nothing may rewrite these fields.
        state.timer.stop();
        let last = index + 1 == interview.questions.len();
        let (question_text, difficulty) = {
            let question = &mut interview.questions[index];
            question.answer = answer.to_string();
            question.time_spent = time_spent.min(question.time_limit);
            question.answered = true;
            (question.question.clone(), question.difficulty)
        };
        state.submitting = true;
        state.draft.clear();

        let pending = PendingSubmission {
            interview_id: id,
            index,
            question_text,
            answer: answer.to_string(),
            difficulty,
            last,
        };
        drop(state);

        self.interviews.upsert(interview);
        if let Err(e) = self.persist() {
            // Release the in-flight slot; the answer itself is recorded.
            self.state.lock().submitting = false;
            return Err(e);
        }
        Ok(pending)
    }

    /// Scores the locked-in answer, then advances or completes. The
    /// scoring call happens outside the lock; the session stays busy via
    /// the submitting flag until it resolves or fails.
    async fn finish_submission(&self, pending: PendingSubmission) -> Result<SubmitOutcome> {
        let scored = self
            .collaborator
            .score_answer(&pending.question_text, &pending.answer, pending.difficulty)
            .await;

        let review = match scored {
            Ok(result) => AnswerReview {
                question_index: pending.index,
                score: Some(result.score.min(10)),
                feedback: Some(result.feedback),
            },
            Err(e) => {
                // Availability over consistency: the answer stays recorded
                // and unscored, the session keeps moving.
                warn!(
                    "⚠️ scoring unavailable for question {} of {}: {e}",
                    pending.index + 1,
                    pending.interview_id
                );
                AnswerReview {
                    question_index: pending.index,
                    score: None,
                    feedback: None,
                }
            }
        };

        let mut interview = self
            .interviews
            .get(&pending.interview_id)
            .ok_or_else(|| SessionError::NotFound(pending.interview_id.clone()))?;
        {
            let question = &mut interview.questions[pending.index];
            if question.score.is_none() {
                if let Some(score) = review.score {
                    question.score = Some(score);
                    question.feedback = review.feedback.clone().unwrap_or_default();
                }
            }
        }

        if !pending.last {
            let next_index = pending.index + 1;
            let next_limit = interview.questions[next_index].time_limit;
            interview.current_question_index = next_index;
            self.interviews.upsert(interview);
            {
                let mut state = self.state.lock();
                state.timer.start(next_limit);
                state.submitting = false;
            }
            self.persist()?;
            info!(
                "➡️ interview {} advanced to question {}",
                pending.interview_id,
                next_index + 1
            );
            return Ok(SubmitOutcome::Advanced { review, next_index });
        }

        self.interviews.upsert(interview);
        let (final_score, summary) = self.complete_interview(&pending.interview_id).await?;
        Ok(SubmitOutcome::Completed {
            review,
            final_score,
            summary,
        })
    }

    /// Aggregates the scores, asks for a summary, and flips the interview
    /// to completed, a one-way transition. The result is also copied onto
    /// the candidate record.
    async fn complete_interview(&self, interview_id: &str) -> Result<(f64, String)> {
        let interview = self
            .interviews
            .get(interview_id)
            .ok_or_else(|| SessionError::NotFound(interview_id.to_string()))?;

        let final_score = interview.aggregate_score();
        let answered: Vec<Question> = interview
            .questions
            .iter()
            .filter(|q| q.answered)
            .cloned()
            .collect();

        let summary = match self.candidates.get(&interview.candidate_id) {
            Some(candidate) => self
                .collaborator
                .generate_summary(&candidate, &answered)
                .await
                .unwrap_or_else(|e| {
                    warn!("⚠️ summary unavailable for {interview_id}: {e}");
                    SUMMARY_UNAVAILABLE.to_string()
                }),
            None => {
                warn!(
                    "⚠️ candidate {} not found; skipping summary call",
                    interview.candidate_id
                );
                SUMMARY_UNAVAILABLE.to_string()
            }
        };

        let mut interview = self
            .interviews
            .get(interview_id)
            .ok_or_else(|| SessionError::NotFound(interview_id.to_string()))?;
        interview.status = InterviewStatus::Completed;
        interview.completed_at = Some(Utc::now());
        interview.final_score = Some(final_score);
        interview.summary = Some(summary.clone());
        let candidate_id = interview.candidate_id.clone();
        self.interviews.upsert(interview);
        self.candidates.record_result(&candidate_id, final_score, &summary);

        {
            let mut state = self.state.lock();
            state.timer.stop();
            state.submitting = false;
        }
        self.persist()?;

        info!("🏁 interview {interview_id} completed with final score {final_score}");
        Ok((final_score, summary))
    }

    /// Durability boundary: both whitelisted collections, written after
    /// the in-memory mutation they capture.
    fn persist(&self) -> Result<()> {
        let interviews = serde_json::to_value(self.interviews.snapshot())
            .map_err(|e| SessionError::Storage(format!("cannot encode interviews: {e}")))?;
        self.store.put(INTERVIEWS_KEY, &interviews)?;

        let candidates = serde_json::to_value(self.candidates.list())
            .map_err(|e| SessionError::Storage(format!("cannot encode candidates: {e}")))?;
        self.store.put(CANDIDATES_KEY, &candidates)?;
        Ok(())
    }
}
