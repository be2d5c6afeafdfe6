use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::candidate::Candidate;
use crate::error::{Result, SessionError};
use crate::interview::{Difficulty, GeneratedQuestion, Question};

/// Substituted when the summary collaborator fails; the interview still
/// completes.
pub const SUMMARY_UNAVAILABLE: &str = "Summary unavailable at this time.";

/// What the scoring collaborator produced for one answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub score: u8,
    pub feedback: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// External question-generation / scoring / summary service, behind a
/// trait so the session can run against a scripted stand-in in tests.
///
/// None of these calls is retried or cancelled by the session; timeouts
/// are the HTTP layer's concern.
#[async_trait]
pub trait Collaborator: Send + Sync {
    /// Ordered question set for one role. An empty set means the interview
    /// cannot begin.
    async fn generate_questions(&self, role: &str) -> Result<Vec<GeneratedQuestion>>;

    /// 0-10 score plus feedback for a single answer.
    async fn score_answer(
        &self,
        question: &str,
        answer: &str,
        difficulty: Difficulty,
    ) -> Result<ScoreResult>;

    /// Plain-text performance summary over the answered questions.
    async fn generate_summary(&self, candidate: &Candidate, answers: &[Question])
        -> Result<String>;
}

/// reqwest-backed collaborator speaking the JSON endpoints. No auth, no
/// pagination; failures surface as `CollaboratorUnavailable` and the
/// session decides how to degrade.
pub struct HttpCollaborator {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCollaborator {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, operation: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), operation)
    }

    async fn post_json(&self, operation: &str, body: serde_json::Value) -> Result<reqwest::Response> {
        let url = self.endpoint(operation);
        debug!("calling collaborator: {url}");
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                SessionError::CollaboratorUnavailable(format!("{operation} request failed: {e}"))
            })?;
        if !response.status().is_success() {
            return Err(SessionError::CollaboratorUnavailable(format!(
                "{operation} returned {}",
                response.status()
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl Collaborator for HttpCollaborator {
    async fn generate_questions(&self, role: &str) -> Result<Vec<GeneratedQuestion>> {
        let response = self
            .post_json("generate-questions", json!({ "role": role }))
            .await?;
        response.json().await.map_err(|e| {
            SessionError::CollaboratorUnavailable(format!("malformed question set: {e}"))
        })
    }

    async fn score_answer(
        &self,
        question: &str,
        answer: &str,
        difficulty: Difficulty,
    ) -> Result<ScoreResult> {
        let response = self
            .post_json(
                "score-answer",
                json!({
                    "question": question,
                    "answer": answer,
                    "difficulty": difficulty,
                }),
            )
            .await?;
        response.json().await.map_err(|e| {
            SessionError::CollaboratorUnavailable(format!("malformed score result: {e}"))
        })
    }

    async fn generate_summary(
        &self,
        candidate: &Candidate,
        answers: &[Question],
    ) -> Result<String> {
        let response = self
            .post_json(
                "generate-summary",
                json!({ "candidate": candidate, "answers": answers }),
            )
            .await?;
        response.text().await.map_err(|e| {
            SessionError::CollaboratorUnavailable(format!("malformed summary: {e}"))
        })
    }
}
