use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use log::{error, info};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::interview::{Difficulty, GeneratedQuestion};

use super::groq::{extract_json_array, extract_json_object, strip_code_fences};
use super::AppState;

type JsonError = (StatusCode, Json<Value>);

fn upstream_error(message: &str) -> JsonError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
}

/// GET /api/health: liveness probe, success with no body.
pub async fn health() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Deserialize)]
pub struct GenerateQuestionsRequest {
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "Full-Stack Developer".to_string()
}

/// The question shape the model is asked for; ids and time limits are
/// assigned here, not trusted from the model.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    question: String,
    #[serde(default)]
    difficulty: Option<Difficulty>,
    #[serde(default)]
    correct_answer: String,
}

/// POST /api/generate-questions: six questions for the role, two per
/// difficulty, ids assigned by position and time limits derived from
/// difficulty.
pub async fn generate_questions(
    State(state): State<AppState>,
    Json(request): Json<GenerateQuestionsRequest>,
) -> Result<Json<Vec<GeneratedQuestion>>, JsonError> {
    let prompt = format!(
        "Generate 6 interview questions for a {} role (2 easy, 2 medium, 2 hard). \
         Return ONLY a JSON array with objects: \
         {{\"question\":\"...\",\"difficulty\":\"easy|medium|hard\",\"correctAnswer\":\"...\"}}. \
         No extra text.",
        request.role
    );

    let content = state.groq.complete(&prompt).await.map_err(|e| {
        error!("question generation failed: {e}");
        upstream_error("Failed to generate questions")
    })?;

    let cleaned = strip_code_fences(&content);
    // The model occasionally ignores the JSON-only instruction; fall back
    // to a single raw-text question rather than failing the interview.
    let parsed: Vec<RawQuestion> = extract_json_array(&cleaned)
        .and_then(|window| serde_json::from_str(window).ok())
        .unwrap_or_else(|| {
            vec![RawQuestion {
                question: cleaned.clone(),
                difficulty: None,
                correct_answer: String::new(),
            }]
        });

    let questions: Vec<GeneratedQuestion> = parsed
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let difficulty = raw.difficulty.unwrap_or(Difficulty::Medium);
            GeneratedQuestion {
                id: index as u32 + 1,
                question: raw.question,
                difficulty,
                correct_answer: raw.correct_answer,
                time_limit: difficulty.time_limit(),
            }
        })
        .collect();

    info!(
        "🤖 generated {} questions for role: {}",
        questions.len(),
        request.role
    );
    Ok(Json(questions))
}

#[derive(Debug, Deserialize)]
pub struct ScoreAnswerRequest {
    pub question: String,
    pub answer: String,
    pub difficulty: String,
}

/// POST /api/score-answer: 0-10 score plus feedback for one answer, with
/// a timestamp stamped on the way out.
pub async fn score_answer(
    State(state): State<AppState>,
    Json(request): Json<ScoreAnswerRequest>,
) -> Result<Json<Value>, JsonError> {
    let prompt = format!(
        "Question: {}\nAnswer: {}\nDifficulty: {}\n\
         Score 0-10 and provide feedback in JSON: \
         {{\"score\": number,\"feedback\":\"text\"}}. Return ONLY JSON.",
        request.question, request.answer, request.difficulty
    );

    let content = state.groq.complete(&prompt).await.map_err(|e| {
        error!("answer scoring failed: {e}");
        upstream_error("Failed to score answer")
    })?;

    // Unparseable verdicts degrade to a neutral score with the raw text
    // as feedback.
    let mut verdict: Value = extract_json_object(&content)
        .and_then(|window| serde_json::from_str(window).ok())
        .filter(Value::is_object)
        .unwrap_or_else(|| json!({ "score": 5, "feedback": content }));
    verdict["timestamp"] = json!(Utc::now());

    Ok(Json(verdict))
}

#[derive(Debug, Deserialize)]
pub struct GenerateSummaryRequest {
    pub candidate: Option<Value>,
    #[serde(default)]
    pub answers: Value,
}

/// POST /api/generate-summary: plain-text performance summary over the
/// answered questions. 400 without candidate data.
pub async fn generate_summary(
    State(state): State<AppState>,
    Json(request): Json<GenerateSummaryRequest>,
) -> Result<String, (StatusCode, String)> {
    let Some(candidate) = request.candidate else {
        return Err((
            StatusCode::BAD_REQUEST,
            "Candidate data is required".to_string(),
        ));
    };

    let name = candidate["name"].as_str().unwrap_or("Unknown");
    let email = candidate["email"].as_str().unwrap_or("unknown");
    let prompt = format!(
        "Candidate: {name} ({email})\nAnswers: {}\n\
         Provide a concise summary of the candidate's performance. \
         Return only plain text.",
        request.answers
    );

    let content = state.groq.complete(&prompt).await.map_err(|e| {
        error!("summary generation failed: {e}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to generate summary".to_string(),
        )
    })?;

    Ok(strip_code_fences(&content))
}
