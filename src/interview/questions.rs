use serde::{Deserialize, Serialize};

/// Per-question difficulty; drives the countdown budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Seconds allotted for one question of this difficulty.
    pub fn time_limit(self) -> u32 {
        match self {
            Difficulty::Easy => 20,
            Difficulty::Medium => 60,
            Difficulty::Hard => 120,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Wire shape produced by the question-generation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    /// 1-based position within the generated set.
    pub id: u32,
    pub question: String,
    pub difficulty: Difficulty,
    /// Reference answer from the generator, kept for review screens.
    #[serde(default)]
    pub correct_answer: String,
    /// Seconds allotted; 0 means "derive from difficulty".
    #[serde(default)]
    pub time_limit: u32,
}

/// One prompt in an interview's Question Set, together with the candidate's
/// progress against it.
///
/// `answered` flips false -> true at most once; `score` and `feedback` are
/// written at most once, in the same transition as or after that flip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u32,
    pub question: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub correct_answer: String,
    pub time_limit: u32,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub score: Option<u8>,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub time_spent: u32,
    #[serde(default)]
    pub answered: bool,
}

impl Question {
    /// Deep-copies a generated prompt into a fresh, unanswered question
    /// owned by the interview.
    pub fn from_generated(generated: GeneratedQuestion) -> Self {
        let time_limit = if generated.time_limit > 0 {
            generated.time_limit
        } else {
            generated.difficulty.time_limit()
        };
        Self {
            id: generated.id,
            question: generated.question,
            difficulty: generated.difficulty,
            correct_answer: generated.correct_answer,
            time_limit,
            answer: String::new(),
            score: None,
            feedback: String::new(),
            time_spent: 0,
            answered: false,
        }
    }
}
