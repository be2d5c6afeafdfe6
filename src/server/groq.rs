use std::time::Duration;

use anyhow::{anyhow, Result};
use log::{debug, warn};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
/// Model used for every collaborator call.
pub const MODEL: &str = "llama-3.3-70b-versatile";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Thin Groq chat-completions client; one completion per collaborator
/// operation, no retries.
#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    api_key: String,
}

impl GroqClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, api_key }
    }

    /// Sends one user prompt and returns the assistant text, trimmed.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let body = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(GROQ_API_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Groq API returned {status}: {body}");
            return Err(anyhow!("Groq API returned {status}"));
        }

        let json: Value = response.json().await?;
        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow!("no content in Groq response"))?;

        debug!("Groq completion: {} chars", content.len());
        Ok(content.trim().to_string())
    }
}

/// Strips the markdown code fences the model sometimes wraps JSON in.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Cuts the first `[` .. last `]` window out of prose-wrapped LLM output.
pub fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end >= start).then(|| &text[start..=end])
}

/// Cuts the first `{` .. last `}` window.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end >= start).then(|| &text[start..=end])
}
