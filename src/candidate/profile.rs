use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{Result, SessionError};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap()
});
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap()
});
static EXPERIENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\d+\+?\s*(years|year|experience)").unwrap());
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-zÀ-ÖØ-öø-ÿ\s.'\-]+$").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
// Longest headings first so "technical skills" is not swallowed by "skills".
static SKILLS_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(programming languages|technical skills|technologies|skills)").unwrap()
});

/// Lines that look like résumé boilerplate rather than a person's name.
const NAME_EXCLUDE_KEYWORDS: &[&str] = &[
    "resume",
    "cv",
    "curriculum vitae",
    "email",
    "phone",
    "address",
    "@",
];

/// How far past a skills heading we look for a comma/bullet list.
const SKILLS_WINDOW_CHARS: usize = 200;

/// Contact details and skills pulled out of plain résumé text.
///
/// Binary PDF/DOCX decoding happens upstream; this only sees text.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    #[validate(length(min = 2, message = "name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "a valid email address is required"))]
    pub email: String,
    #[validate(length(min = 10, message = "a valid phone number is required"))]
    pub phone: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: String,
    pub parsed_at: DateTime<Utc>,
}

impl CandidateProfile {
    /// Validation gate for intake: collapses field errors into one
    /// `InvalidInput` so callers report a single message.
    pub fn ensure_valid(&self) -> Result<()> {
        self.validate().map_err(|errors| {
            let messages: Vec<String> = errors
                .field_errors()
                .values()
                .flat_map(|list| list.iter())
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .collect();
            SessionError::InvalidInput(messages.join("; "))
        })
    }
}

/// Extracts a candidate profile from raw résumé text.
pub fn extract_profile(text: &str) -> CandidateProfile {
    let clean = WHITESPACE_RE.replace_all(text, " ").trim().to_string();

    CandidateProfile {
        name: extract_name(text),
        email: extract_email(&clean),
        phone: extract_phone(&clean),
        skills: extract_skills(&clean),
        experience: extract_experience(&clean),
        parsed_at: Utc::now(),
    }
}

fn extract_email(clean: &str) -> String {
    EMAIL_RE
        .find(clean)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Phone numbers come in every format; keep the digits and, for numbers
/// with a country prefix, only the trailing 10.
fn extract_phone(clean: &str) -> String {
    let Some(found) = PHONE_RE.find(clean) else {
        return String::new();
    };
    let digits: String = found.as_str().chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() > 10 {
        digits.chars().skip(digits.len() - 10).collect()
    } else {
        digits
    }
}

/// The name is usually one of the first lines: short, alphabetic, and not
/// boilerplate like "Curriculum Vitae" or a contact row.
fn extract_name(text: &str) -> String {
    text.lines()
        .take(10)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .find(|line| {
            let lower = line.to_lowercase();
            line.chars().count() > 2
                && line.chars().count() < 50
                && !NAME_EXCLUDE_KEYWORDS.iter().any(|kw| lower.contains(kw))
                && !line.chars().next().is_some_and(|c| c.is_ascii_digit())
                && NAME_RE.is_match(line)
        })
        .unwrap_or_default()
        .to_string()
}

fn extract_skills(clean: &str) -> Vec<String> {
    let Some(heading) = SKILLS_HEADING_RE.find(clean) else {
        return Vec::new();
    };
    let window: String = clean[heading.end()..]
        .chars()
        .take(SKILLS_WINDOW_CHARS)
        .collect();

    window
        .split(|c| matches!(c, ',' | '\n' | '•' | '·'))
        .map(|s| s.trim().trim_start_matches(':').trim())
        .filter(|s| s.chars().count() > 1)
        .map(str::to_string)
        .collect()
}

fn extract_experience(clean: &str) -> String {
    EXPERIENCE_RE
        .find(clean)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESUME: &str = "\
Jane Smith
Senior Backend Engineer
Email: jane.smith@example.com
Phone: +1 (415) 555-0123
7+ years experience building distributed systems.

Technical Skills: Rust, PostgreSQL, Kafka, Kubernetes

Previously at Acme Corp.";

    #[test]
    fn test_extracts_contact_fields() {
        let profile = extract_profile(SAMPLE_RESUME);
        assert_eq!(profile.name, "Jane Smith");
        assert_eq!(profile.email, "jane.smith@example.com");
        assert_eq!(profile.phone, "4155550123");
        assert_eq!(profile.experience, "7+ years");
    }

    #[test]
    fn test_extracts_skills_after_heading() {
        let profile = extract_profile(SAMPLE_RESUME);
        assert!(profile.skills.contains(&"Rust".to_string()));
        assert!(profile.skills.contains(&"PostgreSQL".to_string()));
        assert!(profile.skills.contains(&"Kafka".to_string()));
    }

    #[test]
    fn test_skips_boilerplate_lines_for_name() {
        let text = "Curriculum Vitae\n2024 edition\nJohn Q. O'Brien\njq@example.org";
        let profile = extract_profile(text);
        assert_eq!(profile.name, "John Q. O'Brien");
    }

    #[test]
    fn test_missing_fields_come_back_empty() {
        let profile = extract_profile("completely unrelated text with no contacts");
        assert!(profile.email.is_empty());
        assert!(profile.phone.is_empty());
        assert!(profile.skills.is_empty());
    }

    #[test]
    fn test_domestic_phone_keeps_all_ten_digits() {
        let profile = extract_profile("Reach me at 415-555-0123 anytime");
        assert_eq!(profile.phone, "4155550123");
    }

    #[test]
    fn test_validation_rejects_incomplete_profile() {
        let profile = extract_profile("no useful fields here");
        assert!(profile.ensure_valid().is_err());
    }

    #[test]
    fn test_validation_accepts_complete_profile() {
        let profile = extract_profile(SAMPLE_RESUME);
        profile.ensure_valid().expect("sample profile should validate");
    }
}
