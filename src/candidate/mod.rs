pub mod profile;

pub use profile::{extract_profile, CandidateProfile};

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::info;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateStatus {
    Active,
    Completed,
}

/// One applicant profile, with a lifecycle independent of any interview
/// attempt. After an interview completes, the final score and summary are
/// copied here for dashboard display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: String,
    pub created_at: DateTime<Utc>,
    pub status: CandidateStatus,
    #[serde(default)]
    pub final_score: Option<f64>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub interview_completed_at: Option<DateTime<Utc>>,
}

impl Candidate {
    pub fn from_profile(profile: CandidateProfile) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: profile.name,
            email: profile.email,
            phone: profile.phone,
            skills: profile.skills,
            experience: profile.experience,
            created_at: Utc::now(),
            status: CandidateStatus::Active,
            final_score: None,
            summary: None,
            interview_completed_at: None,
        }
    }
}

/// Shared directory of candidate records.
///
/// Deleting a candidate is an explicit interviewer action and detaches,
/// never cascades into, the candidate's interview records.
#[derive(Clone, Default)]
pub struct CandidateDirectory {
    inner: Arc<Mutex<HashMap<String, Candidate>>>,
}

impl CandidateDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the extracted profile and registers a new candidate,
    /// returning the stored record.
    pub fn admit(&self, profile: CandidateProfile) -> Result<Candidate> {
        profile.ensure_valid()?;
        let candidate = Candidate::from_profile(profile);
        info!("👤 candidate {} admitted ({})", candidate.id, candidate.name);
        self.inner
            .lock()
            .insert(candidate.id.clone(), candidate.clone());
        Ok(candidate)
    }

    pub fn insert(&self, candidate: Candidate) {
        self.inner
            .lock()
            .insert(candidate.id.clone(), candidate);
    }

    pub fn get(&self, id: &str) -> Option<Candidate> {
        self.inner.lock().get(id).cloned()
    }

    /// Copies a finished interview's result onto the candidate for
    /// dashboard display and marks the record completed. Returns false if
    /// the candidate was deleted mid-interview.
    pub fn record_result(&self, id: &str, final_score: f64, summary: &str) -> bool {
        let mut map = self.inner.lock();
        match map.get_mut(id) {
            Some(candidate) => {
                candidate.final_score = Some(final_score);
                candidate.summary = Some(summary.to_string());
                candidate.interview_completed_at = Some(Utc::now());
                candidate.status = CandidateStatus::Completed;
                true
            }
            None => false,
        }
    }

    /// Explicit deletion; the candidate's interviews stay in the interview
    /// map, now detached.
    pub fn delete(&self, id: &str) -> bool {
        self.inner.lock().remove(id).is_some()
    }

    pub fn list(&self) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = self.inner.lock().values().cloned().collect();
        candidates.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        candidates
    }

    pub fn replace_all(&self, candidates: impl IntoIterator<Item = Candidate>) {
        let mut map = self.inner.lock();
        map.clear();
        for candidate in candidates {
            map.insert(candidate.id.clone(), candidate);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> CandidateProfile {
        CandidateProfile {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "4155550123".to_string(),
            skills: vec!["Rust".to_string()],
            experience: "5 years".to_string(),
            parsed_at: Utc::now(),
        }
    }

    #[test]
    fn test_admit_assigns_id_and_active_status() {
        let directory = CandidateDirectory::new();
        let candidate = directory.admit(profile("Ada")).unwrap();

        assert!(!candidate.id.is_empty());
        assert_eq!(candidate.status, CandidateStatus::Active);
        assert!(candidate.final_score.is_none());
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn test_admit_rejects_invalid_profile() {
        let directory = CandidateDirectory::new();
        let mut bad = profile("X");
        bad.name = "X".to_string();
        assert!(directory.admit(bad).is_err());
        assert!(directory.is_empty());
    }

    #[test]
    fn test_record_result_copies_interview_outcome() {
        let directory = CandidateDirectory::new();
        let candidate = directory.admit(profile("Grace")).unwrap();

        assert!(directory.record_result(&candidate.id, 7.8, "Strong performance."));

        let stored = directory.get(&candidate.id).unwrap();
        assert_eq!(stored.final_score, Some(7.8));
        assert_eq!(stored.summary.as_deref(), Some("Strong performance."));
        assert_eq!(stored.status, CandidateStatus::Completed);
        assert!(stored.interview_completed_at.is_some());
    }

    #[test]
    fn test_delete_removes_only_the_candidate() {
        let directory = CandidateDirectory::new();
        let candidate = directory.admit(profile("Linus")).unwrap();

        assert!(directory.delete(&candidate.id));
        assert!(!directory.delete(&candidate.id));
        assert!(directory.get(&candidate.id).is_none());
    }
}
