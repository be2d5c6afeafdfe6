use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{Interview, InterviewStatus};

/// Shared map of every interview the process knows about, keyed by id.
///
/// The session is the only writer. Reads always fetch through here, so the
/// "current interview" alias can never drift from the stored entry.
#[derive(Clone, Default)]
pub struct InterviewRepository {
    inner: Arc<Mutex<HashMap<String, Interview>>>,
}

impl InterviewRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<Interview> {
        self.inner.lock().get(id).cloned()
    }

    pub fn upsert(&self, interview: Interview) {
        self.inner
            .lock()
            .insert(interview.id.clone(), interview);
    }

    pub fn list_by_status(&self, status: InterviewStatus) -> Vec<Interview> {
        self.inner
            .lock()
            .values()
            .filter(|i| i.status == status)
            .cloned()
            .collect()
    }

    /// Full snapshot keyed by id, in the shape the durable store persists.
    pub fn snapshot(&self) -> HashMap<String, Interview> {
        self.inner.lock().clone()
    }

    /// Drops the current contents and installs a rehydrated snapshot.
    pub fn replace_all(&self, interviews: impl IntoIterator<Item = Interview>) {
        let mut map = self.inner.lock();
        map.clear();
        for interview in interviews {
            map.insert(interview.id.clone(), interview);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

/// Transient pointer to the interview the session is actively driving.
/// Never persisted; reconstructed as empty on reload and re-established by
/// `resume`.
#[derive(Debug, Default)]
pub struct SessionContext {
    current: Option<String>,
}

impl SessionContext {
    pub fn set(&mut self, id: impl Into<String>) {
        self.current = Some(id.into());
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::{Difficulty, GeneratedQuestion, Question};

    fn interview(candidate: &str) -> Interview {
        Interview::new(
            candidate,
            vec![Question::from_generated(GeneratedQuestion {
                id: 1,
                question: "Tell me about yourself.".to_string(),
                difficulty: Difficulty::Easy,
                correct_answer: String::new(),
                time_limit: 0,
            })],
        )
    }

    #[test]
    fn test_upsert_then_get_round_trips() {
        let repo = InterviewRepository::new();
        let stored = interview("cand-1");
        let id = stored.id.clone();
        repo.upsert(stored);

        let fetched = repo.get(&id).expect("interview should be present");
        assert_eq!(fetched.id, id);
        assert_eq!(fetched.candidate_id, "cand-1");
    }

    #[test]
    fn test_list_by_status_filters() {
        let repo = InterviewRepository::new();
        let mut done = interview("cand-done");
        done.status = InterviewStatus::Completed;
        repo.upsert(done);
        repo.upsert(interview("cand-open"));

        let open = repo.list_by_status(InterviewStatus::InProgress);
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].candidate_id, "cand-open");
    }

    #[test]
    fn test_replace_all_installs_snapshot() {
        let repo = InterviewRepository::new();
        repo.upsert(interview("old"));
        repo.replace_all(vec![interview("a"), interview("b")]);
        assert_eq!(repo.len(), 2);
        assert!(repo
            .list_by_status(InterviewStatus::InProgress)
            .iter()
            .all(|i| i.candidate_id != "old"));
    }
}
