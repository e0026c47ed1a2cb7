//! Per-session quiz state.
//!
//! The original tool kept the live quiz in ambient UI session state; here it
//! is an explicit store owned by the request handlers, with get/set/clear as
//! the only operations. One `QuizRecord` per session id; the record and its
//! selection are always replaced or discarded together, never partially.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::domain::{Grading, QuizRecord};

#[derive(Clone, Default)]
pub struct SessionStore {
    records: Arc<RwLock<HashMap<String, QuizRecord>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the session's current quiz, if any.
    #[instrument(level = "debug", skip(self), fields(%session_id))]
    pub async fn get(&self, session_id: &str) -> Option<QuizRecord> {
        self.records.read().await.get(session_id).cloned()
    }

    /// Install a freshly decoded quiz for this session, replacing (and fully
    /// discarding) whatever was there before.
    #[instrument(level = "debug", skip(self, record), fields(%session_id))]
    pub async fn set(&self, session_id: &str, record: QuizRecord) {
        self.records.write().await.insert(session_id.to_string(), record);
        debug!(target: "quiz", %session_id, "Quiz record installed");
    }

    /// Drop the session's quiz and any recorded selection together.
    #[instrument(level = "debug", skip(self), fields(%session_id))]
    pub async fn clear(&self, session_id: &str) {
        if self.records.write().await.remove(session_id).is_some() {
            debug!(target: "quiz", %session_id, "Quiz record cleared");
        }
    }

    /// Record the user's selection on the session's active quiz and grade it.
    /// Fails when the session has no active quiz, the key is unknown, or a
    /// different selection was already recorded.
    #[instrument(level = "debug", skip(self), fields(%session_id, %key))]
    pub async fn select(&self, session_id: &str, key: &str) -> Result<Grading, String> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(session_id)
            .ok_or_else(|| "No active quiz for this session. Start a new question first.".to_string())?;
        record.select(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QuizOption;
    use std::collections::HashMap as Map;

    fn record(answer: &str) -> QuizRecord {
        QuizRecord {
            scene: "场景".into(),
            question: "问题".into(),
            options: vec![
                QuizOption { key: "A".into(), label: "工厂方法模式".into() },
                QuizOption { key: "B".into(), label: "单例模式".into() },
                QuizOption { key: "C".into(), label: "原型模式".into() },
            ],
            answer: answer.into(),
            explanation: Map::from([("correct".to_string(), "解析".to_string())]),
            selected: None,
        }
    }

    #[tokio::test]
    async fn set_get_clear_lifecycle() {
        let store = SessionStore::new();
        assert!(store.get("s1").await.is_none());

        store.set("s1", record("A")).await;
        assert_eq!(store.get("s1").await.expect("record").answer, "A");

        store.clear("s1").await;
        assert!(store.get("s1").await.is_none());
    }

    #[tokio::test]
    async fn replacing_a_record_discards_the_prior_selection() {
        let store = SessionStore::new();
        store.set("s1", record("A")).await;
        store.select("s1", "B").await.expect("selection");
        assert_eq!(store.get("s1").await.expect("record").selected.as_deref(), Some("B"));

        store.set("s1", record("C")).await;
        let fresh = store.get("s1").await.expect("record");
        assert_eq!(fresh.selected, None);
        assert_eq!(fresh.answer, "C");
    }

    #[tokio::test]
    async fn select_without_an_active_quiz_fails() {
        let store = SessionStore::new();
        let err = store.select("nobody", "A").await.expect_err("must fail");
        assert!(err.contains("No active quiz"));
    }

    #[tokio::test]
    async fn selection_sticks_across_calls() {
        let store = SessionStore::new();
        store.set("s1", record("B")).await;
        let first = store.select("s1", "B").await.expect("grading");
        assert!(first.correct);

        assert!(store.select("s1", "A").await.is_err());
        let again = store.select("s1", "B").await.expect("idempotent");
        assert!(again.correct);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = SessionStore::new();
        store.set("s1", record("A")).await;
        store.set("s2", record("B")).await;
        store.clear("s1").await;
        assert!(store.get("s1").await.is_none());
        assert_eq!(store.get("s2").await.expect("record").answer, "B");
    }
}
