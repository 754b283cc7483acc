use serde::{Deserialize, Serialize};

use crate::{FeedEntryId, Timestamp, TopicId};

pub type SessionId = String;

/// A persisted content block shown in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    #[serde(default)]
    pub topic_id: Option<TopicId>,
    pub content: String,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub favorited: bool,
    /// Feed entry written together with this session, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_entry_id: Option<FeedEntryId>,
}

/// Newest-first session list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionLog {
    entries: Vec<Session>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<Session>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Session] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Session> {
        self.entries.iter().find(|session| session.id == id)
    }

    pub(crate) fn prepend(&mut self, session: Session) {
        self.entries.insert(0, session);
    }

    pub(crate) fn toggle_favorite(&mut self, id: &str) -> Option<bool> {
        let session = self.entries.iter_mut().find(|session| session.id == id)?;
        session.favorited = !session.favorited;
        Some(session.favorited)
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<Session> {
        let index = self.entries.iter().position(|session| session.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Drops every session owned by `topic_id`. Returns how many were removed.
    pub(crate) fn remove_for_topic(&mut self, topic_id: &str) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|session| session.topic_id.as_deref() != Some(topic_id));
        before - self.entries.len()
    }

    /// Sessions of one topic, oldest first.
    pub fn chronological_for_topic(&self, topic_id: &str) -> Vec<Session> {
        let mut owned: Vec<Session> = self
            .entries
            .iter()
            .rev()
            .filter(|session| session.topic_id.as_deref() == Some(topic_id))
            .cloned()
            .collect();
        owned.sort_by_key(|session| session.created_at);
        owned
    }
}
