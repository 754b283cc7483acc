//! Serializable record of the UI state, written under [`SNAPSHOT_KEY`].
use serde::{Deserialize, Serialize};

use crate::{FeedEntryId, FeedRole, Mode, Session, Tab, Timestamp, TopicId, TopicLists};

pub const SNAPSHOT_KEY: &str = "notes_ui_state_v1";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiSnapshot {
    #[serde(default)]
    pub topics: TopicLists,
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub selected_tags: Vec<String>,
    #[serde(default)]
    pub active_mode: Mode,
    #[serde(default)]
    pub active_tab: Tab,
    #[serde(default)]
    pub active_topic_id: Option<TopicId>,
    #[serde(default)]
    pub feed: Vec<FeedRecord>,
    /// Global tag set. Older records lack it; defaults apply then.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// One feed entry as stored. Records without `role` restore as `user`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedRecord {
    #[serde(default)]
    pub topic_id: Option<TopicId>,
    #[serde(default)]
    pub meta: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FeedEntryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<FeedRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}
