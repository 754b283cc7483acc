use crate::{AgentSelection, FeedRole, Mode, RecentEntry, Selection, SubmitStage, Tab, Timestamp};

/// Sidebar previews are cut to this many characters.
pub const SESSION_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    /// Current topics after the tag filter.
    pub current_topics: Vec<TopicRowView>,
    /// Archived topics after the tag filter.
    pub archived_topics: Vec<TopicRowView>,
    pub tags: Vec<TagRowView>,
    pub sessions: Vec<SessionRowView>,
    pub feed: Vec<FeedRowView>,
    pub mode: Mode,
    pub auto_mode: bool,
    pub tab: Tab,
    pub active_topic_id: Option<String>,
    pub input: String,
    pub stage: SubmitStage,
    pub pending_submits: usize,
    pub agent: Option<AgentSelection>,
    pub team: Option<Selection>,
    pub recent_agents: Vec<RecentEntry>,
    pub recent_teams: Vec<RecentEntry>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRowView {
    pub id: String,
    pub title: String,
    pub tags: Vec<String>,
    pub favorited: bool,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRowView {
    pub name: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRowView {
    pub id: String,
    pub topic_id: Option<String>,
    pub preview: String,
    pub favorited: bool,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRowView {
    pub id: String,
    pub meta: String,
    pub role: FeedRole,
    pub topic_id: Option<String>,
    pub content: String,
    pub created_at: Timestamp,
}
