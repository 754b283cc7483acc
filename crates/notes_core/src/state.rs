use std::collections::BTreeSet;

use crate::feed::{Feed, FeedEntry, FeedRole};
use crate::session::SessionLog;
use crate::snapshot::{FeedRecord, UiSnapshot};
use crate::submit::PendingSubmit;
use crate::topic::{Topic, TopicLists, TopicSeed};
use crate::view_model::{
    AppViewModel, FeedRowView, SessionRowView, TagRowView, TopicRowView, SESSION_PREVIEW_CHARS,
};
use crate::{
    filter_topics, AgentSelection, Mode, RecentList, Selection, SubmitContext, SubmitId,
    SubmitStage, Tab, TagSet,
};

/// Unix epoch milliseconds.
pub type Timestamp = i64;

/// Single owner of everything the views show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub(crate) topics: TopicLists,
    pub(crate) tags: TagSet,
    pub(crate) selected_tags: BTreeSet<String>,
    pub(crate) sessions: SessionLog,
    pub(crate) feed: Feed,
    pub(crate) active_topic: Option<String>,
    pub(crate) mode: Mode,
    pub(crate) auto_mode: bool,
    pub(crate) tab: Tab,
    pub(crate) input: String,
    pub(crate) stage: SubmitStage,
    pub(crate) selected_agent: Option<AgentSelection>,
    /// Path of the latest agent the user asked for; older load results lose.
    pub(crate) requested_agent: Option<String>,
    pub(crate) selected_team: Option<Selection>,
    pub(crate) recent_agents: RecentList,
    pub(crate) recent_teams: RecentList,
    pub(crate) pending: Vec<PendingSubmit>,
    next_id: u64,
    next_submit: SubmitId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topics(&self) -> &TopicLists {
        &self.topics
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn selected_tags(&self) -> &BTreeSet<String> {
        &self.selected_tags
    }

    pub fn sessions(&self) -> &SessionLog {
        &self.sessions
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn auto_mode(&self) -> bool {
        self.auto_mode
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn stage(&self) -> SubmitStage {
        self.stage
    }

    pub fn selected_agent(&self) -> Option<&AgentSelection> {
        self.selected_agent.as_ref()
    }

    pub fn selected_team(&self) -> Option<&Selection> {
        self.selected_team.as_ref()
    }

    pub fn recent_agents(&self) -> &RecentList {
        &self.recent_agents
    }

    pub fn recent_teams(&self) -> &RecentList {
        &self.recent_teams
    }

    pub fn pending_submits(&self) -> usize {
        self.pending.len()
    }

    /// Explicitly selected topic.
    pub fn explicit_active_topic(&self) -> Option<&str> {
        self.active_topic.as_deref()
    }

    /// Selected topic, falling back to the first current topic.
    pub fn active_topic_id(&self) -> Option<&str> {
        self.active_topic
            .as_deref()
            .filter(|id| self.topics.contains(id))
            .or_else(|| self.topics.first_current_id())
    }

    pub fn view(&self) -> AppViewModel {
        let active = self.active_topic_id();
        let topic_row = |topic: &Topic| TopicRowView {
            id: topic.id.clone(),
            title: topic.title.clone(),
            tags: topic.tags.iter().cloned().collect(),
            favorited: topic.favorited,
            active: active == Some(topic.id.as_str()),
        };

        AppViewModel {
            current_topics: filter_topics(&self.topics.current, &self.selected_tags)
                .into_iter()
                .map(topic_row)
                .collect(),
            archived_topics: filter_topics(&self.topics.archived, &self.selected_tags)
                .into_iter()
                .map(topic_row)
                .collect(),
            tags: self
                .tags
                .iter()
                .map(|name| TagRowView {
                    name: name.to_string(),
                    selected: self.selected_tags.contains(name),
                })
                .collect(),
            sessions: self
                .sessions
                .iter()
                .map(|session| SessionRowView {
                    id: session.id.clone(),
                    topic_id: session.topic_id.clone(),
                    preview: session.content.chars().take(SESSION_PREVIEW_CHARS).collect(),
                    favorited: session.favorited,
                    created_at: session.created_at,
                })
                .collect(),
            feed: self
                .feed
                .iter()
                .map(|entry| FeedRowView {
                    id: entry.id.clone(),
                    meta: entry.meta(),
                    role: entry.role,
                    topic_id: entry.topic_id.clone(),
                    content: entry.content.clone(),
                    created_at: entry.created_at,
                })
                .collect(),
            mode: self.mode,
            auto_mode: self.auto_mode,
            tab: self.tab,
            active_topic_id: active.map(ToOwned::to_owned),
            input: self.input.clone(),
            stage: self.stage,
            pending_submits: self.pending.len(),
            agent: self.selected_agent.clone(),
            team: self.selected_team.clone(),
            recent_agents: self.recent_agents.entries().to_vec(),
            recent_teams: self.recent_teams.entries().to_vec(),
            dirty: self.dirty,
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Allocates an id with `prefix` that no topic, session or feed entry uses.
    pub(crate) fn fresh_id(&mut self, prefix: char) -> String {
        loop {
            self.next_id += 1;
            let candidate = format!("{prefix}{}", self.next_id);
            if !self.id_in_use(&candidate) {
                return candidate;
            }
        }
    }

    fn id_in_use(&self, id: &str) -> bool {
        self.topics.ids().any(|existing| existing == id)
            || self.sessions.iter().any(|session| session.id == id)
            || self.feed.iter().any(|entry| entry.id == id)
    }

    pub(crate) fn fresh_submit_id(&mut self) -> SubmitId {
        self.next_submit += 1;
        self.next_submit
    }

    pub(crate) fn submit_context(&self, timestamp: crate::Timestamp) -> SubmitContext {
        SubmitContext {
            topic_id: self.active_topic_id().map(ToOwned::to_owned),
            mode: self.mode,
            timestamp,
            tags: self.selected_tags.iter().cloned().collect(),
        }
    }

    pub(crate) fn append_feed(
        &mut self,
        role: FeedRole,
        content: String,
        agent: String,
        topic_id: Option<String>,
        now: Timestamp,
    ) -> String {
        let id = self.fresh_id('f');
        self.feed.push(FeedEntry {
            id: id.clone(),
            role,
            content,
            agent,
            topic_id,
            created_at: now,
        });
        id
    }

    /// Full persisted record of the current state.
    pub fn snapshot(&self) -> UiSnapshot {
        UiSnapshot {
            topics: self.topics.clone(),
            sessions: self.sessions.as_slice().to_vec(),
            selected_tags: self.selected_tags.iter().cloned().collect(),
            active_mode: self.mode,
            active_tab: self.tab,
            active_topic_id: self.active_topic.clone(),
            feed: self
                .feed
                .iter()
                .map(|entry| FeedRecord {
                    topic_id: entry.topic_id.clone(),
                    meta: entry.meta(),
                    content: entry.content.clone(),
                    id: Some(entry.id.clone()),
                    role: Some(entry.role),
                    agent: Some(entry.agent.clone()),
                    created_at: Some(entry.created_at),
                })
                .collect(),
            tags: Some(self.tags.iter().map(ToOwned::to_owned).collect()),
        }
    }

    pub(crate) fn restore(&mut self, snapshot: UiSnapshot, now: Timestamp) {
        self.topics = snapshot.topics;
        self.sessions = SessionLog::from_entries(snapshot.sessions);
        self.selected_tags = snapshot.selected_tags.into_iter().collect();
        self.mode = snapshot.active_mode;
        self.tab = snapshot.active_tab;
        self.active_topic = snapshot.active_topic_id;
        if let Some(tags) = snapshot.tags {
            self.tags = TagSet::from(tags);
        }

        self.feed = Feed::new();
        for record in snapshot.feed {
            let id = match record.id {
                Some(id) if !self.id_in_use(&id) => id,
                _ => self.fresh_id('f'),
            };
            self.feed.push(FeedEntry {
                id,
                role: record.role.unwrap_or_default(),
                content: record.content,
                agent: record.agent.unwrap_or_default(),
                topic_id: record.topic_id,
                created_at: record.created_at.unwrap_or(now),
            });
        }
        self.mark_dirty();
    }

    pub(crate) fn seed(&mut self, tags: Vec<String>, topics: Vec<TopicSeed>) {
        for tag in &tags {
            self.tags.insert(tag);
        }
        if self.topics.is_empty() {
            // Insert in reverse so the first seed ends up on top.
            for seed in topics.into_iter().rev() {
                let id = self.fresh_id('t');
                self.topics.insert_current(Topic {
                    id,
                    title: seed.title,
                    tags: seed.tags.into_iter().collect(),
                    favorited: seed.favorited,
                    archived: false,
                });
            }
        }
        self.mark_dirty();
    }
}
