use serde::{Deserialize, Serialize};

use crate::{Timestamp, TopicId};

pub type FeedEntryId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedRole {
    #[default]
    User,
    Assistant,
}

impl FeedRole {
    pub fn label(self) -> &'static str {
        match self {
            FeedRole::User => "input",
            FeedRole::Assistant => "result",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Bold,
    Italic,
}

impl Emphasis {
    fn marker(self) -> &'static str {
        match self {
            Emphasis::Bold => "**",
            Emphasis::Italic => "*",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub id: FeedEntryId,
    pub role: FeedRole,
    pub content: String,
    pub agent: String,
    pub topic_id: Option<TopicId>,
    pub created_at: Timestamp,
}

impl FeedEntry {
    /// Header line shown above the entry, also stored in snapshots.
    pub fn meta(&self) -> String {
        if self.agent.is_empty() {
            self.role.label().to_string()
        } else {
            format!("{} · {}", self.role.label(), self.agent)
        }
    }
}

/// Output feed in append order (oldest first).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Feed {
    entries: Vec<FeedEntry>,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeedEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&FeedEntry> {
        self.entries.last()
    }

    pub(crate) fn push(&mut self, entry: FeedEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn remove_by_id(&mut self, id: &str) -> bool {
        match self.entries.iter().position(|entry| entry.id == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Removes the last entry whose content equals `content` exactly.
    pub(crate) fn remove_last_matching(&mut self, content: &str) -> bool {
        match self.entries.iter().rposition(|entry| entry.content == content) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove_for_topic(&mut self, topic_id: &str) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|entry| entry.topic_id.as_deref() != Some(topic_id));
        before - self.entries.len()
    }

    /// Wraps the latest entry in a markdown emphasis marker.
    pub(crate) fn emphasize_latest(&mut self, emphasis: Emphasis) -> bool {
        let Some(last) = self.entries.last_mut() else {
            return false;
        };
        let marker = emphasis.marker();
        last.content = format!("{marker}{}{marker}", last.content);
        true
    }

    /// Every entry's content, separated by a blank line.
    pub fn joined_contents(&self) -> String {
        self.entries
            .iter()
            .map(|entry| entry.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
