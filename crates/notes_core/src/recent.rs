use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// Maximum number of remembered picker entries.
pub const RECENT_LIMIT: usize = 10;

pub const RECENT_TEAMS_KEY: &str = "notes_recent_teams_v1";
pub const RECENT_AGENTS_KEY: &str = "notes_recent_agents_v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentEntry {
    pub path: String,
    pub name: String,
    #[serde(default)]
    pub ts: Timestamp,
}

/// Most-recently-used picker list, newest first, unique by path.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<RecentEntry>", into = "Vec<RecentEntry>")]
pub struct RecentList {
    entries: Vec<RecentEntry>,
}

impl RecentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends an entry unless its path is already known.
    ///
    /// Known paths keep their position. Returns whether the list changed.
    pub fn remember(&mut self, path: &str, name: &str, ts: Timestamp) -> bool {
        if self.find(path).is_some() {
            return false;
        }
        self.entries.insert(
            0,
            RecentEntry {
                path: path.to_string(),
                name: name.to_string(),
                ts,
            },
        );
        self.entries.truncate(RECENT_LIMIT);
        true
    }

    pub fn find(&self, path: &str) -> Option<&RecentEntry> {
        self.entries.iter().find(|entry| entry.path == path)
    }

    pub fn entries(&self) -> &[RecentEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<RecentEntry>> for RecentList {
    fn from(stored: Vec<RecentEntry>) -> Self {
        let mut entries: Vec<RecentEntry> = Vec::with_capacity(stored.len().min(RECENT_LIMIT));
        for entry in stored {
            if entries.len() == RECENT_LIMIT {
                break;
            }
            if !entries.iter().any(|kept| kept.path == entry.path) {
                entries.push(entry);
            }
        }
        Self { entries }
    }
}

impl From<RecentList> for Vec<RecentEntry> {
    fn from(list: RecentList) -> Self {
        list.entries
    }
}

/// A picked external reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub name: String,
    pub path: String,
}

/// A picked agent; `has_preprocess` is false for name-only placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSelection {
    pub name: String,
    pub path: String,
    pub has_preprocess: bool,
}
