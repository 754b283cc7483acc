use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub type TopicId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    pub title: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub favorited: bool,
    #[serde(default)]
    pub archived: bool,
}

/// Starter topic used when no saved state exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSeed {
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub favorited: bool,
}

/// Why a guarded topic operation did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocked {
    Missing,
    Favorited,
}

/// The two ordered topic collections. Index 0 is the newest entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TopicLists {
    #[serde(default)]
    pub current: Vec<Topic>,
    #[serde(default)]
    pub archived: Vec<Topic>,
}

impl TopicLists {
    pub fn find(&self, id: &str) -> Option<&Topic> {
        self.current
            .iter()
            .chain(self.archived.iter())
            .find(|topic| topic.id == id)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Topic> {
        self.current
            .iter_mut()
            .chain(self.archived.iter_mut())
            .find(|topic| topic.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty() && self.archived.is_empty()
    }

    pub fn first_current_id(&self) -> Option<&str> {
        self.current.first().map(|topic| topic.id.as_str())
    }

    pub(crate) fn insert_current(&mut self, topic: Topic) {
        self.current.insert(0, topic);
    }

    /// Flips the favorite flag. Returns the new value, or `None` if unknown.
    pub(crate) fn toggle_favorite(&mut self, id: &str) -> Option<bool> {
        let topic = self.find_mut(id)?;
        topic.favorited = !topic.favorited;
        Some(topic.favorited)
    }

    /// Moves a topic to the front of the other collection.
    ///
    /// Returns the new `archived` flag.
    pub(crate) fn toggle_archive(&mut self, id: &str) -> Result<bool, Blocked> {
        let (from, to) = if self.current.iter().any(|topic| topic.id == id) {
            (&mut self.current, &mut self.archived)
        } else if self.archived.iter().any(|topic| topic.id == id) {
            (&mut self.archived, &mut self.current)
        } else {
            return Err(Blocked::Missing);
        };

        let index = from
            .iter()
            .position(|topic| topic.id == id)
            .ok_or(Blocked::Missing)?;
        if from[index].favorited {
            return Err(Blocked::Favorited);
        }
        let mut topic = from.remove(index);
        topic.archived = !topic.archived;
        let archived = topic.archived;
        to.insert(0, topic);
        Ok(archived)
    }

    pub(crate) fn remove(&mut self, id: &str) -> Result<Topic, Blocked> {
        match self.find(id) {
            None => return Err(Blocked::Missing),
            Some(topic) if topic.favorited => return Err(Blocked::Favorited),
            Some(_) => {}
        }
        let mut removed = None;
        for list in [&mut self.current, &mut self.archived] {
            if let Some(index) = list.iter().position(|topic| topic.id == id) {
                removed = Some(list.remove(index));
            }
        }
        removed.ok_or(Blocked::Missing)
    }

    /// Blank titles keep the old one.
    pub(crate) fn rename(&mut self, id: &str, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        match self.find_mut(id) {
            Some(topic) if topic.title != title => {
                topic.title = title.to_string();
                true
            }
            _ => false,
        }
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = &str> {
        self.current
            .iter()
            .chain(self.archived.iter())
            .map(|topic| topic.id.as_str())
    }
}

/// A topic passes when its tags are a superset of the selection.
pub fn matches_selection(topic: &Topic, selection: &BTreeSet<String>) -> bool {
    selection.iter().all(|tag| topic.tags.contains(tag))
}

/// Conjunctive tag filter. An empty selection keeps every topic.
pub fn filter_topics<'a>(topics: &'a [Topic], selection: &BTreeSet<String>) -> Vec<&'a Topic> {
    topics
        .iter()
        .filter(|topic| matches_selection(topic, selection))
        .collect()
}
