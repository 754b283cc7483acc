use std::path::Path;

use notes_core::{RecentList, UiSnapshot, RECENT_AGENTS_KEY, RECENT_TEAMS_KEY, SNAPSHOT_KEY};
use notes_engine::{FileStore, JsonSlot, KeyValueStore};
use notes_logging::{notes_error, notes_info};

/// Typed access to the three persisted records.
pub struct Persistence {
    store: Box<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn open(data_dir: &Path) -> Self {
        Self::new(Box::new(FileStore::new(data_dir)))
    }

    fn snapshot_slot(&self) -> JsonSlot<'_, UiSnapshot> {
        JsonSlot::new(self.store.as_ref(), SNAPSHOT_KEY)
    }

    fn recent_slot<'a>(&'a self, key: &'a str) -> JsonSlot<'a, RecentList> {
        JsonSlot::new(self.store.as_ref(), key)
    }

    pub fn load_snapshot(&self) -> Option<UiSnapshot> {
        let snapshot = self.snapshot_slot().load()?;
        notes_info!(
            "Loaded saved state: {} current topics, {} sessions, {} feed entries",
            snapshot.topics.current.len(),
            snapshot.sessions.len(),
            snapshot.feed.len()
        );
        Some(snapshot)
    }

    pub fn save_snapshot(&self, snapshot: &UiSnapshot) {
        if let Err(err) = self.snapshot_slot().save(snapshot) {
            notes_error!("Failed to save {}: {}", SNAPSHOT_KEY, err);
        }
    }

    /// Returns `(teams, agents)`; missing or malformed lists read as empty.
    pub fn load_recents(&self) -> (RecentList, RecentList) {
        let teams = self.recent_slot(RECENT_TEAMS_KEY).load().unwrap_or_default();
        let agents = self.recent_slot(RECENT_AGENTS_KEY).load().unwrap_or_default();
        (teams, agents)
    }

    pub fn save_recent_teams(&self, teams: &RecentList) {
        self.save_recent(RECENT_TEAMS_KEY, teams);
    }

    pub fn save_recent_agents(&self, agents: &RecentList) {
        self.save_recent(RECENT_AGENTS_KEY, agents);
    }

    fn save_recent(&self, key: &str, list: &RecentList) {
        if let Err(err) = self.recent_slot(key).save(list) {
            notes_error!("Failed to save {}: {}", key, err);
        }
    }
}
