use crate::{RecentList, Session, SubmitContext, SubmitId, Topic};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Write `AppState::snapshot()` to storage.
    Persist,
    PersistRecentTeams(RecentList),
    PersistRecentAgents(RecentList),
    /// Empty submit; put the cursor back into the input.
    FocusInput,
    Preprocess {
        submit_id: SubmitId,
        agent_path: String,
        text: String,
        context: SubmitContext,
    },
    LoadAgent { path: String, name: String },
    /// Sessions are oldest first.
    ExportTopic { topic: Topic, sessions: Vec<Session> },
    CopyToClipboard(String),
}
