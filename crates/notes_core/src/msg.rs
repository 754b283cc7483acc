use crate::{
    Emphasis, Mode, RecentList, SessionId, SubmitId, Tab, Timestamp, TopicId, TopicSeed,
    UiSnapshot,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the input box.
    InputChanged(String),
    /// One-shot submit of the current input.
    Submit { now: Timestamp },
    /// Modifier-key submit: stage the input, or commit the staged text.
    AdvanceStage { now: Timestamp },
    /// Agent finished preprocessing a pending submit.
    PreprocessDone {
        submit_id: SubmitId,
        result: Result<String, String>,
        now: Timestamp,
    },

    /// Create a topic carrying the current tag selection.
    AddTopic,
    RenameTopic { id: TopicId, title: String },
    ToggleTopicFavorite(TopicId),
    ToggleTopicArchive(TopicId),
    DeleteTopic(TopicId),
    SetActiveTopic(TopicId),
    ExportTopic(TopicId),

    AddTag(String),
    RemoveTag(String),
    ToggleTagSelection(String),

    ToggleSessionFavorite(SessionId),
    DeleteSession(SessionId),
    CopySession(SessionId),
    CopyFeed,
    EmphasizeLatest(Emphasis),

    SetMode(Mode),
    SetAutoMode(bool),
    SetTab(Tab),

    /// A team file was picked.
    PickTeam {
        path: String,
        name: String,
        now: Timestamp,
    },
    ChooseRecentTeam { path: String },
    /// An agent file was picked; loading happens in the engine.
    PickAgent { path: String, name: String },
    ChooseRecentAgent { path: String },
    /// Engine finished loading an agent. `Ok(true)` means it can preprocess.
    AgentLoaded {
        path: String,
        name: String,
        outcome: Result<bool, String>,
        now: Timestamp,
    },

    /// Restore previously saved UI state.
    RestoreSnapshot {
        snapshot: UiSnapshot,
        now: Timestamp,
    },
    /// Restore stored picker history.
    RestoreRecents {
        teams: RecentList,
        agents: RecentList,
    },
    /// Default tags, plus starter topics if no topic exists yet.
    SeedDefaults {
        tags: Vec<String>,
        topics: Vec<TopicSeed>,
    },
}
