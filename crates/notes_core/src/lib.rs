//! Notes core: pure state machine and view-model helpers.
mod effect;
mod feed;
mod mode;
mod msg;
mod recent;
mod session;
mod snapshot;
mod state;
mod submit;
mod tag;
mod topic;
mod update;
mod view_model;

pub use effect::Effect;
pub use feed::{Emphasis, Feed, FeedEntry, FeedEntryId, FeedRole};
pub use mode::{Mode, Tab};
pub use msg::Msg;
pub use recent::{
    AgentSelection, RecentEntry, RecentList, Selection, RECENT_AGENTS_KEY, RECENT_LIMIT,
    RECENT_TEAMS_KEY,
};
pub use session::{Session, SessionId, SessionLog};
pub use snapshot::{FeedRecord, UiSnapshot, SNAPSHOT_KEY};
pub use state::{AppState, Timestamp};
pub use submit::{
    resolve_preprocessed, SubmitContext, SubmitId, SubmitStage, DEFAULT_TEAM_LABEL,
    NO_AGENT_LABEL, QA_PLACEHOLDER_SUFFIX,
};
pub use tag::TagSet;
pub use topic::{filter_topics, matches_selection, Topic, TopicId, TopicLists, TopicSeed};
pub use update::update;
pub use view_model::{
    AppViewModel, FeedRowView, SessionRowView, TagRowView, TopicRowView, SESSION_PREVIEW_CHARS,
};
