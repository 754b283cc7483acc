use crate::{Mode, Timestamp, TopicId};

/// Appended to staged text when a two-stage submit runs in `qa` mode.
pub const QA_PLACEHOLDER_SUFFIX: &str = "\n\n> [placeholder query result]";
/// Feed label used when no agent is selected.
pub const NO_AGENT_LABEL: &str = "(no agent)";
/// Feed label for `qa` answers when no team is selected.
pub const DEFAULT_TEAM_LABEL: &str = "team";

pub type SubmitId = u64;

/// Two-stage submit progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitStage {
    #[default]
    Idle,
    /// Input copied to the feed; the next advance writes a session.
    Staged,
}

/// Context handed to an agent's `preprocess`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitContext {
    pub topic_id: Option<TopicId>,
    pub mode: Mode,
    pub timestamp: Timestamp,
    pub tags: Vec<String>,
}

/// A one-shot submit waiting for its agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingSubmit {
    pub id: SubmitId,
    pub topic_id: Option<TopicId>,
    pub raw: String,
    pub agent_label: String,
}

/// Picks the text that ends up in the feed: the agent output when it is
/// usable, otherwise the raw input.
pub fn resolve_preprocessed(raw: &str, result: &Result<String, String>) -> String {
    match result {
        Ok(out) if !out.trim().is_empty() => out.clone(),
        _ => raw.to_string(),
    }
}
