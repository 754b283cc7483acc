use std::io;
use std::time::Duration;

use thiserror::Error;

pub type SubmitId = u64;

/// What an agent knows about the submit it is preprocessing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessContext {
    pub topic_id: Option<String>,
    pub mode: String,
    pub timestamp: i64,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Upper bound for one preprocess call unless the agent sets its own.
    pub agent_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            agent_timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentInfo {
    pub name: String,
    pub has_preprocess: bool,
}

#[derive(Debug)]
pub enum EngineEvent {
    AgentLoaded {
        path: String,
        name: String,
        result: Result<AgentInfo, AgentError>,
    },
    Preprocessed {
        submit_id: SubmitId,
        result: Result<String, AgentError>,
    },
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("cannot read agent file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid agent definition: {0}")]
    Definition(String),
    #[error("agent {0} is not loaded")]
    NotLoaded(String),
    #[error("failed to start agent process: {0}")]
    Spawn(#[source] io::Error),
    #[error("agent process exited with {code:?}: {stderr}")]
    Exit { code: Option<i32>, stderr: String },
    #[error("agent timed out after {0:?}")]
    Timeout(Duration),
    #[error("io error: {0}")]
    Io(#[source] io::Error),
}
