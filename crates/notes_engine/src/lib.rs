//! Notes engine: storage, agents and export, run off the UI thread.
mod agent;
mod engine;
mod export;
mod filename;
mod persist;
mod store;
mod types;

pub use agent::{
    expand_placeholders, load_agent, Agent, AgentDefinition, CommandAgent, IdentityAgent,
    TemplateAgent,
};
pub use engine::EngineHandle;
pub use export::{export_topic, ExportDocument, ExportEntry, ExportError, ExportSummary};
pub use filename::export_stem;
pub use persist::{ensure_dir, AtomicFileWriter, PersistError};
pub use store::{FileStore, JsonSlot, KeyValueStore, MemoryStore, StoreError};
pub use types::{AgentError, AgentInfo, EngineEvent, EngineSettings, PreprocessContext, SubmitId};
