use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use notes_logging::{notes_debug, notes_info, notes_warn};

use crate::agent::{load_agent, Agent};
use crate::{AgentError, AgentInfo, EngineEvent, EngineSettings, PreprocessContext, SubmitId};

enum EngineCommand {
    LoadAgent {
        path: String,
        name: String,
    },
    Preprocess {
        submit_id: SubmitId,
        agent_path: String,
        text: String,
        context: PreprocessContext,
    },
}

type Registry = Arc<Mutex<HashMap<String, Arc<dyn Agent>>>>;

/// Runs agent work on a background Tokio runtime and reports back as events.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Mutex<mpsc::Receiver<EngineEvent>>,
    registry: Registry,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings) -> io::Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let registry: Registry = Arc::new(Mutex::new(HashMap::new()));

        let worker_registry = registry.clone();
        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let registry = worker_registry.clone();
                let event_tx = event_tx.clone();
                let settings = settings.clone();
                runtime.spawn(async move {
                    let event = handle_command(&settings, &registry, command).await;
                    let _ = event_tx.send(event);
                });
            }
        });

        Ok(Self {
            cmd_tx,
            event_rx: Mutex::new(event_rx),
            registry,
        })
    }

    /// Makes an already constructed agent available under `path`.
    pub fn register(&self, path: impl Into<String>, agent: Arc<dyn Agent>) {
        lock(&self.registry).insert(path.into(), agent);
    }

    pub fn load_agent(&self, path: impl Into<String>, name: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::LoadAgent {
            path: path.into(),
            name: name.into(),
        });
    }

    pub fn preprocess(
        &self,
        submit_id: SubmitId,
        agent_path: impl Into<String>,
        text: impl Into<String>,
        context: PreprocessContext,
    ) {
        let _ = self.cmd_tx.send(EngineCommand::Preprocess {
            submit_id,
            agent_path: agent_path.into(),
            text: text.into(),
            context,
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }
}

fn lock(registry: &Registry) -> std::sync::MutexGuard<'_, HashMap<String, Arc<dyn Agent>>> {
    registry.lock().unwrap_or_else(|e| e.into_inner())
}

async fn handle_command(
    settings: &EngineSettings,
    registry: &Registry,
    command: EngineCommand,
) -> EngineEvent {
    match command {
        EngineCommand::LoadAgent { path, name } => {
            let result = match load_agent(Path::new(&path), &name).await {
                Ok(agent) => {
                    let info = AgentInfo {
                        name: agent.name().to_string(),
                        has_preprocess: agent.has_preprocess(),
                    };
                    lock(registry).insert(path.clone(), agent);
                    notes_info!(
                        "Loaded agent {} from {} (preprocess: {})",
                        info.name,
                        path,
                        info.has_preprocess
                    );
                    Ok(info)
                }
                Err(err) => {
                    notes_warn!("Failed to load agent from {}: {}", path, err);
                    Err(err)
                }
            };
            EngineEvent::AgentLoaded { path, name, result }
        }
        EngineCommand::Preprocess {
            submit_id,
            agent_path,
            text,
            context,
        } => {
            let agent = lock(registry).get(&agent_path).cloned();
            let result = match agent {
                Some(agent) => run_preprocess(settings, agent.as_ref(), &text, &context).await,
                None => Err(AgentError::NotLoaded(agent_path)),
            };
            notes_debug!("Submit {} preprocessed (ok: {})", submit_id, result.is_ok());
            EngineEvent::Preprocessed { submit_id, result }
        }
    }
}

async fn run_preprocess(
    settings: &EngineSettings,
    agent: &dyn Agent,
    text: &str,
    context: &PreprocessContext,
) -> Result<String, AgentError> {
    if !agent.has_preprocess() {
        return Ok(text.to_string());
    }
    let limit = agent.timeout().unwrap_or(settings.agent_timeout);
    match tokio::time::timeout(limit, agent.preprocess(text, context)).await {
        Ok(result) => result,
        Err(_) => Err(AgentError::Timeout(limit)),
    }
}
