use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use notes_core::{AppState, Effect, Msg, Session, SubmitContext, Topic};
use notes_engine::{
    export_topic, EngineEvent, EngineHandle, ExportDocument, ExportEntry, PreprocessContext,
};
use notes_logging::{notes_debug, notes_info, notes_warn};

use super::persistence::Persistence;

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Carries out effects returned by `update`. Returns lines for the user.
pub struct EffectRunner {
    engine: Arc<EngineHandle>,
    persistence: Persistence,
    export_dir: PathBuf,
}

impl EffectRunner {
    pub fn new(engine: Arc<EngineHandle>, persistence: Persistence, export_dir: PathBuf) -> Self {
        Self {
            engine,
            persistence,
            export_dir,
        }
    }

    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    pub fn run(&self, effects: Vec<Effect>, state: &AppState) -> Vec<String> {
        let mut notices = Vec::new();
        for effect in effects {
            match effect {
                Effect::Persist => self.persistence.save_snapshot(&state.snapshot()),
                Effect::PersistRecentTeams(teams) => self.persistence.save_recent_teams(&teams),
                Effect::PersistRecentAgents(agents) => {
                    self.persistence.save_recent_agents(&agents)
                }
                Effect::FocusInput => notes_debug!("Empty submit ignored"),
                Effect::Preprocess {
                    submit_id,
                    agent_path,
                    text,
                    context,
                } => {
                    notes_info!(
                        "Preprocess submit_id={} agent={} text_len={}",
                        submit_id,
                        agent_path,
                        text.len()
                    );
                    self.engine
                        .preprocess(submit_id, agent_path, text, preprocess_context(context));
                }
                Effect::LoadAgent { path, name } => {
                    notes_info!("LoadAgent path={} name={}", path, name);
                    self.engine.load_agent(path, name);
                }
                Effect::ExportTopic { topic, sessions } => {
                    let doc = export_document(&topic, &sessions, now_ms());
                    match export_topic(&self.export_dir, &doc) {
                        Ok(summary) => notices.push(format!(
                            "Exported {} session(s) to {}",
                            summary.entry_count,
                            summary.markdown_path.display()
                        )),
                        Err(err) => {
                            notes_warn!("Export of topic {} failed: {}", topic.id, err);
                            notices.push(format!("Export failed: {err}"));
                        }
                    }
                }
                // No system clipboard; the copied text is shown instead.
                Effect::CopyToClipboard(text) => {
                    notices.push(format!("Copied {} chars:\n{}", text.chars().count(), text));
                }
            }
        }
        notices
    }
}

fn preprocess_context(context: SubmitContext) -> PreprocessContext {
    PreprocessContext {
        topic_id: context.topic_id,
        mode: context.mode.as_str().to_string(),
        timestamp: context.timestamp,
        tags: context.tags,
    }
}

fn export_document(topic: &Topic, sessions: &[Session], exported_at: i64) -> ExportDocument {
    ExportDocument {
        topic_id: topic.id.clone(),
        title: topic.title.clone(),
        tags: topic.tags.iter().cloned().collect(),
        entries: sessions
            .iter()
            .map(|s| ExportEntry {
                id: s.id.clone(),
                content: s.content.clone(),
                created_at: s.created_at,
                favorited: s.favorited,
            })
            .collect(),
        exported_at,
    }
}

pub fn event_to_msg(event: EngineEvent, now: i64) -> Msg {
    match event {
        EngineEvent::AgentLoaded { path, name, result } => match result {
            Ok(info) => Msg::AgentLoaded {
                path,
                name: info.name,
                outcome: Ok(info.has_preprocess),
                now,
            },
            Err(err) => Msg::AgentLoaded {
                path,
                name,
                outcome: Err(err.to_string()),
                now,
            },
        },
        EngineEvent::Preprocessed { submit_id, result } => {
            if let Err(err) = &result {
                notes_warn!("Preprocess for submit {} failed: {}", submit_id, err);
            }
            Msg::PreprocessDone {
                submit_id,
                result: result.map_err(|err| err.to_string()),
                now,
            }
        }
    }
}
