use notes_logging::{notes_debug, notes_info, notes_warn};

use crate::feed::FeedRole;
use crate::session::Session;
use crate::submit::{
    resolve_preprocessed, PendingSubmit, DEFAULT_TEAM_LABEL, NO_AGENT_LABEL,
    QA_PLACEHOLDER_SUFFIX,
};
use crate::topic::{Blocked, Topic};
use crate::{AgentSelection, AppState, Effect, Mode, Msg, Selection, SubmitStage, Timestamp};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            if state.input != text {
                state.input = text;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::Submit { now } => submit(&mut state, now),
        Msg::PreprocessDone {
            submit_id,
            result,
            now,
        } => {
            let Some(index) = state.pending.iter().position(|p| p.id == submit_id) else {
                notes_debug!("Preprocess result for unknown submit {}", submit_id);
                return (state, Vec::new());
            };
            let pending = state.pending.remove(index);
            state.mark_dirty();
            if let Err(err) = &result {
                notes_warn!(
                    "Agent {} failed to preprocess submit {}, using raw input: {}",
                    pending.agent_label,
                    submit_id,
                    err
                );
            }
            let text = resolve_preprocessed(&pending.raw, &result);
            let orphaned = pending
                .topic_id
                .as_deref()
                .is_some_and(|topic_id| !state.topics.contains(topic_id));
            if orphaned {
                notes_warn!(
                    "Topic {:?} was deleted while submit {} was pending; dropping it",
                    pending.topic_id,
                    submit_id
                );
                Vec::new()
            } else {
                complete_submit(&mut state, pending.topic_id, text, pending.agent_label, now)
            }
        }
        Msg::AdvanceStage { now } => advance_stage(&mut state, now),

        Msg::AddTopic => {
            let id = state.fresh_id('t');
            let topic = Topic {
                title: format!("New topic {id}"),
                id,
                tags: state.selected_tags.clone(),
                favorited: false,
                archived: false,
            };
            notes_info!("Added topic {} with {} tags", topic.id, topic.tags.len());
            state.topics.insert_current(topic);
            persist(&mut state)
        }
        Msg::RenameTopic { id, title } => {
            if state.topics.rename(&id, &title) {
                persist(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::ToggleTopicFavorite(id) => match state.topics.toggle_favorite(&id) {
            Some(_) => persist(&mut state),
            None => Vec::new(),
        },
        Msg::ToggleTopicArchive(id) => match state.topics.toggle_archive(&id) {
            Ok(archived) => {
                notes_debug!("Topic {} archived={}", id, archived);
                persist(&mut state)
            }
            Err(reason) => {
                log_blocked("archive", &id, reason);
                Vec::new()
            }
        },
        Msg::DeleteTopic(id) => match state.topics.remove(&id) {
            Ok(_) => {
                let sessions = state.sessions.remove_for_topic(&id);
                let entries = state.feed.remove_for_topic(&id);
                if state.active_topic.as_deref() == Some(id.as_str()) {
                    state.active_topic = None;
                }
                notes_info!(
                    "Deleted topic {} with {} sessions and {} feed entries",
                    id,
                    sessions,
                    entries
                );
                persist(&mut state)
            }
            Err(reason) => {
                log_blocked("delete", &id, reason);
                Vec::new()
            }
        },
        Msg::SetActiveTopic(id) => {
            if state.topics.contains(&id) && state.active_topic.as_deref() != Some(id.as_str()) {
                state.active_topic = Some(id);
                persist(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::ExportTopic(id) => match state.topics.find(&id) {
            Some(topic) => vec![Effect::ExportTopic {
                topic: topic.clone(),
                sessions: state.sessions.chronological_for_topic(&id),
            }],
            None => Vec::new(),
        },

        Msg::AddTag(name) => {
            if state.tags.insert(&name) {
                persist(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::RemoveTag(name) => {
            let name = name.trim();
            // Topics keep their reference to the removed tag.
            let in_set = state.tags.remove(name);
            let in_selection = state.selected_tags.remove(name);
            if in_set || in_selection {
                persist(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::ToggleTagSelection(name) => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return (state, Vec::new());
            }
            if !state.selected_tags.remove(&name) {
                state.selected_tags.insert(name);
            }
            persist(&mut state)
        }

        Msg::ToggleSessionFavorite(id) => match state.sessions.toggle_favorite(&id) {
            Some(_) => persist(&mut state),
            None => Vec::new(),
        },
        Msg::DeleteSession(id) => match state.sessions.remove(&id) {
            Some(session) => {
                let removed = match session.feed_entry_id.as_deref() {
                    Some(entry_id) => state.feed.remove_by_id(entry_id),
                    None => state.feed.remove_last_matching(&session.content),
                };
                notes_debug!("Deleted session {} (feed entry removed: {})", id, removed);
                persist(&mut state)
            }
            None => Vec::new(),
        },
        Msg::CopySession(id) => match state.sessions.find(&id) {
            Some(session) => vec![Effect::CopyToClipboard(session.content.clone())],
            None => Vec::new(),
        },
        Msg::CopyFeed => vec![Effect::CopyToClipboard(state.feed.joined_contents())],
        Msg::EmphasizeLatest(emphasis) => {
            if state.feed.emphasize_latest(emphasis) {
                persist(&mut state)
            } else {
                Vec::new()
            }
        }

        Msg::SetMode(mode) => {
            if state.mode != mode {
                state.mode = mode;
                notes_debug!("Mode set to {}", mode);
                persist(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::SetAutoMode(enabled) => {
            if state.auto_mode != enabled {
                state.auto_mode = enabled;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SetTab(tab) => {
            if state.tab != tab {
                state.tab = tab;
                persist(&mut state)
            } else {
                Vec::new()
            }
        }

        Msg::PickTeam { path, name, now } => {
            state.selected_team = Some(Selection {
                name: name.clone(),
                path: path.clone(),
            });
            state.mark_dirty();
            if state.recent_teams.remember(&path, &name, now) {
                vec![Effect::PersistRecentTeams(state.recent_teams.clone())]
            } else {
                Vec::new()
            }
        }
        Msg::ChooseRecentTeam { path } => {
            if let Some(entry) = state.recent_teams.find(&path) {
                state.selected_team = Some(Selection {
                    name: entry.name.clone(),
                    path: entry.path.clone(),
                });
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::PickAgent { path, name } => {
            state.requested_agent = Some(path.clone());
            vec![Effect::LoadAgent { path, name }]
        }
        Msg::ChooseRecentAgent { path } => match state.recent_agents.find(&path) {
            Some(entry) => {
                let effect = Effect::LoadAgent {
                    path: entry.path.clone(),
                    name: entry.name.clone(),
                };
                state.requested_agent = Some(path);
                vec![effect]
            }
            None => Vec::new(),
        },
        Msg::AgentLoaded {
            path,
            name,
            outcome,
            now,
        } => {
            let has_preprocess = match outcome {
                Ok(has_preprocess) => has_preprocess,
                Err(err) => {
                    notes_warn!("Agent {} could not be loaded, keeping its name only: {}", path, err);
                    false
                }
            };
            let superseded = state
                .requested_agent
                .as_deref()
                .is_some_and(|requested| requested != path);
            if superseded {
                notes_info!("Agent {} finished loading after a newer pick; not selecting it", path);
            } else {
                state.selected_agent = Some(AgentSelection {
                    name: name.clone(),
                    path: path.clone(),
                    has_preprocess,
                });
                state.mark_dirty();
            }
            if state.recent_agents.remember(&path, &name, now) {
                vec![Effect::PersistRecentAgents(state.recent_agents.clone())]
            } else {
                Vec::new()
            }
        }

        Msg::RestoreSnapshot { snapshot, now } => {
            state.restore(snapshot, now);
            Vec::new()
        }
        Msg::RestoreRecents { teams, agents } => {
            state.recent_teams = teams;
            state.recent_agents = agents;
            state.mark_dirty();
            Vec::new()
        }
        Msg::SeedDefaults { tags, topics } => {
            state.seed(tags, topics);
            Vec::new()
        }
    };

    (state, effects)
}

fn persist(state: &mut AppState) -> Vec<Effect> {
    state.mark_dirty();
    vec![Effect::Persist]
}

fn log_blocked(action: &str, id: &str, reason: Blocked) {
    match reason {
        Blocked::Missing => notes_debug!("Cannot {} topic {}: not found", action, id),
        Blocked::Favorited => notes_info!("Cannot {} topic {}: it is favorited", action, id),
    }
}

fn submit(state: &mut AppState, now: Timestamp) -> Vec<Effect> {
    let raw = state.input.trim().to_string();
    if raw.is_empty() {
        return vec![Effect::FocusInput];
    }

    let topic_id = state.active_topic_id().map(ToOwned::to_owned);
    if state.pending.iter().any(|pending| pending.topic_id == topic_id) {
        notes_info!(
            "Submit ignored: topic {:?} already has a submit in flight",
            topic_id
        );
        return Vec::new();
    }

    match state.selected_agent.clone() {
        Some(agent) if agent.has_preprocess => {
            let submit_id = state.fresh_submit_id();
            let context = state.submit_context(now);
            state.pending.push(PendingSubmit {
                id: submit_id,
                topic_id,
                raw: raw.clone(),
                agent_label: agent.name,
            });
            state.mark_dirty();
            vec![Effect::Preprocess {
                submit_id,
                agent_path: agent.path,
                text: raw,
                context,
            }]
        }
        agent => {
            let label = agent
                .map(|agent| agent.name)
                .unwrap_or_else(|| NO_AGENT_LABEL.to_string());
            complete_submit(state, topic_id, raw, label, now)
        }
    }
}

/// Writes a submitted text to the feed and the session list.
fn complete_submit(
    state: &mut AppState,
    topic_id: Option<String>,
    text: String,
    agent_label: String,
    now: Timestamp,
) -> Vec<Effect> {
    let entry_id = state.append_feed(
        FeedRole::User,
        text.clone(),
        agent_label,
        topic_id.clone(),
        now,
    );
    push_session(state, topic_id, text, Some(entry_id), now);
    state.input.clear();
    persist(state)
}

fn push_session(
    state: &mut AppState,
    topic_id: Option<String>,
    content: String,
    feed_entry_id: Option<String>,
    now: Timestamp,
) {
    let id = state.fresh_id('s');
    state.sessions.prepend(Session {
        id,
        topic_id,
        content,
        created_at: now,
        favorited: false,
        feed_entry_id,
    });
}

fn advance_stage(state: &mut AppState, now: Timestamp) -> Vec<Effect> {
    match state.stage {
        SubmitStage::Idle => {
            let text = state.input.clone();
            let agent = state
                .selected_agent
                .as_ref()
                .map(|agent| agent.name.clone())
                .unwrap_or_else(|| NO_AGENT_LABEL.to_string());
            let topic_id = state.active_topic_id().map(ToOwned::to_owned);
            state.append_feed(FeedRole::User, text, agent, topic_id, now);
            state.stage = SubmitStage::Staged;
            notes_debug!("Stage 1 done: input copied to the feed");
            persist(state)
        }
        SubmitStage::Staged => {
            state.stage = SubmitStage::Idle;
            let Some(topic_id) = state.active_topic_id().map(ToOwned::to_owned) else {
                notes_warn!("No topic to write the staged text into");
                state.mark_dirty();
                return Vec::new();
            };
            let (latest_id, content) = match state.feed.latest() {
                Some(entry) => (Some(entry.id.clone()), entry.content.clone()),
                None => (None, String::new()),
            };

            match state.mode {
                Mode::Note | Mode::Search => {
                    push_session(state, Some(topic_id), content, latest_id, now);
                }
                Mode::Qa => {
                    let answer = format!("{content}{QA_PLACEHOLDER_SUFFIX}");
                    let team = state
                        .selected_team
                        .as_ref()
                        .map(|team| team.name.clone())
                        .unwrap_or_else(|| DEFAULT_TEAM_LABEL.to_string());
                    let entry_id = state.append_feed(
                        FeedRole::Assistant,
                        answer.clone(),
                        team,
                        Some(topic_id.clone()),
                        now,
                    );
                    push_session(state, Some(topic_id), answer, Some(entry_id), now);
                }
            }
            notes_debug!("Stage 2 done in {} mode", state.mode);
            persist(state)
        }
    }
}
