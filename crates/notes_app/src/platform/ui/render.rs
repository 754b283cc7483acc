use chrono::DateTime;
use notes_core::{AppViewModel, FeedRowView, SessionRowView, SubmitStage, Tab, TopicRowView};

/// Only the newest feed entries are printed.
pub const FEED_TAIL: usize = 20;

pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    let stage = match view.stage {
        SubmitStage::Idle => "idle",
        SubmitStage::Staged => "staged",
    };
    lines.push(format!(
        "== mode: {} | auto: {} | tab: {} | stage: {} | pending: {} ==",
        view.mode,
        if view.auto_mode { "on" } else { "off" },
        view.tab.as_str(),
        stage,
        view.pending_submits
    ));

    let agent = match &view.agent {
        Some(agent) if agent.has_preprocess => format!("{} (preprocess)", agent.name),
        Some(agent) => agent.name.clone(),
        None => "(none)".to_string(),
    };
    let team = view
        .team
        .as_ref()
        .map(|team| team.name.clone())
        .unwrap_or_else(|| "(none)".to_string());
    lines.push(format!("agent: {agent} | team: {team}"));

    let selected: Vec<&str> = view
        .tags
        .iter()
        .filter(|tag| tag.selected)
        .map(|tag| tag.name.as_str())
        .collect();
    if !selected.is_empty() {
        lines.push(format!("filter: {}", selected.join(", ")));
    }

    match view.tab {
        Tab::Current => {
            lines.push("-- Current topics --".to_string());
            lines.extend(view.current_topics.iter().map(format_topic_row));
        }
        Tab::Archived => {
            lines.push("-- Archived topics --".to_string());
            lines.extend(view.archived_topics.iter().map(format_topic_row));
        }
        Tab::Tags => {
            lines.push("-- Tags --".to_string());
            lines.extend(view.tags.iter().map(|tag| {
                format!("[{}] {}", if tag.selected { "x" } else { " " }, tag.name)
            }));
        }
    }

    lines.push("-- Sessions --".to_string());
    lines.extend(
        view.sessions
            .iter()
            .filter(|session| session.topic_id == view.active_topic_id)
            .map(format_session_row),
    );

    lines.push("-- Feed --".to_string());
    let skip = view.feed.len().saturating_sub(FEED_TAIL);
    for row in view.feed.iter().skip(skip) {
        lines.extend(format_feed_row(row));
    }

    if !view.input.is_empty() {
        lines.push(format!("input> {}", view.input));
    }
    lines
}

fn format_topic_row(topic: &TopicRowView) -> String {
    let marker = if topic.active { ">" } else { " " };
    let star = if topic.favorited { " ★" } else { "" };
    let tags: String = topic.tags.iter().map(|tag| format!(" #{tag}")).collect();
    format!("{marker} [{}] {}{star}{tags}", topic.id, topic.title)
}

fn format_session_row(session: &SessionRowView) -> String {
    let star = if session.favorited { "★ " } else { "" };
    let preview = session.preview.replace('\n', " ");
    format!(
        "[{}] {} {star}{preview}",
        session.id,
        format_time(session.created_at)
    )
}

fn format_feed_row(row: &FeedRowView) -> Vec<String> {
    let mut lines = vec![format!(
        "[{}] {} · {}",
        row.id,
        format_time(row.created_at),
        row.meta
    )];
    lines.extend(row.content.lines().map(|line| format!("    {line}")));
    lines
}

fn format_time(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}
