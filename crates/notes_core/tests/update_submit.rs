use notes_core::{
    update, AppState, Effect, FeedRole, Mode, Msg, SubmitStage, NO_AGENT_LABEL,
    QA_PLACEHOLDER_SUFFIX,
};
use pretty_assertions::assert_eq;

fn apply(state: AppState, msgs: Vec<Msg>) -> AppState {
    msgs.into_iter().fold(state, |state, msg| update(state, msg).0)
}

fn with_topic() -> (AppState, String) {
    let (state, _) = update(AppState::new(), Msg::AddTopic);
    let id = state.topics().current[0].id.clone();
    (state, id)
}

fn with_loaded_agent(state: AppState, has_preprocess: bool) -> AppState {
    update(
        state,
        Msg::AgentLoaded {
            path: "agents/tidy.json".into(),
            name: "tidy".into(),
            outcome: Ok(has_preprocess),
            now: 1,
        },
    )
    .0
}

fn submit(state: AppState, input: &str, now: i64) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::InputChanged(input.to_string()));
    update(state, Msg::Submit { now })
}

#[test]
fn blank_input_only_refocuses() {
    let (state, _) = with_topic();
    let (mut state, _) = update(state, Msg::InputChanged("  \n ".into()));
    state.consume_dirty();

    let (mut next, effects) = update(state.clone(), Msg::Submit { now: 5 });

    assert_eq!(effects, vec![Effect::FocusInput]);
    assert!(next.sessions().is_empty());
    assert!(next.feed().is_empty());
    assert_eq!(next.input(), "  \n ");
    assert!(!next.consume_dirty());
}

#[test]
fn submit_without_agent_writes_feed_and_session() {
    let (state, topic) = with_topic();
    let (state, effects) = submit(state, "  hello world \n", 42);

    assert_eq!(effects, vec![Effect::Persist]);
    assert_eq!(state.input(), "");

    let entry = state.feed().latest().expect("feed entry");
    assert_eq!(entry.role, FeedRole::User);
    assert_eq!(entry.content, "hello world");
    assert_eq!(entry.agent, NO_AGENT_LABEL);
    assert_eq!(entry.topic_id.as_deref(), Some(topic.as_str()));

    let session = &state.sessions().as_slice()[0];
    assert_eq!(session.content, "hello world");
    assert_eq!(session.created_at, 42);
    assert_eq!(session.topic_id.as_deref(), Some(topic.as_str()));
    assert_eq!(session.feed_entry_id.as_deref(), Some(entry.id.as_str()));
    assert!(!session.favorited);
}

#[test]
fn submit_without_any_topic_still_records() {
    let (state, effects) = submit(AppState::new(), "loose note", 1);

    assert_eq!(effects, vec![Effect::Persist]);
    assert_eq!(state.sessions().len(), 1);
    assert_eq!(state.sessions().as_slice()[0].topic_id, None);
}

#[test]
fn sessions_are_newest_first() {
    let (mut state, _) = with_topic();
    for (i, text) in ["one", "two", "three"].iter().enumerate() {
        state = submit(state, text, i as i64).0;
    }
    let contents: Vec<_> = state.sessions().iter().map(|s| s.content.as_str()).collect();
    assert_eq!(contents, vec!["three", "two", "one"]);

    let feed: Vec<_> = state.feed().iter().map(|e| e.content.as_str()).collect();
    assert_eq!(feed, vec!["one", "two", "three"]);
}

#[test]
fn agent_with_preprocess_defers_until_result() {
    let (state, topic) = with_topic();
    let state = apply(
        state,
        vec![Msg::AddTag("plan".into()), Msg::ToggleTagSelection("plan".into())],
    );
    let state = with_loaded_agent(state, true);

    let (state, effects) = submit(state, " draft ", 7);
    let submit_id = match effects.as_slice() {
        [Effect::Preprocess {
            submit_id,
            agent_path,
            text,
            context,
        }] => {
            assert_eq!(agent_path, "agents/tidy.json");
            assert_eq!(text, "draft");
            assert_eq!(context.topic_id.as_deref(), Some(topic.as_str()));
            assert_eq!(context.mode, Mode::Note);
            assert_eq!(context.timestamp, 7);
            assert_eq!(context.tags, vec!["plan".to_string()]);
            *submit_id
        }
        other => panic!("unexpected effects: {other:?}"),
    };
    assert_eq!(state.pending_submits(), 1);
    assert!(state.sessions().is_empty());

    let (state, effects) = update(
        state,
        Msg::PreprocessDone {
            submit_id,
            result: Ok("# Draft".into()),
            now: 8,
        },
    );
    assert_eq!(effects, vec![Effect::Persist]);
    assert_eq!(state.pending_submits(), 0);
    assert_eq!(state.sessions().as_slice()[0].content, "# Draft");
    let entry = state.feed().latest().expect("feed entry");
    assert_eq!(entry.content, "# Draft");
    assert_eq!(entry.agent, "tidy");
    assert_eq!(state.input(), "");
}

#[test]
fn failed_preprocess_falls_back_to_trimmed_input() {
    let (state, _) = with_topic();
    let state = with_loaded_agent(state, true);
    let (state, effects) = submit(state, "  raw text  ", 3);
    let Some(Effect::Preprocess { submit_id, .. }) = effects.first().cloned() else {
        panic!("expected a preprocess effect");
    };

    let (state, _) = update(
        state,
        Msg::PreprocessDone {
            submit_id,
            result: Err("agent crashed".into()),
            now: 4,
        },
    );

    assert_eq!(state.sessions().as_slice()[0].content, "raw text");
    assert_eq!(state.feed().latest().map(|e| e.content.as_str()), Some("raw text"));
}

#[test]
fn agent_without_capability_passes_through() {
    let (state, _) = with_topic();
    let state = with_loaded_agent(state, false);
    let (state, effects) = submit(state, "as is", 3);

    assert_eq!(effects, vec![Effect::Persist]);
    assert_eq!(state.feed().latest().map(|e| e.agent.as_str()), Some("tidy"));
}

#[test]
fn second_submit_for_same_topic_waits() {
    let (state, _) = with_topic();
    let state = with_loaded_agent(state, true);
    let (state, first) = submit(state, "first", 1);
    assert_eq!(first.len(), 1);

    let (state, second) = submit(state, "second", 2);
    assert!(second.is_empty());
    assert_eq!(state.pending_submits(), 1);
    assert_eq!(state.input(), "second");
}

#[test]
fn result_for_deleted_topic_is_dropped() {
    let (state, topic) = with_topic();
    let state = with_loaded_agent(state, true);
    let (state, effects) = submit(state, "orphan", 1);
    let Some(Effect::Preprocess { submit_id, .. }) = effects.first().cloned() else {
        panic!("expected a preprocess effect");
    };
    let (state, _) = update(state, Msg::DeleteTopic(topic));

    let (state, effects) = update(
        state,
        Msg::PreprocessDone {
            submit_id,
            result: Ok("late".into()),
            now: 2,
        },
    );
    assert!(effects.is_empty());
    assert!(state.sessions().is_empty());
    assert_eq!(state.pending_submits(), 0);
}

#[test]
fn stale_preprocess_result_is_ignored() {
    let (state, _) = with_topic();
    let before = state.clone();
    let (state, effects) = update(
        state,
        Msg::PreprocessDone {
            submit_id: 99,
            result: Ok("ghost".into()),
            now: 1,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state, before);
}

#[test]
fn two_stage_note_mode_writes_staged_text() {
    let (state, topic) = with_topic();
    let (state, _) = update(state, Msg::InputChanged("staged".into()));

    let (state, effects) = update(state, Msg::AdvanceStage { now: 1 });
    assert_eq!(effects, vec![Effect::Persist]);
    assert_eq!(state.stage(), SubmitStage::Staged);
    assert_eq!(state.input(), "staged");
    assert!(state.sessions().is_empty());
    assert_eq!(state.feed().latest().map(|e| e.content.as_str()), Some("staged"));

    let (state, effects) = update(state, Msg::AdvanceStage { now: 2 });
    assert_eq!(effects, vec![Effect::Persist]);
    assert_eq!(state.stage(), SubmitStage::Idle);
    let session = &state.sessions().as_slice()[0];
    assert_eq!(session.content, "staged");
    assert_eq!(session.topic_id.as_deref(), Some(topic.as_str()));
    assert_eq!(state.feed().len(), 1);
}

#[test]
fn two_stage_qa_mode_appends_placeholder_answer() {
    let (state, _) = with_topic();
    let state = apply(
        state,
        vec![
            Msg::SetMode(Mode::Qa),
            Msg::InputChanged("X".into()),
            Msg::AdvanceStage { now: 1 },
            Msg::AdvanceStage { now: 2 },
        ],
    );

    let expected = "X\n\n> [placeholder query result]";
    assert_eq!(format!("X{QA_PLACEHOLDER_SUFFIX}"), expected);
    assert_eq!(state.sessions().len(), 1);
    assert_eq!(state.sessions().as_slice()[0].content, expected);

    let assistant: Vec<_> = state
        .feed()
        .iter()
        .filter(|e| e.role == FeedRole::Assistant)
        .collect();
    assert_eq!(assistant.len(), 1);
    assert_eq!(assistant[0].content, expected);
    assert_eq!(assistant[0].agent, "team");
}

#[test]
fn two_stage_without_topic_resets_without_writing() {
    let state = apply(
        AppState::new(),
        vec![Msg::InputChanged("nowhere".into()), Msg::AdvanceStage { now: 1 }],
    );
    assert_eq!(state.stage(), SubmitStage::Staged);
    let feed_len = state.feed().len();

    let (state, effects) = update(state, Msg::AdvanceStage { now: 2 });
    assert!(effects.is_empty());
    assert_eq!(state.stage(), SubmitStage::Idle);
    assert!(state.sessions().is_empty());
    assert_eq!(state.feed().len(), feed_len);
}

#[test]
fn deleting_session_removes_its_own_feed_entry() {
    let (mut state, _) = with_topic();
    state = submit(state, "same", 1).0;
    state = submit(state, "same", 2).0;
    let older = state.sessions().as_slice()[1].clone();
    let newer_entry = state.sessions().as_slice()[0].feed_entry_id.clone();

    let (state, effects) = update(state, Msg::DeleteSession(older.id.clone()));
    assert_eq!(effects, vec![Effect::Persist]);
    assert_eq!(state.sessions().len(), 1);
    let remaining: Vec<_> = state.feed().iter().map(|e| Some(e.id.clone())).collect();
    assert_eq!(remaining, vec![newer_entry]);
}

#[test]
fn session_favorite_and_copy() {
    let (state, _) = with_topic();
    let (state, _) = submit(state, "keep me", 1);
    let id = state.sessions().as_slice()[0].id.clone();

    let (state, effects) = update(state, Msg::ToggleSessionFavorite(id.clone()));
    assert_eq!(effects, vec![Effect::Persist]);
    assert!(state.sessions().as_slice()[0].favorited);

    let (_, effects) = update(state, Msg::CopySession(id));
    assert_eq!(effects, vec![Effect::CopyToClipboard("keep me".into())]);
}

#[test]
fn feed_copy_and_emphasis() {
    let (mut state, _) = with_topic();
    state = submit(state, "a", 1).0;
    state = submit(state, "b", 2).0;

    let (state, effects) = update(state, Msg::CopyFeed);
    assert_eq!(effects, vec![Effect::CopyToClipboard("a\n\nb".into())]);

    let (state, _) = update(state, Msg::EmphasizeLatest(notes_core::Emphasis::Bold));
    assert_eq!(state.feed().latest().map(|e| e.content.as_str()), Some("**b**"));
}
