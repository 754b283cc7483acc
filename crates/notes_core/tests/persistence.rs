use notes_core::{update, AppState, FeedRole, Mode, Msg, Tab, UiSnapshot};
use pretty_assertions::assert_eq;

fn init_logging() {
    notes_logging::initialize_for_tests();
}

fn populated_state() -> AppState {
    let msgs = vec![
        Msg::AddTag("A".into()),
        Msg::AddTag("B".into()),
        Msg::ToggleTagSelection("A".into()),
        Msg::AddTopic,
        Msg::AddTopic,
        Msg::SetMode(Mode::Qa),
        Msg::SetTab(Tab::Archived),
        Msg::InputChanged("question".into()),
        Msg::AdvanceStage { now: 100 },
        Msg::AdvanceStage { now: 101 },
        Msg::InputChanged("plain note".into()),
        Msg::Submit { now: 102 },
    ];
    let mut state = msgs
        .into_iter()
        .fold(AppState::new(), |state, msg| update(state, msg).0);
    let second = state.topics().current[1].id.clone();
    state = update(state, Msg::SetActiveTopic(second)).0;
    let first = state.topics().current[0].id.clone();
    update(state, Msg::ToggleTopicArchive(first)).0
}

fn restore(snapshot: UiSnapshot) -> AppState {
    update(AppState::new(), Msg::RestoreSnapshot { snapshot, now: 999 }).0
}

#[test]
fn snapshot_round_trip_restores_state() {
    init_logging();
    let state = populated_state();
    let json = serde_json::to_string(&state.snapshot()).expect("serialize");
    let snapshot: UiSnapshot = serde_json::from_str(&json).expect("deserialize");

    let restored = restore(snapshot);

    assert_eq!(restored.topics(), state.topics());
    assert_eq!(restored.sessions(), state.sessions());
    assert_eq!(restored.selected_tags(), state.selected_tags());
    assert_eq!(restored.mode(), Mode::Qa);
    assert_eq!(restored.tab(), Tab::Archived);
    assert_eq!(restored.explicit_active_topic(), state.explicit_active_topic());
    assert_eq!(restored.tags(), state.tags());
    assert_eq!(restored.feed(), state.feed());
}

#[test]
fn feed_roles_survive_the_round_trip() {
    init_logging();
    let state = populated_state();
    let restored = restore(state.snapshot());

    let roles: Vec<_> = restored.feed().iter().map(|e| e.role).collect();
    assert_eq!(
        roles,
        vec![FeedRole::User, FeedRole::Assistant, FeedRole::User]
    );
}

#[test]
fn snapshot_uses_camel_case_fields() {
    init_logging();
    let value = serde_json::to_value(populated_state().snapshot()).expect("serialize");

    for key in [
        "topics",
        "sessions",
        "selectedTags",
        "activeMode",
        "activeTab",
        "activeTopicId",
        "feed",
    ] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert_eq!(value["activeMode"], "qa");
    assert_eq!(value["selectedTags"], serde_json::json!(["A"]));
    assert!(value["feed"][0].get("topicId").is_some());
    assert!(value["feed"][0].get("meta").is_some());
}

#[test]
fn legacy_feed_records_collapse_to_user() {
    init_logging();
    let legacy = r#"{
        "topics": {"current": [{"id": "k1", "title": "Weekly", "tags": ["x"], "favorited": false, "archived": false}], "archived": []},
        "sessions": [{"id": "s9", "topicId": "k1", "content": "answer", "createdAt": 5, "favorited": true}],
        "selectedTags": ["x"],
        "activeMode": "search",
        "activeTab": "current",
        "activeTopicId": "k1",
        "feed": [
            {"topicId": "k1", "meta": "result · team", "content": "answer"},
            {"topicId": null, "meta": "input", "content": "answer"}
        ]
    }"#;
    let snapshot: UiSnapshot = serde_json::from_str(legacy).expect("legacy snapshot");
    let state = restore(snapshot);

    assert_eq!(state.mode(), Mode::Search);
    assert_eq!(state.active_topic_id(), Some("k1"));
    assert_eq!(state.feed().len(), 2);
    assert!(state.feed().iter().all(|e| e.role == FeedRole::User));
    assert!(state.feed().iter().all(|e| e.created_at == 999));

    // Without a back-reference the last matching entry goes.
    let (state, _) = update(state, Msg::DeleteSession("s9".into()));
    let remaining: Vec<_> = state.feed().iter().map(|e| e.topic_id.as_deref()).collect();
    assert_eq!(remaining, vec![Some("k1")]);
    assert_eq!(state.feed().latest().map(|e| e.meta()), Some("input".to_string()));
}

#[test]
fn restored_ids_are_not_reused() {
    init_logging();
    let state = populated_state();
    let restored = restore(state.snapshot());
    let (restored, _) = update(restored, Msg::AddTopic);

    let new_id = &restored.topics().current[0].id;
    assert!(state.topics().find(new_id).is_none());
}

#[test]
fn legacy_session_delete_removes_only_the_last_duplicate() {
    init_logging();
    let legacy = r#"{
        "topics": {"current": [{"id": "k1", "title": "Weekly", "tags": [], "favorited": false, "archived": false}], "archived": []},
        "sessions": [{"id": "s1", "topicId": "k1", "content": "dup", "createdAt": 5, "favorited": false}],
        "feed": [
            {"topicId": "k1", "meta": "input", "content": "dup"},
            {"topicId": "k1", "meta": "input", "content": "other"},
            {"topicId": "k1", "meta": "input", "content": "dup"}
        ]
    }"#;
    let snapshot: UiSnapshot = serde_json::from_str(legacy).expect("legacy snapshot");
    let state = restore(snapshot);
    let ids: Vec<String> = state.feed().iter().map(|e| e.id.clone()).collect();
    assert_eq!(ids.len(), 3);

    let (state, _) = update(state, Msg::DeleteSession("s1".into()));

    let remaining: Vec<(String, String)> = state
        .feed()
        .iter()
        .map(|e| (e.id.clone(), e.content.clone()))
        .collect();
    assert_eq!(
        remaining,
        vec![
            (ids[0].clone(), "dup".to_string()),
            (ids[1].clone(), "other".to_string()),
        ]
    );
    assert!(state.sessions().find("s1").is_none());
}
