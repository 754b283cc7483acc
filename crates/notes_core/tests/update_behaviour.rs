use std::collections::BTreeSet;
use std::sync::Once;

use notes_core::{update, AppState, Effect, Msg, Tab, TopicSeed};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(notes_logging::initialize_for_tests);
}

fn apply(state: AppState, msgs: Vec<Msg>) -> AppState {
    msgs.into_iter().fold(state, |state, msg| update(state, msg).0)
}

fn add_topic(state: AppState) -> (AppState, String) {
    let (state, _) = update(state, Msg::AddTopic);
    let id = state.topics().current[0].id.clone();
    (state, id)
}

fn set(tags: &[&str]) -> BTreeSet<String> {
    tags.iter().map(|t| t.to_string()).collect()
}

#[test]
fn add_topic_inherits_selected_tags_and_goes_first() {
    init_logging();
    let state = apply(
        AppState::new(),
        vec![
            Msg::AddTag("A".into()),
            Msg::AddTag("B".into()),
            Msg::AddTopic,
            Msg::ToggleTagSelection("A".into()),
            Msg::ToggleTagSelection("B".into()),
        ],
    );
    let (mut state, effects) = update(state, Msg::AddTopic);

    assert_eq!(effects, vec![Effect::Persist]);
    assert!(state.consume_dirty());
    let current = &state.topics().current;
    assert_eq!(current.len(), 2);
    assert_eq!(current[0].tags, set(&["A", "B"]));
    assert!(current[1].tags.is_empty());
    assert!(current[0].title.contains(&current[0].id));
    assert!(!current[0].favorited);
    assert!(!current[0].archived);
}

#[test]
fn topic_ids_are_unique_across_collections() {
    init_logging();
    let mut state = AppState::new();
    for _ in 0..5 {
        state = update(state, Msg::AddTopic).0;
    }
    let first = state.topics().current[4].id.clone();
    state = update(state, Msg::ToggleTopicArchive(first)).0;
    state = update(state, Msg::AddTopic).0;

    let ids: BTreeSet<_> = state
        .topics()
        .current
        .iter()
        .chain(state.topics().archived.iter())
        .map(|t| t.id.clone())
        .collect();
    assert_eq!(ids.len(), 6);
}

#[test]
fn favorited_topic_cannot_be_archived_or_deleted() {
    init_logging();
    let (state, id) = add_topic(AppState::new());
    let (mut state, _) = update(state, Msg::ToggleTopicFavorite(id.clone()));
    state.consume_dirty();
    let before = state.topics().clone();

    let (state, effects) = update(state, Msg::ToggleTopicArchive(id.clone()));
    assert!(effects.is_empty());
    let (mut state, effects) = update(state, Msg::DeleteTopic(id.clone()));
    assert!(effects.is_empty());

    assert_eq!(state.topics(), &before);
    assert!(!state.consume_dirty());

    // Clearing the favorite unblocks it.
    let state = apply(
        state,
        vec![Msg::ToggleTopicFavorite(id.clone()), Msg::ToggleTopicArchive(id.clone())],
    );
    assert!(state.topics().current.is_empty());
    assert_eq!(state.topics().archived[0].id, id);
    assert!(state.topics().archived[0].archived);
}

#[test]
fn archive_toggle_moves_between_lists() {
    init_logging();
    let (state, a) = add_topic(AppState::new());
    let (state, b) = add_topic(state);

    let state = apply(state, vec![Msg::ToggleTopicArchive(a.clone()), Msg::ToggleTopicArchive(b.clone())]);
    let archived: Vec<_> = state.topics().archived.iter().map(|t| t.id.clone()).collect();
    assert_eq!(archived, vec![b.clone(), a.clone()]);

    let state = apply(state, vec![Msg::ToggleTopicArchive(a.clone())]);
    assert_eq!(state.topics().current[0].id, a);
    assert!(!state.topics().current[0].archived);
    assert_eq!(state.topics().archived.len(), 1);
}

#[test]
fn unknown_topic_operations_are_noops() {
    init_logging();
    let (state, _) = add_topic(AppState::new());
    let before = state.clone();

    for msg in [
        Msg::ToggleTopicFavorite("missing".into()),
        Msg::ToggleTopicArchive("missing".into()),
        Msg::DeleteTopic("missing".into()),
        Msg::SetActiveTopic("missing".into()),
        Msg::ExportTopic("missing".into()),
    ] {
        let (next, effects) = update(before.clone(), msg);
        assert!(effects.is_empty());
        assert_eq!(next.topics(), before.topics());
    }
}

#[test]
fn delete_topic_cascades_to_sessions_and_feed() {
    init_logging();
    let (state, a) = add_topic(AppState::new());
    let (state, b) = add_topic(state);
    let state = apply(
        state,
        vec![
            Msg::SetActiveTopic(a.clone()),
            Msg::InputChanged("for a".into()),
            Msg::Submit { now: 1 },
            Msg::InputChanged("again a".into()),
            Msg::Submit { now: 2 },
            Msg::SetActiveTopic(b.clone()),
            Msg::InputChanged("for b".into()),
            Msg::Submit { now: 3 },
        ],
    );
    assert_eq!(state.sessions().len(), 3);
    assert_eq!(state.feed().len(), 3);

    let (state, effects) = update(state, Msg::DeleteTopic(a.clone()));
    assert_eq!(effects, vec![Effect::Persist]);
    assert!(!state.topics().contains(&a));
    assert!(state
        .sessions()
        .iter()
        .all(|s| s.topic_id.as_deref() == Some(b.as_str())));
    assert_eq!(state.sessions().len(), 1);
    assert!(state
        .feed()
        .iter()
        .all(|e| e.topic_id.as_deref() == Some(b.as_str())));
    assert_eq!(state.feed().len(), 1);
}

#[test]
fn active_topic_falls_back_to_first_current() {
    init_logging();
    assert_eq!(AppState::new().active_topic_id(), None);

    let (state, a) = add_topic(AppState::new());
    let (state, b) = add_topic(state);
    assert_eq!(state.active_topic_id(), Some(b.as_str()));

    let (state, _) = update(state, Msg::SetActiveTopic(a.clone()));
    assert_eq!(state.active_topic_id(), Some(a.as_str()));

    let (state, _) = update(state, Msg::DeleteTopic(a));
    assert_eq!(state.explicit_active_topic(), None);
    assert_eq!(state.active_topic_id(), Some(b.as_str()));
}

#[test]
fn rename_trims_and_keeps_old_title_when_blank() {
    init_logging();
    let (state, id) = add_topic(AppState::new());
    let old = state.topics().current[0].title.clone();

    let (state, effects) = update(
        state,
        Msg::RenameTopic {
            id: id.clone(),
            title: "   ".into(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.topics().current[0].title, old);

    let (state, _) = update(
        state,
        Msg::RenameTopic {
            id,
            title: " Weekly report ".into(),
        },
    );
    assert_eq!(state.topics().current[0].title, "Weekly report");
}

#[test]
fn tag_filter_is_conjunctive_in_view() {
    init_logging();
    let state = apply(
        AppState::new(),
        vec![
            Msg::ToggleTagSelection("x".into()),
            Msg::AddTopic,
            Msg::ToggleTagSelection("y".into()),
            Msg::AddTopic,
            Msg::ToggleTagSelection("x".into()),
            Msg::AddTopic,
        ],
    );
    // Topics now carry {x}, {x,y}, {y}; selection is {y}.
    assert_eq!(state.view().current_topics.len(), 2);

    let state = apply(state, vec![Msg::ToggleTagSelection("x".into())]);
    let view = state.view();
    assert_eq!(view.current_topics.len(), 1);
    assert_eq!(view.current_topics[0].tags, vec!["x".to_string(), "y".to_string()]);

    let state = apply(
        state,
        vec![Msg::ToggleTagSelection("x".into()), Msg::ToggleTagSelection("y".into())],
    );
    assert_eq!(state.view().current_topics.len(), 3);
}

#[test]
fn blank_tag_is_ignored_and_duplicates_collapse() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::AddTag("   ".into()));
    assert!(effects.is_empty());
    assert!(state.tags().is_empty());

    let state = apply(state, vec![Msg::AddTag("plan".into()), Msg::AddTag(" plan ".into())]);
    assert_eq!(state.tags().len(), 1);
}

#[test]
fn removing_a_tag_leaves_topic_references_in_place() {
    init_logging();
    let state = apply(
        AppState::new(),
        vec![
            Msg::AddTag("legal".into()),
            Msg::ToggleTagSelection("legal".into()),
            Msg::AddTopic,
        ],
    );
    let (state, effects) = update(state, Msg::RemoveTag("legal".into()));

    assert_eq!(effects, vec![Effect::Persist]);
    assert!(!state.tags().contains("legal"));
    assert!(state.selected_tags().is_empty());
    assert!(state.topics().current[0].tags.contains("legal"));
}

#[test]
fn seed_adds_topics_only_when_none_exist() {
    init_logging();
    let seeds = vec![
        TopicSeed {
            title: "Weekly report".into(),
            tags: vec!["requirements".into()],
            favorited: false,
        },
        TopicSeed {
            title: "Regulations".into(),
            tags: vec!["legal".into()],
            favorited: true,
        },
    ];
    let (state, _) = update(
        AppState::new(),
        Msg::SeedDefaults {
            tags: vec!["requirements".into(), "legal".into()],
            topics: seeds.clone(),
        },
    );
    assert_eq!(state.tags().len(), 2);
    assert_eq!(state.topics().current[0].title, "Weekly report");
    assert!(state.topics().current[1].favorited);

    let (state, _) = update(
        state,
        Msg::SeedDefaults {
            tags: Vec::new(),
            topics: seeds,
        },
    );
    assert_eq!(state.topics().current.len(), 2);
}

#[test]
fn mode_and_tab_changes_persist() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::SetTab(Tab::Archived));
    assert_eq!(effects, vec![Effect::Persist]);
    assert_eq!(state.tab(), Tab::Archived);

    let (mut state, effects) = update(state, Msg::SetAutoMode(true));
    assert!(effects.is_empty());
    assert!(state.auto_mode());
    assert!(state.consume_dirty());
}

#[test]
fn export_carries_sessions_oldest_first() {
    init_logging();
    let (state, id) = add_topic(AppState::new());
    let state = apply(
        state,
        vec![
            Msg::InputChanged("first".into()),
            Msg::Submit { now: 10 },
            Msg::InputChanged("second".into()),
            Msg::Submit { now: 20 },
        ],
    );

    let (_, effects) = update(state, Msg::ExportTopic(id.clone()));
    match effects.as_slice() {
        [Effect::ExportTopic { topic, sessions }] => {
            assert_eq!(topic.id, id);
            let contents: Vec<_> = sessions.iter().map(|s| s.content.as_str()).collect();
            assert_eq!(contents, vec!["first", "second"]);
        }
        other => panic!("unexpected effects: {other:?}"),
    }
}

#[test]
fn remove_tag_trims_like_add_tag() {
    init_logging();
    let state = apply(
        AppState::new(),
        vec![
            Msg::AddTag(" work ".into()),
            Msg::ToggleTagSelection(" work ".into()),
        ],
    );
    assert!(state.tags().contains("work"));

    let (state, effects) = update(state, Msg::RemoveTag(" work ".into()));

    assert_eq!(effects, vec![Effect::Persist]);
    assert!(!state.tags().contains("work"));
    assert!(state.selected_tags().is_empty());
}
