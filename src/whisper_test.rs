use super::*;

#[test]
fn default_is_inactive() {
    let state = WhisperState::default();
    assert!(!state.is_active());
    assert!(state.target_id().is_none());
    assert!(state.target_name().is_none());
}

#[test]
fn start_sets_both_id_and_name() {
    let mut state = WhisperState::default();
    state.start(TargetId::new("42"), "Bob".to_owned());
    assert!(state.is_active());
    assert_eq!(state.target_id(), Some(&TargetId::new("42")));
    assert_eq!(state.target_name(), Some("Bob"));
}

#[test]
fn start_replaces_previous_target() {
    let mut state = WhisperState::default();
    state.start(TargetId::new("1"), "Ann".to_owned());
    state.start(TargetId::new("2"), "Bob".to_owned());
    assert_eq!(state.target_name(), Some("Bob"));
    assert_eq!(state.target_id(), Some(&TargetId::new("2")));
}

#[test]
fn clear_returns_target_and_clears_both() {
    let mut state = WhisperState::default();
    state.start(TargetId::new("42"), "Bob".to_owned());
    let prev = state.clear().expect("target was set");
    assert_eq!(prev.name, "Bob");
    assert!(state.target_id().is_none());
    assert!(state.target_name().is_none());
    assert!(state.clear().is_none());
}
