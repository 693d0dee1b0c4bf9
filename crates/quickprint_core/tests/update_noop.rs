use quickprint_core::{update, AppState, Msg, PrintSettings, TxId};

#[test]
fn stale_progress_leaves_state_untouched() {
    let state = AppState::new();
    let (mut next, effects) = update(
        state.clone(),
        Msg::EncodingProgress {
            session: 42,
            percent: 50,
        },
    );

    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
    assert_eq!(state, next);
}

#[test]
fn unchanged_settings_do_not_dirty_state() {
    let (mut next, effects) = update(
        AppState::new(),
        Msg::SettingsChanged(PrintSettings::default()),
    );

    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

#[test]
fn hand_off_failure_for_unknown_txid_is_ignored() {
    let state = AppState::new();
    let (next, effects) = update(
        state.clone(),
        Msg::HandOffFailed {
            txid: TxId::from("never-sent"),
            reason: "no handler".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state, next);
}
