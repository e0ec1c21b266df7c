use std::sync::Once;

use propoto_core::{
    update, AppState, ComposeField, Effect, EpochMs, GenerateResponse, Msg, ProposalContent,
    ProposalId, ProposalRecord, ProposalStatus, ViewState, MATCH_WINDOW_MS,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(propoto_logging::initialize_for_tests);
}

fn record(id: &str, name: &str, url: &str, pain: &str, created_at: EpochMs) -> ProposalRecord {
    ProposalRecord {
        id: ProposalId::from(id),
        prospect_name: name.to_string(),
        prospect_url: url.to_string(),
        pain_points: pain.to_string(),
        content: ProposalContent::default(),
        presentation_url: None,
        pdf_url: None,
        pptx_url: None,
        status: ProposalStatus::Draft,
        org_id: "demo-org-1".to_string(),
        created_at,
        updated_at: created_at,
        views: 0,
        last_viewed_at: None,
    }
}

/// Drives the state machine to a provisional result for the given prospect.
fn provisional(name: &str, url: &str, pain: &str, generated_at: EpochMs) -> AppState {
    let (state, _) = update(AppState::new(), Msg::ComposeStarted);
    let mut state = state;
    for (field, value) in [
        (ComposeField::ProspectName, name),
        (ComposeField::ProspectUrl, url),
        (ComposeField::PainPoints, pain),
    ] {
        let (next, _) = update(
            state,
            Msg::ComposeFieldEdited {
                field,
                value: value.to_string(),
            },
        );
        state = next;
    }
    let (state, effects) = update(state, Msg::ComposeSubmitted);
    let seq = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Generate { seq, .. } => Some(*seq),
            _ => None,
        })
        .expect("generate effect");
    let (state, _) = update(
        state,
        Msg::GenerationSucceeded {
            seq,
            response: GenerateResponse {
                success: true,
                data: ProposalContent::default(),
                ..GenerateResponse::default()
            },
            generated_at,
        },
    );
    state
}

fn snapshot(state: AppState, records: Vec<ProposalRecord>) -> AppState {
    let (state, effects) = update(state, Msg::SnapshotArrived(records));
    assert!(effects.is_empty());
    state
}

fn bound_id(state: &AppState) -> Option<ProposalId> {
    state.view().result.and_then(|result| result.bound)
}

const T0: EpochMs = 10 * 60 * 1000;

#[test]
fn snapshot_within_window_binds_the_result() {
    init_logging();
    let state = provisional("Acme", "acme.com", "low conversion", T0);
    let state = snapshot(
        state,
        vec![record("p1", "Acme", "acme.com", "low conversion", T0 + 2_000)],
    );

    assert_eq!(bound_id(&state), Some(ProposalId::from("p1")));
    let result = state.view().result.unwrap();
    assert!(!result.syncing);
    assert!(result.editing_enabled);
    assert_eq!(result.result.created_at, T0 + 2_000);
}

#[test]
fn no_candidates_keeps_the_result_provisional() {
    init_logging();
    let state = provisional("Acme", "acme.com", "", T0);
    let state = snapshot(
        state,
        vec![record("p1", "Globex", "globex.com", "", T0 + 1_000)],
    );

    let result = state.view().result.unwrap();
    assert!(result.syncing);
    assert_eq!(result.bound, None);
}

#[test]
fn binding_is_sticky_across_later_snapshots() {
    init_logging();
    let state = provisional("Acme", "acme.com", "", T0);
    let state = snapshot(state, vec![record("p1", "Acme", "acme.com", "", T0 + 1_000)]);
    assert_eq!(bound_id(&state), Some(ProposalId::from("p1")));

    // A newer record for the same prospect arrives; the binding must not move.
    let state = snapshot(
        state,
        vec![
            record("p2", "Acme", "acme.com", "", T0 + 30_000),
            record("p1", "Acme", "acme.com", "", T0 + 1_000),
        ],
    );
    assert_eq!(bound_id(&state), Some(ProposalId::from("p1")));
    assert!(!state.view().result.unwrap().syncing);
}

#[test]
fn acceptance_window_is_strict_five_minutes() {
    init_logging();
    // One millisecond inside the window binds.
    let state = provisional("Acme", "acme.com", "", T0);
    let state = snapshot(
        state,
        vec![record("p1", "Acme", "acme.com", "", T0 + MATCH_WINDOW_MS - 1)],
    );
    assert_eq!(bound_id(&state), Some(ProposalId::from("p1")));

    // At or past the window the candidate is rejected.
    for offset in [MATCH_WINDOW_MS, MATCH_WINDOW_MS + 1_000] {
        let state = provisional("Acme", "acme.com", "", T0);
        let state = snapshot(state, vec![record("p1", "Acme", "acme.com", "", T0 + offset)]);
        assert_eq!(bound_id(&state), None, "offset {offset} should not bind");
        assert!(state.view().result.unwrap().syncing);
    }
}

#[test]
fn window_applies_on_both_sides_of_the_generation_time() {
    init_logging();
    let state = provisional("Acme", "acme.com", "", T0);
    let state = snapshot(
        state,
        vec![record("p1", "Acme", "acme.com", "", T0 - (MATCH_WINDOW_MS - 1))],
    );
    assert_eq!(bound_id(&state), Some(ProposalId::from("p1")));
}

#[test]
fn newest_candidate_wins_when_several_match() {
    init_logging();
    let state = provisional("Acme", "acme.com", "", T0);
    let state = snapshot(
        state,
        vec![
            record("older", "Acme", "acme.com", "", T0 + 1_000),
            record("newer", "Acme", "acme.com", "", T0 + 4_000),
        ],
    );

    assert_eq!(bound_id(&state), Some(ProposalId::from("newer")));
}

#[test]
fn empty_pain_points_match_on_name_and_url_alone() {
    init_logging();
    let state = provisional("Acme", "acme.com", "", T0);
    let state = snapshot(
        state,
        vec![record("p1", "Acme", "acme.com", "whatever the agent scraped", T0 + 1_000)],
    );

    assert_eq!(bound_id(&state), Some(ProposalId::from("p1")));
}

#[test]
fn differing_pain_points_exclude_an_otherwise_matching_record() {
    init_logging();
    let state = provisional("Acme", "acme.com", "low conversion", T0);
    let state = snapshot(
        state,
        vec![record("p1", "Acme", "acme.com", "churn", T0 + 1_000)],
    );

    assert_eq!(bound_id(&state), None);
    assert!(state.view().result.unwrap().syncing);
}

#[test]
fn binding_adopts_the_record_status_and_timestamps() {
    init_logging();
    let state = provisional("Acme", "acme.com", "", T0);
    let mut persisted = record("p1", "Acme", "acme.com", "", T0 + 2_000);
    persisted.status = ProposalStatus::Sent;
    persisted.updated_at = T0 + 3_000;
    let state = snapshot(state, vec![persisted]);

    let result = state.view().result.unwrap();
    assert_eq!(result.result.status, ProposalStatus::Sent);
    assert_eq!(result.result.created_at, T0 + 2_000);
    assert_eq!(result.result.updated_at, T0 + 3_000);
}

#[test]
fn reset_discards_the_pending_match_for_good() {
    init_logging();
    let state = provisional("Acme", "acme.com", "", T0);
    let (state, _) = update(state, Msg::ResetToList);

    // The snapshot that would have matched arrives after the user left.
    let state = snapshot(state, vec![record("p1", "Acme", "acme.com", "", T0 + 1_000)]);

    let view = state.view();
    assert_eq!(view.view, ViewState::List);
    assert!(view.result.is_none());
    assert_eq!(view.metrics.total, 1);
}

#[test]
fn stale_record_is_rejected_until_the_real_one_arrives() {
    init_logging();
    // A proposal for the same prospect from thirty minutes ago already exists.
    let generated_at = 30 * 60 * 1000;
    let stale = record("old", "Acme", "acme.com", "low conversion", 0);

    let state = provisional("Acme", "acme.com", "low conversion", generated_at);
    let state = snapshot(state, vec![stale.clone()]);
    assert_eq!(bound_id(&state), None);
    assert!(state.view().result.unwrap().syncing);

    // The write from this generation becomes visible a few seconds later.
    let fresh = record("new", "Acme", "acme.com", "low conversion", generated_at + 5_000);
    let state = snapshot(state, vec![fresh, stale]);
    assert_eq!(bound_id(&state), Some(ProposalId::from("new")));
}

#[test]
fn reconciliation_never_runs_for_a_selected_record() {
    init_logging();
    let records = vec![
        record("p1", "Acme", "acme.com", "", T0),
        record("p2", "Globex", "globex.com", "", T0 + 1_000),
    ];
    let state = snapshot(AppState::new(), records.clone());
    let (state, effects) = update(
        state,
        Msg::ProposalSelected {
            id: ProposalId::from("p1"),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(bound_id(&state), Some(ProposalId::from("p1")));

    // Further snapshots leave the selection alone.
    let state = snapshot(state, records);
    assert_eq!(bound_id(&state), Some(ProposalId::from("p1")));
}
