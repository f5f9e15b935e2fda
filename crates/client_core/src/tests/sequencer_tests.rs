use super::*;
use crate::ProjectIndex;
use shared::protocol::ResourceDetail;
use std::time::{Duration, Instant};

const STEP: Duration = Duration::from_millis(801);

fn detail(name: &str, assignments: &[(&str, f64)]) -> ResourceDetail {
    let mut detail = ResourceDetail {
        resource: name.to_string(),
        ..ResourceDetail::default()
    };
    for (project, fraction) in assignments {
        detail
            .current_projects_bandwidth_breakdown
            .insert((*project).to_string(), *fraction);
    }
    detail
}

/// `{A: [r1, r2], B: [r3]}` from the scenario in the observed data.
fn two_project_index() -> ProjectIndex {
    ProjectIndex::from_details(&[
        detail("r1", &[("A", 0.5)]),
        detail("r2", &[("A", 0.25)]),
        detail("r3", &[("B", 0.75)]),
    ])
}

fn names(entities: &[SceneEntity]) -> Vec<&str> {
    entities
        .iter()
        .map(|entity| entity.record.name.as_str())
        .collect()
}

#[test]
fn first_selection_mounts_steady_without_scheduling() {
    let index = two_project_index();
    let mut seq = SelectionSequencer::default();
    let t0 = Instant::now();

    seq.request_selection("A", &index, t0);

    assert_eq!(seq.phase(), TransitionPhase::Idle);
    assert_eq!(seq.next_deadline(), None);
    assert_eq!(seq.epoch(), 0);
    assert_eq!(names(seq.current_entities()), ["r1", "r2"]);
    assert!(seq
        .current_entities()
        .iter()
        .all(|entity| entity.motion == EntityMotion::Steady));
}

#[test]
fn reselecting_the_current_project_is_a_no_op() {
    let index = two_project_index();
    let mut seq = SelectionSequencer::default();
    let t0 = Instant::now();
    seq.request_selection("A", &index, t0);

    seq.request_selection("A", &index, t0 + STEP);

    assert_eq!(seq.phase(), TransitionPhase::Idle);
    assert_eq!(seq.next_deadline(), None);
    assert_eq!(seq.epoch(), 0);
}

#[test]
fn unknown_keys_are_ignored() {
    let index = two_project_index();
    let mut seq = SelectionSequencer::default();
    let t0 = Instant::now();

    seq.request_selection("nope", &index, t0);

    assert_eq!(seq.phase(), TransitionPhase::Idle);
    assert!(seq.current_entities().is_empty());
    assert_eq!(seq.current_key(), None);
}

#[test]
fn full_switch_runs_exit_swap_enter_settle() {
    let index = two_project_index();
    let mut seq = SelectionSequencer::default();
    let t0 = Instant::now();
    seq.request_selection("A", &index, t0);

    seq.request_selection("B", &index, t0);
    assert_eq!(seq.phase(), TransitionPhase::Exiting);
    assert_eq!(names(seq.exiting_entities()), ["r1", "r2"]);
    assert!(seq.current_entities().is_empty());
    assert!(seq
        .exiting_entities()
        .iter()
        .all(|entity| entity.motion == EntityMotion::Exiting));

    // Nothing advances before the exit deadline.
    assert!(!seq.tick(&index, t0 + Duration::from_millis(400)));
    assert_eq!(seq.phase(), TransitionPhase::Exiting);

    // Swap: old figures unmount, new ones mount entering, epoch bumps.
    assert!(seq.tick(&index, t0 + STEP));
    assert_eq!(seq.phase(), TransitionPhase::Entering);
    assert_eq!(seq.epoch(), 1);
    assert!(seq.exiting_entities().is_empty());
    assert_eq!(names(seq.current_entities()), ["r3"]);
    assert_eq!(seq.current_entities()[0].slot_index, 0);
    assert_eq!(
        seq.current_entities()[0].motion,
        EntityMotion::Entering
    );

    // Settle: everything steady, nothing scheduled.
    assert!(seq.tick(&index, t0 + STEP + STEP));
    assert_eq!(seq.phase(), TransitionPhase::Idle);
    assert_eq!(seq.next_deadline(), None);
    assert!(seq.exiting_entities().is_empty());
    assert!(seq
        .current_entities()
        .iter()
        .all(|entity| entity.motion == EntityMotion::Steady));
    assert_eq!(seq.current_key(), Some("B"));
}

#[test]
fn resources_beyond_the_slot_list_are_dropped() {
    let details: Vec<ResourceDetail> = (0..7)
        .map(|i| detail(&format!("r{i}"), &[("big", 0.1)]))
        .collect();
    let index = ProjectIndex::from_details(&details);
    let mut seq = SelectionSequencer::default();

    seq.request_selection("big", &index, Instant::now());

    assert_eq!(seq.current_entities().len(), PREDEFINED_SLOTS.len());
    assert_eq!(
        names(seq.current_entities()),
        ["r0", "r1", "r2", "r3", "r4"]
    );
    let slot_indices: Vec<_> = seq
        .current_entities()
        .iter()
        .map(|entity| entity.slot_index)
        .collect();
    assert_eq!(slot_indices, [0, 1, 2, 3, 4]);
}

#[test]
fn mid_transition_requests_queue_behind_settle_and_latest_wins() {
    let index = ProjectIndex::from_details(&[
        detail("r1", &[("A", 0.5)]),
        detail("r2", &[("B", 0.5)]),
        detail("r3", &[("C", 0.5)]),
    ]);
    let mut seq = SelectionSequencer::default();
    let t0 = Instant::now();
    seq.request_selection("A", &index, t0);

    seq.request_selection("B", &index, t0);
    // Two requests land mid-flight; only the last survives.
    seq.request_selection("A", &index, t0 + Duration::from_millis(100));
    seq.request_selection("C", &index, t0 + Duration::from_millis(200));

    // The in-flight transition still completes to B first.
    assert!(seq.tick(&index, t0 + STEP));
    assert_eq!(seq.current_key(), Some("B"));
    assert_eq!(seq.epoch(), 1);

    // Settle applies the queued C, starting a fresh exit phase.
    assert!(seq.tick(&index, t0 + STEP + STEP));
    assert_eq!(seq.phase(), TransitionPhase::Exiting);
    assert_eq!(names(seq.exiting_entities()), ["r2"]);

    let t1 = t0 + STEP + STEP;
    assert!(seq.tick(&index, t1 + STEP));
    assert!(seq.tick(&index, t1 + STEP + STEP));
    assert_eq!(seq.phase(), TransitionPhase::Idle);
    assert_eq!(seq.current_key(), Some("C"));
    assert_eq!(names(seq.current_entities()), ["r3"]);
    assert_eq!(seq.epoch(), 2);
}

#[test]
fn queued_request_matching_the_landed_key_is_dropped_at_settle() {
    let index = two_project_index();
    let mut seq = SelectionSequencer::default();
    let t0 = Instant::now();
    seq.request_selection("A", &index, t0);
    seq.request_selection("B", &index, t0);
    seq.request_selection("B", &index, t0 + Duration::from_millis(50));

    assert!(seq.tick(&index, t0 + STEP));
    assert!(seq.tick(&index, t0 + STEP + STEP));

    assert_eq!(seq.phase(), TransitionPhase::Idle);
    assert_eq!(seq.current_key(), Some("B"));
    assert_eq!(seq.epoch(), 1);
}

#[test]
fn missing_previous_key_yields_an_empty_exit_set() {
    let before = two_project_index();
    let mut seq = SelectionSequencer::default();
    let t0 = Instant::now();
    seq.request_selection("A", &before, t0);

    // The backend refresh dropped project A entirely.
    let after = ProjectIndex::from_details(&[detail("r3", &[("B", 0.75)])]);
    seq.request_selection("B", &after, t0 + STEP);

    assert_eq!(seq.phase(), TransitionPhase::Exiting);
    assert!(seq.exiting_entities().is_empty());

    let t1 = t0 + STEP;
    assert!(seq.tick(&after, t1 + STEP));
    assert!(seq.tick(&after, t1 + STEP + STEP));
    assert_eq!(names(seq.current_entities()), ["r3"]);
}

#[test]
fn phase_progress_tracks_the_injected_clock() {
    let index = two_project_index();
    let mut seq = SelectionSequencer::default();
    let t0 = Instant::now();
    seq.request_selection("A", &index, t0);
    assert_eq!(seq.phase_progress(t0), None);

    seq.request_selection("B", &index, t0);
    let quarter = seq
        .phase_progress(t0 + Duration::from_millis(200))
        .expect("progress while exiting");
    assert!((quarter - 0.25).abs() < 1e-3);
    assert_eq!(seq.phase_progress(t0 + STEP + STEP), Some(1.0));
}
