use super::*;

#[test]
fn starts_at_rest() {
    assert_eq!(Spring::SCENE.sample(0.0), 0.0);
    assert_eq!(Spring::SCENE.sample(-1.0), 0.0);
}

#[test]
fn settles_within_precision_by_the_transition_duration() {
    // 800 ms is the transition duration used by the sequencer.
    let settled = Spring::SCENE.sample(0.8);
    assert!(
        (settled - 1.0).abs() < 0.01,
        "expected settle near 1.0, got {settled}"
    );
}

#[test]
fn underdamped_scene_spring_overshoots_its_target() {
    // Damping ratio 14 / (2 * sqrt(70)) ≈ 0.84, so the first peak
    // lands past the target before the motion decays back.
    let overshoot = (0..800)
        .map(|ms| Spring::SCENE.sample(ms as f32 / 1000.0))
        .fold(f32::MIN, f32::max);
    assert!(
        overshoot > 1.0,
        "expected overshoot above 1.0, got {overshoot}"
    );
    assert!(overshoot < 1.05, "overshoot should stay slight, got {overshoot}");
}

#[test]
fn approach_is_monotonic_before_the_first_peak() {
    let mut previous = 0.0;
    for ms in (25..650).step_by(25) {
        let sample = Spring::SCENE.sample(ms as f32 / 1000.0);
        assert!(
            sample > previous,
            "sample at {ms} ms regressed: {sample} <= {previous}"
        );
        previous = sample;
    }
}
