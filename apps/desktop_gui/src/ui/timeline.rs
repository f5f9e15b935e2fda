//! The scene's ambient animation document: a static JSON sheet
//! bundled with the app, read once at startup, and passed through to
//! the camera. Its contents are opaque to the application core.

use serde::Deserialize;

const BUNDLED_TIMELINE: &str = include_str!("../../assets/timeline.json");

#[derive(Debug, Clone, Deserialize)]
pub struct SceneTimeline {
    pub name: String,
    pub sheet: String,
    #[serde(rename = "loop")]
    pub looped: bool,
    pub orbit: Vec<OrbitKeyframe>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OrbitKeyframe {
    pub t: f32,
    pub yaw_degrees: f32,
}

impl SceneTimeline {
    pub fn bundled() -> Self {
        match serde_json::from_str(BUNDLED_TIMELINE) {
            Ok(timeline) => timeline,
            Err(err) => {
                tracing::warn!("bundled timeline document is invalid, using default orbit: {err}");
                Self::default_orbit()
            }
        }
    }

    fn default_orbit() -> Self {
        Self {
            name: "Conference".to_string(),
            sheet: "Scene".to_string(),
            looped: true,
            orbit: vec![
                OrbitKeyframe {
                    t: 0.0,
                    yaw_degrees: 0.0,
                },
                OrbitKeyframe {
                    t: 30.0,
                    yaw_degrees: 360.0,
                },
            ],
        }
    }

    pub fn duration(&self) -> f32 {
        self.orbit.last().map(|key| key.t).unwrap_or(0.0)
    }

    /// Camera yaw at `elapsed` seconds since the scene started,
    /// linearly interpolated between keyframes. Loops when the
    /// document says so, otherwise holds the final keyframe.
    pub fn yaw_at(&self, elapsed: f32) -> f32 {
        let Some(first) = self.orbit.first() else {
            return 0.0;
        };
        let duration = self.duration();
        if duration <= 0.0 {
            return first.yaw_degrees;
        }
        let t = if self.looped {
            elapsed.rem_euclid(duration)
        } else {
            elapsed.clamp(0.0, duration)
        };
        for pair in self.orbit.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t >= a.t && t <= b.t {
                let span = b.t - a.t;
                if span <= 0.0 {
                    return b.yaw_degrees;
                }
                let f = (t - a.t) / span;
                return a.yaw_degrees + f * (b.yaw_degrees - a.yaw_degrees);
            }
        }
        self.orbit.last().map(|key| key.yaw_degrees).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_key_sweep(looped: bool) -> SceneTimeline {
        SceneTimeline {
            name: "test".to_string(),
            sheet: "Scene".to_string(),
            looped,
            orbit: vec![
                OrbitKeyframe {
                    t: 0.0,
                    yaw_degrees: 0.0,
                },
                OrbitKeyframe {
                    t: 10.0,
                    yaw_degrees: 90.0,
                },
            ],
        }
    }

    #[test]
    fn bundled_document_parses() {
        let timeline = SceneTimeline::bundled();
        assert_eq!(timeline.name, "Conference");
        assert_eq!(timeline.sheet, "Scene");
        assert!(timeline.looped);
        assert!(timeline.orbit.len() >= 2);
    }

    #[test]
    fn interpolates_between_keyframes() {
        let timeline = two_key_sweep(false);
        assert_eq!(timeline.yaw_at(0.0), 0.0);
        assert!((timeline.yaw_at(5.0) - 45.0).abs() < 1e-4);
        assert!((timeline.yaw_at(10.0) - 90.0).abs() < 1e-4);
    }

    #[test]
    fn loops_when_the_document_loops() {
        let timeline = two_key_sweep(true);
        assert!((timeline.yaw_at(15.0) - 45.0).abs() < 1e-4);
    }

    #[test]
    fn holds_the_last_keyframe_when_not_looping() {
        let timeline = two_key_sweep(false);
        assert!((timeline.yaw_at(25.0) - 90.0).abs() < 1e-4);
    }

    #[test]
    fn empty_orbit_is_inert() {
        let timeline = SceneTimeline {
            name: "empty".to_string(),
            sheet: "Scene".to_string(),
            looped: true,
            orbit: Vec::new(),
        };
        assert_eq!(timeline.yaw_at(3.0), 0.0);
    }
}
