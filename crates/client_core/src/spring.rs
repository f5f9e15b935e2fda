//! Damped-spring easing for the scene's enter/exit figure motion.

/// A mass-spring-damper released from rest at 0 toward a target of 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub mass: f32,
    pub tension: f32,
    pub friction: f32,
}

impl Spring {
    /// The scene transition spring. tension 70 / friction 14 at unit
    /// mass is underdamped, so figures overshoot their slot slightly
    /// before settling.
    pub const SCENE: Self = Self {
        mass: 1.0,
        tension: 70.0,
        friction: 14.0,
    };

    /// Progress toward the target `t` seconds after release, solved
    /// analytically from the oscillator equation. Not clamped: the
    /// underdamped case exceeds 1 around its overshoot peak.
    pub fn sample(&self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        let omega = (self.tension / self.mass).sqrt();
        let zeta = self.friction / (2.0 * (self.tension * self.mass).sqrt());
        if zeta < 1.0 {
            let decay = (-zeta * omega * t).exp();
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            1.0 - decay * ((omega_d * t).cos() + (zeta * omega / omega_d) * (omega_d * t).sin())
        } else {
            // Critically/over-damped fallback; the scene constants never hit it.
            let decay = (-omega * t).exp();
            1.0 - decay * (1.0 + omega * t)
        }
    }
}

#[cfg(test)]
#[path = "tests/spring_tests.rs"]
mod tests;
