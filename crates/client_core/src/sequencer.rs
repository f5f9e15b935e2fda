//! Project-switch transition sequencing for the scene view.
//!
//! Switching projects runs a fixed four-step sequence: exit the old
//! figures, swap, enter the new ones, settle. The steps form an
//! explicit state machine advanced by [`SelectionSequencer::tick`]
//! against a caller-supplied clock; the single stored deadline is the
//! cancellation primitive, and the `epoch` counter gives the GUI a
//! remount key so in-flight animations never bleed across
//! transitions. Requests arriving mid-transition are serialized: the
//! latest one is queued and applied at settle.

use std::time::{Duration, Instant};

use shared::domain::ResourceRecord;

use crate::slots::{SlotTransform, PREDEFINED_SLOTS};
use crate::ProjectIndex;

/// Exit and enter each take this long; a full switch is twice this.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    Idle,
    Exiting,
    Entering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityMotion {
    Steady,
    Entering,
    Exiting,
}

/// One mounted figure: a resource pinned to a slot, tagged with how
/// it is currently moving.
#[derive(Debug, Clone)]
pub struct SceneEntity {
    pub record: ResourceRecord,
    pub slot: SlotTransform,
    pub slot_index: usize,
    pub motion: EntityMotion,
}

#[derive(Debug)]
pub struct SelectionSequencer {
    phase: TransitionPhase,
    epoch: u64,
    duration: Duration,
    current_key: Option<String>,
    /// Committed destination of the in-flight transition.
    target_key: Option<String>,
    /// Latest request that arrived mid-transition; applied at settle.
    pending_key: Option<String>,
    current: Vec<SceneEntity>,
    exiting: Vec<SceneEntity>,
    phase_started: Option<Instant>,
    deadline: Option<Instant>,
}

impl Default for SelectionSequencer {
    fn default() -> Self {
        Self::new(TRANSITION_DURATION)
    }
}

impl SelectionSequencer {
    pub fn new(duration: Duration) -> Self {
        Self {
            phase: TransitionPhase::Idle,
            epoch: 0,
            duration,
            current_key: None,
            target_key: None,
            pending_key: None,
            current: Vec::new(),
            exiting: Vec::new(),
            phase_started: None,
            deadline: None,
        }
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == TransitionPhase::Idle
    }

    /// Strictly increases on every completed swap.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn current_key(&self) -> Option<&str> {
        self.current_key.as_deref()
    }

    pub fn current_entities(&self) -> &[SceneEntity] {
        &self.current
    }

    pub fn exiting_entities(&self) -> &[SceneEntity] {
        &self.exiting
    }

    /// When the next phase boundary fires; `None` while idle.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// 0..=1 progress through the running phase, for spring sampling.
    pub fn phase_progress(&self, now: Instant) -> Option<f32> {
        let started = self.phase_started?;
        let elapsed = now.saturating_duration_since(started).as_secs_f32();
        Some((elapsed / self.duration.as_secs_f32()).min(1.0))
    }

    /// Requests a switch to `key`. Ignored when `key` is already the
    /// current selection or is unknown to the index. The first-ever
    /// selection mounts directly in Steady state with no animation;
    /// a request during a transition only replaces the queued target.
    pub fn request_selection(&mut self, key: &str, index: &ProjectIndex, now: Instant) {
        if !index.contains(key) {
            return;
        }
        match self.phase {
            TransitionPhase::Idle => {
                if self.current_key.as_deref() == Some(key) {
                    return;
                }
                if self.current_key.is_none() {
                    self.current = mount_entities(index, key, EntityMotion::Steady);
                    self.current_key = Some(key.to_string());
                } else {
                    self.begin_exit(key, index, now);
                }
            }
            TransitionPhase::Exiting | TransitionPhase::Entering => {
                self.pending_key = Some(key.to_string());
            }
        }
    }

    /// Advances the machine once the running phase's deadline has
    /// passed. Returns true when state changed so callers know to
    /// repaint. Swap happens strictly after the exit duration and
    /// strictly before enter begins; settle strictly after the enter
    /// duration.
    pub fn tick(&mut self, index: &ProjectIndex, now: Instant) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        if now < deadline {
            return false;
        }
        match self.phase {
            TransitionPhase::Idle => false,
            TransitionPhase::Exiting => {
                self.exiting.clear();
                let target = self.target_key.take().unwrap_or_default();
                self.current = mount_entities(index, &target, EntityMotion::Entering);
                self.current_key = Some(target);
                self.epoch += 1;
                self.phase = TransitionPhase::Entering;
                self.phase_started = Some(now);
                self.deadline = Some(now + self.duration);
                true
            }
            TransitionPhase::Entering => {
                for entity in &mut self.current {
                    entity.motion = EntityMotion::Steady;
                }
                self.phase = TransitionPhase::Idle;
                self.phase_started = None;
                self.deadline = None;
                if let Some(pending) = self.pending_key.take() {
                    if self.current_key.as_deref() != Some(pending.as_str())
                        && index.contains(&pending)
                    {
                        self.begin_exit(&pending, index, now);
                    }
                }
                true
            }
        }
    }

    fn begin_exit(&mut self, target: &str, index: &ProjectIndex, now: Instant) {
        // The exit set is re-derived from the index, so a refreshed
        // index that dropped the previous key has nothing to animate
        // out and the old figures simply vanish at swap.
        self.exiting = self
            .current_key
            .as_deref()
            .map(|key| mount_entities(index, key, EntityMotion::Exiting))
            .unwrap_or_default();
        self.current.clear();
        self.target_key = Some(target.to_string());
        self.phase = TransitionPhase::Exiting;
        self.phase_started = Some(now);
        self.deadline = Some(now + self.duration);
        tracing::debug!(target, epoch = self.epoch, "begin project exit phase");
    }
}

/// Pairs a project's resources with slots in order; resources beyond
/// the slot list are silently dropped.
fn mount_entities(index: &ProjectIndex, key: &str, motion: EntityMotion) -> Vec<SceneEntity> {
    let Some(resources) = index.resources(key) else {
        return Vec::new();
    };
    resources
        .iter()
        .zip(PREDEFINED_SLOTS.iter())
        .enumerate()
        .map(|(slot_index, (record, slot))| SceneEntity {
            record: record.clone(),
            slot: *slot,
            slot_index,
            motion,
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/sequencer_tests.rs"]
mod tests;
