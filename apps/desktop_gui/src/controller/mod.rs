//! Controller layer: UI events, error classification, and command
//! orchestration.

pub mod events;
pub mod orchestration;
