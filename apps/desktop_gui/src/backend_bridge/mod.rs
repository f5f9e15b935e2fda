//! Bridge between the GUI thread and the backend worker: command
//! queue in, UI events out.

pub mod commands;
pub mod runtime;
