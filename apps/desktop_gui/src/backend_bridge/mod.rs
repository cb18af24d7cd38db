//! Bridge between the egui thread and the tokio worker that owns the page controller.

pub mod commands;
pub mod runtime;
