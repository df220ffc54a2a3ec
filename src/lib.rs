//! pixtrail: edit-history tracking for image files opened in a tab workspace.
//!
//! Modules:
//! - models: artifacts, the per-path history forest, the transform catalog
//! - kernel: workspace model, selection, transform sessions, store, services
//! - app: text host (commands, rendering, workbench)

pub mod app;
pub mod kernel;
pub mod models;
