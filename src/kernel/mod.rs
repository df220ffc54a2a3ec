//! Headless synchronization core (state/action/effect).
//!
//! The store is the only writer of the history forest and the selection. It
//! processes one action at a time and hands effects to the runtime.

pub mod action;
pub mod effect;
pub mod error;
pub mod event;
pub mod selection;
pub mod services;
pub mod state;
pub mod store;
pub mod transform;
pub mod workspace;

pub use action::Action;
pub use effect::Effect;
pub use error::{CollaboratorError, CoreError, HistoryError, SessionError};
pub use event::{CoreEvent, MessageLevel};
pub use selection::{Selection, SelectionState};
pub use state::{AppState, ExplorerState};
pub use store::{DispatchResult, Store};
pub use transform::{
    Completion, DialogSecondary, DialogSource, SessionState, TransformDialog, TransformSession,
    TransformTicket,
};
pub use workspace::{Tab, TabContent, TabKind, Tabset, WorkspaceEvent, WorkspaceModel};
