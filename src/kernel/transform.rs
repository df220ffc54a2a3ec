//! Transform dialog state and its in-flight engine request.
//!
//! A session never touches the history forest. It only holds the result of
//! the last completed engine call until the dialog confirms or discards it.

use std::path::PathBuf;

use super::error::{CollaboratorError, SessionError};
use super::services::ports::TransformRequest;
use crate::models::{ArtifactPayload, NodeKey, TabId, TransformKind};

/// Identifies one engine call. Results whose ticket no longer matches the
/// dialog's session are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransformTicket {
    pub dialog: u64,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Pending(TransformTicket),
    Ready(ArtifactPayload),
    Failed(CollaboratorError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Ready,
    Failed(CollaboratorError),
    Discarded,
}

#[derive(Debug)]
pub struct TransformSession {
    dialog: u64,
    generation: u64,
    state: SessionState,
}

impl TransformSession {
    pub fn new(dialog: u64) -> Self {
        Self {
            dialog,
            generation: 0,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, SessionState::Pending(_))
    }

    pub fn result(&self) -> Option<&ArtifactPayload> {
        match &self.state {
            SessionState::Ready(payload) => Some(payload),
            _ => None,
        }
    }

    /// Issues one engine call. Rejected while another call is pending.
    pub fn start(
        &mut self,
        source: ArtifactPayload,
        secondary: Option<ArtifactPayload>,
        kind: TransformKind,
        args: String,
    ) -> Result<(TransformTicket, TransformRequest), SessionError> {
        if self.is_pending() {
            return Err(SessionError::SessionBusy);
        }
        self.generation = self.generation.saturating_add(1);
        let ticket = TransformTicket {
            dialog: self.dialog,
            generation: self.generation,
        };
        self.state = SessionState::Pending(ticket);
        Ok((
            ticket,
            TransformRequest {
                source,
                secondary,
                kind,
                args,
            },
        ))
    }

    pub fn complete(
        &mut self,
        ticket: TransformTicket,
        result: Result<ArtifactPayload, CollaboratorError>,
    ) -> Completion {
        if self.state != SessionState::Pending(ticket) {
            return Completion::Discarded;
        }
        match result {
            Ok(payload) => {
                self.state = SessionState::Ready(payload);
                Completion::Ready
            }
            Err(err) => {
                self.state = SessionState::Failed(err.clone());
                Completion::Failed(err)
            }
        }
    }

    /// Drops any result and orphans a pending call.
    pub fn invalidate(&mut self) {
        self.generation = self.generation.saturating_add(1);
        self.state = SessionState::Idle;
    }
}

#[derive(Debug, Clone)]
pub struct DialogSource {
    pub tab: TabId,
    pub node: NodeKey,
    pub path: PathBuf,
    pub name: String,
    pub artifact: ArtifactPayload,
}

#[derive(Debug, Clone)]
pub struct DialogSecondary {
    pub tab: TabId,
    pub artifact: ArtifactPayload,
}

#[derive(Debug)]
pub struct TransformDialog {
    pub id: u64,
    pub kind: TransformKind,
    pub source: Option<DialogSource>,
    pub secondary: Option<DialogSecondary>,
    pub args: String,
    name: String,
    name_edited: bool,
    pub session: TransformSession,
}

impl TransformDialog {
    pub fn new(id: u64, kind: TransformKind, source: Option<DialogSource>) -> Self {
        let mut dialog = Self {
            id,
            kind,
            source: None,
            secondary: None,
            args: String::new(),
            name: String::new(),
            name_edited: false,
            session: TransformSession::new(id),
        };
        dialog.set_source(source);
        dialog
    }

    /// `<source name>-<kind label>` unless the user typed a name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
        self.name_edited = true;
    }

    pub fn set_args(&mut self, args: String) -> bool {
        if !self.kind.takes_args() {
            return false;
        }
        self.args = args;
        true
    }

    pub fn set_source(&mut self, source: Option<DialogSource>) {
        if !self.name_edited {
            self.name = match &source {
                Some(source) => format!("{}-{}", source.name, self.kind.label()),
                None => String::new(),
            };
        }
        self.source = source;
        self.session.invalidate();
    }

    pub fn set_secondary(&mut self, secondary: Option<DialogSecondary>) {
        self.secondary = secondary;
        self.session.invalidate();
    }

    pub fn apply(&mut self) -> Result<(TransformTicket, TransformRequest), SessionError> {
        let source = self.source.as_ref().ok_or(SessionError::NoSource)?;
        let secondary = if self.kind.needs_secondary() {
            let secondary = self
                .secondary
                .as_ref()
                .ok_or(SessionError::MissingSecondary)?;
            Some(secondary.artifact.clone())
        } else {
            None
        };
        let args = if self.kind.takes_args() {
            self.args.trim().to_string()
        } else {
            String::new()
        };
        self.session
            .start(source.artifact.clone(), secondary, self.kind, args)
    }

    /// The computed result, if the dialog is in a confirmable state.
    pub fn confirmable(&self) -> Result<(&DialogSource, &ArtifactPayload), SessionError> {
        let source = self.source.as_ref().ok_or(SessionError::NoSource)?;
        if self.kind.needs_secondary() && self.secondary.is_none() {
            return Err(SessionError::MissingSecondary);
        }
        let result = self.session.result().ok_or(SessionError::NoResult)?;
        Ok((source, result))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/transform.rs"]
mod tests;
