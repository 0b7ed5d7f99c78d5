//! Per-request session state: admin flag plus the record being edited.
//!
//! Handlers receive a [`Session`] and move it through explicit transitions
//! instead of reading ambient flags.

use serde::{Deserialize, Serialize};

use crate::auth::AdminCredentials;
use crate::errors::AppError;
use crate::moderation::{self, SubmissionPath};
use crate::models::{Event, EventDraft, HelpDraft, HelpOffer, RecordKind};

/// The form buffer. The tag decides which validation and save path runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EditingTarget {
    #[default]
    None,
    Event(EventDraft),
    Help(HelpDraft),
}

/// A validated record ready for the reconciler.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Commit {
    Event(Event),
    Help(HelpOffer),
}

impl Commit {
    pub fn kind(&self) -> RecordKind {
        match self {
            Commit::Event(_) => RecordKind::Event,
            Commit::Help(_) => RecordKind::Help,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Commit::Event(e) => &e.id,
            Commit::Help(h) => &h.id,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    admin: bool,
    editing: EditingTarget,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn editing(&self) -> &EditingTarget {
        &self.editing
    }

    pub fn path(&self) -> SubmissionPath {
        if self.admin {
            SubmissionPath::Admin
        } else {
            SubmissionPath::Public
        }
    }

    pub fn login(
        self,
        credentials: &AdminCredentials,
        username: &str,
        password: &str,
    ) -> Result<Self, AppError> {
        if credentials.verify(username, password) {
            Ok(Self {
                admin: true,
                ..self
            })
        } else {
            Err(AppError::Unauthorized("Неверный логин или пароль".to_string()))
        }
    }

    /// Open an existing event in the edit form.
    pub fn begin_edit_event(self, event: &Event) -> Self {
        self.with_draft(EditingTarget::Event(EventDraft::from(event)))
    }

    /// Open an existing help offer in the edit form.
    pub fn begin_edit_help(self, offer: &HelpOffer) -> Self {
        self.with_draft(EditingTarget::Help(HelpDraft::from(offer)))
    }

    /// Open an empty suggestion form with the default field values.
    pub fn begin_suggestion(self, kind: RecordKind) -> Self {
        let target = match kind {
            RecordKind::Event => EditingTarget::Event(EventDraft::default()),
            RecordKind::Help => EditingTarget::Help(HelpDraft::default()),
        };
        self.with_draft(target)
    }

    pub fn with_draft(self, editing: EditingTarget) -> Self {
        Self { editing, ..self }
    }

    /// Validate the buffer and close the form.
    pub fn commit(self) -> Result<(Self, Commit), AppError> {
        let path = self.path();
        let commit = match self.editing {
            EditingTarget::None => {
                return Err(AppError::BadRequest("Nothing is being edited".to_string()))
            }
            EditingTarget::Event(draft) => Commit::Event(moderation::validate_event(draft, path)?),
            EditingTarget::Help(draft) => Commit::Help(moderation::validate_help(draft, path)?),
        };

        let session = Self {
            admin: self.admin,
            editing: EditingTarget::None,
        };
        Ok((session, commit))
    }
}
