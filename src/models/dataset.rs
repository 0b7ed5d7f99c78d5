//! The dataset: the unit of persistence for the whole directory.

use serde::{Deserialize, Serialize};

use super::{Event, HelpOffer, Record, Status};

/// Both collections of the directory, persisted together as one JSON document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Dataset {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub help: Vec<HelpOffer>,
}

impl Dataset {
    pub fn new(events: Vec<Event>, help: Vec<HelpOffer>) -> Self {
        Self { events, help }
    }

    /// Total number of records across both collections.
    pub fn len(&self) -> usize {
        self.events.len() + self.help.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pending_events(&self) -> Vec<&Event> {
        with_status(&self.events, Status::Pending)
    }

    pub fn pending_help(&self) -> Vec<&HelpOffer> {
        with_status(&self.help, Status::Pending)
    }
}

fn with_status<R: Record>(records: &[R], status: Status) -> Vec<&R> {
    records.iter().filter(|r| r.status() == status).collect()
}

/// Revision information for change detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub revision_id: i64,
    pub generated_at: String,
}
