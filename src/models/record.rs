//! Behavior shared by both record variants.

use serde::{Deserialize, Serialize};

use super::Region;

/// Moderation status of a record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Pending,
    Approved,
}

/// Which collection of the dataset a record belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Event,
    Help,
}

impl RecordKind {
    pub fn parse_wire(s: &str) -> Option<Self> {
        match s {
            "event" | "events" => Some(RecordKind::Event),
            "help" => Some(RecordKind::Help),
            _ => None,
        }
    }
}

/// A directory entry keyed by an immutable id.
pub trait Record: Clone {
    const KIND: RecordKind;

    fn id(&self) -> &str;
    fn status(&self) -> Status;
    fn set_status(&mut self, status: Status);
    fn region(&self) -> Region;

    fn is_approved(&self) -> bool {
        self.status() == Status::Approved
    }

    /// Region filter check. Only help offers may carry the "all regions" sentinel.
    fn matches_region(&self, selector: Region) -> bool {
        self.region() == selector
    }
}

/// Generate a fresh record id.
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
