//! Help offer model matching the frontend HelpService interface.

use serde::{Deserialize, Serialize};

use super::{HelpCategory, Record, RecordKind, Region, Status};

/// A help service offered by an organization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HelpOffer {
    pub id: String,
    pub org_name: String,
    pub help_type: HelpCategory,
    pub description: String,
    pub district: Region,
    pub contacts: String,
    pub is_free: bool,
    pub conditions: String,
    pub status: Status,
}

impl Record for HelpOffer {
    const KIND: RecordKind = RecordKind::Help;

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> Status {
        self.status
    }

    fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    fn region(&self) -> Region {
        self.district
    }

    fn matches_region(&self, selector: Region) -> bool {
        self.district == Region::AllRegions || self.district == selector
    }
}

/// Partially filled help offer as held by an edit or suggestion form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HelpDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub org_name: Option<String>,
    #[serde(default)]
    pub help_type: HelpCategory,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_help_district")]
    pub district: Region,
    #[serde(default)]
    pub contacts: Option<String>,
    #[serde(default = "default_is_free")]
    pub is_free: bool,
    #[serde(default)]
    pub conditions: Option<String>,
    #[serde(default)]
    pub status: Option<Status>,
}

fn default_help_district() -> Region {
    Region::Online
}

fn default_is_free() -> bool {
    true
}

impl Default for HelpDraft {
    fn default() -> Self {
        Self {
            id: None,
            org_name: None,
            help_type: HelpCategory::default(),
            description: None,
            district: default_help_district(),
            contacts: None,
            is_free: default_is_free(),
            conditions: None,
            status: None,
        }
    }
}

impl From<&HelpOffer> for HelpDraft {
    fn from(offer: &HelpOffer) -> Self {
        Self {
            id: Some(offer.id.clone()),
            org_name: Some(offer.org_name.clone()),
            help_type: offer.help_type,
            description: Some(offer.description.clone()),
            district: offer.district,
            contacts: Some(offer.contacts.clone()),
            is_free: offer.is_free,
            conditions: Some(offer.conditions.clone()),
            status: Some(offer.status),
        }
    }
}
