//! Event model matching the frontend AppEvent interface.

use serde::{Deserialize, Serialize};

use super::{Accessibility, EventCategory, Record, RecordKind, Region, Status};

/// A scheduled accessible event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub district: Region,
    pub accessibility: Accessibility,
    pub category: EventCategory,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    /// Messengers reachable at the contact phone, e.g. WhatsApp or Telegram.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contact_methods: Vec<String>,
    pub status: Status,
}

impl Record for Event {
    const KIND: RecordKind = RecordKind::Event;

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
}

/// Partially filled event as held by an edit or suggestion form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_event_district")]
    pub district: Region,
    #[serde(default)]
    pub accessibility: Accessibility,
    #[serde(default)]
    pub category: EventCategory,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub registration_link: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub contact_methods: Vec<String>,
    #[serde(default)]
    pub status: Option<Status>,
}

fn default_event_district() -> Region {
    Region::Online
}

impl Default for EventDraft {
    fn default() -> Self {
        Self {
            id: None,
            title: None,
            date: None,
            time: None,
            location: None,
            district: default_event_district(),
            accessibility: Accessibility::default(),
            category: EventCategory::default(),
            description: None,
            registration_link: None,
            contact_name: None,
            contact_phone: None,
            contact_methods: Vec::new(),
            status: None,
        }
    }
}

impl From<&Event> for EventDraft {
    fn from(event: &Event) -> Self {
        Self {
            id: Some(event.id.clone()),
            title: Some(event.title.clone()),
            date: Some(event.date.clone()),
            time: Some(event.time.clone()),
            location: Some(event.location.clone()),
            district: event.district,
            accessibility: event.accessibility,
            category: event.category,
            description: Some(event.description.clone()),
            registration_link: event.registration_link.clone(),
            contact_name: event.contact_name.clone(),
            contact_phone: event.contact_phone.clone(),
            contact_methods: event.contact_methods.clone(),
            status: Some(event.status),
        }
    }
}
