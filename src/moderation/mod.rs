//! Moderation lifecycle: pending/approved status and boundary validation.
//!
//! Rejection is deletion; there is no third state.

use crate::errors::AppError;
use crate::models::{new_record_id, Event, EventDraft, HelpDraft, HelpOffer, Record, Region, Status};

pub const MISSING_EVENT_CONTACT: &str =
    "Для события необходимо указать ссылку на регистрацию или контактный телефон.";
pub const EVENT_NEEDS_DISTRICT: &str = "Для события нужно выбрать конкретный район.";

/// Which path a create or edit takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPath {
    /// Administrator create/edit; records go live immediately.
    Admin,
    /// Public suggestion form; records wait for moderation.
    Public,
}

impl SubmissionPath {
    pub fn initial_status(&self) -> Status {
        match self {
            SubmissionPath::Admin => Status::Approved,
            SubmissionPath::Public => Status::Pending,
        }
    }

    /// Status of a saved record. Admin edits keep the status the draft carries,
    /// public saves always go back to moderation.
    pub fn resolve_status(&self, carried: Option<Status>) -> Status {
        match self {
            SubmissionPath::Admin => carried.unwrap_or_else(|| self.initial_status()),
            SubmissionPath::Public => self.initial_status(),
        }
    }
}

/// Approve a record. Already approved records come back unchanged.
pub fn approve<R: Record>(mut record: R) -> R {
    record.set_status(Status::Approved);
    record
}

/// Validate an event draft and build the complete record.
pub fn validate_event(draft: EventDraft, path: SubmissionPath) -> Result<Event, AppError> {
    let title = required(draft.title, "Название")?;
    let description = required(draft.description, "Описание")?;
    let date = required(draft.date, "Дата")?;
    let time = required(draft.time, "Время")?;
    let location = required(draft.location, "Место")?;

    let registration_link = optional(draft.registration_link);
    let contact_phone = optional(draft.contact_phone);
    if registration_link.is_none() && contact_phone.is_none() {
        return Err(AppError::Validation(MISSING_EVENT_CONTACT.to_string()));
    }

    if draft.district == Region::AllRegions {
        return Err(AppError::Validation(EVENT_NEEDS_DISTRICT.to_string()));
    }

    Ok(Event {
        id: assign_id(draft.id),
        title,
        date,
        time,
        location,
        district: draft.district,
        accessibility: draft.accessibility,
        category: draft.category,
        description,
        registration_link,
        contact_name: optional(draft.contact_name),
        contact_phone,
        contact_methods: draft.contact_methods,
        status: path.resolve_status(draft.status),
    })
}

/// Validate a help offer draft and build the complete record.
pub fn validate_help(draft: HelpDraft, path: SubmissionPath) -> Result<HelpOffer, AppError> {
    let org_name = required(draft.org_name, "Организация")?;
    let description = required(draft.description, "Описание помощи")?;
    let contacts = required(draft.contacts, "Контакты")?;
    let conditions = required(draft.conditions, "Условия")?;

    Ok(HelpOffer {
        id: assign_id(draft.id),
        org_name,
        help_type: draft.help_type,
        description,
        district: draft.district,
        contacts,
        is_free: draft.is_free,
        conditions,
        status: path.resolve_status(draft.status),
    })
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    optional(value)
        .ok_or_else(|| AppError::Validation(format!("Поле «{}» обязательно для заполнения.", field)))
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn assign_id(id: Option<String>) -> String {
    optional(id).unwrap_or_else(new_record_id)
}
