//! Smart search delegate.
//!
//! Formats the approved part of the dataset for the external matcher and normalizes
//! whatever comes back into a [`MatchResult`]. Failures never leave this module: the
//! caller always gets a well-formed result with an explanatory message.

mod matcher;

pub use matcher::*;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::{Event, HelpOffer, Record};

pub const SEARCH_UNAVAILABLE: &str = "Поиск временно недоступен (API ключ не настроен).";
pub const SEARCH_FAILED: &str = "Произошла ошибка при поиске. Попробуйте ручные фильтры.";

/// Ids the matcher found relevant, per collection, plus its explanation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub event_ids: Vec<String>,
    pub help_ids: Vec<String>,
    pub reasoning: String,
}

/// Listing a client should switch to after a search.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuggestedView {
    Events,
    Help,
}

impl MatchResult {
    fn empty(reasoning: &str) -> Self {
        Self {
            reasoning: reasoning.to_string(),
            ..Self::default()
        }
    }

    /// Only one side matched: point the user at it.
    pub fn suggested_view(&self) -> Option<SuggestedView> {
        match (self.event_ids.is_empty(), self.help_ids.is_empty()) {
            (false, true) => Some(SuggestedView::Events),
            (true, false) => Some(SuggestedView::Help),
            _ => None,
        }
    }
}

impl From<MatcherResponse> for MatchResult {
    fn from(response: MatcherResponse) -> Self {
        Self {
            event_ids: response.relevant_event_ids,
            help_ids: response.relevant_help_ids,
            reasoning: response.reasoning,
        }
    }
}

/// True when the query is worth sending. Blank queries are a no-op, not an error.
pub fn is_searchable(query: &str) -> bool {
    !query.trim().is_empty()
}

/// Adapter between the directory and the external matcher.
#[derive(Clone, Default)]
pub struct SearchDelegate {
    matcher: Option<Arc<dyn Matcher>>,
}

impl SearchDelegate {
    pub fn new(matcher: Option<Arc<dyn Matcher>>) -> Self {
        Self { matcher }
    }

    pub fn is_available(&self) -> bool {
        self.matcher.is_some()
    }

    /// Run a search over the approved records. The caller checks [`is_searchable`] first.
    pub async fn search(&self, query: &str, events: &[Event], help: &[HelpOffer]) -> MatchResult {
        let Some(matcher) = &self.matcher else {
            tracing::warn!("Matcher API key missing, returning empty search");
            return MatchResult::empty(SEARCH_UNAVAILABLE);
        };

        let candidates = candidates(events, help);
        tracing::debug!(
            events = candidates.events.len(),
            help = candidates.help.len(),
            "Sending candidates to matcher"
        );

        match matcher.find_matches(query.trim(), &candidates).await {
            Ok(response) => response.into(),
            Err(e) => {
                tracing::error!("Smart search failed: {}", e);
                MatchResult::empty(SEARCH_FAILED)
            }
        }
    }
}

/// Project approved records into the matcher's candidate format.
pub fn candidates(events: &[Event], help: &[HelpOffer]) -> MatchCandidates {
    MatchCandidates {
        events: events
            .iter()
            .filter(|e| e.is_approved())
            .map(|e| EventCandidate {
                id: e.id.clone(),
                title: e.title.clone(),
                desc: e.description.clone(),
                category: enum_label(&e.category),
                district: e.district.as_str().to_string(),
                date: e.date.clone(),
            })
            .collect(),
        help: help
            .iter()
            .filter(|h| h.is_approved())
            .map(|h| HelpCandidate {
                id: h.id.clone(),
                org: h.org_name.clone(),
                help_type: enum_label(&h.help_type),
                desc: h.description.clone(),
                district: h.district.as_str().to_string(),
            })
            .collect(),
    }
}

/// Wire label of a unit enum.
fn enum_label<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}
