//! Visible-subset computation for public listings.
//!
//! The composite predicate is approved AND (in match result, if any) AND (in region, if any).
//! Relative order of the input is preserved.

use serde::Serialize;

use crate::models::{Dataset, Event, HelpOffer, Record, Region};
use crate::search::MatchResult;

/// Records visible to an end user.
#[derive(Debug, Clone, Serialize)]
pub struct Listing<'a> {
    pub events: Vec<&'a Event>,
    pub help: Vec<&'a HelpOffer>,
}

impl Listing<'_> {
    pub fn into_dataset(self) -> Dataset {
        Dataset::new(
            self.events.into_iter().cloned().collect(),
            self.help.into_iter().cloned().collect(),
        )
    }
}

/// Apply status, match-result and region filters to both collections.
pub fn visible<'a>(
    dataset: &'a Dataset,
    matched: Option<&MatchResult>,
    region: Option<Region>,
) -> Listing<'a> {
    Listing {
        events: filter_collection(
            &dataset.events,
            matched.map(|m| m.event_ids.as_slice()),
            region,
        ),
        help: filter_collection(
            &dataset.help,
            matched.map(|m| m.help_ids.as_slice()),
            region,
        ),
    }
}

pub fn filter_collection<'a, R: Record>(
    records: &'a [R],
    matched_ids: Option<&[String]>,
    region: Option<Region>,
) -> Vec<&'a R> {
    // "All regions" as a selector means no selector.
    let region = region.filter(|r| *r != Region::AllRegions);

    records
        .iter()
        .filter(|r| r.is_approved())
        .filter(|r| matched_ids.map_or(true, |ids| ids.iter().any(|id| id == r.id())))
        .filter(|r| region.map_or(true, |selector| r.matches_region(selector)))
        .collect()
}
