//! Upsert/remove over a single collection.
//!
//! Pure transformations: each takes a collection by value and hands back the next one.
//! Identity is the record id only.

use crate::models::Record;

/// Replace the element with the same id in place, or append the record.
pub fn upsert<R: Record>(record: R, mut collection: Vec<R>) -> Vec<R> {
    match collection.iter().position(|r| r.id() == record.id()) {
        Some(index) => collection[index] = record,
        None => collection.push(record),
    }
    collection
}

/// Drop the element with the given id. Absent ids leave the collection unchanged.
pub fn remove<R: Record>(id: &str, mut collection: Vec<R>) -> Vec<R> {
    collection.retain(|r| r.id() != id);
    collection
}

/// Find a record by id.
pub fn find<'a, R: Record>(id: &str, collection: &'a [R]) -> Option<&'a R> {
    collection.iter().find(|r| r.id() == id)
}
