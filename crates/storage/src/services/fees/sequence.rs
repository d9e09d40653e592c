use std::cmp::Ordering;

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::models::EventEntry;

use super::identity::is_same_dancer;

/// Sort key for submission order: `submitted_at`, then `entry_id` when two
/// entries share a timestamp.
pub fn submission_key(submitted_at: NaiveDateTime, entry_id: Uuid) -> (NaiveDateTime, Uuid) {
    (submitted_at, entry_id)
}

pub fn submission_order(a: &EventEntry, b: &EventEntry) -> Ordering {
    submission_key(a.submitted_at, a.entry_id).cmp(&submission_key(b.submitted_at, b.entry_id))
}

fn earlier_entries_of_same_dancer<'a>(
    candidate: &'a EventEntry,
    entries: &'a [EventEntry],
) -> impl Iterator<Item = &'a EventEntry> + 'a {
    entries.iter().filter(move |other| {
        other.entry_id != candidate.entry_id
            && submission_order(other, candidate) == Ordering::Less
            && is_same_dancer(candidate, other)
    })
}

/// 1-based position of `candidate` among the same dancer's solos.
///
/// `entries` may contain anything from the event, including the candidate
/// and later entries; only strictly earlier solos of the same dancer count.
pub fn solo_position(candidate: &EventEntry, entries: &[EventEntry]) -> u32 {
    let earlier = earlier_entries_of_same_dancer(candidate, entries)
        .filter(|other| other.is_solo())
        .count();

    earlier as u32 + 1
}

/// Whether no earlier entry of any performance type belongs to the same dancer.
pub fn is_first_entry_for_dancer(candidate: &EventEntry, entries: &[EventEntry]) -> bool {
    earlier_entries_of_same_dancer(candidate, entries)
        .next()
        .is_none()
}
