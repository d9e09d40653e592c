use crate::models::EventEntry;

/// Whether two entries were submitted for the same dancer.
///
/// Entries reach the system through the individual registration path
/// (`eodsa_id`), the studio path (`contestant_id`) or as a participant list,
/// so any one shared identifier is enough:
///
/// - equal `eodsa_id`
/// - equal `contestant_id`
/// - at least one dancer listed in both `participant_ids`
/// - one entry's `eodsa_id` listed among the other's participants
pub fn is_same_dancer(a: &EventEntry, b: &EventEntry) -> bool {
    same_id(&a.eodsa_id, &b.eodsa_id)
        || same_id(&a.contestant_id, &b.contestant_id)
        || participants_overlap(&a.participant_ids, &b.participant_ids)
        || listed_as_participant(&a.eodsa_id, &b.participant_ids)
        || listed_as_participant(&b.eodsa_id, &a.participant_ids)
}

fn same_id(a: &Option<String>, b: &Option<String>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}

fn participants_overlap(a: &[String], b: &[String]) -> bool {
    match (a, b) {
        ([a], [b]) => a == b,
        _ => a.iter().any(|id| b.contains(id)),
    }
}

fn listed_as_participant(id: &Option<String>, participants: &[String]) -> bool {
    id.as_ref().is_some_and(|id| participants.contains(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn entry(eodsa: Option<&str>, contestant: Option<&str>, participants: &[&str]) -> EventEntry {
        EventEntry {
            entry_id: Uuid::new_v4(),
            event_id: Uuid::nil(),
            eodsa_id: eodsa.map(String::from),
            contestant_id: contestant.map(String::from),
            participant_ids: participants.iter().map(|p| p.to_string()).collect(),
            mastery: "Water (Competitive)".to_string(),
            item_name: "Item".to_string(),
            calculated_fee: Decimal::ZERO,
            submitted_at: NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_matches_on_eodsa_id() {
        let a = entry(Some("E1"), None, &["d-1"]);
        let b = entry(Some("E1"), None, &["d-2"]);
        assert!(is_same_dancer(&a, &b));
    }

    #[test]
    fn test_matches_on_contestant_id_only() {
        let a = entry(Some("E1"), Some("C9"), &["d-1"]);
        let b = entry(Some("E2"), Some("C9"), &["d-2"]);
        assert!(is_same_dancer(&a, &b));
    }

    #[test]
    fn test_matches_on_shared_participant() {
        let solo = entry(Some("E1"), None, &["d-7"]);
        let group = entry(Some("S-STUDIO"), None, &["d-3", "d-7", "d-9", "d-11"]);
        assert!(is_same_dancer(&solo, &group));
        assert!(is_same_dancer(&group, &solo));
    }

    #[test]
    fn test_matches_eodsa_id_listed_as_participant() {
        let own = entry(Some("E1"), None, &["E1"]);
        let studio = entry(Some("S-STUDIO"), None, &["E1", "E2"]);
        assert!(is_same_dancer(&own, &studio));
    }

    #[test]
    fn test_absent_ids_never_match() {
        let a = entry(None, None, &["d-1"]);
        let b = entry(None, None, &["d-2"]);
        assert!(!is_same_dancer(&a, &b));
    }

    #[test]
    fn test_different_dancers() {
        let a = entry(Some("E1"), Some("C1"), &["d-1", "d-2"]);
        let b = entry(Some("E2"), Some("C2"), &["d-3", "d-4"]);
        assert!(!is_same_dancer(&a, &b));
    }
}
