//! The shared inclusion predicate.
//!
//! Both compilers, the progress reporter, and the pre-export empty-state
//! warning consult these functions and nothing else, so a section can never
//! appear completed in navigation yet missing from a generated document.

use crate::domain::state::{Item, Record};

/// Whether a record carries enough data to be worth rendering.
///
/// Fixed groups count when any field trims non-empty; repeatable lists count
/// when any item is populated. Pure function of the record's values.
pub fn has_data(record: &Record) -> bool {
    match record {
        Record::Group(values) => values.values().any(|value| !value.trim().is_empty()),
        Record::List(items) => items.iter().any(item_is_populated),
    }
}

/// An item is populated when any non-identity field trims non-empty.
pub fn item_is_populated(item: &Item) -> bool {
    item.values().any(|(_, value)| !value.trim().is_empty())
}

/// The items both compilers render, in list order.
pub fn populated_items(record: &Record) -> Vec<&Item> {
    record
        .items()
        .iter()
        .filter(|item| item_is_populated(item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::actions::{Action, apply};
    use crate::domain::schema::SectionId;
    use crate::domain::state::InterviewState;

    #[test]
    fn empty_records_have_no_data() {
        let state = InterviewState::initial();
        for (_, record) in state.sections() {
            assert!(!has_data(record));
        }
    }

    #[test]
    fn whitespace_only_values_do_not_count() {
        let state = apply(
            &InterviewState::initial(),
            Action::SetField {
                section: SectionId::Wishes,
                field: "otherWishes".to_string(),
                value: "   \n\t ".to_string(),
            },
        );
        assert!(!has_data(state.record(SectionId::Wishes)));
    }

    #[test]
    fn one_populated_item_among_placeholders_counts() {
        let mut state = InterviewState::initial();
        state = apply(&state, Action::AppendItem { section: SectionId::Contacts });
        state = apply(
            &state,
            Action::SetItemField {
                section: SectionId::Contacts,
                index: 1,
                field: "phone".to_string(),
                value: "555-0100".to_string(),
            },
        );
        let record = state.record(SectionId::Contacts);
        assert!(has_data(record));
        assert_eq!(populated_items(record).len(), 1);
    }
}
