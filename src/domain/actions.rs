//! The closed action vocabulary and the pure transition function.
//!
//! Every action is total: wrong shapes, unknown fields, and out-of-range
//! indices degrade to no-ops instead of panicking, because dispatchers work
//! from their own possibly-stale view of the state.

use time::OffsetDateTime;

use crate::domain::schema::{SectionId, section};
use crate::domain::state::{InterviewState, Item, Record};

#[derive(Debug, Clone)]
pub enum Action {
    /// Set a field of a fixed-group section. No-op on repeatable sections
    /// and unknown field names.
    SetField {
        section: SectionId,
        field: String,
        value: String,
    },
    /// Set a field of one repeatable item. No-op on fixed-group sections,
    /// unknown fields, and out-of-range indices.
    SetItemField {
        section: SectionId,
        index: usize,
        field: String,
        value: String,
    },
    /// Append a fresh all-empty item. No-op on fixed-group sections.
    AppendItem { section: SectionId },
    /// Remove the item at `index` unless the list would become empty.
    RemoveItem { section: SectionId, index: usize },
    SetActiveSection { section: SectionId },
    MarkPersisted { at: OffsetDateTime },
    /// Replace the whole state. The incoming value is already normalized by
    /// construction, so no further validation happens here.
    LoadSnapshot { state: Box<InterviewState> },
    /// Return to the canonical all-empty state.
    Reset,
}

/// Apply one action, producing a new state. Never mutates `state`, never
/// panics.
pub fn apply(state: &InterviewState, action: Action) -> InterviewState {
    let mut next = state.clone();
    match action {
        Action::SetField {
            section: id,
            field,
            value,
        } => {
            if !section(id).has_field(&field) {
                return next;
            }
            if let Record::Group(values) = next.record_mut(id) {
                values.insert(field, value);
            }
        }
        Action::SetItemField {
            section: id,
            index,
            field,
            value,
        } => {
            if !section(id).has_field(&field) {
                return next;
            }
            if let Record::List(items) = next.record_mut(id) {
                if let Some(item) = items.get_mut(index) {
                    item.set(&field, value);
                }
            }
        }
        Action::AppendItem { section: id } => {
            if let Record::List(items) = next.record_mut(id) {
                items.push(Item::empty(section(id)));
            }
        }
        Action::RemoveItem { section: id, index } => {
            if let Record::List(items) = next.record_mut(id) {
                if items.len() > 1 && index < items.len() {
                    items.remove(index);
                }
            }
        }
        Action::SetActiveSection { section: id } => {
            next.active_section = id;
        }
        Action::MarkPersisted { at } => {
            next.last_persisted_at = Some(at);
        }
        Action::LoadSnapshot { state } => {
            next = *state;
        }
        Action::Reset => {
            next = InterviewState::initial();
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn set_contact_name(state: &InterviewState, index: usize, name: &str) -> InterviewState {
        apply(
            state,
            Action::SetItemField {
                section: SectionId::Contacts,
                index,
                field: "name".to_string(),
                value: name.to_string(),
            },
        )
    }

    #[test]
    fn set_field_updates_fixed_groups_only() {
        let state = InterviewState::initial();
        let next = apply(
            &state,
            Action::SetField {
                section: SectionId::Wishes,
                field: "organDonation".to_string(),
                value: "Yes".to_string(),
            },
        );
        assert_eq!(next.record(SectionId::Wishes).group_value("organDonation"), "Yes");

        // Wrong shape: contacts is repeatable, so this must not change anything.
        let unchanged = apply(
            &next,
            Action::SetField {
                section: SectionId::Contacts,
                field: "name".to_string(),
                value: "nope".to_string(),
            },
        );
        assert_eq!(unchanged, next);
    }

    #[test]
    fn unknown_field_names_are_no_ops() {
        let state = InterviewState::initial();
        let next = apply(
            &state,
            Action::SetField {
                section: SectionId::Wishes,
                field: "notAField".to_string(),
                value: "x".to_string(),
            },
        );
        assert_eq!(next, state);
    }

    #[test]
    fn out_of_range_item_index_is_a_no_op() {
        let state = InterviewState::initial();
        let next = set_contact_name(&state, 7, "Ghost");
        assert_eq!(next, state);
    }

    #[test]
    fn append_then_remove_restores_prior_items() {
        let state = set_contact_name(&InterviewState::initial(), 0, "Jane Doe");
        let before: Vec<Uuid> = state
            .record(SectionId::Contacts)
            .items()
            .iter()
            .map(|item| item.id)
            .collect();

        let appended = apply(&state, Action::AppendItem { section: SectionId::Contacts });
        assert_eq!(appended.record(SectionId::Contacts).items().len(), before.len() + 1);

        let removed = apply(
            &appended,
            Action::RemoveItem {
                section: SectionId::Contacts,
                index: before.len(),
            },
        );
        let after: Vec<Uuid> = removed
            .record(SectionId::Contacts)
            .items()
            .iter()
            .map(|item| item.id)
            .collect();
        assert_eq!(after, before);
    }

    #[test]
    fn removing_the_last_item_is_a_no_op() {
        let state = InterviewState::initial();
        let next = apply(
            &state,
            Action::RemoveItem {
                section: SectionId::Contacts,
                index: 0,
            },
        );
        assert_eq!(next.record(SectionId::Contacts).items().len(), 1);
    }

    #[test]
    fn item_tokens_are_unique_across_appends() {
        let mut state = InterviewState::initial();
        for _ in 0..8 {
            state = apply(&state, Action::AppendItem { section: SectionId::Contacts });
        }
        let items = state.record(SectionId::Contacts).items();
        let mut ids: Vec<Uuid> = items.iter().map(|item| item.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), items.len());
    }

    #[test]
    fn reset_is_idempotent() {
        let dirty = set_contact_name(&InterviewState::initial(), 0, "Jane Doe");
        let once = apply(&dirty, Action::Reset);
        let twice = apply(&once, Action::Reset);
        assert_eq!(once, twice);
    }

    #[test]
    fn transitions_do_not_mutate_their_input() {
        let state = InterviewState::initial();
        let snapshot = state.clone();
        let _ = set_contact_name(&state, 0, "Jane Doe");
        let _ = apply(&state, Action::Reset);
        assert_eq!(state, snapshot);
    }

    #[test]
    fn pathological_values_never_panic() {
        let huge = "x".repeat(50_000);
        let mut state = InterviewState::initial();
        state = apply(
            &state,
            Action::SetField {
                section: SectionId::Wishes,
                field: "personalMessages".to_string(),
                value: huge.clone(),
            },
        );
        state = set_contact_name(&state, 0, &huge);
        state = apply(
            &state,
            Action::RemoveItem {
                section: SectionId::Wishes,
                index: 0,
            },
        );
        assert_eq!(state.record(SectionId::Wishes).group_value("personalMessages"), huge);
    }
}
