//! Navigation/progress surface: per-section completion derived from the same
//! inclusion predicate the compilers use, so the sidebar and the generated
//! documents can never disagree about what counts as filled in.

use crate::domain::inclusion::has_data;
use crate::domain::schema::SectionId;
use crate::domain::state::InterviewState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionProgress {
    pub id: SectionId,
    pub letter: char,
    pub title: &'static str,
    pub complete: bool,
}

/// Completion flags in schema order.
pub fn section_progress(state: &InterviewState) -> Vec<SectionProgress> {
    state
        .sections()
        .map(|(def, record)| SectionProgress {
            id: def.id,
            letter: def.letter,
            title: def.title,
            complete: has_data(record),
        })
        .collect()
}

/// Whether any section has data at all; the pre-export empty-state check.
pub fn has_any_data(state: &InterviewState) -> bool {
    state.sections().any(|(_, record)| has_data(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::actions::{Action, apply};

    #[test]
    fn fresh_state_reports_nothing_complete() {
        let progress = section_progress(&InterviewState::initial());
        assert_eq!(progress.len(), crate::domain::schema::SECTIONS.len());
        assert!(progress.iter().all(|section| !section.complete));
        assert!(!has_any_data(&InterviewState::initial()));
    }

    #[test]
    fn filling_one_section_flips_exactly_one_flag() {
        let state = apply(
            &InterviewState::initial(),
            Action::SetField {
                section: SectionId::Dependents,
                field: "pets".to_string(),
                value: "One cat, feeds twice a day".to_string(),
            },
        );
        let complete: Vec<SectionId> = section_progress(&state)
            .into_iter()
            .filter(|section| section.complete)
            .map(|section| section.id)
            .collect();
        assert_eq!(complete, vec![SectionId::Dependents]);
        assert!(has_any_data(&state));
    }
}
