//! Snapshot comparison of the compiled text document against a stored
//! fixture, plus the behavioral scenarios the letter must satisfy.

use handoff::application::render::RenderOptions;
use handoff::application::render::text::compile_text;
use handoff::domain::actions::{Action, apply};
use handoff::domain::schema::SectionId;
use handoff::domain::state::InterviewState;
use time::macros::date;

fn options() -> RenderOptions {
    RenderOptions::new("Handoff", date!(2026 - 08 - 05))
}

fn set_field(state: &InterviewState, section: SectionId, field: &str, value: &str) -> InterviewState {
    apply(
        state,
        Action::SetField {
            section,
            field: field.to_string(),
            value: value.to_string(),
        },
    )
}

fn set_item(
    state: &InterviewState,
    section: SectionId,
    index: usize,
    field: &str,
    value: &str,
) -> InterviewState {
    apply(
        state,
        Action::SetItemField {
            section,
            index,
            field: field.to_string(),
            value: value.to_string(),
        },
    )
}

fn basic_state() -> InterviewState {
    let mut state = InterviewState::initial();
    state = set_item(&state, SectionId::Contacts, 0, "name", "Jane Doe");
    state = set_item(&state, SectionId::Contacts, 0, "role", "Executor / Decision-maker");
    state = set_item(&state, SectionId::Contacts, 0, "phone", "503-555-0100");
    state = apply(&state, Action::AppendItem { section: SectionId::Contacts });
    state = set_item(&state, SectionId::Contacts, 1, "name", "John Doe");
    state = set_item(&state, SectionId::Contacts, 1, "relationship", "Brother");
    state = set_item(&state, SectionId::Contacts, 1, "email", "john@example.com");
    state = set_item(
        &state,
        SectionId::Financial,
        0,
        "institution",
        "First Cascade Credit Union",
    );
    state = set_item(&state, SectionId::Financial, 0, "accountType", "Checking");
    state = set_item(&state, SectionId::Financial, 0, "approxValue", "$8,200");
    state = set_field(
        &state,
        SectionId::Digital,
        "passwordManager",
        "Bitwarden. Master password in the fire safe.",
    );
    state = set_field(&state, SectionId::Wishes, "organDonation", "Yes, registered donor.");
    state
}

#[test]
fn basic_letter_matches_the_fixture() {
    let compiled = compile_text(&basic_state(), &options());
    let expected = include_str!("fixtures/letter_basic.md");
    assert_eq!(compiled, expected);
}

#[test]
fn fresh_interview_compiles_to_the_title_block_alone() {
    let compiled = compile_text(&InterviewState::initial(), &options());
    assert!(compiled.contains("# Letter of Instruction"));
    assert!(compiled.contains("not a legal document"));
    assert!(!compiled.contains("\n## "));
}

#[test]
fn contact_names_appear_in_dispatch_order() {
    let compiled = compile_text(&basic_state(), &options());
    let jane = compiled.find("### Jane Doe").expect("first contact");
    let john = compiled.find("### John Doe").expect("second contact");
    assert!(jane < john);
}

#[test]
fn compile_text_never_panics_on_pathological_values() {
    let mut state = basic_state();
    state = set_field(&state, SectionId::Wishes, "personalMessages", &"n".repeat(50_000));
    state = set_field(
        &state,
        SectionId::Dependents,
        "pets",
        "control\u{0007}chars\u{0000}inside",
    );
    let compiled = compile_text(&state, &options());
    assert!(compiled.contains("## J. Dependents & Care"));
}
