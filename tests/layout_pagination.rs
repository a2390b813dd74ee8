//! Behavioral scenarios for the paginated document: strategy selection,
//! mid-field page breaks, signature embedding, and inclusion consistency
//! with the text compiler.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::io::Cursor;

use handoff::application::progress::section_progress;
use handoff::application::render::RenderOptions;
use handoff::application::render::layout::compile_layout;
use handoff::application::render::layout::page::{DrawOp, LayoutDocument};
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

fn with_contacts(count: usize) -> InterviewState {
    let mut state = InterviewState::initial();
    for index in 0..count {
        if index > 0 {
            state = apply(&state, Action::AppendItem { section: SectionId::Contacts });
        }
        state = apply(
            &state,
            Action::SetItemField {
                section: SectionId::Contacts,
                index,
                field: "name".to_string(),
                value: format!("Contact Number {index}"),
            },
        );
    }
    state
}

/// Text runs of a given size as (page index, x, y, text).
fn runs_of_size(doc: &LayoutDocument, size: f32) -> Vec<(usize, f32, f32, String)> {
    let mut runs = Vec::new();
    for (page_index, page) in doc.pages.iter().enumerate() {
        for op in &page.ops {
            if let DrawOp::Text {
                x,
                y,
                text,
                size: run_size,
                ..
            } = op
            {
                if (run_size - size).abs() < 0.01 {
                    runs.push((page_index, *x, *y, text.clone()));
                }
            }
        }
    }
    runs
}

#[test]
fn section_inclusion_is_identical_across_compilers_and_progress() {
    let mut state = with_contacts(2);
    state = set_field(&state, SectionId::Wishes, "organDonation", "Yes");
    state = set_field(&state, SectionId::Business, "businessName", "Rivera Woodworks");

    let text = compile_text(&state, &options());
    let text_sections: Vec<String> = text
        .lines()
        .filter(|line| line.starts_with("## "))
        .map(|line| line.trim_start_matches("## ").to_string())
        .collect();

    let layout = compile_layout(&state, &options());
    let layout_sections: Vec<String> = runs_of_size(&layout, 16.0)
        .into_iter()
        .map(|(_, _, _, title)| title)
        .filter(|title| title != "Contents")
        .collect();

    let progress_sections: Vec<String> = section_progress(&state)
        .into_iter()
        .filter(|section| section.complete)
        .map(|section| format!("{}. {}", section.letter, section.title))
        .collect();

    assert_eq!(text_sections, progress_sections);
    let layout_titled: Vec<String> = progress_sections
        .iter()
        .map(|entry| entry.split_once(". ").map(|(_, title)| title.to_string()).unwrap_or_default())
        .collect();
    assert_eq!(layout_sections, layout_titled);
}

#[test]
fn six_contacts_pack_two_cards_per_row() {
    let layout = compile_layout(&with_contacts(6), &options());
    let titles = runs_of_size(&layout, 12.0);
    assert_eq!(titles.len(), 6);

    let paired = titles.iter().any(|(page_a, x_a, y_a, _)| {
        titles
            .iter()
            .any(|(page_b, x_b, y_b, _)| page_a == page_b && y_a == y_b && x_a != x_b)
    });
    assert!(paired, "expected at least one two-card row, got {titles:?}");
}

#[test]
fn seven_contacts_fall_back_to_full_width_cards() {
    let layout = compile_layout(&with_contacts(7), &options());
    let titles = runs_of_size(&layout, 12.0);
    assert_eq!(titles.len(), 7);

    let first_x = titles[0].1;
    assert!(
        titles.iter().all(|(_, x, _, _)| *x == first_x),
        "all cards should share the full-width column, got {titles:?}"
    );
}

#[test]
fn long_free_text_field_breaks_once_and_keeps_every_line() {
    let words: Vec<String> = (0..600).map(|index| format!("word{index:04}")).collect();
    let state = set_field(
        &InterviewState::initial(),
        SectionId::Wishes,
        "personalMessages",
        &words.join(" "),
    );

    let layout = compile_layout(&state, &options());
    let body_runs = runs_of_size(&layout, 10.0);

    let pages: std::collections::BTreeSet<usize> =
        body_runs.iter().map(|(page, _, _, _)| *page).collect();
    assert_eq!(pages.len(), 2, "exactly one mid-field page break expected");

    let rendered: Vec<String> = body_runs
        .iter()
        .flat_map(|(_, _, _, text)| text.split_whitespace().map(str::to_string))
        .collect();
    assert_eq!(rendered, words, "wrapped lines must preserve every word in order");
}

#[test]
fn valid_signature_payload_embeds_an_image() {
    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        120,
        40,
        image::Rgba([30, 30, 30, 255]),
    ))
    .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
    .expect("encode png");
    let payload = format!("data:image/png;base64,{}", STANDARD.encode(&png));

    let mut state = set_field(&InterviewState::initial(), SectionId::Verification, "fullName", "Alex");
    state = set_field(&state, SectionId::Verification, "signatureData", &payload);

    let layout = compile_layout(&state, &options());
    let images: Vec<(f32, f32)> = layout
        .pages
        .iter()
        .flat_map(|page| &page.ops)
        .filter_map(|op| match op {
            DrawOp::Image { width, height, .. } => Some((*width, *height)),
            _ => None,
        })
        .collect();
    assert_eq!(images.len(), 1);
    let (width, height) = images[0];
    // 120x40 at natural aspect inside the 80x30 slot: height-bound scaling.
    assert!((width / height - 3.0).abs() < 0.01);
    assert!(width <= 80.0 + 0.01 && height <= 30.0 + 0.01);
}

#[test]
fn malformed_signature_is_skipped_without_aborting_the_document() {
    let mut state = set_field(&InterviewState::initial(), SectionId::Verification, "fullName", "Alex");
    state = set_field(
        &state,
        SectionId::Verification,
        "signatureData",
        "data:image/png;base64,definitely-not-an-image",
    );

    let layout = compile_layout(&state, &options());
    let has_image = layout
        .pages
        .iter()
        .flat_map(|page| &page.ops)
        .any(|op| matches!(op, DrawOp::Image { .. }));
    assert!(!has_image);

    // The rest of the section still rendered.
    let has_name = runs_of_size(&layout, 10.0)
        .iter()
        .any(|(_, _, _, text)| text == "Alex");
    assert!(has_name);
}

#[test]
fn table_sections_truncate_cells_instead_of_wrapping() {
    let long = "An institution with an exceptionally long legal name that cannot fit";
    let mut state = InterviewState::initial();
    state = apply(
        &state,
        Action::SetItemField {
            section: SectionId::Financial,
            index: 0,
            field: "institution".to_string(),
            value: long.to_string(),
        },
    );

    let layout = compile_layout(&state, &options());
    let truncated = runs_of_size(&layout, 9.0)
        .iter()
        .any(|(_, _, _, text)| text.ends_with('…') && long.starts_with(text.trim_end_matches('…')));
    assert!(truncated, "long cell values should be cut with an ellipsis");
}

#[test]
fn compile_layout_never_panics_on_pathological_state() {
    let mut state = with_contacts(9);
    state = set_field(&state, SectionId::Wishes, "personalMessages", &"m".repeat(50_000));
    state = set_field(
        &state,
        SectionId::Digital,
        "emailAccounts",
        "nul\u{0000} bell\u{0007} tab\t newline\n end",
    );
    state = set_field(&state, SectionId::Verification, "signatureData", "data:;base64,");

    let layout = compile_layout(&state, &options());
    assert!(layout.pages.len() > 3);
}
