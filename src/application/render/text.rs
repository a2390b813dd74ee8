//! The text compiler: interview state to a single Markdown document.
//!
//! Intentionally plain string concatenation; this output is the ground truth
//! for which sections and fields the paginated document must also include.

use crate::application::render::{DISCLAIMER, DOCUMENT_TITLE, RenderOptions, heading_fields, item_heading};
use crate::domain::inclusion::{has_data, populated_items};
use crate::domain::schema::{FieldKind, SectionDef};
use crate::domain::state::{InterviewState, Item, Record};

/// Compile the state into a Markdown letter. Cannot fail.
pub fn compile_text(state: &InterviewState, options: &RenderOptions) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {DOCUMENT_TITLE}\n\n"));
    out.push_str(&format!("**Generated:** {}\n\n", options.long_date()));
    out.push_str(&format!("> **Important:** {DISCLAIMER}\n\n"));
    out.push_str("---\n\n");

    for (def, record) in state.sections() {
        if !has_data(record) {
            continue;
        }
        out.push_str(&format!("## {}. {}\n\n", def.letter, def.title));
        match record {
            Record::Group(_) => push_group(&mut out, def, record),
            Record::List(_) => push_items(&mut out, def, record),
        }
        out.push_str("---\n\n");
    }

    out.push_str(&format!(
        "*Generated with {} — free, private, yours to keep.*\n",
        options.product_name
    ));
    out
}

fn push_group(out: &mut String, def: &SectionDef, record: &Record) {
    for field in def.fields {
        if field.kind != FieldKind::Text {
            continue;
        }
        let value = record.group_value(field.key).trim();
        if value.is_empty() {
            continue;
        }
        out.push_str(&format!("### {}\n\n{value}\n\n", field.label));
    }
}

fn push_items(out: &mut String, def: &SectionDef, record: &Record) {
    for item in populated_items(record) {
        push_item(out, def, item);
    }
}

fn push_item(out: &mut String, def: &SectionDef, item: &Item) {
    if let Some(heading) = item_heading(item, def.title_field, def.fallback_field) {
        out.push_str(&format!("### {heading}\n"));
    }
    let consumed = heading_fields(item, def.title_field, def.fallback_field);
    for field in def.fields {
        if field.kind != FieldKind::Text || consumed.contains(&field.key) {
            continue;
        }
        let value = item.value(field.key).trim();
        if value.is_empty() {
            continue;
        }
        out.push_str(&format!("- **{}:** {value}\n", field.label));
    }
    out.push('\n');
}
