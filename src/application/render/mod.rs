//! Document compilers.
//!
//! Two renderers walk the same schema with the same inclusion predicate: the
//! text compiler ([`text`]) emits Markdown and is the semantic ground truth;
//! the layout compiler ([`layout`]) produces paginated pages of draw
//! operations for the PDF writer. Section and field inclusion must stay
//! identical between the two.

pub mod layout;
pub mod text;

use time::Date;
use time::macros::format_description;

use crate::domain::state::Item;

pub const DOCUMENT_TITLE: &str = "Letter of Instruction";

pub const DISCLAIMER: &str = "This is not a legal document. It is a personal letter of \
instruction intended to help your family locate important information and understand your \
wishes. Consult an attorney for legal estate planning documents.";

/// Inputs shared by both compilers beyond the state itself. The generation
/// date is passed in explicitly so compilation stays a pure function of its
/// arguments.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub product_name: String,
    pub generated_on: Date,
}

impl RenderOptions {
    pub fn new(product_name: impl Into<String>, generated_on: Date) -> Self {
        Self {
            product_name: product_name.into(),
            generated_on,
        }
    }

    /// "August 5, 2026" style date used on the cover and in the title block.
    pub fn long_date(&self) -> String {
        self.generated_on
            .format(format_description!(
                "[month repr:long] [day padding:none], [year]"
            ))
            .unwrap_or_else(|_| self.generated_on.to_string())
    }

    /// Shared artifact stem: product slug, document kind, ISO date. Both
    /// download names and the running page footer use this.
    pub fn artifact_stem(&self) -> String {
        let slug = self
            .product_name
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-");
        format!("{slug}-letter-of-instruction-{}", self.generated_on)
    }
}

/// Sub-heading for one repeatable item: the identifying field, with the
/// category appended when both are set; the category alone when the
/// identifying field is empty; nothing when neither is set.
pub(crate) fn item_heading(
    item: &Item,
    title_field: Option<&str>,
    fallback_field: Option<&str>,
) -> Option<String> {
    let title = title_field.map(|key| item.value(key).trim()).unwrap_or("");
    let fallback = fallback_field.map(|key| item.value(key).trim()).unwrap_or("");
    match (title.is_empty(), fallback.is_empty()) {
        (false, false) => Some(format!("{title} — {fallback}")),
        (false, true) => Some(title.to_string()),
        (true, false) => Some(fallback.to_string()),
        (true, true) => None,
    }
}

/// Field keys consumed by the item heading; they must not repeat in the body.
pub(crate) fn heading_fields(
    item: &Item,
    title_field: Option<&'static str>,
    fallback_field: Option<&'static str>,
) -> Vec<&'static str> {
    let mut used = Vec::new();
    if let Some(key) = title_field {
        if !item.value(key).trim().is_empty() {
            used.push(key);
        }
    }
    if let Some(key) = fallback_field {
        if !item.value(key).trim().is_empty() {
            used.push(key);
        }
    }
    used
}
