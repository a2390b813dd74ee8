//! Text measurement against the standard Helvetica metrics.
//!
//! Card and field heights must be known before anything is drawn, so all
//! wrapping decisions run against these advance-width tables without touching
//! a page. The same tables drive the PDF writer's font selection, keeping
//! measured and painted text consistent.

use unicode_width::UnicodeWidthStr;

use crate::application::render::layout::page::FontStyle;

const MM_PER_PT: f32 = 25.4 / 72.0;

/// Helvetica advance widths for 0x20..=0x7E, thousandths of an em.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, 556, 556, 556,
    556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, 1015, 667, 667, 722, 722,
    667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222,
    500, 222, 833, 556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334,
    584,
];

/// Helvetica-Bold advance widths for 0x20..=0x7E, thousandths of an em.
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, 556, 556, 556,
    556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, 975, 722, 722, 722, 722, 667,
    611, 778, 722, 278, 556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667,
    667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556,
    278, 889, 611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width outside the ASCII table; a mid-range guess keeps wrapping sane for
/// the occasional accented or typographic character.
const FALLBACK_WIDTH: u16 = 600;

fn char_width_milli(c: char, style: FontStyle) -> u16 {
    let table = match style {
        FontStyle::Regular => &HELVETICA,
        FontStyle::Bold => &HELVETICA_BOLD,
    };
    let code = c as u32;
    if (0x20..=0x7E).contains(&code) {
        table[(code - 0x20) as usize]
    } else {
        FALLBACK_WIDTH
    }
}

/// Painted width of a text run in millimeters.
pub fn text_width(text: &str, style: FontStyle, size_pt: f32) -> f32 {
    let milli: u32 = text.chars().map(|c| u32::from(char_width_milli(c, style))).sum();
    milli as f32 / 1000.0 * size_pt * MM_PER_PT
}

/// Drop control characters that would corrupt measurement or painting.
/// Newlines survive (they are paragraph breaks); tabs become spaces.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\n' => Some('\n'),
            '\t' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

/// Word-wrap `text` into lines no wider than `max_width` millimeters.
///
/// Never draws; this is the measurement half of the measure-then-draw pass.
/// Words wider than the full line are hard-broken so a pathological value
/// still terminates. Blank source lines are preserved as empty output lines.
pub fn wrap(text: &str, style: FontStyle, size_pt: f32, max_width: f32) -> Vec<String> {
    let sanitized = sanitize(text);
    let mut lines = Vec::new();

    for paragraph in sanitized.split('\n') {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            for piece in break_oversized(word, style, size_pt, max_width) {
                let candidate = if current.is_empty() {
                    piece.clone()
                } else {
                    format!("{current} {piece}")
                };
                if text_width(&candidate, style, size_pt) <= max_width || current.is_empty() {
                    current = candidate;
                } else {
                    lines.push(std::mem::take(&mut current));
                    current = piece;
                }
            }
        }
        lines.push(current);
    }

    while lines.last().is_some_and(String::is_empty) && lines.len() > 1 {
        lines.pop();
    }
    lines
}

fn break_oversized(word: &str, style: FontStyle, size_pt: f32, max_width: f32) -> Vec<String> {
    if text_width(word, style, size_pt) <= max_width {
        return vec![word.to_string()];
    }
    let mut pieces = Vec::new();
    let mut current = String::new();
    for c in word.chars() {
        let mut candidate = current.clone();
        candidate.push(c);
        if text_width(&candidate, style, size_pt) > max_width && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
            current.push(c);
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Truncate a table cell to a display-column budget, appending an ellipsis.
/// Cells truncate instead of wrapping; that asymmetry with cards is the
/// intended table format.
pub fn truncate_columns(text: &str, max_columns: usize) -> String {
    let sanitized = sanitize(text).replace('\n', " ");
    if UnicodeWidthStr::width(sanitized.as_str()) <= max_columns {
        return sanitized;
    }
    let mut out = String::new();
    let budget = max_columns.saturating_sub(1);
    for c in sanitized.chars() {
        let mut candidate = out.clone();
        candidate.push(c);
        if UnicodeWidthStr::width(candidate.as_str()) > budget {
            break;
        }
        out = candidate;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_grows_with_text_and_weight() {
        let narrow = text_width("ill", FontStyle::Regular, 10.0);
        let wide = text_width("WWW", FontStyle::Regular, 10.0);
        assert!(narrow < wide);
        assert!(
            text_width("hello", FontStyle::Regular, 10.0)
                < text_width("hello", FontStyle::Bold, 10.0)
        );
    }

    #[test]
    fn wrap_honors_the_width_limit() {
        let lines = wrap(
            "The deed to the house is in a safe deposit box the family does not know about",
            FontStyle::Regular,
            10.0,
            60.0,
        );
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, FontStyle::Regular, 10.0) <= 60.0, "{line}");
        }
    }

    #[test]
    fn wrap_preserves_word_order() {
        let text = "alpha beta gamma delta epsilon zeta";
        let lines = wrap(text, FontStyle::Regular, 10.0, 25.0);
        let rejoined = lines.join(" ");
        assert_eq!(rejoined, text);
    }

    #[test]
    fn oversized_words_are_hard_broken() {
        let word = "x".repeat(400);
        let lines = wrap(&word, FontStyle::Regular, 10.0, 40.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn control_characters_are_stripped() {
        let lines = wrap("bad\u{0007}bell and\u{000C}feed", FontStyle::Regular, 10.0, 100.0);
        assert_eq!(lines, vec!["badbell andfeed".to_string()]);
    }

    #[test]
    fn truncation_appends_an_ellipsis_within_budget() {
        assert_eq!(truncate_columns("short", 20), "short");
        let truncated = truncate_columns("a very long institution name indeed", 12);
        assert!(truncated.ends_with('…'));
        assert!(UnicodeWidthStr::width(truncated.as_str()) <= 12);
    }
}
