//! The layout compiler: interview state to paginated pages of draw ops.
//!
//! Section and field inclusion mirrors the text compiler exactly; what this
//! module adds is geometry. Every block is measured before it is drawn, a
//! vertical cursor tracks the write position, and `check_break` starts a new
//! page whenever a block would cross the safe bottom margin.
//!
//! Rendering strategy is fixed per section by the schema: long-form sections
//! flow label/value pairs, compact repeatable sections pack cards two per
//! row, tabular sections draw a summary table followed by detail cards, and
//! the rest get one full-width card per item.

mod engine;
mod image;
pub mod metrics;
pub mod page;

use tracing::debug;

use crate::application::render::{DISCLAIMER, DOCUMENT_TITLE, RenderOptions, heading_fields, item_heading};
use crate::domain::inclusion::{has_data, populated_items};
use crate::domain::schema::{FieldKind, SectionDef, SectionStrategy};
use crate::domain::state::{InterviewState, Item, Record};
use engine::{
    BORDER, CHARCOAL, CHARCOAL_LIGHT, CHARCOAL_MUTED, CONTENT_WIDTH, LINE_HEIGHT, LayoutEngine,
    MARGIN, PAGE_WIDTH, ROW_SHADE, SAGE, SAGE_DARK, WHITE,
};
use metrics::{truncate_columns, wrap};
use page::{DrawOp, FontStyle, LayoutDocument};

const CARD_PADDING: f32 = 6.0;
const CARD_TITLE_HEIGHT: f32 = 8.0;
const CARD_CORNER_RADIUS: f32 = 3.0;
const CARD_GAP: f32 = 5.0;
const FIELD_LABEL_HEIGHT: f32 = 5.0;
const FIELD_GAP: f32 = 3.0;
const COLUMN_GAP: f32 = 6.0;
const TABLE_ROW_HEIGHT: f32 = 8.0;
const TABLE_HEADER_HEIGHT: f32 = 9.0;
const TABLE_CELL_PADDING: f32 = 2.0;
const SIGNATURE_BOX_WIDTH: f32 = 80.0;
const SIGNATURE_BOX_HEIGHT: f32 = 30.0;

/// Compile the state into a paginated document. Never fails and never
/// panics; per-field problems (such as a malformed signature payload) render
/// nothing for that field and the document continues.
pub fn compile_layout(state: &InterviewState, options: &RenderOptions) -> LayoutDocument {
    let mut engine = LayoutEngine::new(options.artifact_stem());

    cover(&mut engine, options);

    let included: Vec<&SectionDef> = state
        .sections()
        .filter(|(_, record)| has_data(record))
        .map(|(def, _)| def)
        .collect();

    engine.new_page();
    table_of_contents(&mut engine, &included);

    for (def, record) in state.sections() {
        if !has_data(record) {
            continue;
        }
        engine.new_page();
        section_header(&mut engine, def);
        match def.strategy {
            SectionStrategy::FreeText => free_text_section(&mut engine, def, record),
            SectionStrategy::CardPerItem => cards_section(&mut engine, def, record),
            SectionStrategy::TwoColumnCards { max_items } => {
                two_column_section(&mut engine, def, record, max_items)
            }
            SectionStrategy::Table {
                columns,
                notes_field,
            } => table_section(&mut engine, def, record, columns, notes_field),
        }
    }

    engine.finish()
}

fn cover(engine: &mut LayoutEngine, options: &RenderOptions) {
    engine.start_cover(&options.product_name);

    engine.set_cursor(80.0);
    engine.text_centered(
        DOCUMENT_TITLE,
        PAGE_WIDTH / 2.0,
        engine.cursor(),
        FontStyle::Bold,
        32.0,
        CHARCOAL,
    );

    engine.advance(15.0);
    engine.text_centered(
        &format!("Generated {}", options.long_date()),
        PAGE_WIDTH / 2.0,
        engine.cursor(),
        FontStyle::Regular,
        12.0,
        CHARCOAL_LIGHT,
    );

    engine.advance(30.0);
    engine.op(DrawOp::Line {
        x1: MARGIN + 40.0,
        y1: engine.cursor(),
        x2: PAGE_WIDTH - MARGIN - 40.0,
        y2: engine.cursor(),
        color: BORDER,
        width: 0.3,
    });

    engine.advance(15.0);
    for line in wrap(DISCLAIMER, FontStyle::Regular, 9.0, CONTENT_WIDTH - 20.0) {
        engine.text_centered(
            &line,
            PAGE_WIDTH / 2.0,
            engine.cursor(),
            FontStyle::Regular,
            9.0,
            CHARCOAL_MUTED,
        );
        engine.advance(4.5);
    }
}

fn table_of_contents(engine: &mut LayoutEngine, included: &[&SectionDef]) {
    engine.text(
        "Contents",
        MARGIN,
        engine.cursor() + 5.0,
        FontStyle::Bold,
        16.0,
        CHARCOAL,
    );
    engine.advance(16.0);

    if included.is_empty() {
        engine.text(
            "Nothing recorded yet.",
            MARGIN,
            engine.cursor(),
            FontStyle::Regular,
            10.0,
            CHARCOAL_MUTED,
        );
        engine.advance(LINE_HEIGHT);
        return;
    }

    for def in included {
        engine.check_break(8.0);
        engine.text(
            &format!("{}.", def.letter),
            MARGIN,
            engine.cursor(),
            FontStyle::Bold,
            11.0,
            SAGE_DARK,
        );
        engine.text(
            def.title,
            MARGIN + 10.0,
            engine.cursor(),
            FontStyle::Regular,
            11.0,
            CHARCOAL,
        );
        engine.advance(8.0);
    }
}

fn section_header(engine: &mut LayoutEngine, def: &SectionDef) {
    engine.check_break(20.0);
    let y = engine.cursor();
    engine.op(DrawOp::Circle {
        cx: MARGIN + 5.0,
        cy: y + 3.0,
        radius: 5.0,
        fill: SAGE,
    });
    engine.text_centered(
        &def.letter.to_string(),
        MARGIN + 5.0,
        y + 4.5,
        FontStyle::Bold,
        10.0,
        WHITE,
    );
    engine.text(def.title, MARGIN + 14.0, y + 5.0, FontStyle::Bold, 16.0, CHARCOAL);
    engine.advance(15.0);
}

// --- free-text strategy ---

fn free_text_section(engine: &mut LayoutEngine, def: &SectionDef, record: &Record) {
    for field in def.fields {
        let value = record.group_value(field.key);
        if value.trim().is_empty() {
            continue;
        }
        match field.kind {
            FieldKind::Text => free_text_field(engine, field.label, value),
            FieldKind::Signature => signature_block(engine, field.label, value),
        }
    }
}

fn free_text_field(engine: &mut LayoutEngine, label: &str, value: &str) {
    // Keep the label attached to at least the first body line.
    engine.check_break(FIELD_LABEL_HEIGHT + LINE_HEIGHT);
    engine.text(
        label,
        MARGIN,
        engine.cursor(),
        FontStyle::Bold,
        9.0,
        CHARCOAL_MUTED,
    );
    engine.advance(FIELD_LABEL_HEIGHT);
    engine.flowing_lines(value, MARGIN, CONTENT_WIDTH, FontStyle::Regular, 10.0, CHARCOAL);
    engine.advance(FIELD_GAP);
}

fn signature_block(engine: &mut LayoutEngine, label: &str, payload: &str) {
    let Some(raster) = image::decode_signature(payload) else {
        debug!(target: "handoff::render", "skipping undecodable signature payload");
        return;
    };

    let scale = (SIGNATURE_BOX_WIDTH / raster.width as f32)
        .min(SIGNATURE_BOX_HEIGHT / raster.height as f32);
    let width = raster.width as f32 * scale;
    let height = raster.height as f32 * scale;

    engine.check_break(FIELD_LABEL_HEIGHT + height + FIELD_GAP);
    engine.text(
        label,
        MARGIN,
        engine.cursor(),
        FontStyle::Bold,
        9.0,
        CHARCOAL_MUTED,
    );
    engine.advance(FIELD_LABEL_HEIGHT);
    engine.op(DrawOp::Image {
        x: MARGIN,
        y: engine.cursor(),
        width,
        height,
        image: raster,
    });
    engine.advance(height + FIELD_GAP);
}

// --- card strategies ---

struct CardContent {
    title: Option<String>,
    fields: Vec<(&'static str, String)>,
}

fn card_content(def: &SectionDef, item: &Item) -> CardContent {
    let title = item_heading(item, def.title_field, def.fallback_field);
    let consumed = heading_fields(item, def.title_field, def.fallback_field);
    let fields = def
        .fields
        .iter()
        .filter(|field| field.kind == FieldKind::Text && !consumed.contains(&field.key))
        .filter_map(|field| {
            let value = item.value(field.key).trim();
            (!value.is_empty()).then(|| (field.label, value.to_string()))
        })
        .collect();
    CardContent { title, fields }
}

/// First pass of the card: total height from title, wrapped values, and
/// padding. `check_break` runs against this number before anything is drawn.
fn measure_card(content: &CardContent, width: f32) -> f32 {
    let inner = width - CARD_PADDING * 2.0;
    let mut height = CARD_PADDING * 2.0;
    if content.title.is_some() {
        height += CARD_TITLE_HEIGHT;
    }
    for (_, value) in &content.fields {
        let lines = wrap(value, FontStyle::Regular, 10.0, inner).len();
        height += FIELD_LABEL_HEIGHT + lines as f32 * LINE_HEIGHT + FIELD_GAP;
    }
    if !content.fields.is_empty() {
        height -= FIELD_GAP;
    }
    height
}

/// Second pass: the background rectangle is drawn first with the measured
/// height, then the content on top of it. The engine cursor is not moved;
/// callers advance it, which lets two cards share one row.
fn draw_card_at(engine: &mut LayoutEngine, content: &CardContent, x: f32, y: f32, width: f32) -> f32 {
    let height = measure_card(content, width);
    let inner = width - CARD_PADDING * 2.0;

    engine.op(DrawOp::Rect {
        x,
        y,
        width,
        height,
        corner_radius: CARD_CORNER_RADIUS,
        fill: Some(WHITE),
        stroke: Some(BORDER),
    });

    let text_x = x + CARD_PADDING;
    let mut local_y = y + CARD_PADDING + 3.0;
    if let Some(title) = &content.title {
        engine.text(title, text_x, local_y + 1.0, FontStyle::Bold, 12.0, CHARCOAL);
        local_y += CARD_TITLE_HEIGHT;
    }
    for (label, value) in &content.fields {
        engine.text(label, text_x, local_y, FontStyle::Bold, 9.0, CHARCOAL_MUTED);
        local_y += FIELD_LABEL_HEIGHT;
        for line in wrap(value, FontStyle::Regular, 10.0, inner) {
            if !line.is_empty() {
                engine.text(&line, text_x, local_y, FontStyle::Regular, 10.0, CHARCOAL);
            }
            local_y += LINE_HEIGHT;
        }
        local_y += FIELD_GAP;
    }

    height
}

fn cards_section(engine: &mut LayoutEngine, def: &SectionDef, record: &Record) {
    for item in populated_items(record) {
        let content = card_content(def, item);
        let height = measure_card(&content, CONTENT_WIDTH);
        engine.check_break(height + CARD_GAP);
        let height = draw_card_at(engine, &content, MARGIN, engine.cursor(), CONTENT_WIDTH);
        engine.advance(height + CARD_GAP);
    }
}

fn two_column_section(engine: &mut LayoutEngine, def: &SectionDef, record: &Record, max_items: usize) {
    let items = populated_items(record);
    // Above the pairing threshold the packed layout gets cramped; fall back
    // to one full-width card per item.
    if items.len() > max_items {
        cards_section(engine, def, record);
        return;
    }

    let column_width = (CONTENT_WIDTH - COLUMN_GAP) / 2.0;
    for pair in items.chunks(2) {
        let contents: Vec<CardContent> = pair.iter().map(|&item| card_content(def, item)).collect();
        let row_height = contents
            .iter()
            .map(|content| measure_card(content, column_width))
            .fold(0.0_f32, f32::max);
        engine.check_break(row_height + CARD_GAP);

        let y = engine.cursor();
        for (column, content) in contents.iter().enumerate() {
            let x = MARGIN + column as f32 * (column_width + COLUMN_GAP);
            draw_card_at(engine, content, x, y, column_width);
        }
        engine.advance(row_height + CARD_GAP);
    }
}

// --- table strategy ---

fn column_widths(count: usize) -> Vec<f32> {
    // The leading column carries the identifying value and gets extra room.
    let weights: Vec<f32> = (0..count).map(|i| if i == 0 { 1.5 } else { 1.0 }).collect();
    let total: f32 = weights.iter().sum();
    weights
        .iter()
        .map(|weight| CONTENT_WIDTH * weight / total)
        .collect()
}

fn cell_budget(width: f32) -> usize {
    // Display columns that fit a 9pt cell; cells truncate, never wrap.
    ((width - TABLE_CELL_PADDING * 2.0) / 1.8).max(1.0) as usize
}

fn table_header(engine: &mut LayoutEngine, def: &SectionDef, columns: &[&str], widths: &[f32]) {
    let y = engine.cursor();
    engine.op(DrawOp::Rect {
        x: MARGIN,
        y,
        width: CONTENT_WIDTH,
        height: TABLE_HEADER_HEIGHT,
        corner_radius: 0.0,
        fill: Some(SAGE),
        stroke: None,
    });
    let mut x = MARGIN;
    for (column, width) in columns.iter().zip(widths) {
        let label = def.field(column).map(|field| field.label).unwrap_or(*column);
        let label = truncate_columns(label, cell_budget(*width));
        engine.text(
            &label,
            x + TABLE_CELL_PADDING,
            y + 6.0,
            FontStyle::Bold,
            9.0,
            WHITE,
        );
        x += width;
    }
    engine.advance(TABLE_HEADER_HEIGHT);
}

fn table_section(
    engine: &mut LayoutEngine,
    def: &SectionDef,
    record: &Record,
    columns: &[&str],
    notes_field: &'static str,
) {
    let items = populated_items(record);
    let widths = column_widths(columns.len());

    engine.check_break(TABLE_HEADER_HEIGHT + TABLE_ROW_HEIGHT);
    table_header(engine, def, columns, &widths);

    for (index, item) in items.iter().enumerate() {
        if engine.check_break(TABLE_ROW_HEIGHT) {
            table_header(engine, def, columns, &widths);
        }
        let y = engine.cursor();
        engine.op(DrawOp::Rect {
            x: MARGIN,
            y,
            width: CONTENT_WIDTH,
            height: TABLE_ROW_HEIGHT,
            corner_radius: 0.0,
            fill: Some(if index % 2 == 0 { WHITE } else { ROW_SHADE }),
            stroke: None,
        });
        let mut x = MARGIN;
        for (column, width) in columns.iter().zip(&widths) {
            let value = truncate_columns(item.value(column), cell_budget(*width));
            if !value.is_empty() {
                engine.text(
                    &value,
                    x + TABLE_CELL_PADDING,
                    y + 5.5,
                    FontStyle::Regular,
                    9.0,
                    CHARCOAL,
                );
            }
            x += width;
        }
        engine.advance(TABLE_ROW_HEIGHT);
    }
    engine.advance(CARD_GAP);

    // Items carrying free-text notes get a detail card under the table.
    for item in items {
        let notes = item.value(notes_field).trim();
        if notes.is_empty() {
            continue;
        }
        let label = def.field(notes_field).map(|field| field.label).unwrap_or(notes_field);
        let content = CardContent {
            title: item_heading(item, def.title_field, def.fallback_field),
            fields: vec![(label, notes.to_string())],
        };
        let height = measure_card(&content, CONTENT_WIDTH);
        engine.check_break(height + CARD_GAP);
        draw_card_at(engine, &content, MARGIN, engine.cursor(), CONTENT_WIDTH);
        engine.advance(height + CARD_GAP);
    }
}
