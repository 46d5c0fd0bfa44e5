// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use projsync_app::{ProjectField, ProjectId, ProjectRecord, format_timestamp};

const COLUMN_COUNT: usize = 6;

pub const COLUMNS: [&str; COLUMN_COUNT] = [
    "id",
    "name",
    "description",
    "status",
    "responsible",
    "updated",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub id: ProjectId,
    pub cells: [String; COLUMN_COUNT],
}

impl ListRow {
    fn from_record(record: &ProjectRecord) -> Self {
        let text = |field| sanitize_cell(record.field(field).unwrap_or_default());
        Self {
            id: record.id,
            cells: [
                record.id.to_string(),
                text(ProjectField::Name),
                text(ProjectField::Description),
                text(ProjectField::Status),
                text(ProjectField::Responsible),
                record
                    .updated_at
                    .map(format_timestamp)
                    .unwrap_or_default(),
            ],
        }
    }
}

/// Tabular projection of the last fetched records.
///
/// Every render starts from an empty table, so rows never outlive the fetch
/// that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    rows: Vec<ListRow>,
    empty_visible: bool,
    selected: usize,
}

impl Default for ListView {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            empty_visible: true,
            selected: 0,
        }
    }
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every row with one per record, in the order given, and
    /// returns the new row count.
    pub fn render(&mut self, records: &[ProjectRecord]) -> usize {
        let previous = self.selected_id();
        self.rows.clear();
        self.rows.extend(records.iter().map(ListRow::from_record));
        self.empty_visible = self.rows.is_empty();
        self.selected = previous
            .and_then(|id| self.rows.iter().position(|row| row.id == id))
            .unwrap_or(0);
        self.rows.len()
    }

    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    pub fn is_empty_visible(&self) -> bool {
        self.empty_visible
    }

    pub fn selected_index(&self) -> Option<usize> {
        (!self.rows.is_empty()).then_some(self.selected)
    }

    pub fn selected_id(&self) -> Option<ProjectId> {
        self.rows.get(self.selected).map(|row| row.id)
    }

    pub fn move_selection(&mut self, delta: isize) {
        if self.rows.is_empty() {
            self.selected = 0;
            return;
        }
        let last = self.rows.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(last);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }
}

/// Makes record text safe to paint: line breaks and tabs become spaces and
/// every other control character is shown escaped, so an ESC byte can never
/// reach the terminal as the start of an escape sequence.
// Zero-width and bidi override characters reorder or hide neighbouring text.
fn is_invisible_format(ch: char) -> bool {
    matches!(
        ch,
        '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2060}'..='\u{2069}' | '\u{FEFF}'
    )
}

pub fn sanitize_cell(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\n' | '\r' | '\t' => out.push(' '),
            ch if ch.is_control() || is_invisible_format(ch) => out.extend(ch.escape_default()),
            ch => out.push(ch),
        }
    }
    out
}
