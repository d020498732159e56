//! Capture `tracing` events as column-oriented tables.
//!
//! Every event target becomes a table and every event field a column, so the
//! schema comes from whatever the instrumented code emits. Tables convert to
//! polars `DataFrame`s for analysis.
//!
//! # Usage
//!
//! ```ignore
//! // In library code:
//! tracing::info!(target: "price_scan", index, price, eps1, eps2);
//!
//! // In a test or notebook:
//! let capture = instrument::Capture::start();
//! economy.find_market_clearing();
//! let frames = capture.finish_to_dataframes()?;
//! let scan = &frames["price_scan"];
//! ```

use std::cell::RefCell;
use std::collections::HashMap;

use polars::prelude::*;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Record};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Id, Metadata, Subscriber};

// === TABLES ===

/// Values of one event field, typed by the first value recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldColumn {
    U64(Vec<u64>),
    I64(Vec<i64>),
    F64(Vec<f64>),
    Bool(Vec<bool>),
    Str(Vec<String>),
}

impl FieldColumn {
    pub fn len(&self) -> usize {
        match self {
            FieldColumn::U64(v) => v.len(),
            FieldColumn::I64(v) => v.len(),
            FieldColumn::F64(v) => v.len(),
            FieldColumn::Bool(v) => v.len(),
            FieldColumn::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Extend with default values up to `len` rows.
    fn pad_to(&mut self, len: usize) {
        let missing = len.saturating_sub(self.len());
        if missing == 0 {
            return;
        }
        match self {
            FieldColumn::U64(v) => v.extend(std::iter::repeat_n(0, missing)),
            FieldColumn::I64(v) => v.extend(std::iter::repeat_n(0, missing)),
            FieldColumn::F64(v) => v.extend(std::iter::repeat_n(f64::NAN, missing)),
            FieldColumn::Bool(v) => v.extend(std::iter::repeat_n(false, missing)),
            FieldColumn::Str(v) => v.extend(std::iter::repeat_n(String::new(), missing)),
        }
    }

    pub fn as_f64(&self) -> Option<&[f64]> {
        match self {
            FieldColumn::F64(v) => Some(v),
            _ => None,
        }
    }
}

/// Rows of one event target. Columns are kept at equal length; a field
/// missing from an event gets a default (`NaN` for floats).
#[derive(Debug, Clone, Default)]
pub struct EventTable {
    pub columns: HashMap<String, FieldColumn>,
    pub row_count: usize,
}

impl EventTable {
    fn pad_columns(&mut self) {
        let rows = self.row_count;
        for col in self.columns.values_mut() {
            col.pad_to(rows);
        }
    }

    /// Convert to a polars frame. Column order is sorted by name.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut names: Vec<&String> = self.columns.keys().collect();
        names.sort();

        let columns: Vec<Column> = names
            .into_iter()
            .map(|name| match &self.columns[name] {
                FieldColumn::U64(v) => Column::new(name.into(), v),
                FieldColumn::I64(v) => Column::new(name.into(), v),
                FieldColumn::F64(v) => Column::new(name.into(), v),
                FieldColumn::Bool(v) => Column::new(name.into(), v),
                FieldColumn::Str(v) => Column::new(name.into(), v),
            })
            .collect();

        DataFrame::new(columns)
    }
}

/// All captured tables, keyed by event target.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub tables: HashMap<String, EventTable>,
}

impl EventLog {
    pub fn to_dataframes(&self) -> PolarsResult<HashMap<String, DataFrame>> {
        self.tables
            .iter()
            .map(|(name, table)| Ok((name.clone(), table.to_dataframe()?)))
            .collect()
    }
}

thread_local! {
    static EVENTS: RefCell<EventLog> = RefCell::default();
}

// === SUBSCRIBER ===

struct RowVisitor<'a> {
    table: &'a mut EventTable,
}

impl RowVisitor<'_> {
    /// Column for `field`, created pre-padded for earlier rows.
    fn column(&mut self, field: &Field, empty: fn(usize) -> FieldColumn) -> &mut FieldColumn {
        let rows = self.table.row_count;
        self.table
            .columns
            .entry(field.name().to_string())
            .or_insert_with(|| empty(rows))
    }
}

impl Visit for RowVisitor<'_> {
    fn record_u64(&mut self, field: &Field, value: u64) {
        match self.column(field, |n| FieldColumn::U64(vec![0; n])) {
            FieldColumn::U64(v) => v.push(value),
            // mixed signedness across events lands in the first column type
            FieldColumn::I64(v) => v.push(value as i64),
            FieldColumn::F64(v) => v.push(value as f64),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        match self.column(field, |n| FieldColumn::I64(vec![0; n])) {
            FieldColumn::I64(v) => v.push(value),
            FieldColumn::F64(v) => v.push(value as f64),
            _ => {}
        }
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if let FieldColumn::F64(v) = self.column(field, |n| FieldColumn::F64(vec![f64::NAN; n])) {
            v.push(value);
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if let FieldColumn::Bool(v) = self.column(field, |n| FieldColumn::Bool(vec![false; n])) {
            v.push(value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if let FieldColumn::Str(v) =
            self.column(field, |n| FieldColumn::Str(vec![String::new(); n]))
        {
            v.push(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.record_str(field, &format!("{:?}", value));
    }
}

/// Subscriber that appends every info-or-higher event to the thread-local
/// [`EventLog`]. Spans are ignored.
pub struct EventTableSubscriber;

impl Subscriber for EventTableSubscriber {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.is_event() && *metadata.level() <= tracing::Level::INFO
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let target = event.metadata().target().to_string();

        EVENTS.with(|log| {
            let mut log = log.borrow_mut();
            let table = log.tables.entry(target).or_default();

            event.record(&mut RowVisitor {
                table: &mut *table,
            });
            table.row_count += 1;
            // fields this event did not carry
            table.pad_columns();
        });
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

/// Take everything captured on this thread so far.
pub fn drain() -> EventLog {
    EVENTS.with(|log| std::mem::take(&mut *log.borrow_mut()))
}

pub fn clear() {
    EVENTS.with(|log| *log.borrow_mut() = EventLog::default());
}

// === CAPTURE GUARD ===

/// Installs [`EventTableSubscriber`] as this thread's default subscriber
/// until finished or dropped. Starting a capture clears earlier events.
pub struct Capture {
    _guard: DefaultGuard,
}

impl Capture {
    pub fn start() -> Self {
        clear();
        Self {
            _guard: tracing::subscriber::set_default(EventTableSubscriber),
        }
    }

    /// Stop capturing and return the tables.
    pub fn finish(self) -> EventLog {
        drop(self);
        drain()
    }

    /// Stop capturing and return the tables as polars frames.
    pub fn finish_to_dataframes(self) -> PolarsResult<HashMap<String, DataFrame>> {
        self.finish().to_dataframes()
    }
}
