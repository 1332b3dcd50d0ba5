use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How ambiguous numeric dates (`03/04/26`) are read for one statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateOrder {
    #[serde(rename = "day-first")]
    DayFirst,
    #[serde(rename = "month-first")]
    MonthFirst,
    #[default]
    #[serde(rename = "unspecified")]
    Unspecified,
}

/// Normalized output of the statement parser (bank-agnostic)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Calendar date, serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
    pub description: String,
    /// Negative means debit/outflow; positive means credit/inflow.
    pub amount: f64,
    /// Running balance as printed on the statement, when the row carried one
    pub balance: Option<f64>,
}

/// Amount columns announced by the most recent table header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub amount: bool,
    pub debit: bool,
    pub credit: bool,
    pub balance: bool,
}

impl ColumnLayout {
    /// A header only steers amount picking when it names a money column.
    pub fn names_money_column(&self) -> bool {
        self.amount || self.debit || self.credit
    }
}

/// Diagnostic counters for one parse call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseDebug {
    pub candidate_rows: usize,
    pub parsed_rows: usize,
    pub valid_rows: usize,
    pub valid_ratio: f64,
    /// Order actually applied to ambiguous dates
    pub date_order: DateOrder,
    /// True when the caller pinned the order instead of detection
    pub date_order_overridden: bool,
    /// Candidate rows that never resolved into a transaction
    pub unresolved_rows: usize,
    pub column_layout: Option<ColumnLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub transactions: Vec<Transaction>,
    pub warnings: Vec<String>,
    /// 0.0 - 1.0
    pub confidence: f64,
    pub debug: ParseDebug,
}

/// Knobs for callers that know more about the statement than the text does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Skip detection and read ambiguous dates this way
    pub date_order: Option<DateOrder>,
    /// Year for rows printed without one (defaults to the current year)
    pub reference_year: Option<i32>,
}

impl ParseOptions {
    pub fn with_date_order(mut self, order: DateOrder) -> Self {
        self.date_order = Some(order);
        self
    }

    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }
}
