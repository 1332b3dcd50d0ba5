//! Bank-agnostic statement parser: extracted text in, ordered transactions out.
//!
//! One forward pass over normalized lines. Each line is classified, then fed
//! through the merge machine; the only state carried forward is the held
//! candidate row, the last emitted transaction, and the latest header layout.

use chrono::{Datelike, Local};
use tracing::{debug, trace};

use crate::classify::{LineClass, classify_line, sniff_layout};
use crate::confidence::score;
use crate::dates::detect_date_order;
use crate::normalize::normalize_lines;
use crate::parsers::extract::{RowContext, extract_transaction};
use crate::parsers::merge::{MergeState, Outcome};
use crate::types::{ParseDebug, ParseOptions, ParseResult, Transaction};

pub const TRAILING_ROW_WARNING: &str =
    "Last transaction-like row could not be parsed (statement may be truncated)";

/// Parse extracted statement text. Never fails: unusable input yields an
/// empty transaction list, zero confidence, and warnings.
pub fn parse_statement_text(text: &str) -> ParseResult {
    parse_statement_text_with(text, &ParseOptions::default())
}

/// Same as [`parse_statement_text`], with a pinned date order or reference year.
pub fn parse_statement_text_with(text: &str, options: &ParseOptions) -> ParseResult {
    let lines = normalize_lines(text);

    let date_order = options.date_order.unwrap_or_else(|| detect_date_order(&lines));
    let mut ctx = RowContext {
        date_order,
        reference_year: options.reference_year.unwrap_or_else(|| Local::now().year()),
        layout: None,
    };

    let mut state = MergeState::Idle;
    let mut transactions: Vec<Transaction> = Vec::new();
    let mut candidate_rows = 0usize;
    let mut unresolved_rows = 0usize;

    for line in &lines {
        let class = classify_line(line);
        trace!(?class, line = line.as_str(), "classified");

        match class {
            LineClass::Header => {
                if let Some(layout) = sniff_layout(line) {
                    ctx.layout = Some(layout);
                }
            }
            LineClass::Candidate => candidate_rows += 1,
            _ => {}
        }

        let (next, outcome) = state.step(line, class, !transactions.is_empty(), |row| {
            extract_transaction(row, &ctx)
        });
        state = next;

        match outcome {
            Outcome::Emit(txn) => transactions.push(txn),
            Outcome::Append => {
                if let Some(last) = transactions.last_mut() {
                    last.description.push(' ');
                    last.description.push_str(line);
                }
            }
            Outcome::Drop(held) => {
                unresolved_rows += 1;
                debug!(row = held.as_str(), "dropped unresolved row");
            }
            Outcome::Hold | Outcome::Skip => {}
        }
    }

    let trailing = state.finish();
    if let Some(held) = &trailing {
        unresolved_rows += 1;
        debug!(row = held.as_str(), "unresolved row at end of input");
    }

    let mut scored = score(candidate_rows, &transactions);
    if trailing.is_some() {
        scored.warnings.push(TRAILING_ROW_WARNING.to_string());
    }

    debug!(
        candidate_rows,
        parsed_rows = transactions.len(),
        valid_rows = scored.valid_rows,
        confidence = scored.confidence,
        "parsed statement text"
    );

    ParseResult {
        debug: ParseDebug {
            candidate_rows,
            parsed_rows: transactions.len(),
            valid_rows: scored.valid_rows,
            valid_ratio: scored.valid_ratio,
            date_order,
            date_order_overridden: options.date_order.is_some(),
            unresolved_rows,
            column_layout: ctx.layout,
        },
        transactions,
        warnings: scored.warnings,
        confidence: scored.confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confidence::{FEW_ROWS_WARNING, NO_ROWS_WARNING};
    use crate::types::DateOrder;

    #[test]
    fn test_wrapped_row_merges() {
        let text = "15/02/2026VISA-OPENAI *CHATGPT SUBSCR DUBLIN IEFRGN\n-$32.13$12,424.08\n";
        let res = parse_statement_text(text);

        assert_eq!(res.transactions.len(), 1);
        let txn = &res.transactions[0];
        assert_eq!(txn.date.to_string(), "2026-02-15");
        assert_eq!(txn.description, "VISA-OPENAI *CHATGPT SUBSCR DUBLIN IEFRGN");
        assert_eq!(txn.amount, -32.13);
        assert_eq!(txn.balance, Some(12424.08));
        assert_eq!(res.debug.date_order, DateOrder::DayFirst);
        assert_eq!(res.debug.candidate_rows, 1);
        assert_eq!(res.warnings, vec![FEW_ROWS_WARNING.to_string()]);
    }

    #[test]
    fn test_continuation_appends_to_previous() {
        let text = "\
2026-03-01 AMAZON MKTP 19.99 480.01
SEATTLE WA
2026-03-02 PAYROLL ACME 1,000.00 1,480.01";
        let res = parse_statement_text(text);
        assert_eq!(res.transactions.len(), 2);
        assert_eq!(res.transactions[0].description, "AMAZON MKTP SEATTLE WA");
        assert_eq!(res.transactions[1].amount, 1000.0);
    }

    #[test]
    fn test_empty_input() {
        let res = parse_statement_text("");
        assert!(res.transactions.is_empty());
        assert_eq!(res.confidence, 0.0);
        assert_eq!(res.warnings, vec![NO_ROWS_WARNING.to_string()]);
    }

    #[test]
    fn test_trailing_unresolved_row_warns() {
        let text = "2026-03-01 Coffee 4.50 95.50\n2026-03-02 Truncated row";
        let res = parse_statement_text(text);
        assert_eq!(res.transactions.len(), 1);
        assert_eq!(res.debug.unresolved_rows, 1);
        assert!(res.warnings.contains(&TRAILING_ROW_WARNING.to_string()));
    }

    #[test]
    fn test_options_pin_order_and_year() {
        let text = "03/04 Coffee 4.50\nJul 20 Lunch 12.00";
        // "03/04" has no year, so it is not a numeric date token; only Jul 20 parses
        let res = parse_statement_text_with(
            text,
            &ParseOptions::default()
                .with_date_order(DateOrder::MonthFirst)
                .with_reference_year(2023),
        );
        assert_eq!(res.transactions.len(), 1);
        assert_eq!(res.transactions[0].date.to_string(), "2023-07-20");
        assert!(res.debug.date_order_overridden);
        assert_eq!(res.debug.date_order, DateOrder::MonthFirst);
    }

    #[test]
    fn test_header_layout_recorded() {
        let text = "\
Date Description Debit Credit
01/02/2026 Groceries 10.00 0.00";
        let res = parse_statement_text(text);
        let layout = res.debug.column_layout.unwrap();
        assert!(layout.debit && layout.credit && !layout.balance);
        assert_eq!(res.transactions[0].description, "Groceries");
        assert_eq!(res.transactions[0].amount, -10.0);
        assert_eq!(res.transactions[0].balance, None);
    }
}
