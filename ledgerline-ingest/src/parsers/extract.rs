//! Single-row extraction: one (possibly merged) line into a transaction.
//!
//! Expected row shapes after normalization:
//!   15/02/2026 VISA-OPENAI *CHATGPT SUBSCR DUBLIN IE -$32.13 $12,424.08
//!   Jul 28 WALMART.COM - $14.05
//!   2026-04-22 Discover E-Payment 8148 (15.00) 53.70

use crate::amounts::{AmountToken, scan_amounts};
use crate::classify::{is_header_text, is_metadata};
use crate::dates::match_leading_date;
use crate::normalize::collapse_whitespace;
use crate::types::{ColumnLayout, DateOrder, Transaction};

/// Document-level facts every row is read against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowContext {
    pub date_order: DateOrder,
    /// Year for rows printed without one
    pub reference_year: i32,
    /// Layout of the most recent table header, if any was seen
    pub layout: Option<ColumnLayout>,
}

/// Which amount tokens of a row hold the amount and the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountPick {
    Single { amount: usize, balance: Option<usize> },
    /// Separate debit and credit columns, both printed
    DebitCredit { debit: usize, credit: usize, balance: Option<usize> },
}

impl AmountPick {
    /// Index of the first token that belongs to the amount columns.
    fn first(&self) -> usize {
        match *self {
            AmountPick::Single { amount, .. } => amount,
            AmountPick::DebitCredit { debit, .. } => debit,
        }
    }

    fn balance(&self) -> Option<usize> {
        match *self {
            AmountPick::Single { balance, .. } | AmountPick::DebitCredit { balance, .. } => balance,
        }
    }

    fn amount(&self, tokens: &[AmountToken]) -> f64 {
        match *self {
            AmountPick::Single { amount, .. } => tokens[amount].value,
            AmountPick::DebitCredit { debit, credit, .. } => {
                let net = tokens[credit].value.abs() - tokens[debit].value.abs();
                (net * 100.0).round() / 100.0
            }
        }
    }
}

/// Pick the amount and balance tokens out of `count` tokens.
///
/// Without a header, under one that names no money column, or under one that
/// has a balance column, the last two tokens are amount then balance. Under a debit/credit header with every
/// column filled, the trailing tokens are debit, credit (and balance).
/// Under a header without a balance column the last token is the amount.
pub fn select_amounts(count: usize, layout: Option<ColumnLayout>) -> Option<AmountPick> {
    if count == 0 {
        return None;
    }
    if count == 1 {
        return Some(AmountPick::Single { amount: 0, balance: None });
    }

    let layout = layout
        .filter(ColumnLayout::names_money_column)
        .unwrap_or(ColumnLayout { balance: true, ..ColumnLayout::default() });
    if layout.debit && layout.credit {
        let needed = if layout.balance { 3 } else { 2 };
        if count >= needed {
            let base = count - needed;
            return Some(AmountPick::DebitCredit {
                debit: base,
                credit: base + 1,
                balance: layout.balance.then_some(base + 2),
            });
        }
    }

    Some(if layout.balance {
        AmountPick::Single { amount: count - 2, balance: Some(count - 1) }
    } else {
        AmountPick::Single { amount: count - 1, balance: None }
    })
}

/// Extract a transaction from a row, or `None` when the row does not hold one.
pub fn extract_transaction(line: &str, ctx: &RowContext) -> Option<Transaction> {
    if is_metadata(line) {
        return None;
    }

    let date_match = match_leading_date(line)?;
    let date = date_match.token.resolve(ctx.date_order, ctx.reference_year)?;

    let rest = &line[date_match.len..];
    let tokens = scan_amounts(rest);
    let pick = select_amounts(tokens.len(), ctx.layout)?;

    let description = collapse_whitespace(&rest[..tokens[pick.first()].start]);
    if description.is_empty() || is_header_text(&description) {
        return None;
    }

    Some(Transaction {
        date,
        description,
        amount: pick.amount(&tokens),
        balance: pick.balance().map(|i| tokens[i].value),
    })
}
