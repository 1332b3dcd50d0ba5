//! Row classification for normalized statement lines.
//!
//! Rules are checked in order and the first hit wins:
//!   Metadata      page markers, "Date:", "Account History", "2 of 5", URLs
//!   Header        table header text, or a lone column label like
//!                 "Opening balance" (and no leading date)
//!   Candidate     starts with a date token
//!   Continuation  no amount-shaped token anywhere
//!   Unclassified  everything else (amount fragments without a date)

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Regex, RegexSet};

use crate::amounts::has_amount_token;
use crate::dates::match_leading_date;
use crate::types::ColumnLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineClass {
    Metadata,
    Header,
    Candidate,
    Continuation,
    Unclassified,
}

static METADATA_SET: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)^page\s*\d+(?:\s*(?:of|/)\s*\d+)?$",
        r"(?i)\bpage\s+\d+\s+of\s+\d+\b",
        r"(?i)^\d+\s*of\s*\d+$",
        r"^-\s*\d+\s*-$",
        r"(?i)^date\s*:",
        r"(?i)account\s*history",
        r"(?i)https?://|\bwww\.",
    ])
    .expect("metadata patterns")
});

/// Longer words come before their prefixes so `transactions` never splits.
static HEADER_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)transactions?|trans|date|description|details|particulars|amount|balance|",
        r"debits?|credits?|withdrawals?|deposits?|money|reference|posted|post|value|type"
    ))
    .expect("header keyword regex")
});

/// Column words that also label lone summary lines (`Opening balance`).
/// `debit`, `credit` and `date` are left out: they show up in merchant text.
static LABEL_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:balances?|amounts?|descriptions?)\b").expect("label keyword regex")
});

/// Share of a line's letters that must be header vocabulary.
const HEADER_COVERAGE: f64 = 0.6;

pub fn is_metadata(line: &str) -> bool {
    METADATA_SET.is_match(line)
}

/// Table-header text: at least two distinct header words, which make up most
/// of the letters on the line. Handles glued exports like
/// `DateDescriptionAmountBalance` as well as spaced ones.
pub fn is_header_text(text: &str) -> bool {
    let letters = text.chars().filter(|c| c.is_alphabetic()).count();
    if letters == 0 {
        return false;
    }

    let mut distinct = HashSet::new();
    let mut covered = 0usize;
    for m in HEADER_WORD_RE.find_iter(text) {
        distinct.insert(m.as_str().to_ascii_lowercase());
        covered += m.as_str().len();
    }

    distinct.len() >= 2 && covered as f64 / letters as f64 >= HEADER_COVERAGE
}

/// Amount columns named by a header line, or `None` when it names no money
/// column (`Date Description`, `Opening balance`).
pub fn sniff_layout(header: &str) -> Option<ColumnLayout> {
    let squashed: String = header
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| squashed.contains(w));

    let layout = ColumnLayout {
        amount: has(&["amount"]),
        debit: has(&["debit", "withdrawal", "moneyout", "paidout"]),
        credit: has(&["credit", "deposit", "moneyin", "paidin"]),
        balance: has(&["balance"]),
    };
    layout.names_money_column().then_some(layout)
}

struct LineView<'a> {
    text: &'a str,
    dated: bool,
}

fn metadata_rule(v: &LineView<'_>) -> bool {
    is_metadata(v.text)
}

/// `Balance carried forward`: one column word and no figure on the line.
fn is_column_label(text: &str) -> bool {
    LABEL_WORD_RE.is_match(text) && !has_amount_token(text)
}

fn header_rule(v: &LineView<'_>) -> bool {
    !v.dated && (is_header_text(v.text) || is_column_label(v.text))
}

fn candidate_rule(v: &LineView<'_>) -> bool {
    v.dated
}

fn continuation_rule(v: &LineView<'_>) -> bool {
    !has_amount_token(v.text)
}

type Rule = fn(&LineView<'_>) -> bool;

const RULES: [(LineClass, Rule); 4] = [
    (LineClass::Metadata, metadata_rule),
    (LineClass::Header, header_rule),
    (LineClass::Candidate, candidate_rule),
    (LineClass::Continuation, continuation_rule),
];

/// Tag a normalized line.
pub fn classify_line(line: &str) -> LineClass {
    let view = LineView {
        text: line,
        dated: match_leading_date(line).is_some(),
    };
    RULES
        .iter()
        .find(|(_, rule)| rule(&view))
        .map(|(class, _)| *class)
        .unwrap_or(LineClass::Unclassified)
}
