//! Amount-shaped tokens and signed amount parsing.
//!
//! Statements print money in many ways:
//!   -54.23   (54.23)   $1,204.00   - $14.05   54.23 DR   54.23CR   -$32.13$12,424.08
//! Every amount carries exactly two decimals; bare integers and rates
//! (`2.50%`) are never amounts.

use std::sync::LazyLock;

use regex::Regex;

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?P<open>\()?",
        r"(?P<sign>[-+\x{2212}])?\s?",
        r"[$€£¥]?\s?",
        r"[-+\x{2212}]?",
        r"(?P<num>(?:\d{1,3}(?:,\d{3})+|\d+)\.\d{2})",
        r"(?P<close>\))?",
        r"(?:\s?(?P<side>(?i:cr|dr)))?"
    ))
    .expect("amount regex")
});

static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?(?:\d+(?:\.\d+)?|\.\d+)$").expect("decimal regex"));

/// An amount-shaped token located inside a line (byte offsets).
#[derive(Debug, Clone, PartialEq)]
pub struct AmountToken {
    pub start: usize,
    pub end: usize,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Credit,
    Debit,
}

/// Parse a single amount into a signed value.
///
/// Sign markers: a `CR` suffix always means positive. Otherwise parentheses,
/// a minus sign, or a `DR` suffix mean negative. Without markers the number
/// keeps its own sign.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let mut s = raw.trim().replace('\u{2212}', "-");

    let upper = s.to_ascii_uppercase();
    let side = if upper.ends_with("CR") {
        Some(Side::Credit)
    } else if upper.ends_with("DR") {
        Some(Side::Debit)
    } else {
        None
    };
    if side.is_some() {
        s.truncate(s.len() - 2);
    }

    let parens = s.contains('(') && s.contains(')');
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | ',' | '$' | '€' | '£' | '¥') && !c.is_whitespace())
        .collect();

    if !DECIMAL_RE.is_match(&cleaned) {
        return None;
    }
    let value: f64 = cleaned.parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    let magnitude = value.abs();
    let negative = parens || cleaned.starts_with('-') || side == Some(Side::Debit);
    Some(match side {
        Some(Side::Credit) => magnitude,
        _ if negative => -magnitude,
        _ => magnitude,
    })
}

/// True when the text contains at least one amount-shaped token.
pub fn has_amount_token(text: &str) -> bool {
    !scan_amounts(text).is_empty()
}

/// Find every amount-shaped token in `text`, in order.
///
/// Numbers glued to further digits or decimals (`12.345`, `02.02.2026`) and
/// numbers followed by `%` are skipped. A `CR`/`DR` suffix only counts when
/// it is not the start of a longer word (`12.50 CREDIT`).
pub fn scan_amounts(text: &str) -> Vec<AmountToken> {
    let mut out = Vec::new();

    for caps in AMOUNT_RE.captures_iter(text) {
        let (Some(whole), Some(num)) = (caps.get(0), caps.name("num")) else {
            continue;
        };

        // Tail of a longer numeral whose head was already rejected.
        let before = text[..num.start()].chars().next_back();
        if whole.start() == num.start() && before.is_some_and(|c| c.is_ascii_digit() || c == '.') {
            continue;
        }

        let mut after = text[num.end()..].chars();
        match after.next() {
            Some(c) if c.is_ascii_digit() || c == '%' => continue,
            Some('.') if after.next().is_some_and(|c| c.is_ascii_digit()) => continue,
            _ => {}
        }

        let open = caps.name("open");
        let close = caps.name("close");
        let paired = open.is_some() && close.is_some();

        let start = match open {
            Some(o) if paired => o.start(),
            Some(o) => o.end(),
            None => whole.start(),
        };

        let mut end = match close {
            Some(c) if paired => c.end(),
            _ => num.end(),
        };
        if let Some(side) = caps.name("side") {
            let word_continues = text[side.end()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric());
            if !word_continues {
                end = side.end();
            }
        }

        let raw = &text[start..end];
        let Some(value) = parse_amount(raw) else {
            continue;
        };
        out.push(AmountToken {
            start: start + (raw.len() - raw.trim_start().len()),
            end,
            value,
        });
    }

    out
}
