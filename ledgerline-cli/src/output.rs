use anyhow::{Context, Result};
use ledgerline_ingest::ParseResult;
use std::fmt::Write;

/// Human-readable summary of a parse result.
pub fn render_summary(res: &ParseResult, include_debug: bool) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Parsed {} transactions (confidence {:.2})\n",
        res.transactions.len(),
        res.confidence
    );

    for t in &res.transactions {
        let balance = t
            .balance
            .map(|b| format!("{b:.2}"))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(out, "{} | {:>12.2} | {:>12} | {}", t.date, t.amount, balance, t.description);
    }

    if !res.warnings.is_empty() {
        let _ = writeln!(out, "\nWarnings:");
        for w in &res.warnings {
            let _ = writeln!(out, "- {w}");
        }
    }

    if include_debug {
        let d = &res.debug;
        let _ = writeln!(
            out,
            "\ncandidates={} parsed={} valid={} ratio={:.2} unresolved={} date_order={:?}{}",
            d.candidate_rows,
            d.parsed_rows,
            d.valid_rows,
            d.valid_ratio,
            d.unresolved_rows,
            d.date_order,
            if d.date_order_overridden { " (pinned)" } else { "" }
        );
    }

    out
}

/// JSON form of a parse result; `include_debug = false` drops the counters.
pub fn render_json(res: &ParseResult, pretty: bool, include_debug: bool) -> Result<String> {
    let mut value = serde_json::to_value(res).context("serialize parse result")?;
    if !include_debug {
        if let Some(obj) = value.as_object_mut() {
            obj.remove("debug");
        }
    }
    let s = if pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    };
    s.context("serialize parse result")
}
