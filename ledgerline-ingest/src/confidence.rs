//! Confidence scoring over one parse call.
//!
//! confidence = round2(0.7 * valid/candidates + 0.3 * min(1, valid/8))

use crate::types::Transaction;

pub const NO_ROWS_WARNING: &str = "No transaction-like rows detected";
pub const NONE_VALID_WARNING: &str = "Transaction-like rows found but none could be parsed";
pub const FEW_ROWS_WARNING: &str = "Few rows parsed, review carefully";
pub const LOW_RELIABILITY_WARNING: &str = "Low parse reliability: <80% of candidate rows valid";

/// Valid rows at which the sample-size factor saturates.
const SATURATION_ROWS: f64 = 8.0;
const RATIO_WEIGHT: f64 = 0.7;
const SIZE_WEIGHT: f64 = 0.3;
const RELIABLE_RATIO: f64 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub valid_rows: usize,
    pub valid_ratio: f64,
    pub confidence: f64,
    pub warnings: Vec<String>,
}

/// A valid row has a calendar date (guaranteed by `NaiveDate`) and a finite amount.
pub fn count_valid(transactions: &[Transaction]) -> usize {
    transactions.iter().filter(|t| t.amount.is_finite()).count()
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

pub fn score(candidate_rows: usize, transactions: &[Transaction]) -> Score {
    let valid_rows = count_valid(transactions);
    let mut warnings = Vec::new();

    if candidate_rows == 0 {
        warnings.push(NO_ROWS_WARNING.to_string());
        return Score {
            valid_rows,
            valid_ratio: 0.0,
            confidence: 0.0,
            warnings,
        };
    }

    let valid_ratio = (valid_rows as f64 / candidate_rows as f64).min(1.0);
    let size_factor = (valid_rows as f64 / SATURATION_ROWS).min(1.0);
    let confidence = round2(valid_ratio * RATIO_WEIGHT + size_factor * SIZE_WEIGHT);

    if valid_rows == 0 {
        warnings.push(NONE_VALID_WARNING.to_string());
    }
    if (1..=2).contains(&valid_rows) {
        warnings.push(FEW_ROWS_WARNING.to_string());
    }
    if valid_ratio > 0.0 && valid_ratio < RELIABLE_RATIO {
        warnings.push(LOW_RELIABILITY_WARNING.to_string());
    }

    Score {
        valid_rows,
        valid_ratio,
        confidence,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txns(n: usize) -> Vec<Transaction> {
        (0..n)
            .map(|i| Transaction {
                date: NaiveDate::from_ymd_opt(2026, 1, 1 + i as u32).unwrap(),
                description: format!("row {i}"),
                amount: -1.0,
                balance: None,
            })
            .collect()
    }

    #[test]
    fn test_no_candidates() {
        let s = score(0, &[]);
        assert_eq!(s.confidence, 0.0);
        assert_eq!(s.warnings, vec![NO_ROWS_WARNING.to_string()]);
    }

    #[test]
    fn test_full_statement_is_confident() {
        let s = score(8, &txns(8));
        assert_eq!(s.confidence, 1.0);
        assert!(s.warnings.is_empty());
    }

    #[test]
    fn test_few_rows() {
        // 0.7 * 1.0 + 0.3 * 1/8 = 0.7375
        let s = score(1, &txns(1));
        assert_eq!(s.confidence, 0.74);
        assert_eq!(s.warnings, vec![FEW_ROWS_WARNING.to_string()]);

        let s = score(2, &txns(2));
        assert_eq!(s.warnings, vec![FEW_ROWS_WARNING.to_string()]);
    }

    #[test]
    fn test_low_reliability() {
        // 0.7 * 0.5 + 0.3 * 0.5 = 0.5
        let s = score(8, &txns(4));
        assert_eq!(s.valid_ratio, 0.5);
        assert_eq!(s.confidence, 0.5);
        assert_eq!(s.warnings, vec![LOW_RELIABILITY_WARNING.to_string()]);
    }

    #[test]
    fn test_candidates_but_nothing_valid() {
        let s = score(3, &[]);
        assert_eq!(s.confidence, 0.0);
        assert_eq!(s.warnings, vec![NONE_VALID_WARNING.to_string()]);
    }

    #[test]
    fn test_non_finite_amounts_are_not_valid() {
        let mut rows = txns(3);
        rows[1].amount = f64::NAN;
        assert_eq!(count_valid(&rows), 2);
    }
}
