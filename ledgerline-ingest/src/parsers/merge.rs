//! Continuation merging: the two-state machine that stitches wrapped rows.
//!
//! Statement exports often wrap one transaction over two physical lines
//! (date + description, then amount + balance), or continue a description
//! on the following line. The machine holds at most one unresolved
//! candidate row at a time.

use crate::classify::LineClass;
use crate::types::Transaction;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MergeState {
    #[default]
    Idle,
    /// A candidate row (plus any continuations) that has not yet extracted
    Pending(String),
}

/// What the caller should do with the line it just fed in.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Emit(Transaction),
    /// Append the line to the previous transaction's description
    Append,
    Hold,
    /// The held row never resolved and was given up
    Drop(String),
    Skip,
}

impl MergeState {
    /// Advance by one classified line.
    ///
    /// `has_previous` tells whether a transaction exists to absorb a
    /// continuation. `extract` turns a (possibly merged) row into a
    /// transaction.
    pub fn step<F>(self, line: &str, class: LineClass, has_previous: bool, extract: F) -> (MergeState, Outcome)
    where
        F: Fn(&str) -> Option<Transaction>,
    {
        // Boilerplate between wrapped halves (page breaks) leaves the held row alone.
        if matches!(class, LineClass::Metadata | LineClass::Header) {
            return (self, Outcome::Skip);
        }

        match self {
            MergeState::Idle => match class {
                LineClass::Candidate => match extract(line) {
                    Some(txn) => (MergeState::Idle, Outcome::Emit(txn)),
                    None => (MergeState::Pending(line.to_string()), Outcome::Hold),
                },
                LineClass::Continuation if has_previous => (MergeState::Idle, Outcome::Append),
                _ => (MergeState::Idle, Outcome::Skip),
            },
            MergeState::Pending(held) => {
                let merged = format!("{held} {line}");
                match extract(&merged) {
                    Some(txn) => (MergeState::Idle, Outcome::Emit(txn)),
                    None if class == LineClass::Continuation => {
                        (MergeState::Pending(merged), Outcome::Hold)
                    }
                    None => (MergeState::Idle, Outcome::Drop(held)),
                }
            }
        }
    }

    /// End of input: hand back the row that never resolved, if any.
    pub fn finish(self) -> Option<String> {
        match self {
            MergeState::Idle => None,
            MergeState::Pending(held) => Some(held),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// Stand-in extractor: a row resolves once it mentions "AMT".
    fn fake_extract(row: &str) -> Option<Transaction> {
        row.contains("AMT").then(|| Transaction {
            date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            description: row.to_string(),
            amount: -1.0,
            balance: None,
        })
    }

    #[test]
    fn test_idle_candidate_emits() {
        let (state, outcome) =
            MergeState::Idle.step("D1 shop AMT", LineClass::Candidate, false, fake_extract);
        assert_eq!(state, MergeState::Idle);
        assert!(matches!(outcome, Outcome::Emit(t) if t.description == "D1 shop AMT"));
    }

    #[test]
    fn test_idle_candidate_without_amount_is_held() {
        let (state, outcome) = MergeState::Idle.step("D1 shop", LineClass::Candidate, false, fake_extract);
        assert_eq!(state, MergeState::Pending("D1 shop".into()));
        assert_eq!(outcome, Outcome::Hold);
    }

    #[test]
    fn test_pending_resolves_with_next_line() {
        let pending = MergeState::Pending("D1 shop".into());
        let (state, outcome) = pending.step("AMT", LineClass::Unclassified, true, fake_extract);
        assert_eq!(state, MergeState::Idle);
        assert!(matches!(outcome, Outcome::Emit(t) if t.description == "D1 shop AMT"));
    }

    #[test]
    fn test_pending_keeps_growing_on_continuations() {
        let pending = MergeState::Pending("D1 shop".into());
        let (state, outcome) = pending.step("DUBLIN", LineClass::Continuation, false, fake_extract);
        assert_eq!(state, MergeState::Pending("D1 shop DUBLIN".into()));
        assert_eq!(outcome, Outcome::Hold);

        let (state, outcome) = state.step("IE AMT", LineClass::Unclassified, false, fake_extract);
        assert_eq!(state, MergeState::Idle);
        assert!(matches!(outcome, Outcome::Emit(t) if t.description == "D1 shop DUBLIN IE AMT"));
    }

    #[test]
    fn test_pending_dropped_on_unresolvable_line() {
        let pending = MergeState::Pending("D1 shop".into());
        let (state, outcome) = pending.step("9.99 9.99", LineClass::Unclassified, false, |_| None);
        assert_eq!(state, MergeState::Idle);
        assert_eq!(outcome, Outcome::Drop("D1 shop".into()));
    }

    #[test]
    fn test_failed_merge_with_candidate_drops_both() {
        let pending = MergeState::Pending("D1 shop".into());
        let (state, outcome) = pending.step("D2 cafe", LineClass::Candidate, true, |_| None);
        assert_eq!(state, MergeState::Idle);
        assert_eq!(outcome, Outcome::Drop("D1 shop".into()));
    }

    #[test]
    fn test_boilerplate_does_not_disturb_pending() {
        let pending = MergeState::Pending("D1 shop".into());
        let (state, outcome) = pending.step("Page 2 of 3", LineClass::Metadata, true, fake_extract);
        assert_eq!(state, MergeState::Pending("D1 shop".into()));
        assert_eq!(outcome, Outcome::Skip);

        let (state, outcome) = state.step("DateDescriptionAmountBalance", LineClass::Header, true, fake_extract);
        assert_eq!(state, MergeState::Pending("D1 shop".into()));
        assert_eq!(outcome, Outcome::Skip);
    }

    #[test]
    fn test_idle_continuation_appends_only_after_a_transaction() {
        let (_, outcome) = MergeState::Idle.step("DUBLIN IE", LineClass::Continuation, true, fake_extract);
        assert_eq!(outcome, Outcome::Append);

        let (_, outcome) = MergeState::Idle.step("DUBLIN IE", LineClass::Continuation, false, fake_extract);
        assert_eq!(outcome, Outcome::Skip);

        let (_, outcome) = MergeState::Idle.step("9.99", LineClass::Unclassified, true, fake_extract);
        assert_eq!(outcome, Outcome::Skip);
    }

    #[test]
    fn test_finish() {
        assert_eq!(MergeState::Idle.finish(), None);
        assert_eq!(MergeState::Pending("D1".into()).finish(), Some("D1".into()));
    }
}
