//! Points ledger: per-user signed fractional scores.
//!
//! Entries are created lazily on first mutation and never deleted. There is
//! no floor; scores may go negative.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::types::UserId;

/// Mapping from user to score, remembering first-insertion order so that
/// leaderboard ties resolve deterministically.
#[derive(Debug, Default)]
pub struct PointsLedger {
    scores: HashMap<UserId, f64>,
    order: Vec<UserId>,
}

impl PointsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `delta` (may be negative) to the user's score, creating the entry
    /// at zero if absent. Returns the new total.
    pub fn adjust(&mut self, user: UserId, delta: f64) -> f64 {
        let score = self.scores.entry(user).or_insert_with(|| {
            self.order.push(user);
            0.0
        });
        *score += delta;
        *score
    }

    /// Current score, or 0 if the user has no entry. Pure read; does not
    /// create an entry.
    pub fn query(&self, user: UserId) -> f64 {
        self.scores.get(&user).copied().unwrap_or(0.0)
    }

    /// Top `top_n` users by score, descending. Ties break by the order users
    /// were first inserted into the ledger.
    pub fn leaderboard(&self, top_n: usize) -> Vec<(UserId, f64)> {
        let mut rows: Vec<(UserId, f64)> = self
            .order
            .iter()
            .map(|user| (*user, self.scores[user]))
            .collect();
        // Stable sort over insertion-ordered rows keeps ties in insert order.
        rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        rows.truncate(top_n);
        rows
    }

    /// Number of users with an entry.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_sums_deltas() {
        let mut ledger = PointsLedger::new();
        let user = UserId::new(1);

        assert_eq!(ledger.adjust(user, 2.0), 2.0);
        assert_eq!(ledger.adjust(user, 0.5), 2.5);
        assert_eq!(ledger.adjust(user, -10.0), -7.5);
        assert_eq!(ledger.query(user), -7.5);
    }

    #[test]
    fn test_query_absent_is_zero_and_creates_nothing() {
        let ledger = PointsLedger::new();
        assert_eq!(ledger.query(UserId::new(9)), 0.0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_leaderboard_ties_break_by_insertion_order() {
        let mut ledger = PointsLedger::new();
        let (a, b, c, d) = (UserId::new(1), UserId::new(2), UserId::new(3), UserId::new(4));
        ledger.adjust(a, 5.0);
        ledger.adjust(b, 5.0);
        ledger.adjust(c, 3.0);
        ledger.adjust(d, 10.0);

        let top = ledger.leaderboard(3);
        assert_eq!(top, vec![(d, 10.0), (a, 5.0), (b, 5.0)]);
    }

    #[test]
    fn test_leaderboard_shorter_than_requested() {
        let mut ledger = PointsLedger::new();
        ledger.adjust(UserId::new(1), 1.0);
        assert_eq!(ledger.leaderboard(10).len(), 1);
    }

    #[test]
    fn test_negative_scores_allowed() {
        let mut ledger = PointsLedger::new();
        let user = UserId::new(1);
        assert_eq!(ledger.adjust(user, -10.0), -10.0);
    }
}
