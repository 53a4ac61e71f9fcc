//! End-of-session chip count reconciliation.
//!
//! When the session stops, the table hands its players, the total buy-in,
//! and the frozen duration to a [`Reconciliation`]. The host types each
//! player's final chip count and validates that chips out equal chips in.

use std::collections::HashMap;
use std::fmt;

use crate::money::{format_money, format_signed_money, parse_amount, round_cents};
use crate::roster::{Player, PlayerId, RosterError};

/// Snapshot passed from the table to reconciliation when a session ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Handoff {
    pub players: Vec<Player>,
    pub total_buy_in: f64,
    pub duration_seconds: u64,
}

/// Outcome of validating the final counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// At least one player has no entry yet.
    Incomplete,
    /// Final counts add up to the buy-in total.
    Balanced { total: f64 },
    /// Final counts are off by `difference` (final minus expected).
    Mismatch {
        expected: f64,
        actual: f64,
        difference: f64,
    },
}

impl Verdict {
    pub fn is_balanced(&self) -> bool {
        matches!(self, Verdict::Balanced { .. })
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Incomplete => write!(f, "Please enter final chip counts for all players"),
            Verdict::Balanced { total } => {
                write!(f, "Chip counts match! Total: {}", format_money(*total))
            }
            Verdict::Mismatch {
                expected,
                actual,
                difference,
            } => write!(
                f,
                "Chip counts do not match. Difference: {} (expected {}, got {})",
                format_signed_money(*difference),
                format_money(*expected),
                format_money(*actual)
            ),
        }
    }
}

/// Final chip entries for one ended session.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    handoff: Handoff,
    entries: HashMap<PlayerId, String>,
    verdict: Option<Verdict>,
}

impl Reconciliation {
    pub fn new(handoff: Handoff) -> Self {
        Self {
            handoff,
            entries: HashMap::new(),
            verdict: None,
        }
    }

    pub fn handoff(&self) -> &Handoff {
        &self.handoff
    }

    /// The raw text entered for a player; empty when nothing was entered.
    pub fn entry(&self, id: PlayerId) -> &str {
        self.entries.get(&id).map(String::as_str).unwrap_or("")
    }

    /// The verdict from the last [`validate`](Self::validate), cleared
    /// whenever an entry changes.
    pub fn verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }

    /// Store the raw text for a player's final count.
    pub fn record(&mut self, id: PlayerId, text: &str) -> Result<(), RosterError> {
        if !self.handoff.players.iter().any(|p| p.id == id) {
            return Err(RosterError::UnknownPlayer(id));
        }
        self.entries.insert(id, text.to_string());
        self.verdict = None;
        Ok(())
    }

    /// Number of players with a non-empty entry.
    pub fn entered_count(&self) -> usize {
        self.handoff
            .players
            .iter()
            .filter(|p| !self.entry(p.id).is_empty())
            .count()
    }

    /// Compare the entered counts with the buy-in total.
    ///
    /// Entries that do not parse count as zero.
    pub fn validate(&mut self) -> Verdict {
        let verdict = self.compute();
        tracing::info!(%verdict, "reconciliation validated");
        self.verdict = Some(verdict);
        verdict
    }

    fn compute(&self) -> Verdict {
        if self.entered_count() < self.handoff.players.len() {
            return Verdict::Incomplete;
        }

        let sum: f64 = self
            .handoff
            .players
            .iter()
            .map(|p| parse_amount(self.entry(p.id)).unwrap_or(0.0))
            .sum();
        let actual = round_cents(sum);
        let expected = round_cents(self.handoff.total_buy_in);

        if actual == expected {
            Verdict::Balanced { total: actual }
        } else {
            Verdict::Mismatch {
                expected,
                actual,
                difference: actual - expected,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Roster;

    fn ended_table() -> Reconciliation {
        let mut roster = Roster::new();
        for (name, buy_in) in [("Alice", "10"), ("Bob", "20"), ("Carol", "15"), ("Dave", "20")] {
            roster.add(name, buy_in).unwrap();
        }
        Reconciliation::new(Handoff {
            players: roster.snapshot(),
            total_buy_in: roster.pot(),
            duration_seconds: 42,
        })
    }

    fn enter(rec: &mut Reconciliation, counts: &[&str]) {
        let ids: Vec<_> = rec.handoff().players.iter().map(|p| p.id).collect();
        for (id, count) in ids.into_iter().zip(counts) {
            rec.record(id, count).unwrap();
        }
    }

    #[test]
    fn balanced_counts() {
        let mut rec = ended_table();
        enter(&mut rec, &["5", "25", "15", "20"]);
        let verdict = rec.validate();
        assert_eq!(verdict, Verdict::Balanced { total: 65.0 });
        assert!(verdict.to_string().contains("$65.00"));
    }

    #[test]
    fn mismatched_counts() {
        let mut rec = ended_table();
        enter(&mut rec, &["5", "25", "15", "15"]);
        let verdict = rec.validate();
        assert!(!verdict.is_balanced());
        let message = verdict.to_string();
        assert!(message.contains("-$5.00"), "{message}");
        assert!(message.contains("expected $65.00"), "{message}");
        assert!(message.contains("got $60.00"), "{message}");
    }

    #[test]
    fn surplus_has_explicit_plus() {
        let mut rec = ended_table();
        enter(&mut rec, &["5", "25", "15", "22.5"]);
        assert!(rec.validate().to_string().contains("+$2.50"));
    }

    #[test]
    fn missing_entry_is_incomplete() {
        let mut rec = ended_table();
        enter(&mut rec, &["5", "25", "15"]);
        let verdict = rec.validate();
        assert_eq!(verdict, Verdict::Incomplete);
        assert_eq!(
            verdict.to_string(),
            "Please enter final chip counts for all players"
        );
    }

    #[test]
    fn zero_is_an_entry_but_empty_is_not() {
        let mut rec = ended_table();
        enter(&mut rec, &["0", "0", "0", ""]);
        assert_eq!(rec.entered_count(), 3);
        assert_eq!(rec.validate(), Verdict::Incomplete);

        enter(&mut rec, &["0", "0", "0", "0"]);
        assert!(matches!(rec.validate(), Verdict::Mismatch { .. }));
    }

    #[test]
    fn unparseable_entry_counts_as_zero() {
        let mut rec = ended_table();
        enter(&mut rec, &["30", "25", "10", "oops"]);
        assert_eq!(rec.validate(), Verdict::Balanced { total: 65.0 });

        rec.record(PlayerId(1), "abc").unwrap();
        assert_eq!(
            rec.validate(),
            Verdict::Mismatch {
                expected: 65.0,
                actual: 35.0,
                difference: -30.0,
            }
        );
    }

    #[test]
    fn recording_clears_verdict() {
        let mut rec = ended_table();
        enter(&mut rec, &["5", "25", "15", "20"]);
        rec.validate();
        assert!(rec.verdict().is_some());
        rec.record(PlayerId(1), "6").unwrap();
        assert!(rec.verdict().is_none());
    }

    #[test]
    fn unknown_player_entry_is_refused() {
        let mut rec = ended_table();
        assert_eq!(
            rec.record(PlayerId(99), "5"),
            Err(RosterError::UnknownPlayer(PlayerId(99)))
        );
        assert_eq!(rec.entry(PlayerId(99)), "");
    }
}
