use crate::core::member::Member;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A recommended payment from a debtor to a creditor.
///
/// `exact_amount` is the real-valued quantity the planner moved between the
/// two balances. `amount` is what people are asked to pay: the exact amount
/// rounded up to the next whole currency unit. Rounding always goes up, so
/// a plan can ask for slightly more than the true imbalance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    /// The member who pays.
    pub from: Member,
    /// The member who receives.
    pub to: Member,
    /// Whole currency units to transfer.
    pub amount: u64,
    pub exact_amount: f64,
}

impl Settlement {
    pub fn new(from: Member, to: Member, exact_amount: f64) -> Self {
        Self {
            from,
            to,
            amount: round_up(exact_amount),
            exact_amount,
        }
    }

    /// How much the human-facing amount exceeds the exact one.
    pub fn rounding(&self) -> f64 {
        self.amount as f64 - self.exact_amount
    }
}

/// Round a positive quantity up to whole units. Non-positive and NaN inputs
/// map to zero.
fn round_up(amount: f64) -> u64 {
    if amount > 0.0 {
        amount.ceil() as u64
    } else {
        0
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}: {}", self.from.name, self.to.name, self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_amount_rounds_up() {
        let s = Settlement::new(Member::new("b", "Bob"), Member::new("a", "Alice"), 33.333_333);
        assert_eq!(s.amount, 34);
        assert_abs_diff_eq!(s.rounding(), 0.666_667, epsilon = 1e-9);
    }

    #[test]
    fn test_whole_amount_unchanged() {
        let s = Settlement::new(Member::new("b", "Bob"), Member::new("a", "Alice"), 100.0);
        assert_eq!(s.amount, 100);
        assert_abs_diff_eq!(s.rounding(), 0.0);
    }

    #[test]
    fn test_display() {
        let s = Settlement::new(Member::new("b", "Bob"), Member::new("a", "Alice"), 12.5);
        assert_eq!(s.to_string(), "Bob → Alice: 13");
    }
}
