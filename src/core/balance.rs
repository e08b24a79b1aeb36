use crate::core::member::MemberId;
use crate::core::settlement::Settlement;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Balances below this magnitude are treated as settled.
pub const DEFAULT_EPSILON: f64 = 0.01;

/// Net position of every member of a group.
///
/// A positive balance means the group owes the member (net creditor).
/// A negative balance means the member owes the group (net debtor).
///
/// Entries keep insertion order, which is the member-list order when the
/// balances come from the aggregator. The settlement planner relies on
/// this order to break ties deterministically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balances {
    positions: IndexMap<MemberId, f64>,
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start every given member at zero.
    pub fn zeroed<'a>(members: impl IntoIterator<Item = &'a MemberId>) -> Self {
        Self {
            positions: members.into_iter().map(|id| (id.clone(), 0.0)).collect(),
        }
    }

    /// Add `amount` to a member's balance, inserting the member if unknown.
    pub fn adjust(&mut self, member: &MemberId, amount: f64) {
        *self.positions.entry(member.clone()).or_insert(0.0) += amount;
    }

    /// Net balance of a member; zero if the member is unknown.
    pub fn get(&self, member: &MemberId) -> f64 {
        self.positions.get(member).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, member: &MemberId) -> bool {
        self.positions.contains_key(member)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MemberId, f64)> {
        self.positions.iter().map(|(id, &amount)| (id, amount))
    }

    pub fn member_ids(&self) -> impl Iterator<Item = &MemberId> {
        self.positions.keys()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sum of all balances. Zero up to float noise for any valid ledger.
    pub fn total(&self) -> f64 {
        self.positions.values().sum()
    }

    /// Whether the balances sum to zero within `tolerance`.
    pub fn is_balanced(&self, tolerance: f64) -> bool {
        self.total().abs() < tolerance
    }

    /// Whether every balance is below `epsilon` in absolute value.
    pub fn is_settled(&self, epsilon: f64) -> bool {
        self.positions.values().all(|amount| amount.abs() < epsilon)
    }

    /// Members the group owes money to, in balance order.
    pub fn creditors(&self, epsilon: f64) -> Vec<(&MemberId, f64)> {
        self.iter().filter(|(_, amount)| *amount >= epsilon).collect()
    }

    /// Members who owe the group money, in balance order.
    pub fn debtors(&self, epsilon: f64) -> Vec<(&MemberId, f64)> {
        self.iter().filter(|(_, amount)| *amount <= -epsilon).collect()
    }

    /// Sum of positive balances: what the debtors collectively owe.
    pub fn net_imbalance(&self) -> f64 {
        self.positions.values().filter(|v| **v > 0.0).sum()
    }

    /// Apply a transfer: the payer moves up by the exact amount, the
    /// receiver moves down by the same amount.
    pub fn apply_settlement(&mut self, settlement: &Settlement) {
        self.adjust(&settlement.from.id, settlement.exact_amount);
        self.adjust(&settlement.to.id, -settlement.exact_amount);
    }
}

impl FromIterator<(MemberId, f64)> for Balances {
    fn from_iter<T: IntoIterator<Item = (MemberId, f64)>>(iter: T) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::member::Member;
    use approx::assert_abs_diff_eq;

    fn id(s: &str) -> MemberId {
        MemberId::new(s)
    }

    #[test]
    fn test_zeroed_keeps_member_order() {
        let ids = [id("c"), id("a"), id("b")];
        let balances = Balances::zeroed(&ids);
        let order: Vec<&str> = balances.member_ids().map(|m| m.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
        assert!(balances.is_settled(DEFAULT_EPSILON));
    }

    #[test]
    fn test_adjust_and_total() {
        let mut balances = Balances::zeroed(&[id("a"), id("b")]);
        balances.adjust(&id("a"), 50.0);
        balances.adjust(&id("b"), -50.0);
        assert_abs_diff_eq!(balances.get(&id("a")), 50.0);
        assert_abs_diff_eq!(balances.get(&id("b")), -50.0);
        assert_abs_diff_eq!(balances.get(&id("missing")), 0.0);
        assert!(balances.is_balanced(1e-6));
        assert_abs_diff_eq!(balances.net_imbalance(), 50.0);
    }

    #[test]
    fn test_creditors_and_debtors() {
        let balances: Balances = [(id("a"), 20.0), (id("b"), -15.0), (id("c"), 0.004), (id("d"), -5.0)]
            .into_iter()
            .collect();
        let creditors: Vec<&str> = balances
            .creditors(DEFAULT_EPSILON)
            .into_iter()
            .map(|(m, _)| m.as_str())
            .collect();
        let debtors: Vec<&str> = balances
            .debtors(DEFAULT_EPSILON)
            .into_iter()
            .map(|(m, _)| m.as_str())
            .collect();
        assert_eq!(creditors, vec!["a"]);
        assert_eq!(debtors, vec!["b", "d"]);
    }

    #[test]
    fn test_apply_settlement_moves_both_toward_zero() {
        let mut balances: Balances = [(id("a"), 30.0), (id("b"), -30.0)].into_iter().collect();
        let settlement = Settlement::new(Member::new("b", "Bob"), Member::new("a", "Alice"), 30.0);
        balances.apply_settlement(&settlement);
        assert!(balances.is_settled(DEFAULT_EPSILON));
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let balances: Balances = [(id("z"), 1.5), (id("a"), -1.5)].into_iter().collect();
        let json = serde_json::to_string(&balances).unwrap();
        assert_eq!(json, r#"{"z":1.5,"a":-1.5}"#);
    }
}
