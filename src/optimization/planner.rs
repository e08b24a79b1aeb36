use crate::core::balance::{Balances, DEFAULT_EPSILON};
use crate::core::error::{Reference, SettleError};
use crate::core::member::{Member, MemberId};
use crate::core::settlement::Settlement;
use log::{debug, trace, warn};
use std::collections::HashMap;

/// Tuning for the settlement planner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerConfig {
    /// Balances smaller than this in absolute value count as settled.
    pub epsilon: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

/// Greedy largest-creditor / largest-debtor settlement planner.
///
/// Each round pairs the member owed the most with the member owing the
/// most and moves as much as one of them needs to reach zero. Ties go to
/// the member that comes first in balance order, which makes the plan
/// fully deterministic for a given input order.
///
/// The greedy pairing keeps the number of transfers small for the group
/// sizes this is meant for, but it is not guaranteed to reach the
/// theoretical minimum for every distribution.
#[derive(Debug, Clone, Default)]
pub struct SettlementPlanner {
    config: PlannerConfig,
}

impl SettlementPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Produce the ordered list of transfers that zeroes `balances`.
    ///
    /// Only a local working copy of the balances is modified. Every
    /// balance entry must belong to a member in `members`, and member ids
    /// must be unique.
    pub fn plan(&self, balances: &Balances, members: &[Member]) -> Result<Vec<Settlement>, SettleError> {
        let epsilon = self.config.epsilon;
        let mut directory: HashMap<&MemberId, &Member> = HashMap::with_capacity(members.len());
        for member in members {
            if directory.insert(&member.id, member).is_some() {
                return Err(SettleError::DuplicateMember(member.id.clone()));
            }
        }

        let mut open: Vec<&Member> = Vec::with_capacity(balances.len());
        let mut working: Vec<f64> = Vec::with_capacity(balances.len());
        for (id, amount) in balances.iter() {
            let member = directory
                .get(id)
                .copied()
                .ok_or_else(|| SettleError::ReferentialIntegrity {
                    member: id.clone(),
                    reference: Reference::Balance,
                })?;
            open.push(member);
            working.push(amount);
        }

        let mut settlements = Vec::new();

        while open.len() > 1 {
            let (creditor, debtor) = extremes(&working);
            let credit = working[creditor];
            let debit = working[debtor];

            if credit.abs() < epsilon && debit.abs() < epsilon {
                break;
            }
            if creditor == debtor {
                break;
            }

            let transfer = credit.min(debit.abs());
            let emitted = transfer > 0.0;
            if emitted {
                let settlement =
                    Settlement::new(open[debtor].clone(), open[creditor].clone(), transfer);
                trace!(
                    "planned {} (exact {}, rounded up by {:.4})",
                    settlement,
                    transfer,
                    settlement.rounding()
                );
                settlements.push(settlement);
                working[creditor] -= transfer;
                working[debtor] += transfer;
            }

            let mut settled: Vec<usize> = [creditor, debtor]
                .into_iter()
                .filter(|&idx| working[idx].abs() < epsilon)
                .collect();
            if settled.is_empty() && !emitted {
                warn!(
                    "settlement stalled with {} open balances (max {}, min {})",
                    open.len(),
                    credit,
                    debit
                );
                break;
            }
            // Remove the higher index first so the lower one stays valid.
            settled.sort_unstable_by(|a, b| b.cmp(a));
            for idx in settled {
                open.remove(idx);
                working.remove(idx);
            }
        }

        debug!(
            "planned {} settlements for {} balances",
            settlements.len(),
            balances.len()
        );
        Ok(settlements)
    }
}

/// Indices of the maximum and minimum values, first occurrence on ties.
fn extremes(values: &[f64]) -> (usize, usize) {
    let mut max = 0;
    let mut min = 0;
    for (idx, &value) in values.iter().enumerate().skip(1) {
        if value > values[max] {
            max = idx;
        }
        if value < values[min] {
            min = idx;
        }
    }
    (max, min)
}

/// Plan settlements with the default tolerance.
///
/// # Examples
///
/// ```
/// use settle_up::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let members = vec![
///     Member::new("a", "Alice"),
///     Member::new("b", "Bob"),
///     Member::new("c", "Carol"),
/// ];
/// let expenses = vec![Expense::new(
///     "e1",
///     MemberId::new("a"),
///     dec!(300),
///     members.iter().map(|m| m.id.clone()),
/// )];
///
/// let balances = compute_balances(&members, &expenses).unwrap();
/// let plan = plan_settlements(&balances, &members).unwrap();
///
/// let lines: Vec<String> = plan.iter().map(|s| s.to_string()).collect();
/// assert_eq!(lines, vec!["Bob → Alice: 100", "Carol → Alice: 100"]);
/// ```
pub fn plan_settlements(balances: &Balances, members: &[Member]) -> Result<Vec<Settlement>, SettleError> {
    SettlementPlanner::default().plan(balances, members)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(names: &[&str]) -> Vec<Member> {
        names.iter().map(|n| Member::new(*n, n.to_uppercase())).collect()
    }

    fn balances(entries: &[(&str, f64)]) -> Balances {
        entries
            .iter()
            .map(|(id, amount)| (MemberId::new(*id), *amount))
            .collect()
    }

    fn summary(plan: &[Settlement]) -> Vec<(String, String, u64)> {
        plan.iter()
            .map(|s| (s.from.id.to_string(), s.to.id.to_string(), s.amount))
            .collect()
    }

    fn owned(rows: &[(&str, &str, u64)]) -> Vec<(String, String, u64)> {
        rows.iter()
            .map(|(f, t, a)| (f.to_string(), t.to_string(), *a))
            .collect()
    }

    #[test]
    fn test_single_creditor_two_debtors() {
        let plan = plan_settlements(
            &balances(&[("a", 200.0), ("b", -100.0), ("c", -100.0)]),
            &members(&["a", "b", "c"]),
        )
        .unwrap();
        assert_eq!(summary(&plan), owned(&[("b", "a", 100), ("c", "a", 100)]));
    }

    #[test]
    fn test_all_zero_yields_nothing() {
        let plan = plan_settlements(
            &balances(&[("a", 0.0), ("b", 0.0), ("c", 0.0)]),
            &members(&["a", "b", "c"]),
        )
        .unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_single_member_yields_nothing() {
        let plan = plan_settlements(&balances(&[("a", 0.0)]), &members(&["a"])).unwrap();
        assert!(plan.is_empty());
        let plan = plan_settlements(&Balances::new(), &[]).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_largest_pair_matched_first() {
        let plan = plan_settlements(
            &balances(&[("a", 10.0), ("b", 50.0), ("c", -45.0), ("d", -15.0)]),
            &members(&["a", "b", "c", "d"]),
        )
        .unwrap();
        // b(50) <- c(-45) for 45, then b(5)/a(10) vs d(-15): a first (10), then b (5).
        assert_eq!(
            summary(&plan),
            owned(&[("c", "b", 45), ("d", "a", 10), ("d", "b", 5)])
        );
    }

    #[test]
    fn test_ties_resolve_to_first_in_order() {
        let plan = plan_settlements(
            &balances(&[("x", -30.0), ("y", -30.0), ("p", 30.0), ("q", 30.0)]),
            &members(&["x", "y", "p", "q"]),
        )
        .unwrap();
        assert_eq!(summary(&plan), owned(&[("x", "p", 30), ("y", "q", 30)]));
    }

    #[test]
    fn test_transfer_amounts_round_up() {
        let third = 100.0 / 3.0;
        let plan = plan_settlements(
            &balances(&[("a", 100.0 - third), ("b", -third), ("c", -third)]),
            &members(&["a", "b", "c"]),
        )
        .unwrap();
        assert_eq!(summary(&plan), owned(&[("b", "a", 34), ("c", "a", 34)]));
    }

    #[test]
    fn test_noise_below_epsilon_is_settled() {
        let plan = plan_settlements(
            &balances(&[("a", 0.004), ("b", -0.004)]),
            &members(&["a", "b"]),
        )
        .unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_zero_balance_member_is_skipped() {
        let plan = plan_settlements(
            &balances(&[("z", 0.0), ("a", 25.0), ("b", -25.0)]),
            &members(&["z", "a", "b"]),
        )
        .unwrap();
        assert_eq!(summary(&plan), owned(&[("b", "a", 25)]));
    }

    #[test]
    fn test_settlement_carries_member_names() {
        let plan = plan_settlements(
            &balances(&[("a", 5.0), ("b", -5.0)]),
            &members(&["a", "b"]),
        )
        .unwrap();
        assert_eq!(plan[0].from.name, "B");
        assert_eq!(plan[0].to.name, "A");
    }

    #[test]
    fn test_custom_epsilon() {
        let planner = SettlementPlanner::new(PlannerConfig { epsilon: 1.0 });
        let plan = planner
            .plan(&balances(&[("a", 0.5), ("b", -0.5)]), &members(&["a", "b"]))
            .unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_unbalanced_input_terminates() {
        // Every open balance is negative: nothing can be transferred.
        let plan = plan_settlements(
            &balances(&[("a", -5.0), ("b", -5.0)]),
            &members(&["a", "b"]),
        )
        .unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_unknown_balance_member_rejected() {
        let err = plan_settlements(
            &balances(&[("a", 5.0), ("ghost", -5.0)]),
            &members(&["a"]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SettleError::ReferentialIntegrity {
                member: MemberId::new("ghost"),
                reference: Reference::Balance,
            }
        );
    }

    #[test]
    fn test_duplicate_member_rejected() {
        let members = vec![
            Member::new("a", "Alice"),
            Member::new("a", "Mallory"),
            Member::new("b", "Bob"),
        ];
        let err = plan_settlements(&balances(&[("a", 5.0), ("b", -5.0)]), &members).unwrap_err();
        assert_eq!(err, SettleError::DuplicateMember(MemberId::new("a")));
    }

    #[test]
    fn test_extremes_first_occurrence() {
        assert_eq!(extremes(&[1.0, 3.0, 3.0, -2.0, -2.0]), (1, 3));
        assert_eq!(extremes(&[0.0, 0.0]), (0, 0));
    }
}
