use crate::core::balance::Balances;
use crate::core::error::{Reference, SettleError};
use crate::core::expense::Expense;
use crate::core::member::{Member, MemberId};
use log::debug;
use rust_decimal::prelude::ToPrimitive;
use std::collections::HashSet;

/// Reduce a group's expenses to one net balance per member.
///
/// # Algorithm
///
/// 1. Every member starts at zero, in member-list order.
/// 2. For each expense the payer is credited the full amount (rounded up
///    to a whole unit) and every participant is debited an equal share.
/// 3. Shares use real division, so a three-way split of 100 debits
///    33.33… from each participant.
///
/// The result always sums to zero up to float noise. Any invalid expense or
/// dangling member reference aborts the whole computation.
///
/// # Examples
///
/// ```
/// use settle_up::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let members = vec![Member::new("a", "Alice"), Member::new("b", "Bob")];
/// let expenses = vec![Expense::new(
///     "e1",
///     MemberId::new("a"),
///     dec!(100),
///     vec![MemberId::new("a"), MemberId::new("b")],
/// )];
///
/// let balances = compute_balances(&members, &expenses).unwrap();
/// assert_eq!(balances.get(&MemberId::new("a")), 50.0);
/// assert_eq!(balances.get(&MemberId::new("b")), -50.0);
/// ```
pub fn compute_balances(members: &[Member], expenses: &[Expense]) -> Result<Balances, SettleError> {
    let mut known: HashSet<&MemberId> = HashSet::with_capacity(members.len());
    for member in members {
        if !known.insert(&member.id) {
            return Err(SettleError::DuplicateMember(member.id.clone()));
        }
    }

    let mut balances = Balances::zeroed(members.iter().map(|m| &m.id));

    for expense in expenses {
        expense.validate()?;
        check_references(expense, &known)?;

        // Decimal -> f64 is total; every Decimal lies well inside f64 range.
        let amount = expense.rounded_amount().to_f64().unwrap_or_default();
        let share = amount / expense.participants().len() as f64;

        balances.adjust(expense.payer(), amount);
        for participant in expense.participants() {
            balances.adjust(participant, -share);
        }
    }

    debug!(
        "aggregated {} expenses over {} members (residual {:e})",
        expenses.len(),
        balances.len(),
        balances.total()
    );
    Ok(balances)
}

fn check_references(expense: &Expense, known: &HashSet<&MemberId>) -> Result<(), SettleError> {
    if !known.contains(expense.payer()) {
        return Err(SettleError::ReferentialIntegrity {
            member: expense.payer().clone(),
            reference: Reference::Payer(expense.id().clone()),
        });
    }
    if let Some(stranger) = expense.participants().iter().find(|p| !known.contains(p)) {
        return Err(SettleError::ReferentialIntegrity {
            member: stranger.clone(),
            reference: Reference::Participant(expense.id().clone()),
        });
    }
    Ok(())
}
