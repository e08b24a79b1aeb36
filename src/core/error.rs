use crate::core::expense::ExpenseId;
use crate::core::member::MemberId;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Errors raised while computing balances or planning settlements.
///
/// Every operation is all-or-nothing: the first error aborts the
/// computation and no partial result is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettleError {
    #[error("invalid expense {expense}: {defect}")]
    InvalidExpense {
        expense: ExpenseId,
        defect: ExpenseDefect,
    },
    #[error("member {member} referenced by {reference} is not part of the group")]
    ReferentialIntegrity {
        member: MemberId,
        reference: Reference,
    },
    #[error("member id {0} appears more than once in the member list")]
    DuplicateMember(MemberId),
}

/// What is wrong with a rejected expense.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpenseDefect {
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("expense has no participants")]
    NoParticipants,
}

/// Where a dangling member reference was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    Payer(ExpenseId),
    Participant(ExpenseId),
    Balance,
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Payer(id) => write!(f, "payer of expense {}", id),
            Reference::Participant(id) => write!(f, "participant of expense {}", id),
            Reference::Balance => write!(f, "balance entry"),
        }
    }
}
