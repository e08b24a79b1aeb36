use crate::core::error::{ExpenseDefect, SettleError};
use crate::core::member::MemberId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for a recorded expense.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ExpenseId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A shared expense: one member paid `amount` on behalf of `participants`.
///
/// The payer does not have to be among the participants. Construction never
/// fails; amount and participant checks happen when the expense is fed to
/// the balance aggregator, so a bad record is reported instead of skipped.
///
/// # Examples
///
/// ```
/// use settle_up::core::expense::Expense;
/// use settle_up::core::member::MemberId;
/// use rust_decimal_macros::dec;
///
/// let dinner = Expense::new(
///     "e1",
///     MemberId::new("alice"),
///     dec!(300),
///     vec![MemberId::new("alice"), MemberId::new("bob"), MemberId::new("carol")],
/// )
/// .with_description("Dinner");
///
/// assert_eq!(dinner.participants().len(), 3);
/// assert_eq!(dinner.description(), "Dinner");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawExpense")]
pub struct Expense {
    id: ExpenseId,
    description: String,
    amount: Decimal,
    payer: MemberId,
    participants: Vec<MemberId>,
    created_at: Option<DateTime<Utc>>,
}

/// Wire shape of an expense; decoded records go through `Expense::new`.
#[derive(Deserialize)]
struct RawExpense {
    id: ExpenseId,
    #[serde(default)]
    description: String,
    amount: Decimal,
    payer: MemberId,
    participants: Vec<MemberId>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl From<RawExpense> for Expense {
    fn from(raw: RawExpense) -> Self {
        let mut expense = Expense::new(raw.id, raw.payer, raw.amount, raw.participants)
            .with_description(raw.description);
        expense.created_at = raw.created_at;
        expense
    }
}

impl Expense {
    /// Create a new expense. Repeated participant ids are collapsed,
    /// keeping the first occurrence.
    pub fn new(
        id: impl Into<ExpenseId>,
        payer: MemberId,
        amount: Decimal,
        participants: impl IntoIterator<Item = MemberId>,
    ) -> Self {
        let mut unique: Vec<MemberId> = Vec::new();
        for participant in participants {
            if !unique.contains(&participant) {
                unique.push(participant);
            }
        }
        Self {
            id: id.into(),
            description: String::new(),
            amount,
            payer,
            participants: unique,
            created_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Check the amount and participant invariants.
    pub fn validate(&self) -> Result<(), SettleError> {
        if self.amount <= Decimal::ZERO {
            return Err(self.defect(ExpenseDefect::NonPositiveAmount(self.amount)));
        }
        if self.participants.is_empty() {
            return Err(self.defect(ExpenseDefect::NoParticipants));
        }
        Ok(())
    }

    /// The amount as it enters the balances: rounded up to a whole unit.
    pub fn rounded_amount(&self) -> Decimal {
        self.amount.ceil()
    }

    pub(crate) fn defect(&self, defect: ExpenseDefect) -> SettleError {
        SettleError::InvalidExpense {
            expense: self.id.clone(),
            defect,
        }
    }

    // --- Accessors ---

    pub fn id(&self) -> &ExpenseId {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn payer(&self) -> &MemberId {
        &self.payer
    }

    pub fn participants(&self) -> &[MemberId] {
        &self.participants
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}
